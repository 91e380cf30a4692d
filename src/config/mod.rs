//! JSON configuration of the command line tool.
pub mod sticks;
