pub mod io;
mod mask;
mod u8;

pub use self::mask::BinaryMask;
pub use self::u8::ImageU8;
