use omr_sticks::config::sticks::{load_config, StickToolConfig};
use omr_sticks::diagnostics::SticksReport;
use omr_sticks::image::io::{load_grayscale_image, write_json_file};
use omr_sticks::{LagBuilder, StickSet};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = parse_cli()?;
    let config = load_config(&config_path)?;

    let gray = load_grayscale_image(&config.input)?;
    let mask = gray.binarize(config.lag.foreground_threshold);
    println!(
        "Loaded {} ({}x{}), {} foreground pixels",
        config.input.display(),
        gray.width(),
        gray.height(),
        mask.count_foreground()
    );

    let lag = LagBuilder::new(config.orientation, config.lag.to_lag_options())
        .build(&mask)
        .map_err(|e| format!("Failed to build lag: {e}"))?;
    let (report, set_len) = extract_sticks(&config, &lag)?;

    println!("Stick summary");
    println!("  orientation: {:?}", config.orientation);
    println!("  sections: {}", report.lag.sections);
    println!("  sticks: {set_len}");
    println!("  merges: {}", report.merges);

    match &config.output.report_json {
        Some(path) => {
            write_json_file(path, &report)?;
            println!("JSON report written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn extract_sticks(
    config: &StickToolConfig,
    lag: &omr_sticks::Lag,
) -> Result<(SticksReport, usize), String> {
    let interline = config.interline;
    let mut set = StickSet::new(lag);
    set.seed_from_sections(interline, config.sticks.min_weight)
        .map_err(|e| format!("Failed to seed sticks: {e}"))?;
    let tolerance = config.extension.to_tolerance(interline);
    let merges = set
        .merge_extensions(&tolerance)
        .map_err(|e| format!("Failed to merge sticks: {e}"))?;
    let window = config.aliens.to_window(interline);
    Ok((SticksReport::from_set(&set, merges, Some(window)), set.len()))
}

fn parse_cli() -> Result<PathBuf, String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "stick_tool".to_string());
    match (args.next(), args.next()) {
        (Some(path), None) => Ok(PathBuf::from(path)),
        _ => Err(format!("Usage: {program} <config.json>")),
    }
}
