use crate::lag::LagOptions;
use crate::stick::ExtensionTolerance;
use crate::types::Orientation;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub orientation: Orientation,
    /// Staff interline in pixels; scales every tolerance below.
    #[serde(default = "default_interline")]
    pub interline: i32,
    #[serde(default)]
    pub lag: LagConfig,
    #[serde(default)]
    pub sticks: SticksConfig,
    #[serde(default)]
    pub extension: ExtensionConfig,
    #[serde(default)]
    pub aliens: AliensConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_interline() -> i32 {
    20
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LagConfig {
    /// Gray levels strictly below the threshold are foreground.
    pub foreground_threshold: u8,
    /// Max length ratio between consecutive runs of one section.
    pub max_length_ratio: Option<f32>,
}

impl Default for LagConfig {
    fn default() -> Self {
        Self {
            foreground_threshold: 128,
            max_length_ratio: None,
        }
    }
}

impl LagConfig {
    pub fn to_lag_options(&self) -> LagOptions {
        LagOptions {
            max_length_ratio: self
                .max_length_ratio
                .filter(|v| v.is_finite() && *v >= 1.0),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SticksConfig {
    /// Sections lighter than this never seed a stick.
    pub min_weight: usize,
}

impl Default for SticksConfig {
    fn default() -> Self {
        Self { min_weight: 10 }
    }
}

/// Extension tolerances as fractions of the interline.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionConfig {
    pub max_delta_coord: f64,
    pub max_delta_pos: f64,
    /// Absolute slope difference, not scaled.
    pub max_delta_slope: f64,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            max_delta_coord: 1.0,
            max_delta_pos: 0.2,
            max_delta_slope: 0.1,
        }
    }
}

impl ExtensionConfig {
    pub fn to_tolerance(&self, interline: i32) -> ExtensionTolerance {
        ExtensionTolerance {
            max_delta_coord: to_pixels(self.max_delta_coord, interline),
            max_delta_pos: to_pixels(self.max_delta_pos, interline),
            max_delta_slope: self.max_delta_slope,
        }
    }
}

/// Alien window at the stick ends, as fractions of the interline.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AliensConfig {
    pub delta_coord: f64,
    pub delta_pos: f64,
}

impl Default for AliensConfig {
    fn default() -> Self {
        Self {
            delta_coord: 0.5,
            delta_pos: 0.3,
        }
    }
}

impl AliensConfig {
    /// `(dcoord, dpos)` in pixels.
    pub fn to_window(&self, interline: i32) -> (i32, i32) {
        (
            to_pixels(self.delta_coord, interline),
            to_pixels(self.delta_pos, interline),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputConfig {
    /// Where to write the JSON report; printed to stdout when absent.
    pub report_json: Option<PathBuf>,
}

fn to_pixels(fraction: f64, interline: i32) -> i32 {
    (fraction * interline as f64).round().max(0.0) as i32
}

pub fn load_config(path: &Path) -> Result<StickToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: StickToolConfig = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    if config.interline < 1 {
        return Err(format!(
            "Invalid interline {} in {}",
            config.interline,
            path.display()
        ));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_takes_defaults() {
        let config: StickToolConfig = serde_json::from_str(r#"{ "input": "page.png" }"#).unwrap();
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert_eq!(config.interline, 20);
        assert_eq!(config.lag.foreground_threshold, 128);
        assert_eq!(config.sticks.min_weight, 10);
        assert!(config.output.report_json.is_none());

        let tol = config.extension.to_tolerance(config.interline);
        assert_eq!((tol.max_delta_coord, tol.max_delta_pos), (20, 4));
        assert_eq!(config.aliens.to_window(config.interline), (10, 6));
    }

    #[test]
    fn camel_case_fields_are_read() {
        let config: StickToolConfig = serde_json::from_str(
            r#"{
                "input": "page.png",
                "orientation": "vertical",
                "interline": 16,
                "lag": { "foregroundThreshold": 100, "maxLengthRatio": 0.5 },
                "extension": { "maxDeltaCoord": 0.5 },
                "output": { "reportJson": "out/sticks.json" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.orientation, Orientation::Vertical);
        assert_eq!(config.lag.foreground_threshold, 100);
        assert_eq!(config.lag.to_lag_options().max_length_ratio, None);
        assert_eq!(config.extension.to_tolerance(16).max_delta_coord, 8);
        assert_eq!(
            config.output.report_json.as_deref(),
            Some(Path::new("out/sticks.json"))
        );
    }
}
