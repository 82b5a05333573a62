use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_PALETTE: [[u8; 3]; 4] = [[0, 0, 139], [255, 140, 0], [0, 100, 0], [139, 0, 0]];

/// Chart file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            other => Err(format!("unsupported output format `{}`", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Per-renderer drawing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub font_family: String,
    pub font_size: f64,
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Series colours, cycled by series index.
    pub palette: Vec<[u8; 3]>,
    /// Quantity shown on the y axis; the series units are appended.
    pub y_label: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            font_family: "serif".into(),
            font_size: 16.0,
            width: 800,
            height: 500,
            output_dir: PathBuf::from("out"),
            format: OutputFormat::Svg,
            palette: DEFAULT_PALETTE.to_vec(),
            y_label: "P".into(),
        }
    }
}

impl RendererConfig {
    pub fn rgb_for(&self, index: usize) -> [u8; 3] {
        if self.palette.is_empty() {
            DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
        } else {
            self.palette[index % self.palette.len()]
        }
    }
}
