use crate::config::OutputFormat;
use std::path::{Component, Path, PathBuf};

const SKIPPED_COMPONENT: &str = "data";
const KNOWN_EXTENSIONS: [&str; 3] = ["pdf", "svg", "png"];

/// Output name derived from an input path: `./data/deviceA/run1.jls` ->
/// `deviceA-run1`.
pub fn output_stem<P: AsRef<Path>>(input: P) -> String {
    let without_extension = input.as_ref().with_extension("");
    let parts: Vec<_> = without_extension
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .filter(|part| part != SKIPPED_COMPONENT)
        .collect();
    parts.join("-")
}

/// Explicit names keep only their final component, minus a chart file
/// extension, so charts always land in the output directory. `None` when no
/// file name is left (`..`, `/`).
pub fn explicit_stem(name: &str) -> Option<String> {
    let file = Path::new(Path::new(name).file_name()?);
    let stem = match file.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if KNOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
            file.with_extension("")
        }
        _ => file.to_path_buf(),
    };
    Some(stem.to_string_lossy().into_owned()).filter(|stem| !stem.is_empty())
}

pub fn output_path(dir: &Path, name: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{}.{}", name, format.extension()))
}
