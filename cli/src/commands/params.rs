use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use super::{format_output, print_info, print_success, OutputFormat};
use fork_core::config::ForkConfig;
use fork_core::consensus::poison_pattern;
use fork_core::script::ScriptBuilder;

#[derive(Serialize)]
struct MarkerInfo {
    marker_hex: String,
    marker_len: usize,
    replay_script_hex: String,
}

/// Effective configuration after file and environment overrides
pub fn show_params(config: &ForkConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        OutputFormat::Json => format_output(config, format, None),
    }
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Refusing to overwrite existing file {}", path.display());
    }
    ForkConfig::write_default(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    print_success(&format!("Wrote default configuration to {}", path.display()));
    Ok(())
}

pub fn show_marker(format: OutputFormat) -> Result<()> {
    let marker = poison_pattern();
    let info = MarkerInfo {
        marker_hex: marker.to_hex(),
        marker_len: marker.as_bytes().len(),
        replay_script_hex: ScriptBuilder::replay_protection(marker).to_string(),
    };

    if format == OutputFormat::Text {
        if let Ok(text) = std::str::from_utf8(marker.as_bytes()) {
            print_info(&format!("Marker text: {}", text));
        }
    }
    format_output(&info, format, Some("Replay protection"))
}
