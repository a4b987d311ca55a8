//! TOML parser with helpful error messages

use super::schema::RainConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse rain.toml with detailed error messages
pub fn parse_rain_toml(path: &Path) -> Result<RainConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_rain_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse rain.toml content from string
pub fn parse_rain_toml_str(content: &str) -> Result<RainConfig> {
    let config: RainConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.to_string();

    // toml reports "TOML parse error at line N, column M"
    let line_hint = error_msg
        .lines()
        .find(|line| line.contains("line "))
        .and_then(|line| {
            line.split("line ")
                .nth(1)
                .and_then(|s| s.split(|c: char| !c.is_ascii_digit()).next())
                .and_then(|s| s.parse::<usize>().ok())
        });

    match line_hint {
        Some(line_num) => anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            get_line_context(content, line_num),
            error_msg
        ),
        None => anyhow::anyhow!("TOML parsing error: {}", error_msg),
    }
}

/// Up to two lines either side of `line_num`, marked
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 2).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn to_toml(config: &RainConfig) -> Result<String> {
    toml::to_string_pretty(config).with_context(|| "Failed to serialize configuration to TOML")
}
