//! CLI command implementations

use crate::{
    output::{format_rows, to_json, OutputFormat},
    script,
};
use anyhow::Context;
use console::style;
use serde::Serialize;
use showreel_core::{config::try_parse_sources, parse_sources, PlayerConfig};
use std::collections::HashMap;
use std::path::Path;
use tabled::Tabled;
use tracing::debug;

#[derive(Serialize, Tabled)]
struct SourceRow {
    #[tabled(rename = "#")]
    index: usize,
    src: String,
    #[tabled(rename = "type")]
    mime_type: String,
}

/// Parse and list an encoded source list
pub fn sources(encoded: &str, strict: bool, format: &str) -> anyhow::Result<()> {
    let sources = if strict {
        try_parse_sources(encoded).context("source list is malformed")?
    } else {
        parse_sources(encoded)
    };

    if sources.is_empty() && OutputFormat::from(format) != OutputFormat::Json {
        let notice = "No playable sources (player will start with controls disabled)";
        println!("{}", style(notice).yellow());
        return Ok(());
    }

    let rows: Vec<SourceRow> = sources
        .iter()
        .enumerate()
        .map(|(i, s)| SourceRow {
            index: i + 1,
            src: s.uri.clone(),
            mime_type: s.mime_type.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", format_rows(&rows, format)?);
    Ok(())
}

/// Resolve a config from `name=value` data attributes
pub fn config(attrs: &[String], format: &str) -> anyhow::Result<()> {
    let attrs = parse_attrs(attrs)?;
    let config = PlayerConfig::from_attributes(|name| attrs.get(name).cloned());

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", to_json(&config)?),
        OutputFormat::Text | OutputFormat::Table => {
            println!("Resolved player config:");
            println!("  Autoplay: {}", config.autoplay);
            println!("  Muted:    {}", config.muted);
            println!("  Loop:     {}", config.loop_playback);
            println!("  Controls: {}", config.show_controls);
            println!("  Poster:   {}", config.poster.as_deref().unwrap_or("-"));
            println!("  Sources:  {}", config.sources.len());
        }
    }

    match config.validate() {
        Ok(()) => eprintln!("{}", style("✓ config is playable").green()),
        Err(e) => eprintln!("{} {}", style("✗").red(), e),
    }
    Ok(())
}

/// Replay a script and print the state after each step
pub fn simulate(config_path: &Path, script_path: &Path, format: &str) -> anyhow::Result<()> {
    let config_json = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;
    let config = PlayerConfig::from_json(&config_json)?;

    let script_json = std::fs::read_to_string(script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;
    let steps = script::parse(&script_json)
        .with_context(|| format!("parsing script {}", script_path.display()))?;

    debug!(steps = steps.len(), sources = config.sources.len(), "Running script");
    let rows = script::run(config, &steps);
    println!("{}", format_rows(&rows, format)?);

    let failures = rows.iter().filter(|r| r.result != "ok").count();
    if failures > 0 && OutputFormat::from(format) != OutputFormat::Json {
        eprintln!("{}", style(format!("{} step(s) returned an error", failures)).yellow());
    }
    Ok(())
}

#[derive(Serialize, Tabled)]
struct TimeRow {
    seconds: f64,
    label: String,
}

/// Print time labels
pub fn format_time(seconds: &[f64], format: &str) -> anyhow::Result<()> {
    let rows: Vec<TimeRow> = seconds
        .iter()
        .map(|&s| TimeRow {
            seconds: s,
            label: showreel_core::format_time(s),
        })
        .collect();

    println!("{}", format_rows(&rows, format)?);
    Ok(())
}

fn parse_attrs(attrs: &[String]) -> anyhow::Result<HashMap<String, String>> {
    attrs
        .iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .with_context(|| format!("expected NAME=VALUE, got {:?}", pair))?;
            let name = name.trim().trim_start_matches("data-");
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}
