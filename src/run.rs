use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::cli;
use crate::config::{self, ConfigKey, ExportConfig};
use crate::export::{self, ExportSummary, FlattenOptions};
use crate::github::client::IssuesClient;
use crate::output;

/// Runs the command in `args`.
///
/// `overrides` replaces the environment lookup when given; `None` reads the
/// process environment.
pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
    overrides: Option<HashMap<ConfigKey, Value>>,
) -> anyhow::Result<()> {
    match cli::parser::parse_args(&args) {
        cli::parser::Command::Export {
            config: config_path,
        } => {
            let path = config_path
                .map(PathBuf::from)
                .unwrap_or_else(config::default_config_path);
            let file_config = config::load_config(&path)?;
            let merged = config::update_config(
                &file_config,
                &overrides.unwrap_or_else(config::env_overrides),
            );
            let export_config = ExportConfig::from_map(&merged)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;

            let summary = export_to_file(&export_config).await?;
            output::println(
                &output::export_summary(&summary, &export_config.output),
                &mut stdout_additional,
            )?;
        }
        cli::parser::Command::Help => {
            output::println(output::USAGE, &mut stdout_additional)?;
        }
        cli::parser::Command::Unknown(description) => {
            output::println(
                &output::invalid_command(&description),
                &mut stdout_additional,
            )?;
            return Err(anyhow::anyhow!("Unknown command {description}"));
        }
    }
    Ok(())
}

/// Creates (or truncates) the configured output file and writes the full export into it.
pub async fn export_to_file(config: &ExportConfig) -> Result<ExportSummary> {
    let client = IssuesClient::new(config)?;
    let options = FlattenOptions {
        delimiter: config.delimiter,
        include_pull_requests: config.include_pull_requests,
    };

    let file = File::create(&config.output)
        .with_context(|| format!("Failed to create {}", config.output.display()))?;
    let mut out = BufWriter::new(file);

    tracing::info!(
        owner = %config.owner,
        repo = %config.repo,
        output = %config.output.display(),
        "starting issue export"
    );
    let summary = export::export_issues(&client, &mut out, &options).await?;
    out.flush()
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    Ok(summary)
}
