//! Manifest command: discover hindcast files and report per-year coverage.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use aeolus_locate::{nested_file_list_by_year, FileTemplate};

use crate::cli::ManifestArgs;
use crate::config::AeolusConfig;
use crate::convert;

/// Run the standalone discovery report.
pub fn run(args: ManifestArgs) -> Result<()> {
    let _cmd = info_span!("manifest").entered();

    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: AeolusConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let template = FileTemplate::new(&config.data.template);
    let members: Vec<i32> = config.data.members.iter().map(|&m| m as i32 + 1).collect();
    let rule = convert::parse_year_rule(&config.data.year_rule)?;
    let policy = convert::parse_conflict_policy(&config.data.conflict_policy)?;

    info!(
        template = %config.data.template,
        n_members = members.len(),
        "discovering hindcast files"
    );
    let manifest = nested_file_list_by_year(
        &template,
        &members,
        config.data.first_year,
        config.data.last_year,
        config.data.start_month,
        rule,
        policy,
    )?;

    if manifest.is_empty() {
        println!(
            "no files found for years {}..={}",
            config.data.first_year, config.data.last_year
        );
        return Ok(());
    }

    println!("year  files  first file");
    for (year, files) in manifest.iter() {
        println!(
            "{year}  {:>5}  {}",
            files.len(),
            files[0].display()
        );
    }
    println!(
        "{} year(s), ensemble {}",
        manifest.len(),
        if manifest.is_complete() {
            "complete"
        } else {
            "INCOMPLETE"
        }
    );

    Ok(())
}
