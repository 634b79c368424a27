//! Assemble command: build the hindcast ensemble, optionally drift-correct
//! and write it out.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use aeolus_drift::remove_drift;
use aeolus_hindcast::{
    get_monthly_data_with, write_dataset, HindcastDataset, Sequential, WorkerPool,
};

use crate::cli::AssembleArgs;
use crate::config::AeolusConfig;
use crate::convert;

/// Run the assembly pipeline.
pub fn run(args: AssembleArgs) -> Result<()> {
    let _cmd = info_span!("assemble").entered();

    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: AeolusConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let assemble_config = convert::build_assemble_config(&config.data)?;

    let dataset = if args.parallel || config.data.parallel {
        get_monthly_data_with(&assemble_config, &WorkerPool)
    } else {
        get_monthly_data_with(&assemble_config, &Sequential)
    }
    .context("failed to assemble hindcast ensemble")?;

    info!(
        field = dataset.field_name(),
        n_years = dataset.n_years(),
        n_members = dataset.n_members(),
        n_leads = dataset.n_leads(),
        spatial = ?dataset.spatial_shape(),
        "hindcast ensemble assembled"
    );
    if let Some(values) = dataset.field().as_slice() {
        info!(
            n_missing = aeolus_stats::nan_count(values),
            field_mean = aeolus_stats::nanmean(values),
            "field summary"
        );
    }

    let output = match &config.drift {
        Some(drift) => {
            let correction = remove_drift(
                dataset.field(),
                dataset.time_bounds(),
                drift.y1,
                drift.y2,
            )
            .context("failed to remove drift")?;
            info!(y1 = drift.y1, y2 = drift.y2, "drift removed");

            HindcastDataset::new(
                dataset.field_name().to_string(),
                correction.anomaly,
                dataset.years().to_vec(),
                dataset.members().to_vec(),
                dataset.leads().to_vec(),
                dataset.times().clone(),
                dataset.time_bounds().clone(),
                dataset.companions().clone(),
            )
            .context("failed to rebuild anomaly dataset")?
        }
        None => dataset,
    };

    let path = args.output.or_else(|| config.output.path.clone());
    match path {
        Some(path) => {
            write_dataset(&path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => {
            println!(
                "assembled {}: {} year(s) x {} member(s) x {} lead(s), spatial {:?}",
                output.field_name(),
                output.n_years(),
                output.n_members(),
                output.n_leads(),
                output.spatial_shape()
            );
        }
    }

    Ok(())
}
