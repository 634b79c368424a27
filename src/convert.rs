//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{bail, Result};

use aeolus_hindcast::{AssembleConfig, LeadMode};
use aeolus_locate::{ConflictPolicy, YearRule};

use crate::config::DataConfig;

/// Parses a year-extraction rule name into the corresponding enum variant.
pub fn parse_year_rule(s: &str) -> Result<YearRule> {
    match s.to_lowercase().as_str() {
        "member-split" | "member_split" => Ok(YearRule::MemberSplit),
        "date-stamp" | "date_stamp" => Ok(YearRule::DateStamp),
        "year-component" | "year_component" => Ok(YearRule::YearComponent),
        other => bail!("unknown year rule: {other:?}"),
    }
}

/// Parses a year-collision policy name into the corresponding enum variant.
pub fn parse_conflict_policy(s: &str) -> Result<ConflictPolicy> {
    match s.to_lowercase().as_str() {
        "error" => Ok(ConflictPolicy::Error),
        "keep-first" | "keep_first" => Ok(ConflictPolicy::KeepFirst),
        "keep-last" | "keep_last" => Ok(ConflictPolicy::KeepLast),
        other => bail!("unknown conflict policy: {other:?}"),
    }
}

/// Builds the assembly configuration from the `[data]` section.
pub fn build_assemble_config(data: &DataConfig) -> Result<AssembleConfig> {
    let mut config = AssembleConfig::new(
        data.template.clone(),
        data.members.clone(),
        data.field.clone(),
        data.first_year,
        data.last_year,
        data.start_month,
    )
    .with_year_rule(parse_year_rule(&data.year_rule)?)
    .with_conflict_policy(parse_conflict_policy(&data.conflict_policy)?);

    if let Some(leads) = &data.leads {
        config = config.with_lead_mode(LeadMode::Explicit(leads.clone()));
    }
    if let Some(companions) = &data.companions {
        config = config.with_companion_vars(companions.clone());
    }

    Ok(config)
}
