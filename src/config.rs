use std::path::PathBuf;

use serde::Deserialize;

/// Top-level Aeolus configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AeolusConfig {
    /// Hindcast discovery and assembly settings.
    pub data: DataConfig,

    /// Drift-removal settings; omit the section to skip drift removal.
    #[serde(default)]
    pub drift: Option<DriftToml>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,
}

/// The `[data]` section: where the hindcast lives and how to read it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Filename template with `EEE` and `MM` placeholder tokens.
    pub template: String,
    /// 0-based ensemble-member indices.
    pub members: Vec<u32>,
    /// NetCDF variable name of the hindcast field.
    pub field: String,
    /// First initialization year, inclusive.
    pub first_year: i32,
    /// Last initialization year, inclusive.
    pub last_year: i32,
    #[serde(default = "default_start_month")]
    pub start_month: u8,
    #[serde(default = "default_year_rule")]
    pub year_rule: String,
    #[serde(default = "default_conflict_policy")]
    pub conflict_policy: String,
    /// Optional 0-based lead list; omitted means sequential leads.
    #[serde(default)]
    pub leads: Option<Vec<i64>>,
    /// Companion variables copied into the assembled dataset.
    #[serde(default)]
    pub companions: Option<Vec<String>>,
    /// Distribute per-year opens over a worker pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_start_month() -> u8 {
    11
}
fn default_year_rule() -> String {
    "member-split".to_string()
}
fn default_conflict_policy() -> String {
    "error".to_string()
}

/// The `[drift]` section: inclusive reference period for drift removal.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriftToml {
    /// First reference year.
    pub y1: i32,
    /// Last reference year.
    pub y2: i32,
}

/// The `[output]` section.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    /// Where to write the assembled (or drift-corrected) dataset.
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [data]
        template = "/data/run.EEE.MM.*.nc"
        members = [0, 1, 2]
        field = "SST"
        first_year = 1954
        last_year = 2015
    "#;

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg: AeolusConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(cfg.data.start_month, 11);
        assert_eq!(cfg.data.year_rule, "member-split");
        assert_eq!(cfg.data.conflict_policy, "error");
        assert!(cfg.data.leads.is_none());
        assert!(cfg.data.companions.is_none());
        assert!(!cfg.data.parallel);
        assert!(cfg.drift.is_none());
        assert!(cfg.output.path.is_none());
    }

    #[test]
    fn full_config_parses() {
        let text = r#"
            [data]
            template = "/data/run.EEE.MM.*.nc"
            members = [0, 1]
            field = "SST"
            first_year = 1980
            last_year = 1990
            start_month = 1
            year_rule = "year-component"
            conflict_policy = "keep-last"
            leads = [0, 1, 2]
            companions = ["TAREA"]
            parallel = true

            [drift]
            y1 = 1981
            y2 = 1989

            [output]
            path = "out.nc"
        "#;
        let cfg: AeolusConfig = toml::from_str(text).unwrap();
        assert_eq!(cfg.data.members, vec![0, 1]);
        assert_eq!(cfg.data.leads.as_deref(), Some(&[0, 1, 2][..]));
        assert!(cfg.data.parallel);
        let drift = cfg.drift.unwrap();
        assert_eq!((drift.y1, drift.y2), (1981, 1989));
        assert_eq!(cfg.output.path.as_deref().unwrap().to_str(), Some("out.nc"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let text = r#"
            [data]
            template = "t"
            members = [0]
            field = "SST"
            first_year = 1980
            last_year = 1990
            chunk_size = 7
        "#;
        assert!(toml::from_str::<AeolusConfig>(text).is_err());
    }

    #[test]
    fn missing_data_section_is_rejected() {
        assert!(toml::from_str::<AeolusConfig>("[output]\n").is_err());
    }
}
