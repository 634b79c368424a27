//! Assembly configuration.

use std::fmt;
use std::sync::Arc;

use ndarray::ArrayD;

use aeolus_locate::{ConflictPolicy, YearRule};

use crate::error::HindcastError;

/// Hook applied to each file's field block before stacking, in file order.
///
/// Used for per-file fixes that must happen before members are combined,
/// such as unit conversion or region masking.
pub type Preprocess = Arc<dyn Fn(ArrayD<f64>) -> ArrayD<f64> + Send + Sync>;

/// Lead-time assignment mode.
///
/// Lead indices start at 1: either derived from the number of months in the
/// files, or supplied as a 0-based list that is offset on assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LeadMode {
    /// Sequential leads `1..=n_months` from the file time axis.
    #[default]
    Auto,
    /// Caller-supplied 0-based lead list; `+1` is applied, and the length
    /// must match the file time axis.
    Explicit(Vec<i64>),
}

/// Configuration for assembling a monthly hindcast ensemble.
///
/// Use the builder methods (`with_*`) to customise variable names, lead
/// assignment, and discovery behaviour. The defaults suit CESM POP ocean
/// output: field plus `time`, `time_bound`, and the `TAREA`/`UAREA`/`dz`/
/// `HT` companion variables.
#[derive(Clone)]
pub struct AssembleConfig {
    /// Filename template with `EEE` and `MM` placeholder tokens.
    pub(crate) template: String,
    /// 0-based ensemble-member indices; member numbers are `index + 1`.
    pub(crate) members: Vec<u32>,
    /// NetCDF variable name of the hindcast field.
    pub(crate) field_var: String,
    /// First initialization year, inclusive.
    pub(crate) first_year: i32,
    /// Last initialization year, inclusive.
    pub(crate) last_year: i32,
    /// Initialization month (1..=12).
    pub(crate) start_month: u8,
    /// NetCDF variable name of the time axis.
    pub(crate) time_var: String,
    /// NetCDF variable name of the per-step time bounds.
    pub(crate) time_bounds_var: String,
    /// Companion variables copied from the first file of the first year.
    pub(crate) companion_vars: Vec<String>,
    /// Lead-time assignment mode.
    pub(crate) lead_mode: LeadMode,
    /// Initialization-year extraction rule.
    pub(crate) year_rule: YearRule,
    /// Policy for year collisions within one member's index.
    pub(crate) conflict_policy: ConflictPolicy,
    /// Optional per-file hook applied before stacking.
    pub(crate) preprocess: Option<Preprocess>,
}

impl AssembleConfig {
    /// Creates a configuration from the required discovery parameters.
    pub fn new(
        template: impl Into<String>,
        members: Vec<u32>,
        field_var: impl Into<String>,
        first_year: i32,
        last_year: i32,
        start_month: u8,
    ) -> Self {
        Self {
            template: template.into(),
            members,
            field_var: field_var.into(),
            first_year,
            last_year,
            start_month,
            time_var: "time".into(),
            time_bounds_var: "time_bound".into(),
            companion_vars: vec!["TAREA".into(), "UAREA".into(), "dz".into(), "HT".into()],
            lead_mode: LeadMode::Auto,
            year_rule: YearRule::MemberSplit,
            conflict_policy: ConflictPolicy::Error,
            preprocess: None,
        }
    }

    /// Set the time variable name.
    pub fn with_time_var(mut self, name: impl Into<String>) -> Self {
        self.time_var = name.into();
        self
    }

    /// Set the time-bounds variable name.
    pub fn with_time_bounds_var(mut self, name: impl Into<String>) -> Self {
        self.time_bounds_var = name.into();
        self
    }

    /// Set the companion variables copied into the assembled dataset.
    pub fn with_companion_vars(mut self, names: Vec<String>) -> Self {
        self.companion_vars = names;
        self
    }

    /// Set the lead-time assignment mode.
    pub fn with_lead_mode(mut self, mode: LeadMode) -> Self {
        self.lead_mode = mode;
        self
    }

    /// Set the initialization-year extraction rule.
    pub fn with_year_rule(mut self, rule: YearRule) -> Self {
        self.year_rule = rule;
        self
    }

    /// Set the year-collision policy.
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Set the per-file preprocess hook.
    pub fn with_preprocess(mut self, hook: Preprocess) -> Self {
        self.preprocess = Some(hook);
        self
    }

    /// The NetCDF variable name of the hindcast field.
    pub fn field_var(&self) -> &str {
        &self.field_var
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`HindcastError::InvalidTime`] if `start_month` is outside
    /// 1..=12, [`HindcastError::DimensionMismatch`] if no members are
    /// requested, and [`HindcastError::Locate`] for an inverted year range.
    pub fn validate(&self) -> Result<(), HindcastError> {
        if !(1..=12).contains(&self.start_month) {
            return Err(HindcastError::InvalidTime {
                reason: format!("start_month must be 1..=12, got {}", self.start_month),
            });
        }
        if self.members.is_empty() {
            return Err(HindcastError::DimensionMismatch {
                name: "ensemble members".into(),
                expected: 1,
                got: 0,
            });
        }
        if self.first_year > self.last_year {
            return Err(aeolus_locate::LocateError::EmptyYearRange {
                first: self.first_year,
                last: self.last_year,
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Debug for AssembleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssembleConfig")
            .field("template", &self.template)
            .field("members", &self.members)
            .field("field_var", &self.field_var)
            .field("first_year", &self.first_year)
            .field("last_year", &self.last_year)
            .field("start_month", &self.start_month)
            .field("time_var", &self.time_var)
            .field("time_bounds_var", &self.time_bounds_var)
            .field("companion_vars", &self.companion_vars)
            .field("lead_mode", &self.lead_mode)
            .field("year_rule", &self.year_rule)
            .field("conflict_policy", &self.conflict_policy)
            .field("preprocess", &self.preprocess.as_ref().map(|_| "<hook>"))
            .finish()
    }
}
