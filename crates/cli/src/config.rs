//! CLI configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use stat_core::ControllerLimits;

/// Settings resolved from the environment before command-line overrides.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub sheet_path: Option<PathBuf>,
    pub limits: ControllerLimits,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `STAT_SHEET_PATH` - Sheet file used when `--sheet` is absent
    /// - `STAT_LOWER_LIMIT` - Lowest value an edit may produce (default: i32::MIN)
    /// - `STAT_UPPER_LIMIT` - Highest value an edit may produce (default: i32::MAX)
    /// - `STAT_STEP` - Increase/decrease step (default: 1, minimum: 1)
    pub fn from_env() -> Self {
        let mut config = Self {
            sheet_path: env::var("STAT_SHEET_PATH").ok().map(PathBuf::from),
            ..Self::default()
        };

        let lower = read_env::<i32>("STAT_LOWER_LIMIT").unwrap_or(ControllerLimits::DEFAULT_LOWER);
        let upper = read_env::<i32>("STAT_UPPER_LIMIT").unwrap_or(ControllerLimits::DEFAULT_UPPER);
        match ControllerLimits::interval(lower, upper) {
            Ok(limits) => config.limits = limits,
            Err(e) => tracing::warn!("Ignoring STAT_LOWER_LIMIT/STAT_UPPER_LIMIT: {}", e),
        }

        if let Some(step) = read_env::<i32>("STAT_STEP") {
            config.limits = config.limits.with_step(step);
        }

        config
    }

    /// Applies command-line overrides on top of the environment values.
    pub fn with_overrides(
        mut self,
        sheet: Option<PathBuf>,
        lower: Option<i32>,
        upper: Option<i32>,
        step: Option<i32>,
    ) -> anyhow::Result<Self> {
        if sheet.is_some() {
            self.sheet_path = sheet;
        }
        let lower = lower.unwrap_or(self.limits.lower());
        let upper = upper.unwrap_or(self.limits.upper());
        let step = step.unwrap_or(self.limits.step());
        self.limits = ControllerLimits::interval(lower, upper)?.with_step(step);
        Ok(self)
    }

    pub fn require_sheet_path(&self) -> anyhow::Result<&PathBuf> {
        self.sheet_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No sheet given: pass --sheet or set STAT_SHEET_PATH"))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
