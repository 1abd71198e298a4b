//! Edit expressions accepted on the command line.
//!
//! - `KEY=VALUE` sets a stat
//! - `KEY+` steps a stat up
//! - `KEY-` steps a stat down
//!
//! `KEY` is `name` or `name:descriptor`.

use std::fmt;
use std::str::FromStr;

use stat_core::{ControllerLimits, ValueController};
use stat_sheet::Sheet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    Set { key: String, value: i32 },
    Increase { key: String },
    Decrease { key: String },
}

impl Edit {
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Increase { key } | Self::Decrease { key } => key,
        }
    }

    /// Applies the edit to `sheet`.
    ///
    /// Steps go through a [`ValueController`] bounded by `limits`; a step that
    /// would leave the interval is skipped with a warning. Direct sets are
    /// written as given.
    pub fn apply(&self, sheet: &Sheet, limits: ControllerLimits) -> anyhow::Result<()> {
        let stat = sheet
            .stat(self.key())
            .ok_or_else(|| anyhow::anyhow!("Unknown stat '{}'", self.key()))?;
        let controller = ValueController::for_box(stat.value_box().clone()).with_limits(limits);

        let applied = match self {
            Self::Set { value, .. } => {
                stat.set_value(*value)?;
                true
            }
            Self::Increase { .. } => controller.increase()?,
            Self::Decrease { .. } => controller.decrease()?,
        };

        if !applied {
            tracing::warn!(
                stat = %stat.key(),
                value = stat.value(),
                lower = limits.lower(),
                upper = limits.upper(),
                "edit '{}' skipped: outside allowed interval",
                self
            );
        }
        Ok(())
    }
}

impl FromStr for Edit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((key, value)) = s.split_once('=') {
            let value = value
                .trim()
                .parse::<i32>()
                .map_err(|e| format!("invalid value in '{s}': {e}"))?;
            return Ok(Self::Set {
                key: non_empty_key(key, s)?,
                value,
            });
        }
        if let Some(key) = s.strip_suffix('+') {
            return Ok(Self::Increase {
                key: non_empty_key(key, s)?,
            });
        }
        if let Some(key) = s.strip_suffix('-') {
            return Ok(Self::Decrease {
                key: non_empty_key(key, s)?,
            });
        }
        Err(format!("expected KEY=VALUE, KEY+ or KEY-, got '{s}'"))
    }
}

fn non_empty_key(key: &str, source: &str) -> Result<String, String> {
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing stat name in '{source}'"));
    }
    Ok(key.to_owned())
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { key, value } => write!(f, "{key}={value}"),
            Self::Increase { key } => write!(f, "{key}+"),
            Self::Decrease { key } => write!(f, "{key}-"),
        }
    }
}
