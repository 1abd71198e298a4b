//! Step-wise, bounded editing of a value box.
//!
//! A [`ValueController`] sits between an input surface (buttons, key presses,
//! command-line edits) and a box: it moves the value one step at a time and
//! refuses steps that would leave the configured interval.

use crate::error::{StatError, StatResult};
use crate::saturation;
use crate::value::ValueBox;

/// Interval and step applied by a [`ValueController`].
///
/// Only built through [`ControllerLimits::interval`] and
/// [`ControllerLimits::with_step`], so `lower <= upper` and `step >= 1` always
/// hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerLimits {
    lower: i32,
    upper: i32,
    step: i32,
}

impl ControllerLimits {
    pub const DEFAULT_LOWER: i32 = i32::MIN;
    pub const DEFAULT_UPPER: i32 = i32::MAX;
    pub const DEFAULT_STEP: i32 = 1;

    pub const fn new() -> Self {
        Self {
            lower: Self::DEFAULT_LOWER,
            upper: Self::DEFAULT_UPPER,
            step: Self::DEFAULT_STEP,
        }
    }

    /// Builds limits for `[lower, upper]`, keeping the default step.
    ///
    /// # Errors
    ///
    /// [`StatError::InvalidInterval`] if `lower > upper`.
    pub fn interval(lower: i32, upper: i32) -> StatResult<Self> {
        if lower > upper {
            return Err(StatError::InvalidInterval { lower, upper });
        }
        Ok(Self {
            lower,
            upper,
            ..Self::new()
        })
    }

    /// Replaces the step; values below 1 become 1.
    #[must_use]
    pub const fn with_step(mut self, step: i32) -> Self {
        self.step = if step < 1 { 1 } else { step };
        self
    }

    /// Smallest value a step may produce (inclusive).
    pub const fn lower(&self) -> i32 {
        self.lower
    }

    /// Largest value a step may produce (inclusive).
    pub const fn upper(&self) -> i32 {
        self.upper
    }

    /// Amount added or removed per step. Always at least 1.
    pub const fn step(&self) -> i32 {
        self.step
    }

    pub const fn contains(&self, value: i32) -> bool {
        self.lower <= value && value <= self.upper
    }
}

impl Default for ControllerLimits {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves a value box up or down by a fixed step inside an interval.
///
/// Without a target every query answers `false` and every edit is a no-op.
#[derive(Clone, Debug, Default)]
pub struct ValueController {
    target: Option<ValueBox>,
    limits: ControllerLimits,
}

impl ValueController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_box(target: ValueBox) -> Self {
        Self {
            target: Some(target),
            limits: ControllerLimits::new(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: ControllerLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn set_value_box(&mut self, target: ValueBox) {
        self.target = Some(target);
    }

    pub fn value_box(&self) -> Option<&ValueBox> {
        self.target.as_ref()
    }

    /// Sets the allowed interval.
    ///
    /// # Errors
    ///
    /// [`StatError::InvalidInterval`] if `lower > upper`; the previous
    /// interval is kept.
    pub fn set_interval(&mut self, lower: i32, upper: i32) -> StatResult<()> {
        let step = self.limits.step;
        self.limits = ControllerLimits::interval(lower, upper)?.with_step(step);
        Ok(())
    }

    pub fn lower_limit(&self) -> i32 {
        self.limits.lower
    }

    pub fn upper_limit(&self) -> i32 {
        self.limits.upper
    }

    pub fn step(&self) -> i32 {
        self.limits.step
    }

    pub fn limits(&self) -> ControllerLimits {
        self.limits
    }

    fn stepped_up(&self) -> Option<i32> {
        let target = self.target.as_ref()?;
        Some(saturation::add(target.value(), self.limits.step))
    }

    fn stepped_down(&self) -> Option<i32> {
        let target = self.target.as_ref()?;
        Some(saturation::sub(target.value(), self.limits.step))
    }

    /// Whether one step up stays within the interval.
    ///
    /// A step that saturates at `i32::MAX` counts as landing on `i32::MAX`.
    pub fn can_increase(&self) -> bool {
        self.stepped_up()
            .is_some_and(|next| next <= self.limits.upper)
    }

    /// Whether one step down stays within the interval.
    pub fn can_decrease(&self) -> bool {
        self.stepped_down()
            .is_some_and(|next| next >= self.limits.lower)
    }

    /// Steps the target up if allowed. Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// [`StatError::DerivedValue`] if the target is derived.
    pub fn increase(&self) -> StatResult<bool> {
        match (self.target.as_ref(), self.stepped_up()) {
            (Some(target), Some(next)) if next <= self.limits.upper => {
                target.set_value(next)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Steps the target down if allowed. Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// [`StatError::DerivedValue`] if the target is derived.
    pub fn decrease(&self) -> StatResult<bool> {
        match (self.target.as_ref(), self.stepped_down()) {
            (Some(target), Some(next)) if next >= self.limits.lower => {
                target.set_value(next)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
