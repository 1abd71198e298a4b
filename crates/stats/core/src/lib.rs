//! Reactive stat values for tabletop character sheets.
//!
//! `stat-core` keeps derived stats (totals, modifiers built from several
//! contributions) consistent with the values they are built from:
//!
//! - [`ValueBox`]: a shared `i32` that notifies listeners synchronously on
//!   every write.
//! - [`AggregatedValue`]: a read-only box holding the saturating sum of its
//!   members, updated in O(1) per member change.
//! - [`NamedValue`]: a box tagged with a stat name and descriptor.
//! - [`ValueController`]: bounded, step-wise editing of a box.
//!
//! # Execution model
//!
//! Everything is single-threaded and synchronous. A `set_value` call returns
//! only after every listener, including every aggregate up the chain and
//! their listeners, has run. Handles are `Rc`-based and therefore `!Send`.
//!
//! # Example
//!
//! ```
//! use stat_core::{AggregatedValue, ValueBox};
//!
//! let base = ValueBox::new(1);
//! let bonus = ValueBox::new(1);
//! let total = AggregatedValue::with_members(&[base]);
//! total.add_member(&bonus).unwrap();
//!
//! bonus.set_value(5).unwrap();
//! assert_eq!(total.value(), 6);
//! assert!(total.set_value(0).is_err());
//! ```
pub mod aggregate;
pub mod controller;
pub mod error;
pub mod event;
pub mod named;
pub mod saturation;
pub mod snapshot;
pub mod value;

pub use aggregate::AggregatedValue;
pub use controller::{ControllerLimits, ValueController};
pub use error::{ErrorKind, StatError, StatResult};
pub use event::{ListenerRegistry, ValueChangeEvent, ValueChangeListener};
pub use named::{NamedValue, SkillKey};
pub use snapshot::{NamedSnapshot, ValueSnapshot};
pub use value::{BoxId, ValueBox};
