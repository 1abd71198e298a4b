//! Plain-data captures of value boxes for persistence.
//!
//! Snapshots carry values and identity only. Listeners and aggregate
//! membership are references and have to be rebuilt by whoever restores them.

/// Captured value of a single box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSnapshot {
    pub value: i32,
}

impl ValueSnapshot {
    pub const fn new(value: i32) -> Self {
        Self { value }
    }
}

/// Captured named stat: identity plus current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedSnapshot {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub descriptor: String,
    pub value: i32,
}

impl NamedSnapshot {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            value,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn named_snapshot_descriptor_defaults_to_empty() {
        let snapshot: NamedSnapshot =
            serde_json::from_str(r#"{ "name": "stealth", "value": 4 }"#).unwrap();

        assert_eq!(snapshot, NamedSnapshot::new("stealth", "", 4));
    }

    #[test]
    fn value_snapshot_json_shape() {
        let json = serde_json::to_string(&ValueSnapshot::new(-3)).unwrap();
        assert_eq!(json, r#"{"value":-3}"#);
    }
}
