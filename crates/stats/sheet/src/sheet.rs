//! Materialised character sheet: live named stats and the totals built on them.

use std::collections::HashMap;

use anyhow::{Context, anyhow, bail};
use stat_core::{AggregatedValue, NamedSnapshot, NamedValue, SkillKey, ValueBox};

use crate::format::{
    DESCRIPTOR_SEPARATOR, SheetSpec, TotalSpec, format_reference, parse_reference,
};

/// A named aggregate on a sheet.
#[derive(Clone, Debug)]
pub struct SheetTotal {
    name: String,
    aggregate: AggregatedValue,
}

impl SheetTotal {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aggregate(&self) -> &AggregatedValue {
        &self.aggregate
    }

    pub fn value(&self) -> i32 {
        self.aggregate.value()
    }
}

/// Stats and totals wired together.
///
/// Stats keep declaration order; totals are created in declaration order, so
/// a total can only aggregate totals declared before it and cycles cannot be
/// expressed.
#[derive(Debug, Default)]
pub struct Sheet {
    stats: Vec<NamedValue>,
    stat_index: HashMap<SkillKey, usize>,
    totals: Vec<SheetTotal>,
    total_index: HashMap<String, usize>,
}

impl Sheet {
    /// Builds live values from a parsed sheet.
    ///
    /// # Errors
    ///
    /// Duplicate stat keys, duplicate total names, a total named like a stat,
    /// names that no reference could reach and unresolvable member references.
    pub fn build(spec: &SheetSpec) -> anyhow::Result<Self> {
        let mut sheet = Self::default();

        for stat in &spec.stats {
            sheet.insert_stat(NamedValue::from_snapshot(stat))?;
        }
        for total in &spec.totals {
            sheet
                .insert_total(total)
                .with_context(|| format!("invalid total '{}'", total.name))?;
        }

        tracing::debug!(
            stats = sheet.stats.len(),
            totals = sheet.totals.len(),
            "sheet built"
        );
        Ok(sheet)
    }

    fn insert_stat(&mut self, stat: NamedValue) -> anyhow::Result<()> {
        let key = stat.key();
        if key.name().is_empty() || key.name().contains(DESCRIPTOR_SEPARATOR) {
            bail!(
                "invalid stat name '{}': must be non-empty and must not contain '{}'",
                key.name(),
                DESCRIPTOR_SEPARATOR
            );
        }
        if !is_trimmed(key.name()) || !is_trimmed(key.descriptor()) {
            bail!("invalid stat '{}': surrounding whitespace", format_reference(key));
        }
        if self.stat_index.contains_key(stat.key()) {
            bail!("duplicate stat '{}'", format_reference(stat.key()));
        }
        self.stat_index.insert(stat.key().clone(), self.stats.len());
        self.stats.push(stat);
        Ok(())
    }

    fn insert_total(&mut self, spec: &TotalSpec) -> anyhow::Result<()> {
        if spec.name.is_empty() || !is_trimmed(&spec.name) {
            bail!("empty name or surrounding whitespace");
        }
        if self.total_index.contains_key(&spec.name) {
            bail!("duplicate total");
        }
        if self.stat_index.contains_key(&parse_reference(&spec.name)) {
            bail!("name already used by a stat");
        }

        let members = spec
            .members
            .iter()
            .map(|reference| {
                self.resolve(reference)
                    .ok_or_else(|| anyhow!("unknown member '{}'", reference))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let aggregate = AggregatedValue::with_members(&members);
        self.total_index.insert(spec.name.clone(), self.totals.len());
        self.totals.push(SheetTotal {
            name: spec.name.clone(),
            aggregate,
        });
        Ok(())
    }

    /// Resolves a member reference to its box. Totals win over stats.
    pub fn resolve(&self, reference: &str) -> Option<ValueBox> {
        if let Some(total) = self.total(reference.trim()) {
            return Some(total.aggregate.as_value_box().clone());
        }
        self.stat(reference).map(|stat| stat.value_box().clone())
    }

    /// Looks up a stat by `name` or `name:descriptor`.
    pub fn stat(&self, reference: &str) -> Option<&NamedValue> {
        let key = parse_reference(reference);
        self.stat_index.get(&key).map(|&index| &self.stats[index])
    }

    pub fn total(&self, name: &str) -> Option<&SheetTotal> {
        self.total_index.get(name).map(|&index| &self.totals[index])
    }

    pub fn stats(&self) -> &[NamedValue] {
        &self.stats
    }

    pub fn totals(&self) -> &[SheetTotal] {
        &self.totals
    }

    /// Captures every stat value. Totals are derived and not captured.
    pub fn snapshot(&self) -> Vec<NamedSnapshot> {
        self.stats.iter().map(NamedValue::snapshot).collect()
    }

    /// Converts the live sheet back into its file form.
    pub fn to_spec(&self) -> SheetSpec {
        let totals = self
            .totals
            .iter()
            .map(|total| TotalSpec {
                name: total.name.clone(),
                members: total
                    .aggregate
                    .members()
                    .iter()
                    .filter_map(|member| self.reference_of(member))
                    .collect(),
            })
            .collect();

        SheetSpec {
            stats: self.snapshot(),
            totals,
        }
    }

    fn reference_of(&self, member: &ValueBox) -> Option<String> {
        if let Some(total) = self
            .totals
            .iter()
            .find(|t| t.aggregate.as_value_box().ptr_eq(member))
        {
            return Some(total.name.clone());
        }
        self.stats
            .iter()
            .find(|s| s.value_box().ptr_eq(member))
            .map(|s| format_reference(s.key()))
    }
}

fn is_trimmed(text: &str) -> bool {
    text.trim() == text
}
