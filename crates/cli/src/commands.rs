//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use stat_core::ValueChangeListener;
use stat_sheet::{Sheet, SheetLoader};

use crate::config::CliConfig;
use crate::edit::Edit;

/// Print every stat and total of a sheet
#[derive(Args)]
pub struct Show {}

impl Show {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let sheet = SheetLoader::load(config.require_sheet_path()?)?;
        print!("{}", render(&sheet));
        Ok(())
    }
}

/// Apply edits to a sheet and print the result
#[derive(Args)]
pub struct EditSheet {
    /// Edits applied in order: KEY=VALUE, KEY+ or KEY- (KEY is name or name:descriptor)
    #[arg(required = true)]
    pub edits: Vec<Edit>,

    /// Lowest value a step may produce
    #[arg(long, allow_negative_numbers = true)]
    pub lower: Option<i32>,

    /// Highest value a step may produce
    #[arg(long, allow_negative_numbers = true)]
    pub upper: Option<i32>,

    /// Amount added or removed per step
    #[arg(long)]
    pub step: Option<i32>,

    /// Write the edited sheet back to its file
    #[arg(long, conflicts_with = "output")]
    pub save: bool,

    /// Write the edited sheet to another file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl EditSheet {
    pub fn execute(self, config: CliConfig) -> Result<()> {
        let config = config.with_overrides(None, self.lower, self.upper, self.step)?;
        let path = config.require_sheet_path()?;
        let sheet = SheetLoader::load(path)?;
        watch(&sheet);

        for edit in &self.edits {
            edit.apply(&sheet, config.limits)?;
        }

        if self.save {
            SheetLoader::save(path, &sheet)?;
        } else if let Some(output) = &self.output {
            SheetLoader::save(output, &sheet)?;
        }

        print!("{}", render(&sheet));
        Ok(())
    }
}

/// Logs every change on the sheet at info level.
fn watch(sheet: &Sheet) {
    for stat in sheet.stats() {
        let key = stat.key().to_string();
        stat.add_change_listener(ValueChangeListener::new(move |event| {
            tracing::info!(
                stat = %key,
                old = event.old_value(),
                new = event.new_value(),
                "stat changed"
            );
        }));
    }
    for total in sheet.totals() {
        let name = total.name().to_owned();
        total
            .aggregate()
            .add_change_listener(ValueChangeListener::new(move |event| {
                tracing::info!(
                    total = %name,
                    old = event.old_value(),
                    new = event.new_value(),
                    "total changed"
                );
            }));
    }
}

/// Renders stats and totals as an aligned two-column listing.
pub fn render(sheet: &Sheet) -> String {
    let labels: Vec<String> = sheet
        .stats()
        .iter()
        .map(|stat| stat.key().to_string())
        .chain(sheet.totals().iter().map(|total| total.name().to_owned()))
        .collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);
    let (stat_labels, total_labels) = labels.split_at(sheet.stats().len());

    let mut out = String::from("Stats\n");
    for (label, stat) in stat_labels.iter().zip(sheet.stats()) {
        out.push_str(&format!("  {label:<width$}  {:>11}\n", stat.value()));
    }
    if !sheet.totals().is_empty() {
        out.push_str("Totals\n");
        for (label, total) in total_labels.iter().zip(sheet.totals()) {
            out.push_str(&format!("  {label:<width$}  {:>11}\n", total.value()));
        }
    }
    out
}
