//! Create a new empty form and print its id.

use crate::cli::GlobalFlags;
use crate::formatter;
use formwright_core::{FormCatalog, FormSummary};

pub fn execute(global: &GlobalFlags) -> anyhow::Result<()> {
    let catalog = FormCatalog::new(global.store()?);
    let id = catalog.create_form()?;
    let summary = FormSummary::for_form(id);
    formatter::print_output(global.json, &summary, |s| s.id.to_string())
}
