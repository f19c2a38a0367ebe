//! List view: every form registered in the index, oldest first.

use crate::cli::GlobalFlags;
use crate::formatter;
use formwright_core::FormCatalog;

pub fn execute(global: &GlobalFlags) -> anyhow::Result<()> {
    let catalog = FormCatalog::new(global.store()?);
    let forms = catalog.list_forms()?;
    formatter::print_output(global.json, &forms, |forms| formatter::form_list(forms))
}
