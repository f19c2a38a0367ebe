//! Render view: load a stored form and show its widgets and rules.

use crate::cli::GlobalFlags;
use crate::formatter;
use clap::Args;
use formwright_core::FormRenderer;
use formwright_schema::FormId;

/// Render a stored form
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Form to render
    #[arg(value_name = "FORM_ID")]
    pub form_id: FormId,
}

pub fn execute(args: PreviewArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let store = global.store()?;
    let form = FormRenderer::load(&store, args.form_id).render();
    formatter::print_output(global.json, &form, formatter::rendered_form)
}
