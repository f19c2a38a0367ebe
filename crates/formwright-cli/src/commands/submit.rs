//! Fill in a stored form: answers are checked against each field's rules.

use crate::cli::GlobalFlags;
use crate::formatter;
use clap::Args;
use formwright_core::{Answers, FormRenderer, SubmitError};
use formwright_schema::{FieldId, FormId};

/// Fill in a stored form
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Form to fill in
    #[arg(value_name = "FORM_ID")]
    pub form_id: FormId,

    /// Answer to one field (repeatable). Unanswered fields use their default.
    #[arg(
        short,
        long = "answer",
        value_name = "FIELD_ID=VALUE",
        value_parser = parse_answer
    )]
    pub answers: Vec<(FieldId, String)>,
}

fn parse_answer(raw: &str) -> Result<(FieldId, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD_ID=VALUE, got '{raw}'"))?;
    let id = id.trim().parse::<FieldId>().map_err(|e| e.to_string())?;
    Ok((id, value.to_string()))
}

pub fn execute(args: SubmitArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let store = global.store()?;
    let renderer = FormRenderer::load(&store, args.form_id);
    let answers: Answers = args.answers.into_iter().collect();

    match renderer.submit(&answers) {
        Ok(submission) => formatter::print_output(global.json, &submission, |_| {
            "Form submitted successfully".to_string()
        }),
        Err(SubmitError::Invalid(errors)) => {
            formatter::print_output(global.json, &errors, |errors| {
                formatter::issue_list(renderer.schema(), errors)
            })?;
            anyhow::bail!("{} field(s) failed validation", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}
