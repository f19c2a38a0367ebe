//! Builder view: one edit per invocation, saved when the command ends.
//!
//! The same actions drive the interactive `session` command.

use crate::cli::GlobalFlags;
use crate::formatter;
use clap::{Args, Subcommand, ValueEnum};
use formwright_core::{BuilderError, FieldPatch, FormBuilder, FormRenderer};
use formwright_schema::{FieldId, FieldKind, FormId};
use formwright_store::KeyValueStore;
use serde_json::json;

/// Edit one form in the builder
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Form to edit
    #[arg(value_name = "FORM_ID")]
    pub form_id: FormId,

    #[command(subcommand)]
    pub action: EditAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum EditAction {
    /// Append a field (text unless --kind says otherwise)
    AddField(FieldFlags),

    /// Remove a field
    RemoveField {
        #[arg(value_name = "FIELD_ID")]
        field_id: FieldId,
    },

    /// Change attributes of a field
    Set {
        #[arg(value_name = "FIELD_ID")]
        field_id: FieldId,

        #[command(flatten)]
        flags: FieldFlags,
    },

    /// Add a choice to a select field
    AddOption {
        #[arg(value_name = "FIELD_ID")]
        field_id: FieldId,

        /// Stored value of the choice
        #[arg(long)]
        value: String,

        /// Shown label, defaults to the value
        #[arg(long, default_value = "")]
        label: String,
    },

    /// Remove a choice from a select field
    RemoveOption {
        #[arg(value_name = "FIELD_ID")]
        field_id: FieldId,

        /// Value of the choice to remove
        #[arg(long)]
        value: String,
    },

    /// Check every field's configuration
    Validate,

    /// Show the fields being edited
    Show,

    /// Validate, save and render the form
    Preview,
}

/// Attribute that `--clear` can reset
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clearable {
    Default,
    Min,
    Max,
    MinLength,
    MaxLength,
}

/// Field attributes settable from the command line
#[derive(Args, Debug, Clone, Default)]
pub struct FieldFlags {
    /// Question shown to the user
    #[arg(long)]
    pub label: Option<String>,

    /// Field type: text, number or select
    #[arg(long, value_name = "KIND")]
    pub kind: Option<FieldKind>,

    /// Hint shown in the empty input
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Pre-filled answer
    #[arg(long = "default", value_name = "VALUE")]
    pub default_value: Option<String>,

    /// Whether an answer is mandatory
    #[arg(long, value_name = "BOOL")]
    pub required: Option<bool>,

    /// Smallest accepted number
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Largest accepted number
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Fewest accepted characters
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Most accepted characters
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Reset an attribute (repeatable)
    #[arg(long = "clear", value_enum, value_name = "ATTR")]
    pub clear: Vec<Clearable>,
}

impl FieldFlags {
    /// Translate flags into a patch; `--clear` wins over a value for the same attribute
    pub fn to_patch(&self) -> FieldPatch {
        let mut patch = FieldPatch::new();
        if let Some(label) = &self.label {
            patch = patch.label(label.clone());
        }
        if let Some(kind) = self.kind {
            patch = patch.kind(kind);
        }
        if let Some(placeholder) = &self.placeholder {
            patch = patch.placeholder(placeholder.clone());
        }
        if let Some(value) = &self.default_value {
            patch = patch.default_value(value.clone());
        }
        if let Some(required) = self.required {
            patch = patch.required(required);
        }
        if self.min.is_some() {
            patch = patch.min(self.min);
        }
        if self.max.is_some() {
            patch = patch.max(self.max);
        }
        if self.min_length.is_some() {
            patch = patch.min_length(self.min_length);
        }
        if self.max_length.is_some() {
            patch = patch.max_length(self.max_length);
        }
        for attr in &self.clear {
            patch = match attr {
                Clearable::Default => patch.clear_default(),
                Clearable::Min => patch.min(None),
                Clearable::Max => patch.max(None),
                Clearable::MinLength => patch.min_length(None),
                Clearable::MaxLength => patch.max_length(None),
            };
        }
        patch
    }
}

pub fn execute(args: EditArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let store = global.store()?;
    let mut builder = FormBuilder::load(store, args.form_id);
    apply(&mut builder, &args.action, global.json)?;
    // leaving the builder view saves, valid or not
    if builder.is_dirty() {
        builder.leave()?;
    }
    Ok(())
}

/// Run one action against a builder and print its outcome
pub fn apply<S: KeyValueStore>(
    builder: &mut FormBuilder<S>,
    action: &EditAction,
    json: bool,
) -> anyhow::Result<()> {
    match action {
        EditAction::AddField(flags) => {
            let id = builder.add_field();
            let patch = flags.to_patch();
            if !patch.is_empty() {
                builder.edit_field(&id, patch)?;
            }
            warn_if_invalid(builder, &id);
            formatter::print_output(json, &json!({ "fieldId": id }), |_| id.to_string())
        }
        EditAction::RemoveField { field_id } => {
            let removed = builder.remove_field(field_id)?;
            let active = builder.active_field();
            formatter::print_output(
                json,
                &json!({ "removed": removed.id, "active": active }),
                |_| format!("Removed field {}", removed.display_label()),
            )
        }
        EditAction::Set { field_id, flags } => {
            let patch = flags.to_patch();
            if patch.is_empty() {
                anyhow::bail!("nothing to change, pass at least one attribute flag");
            }
            builder.edit_field(field_id, patch)?;
            warn_if_invalid(builder, field_id);
            Ok(())
        }
        EditAction::AddOption {
            field_id,
            value,
            label,
        } => {
            builder.add_option(field_id, label, value)?;
            Ok(())
        }
        EditAction::RemoveOption { field_id, value } => {
            if !builder.remove_option(field_id, value)? {
                tracing::warn!(field_id = %field_id, value = %value, "no option with this value");
            }
            Ok(())
        }
        EditAction::Validate => {
            let report = builder.validate();
            formatter::print_output(json, &report.messages(), |issues| {
                if issues.is_empty() {
                    "All fields are valid".to_string()
                } else {
                    formatter::issue_list(builder.schema(), issues)
                }
            })
        }
        EditAction::Show => {
            let report = builder.validate();
            formatter::print_output(json, builder.schema(), |schema| {
                formatter::schema_table(schema, builder.active_field(), &report)
            })
        }
        EditAction::Preview => match builder.preview() {
            Ok(()) => {
                let renderer =
                    FormRenderer::from_schema(builder.form_id(), builder.last_saved().clone());
                formatter::print_output(json, &renderer.render(), formatter::rendered_form)
            }
            Err(BuilderError::PreviewBlocked(report)) => {
                formatter::print_output(json, &report.messages(), |issues| {
                    formatter::issue_list(builder.schema(), issues)
                })?;
                anyhow::bail!(
                    "preview blocked: {} field(s) need fixing first",
                    report.len()
                )
            }
            Err(e) => Err(e.into()),
        },
    }
}

fn warn_if_invalid<S: KeyValueStore>(builder: &FormBuilder<S>, id: &FieldId) {
    if let Some(issue) = builder.validate().get(id) {
        eprintln!("warning: {issue}");
    }
}
