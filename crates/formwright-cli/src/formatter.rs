// Output formatting for CLI commands.
// Every command prints either pretty JSON (--json) or a plain text view.

use anyhow::{anyhow, Result};
use formwright_core::{FormSummary, RenderedForm, Rule, Widget};
use formwright_schema::{FieldDefinition, FieldId, FormSchema, ValidationReport};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;
use tabled::{settings::Style, Table, Tabled};

/// Format data as JSON string.
pub fn format_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).map_err(|e| anyhow!("JSON serialization failed: {}", e))
}

/// Print JSON when `json` is set, otherwise the text produced by `text`.
pub fn print_output<T, F>(json: bool, data: &T, text: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if json {
        println!("{}", format_json(data)?);
    } else {
        let out = text(data);
        if !out.is_empty() {
            println!("{}", out.trim_end());
        }
    }
    Ok(())
}

/// Format time consistently.
pub fn format_time<T: chrono::TimeZone>(t: &chrono::DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    t.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

/// Create a standard table with formwright styling.
pub fn create_table<T: Tabled>(data: impl IntoIterator<Item = T>) -> Table {
    let mut table = Table::new(data);
    table.with(Style::sharp());
    table
}

#[derive(Tabled)]
struct FormRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CREATED")]
    created: String,
}

impl From<&FormSummary> for FormRow {
    fn from(form: &FormSummary) -> Self {
        Self {
            id: form.id.to_string(),
            name: form.name.clone(),
            created: format_time(&form.created_at),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "LABEL")]
    label: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "REQUIRED")]
    required: &'static str,
    #[tabled(rename = "SETTINGS")]
    settings: String,
    #[tabled(rename = "ISSUE")]
    issue: String,
}

/// Text view of the form list
pub fn form_list(forms: &[FormSummary]) -> String {
    if forms.is_empty() {
        return "No forms yet. Create one with `formwright create`.".to_string();
    }
    create_table(forms.iter().map(FormRow::from)).to_string()
}

/// Text view of the builder: one row per field, the active one marked
pub fn schema_table(
    schema: &FormSchema,
    active: Option<FieldId>,
    report: &ValidationReport,
) -> String {
    if schema.is_empty() {
        return "Form has no fields. Add one with `add-field`.".to_string();
    }
    let rows = schema.iter().enumerate().map(|(index, field)| FieldRow {
        marker: if Some(field.id) == active { ">" } else { "" },
        position: index + 1,
        id: field.id.to_string(),
        label: field.display_label().to_string(),
        kind: field.kind.to_string(),
        required: if field.validations.required { "yes" } else { "no" },
        settings: field_settings(field),
        issue: report
            .get(&field.id)
            .map(ToString::to_string)
            .unwrap_or_default(),
    });
    create_table(rows).to_string()
}

fn field_settings(field: &FieldDefinition) -> String {
    let mut parts = Vec::new();
    if let Some(default) = field.default_answer() {
        parts.push(format!("default={default}"));
    }
    let v = &field.validations;
    if let Some(min) = v.min {
        parts.push(format!("min={min}"));
    }
    if let Some(max) = v.max {
        parts.push(format!("max={max}"));
    }
    if let Some(min) = v.min_length {
        parts.push(format!("minLength={min}"));
    }
    if let Some(max) = v.max_length {
        parts.push(format!("maxLength={max}"));
    }
    if !field.options.is_empty() {
        let values: Vec<&str> = field.options.iter().map(|o| o.value.as_str()).collect();
        parts.push(format!("options={}", values.join("|")));
    }
    parts.join(" ")
}

/// Text view of validation issues, labelled by field
pub fn issue_list(schema: &FormSchema, issues: &IndexMap<FieldId, String>) -> String {
    let mut out = String::new();
    for (id, message) in issues {
        let label = schema.get(id).map_or("NA", FieldDefinition::display_label);
        let _ = writeln!(out, "{label} ({id}): {message}");
    }
    out
}

/// Text view of a rendered form
pub fn rendered_form(form: &RenderedForm) -> String {
    if form.is_empty() {
        return "Oh no! This form is empty.".to_string();
    }
    let mut out = format!("Form {}\n", form.form_id);
    for field in &form.fields {
        let label = if field.label.trim().is_empty() {
            "NA"
        } else {
            field.label.as_str()
        };
        let _ = writeln!(
            out,
            "\n{label}{}\n  id: {}",
            if field.required { " *" } else { "" },
            field.id
        );
        let _ = writeln!(out, "  {}", widget_line(&field.widget));
        if !field.rules.is_empty() {
            let rules: Vec<String> = field.rules.iter().map(rule_text).collect();
            let _ = writeln!(out, "  rules: {}", rules.join(", "));
        }
    }
    out
}

fn widget_line(widget: &Widget) -> String {
    let (kind, placeholder) = match widget {
        Widget::Text { placeholder, .. } => ("text", placeholder),
        Widget::Number { placeholder, .. } => ("number", placeholder),
        Widget::Select { placeholder, .. } => ("select", placeholder),
    };
    let mut line = format!("[{kind}]");
    if !placeholder.is_empty() {
        let _ = write!(line, " placeholder=\"{placeholder}\"");
    }
    if let Some(value) = widget.value() {
        let _ = write!(line, " value=\"{value}\"");
    }
    match widget {
        Widget::Number { min, max, .. } => {
            if let Some(min) = min {
                let _ = write!(line, " min={min}");
            }
            if let Some(max) = max {
                let _ = write!(line, " max={max}");
            }
        }
        Widget::Select { options, .. } => {
            let choices: Vec<String> = options
                .iter()
                .map(|o| format!("{}={}", o.value, o.label))
                .collect();
            let _ = write!(line, " options: {}", choices.join(", "));
        }
        Widget::Text { .. } => {}
    }
    line
}

fn rule_text(rule: &Rule) -> String {
    match rule {
        Rule::Required => "required".to_string(),
        Rule::Numeric => "numeric".to_string(),
        Rule::Min(n) => format!(">= {n}"),
        Rule::Max(n) => format!("<= {n}"),
        Rule::MinLength(n) => format!("length >= {n}"),
        Rule::MaxLength(n) => format!("length <= {n}"),
        Rule::OneOf(values) => format!("one of {}", values.join("|")),
    }
}
