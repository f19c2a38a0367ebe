//! Form renderer
//!
//! Projects a stored schema into input widgets and checks submitted answers.
//!
//! All answer validation goes through the per-field [`Rule`] set. Number
//! widgets also expose `min`/`max` and select widgets their options, but only
//! as display attributes; nothing is enforced there.

use crate::error::SubmitError;
use chrono::{DateTime, Utc};
use formwright_schema::{
    parse_number, FieldDefinition, FieldId, FieldKind, FormId, FormSchema, SelectOption,
};
use formwright_store::{KeyValueStore, SchemaStore};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

/// Answers keyed by field, in their textual form
pub type Answers = HashMap<FieldId, String>;

/// One check applied to an answer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", content = "arg", rename_all = "camelCase")]
pub enum Rule {
    /// Answer must be present
    Required,
    /// Answer must parse as a number
    Numeric,
    /// Number must be at least this
    Min(f64),
    /// Number must be at most this
    Max(f64),
    /// Text must have at least this many characters
    MinLength(usize),
    /// Text must have at most this many characters
    MaxLength(usize),
    /// Answer must be one of these values
    OneOf(Vec<String>),
}

impl Rule {
    /// User-facing message shown when the rule fails
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Required => "This field is required".to_string(),
            Self::Numeric => "Please enter a number".to_string(),
            Self::Min(n) => format!("Minimum value is {n}"),
            Self::Max(n) => format!("Maximum value is {n}"),
            Self::MinLength(n) => format!("Minimum length is {n}"),
            Self::MaxLength(n) => format!("Maximum length is {n}"),
            Self::OneOf(_) => "Please select one of the options".to_string(),
        }
    }

    /// Check an answer
    ///
    /// Blank answers only fail [`Rule::Required`]; non-numeric answers only
    /// fail [`Rule::Numeric`].
    #[must_use]
    pub fn check(&self, answer: Option<&str>) -> bool {
        let Some(answer) = answer.filter(|a| !a.trim().is_empty()) else {
            return !matches!(self, Self::Required);
        };
        match self {
            Self::Required => true,
            Self::Numeric => parse_number(answer).is_some(),
            Self::Min(min) => parse_number(answer).map_or(true, |n| n >= *min),
            Self::Max(max) => parse_number(answer).map_or(true, |n| n <= *max),
            Self::MinLength(min) => answer.chars().count() >= *min,
            Self::MaxLength(max) => answer.chars().count() <= *max,
            Self::OneOf(values) => values.iter().any(|v| v == answer),
        }
    }
}

/// Rules for a field, derived from its kind and constraints
///
/// Constraints that do not apply to the field's kind are skipped.
#[must_use]
pub fn derive_rules(field: &FieldDefinition) -> Vec<Rule> {
    let v = &field.validations;
    let mut rules = Vec::new();

    if v.required {
        rules.push(Rule::Required);
    }
    match field.kind {
        FieldKind::Number => {
            rules.push(Rule::Numeric);
            rules.extend(v.min.map(Rule::Min));
            rules.extend(v.max.map(Rule::Max));
        }
        FieldKind::Text => {
            rules.extend(v.min_length.map(Rule::MinLength));
            rules.extend(v.max_length.map(Rule::MaxLength));
        }
        FieldKind::Select => {
            rules.push(Rule::OneOf(
                field.options.iter().map(|o| o.value.clone()).collect(),
            ));
        }
    }
    rules
}

/// Input widget for a field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "camelCase")]
pub enum Widget {
    /// Free-text input
    Text {
        placeholder: String,
        value: Option<String>,
    },
    /// Numeric input
    Number {
        placeholder: String,
        value: Option<String>,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Single-choice input
    Select {
        placeholder: String,
        value: Option<String>,
        options: Vec<SelectOption>,
    },
}

impl Widget {
    /// Widget for a field, seeded with placeholder and default
    #[must_use]
    pub fn for_field(field: &FieldDefinition) -> Self {
        let placeholder = field.placeholder.clone();
        let value = field.default_answer().map(str::to_string);
        match field.kind {
            FieldKind::Text => Self::Text { placeholder, value },
            FieldKind::Number => Self::Number {
                placeholder,
                value,
                min: field.validations.min,
                max: field.validations.max,
            },
            FieldKind::Select => Self::Select {
                placeholder,
                value,
                options: field.options.clone(),
            },
        }
    }

    /// Seeded value
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Text { value, .. } | Self::Number { value, .. } | Self::Select { value, .. } => {
                value.as_deref()
            }
        }
    }
}

/// One rendered question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub id: FieldId,
    pub label: String,
    pub required: bool,
    pub widget: Widget,
    pub rules: Vec<Rule>,
}

/// A form ready to be filled in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedForm {
    pub form_id: FormId,
    pub fields: Vec<RenderedField>,
}

impl RenderedForm {
    /// Check if the form has no questions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Receipt of an accepted submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub form_id: FormId,
    pub submitted_at: DateTime<Utc>,
    pub answered: usize,
}

/// Read-only view of a stored form
#[derive(Debug, Clone)]
pub struct FormRenderer {
    form_id: FormId,
    schema: FormSchema,
}

impl FormRenderer {
    /// Load a form from the store
    ///
    /// Missing, empty or unreadable schemas all yield an empty form.
    pub fn load<S: KeyValueStore>(store: &SchemaStore<S>, form_id: FormId) -> Self {
        let schema = store.load_schema(&form_id).unwrap_or_else(|e| {
            tracing::warn!(form_id = %form_id, error = %e, "store unavailable, rendering empty form");
            FormSchema::new()
        });
        Self::from_schema(form_id, schema)
    }

    /// Renderer over an in-memory schema
    #[inline]
    #[must_use]
    pub fn from_schema(form_id: FormId, schema: FormSchema) -> Self {
        Self { form_id, schema }
    }

    /// Form being rendered
    #[inline]
    #[must_use]
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    /// Schema being rendered
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Check if the form has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
    }

    /// Project every field into a widget with its rules
    #[must_use]
    pub fn render(&self) -> RenderedForm {
        let fields = self
            .schema
            .iter()
            .map(|field| RenderedField {
                id: field.id,
                label: field.label.clone(),
                required: field.validations.required,
                widget: Widget::for_field(field),
                rules: derive_rules(field),
            })
            .collect();
        RenderedForm {
            form_id: self.form_id,
            fields,
        }
    }

    /// Check answers against every field's rules
    ///
    /// A field without an answer is checked with its default value, as the
    /// widget was seeded with it. Nothing is stored or sent anywhere.
    ///
    /// # Errors
    /// Returns error for an empty form, an answer to an unknown field, or
    /// the first failing rule message of every invalid field
    pub fn submit(&self, answers: &Answers) -> Result<Submission, SubmitError> {
        if self.schema.is_empty() {
            return Err(SubmitError::EmptyForm);
        }
        if let Some(unknown) = answers.keys().find(|id| !self.schema.contains(id)) {
            return Err(SubmitError::UnknownField(*unknown));
        }

        let mut errors = IndexMap::new();
        let mut answered = 0;
        for field in &self.schema {
            let answer = answers
                .get(&field.id)
                .map(String::as_str)
                .or_else(|| field.default_answer());
            if answer.is_some_and(|a| !a.trim().is_empty()) {
                answered += 1;
            }
            if let Some(failed) = derive_rules(field).iter().find(|r| !r.check(answer)) {
                errors.insert(field.id, failed.message());
            }
        }

        if !errors.is_empty() {
            tracing::debug!(form_id = %self.form_id, invalid = errors.len(), "submission rejected");
            return Err(SubmitError::Invalid(errors));
        }

        tracing::info!(form_id = %self.form_id, answered, "form submitted");
        Ok(Submission {
            form_id: self.form_id,
            submitted_at: Utc::now(),
            answered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_schema::Validations;
    use formwright_store::MemoryStore;
    use formwright_test_utils::{number_field, select_field, text_field};
    use pretty_assertions::assert_eq;

    #[test]
    fn rules_follow_kind() {
        let mut field = number_field("Age", 1.0, 10.0);
        field.validations.required = true;
        field.validations.min_length = Some(3);

        assert_eq!(
            derive_rules(&field),
            vec![Rule::Required, Rule::Numeric, Rule::Min(1.0), Rule::Max(10.0)]
        );
        assert_eq!(
            derive_rules(&text_field("Name", 2, 5)),
            vec![Rule::MinLength(2), Rule::MaxLength(5)]
        );
        assert_eq!(
            derive_rules(&select_field("Color", &["red", "blue"])),
            vec![Rule::OneOf(vec!["red".into(), "blue".into()])]
        );
    }

    #[test]
    fn rule_messages() {
        assert_eq!(Rule::Required.message(), "This field is required");
        assert_eq!(Rule::Min(1.0).message(), "Minimum value is 1");
        assert_eq!(Rule::Max(2.5).message(), "Maximum value is 2.5");
        assert_eq!(Rule::MaxLength(5).message(), "Maximum length is 5");
    }

    #[test]
    fn blank_answers_only_fail_required() {
        for rule in [Rule::Numeric, Rule::Min(3.0), Rule::MinLength(4), Rule::OneOf(vec![])] {
            assert!(rule.check(None));
            assert!(rule.check(Some("  ")));
        }
        assert!(!Rule::Required.check(None));
        assert!(!Rule::Required.check(Some("")));
    }

    #[test]
    fn widgets_are_seeded_from_field() {
        let field = number_field("Age", 1.0, 10.0)
            .with_placeholder("years")
            .with_default("5");
        assert_eq!(
            Widget::for_field(&field),
            Widget::Number {
                placeholder: "years".into(),
                value: Some("5".into()),
                min: Some(1.0),
                max: Some(10.0),
            }
        );

        let select = select_field("Color", &["red"]);
        assert!(matches!(Widget::for_field(&select), Widget::Select { options, .. } if options.len() == 1));
    }

    #[test]
    fn missing_form_renders_empty() {
        let store = SchemaStore::new(MemoryStore::new());
        let renderer = FormRenderer::load(&store, FormId::new());
        assert!(renderer.is_empty());
        assert!(renderer.render().is_empty());
        assert_eq!(renderer.submit(&Answers::new()), Err(SubmitError::EmptyForm));
    }

    #[test]
    fn submit_reports_first_failing_rule_per_field() {
        let mut name = text_field("Name", 2, 5);
        name.validations.required = true;
        let age = number_field("Age", 1.0, 10.0);
        let (name_id, age_id) = (name.id, age.id);
        let renderer = FormRenderer::from_schema(FormId::new(), vec![name, age].into());

        let mut answers = Answers::new();
        answers.insert(age_id, "42".into());

        let Err(SubmitError::Invalid(errors)) = renderer.submit(&answers) else {
            panic!("expected invalid submission");
        };
        assert_eq!(errors[&name_id], "This field is required");
        assert_eq!(errors[&age_id], "Maximum value is 10");
    }

    #[test]
    fn submit_accepts_valid_answers_and_defaults() {
        let age = number_field("Age", 1.0, 10.0).with_default("5");
        let color = select_field("Color", &["red", "blue"]);
        let color_id = color.id;
        let plain = FieldDefinition::new(FieldKind::Text)
            .with_label("Notes")
            .with_validations(Validations::default());
        let renderer = FormRenderer::from_schema(FormId::new(), vec![age, color, plain].into());

        let mut answers = Answers::new();
        answers.insert(color_id, "blue".into());

        let submission = renderer.submit(&answers).unwrap();
        assert_eq!(submission.answered, 2);
        assert_eq!(submission.form_id, renderer.form_id());
    }

    #[test]
    fn whitespace_default_does_not_seed_widget() {
        let mut field = text_field("Name", 0, 5).with_default("   ");
        field.validations.required = true;
        assert!(formwright_schema::validate_field(&field).is_some());

        let renderer = FormRenderer::from_schema(FormId::new(), vec![field].into());
        let rendered = renderer.render();
        assert_eq!(rendered.fields[0].widget.value(), None);
        assert!(matches!(
            renderer.submit(&Answers::new()),
            Err(SubmitError::Invalid(_))
        ));
    }

    #[test]
    fn submit_rejects_unknown_fields() {
        let renderer =
            FormRenderer::from_schema(FormId::new(), vec![text_field("Name", 0, 5)].into());
        let stranger = FieldId::new();
        let mut answers = Answers::new();
        answers.insert(stranger, "x".into());
        assert_eq!(renderer.submit(&answers), Err(SubmitError::UnknownField(stranger)));
    }

    #[test]
    fn rendered_form_serializes_tagged() {
        let field = number_field("Age", 1.0, 10.0);
        let form = FormRenderer::from_schema(FormId::new(), vec![field].into()).render();
        let json = serde_json::to_value(&form.fields[0]).unwrap();

        assert_eq!(json["widget"]["widget"], "number");
        assert_eq!(json["widget"]["max"], 10.0);
        assert_eq!(json["rules"][0], serde_json::json!({ "rule": "numeric" }));
        assert_eq!(json["rules"][1], serde_json::json!({ "rule": "min", "arg": 1.0 }));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn number_answers_accepted_within_bounds(min in -50i32..50, span in 0i32..50, n in -120i32..120) {
                let max = min + span;
                let field = number_field("n", f64::from(min), f64::from(max));
                let id = field.id;
                let renderer = FormRenderer::from_schema(FormId::new(), vec![field].into());

                let mut answers = Answers::new();
                answers.insert(id, n.to_string());
                let accepted = renderer.submit(&answers).is_ok();
                prop_assert_eq!(accepted, (min..=max).contains(&n));
            }

            #[test]
            fn text_answers_accepted_within_length(min in 0usize..8, span in 0usize..8, len in 1usize..24) {
                let field = text_field("t", min, min + span);
                let id = field.id;
                let renderer = FormRenderer::from_schema(FormId::new(), vec![field].into());

                let mut answers = Answers::new();
                answers.insert(id, "x".repeat(len));
                let accepted = renderer.submit(&answers).is_ok();
                prop_assert_eq!(accepted, (min..=min + span).contains(&len));
            }
        }
    }
}
