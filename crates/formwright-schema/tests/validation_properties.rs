//! Property tests for default-value cross-checking.

use formwright_schema::{validate_field, FieldDefinition, FieldIssue, FieldKind};
use proptest::prelude::*;

fn number_field(min: i32, max: i32, default: i32) -> FieldDefinition {
    let mut field = FieldDefinition::new(FieldKind::Number)
        .with_label("amount")
        .with_default(default.to_string());
    field.validations.min = Some(f64::from(min));
    field.validations.max = Some(f64::from(max));
    field
}

fn text_field(min_length: usize, max_length: usize, default: &str) -> FieldDefinition {
    let mut field = FieldDefinition::new(FieldKind::Text)
        .with_label("name")
        .with_default(default);
    field.validations.min_length = Some(min_length);
    field.validations.max_length = Some(max_length);
    field
}

proptest! {
    #[test]
    fn number_default_in_range_is_accepted(
        (min, max, default) in (-1000i32..1000, 0i32..1000)
            .prop_flat_map(|(min, span)| (Just(min), Just(min + span), min..=min + span))
    ) {
        prop_assert_eq!(validate_field(&number_field(min, max, default)), None);
    }

    #[test]
    fn number_default_out_of_range_is_rejected(
        (min, max) in (-1000i32..1000, 0i32..1000).prop_map(|(min, span)| (min, min + span)),
        below in any::<bool>(),
        offset in 1i32..500,
    ) {
        let default = if below { min - offset } else { max + offset };
        let issue = validate_field(&number_field(min, max, default));
        let out_of_range = matches!(
            issue,
            Some(FieldIssue::DefaultBelowMin { .. } | FieldIssue::DefaultAboveMax { .. })
        );
        prop_assert!(out_of_range);
    }

    #[test]
    fn text_default_length_is_checked(
        min_length in 0usize..20,
        span in 0usize..20,
        len in 0usize..60,
    ) {
        let max_length = min_length + span;
        let default = "x".repeat(len);
        let issue = validate_field(&text_field(min_length, max_length, &default));

        if len == 0 {
            // empty default counts as absent
            prop_assert_eq!(issue, None);
        } else if len < min_length {
            prop_assert_eq!(issue, Some(FieldIssue::DefaultTooShort { min_length }));
        } else if len > max_length {
            prop_assert_eq!(issue, Some(FieldIssue::DefaultTooLong { max_length }));
        } else {
            prop_assert_eq!(issue, None);
        }
    }

    #[test]
    fn select_default_membership(
        values in prop::collection::hash_set("[a-z]{1,6}", 1..6),
        candidate in "[a-z]{1,6}",
    ) {
        let mut field = FieldDefinition::new(FieldKind::Select).with_label("pick");
        for value in &values {
            field = field.with_option(value.to_uppercase(), value.clone());
        }
        let field = field.with_default(candidate.clone());

        let issue = validate_field(&field);
        if values.contains(&candidate) {
            prop_assert_eq!(issue, None);
        } else {
            prop_assert_eq!(issue, Some(FieldIssue::DefaultNotAnOption));
        }
    }
}
