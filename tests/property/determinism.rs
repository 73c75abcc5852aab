use proptest::prelude::*;
use serde_json::json;

/// Strategy over rule entries drawn from the full vocabulary.
fn arb_rules() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(json!("required")),
        Just(json!("integer")),
        Just(json!("number")),
        Just(json!("string")),
        Just(json!("email")),
        Just(json!("boolean")),
        Just(json!("date")),
        Just(json!(["optional", "integer"])),
        Just(json!(["required", "minlength:2"])),
        Just(json!(["array", "integer"])),
        Just(json!("in:a,b,c")),
        Just(json!("length:3")),
        Just(json!("lowercase")),
        Just(json!("ip")),
        Just(json!("json")),
    ]
}

/// Strategy over scalar and small composite values.
fn arb_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(|b| json!(b)),
        any::<i32>().prop_map(|n| json!(n)),
        any::<f32>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9@. -]{0,12}".prop_map(|s| json!(s)),
        proptest::collection::vec(any::<i32>().prop_map(|n| json!(n)), 0..4)
            .prop_map(serde_json::Value::Array),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Re-validating the same (input, rules) pair yields an identical report:
    // no hidden state is carried between runs.
    #[test]
    fn validation_is_deterministic(
        value in arb_value(),
        sibling in arb_value(),
        rules in arb_rules(),
    ) {
        let input = json!({ "field": value, "other": sibling });
        let tree = json!({ "field": rules });
        let first = fieldcheck::validate_json(&input, &tree).unwrap();
        let second = fieldcheck::validate_json(&input, &tree).unwrap();
        prop_assert_eq!(first, second);
    }

    // A failing report always carries one qualified message and one field
    // error per failing field, and the two stay in step.
    #[test]
    fn messages_and_field_errors_stay_in_step(
        value in arb_value(),
        rules in arb_rules(),
    ) {
        let input = json!({ "field": value });
        let report = fieldcheck::validate_json(&input, &json!({ "field": rules })).unwrap();
        prop_assert_eq!(report.valid, report.field_errors.is_empty());
        prop_assert_eq!(report.messages.len(), report.field_errors.len());
        for error in &report.field_errors {
            // Field messages are capitalized and never start with the path.
            prop_assert!(!error.message.starts_with("field"));
            prop_assert!(error.message.chars().next().is_none_or(|c| !c.is_lowercase()));
        }
    }

    // The empty rule list accepts any value (spec: rules are opt-in).
    #[test]
    fn empty_rule_list_is_always_valid(value in arb_value()) {
        let report = fieldcheck::validate_json(
            &json!({ "field": value }),
            &json!({ "field": [] }),
        ).unwrap();
        prop_assert!(report.valid);
    }

    // The input tree is never mutated by validation.
    #[test]
    fn input_is_not_mutated(value in arb_value(), rules in arb_rules()) {
        let input = json!({ "field": value });
        let before = input.clone();
        let _ = fieldcheck::validate_json(&input, &json!({ "field": rules })).unwrap();
        prop_assert_eq!(input, before);
    }
}
