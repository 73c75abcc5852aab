use proptest::prelude::*;
use serde_json::json;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // The failing array element's zero-based index lands in the dotted path.
    #[test]
    fn failing_element_index_is_in_the_path(
        prefix in proptest::collection::vec(0i64..1000, 0..6),
        suffix in proptest::collection::vec(0i64..1000, 0..6),
    ) {
        let mut items: Vec<serde_json::Value> = prefix.iter().map(|n| json!(n)).collect();
        let failing_index = items.len();
        items.push(json!("not-an-integer"));
        items.extend(suffix.iter().map(|n| json!(n)));

        let report = fieldcheck::validate_json(
            &json!({ "tags": items }),
            &json!({ "tags": ["array", "integer"] }),
        ).unwrap();

        prop_assert!(!report.valid);
        let expected = format!("tags.{}", failing_index);
        prop_assert_eq!(&report.field_errors[0].path, &expected);
        prop_assert_eq!(
            &report.messages[0],
            &format!("{} must be an integer", expected)
        );
    }

    // Nested rule trees join ancestor names with dots, whatever the depth.
    #[test]
    fn nested_paths_join_ancestor_names(
        keys in proptest::collection::vec("[a-z]{1,6}", 1..8),
    ) {
        let mut value = json!("not a number");
        let mut rules = json!("integer");
        for key in keys.iter().rev() {
            value = json!({ key.as_str(): value });
            rules = json!({ key.as_str(): rules });
        }

        let report = fieldcheck::validate_json(
            &json!({ "root": value }),
            &json!({ "root": rules }),
        ).unwrap();

        prop_assert!(!report.valid);
        let expected = format!("root.{}", keys.join("."));
        prop_assert_eq!(&report.field_errors[0].path, &expected);
    }

    // Verdicts for valid nested trees carry no messages at any depth.
    #[test]
    fn valid_nested_trees_are_silent(
        keys in proptest::collection::vec("[a-z]{1,6}", 1..8),
        leaf in 0i64..1000,
    ) {
        let mut value = json!(leaf);
        let mut rules = json!("integer");
        for key in keys.iter().rev() {
            value = json!({ key.as_str(): value });
            rules = json!({ key.as_str(): rules });
        }

        let report = fieldcheck::validate_json(
            &json!({ "root": value }),
            &json!({ "root": rules }),
        ).unwrap();

        prop_assert!(report.valid, "got: {:?}", report.messages);
        prop_assert!(report.messages.is_empty());
    }
}
