use proptest::prelude::*;
use serde_json::json;

fn passes(value: serde_json::Value, rule: &str) -> bool {
    fieldcheck::validate_json(&json!({ "field": value }), &json!({ "field": rule }))
        .unwrap()
        .valid
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Every i64 passes `integer` both as a number and as its decimal string.
    #[test]
    fn integers_round_trip(n in any::<i64>()) {
        prop_assert!(passes(json!(n), "integer"));
        prop_assert!(passes(json!(n.to_string()), "integer"));
    }

    // Numbers with a fractional part fail `integer` but pass `number`.
    #[test]
    fn fractional_numbers_are_not_integers(n in any::<i32>(), frac in 1u32..1000) {
        let value = n as f64 + frac as f64 / 1024.0;
        prop_assume!(value.fract() != 0.0);
        prop_assert!(!passes(json!(value), "integer"));
        prop_assert!(passes(json!(value), "number"));
    }

    // Strings that are not exact decimal renderings fail the round-trip.
    #[test]
    fn padded_numeric_strings_fail_integer(n in 0i64..1000) {
        let padded = format!(" {}", n);
        let suffixed = format!("{}x", n);
        let zero_prefixed = format!("0{}", n);
        prop_assert!(!passes(json!(padded), "integer"));
        prop_assert!(!passes(json!(suffixed), "integer"));
        prop_assert!(!passes(json!(zero_prefixed), "integer"));
    }

    // Length measures characters for strings and digits for numbers.
    #[test]
    fn length_matches_character_count(s in "[a-zA-Z0-9éö]{1,20}") {
        let n = s.chars().count();
        let exact = format!("length:{}", n);
        let off_by_one = format!("length:{}", n + 1);
        let max = format!("maxlength:{}", n);
        let min = format!("minlength:{}", n);
        prop_assert!(passes(json!(s.clone()), &exact));
        prop_assert!(!passes(json!(s.clone()), &off_by_one));
        prop_assert!(passes(json!(s.clone()), &max));
        prop_assert!(passes(json!(s), &min));
    }

    #[test]
    fn length_matches_decimal_digits(n in 1000i64..9999) {
        prop_assert!(passes(json!(n), "length:4"));
        prop_assert!(!passes(json!(n), "length:3"));
    }

    // `in` coerces numbers to their decimal form before the membership test.
    #[test]
    fn in_membership_coerces_numbers(n in 0i64..1000) {
        let rule = format!("in:{},x", n);
        prop_assert!(passes(json!(n), &rule));
        prop_assert!(passes(json!(n.to_string()), &rule));
        prop_assert!(!passes(json!(n + 1000), &rule));
    }

    // Strict equality for `same` never equates numbers with strings.
    #[test]
    fn same_is_strict(n in any::<i32>()) {
        let input = json!({ "a": n, "b": n.to_string() });
        let report = fieldcheck::validate_json(&input, &json!({ "b": "same:a" })).unwrap();
        prop_assert!(!report.valid);
        let input = json!({ "a": n, "b": n });
        let report = fieldcheck::validate_json(&input, &json!({ "b": "same:a" })).unwrap();
        prop_assert!(report.valid);
    }
}
