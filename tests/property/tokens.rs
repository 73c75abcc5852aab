use fieldcheck::parse::{RuleName, parse_token};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Colon-separated parameters come back in order.
    #[test]
    fn params_split_on_every_colon(
        name in "[a-z_]{2,12}",
        p1 in "[a-zA-Z0-9,]{1,8}",
        p2 in "[a-zA-Z0-9,]{1,8}",
    ) {
        prop_assume!(name != "regex");
        let token = parse_token(&format!("{}:{}:{}", name, p1, p2));
        prop_assert_eq!(token.params, vec![p1, p2]);
    }

    // A bare name has no parameters.
    #[test]
    fn bare_names_have_no_params(name in "[a-z_]{2,12}") {
        let token = parse_token(&name);
        prop_assert!(token.params.is_empty());
    }

    // regex patterns are taken verbatim, colons and all.
    #[test]
    fn regex_keeps_the_pattern_verbatim(pattern in "[a-zA-Z0-9:^$\\[\\]+*]{1,20}") {
        let token = parse_token(&format!("regex:{}", pattern));
        prop_assert_eq!(token.name, RuleName::Regex);
        prop_assert_eq!(token.params, vec![pattern]);
    }

    // Names outside the vocabulary always parse to the Unknown arm and never
    // fail a value (forward compatibility).
    #[test]
    fn unknown_names_are_noops(
        name in "[h-z]{5,12}",
        value in "[a-zA-Z0-9 ]{0,16}",
    ) {
        let token = parse_token(&name);
        prop_assert!(matches!(token.name, RuleName::Unknown(_)), "{} parsed as known", name);

        let report = fieldcheck::validate_json(
            &serde_json::json!({ "field": value }),
            &serde_json::json!({ "field": name }),
        ).unwrap();
        prop_assert!(report.valid);
    }
}
