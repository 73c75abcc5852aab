//! The per-field rule evaluation engine.
//!
//! [`evaluate`] takes one field's name, its value, its rules, and the full
//! top-level input map (for cross-field rules), and returns a single
//! [`Verdict`]. Evaluation is deterministic and total: it always terminates
//! with exactly one verdict, never mutates the input, and stops at the first
//! failing rule.
//!
//! Evaluation runs in three phases over the field's effective rule list:
//!
//! 1. **Structural gate** — `array` delegates the remaining rules to each
//!    element (path `{name}.{index}`) and `required` rejects missing values.
//! 2. **Optional short-circuit** — `optional` plus an absent value passes
//!    without evaluating the remaining rules.
//! 3. **Type and semantic rules** — in list order, first failure wins.
//!
//! The original engine appended an implied `string` rule to a field's rule
//! list while evaluating it. Here the implied rule is resolved eagerly into an
//! *effective rule list* owned by each invocation, so array elements and
//! nested fields can never observe another field's rules.

use crate::error::{FailureKind, RuleError, Verdict};
use crate::parse::{RuleName, RuleToken, parse_list, parse_token};
use crate::primitives::{
    coerce_string, date_value, fmt_date, is_integer, is_missing, is_number, is_truthy, length_of,
    loose_eq, parse_date, today_utc,
};
use crate::types::{Map, RuleSpec, Value};
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

/// Recursion bound over nested rule trees and array elements. Exceeding it is
/// a configuration fault, not a validation failure.
pub const MAX_DEPTH: usize = 128;

// ─── Cached format regexes ──────────────────────────────────────────────────

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[^@\s]+@[^@\s]+\.[^@\s]{2,}$").unwrap());

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/.]+(\.[^\s/.]+)+(/\S*)?$").unwrap());

static ALPHA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\p{L}+$").unwrap());

static ALPHA_NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}]+$").unwrap());

static ALPHA_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_-]+$").unwrap());

/// Evaluates one field against its rules.
///
/// `input` is always the top-level input map: cross-field rules (`same`,
/// `different`, `required_with`, `required_if`, `distinct`) resolve sibling
/// names against it even when the field itself is nested.
///
/// # Errors
///
/// Returns [`RuleError`] only for configuration faults: an uncompilable
/// `regex:` pattern or a rule tree nested past [`MAX_DEPTH`].
pub fn evaluate(name: &str, value: &Value, spec: &RuleSpec, input: &Map) -> Result<Verdict, RuleError> {
    eval_spec(name, value, spec, input, 0)
}

fn eval_spec(
    name: &str,
    value: &Value,
    spec: &RuleSpec,
    input: &Map,
    depth: usize,
) -> Result<Verdict, RuleError> {
    if depth > MAX_DEPTH {
        return Err(RuleError::DepthExceeded {
            path: name.to_string(),
        });
    }

    match spec {
        RuleSpec::Single(raw) => eval_tokens(name, value, &[parse_token(raw)], input, depth),
        RuleSpec::List(raw) => eval_tokens(name, value, &parse_list(raw), input, depth),
        RuleSpec::Nested(tree) => {
            // Structural recursion: each key validates `value[key]` at path
            // `{name}.{key}`. A non-object value makes every child absent.
            for (key, sub) in tree {
                let child_name = format!("{}.{}", name, key);
                let child_value = match value {
                    Value::Object(map) => map.get(key).unwrap_or(Value::null_ref()),
                    _ => Value::null_ref(),
                };
                let verdict = eval_spec(&child_name, child_value, sub, input, depth + 1)?;
                if !verdict.valid {
                    return Ok(verdict);
                }
            }
            Ok(Verdict::pass())
        }
    }
}

/// Resolves implied rules into an owned effective rule list: any
/// string-implying rule appends a trailing `string` token unless one is
/// already present.
fn effective_rules(tokens: &[RuleToken]) -> Vec<RuleToken> {
    let mut rules = tokens.to_vec();
    let needs_string = rules.iter().any(|t| t.name.implies_string())
        && !rules.iter().any(|t| t.name == RuleName::String);
    if needs_string {
        rules.push(RuleToken {
            name: RuleName::String,
            params: Vec::new(),
        });
    }
    rules
}

fn eval_tokens(
    name: &str,
    value: &Value,
    tokens: &[RuleToken],
    input: &Map,
    depth: usize,
) -> Result<Verdict, RuleError> {
    if depth > MAX_DEPTH {
        return Err(RuleError::DepthExceeded {
            path: name.to_string(),
        });
    }

    let rules = effective_rules(tokens);
    let has_required = rules.iter().any(|t| t.name == RuleName::Required);

    // Phase 1: structural gate.
    for (pos, token) in rules.iter().enumerate() {
        match token.name {
            RuleName::Array => {
                let Value::Array(items) = value else {
                    return Ok(Verdict::fail(
                        name,
                        FailureKind::StructuralMismatch,
                        "must be an array",
                    ));
                };
                if has_required && items.is_empty() {
                    return Ok(Verdict::fail(
                        name,
                        FailureKind::StructuralMismatch,
                        "must not be empty",
                    ));
                }
                // The rules after `array` describe the elements, not the
                // array itself. Each element gets its own copy of the list.
                let mut element_rules = rules.clone();
                element_rules.remove(pos);
                for (index, item) in items.iter().enumerate() {
                    let element_name = format!("{}.{}", name, index);
                    let verdict =
                        eval_tokens(&element_name, item, &element_rules, input, depth + 1)?;
                    if !verdict.valid {
                        // Already qualified with the element's path.
                        return Ok(verdict);
                    }
                }
                return Ok(Verdict::pass());
            }
            RuleName::Required => {
                if is_missing(value) {
                    return Ok(Verdict::fail(name, FailureKind::MissingRequired, "is required"));
                }
            }
            _ => {}
        }
    }

    // Phase 2: an absent optional field is valid regardless of type rules.
    if value.is_null() && rules.iter().any(|t| t.name == RuleName::Optional) {
        return Ok(Verdict::pass());
    }

    // Phase 3: type and semantic rules, first failure wins.
    for token in &rules {
        if let Some(verdict) = check_rule(name, value, token, input)? {
            return Ok(verdict);
        }
    }

    Ok(Verdict::pass())
}

/// Evaluates one phase-3 rule. `None` means the rule passed (or is a no-op).
fn check_rule(
    name: &str,
    value: &Value,
    token: &RuleToken,
    input: &Map,
) -> Result<Option<Verdict>, RuleError> {
    let verdict = match &token.name {
        // Handled in earlier phases, or deliberately inert.
        RuleName::Array | RuleName::Required | RuleName::Optional | RuleName::Unknown(_) => None,

        RuleName::Integer => (!is_integer(value))
            .then(|| Verdict::fail(name, FailureKind::TypeMismatch, "must be an integer")),

        RuleName::Number => (!is_number(value))
            .then(|| Verdict::fail(name, FailureKind::TypeMismatch, "must be a number")),

        RuleName::String => (!matches!(value, Value::String(_)))
            .then(|| Verdict::fail(name, FailureKind::TypeMismatch, "must be a string")),

        RuleName::Email => regex_check(name, value, &EMAIL_RE, "must be a valid e-mail address"),

        RuleName::Url => regex_check(name, value, &URL_RE, "must be a valid URL"),

        RuleName::Length => check_length(name, value, token, LengthBound::Exact),
        RuleName::MaxLength => check_length(name, value, token, LengthBound::Max),
        RuleName::MinLength => check_length(name, value, token, LengthBound::Min),

        RuleName::In => {
            let options: Vec<&str> = first_param(token).split(',').collect();
            match coerce_string(value) {
                Some(s) if options.contains(&s.as_str()) => None,
                _ => Some(Verdict::fail(
                    name,
                    FailureKind::RangeMismatch,
                    format!("must be one of the following values: {}", options.join(", ")),
                )),
            }
        }

        RuleName::Same => {
            let others: Vec<&str> = first_param(token).split(',').collect();
            let mismatch = others
                .iter()
                .any(|f| input.get(*f).unwrap_or(Value::null_ref()) != value);
            mismatch.then(|| {
                Verdict::fail(
                    name,
                    FailureKind::CrossFieldMismatch,
                    format!("must be the same as {}", others.join(", ")),
                )
            })
        }

        RuleName::Different => {
            let others: Vec<&str> = first_param(token).split(',').collect();
            // Siblings must also pairwise differ as they are accumulated.
            let mut seen: Vec<&Value> = vec![value];
            let mut verdict = None;
            for f in &others {
                let other = input.get(*f).unwrap_or(Value::null_ref());
                if seen.iter().any(|v| *v == other) {
                    verdict = Some(Verdict::fail(
                        name,
                        FailureKind::CrossFieldMismatch,
                        format!("must be different from {}", others.join(", ")),
                    ));
                    break;
                }
                seen.push(other);
            }
            verdict
        }

        RuleName::RequiredWith => {
            let field = first_param(token);
            let present = is_truthy(input.get(field).unwrap_or(Value::null_ref()));
            (present && is_missing(value)).then(|| {
                Verdict::fail(
                    name,
                    FailureKind::CrossFieldMismatch,
                    format!("is required when {} is present", field),
                )
            })
        }

        RuleName::RequiredIf => {
            let field = first_param(token);
            let expected = token.params.get(1).map(String::as_str).unwrap_or("");
            let triggered = loose_eq(input.get(field).unwrap_or(Value::null_ref()), expected);
            (triggered && is_missing(value)).then(|| {
                Verdict::fail(
                    name,
                    FailureKind::CrossFieldMismatch,
                    format!("is required when {} is {}", field, expected),
                )
            })
        }

        RuleName::Lowercase => match coerce_string(value) {
            Some(s) if s == s.to_lowercase() => None,
            _ => Some(Verdict::fail(
                name,
                FailureKind::FormatMismatch,
                "must be lower case",
            )),
        },

        RuleName::Uppercase => match coerce_string(value) {
            Some(s) if s == s.to_uppercase() => None,
            _ => Some(Verdict::fail(
                name,
                FailureKind::FormatMismatch,
                "must be upper case",
            )),
        },

        RuleName::Alpha => regex_check(name, value, &ALPHA_RE, "must contain only letters"),

        RuleName::AlphaNum => regex_check(
            name,
            value,
            &ALPHA_NUM_RE,
            "must contain only letters and numbers",
        ),

        RuleName::AlphaDash => regex_check(
            name,
            value,
            &ALPHA_DASH_RE,
            "must contain only letters, numbers, dashes and underscores",
        ),

        RuleName::Date => check_date(name, value, token),

        RuleName::Boolean => {
            let ok = match value {
                Value::Bool(_) => true,
                Value::Number(n) => *n == 0.0 || *n == 1.0,
                Value::String(s) => matches!(s.as_str(), "true" | "false" | "0" | "1"),
                _ => false,
            };
            (!ok).then(|| {
                Verdict::fail(
                    name,
                    FailureKind::TypeMismatch,
                    "must be a boolean value (true or false)",
                )
            })
        }

        RuleName::Object => (!matches!(value, Value::Object(_)))
            .then(|| Verdict::fail(name, FailureKind::StructuralMismatch, "must be an object")),

        RuleName::Distinct => {
            // The field itself is located by first-match removal, not by
            // name: the first sibling strictly equal to this value counts as
            // the field, any further match is a duplicate.
            let mut matched_self = false;
            let mut verdict = None;
            for other in input.values() {
                if other == value {
                    if matched_self {
                        verdict = Some(Verdict::fail(
                            name,
                            FailureKind::CrossFieldMismatch,
                            "must be distinct",
                        ));
                        break;
                    }
                    matched_self = true;
                }
            }
            verdict
        }

        RuleName::Ip => ip_check(
            name,
            value,
            |s| s.parse::<IpAddr>().is_ok(),
            "must be a valid IP address",
        ),

        RuleName::Ipv4 => ip_check(
            name,
            value,
            |s| s.parse::<Ipv4Addr>().is_ok(),
            "must be a valid IPv4 address",
        ),

        RuleName::Ipv6 => ip_check(
            name,
            value,
            |s| s.parse::<Ipv6Addr>().is_ok(),
            "must be a valid IPv6 address",
        ),

        RuleName::Json => match value {
            Value::String(s) if serde_json::from_str::<serde_json::Value>(s).is_ok() => None,
            _ => Some(Verdict::fail(
                name,
                FailureKind::FormatMismatch,
                "must be valid JSON",
            )),
        },

        RuleName::Regex => {
            let pattern = first_param(token);
            let re = Regex::new(pattern).map_err(|e| RuleError::InvalidRegex {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            // Applied as a search; the pattern anchors itself if needed.
            match coerce_string(value) {
                Some(s) if re.is_match(&s) => None,
                _ => Some(Verdict::fail(
                    name,
                    FailureKind::FormatMismatch,
                    format!("must match the following regular expression: {}", pattern),
                )),
            }
        }
    };

    Ok(verdict)
}

fn first_param(token: &RuleToken) -> &str {
    token.params.first().map(String::as_str).unwrap_or("")
}

/// Full-match format check against a cached regex, on the coerced string form.
fn regex_check(name: &str, value: &Value, re: &Regex, message: &str) -> Option<Verdict> {
    match coerce_string(value) {
        Some(s) if re.is_match(&s) => None,
        _ => Some(Verdict::fail(name, FailureKind::FormatMismatch, message)),
    }
}

fn ip_check(
    name: &str,
    value: &Value,
    accepts: impl Fn(&str) -> bool,
    message: &str,
) -> Option<Verdict> {
    match coerce_string(value) {
        Some(s) if accepts(&s) => None,
        _ => Some(Verdict::fail(name, FailureKind::FormatMismatch, message)),
    }
}

enum LengthBound {
    Exact,
    Max,
    Min,
}

fn check_length(
    name: &str,
    value: &Value,
    token: &RuleToken,
    bound: LengthBound,
) -> Option<Verdict> {
    // A non-numeric bound parameter makes the token inert rather than a fault.
    let limit: usize = first_param(token).parse().ok()?;

    let ok = match length_of(value) {
        Some(len) => match bound {
            LengthBound::Exact => len == limit,
            LengthBound::Max => len <= limit,
            LengthBound::Min => len >= limit,
        },
        None => false,
    };
    if ok {
        return None;
    }

    let message = match bound {
        LengthBound::Exact => format!("must be {} characters long", limit),
        LengthBound::Max => format!("must be no more than {} characters long", limit),
        LengthBound::Min => format!("must be at least {} characters long", limit),
    };
    Some(Verdict::fail(name, FailureKind::RangeMismatch, message))
}

fn check_date(name: &str, value: &Value, token: &RuleToken) -> Option<Verdict> {
    let Some(date) = date_value(value) else {
        return Some(Verdict::fail(
            name,
            FailureKind::TypeMismatch,
            "must be a valid date",
        ));
    };

    let Some(qualifier) = token.params.first() else {
        return None;
    };
    let raw_bound = token.params.get(1).map(String::as_str).unwrap_or("");
    let bound = if raw_bound == "now" {
        Some(today_utc())
    } else {
        parse_date(raw_bound)
    };

    match (qualifier.as_str(), bound) {
        ("before", Some(b)) if date >= b => Some(Verdict::fail(
            name,
            FailureKind::RangeMismatch,
            format!("must be a date before {}", fmt_date(b)),
        )),
        // `after` admits the bound itself.
        ("after", Some(b)) if date < b => Some(Verdict::fail(
            name,
            FailureKind::RangeMismatch,
            format!("must be a date after {}", fmt_date(b)),
        )),
        ("equal", Some(b)) if date != b => Some(Verdict::fail(
            name,
            FailureKind::RangeMismatch,
            format!("must be {}", fmt_date(b)),
        )),
        // An unparseable `equal` bound can never be satisfied.
        ("equal", None) => Some(Verdict::fail(
            name,
            FailureKind::RangeMismatch,
            format!("must be {}", raw_bound),
        )),
        _ => None,
    }
}
