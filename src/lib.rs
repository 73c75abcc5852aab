//! Declarative, rule-token based validation for nested value trees.
//!
//! `fieldcheck` validates an arbitrary tree of input values (scalars, arrays,
//! nested maps) against per-field rules written as short tokens such as
//! `required`, `integer`, `length:3`, or `in:a,b,c`:
//!
//! ```text
//! validate(input, rules) → Report        (all failing fields)
//! evaluate(name, value, spec, input) → Verdict   (one field)
//! ```
//!
//! Validation is pure and synchronous: the input is never mutated, verdicts
//! are deterministic, and re-validating the same pair yields the same result.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let report = fieldcheck::validate_json(
//!     &json!({
//!         "age": "25.5",
//!         "person": { "email": "robin@example.com" },
//!         "tags": ["a", "b"],
//!     }),
//!     &json!({
//!         "age": "integer",
//!         "person": { "email": ["required", "email"] },
//!         "tags": ["array", "string"],
//!     }),
//! )
//! .expect("well-formed rules");
//!
//! assert!(!report.valid);
//! assert_eq!(report.messages, vec!["age must be an integer"]);
//! assert_eq!(report.field_errors[0].message, "Must be an integer");
//! ```
//!
//! Rule order matters: tokens are evaluated left to right, `array` hands the
//! remaining tokens to each element (failing paths look like `tags.1`), and
//! `optional` lets absent fields skip the type rules entirely. Unrecognized
//! token names are no-ops, so rule sets stay forward compatible.

pub mod error;
pub mod field;
pub mod parse;
pub mod primitives;
pub mod types;
pub mod validate;

pub use error::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use field::evaluate;
pub use validate::validate;

/// Convenience entry point over JSON trees.
///
/// Converts both trees and delegates to [`validate`]. Rule entries may be
/// single token strings, arrays of tokens, or nested objects.
///
/// # Errors
///
/// Returns [`RuleError::InvalidSpec`] if either argument is not a JSON
/// object, and propagates the engine's configuration faults.
pub fn validate_json(
    input: &serde_json::Value,
    rules: &serde_json::Value,
) -> Result<Report, RuleError> {
    let input = types::map_from_json(input).ok_or_else(|| RuleError::InvalidSpec {
        message: "input must be a JSON object".to_string(),
    })?;
    let rules = types::rule_tree_from_json(rules).ok_or_else(|| RuleError::InvalidSpec {
        message: "rules must be a JSON object".to_string(),
    })?;
    validate::validate(&input, &rules)
}
