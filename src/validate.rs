//! The orchestrator: walks the top-level rule tree and aggregates verdicts.
//!
//! Collects **all** failing fields, not just the first. Validation does not
//! modify the input.

use crate::error::{FieldError, Report, RuleError};
use crate::field;
use crate::types::{Map, RuleTree, Value};

/// Validates an input map against a rule tree.
///
/// One engine invocation per top-level rule key, in the rule tree's key
/// order; fields present in the input but absent from the rules are ignored.
/// Fields named by the rules but absent from the input are evaluated as null.
///
/// # Errors
///
/// Returns [`RuleError`] for configuration faults only (uncompilable `regex:`
/// patterns, over-deep rule trees); ordinary validation failures are reported
/// in the returned [`Report`].
pub fn validate(input: &Map, rules: &RuleTree) -> Result<Report, RuleError> {
    let mut messages = Vec::new();
    let mut field_errors = Vec::new();

    for (name, spec) in rules {
        let value = input.get(name).unwrap_or(Value::null_ref());
        let verdict = field::evaluate(name, value, spec, input)?;
        if verdict.valid {
            continue;
        }
        if let Some(message) = verdict.qualified_message {
            messages.push(message);
        }
        field_errors.push(FieldError {
            path: verdict.path.unwrap_or_else(|| name.clone()),
            message: verdict.field_message.unwrap_or_default(),
        });
    }

    Ok(Report {
        valid: field_errors.is_empty(),
        messages,
        field_errors,
    })
}
