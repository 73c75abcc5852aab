use serde::Serialize;
use std::fmt;

/// Classification of a validation failure.
///
/// Every failed rule maps to exactly one kind; the kind is carried on the
/// [`Verdict`] so callers can react programmatically without parsing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The value's shape does not match a structural rule (`array`, `object`).
    StructuralMismatch,
    /// A required (or conditionally required) value is absent.
    MissingRequired,
    /// The value cannot be interpreted as the declared primitive type.
    TypeMismatch,
    /// The value has the right type but fails a format check.
    FormatMismatch,
    /// A length, membership, or comparison bound was violated.
    RangeMismatch,
    /// A relational rule against sibling fields failed.
    CrossFieldMismatch,
}

/// The outcome of evaluating one field against its rule list.
///
/// `field_message` is capitalized and never contains the field name
/// (e.g. `"Must be a valid e-mail address"`); `qualified_message` prefixes the
/// dotted field path (e.g. `"person.email must be a valid e-mail address"`).
/// Failures bubbling up from array elements or nested fields keep the deepest
/// path in `path` and `qualified_message`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Verdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_message: Option<String>,
}

impl Verdict {
    /// A passing verdict with no messages.
    pub fn pass() -> Self {
        Verdict {
            valid: true,
            kind: None,
            path: None,
            field_message: None,
            qualified_message: None,
        }
    }

    /// A failing verdict for `path`. `message` is the lowercase, field-free
    /// sentence fragment ("must be an integer"); both message forms are
    /// derived from it.
    pub(crate) fn fail(path: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Verdict {
            valid: false,
            kind: Some(kind),
            path: Some(path.to_string()),
            qualified_message: Some(format!("{} {}", path, message)),
            field_message: Some(capitalize(&message)),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One failing field in a [`Report`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    /// Dotted path of the failing field (deepest path for nested/array failures).
    pub path: String,
    /// Capitalized message without the field name.
    pub message: String,
}

/// Aggregate result of validating a whole input tree.
///
/// Contains **all** failing fields, not just the first. Field order follows
/// the rule tree's key order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    pub valid: bool,
    /// Qualified messages, one per failing field.
    pub messages: Vec<String>,
    pub field_errors: Vec<FieldError>,
}

impl Report {
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }
}

/// Configuration faults, distinct from per-value validation failures.
///
/// Validation failures are reported through [`Verdict`] / [`Report`]; a
/// `RuleError` means the rule specification itself is unusable.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleError {
    /// A `regex:` rule carries a pattern that does not compile.
    InvalidRegex { pattern: String, message: String },
    /// The rule tree nests deeper than the engine's recursion bound.
    DepthExceeded { path: String },
    /// A rule tree or input handed to a JSON entry point has the wrong shape.
    InvalidSpec { message: String },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::InvalidRegex { pattern, message } => {
                write!(f, "invalid regex pattern '{}': {}", pattern, message)
            }
            RuleError::DepthExceeded { path } => {
                write!(f, "rule tree nesting too deep at '{}'", path)
            }
            RuleError::InvalidSpec { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for RuleError {}
