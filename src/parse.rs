//! Rule-token parsing.
//!
//! A token is a short string naming one check plus colon-delimited parameters:
//! `"required"`, `"length:3"`, `"date:before:2020-01-01"`. Any string is a
//! syntactically valid token; names outside the vocabulary parse to
//! [`RuleName::Unknown`] and evaluate as no-ops, which keeps old rule sets
//! working when new names are introduced.

/// The closed rule vocabulary, plus an open arm for forward compatibility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleName {
    Array,
    Required,
    Optional,
    Integer,
    Number,
    String,
    Email,
    Url,
    Length,
    MaxLength,
    MinLength,
    In,
    Same,
    Different,
    RequiredWith,
    RequiredIf,
    Lowercase,
    Uppercase,
    Alpha,
    AlphaNum,
    AlphaDash,
    Date,
    Boolean,
    Object,
    Distinct,
    Ip,
    Ipv4,
    Ipv6,
    Json,
    Regex,
    Unknown(std::string::String),
}

impl RuleName {
    fn from_token(name: &str) -> RuleName {
        match name {
            "array" => RuleName::Array,
            "required" => RuleName::Required,
            "optional" => RuleName::Optional,
            "int" | "integer" => RuleName::Integer,
            "number" => RuleName::Number,
            "string" => RuleName::String,
            "email" => RuleName::Email,
            "url" => RuleName::Url,
            "length" => RuleName::Length,
            "maxlength" => RuleName::MaxLength,
            "minlength" => RuleName::MinLength,
            "in" => RuleName::In,
            "same" => RuleName::Same,
            "different" => RuleName::Different,
            "required_with" => RuleName::RequiredWith,
            "required_if" => RuleName::RequiredIf,
            "lowercase" => RuleName::Lowercase,
            "uppercase" => RuleName::Uppercase,
            "alpha" => RuleName::Alpha,
            "alpha_num" => RuleName::AlphaNum,
            "alpha_dash" => RuleName::AlphaDash,
            "date" => RuleName::Date,
            "bool" | "boolean" => RuleName::Boolean,
            "object" => RuleName::Object,
            "distinct" => RuleName::Distinct,
            "ip" => RuleName::Ip,
            "ipv4" => RuleName::Ipv4,
            "ipv6" => RuleName::Ipv6,
            "json" => RuleName::Json,
            "regex" => RuleName::Regex,
            other => RuleName::Unknown(other.to_string()),
        }
    }

    /// Rules that only make sense for string values. Their presence appends an
    /// implied `string` rule to the field's effective rule list.
    pub fn implies_string(&self) -> bool {
        matches!(
            self,
            RuleName::Email
                | RuleName::Url
                | RuleName::Lowercase
                | RuleName::Uppercase
                | RuleName::Alpha
                | RuleName::AlphaNum
                | RuleName::AlphaDash
                | RuleName::Ip
                | RuleName::Ipv4
                | RuleName::Ipv6
                | RuleName::Json
                | RuleName::Regex
        )
    }
}

/// One parsed rule token: a name and its raw string parameters. Each rule
/// interprets its own parameters (integers, field lists, date bounds).
#[derive(Clone, Debug, PartialEq)]
pub struct RuleToken {
    pub name: RuleName,
    pub params: Vec<String>,
}

/// Parses a raw token string.
///
/// The name is everything before the first `:`; parameters are the remaining
/// colon-separated pieces. `regex:` is special-cased: only the first `:`
/// delimits, and the rest of the string is the whole pattern verbatim (the
/// pattern may itself contain colons).
pub fn parse_token(raw: &str) -> RuleToken {
    match raw.split_once(':') {
        None => RuleToken {
            name: RuleName::from_token(raw),
            params: Vec::new(),
        },
        Some((name, rest)) => {
            let name = RuleName::from_token(name);
            let params = if name == RuleName::Regex {
                vec![rest.to_string()]
            } else {
                rest.split(':').map(str::to_string).collect()
            };
            RuleToken { name, params }
        }
    }
}

/// Parses a list of raw token strings in order.
pub fn parse_list(raw: &[String]) -> Vec<RuleToken> {
    raw.iter().map(|token| parse_token(token)).collect()
}
