//! Raw failure → user-facing message.
//!
//! Dispatches on the failure's rule, never on message text. Custom rules keep
//! their raw message verbatim.

use crate::domain::entities::{failure::RuleFailure, rule::Rule};

/// Format one raw failure. Pure: same input, same output.
pub fn format_message(failure: &RuleFailure) -> String {
    let field = failure.field();
    match failure.rule() {
        Rule::Required => format!("{field} can't be blank"),
        Rule::Length { min, max } => {
            format!("{field} is the wrong length (should be {min}~{max} characters)")
        }
        Rule::Numeric => format!("{field} is not a number"),
        Rule::Email => format!("{field} is not a valid email address"),
        Rule::Custom { .. } => failure.raw_message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(field: &str, rule: Rule, raw: &str) -> String {
        format_message(&RuleFailure::new(field, rule, raw))
    }

    #[test]
    fn builtin_messages() {
        assert_eq!(fmt("Name", Rule::Required, "x"), "Name can't be blank");
        assert_eq!(
            fmt("Password", Rule::length(6, 20), "x"),
            "Password is the wrong length (should be 6~20 characters)"
        );
        assert_eq!(fmt("Age", Rule::Numeric, "x"), "Age is not a number");
        assert_eq!(
            fmt("Email", Rule::Email, "x"),
            "Email is not a valid email address"
        );
    }

    #[test]
    fn custom_keeps_raw_message() {
        let raw = "Code: ZZ does not validate as iso_country";
        assert_eq!(fmt("Code", Rule::custom("iso_country"), raw), raw);
    }

    #[test]
    fn raw_text_never_changes_builtin_message() {
        // A raw message that mentions another rule must not be reclassified.
        assert_eq!(
            fmt("Name", Rule::Required, "Name: does not validate as email"),
            "Name can't be blank"
        );
    }
}
