//! Field-level validation rules.
//!
//! Each form field owns one [`RuleSet`]; [`evaluate`] runs its checks in a
//! fixed, short-circuiting order (required → length bounds → pattern →
//! custom predicate) and returns a [`Verdict`]. The engine has no side
//! effects; the UI layer decides how to surface a failing verdict.

use std::collections::HashMap;

/// Cross-field data available to custom predicates, e.g. the password value
/// when validating its confirmation, or checkbox states.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    pub fn with_value(mut self, field: &str, value: &str) -> Context {
        self.values.insert(field.to_owned(), value.to_owned());
        self
    }

    pub fn set(&mut self, field: &str, value: &str) {
        self.values.insert(field.to_owned(), value.to_owned());
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// Checkbox state; "true" and "on" both count as checked.
    pub fn is_checked(&self, field: &str) -> bool {
        matches!(self.value(field), "true" | "on")
    }
}

/// Outcome of evaluating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub message: Option<String>,
}

impl Verdict {
    pub fn pass() -> Verdict {
        Verdict {
            valid: true,
            message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Verdict {
        Verdict {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Shape checks, one variant per kind instead of a regex dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `local@domain.tld`, no whitespace in any segment.
    Email,
    /// Letters (including Polish diacritics) and spaces only.
    PersonName,
    /// Optional `+48 ` prefix, then 9–15 digits/spaces/dashes.
    PhonePl,
    /// At least one lowercase letter, one uppercase letter, and one digit.
    StrongPassword,
    /// 11 digits with a valid PESEL check digit.
    Pesel,
}

impl Pattern {
    pub fn matches(self, value: &str) -> bool {
        match self {
            Pattern::Email => email_valid(value),
            Pattern::PersonName => {
                !value.is_empty() && value.chars().all(|c| c.is_alphabetic() || c == ' ')
            }
            Pattern::PhonePl => {
                let rest = value.strip_prefix("+48").map(|r| r.strip_prefix(' ').unwrap_or(r));
                let digits = rest.unwrap_or(value);
                (9..=15).contains(&digits.chars().count())
                    && digits.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
            }
            Pattern::StrongPassword => {
                value.chars().any(|c| c.is_ascii_lowercase())
                    && value.chars().any(|c| c.is_ascii_uppercase())
                    && value.chars().any(|c| c.is_ascii_digit())
            }
            Pattern::Pesel => pesel_valid(value),
        }
    }
}

pub fn email_valid(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    let segment_ok = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace) && !s.contains('@');
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    segment_ok(local) && segment_ok(host) && segment_ok(tld)
}

pub fn pesel_valid(value: &str) -> bool {
    if value.len() != 11 || !value.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    const WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];
    let sum: u32 = digits[..10].iter().zip(WEIGHTS).map(|(d, w)| d * w).sum();
    (10 - sum % 10) % 10 == digits[10]
}

/// Custom predicate: raw value plus cross-field context.
pub type Predicate = fn(&str, &Context) -> bool;

/// The rule bundle owned by one field.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    pub custom: Option<Predicate>,
    /// Message surfaced for required/pattern/custom failures.
    pub message: String,
}

impl RuleSet {
    pub fn required(message: impl Into<String>) -> RuleSet {
        RuleSet {
            required: true,
            min_length: None,
            max_length: None,
            pattern: None,
            custom: None,
            message: message.into(),
        }
    }

    pub fn optional(message: impl Into<String>) -> RuleSet {
        RuleSet {
            required: false,
            ..RuleSet::required(message)
        }
    }

    pub fn min_length(mut self, n: usize) -> RuleSet {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> RuleSet {
        self.max_length = Some(n);
        self
    }

    pub fn pattern(mut self, p: Pattern) -> RuleSet {
        self.pattern = Some(p);
        self
    }

    pub fn custom(mut self, f: Predicate) -> RuleSet {
        self.custom = Some(f);
        self
    }
}

/// Evaluate one field against its rules. Checks run in a fixed order and
/// stop at the first failure; an empty optional field passes outright.
/// Every failure carries the rule's own message, except the length bounds
/// which state the violated bound.
pub fn evaluate(_field: &str, raw: &str, rules: &RuleSet, ctx: &Context) -> Verdict {
    let value = raw.trim();

    if value.is_empty() {
        return if rules.required {
            Verdict::fail(rules.message.clone())
        } else {
            Verdict::pass()
        };
    }

    if let Some(min) = rules.min_length {
        if value.chars().count() < min {
            return Verdict::fail(format!("Minimum {min} znaków"));
        }
    }
    if let Some(max) = rules.max_length {
        if value.chars().count() > max {
            return Verdict::fail(format!("Maksimum {max} znaków"));
        }
    }

    if let Some(pattern) = rules.pattern {
        if !pattern.matches(value) {
            return Verdict::fail(rules.message.clone());
        }
    }

    if let Some(custom) = rules.custom {
        if !custom(value, ctx) {
            return Verdict::fail(rules.message.clone());
        }
    }

    Verdict::pass()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_short_circuits_before_other_checks() {
        let rules = RuleSet::required("Wprowadź poprawny adres email").pattern(Pattern::Email);
        let verdict = evaluate("email", "   ", &rules, &Context::new());
        assert!(!verdict.valid);
        assert_eq!(
            verdict.message.as_deref(),
            Some("Wprowadź poprawny adres email")
        );
    }

    #[test]
    fn empty_required_field_surfaces_the_rules_own_message() {
        let rules = RuleSet::required("Proszę wypełnić wszystkie wymagane pola");
        let verdict = evaluate("sex", "", &rules, &Context::new());
        assert_eq!(
            verdict.message.as_deref(),
            Some("Proszę wypełnić wszystkie wymagane pola")
        );
    }

    #[test]
    fn empty_optional_field_passes_without_pattern_check() {
        let rules = RuleSet::optional("Wprowadź poprawny numer telefonu").pattern(Pattern::PhonePl);
        assert!(evaluate("phone", "", &rules, &Context::new()).valid);
        assert!(!evaluate("phone", "abc", &rules, &Context::new()).valid);
    }

    #[test]
    fn min_length_reported_before_pattern() {
        let rules = RuleSet::required("Hasło musi zawierać małą i wielką literę oraz cyfrę")
            .min_length(8)
            .pattern(Pattern::StrongPassword);
        let verdict = evaluate("password", "Ab1", &rules, &Context::new());
        assert_eq!(verdict.message.as_deref(), Some("Minimum 8 znaków"));

        let verdict = evaluate("password", "abcdefgh", &rules, &Context::new());
        assert_eq!(
            verdict.message.as_deref(),
            Some("Hasło musi zawierać małą i wielką literę oraz cyfrę")
        );
        assert!(evaluate("password", "Abcdefg1", &rules, &Context::new()).valid);
    }

    #[test]
    fn confirm_password_reads_cross_field_context() {
        let rules = RuleSet::required("Hasła muszą być identyczne")
            .custom(|value, ctx| value == ctx.value("password"));
        let ctx = Context::new().with_value("password", "Tajne123");
        assert!(evaluate("confirmPassword", "Tajne123", &rules, &ctx).valid);
        assert!(!evaluate("confirmPassword", "Tajne124", &rules, &ctx).valid);
    }

    #[test]
    fn email_pattern() {
        assert!(email_valid("jan.kowalski@example.pl"));
        assert!(!email_valid("jan@example"));
        assert!(!email_valid("jan @example.pl"));
        assert!(!email_valid("@example.pl"));
    }

    #[test]
    fn person_name_accepts_polish_diacritics() {
        assert!(Pattern::PersonName.matches("Łukasz Żółć"));
        assert!(!Pattern::PersonName.matches("Jan2"));
    }

    #[test]
    fn phone_accepts_prefixed_and_plain_forms() {
        assert!(Pattern::PhonePl.matches("+48 123 456 789"));
        assert!(Pattern::PhonePl.matches("123456789"));
        assert!(!Pattern::PhonePl.matches("12345"));
    }

    #[test]
    fn pesel_check_digit() {
        // Valid test PESEL (checksum verified by hand).
        assert!(pesel_valid("44051401359"));
        assert!(!pesel_valid("44051401358"));
        assert!(!pesel_valid("4405140135"));
    }
}
