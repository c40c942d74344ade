//! Password strength meter shown under the registration form

use serde::Serialize;

/// Characters that count toward the "digit or symbol" check besides 0-9
const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Points awarded per satisfied check
const CHECK_POINTS: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

impl std::fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrengthLabel::Weak => write!(f, "Weak"),
            StrengthLabel::Medium => write!(f, "Medium"),
            StrengthLabel::Strong => write!(f, "Strong"),
        }
    }
}

/// Score and label together, ready for the meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub label: Option<StrengthLabel>,
}

impl PasswordStrength {
    pub fn evaluate(password: &str) -> Self {
        Self {
            score: score(password),
            label: label(password),
        }
    }
}

/// 0..=100 in steps of 20: non-empty, at least 8 characters, an uppercase
/// letter, a lowercase letter, a digit or symbol.
pub fn score(password: &str) -> u8 {
    let checks = [
        !password.is_empty(),
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit() || SYMBOLS.contains(c)),
    ];
    checks.iter().filter(|passed| **passed).count() as u8 * CHECK_POINTS
}

/// No label for an empty password; otherwise < 40 weak, < 80 medium, else strong
pub fn label(password: &str) -> Option<StrengthLabel> {
    if password.is_empty() {
        return None;
    }
    Some(match score(password) {
        s if s < 40 => StrengthLabel::Weak,
        s if s < 80 => StrengthLabel::Medium,
        _ => StrengthLabel::Strong,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong() {
        assert_eq!(score("Abc12345"), 100);
        assert_eq!(label("Abc12345"), Some(StrengthLabel::Strong));
    }

    #[test]
    fn test_empty() {
        assert_eq!(score(""), 0);
        assert_eq!(label(""), None);
    }

    #[test]
    fn test_medium() {
        assert_eq!(score("abcdefgh"), 60);
        assert_eq!(label("abcdefgh"), Some(StrengthLabel::Medium));
    }

    #[test]
    fn test_label_boundaries() {
        // non-empty + lowercase
        assert_eq!(score("abc"), 40);
        assert_eq!(label("abc"), Some(StrengthLabel::Medium));
        // non-empty only
        assert_eq!(score("   "), 20);
        assert_eq!(label("   "), Some(StrengthLabel::Weak));
    }

    #[test]
    fn test_symbols_count_as_digit_check() {
        assert_eq!(score("a!"), 60);
        assert_eq!(score("a~"), 40);
    }

    #[test]
    fn test_length_counts_characters() {
        // eight characters, more than eight bytes
        assert_eq!(score("ééééééé1"), 60);
    }

    #[test]
    fn test_evaluate() {
        let strength = PasswordStrength::evaluate("Password");
        assert_eq!(strength.score, 80);
        assert_eq!(strength.label, Some(StrengthLabel::Strong));
    }
}
