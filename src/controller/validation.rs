//! Outgoing message validation

use once_cell::sync::Lazy;
use regex::RegexSet;

pub const MAX_MESSAGE_CHARS: usize = 2000;

static DANGEROUS_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)<script",
        r"(?i)javascript:",
        r"(?i)data:text/html",
        r"(?i)vbscript:",
        r"(?i)on\w+\s*=",
        r"(?i)<iframe",
        r"(?i)<object",
        r"(?i)<embed",
    ])
    .unwrap_or_else(|_| RegexSet::empty())
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputProblem {
    Empty,
    TooLong(usize),
    Dangerous,
    FeedbackTooShort,
}

impl std::fmt::Display for InputProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputProblem::Empty => write!(f, "Mensagem vazia"),
            InputProblem::TooLong(_) => write!(
                f,
                "Mensagem muito longa (máximo {MAX_MESSAGE_CHARS} caracteres)"
            ),
            InputProblem::Dangerous => write!(f, "Mensagem contém conteúdo não permitido"),
            InputProblem::FeedbackTooShort => write!(
                f,
                "Título precisa de 5 caracteres e descrição de 10"
            ),
        }
    }
}

/// Check a message before it is sent. Returns the trimmed text.
pub fn validate_input(input: &str) -> Result<&str, InputProblem> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputProblem::Empty);
    }
    let len = trimmed.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(InputProblem::TooLong(len));
    }
    if DANGEROUS_PATTERNS.is_match(trimmed) {
        return Err(InputProblem::Dangerous);
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_text() {
        assert_eq!(validate_input("  Como faço pão?  "), Ok("Como faço pão?"));
        assert_eq!(validate_input("a = b + c"), Ok("a = b + c"));
    }

    #[test]
    fn test_rejects_empty_and_long() {
        assert_eq!(validate_input("   \n"), Err(InputProblem::Empty));
        let long = "é".repeat(MAX_MESSAGE_CHARS + 1);
        assert_eq!(validate_input(&long), Err(InputProblem::TooLong(MAX_MESSAGE_CHARS + 1)));
        assert!(validate_input(&"é".repeat(MAX_MESSAGE_CHARS)).is_ok());
    }

    #[test]
    fn test_rejects_injection_patterns() {
        for input in [
            "<SCRIPT>alert(1)</script>",
            "click javascript:void(0)",
            "data:text/html;base64,xx",
            "<img onerror = x>",
            "<iframe src=x>",
            "<embed>",
        ] {
            assert_eq!(validate_input(input), Err(InputProblem::Dangerous), "{input}");
        }
    }
}
