//! Prompt dialogs
//!
//! A prompt is a single-frame dialog that keeps asking until the user's reply
//! is recognized and, when a validator is attached, accepted by it. The
//! accepted value becomes the result handed to the parent waterfall step.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::state::TurnContext;
use super::stack::DialogId;

/// Outcome of validating a recognized reply
#[derive(Debug, Clone, PartialEq)]
pub enum PromptValidation {
    /// End the prompt with this result
    Accept(Value),
    /// Keep the prompt active and send the retry prompt
    Retry,
}

/// Checks a recognized number; may send its own messages before deciding
pub type NumberValidator = fn(&mut TurnContext, f64) -> PromptValidation;

/// What kind of reply a prompt expects
#[derive(Clone)]
pub enum PromptKind {
    /// Any non-blank text
    Text,
    /// A number found in the reply
    Number { validator: Option<NumberValidator> },
}

impl std::fmt::Debug for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptKind::Text => f.write_str("Text"),
            PromptKind::Number { validator } => f
                .debug_struct("Number")
                .field("validated", &validator.is_some())
                .finish(),
        }
    }
}

/// A registered prompt dialog
#[derive(Debug, Clone)]
pub struct Prompt {
    pub id: DialogId,
    pub kind: PromptKind,
}

impl Prompt {
    pub fn text(id: DialogId) -> Self {
        Self {
            id,
            kind: PromptKind::Text,
        }
    }

    pub fn number(id: DialogId, validator: Option<NumberValidator>) -> Self {
        Self {
            id,
            kind: PromptKind::Number { validator },
        }
    }

    /// Recognize the turn's text and run the validator, if any
    pub fn evaluate(&self, turn: &mut TurnContext) -> PromptValidation {
        let text = turn.activity().text().map(str::to_owned);

        match &self.kind {
            PromptKind::Text => match recognize_text(text.as_deref()) {
                Some(value) => PromptValidation::Accept(Value::String(value)),
                None => PromptValidation::Retry,
            },
            PromptKind::Number { validator } => match recognize_number(text.as_deref()) {
                Some(number) => match validator {
                    Some(validate) => validate(turn, number),
                    None => serde_json::Number::from_f64(number)
                        .map(|n| PromptValidation::Accept(Value::Number(n)))
                        .unwrap_or(PromptValidation::Retry),
                },
                None => PromptValidation::Retry,
            },
        }
    }
}

/// Trimmed text, or `None` when blank
pub fn recognize_text(text: Option<&str>) -> Option<String> {
    let trimmed = text?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("number pattern is valid")
    })
}

/// First standalone number in the text, e.g. `"I'm 42"` gives `42.0`
///
/// A match glued to exponents, digit groups or decimals (`1e400`, `1,000`)
/// is not a number on its own and is skipped.
pub fn recognize_number(text: Option<&str>) -> Option<f64> {
    let text = text?;
    number_pattern()
        .find_iter(text)
        .find(|m| is_whole_token(text, m.start(), m.end()))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn is_whole_token(text: &str, start: usize, end: usize) -> bool {
    let mut before = text[..start].chars().rev();
    let clean_start = match before.next() {
        Some(c) if c.is_ascii_digit() || c == 'e' || c == 'E' => false,
        Some('.') | Some(',') => !before.next().is_some_and(|c| c.is_ascii_digit()),
        _ => true,
    };

    let mut after = text[end..].chars();
    let clean_end = match after.next() {
        Some(c) if c.is_ascii_digit() || c == 'e' || c == 'E' => false,
        Some('.') | Some(',') => !after.next().is_some_and(|c| c.is_ascii_digit()),
        _ => true,
    };

    clean_start && clean_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Activity;
    use assert_matches::assert_matches;

    fn turn(text: &str) -> TurnContext {
        TurnContext::new(Activity::message("console", "c", "u", text))
    }

    #[test]
    fn test_recognize_text() {
        assert_eq!(recognize_text(Some("  Ada ")), Some("Ada".to_string()));
        assert_eq!(recognize_text(Some("   ")), None);
        assert_eq!(recognize_text(None), None);
    }

    #[test]
    fn test_recognize_number() {
        assert_eq!(recognize_number(Some("30")), Some(30.0));
        assert_eq!(recognize_number(Some("I am 42 years old")), Some(42.0));
        assert_eq!(recognize_number(Some("-5")), Some(-5.0));
        assert_eq!(recognize_number(Some("2.5")), Some(2.5));
        assert_eq!(recognize_number(Some("thirty")), None);
        assert_eq!(recognize_number(Some("1e400")), None);
        assert_eq!(recognize_number(Some("1,000")), None);
        assert_eq!(recognize_number(Some("3E2")), None);
        assert_eq!(recognize_number(Some("I am 42.")), Some(42.0));
        assert_eq!(recognize_number(Some("30, thanks")), Some(30.0));
        assert_eq!(recognize_number(Some("1,000 or 7")), Some(7.0));
        assert_eq!(recognize_number(None), None);
    }

    #[test]
    fn test_text_prompt_evaluation() {
        let prompt = Prompt::text(DialogId::NamePrompt);
        assert_eq!(
            prompt.evaluate(&mut turn("Ada")),
            PromptValidation::Accept(Value::String("Ada".to_string()))
        );
        assert_eq!(prompt.evaluate(&mut turn("  ")), PromptValidation::Retry);
    }

    #[test]
    fn test_number_prompt_without_validator() {
        let prompt = Prompt::number(DialogId::AgePrompt, None);
        assert_matches!(prompt.evaluate(&mut turn("12")), PromptValidation::Accept(_));
        assert_eq!(prompt.evaluate(&mut turn("twelve")), PromptValidation::Retry);
    }

    #[test]
    fn test_validator_can_reply() {
        fn reject_all(turn: &mut TurnContext, _value: f64) -> PromptValidation {
            turn.send_activity("nope");
            PromptValidation::Retry
        }

        let prompt = Prompt::number(DialogId::AgePrompt, Some(reject_all as NumberValidator));
        let mut ctx = turn("5");
        assert_eq!(prompt.evaluate(&mut ctx), PromptValidation::Retry);
        assert_eq!(ctx.responses(), ["nope"]);
    }
}
