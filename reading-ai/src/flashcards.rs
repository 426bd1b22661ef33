//! Flashcard generation from notebook content

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AiError;
use crate::gemini::GenerativeBackend;

/// Cards generated when the caller gives no usable count
pub const DEFAULT_CARD_COUNT: usize = 5;

/// Upper bound on cards per request
pub const MAX_CARD_COUNT: usize = 20;

/// One question/answer card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// Requested count → effective count
///
/// Missing, zero and negative counts use the default; large counts are capped.
pub fn effective_count(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if n > 0 => (n as u64).min(MAX_CARD_COUNT as u64) as usize,
        _ => DEFAULT_CARD_COUNT,
    }
}

fn flashcard_prompt(content: &str, count: usize) -> String {
    format!(
        "Create {count} flashcards from the following notes.\n\
         Write them in Simplified Chinese (简体中文).\n\
         Each card has a short question or term on the front and a concise answer on the back.\n\
         \n\
         Notes:\n{content}"
    )
}

fn flashcard_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "front": { "type": "STRING", "description": "Question or term." },
                "back": { "type": "STRING", "description": "Answer or explanation." }
            },
            "required": ["front", "back"]
        }
    })
}

/// Generate up to `count` flashcards
pub async fn generate_flashcards(
    backend: &dyn GenerativeBackend,
    content: &str,
    count: usize,
) -> Result<Vec<Flashcard>, AiError> {
    let prompt = flashcard_prompt(content, count);
    let text = backend.generate_json(&prompt, &flashcard_schema()).await?;

    let mut cards: Vec<Flashcard> =
        serde_json::from_str(&text).map_err(|e| AiError::Parse(e.to_string()))?;
    cards.truncate(count);

    tracing::info!(requested = count, generated = cards.len(), "Generated flashcards");

    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_count() {
        assert_eq!(effective_count(None), DEFAULT_CARD_COUNT);
        assert_eq!(effective_count(Some(0)), DEFAULT_CARD_COUNT);
        assert_eq!(effective_count(Some(-3)), DEFAULT_CARD_COUNT);
        assert_eq!(effective_count(Some(8)), 8);
        assert_eq!(effective_count(Some(500)), MAX_CARD_COUNT);
    }

    #[test]
    fn test_prompt_includes_count_and_content() {
        let prompt = flashcard_prompt("光合作用", 3);
        assert!(prompt.starts_with("Create 3 flashcards"));
        assert!(prompt.ends_with("光合作用"));
    }
}
