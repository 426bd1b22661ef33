//! Book analysis with a fixed fallback
//!
//! Any backend or parse failure is logged and replaced by
//! [`AnalysisResult::fallback`]; callers never see an error.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::gemini::GenerativeBackend;

/// Summary, key takeaways and a quote for one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<String>,
    pub quote: String,
}

impl AnalysisResult {
    /// Canned result served whenever the model cannot be used
    pub fn fallback() -> Self {
        Self {
            summary: "暂时无法获取AI解读，请稍后再试。".to_string(),
            key_points: vec![
                "深入阅读以获取更多智慧".to_string(),
                "保持好奇心".to_string(),
                "书山有路勤为径".to_string(),
            ],
            quote: "学而知之。".to_string(),
        }
    }
}

fn analysis_prompt(title: &str, author: &str) -> String {
    format!(
        "Please analyze the book \"{title}\" by {author}.\n\
         Provide the output in Simplified Chinese (简体中文).\n\
         I need three things:\n\
         1. A one-sentence essence summary.\n\
         2. Three bullet points of \"Wisdom to Learn\" (key takeaways).\n\
         3. A short, inspiring quote from the book (or a paraphrased wisdom if exact quote unavailable)."
    )
}

fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A concise summary of the book's core value."
            },
            "keyPoints": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 key wisdom points learned from the book."
            },
            "quote": {
                "type": "STRING",
                "description": "An inspiring quote or golden sentence from the book."
            }
        },
        "required": ["summary", "keyPoints", "quote"]
    })
}

/// Analyze a book; failures yield [`AnalysisResult::fallback`]
pub async fn analyze_book(
    backend: &dyn GenerativeBackend,
    title: &str,
    author: &str,
) -> Result<AnalysisResult, Infallible> {
    let prompt = analysis_prompt(title, author);

    let text = match backend.generate_json(&prompt, &analysis_schema()).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, title, "Book analysis failed, serving fallback");
            return Ok(AnalysisResult::fallback());
        }
    };

    match serde_json::from_str::<AnalysisResult>(&text) {
        Ok(result) => {
            tracing::info!(title, key_points = result.key_points.len(), "Book analyzed");
            Ok(result)
        }
        Err(e) => {
            tracing::error!(error = %e, title, "Model returned malformed analysis, serving fallback");
            Ok(AnalysisResult::fallback())
        }
    }
}
