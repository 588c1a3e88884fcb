//! Generation gateway - editorial actions via a remote provider, with a
//! deterministic offline fallback.

use std::sync::Arc;

use crate::domain::GenerationAction;
use crate::ports::TextGenerator;

/// Number of words kept by the offline summary.
const SUMMARY_WORD_LIMIT: usize = 30;

/// Maps `(text, action)` to generated text.
///
/// The provider is optional. Without one, or when a call fails, the result
/// comes from [`fallback_response`]; callers never see provider errors.
#[derive(Clone)]
pub struct GenerationService {
    provider: Option<Arc<dyn TextGenerator>>,
}

impl GenerationService {
    pub fn new(provider: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { provider }
    }

    /// A gateway that always answers with the offline fallback.
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn generate(&self, text: &str, action: GenerationAction) -> String {
        let Some(provider) = &self.provider else {
            tracing::debug!(%action, "No generation provider configured, using offline fallback");
            return fallback_response(text, action);
        };

        let prompt = format!("{}\n\n{}", instruction_for(action), text);

        match provider.complete(&prompt).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    %action,
                    error = %e,
                    "Text generation failed, using offline fallback"
                );
                fallback_response(text, action)
            }
        }
    }
}

/// Instruction sent to the provider ahead of the user's text.
pub fn instruction_for(action: GenerationAction) -> &'static str {
    match action {
        GenerationAction::Summarize => {
            "You are an expert blog editor. Summarize the following blog post content \
             into 2-3 concise sentences that capture the key points:"
        }
        GenerationAction::FixGrammar => {
            "You are an expert editor. Fix the grammar, spelling, and punctuation in the \
             following text. Return ONLY the corrected text, nothing else:"
        }
        GenerationAction::Expand => {
            "You are an expert blog writer. Expand on the following text, adding more detail, \
             examples, and depth. Keep the same tone and style:"
        }
        GenerationAction::Title => {
            "You are an expert blog editor. Suggest 3 compelling blog post titles for the \
             following content. Return them as a numbered list:"
        }
    }
}

/// Deterministic local substitute for the remote provider.
pub fn fallback_response(text: &str, action: GenerationAction) -> String {
    match action {
        GenerationAction::Summarize => {
            let words: Vec<&str> = text.split_whitespace().collect();
            let summary = words
                .iter()
                .take(SUMMARY_WORD_LIMIT)
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            let ellipsis = if words.len() > SUMMARY_WORD_LIMIT {
                "..."
            } else {
                ""
            };
            format!("Summary (offline): {summary}{ellipsis}")
        }
        GenerationAction::FixGrammar => text.to_string(),
        GenerationAction::Expand => {
            format!("{text}\n\n[AI expansion unavailable - configure GROQ_API_KEY]")
        }
        GenerationAction::Title => {
            "1. [AI titles unavailable - configure GROQ_API_KEY]".to_string()
        }
    }
}
