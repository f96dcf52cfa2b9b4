use serde::{Deserialize, Serialize};

/// The single string sent upstream, plus how much of the document made it in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub context_chars: usize,
    pub truncated: bool,
}

/// Build the question-answering prompt.
///
/// Documents longer than `max_context_chars` characters are cut to their first
/// `max_context_chars` characters. There is no chunking or summarizing fallback.
pub fn build_prompt(document_text: &str, question: &str, max_context_chars: usize) -> Prompt {
    let (context, truncated) = head_chars(document_text, max_context_chars);
    let question = question.trim();

    // Keep the contract explicit:
    // - Answer from the document only.
    // - Say so when the document does not contain the answer.
    let text = format!(
        r#"You are answering a question about a document provided by the user.

Rules:
1) Use ONLY the document text under "Context". Do not use outside knowledge.
2) If the context does not contain the answer, say that the document does not say.

Context:
{context}

Question: {question}
Answer (respond concisely, ideally in one word or a short phrase):"#
    );

    Prompt {
        text,
        context_chars: context.chars().count(),
        truncated,
    }
}

fn head_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::head_chars;

    #[test]
    fn head_chars_never_splits_a_character() {
        assert_eq!(head_chars("héllo", 2), ("hé", true));
        assert_eq!(head_chars("🚀🚀🚀", 1), ("🚀", true));
        assert_eq!(head_chars("abc", 3), ("abc", false));
        assert_eq!(head_chars("abc", 0), ("", true));
        assert_eq!(head_chars("", 0), ("", false));
    }
}
