//! Fixed prompts for the chat pipeline.
//!
//! Two system instructions drive the pipeline: one turns a
//! history-dependent question into a standalone one, the other grounds
//! answer generation in the retrieved review context.

use shopqa_retrieval::ReviewDocument;

/// Literal answer emitted when the retrieved context is insufficient.
/// A content policy, not an error path.
pub const FALLBACK_ANSWER: &str = "I couldn't find enough details about that.";

/// System instruction for the question-rewrite stage.
pub const REWRITE_SYSTEM_PROMPT: &str =
    "Given the chat history and user question, rewrite it as a standalone question.";

/// Build the system instruction for the answer-generation stage with the
/// retrieved context embedded.
pub fn answer_system_prompt(context: &str) -> String {
    format!(
        "You are an intelligent e-commerce assistant.\n\
         You answer user queries about products using the provided context \
         (reviews, titles, specs, etc.).\n\
         Follow these rules:\n\
         1. Only use the given CONTEXT for your answer.\n\
         2. If the context doesn't contain enough info, say \"{}\"\n\
         3. Present the answer in a clear, point-wise or bullet list format.\n\
         4. Be concise and helpful.\n\
         \n\
         CONTEXT:\n\
         {}\n\
         \n\
         Now, based on the above context, answer the following question in a \
         numbered or bulleted list:",
        FALLBACK_ANSWER, context
    )
}

/// Join retrieved documents into the context block for the answer prompt.
pub fn build_context(documents: &[ReviewDocument]) -> String {
    documents
        .iter()
        .map(|doc| match doc.product_name() {
            Some(name) => format!("Product: {}\n{}", name, doc.content),
            None => doc.content.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopqa_retrieval::PRODUCT_NAME_KEY;
    use std::collections::HashMap;

    fn doc(title: &str, content: &str) -> ReviewDocument {
        let mut metadata = HashMap::new();
        metadata.insert(PRODUCT_NAME_KEY.to_string(), title.to_string());
        ReviewDocument::new(content, metadata)
    }

    #[test]
    fn test_answer_prompt_embeds_context_and_fallback() {
        let prompt = answer_system_prompt("Review: Great\nRating: 5");

        assert!(prompt.contains("Review: Great\nRating: 5"));
        assert!(prompt.contains(FALLBACK_ANSWER));
        assert!(prompt.contains("Only use the given CONTEXT"));
        assert!(prompt.contains("bulleted list"));
    }

    #[test]
    fn test_build_context_joins_documents() {
        let context = build_context(&[
            doc("Widget", "Review: Great\nRating: 5"),
            doc("Gadget", "Review: Okay\nRating: 3"),
        ]);

        assert!(context.contains("Product: Widget"));
        assert!(context.contains("Review: Great"));
        assert!(context.contains("Product: Gadget"));
        assert!(context.contains("---"));
    }

    #[test]
    fn test_build_context_empty() {
        assert_eq!(build_context(&[]), "");
    }
}
