//! Prompt assembly and the single generation call per request.

use crate::generation::{GenerationClient, GenerationError, GenerationRequest};

/// Sentence appended to the instructions when research is synthetic, so the
/// generator knows it is working from general knowledge rather than fresh
/// sources. Correctness-relevant, not cosmetic.
pub(crate) const FALLBACK_DISCLOSURE: &str =
    "Fresh research was unavailable; write from established general knowledge of the subject.";

/// Fill the prompt template and invoke the generator exactly once.
///
/// Blank output is rejected: an empty document is a failure, not an answer.
pub(crate) async fn compose_draft(
    client: &dyn GenerationClient,
    model: &str,
    topic: &str,
    word_count: u32,
    research_data: &str,
    instructions: &str,
    is_live: bool,
) -> Result<String, GenerationError> {
    let instructions = annotate_instructions(instructions, is_live);
    let prompt = build_draft_prompt(topic, word_count, research_data, &instructions);

    let content = client
        .complete(GenerationRequest {
            model: model.to_string(),
            prompt,
        })
        .await?;

    if content.trim().is_empty() {
        return Err(GenerationError::EmptyOutput);
    }
    Ok(content)
}

fn annotate_instructions(instructions: &str, is_live: bool) -> String {
    let trimmed = instructions.trim();
    if is_live {
        return trimmed.to_string();
    }
    if trimmed.is_empty() {
        FALLBACK_DISCLOSURE.to_string()
    } else {
        format!("{trimmed} {FALLBACK_DISCLOSURE}")
    }
}

/// Build the drafting prompt from the request and reference material.
fn build_draft_prompt(
    topic: &str,
    word_count: u32,
    research_data: &str,
    instructions: &str,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "System: You are a professional writer producing well-researched long-form articles \
         grounded in the supplied reference material. Neutral tone. No fabricated citations.\n\n",
    );
    prompt.push_str(&format!(
        "Write an article about '{topic}' of approximately {word_count} words.\n\n"
    ));
    prompt.push_str("Reference material:\n");
    prompt.push_str(research_data.trim());
    prompt.push_str("\n\n");
    if !instructions.is_empty() {
        prompt.push_str(&format!("Additional instructions: {instructions}\n\n"));
    }
    prompt.push_str(
        "Formatting requirements:\n\
         - Use SEO-friendly headings and subheadings.\n\
         - Include relevant statistics and concrete figures where the reference material supports them.\n\
         - Return the article as markdown.\n",
    );
    prompt
}
