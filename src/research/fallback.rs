//! Synthetic reference text substituted when live lookups are exhausted.
//!
//! Fallback content is two-tiered: topics matching a small AI-domain keyword
//! set receive a richer multi-section outline, everything else a generic
//! five-point outline. The goal is plausible scaffolding for the generator
//! without another external call.

/// Keywords that select the richer AI-domain fallback outline.
const AI_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "neural network",
    "language model",
    "llm",
];

/// Produce non-empty synthetic reference text for the topic.
pub fn fallback_research(topic: &str) -> String {
    if is_ai_topic(topic) {
        ai_outline(topic)
    } else {
        generic_outline(topic)
    }
}

/// Case-insensitive substring classification against the keyword set.
fn is_ai_topic(topic: &str) -> bool {
    let lowered = topic.to_lowercase();
    AI_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

fn ai_outline(topic: &str) -> String {
    let mut text = String::new();
    text.push_str(&format!("## Overview of {topic}\n"));
    text.push_str(
        "Core concepts, terminology, and how the field positions this subject today.\n\n",
    );
    text.push_str("## Current Landscape\n");
    text.push_str(
        "Leading approaches, notable systems, and the organizations driving adoption.\n\n",
    );
    text.push_str("## Key Techniques\n");
    text.push_str(
        "Model architectures, training regimes, and evaluation practices commonly applied.\n\n",
    );
    text.push_str("## Challenges and Limitations\n");
    text.push_str(
        "Data quality, compute cost, reliability, and governance concerns practitioners face.\n\n",
    );
    text.push_str("## Outlook\n");
    text.push_str("Near-term research directions and expected industry impact.\n");
    text
}

fn generic_outline(topic: &str) -> String {
    format!(
        "Key points to cover about {topic}:\n\
         1. Definition and background of {topic}.\n\
         2. Why {topic} matters and who it affects.\n\
         3. Current trends and notable developments.\n\
         4. Common challenges and how they are addressed.\n\
         5. Practical takeaways and future outlook.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_topics_receive_sectioned_outline() {
        let text = fallback_research("AI in healthcare");
        assert!(text.contains("## Overview"));
        assert!(text.contains("## Outlook"));
    }

    #[test]
    fn classification_ignores_case() {
        assert!(is_ai_topic("Machine Learning for traders"));
        assert!(is_ai_topic("the future of ARTIFICIAL INTELLIGENCE"));
        assert!(!is_ai_topic("gardening tools"));
    }

    #[test]
    fn generic_topics_receive_five_point_outline() {
        let text = fallback_research("gardening tools");
        assert!(text.contains("1. Definition"));
        assert!(text.contains("5. Practical takeaways"));
        assert!(!text.contains("## Overview"));
    }

    #[test]
    fn tiers_differ_structurally() {
        let rich = fallback_research("artificial intelligence");
        let generic = fallback_research("gardening tools");
        assert!(rich.matches("##").count() > generic.matches("##").count());
    }
}
