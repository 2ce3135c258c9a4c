//! Conversion of raw markdown into a flat heading/paragraph document model.
//!
//! The output block sequence is the sole input contract of the external
//! document writer. Conversion is deliberately a flat list: block order is
//! preserved and no heading-hierarchy validation is performed (a level-3
//! heading may directly follow a level-1 heading).

use serde::{Deserialize, Serialize};

/// Deepest heading level supported by the target document format.
pub const MAX_HEADING_LEVEL: u8 = 9;

/// One block of the document model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentBlock {
    /// Section heading with its depth.
    Heading {
        /// Heading depth in 1..=9; deeper input levels are clamped to 9.
        level: u8,
        /// Heading text; may be empty for a bare `#` run.
        text: String,
    },
    /// Plain paragraph with surrounding whitespace trimmed.
    Paragraph {
        /// Paragraph text.
        text: String,
    },
}

/// Parse a markdown string into an ordered block sequence.
///
/// Input is split on blank-line-delimited units. A unit starting with a `#`
/// run becomes a heading: the run length gives the level (clamped to
/// [1, `MAX_HEADING_LEVEL`]) and everything after the first
/// whitespace-separated token becomes the text, so a bare `#` run yields an
/// empty heading rather than being dropped. Whitespace-only units produce no
/// block. Pure function; structuring the same input twice yields identical
/// output.
pub fn structure(markdown: &str) -> Vec<DocumentBlock> {
    markdown.split("\n\n").filter_map(parse_block).collect()
}

fn parse_block(unit: &str) -> Option<DocumentBlock> {
    let trimmed = unit.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('#') {
        let hashes = trimmed.chars().take_while(|c| *c == '#').count();
        let level = hashes.min(MAX_HEADING_LEVEL as usize) as u8;
        let mut tokens = trimmed.split_whitespace();
        // First token is the `#` run itself; it may end the unit.
        let _marker = tokens.next();
        let text = tokens.collect::<Vec<_>>().join(" ");
        Some(DocumentBlock::Heading { level, text })
    } else {
        Some(DocumentBlock::Paragraph {
            text: trimmed.to_string(),
        })
    }
}
