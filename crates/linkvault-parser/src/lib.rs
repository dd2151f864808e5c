//! # Linkvault Parser
//!
//! Reference extraction for Obsidian Flavored Markdown (OFM) notes, built on
//! `pulldown-cmark`.
//!
//! The graph builder only needs three lists per note: raw wikilink targets,
//! raw embed targets and tags. This crate produces them through the
//! [`ReferenceExtractor`] trait so that another dialect can be plugged in.
//!
//! ## Architecture
//!
//! ### Phase 1: pulldown-cmark pass
//! - Extracts YAML front matter and relative markdown links
//! - Builds excluded ranges (code blocks, inline code, HTML) for Phase 2
//!
//! ### Phase 2: Regex pass (OFM extensions)
//! - Wikilinks `[[]]`, embeds `![[]]`, tags `#tag`
//! - **Skips excluded ranges** to avoid matching inside code blocks
//!
//! Malformed spans (`[[]]`, an unterminated `[[`) never fail a note; they
//! simply produce no reference.
//!
//! ## Quick Start
//!
//! ```
//! use linkvault_parser::{OfmExtractor, ReferenceExtractor};
//!
//! let refs = OfmExtractor.extract("[[Note|alias]] ![[song.mp3]] #music [[Note#Intro]]");
//! assert_eq!(refs.wikilinks, vec!["Note", "Note#Intro"]);
//! assert_eq!(refs.embeds, vec!["song.mp3"]);
//! assert_eq!(refs.tags, vec!["music"]);
//! ```

mod engine;
pub mod link_utils;

pub use linkvault_core::{ExtractedReferences, FrontMatter};

/// Pluggable tokenizer producing raw references for one note.
///
/// Implementations must be pure: the same text always yields the same
/// references, in source order.
pub trait ReferenceExtractor {
    /// Extract wikilinks, embeds, tags (and extras) from note text
    fn extract(&self, text: &str) -> ExtractedReferences;
}

/// Default extractor for Obsidian Flavored Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct OfmExtractor;

impl ReferenceExtractor for OfmExtractor {
    fn extract(&self, text: &str) -> ExtractedReferences {
        engine::ParseEngine::new(text).parse()
    }
}

impl<F> ReferenceExtractor for F
where
    F: Fn(&str) -> ExtractedReferences,
{
    fn extract(&self, text: &str) -> ExtractedReferences {
        self(text)
    }
}

/// Parse wikilink targets from content.
///
/// # Example
/// ```
/// use linkvault_parser::parse_wikilinks;
///
/// let links = parse_wikilinks("See [[Note]] and [[Other|alias]]");
/// assert_eq!(links, vec!["Note", "Other"]);
/// ```
pub fn parse_wikilinks(content: &str) -> Vec<String> {
    OfmExtractor.extract(content).wikilinks
}

/// Parse embed targets from content.
///
/// # Example
/// ```
/// use linkvault_parser::parse_embeds;
///
/// let embeds = parse_embeds("![[image.png]] and ![[Note]]");
/// assert_eq!(embeds.len(), 2);
/// ```
pub fn parse_embeds(content: &str) -> Vec<String> {
    OfmExtractor.extract(content).embeds
}

/// Parse tags from content.
///
/// # Example
/// ```
/// use linkvault_parser::parse_tags;
///
/// let tags = parse_tags("Has #tag and #nested/tag");
/// assert_eq!(tags, vec!["tag", "nested/tag"]);
/// ```
pub fn parse_tags(content: &str) -> Vec<String> {
    OfmExtractor.extract(content).tags
}

/// Convenient prelude for common imports.
pub mod prelude {
    pub use crate::{
        ExtractedReferences, FrontMatter, OfmExtractor, ReferenceExtractor, parse_embeds,
        parse_tags, parse_wikilinks,
    };
}
