//! Unified parsing engine for reference extraction.
//!
//! This module:
//! - Uses pulldown-cmark for the CommonMark foundation (front matter, markdown links, code)
//! - Tracks code block/inline code/HTML ranges to exclude from OFM regex parsing
//! - Uses regex only for Obsidian-specific syntax (wikilinks, embeds, tags)
//!
//! All public parsing APIs delegate to this engine internally.

use linkvault_core::{ExtractedReferences, FrontMatter};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::link_utils::{clean_link_body, is_external_url};

// ============================================================================
// Compiled regex patterns
// Only for Obsidian-specific syntax not handled by pulldown-cmark
// ============================================================================

/// Wikilink: [[target]] or [[target|display]]
static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]\n]+)\]\]").expect("valid wikilink regex"));

/// Embed: ![[target]] or ![[target|display]]
static EMBED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\[\]\n]+)\]\]").expect("valid embed regex"));

/// Tag: #tag or #parent/child (but not inside words or URLs)
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|[\s\[(,])#([\p{L}_][\p{L}\p{N}_\-/]*)").expect("valid tag regex")
});

#[inline]
fn has_wikilink(content: &str) -> bool {
    content.contains("[[")
}

#[inline]
fn has_tag(content: &str) -> bool {
    content.contains('#')
}

// ============================================================================
// Excluded ranges (code blocks, inline code, etc.)
// ============================================================================

/// Byte ranges to exclude from OFM regex parsing.
#[derive(Debug, Default, Clone)]
struct ExcludedRanges {
    ranges: Vec<Range<usize>>,
}

impl ExcludedRanges {
    /// Check if a byte offset falls within any excluded range.
    #[inline]
    fn contains(&self, offset: usize) -> bool {
        let idx = self.ranges.partition_point(|r| r.start <= offset);
        if idx == 0 {
            return false;
        }
        offset < self.ranges[idx - 1].end
    }

    fn add(&mut self, range: Range<usize>) {
        self.ranges.push(range);
    }

    /// Sort and merge overlapping ranges for binary search.
    fn optimize(&mut self) {
        if self.ranges.is_empty() {
            return;
        }
        self.ranges.sort_by_key(|r| r.start);

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(current) if range.start <= current.end => {
                    current.end = current.end.max(range.end);
                }
                _ => merged.push(range),
            }
        }
        self.ranges = merged;
    }
}

// ============================================================================
// Core parsing engine
// ============================================================================

/// Two-phase extraction engine:
/// 1. pulldown-cmark pass: front matter, markdown links, excluded ranges
/// 2. Regex pass: wikilinks, embeds and tags outside excluded ranges
pub(crate) struct ParseEngine<'a> {
    content: &'a str,
}

impl<'a> ParseEngine<'a> {
    pub(crate) fn new(content: &'a str) -> Self {
        Self { content }
    }

    pub(crate) fn parse(&self) -> ExtractedReferences {
        let mut result = ExtractedReferences::default();

        let (excluded, link_spans, body_start) = self.pulldown_pass(&mut result);
        let body = &self.content[body_start..];

        self.parse_wikilinks(body, body_start, &excluded, &mut result);
        self.parse_embeds(body, body_start, &excluded, &mut result);

        // `#` inside [[#Heading]], [[Note|#alias]] or [top](#top) is not a tag
        let mut tag_excluded = excluded;
        for span in WIKILINK.find_iter(body) {
            tag_excluded.add(body_start + span.start()..body_start + span.end());
        }
        for span in link_spans {
            tag_excluded.add(span);
        }
        tag_excluded.optimize();
        self.parse_tags(body, body_start, &tag_excluded, &mut result);

        // Front matter tags count as tags too, after the inline ones
        if let Some(fm) = &result.front_matter {
            result.tags.extend(
                fm.tags()
                    .into_iter()
                    .map(|t| t.trim_start_matches('#').to_string())
                    .filter(|t| !t.is_empty()),
            );
        }

        result
    }

    /// Phase 1: pulldown-cmark pass for CommonMark elements and excluded ranges.
    ///
    /// Returns the excluded ranges, the spans of markdown links and the
    /// offset where the body starts after any front matter.
    fn pulldown_pass(
        &self,
        result: &mut ExtractedReferences,
    ) -> (ExcludedRanges, Vec<Range<usize>>, usize) {
        let mut excluded = ExcludedRanges::default();
        let mut link_spans = Vec::new();
        let mut body_start: usize = 0;

        let mut opts = Options::empty();
        opts.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        opts.insert(Options::ENABLE_STRIKETHROUGH);
        opts.insert(Options::ENABLE_TABLES);
        opts.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(self.content, opts);

        let mut code_block_start: Option<usize> = None;
        let mut in_metadata = false;
        let mut metadata_content = String::new();

        for (event, range) in parser.into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(_)) => {
                    code_block_start = Some(range.start);
                }
                Event::End(TagEnd::CodeBlock) => {
                    let start = code_block_start.take().unwrap_or(range.start);
                    excluded.add(start..range.end);
                }
                Event::Code(_) | Event::Html(_) | Event::InlineHtml(_) => {
                    excluded.add(range);
                }

                Event::Start(Tag::MetadataBlock(_)) => {
                    in_metadata = true;
                    metadata_content.clear();
                }
                Event::End(TagEnd::MetadataBlock(_)) => {
                    in_metadata = false;
                    body_start = range.end;
                    result.front_matter = parse_front_matter(&metadata_content);
                }
                Event::Text(text) if in_metadata => {
                    metadata_content.push_str(&text);
                }

                Event::Start(Tag::Link { dest_url, .. }) if code_block_start.is_none() => {
                    link_spans.push(range);
                    let url = dest_url.trim();
                    if !url.is_empty() && !url.starts_with('#') && !is_external_url(url) {
                        result.markdown_links.push(url.to_string());
                    }
                }

                _ => {}
            }
        }

        excluded.optimize();
        (excluded, link_spans, body_start)
    }

    fn parse_wikilinks(
        &self,
        body: &str,
        body_offset: usize,
        excluded: &ExcludedRanges,
        result: &mut ExtractedReferences,
    ) {
        if !has_wikilink(body) {
            return;
        }

        for caps in WIKILINK.captures_iter(body) {
            let (Some(full_match), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let local_start = full_match.start();

            if excluded.contains(body_offset + local_start) {
                continue;
            }

            // Preceded by ! means it's an embed
            if local_start > 0 && body.as_bytes()[local_start - 1] == b'!' {
                continue;
            }

            if let Some(target) = clean_link_body(inner.as_str()) {
                result.wikilinks.push(target);
            }
        }
    }

    fn parse_embeds(
        &self,
        body: &str,
        body_offset: usize,
        excluded: &ExcludedRanges,
        result: &mut ExtractedReferences,
    ) {
        if !has_wikilink(body) {
            return;
        }

        for caps in EMBED.captures_iter(body) {
            let (Some(full_match), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            if excluded.contains(body_offset + full_match.start()) {
                continue;
            }

            if let Some(target) = clean_link_body(inner.as_str()) {
                result.embeds.push(target);
            }
        }
    }

    fn parse_tags(
        &self,
        body: &str,
        body_offset: usize,
        excluded: &ExcludedRanges,
        result: &mut ExtractedReferences,
    ) {
        if !has_tag(body) {
            return;
        }

        for caps in TAG.captures_iter(body) {
            let Some(tag_name) = caps.get(1) else {
                continue;
            };
            // The tag starts at the # character
            let global_start = body_offset + tag_name.start() - 1;

            if excluded.contains(global_start) {
                continue;
            }

            let name = tag_name.as_str().trim_end_matches('/');
            if !name.is_empty() {
                result.tags.push(name.to_string());
            }
        }
    }
}

/// YAML front matter as a key/value map; anything else is ignored.
fn parse_front_matter(yaml: &str) -> Option<FrontMatter> {
    if yaml.trim().is_empty() {
        return None;
    }
    match serde_yaml::from_str::<serde_json::Value>(yaml) {
        Ok(serde_json::Value::Object(map)) => Some(FrontMatter {
            data: map.into_iter().collect(),
        }),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Ignoring malformed front matter: {}", e);
            None
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
