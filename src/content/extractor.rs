// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML to readable text

use scraper::{ElementRef, Html, Node};

/// Elements whose text never reaches the summarizer
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// Extract readable text from an HTML page
///
/// Drops script, style and page chrome (nav, header, footer), then normalizes
/// the remaining text: every line and every double-space separated phrase is
/// trimmed, empty pieces are dropped, and the pieces are joined with newlines.
/// The result is truncated to `max_chars` characters on a word boundary.
pub fn extract_readable_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    truncate_content(&clean_text(&raw), max_chars)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    if !SKIPPED_ELEMENTS.contains(&child_element.value().name()) {
                        collect_text(child_element, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Trim lines and phrases, drop the empty ones
fn clean_text(text: &str) -> String {
    text.lines()
        .flat_map(|line| line.trim().split("  "))
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate content to max_chars, preserving word boundaries
fn truncate_content(text: &str, max_chars: usize) -> String {
    let cut = match text.char_indices().nth(max_chars) {
        Some((index, _)) => index,
        None => return text.to_string(),
    };

    let truncated = &text[..cut];
    if text[cut..].starts_with(char::is_whitespace) {
        return format!("{}...", truncated.trim_end());
    }
    match truncated.rfind(char::is_whitespace) {
        Some(last_space) if last_space > 0 => format!("{}...", &text[..last_space]),
        _ => format!("{}...", truncated),
    }
}
