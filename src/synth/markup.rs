//! Best-effort markdown to HTML repair for completions that ignored the
//! "HTML only" instruction.
//!
//! Heuristic and intentionally small: heading lines, `*` bullets, numbered
//! lines and inline links are converted, and the rest is split on blank lines
//! into paragraphs. Nested lists, tables and emphasis are not handled; list
//! items are not wrapped in `<ul>`/`<ol>`.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+(.+)$").expect("heading regex"));
static RE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\*\s+(.+)$").expect("bullet regex"));
static RE_NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\.\s+(.+)$").expect("numbered regex"));
static RE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link regex"));

/// True when the text carries no angle-bracket markup at all.
pub fn needs_repair(text: &str) -> bool {
    !text.contains('<') || !text.contains('>')
}

pub fn repair_markdown(text: &str) -> String {
    let out = RE_HEADING.replace_all(text, "<h3>${1}</h3>");
    let out = RE_BULLET.replace_all(&out, "<li>${1}</li>");
    let out = RE_NUMBERED.replace_all(&out, "<li>${1}</li>");
    let out = RE_LINK.replace_all(&out, r#"<a href="${2}">${1}</a>"#);

    out.split("\n\n").map(|p| format!("<p>{p}</p>")).collect()
}

/// Repair `text` only if it has no markup.
pub fn ensure_markup(text: String) -> String {
    if needs_repair(&text) {
        tracing::warn!("completion returned non-HTML content, converting to basic HTML");
        repair_markdown(&text)
    } else {
        text
    }
}
