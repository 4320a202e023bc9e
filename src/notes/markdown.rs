//! Live markdown formatting for the notes editor.
//!
//! Each line is rendered to HTML independently. Markup characters are kept in
//! the output, wrapped in spans with the `md-token` class, so the editor can
//! show or hide them without changing the text the caret moves over.

use regex::{Captures, Regex};
use std::sync::OnceLock;

const TOKEN: &str = "md-token";

static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();
static INLINE_REGEX: OnceLock<Regex> = OnceLock::new();

fn heading_regex() -> &'static Regex {
    HEADING_REGEX.get_or_init(|| {
        Regex::new(r"^(#{1,6})(\s)(.*)$").expect("Invalid heading regex")
    })
}

/// Inline forms, tried left to right; at one position the earlier alternative
/// wins, so `**` is taken as bold before `*` can start italic.
fn inline_regex() -> &'static Regex {
    INLINE_REGEX.get_or_init(|| {
        Regex::new(r"`([^`]+)`|\*\*(.+?)\*\*|\*([^*]+?)\*|\[\[(.*?)\]\]")
            .expect("Invalid inline markdown regex")
    })
}

/// Escapes the characters that would otherwise be parsed as HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders one line of markdown to HTML.
///
/// Headings, blockquotes and list items are whole-line forms and take
/// precedence; otherwise inline code, bold, italic and wiki links are
/// rendered. The input is HTML-escaped first.
pub fn format_line(text: &str) -> String {
    let html = escape_html(text);

    if let Some(caps) = heading_regex().captures(&html) {
        let level = caps[1].len();
        return format!(
            r#"<span class="md-heading md-h{level} {TOKEN}">{}</span><span class="{TOKEN}">{}</span><span class="md-heading md-h{level}">{}</span>"#,
            &caps[1], &caps[2], &caps[3]
        );
    }

    if let Some(rest) = strip_marker(&html, "&gt;") {
        return format!(
            r#"<span class="md-quote"><span class="{TOKEN}">&gt; </span>{}</span>"#,
            format_inline(rest)
        );
    }

    if let Some(rest) = strip_marker(&html, "-") {
        return format!(
            r#"<span class="md-list-marker">- </span><span class="md-list-item">{}</span>"#,
            format_inline(rest)
        );
    }

    format_inline(&html)
}

/// Renders every line of a note, joined with `<br>`
pub fn format_document(text: &str) -> String {
    text.lines().map(format_line).collect::<Vec<_>>().join("<br>")
}

/// Strips `marker` plus one whitespace character from the start of `line`
fn strip_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        _ => None,
    }
}

/// Applies inline forms to already escaped text
fn format_inline(html: &str) -> String {
    inline_regex()
        .replace_all(html, |caps: &Captures<'_>| render_inline(caps))
        .into_owned()
}

fn render_inline(caps: &Captures<'_>) -> String {
    if let Some(code) = caps.get(1) {
        // Code content is shown verbatim
        return wrap("`", "md-code", code.as_str(), "`");
    }
    if let Some(bold) = caps.get(2) {
        return wrap("**", "md-bold", &format_inline(bold.as_str()), "**");
    }
    if let Some(italic) = caps.get(3) {
        return wrap("*", "md-italic", &format_inline(italic.as_str()), "*");
    }
    if let Some(link) = caps.get(4) {
        return wrap("[[", "md-wikilink", link.as_str(), "]]");
    }
    caps[0].to_string()
}

fn wrap(open: &str, class: &str, content: &str, close: &str) -> String {
    format!(
        r#"<span class="{TOKEN}">{open}</span><span class="{class}">{content}</span><span class="{TOKEN}">{close}</span>"#
    )
}
