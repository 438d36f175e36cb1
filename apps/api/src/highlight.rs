//! Keyword highlighter: deterministic markup pass over résumé text.
//!
//! Wraps a fixed vocabulary of résumé field labels in `<b>` tags and
//! normalises line breaks to `<br>`. One compiled alternation, one
//! replacement pass: a label that sits inside an already-wrapped match can
//! never be wrapped twice, so the pass is idempotent. Matching is anchored
//! on word boundaries so a label embedded in a longer token is left alone.
//!
//! No other HTML-significant characters are escaped. The output is treated
//! as trusted markup by the renderer.

use once_cell::sync::Lazy;
use regex::Regex;

/// The fixed set of résumé field labels highlighted in the output.
/// Immutable for the process lifetime.
pub const KEYWORDS: [&str; 8] = [
    "姓名",
    "专业",
    "电话",
    "邮箱",
    "教育背景",
    "个人获奖情况",
    "感兴趣的研究方向",
    "项目经历",
];

/// The line-break token emitted for every CRLF or LF in the input.
pub const BREAK_TAG: &str = "<br>";

// Optional surrounding <b>...</b> is consumed and re-emitted, which keeps
// repeated application from stacking tags.
static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = KEYWORDS.join("|");
    Regex::new(&format!(r"(?:<b>)?\b({alternation})\b(?:</b>)?")).unwrap()
});

/// Wraps every whole-word keyword occurrence in `<b>` tags, then replaces
/// every CRLF and every remaining LF with a single `<br>`.
///
/// CRLF is replaced before LF so one CRLF never yields two break tokens.
pub fn highlight(text: &str) -> String {
    let text = KEYWORD_RE.replace_all(text, "<b>$1</b>");
    let text = text.replace("\r\n", BREAK_TAG);
    text.replace('\n', BREAK_TAG)
}
