//! Reply-to-transcript formatting.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"- (.*?)(<br>|$)").expect("list item pattern"));

/// Convert a raw reply into transcript markup. The three transforms run in
/// order: paired `**` to bold spans, newlines to `<br>`, then dash lines to
/// `<li>` items. Not idempotent: call exactly once per raw reply.
pub fn format_reply(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let formatted = BOLD.replace_all(text, "<b>$1</b>");
    let formatted = formatted.replace('\n', "<br>");
    LIST_ITEM.replace_all(&formatted, "<li>$1</li>").into_owned()
}
