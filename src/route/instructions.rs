use regex::Regex;
use std::sync::LazyLock;

static BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*/?\s*(?:div|br|p)\b[^>]*>").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip markup from a provider's rich-text instruction.
///
/// Block tags become a space so adjacent sentences stay apart.
pub fn to_plain_text(html: &str) -> String {
    let text = BLOCK_TAG.replace_all(html, " ");
    let text = TAG.replace_all(&text, "");
    let text = text.replace("&nbsp;", " ").replace("&amp;", "&");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
