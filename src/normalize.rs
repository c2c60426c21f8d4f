//! Markup and title normalization.
//!
//! Raw documents arrive as Markdown, HTML, or a mixture of both. Before any
//! token accounting happens the text is reduced to plain prose: tags stripped,
//! link syntax unwrapped, emphasis markers collapsed, whitespace normalized.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::Html;

static MD_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid image regex"));
static MD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));
static MD_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#*_`]+").expect("valid marker regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strips HTML and Markdown noise from raw document text.
///
/// Returns plain prose with runs of whitespace collapsed to a single space.
/// An empty return value means the document is unusable; callers skip it with
/// a warning rather than treating it as success. This function never panics
/// on malformed input — the HTML parser is lenient and the regex passes are
/// total.
pub fn clean_text(raw: &str) -> String {
    let document = Html::parse_document(raw);
    let text: String = document.root_element().text().collect();

    // Unwrap images before links so `![alt](url)` never matches the link rule.
    let text = MD_IMAGE.replace_all(&text, "");
    let text = MD_LINK.replace_all(&text, "$1");
    let text = MD_MARKERS.replace_all(&text, " ");
    let text = strip_loose_hyphens(&text);
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Replaces hyphens that do not touch a word character on either side.
///
/// `well-known` keeps its hyphen; a bare `-` list bullet becomes a space.
fn strip_loose_hyphens(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let is_word = |c: &char| c.is_alphanumeric() || *c == '_';
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if *c != '-' {
                return *c;
            }
            let before = i.checked_sub(1).and_then(|p| chars.get(p)).is_some_and(is_word);
            let after = chars.get(i + 1).is_some_and(is_word);
            if before || after { '-' } else { ' ' }
        })
        .collect()
}

/// Normalizes a filename stem into a human-readable document title.
///
/// Percent-escapes are decoded, hyphens and underscores become spaces, and
/// anything outside alphanumerics, whitespace, and hyphens is dropped. The
/// result may be empty; callers must fall back to the unmodified stem so a
/// record never carries an empty title.
pub fn clean_title(raw: &str) -> String {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    let spaced: String = decoded
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_tags() {
        let cleaned = clean_text("<html><body><p>hello <b>world</b></p></body></html>");
        assert_eq!(cleaned, "hello world");
    }

    #[test]
    fn unwraps_markdown_links() {
        assert_eq!(clean_text("see [the docs](https://example.com) here"), "see the docs here");
    }

    #[test]
    fn removes_markdown_images() {
        assert_eq!(clean_text("before ![diagram](img.png) after"), "before after");
    }

    #[test]
    fn collapses_emphasis_and_headings() {
        assert_eq!(clean_text("# Title\n\n**bold** and _em_ and `code`"), "Title bold and em and code");
    }

    #[test]
    fn keeps_word_adjacent_hyphens() {
        assert_eq!(clean_text("a well-known - example"), "a well-known example");
    }

    #[test]
    fn empty_input_cleans_to_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("<html><body></body></html>"), "");
    }

    #[test]
    fn title_decodes_and_spaces() {
        assert_eq!(clean_title("Getting%20Started-with_rust"), "Getting Started with rust");
    }

    #[test]
    fn title_drops_unsafe_characters() {
        assert_eq!(clean_title("Q&A: setup (v2)!"), "QA setup v2");
    }

    #[test]
    fn title_can_clean_to_empty() {
        assert_eq!(clean_title("!!!"), "");
    }
}
