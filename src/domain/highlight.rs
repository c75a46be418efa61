//! Query term highlighting for snippets rendered as HTML

use std::collections::BTreeSet;

use regex::RegexBuilder;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// Escapes the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Splits a query into lowercase whitespace-separated tokens
pub fn query_tokens(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Escapes `text` and wraps every case-insensitive occurrence of each token in `<mark>`.
///
/// Tokens are matched against the raw text and each segment is escaped on
/// the way out, so a token never matches inside an entity the escaper
/// produced. Longer tokens win over shorter tokens they overlap with.
pub fn highlight<S: AsRef<str>>(text: Option<&str>, tokens: &[S]) -> String {
    let text = text.unwrap_or_default();

    let distinct: BTreeSet<String> = tokens
        .iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    if distinct.is_empty() || text.is_empty() {
        return escape_html(text);
    }

    let mut ordered: Vec<String> = distinct.into_iter().collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let alternation = ordered
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    let pattern = match RegexBuilder::new(&alternation).case_insensitive(true).build() {
        Ok(pattern) => pattern,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build highlight pattern");
            return escape_html(text);
        }
    };

    let mut highlighted = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for found in pattern.find_iter(text) {
        highlighted.push_str(&escape_html(&text[last..found.start()]));
        highlighted.push_str(MARK_OPEN);
        highlighted.push_str(&escape_html(found.as_str()));
        highlighted.push_str(MARK_CLOSE);
        last = found.end();
    }
    highlighted.push_str(&escape_html(&text[last..]));

    highlighted
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_no_tokens_equals_escape() {
        let text = "Fear of <death> & anguish";
        assert_eq!(highlight(Some(text), &NONE), escape_html(text));
        assert_eq!(highlight(Some(text), &["", "  "]), escape_html(text));
    }

    #[test]
    fn test_absent_text() {
        assert_eq!(highlight(None, &["fear"]), "");
    }

    #[test]
    fn test_script_is_escaped() {
        let result = highlight(Some("<script>"), &["x"]);
        assert!(!result.contains("<script>"));
        assert_eq!(result, "&lt;script&gt;");
    }

    #[test]
    fn test_preserves_original_casing() {
        assert_eq!(
            highlight(Some("Restlessness; restless at night"), &["RESTLESS"]),
            "<mark>Restless</mark>ness; <mark>restless</mark> at night"
        );
    }

    #[test]
    fn test_longest_token_wins() {
        assert_eq!(
            highlight(Some("restlessness"), &["rest", "restlessness"]),
            "<mark>restlessness</mark>"
        );
    }

    #[test]
    fn test_markup_not_rematched() {
        assert_eq!(
            highlight(Some("a mark"), &["a"]),
            "<mark>a</mark> m<mark>a</mark>rk"
        );
        assert_eq!(
            highlight(Some("mark the spot"), &["mark", "a"]),
            "<mark>mark</mark> the spot"
        );
    }

    #[test]
    fn test_token_with_special_characters() {
        assert_eq!(
            highlight(Some("Tom & Jerry (cat)"), &["& jerry", "(cat)"]),
            "Tom <mark>&amp; Jerry</mark> <mark>(cat)</mark>"
        );
    }

    #[test]
    fn test_tokens_never_match_inside_entities() {
        let text = "Tom & Jerry <b>";
        assert_eq!(highlight(Some(text), &["amp", "lt"]), escape_html(text));
        assert_eq!(
            highlight(Some("Hahnemann's \"Organon\""), &["quot", "39", "organon"]),
            "Hahnemann&#39;s &quot;<mark>Organon</mark>&quot;"
        );
    }

    #[test]
    fn test_markup_characters_in_tokens() {
        assert_eq!(
            highlight(Some("worse <after> eating"), &["<after>"]),
            "worse <mark>&lt;after&gt;</mark> eating"
        );
    }

    #[test]
    fn test_unmatched_tokens() {
        assert_eq!(highlight(Some("thirstless"), &["chilly"]), "thirstless");
    }

    #[test]
    fn test_query_tokens() {
        assert_eq!(query_tokens("  Fear  of DEATH "), vec!["fear", "of", "death"]);
    }
}
