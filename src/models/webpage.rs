use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use super::WebpageId;
use crate::error::{CatalogError, Result};
use crate::normalizer::contains_text;

/// A saved reference URL with a topic label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webpage {
    pub id: WebpageId,
    pub topic: String,
    pub url: String,
}

impl Webpage {
    /// Returns an HTML anchor for this page.
    pub fn hyperlink(&self) -> Result<String> {
        format_hyperlink(&self.topic, &self.url)
    }
}

/// Formats an HTML anchor whose text is the trimmed topic with its first
/// letter upper-cased and the rest lower-cased.
///
/// # Errors
///
/// Returns [`CatalogError::Validation`] if either field has no text.
///
/// # Examples
///
/// ```
/// use yesod::models::format_hyperlink;
///
/// assert_eq!(
///     format_hyperlink(" hebrew verbs", "https://example.com/verbs").unwrap(),
///     r#"<A HREF="https://example.com/verbs">Hebrew verbs</A>"#
/// );
/// assert!(format_hyperlink("", "https://example.com").is_err());
/// ```
pub fn format_hyperlink(topic: &str, url: &str) -> Result<String> {
    if !contains_text(topic) {
        return Err(CatalogError::validation("topic"));
    }
    if !contains_text(url) {
        return Err(CatalogError::validation("url"));
    }
    Ok(format!(r#"<A HREF="{}">{}</A>"#, url.trim(), capitalize(topic.trim())))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Decodes `%XX` escapes in a URL for display.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
///
/// # Examples
///
/// ```
/// use yesod::models::decode_url;
///
/// assert_eq!(
///     decode_url("https://he.wikipedia.org/wiki/%D7%A9%D7%9C%D7%95%D7%9D"),
///     "https://he.wikipedia.org/wiki/שלום"
/// );
/// ```
pub fn decode_url(url: &str) -> String {
    percent_decode_str(url).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperlink_capitalizes_topic() {
        let page = Webpage {
            id: WebpageId::new(1),
            topic: "BINYANIM".to_string(),
            url: "https://example.com".to_string(),
        };
        assert_eq!(
            page.hyperlink().unwrap(),
            r#"<A HREF="https://example.com">Binyanim</A>"#
        );
    }

    #[test]
    fn hyperlink_requires_text_in_both_fields() {
        assert!(matches!(
            format_hyperlink("  ", "https://example.com"),
            Err(CatalogError::Validation { field: "topic" })
        ));
        assert!(matches!(
            format_hyperlink("verbs", "..."),
            Err(CatalogError::Validation { field: "url" })
        ));
    }

    #[test]
    fn hebrew_topic_is_left_as_is() {
        assert_eq!(
            format_hyperlink("פעלים", "u1").unwrap(),
            r#"<A HREF="u1">פעלים</A>"#
        );
    }

    #[test]
    fn decode_leaves_plain_urls_alone() {
        assert_eq!(decode_url("https://example.com/a b"), "https://example.com/a b");
    }

    #[test]
    fn decode_replaces_invalid_utf8() {
        assert_eq!(decode_url("x%FFy"), "x\u{FFFD}y");
    }
}
