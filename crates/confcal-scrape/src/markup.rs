//! Markup-query capability interface and its HTML implementation.
//!
//! Parsers locate tagged regions through [`MarkupQuery`] and read them
//! through [`MarkupRegion`]; only this module knows the underlying HTML
//! engine. Regions are owned snapshots, so they stay valid independently
//! of the document they were located in and can themselves be queried for
//! nested regions.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// A fixed pattern identifying markup regions of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Elements whose `id` attribute starts with the given prefix.
    IdPrefix(String),
    /// Elements whose class list contains the given token.
    ClassToken(String),
    /// Elements whose class list is exactly the given single token.
    ///
    /// Needed to tell apart regions that share a class token with more
    /// specific siblings (the schedule line is `class="maincardHeader"`,
    /// while the type label also carries `maincardHeader`).
    ClassExact(String),
    /// Anchor-like elements whose `href` contains the given fragment.
    HrefContains(String),
}

impl Locator {
    /// Locator for an `id` prefix.
    pub fn id_prefix(prefix: impl Into<String>) -> Self {
        Self::IdPrefix(prefix.into())
    }

    /// Locator for a class token.
    pub fn class_token(token: impl Into<String>) -> Self {
        Self::ClassToken(token.into())
    }

    /// Locator for an exact single-token class attribute.
    pub fn class_exact(token: impl Into<String>) -> Self {
        Self::ClassExact(token.into())
    }

    /// Locator for an `href` fragment.
    pub fn href_contains(fragment: impl Into<String>) -> Self {
        Self::HrefContains(fragment.into())
    }
}

/// A queryable markup scope (whole document or a nested region).
pub trait MarkupQuery {
    /// Returns all matching regions, in document order.
    ///
    /// On a region, matches are descendants only; a region never locates
    /// itself.
    fn locate(&self, locator: &Locator) -> Vec<Box<dyn MarkupRegion>>;
}

/// An owned snapshot of one located markup region.
pub trait MarkupRegion: MarkupQuery {
    /// The region's attribute value, if present.
    fn attr(&self, name: &str) -> Option<&str>;

    /// The region's concatenated text content.
    fn text(&self) -> &str;
}

/// HTML-backed implementation of [`MarkupQuery`].
pub struct HtmlDocument {
    doc: Html,
}

impl HtmlDocument {
    /// Parses a full HTML document.
    pub fn parse(markup: &str) -> Self {
        Self {
            doc: Html::parse_document(markup),
        }
    }

    fn parse_fragment(markup: &str) -> Self {
        Self {
            doc: Html::parse_fragment(markup),
        }
    }
}

impl MarkupQuery for HtmlDocument {
    fn locate(&self, locator: &Locator) -> Vec<Box<dyn MarkupRegion>> {
        match locator {
            Locator::ClassExact(token) => self.locate_class_exact(token),
            Locator::IdPrefix(prefix) => self.locate_css(&format!(r#"[id^="{prefix}"]"#)),
            Locator::ClassToken(token) => self.locate_css(&format!(r#"[class~="{token}"]"#)),
            Locator::HrefContains(fragment) => {
                self.locate_css(&format!(r#"[href*="{fragment}"]"#))
            }
        }
    }
}

impl HtmlDocument {
    fn locate_css(&self, css: &str) -> Vec<Box<dyn MarkupRegion>> {
        let selector = match Selector::parse(css) {
            Ok(selector) => selector,
            Err(err) => {
                debug!("invalid selector {css:?}: {err:?}");
                return Vec::new();
            }
        };
        self.doc
            .select(&selector)
            .map(|element| Box::new(HtmlRegion::from_element(element)) as Box<dyn MarkupRegion>)
            .collect()
    }

    fn locate_class_exact(&self, token: &str) -> Vec<Box<dyn MarkupRegion>> {
        let any = match Selector::parse("*") {
            Ok(selector) => selector,
            Err(_) => return Vec::new(),
        };
        self.doc
            .select(&any)
            .filter(|element| {
                element
                    .value()
                    .attr("class")
                    .is_some_and(|class| {
                        let mut tokens = class.split_whitespace();
                        tokens.next() == Some(token) && tokens.next().is_none()
                    })
            })
            .map(|element| Box::new(HtmlRegion::from_element(element)) as Box<dyn MarkupRegion>)
            .collect()
    }
}

/// Owned snapshot of one HTML element.
struct HtmlRegion {
    attrs: HashMap<String, String>,
    text: String,
    inner: HtmlDocument,
}

impl HtmlRegion {
    fn from_element(element: ElementRef<'_>) -> Self {
        let attrs = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        let text = element.text().collect::<String>();
        // Snapshot only the element's content: a nested locate matches
        // descendants, never the region's own tag.
        let inner = HtmlDocument::parse_fragment(&element.inner_html());
        Self { attrs, text, inner }
    }
}

impl MarkupQuery for HtmlRegion {
    fn locate(&self, locator: &Locator) -> Vec<Box<dyn MarkupRegion>> {
        self.inner.locate(locator)
    }
}

impl MarkupRegion for HtmlRegion {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <html><body>
          <div id="maincard_1" class="maincard narrower">
            <div class="pull-right maincardHeader maincardType">Tutorial</div>
            <div class="maincardHeader">Mon Dec 3rd @ Room A</div>
          </div>
          <div id="maincard_2" class="maincard">second card</div>
          <div id="sidebar_9">not a card</div>
          <a href="/paper/123-attention">Attention Is All You Need</a>
          <a href="/static/logo.png">logo</a>
        </body></html>
    "#;

    #[test]
    fn id_prefix_in_document_order() {
        let doc = HtmlDocument::parse(DOC);
        let regions = doc.locate(&Locator::id_prefix("maincard_"));

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].attr("id"), Some("maincard_1"));
        assert_eq!(regions[1].attr("id"), Some("maincard_2"));
    }

    #[test]
    fn class_exact_skips_multi_class_elements() {
        let doc = HtmlDocument::parse(DOC);

        let exact = doc.locate(&Locator::class_exact("maincardHeader"));
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].text(), "Mon Dec 3rd @ Room A");

        // The token locator sees both header-like elements.
        let tokens = doc.locate(&Locator::class_token("maincardHeader"));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn href_fragment_matches_anchors() {
        let doc = HtmlDocument::parse(DOC);
        let regions = doc.locate(&Locator::href_contains("/paper/"));

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].attr("href"), Some("/paper/123-attention"));
        assert_eq!(regions[0].text(), "Attention Is All You Need");
    }

    #[test]
    fn regions_support_nested_locates() {
        let doc = HtmlDocument::parse(DOC);
        let card = doc
            .locate(&Locator::id_prefix("maincard_1"))
            .into_iter()
            .next()
            .unwrap();

        let type_label = card.locate(&Locator::class_token("maincardType"));
        assert_eq!(type_label.len(), 1);
        assert_eq!(type_label[0].text(), "Tutorial");
    }

    #[test]
    fn nested_locate_never_returns_the_region_itself() {
        let doc = HtmlDocument::parse(
            r#"<div id="outer_1" class="item wrap">
                 <span class="item">first</span>
                 <span class="item">second</span>
               </div>"#,
        );
        let region = doc
            .locate(&Locator::id_prefix("outer_"))
            .into_iter()
            .next()
            .unwrap();

        // The region's own class list also carries the token; only the
        // descendants match.
        let items = region.locate(&Locator::class_token("item"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text(), "first");
        assert_eq!(items[1].text(), "second");
    }

    #[test]
    fn missing_attr_is_none() {
        let doc = HtmlDocument::parse(DOC);
        let card = doc
            .locate(&Locator::id_prefix("maincard_2"))
            .into_iter()
            .next()
            .unwrap();
        assert_eq!(card.attr("href"), None);
    }
}
