//! Markup querying, document caching, and schedule/proceedings parsing.
//!
//! The pipeline treats markup traversal as a capability: parsers depend on
//! the [`MarkupQuery`]/[`MarkupRegion`] interface, never on a concrete HTML
//! engine. [`HtmlDocument`] is the production implementation.
//!
//! Raw documents are pulled through the persisted [`DocumentCache`], which
//! wraps an injected [`Fetch`] collaborator so tests never touch the
//! network.

pub mod cache;
pub mod error;
pub mod markup;
pub mod parser;

pub use cache::{DocumentCache, Fetch, HttpFetcher};
pub use error::{ScrapeError, ScrapeResult};
pub use markup::{HtmlDocument, Locator, MarkupQuery, MarkupRegion};
pub use parser::{extract_abstract, extract_cards, extract_proceedings_links};
