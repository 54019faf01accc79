//! Extraction of schedule cards and proceedings links from raw markup.
//!
//! The markers below are fixed properties of the source site's markup.
//! Card extraction walks every region whose identifier carries the card
//! prefix, in document order; that order is authoritative downstream.

use confcal_core::{ProceedingsLinks, RawCard};
use tracing::debug;

use crate::error::{ScrapeError, ScrapeResult};
use crate::markup::{Locator, MarkupQuery, MarkupRegion};

/// `id` prefix identifying one event card; the numeric suffix is the
/// event ID.
const CARD_ID_PREFIX: &str = "maincard_";
/// Class token of the card's category label.
const TYPE_CLASS: &str = "maincardType";
/// Exact class of the card's schedule line. The type label shares this
/// token, so the match must be on the full class attribute.
const SCHEDULE_CLASS: &str = "maincardHeader";
/// Class token of the card's display name.
const NAME_CLASS: &str = "maincardBody";
/// Class token of the card's speaker footer.
const FOOTER_CLASS: &str = "maincardFooter";
/// Class token of a detail page's abstract block.
const ABSTRACT_CLASS: &str = "abstractContainer";
/// Path fragment identifying proceedings anchors.
const PAPER_HREF_FRAGMENT: &str = "/paper/";
/// Delimiter between speaker names in the card footer.
const SPEAKER_DELIMITER: char = '·';

/// Extracts all event cards from a schedule document, in document order.
///
/// # Errors
///
/// A card region missing any required subfield fails with
/// [`ScrapeError::MalformedCard`] naming the field.
pub fn extract_cards(doc: &dyn MarkupQuery) -> ScrapeResult<Vec<RawCard>> {
    let regions = doc.locate(&Locator::id_prefix(CARD_ID_PREFIX));
    debug!("located {} card regions", regions.len());

    let mut cards = Vec::with_capacity(regions.len());
    for region in regions {
        cards.push(parse_card(&*region)?);
    }
    Ok(cards)
}

fn parse_card(region: &dyn MarkupRegion) -> ScrapeResult<RawCard> {
    let raw_id = region
        .attr("id")
        .ok_or_else(|| ScrapeError::malformed_card("<no id>", "id"))?;
    let id: u64 = raw_id
        .split('_')
        .nth(1)
        .and_then(|suffix| suffix.parse().ok())
        .ok_or_else(|| ScrapeError::malformed_card(raw_id, "id"))?;

    let type_label = required_text(region, &Locator::class_token(TYPE_CLASS), raw_id, "type")?;
    let schedule_text = required_text(
        region,
        &Locator::class_exact(SCHEDULE_CLASS),
        raw_id,
        "schedule",
    )?;
    let name_text = required_text(region, &Locator::class_token(NAME_CLASS), raw_id, "name")?;
    let footer_text = required_text(region, &Locator::class_token(FOOTER_CLASS), raw_id, "footer")?;

    let speakers = footer_text
        .split(SPEAKER_DELIMITER)
        .map(str::trim)
        .filter(|speaker| !speaker.is_empty())
        .map(String::from)
        .collect();

    Ok(RawCard::new(id, type_label, schedule_text, name_text).with_speakers(speakers))
}

/// Reads the first region matching `locator` inside `region`, trimmed.
fn required_text(
    region: &dyn MarkupRegion,
    locator: &Locator,
    card: &str,
    field: &'static str,
) -> ScrapeResult<String> {
    region
        .locate(locator)
        .into_iter()
        .next()
        .map(|sub| sub.text().trim().to_string())
        .ok_or_else(|| ScrapeError::malformed_card(card, field))
}

/// Extracts the proceedings title→URL table from a proceedings document.
///
/// Anchors are identified by a fixed path fragment; the recorded URL is
/// the base concatenated with the anchor's relative target. An absent
/// link table yields an empty mapping, not an error - proceedings linking
/// is best-effort downstream.
pub fn extract_proceedings_links(doc: &dyn MarkupQuery, papers_base: &str) -> ProceedingsLinks {
    let mut links = ProceedingsLinks::new();
    for region in doc.locate(&Locator::href_contains(PAPER_HREF_FRAGMENT)) {
        let Some(href) = region.attr("href") else {
            continue;
        };
        links.insert(region.text().trim(), format!("{papers_base}{href}"));
    }
    debug!("extracted {} proceedings links", links.len());
    links
}

/// Extracts the abstract/body text from an event detail page.
///
/// # Errors
///
/// A detail page without an abstract block is a malformed card.
pub fn extract_abstract(doc: &dyn MarkupQuery, card_id: u64) -> ScrapeResult<String> {
    doc.locate(&Locator::class_token(ABSTRACT_CLASS))
        .into_iter()
        .next()
        .map(|region| region.text().trim().to_string())
        .ok_or_else(|| ScrapeError::malformed_card(card_id.to_string(), "abstract"))
}
