//! RawCard to NormalizedEvent conversion.
//!
//! Combines a parsed card, its resolved time range, and the proceedings
//! lookup into the canonical record submitted to the calendar service.
//! The abstract text comes from the card's detail page through a
//! collaborator call; everything else is a pure function of the inputs.

use confcal_core::{NormalizedEvent, ProceedingsLinks, RawCard, TimeRange};
use confcal_scrape::ScrapeError;

use crate::error::SyncResult;

/// Builds the canonical event record for one card.
///
/// The description is the speaker list joined by `", "`, a blank line,
/// then the abstract fetched via `fetch_abstract`. Link resolution is by
/// exact title match: a proceedings hit links the event to the paper (and
/// its PDF); a miss is the documented fallback path and links the event
/// to its own detail page, with no attachment.
pub fn normalize_event<F>(
    card: &RawCard,
    time_range: TimeRange,
    links: &ProceedingsLinks,
    detail_url: &str,
    fetch_abstract: F,
) -> SyncResult<NormalizedEvent>
where
    F: FnOnce(u64) -> Result<String, ScrapeError>,
{
    let abstract_text = fetch_abstract(card.id)?;
    let description = format!("{}\n\n{}", card.speakers.join(", "), abstract_text);

    let (source_url, attachment_url) = match links.lookup(&card.name_text) {
        Some(paper_url) => (paper_url.to_string(), Some(format!("{paper_url}.pdf"))),
        None => (detail_url.to_string(), None),
    };

    Ok(NormalizedEvent {
        id: card.id,
        type_label: card.type_label.clone(),
        name: card.name_text.clone(),
        speakers: card.speakers.clone(),
        start: time_range.start,
        end: time_range.end,
        location: time_range.location,
        description,
        source_url,
        attachment_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn sample_range() -> TimeRange {
        let tz = FixedOffset::east_opt(-5 * 3600).unwrap();
        TimeRange::new(
            tz.with_ymd_and_hms(2018, 12, 4, 10, 0, 0).unwrap(),
            tz.with_ymd_and_hms(2018, 12, 4, 10, 20, 0).unwrap(),
            "Room 220 CD",
        )
    }

    #[test]
    fn proceedings_hit_links_paper_and_pdf() {
        let card = RawCard::new(
            12879,
            "Oral",
            "Tue Dec 4th 10:00 -- 10:20 AM @ Room 220 CD",
            "Attention Is All You Need",
        )
        .with_speakers(vec!["Ashish Vaswani".into()]);

        let mut links = ProceedingsLinks::new();
        links.insert(
            "Attention Is All You Need",
            "https://papers.example/paper/123",
        );

        let event = normalize_event(
            &card,
            sample_range(),
            &links,
            "https://conf.example/Schedule?showEvent=12879",
            |_| Ok("We propose attention.".to_string()),
        )
        .unwrap();

        assert_eq!(event.source_url, "https://papers.example/paper/123");
        assert_eq!(
            event.attachment_url.as_deref(),
            Some("https://papers.example/paper/123.pdf")
        );
        assert_eq!(
            event.description,
            "Ashish Vaswani\n\nWe propose attention."
        );
    }

    #[test]
    fn lookup_miss_falls_back_to_the_detail_page() {
        let card = RawCard::new(
            12880,
            "Invited Talk",
            "Tue Dec 4th 10:00 -- 10:20 AM @ Room 220 CD",
            "An Unpublished Talk",
        );

        let event = normalize_event(
            &card,
            sample_range(),
            &ProceedingsLinks::new(),
            "https://conf.example/Schedule?showEvent=12880",
            |_| Ok("Abstract.".to_string()),
        )
        .unwrap();

        assert_eq!(
            event.source_url,
            "https://conf.example/Schedule?showEvent=12880"
        );
        assert_eq!(event.attachment_url, None);
    }

    #[test]
    fn multiple_speakers_join_with_comma() {
        let card = RawCard::new(1, "Tutorial", "sched", "Name")
            .with_speakers(vec!["Ada".into(), "Alan".into(), "Grace".into()]);

        let event = normalize_event(
            &card,
            sample_range(),
            &ProceedingsLinks::new(),
            "https://conf.example/1",
            |_| Ok("Body.".to_string()),
        )
        .unwrap();

        assert!(event.description.starts_with("Ada, Alan, Grace\n\n"));
    }

    #[test]
    fn abstract_fetch_failure_propagates() {
        let card = RawCard::new(2, "Oral", "sched", "Name");
        let err = normalize_event(
            &card,
            sample_range(),
            &ProceedingsLinks::new(),
            "https://conf.example/2",
            |id| Err(ScrapeError::malformed_card(id.to_string(), "abstract")),
        )
        .unwrap_err();

        assert!(err.to_string().contains("`abstract`"));
    }
}
