//! Raw schedule card scraped from the conference programme.

use serde::{Deserialize, Serialize};

/// One scraped schedule entry (talk, tutorial, poster, break, ...).
///
/// A card is immutable once parsed: the schedule text is resolved into a
/// [`TimeRange`](crate::TimeRange) and the card plus its range are combined
/// into a [`NormalizedEvent`](crate::NormalizedEvent) downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCard {
    /// Numeric event identifier taken from the card's markup ID.
    pub id: u64,
    /// The event category label (e.g. "Tutorial", "Invited Talk").
    pub type_label: String,
    /// The raw schedule line ("Mon Dec 3rd 05:00 -- 07:00 PM @ Room 210").
    pub schedule_text: String,
    /// The event's display name.
    pub name_text: String,
    /// Speaker names from the card footer, each trimmed.
    pub speakers: Vec<String>,
}

impl RawCard {
    /// Creates a card with no speakers.
    pub fn new(
        id: u64,
        type_label: impl Into<String>,
        schedule_text: impl Into<String>,
        name_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            type_label: type_label.into(),
            schedule_text: schedule_text.into(),
            name_text: name_text.into(),
            speakers: Vec::new(),
        }
    }

    /// Builder method to set the speaker list.
    pub fn with_speakers(mut self, speakers: Vec<String>) -> Self {
        self.speakers = speakers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_builder() {
        let card = RawCard::new(12879, "Tutorial", "Mon Dec 3rd @ 517 D", "Intro")
            .with_speakers(vec!["Ada Lovelace".into(), "Alan Turing".into()]);

        assert_eq!(card.id, 12879);
        assert_eq!(card.type_label, "Tutorial");
        assert_eq!(card.speakers.len(), 2);
    }

    #[test]
    fn serde_roundtrip() {
        let card = RawCard::new(7, "Break", "Mon @ Hall", "Coffee Break");
        let json = serde_json::to_string(&card).unwrap();
        let parsed: RawCard = serde_json::from_str(&json).unwrap();
        assert_eq!(card, parsed);
    }
}
