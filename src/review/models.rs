//! Data models for the review flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decks::Card;

/// The four answer buckets. The wire scores are the SM-2 quality values the
/// scheduler expects; the 1-4 values below are only key positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// Quality score submitted to the scheduler (0-5 scale).
    pub fn score(self) -> u8 {
        match self {
            Rating::Again => 0,
            Rating::Hard => 2,
            Rating::Good => 3,
            Rating::Easy => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Again => "Again",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }

    /// Map the 1-4 rating keys to their buckets.
    pub fn from_key(digit: u8) -> Option<Rating> {
        match digit {
            1 => Some(Rating::Again),
            2 => Some(Rating::Hard),
            3 => Some(Rating::Good),
            4 => Some(Rating::Easy),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RateRequest {
    pub rating: u8,
}

/// Acknowledgement for a submitted rating. The schedule itself stays
/// server-side; this is informational only.
#[derive(Debug, Clone, Deserialize)]
pub struct RateAck {
    #[serde(default)]
    pub next_review_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interval_days: Option<i64>,
}

/// `review/next/` returns either a due card or a no-cards sentinel.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NextCardResponse {
    Card(Card),
    Done { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_scores_match_scheduler_scale() {
        assert_eq!(Rating::Again.score(), 0);
        assert_eq!(Rating::Hard.score(), 2);
        assert_eq!(Rating::Good.score(), 3);
        assert_eq!(Rating::Easy.score(), 5);
    }

    #[test]
    fn test_rating_keys_map_positionally() {
        assert_eq!(Rating::from_key(1), Some(Rating::Again));
        assert_eq!(Rating::from_key(2), Some(Rating::Hard));
        assert_eq!(Rating::from_key(3), Some(Rating::Good));
        assert_eq!(Rating::from_key(4), Some(Rating::Easy));
        assert_eq!(Rating::from_key(0), None);
        assert_eq!(Rating::from_key(5), None);
    }

    #[test]
    fn test_next_card_decodes_a_card() {
        let next: NextCardResponse = serde_json::from_str(
            r#"{"id": 42, "deck": 3, "front": "Q", "back": "A"}"#,
        )
        .unwrap();
        assert!(matches!(next, NextCardResponse::Card(card) if card.id == 42));
    }

    #[test]
    fn test_next_card_decodes_the_sentinel() {
        let next: NextCardResponse =
            serde_json::from_str(r#"{"message": "No cards due for review"}"#).unwrap();
        assert!(matches!(next, NextCardResponse::Done { message } if message.contains("No cards")));
    }
}
