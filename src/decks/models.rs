//! Data models for decks and their cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A collection of flashcards.
#[derive(Debug, Clone, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_deck: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Deck {
    /// Description, if a non-empty one is set.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|text| !text.is_empty())
    }
}

/// Payload for creating a deck.
#[derive(Debug, Serialize)]
pub struct NewDeck {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Difficulty the ingestion pipeline assigns to generated cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

/// One flashcard. The schedule fields are owned by the server; the client
/// never writes them.
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    pub id: i64,
    pub deck: i64,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub next_review_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Hint text, if the card carries a non-empty one.
    pub fn hint_text(&self) -> Option<&str> {
        self.hint.as_deref().filter(|hint| !hint.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_decodes_with_minimal_fields() {
        let card: Card = serde_json::from_str(
            r#"{"id": 42, "deck": 3, "front": "Q", "back": "A"}"#,
        )
        .unwrap();
        assert_eq!(card.id, 42);
        assert!(card.hint_text().is_none());
        assert!(card.tags.is_empty());
    }

    #[test]
    fn test_card_empty_hint_reads_as_absent() {
        let card: Card = serde_json::from_str(
            r#"{"id": 42, "deck": 3, "front": "Q", "back": "A", "hint": ""}"#,
        )
        .unwrap();
        assert!(card.hint_text().is_none());
    }

    #[test]
    fn test_card_decodes_full_payload() {
        let card: Card = serde_json::from_str(
            r#"{
                "id": 42,
                "deck": 3,
                "front": "Q",
                "back": "A",
                "hint": "think of the mnemonic",
                "difficulty": "intermediate",
                "tags": ["biology", "cells"],
                "next_review_at": "2026-08-05T12:00:00Z",
                "extracted_text_ignored": true
            }"#,
        )
        .unwrap();
        assert_eq!(card.hint_text(), Some("think of the mnemonic"));
        assert_eq!(card.difficulty, Some(Difficulty::Intermediate));
        assert_eq!(card.tags.len(), 2);
    }
}
