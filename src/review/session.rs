//! One review session: fetch a due card, show the question, reveal the
//! answer, submit a rating, advance. The scheduler decides what is due and
//! when; the session only walks the turn-based state machine.

use std::sync::Arc;

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::decks::Card;

use super::models::{NextCardResponse, RateAck, RateRequest, Rating};

/// Which deck(s) a review session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckScope {
    All,
    Deck(i64),
}

/// Phases of one review turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    /// Fetching the next due card
    Loading,
    /// Question side showing
    Front,
    /// Answer side showing, awaiting a rating
    Back,
    /// Rating submission in flight
    Submitting,
    /// No card due, or the fetch failed (see [`CompletionReason`])
    Completed,
}

/// Why the session reached `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// The server reported no due card
    Exhausted,
    /// The next-card fetch failed; the session fails closed
    TransportFailure,
}

/// State machine for one review session.
pub struct ReviewSession {
    client: Arc<ApiClient>,
    scope: DeckScope,
    phase: ReviewPhase,
    card: Option<Card>,
    hint_shown: bool,
    review_count: u32,
    completion: Option<CompletionReason>,
}

impl ReviewSession {
    pub fn new(client: Arc<ApiClient>, scope: DeckScope) -> Self {
        Self {
            client,
            scope,
            phase: ReviewPhase::Loading,
            card: None,
            hint_shown: false,
            review_count: 0,
            completion: None,
        }
    }

    pub fn phase(&self) -> ReviewPhase {
        self.phase
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn scope(&self) -> DeckScope {
        self.scope
    }

    /// Cards rated this session. Resets only on [`restart`](Self::restart).
    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    pub fn hint_shown(&self) -> bool {
        self.hint_shown
    }

    /// Set once the session reaches `Completed`.
    pub fn completion(&self) -> Option<CompletionReason> {
        self.completion
    }

    /// Fetch the first card. Call once after construction.
    pub async fn start(&mut self) {
        self.fetch_next().await;
    }

    /// Reveal the answer side. Acts only on the question side; flipping an
    /// already-revealed card changes nothing. Returns whether a flip
    /// happened.
    pub fn flip(&mut self) -> bool {
        if self.phase != ReviewPhase::Front {
            return false;
        }
        self.phase = ReviewPhase::Back;
        true
    }

    /// Show the hint. Available on the question side, and only when the
    /// card carries one. Does not affect the flip state.
    pub fn reveal_hint(&mut self) -> bool {
        if self.phase != ReviewPhase::Front {
            return false;
        }
        let has_hint = self
            .card
            .as_ref()
            .and_then(|card| card.hint_text())
            .is_some();
        if !has_hint {
            return false;
        }
        self.hint_shown = true;
        true
    }

    /// Submit a rating for the current card and advance.
    ///
    /// Ignored unless the answer side is showing, so a rating can never be
    /// submitted twice for the same card and never from the question side.
    /// On a failed submission the card is kept and the session returns to
    /// the answer side; the counter does not move.
    pub async fn rate(&mut self, rating: Rating) -> Result<(), ApiError> {
        if self.phase != ReviewPhase::Back {
            return Ok(());
        }
        let card_id = match self.card.as_ref() {
            Some(card) => card.id,
            None => return Ok(()),
        };

        self.phase = ReviewPhase::Submitting;

        let path = format!("api/v1/review/{}/rate/", card_id);
        let request = RateRequest {
            rating: rating.score(),
        };
        match self.client.post_json::<_, RateAck>(&path, &request).await {
            Ok(ack) => {
                log::debug!(
                    "card {} rated {} ({}), next review {:?}",
                    card_id,
                    rating.label(),
                    rating.score(),
                    ack.next_review_at
                );
                self.review_count += 1;
                self.card = None;
                self.fetch_next().await;
                Ok(())
            }
            Err(err) => {
                log::warn!("rating submission for card {} failed: {}", card_id, err);
                self.phase = ReviewPhase::Back;
                Err(err)
            }
        }
    }

    /// Begin a fresh pass after the session completed: zero the counter,
    /// clear the completion state and fetch again.
    pub async fn restart(&mut self) {
        if self.phase != ReviewPhase::Completed {
            return;
        }
        self.review_count = 0;
        self.completion = None;
        self.fetch_next().await;
    }

    async fn fetch_next(&mut self) {
        self.phase = ReviewPhase::Loading;
        self.hint_shown = false;
        self.card = None;

        let result = match self.scope {
            DeckScope::All => {
                self.client
                    .get_json::<NextCardResponse>("api/v1/review/next/")
                    .await
            }
            DeckScope::Deck(id) => {
                self.client
                    .get_json_with_query::<NextCardResponse>(
                        "api/v1/review/next/",
                        &[("deck", id.to_string())],
                    )
                    .await
            }
        };

        match result {
            Ok(NextCardResponse::Card(card)) => {
                log::debug!("card {} due for review", card.id);
                self.card = Some(card);
                self.phase = ReviewPhase::Front;
            }
            Ok(NextCardResponse::Done { message }) => {
                log::info!("review session complete: {}", message);
                self.phase = ReviewPhase::Completed;
                self.completion = Some(CompletionReason::Exhausted);
            }
            Err(err) => {
                // Fail closed: a fetch error ends the session like an empty
                // queue, but the reason stays distinguishable here and in
                // `completion()`.
                log::warn!("failed to fetch next card, ending session: {}", err);
                self.phase = ReviewPhase::Completed;
                self.completion = Some(CompletionReason::TransportFailure);
            }
        }
    }
}
