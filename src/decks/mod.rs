//! Read-side access to the deck catalogue.
//!
//! Decks and cards are plain server resources; the interesting client-side
//! behavior (review, ingestion) lives elsewhere. These calls exist so the
//! CLI can name decks, target ingestion, and refresh card lists when a job
//! completes.

pub(crate) mod models;

pub use models::{Card, Deck, Difficulty, NewDeck};

use crate::api::client::ApiClient;
use crate::api::error::ApiError;

pub async fn list_decks(client: &ApiClient) -> Result<Vec<Deck>, ApiError> {
    client.get_json("api/v1/decks/").await
}

pub async fn get_deck(client: &ApiClient, deck_id: i64) -> Result<Deck, ApiError> {
    client.get_json(&format!("api/v1/decks/{}/", deck_id)).await
}

pub async fn create_deck(client: &ApiClient, deck: &NewDeck) -> Result<Deck, ApiError> {
    client.post_json("api/v1/decks/", deck).await
}

pub async fn delete_deck(client: &ApiClient, deck_id: i64) -> Result<(), ApiError> {
    client.delete(&format!("api/v1/decks/{}/", deck_id)).await
}

/// List cards, optionally scoped to one deck.
pub async fn list_cards(client: &ApiClient, deck_id: Option<i64>) -> Result<Vec<Card>, ApiError> {
    match deck_id {
        Some(id) => {
            client
                .get_json_with_query("api/v1/cards/", &[("deck", id.to_string())])
                .await
        }
        None => client.get_json("api/v1/cards/").await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_for, spawn};
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn catalogue_api() -> Router {
        Router::new()
            .route(
                "/api/v1/decks/",
                get(|| async {
                    Json(json!([
                        {"id": 3, "name": "Biology", "description": "Cell biology notes"},
                        {"id": 4, "name": "Spanish", "description": ""},
                    ]))
                })
                .post(|Json(body): Json<serde_json::Value>| async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({"id": 5, "name": body["name"], "description": body["description"]})),
                    )
                        .into_response()
                }),
            )
            .route("/api/v1/decks/{id}/", delete(|| async { StatusCode::NO_CONTENT }))
            .route(
                "/api/v1/cards/",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let all = vec![
                        json!({"id": 1, "deck": 3, "front": "Q1", "back": "A1"}),
                        json!({"id": 2, "deck": 4, "front": "Q2", "back": "A2"}),
                    ];
                    let cards: Vec<_> = match params.get("deck") {
                        Some(deck) => all
                            .into_iter()
                            .filter(|card| card["deck"].to_string() == *deck)
                            .collect(),
                        None => all,
                    };
                    Json(json!(cards))
                }),
            )
    }

    #[tokio::test]
    async fn test_list_decks() {
        let base_url = spawn(catalogue_api()).await;
        let (client, _tokens, _dir) = client_for(&base_url);

        let decks = list_decks(&client).await.unwrap();
        assert_eq!(decks.len(), 2);
        assert_eq!(decks[0].name, "Biology");
        assert!(decks[1].description_text().is_none());
    }

    #[tokio::test]
    async fn test_create_and_delete_deck() {
        let base_url = spawn(catalogue_api()).await;
        let (client, _tokens, _dir) = client_for(&base_url);

        let deck = create_deck(
            &client,
            &NewDeck {
                name: "History".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(deck.id, 5);
        assert_eq!(deck.name, "History");

        delete_deck(&client, 5).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_cards_scoped_to_deck() {
        let base_url = spawn(catalogue_api()).await;
        let (client, _tokens, _dir) = client_for(&base_url);

        let cards = list_cards(&client, Some(3)).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, 1);

        let all = list_cards(&client, None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
