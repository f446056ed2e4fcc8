use std::sync::Arc;

use anyhow::{bail, Result};

use recallforge::decks;
use recallforge::ingest::{IngestManager, PollEvent};

use crate::app::App;

pub async fn run(app: &App, url: &str, deck: i64) -> Result<()> {
    let manager = IngestManager::new(Arc::clone(&app.client));

    let (source, mut events) = manager.submit_and_watch(url, deck).await?;
    println!("Submitted source {} ({})", source.id, source.url);
    println!("  status: {}", source.status.as_str());

    while let Some(event) = events.recv().await {
        match event {
            PollEvent::Status(source) => {
                println!("  status: {}", source.status.as_str());
            }
            PollEvent::Completed(_) => {
                let cards = decks::list_cards(&app.client, Some(deck)).await?;
                println!("Completed. Deck {} now has {} card(s).", deck, cards.len());
                return Ok(());
            }
            PollEvent::Failed { reason, .. } => {
                bail!("Ingestion failed: {}", reason);
            }
        }
    }

    bail!("Ingestion watcher ended unexpectedly");
}
