use anyhow::Result;

use recallforge::decks::{self, NewDeck};

use crate::app::App;

pub async fn run_decks(app: &App) -> Result<()> {
    let decks = decks::list_decks(&app.client).await?;
    if decks.is_empty() {
        println!("No decks yet.");
        return Ok(());
    }

    for deck in decks {
        match deck.description_text() {
            Some(text) => println!("{:>5}  {}  ({})", deck.id, deck.name, text),
            None => println!("{:>5}  {}", deck.id, deck.name),
        }
    }
    Ok(())
}

pub async fn run_new(app: &App, name: &str, description: Option<String>) -> Result<()> {
    let deck = decks::create_deck(
        &app.client,
        &NewDeck {
            name: name.to_string(),
            description,
        },
    )
    .await?;
    println!("Created deck {} ({})", deck.id, deck.name);
    Ok(())
}

pub async fn run_rm(app: &App, id: i64) -> Result<()> {
    decks::delete_deck(&app.client, id).await?;
    println!("Deleted deck {}", id);
    Ok(())
}

pub async fn run_cards(app: &App, deck: Option<i64>) -> Result<()> {
    let cards = decks::list_cards(&app.client, deck).await?;
    println!("{} card(s)", cards.len());

    for card in cards {
        println!("{:>5}  {}  /  {}", card.id, card.front, card.back);
    }
    Ok(())
}
