use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;

use recallforge::review::{CompletionReason, DeckScope, Rating, ReviewPhase, ReviewSession};

use crate::app::App;

/// Line-based review loop, for terminals where the TUI is unwanted.
pub async fn run_plain(app: &App, deck: Option<i64>) -> Result<()> {
    let scope = match deck {
        Some(id) => DeckScope::Deck(id),
        None => DeckScope::All,
    };
    let mut session = ReviewSession::new(Arc::clone(&app.client), scope);
    session.start().await;

    loop {
        match session.phase() {
            ReviewPhase::Front => {
                let (front, hint) = match session.card() {
                    Some(card) => (card.front.clone(), card.hint_text().map(str::to_string)),
                    None => break,
                };
                println!();
                println!("Q: {}", front);

                let prompt = if hint.is_some() {
                    "[enter] reveal  [h] hint  [q] quit: "
                } else {
                    "[enter] reveal  [q] quit: "
                };
                match read_choice(prompt)?.as_str() {
                    "q" => break,
                    "h" => {
                        if session.reveal_hint() {
                            if let Some(hint) = &hint {
                                println!("Hint: {}", hint);
                            }
                        }
                    }
                    _ => {
                        session.flip();
                    }
                }
            }

            ReviewPhase::Back => {
                if let Some(card) = session.card() {
                    println!("A: {}", card.back);
                }
                match read_choice("[1] Again  [2] Hard  [3] Good  [4] Easy  [q] quit: ")?.as_str()
                {
                    "q" => break,
                    choice => match choice.parse::<u8>().ok().and_then(Rating::from_key) {
                        Some(rating) => {
                            if let Err(err) = session.rate(rating).await {
                                eprintln!("Rating failed: {}. Try again.", err);
                            }
                        }
                        None => println!("Please answer 1-4 or q."),
                    },
                }
            }

            ReviewPhase::Completed => {
                println!();
                match (session.completion(), session.review_count()) {
                    (Some(CompletionReason::TransportFailure), _) => {
                        println!("Review ended: could not reach the server.")
                    }
                    (_, 0) => println!("No cards are due for review right now."),
                    (_, count) => {
                        println!("All done! You reviewed {} card(s) this session.", count)
                    }
                }
                match read_choice("[r] review again  [q] quit: ")?.as_str() {
                    "r" => session.restart().await,
                    _ => break,
                }
            }

            // Transient phases resolve before control returns here
            ReviewPhase::Loading | ReviewPhase::Submitting => break,
        }
    }

    Ok(())
}

fn read_choice(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        // EOF quits
        return Ok("q".to_string());
    }
    Ok(line.trim().to_lowercase())
}
