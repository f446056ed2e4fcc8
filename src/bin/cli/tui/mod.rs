mod key_handler;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

use recallforge::decks;
use recallforge::review::{DeckScope, ReviewSession};

use crate::app::App;

/// State for the full-screen review loop.
pub struct ReviewTui<'a> {
    pub runtime: &'a tokio::runtime::Runtime,
    pub session: ReviewSession,
    pub deck_name: Option<String>,
    pub flash: Option<String>,
    pub quit: bool,
}

pub fn run(runtime: &tokio::runtime::Runtime, app: &App, deck: Option<i64>) -> Result<()> {
    let scope = match deck {
        Some(id) => DeckScope::Deck(id),
        None => DeckScope::All,
    };

    // Deck name is cosmetic; a failed lookup just falls back to the id-less header
    let deck_name = deck.and_then(|id| {
        runtime
            .block_on(decks::get_deck(&app.client, id))
            .ok()
            .map(|deck| deck.name)
    });

    let mut session = ReviewSession::new(Arc::clone(&app.client), scope);
    runtime.block_on(session.start());

    let mut state = ReviewTui {
        runtime,
        session,
        deck_name,
        flash: None,
        quit: false,
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Event loop
    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut ReviewTui) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, state))?;

        if state.quit {
            return Ok(());
        }

        // Poll for events with timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    key_handler::handle_key(state, key);
                }
            }
        }
    }
}
