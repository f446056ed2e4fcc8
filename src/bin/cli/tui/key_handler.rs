use crossterm::event::{KeyCode, KeyEvent};

use recallforge::review::{Rating, ReviewPhase};

use super::ReviewTui;

pub fn handle_key(state: &mut ReviewTui, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash = None;

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.quit = true,
        KeyCode::Char(' ') | KeyCode::Enter => {
            // The session refuses flips outside the question side
            state.session.flip();
        }
        KeyCode::Char('h') => {
            if state.session.phase() == ReviewPhase::Front && !state.session.reveal_hint() {
                state.flash = Some("No hint for this card".to_string());
            }
        }
        KeyCode::Char(c @ '1'..='4') => {
            if state.session.phase() != ReviewPhase::Back {
                return;
            }
            if let Some(rating) = Rating::from_key(c as u8 - b'0') {
                let outcome = state.runtime.block_on(state.session.rate(rating));
                if let Err(err) = outcome {
                    state.flash = Some(format!("Rating failed: {}", err));
                }
            }
        }
        KeyCode::Char('r') => {
            if state.session.phase() == ReviewPhase::Completed {
                state.runtime.block_on(state.session.restart());
            }
        }
        _ => {}
    }
}
