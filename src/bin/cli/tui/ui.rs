use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Wrap};

use recallforge::review::{CompletionReason, ReviewPhase};

use super::ReviewTui;

pub fn draw(f: &mut Frame, state: &ReviewTui) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(2),
    ])
    .areas(f.area());

    draw_header(f, state, header);
    match state.session.phase() {
        ReviewPhase::Completed => draw_completed(f, state, body),
        _ => draw_card(f, state, body),
    }
    draw_footer(f, state, footer);
}

fn draw_header(f: &mut Frame, state: &ReviewTui, area: Rect) {
    let deck = state.deck_name.as_deref().unwrap_or("All decks");
    let line = Line::from(vec![
        Span::styled(deck, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  ·  {} reviewed", state.session.review_count())),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_card(f: &mut Frame, state: &ReviewTui, area: Rect) {
    let phase = state.session.phase();
    let Some(card) = state.session.card() else {
        f.render_widget(Paragraph::new("Loading..."), area);
        return;
    };

    let mut lines = vec![
        Line::styled("QUESTION", Style::default().fg(Color::DarkGray)),
        Line::raw(card.front.clone()),
    ];

    if state.session.hint_shown() {
        if let Some(hint) = card.hint_text() {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                format!("Hint: {}", hint),
                Style::default().fg(Color::Yellow),
            ));
        }
    }

    if matches!(phase, ReviewPhase::Back | ReviewPhase::Submitting) {
        lines.push(Line::raw(""));
        lines.push(Line::styled("ANSWER", Style::default().fg(Color::DarkGray)));
        lines.push(Line::raw(card.back.clone()));
    }

    let title = match phase {
        ReviewPhase::Submitting => " Submitting... ",
        _ => " Card ",
    };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::bordered().title(title));
    f.render_widget(paragraph, area);
}

fn draw_completed(f: &mut Frame, state: &ReviewTui, area: Rect) {
    let message = match (state.session.completion(), state.session.review_count()) {
        (Some(CompletionReason::TransportFailure), _) => {
            "Could not reach the server. Try again later.".to_string()
        }
        (_, 0) => "No cards are due for review right now.".to_string(),
        (_, count) => format!("All done! You reviewed {} card(s) this session.", count),
    };

    let paragraph = Paragraph::new(vec![Line::raw(""), Line::raw(message)])
        .alignment(Alignment::Center)
        .block(Block::bordered().title(" Review complete "));
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, state: &ReviewTui, area: Rect) {
    let help = match state.session.phase() {
        ReviewPhase::Loading => "loading...",
        ReviewPhase::Front => "space/enter flip · h hint · q quit",
        ReviewPhase::Back => "1 Again · 2 Hard · 3 Good · 4 Easy · q quit",
        ReviewPhase::Submitting => "submitting rating...",
        ReviewPhase::Completed => "r review again · q quit",
    };

    let mut lines = vec![Line::styled(help, Style::default().fg(Color::DarkGray))];
    if let Some(flash) = &state.flash {
        lines.insert(0, Line::styled(flash.clone(), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(lines), area);
}
