use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::components::popup::centered_rect;

pub enum LoginAction {
    SignIn(String),
    Quit,
}

// Represents the state of the login screen
#[derive(Default)]
pub struct LoginState {
    token: String,
    error: Option<String>,
}

impl LoginState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &LoginState) {
    let area = centered_rect(60, 50, frame.size());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ].as_ref())
        .split(area);

    let title = Paragraph::new("Project Desk")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let masked = "*".repeat(state.token.chars().count());
    let input = Paragraph::new(Spans::from(vec![
        Span::raw(masked),
        Span::styled("|", Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().title("Access token").borders(Borders::ALL));
    frame.render_widget(input, chunks[1]);

    if let Some(error) = &state.error {
        let error = Paragraph::new(error.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red));
        frame.render_widget(error, chunks[2]);
    }

    let help = Paragraph::new("Enter - Sign in | Esc - Quit")
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(help, chunks[3]);
}

pub fn handle_input(state: &mut LoginState, key: KeyCode) -> Option<LoginAction> {
    match key {
        KeyCode::Esc => return Some(LoginAction::Quit),
        KeyCode::Enter => {
            let token = state.token.trim();
            if token.is_empty() {
                state.error = Some("Enter an access token to continue.".to_string());
            } else {
                return Some(LoginAction::SignIn(token.to_string()));
            }
        }
        KeyCode::Backspace => {
            state.token.pop();
        }
        KeyCode::Char(c) => {
            state.token.push(c);
            state.error = None;
        }
        _ => {}
    }
    None
}
