use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::router::Route;

/// Split the screen into the navigation bar and the content area below it
pub fn layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(area);
    (chunks[0], chunks[1])
}

pub fn render_navbar<B: Backend>(frame: &mut Frame<B>, area: Rect, route: &Route) {
    // the add-project form takes letters as input
    let hint = if *route == Route::Home { "  |  <L> Logout  <Q> Quit" } else { "" };
    let bar = Paragraph::new(Spans::from(vec![
        Span::styled(
            "Project Desk",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(route.path(), Style::default().fg(Color::Gray)),
        Span::raw(hint),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(bar, area);
}
