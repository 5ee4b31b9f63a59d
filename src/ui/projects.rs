use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::listing::{ListingMessage, ProjectListing};
use crate::ui::components::popup::render_popup;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

// Represents the state of the project list screen
pub struct ProjectsState {
    pub listing: ProjectListing,
    search_mode: bool,
    notice: Option<String>,
    tick: usize,
}

impl Default for ProjectsState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectsState {
    pub fn new() -> Self {
        Self {
            listing: ProjectListing::new(),
            search_mode: false,
            notice: None,
            tick: 0,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.search_mode
    }

    /// Show a dismissable notice over the list
    pub fn show_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Advance the loading spinner
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}

pub enum ProjectAction {
    AddProject,
    ViewDetails(String), // Contains project id
    Logout,
    Quit,
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &mut ProjectsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ].as_ref())
        .split(area);

    render_search(frame, chunks[0], state);

    let filter = Paragraph::new(Spans::from(vec![
        Span::raw("Filter by status: "),
        Span::styled(
            state.listing.status_filter().label(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(filter, chunks[1]);

    if state.listing.loading() {
        let spinner = SPINNER[state.tick % SPINNER.len()];
        let loading = Paragraph::new(format!("{spinner} Loading projects..."))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Blue))
            .block(Block::default().title("Projects").borders(Borders::ALL));
        frame.render_widget(loading, chunks[2]);
    } else if let Some(message) = state.listing.message() {
        let color = match message {
            ListingMessage::Empty => Color::Gray,
            ListingMessage::Error(_) => Color::Red,
        };
        let message = Paragraph::new(message.text().to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .block(Block::default().title("Projects").borders(Borders::ALL));
        frame.render_widget(message, chunks[2]);
    } else {
        render_list(frame, chunks[2], &state.listing);
        render_pagination(frame, chunks[3], &state.listing);
    }

    let help_text = if state.search_mode {
        "Type to search | Enter - Search | Esc - Stop typing"
    } else {
        "<A> Add Project | </> Search | <F> Status filter | <Left/Right> Page | <Enter> View Details"
    };
    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[4]);

    if let Some(notice) = &state.notice {
        render_popup(frame, "Notice", notice, Color::Yellow);
    }
}

fn render_search<B: Backend>(frame: &mut Frame<B>, area: Rect, state: &ProjectsState) {
    let mut spans = vec![Span::raw(state.listing.search_input().to_string())];
    if state.search_mode {
        spans.push(Span::styled("|", Style::default().fg(Color::Yellow)));
    } else if state.listing.search_input().is_empty() {
        spans.push(Span::styled("Search projects...", Style::default().fg(Color::DarkGray)));
    }

    let border = if state.search_mode { Color::Yellow } else { Color::White };
    let search = Paragraph::new(Spans::from(spans)).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(search, area);
}

fn render_list<B: Backend>(frame: &mut Frame<B>, area: Rect, listing: &ProjectListing) {
    let visible = listing.visible();
    let items: Vec<ListItem> = if visible.is_empty() {
        vec![ListItem::new(Span::styled("No projects found.", Style::default().fg(Color::Gray)))]
    } else {
        visible
            .iter()
            .map(|project| {
                ListItem::new(Spans::from(vec![
                    Span::styled(
                        project.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(" #{} ", project.project_number)),
                    Span::styled(
                        format!(" {} ", project.status.label()),
                        Style::default().fg(Color::Black).bg(project.status.color()),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default();
    list_state.select(listing.selected_index());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_pagination<B: Backend>(frame: &mut Frame<B>, area: Rect, listing: &ProjectListing) {
    let control = |label: &'static str, enabled: bool| {
        let style = if enabled {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(label, style)
    };

    let pagination = Paragraph::new(Spans::from(vec![
        control("< Previous", listing.can_go_previous()),
        Span::raw(format!(
            "   Page {} of {}   ",
            listing.page_number(),
            listing.total_pages()
        )),
        control("Next >", listing.can_go_next()),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(pagination, area);
}

pub fn handle_input(state: &mut ProjectsState, key: KeyCode) -> Option<ProjectAction> {
    if state.notice.take().is_some() {
        return None;
    }

    if state.search_mode {
        match key {
            KeyCode::Enter => {
                state.listing.submit_search();
                state.search_mode = false;
            }
            KeyCode::Esc => state.search_mode = false,
            KeyCode::Backspace => state.listing.pop_search_char(),
            KeyCode::Char(c) => state.listing.push_search_char(c),
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ProjectAction::Quit),
        KeyCode::Char('l') => return Some(ProjectAction::Logout),
        KeyCode::Char('a') => return Some(ProjectAction::AddProject),
        KeyCode::Char('/') => state.search_mode = true,
        KeyCode::Char('f') => state.listing.cycle_status_filter(),
        KeyCode::Left => {
            state.listing.previous_page();
        }
        KeyCode::Right => {
            state.listing.next_page();
        }
        KeyCode::Down => state.listing.select_next(),
        KeyCode::Up => state.listing.select_previous(),
        KeyCode::Enter => {
            if let Some(project) = state.listing.selected() {
                return Some(ProjectAction::ViewDetails(project.id.clone()));
            }
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use tui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::models::{Project, ProjectStatus, StatusFilter};

    fn project(id: &str, title: &str, status: ProjectStatus) -> Project {
        Project {
            id: id.to_string(),
            title: title.to_string(),
            project_number: 7,
            status,
            origin_date: "2024-01-01".to_string(),
            is_deleted: false,
            created_at: Some("2024-01-01".to_string()),
        }
    }

    fn loaded(projects: Vec<Project>) -> ProjectsState {
        let mut state = ProjectsState::new();
        let ticket = state.listing.begin_fetch();
        state.listing.apply(&ticket, Ok(projects));
        state
    }

    fn screen_text(state: &mut ProjectsState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_projects(f, area, state);
            })
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(&buffer.get(x, y).symbol);
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn renders_titles_status_and_page_line() {
        let mut state = loaded(vec![project("1", "Harbour Wall", ProjectStatus::InProgress)]);

        let text = screen_text(&mut state);

        assert!(text.contains("Harbour Wall"));
        assert!(text.contains("In Progress"));
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn renders_message_instead_of_list() {
        let mut state = ProjectsState::new();
        let ticket = state.listing.begin_fetch();
        state.listing.apply(&ticket, Err(crate::api::ApiError::UnexpectedFormat));

        let text = screen_text(&mut state);

        assert!(text.contains("Unexpected data format received from the API."));
        assert!(!text.contains("Page 1"));
    }

    #[test]
    fn search_keys_edit_draft_then_submit() {
        let mut state = loaded(vec![project("1", "A", ProjectStatus::Created)]);

        assert!(handle_input(&mut state, KeyCode::Char('/')).is_none());
        assert!(state.is_searching());
        for c in "wall".chars() {
            handle_input(&mut state, KeyCode::Char(c));
        }
        // 'q' while typing is text, not quit
        assert!(handle_input(&mut state, KeyCode::Char('q')).is_none());
        handle_input(&mut state, KeyCode::Backspace);
        assert!(!state.listing.needs_fetch());

        handle_input(&mut state, KeyCode::Enter);
        assert!(!state.is_searching());
        assert_eq!(state.listing.search_term(), "wall");
        assert!(state.listing.needs_fetch());
    }

    #[test]
    fn filter_key_cycles_and_resets_page() {
        let projects = (0..15)
            .map(|i| project(&i.to_string(), "P", ProjectStatus::Created))
            .collect();
        let mut state = loaded(projects);
        handle_input(&mut state, KeyCode::Right);
        assert_eq!(state.listing.page_number(), 2);

        handle_input(&mut state, KeyCode::Char('f'));

        assert_eq!(
            state.listing.status_filter(),
            StatusFilter::Only(ProjectStatus::Created)
        );
        assert_eq!(state.listing.page_number(), 1);
    }

    #[test]
    fn enter_views_selected_project() {
        let mut state = loaded(vec![
            project("1", "A", ProjectStatus::Created),
            project("2", "B", ProjectStatus::Created),
        ]);
        handle_input(&mut state, KeyCode::Down);

        match handle_input(&mut state, KeyCode::Enter) {
            Some(ProjectAction::ViewDetails(id)) => assert_eq!(id, "2"),
            _ => panic!("expected details navigation"),
        }
    }

    #[test]
    fn notice_swallows_next_key() {
        let mut state = loaded(vec![project("1", "A", ProjectStatus::Created)]);
        state.show_notice("No view registered for /projeto/1");

        assert!(handle_input(&mut state, KeyCode::Char('q')).is_none());
        assert!(state.notice().is_none());
        assert!(matches!(
            handle_input(&mut state, KeyCode::Char('q')),
            Some(ProjectAction::Quit)
        ));
    }
}
