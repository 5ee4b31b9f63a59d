use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{NewProject, ProjectStatus};
use crate::ui::components::date_input::DateInputState;
use crate::ui::components::popup::render_popup;

pub enum ProjectWizardAction {
    Cancel,
    Save(NewProject),
}

#[derive(Clone, PartialEq, Copy, Debug)]
pub enum ProjectField {
    Title,
    ProjectNumber,
    Status,
    OriginDate,
}

impl ProjectField {
    const ORDER: [ProjectField; 4] = [
        ProjectField::Title,
        ProjectField::ProjectNumber,
        ProjectField::Status,
        ProjectField::OriginDate,
    ];

    fn label(self) -> &'static str {
        match self {
            ProjectField::Title => "Title",
            ProjectField::ProjectNumber => "Project Number",
            ProjectField::Status => "Status",
            ProjectField::OriginDate => "Origin Date",
        }
    }
}

pub struct ProjectWizardState {
    pub title: String,
    pub project_number: String,
    pub status: ProjectStatus,
    pub origin_date_state: DateInputState,
    pub current_field: ProjectField,
    pub editing: bool,
    error: Option<String>,
    saving: bool,
}

impl Default for ProjectWizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectWizardState {
    pub fn new() -> Self {
        let today = chrono::Local::now().date_naive();

        Self {
            title: String::new(),
            project_number: String::new(),
            status: ProjectStatus::Created,
            origin_date_state: DateInputState::new(today),
            current_field: ProjectField::Title,
            editing: false,
            error: None,
            saving: false,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.current_field == ProjectField::OriginDate {
            if self.editing {
                self.origin_date_state.start_editing();
            } else {
                self.origin_date_state.stop_editing();
            }
        }
    }

    pub fn next_field(&mut self) {
        let i = self.field_index();
        self.current_field = ProjectField::ORDER[(i + 1) % ProjectField::ORDER.len()];
    }

    pub fn previous_field(&mut self) {
        let i = self.field_index();
        let len = ProjectField::ORDER.len();
        self.current_field = ProjectField::ORDER[(i + len - 1) % len];
    }

    fn field_index(&self) -> usize {
        ProjectField::ORDER
            .iter()
            .position(|field| *field == self.current_field)
            .unwrap_or(0)
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            ProjectField::Title => match key {
                KeyCode::Char(c) => self.title.push(c),
                KeyCode::Backspace => {
                    self.title.pop();
                }
                _ => {}
            },
            ProjectField::ProjectNumber => match key {
                KeyCode::Char(c) if c.is_ascii_digit() => self.project_number.push(c),
                KeyCode::Backspace => {
                    self.project_number.pop();
                }
                _ => {}
            },
            ProjectField::Status => {
                if matches!(key, KeyCode::Char(' ') | KeyCode::Right | KeyCode::Left) {
                    self.status = self.status.next();
                }
            }
            ProjectField::OriginDate => self.origin_date_state.handle_input(key),
        }
    }

    /// Build the creation request, or explain what is missing
    pub fn to_new_project(&self) -> Result<NewProject, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required.".to_string());
        }
        let project_number = self
            .project_number
            .parse::<i64>()
            .map_err(|_| "Project number must be a whole number.".to_string())?;

        Ok(NewProject {
            title: title.to_string(),
            project_number,
            status: self.status,
            origin_date: self.origin_date_state.date,
        })
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.saving = false;
        self.error = Some(error.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    fn field_value(&self, field: ProjectField) -> String {
        match field {
            ProjectField::Title => self.title.clone(),
            ProjectField::ProjectNumber => self.project_number.clone(),
            ProjectField::Status => self.status.label().to_string(),
            ProjectField::OriginDate => self.origin_date_state.get_display_string(),
        }
    }
}

pub fn render_project_wizard<B: Backend>(f: &mut Frame<B>, area: Rect, state: &ProjectWizardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new(if state.saving { "Add Project (saving...)" } else { "Add Project" })
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);

    let help_text = if state.editing {
        match state.current_field {
            ProjectField::Title | ProjectField::ProjectNumber => "Enter - Save field | Esc - Cancel editing",
            ProjectField::Status => "Space/Left/Right - Change status | Enter - Save field",
            ProjectField::OriginDate => {
                "Enter - Save field | Left/Right - Switch date part | Esc - Cancel editing"
            }
        }
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    if let Some(error) = &state.error {
        render_popup(f, "Error", error, Color::Red);
    }
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ProjectWizardState, area: Rect) {
    let items: Vec<ListItem> = ProjectField::ORDER
        .iter()
        .map(|field| {
            let selected = *field == state.current_field;
            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let mut value = state.field_value(*field);
            let value_style = if selected && state.editing {
                if *field != ProjectField::OriginDate {
                    value.push('|');
                }
                Style::default().add_modifier(Modifier::BOLD)
            } else if *field == ProjectField::Status {
                Style::default().fg(state.status.color())
            } else {
                Style::default()
            };

            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                Span::styled(value, value_style),
            ]))
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Project Details"));

    f.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectWizardState, key: KeyCode) -> Option<ProjectWizardAction> {
    if state.error.take().is_some() || state.saving {
        return None;
    }

    match key {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ProjectWizardAction::Cancel);
            }
        }
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing => match state.to_new_project() {
            Ok(project) => {
                state.saving = true;
                return Some(ProjectWizardAction::Save(project));
            }
            Err(error) => state.set_error(error),
        },
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }

    None
}
