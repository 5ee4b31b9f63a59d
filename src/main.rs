mod api;
mod config;
mod listing;
mod models;
mod router;
mod session;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::listing::FetchTicket;
use crate::models::Project;
use crate::router::Route;
use crate::session::{MemorySession, SessionProvider};
use crate::ui::{
    login::{LoginAction, LoginState, render_login, handle_input as handle_login_input},
    navbar,
    project_wizard::{ProjectWizardAction, ProjectWizardState, render_project_wizard, handle_input as handle_project_wizard_input},
    projects::{ProjectAction, ProjectsState, render_projects, handle_input as handle_projects_input},
};

const TICK: Duration = Duration::from_millis(100);

/// Terminal client for the Project API
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Base URL of the Project API (overrides PROJECT_DESK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token to sign in with (overrides PROJECT_DESK_API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// File that receives the application log (overrides PROJECT_DESK_LOG_FILE)
    #[arg(long)]
    log_file: Option<String>,
}

type FetchOutcome = (FetchTicket, Result<Vec<Project>, ApiError>);

// Main application state
struct AppState {
    api: ApiClient,
    session: MemorySession,
    route: Route,
    login_state: Option<LoginState>,
    projects_state: ProjectsState,
    project_wizard_state: Option<ProjectWizardState>,
    fetch_tx: UnboundedSender<FetchOutcome>,
    fetch_rx: UnboundedReceiver<FetchOutcome>,
    create_tx: UnboundedSender<Result<(), ApiError>>,
    create_rx: UnboundedReceiver<Result<(), ApiError>>,
}

impl AppState {
    fn new(api: ApiClient, session: MemorySession) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let (create_tx, create_rx) = mpsc::unbounded_channel();

        Self {
            api,
            session,
            route: Route::Login,
            login_state: None,
            projects_state: ProjectsState::new(),
            project_wizard_state: None,
            fetch_tx,
            fetch_rx,
            create_tx,
            create_rx,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?.with_overrides(cli.api_url, cli.token, cli.log_file);
    init_tracing(&config)?;
    info!(api_url = config.api_url(), "starting project desk");

    let api = ApiClient::new(config.api_url()).context("failed to build the HTTP client")?;
    let session = MemorySession::new(config.api_token().map(str::to_string));

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(api, session);
    let start = Route::parse("/").unwrap_or(Route::Login);
    let start = if app_state.session.is_signed_in() { Route::Home } else { start };
    navigate(&mut app_state, start);

    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    finish(result)
}

/// Report how the session ended; a failed run keeps its error as the exit status
fn finish(result: Result<()>) -> Result<()> {
    match &result {
        Ok(()) => {
            info!("project desk closed");
            println!("Thanks for using Project Desk!");
        }
        Err(err) => error!(error = %err, "application stopped"),
    }

    result
}

/// Log to a file, the terminal belongs to the UI
fn init_tracing(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        collect_results(app_state);

        if app_state.route == Route::Home && app_state.projects_state.listing.needs_fetch() {
            spawn_fetch(app_state);
        }
        app_state.projects_state.tick();

        // Render current route
        terminal.draw(|f| {
            let size = f.size();
            let content = if app_state.route.has_navbar() {
                let (bar, content) = navbar::layout(size);
                navbar::render_navbar(f, bar, &app_state.route);
                content
            } else {
                size
            };

            match &app_state.route {
                Route::Login => {
                    if let Some(state) = &app_state.login_state {
                        render_login(f, state);
                    }
                }
                Route::Home => render_projects(f, content, &mut app_state.projects_state),
                Route::AddProject => {
                    if let Some(state) = &app_state.project_wizard_state {
                        render_project_wizard(f, content, state);
                    }
                }
                Route::ProjectDetail(_) => {}
            }
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        let should_quit = match app_state.route {
            Route::Login => handle_login_screen(app_state, key.code),
            Route::Home => handle_projects_screen(app_state, key.code),
            Route::AddProject => handle_project_wizard_screen(app_state, key.code),
            Route::ProjectDetail(_) => false,
        };

        if should_quit {
            return Ok(());
        }
    }
}

fn navigate(app_state: &mut AppState, route: Route) {
    if !route.is_registered() {
        warn!(route = %route, "no view registered for route");
        app_state
            .projects_state
            .show_notice(format!("No view registered for {route}"));
        return;
    }

    info!(from = %app_state.route, to = %route, "navigate");
    match &route {
        Route::Login => app_state.login_state = Some(LoginState::new()),
        Route::AddProject => app_state.project_wizard_state = Some(ProjectWizardState::new()),
        Route::Home | Route::ProjectDetail(_) => {}
    }
    app_state.route = route;
}

/// Apply fetch and save outcomes that arrived since the last frame
fn collect_results(app_state: &mut AppState) {
    while let Ok((ticket, result)) = app_state.fetch_rx.try_recv() {
        app_state.projects_state.listing.apply(&ticket, result);
    }

    while let Ok(result) = app_state.create_rx.try_recv() {
        match result {
            Ok(()) => {
                info!("project created");
                app_state.projects_state.listing.invalidate();
                app_state.project_wizard_state = None;
                navigate(app_state, Route::Home);
            }
            Err(err) => {
                warn!(error = %err, "project creation failed");
                if let Some(state) = &mut app_state.project_wizard_state {
                    state.set_error(format!("Could not save the project. {err}"));
                }
            }
        }
    }
}

fn spawn_fetch(app_state: &mut AppState) {
    let ticket = app_state.projects_state.listing.begin_fetch();
    let token = app_state.session.token().map(str::to_string);
    let api = app_state.api.clone();
    let tx = app_state.fetch_tx.clone();

    tokio::spawn(async move {
        let result = match token {
            Some(token) => api.list_projects(&token, ticket.query()).await,
            None => Err(ApiError::Unauthenticated),
        };
        // receiver only closes on shutdown
        let _ = tx.send((ticket, result));
    });
}

fn spawn_create(app_state: &mut AppState, project: models::NewProject) {
    let token = app_state.session.token().map(str::to_string);
    let api = app_state.api.clone();
    let tx = app_state.create_tx.clone();

    tokio::spawn(async move {
        let result = match token {
            Some(token) => api.create_project(&token, &project).await,
            None => Err(ApiError::Unauthenticated),
        };
        let _ = tx.send(result);
    });
}

fn handle_login_screen(app_state: &mut AppState, key: KeyCode) -> bool {
    let Some(state) = &mut app_state.login_state else {
        return false;
    };

    match handle_login_input(state, key) {
        Some(LoginAction::Quit) => return true,
        Some(LoginAction::SignIn(token)) => {
            app_state.session.sign_in(token);
            app_state.login_state = None;
            app_state.projects_state = ProjectsState::new();
            navigate(app_state, Route::Home);
        }
        None => {}
    }

    false
}

fn handle_projects_screen(app_state: &mut AppState, key: KeyCode) -> bool {
    match handle_projects_input(&mut app_state.projects_state, key) {
        Some(ProjectAction::Quit) => return true,
        Some(ProjectAction::AddProject) => navigate(app_state, Route::AddProject),
        Some(ProjectAction::ViewDetails(id)) => navigate(app_state, Route::ProjectDetail(id)),
        Some(ProjectAction::Logout) => {
            app_state.session.sign_out();
            app_state.projects_state = ProjectsState::new();
            navigate(app_state, Route::Login);
        }
        None => {}
    }

    false
}

fn handle_project_wizard_screen(app_state: &mut AppState, key: KeyCode) -> bool {
    let Some(state) = &mut app_state.project_wizard_state else {
        return false;
    };

    match handle_project_wizard_input(state, key) {
        Some(ProjectWizardAction::Cancel) => {
            app_state.project_wizard_state = None;
            navigate(app_state, Route::Home);
        }
        Some(ProjectWizardAction::Save(project)) => spawn_create(app_state, project),
        None => {}
    }

    false
}
