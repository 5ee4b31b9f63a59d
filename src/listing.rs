//! Listing state behind the project list view.
//!
//! The server is asked once per search/status combination for its first page of
//! `FETCH_PAGE_SIZE` records; pages of `PAGE_SIZE` are cut locally from that
//! snapshot, so moving between pages never refetches.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::api::{ApiError, FETCH_PAGE_SIZE, ProjectQuery};
use crate::models::{Project, StatusFilter};

/// Projects shown per page
pub const PAGE_SIZE: usize = 10;

pub const NO_PROJECTS_MESSAGE: &str = "No project found for the selected filter";
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the project API.";
pub const SIGNED_OUT_MESSAGE: &str = "Sign in to list projects.";

// Shared by every listing so a replaced listing never reuses a sequence number
static NEXT_FETCH_SEQ: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Text shown in place of the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingMessage {
    /// The fetch succeeded but nothing is left after dropping deleted projects
    Empty,
    Error(String),
}

impl ListingMessage {
    pub fn text(&self) -> &str {
        match self {
            ListingMessage::Empty => NO_PROJECTS_MESSAGE,
            ListingMessage::Error(text) => text,
        }
    }
}

/// Identifies one issued fetch; only the newest ticket may update the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: ProjectQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &ProjectQuery {
        &self.query
    }
}

#[derive(Debug)]
pub struct ProjectListing {
    search_input: String,
    search_term: String,
    status_filter: StatusFilter,
    page_number: u32,
    total_pages: u32,
    projects: Vec<Project>,
    phase: FetchPhase,
    message: Option<ListingMessage>,
    issued: u64,
    last_query: Option<ProjectQuery>,
    selected: usize,
}

impl Default for ProjectListing {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectListing {
    pub fn new() -> Self {
        Self {
            search_input: String::new(),
            search_term: String::new(),
            status_filter: StatusFilter::All,
            page_number: 1,
            total_pages: 0,
            projects: Vec::new(),
            phase: FetchPhase::Idle,
            message: None,
            issued: 0,
            last_query: None,
            selected: 0,
        }
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn message(&self) -> Option<&ListingMessage> {
        self.message.as_ref()
    }

    /// Every non-deleted project of the current snapshot, newest first
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    /// Commit the search draft and go back to the first page
    pub fn submit_search(&mut self) {
        self.search_term = self.search_input.clone();
        self.reset_page();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.reset_page();
    }

    pub fn cycle_status_filter(&mut self) {
        self.set_status_filter(self.status_filter.cycle());
    }

    fn reset_page(&mut self) {
        self.page_number = 1;
        self.selected = 0;
    }

    pub fn can_go_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.page_number -= 1;
        self.selected = 0;
        true
    }

    pub fn next_page(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.page_number += 1;
        self.selected = 0;
        true
    }

    /// The request the current search and filter map to
    pub fn query(&self) -> ProjectQuery {
        ProjectQuery {
            search: self.search_term.clone(),
            page_number: 1,
            page_size: FETCH_PAGE_SIZE,
            status: self.status_filter,
        }
    }

    pub fn needs_fetch(&self) -> bool {
        self.last_query.as_ref() != Some(&self.query())
    }

    /// Force the next `needs_fetch` to report true
    pub fn invalidate(&mut self) {
        self.last_query = None;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued = NEXT_FETCH_SEQ.fetch_add(1, Ordering::Relaxed);
        let query = self.query();
        self.last_query = Some(query.clone());
        self.phase = FetchPhase::Loading;
        self.message = None;
        debug!(seq = self.issued, search = %query.search, status = query.status.code(), "fetch issued");

        FetchTicket {
            seq: self.issued,
            query,
        }
    }

    /// Apply the outcome of a fetch. Returns false when a newer fetch has been issued since.
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<Vec<Project>, ApiError>) -> bool {
        if ticket.seq != self.issued {
            debug!(seq = ticket.seq, latest = self.issued, "stale fetch result discarded");
            return false;
        }

        match result {
            Ok(projects) => {
                let projects = prepare(projects);
                self.total_pages = total_pages(projects.len());
                self.message = projects.is_empty().then_some(ListingMessage::Empty);
                self.projects = projects;
                self.page_number = self.page_number.min(self.total_pages).max(1);
                self.phase = FetchPhase::Loaded;
                info!(count = self.projects.len(), pages = self.total_pages, "projects loaded");
            }
            Err(err) => {
                info!(error = %err, "project fetch failed");
                self.fail(failure_message(&err));
            }
        }

        self.clamp_selection();
        true
    }

    /// Drop the snapshot and show `text` in its place
    fn fail(&mut self, text: impl Into<String>) {
        self.projects.clear();
        self.total_pages = 0;
        self.page_number = 1;
        self.message = Some(ListingMessage::Error(text.into()));
        self.phase = FetchPhase::Failed;
        self.selected = 0;
    }

    /// The slice of projects on the current page
    pub fn visible(&self) -> &[Project] {
        let start = (self.page_number.saturating_sub(1) as usize) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.projects.len());
        self.projects.get(start..end).unwrap_or(&[])
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.visible().is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&Project> {
        self.visible().get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        self.selected = if self.selected >= len - 1 { 0 } else { self.selected + 1 };
    }

    pub fn select_previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = 0;
        }
    }
}

/// Drop soft-deleted projects and order the rest newest first
pub fn prepare(projects: Vec<Project>) -> Vec<Project> {
    let mut projects: Vec<Project> = projects.into_iter().filter(|p| !p.is_deleted).collect();
    projects.sort_by_cached_key(|p| Reverse(p.created_at()));
    projects
}

pub fn total_pages(count: usize) -> u32 {
    count.div_ceil(PAGE_SIZE) as u32
}

fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Status(_) => NO_PROJECTS_MESSAGE.to_string(),
        ApiError::UnexpectedFormat => err.to_string(),
        ApiError::Transport(_) => UNREACHABLE_MESSAGE.to_string(),
        ApiError::Unauthenticated => SIGNED_OUT_MESSAGE.to_string(),
    }
}
