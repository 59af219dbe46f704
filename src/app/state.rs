//! Application state types

use ratatui::widgets::ListState;

use crate::cli::Inputs;
use crate::error::FetchError;
use crate::model::Commit;
use crate::service::VelocityReport;

/// Application state machine
#[derive(Debug)]
pub enum AppState {
    /// Pulling commits
    Loading,
    /// Retrieval failed
    Error(String),
    /// Showing the velocity dashboard
    Dashboard(DashboardState),
    Quitting,
}

impl AppState {
    /// Get the kind of state for pattern matching without borrowing
    pub fn kind(&self) -> StateKind {
        match self {
            AppState::Loading => StateKind::Loading,
            AppState::Error(_) => StateKind::Error,
            AppState::Dashboard(_) => StateKind::Dashboard,
            AppState::Quitting => StateKind::Quitting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Loading,
    Error,
    Dashboard,
    Quitting,
}

/// State for the dashboard view
#[derive(Debug)]
pub struct DashboardState {
    pub inputs: Inputs,
    pub report: VelocityReport,
    /// Selection in the commit log
    pub log_state: ListState,
}

impl DashboardState {
    pub fn new(inputs: Inputs, report: VelocityReport) -> Self {
        let mut log_state = ListState::default();
        if !report.commits.is_empty() {
            log_state.select(Some(0));
        }
        Self {
            inputs,
            report,
            log_state,
        }
    }

    pub fn commit_count(&self) -> usize {
        self.report.commits.len()
    }

    pub fn scroll_down(&mut self) {
        let cursor = self.log_state.selected().unwrap_or(0);
        if cursor < self.commit_count().saturating_sub(1) {
            self.log_state.select(Some(cursor + 1));
        }
    }

    pub fn scroll_up(&mut self) {
        let cursor = self.log_state.selected().unwrap_or(0);
        if cursor > 0 {
            self.log_state.select(Some(cursor - 1));
        }
    }

    pub fn scroll_to_top(&mut self) {
        if self.commit_count() > 0 {
            self.log_state.select(Some(0));
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        if self.commit_count() > 0 {
            self.log_state.select(Some(self.commit_count() - 1));
        }
    }

    /// Commit under the cursor
    pub fn selected_commit(&self) -> Option<&Commit> {
        self.log_state
            .selected()
            .and_then(|i| self.report.commits.get(i))
    }
}

/// Messages from background tasks
#[derive(Debug)]
pub enum TaskResult {
    CommitsLoaded(Result<Vec<Commit>, FetchError>),
}
