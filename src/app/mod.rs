//! Dashboard application core
//!
//! - `App`: main loop driving the terminal
//! - `state`: state types for each screen
//! - `handler`: key handling

pub mod handler;
pub mod state;

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::cli::Inputs;
use crate::error::{AppError, AppResult, FetchError};
use crate::event::poll_key;
use crate::model::TakeWhile;
use crate::service::{CommitClient, CredentialStore, HttpTransport, Velocity};
use crate::tui::Tui;
use crate::ui::render;

pub use handler::Action;
pub use state::{AppState, DashboardState, TaskResult};

/// Dashboard application
pub struct App<H, S> {
    client: CommitClient<H, S>,
    inputs: Inputs,
    velocity: Velocity,
    /// Reference time for the velocity windows
    now: DateTime<Utc>,
    state: AppState,
    /// Retrieval error, returned from `run` once the user leaves the error screen
    failure: Option<FetchError>,
    /// Tick count for animations
    tick_count: u64,
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    task_tx: mpsc::UnboundedSender<TaskResult>,
}

impl<H, S> App<H, S>
where
    H: HttpTransport + 'static,
    S: CredentialStore + 'static,
{
    pub fn new(client: CommitClient<H, S>, inputs: Inputs, now: DateTime<Utc>) -> Self {
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        Self {
            client,
            velocity: Velocity::new(inputs.format),
            inputs,
            now,
            state: AppState::Loading,
            failure: None,
            tick_count: 0,
            task_rx,
            task_tx,
        }
    }

    /// Run the main loop until the user quits
    pub async fn run(&mut self, tui: &mut Tui) -> AppResult<()> {
        self.spawn_load_commits();

        loop {
            if matches!(self.state, AppState::Quitting) {
                break;
            }

            tui.draw(|frame| self.render(frame))?;

            if let Some(key) = poll_key(Duration::from_millis(16)) {
                let action = handler::handle_key(&mut self.state, key);
                if action == Action::Quit {
                    self.state = AppState::Quitting;
                }
            }

            while let Ok(result) = self.task_rx.try_recv() {
                self.handle_task_result(result);
            }

            self.tick_count = self.tick_count.wrapping_add(1);
        }

        self.finish()
    }

    /// Outcome of the session: the retrieval error if there was one
    fn finish(&mut self) -> AppResult<()> {
        match self.failure.take() {
            Some(e) => Err(AppError::Fetch(e)),
            None => Ok(()),
        }
    }

    fn render(&mut self, frame: &mut ratatui::Frame) {
        match &mut self.state {
            AppState::Loading => {
                let message = format!(
                    "Pulling commits for {}/{}...",
                    self.inputs.owner, self.inputs.repository
                );
                render::render_loading(frame, &message, self.tick_count);
            }
            AppState::Error(msg) => render::render_error(frame, msg),
            AppState::Dashboard(dashboard) => render::render_dashboard(frame, dashboard, self.now),
            AppState::Quitting => {}
        }
    }

    fn handle_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::CommitsLoaded(Ok(commits)) => {
                let report = self.velocity.summarize(&commits, self.now);
                info!(
                    fetched = commits.len(),
                    current = report.current,
                    previous = report.previous,
                    "Commits loaded"
                );
                self.state = AppState::Dashboard(DashboardState::new(self.inputs.clone(), report));
            }
            TaskResult::CommitsLoaded(Err(e)) => {
                error!(error = %e, "Failed to pull commits");
                self.state = AppState::Error(format!("Failed to pull commits: {}", e));
                self.failure = Some(e);
            }
        }
    }

    /// Retrieve commits in the background, stopping once pages reach past the previous period
    fn spawn_load_commits(&self) {
        let client = self.client.clone();
        let repository = self.inputs.repository.clone();
        let owner = self.inputs.owner.clone();
        let stop = self.velocity.stop_predicate(self.now);
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let take_while: &TakeWhile = &stop;
            let result = client
                .get_commits_by_repo(&repository, &owner, Some(take_while))
                .await;
            let _ = tx.send(TaskResult::CommitsLoaded(result));
        });
    }
}
