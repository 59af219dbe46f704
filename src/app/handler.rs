//! Input event handlers

use crossterm::event::{KeyCode, KeyEvent};

use crate::event::KeyEventExt;

use super::state::{AppState, DashboardState, StateKind};

/// Actions that can result from handling input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
}

/// Handle key events based on current state
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Action {
    match state.kind() {
        StateKind::Loading => {
            if key.is_quit() {
                Action::Quit
            } else {
                Action::None
            }
        }
        StateKind::Error => Action::Quit,
        StateKind::Dashboard => {
            if let AppState::Dashboard(dashboard) = state {
                handle_dashboard_key(dashboard, key)
            } else {
                Action::None
            }
        }
        StateKind::Quitting => Action::None,
    }
}

fn handle_dashboard_key(dashboard: &mut DashboardState, key: KeyEvent) -> Action {
    if key.is_quit() {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => dashboard.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => dashboard.scroll_up(),
        KeyCode::Char('g') | KeyCode::Home => dashboard.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => dashboard.scroll_to_bottom(),
        _ => {}
    }
    Action::None
}
