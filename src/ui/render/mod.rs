//! UI rendering functions, one module per screen.

mod common;
mod dashboard;

pub use common::{render_error, render_loading};
pub use dashboard::render_dashboard;
