//! Velocity dashboard: info panel, commit log and velocity chart

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph},
    Frame,
};

use crate::app::state::DashboardState;
use crate::service::DayBucket;
use crate::ui::theme;
use crate::util::time::{format_relative, format_relative_short};

pub fn render_dashboard(frame: &mut Frame, dashboard: &mut DashboardState, now: DateTime<Utc>) {
    let rows = Layout::vertical([
        Constraint::Percentage(35),
        Constraint::Min(8),
        Constraint::Length(3),
    ])
    .split(frame.area());
    let top = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_info(frame, dashboard, now, top[0]);
    render_commit_log(frame, dashboard, now, top[1]);
    render_chart(frame, dashboard, rows[1]);
    render_help_bar(frame, rows[2]);
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(theme::TEXT))
}

fn render_info(frame: &mut Frame, dashboard: &DashboardState, now: DateTime<Utc>, area: Rect) {
    let report = &dashboard.report;
    let inputs = &dashboard.inputs;
    let period = report.format.period_name();

    let change = match report.change_percent() {
        Some(change) => format!("{:+.1}%", change),
        None => "n/a".to_string(),
    };
    let latest = report
        .commits
        .first()
        .map(|c| format_relative(c.date, now))
        .unwrap_or_else(|| "none".to_string());

    let label = |text: String| Span::styled(text, Style::default().fg(theme::TEXT_MUTED));
    let text = vec![
        Line::from(Span::styled(
            "GIT VELOCITY",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            label("Repository: ".to_string()),
            Span::styled(
                format!("{}/{} ({})", inputs.owner, inputs.repository, inputs.provider),
                Style::default().fg(theme::TEXT),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label(format!("Current {}: ", period)),
            Span::styled(
                report.current.to_string(),
                Style::default().fg(theme::CURRENT),
            ),
        ]),
        Line::from(vec![
            label(format!("Previous {}: ", period)),
            Span::styled(
                report.previous.to_string(),
                Style::default().fg(theme::PREVIOUS),
            ),
        ]),
        Line::from(vec![
            label("Change: ".to_string()),
            Span::styled(change, Style::default().fg(theme::TEXT)),
        ]),
        Line::from(vec![
            label("Latest commit: ".to_string()),
            Span::styled(latest, Style::default().fg(theme::TEXT)),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).block(bordered("Info")), area);
}

fn render_commit_log(
    frame: &mut Frame,
    dashboard: &mut DashboardState,
    now: DateTime<Utc>,
    area: Rect,
) {
    let items: Vec<ListItem> = dashboard
        .report
        .commits
        .iter()
        .map(|commit| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>6} ", format_relative_short(commit.date, now)),
                    Style::default().fg(theme::TEXT_DIM),
                ),
                Span::styled(commit.short_id(), Style::default().fg(theme::SHA)),
                Span::raw(" "),
                Span::styled(
                    format!("{}: ", commit.author),
                    Style::default().fg(theme::AUTHOR),
                ),
                Span::styled(commit.summary(), Style::default().fg(theme::TEXT)),
            ]))
        })
        .collect();

    let title = format!("Commit Log ({})", dashboard.commit_count());
    let list = List::new(items).block(bordered(&title)).highlight_style(
        Style::default()
            .bg(theme::BG_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, area, &mut dashboard.log_state);
}

fn points(buckets: &[DayBucket]) -> Vec<(f64, f64)> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (i as f64, b.count as f64))
        .collect()
}

/// First, middle and last bucket labels; all of them when there are few
fn axis_labels(buckets: &[DayBucket]) -> Vec<String> {
    if buckets.len() <= 12 {
        return buckets.iter().map(|b| b.label.clone()).collect();
    }
    [0, buckets.len() / 2, buckets.len() - 1]
        .iter()
        .filter_map(|&i| buckets.get(i))
        .map(|b| b.label.clone())
        .collect()
}

fn render_chart(frame: &mut Frame, dashboard: &DashboardState, area: Rect) {
    let report = &dashboard.report;
    let current = points(&report.current_buckets);
    let previous = points(&report.previous_buckets);

    let max = report
        .current_buckets
        .iter()
        .chain(&report.previous_buckets)
        .map(|b| b.count)
        .max()
        .unwrap_or(0)
        .max(1);
    let x_max = report.current_buckets.len().saturating_sub(1).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("Current")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::CURRENT))
            .data(&current),
        Dataset::default()
            .name("Previous")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::PREVIOUS))
            .data(&previous),
    ];

    let chart = Chart::new(datasets)
        .block(bordered("Commit Velocity"))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme::TEXT_DIM))
                .bounds([0.0, x_max])
                .labels(axis_labels(&report.current_buckets)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme::TEXT_DIM))
                .bounds([0.0, max as f64])
                .labels(vec!["0".to_string(), max.to_string()]),
        );

    frame.render_widget(chart, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let shortcuts = [("j/k", "scroll"), ("g/G", "top/bottom"), ("q", "quit")];

    let spans: Vec<Span> = shortcuts
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(*key, Style::default().fg(theme::KEY_HINT)),
                Span::styled(format!(" {} ", desc), Style::default().fg(theme::TEXT_DIM)),
            ]
        })
        .collect();

    let help = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER)),
    );

    frame.render_widget(help, area);
}
