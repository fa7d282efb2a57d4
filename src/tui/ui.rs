//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::features::focus::{format_duration, Phase, RunStatus, TimerState};
use crate::tui::app::App;
use crate::tui::event::HELP;

const fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Work => Color::Red,
        Phase::Break => Color::Green,
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let state = app.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Countdown
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Counters
            Constraint::Min(0),    // Stats
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, &state, chunks[0]);
    render_countdown(frame, &state, chunks[1]);
    render_progress(frame, &state, chunks[2]);
    render_counters(frame, app, &state, chunks[3]);
    render_stats(frame, app, chunks[4]);
    render_status_bar(frame, app, chunks[5]);
}

fn render_header(frame: &mut Frame<'_>, state: &TimerState, area: Rect) {
    let status_color = match state.status {
        RunStatus::Running => Color::Green,
        RunStatus::Paused => Color::Yellow,
        RunStatus::Idle => Color::DarkGray,
    };

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", state.phase.display_name()),
            Style::default()
                .fg(phase_color(state.phase))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("· "),
        Span::styled(state.status.to_string(), Style::default().fg(status_color)),
    ]);

    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" studyfocus ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(header, area);
}

fn render_countdown(frame: &mut Frame<'_>, state: &TimerState, area: Rect) {
    let countdown = Paragraph::new(state.format_remaining())
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(phase_color(state.phase))
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(countdown, area);
}

fn render_progress(frame: &mut Frame<'_>, state: &TimerState, area: Rect) {
    let progress = state.progress().clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Progress "))
        .gauge_style(Style::default().fg(phase_color(state.phase)))
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));

    frame.render_widget(gauge, area);
}

fn render_counters(frame: &mut Frame<'_>, app: &App, state: &TimerState, area: Rect) {
    let (work, brk) = app.durations();
    let text = format!(
        "Sessions: {}   Focus: {}   Work {}m / Break {}m",
        state.sessions_completed,
        format_duration(state.total_focus()),
        work / 60,
        brk / 60
    );

    let counters = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" This run "),
    );

    frame.render_widget(counters, area);
}

fn render_stats(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(stats) = &app.stats else {
        let empty = Paragraph::new("Stats unavailable")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let bars: Vec<Bar<'_>> = stats
        .weekly_progress
        .iter()
        .map(|day| {
            Bar::default()
                .value(day.minutes)
                .label(Line::from(day.date.format("%a").to_string()))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Last 7 days (min) "))
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1);
    frame.render_widget(chart, columns[0]);

    let mut lines = vec![
        Line::from(format!("Streak:   {} days", stats.streak_days)),
        Line::from(format!("Sessions: {}", stats.total_sessions)),
        Line::from(format!("Average:  {:.0} min", stats.average_session_minutes)),
        Line::from(format!(
            "Goal:     {}/{} min ({:.0}%)",
            stats.weekly_minutes, stats.weekly_goal_minutes, stats.weekly_goal_percent
        )),
        Line::from(""),
    ];

    for interval in &app.recent {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<6}", interval.kind.as_str()),
                Style::default().fg(phase_color(interval.kind)),
            ),
            Span::raw(format!(
                " {} min  {}",
                interval.duration_minutes,
                interval.date_local().format("%H:%M")
            )),
        ]));
    }

    let summary = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Stats "));
    frame.render_widget(summary, columns[1]);
}

/// Render the status bar.
fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_text = app.status.as_deref().unwrap_or(HELP);
    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
