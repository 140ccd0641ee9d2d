use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{chart::ChartFrameWidget, db::SetpointField, source::ReadingSource};

use super::app::{App, Page, Status, StatusKind};

pub fn draw<S: ReadingSource>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(header(app), chunks[0]);

    match app.page {
        Page::Home => draw_home(frame, app, chunks[1]),
        Page::Panel(index) => draw_panel(frame, app, index, chunks[1]),
        Page::Setpoint => draw_setpoint(frame, app, chunks[1]),
    }

    frame.render_widget(status(app.status.as_ref()), chunks[2]);
    frame.render_widget(
        Paragraph::new(key_help(app)).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

fn header<S>(app: &App<S>) -> Paragraph<'static> {
    let line = match &app.title_input {
        Some(input) => Line::from(vec![
            Span::styled("Title: ", Style::default().fg(Color::Yellow)),
            Span::raw(input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        None => Line::from(Span::styled(
            app.settings.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    };

    Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

fn draw_home<S: ReadingSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from("  Enter / g   open the first panel"),
    ];
    for (index, panel) in app.dashboard.panels().iter().enumerate().take(9) {
        let config = panel.config();
        lines.push(Line::from(format!(
            "  {}           {} ({} readings every {} ms)",
            index + 1,
            config.title,
            config.window_size,
            config.refresh_ms
        )));
    }
    lines.push(Line::from("  s           setpoint"));
    lines.push(Line::from("  t           edit title"));
    lines.push(Line::from("  q           quit"));

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Menu ")),
        area,
    );
}

fn draw_panel<S: ReadingSource>(frame: &mut Frame, app: &App<S>, index: usize, area: Rect) {
    let Some(panel) = app.dashboard.panel(index) else {
        return;
    };
    let chart = app.dashboard.charts().frame(panel.id());
    frame.render_widget(ChartFrameWidget::new(chart, &panel.config().title), area);
}

fn draw_setpoint<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let form = &app.form;
    let field_line = |field: SetpointField, key: char| {
        let editing = form.editing == Some(field);
        let value_style = if editing {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        let mut value = form.input(field).to_string();
        if editing {
            value.push('_');
        } else if value.is_empty() {
            value.push_str("--");
        }
        Line::from(vec![
            Span::raw(format!("  [{key}] {:<12}", field.as_str())),
            Span::styled(value, value_style),
            Span::raw(format!(" {}", field.unit())),
        ])
    };

    let updated = form
        .loaded
        .as_ref()
        .map(|setpoint| {
            setpoint
                .updated_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "never".to_string());

    let lines = vec![
        Line::from(""),
        field_line(SetpointField::Temperature, 'e'),
        field_line(SetpointField::Humidity, 'h'),
        Line::from(""),
        Line::from(Span::styled(
            format!("  last updated: {updated}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Setpoint ")),
        area,
    );
}

fn status(status: Option<&Status>) -> Paragraph<'static> {
    let (message, color) = match status {
        Some(Status {
            kind: StatusKind::Error,
            message,
        }) => (message.clone(), Color::Red),
        Some(Status { message, .. }) => (message.clone(), Color::Yellow),
        None => (String::new(), Color::Yellow),
    };

    Paragraph::new(message)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(" Status "),
        )
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
}

fn key_help<S>(app: &App<S>) -> &'static str {
    if app.title_input.is_some() {
        return " Enter save title   Esc cancel";
    }
    if app.form.editing.is_some() {
        return " Enter save   Esc cancel   Backspace delete";
    }
    match app.page {
        Page::Home => " Enter/g first panel   1-9 panel   s setpoint   t title   q quit",
        Page::Panel(_) => " ←/→ switch panel   Esc/b back   q quit",
        Page::Setpoint => " e temperature   h humidity   Enter save   r reload   Esc back",
    }
}
