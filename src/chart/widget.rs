use chrono::{DateTime, Local, Utc};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Paragraph, Widget,
    },
};

use super::{ChartFrame, Metric, Series};

/// Draws a [`ChartFrame`]: one stacked canvas per series, time labels underneath.
pub struct ChartFrameWidget<'a> {
    frame: Option<&'a ChartFrame>,
    fallback_title: &'a str,
}

impl<'a> ChartFrameWidget<'a> {
    pub fn new(frame: Option<&'a ChartFrame>, fallback_title: &'a str) -> Self {
        Self {
            frame,
            fallback_title,
        }
    }
}

fn metric_color(metric: Metric) -> Color {
    match metric {
        Metric::Temperature => Color::Red,
        Metric::Humidity => Color::LightBlue,
    }
}

fn format_time(at: &DateTime<Utc>, format: &str) -> String {
    at.with_timezone(&Local).format(format).to_string()
}

/// Seconds since `origin`, used as the canvas x coordinate.
fn x_of(at: &DateTime<Utc>, origin: &DateTime<Utc>) -> f64 {
    (*at - *origin).num_milliseconds() as f64 / 1000.0
}

fn x_bounds(span: f64) -> [f64; 2] {
    let pad = (span * 0.05).max(0.5);
    [-pad, span + pad]
}

fn y_bounds(series: &Series) -> [f64; 2] {
    let low = series
        .points
        .iter()
        .map(|&(_, v)| v)
        .fold(f64::INFINITY, f64::min);
    let high = series
        .labels
        .iter()
        .map(|label| label.y)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = (high - low).max(1.0);
    [low - range * 0.2, high + range * 0.2]
}

impl Widget for ChartFrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = self
            .frame
            .map(|frame| frame.title.as_str())
            .unwrap_or(self.fallback_title);

        let frame = match self.frame {
            Some(frame) if !frame.is_empty() => frame,
            _ => {
                Paragraph::new("No data")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(
                        Block::default()
                            .title(format!(" {title} "))
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(Color::Gray)),
                    )
                    .render(area, buf);
                return;
            }
        };

        let outer = Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));
        let inner = outer.inner(area);
        outer.render(area, buf);

        let mut constraints: Vec<Constraint> = frame
            .series
            .iter()
            .map(|_| Constraint::Ratio(1, frame.series.len() as u32))
            .collect();
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let origin = frame.series[0].points[0].0;
        let last = frame.series[0].points[frame.series[0].points.len() - 1].0;
        let bounds_x = x_bounds(x_of(&last, &origin));

        for (series, chunk) in frame.series.iter().zip(chunks.iter()) {
            render_series(series, &origin, bounds_x, *chunk, buf);
        }

        render_time_axis(frame, &origin, &last, chunks[chunks.len() - 1], buf);
    }
}

fn render_series(series: &Series, origin: &DateTime<Utc>, bounds_x: [f64; 2], area: Rect, buf: &mut Buffer) {
    let color = metric_color(series.metric);
    let coords: Vec<(f64, f64)> = series
        .points
        .iter()
        .map(|(at, value)| (x_of(at, origin), *value))
        .collect();

    // Canvas print starts at x, so shift each label left by half its width.
    let x_per_cell = (bounds_x[1] - bounds_x[0]) / f64::from(area.width.saturating_sub(2).max(1));
    let labels: Vec<(f64, f64, String)> = series
        .labels
        .iter()
        .map(|label| {
            let half_width = label.text.chars().count() as f64 / 2.0;
            (
                x_of(&label.at, origin) - half_width * x_per_cell,
                label.y,
                label.text.clone(),
            )
        })
        .collect();

    Canvas::default()
        .block(
            Block::default()
                .title(format!(" {} ", series.metric.axis_label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds(bounds_x)
        .y_bounds(y_bounds(series))
        .paint(|ctx| {
            for pair in coords.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color,
                });
            }
            ctx.draw(&Points {
                coords: &coords,
                color: Color::White,
            });
            ctx.layer();
            for (x, y, text) in &labels {
                ctx.print(*x, *y, Line::styled(text.clone(), Style::default().fg(color)));
            }
        })
        .render(area, buf);
}

fn render_time_axis(
    frame: &ChartFrame,
    origin: &DateTime<Utc>,
    last: &DateTime<Utc>,
    area: Rect,
    buf: &mut Buffer,
) {
    let style = Style::default().fg(Color::Gray);
    let middle = *origin + (*last - *origin) / 2;

    Paragraph::new(format_time(origin, &frame.time_format))
        .style(style)
        .alignment(Alignment::Left)
        .render(area, buf);
    Paragraph::new(format!(
        "{} ({})",
        format_time(&middle, &frame.time_format),
        frame.x_label
    ))
    .style(style)
    .alignment(Alignment::Center)
    .render(area, buf);
    Paragraph::new(format_time(last, &frame.time_format))
        .style(style)
        .alignment(Alignment::Right)
        .render(area, buf);
}
