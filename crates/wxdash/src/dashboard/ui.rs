//! Rendering of the dashboard.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Clear, Dataset, GraphType, Paragraph},
    Frame,
};

use super::app::{App, View};
use crate::config::Units;
use crate::history::History;
use crate::reading::{Metric, WeatherReading};

const MISSING: &str = "--";

/// Number of time labels on each chart's x axis.
const TIME_LABELS: usize = 4;

const ACCENT: Color = Color::Cyan;
const TITLE: Color = Color::Yellow;
const VALUE: Color = Color::Green;

/// Draw the whole dashboard.
pub fn render(frame: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(headline(app), outer[0]);

    match app.view() {
        View::Loading => {
            let loading = Paragraph::new(format!("Fetching weather for {}...", app.city()))
                .alignment(Alignment::Center)
                .block(bordered(" Current Conditions "));
            frame.render_widget(loading, outer[1]);
        }
        View::Failed(message) => {
            let error = Paragraph::new(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(bordered(" Error "));
            frame.render_widget(error, outer[1]);
        }
        View::Ready { reading, history } => {
            render_conditions(frame, outer[1], app, reading, history);
        }
    }

    frame.render_widget(footer(app), outer[2]);

    if let Some(input) = app.input() {
        render_input(frame, outer[1], input);
    }
}

fn headline(app: &App) -> Paragraph<'static> {
    let subtitle = match app.view() {
        View::Ready { reading, .. } => reading.headline(),
        View::Loading => MISSING.to_string(),
        View::Failed(_) => String::new(),
    };

    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Weather in {}", app.city()),
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::Blue))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .border_type(BorderType::Rounded),
    )
}

fn render_conditions(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    reading: &WeatherReading,
    history: &History,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[0]);

    let units = app.units();
    for (slot, metric) in cards
        .iter()
        .zip([Metric::Temperature, Metric::Humidity, Metric::WindSpeed])
    {
        frame.render_widget(metric_card(metric, units, reading), *slot);
    }

    if history.is_empty() {
        return;
    }

    let chart_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let mut slots = Vec::with_capacity(Metric::ALL.len());
    for row in chart_rows.iter() {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);
        slots.extend(halves.iter().copied());
    }

    for (slot, metric) in slots.into_iter().zip(Metric::ALL) {
        render_trend(frame, slot, app.city(), units, metric, history);
    }
}

fn metric_card(metric: Metric, units: Units, reading: &WeatherReading) -> Paragraph<'static> {
    let value = metric.value(reading);
    let text = match metric {
        Metric::Humidity | Metric::Pressure => format!("{value:.0}"),
        Metric::Temperature | Metric::WindSpeed => format!("{value:.1}"),
    };

    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(VALUE).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(bordered(&format!(" {} ", metric.label(units))))
}

fn render_trend(
    frame: &mut Frame,
    area: Rect,
    city: &str,
    units: Units,
    metric: Metric,
    history: &History,
) {
    let trend = history.trend(metric);
    let datasets = vec![Dataset::default()
        .name(metric.unit(units))
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(ACCENT))
        .data(&trend.points)];

    let y_labels = vec![
        format!("{:.1}", trend.y_bounds[0]),
        format!("{:.1}", (trend.y_bounds[0] + trend.y_bounds[1]) / 2.0),
        format!("{:.1}", trend.y_bounds[1]),
    ];

    let chart = Chart::new(datasets)
        .block(bordered(&format!(" {} Trend - {} ", metric.name(), city)))
        .x_axis(
            Axis::default()
                .title("Time")
                .style(Style::default().fg(Color::Gray))
                .bounds(history.x_bounds())
                .labels(history.time_labels(TIME_LABELS)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(trend.y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn footer(app: &App) -> Paragraph<'static> {
    let updated = app.last_update().map_or_else(
        || MISSING.to_string(),
        |t| t.format("%d-%m-%Y %H:%M:%S").to_string(),
    );

    let hints = if app.input().is_some() {
        "Enter: confirm  Esc: cancel"
    } else {
        "c: change city  r: refresh  q: quit"
    };

    Paragraph::new(Line::from(vec![
        Span::styled(format!(" {hints}"), Style::default().fg(Color::Gray)),
        Span::raw("   "),
        Span::raw("Last update: "),
        Span::styled(updated, Style::default().fg(VALUE)),
    ]))
}

fn render_input(frame: &mut Frame, area: Rect, input: &str) {
    let width = area.width.min(50);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(3) / 2,
        width,
        height: area.height.min(3),
    };

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(input.to_string()).block(bordered(" Enter City Name: ")),
        popup,
    );

    let cursor_x = u16::try_from(input.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(popup.x + 1)
        .min(popup.right().saturating_sub(2));
    frame.set_cursor_position((cursor_x, popup.y + 1));
}

fn bordered(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title.to_string(), Style::default().fg(TITLE)))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(ACCENT))
        .border_type(BorderType::Rounded)
}
