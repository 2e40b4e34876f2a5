use coleta_core::{DiscoveryPhase, DiscoveryView, FilterState, MapView, Notice};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use crate::app::{App, Focus, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let view = app.discovery.view();

    // Title / header
    let (title, lines) = match app.screen {
        Screen::Points => (
            points_title(app.discovery.filter()),
            vec![
                Line::from("Bem vindo.".bold()),
                Line::from("Encontre no mapa um ponto de coleta."),
            ],
        ),
        Screen::Detail => (
            "Coleta · Ponto de coleta".to_owned(),
            vec![
                Line::from("Ponto de coleta".bold()),
                Line::from("Entre em contato pelo WhatsApp ou e-mail."),
            ],
        ),
    };
    let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::Points => draw_points(frame, app, &view, *content_area),
        Screen::Detail => draw_detail(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::Points => {
            "Tab switch focus · ←/→ category · Space toggle · ↑/↓ point · Enter open · Esc back · q quit"
        }
        Screen::Detail => "w WhatsApp · e E-mail · Esc/←/b back · q/Ctrl-C quit",
    };

    let is_loading = app.screen == Screen::Points && view.phase == DiscoveryPhase::Loading;
    let failure = view
        .catalog_failure
        .as_deref()
        .or(view.points_failure.as_deref())
        .filter(|_| app.screen == Screen::Points);

    let status_text = if is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.status_message {
        format!("{msg} · {nav_hint}")
    } else if let Some(err) = failure {
        format!("{err} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if failure.is_some() {
        Style::default().fg(Color::Red)
    } else if is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);

    if app.screen == Screen::Points
        && let Some(notice) = &view.notice
    {
        draw_notice(frame, notice, area);
    }
}

fn draw_points(frame: &mut Frame<'_>, app: &App, view: &DiscoveryView, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // map
            Constraint::Length(3), // category strip
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [map_area, strip_area] = chunks else {
        return;
    };

    let map_border = focus_style(app.focus == Focus::Map);
    match &view.map {
        Some(map) => draw_map(frame, app, map, *map_area, map_border),
        None => {
            let message = if view.phase == DiscoveryPhase::LocationDenied {
                "Location permission denied. The map is unavailable, filtering still works."
            } else {
                "Waiting for your location…"
            };
            let paragraph = Paragraph::new(message)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(map_border)
                        .title("Map"),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, *map_area);
        }
    }

    let spans = view
        .categories
        .iter()
        .enumerate()
        .flat_map(|(idx, chip)| {
            let mark = if chip.selected { "[x]" } else { "[ ]" };
            let mut style = if chip.selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            if idx == app.category_index && app.focus == Focus::Categories {
                style = style.add_modifier(Modifier::REVERSED);
            }
            [
                Span::styled(format!("{mark} {}", chip.category.title), style),
                Span::raw("  "),
            ]
        })
        .collect::<Vec<Span<'_>>>();

    let strip_title = match view.categories.len() {
        0 => "Items".to_owned(),
        count => format!("Items ({count})"),
    };
    let strip = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::Categories))
            .title(strip_title),
    );
    frame.render_widget(strip, *strip_area);
}

fn draw_map(frame: &mut Frame<'_>, app: &App, map: &MapView, area: Rect, border: Style) {
    let center = map.region.center;
    let refreshed = app
        .points_refreshed_at
        .map(|at| format!(" · updated {}", at.format("%H:%M:%S")))
        .unwrap_or_default();
    let title = format!(
        "Map around {:.4}, {:.4}{refreshed}",
        center.latitude, center.longitude
    );

    if map.markers.is_empty() {
        let paragraph = Paragraph::new("No collection points for the selected items.")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(title),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows = map.markers.iter().map(|point| {
        let in_region = (point.position.latitude - center.latitude).abs()
            <= map.region.latitude_delta
            && (point.position.longitude - center.longitude).abs() <= map.region.longitude_delta;
        let style = if in_region {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(point.name.clone()),
            Cell::from(format!("{:.5}", point.position.latitude)),
            Cell::from(format!("{:.5}", point.position.longitude)),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["Point", "Latitude", "Longitude"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(app.marker_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_detail(frame: &mut Frame<'_>, app: &App, area: Rect) {
    // Anything but a loaded point renders as an empty screen.
    let Some(detail) = app.detail.view() else {
        frame.render_widget(Block::default().borders(Borders::ALL), area);
        return;
    };

    let lines = vec![
        Line::from(detail.point.name.as_str().bold().fg(Color::Magenta)),
        Line::from(detail.items_summary()),
        Line::from(""),
        Line::from("Endereço".bold()),
        Line::from(detail.address_line()),
        Line::from(""),
        Line::from(format!("WhatsApp: {}", detail.point.whatsapp)),
        Line::from(format!("E-mail:   {}", detail.point.email)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Point #{}", detail.point.id)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_notice(frame: &mut Frame<'_>, notice: &Notice, area: Rect) {
    let popup = centered_rect(area, 50, 7);
    let paragraph = Paragraph::new(vec![
        Line::from(notice.message.as_str()),
        Line::from(""),
        Line::from("Enter to dismiss".italic()),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(notice.title.as_str()),
    )
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

/// Header title of the points screen: route region and selection size.
fn points_title(filter: &FilterState) -> String {
    let mut parts = vec!["Coleta".to_owned()];
    match (filter.city(), filter.state()) {
        (Some(city), Some(state)) => parts.push(format!("{city} - {state}")),
        (Some(place), None) | (None, Some(place)) => parts.push(place.to_owned()),
        (None, None) => {}
    }
    match filter.selected().len() {
        0 => {}
        1 => parts.push("1 item selected".to_owned()),
        count => parts.push(format!("{count} items selected")),
    }
    parts.join(" · ")
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
