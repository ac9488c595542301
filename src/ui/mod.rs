mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup, Section};
use crate::theme::Theme;
use crate::widgets::divider::Divider;
use crate::widgets::time_picker::TimeField;

// Theme is installed once at startup, before the first frame
static THEME: OnceLock<Theme> = OnceLock::new();

pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already initialized");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Section tabs
            Constraint::Min(8),    // Active widget
            Constraint::Length(1), // Notification line
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_tabs(f, app, chunks[0]);
    match app.section {
        Section::Calendar => draw_calendar(f, app, chunks[1]),
        Section::AutoComplete => draw_autocomplete(f, app, chunks[1]),
        Section::Decimal => draw_decimal(f, app, chunks[1]),
        Section::Time => draw_time(f, app, chunks[1]),
        Section::Integer => draw_integer(f, app, chunks[1]),
        Section::Agenda => draw_agenda(f, app, chunks[1]),
    }
    draw_notification(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::Progress => draw_progress_popup(f, app),
        Popup::Menu => draw_menu_popup(f, app),
    }
}

fn section_block(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()))
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let spans: Vec<Span> = Section::ALL
        .iter()
        .flat_map(|section| {
            let style = if *section == app.section {
                Style::default().fg(accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(inactive())
            };
            vec![Span::styled(format!(" {} ", section.title()), style), Span::raw("│")]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_calendar(f: &mut Frame, app: &App, area: Rect) {
    let picker = &app.date_picker;
    let block = section_block(&picker.grid().label);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((components::CELL_WIDTH * 7 + 2) as u16),
            Constraint::Min(20),
        ])
        .split(inner);

    let grid = components::calendar_lines(picker, theme(), app.popup == Popup::None);
    f.render_widget(Paragraph::new(grid), columns[0]);

    let width = columns[1].width.saturating_sub(1);
    let cursor_date = picker.grid().cells.get(picker.cursor()).map(|c| c.date);
    let mut details = vec![
        components::divider_line(&Divider::new("Selected"), width, theme()),
        Line::from(Span::styled(
            format!(" {}", picker.value().format("%A %-d %B %Y")),
            Style::default().fg(text()),
        )),
        components::divider_line(&Divider::new("Cursor"), width, theme()),
    ];
    if let Some(date) = cursor_date {
        let state = match picker.special_dates().get(date) {
            Some(rule) if rule.disabled => " (disabled)",
            Some(_) => " (marked)",
            None => "",
        };
        details.push(Line::from(Span::styled(
            format!(" {}{}", date.format("%a %-d %b"), state),
            Style::default().fg(text_dim()),
        )));
    }
    details.push(components::divider_line(&Divider::new("Special days"), width, theme()));
    details.push(Line::from(Span::styled(
        format!(" {}", picker.special_dates().len()),
        Style::default().fg(text_dim()),
    )));

    f.render_widget(Paragraph::new(details), columns[1]);
}

fn draw_autocomplete(f: &mut Frame, app: &App, area: Rect) {
    let ac = &app.autocomplete;
    let block = section_block("Autocomplete");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    let status = if !ac.enabled() {
        " (disabled)"
    } else if ac.is_loading() {
        " …"
    } else {
        ""
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(ac.input().to_string(), Style::default().fg(text())),
        Span::styled("▏", Style::default().fg(accent())),
        Span::styled(status, Style::default().fg(text_dim())),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(inactive())),
    );
    f.render_widget(input, rows[0]);

    if ac.menu_visible() {
        let items: Vec<ListItem> = ac
            .suggestions()
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let style = if idx == ac.highlighted() {
                    Style::default().fg(accent()).bg(bg_selected())
                } else {
                    Style::default().fg(text())
                };
                ListItem::new(Span::styled(format!(" {}", s), style))
            })
            .collect();
        f.render_widget(List::new(items), rows[1]);
    }
}

fn draw_decimal(f: &mut Frame, app: &App, area: Rect) {
    let d = &app.decimal;
    let block = section_block("Decimal");

    let shown = if d.text().is_empty() {
        Span::styled(d.placeholder(), Style::default().fg(text_dim()))
    } else {
        Span::styled(d.text().to_string(), Style::default().fg(text()))
    };
    let mode = if d.is_atm() { "ATM entry" } else { "free entry" };
    let step = d.step_attribute().unwrap_or_else(|| "none".to_string());

    let lines = vec![
        Line::from(vec![Span::raw(" "), shown]),
        Line::from(""),
        Line::from(Span::styled(
            format!(" {} · step {} · value {}", mode, step, d.value_as_number()),
            Style::default().fg(text_dim()),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_time(f: &mut Frame, app: &App, area: Rect) {
    let tp = &app.time_picker;
    let block = section_block("Time");

    let field = |focus: TimeField, content: String| {
        let style = if tp.focus() == focus {
            Style::default().fg(accent()).bg(bg_selected()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text())
        };
        Span::styled(content, style)
    };

    let minute = tp.value().format("%M").to_string();
    let mut spans = vec![
        Span::raw(" "),
        field(TimeField::Hour, format!("{:>2}", tp.display_hour())),
        Span::raw(":"),
        field(TimeField::Minute, minute),
    ];
    if !tp.is_24hr() {
        spans.push(Span::raw(" "));
        spans.push(field(TimeField::Meridiem, tp.meridiem().label().to_string()));
    }

    let lines = vec![
        Line::from(spans),
        Line::from(""),
        Line::from(Span::styled(format!(" {}", tp.label()), Style::default().fg(text_dim()))),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_integer(f: &mut Frame, app: &App, area: Rect) {
    let bar = &app.integer_bar;
    let block = section_block("Integer picker");

    let button_style = if bar.is_disabled() {
        Style::default().fg(inactive())
    } else {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {}  ", bar.label), Style::default().fg(text())),
        Span::styled(format!("[ {} ▾]", bar.button_text()), button_style),
    ])];
    if let Some(sub) = bar.sublabel() {
        lines.push(Line::from(Span::styled(format!(" {}", sub), Style::default().fg(text_dim()))));
    }

    let picker = bar.picker();
    let values: Vec<Span> = picker
        .values()
        .iter()
        .map(|v| {
            let style = if *v == picker.value() {
                Style::default().fg(accent()).bg(bg_selected())
            } else {
                Style::default().fg(text_dim())
            };
            Span::styled(format!(" {} ", v), style)
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(values));

    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_agenda(f: &mut Frame, app: &App, area: Rect) {
    let block = section_block("Agenda");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = inner.height as usize;
    let first = app.agenda_selected.saturating_sub(height.saturating_sub(1));
    let pulsing = app.agenda_item.is_pulsing(std::time::Instant::now());

    let items: Vec<ListItem> = app
        .agenda_rows
        .iter()
        .enumerate()
        .skip(first)
        .take(height)
        .map(|(idx, row)| {
            let style = if idx == app.agenda_selected && pulsing {
                Style::default().fg(Color::Black).bg(accent())
            } else if idx == app.agenda_selected {
                Style::default().fg(accent()).bg(bg_selected())
            } else {
                Style::default().fg(text())
            };
            ListItem::new(Span::styled(format!(" {}", row), style))
        })
        .collect();

    let mut list_area = inner;
    if app.agenda.is_fetching() && list_area.height > 1 {
        list_area.height -= 1;
        let loading = Rect::new(inner.x, inner.bottom() - 1, inner.width, 1);
        f.render_widget(
            Paragraph::new(Span::styled(" loading…", Style::default().fg(text_dim()))),
            loading,
        );
    }
    f.render_widget(List::new(items), list_area);
}

fn draw_notification(f: &mut Frame, app: &App, area: Rect) {
    if let Some(note) = &app.notification {
        f.render_widget(Paragraph::new(components::notification_line(note, theme())), area);
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.section {
        Section::Calendar => vec![
            ("←↑↓→", "Move"),
            ("Enter", "Select"),
            ("[ ]", "Month"),
            ("t", "Today"),
            ("m", "Menu"),
            ("p", "Export"),
        ],
        Section::AutoComplete => vec![("type", "Search"), ("↑↓", "Pick"), ("Enter", "Accept"), ("Esc", "Close")],
        Section::Decimal => vec![("0-9", "Type"), ("Enter", "Commit")],
        Section::Time => vec![("←→", "Field"), ("↑↓", "Change"), ("n", "Now")],
        Section::Integer => vec![("←→", "Change"), ("x", "Disable")],
        Section::Agenda => vec![("↑↓", "Scroll"), ("Enter", "Tap")],
    };

    let mut spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();
    spans.push(Span::styled("Tab", Style::default().fg(accent())));
    spans.push(Span::styled(" Next", Style::default().fg(text_dim())));

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 30 { 95 } else { 75 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let heading = |title: &str| {
        Line::from(Span::styled(
            format!("═══ {} ═══", title),
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        ))
    };
    let entry = |key: &str, what: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), Style::default().fg(accent())),
            Span::raw(what.to_string()),
        ])
    };

    let help_text = vec![
        heading("Navigation"),
        entry("Tab", "Next widget"),
        entry("Shift+Tab", "Previous widget"),
        entry("? / F1", "This help (F1 while typing)"),
        entry("q", "Quit (outside text fields)"),
        Line::from(""),
        heading("Calendar"),
        entry("Arrows", "Move the cursor, paging months at the edges"),
        entry("Enter", "Select the day under the cursor"),
        entry("[ / ]", "Previous / next month"),
        entry("t", "Jump to today"),
        entry("m", "Day menu (right click works too)"),
        entry("p", "Run the export demo"),
        Line::from(""),
        heading("Autocomplete"),
        entry("type", "Suggestions appear after a short pause"),
        entry("↑ / ↓", "Highlight a suggestion"),
        entry("Enter", "Accept the highlighted suggestion"),
        Line::from(""),
        heading("Command line"),
        entry("--calendar", "Print a month grid (add --json for JSON)"),
        entry("--clean", "Escape text for suggestion lists"),
        entry("--dirty", "Decode escaped suggestion text"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" trellis Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_progress_popup(f: &mut Frame, app: &App) {
    let progress = &app.progress;
    let popup_area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", progress.title),
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if progress.message().is_some() { 1 } else { 0 }),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    if let Some(message) = progress.message() {
        f.render_widget(
            Paragraph::new(Span::styled(message.to_string(), Style::default().fg(text()))),
            rows[0],
        );
    }
    f.render_widget(components::progress_gauge(progress, theme()), rows[2]);

    if let Some(cancel) = progress.cancel_text() {
        f.render_widget(
            Paragraph::new(Span::styled(
                format!("[ {} ]", cancel),
                Style::default().fg(danger()).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            rows[3],
        );
    }
}

fn draw_menu_popup(f: &mut Frame, app: &App) {
    let area = app.menu.area().intersection(f.area());
    if area.is_empty() {
        return;
    }
    f.render_widget(Clear, area);

    let list = components::menu_list(&app.menu, theme()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent())),
    );
    f.render_widget(list, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
