//! Renderers for individual widgets.
//!
//! Each helper turns widget state into ratatui text; layout and borders are
//! decided by the caller in `ui::draw`.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, List, ListItem},
};

use crate::theme::Theme;
use crate::widgets::calendar::{CalendarCell, CellStyle};
use crate::widgets::date_picker::DatePicker;
use crate::widgets::divider::Divider;
use crate::widgets::menu::Menu;
use crate::widgets::notification::{InlineNotification, NotificationKind};
use crate::widgets::progress::ProgressDialog;

/// Columns per day cell
pub const CELL_WIDTH: usize = 4;

fn cell_style(cell: &CalendarCell, theme: &Theme) -> Style {
    let style = match cell.style() {
        CellStyle::Selected => Style::default()
            .fg(Color::Black)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD),
        CellStyle::Today => Style::default()
            .fg(theme.today)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        CellStyle::Special => {
            let fg = cell.color_override.map(Color::from).unwrap_or(theme.special);
            Style::default().fg(fg)
        }
        CellStyle::Dimmed => Style::default().fg(theme.text_dim),
        CellStyle::Normal => Style::default().fg(theme.text),
    };

    if cell.is_disabled {
        style.fg(theme.disabled).add_modifier(Modifier::CROSSED_OUT)
    } else {
        style
    }
}

/// Weekday header followed by the six week rows. The cursor cell is drawn
/// reversed when `focused`.
pub fn calendar_lines(picker: &DatePicker, theme: &Theme, focused: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(7);

    let header: Vec<Span> = picker
        .day_names()
        .into_iter()
        .map(|name| {
            let name: String = name.chars().take(CELL_WIDTH - 1).collect();
            Span::styled(
                format!("{:>width$}", name, width = CELL_WIDTH),
                Style::default().fg(theme.header).add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    lines.push(Line::from(header));

    let cursor = picker.cursor();
    for (row_idx, row) in picker.grid().rows().enumerate() {
        let spans: Vec<Span> = row
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                let mut style = cell_style(cell, theme);
                if focused && row_idx * row.len() + col == cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(format!("{:>width$}", cell.day_of_month, width = CELL_WIDTH), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

pub fn divider_line(divider: &Divider, width: u16, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        divider.render(width as usize),
        Style::default().fg(theme.inactive),
    ))
}

fn notification_color(kind: NotificationKind, theme: &Theme) -> Color {
    match kind {
        NotificationKind::Error => theme.danger,
        NotificationKind::Warning => theme.warning,
        NotificationKind::Success => theme.success,
        NotificationKind::SuccessBlue => theme.header,
        NotificationKind::Add | NotificationKind::Info | NotificationKind::Search => theme.text,
    }
}

pub fn notification_line(note: &InlineNotification, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", note.label()),
        Style::default().fg(notification_color(note.kind, theme)),
    ))
}

/// Bar for the progress dialog. Stripes are drawn by alternating the label
/// marker with the animation phase.
pub fn progress_gauge(progress: &ProgressDialog, theme: &Theme) -> Gauge<'static> {
    let percent = (progress.fraction() * 100.0).round() as u16;
    let label = if progress.show_stripes {
        let marker = ["/", "-", "\\", "|"][progress.stripe_phase() % 4];
        format!("{} {}%", marker, percent)
    } else {
        format!("{}%", percent)
    };

    Gauge::default()
        .gauge_style(Style::default().fg(theme.accent).bg(theme.bg_selected))
        .ratio(progress.fraction())
        .label(label)
}

pub fn menu_list(menu: &Menu, theme: &Theme) -> List<'static> {
    let items: Vec<ListItem> = menu
        .items()
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let style = if idx == menu.highlighted() {
                Style::default().fg(theme.accent).bg(theme.bg_selected)
            } else {
                Style::default().fg(theme.text)
            };
            let icon = if item.has_icon() {
                format!("{} ", item.icon)
            } else {
                String::new()
            };
            ListItem::new(Line::from(Span::styled(format!("{}{}", icon, item.content), style)))
        })
        .collect();

    List::new(items)
}
