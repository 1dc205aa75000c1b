use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use lenddesk_core::LoadState;

use crate::app::{App, LoginFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Visible width of the login text fields.
const FIELD_WIDTH: usize = 24;

/// The tail of `value` that fits in a field, so the cursor stays visible.
fn visible_tail(value: &str, width: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(width)).collect()
}

fn field_line<'a>(label: &'a str, shown: String, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { " " };
    Line::from(vec![
        Span::raw("   "),
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), style),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Shown while there are no cached users to log in against.
fn fetch_hint(app: &App) -> Option<&'static str> {
    if !app.listing.is_empty() {
        return None;
    }
    Some(match app.loader.state() {
        LoadState::Failed => "Could not fetch users. Press [F5] to try again.",
        _ => "No users cached yet. Press [F5] to fetch them.",
    })
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let fetch_hint = fetch_hint(app);

    // Errors may wrap onto a second line
    let mut height = if app.login_error.is_some() { 16 } else { 13 };
    if fetch_hint.is_some() {
        height += 2;
    }
    let area = centered_rect_fixed(54, height, area);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("  lendsqr", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled("  Welcome!", styles::highlight_style())),
        Line::from(Span::styled(
            "  Enter details to login.",
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    lines.push(field_line(
        "Email:    ",
        visible_tail(&app.login_email, FIELD_WIDTH),
        app.login_focus == LoginFocus::Email,
    ));

    let masked = "*".repeat(app.login_password.chars().count().min(FIELD_WIDTH));
    lines.push(field_line(
        "Password: ",
        masked,
        app.login_focus == LoginFocus::Password,
    ));

    lines.push(Line::from(Span::styled(
        "   FORGOT PASSWORD?",
        styles::muted_style(),
    )));
    lines.push(Line::from(""));

    let button_focused = app.login_focus == LoginFocus::Button;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = if button_focused { " ▶ LOG IN ◀ " } else { "   LOG IN   " };
    lines.push(Line::from(vec![
        Span::raw("                ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    if let Some(hint) = fetch_hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", hint),
            styles::highlight_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
