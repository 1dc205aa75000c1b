use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use lenddesk_core::store::age_display;
use lenddesk_core::Route;

use crate::app::{App, AppState, DetailTab};

use super::styles;
use super::views::{details, login, users};

const LOGO: &str = "  lendsqr";

pub fn render(frame: &mut Frame, app: &App) {
    if matches!(app.state, AppState::Loading) || app.loader.is_blocking() {
        render_loading_screen(frame);
        return;
    }

    if matches!(app.route, Route::Login | Route::Root) {
        login::render(frame, app, frame.area());
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title bar
                Constraint::Length(3), // Navigation
                Constraint::Min(10),   // Main content
                Constraint::Length(2), // Status bar
            ])
            .split(frame.area());

        render_title_bar(frame, app, chunks[0]);
        render_nav_bar(frame, app, chunks[1]);
        render_main_content(frame, app, chunks[2]);
        render_status_bar(frame, app, chunks[3]);
    }

    // Render overlays
    if matches!(app.state, AppState::Filtering) {
        users::render_filter_overlay(frame, app);
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_loading_screen(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(LOGO, styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "  Fetching latest user data...",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("  Ctrl+C to quit", styles::muted_style())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let right = format!("Docs | {} | [?] Help", app.current_user_name());
    let padding = (area.width as usize)
        .saturating_sub(LOGO.chars().count() + right.chars().count() + 4);

    let title_line = Line::from(vec![
        Span::styled(LOGO, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_nav_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    match app.route {
        Route::UserDetail(_) => {
            spans.push(Span::styled("← Back to Users", styles::muted_style()));
            spans.push(Span::raw("   "));
            for (i, tab) in DetailTab::ALL.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" | ", styles::muted_style()));
                }
                spans.push(Span::styled(tab.title(), styles::tab_style(*tab == app.detail_tab)));
            }
        }
        _ => {
            spans.push(Span::styled("Users", styles::tab_style(true)));
            if !app.listing.criteria().is_empty() {
                spans.push(Span::styled(
                    format!(
                        "   filtered: {} of {}  [r] clear",
                        app.listing.filtered_len(),
                        app.listing.master().len()
                    ),
                    styles::highlight_style(),
                ));
            }
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::UserDetail(_) => details::render(frame, app, area),
        _ => users::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.route {
        Route::UserDetail(_) => "[Esc] back | ←/→ tabs | [b]lacklist [a]ctivate | [q]uit",
        _ => "[/] filter | [Enter] view | [s]ize | [L]ogout | [q]uit",
    };

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if let Some(updated) = app.last_updated {
        format!(" Updated {} ", age_display(updated, Utc::now()))
    } else {
        " No cached users ".to_string()
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::raw(left_text),
        Span::raw(" ".repeat(padding_len)),
        Span::raw(right_text),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(LOGO, styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Users", styles::highlight_style())),
        help_line("↑/↓ j/k", "Move selection"),
        help_line("Enter", "View user details"),
        help_line("←/→", "Previous/next page"),
        help_line("1-9", "Jump to page"),
        help_line("s", "Change rows per page"),
        help_line("/ or f", "Filter users"),
        help_line("r", "Clear filter"),
        help_line("u / F5", "Fetch users (when none loaded)"),
        Line::from(""),
        Line::from(Span::styled(" User Details", styles::highlight_style())),
        help_line("←/→ Tab", "Switch section"),
        help_line("b / a", "Blacklist / activate user"),
        help_line("Esc", "Back to users"),
        Line::from(""),
        Line::from(Span::styled(" General", styles::highlight_style())),
        help_line("L", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(LOGO, styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
