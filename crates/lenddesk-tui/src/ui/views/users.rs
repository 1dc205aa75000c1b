use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use lenddesk_core::utils::{format_count, format_date_joined, truncate_string};
use lenddesk_core::{LoadState, PageButton, UserStatus};

use crate::app::{App, AppState, FilterField};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

/// Render the Users route: summary cards, table, pagination
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary cards
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    render_stat_cards(frame, app, chunks[0]);
    render_user_table(frame, app, chunks[1]);
    render_pagination(frame, app, chunks[2]);
}

fn render_stat_cards(frame: &mut Frame, app: &App, area: Rect) {
    let cards = app.stats.cards();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value), column) in cards.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(*label, styles::muted_style())),
            Line::from(Span::styled(format_count(*value), styles::card_value_style())),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border_style(false));
        frame.render_widget(Paragraph::new(lines).block(block), *column);
    }
}

fn render_user_table(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.listing.page_items();
    let focused = matches!(app.state, AppState::Normal);

    if page.is_empty() {
        let message = if app.listing.is_empty() {
            match app.loader.state() {
                LoadState::Failed => "Could not fetch users. Press [u] to try again.",
                _ => "No users available. Press [u] to fetch them.",
            }
        } else {
            "No users match the current filter. Press [r] to clear it."
        };
        let block = Block::default()
            .title(" Users ")
            .title_style(styles::muted_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(focused));
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new([
        Cell::from("ORGANIZATION"),
        Cell::from("USERNAME"),
        Cell::from("EMAIL"),
        Cell::from("PHONE NUMBER"),
        Cell::from("DATE JOINED"),
        Cell::from("STATUS"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = page
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let style = if i == app.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            Row::new(vec![
                Cell::from(truncate_string(&user.organization, 16)),
                Cell::from(truncate_string(&user.username, 22)),
                Cell::from(truncate_string(&user.email, 30)),
                Cell::from(user.phone_number.clone()),
                Cell::from(format_date_joined(&user.date_joined)),
                Cell::from(Span::styled(
                    user.status.as_str(),
                    styles::status_style(user.status),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(2),    // Organization
        Constraint::Fill(3),    // Username
        Constraint::Fill(4),    // Email
        Constraint::Length(14), // Phone
        Constraint::Length(22), // Date joined
        Constraint::Length(12), // Status
    ];

    let title = format!(" Users ({}) ", app.listing.filtered_len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let listing = &app.listing;
    let left = format!(
        " Showing [{}] out of {}",
        listing.page_size(),
        listing.filtered_len()
    );

    let mut right = vec![Span::styled("‹ ", styles::muted_style())];
    for button in listing.page_buttons() {
        let style = match button {
            PageButton::Page(n) if n == listing.current_page() => styles::tab_style(true),
            PageButton::Page(_) => styles::list_item_style(),
            PageButton::Ellipsis => styles::muted_style(),
        };
        right.push(Span::styled(button.to_string(), style));
        right.push(Span::raw(" "));
    }
    right.push(Span::styled("› ", styles::muted_style()));

    let right_width: usize = right.iter().map(|s| s.content.chars().count()).sum();
    let padding = (area.width as usize).saturating_sub(left.chars().count() + right_width);

    let mut spans = vec![
        Span::styled(left, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
    ];
    spans.extend(right);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn status_label(status: Option<UserStatus>) -> &'static str {
    status.map(|s| s.as_str()).unwrap_or("Select")
}

/// Render the filter form as an overlay on the users table
pub fn render_filter_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(48, 16, frame.area());
    frame.render_widget(Clear, area);

    let form = &app.filter_form;
    let mut lines = vec![Line::from("")];

    for field in FilterField::ALL {
        let focused = app.filter_focus == field;
        let style = if focused {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };

        let value = match field {
            FilterField::Organization if form.organization.is_empty() => "Select".to_string(),
            FilterField::Organization => form.organization.clone(),
            FilterField::Username => form.username.clone(),
            FilterField::Email => form.email.clone(),
            FilterField::DateJoined => form.date_joined.clone(),
            FilterField::PhoneNumber => form.phone_number.clone(),
            FilterField::Status => status_label(form.status).to_string(),
            FilterField::Reset | FilterField::Apply => continue,
        };

        let cursor = if focused && field.is_text() { "▌" } else { "" };
        let hint = if focused && !field.is_text() { " ◂▸" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", field.label()), styles::muted_style()),
            Span::styled(
                format!("{:<24}", format!("{}{}", truncate_string(&value, 22), cursor)),
                style,
            ),
            Span::styled(hint, styles::muted_style()),
        ]));
        lines.push(Line::from(""));
    }

    let button = |field: FilterField| {
        let label = format!(" {} ", field.label());
        if app.filter_focus == field {
            Span::styled(format!("▶{}◀", label), styles::selected_style())
        } else {
            Span::styled(format!(" {} ", label), styles::list_item_style())
        }
    };
    lines.push(Line::from(vec![
        Span::raw("           "),
        button(FilterField::Reset),
        Span::raw("   "),
        button(FilterField::Apply),
    ]));

    let block = Block::default()
        .title(" Filter ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
