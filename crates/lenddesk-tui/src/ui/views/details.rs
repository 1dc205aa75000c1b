use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use lenddesk_core::utils::{or_na, tier_stars};
use lenddesk_core::User;

use crate::app::{App, DetailTab};
use crate::ui::styles;

/// Render the user detail route: header card plus the selected section
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(user) = app.detail.as_ref() else {
        render_not_found(frame, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Header card
            Constraint::Min(5),    // Section content
        ])
        .split(area);

    render_header_card(frame, user, chunks[0]);

    match app.detail_tab {
        DetailTab::General => render_general(frame, user, chunks[1]),
        other => render_empty_section(frame, other, chunks[1]),
    }
}

fn render_not_found(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("  User not found", styles::error_style())),
        Line::from(""),
        Line::from(Span::styled(
            "  Press [Esc] to go back to Users",
            styles::muted_style(),
        )),
    ];
    let block = Block::default()
        .title(" User Details ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_header_card(frame: &mut Frame, user: &User, area: Rect) {
    let account = &user.account_details;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(7),      // Avatar
            Constraint::Percentage(35), // Name and id
            Constraint::Percentage(20), // Tier
            Constraint::Min(20),        // Balance
        ])
        .split(inner(area));

    let block = Block::default()
        .title(" User Details ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(block, area);

    let avatar = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  ({}) ", user.initial()),
            styles::title_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(avatar), columns[0]);

    let name = vec![
        Line::from(""),
        Line::from(Span::styled(user.username.clone(), styles::card_value_style())),
        Line::from(Span::styled(user.id.clone(), styles::muted_style())),
    ];
    frame.render_widget(Paragraph::new(name), columns[1]);

    let tier = vec![
        Line::from(""),
        Line::from(Span::styled("User's Tier", styles::muted_style())),
        Line::from(Span::styled(
            tier_stars(account.display_tier()),
            styles::highlight_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(tier), columns[2]);

    let balance = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("₦{}", or_na(&account.balance)),
            styles::card_value_style(),
        )),
        Line::from(Span::styled(
            format!("{}/{}", or_na(&account.account_number), or_na(&account.bank)),
            styles::muted_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(balance), columns[3]);
}

/// Area inside a bordered block.
fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

fn section_heading(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, styles::highlight_style()))
}

fn field_line(label: &'static str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<22}", label), styles::muted_style()),
        Span::raw(or_na(value).to_string()),
    ])
}

fn render_general(frame: &mut Frame, user: &User, area: Rect) {
    let personal = &user.personal_info;
    let education = &user.education;
    let socials = &user.socials;
    let guarantor = &user.guarantor;

    let left = vec![
        section_heading("Personal Information"),
        field_line("Full Name", &personal.full_name),
        field_line("Phone Number", &user.phone_number),
        field_line("Email Address", &user.email),
        field_line("BVN", &personal.bvn),
        field_line("Gender", &personal.gender),
        field_line("Marital Status", &personal.marital_status),
        field_line("Children", &personal.children),
        field_line("Type of Residence", &personal.residence),
        Line::from(""),
        section_heading("Socials"),
        field_line("Twitter", &socials.twitter),
        field_line("Facebook", &socials.facebook),
        field_line("Instagram", &socials.instagram),
    ];

    let right = vec![
        section_heading("Education and Employment"),
        field_line("Level of Education", &education.level),
        field_line("Employment Status", &education.employment_status),
        field_line("Sector of Employment", &education.sector),
        field_line("Duration of Employment", &education.duration),
        field_line("Office Email", &education.office_email),
        field_line("Monthly Income", &education.monthly_income),
        field_line("Loan Repayment", &education.loan_repayment),
        Line::from(""),
        section_heading("Guarantor"),
        field_line("Full Name", &guarantor.full_name),
        field_line("Phone Number", &guarantor.phone_number),
        field_line("Email Address", &guarantor.email),
        field_line("Relationship", &guarantor.relationship),
    ];

    let block = Block::default()
        .title(format!(" {} ", DetailTab::General.title()))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner(area));
    frame.render_widget(block, area);

    frame.render_widget(Paragraph::new(left).wrap(Wrap { trim: false }), columns[0]);
    frame.render_widget(Paragraph::new(right).wrap(Wrap { trim: false }), columns[1]);
}

fn render_empty_section(frame: &mut Frame, tab: DetailTab, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", tab.title()))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let message = Line::from(Span::styled(
        empty_message(tab),
        styles::muted_style(),
    ));
    frame.render_widget(Paragraph::new(vec![Line::from(""), message]).block(block), area);
}

fn empty_message(tab: DetailTab) -> String {
    format!("  No {} available", tab.title())
}
