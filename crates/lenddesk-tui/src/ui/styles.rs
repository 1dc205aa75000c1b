use ratatui::style::{Color, Modifier, Style};

use lenddesk_core::UserStatus;

// Color palette
pub const PRIMARY: Color = Color::Rgb(33, 63, 125);
pub const SECONDARY: Color = Color::Rgb(57, 205, 204);
pub const ACCENT: Color = Color::Rgb(233, 178, 0);
pub const ERROR: Color = Color::Rgb(228, 3, 59);
pub const SUCCESS: Color = Color::Rgb(57, 205, 98);
pub const MUTED: Color = Color::Rgb(84, 95, 125);
pub const HIGHLIGHT: Color = Color::Rgb(40, 52, 80);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SUCCESS)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn tab_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(SECONDARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        muted_style()
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(SECONDARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(PRIMARY).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

/// Large figure on a summary card.
pub fn card_value_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

/// Status pill colors.
pub fn status_style(status: UserStatus) -> Style {
    match status {
        UserStatus::Active => success_style(),
        UserStatus::Inactive => muted_style(),
        UserStatus::Pending => highlight_style(),
        UserStatus::Blacklisted => error_style(),
    }
}
