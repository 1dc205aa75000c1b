//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes. Which handler
//! runs depends on the overlay state first and the route second.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use lenddesk_core::Route;

use crate::app::{
    can_add_email_char, can_add_password_char, App, AppState, FilterField, LoginFocus,
    StatusAction,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        // Ctrl+C is handled by the main loop
        AppState::Loading | AppState::Quitting => return Ok(false),
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Filtering => {
            handle_filter_input(app, key);
            return Ok(false);
        }
        AppState::Normal => {}
    }

    match app.route {
        Route::Login | Route::Root => return handle_login_input(app, key),
        Route::Users => handle_users_input(app, key),
        Route::UserDetail(_) => handle_detail_input(app, key),
    }

    Ok(false)
}

/// Keys shared by the protected views. Returns true if consumed.
fn handle_global_keys(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('b') => app.request_status_action(StatusAction::Blacklist),
        KeyCode::Char('a') => app.request_status_action(StatusAction::Activate),
        _ => return false,
    }
    true
}

fn handle_users_input(app: &mut App, key: KeyEvent) {
    if handle_global_keys(app, key) {
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.select_last(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => app.next_page(),
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => app.prev_page(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(n) = c.to_digit(10) {
                app.go_to_page(n as usize);
            }
        }
        KeyCode::Char('s') => app.cycle_page_size(),
        KeyCode::Char('/') | KeyCode::Char('f') => app.start_filter(),
        KeyCode::Char('r') => {
            app.clear_filter();
            app.status_message = None;
        }
        KeyCode::Char('u') | KeyCode::F(5) => app.retry_load(),
        _ => {}
    }
}

fn handle_detail_input(app: &mut App, key: KeyEvent) {
    if handle_global_keys(app, key) {
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.back_to_users(),
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => {
            app.detail_tab = app.detail_tab.next();
        }
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
            app.detail_tab = app.detail_tab.prev();
        }
        _ => {}
    }
}

fn handle_filter_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_filter(),
        KeyCode::Tab | KeyCode::Down => app.filter_focus = app.filter_focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.filter_focus = app.filter_focus.prev(),
        KeyCode::Left => app.filter_cycle(false),
        KeyCode::Right => app.filter_cycle(true),
        KeyCode::Enter => match app.filter_focus {
            FilterField::Reset => app.reset_filter_form(),
            _ => app.apply_filter_form(),
        },
        KeyCode::Backspace => app.filter_backspace(),
        KeyCode::Char(' ') if !app.filter_focus.is_text() => app.filter_cycle(true),
        KeyCode::Char(c) => app.filter_push(c),
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        // Nobody can log in against an empty cache, so offer the fetch here
        KeyCode::F(5) if app.listing.is_empty() => app.retry_load(),
        KeyCode::Down | KeyCode::Tab => app.login_focus = app.login_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.login_focus = app.login_focus.prev(),
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.attempt_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_email.pop();
            }
            LoginFocus::Password => {
                app.login_password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => {
                if can_add_email_char(app.login_email.chars().count(), c) {
                    app.login_email.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_password.chars().count(), c) {
                    app.login_password.push(c);
                }
            }
            // Ignore character input on button
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}
