//! Application state management for lenddesk.
//!
//! The `App` struct owns the storage adapter, the session gate, the listing
//! pipeline and all UI state. The initial user fetch runs in a background
//! task and reports back through an MPSC channel drained by the main loop.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use lenddesk_core::{
    ApiClient, Config, DashboardStats, FilterCriteria, LoadState, Loader, Route, SessionGate,
    Storage, User, UserListing, UserStatus,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background load channel. Only one fetch is ever in
/// flight.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a filter form text field.
const MAX_FILTER_LENGTH: usize = 64;

/// Header name when nobody has logged in on this machine.
const DEFAULT_USER_NAME: &str = "Admin";

// ============================================================================
// UI Enums
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Initial fetch outstanding; input other than Ctrl+C is ignored
    Loading,
    Normal,
    Filtering,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Email,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// Fields of the filter form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Organization,
    Username,
    Email,
    DateJoined,
    PhoneNumber,
    Status,
    Reset,
    Apply,
}

impl FilterField {
    pub const ALL: [FilterField; 8] = [
        FilterField::Organization,
        FilterField::Username,
        FilterField::Email,
        FilterField::DateJoined,
        FilterField::PhoneNumber,
        FilterField::Status,
        FilterField::Reset,
        FilterField::Apply,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Organization => "Organization",
            FilterField::Username => "Username",
            FilterField::Email => "Email",
            FilterField::DateJoined => "Date",
            FilterField::PhoneNumber => "Phone Number",
            FilterField::Status => "Status",
            FilterField::Reset => "Reset",
            FilterField::Apply => "Filter",
        }
    }

    /// Free-text fields accept typed characters; the others are selectors
    /// or buttons.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FilterField::Username
                | FilterField::Email
                | FilterField::DateJoined
                | FilterField::PhoneNumber
        )
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Sections of the user detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    General,
    Documents,
    Bank,
    Loans,
    Savings,
    AppAndSystem,
}

impl DetailTab {
    pub const ALL: [DetailTab; 6] = [
        DetailTab::General,
        DetailTab::Documents,
        DetailTab::Bank,
        DetailTab::Loans,
        DetailTab::Savings,
        DetailTab::AppAndSystem,
    ];

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::General => "General Details",
            DetailTab::Documents => "Documents",
            DetailTab::Bank => "Bank Details",
            DetailTab::Loans => "Loans",
            DetailTab::Savings => "Savings",
            DetailTab::AppAndSystem => "App and System",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(self) -> Self {
        match self {
            DetailTab::General => DetailTab::Documents,
            DetailTab::Documents => DetailTab::Bank,
            DetailTab::Bank => DetailTab::Loans,
            DetailTab::Loans => DetailTab::Savings,
            DetailTab::Savings => DetailTab::AppAndSystem,
            DetailTab::AppAndSystem => DetailTab::General,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(self) -> Self {
        match self {
            DetailTab::General => DetailTab::AppAndSystem,
            DetailTab::Documents => DetailTab::General,
            DetailTab::Bank => DetailTab::Documents,
            DetailTab::Loans => DetailTab::Bank,
            DetailTab::Savings => DetailTab::Loans,
            DetailTab::AppAndSystem => DetailTab::Savings,
        }
    }
}

/// Status changes offered on a user. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Blacklist,
    Activate,
}

impl StatusAction {
    pub fn label(self) -> &'static str {
        match self {
            StatusAction::Blacklist => "Blacklist User",
            StatusAction::Activate => "Activate User",
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Messages from the background load task.
enum LoadResult {
    /// The fetch finished; empty means it failed
    Users(Vec<User>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    config_path: PathBuf,
    pub storage: Storage,
    pub session: SessionGate,
    api: ApiClient,
    pub loader: Loader,

    // Data
    pub listing: UserListing,
    pub stats: DashboardStats,
    pub current_user: Option<User>,
    pub last_updated: Option<DateTime<Utc>>,

    // UI State
    pub state: AppState,
    pub route: Route,
    /// Row within the current page
    pub selection: usize,
    pub detail: Option<User>,
    pub detail_tab: DetailTab,
    pub status_message: Option<String>,

    // Login form
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Filter form
    pub filter_form: FilterCriteria,
    pub filter_focus: FilterField,

    // Background load channel
    load_rx: mpsc::Receiver<LoadResult>,
    load_tx: mpsc::Sender<LoadResult>,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, storage: Storage) -> Result<Self> {
        let api_url = config.api_url();
        debug!(%api_url, backend = storage.backend_name(), "Creating app");
        let api = ApiClient::new(api_url)?;

        let session = SessionGate::from_storage(&storage);
        let mut listing = UserListing::from_storage(&storage);
        listing.set_page_size(config.page_size());

        let login_email = config.login_email().unwrap_or_default();
        let login_focus = if login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            current_user: storage.current_user(),
            last_updated: storage.users_updated_at(),
            route: session.resolve(Route::Root),
            config,
            config_path,
            session,
            api,
            loader: Loader::new(),
            listing,
            stats: DashboardStats::placeholder(),
            storage,

            state: AppState::Normal,
            selection: 0,
            detail: None,
            detail_tab: DetailTab::General,
            status_message: None,

            login_email,
            login_password: String::new(),
            login_focus,
            login_error: None,

            filter_form: FilterCriteria::default(),
            filter_focus: FilterField::Organization,

            load_rx: rx,
            load_tx: tx,
        })
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save_to(&self.config_path) {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Initial Load
    // =========================================================================

    /// Fetch users in the background if the cache is empty.
    pub fn start_initial_load(&mut self) {
        if self.loader.begin(&self.storage) {
            info!("User cache is empty, fetching from API");
            self.state = AppState::Loading;
            self.spawn_fetch();
        } else {
            debug!(count = self.listing.master().len(), "Using cached users");
        }
    }

    /// Manual retry, only offered while there is nothing to show.
    pub fn retry_load(&mut self) {
        if !self.listing.is_empty() {
            self.status_message = Some("Users are already loaded".to_string());
            return;
        }
        if self.loader.begin(&self.storage) {
            self.state = AppState::Loading;
            self.spawn_fetch();
        } else if self.loader.state() == LoadState::Ready {
            // Another process filled the cache meanwhile
            self.reload_from_storage();
        }
    }

    fn spawn_fetch(&self) {
        let tx = self.load_tx.clone();
        let api = self.api.clone();

        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let users = api.fetch_users(&mut rng).await;
            if let Err(e) = tx.send(LoadResult::Users(users)).await {
                error!(error = %e, "Failed to send load result - channel closed");
            }
        });
    }

    /// Drain finished background work. Called once per frame.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.load_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_load_result(result);
        }
    }

    fn process_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::Users(users) => {
                self.loader.complete(&self.storage, &users);
                if self.state == AppState::Loading {
                    self.state = AppState::Normal;
                }

                match self.loader.state() {
                    LoadState::Ready => {
                        self.status_message = Some(format!("Loaded {} users", users.len()));
                        self.listing.replace_users(users);
                        self.selection = 0;
                        self.last_updated = self.storage.users_updated_at().or(Some(Utc::now()));
                    }
                    _ => {
                        self.status_message =
                            Some("Could not fetch users. Press [u] or [F5] to try again.".to_string());
                    }
                }
            }
        }
    }

    fn reload_from_storage(&mut self) {
        self.listing.replace_users(self.storage.get_users());
        self.last_updated = self.storage.users_updated_at();
        self.selection = 0;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Go to `route`, subject to the session guard.
    pub fn navigate(&mut self, route: Route) {
        let resolved = self.session.resolve(route);
        if let Route::UserDetail(ref id) = resolved {
            self.detail = self.storage.get_user_by_id(id);
            self.detail_tab = DetailTab::General;
            if self.detail.is_none() {
                debug!(%id, "User not found");
            }
        }
        debug!(route = %resolved, "Navigated");
        self.route = resolved;
    }

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_user().map(|u| u.id.clone()) {
            self.navigate(Route::UserDetail(id));
        }
    }

    pub fn back_to_users(&mut self) {
        self.detail = None;
        self.navigate(Route::Users);
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Attempt login with the credentials from the login form
    pub fn attempt_login(&mut self) {
        match self
            .session
            .attempt_login(&self.storage, &self.login_email, &self.login_password)
        {
            Ok(user) => {
                self.config.last_email = Some(user.email.clone());
                self.save_config();

                self.status_message = Some(format!("Welcome, {}", user.username));
                self.current_user = Some(user);
                self.login_password.clear();
                self.login_error = None;
                self.navigate(Route::Users);
            }
            Err(e) => {
                debug!(error = %e, "Login rejected");
                self.login_error = Some(e.to_string());
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.logout(&self.storage);
        self.current_user = None;
        self.detail = None;
        self.login_password.clear();
        self.login_error = None;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.state = AppState::Normal;
        self.status_message = None;
        self.navigate(Route::Login);
    }

    /// Name shown in the title bar.
    pub fn current_user_name(&self) -> &str {
        self.current_user
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or(DEFAULT_USER_NAME)
    }

    // =========================================================================
    // Listing
    // =========================================================================

    pub fn selected_user(&self) -> Option<&User> {
        self.listing.page_items().get(self.selection).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.listing.page_items().len();
        if self.selection + 1 < len {
            self.selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    pub fn select_last(&mut self) {
        self.selection = self.listing.page_items().len().saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        if self.listing.next_page() {
            self.selection = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.listing.prev_page() {
            self.selection = 0;
        }
    }

    pub fn go_to_page(&mut self, n: usize) {
        if self.listing.go_to_page(n) {
            self.selection = 0;
        } else {
            self.status_message = Some(format!("No page {}", n));
        }
    }

    pub fn cycle_page_size(&mut self) {
        let size = self.listing.page_size().next();
        self.listing.set_page_size(size);
        self.selection = 0;
        self.config.page_size = Some(size);
        self.save_config();
    }

    pub fn clear_filter(&mut self) {
        self.listing.reset_filter();
        self.filter_form = FilterCriteria::default();
        self.selection = 0;
    }

    /// Status changes are shown but not saved anywhere.
    pub fn request_status_action(&mut self, action: StatusAction) {
        let target = match self.route {
            Route::UserDetail(_) => self.detail.as_ref(),
            _ => self.selected_user(),
        };
        let message = target.map(|user| {
            info!(user_id = %user.id, action = action.label(), "Status action requested");
            format!("{}: not available for {} yet", action.label(), user.username)
        });
        if message.is_some() {
            self.status_message = message;
        }
    }

    // =========================================================================
    // Filter Form
    // =========================================================================

    pub fn start_filter(&mut self) {
        self.filter_form = self.listing.criteria().clone();
        self.filter_focus = FilterField::Organization;
        self.state = AppState::Filtering;
    }

    pub fn cancel_filter(&mut self) {
        self.state = AppState::Normal;
    }

    pub fn apply_filter_form(&mut self) {
        self.listing.apply_filter(self.filter_form.clone());
        self.selection = 0;
        self.state = AppState::Normal;
        self.status_message = Some(format!(
            "{} of {} users match",
            self.listing.filtered_len(),
            self.listing.master().len()
        ));
    }

    pub fn reset_filter_form(&mut self) {
        self.clear_filter();
        self.state = AppState::Normal;
        self.status_message = None;
    }

    fn filter_text_mut(&mut self, field: FilterField) -> Option<&mut String> {
        match field {
            FilterField::Username => Some(&mut self.filter_form.username),
            FilterField::Email => Some(&mut self.filter_form.email),
            FilterField::DateJoined => Some(&mut self.filter_form.date_joined),
            FilterField::PhoneNumber => Some(&mut self.filter_form.phone_number),
            _ => None,
        }
    }

    pub fn filter_push(&mut self, c: char) {
        let field = self.filter_focus;
        if let Some(text) = self.filter_text_mut(field) {
            if can_add_filter_char(text.chars().count(), c) {
                text.push(c);
            }
        }
    }

    pub fn filter_backspace(&mut self) {
        match self.filter_focus {
            FilterField::Organization => self.filter_form.organization.clear(),
            FilterField::Status => self.filter_form.status = None,
            field => {
                if let Some(text) = self.filter_text_mut(field) {
                    text.pop();
                }
            }
        }
    }

    /// Step a selector field (organization or status) through its options.
    pub fn filter_cycle(&mut self, forward: bool) {
        match self.filter_focus {
            FilterField::Organization => {
                self.filter_form.organization =
                    cycle_option(&self.filter_form.organization, forward);
            }
            FilterField::Status => {
                self.filter_form.status = if forward {
                    UserStatus::cycle(self.filter_form.status)
                } else {
                    cycle_status_back(self.filter_form.status)
                };
            }
            _ => {}
        }
    }
}

/// Next organization option after `current`, with "" meaning unselected.
fn cycle_option(current: &str, forward: bool) -> String {
    let options = FilterCriteria::organization_options();
    let mut slots: Vec<&str> = vec![""];
    slots.extend_from_slice(options);

    let pos = slots.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % slots.len()
    } else {
        (pos + slots.len() - 1) % slots.len()
    };
    slots[next].to_string()
}

fn cycle_status_back(current: Option<UserStatus>) -> Option<UserStatus> {
    match current {
        None => UserStatus::ALL.last().copied(),
        Some(status) => {
            let pos = UserStatus::ALL.iter().position(|s| *s == status).unwrap_or(0);
            pos.checked_sub(1).map(|i| UserStatus::ALL[i])
        }
    }
}

/// Check if a character can be added to the email field.
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && !c.is_control()
}

/// Check if a character can be added to the password field.
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && !c.is_control()
}

/// Check if a character can be added to a filter text field.
pub fn can_add_filter_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FILTER_LENGTH && !c.is_control()
}
