//! Filter and pagination pipeline over the cached user collection.
//!
//! `UserListing` owns the master collection and keeps the filtered view as
//! indices into it, so display order always follows master order.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{User, UserStatus};
use crate::store::Storage;
use crate::utils::contains_ignore_case;

/// Organizations offered by the filter form's selector.
const ORGANIZATION_OPTIONS: [&str; 2] = ["Lendsqr", "Iridia"];

/// Page button threshold: at or below this many pages every page is shown.
const MAX_FULL_BUTTONS: usize = 5;

// ============================================================================
// Page Size
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    /// The next larger size, wrapping around.
    pub fn next(self) -> Self {
        match self {
            PageSize::Ten => PageSize::Twenty,
            PageSize::Twenty => PageSize::Fifty,
            PageSize::Fifty => PageSize::Hundred,
            PageSize::Hundred => PageSize::Ten,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or_else(|| format!("unsupported page size {} (expected 10, 20, 50 or 100)", value))
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// ============================================================================
// Filter Criteria
// ============================================================================

/// Field predicates for the listing. Blank text fields and a `None` status
/// are inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub organization: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    /// Matched against the raw ISO-8601 string, so `2020-05` works.
    pub date_joined: String,
    pub status: Option<UserStatus>,
}

impl FilterCriteria {
    pub fn organization_options() -> &'static [&'static str] {
        &ORGANIZATION_OPTIONS
    }

    pub fn is_empty(&self) -> bool {
        self.text_criteria().iter().all(|c| c.is_empty()) && self.status.is_none()
    }

    fn text_criteria(&self) -> [&str; 5] {
        [
            &self.organization,
            &self.username,
            &self.email,
            &self.phone_number,
            &self.date_joined,
        ]
    }

    /// Conjunction of every active predicate.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(status) = self.status {
            if user.status != status {
                return false;
            }
        }
        let fields = [
            &user.organization,
            &user.username,
            &user.email,
            &user.phone_number,
            &user.date_joined,
        ];
        self.text_criteria()
            .iter()
            .zip(fields)
            .all(|(criterion, field)| contains_ignore_case(field, &criterion.to_lowercase()))
    }
}

/// One slot in the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageButton::Page(n) => write!(f, "{}", n),
            PageButton::Ellipsis => f.write_str("…"),
        }
    }
}

// ============================================================================
// User Listing
// ============================================================================

#[derive(Debug, Clone)]
pub struct UserListing {
    master: Vec<User>,
    filtered: Vec<usize>,
    criteria: FilterCriteria,
    /// 1-based
    page: usize,
    page_size: PageSize,
}

impl UserListing {
    pub fn new(users: Vec<User>) -> Self {
        let filtered = (0..users.len()).collect();
        Self {
            master: users,
            filtered,
            criteria: FilterCriteria::default(),
            page: 1,
            page_size: PageSize::default(),
        }
    }

    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(storage.get_users())
    }

    /// Swap in a new master collection, keeping the page size and
    /// clearing the filter.
    pub fn replace_users(&mut self, users: Vec<User>) {
        self.master = users;
        self.reset_filter();
    }

    pub fn master(&self) -> &[User] {
        &self.master
    }

    pub fn is_empty(&self) -> bool {
        self.master.is_empty()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Filtered records in master order.
    pub fn filtered(&self) -> impl Iterator<Item = &User> {
        self.filtered.iter().map(|&i| &self.master[i])
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn apply_filter(&mut self, criteria: FilterCriteria) {
        self.filtered = self
            .master
            .iter()
            .enumerate()
            .filter(|(_, u)| criteria.matches(u))
            .map(|(i, _)| i)
            .collect();
        debug!(
            matched = self.filtered.len(),
            total = self.master.len(),
            "Applied user filter"
        );
        self.criteria = criteria;
        self.page = 1;
    }

    pub fn reset_filter(&mut self) {
        self.filtered = (0..self.master.len()).collect();
        self.criteria = FilterCriteria::default();
        self.page = 1;
    }

    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size.get())
    }

    /// Jump to page `n`. Out-of-range requests leave the page unchanged.
    pub fn go_to_page(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.page_count() {
            self.page = n;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        match self.page.checked_sub(1) {
            Some(n) => self.go_to_page(n),
            None => false,
        }
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 1;
    }

    /// Records on the current page.
    pub fn page_items(&self) -> Vec<&User> {
        let size = self.page_size.get();
        let start = (self.page - 1) * size;
        self.filtered
            .iter()
            .skip(start)
            .take(size)
            .map(|&i| &self.master[i])
            .collect()
    }

    /// Labels for the pagination control: every page when there are few,
    /// otherwise the first three and last two around an ellipsis.
    pub fn page_buttons(&self) -> Vec<PageButton> {
        let count = self.page_count();
        if count <= 1 {
            Vec::new()
        } else if count <= MAX_FULL_BUTTONS {
            (1..=count).map(PageButton::Page).collect()
        } else {
            vec![
                PageButton::Page(1),
                PageButton::Page(2),
                PageButton::Page(3),
                PageButton::Ellipsis,
                PageButton::Page(count - 1),
                PageButton::Page(count),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::fixtures::user;

    /// 25 users, 7 of them Active, alternating organizations.
    fn twenty_five_users() -> Vec<User> {
        (0..25)
            .map(|i| {
                let status = if i < 7 {
                    UserStatus::Active
                } else if i % 2 == 0 {
                    UserStatus::Pending
                } else {
                    UserStatus::Blacklisted
                };
                let org = if i % 2 == 0 { "Lendsqr" } else { "Iridia" };
                user(&i.to_string(), org, &format!("User {}", i), status)
            })
            .collect()
    }

    fn status_filter(status: UserStatus) -> FilterCriteria {
        FilterCriteria {
            status: Some(status),
            ..FilterCriteria::default()
        }
    }

    #[test]
    fn test_new_listing_shows_everything() {
        let listing = UserListing::new(twenty_five_users());
        assert_eq!(listing.filtered_len(), 25);
        assert_eq!(listing.current_page(), 1);
        assert_eq!(listing.page_size(), PageSize::Ten);
        assert_eq!(listing.page_count(), 3);
        assert_eq!(listing.page_items().len(), 10);
    }

    #[test]
    fn test_status_filter_fits_one_page() {
        let mut listing = UserListing::new(twenty_five_users());
        listing.go_to_page(3);
        listing.apply_filter(status_filter(UserStatus::Active));

        assert_eq!(listing.filtered_len(), 7);
        assert_eq!(listing.page_count(), 1);
        assert_eq!(listing.current_page(), 1);
        let page = listing.page_items();
        assert_eq!(page.len(), 7);
        assert!(page.iter().all(|u| u.status == UserStatus::Active));
        assert!(listing.page_buttons().is_empty());
    }

    #[test]
    fn test_filter_is_conjunction() {
        let mut listing = UserListing::new(twenty_five_users());
        listing.apply_filter(FilterCriteria {
            organization: "lend".to_string(),
            status: Some(UserStatus::Active),
            ..FilterCriteria::default()
        });

        // Even indices below 7
        let ids: Vec<_> = listing.filtered().map(|u| u.id.clone()).collect();
        assert_eq!(ids, vec!["0", "2", "4", "6"]);
        assert!(listing
            .filtered()
            .all(|u| u.organization == "Lendsqr" && u.status == UserStatus::Active));
    }

    #[test]
    fn test_text_filters_are_case_insensitive_substrings() {
        let mut listing = UserListing::new(twenty_five_users());
        listing.apply_filter(FilterCriteria {
            username: "USER 1".to_string(),
            ..FilterCriteria::default()
        });
        // "User 1" and "User 10".."User 19"
        assert_eq!(listing.filtered_len(), 11);

        listing.apply_filter(FilterCriteria {
            email: "user.24@".to_string(),
            ..FilterCriteria::default()
        });
        assert_eq!(listing.filtered_len(), 1);

        listing.apply_filter(FilterCriteria {
            date_joined: "2020-05".to_string(),
            phone_number: "0801".to_string(),
            ..FilterCriteria::default()
        });
        assert_eq!(listing.filtered_len(), 25);
    }

    #[test]
    fn test_filter_preserves_master_order() {
        let mut listing = UserListing::new(twenty_five_users());
        listing.apply_filter(status_filter(UserStatus::Blacklisted));
        let ids: Vec<usize> = listing
            .filtered()
            .map(|u| u.id.parse().unwrap())
            .collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_filter_with_no_matches() {
        let mut listing = UserListing::new(twenty_five_users());
        listing.apply_filter(status_filter(UserStatus::Inactive));
        assert_eq!(listing.filtered_len(), 0);
        assert_eq!(listing.page_count(), 0);
        assert!(listing.page_items().is_empty());
        assert!(!listing.go_to_page(1));
    }

    #[test]
    fn test_reset_filter() {
        let mut listing = UserListing::new(twenty_five_users());
        listing.apply_filter(status_filter(UserStatus::Pending));
        listing.reset_filter();

        assert_eq!(listing.filtered_len(), 25);
        assert!(listing.criteria().is_empty());
        assert_eq!(listing.current_page(), 1);
        assert_eq!(
            listing.filtered().cloned().collect::<Vec<_>>(),
            listing.master().to_vec()
        );
    }

    #[test]
    fn test_go_to_page_bounds() {
        let mut listing = UserListing::new(twenty_five_users());
        assert!(!listing.go_to_page(0));
        assert!(!listing.go_to_page(4));
        assert_eq!(listing.current_page(), 1);

        assert!(listing.go_to_page(3));
        assert_eq!(listing.page_items().len(), 5);
        assert!(!listing.next_page());
        assert_eq!(listing.current_page(), 3);

        assert!(listing.prev_page());
        assert!(listing.prev_page());
        assert!(!listing.prev_page());
        assert_eq!(listing.current_page(), 1);
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut listing = UserListing::new(twenty_five_users());
        listing.go_to_page(2);
        listing.set_page_size(PageSize::Twenty);
        assert_eq!(listing.current_page(), 1);
        assert_eq!(listing.page_count(), 2);

        listing.set_page_size(PageSize::Hundred);
        assert_eq!(listing.page_count(), 1);
        assert_eq!(listing.page_items().len(), 25);
    }

    #[test]
    fn test_page_buttons() {
        let users: Vec<User> = (0..100)
            .map(|i| user(&i.to_string(), "Lendsqr", "Someone", UserStatus::Active))
            .collect();
        let mut listing = UserListing::new(users);

        // 10 pages
        assert_eq!(
            listing.page_buttons(),
            vec![
                PageButton::Page(1),
                PageButton::Page(2),
                PageButton::Page(3),
                PageButton::Ellipsis,
                PageButton::Page(9),
                PageButton::Page(10),
            ]
        );

        listing.set_page_size(PageSize::Twenty);
        assert_eq!(listing.page_buttons().len(), 5);

        listing.set_page_size(PageSize::Hundred);
        assert!(listing.page_buttons().is_empty());
    }

    #[test]
    fn test_replace_users_clears_filter() {
        let mut listing = UserListing::new(Vec::new());
        assert!(listing.is_empty());
        listing.set_page_size(PageSize::Fifty);
        listing.replace_users(twenty_five_users());
        assert_eq!(listing.filtered_len(), 25);
        assert_eq!(listing.page_size(), PageSize::Fifty);
    }

    #[test]
    fn test_criteria_is_empty() {
        assert!(FilterCriteria::default().is_empty());
        let blank = FilterCriteria {
            username: "  ".to_string(),
            ..FilterCriteria::default()
        };
        assert!(!blank.is_empty());
        assert!(!status_filter(UserStatus::Active).is_empty());
    }

    #[test]
    fn test_whitespace_in_criteria_is_significant() {
        let users = vec![
            user("1", "Lendsqr", "Ada Obi", UserStatus::Active),
            user("2", "Lendsqr", "Adaeze", UserStatus::Active),
        ];
        let mut listing = UserListing::new(users);
        let by_username = |text: &str| FilterCriteria {
            username: text.to_string(),
            ..FilterCriteria::default()
        };
        let ids = |listing: &UserListing| -> Vec<String> {
            listing.filtered().map(|u| u.id.clone()).collect()
        };

        listing.apply_filter(by_username("ada "));
        assert_eq!(ids(&listing), vec!["1"]);

        listing.apply_filter(by_username(" "));
        assert_eq!(ids(&listing), vec!["1"]);

        listing.apply_filter(by_username(" obi"));
        assert_eq!(ids(&listing), vec!["1"]);

        listing.apply_filter(by_username("adaeze "));
        assert_eq!(listing.filtered_len(), 0);
    }

    #[test]
    fn test_page_size_conversions() {
        assert_eq!(PageSize::try_from(50), Ok(PageSize::Fifty));
        assert!(PageSize::try_from(25).is_err());
        assert_eq!(serde_json::to_string(&PageSize::Twenty).unwrap(), "20");
        assert_eq!(serde_json::from_str::<PageSize>("100").unwrap(), PageSize::Hundred);
        assert!(serde_json::from_str::<PageSize>("7").is_err());
        assert_eq!(PageSize::Hundred.next(), PageSize::Ten);
    }

    #[test]
    fn test_organization_options() {
        assert_eq!(FilterCriteria::organization_options(), &["Lendsqr", "Iridia"]);
    }
}
