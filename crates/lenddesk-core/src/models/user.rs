use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest account tier a user can hold.
pub const MAX_TIER: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
    Blacklisted,
}

impl UserStatus {
    /// All statuses, in the order the id-length heuristic indexes them.
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Pending,
        UserStatus::Blacklisted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Pending => "Pending",
            UserStatus::Blacklisted => "Blacklisted",
        }
    }

    /// Parse a status name ignoring case and surrounding whitespace.
    /// Used for raw API values, which are not under our control.
    pub fn from_name_lenient(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }

    /// Display heuristic for records whose source carries no status:
    /// the id length modulo 4 picks an entry of `ALL`.
    ///
    /// This has no business meaning. It only spreads the four states
    /// across the table so every pill style shows up.
    pub fn from_id_heuristic(id: &str) -> Self {
        Self::ALL[id.len() % Self::ALL.len()]
    }

    /// Cycle to the next status (wrapping). `None` means "any status".
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(UserStatus::Active),
            Some(UserStatus::Active) => Some(UserStatus::Inactive),
            Some(UserStatus::Inactive) => Some(UserStatus::Pending),
            Some(UserStatus::Pending) => Some(UserStatus::Blacklisted),
            Some(UserStatus::Blacklisted) => None,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub bvn: String,
    pub gender: String,
    pub marital_status: String,
    pub children: String,
    pub residence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub level: String,
    pub employment_status: String,
    pub sector: String,
    pub duration: String,
    pub office_email: String,
    pub monthly_income: String,
    pub loan_repayment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socials {
    pub twitter: String,
    pub facebook: String,
    pub instagram: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guarantor {
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub account_number: String,
    pub bank: String,
    pub balance: String,
    pub tier: u8,
}

impl AccountDetails {
    /// Tier clamped into the displayable 1..=3 range.
    pub fn display_tier(&self) -> u8 {
        self.tier.clamp(1, MAX_TIER)
    }
}

/// A customer record as stored in the local snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub organization: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub date_joined: String,
    pub status: UserStatus,
    pub personal_info: PersonalInfo,
    pub education: Education,
    pub socials: Socials,
    pub guarantor: Guarantor,
    pub account_details: AccountDetails,
}

impl User {
    /// Case-insensitive email comparison, as used by the login check.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// First character of the username, uppercased, for the avatar.
    pub fn initial(&self) -> String {
        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}
