//! Normalization of raw API records into `User`.
//!
//! The mock endpoint returns a thin record (id, org name, user name, email,
//! phone, creation date, a few bank fields). Everything else the dashboard
//! shows is synthesized here, either from fixed fallbacks or from the
//! injected random source.

use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::models::{
    AccountDetails, Education, Guarantor, PersonalInfo, Socials, User, UserStatus,
};
use crate::models::user::MAX_TIER;

/// Length of a synthesized id when the raw record has none.
const GENERATED_ID_LEN: usize = 9;

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const DEFAULT_ORGANIZATION: &str = "Lendsqr";
const UNKNOWN_USER: &str = "Unknown User";
const DEFAULT_EMAIL: &str = "user@example.com";
const DEFAULT_PHONE: &str = "080-000-0000";
const DEFAULT_BVN: &str = "12345678901";
const DEFAULT_RESIDENCE: &str = "Parent's Apartment";
const DEFAULT_OFFICE_EMAIL: &str = "office@lendsqr.com";
const DEFAULT_ACCOUNT_NUMBER: &str = "1234567890";
const DEFAULT_BANK: &str = "Providus Bank";
const DEFAULT_BALANCE: &str = "200,000.00";

/// A user as returned by the remote endpoint. Every field is optional and
/// tolerates numbers or booleans where a string is expected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub org_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bvn: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bank_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_balance: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Non-empty value of an optional raw field. Whitespace counts as a value.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn or_default(value: &Option<String>, default: &str) -> String {
    present(value).unwrap_or(default).to_string()
}

fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..GENERATED_ID_LEN)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect()
}

/// `@handle` built from a display name: whitespace becomes `_`, lowercased.
fn social_handle(name: &str) -> String {
    let handle: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("@{}", handle.to_lowercase())
}

/// Map one raw record to a `User`.
///
/// Present fields are copied, absent ones get fixed fallbacks. Gender (when
/// missing) and tier are drawn from `rng`, as is the id of a record that
/// has none.
pub fn map_raw_user<R: Rng + ?Sized>(raw: &RawUser, rng: &mut R) -> User {
    let id = match present(&raw.id) {
        Some(id) => id.to_string(),
        None => generate_id(rng),
    };

    // Prefer an explicit status from the source; fall back to the heuristic
    let status = present(&raw.status)
        .and_then(UserStatus::from_name_lenient)
        .unwrap_or_else(|| UserStatus::from_id_heuristic(&id));

    let user_name = present(&raw.user_name);
    let username = user_name
        .or_else(|| present(&raw.full_name))
        .unwrap_or(UNKNOWN_USER)
        .to_string();
    let handle = social_handle(user_name.unwrap_or("user"));

    let gender = match present(&raw.gender) {
        Some(g) => g.to_string(),
        None => {
            let gender = if rng.gen_bool(0.5) { "Female" } else { "Male" };
            gender.to_string()
        }
    };

    let date_joined = present(&raw.created_at)
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    User {
        organization: or_default(&raw.org_name, DEFAULT_ORGANIZATION),
        username,
        email: or_default(&raw.email, DEFAULT_EMAIL),
        phone_number: or_default(&raw.phone_number, DEFAULT_PHONE),
        date_joined,
        status,
        personal_info: PersonalInfo {
            full_name: user_name.unwrap_or(UNKNOWN_USER).to_string(),
            bvn: or_default(&raw.bvn, DEFAULT_BVN),
            gender,
            marital_status: "Single".to_string(),
            children: "None".to_string(),
            residence: or_default(&raw.address, DEFAULT_RESIDENCE),
        },
        education: Education {
            level: "B.Sc".to_string(),
            employment_status: "Employed".to_string(),
            sector: "FinTech".to_string(),
            duration: "2 years".to_string(),
            office_email: or_default(&raw.email, DEFAULT_OFFICE_EMAIL),
            monthly_income: "₦200,000.00 - ₦400,000.00".to_string(),
            loan_repayment: "40,000".to_string(),
        },
        socials: Socials {
            twitter: handle.clone(),
            facebook: user_name.unwrap_or("User FB").to_string(),
            instagram: handle,
        },
        guarantor: Guarantor {
            full_name: "Debby Ogana".to_string(),
            phone_number: "07060780922".to_string(),
            email: "debby@gmail.com".to_string(),
            relationship: "Sister".to_string(),
        },
        account_details: AccountDetails {
            account_number: or_default(&raw.account_number, DEFAULT_ACCOUNT_NUMBER),
            bank: or_default(&raw.bank_name, DEFAULT_BANK),
            balance: or_default(&raw.account_balance, DEFAULT_BALANCE),
            tier: rng.gen_range(1..=MAX_TIER),
        },
        id,
    }
}

/// Map a raw list, keeping source order.
///
/// Ids must be unique in the collection; a record whose id was already
/// seen is dropped.
pub fn map_raw_users<R: Rng + ?Sized>(raw: &[RawUser], rng: &mut R) -> Vec<User> {
    let mut seen = HashSet::new();
    let mut users = Vec::with_capacity(raw.len());

    for record in raw {
        let user = map_raw_user(record, rng);
        if seen.insert(user.id.clone()) {
            users.push(user);
        } else {
            warn!(id = %user.id, "Dropping raw user with duplicate id");
        }
    }

    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn raw(json: &str) -> RawUser {
        serde_json::from_str(json).expect("valid raw user JSON")
    }

    #[test]
    fn test_maps_present_fields() {
        let mut rng = StdRng::seed_from_u64(7);
        let user = map_raw_user(
            &raw(r#"{
                "id": "12",
                "orgName": "Iridia",
                "userName": "Grace Effiom",
                "email": "grace@iridia.com",
                "phoneNumber": "07060780922",
                "createdAt": "2020-05-15T10:00:00.000Z",
                "bvn": "22233344455",
                "gender": "Female",
                "address": "3 Marina Road",
                "accountNumber": "9912345678",
                "bankName": "GTBank",
                "accountBalance": "10,000.00"
            }"#),
            &mut rng,
        );

        assert_eq!(user.id, "12");
        assert_eq!(user.organization, "Iridia");
        assert_eq!(user.username, "Grace Effiom");
        assert_eq!(user.email, "grace@iridia.com");
        assert_eq!(user.phone_number, "07060780922");
        assert_eq!(user.date_joined, "2020-05-15T10:00:00.000Z");
        assert_eq!(user.personal_info.full_name, "Grace Effiom");
        assert_eq!(user.personal_info.bvn, "22233344455");
        assert_eq!(user.personal_info.gender, "Female");
        assert_eq!(user.personal_info.residence, "3 Marina Road");
        assert_eq!(user.education.office_email, "grace@iridia.com");
        assert_eq!(user.socials.twitter, "@grace_effiom");
        assert_eq!(user.socials.instagram, "@grace_effiom");
        assert_eq!(user.socials.facebook, "Grace Effiom");
        assert_eq!(user.account_details.account_number, "9912345678");
        assert_eq!(user.account_details.bank, "GTBank");
        assert_eq!(user.account_details.balance, "10,000.00");
        // id length 2 -> index 2
        assert_eq!(user.status, UserStatus::Pending);
    }

    #[test]
    fn test_fallbacks_for_missing_fields() {
        let mut rng = StdRng::seed_from_u64(1);
        let user = map_raw_user(&raw(r#"{"id": "1", "email": ""}"#), &mut rng);

        assert_eq!(user.organization, "Lendsqr");
        assert_eq!(user.username, "Unknown User");
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.phone_number, "080-000-0000");
        assert_eq!(user.personal_info.full_name, "Unknown User");
        assert_eq!(user.personal_info.bvn, "12345678901");
        assert!(["Female", "Male"].contains(&user.personal_info.gender.as_str()));
        assert_eq!(user.personal_info.residence, "Parent's Apartment");
        assert_eq!(user.education.office_email, "office@lendsqr.com");
        assert_eq!(user.socials.twitter, "@user");
        assert_eq!(user.socials.facebook, "User FB");
        assert_eq!(user.guarantor.full_name, "Debby Ogana");
        assert_eq!(user.account_details.bank, "Providus Bank");
        assert_eq!(user.account_details.balance, "200,000.00");
        assert!(chrono::DateTime::parse_from_rfc3339(&user.date_joined).is_ok());
    }

    #[test]
    fn test_whitespace_values_are_kept() {
        let mut rng = StdRng::seed_from_u64(1);
        let user = map_raw_user(
            &raw(r#"{"id": "1", "userName": "  ", "fullName": "Tosin Dokunmu"}"#),
            &mut rng,
        );
        assert_eq!(user.username, "  ");
        assert_eq!(user.personal_info.full_name, "  ");
        assert_eq!(user.socials.twitter, "@__");
    }

    #[test]
    fn test_username_falls_back_to_full_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let user = map_raw_user(&raw(r#"{"id": "1", "fullName": "Tosin Dokunmu"}"#), &mut rng);
        assert_eq!(user.username, "Tosin Dokunmu");
        // Personal full name and socials only look at userName
        assert_eq!(user.personal_info.full_name, "Unknown User");
        assert_eq!(user.socials.twitter, "@user");
    }

    #[test]
    fn test_missing_id_is_generated() {
        let mut rng = StdRng::seed_from_u64(3);
        let user = map_raw_user(&RawUser::default(), &mut rng);
        assert_eq!(user.id.len(), GENERATED_ID_LEN);
        assert!(user.id.bytes().all(|b| BASE36_DIGITS.contains(&b)));
        assert_eq!(user.status, UserStatus::from_id_heuristic(&user.id));
    }

    #[test]
    fn test_explicit_status_wins_over_heuristic() {
        let mut rng = StdRng::seed_from_u64(3);
        let user = map_raw_user(&raw(r#"{"id": "1234", "status": "blacklisted"}"#), &mut rng);
        assert_eq!(user.status, UserStatus::Blacklisted);

        let user = map_raw_user(&raw(r#"{"id": "1234", "status": "archived"}"#), &mut rng);
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn test_numeric_fields_are_stringified() {
        let mut rng = StdRng::seed_from_u64(3);
        let user = map_raw_user(
            &raw(r#"{"id": 42, "accountBalance": 1500.5, "accountNumber": null}"#),
            &mut rng,
        );
        assert_eq!(user.id, "42");
        assert_eq!(user.account_details.balance, "1500.5");
        assert_eq!(user.account_details.account_number, "1234567890");
    }

    #[test]
    fn test_tier_within_range() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let user = map_raw_user(&raw(r#"{"id": "5"}"#), &mut rng);
            assert!((1..=3).contains(&user.account_details.tier));
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let records = vec![raw(r#"{"id": "1"}"#), raw(r#"{"id": "2"}"#)];
        let a = map_raw_users(&records, &mut StdRng::seed_from_u64(5));
        let b = map_raw_users(&records, &mut StdRng::seed_from_u64(5));
        // date_joined is the only time-dependent field; both records lack createdAt
        let strip = |users: Vec<User>| {
            users
                .into_iter()
                .map(|mut u| {
                    u.date_joined.clear();
                    u
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(a), strip(b));
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let mut rng = StdRng::seed_from_u64(5);
        let records = vec![
            raw(r#"{"id": "1", "userName": "first"}"#),
            raw(r#"{"id": "2"}"#),
            raw(r#"{"id": "1", "userName": "second"}"#),
        ];
        let users = map_raw_users(&records, &mut rng);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "first");
        assert_eq!(users[1].id, "2");
    }

    #[test]
    fn test_social_handle() {
        assert_eq!(social_handle("Ada  Obi"), "@ada__obi");
        assert_eq!(social_handle("user"), "@user");
    }
}
