//! HTTP client for the remote users endpoint.

use std::time::Duration;

use rand::Rng;
use reqwest::{header, Client};
use tracing::{debug, error};

use super::mapper::{map_raw_users, RawUser};
use super::ApiError;
use crate::models::User;

/// The mock collection endpoint the dashboard is built against.
pub const DEFAULT_USERS_URL: &str =
    "https://697f923ed1548030ab666acd.mockapi.io/lendsqr/v1/users/";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the users endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    users_url: String,
}

impl ApiClient {
    pub fn new(users_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            users_url: users_url.into(),
        })
    }

    pub fn users_url(&self) -> &str {
        &self.users_url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Fetch the raw user list. One GET, no retries.
    pub async fn fetch_raw_users(&self) -> Result<Vec<RawUser>, ApiError> {
        let response = self
            .client
            .get(&self.users_url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let body = response.text().await?;
        let raw: Vec<RawUser> = serde_json::from_str(&body)?;

        debug!(count = raw.len(), "Fetched raw users");
        Ok(raw)
    }

    /// Fetch and normalize the user list.
    ///
    /// Never fails: any transport, status or decoding error is logged and
    /// yields an empty list, which callers treat as "no data yet".
    pub async fn fetch_users<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<User> {
        match self.fetch_raw_users().await {
            Ok(raw) => map_raw_users(&raw, rng),
            Err(e) => {
                error!(error = %e, url = %self.users_url, "Failed to fetch users from API");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const THREE_USERS: &str = r#"[
        {"id": "1", "orgName": "Lendsqr", "userName": "Adedeji", "email": "adedeji@lendsqr.com", "createdAt": "2020-05-15T10:00:00.000Z"},
        {"id": "2", "orgName": "Iridia", "userName": "Debby Ogana", "email": "debby@irorun.com"},
        {"id": "3", "fullName": "Grace Effiom", "phoneNumber": "07060780922"}
    ]"#;

    #[tokio::test]
    async fn test_fetch_users_success() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET).path("/lendsqr/v1/users/");
            then.status(200)
                .header("content-type", "application/json")
                .body(THREE_USERS);
        });

        let client = ApiClient::new(server.url("/lendsqr/v1/users/")).unwrap();
        let users = client.fetch_users(&mut StdRng::seed_from_u64(1)).await;

        assert_eq!(users.len(), 3);
        assert_eq!(users[0].username, "Adedeji");
        assert_eq!(users[1].organization, "Iridia");
        assert_eq!(users[2].username, "Grace Effiom");
        mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_raw_users_maps_status_errors() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(503).body("upstream down");
        });

        let client = ApiClient::new(server.url("/users")).unwrap();
        let result = client.fetch_raw_users().await;
        assert!(matches!(result, Err(ApiError::Server { ref body, .. }) if body == "upstream down"));
    }

    #[tokio::test]
    async fn test_fetch_users_server_error_yields_empty() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(500).body("boom");
        });

        let client = ApiClient::new(server.url("/users")).unwrap();
        let users = client.fetch_users(&mut StdRng::seed_from_u64(1)).await;
        assert!(users.is_empty());
        mock.assert();
    }

    #[tokio::test]
    async fn test_fetch_users_malformed_body_yields_empty() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"not": "a list"}"#);
        });

        let client = ApiClient::new(server.url("/users")).unwrap();
        let result = client.fetch_raw_users().await;
        assert!(matches!(result, Err(ApiError::Decode(_))));

        let users = client.fetch_users(&mut StdRng::seed_from_u64(1)).await;
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_users_connection_refused_yields_empty() {
        // Nothing listens on port 1
        let client = ApiClient::new("http://127.0.0.1:1/users").unwrap();
        let users = client.fetch_users(&mut StdRng::seed_from_u64(1)).await;
        assert!(users.is_empty());
    }
}
