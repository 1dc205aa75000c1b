//! The initial load of the user collection.
//!
//! ```text
//! Idle --begin, cache populated--> Ready
//! Idle --begin, cache empty-----> Loading --complete, users--> Ready
//!                                         --complete, none---> Failed
//! ```
//!
//! A `Failed` loader may `begin` again, which is how a manual retry works.

use rand::Rng;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::models::User;
use crate::store::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Default)]
pub struct Loader {
    state: LoadState,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// True while a fetch is outstanding.
    pub fn is_blocking(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Decide whether a fetch is needed. Returns true when the caller should
    /// start one and report back through `complete`.
    pub fn begin(&mut self, storage: &Storage) -> bool {
        match self.state {
            LoadState::Loading | LoadState::Ready => false,
            LoadState::Idle | LoadState::Failed => {
                if storage.has_users() {
                    self.state = LoadState::Ready;
                    false
                } else {
                    self.state = LoadState::Loading;
                    true
                }
            }
        }
    }

    /// Record the fetch result. A non-empty result is saved as the snapshot.
    pub fn complete(&mut self, storage: &Storage, users: &[User]) {
        if users.is_empty() {
            warn!("Initial load returned no users");
            self.state = LoadState::Failed;
            return;
        }

        if let Err(e) = storage.save_users(users) {
            // The users are still usable for this session
            warn!(error = %e, "Failed to persist user snapshot");
        }
        info!(count = users.len(), "Loaded users");
        self.state = LoadState::Ready;
    }

    /// Run the whole sequence in place: fetch only if the cache is empty.
    pub async fn bootstrap<R: Rng + ?Sized>(
        &mut self,
        storage: &Storage,
        client: &ApiClient,
        rng: &mut R,
    ) -> LoadState {
        if self.begin(storage) {
            let users = client.fetch_users(rng).await;
            self.complete(storage, &users);
        }
        self.state
    }
}
