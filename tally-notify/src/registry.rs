//! Durable subscriber registry.
//!
//! A set of endpoint ids mirrored to a JSON file so it survives
//! restarts. Grows by add-if-absent when a user starts the bot or
//! records an entry; shrinks only when a delivery bounces. A missing
//! or unreadable file means an empty roster, never a fatal error.
//! Mutation and persistence happen under one lock so memory and disk
//! cannot drift further than an overwrite-on-save allows.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tally_domain::EndpointId;
use tracing::{info, warn};

/// Durable set of notification endpoints.
#[derive(Debug)]
pub struct SubscriberRegistry {
    path: PathBuf,
    endpoints: RwLock<BTreeSet<EndpointId>>,
}

impl SubscriberRegistry {
    /// Load the roster from `path`, degrading to an empty set when the
    /// file is missing, unreadable, or not valid JSON.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let endpoints = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<EndpointId>>(&contents) {
                Ok(list) => {
                    let set: BTreeSet<EndpointId> = list.into_iter().collect();
                    info!(path = %path.display(), count = set.len(), "Loaded subscriber roster");
                    set
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Roster file invalid, starting empty");
                    BTreeSet::new()
                }
            },
            Err(e) => {
                info!(path = %path.display(), reason = %e, "No roster file, starting empty");
                BTreeSet::new()
            }
        };

        Self {
            path,
            endpoints: RwLock::new(endpoints),
        }
    }

    /// Add an endpoint if absent. Persists the full set only on actual
    /// insertion; re-registering is a no-op. Returns whether the
    /// endpoint was new.
    ///
    /// A persistence failure is logged and swallowed: the in-memory
    /// registration stands and the user's command still succeeds.
    pub fn register(&self, endpoint: EndpointId) -> bool {
        let mut endpoints = self.endpoints.write().unwrap();
        if !endpoints.insert(endpoint) {
            return false;
        }
        info!(%endpoint, count = endpoints.len(), "Registered subscriber");
        self.persist(&endpoints);
        true
    }

    /// Remove an endpoint that bounced a delivery and re-persist.
    /// Returns whether it was present.
    pub fn evict(&self, endpoint: EndpointId) -> bool {
        let mut endpoints = self.endpoints.write().unwrap();
        if !endpoints.remove(&endpoint) {
            return false;
        }
        warn!(%endpoint, count = endpoints.len(), "Evicted unreachable subscriber");
        self.persist(&endpoints);
        true
    }

    /// Current endpoints, in stable order.
    pub fn snapshot(&self) -> Vec<EndpointId> {
        self.endpoints.read().unwrap().iter().copied().collect()
    }

    /// Whether the endpoint is registered.
    pub fn contains(&self, endpoint: EndpointId) -> bool {
        self.endpoints.read().unwrap().contains(&endpoint)
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.read().unwrap().len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.endpoints.read().unwrap().is_empty()
    }

    /// Where the roster lives on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, endpoints: &BTreeSet<EndpointId>) {
        let list: Vec<EndpointId> = endpoints.iter().copied().collect();
        let payload = match serde_json::to_string(&list) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Could not serialize roster");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, payload) {
            warn!(path = %self.path.display(), error = %e, "Could not persist roster");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
