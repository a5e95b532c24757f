use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;

use crate::error::{AppError, AppResult};

/// Minimum query length before any lookup is issued.
const MIN_QUERY_LEN: usize = 3;
const SUGGESTION_LIMIT: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    pub label: String,
    pub context: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    label: String,
    #[serde(default)]
    context: String,
}

/// Client for the public address-search API (GeoJSON feature list).
#[derive(Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Suggestions in provider order; no client-side re-sorting.
    pub async fn search(&self, query: &str) -> AppResult<Vec<AddressSuggestion>> {
        let response = self
            .http
            .get(format!("{}/search/", self.base_url))
            .query(&[("q", query), ("limit", &SUGGESTION_LIMIT.to_string())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Address search failed with status {}",
                response.status()
            )));
        }
        let collection: FeatureCollection = response.json().await?;
        Ok(collection
            .features
            .into_iter()
            .map(|feature| AddressSuggestion {
                label: feature.properties.label,
                context: feature.properties.context,
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupState {
    /// No list shown: short query, dismissed, or a failed lookup.
    Idle,
    Loading,
    Results { suggestions: Vec<AddressSuggestion> },
    /// Completed query with no results; rendered as "not found".
    NotFound,
}

/// Debounced, cancelable autocomplete state for one address field.
/// At most one lookup is logically current: scheduling a new one
/// aborts the previous in-flight request, and a sequence number is
/// checked before results are applied.
pub struct AddressLookup {
    state: Arc<Mutex<LookupState>>,
    seq: Arc<AtomicU64>,
    pending: Option<AbortHandle>,
    debounce: Duration,
}

impl AddressLookup {
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(LookupState::Idle)),
            seq: Arc::new(AtomicU64::new(0)),
            pending: None,
            debounce,
        }
    }

    pub fn state(&self) -> LookupState {
        self.state.lock().unwrap().clone()
    }

    /// Keystroke entry point. Queries of fewer than three characters
    /// clear the list without any request.
    pub fn on_input<F, Fut>(&mut self, query: &str, fetch: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<Vec<AddressSuggestion>>> + Send,
    {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        // Bump and write under one lock; the spawned task re-checks the
        // sequence inside that same lock, so a task that survives its
        // abort cannot slip in between the check and the write.
        let seq;
        {
            let mut current = self.state.lock().unwrap();
            seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
            if query.chars().count() < MIN_QUERY_LEN {
                *current = LookupState::Idle;
                return;
            }
            *current = LookupState::Loading;
        }
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.seq);
        let debounce = self.debounce;
        let query = query.to_string();
        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let result = fetch(query).await;
            let mut state = state.lock().unwrap();
            if latest.load(Ordering::SeqCst) != seq {
                return;
            }
            *state = match result {
                Ok(suggestions) if suggestions.is_empty() => LookupState::NotFound,
                Ok(suggestions) => LookupState::Results { suggestions },
                // Lookup failures are not surfaced; the list just closes.
                Err(_) => LookupState::Idle,
            };
        });
        self.pending = Some(task.abort_handle());
    }

    /// Click-outside: closes the list without altering the field value.
    pub fn dismiss(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let mut state = self.state.lock().unwrap();
        self.seq.fetch_add(1, Ordering::SeqCst);
        *state = LookupState::Idle;
    }
}

impl Drop for AddressLookup {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
