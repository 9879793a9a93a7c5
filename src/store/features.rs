//! In-memory feature-vote store and input normalization.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Maximum length of a feature title after normalization.
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum length of a feature description after normalization.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub votes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCreate {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VoteRequest {
    pub value: i64,
}

impl FeatureCreate {
    /// Normalize and validate the payload.
    ///
    /// Angle brackets and control characters are rejected outright; then
    /// whitespace runs collapse to single spaces and the result is trimmed
    /// and length-checked.
    pub fn normalized(self) -> Result<Self, String> {
        let title = normalize_text(&self.title, "title", MAX_TITLE_LEN)?;
        let description = normalize_text(&self.description, "description", MAX_DESCRIPTION_LEN)?;
        Ok(Self { title, description })
    }
}

fn normalize_text(raw: &str, field: &str, max_len: usize) -> Result<String, String> {
    if raw.chars().any(|c| c.is_ascii_control() || c == '<' || c == '>') {
        return Err(format!("{field} contains forbidden characters"));
    }
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.chars().count() > max_len {
        return Err(format!("{field} must be 1..{max_len} chars"));
    }
    Ok(collapsed)
}

/// Volatile feature store. State lives for the process lifetime only.
pub struct FeatureStore {
    inner: Mutex<Inner>,
}

struct Inner {
    features: Vec<Feature>,
    next_id: u64,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                features: Vec::new(),
                next_id: 1,
            }),
        }
    }

    pub fn list(&self) -> Vec<Feature> {
        self.inner.lock().expect("feature store poisoned").features.clone()
    }

    /// Insert an already-normalized payload, assigning the next id.
    pub fn create(&self, data: FeatureCreate) -> Feature {
        let mut inner = self.inner.lock().expect("feature store poisoned");
        let feature = Feature {
            id: inner.next_id,
            title: data.title,
            description: data.description,
            votes: 0,
        };
        inner.next_id += 1;
        inner.features.push(feature.clone());
        feature
    }

    /// Top `limit` features by vote count, descending.
    pub fn top(&self, limit: usize) -> Vec<Feature> {
        let mut features = self.list();
        features.sort_by(|a, b| b.votes.cmp(&a.votes));
        features.truncate(limit);
        features
    }

    pub fn get(&self, id: u64) -> Option<Feature> {
        self.inner
            .lock()
            .expect("feature store poisoned")
            .features
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    /// Apply a vote; `None` when the feature does not exist.
    pub fn vote(&self, id: u64, value: i64) -> Option<Feature> {
        let mut inner = self.inner.lock().expect("feature store poisoned");
        let feature = inner.features.iter_mut().find(|f| f.id == id)?;
        feature.votes += value;
        Some(feature.clone())
    }
}

impl Default for FeatureStore {
    fn default() -> Self {
        Self::new()
    }
}
