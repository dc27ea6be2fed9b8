//! Display-time image resolution
//!
//! Walks a candidate list one load at a time through a [`KeyResolver`] and
//! settles on the first URL that loads, or on a brand placeholder.

use crate::brand::{find_brand, Placeholder};
use crate::menu::{ImageSource, MenuRecord};
use crate::storage::BlobStore;
use pick_key::{
    brand_candidate_keys, KeyResolver, LoadOutcome, Reported, ResolutionState, StorageKey, MENU_EXTENSION,
};
use serde::Serialize;
use std::sync::Arc;

/// One URL to try
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCandidate {
    /// Bucket key, `None` for a stored absolute URL
    pub key: Option<StorageKey>,
    pub url: String,
}

impl ImageCandidate {
    /// Candidate for a bucket key
    #[must_use]
    pub fn for_key(key: StorageKey, store: &dyn BlobStore) -> Self {
        Self {
            url: store.public_url(&key),
            key: Some(key),
        }
    }

    /// Candidate for an absolute URL
    #[must_use]
    pub fn direct(url: impl Into<String>) -> Self {
        Self {
            key: None,
            url: url.into(),
        }
    }
}

/// Attempts one image load
#[async_trait::async_trait]
pub trait ImageProbe: Send + Sync {
    /// Load `candidate`; failures of any kind are [`LoadOutcome::Failed`]
    async fn load(&self, candidate: &ImageCandidate) -> LoadOutcome;
}

/// Probe answering from blob store existence
///
/// Absolute URLs outside the bucket cannot be checked and count as loaded.
pub struct BucketProbe {
    store: Arc<dyn BlobStore>,
}

impl BucketProbe {
    #[must_use]
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl ImageProbe for BucketProbe {
    async fn load(&self, candidate: &ImageCandidate) -> LoadOutcome {
        let Some(key) = &candidate.key else {
            return LoadOutcome::Loaded;
        };
        match self.store.contains(key).await {
            Ok(true) => LoadOutcome::Loaded,
            Ok(false) => LoadOutcome::Failed,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "probe failed");
                LoadOutcome::Failed
            }
        }
    }
}

/// What ends up on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayImage {
    /// A candidate loaded
    Image {
        url: String,
        /// Index of the candidate that loaded
        index: usize,
        /// Loads attempted, the successful one included
        attempts: usize,
    },
    /// Every candidate failed
    Placeholder {
        placeholder: Placeholder,
        attempts: usize,
    },
}

impl DisplayImage {
    /// URL of the loaded image, if any
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Image { url, .. } => Some(url),
            Self::Placeholder { .. } => None,
        }
    }

    /// Loads attempted
    #[must_use]
    pub fn attempts(&self) -> usize {
        match self {
            Self::Image { attempts, .. } | Self::Placeholder { attempts, .. } => *attempts,
        }
    }
}

/// Candidates for a menu row's photo
///
/// A stored `image_url` is the only candidate; otherwise the derived keys in
/// priority order.
#[must_use]
pub fn menu_image_candidates(record: &MenuRecord, store: &dyn BlobStore) -> Vec<ImageCandidate> {
    match record.image_source() {
        ImageSource::Direct(url) => vec![ImageCandidate::direct(url)],
        ImageSource::Candidates(keys) => keys
            .keys(MENU_EXTENSION)
            .into_iter()
            .map(|key| ImageCandidate::for_key(key, store))
            .collect(),
    }
}

/// Candidates for a brand logo; unknown brands only get the slug key
#[must_use]
pub fn brand_logo_candidates(brand_id: &str, store: &dyn BlobStore) -> Vec<ImageCandidate> {
    let keys = match find_brand(brand_id) {
        Some(brand) => brand.logo_candidates(),
        None => brand_candidate_keys(brand_id.trim(), ""),
    };
    keys.into_iter()
        .map(|key| ImageCandidate::for_key(key, store))
        .collect()
}

/// Try `candidates` in order, one load at a time
pub async fn resolve_image(
    candidates: Vec<ImageCandidate>,
    probe: &dyn ImageProbe,
    placeholder: Placeholder,
) -> DisplayImage {
    let mut resolver = KeyResolver::new(candidates);
    let token = resolver.token();

    let mut state = match resolver.start() {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "resolver refused to start");
            ResolutionState::Exhausted
        }
    };
    while let ResolutionState::Trying(_) = state {
        let Some(candidate) = resolver.current() else {
            break;
        };
        let outcome = probe.load(candidate).await;
        tracing::trace!(url = %candidate.url, ?outcome, "image load");
        state = match resolver.report(token, outcome) {
            Ok(Reported::Applied(next)) => next,
            Ok(Reported::Ignored) => ResolutionState::Exhausted,
            Err(e) => {
                tracing::warn!(error = %e, "resolution aborted");
                ResolutionState::Exhausted
            }
        };
    }

    let attempts = resolver.attempts();
    match (state, resolver.current()) {
        (ResolutionState::Loaded(index), Some(candidate)) => DisplayImage::Image {
            url: candidate.url.clone(),
            index,
            attempts,
        },
        _ => DisplayImage::Placeholder {
            placeholder,
            attempts,
        },
    }
}

/// Resolve the photo of a menu row
pub async fn resolve_menu_image(
    record: &MenuRecord,
    store: &dyn BlobStore,
    probe: &dyn ImageProbe,
) -> DisplayImage {
    let candidates = menu_image_candidates(record, store);
    resolve_image(candidates, probe, Placeholder::for_brand(&record.brand)).await
}

/// Resolve the logo of a brand
pub async fn resolve_brand_logo(
    brand_id: &str,
    store: &dyn BlobStore,
    probe: &dyn ImageProbe,
) -> DisplayImage {
    let candidates = brand_logo_candidates(brand_id, store);
    resolve_image(candidates, probe, Placeholder::for_brand(brand_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::storage::InMemoryBlobStore;

    #[test]
    fn direct_url_is_only_candidate() {
        let store = InMemoryBlobStore::new(StorageConfig::default());
        let mut record = MenuRecord::new("양념치킨", "bbq");
        record.image_url = Some("https://cdn.example/a.png".to_string());
        let candidates = menu_image_candidates(&record, &store);
        assert_eq!(candidates, vec![ImageCandidate::direct("https://cdn.example/a.png")]);
    }

    #[test]
    fn unknown_brand_gets_slug_only() {
        let store = InMemoryBlobStore::new(StorageConfig::default());
        let candidates = brand_logo_candidates("kfc", &store);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key.as_ref().map(StorageKey::as_str), Some("brand_kfc.svg"));
    }

    #[tokio::test]
    async fn empty_candidates_exhaust_without_loads() {
        let store: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new(StorageConfig::default()));
        let probe = BucketProbe::new(store);
        let shown = resolve_image(Vec::new(), &probe, Placeholder::for_brand("bbq")).await;
        assert_eq!(shown.attempts(), 0);
        assert!(shown.url().is_none());
    }
}
