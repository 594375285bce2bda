#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures for type explorer integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::oneshot;
use type_explorer::{
    LoadResult, RecordingFailureReporter, SessionState, TypeCategory, TypeDescriptor,
    TypeFetcher, TypeMap, TypeRegistryCache, TypeRegistrySnapshot, TypesRequest,
};

/// Fetcher whose responses are released by the test, one gate per platform name.
///
/// Lets a test hold several loads in flight and decide the order they complete in.
#[derive(Default)]
pub struct GatedFetcher {
    gates: Mutex<HashMap<String, oneshot::Receiver<LoadResult>>>,
    requests: Mutex<Vec<TypesRequest>>,
}

impl GatedFetcher {
    /// Registers a gate for `platform` and returns the sender that releases it.
    pub fn gate(&self, platform: &str) -> oneshot::Sender<LoadResult> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(platform.to_owned(), rx);
        tx
    }

    pub fn requests(&self) -> Vec<TypesRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TypeFetcher for GatedFetcher {
    async fn fetch_types(&self, request: &TypesRequest) -> LoadResult {
        self.requests.lock().push(request.clone());
        let gate = self
            .gates
            .lock()
            .remove(&request.platform_name)
            .expect("no gate registered for platform");
        gate.await.expect("gate sender dropped")
    }
}

pub struct Harness {
    pub cache: Arc<TypeRegistryCache>,
    pub fetcher: Arc<GatedFetcher>,
    pub reporter: Arc<RecordingFailureReporter>,
    pub session: Arc<SessionState>,
}

pub fn create_harness() -> Harness {
    let fetcher = Arc::new(GatedFetcher::default());
    let reporter = Arc::new(RecordingFailureReporter::new());
    let session = Arc::new(SessionState::new(false));
    let cache = Arc::new(TypeRegistryCache::new(
        fetcher.clone(),
        reporter.clone(),
        session.clone(),
    ));
    Harness {
        cache,
        fetcher,
        reporter,
        session,
    }
}

/// Map of descriptors shaped like a server's explorer entries.
pub fn type_map(def_key: &str, names: &[&str]) -> TypeMap {
    names
        .iter()
        .map(|name| {
            (
                (*name).to_owned(),
                TypeDescriptor::new(json!({ def_key: { "name": name, "version": 1 } })),
            )
        })
        .collect()
}

pub fn snapshot(entities: &[&str], relationships: &[&str]) -> TypeRegistrySnapshot {
    TypeRegistrySnapshot::empty()
        .with_category(TypeCategory::Entity, type_map("entityDef", entities))
        .with_category(
            TypeCategory::Relationship,
            type_map("relationshipDef", relationships),
        )
}

/// A full `TypeExplorerResponse` body as a metadata server sends it.
pub fn types_response_body() -> Value {
    json!({
        "class": "TypeExplorerResponse",
        "relatedHTTPCode": 200,
        "typeExplorer": {
            "entities": {
                "Referenceable": {
                    "entityDef": { "name": "Referenceable", "description": "An open metadata entity that has a unique identifier." },
                    "subTypeNames": ["Asset"]
                },
                "Asset": {
                    "entityDef": { "name": "Asset", "superType": { "name": "Referenceable" } },
                    "subTypeNames": []
                }
            },
            "relationships": {
                "AttachedTag": { "relationshipDef": { "name": "AttachedTag" } }
            },
            "classifications": {
                "Confidentiality": { "classificationDef": { "name": "Confidentiality" } }
            },
            "enums": {
                "ConfidentialityLevel": { "enumDef": { "name": "ConfidentialityLevel" } }
            }
        }
    })
}

/// Waits until `condition` holds, for loads whose handle the test no longer has.
pub async fn eventually(condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within one second");
}
