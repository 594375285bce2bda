//! Snapshot cache of a server's type-system description.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use arc_swap::ArcSwap;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use type_explorer_sdk::{
    FailureReporter, LoadFailure, LoadResult, SessionContext, TypeCategory, TypeDescriptor,
    TypeFetcher, TypeMap, TypeRegistrySnapshot, TypesRequest,
};

/// Operation label used for every failure this cache reports.
pub const GET_TYPES_OPERATION: &str = "get types for server";

/// Holds the latest known type-system snapshot and answers lookups against it.
///
/// The snapshot starts empty and is only ever replaced wholesale: a successful
/// load publishes a fully built snapshot through an atomic swap, a failed one
/// leaves the current snapshot in place and notifies the [`FailureReporter`].
///
/// Lookups never fail. An unknown name and a category the server did not send
/// both read as `None`.
///
/// Overlapping loads are not serialized; whichever completes last wins.
pub struct TypeRegistryCache {
    snapshot: ArcSwap<TypeRegistrySnapshot>,
    fetcher: Arc<dyn TypeFetcher>,
    reporter: Arc<dyn FailureReporter>,
    session: Arc<dyn SessionContext>,
}

impl TypeRegistryCache {
    /// Creates an empty cache wired to its collaborators.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn TypeFetcher>,
        reporter: Arc<dyn FailureReporter>,
        session: Arc<dyn SessionContext>,
    ) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(TypeRegistrySnapshot::empty()),
            fetcher,
            reporter,
            session,
        }
    }

    /// Loads the types of `server_name` on `platform_name`.
    ///
    /// The request, including the session's enterprise option, is built and
    /// handed to the tokio runtime before this method returns. The fetch and the
    /// application of its outcome then run to completion on their own; the
    /// returned [`LoadHandle`] only lets the caller wait for that. Dropping it, or
    /// abandoning the wait, does not cancel the load. Empty names are reported and
    /// no request is issued.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn load(self: &Arc<Self>, server_name: &str, platform_name: &str) -> LoadHandle {
        let Some(request) = self.prepare(server_name, platform_name) else {
            return LoadHandle(None);
        };
        let cache = Arc::clone(self);
        LoadHandle(Some(tokio::spawn(async move {
            cache.issue(request).await;
        })))
    }

    /// Applies the outcome of one fetch.
    ///
    /// Publishes the payload's snapshot when the fetch succeeded, the payload
    /// reports status 200 and carries a type explorer. Anything else is reported
    /// under [`GET_TYPES_OPERATION`] and the current snapshot is kept.
    pub fn on_load_complete(&self, result: LoadResult) {
        match accept(result) {
            Ok(snapshot) => {
                debug!(
                    entities = count(&snapshot, TypeCategory::Entity),
                    relationships = count(&snapshot, TypeCategory::Relationship),
                    classifications = count(&snapshot, TypeCategory::Classification),
                    enums = count(&snapshot, TypeCategory::Enum),
                    "publishing type registry snapshot"
                );
                self.snapshot.store(Arc::new(snapshot));
            }
            Err(failure) => self.report(&failure),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<TypeRegistrySnapshot> {
        self.snapshot.load_full()
    }

    /// Publishes `snapshot` directly, bypassing the fetcher.
    pub fn replace_snapshot(&self, snapshot: TypeRegistrySnapshot) {
        self.snapshot.store(Arc::new(snapshot));
    }

    /// Returns `true` once a snapshot with at least one category is held.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.snapshot.load().is_empty()
    }

    /// All types of `category`, or `None` if the snapshot lacks that category.
    #[must_use]
    pub fn types(&self, category: TypeCategory) -> Option<Arc<TypeMap>> {
        self.snapshot.load().category(category).cloned()
    }

    /// The type `name` of `category`, or `None` if unknown.
    #[must_use]
    pub fn type_of(&self, category: TypeCategory, name: &str) -> Option<TypeDescriptor> {
        self.snapshot.load().type_of(category, name).cloned()
    }

    /// Names of all types of `category`, sorted.
    #[must_use]
    pub fn type_names(&self, category: TypeCategory) -> Vec<String> {
        self.types(category)
            .map(|types| types.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get_entity_types(&self) -> Option<Arc<TypeMap>> {
        self.types(TypeCategory::Entity)
    }

    #[must_use]
    pub fn get_relationship_types(&self) -> Option<Arc<TypeMap>> {
        self.types(TypeCategory::Relationship)
    }

    #[must_use]
    pub fn get_classification_types(&self) -> Option<Arc<TypeMap>> {
        self.types(TypeCategory::Classification)
    }

    #[must_use]
    pub fn get_enum_types(&self) -> Option<Arc<TypeMap>> {
        self.types(TypeCategory::Enum)
    }

    #[must_use]
    pub fn get_entity_type(&self, name: &str) -> Option<TypeDescriptor> {
        self.type_of(TypeCategory::Entity, name)
    }

    #[must_use]
    pub fn get_relationship_type(&self, name: &str) -> Option<TypeDescriptor> {
        self.type_of(TypeCategory::Relationship, name)
    }

    #[must_use]
    pub fn get_classification_type(&self, name: &str) -> Option<TypeDescriptor> {
        self.type_of(TypeCategory::Classification, name)
    }

    #[must_use]
    pub fn get_enum_type(&self, name: &str) -> Option<TypeDescriptor> {
        self.type_of(TypeCategory::Enum, name)
    }

    /// Validates the arguments and captures the session state for one request.
    fn prepare(&self, server_name: &str, platform_name: &str) -> Option<TypesRequest> {
        if server_name.is_empty() {
            self.report(&LoadFailure::invalid_request("server name must not be empty"));
            return None;
        }
        if platform_name.is_empty() {
            self.report(&LoadFailure::invalid_request(
                "platform name must not be empty",
            ));
            return None;
        }
        Some(TypesRequest::new(
            server_name,
            platform_name,
            self.session.enterprise_option(),
        ))
    }

    async fn issue(&self, request: TypesRequest) {
        debug!(
            server = %request.server_name,
            platform = %request.platform_name,
            enterprise = request.enterprise_option,
            "requesting types"
        );
        let result = self.fetcher.fetch_types(&request).await;
        self.on_load_complete(result);
    }

    fn report(&self, failure: &LoadFailure) {
        warn!(error = %failure, "{GET_TYPES_OPERATION} failed");
        self.reporter
            .report_failed_operation(GET_TYPES_OPERATION, failure);
    }
}

/// Completion of one [`TypeRegistryCache::load`].
///
/// Resolves once the outcome has been applied, or immediately when the load was
/// rejected up front. It offers no way to abort the load.
#[derive(Debug)]
pub struct LoadHandle(Option<JoinHandle<()>>);

impl Future for LoadHandle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(task) = self.0.as_mut() else {
            return Poll::Ready(());
        };
        Pin::new(task).poll(cx).map(|result| {
            if let Err(e) = result {
                error!(error = %e, "type load task did not complete");
            }
        })
    }
}

fn accept(result: LoadResult) -> Result<TypeRegistrySnapshot, LoadFailure> {
    let response = result?;
    if response.related_http_code != 200 {
        return Err(LoadFailure::UnexpectedStatus {
            code: response.related_http_code,
            exception_class: response.exception_class_name,
            message: response.exception_error_message,
        });
    }
    response
        .type_explorer
        .ok_or(LoadFailure::MissingTypeExplorer)
}

fn count(snapshot: &TypeRegistrySnapshot, category: TypeCategory) -> usize {
    snapshot.category(category).map_or(0, |types| types.len())
}
