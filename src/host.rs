//! Bridge to the embedding host.
//!
//! The surface never talks to storage or a message bus directly. It hands
//! settings and messages to a [`HostBridge`] and learns about persistence
//! failures through a completion callback.

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::model::AnnotationSet;

/// Settings written back to the host after every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    /// Polygons in pixel space, in store order.
    pub coords: Vec<Vec<[f64; 2]>>,
}

impl From<&AnnotationSet> for PersistedSettings {
    fn from(set: &AnnotationSet) -> Self {
        Self {
            coords: set.polygons.clone(),
        }
    }
}

/// Completion callback for [`HostBridge::persist`].
pub type PersistCallback = Box<dyn FnOnce(Result<(), PersistenceError>)>;

/// Message kind sent with every snapshot.
pub const SELECTION_MESSAGE: &str = "selection";

/// Host services used by an annotation surface.
pub trait HostBridge {
    /// Store settings. `on_done` may be called synchronously or later.
    fn persist(&self, settings: PersistedSettings, on_done: PersistCallback);

    /// Forward a message to the host. Hosts without a message channel can
    /// ignore it.
    fn send_message(&self, _kind: &str, _payload: &serde_json::Value) {}
}

/// A host that accepts and discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl HostBridge for DetachedHost {
    fn persist(&self, _settings: PersistedSettings, on_done: PersistCallback) {
        on_done(Ok(()));
    }
}
