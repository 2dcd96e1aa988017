//! Shared navigation state
//!
//! Which area is selected and where the map looks is shared between the
//! overlay controller, the sidebar and persistence. [`Navigation`] is a
//! cloneable handle over a watch channel: anyone may read or write it, and
//! observers subscribe to be told about changes.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Current selection and viewport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Record id of the selected area
    pub selected_id: Option<String>,
    /// Map center as (latitude, longitude)
    pub center: Option<(f64, f64)>,
    pub zoom: Option<f64>,
    /// While an intro is shown the viewport is not recorded
    #[serde(default)]
    pub intro: bool,
}

/// Handle to the shared navigation state
#[derive(Debug, Clone)]
pub struct Navigation {
    sender: Arc<watch::Sender<NavigationState>>,
}

impl Navigation {
    pub fn new(initial: NavigationState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Snapshot of the current state
    pub fn get(&self) -> NavigationState {
        self.sender.borrow().clone()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.sender.borrow().selected_id.clone()
    }

    /// Replace the whole state, notifying observers
    pub fn set(&self, state: NavigationState) {
        self.update(|current| *current = state);
    }

    /// Modify the state in place; observers are only notified on an actual change
    pub fn update(&self, modify: impl FnOnce(&mut NavigationState)) {
        self.sender.send_if_modified(|state| {
            let before = state.clone();
            modify(state);
            *state != before
        });
    }

    /// Select `id`, or clear the selection when `id` is already selected
    pub fn toggle_selected(&self, id: &str) {
        self.update(|state| {
            if state.selected_id.as_deref() == Some(id) {
                state.selected_id = None;
            } else {
                state.selected_id = Some(id.to_string());
            }
        });
    }

    /// Register an observer
    ///
    /// The receiver reports `has_changed()` after every modification made
    /// through any handle.
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.sender.subscribe()
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(NavigationState::default())
    }
}
