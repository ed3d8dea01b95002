//! Single owner of the client's view of the agent run-state.
//!
//! Push events, polls and command confirmations all funnel through
//! [`StatusSynchronizer::apply_update`], so the rendered view always matches
//! the most recently applied update regardless of which source produced it.

use std::cell::Cell;
use std::rc::Rc;

use agent_panel_core::state::{AgentState, StatusUpdate};
use agent_panel_core::view::{StatusView, render_status_with};

use crate::api::ControlApi;
use crate::locale;

/// Shared cell holding the current [`AgentState`].
#[derive(Debug, Clone, Default)]
pub struct StateStore(Rc<Cell<AgentState>>);

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> AgentState {
        self.0.get()
    }

    fn set(&self, state: AgentState) {
        self.0.set(state);
    }
}

/// Something that can show a [`StatusView`]: the page DOM, or a recorder in tests.
pub trait StatusSurface {
    fn render(&self, view: &StatusView);
}

pub struct StatusSynchronizer {
    store: StateStore,
    surface: Rc<dyn StatusSurface>,
}

impl StatusSynchronizer {
    pub fn new(surface: Rc<dyn StatusSurface>) -> Self {
        Self {
            store: StateStore::new(),
            surface,
        }
    }

    /// Merge `update` into the current state and re-render.
    ///
    /// Renders even when nothing changed so a surface that was modified
    /// elsewhere is brought back in line.
    pub fn apply_update(&self, update: StatusUpdate) -> AgentState {
        let next = self.store.get().merged(&update);
        self.store.set(next);
        tracing::debug!(
            running = next.running,
            has_last_update = next.last_update.is_some(),
            "Applied status update"
        );
        self.surface
            .render(&render_status_with(&next, locale::format_timestamp));
        next
    }

    pub fn state(&self) -> AgentState {
        self.store.get()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Poll the server and apply the answer. Any failure is shown as stopped.
    pub async fn check_status<A: ControlApi>(&self, api: &A) -> AgentState {
        let update = match api.fetch_status().await {
            Ok(status) => status.to_update(),
            Err(e) => {
                tracing::warn!(error = %e, "Status check failed, assuming agent stopped");
                StatusUpdate::running(false)
            },
        };
        self.apply_update(update)
    }
}
