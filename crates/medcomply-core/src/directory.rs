//! Physician directory search.
//!
//! `Idle -> Searching -> (Populated | Failed)`, restartable from any state.

use medcomply_api::{Physician, PhysicianId, PhysicianQuery};
use tracing::{debug, info, warn};

use crate::generation::Generation;

/// Shown when the directory request fails.
pub const FETCH_FAILED: &str = "Failed to load physicians.";

/// Phase of the directory search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DirectoryPhase {
    /// No search issued yet.
    #[default]
    Idle,
    /// Request outstanding.
    Searching,
    /// Results received (possibly none).
    Populated,
    /// Request failed.
    Failed(String),
}

/// Ticket for one issued directory search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTicket {
    generation: Generation,
    query: PhysicianQuery,
}

impl DirectoryTicket {
    /// Generation of the issued search.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Query to send to the directory.
    #[must_use]
    pub const fn query(&self) -> &PhysicianQuery {
        &self.query
    }
}

/// Physician search state.
#[derive(Debug, Default)]
pub struct DirectorySearch {
    /// State filter input.
    state: String,
    /// Specialty filter input.
    specialty: String,
    phase: DirectoryPhase,
    physicians: Vec<Physician>,
    selected: Option<Physician>,
    generation: Generation,
}

impl DirectorySearch {
    /// Creates an idle directory search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State filter input.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Specialty filter input.
    #[must_use]
    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    /// Updates the state filter input.
    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }

    /// Updates the specialty filter input.
    pub fn set_specialty(&mut self, specialty: impl Into<String>) {
        self.specialty = specialty.into();
    }

    /// Issues a search over the current filter inputs. Blank filters are
    /// left out of the query.
    pub fn search(&mut self) -> DirectoryTicket {
        let generation = self.generation.bump();
        let query = PhysicianQuery::new(&self.state, &self.specialty);
        self.phase = DirectoryPhase::Searching;
        info!(
            "Physician search {} issued: {}",
            generation,
            query.to_query_string()
        );
        DirectoryTicket { generation, query }
    }

    /// Applies the outcome of a search.
    ///
    /// Returns `false` if the response belongs to a superseded search.
    pub fn apply_results(
        &mut self,
        generation: Generation,
        result: Result<Vec<Physician>, String>,
    ) -> bool {
        if generation != self.generation || self.phase != DirectoryPhase::Searching {
            debug!(
                "Discarding physician search {} (current {})",
                generation, self.generation
            );
            return false;
        }

        match result {
            Ok(physicians) => {
                info!(
                    "Physician search {} returned {} physician(s)",
                    generation,
                    physicians.len()
                );
                self.physicians = physicians;
                self.phase = DirectoryPhase::Populated;
            }
            Err(e) => {
                warn!("Physician search {} failed: {}", generation, e);
                self.physicians.clear();
                self.phase = DirectoryPhase::Failed(FETCH_FAILED.to_string());
            }
        }
        true
    }

    /// Selects a physician from the result list.
    ///
    /// Records the selection for highlighting; the result list is not
    /// modified. Returns the selected physician, or `None` if the id is not
    /// in the list.
    pub fn select(&mut self, physician_id: PhysicianId) -> Option<&Physician> {
        let physician = self
            .physicians
            .iter()
            .find(|p| p.physician_id == physician_id)?
            .clone();
        debug!("Selected physician {}", physician_id);
        self.selected = Some(physician);
        self.selected.as_ref()
    }

    /// Currently selected physician.
    #[must_use]
    pub const fn selected(&self) -> Option<&Physician> {
        self.selected.as_ref()
    }

    /// Returns true if the physician is the current selection.
    #[must_use]
    pub fn is_selected(&self, physician_id: PhysicianId) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|p| p.physician_id == physician_id)
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &DirectoryPhase {
        &self.phase
    }

    /// Returns true while a search is outstanding.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        matches!(self.phase, DirectoryPhase::Searching)
    }

    /// Current result list.
    #[must_use]
    pub fn physicians(&self) -> &[Physician] {
        &self.physicians
    }

    /// Fetch failure message, if the last search failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            DirectoryPhase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
