//! Propagation of the physician selection into the message filter.

use medcomply_api::{Physician, PhysicianId};

use crate::messages::MessageSearch;

/// Seeds the message search's physician id once per distinct selection.
///
/// Re-running propagation with an unchanged selection is a no-op, so later
/// edits to the physician id field survive. No search is issued.
#[derive(Debug, Default)]
pub struct SelectionBridge {
    last_seeded: Option<PhysicianId>,
}

impl SelectionBridge {
    /// Creates a bridge that has seen no selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards `selected` into `target` if it differs from the last
    /// forwarded selection. Returns true if the filter was seeded.
    pub fn propagate(&mut self, selected: Option<&Physician>, target: &mut MessageSearch) -> bool {
        let Some(physician) = selected else {
            return false;
        };
        if self.last_seeded == Some(physician.physician_id) {
            return false;
        }
        self.last_seeded = Some(physician.physician_id);
        target.seed_physician_id(physician.physician_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DirectorySearch;

    fn physician(id: i64) -> Physician {
        Physician {
            physician_id: PhysicianId(id),
            npi: "1234567890".into(),
            first_name: "Ana".into(),
            last_name: "Ruiz".into(),
            specialty: "Oncology".into(),
            state: "NY".into(),
            consent_opt_in: false,
            preferred_channel: "sms".into(),
        }
    }

    #[test]
    fn test_select_first_result_seeds_once() {
        let mut directory = DirectorySearch::new();
        let mut messages = MessageSearch::default();
        let mut bridge = SelectionBridge::new();

        directory.set_state("NY");
        let ticket = directory.search();
        assert_eq!(ticket.query().to_query_string(), "state=NY");
        directory.apply_results(ticket.generation(), Ok(vec![physician(101), physician(102)]));

        let first = directory.physicians()[0].physician_id;
        directory.select(first);
        assert!(bridge.propagate(directory.selected(), &mut messages));
        assert_eq!(messages.filter().physician_id, "101");

        // User edits the field; re-propagating the same selection keeps the edit.
        messages.set_physician_id("555");
        assert!(!bridge.propagate(directory.selected(), &mut messages));
        assert_eq!(messages.filter().physician_id, "555");
        assert!(!messages.is_searching());
    }

    #[test]
    fn test_new_selection_seeds_again() {
        let mut messages = MessageSearch::default();
        let mut bridge = SelectionBridge::new();
        messages.set_end_date("2024-03-10");

        assert!(bridge.propagate(Some(&physician(101)), &mut messages));
        assert!(bridge.propagate(Some(&physician(102)), &mut messages));
        assert_eq!(messages.filter().physician_id, "102");
        assert_eq!(messages.filter().end_date, "2024-03-10");
    }

    #[test]
    fn test_no_selection_is_noop() {
        let mut messages = MessageSearch::default();
        messages.set_physician_id("42");
        let mut bridge = SelectionBridge::new();
        assert!(!bridge.propagate(None, &mut messages));
        assert_eq!(messages.filter().physician_id, "42");
    }
}
