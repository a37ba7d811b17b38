//! Turns finished drag gestures into at most one move command.
//!
//! ```text
//! Idle --begin--> Dragging --finish--> Committed | Cancelled --> Idle
//! ```
//!
//! Nothing is mutated while a gesture is in flight; only the final drop is
//! committed. A drop with no destination, or onto the slot it started from,
//! is cancelled and issues no command at all.

use crate::{
    domain::{BoardId, ListId},
    engine::{Kanban, Outcome},
    error::{Result, TrellisError},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// What is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DragKind {
    /// A list; containers are board IDs
    List,
    /// A card; containers are list IDs
    Card,
}

/// Gesture start as reported by the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragStart {
    pub kind: DragKind,
    pub source_container_id: String,
    pub source_index: usize,
}

/// Gesture end as reported by the UI layer
///
/// A missing destination means the item was dropped outside any target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    pub kind: DragKind,
    pub source_container_id: String,
    pub source_index: usize,
    #[serde(default)]
    pub destination_container_id: Option<String>,
    #[serde(default)]
    pub destination_index: Option<usize>,
}

impl DragResult {
    /// The drop target, unless the gesture ended nowhere or where it began
    fn destination(&self) -> Option<(&str, usize)> {
        let container = self.destination_container_id.as_deref()?;
        let index = self.destination_index?;
        if container == self.source_container_id && index == self.source_index {
            return None;
        }
        Some((container, index))
    }
}

/// Where the adapter currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging(DragStart),
}

/// How a finished gesture was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Exactly one move command was issued
    Committed(Outcome),
    /// No command was issued
    Cancelled,
}

/// The move commands a drag can turn into
pub trait MoveTarget {
    fn move_list(
        &mut self,
        board_id: BoardId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Outcome>;

    fn move_card(
        &mut self,
        from_list_id: ListId,
        to_list_id: ListId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Outcome>;
}

impl MoveTarget for Kanban {
    fn move_list(
        &mut self,
        board_id: BoardId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Outcome> {
        Kanban::move_list(self, board_id, from_index, to_index)
    }

    fn move_card(
        &mut self,
        from_list_id: ListId,
        to_list_id: ListId,
        from_index: usize,
        to_index: usize,
    ) -> Result<Outcome> {
        Kanban::move_card(self, from_list_id, to_list_id, from_index, to_index)
    }
}

#[derive(Debug)]
pub struct DragAdapter {
    phase: DragPhase,
}

impl Default for DragAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DragAdapter {
    pub fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Idle -> Dragging; rejects overlapping gestures
    pub fn begin(&mut self, start: DragStart) -> Result<()> {
        if self.is_dragging() {
            warn!(?start, "ignoring drag start while another drag is active");
            return Err(TrellisError::DragInProgress);
        }
        debug!(
            kind = ?start.kind,
            container = %start.source_container_id,
            index = start.source_index,
            "drag started"
        );
        self.phase = DragPhase::Dragging(start);
        Ok(())
    }

    /// Abandons the active gesture, if any, without touching the board
    pub fn abort(&mut self) -> DragOutcome {
        if self.is_dragging() {
            debug!("drag aborted");
        }
        self.phase = DragPhase::Idle;
        DragOutcome::Cancelled
    }

    /// Dragging -> Committed | Cancelled, then back to Idle
    ///
    /// Issues at most one command against `target`. Errors also return the
    /// adapter to Idle.
    pub fn finish<T: MoveTarget>(
        &mut self,
        target: &mut T,
        result: &DragResult,
    ) -> Result<DragOutcome> {
        let DragPhase::Dragging(start) = std::mem::replace(&mut self.phase, DragPhase::Idle)
        else {
            return Err(TrellisError::NoActiveDrag);
        };

        if start.kind != result.kind
            || start.source_container_id != result.source_container_id
            || start.source_index != result.source_index
        {
            warn!(?start, ?result, "drag result does not match its start");
            return Err(TrellisError::InvalidDrag(
                "result does not match the active drag".to_string(),
            ));
        }

        let Some((destination, to_index)) = result.destination() else {
            debug!(kind = ?result.kind, "drag cancelled");
            return Ok(DragOutcome::Cancelled);
        };

        let outcome = match result.kind {
            DragKind::List => {
                if destination != result.source_container_id {
                    warn!(
                        from = %result.source_container_id,
                        to = %destination,
                        "lists cannot be dragged to another board"
                    );
                    return Err(TrellisError::InvalidDrag(
                        "lists cannot leave their board".to_string(),
                    ));
                }
                let board_id = BoardId::from_str(&result.source_container_id)?;
                target.move_list(board_id, result.source_index, to_index)?
            }
            DragKind::Card => {
                let from_list_id = ListId::from_str(&result.source_container_id)?;
                let to_list_id = ListId::from_str(destination)?;
                target.move_card(from_list_id, to_list_id, result.source_index, to_index)?
            }
        };

        debug!(kind = ?result.kind, "drag committed");
        Ok(DragOutcome::Committed(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        MoveList(BoardId, usize, usize),
        MoveCard(ListId, ListId, usize, usize),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl MoveTarget for Recorder {
        fn move_list(
            &mut self,
            board_id: BoardId,
            from_index: usize,
            to_index: usize,
        ) -> Result<Outcome> {
            self.calls.push(Call::MoveList(board_id, from_index, to_index));
            Ok(Outcome::Applied(()))
        }

        fn move_card(
            &mut self,
            from_list_id: ListId,
            to_list_id: ListId,
            from_index: usize,
            to_index: usize,
        ) -> Result<Outcome> {
            self.calls
                .push(Call::MoveCard(from_list_id, to_list_id, from_index, to_index));
            Ok(Outcome::Applied(()))
        }
    }

    fn uuid(n: u128) -> String {
        Uuid::from_u128(n).to_string()
    }

    fn start(kind: DragKind, container: u128, index: usize) -> DragStart {
        DragStart {
            kind,
            source_container_id: uuid(container),
            source_index: index,
        }
    }

    fn drop_at(start: &DragStart, destination: Option<(u128, usize)>) -> DragResult {
        DragResult {
            kind: start.kind,
            source_container_id: start.source_container_id.clone(),
            source_index: start.source_index,
            destination_container_id: destination.map(|(c, _)| uuid(c)),
            destination_index: destination.map(|(_, i)| i),
        }
    }

    #[test]
    fn test_cancelled_drag_issues_no_command() {
        let mut adapter = DragAdapter::new();
        let mut target = Recorder::default();
        let s = start(DragKind::Card, 1, 0);

        adapter.begin(s.clone()).unwrap();
        let outcome = adapter.finish(&mut target, &drop_at(&s, None)).unwrap();

        assert_eq!(outcome, DragOutcome::Cancelled);
        assert!(target.calls.is_empty());
        assert_eq!(adapter.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_drop_on_origin_slot_is_cancelled() {
        let mut adapter = DragAdapter::new();
        let mut target = Recorder::default();
        let s = start(DragKind::List, 1, 2);

        adapter.begin(s.clone()).unwrap();
        let outcome = adapter.finish(&mut target, &drop_at(&s, Some((1, 2)))).unwrap();

        assert_eq!(outcome, DragOutcome::Cancelled);
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_card_drop_commits_one_move() {
        let mut adapter = DragAdapter::new();
        let mut target = Recorder::default();
        let s = start(DragKind::Card, 1, 0);

        adapter.begin(s.clone()).unwrap();
        let outcome = adapter.finish(&mut target, &drop_at(&s, Some((2, 3)))).unwrap();

        assert_eq!(outcome, DragOutcome::Committed(Outcome::Applied(())));
        assert_eq!(
            target.calls,
            vec![Call::MoveCard(
                ListId::from_uuid(Uuid::from_u128(1)),
                ListId::from_uuid(Uuid::from_u128(2)),
                0,
                3
            )]
        );
    }

    #[test]
    fn test_list_drop_commits_one_move() {
        let mut adapter = DragAdapter::new();
        let mut target = Recorder::default();
        let s = start(DragKind::List, 1, 0);

        adapter.begin(s.clone()).unwrap();
        adapter.finish(&mut target, &drop_at(&s, Some((1, 2)))).unwrap();

        assert_eq!(
            target.calls,
            vec![Call::MoveList(BoardId::from_uuid(Uuid::from_u128(1)), 0, 2)]
        );
    }

    #[test]
    fn test_list_cannot_change_board() {
        let mut adapter = DragAdapter::new();
        let mut target = Recorder::default();
        let s = start(DragKind::List, 1, 0);

        adapter.begin(s.clone()).unwrap();
        let err = adapter.finish(&mut target, &drop_at(&s, Some((2, 0)))).unwrap_err();

        assert!(matches!(err, TrellisError::InvalidDrag(_)));
        assert!(target.calls.is_empty());
        assert!(!adapter.is_dragging());
    }

    #[test]
    fn test_overlapping_gesture_is_rejected() {
        let mut adapter = DragAdapter::new();
        adapter.begin(start(DragKind::Card, 1, 0)).unwrap();
        assert!(matches!(
            adapter.begin(start(DragKind::Card, 1, 1)),
            Err(TrellisError::DragInProgress)
        ));
        // The first gesture is still the active one
        assert_eq!(
            adapter.phase(),
            &DragPhase::Dragging(start(DragKind::Card, 1, 0))
        );
    }

    #[test]
    fn test_finish_without_begin() {
        let mut adapter = DragAdapter::new();
        let mut target = Recorder::default();
        let s = start(DragKind::Card, 1, 0);
        assert!(matches!(
            adapter.finish(&mut target, &drop_at(&s, Some((2, 0)))),
            Err(TrellisError::NoActiveDrag)
        ));
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_mismatched_result_is_rejected() {
        let mut adapter = DragAdapter::new();
        let mut target = Recorder::default();
        adapter.begin(start(DragKind::Card, 1, 0)).unwrap();

        let other = start(DragKind::Card, 1, 4);
        assert!(adapter
            .finish(&mut target, &drop_at(&other, Some((2, 0))))
            .is_err());
        assert!(target.calls.is_empty());
        assert!(!adapter.is_dragging());
    }

    #[test]
    fn test_unparseable_container_is_rejected() {
        let mut adapter = DragAdapter::new();
        let mut target = Recorder::default();
        let s = DragStart {
            kind: DragKind::Card,
            source_container_id: "list-1".to_string(),
            source_index: 0,
        };

        adapter.begin(s.clone()).unwrap();
        let mut result = drop_at(&s, Some((2, 0)));
        result.source_container_id = "list-1".to_string();
        assert!(matches!(
            adapter.finish(&mut target, &result),
            Err(TrellisError::InvalidId(_))
        ));
        assert!(target.calls.is_empty());
    }

    #[test]
    fn test_abort_returns_to_idle() {
        let mut adapter = DragAdapter::new();
        adapter.begin(start(DragKind::List, 1, 0)).unwrap();
        assert_eq!(adapter.abort(), DragOutcome::Cancelled);
        assert_eq!(adapter.phase(), &DragPhase::Idle);
        adapter.begin(start(DragKind::List, 1, 0)).unwrap();
    }

    #[test]
    fn test_gesture_json_from_ui() {
        let json = format!(
            r#"{{"kind":"CARD","sourceContainerId":"{}","sourceIndex":1,"destinationContainerId":null,"destinationIndex":null}}"#,
            uuid(1)
        );
        let result: DragResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result.kind, DragKind::Card);
        assert_eq!(result.destination(), None);
    }
}
