// src/resolver.rs
//! Derivation of the discrete display state.
//!
//! The display state is never stored as a source of truth; it is recomputed
//! on demand from a [`PaginatorSnapshot`]. The presentation layer reads it
//! after every load completion and renders accordingly.

use crate::error::ErrorKind;
use crate::observer::TaskStatus;
use crate::paginator::PaginatorSnapshot;
use std::fmt;

/// What the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    /// No load has ever been started.
    NotStarted,
    /// First load in flight, nothing to show yet.
    Loading,
    /// A further page is in flight while existing items stay visible.
    LoadingMore,
    /// Items are available for display.
    Result,
    /// Nothing displayable: a failure or an empty result set.
    Error,
}

/// The small discrete summary driving presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub phase: DisplayPhase,
    pub error: ErrorKind,
    pub was_refreshed: bool,
}

impl DisplayState {
    pub fn not_started() -> Self {
        Self {
            phase: DisplayPhase::NotStarted,
            error: ErrorKind::None,
            was_refreshed: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            phase: DisplayPhase::Loading,
            error: ErrorKind::None,
            was_refreshed: false,
        }
    }

    pub fn loading_more() -> Self {
        Self {
            phase: DisplayPhase::LoadingMore,
            error: ErrorKind::None,
            was_refreshed: false,
        }
    }

    pub fn result(was_refreshed: bool) -> Self {
        Self {
            phase: DisplayPhase::Result,
            error: ErrorKind::None,
            was_refreshed,
        }
    }

    /// Items stay on screen while a failure gets a transient affordance.
    pub fn result_with_error(error: ErrorKind, was_refreshed: bool) -> Self {
        Self {
            phase: DisplayPhase::Result,
            error,
            was_refreshed,
        }
    }

    pub fn error(error: ErrorKind) -> Self {
        Self {
            phase: DisplayPhase::Error,
            error,
            was_refreshed: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.phase == DisplayPhase::Error
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            DisplayPhase::NotStarted => "not started",
            DisplayPhase::Loading => "loading",
            DisplayPhase::LoadingMore => "loading more",
            DisplayPhase::Result => "result",
            DisplayPhase::Error => "error",
        };
        let refreshed = if self.was_refreshed {
            "refreshed"
        } else {
            "not refreshed"
        };
        write!(f, "DisplayState({phase}, {}, {refreshed})", self.error)
    }
}

/// Maps pagination progress to a display state. Pure and side-effect free.
///
/// Tie-breaks: stale-but-displayable data wins over surfacing a failure as a
/// full-screen error, and a pending load with data on screen stays on
/// `Result` rather than blanking the list.
///
/// # Panics
///
/// Panics on a snapshot that claims a load has started but tracks no load —
/// that combination is a programming error and must not be silently
/// defaulted.
pub fn resolve(snapshot: &PaginatorSnapshot) -> DisplayState {
    if !snapshot.has_started {
        return DisplayState::not_started();
    }

    let status = match snapshot.task_status {
        Some(status) => status,
        None => panic!("paginator reports a started load but tracks no observer"),
    };

    match status {
        TaskStatus::Succeeded => {
            if snapshot.loaded_count == 0 {
                DisplayState::error(ErrorKind::NoResults)
            } else {
                DisplayState::result(snapshot.has_refreshed)
            }
        }
        TaskStatus::Faulted => {
            let kind = snapshot.error_kind.unwrap_or(ErrorKind::Unhandled);
            if snapshot.loaded_count == 0 {
                DisplayState::error(kind)
            } else {
                DisplayState::result_with_error(kind, snapshot.has_refreshed)
            }
        }
        // A canceled load mutated nothing; keep whatever was on screen, or
        // fall back to an error display when there was nothing yet.
        TaskStatus::Canceled => {
            if snapshot.loaded_count == 0 {
                DisplayState::error(ErrorKind::Unhandled)
            } else {
                DisplayState::result(false)
            }
        }
        TaskStatus::Pending => {
            if snapshot.loaded_count > 0 {
                DisplayState::result(false)
            } else {
                DisplayState::loading()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(
        task_status: Option<TaskStatus>,
        error_kind: Option<ErrorKind>,
        loaded_count: usize,
        has_refreshed: bool,
    ) -> PaginatorSnapshot {
        PaginatorSnapshot {
            has_started: task_status.is_some(),
            task_status,
            error_kind,
            loaded_count,
            has_refreshed,
        }
    }

    #[test]
    fn never_started_resolves_to_not_started() {
        let state = resolve(&snapshot(None, None, 0, false));
        assert_eq!(state, DisplayState::not_started());
    }

    #[test]
    fn success_with_items_resolves_to_result() {
        let state = resolve(&snapshot(Some(TaskStatus::Succeeded), None, 50, false));
        assert_eq!(state, DisplayState::result(false));

        let refreshed = resolve(&snapshot(Some(TaskStatus::Succeeded), None, 50, true));
        assert!(refreshed.was_refreshed);
    }

    #[test]
    fn success_with_nothing_loaded_is_a_no_results_error() {
        let state = resolve(&snapshot(Some(TaskStatus::Succeeded), None, 0, false));
        assert_eq!(state, DisplayState::error(ErrorKind::NoResults));
    }

    #[test]
    fn fault_with_no_data_escalates_to_full_error() {
        let state = resolve(&snapshot(
            Some(TaskStatus::Faulted),
            Some(ErrorKind::Communication),
            0,
            false,
        ));
        assert_eq!(state, DisplayState::error(ErrorKind::Communication));
    }

    #[test]
    fn fault_with_data_stays_on_result() {
        let state = resolve(&snapshot(
            Some(TaskStatus::Faulted),
            Some(ErrorKind::Unhandled),
            100,
            false,
        ));
        assert_eq!(
            state,
            DisplayState::result_with_error(ErrorKind::Unhandled, false)
        );
    }

    #[test]
    fn pending_load_shows_loading_only_before_any_data() {
        let first = resolve(&snapshot(Some(TaskStatus::Pending), None, 0, false));
        assert_eq!(first, DisplayState::loading());

        let more = resolve(&snapshot(Some(TaskStatus::Pending), None, 50, false));
        assert_eq!(more, DisplayState::result(false));
    }

    #[test]
    fn canceled_load_keeps_displayable_data() {
        let with_data = resolve(&snapshot(Some(TaskStatus::Canceled), None, 50, false));
        assert_eq!(with_data, DisplayState::result(false));

        let without = resolve(&snapshot(Some(TaskStatus::Canceled), None, 0, false));
        assert_eq!(without, DisplayState::error(ErrorKind::Unhandled));
    }

    #[test]
    #[should_panic(expected = "tracks no observer")]
    fn started_without_a_tracked_load_is_a_programming_error() {
        let broken = PaginatorSnapshot {
            has_started: true,
            task_status: None,
            error_kind: None,
            loaded_count: 0,
            has_refreshed: false,
        };
        resolve(&broken);
    }

    #[test]
    fn display_states_format_for_humans() {
        assert_eq!(
            DisplayState::result_with_error(ErrorKind::Communication, true).to_string(),
            "DisplayState(result, communication, refreshed)"
        );
        assert_eq!(
            DisplayState::loading_more().to_string(),
            "DisplayState(loading more, none, not refreshed)"
        );
    }
}
