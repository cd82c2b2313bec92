//! Panel view state machine.
//!
//! Two screens, the thread list and one open conversation, plus whether the
//! floating panel is shown at all. Transitions are pure: the caller applies
//! the returned effects.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", content = "other_id", rename_all = "snake_case")]
pub enum View {
    List,
    Conversation(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub open: bool,
    pub view: View,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            open: false,
            view: View::List,
        }
    }
}

impl ViewState {
    pub fn active_thread(&self) -> Option<u64> {
        match self.view {
            View::Conversation(id) => Some(id),
            View::List => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Launcher pressed without a counterpart.
    Show,
    Hide,
    Open { other_id: u64, name: Option<String> },
    Back,
    /// A rebuild finished; `active_present` says whether the open thread survived it.
    Rebuilt { active_present: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    EnsureStub { other_id: u64, name: Option<String> },
    MarkRead { other_id: u64 },
    Refetch,
}

pub fn transition(state: ViewState, event: ViewEvent) -> (ViewState, Vec<Effect>) {
    match event {
        ViewEvent::Show => (
            ViewState {
                open: true,
                view: View::List,
            },
            Vec::new(),
        ),
        ViewEvent::Hide => (ViewState { open: false, ..state }, Vec::new()),
        ViewEvent::Open { other_id, name } => (
            ViewState {
                open: true,
                view: View::Conversation(other_id),
            },
            vec![
                Effect::EnsureStub { other_id, name },
                Effect::MarkRead { other_id },
                Effect::Refetch,
            ],
        ),
        ViewEvent::Back => (
            ViewState {
                view: View::List,
                ..state
            },
            Vec::new(),
        ),
        ViewEvent::Rebuilt { active_present } => match state.view {
            View::Conversation(_) if !active_present => (
                ViewState {
                    view: View::List,
                    ..state
                },
                Vec::new(),
            ),
            _ => (state, Vec::new()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(id: u64) -> ViewState {
        ViewState {
            open: true,
            view: View::Conversation(id),
        }
    }

    #[test]
    fn test_show_opens_to_list() {
        let (state, effects) = transition(conversation(7), ViewEvent::Show);
        assert_eq!(state, ViewState { open: true, view: View::List });
        assert!(effects.is_empty());
    }

    #[test]
    fn test_open_marks_read_and_refetches() {
        let (state, effects) = transition(
            ViewState::default(),
            ViewEvent::Open {
                other_id: 7,
                name: Some("Maya".to_string()),
            },
        );
        assert_eq!(state, conversation(7));
        assert_eq!(
            effects,
            vec![
                Effect::EnsureStub {
                    other_id: 7,
                    name: Some("Maya".to_string())
                },
                Effect::MarkRead { other_id: 7 },
                Effect::Refetch,
            ]
        );
    }

    #[test]
    fn test_hide_keeps_screen() {
        let (state, effects) = transition(conversation(7), ViewEvent::Hide);
        assert!(!state.open);
        assert_eq!(state.active_thread(), Some(7));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_back_returns_to_list() {
        let (state, _) = transition(conversation(7), ViewEvent::Back);
        assert_eq!(state.view, View::List);
        assert!(state.open);
    }

    #[test]
    fn test_vanished_thread_forces_list() {
        let (state, _) = transition(conversation(7), ViewEvent::Rebuilt { active_present: false });
        assert_eq!(state.view, View::List);

        let (state, _) = transition(conversation(7), ViewEvent::Rebuilt { active_present: true });
        assert_eq!(state.view, View::Conversation(7));
    }
}
