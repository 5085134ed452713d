//! # Delete Confirmation Gate
//!
//! Deletes are never immediate. Arming the gate starts a countdown and the
//! delete can only be confirmed once it reaches zero; cancelling at any point
//! leaves the collections untouched.
//!
//! The gate itself holds no timer. Something outside calls [`DeleteGate::tick`]
//! once a second (the session runs a small tokio task for it), which keeps the
//! state machine synchronous and trivially testable.

use crate::shared::{CatalogItem, Message, RecordId};

/// Record a pending delete points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Item(CatalogItem),
    Message(Message),
}

impl DeleteTarget {
    pub fn id(&self) -> RecordId {
        match self {
            DeleteTarget::Item(item) => item.id,
            DeleteTarget::Message(message) => message.id,
        }
    }

    /// Name shown in the confirmation prompt
    pub fn label(&self) -> &str {
        match self {
            DeleteTarget::Item(item) => &item.nom,
            DeleteTarget::Message(message) => &message.nom,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Closed,
    Armed {
        target: DeleteTarget,
        seconds_remaining: u32,
    },
}

#[derive(Debug, Clone)]
pub struct DeleteGate {
    countdown: u32,
    state: GateState,
}

impl Default for DeleteGate {
    fn default() -> Self {
        Self::new(crate::shared::config::DEFAULT_DELETE_COUNTDOWN)
    }
}

impl DeleteGate {
    /// Gate with a countdown of `countdown` ticks, at least one
    pub fn new(countdown: u32) -> Self {
        Self {
            countdown: countdown.max(1),
            state: GateState::Closed,
        }
    }

    /// Start or restart the countdown for `target`
    pub fn arm(&mut self, target: DeleteTarget) {
        tracing::debug!("Delete of {} armed", target.label());
        self.state = GateState::Armed {
            target,
            seconds_remaining: self.countdown,
        };
    }

    /// Advance the countdown by one second
    ///
    /// Returns the seconds left, `None` when closed.
    pub fn tick(&mut self) -> Option<u32> {
        match &mut self.state {
            GateState::Closed => None,
            GateState::Armed {
                seconds_remaining, ..
            } => {
                *seconds_remaining = seconds_remaining.saturating_sub(1);
                Some(*seconds_remaining)
            }
        }
    }

    pub fn can_confirm(&self) -> bool {
        matches!(
            self.state,
            GateState::Armed {
                seconds_remaining: 0,
                ..
            }
        )
    }

    pub fn cancel(&mut self) {
        if self.is_armed() {
            tracing::debug!("Delete cancelled");
        }
        self.state = GateState::Closed;
    }

    /// Take the target and close, only once the countdown has run out
    pub fn confirm(&mut self) -> Option<DeleteTarget> {
        if !self.can_confirm() {
            return None;
        }
        match std::mem::take(&mut self.state) {
            GateState::Armed { target, .. } => Some(target),
            GateState::Closed => None,
        }
    }

    /// Elapsed fraction of the countdown, 0.0 when closed
    pub fn progress(&self) -> f32 {
        match &self.state {
            GateState::Closed => 0.0,
            GateState::Armed {
                seconds_remaining, ..
            } => (self.countdown - seconds_remaining) as f32 / self.countdown as f32,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, GateState::Armed { .. })
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }
}
