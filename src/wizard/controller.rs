//! Wizard controller: current step, completion tracking and navigation

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::WizardError;
use super::steps::{insurance_demo_steps, StepDefinition, StepId};

/// Snapshot of where a session is in the flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    /// Always one of the configured step ids
    pub current_step_id: StepId,
    /// Only grows, except on reset
    pub completed_step_ids: BTreeSet<StepId>,
}

impl WizardState {
    fn starting_at(first: StepId) -> Self {
        Self {
            current_step_id: first,
            completed_step_ids: BTreeSet::new(),
        }
    }

    pub fn is_step_completed(&self, step_id: StepId) -> bool {
        self.completed_step_ids.contains(&step_id)
    }
}

/// What an accepted operation did, delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    /// A step was marked complete. `newly_completed` is false on repeats.
    Completed {
        step_id: StepId,
        newly_completed: bool,
    },
    /// The current step was set. `from == to` when the move was a no-op.
    Navigated { from: StepId, to: StepId },
    /// Progress was cleared and the flow restarted
    Reset,
}

/// Handle returned by [`WizardController::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&WizardEvent, &WizardState) + Send + Sync>;

/// Owns the step sequence and one session's [`WizardState`].
///
/// Create one controller per session. Operations that take a step id reject
/// ids outside the sequence with [`WizardError::InvalidStepReference`] and
/// leave the state untouched; queries treat unknown ids as not completed.
pub struct WizardController {
    steps: Vec<StepDefinition>,
    state: WizardState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl WizardController {
    /// Build a controller over `steps`, starting at the first one.
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, WizardError> {
        let first = steps.first().ok_or(WizardError::EmptySequence)?.id;

        let mut seen = BTreeSet::new();
        let mut previous: StepId = 0;
        for step in &steps {
            if step.id == 0 {
                return Err(WizardError::ZeroStepId);
            }
            if !seen.insert(step.id) {
                return Err(WizardError::DuplicateStepId(step.id));
            }
            if step.id < previous {
                return Err(WizardError::StepOutOfOrder(step.id));
            }
            previous = step.id;
        }

        Ok(Self::assemble(steps, first))
    }

    /// Controller over the built-in ten-step insurance flow
    pub fn insurance_demo() -> Self {
        let steps = insurance_demo_steps();
        let first = steps.first().map_or(1, |s| s.id);
        Self::assemble(steps, first)
    }

    fn assemble(steps: Vec<StepDefinition>, first: StepId) -> Self {
        Self {
            steps,
            state: WizardState::starting_at(first),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // ─── Operations ─────────────────────────────────────────────────────────

    /// Mark a step as finished. Completing it again changes nothing.
    pub fn complete_step(&mut self, step_id: StepId) -> Result<(), WizardError> {
        self.ensure_known(step_id)?;

        let newly_completed = self.state.completed_step_ids.insert(step_id);
        tracing::debug!(step_id, newly_completed, "Wizard step completed");

        self.notify(&WizardEvent::Completed {
            step_id,
            newly_completed,
        });
        Ok(())
    }

    /// Advance to the next step. Returns false at the final step, where this
    /// is a no-op.
    pub fn next_step(&mut self) -> bool {
        let from = self.state.current_step_id;
        let to = self
            .position(from)
            .and_then(|i| self.steps.get(i + 1))
            .map_or(from, |s| s.id);
        self.move_to(from, to)
    }

    /// Go back one step. Returns false at the first step.
    pub fn previous_step(&mut self) -> bool {
        let from = self.state.current_step_id;
        let to = self
            .position(from)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.steps.get(i))
            .map_or(from, |s| s.id);
        self.move_to(from, to)
    }

    /// Jump to any step, ahead or behind, whether or not earlier steps are
    /// completed.
    pub fn go_to_step(&mut self, step_id: StepId) -> Result<(), WizardError> {
        self.ensure_known(step_id)?;
        self.move_to(self.state.current_step_id, step_id);
        Ok(())
    }

    /// Back to the first step with nothing completed
    pub fn reset(&mut self) {
        let first = self.first_step().id;
        self.state = WizardState::starting_at(first);
        tracing::debug!(first, "Wizard reset");
        self.notify(&WizardEvent::Reset);
    }

    fn move_to(&mut self, from: StepId, to: StepId) -> bool {
        self.state.current_step_id = to;
        if from != to {
            tracing::debug!(from, to, "Wizard moved");
        }
        self.notify(&WizardEvent::Navigated { from, to });
        from != to
    }

    fn ensure_known(&self, step_id: StepId) -> Result<(), WizardError> {
        if self.position(step_id).is_some() {
            Ok(())
        } else {
            tracing::warn!(step_id, "Rejected reference to unknown wizard step");
            Err(WizardError::InvalidStepReference(step_id))
        }
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn is_step_completed(&self, step_id: StepId) -> bool {
        self.state.is_step_completed(step_id)
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step(&self, step_id: StepId) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn current_step_id(&self) -> StepId {
        self.state.current_step_id
    }

    pub fn current_step(&self) -> &StepDefinition {
        &self.steps[self.current_index()]
    }

    pub fn completed_step_ids(&self) -> &BTreeSet<StepId> {
        &self.state.completed_step_ids
    }

    pub fn is_first_step(&self) -> bool {
        self.current_index() == 0
    }

    pub fn is_final_step(&self) -> bool {
        self.current_index() + 1 == self.steps.len()
    }

    /// True once every configured step has been completed
    pub fn is_complete(&self) -> bool {
        self.steps
            .iter()
            .all(|s| self.state.completed_step_ids.contains(&s.id))
    }

    /// (zero-based index of the current step, total steps)
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index(), self.steps.len())
    }

    /// Format step progress for display, e.g. "Patient > [Order Entry] > Analysis"
    pub fn format_progress(&self) -> String {
        let current = self.current_index();
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                if i == current {
                    format!("[{}]", step.name)
                } else {
                    step.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }

    fn first_step(&self) -> &StepDefinition {
        &self.steps[0]
    }

    fn position(&self, step_id: StepId) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    fn current_index(&self) -> usize {
        self.position(self.state.current_step_id).unwrap_or(0)
    }

    // ─── Subscriptions ──────────────────────────────────────────────────────

    /// Register a callback run after every accepted operation
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&WizardEvent, &WizardState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn notify(&self, event: &WizardEvent) {
        for (_, listener) in &self.listeners {
            listener(event, &self.state);
        }
    }
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("steps", &self.steps)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
