//! Status-line announcements for wizard changes.
//!
//! The announcer subscribes to a controller and turns each event into one
//! short sentence, which the view shows in its status line.

use std::sync::{Arc, Mutex};

use crate::wizard::{
    StepDefinition, StepId, SubscriptionId, WizardController, WizardEvent, WizardState,
};

#[derive(Debug, Clone, Default)]
pub struct Announcer {
    latest: Arc<Mutex<Option<String>>>,
}

impl Announcer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start announcing changes to `wizard`
    pub fn attach(&self, wizard: &mut WizardController) -> SubscriptionId {
        let steps = wizard.steps().to_vec();
        let latest = Arc::clone(&self.latest);
        wizard.subscribe(move |event, state| {
            let message = describe(&steps, event, state);
            if let Ok(mut slot) = latest.lock() {
                *slot = Some(message);
            }
        })
    }

    /// Replace the current announcement (used for rejected actions)
    pub fn announce(&self, message: impl Into<String>) {
        if let Ok(mut slot) = self.latest.lock() {
            *slot = Some(message.into());
        }
    }

    pub fn latest(&self) -> Option<String> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }
}

fn describe(steps: &[StepDefinition], event: &WizardEvent, state: &WizardState) -> String {
    let name_of = |id: StepId| {
        steps
            .iter()
            .find(|s| s.id == id)
            .map_or_else(|| format!("Step {}", id), |s| s.name.clone())
    };

    match *event {
        WizardEvent::Completed {
            step_id,
            newly_completed: true,
        } => format!(
            "{} marked complete ({} of {} done)",
            name_of(step_id),
            state.completed_step_ids.len(),
            steps.len()
        ),
        WizardEvent::Completed { step_id, .. } => {
            format!("{} was already complete", name_of(step_id))
        }
        WizardEvent::Navigated { from, to } => {
            let position = steps.iter().position(|s| s.id == to).map_or(0, |i| i + 1);
            let prefix = if from == to { "Still on step" } else { "Step" };
            format!("{} {} of {}: {}", prefix, position, steps.len(), name_of(to))
        }
        WizardEvent::Reset => "Demo restarted".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announces_navigation() {
        let mut wizard = WizardController::insurance_demo();
        let announcer = Announcer::new();
        announcer.attach(&mut wizard);

        wizard.go_to_step(3).unwrap();

        assert_eq!(
            announcer.latest().as_deref(),
            Some("Step 3 of 10: Pre-Submission Analysis")
        );
    }

    #[test]
    fn test_announces_completion_and_repeats() {
        let mut wizard = WizardController::insurance_demo();
        let announcer = Announcer::new();
        announcer.attach(&mut wizard);

        wizard.complete_step(2).unwrap();
        assert_eq!(
            announcer.latest().as_deref(),
            Some("Order Entry marked complete (1 of 10 done)")
        );

        wizard.complete_step(2).unwrap();
        assert_eq!(
            announcer.latest().as_deref(),
            Some("Order Entry was already complete")
        );
    }

    #[test]
    fn test_announces_noop_at_end() {
        let mut wizard = WizardController::insurance_demo();
        wizard.go_to_step(10).unwrap();
        let announcer = Announcer::new();
        announcer.attach(&mut wizard);

        wizard.next_step();

        assert_eq!(
            announcer.latest().as_deref(),
            Some("Still on step 10 of 10: Submit / Appeal")
        );
    }

    #[test]
    fn test_announces_reset() {
        let mut wizard = WizardController::insurance_demo();
        let announcer = Announcer::new();
        announcer.attach(&mut wizard);

        wizard.reset();
        assert_eq!(announcer.latest().as_deref(), Some("Demo restarted"));
    }

    #[test]
    fn test_manual_announcement() {
        let announcer = Announcer::new();
        assert!(announcer.latest().is_none());
        announcer.announce("step 42 is not part of this wizard");
        assert_eq!(
            announcer.latest().as_deref(),
            Some("step 42 is not part of this wizard")
        );
    }
}
