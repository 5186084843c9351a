//! Session registry and shared state for the REST server.
//!
//! Every demo session owns its own [`WizardController`]; nothing is shared
//! between sessions except the step configuration they were built from.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::Config;
use crate::products::Product;
use crate::wizard::{StepDefinition, WizardController, WizardError};

/// One demo visit
#[derive(Debug)]
pub struct WizardSession {
    pub id: Uuid,
    pub product: Product,
    pub controller: WizardController,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl WizardSession {
    fn new(
        product: Product,
        steps: Vec<StepDefinition>,
        now: DateTime<Utc>,
    ) -> Result<Self, WizardError> {
        let id = Uuid::new_v4();
        let mut controller = WizardController::new(steps)?;
        controller.subscribe(move |event, state| {
            tracing::debug!(
                session = %id,
                ?event,
                current = state.current_step_id,
                completed = state.completed_step_ids.len(),
                "Session wizard changed"
            );
        });

        Ok(Self {
            id,
            product,
            controller,
            created_at: now,
            last_active: now,
        })
    }
}

/// All live sessions, keyed by id
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, WizardSession>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
        }
    }

    /// Start a session over `steps`, dropping idle sessions first
    pub fn create(
        &mut self,
        product: Product,
        steps: Vec<StepDefinition>,
    ) -> Result<&WizardSession, WizardError> {
        self.prune_expired();

        let now = Utc::now();
        let session = WizardSession::new(product, steps, now)?;
        let id = session.id;
        tracing::info!(session = %id, %product, "Demo session created");
        Ok(self.sessions.entry(id).or_insert(session))
    }

    pub fn get(&self, id: &Uuid) -> Option<&WizardSession> {
        self.sessions.get(id)
    }

    /// Mutable access; marks the session active
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut WizardSession> {
        let session = self.sessions.get_mut(id)?;
        session.last_active = Utc::now();
        Some(session)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<WizardSession> {
        let removed = self.sessions.remove(id);
        if removed.is_some() {
            tracing::info!(session = %id, "Demo session ended");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions that are idle as of now
    pub fn prune_expired(&mut self) -> usize {
        let pruned = self.prune_idle(Utc::now());
        if pruned > 0 {
            tracing::info!(pruned, remaining = self.sessions.len(), "Dropped idle demo sessions");
        }
        pruned
    }

    /// Drop sessions idle for longer than the timeout. Returns how many went.
    pub fn prune_idle(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        let timeout = self.idle_timeout;
        self.sessions
            .retain(|_, session| now - session.last_active <= timeout);
        before - self.sessions.len()
    }
}

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    pub sessions: Arc<RwLock<SessionRegistry>>,
    pub config: Arc<Config>,
    /// Step sequence for the configured product
    pub steps: Arc<Vec<StepDefinition>>,
}

impl ApiState {
    /// Build API state, failing early if the configured steps are invalid
    pub fn new(config: Config) -> Result<Self> {
        let steps = config.wizard_steps()?;
        WizardController::new(steps.clone()).context("Invalid wizard step configuration")?;

        let idle_secs =
            i64::try_from(config.rest_api.session_idle_timeout_secs).unwrap_or(i64::MAX);
        let idle_timeout = Duration::try_seconds(idle_secs).unwrap_or(Duration::MAX);

        Ok(Self {
            sessions: Arc::new(RwLock::new(SessionRegistry::new(idle_timeout))),
            config: Arc::new(config),
            steps: Arc::new(steps),
        })
    }

    /// How often the background sweeper checks for idle sessions
    pub fn idle_sweep_interval(&self) -> std::time::Duration {
        let secs = (self.config.rest_api.session_idle_timeout_secs / 2).clamp(1, 60);
        std::time::Duration::from_secs(secs)
    }

    /// Periodically drop idle sessions so they expire without new traffic
    pub fn spawn_idle_sweeper(&self) -> JoinHandle<()> {
        let sessions = Arc::clone(&self.sessions);
        let period = self.idle_sweep_interval();
        tracing::debug!(?period, "Idle session sweeper started");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                sessions.write().await.prune_expired();
            }
        })
    }

    /// Steps a new session for `product` should run, if it has a demo
    pub fn steps_for(&self, product: Product) -> Option<Vec<StepDefinition>> {
        if product == self.config.wizard.product {
            Some(self.steps.as_ref().clone())
        } else {
            product.demo_steps()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::insurance_demo_steps;

    #[test]
    fn test_api_state_new() {
        let state = ApiState::new(Config::default()).unwrap();
        assert_eq!(state.steps.len(), 10);
        assert!(state.sessions.blocking_read().is_empty());
    }

    #[test]
    fn test_api_state_rejects_bad_steps() {
        let mut config = Config::default();
        config.wizard.steps = vec![StepDefinition::new(1, "A"), StepDefinition::new(1, "B")];
        assert!(ApiState::new(config).is_err());
    }

    #[test]
    fn test_api_state_rejects_out_of_order_steps() {
        let mut config = Config::default();
        config.wizard.steps = vec![StepDefinition::new(3, "A"), StepDefinition::new(1, "B")];
        assert!(config.wizard_steps().is_ok());
        assert!(ApiState::new(config).is_err());
    }

    #[test]
    fn test_steps_for_products() {
        let state = ApiState::new(Config::default()).unwrap();
        assert!(state.steps_for(Product::Insurance).is_some());
        assert!(state.steps_for(Product::Clinician).is_none());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut registry = SessionRegistry::new(Duration::minutes(30));
        let a = registry
            .create(Product::Insurance, insurance_demo_steps())
            .unwrap()
            .id;
        let b = registry
            .create(Product::Insurance, insurance_demo_steps())
            .unwrap()
            .id;

        let session = registry.get_mut(&a).unwrap();
        session.controller.complete_step(1).unwrap();
        session.controller.next_step();

        let other = registry.get(&b).unwrap();
        assert_eq!(other.controller.current_step_id(), 1);
        assert!(other.controller.completed_step_ids().is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_prune_idle() {
        let mut registry = SessionRegistry::new(Duration::minutes(30));
        let id = registry
            .create(Product::Insurance, insurance_demo_steps())
            .unwrap()
            .id;

        assert_eq!(registry.prune_idle(Utc::now()), 0);
        assert_eq!(registry.prune_idle(Utc::now() + Duration::hours(1)), 1);
        assert!(registry.get(&id).is_none());
    }

    #[test]
    fn test_prune_expired_drops_stale_sessions_only() {
        let mut registry = SessionRegistry::new(Duration::minutes(30));
        let stale = registry
            .create(Product::Insurance, insurance_demo_steps())
            .unwrap()
            .id;
        let fresh = registry
            .create(Product::Insurance, insurance_demo_steps())
            .unwrap()
            .id;
        registry.get_mut(&stale).unwrap().last_active = Utc::now() - Duration::hours(1);

        assert_eq!(registry.prune_expired(), 1);
        assert!(registry.get(&stale).is_none());
        assert!(registry.get(&fresh).is_some());
    }

    #[test]
    fn test_idle_sweep_interval_is_bounded() {
        let mut config = Config::default();
        config.rest_api.session_idle_timeout_secs = 1;
        assert_eq!(
            ApiState::new(config.clone()).unwrap().idle_sweep_interval(),
            std::time::Duration::from_secs(1)
        );

        config.rest_api.session_idle_timeout_secs = 1800;
        assert_eq!(
            ApiState::new(config).unwrap().idle_sweep_interval(),
            std::time::Duration::from_secs(60)
        );
    }

    #[tokio::test]
    async fn test_idle_sweeper_expires_sessions_without_new_traffic() {
        let mut config = Config::default();
        config.rest_api.session_idle_timeout_secs = 1;
        let state = ApiState::new(config).unwrap();
        let id = {
            let mut sessions = state.sessions.write().await;
            let id = sessions
                .create(Product::Insurance, insurance_demo_steps())
                .unwrap()
                .id;
            sessions.get_mut(&id).unwrap().last_active = Utc::now() - Duration::hours(1);
            id
        };

        let sweeper = state.spawn_idle_sweeper();
        // The first tick fires immediately
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        sweeper.abort();

        assert!(state.sessions.read().await.get(&id).is_none());
    }

    #[test]
    fn test_remove() {
        let mut registry = SessionRegistry::new(Duration::minutes(30));
        let id = registry
            .create(Product::Insurance, insurance_demo_steps())
            .unwrap()
            .id;

        assert!(registry.remove(&id).is_some());
        assert!(registry.remove(&id).is_none());
    }
}
