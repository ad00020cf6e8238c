//! Lazy, single-flight acquisition of the provider's raw broker.
//!
//! State machine per client:
//!
//! ```text
//! Unactivated -> Activating -> Activated          (terminal)
//!                           -> ActivationFailed   (re-enterable)
//! ```
//!
//! Every request arriving while an activation is in flight awaits that same
//! attempt, so the host sees exactly one activation call per attempt.

use futures::future::{BoxFuture, FutureExt, Shared};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::host::{Activation, HostActivator, HostFault, RawBroker};
use crate::{Error, ErrorContext, Result};

/// Where a client is in acquiring the provider's broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionState {
    Unactivated,
    Activating,
    Activated,
    ActivationFailed,
}

/// Point-in-time view of a client's acquisition (facts only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionSnapshot {
    pub provider_id: String,
    pub state: AcquisitionState,
    /// Activation attempts started so far, successful or not.
    pub activation_attempts: u64,
}

type AttemptOutcome = std::result::Result<Activation, HostFault>;
type Attempt = Shared<BoxFuture<'static, AttemptOutcome>>;

struct InFlight {
    generation: u64,
    attempt: Attempt,
}

enum Step {
    Ready(Arc<dyn RawBroker>),
    Wait(u64, Attempt),
}

#[derive(Default)]
struct State {
    in_flight: Option<InFlight>,
    attempts: u64,
    last_failed: bool,
}

pub(crate) struct Acquisition {
    provider_id: String,
    activator: Arc<dyn HostActivator>,
    broker: OnceCell<Arc<dyn RawBroker>>,
    state: Mutex<State>,
}

impl Acquisition {
    pub(crate) fn new(provider_id: String, activator: Arc<dyn HostActivator>) -> Self {
        Self {
            provider_id,
            activator,
            broker: OnceCell::new(),
            state: Mutex::new(State::default()),
        }
    }

    /// The broker, activating the provider first if needed.
    ///
    /// `Ok(None)` means the provider is absent or failed to activate; a later
    /// call starts a new attempt. Host faults are returned as `Error::Host`.
    pub(crate) async fn acquire(&self) -> Result<Option<Arc<dyn RawBroker>>> {
        if let Some(broker) = self.broker.get() {
            return Ok(Some(Arc::clone(broker)));
        }

        let (generation, attempt) = match self.join_or_start()? {
            Step::Ready(broker) => return Ok(Some(broker)),
            Step::Wait(generation, attempt) => (generation, attempt),
        };
        let outcome = attempt.await;
        self.settle(generation, &outcome)?;

        match outcome {
            Ok(Activation::Activated(broker)) => {
                Ok(Some(Arc::clone(self.broker.get_or_init(|| broker))))
            }
            Ok(Activation::NotInstalled) | Ok(Activation::Failed { .. }) => Ok(None),
            Err(fault) => Err(Error::Host(fault)),
        }
    }

    pub(crate) fn snapshot(&self) -> AcquisitionSnapshot {
        let (in_flight, attempts, last_failed) = match self.state.lock() {
            Ok(st) => (st.in_flight.is_some(), st.attempts, st.last_failed),
            Err(_) => (false, 0, true),
        };
        let state = if self.broker.get().is_some() {
            AcquisitionState::Activated
        } else if in_flight {
            AcquisitionState::Activating
        } else if last_failed {
            AcquisitionState::ActivationFailed
        } else {
            AcquisitionState::Unactivated
        };
        AcquisitionSnapshot {
            provider_id: self.provider_id.clone(),
            state,
            activation_attempts: attempts,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            Error::runtime_with_context(
                "acquisition state poisoned",
                ErrorContext::new().with_source("broker_client"),
            )
        })
    }

    fn join_or_start(&self) -> Result<Step> {
        let mut st = self.lock()?;
        // An attempt may have settled since the unlocked check in `acquire`.
        if let Some(broker) = self.broker.get() {
            return Ok(Step::Ready(Arc::clone(broker)));
        }
        if let Some(in_flight) = &st.in_flight {
            debug!(
                provider_id = %self.provider_id,
                attempt = in_flight.generation,
                "joining in-flight provider activation"
            );
            return Ok(Step::Wait(in_flight.generation, in_flight.attempt.clone()));
        }

        st.attempts += 1;
        let generation = st.attempts;
        let activator = Arc::clone(&self.activator);
        let provider_id = self.provider_id.clone();
        info!(provider_id = %provider_id, attempt = generation, "activating capability provider");

        let attempt = async move { activator.activate(&provider_id).await }
            .boxed()
            .shared();
        st.in_flight = Some(InFlight {
            generation,
            attempt: attempt.clone(),
        });
        Ok(Step::Wait(generation, attempt))
    }

    /// Record the outcome of attempt `generation`. Only the first waiter to
    /// get here changes state; the rest find the slot already cleared.
    fn settle(&self, generation: u64, outcome: &AttemptOutcome) -> Result<()> {
        let mut st = self.lock()?;
        if st.in_flight.as_ref().map(|f| f.generation) != Some(generation) {
            return Ok(());
        }
        st.in_flight = None;

        match outcome {
            Ok(Activation::Activated(broker)) => {
                let _ = self.broker.set(Arc::clone(broker));
                st.last_failed = false;
                info!(provider_id = %self.provider_id, attempt = generation, "capability provider activated");
            }
            Ok(Activation::NotInstalled) => {
                st.last_failed = true;
                warn!(provider_id = %self.provider_id, attempt = generation, "capability provider is not installed");
            }
            Ok(Activation::Failed { reason }) => {
                st.last_failed = true;
                warn!(
                    provider_id = %self.provider_id,
                    attempt = generation,
                    reason = %reason,
                    "capability provider failed to activate"
                );
            }
            Err(fault) => {
                st.last_failed = true;
                warn!(
                    provider_id = %self.provider_id,
                    attempt = generation,
                    error = %fault,
                    "host fault while activating capability provider"
                );
            }
        }
        Ok(())
    }
}
