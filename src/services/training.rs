//! Runs a [`WorkoutSession`] on a real one-second ticker and links it to a
//! workout plan on the server.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::clients::gym::GymClient;
use crate::clients::models::requests::CreateWorkoutPlan;
use crate::error::Result;
use crate::services::workout_session::{SessionState, Tick, WorkoutSession};

/// Registers workout plans with the backend.
#[async_trait]
pub trait PlanRegistry: Send + Sync {
    async fn create_plan(&self, plan: &CreateWorkoutPlan) -> Result<u64>;
}

#[async_trait]
impl PlanRegistry for GymClient {
    async fn create_plan(&self, plan: &CreateWorkoutPlan) -> Result<u64> {
        self.create_workout_plan(plan).await
    }
}

/// Receives the plan id once a session completes.
pub trait Navigator: Send + Sync {
    fn go_to_result(&self, workout_plan_id: u64);
}

impl<F> Navigator for F
where
    F: Fn(u64) + Send + Sync,
{
    fn go_to_result(&self, workout_plan_id: u64) {
        self(workout_plan_id)
    }
}

// The epoch changes whenever a ticker is spawned or cancelled. A ticker that
// already woke up when it was aborted sees a stale epoch and stops.
struct Shared {
    workout: WorkoutSession,
    ticker_epoch: u64,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

enum Step {
    Continue,
    Stop,
    HandOff(Result<u64>),
}

fn tick_once(shared: &Mutex<Shared>, epoch: u64) -> Step {
    let mut current = lock(shared);
    if current.ticker_epoch != epoch {
        tracing::trace!(epoch, "workout.stale_tick");
        return Step::Stop;
    }
    match current.workout.tick() {
        Tick::Ignored => Step::Stop,
        Tick::Counted { remaining } => {
            tracing::trace!(remaining, "workout.tick");
            Step::Continue
        }
        Tick::Finished => Step::HandOff(current.workout.complete()),
    }
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Owns the session, its ticker task and the collaborators it reports to.
pub struct TrainingSession {
    shared: Arc<Mutex<Shared>>,
    registry: Arc<dyn PlanRegistry>,
    navigator: Arc<dyn Navigator>,
    user_id: u64,
    tick_period: Duration,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl TrainingSession {
    pub fn new(
        session: WorkoutSession,
        registry: Arc<dyn PlanRegistry>,
        navigator: Arc<dyn Navigator>,
        user_id: u64,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                workout: session,
                ticker_epoch: 0,
            })),
            registry,
            navigator,
            user_id,
            tick_period: Duration::from_secs(1),
            ticker: Mutex::new(None),
        }
    }

    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    pub fn snapshot(&self) -> WorkoutSession {
        lock(&self.shared).workout.clone()
    }

    pub fn state(&self) -> SessionState {
        lock(&self.shared).workout.state()
    }

    pub fn remaining_seconds(&self) -> u32 {
        lock(&self.shared).workout.remaining_seconds()
    }

    pub fn workout_plan_id(&self) -> Option<u64> {
        lock(&self.shared).workout.workout_plan_id()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.shared).workout.error().map(str::to_string)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker_slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn ticker_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts the countdown, then registers the plan.
    ///
    /// A failed registration is recorded in `error` but does not stop the
    /// timer; the session simply has no plan to hand off at the end.
    pub async fn start(&self) -> Result<()> {
        let plan = {
            let mut shared = lock(&self.shared);
            shared.workout.start()?;
            shared.workout.plan_request(self.user_id, today())
        };
        self.spawn_ticker();

        tracing::info!(
            exercise_id = plan.exercise_id,
            duration = plan.duration,
            "workout.started"
        );

        match self.registry.create_plan(&plan).await {
            Ok(id) => {
                lock(&self.shared).workout.link_plan(id);
                tracing::info!(workout_plan_id = id, "workout.plan_created");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    exercise_id = plan.exercise_id,
                    "workout.plan_create_failed"
                );
                lock(&self.shared).workout.record_error(format!("failed to add workout plan: {}", e));
            }
        }
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        lock(&self.shared).workout.pause()?;
        self.cancel_ticker();
        tracing::debug!(remaining = self.remaining_seconds(), "workout.paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<()> {
        lock(&self.shared).workout.resume()?;
        self.spawn_ticker();
        tracing::debug!(remaining = self.remaining_seconds(), "workout.resumed");
        Ok(())
    }

    /// Stops the ticker for good. Called on drop as well.
    pub fn teardown(&self) {
        self.cancel_ticker();
    }

    fn cancel_ticker(&self) {
        lock(&self.shared).ticker_epoch += 1;
        if let Some(handle) = self.ticker_slot().take() {
            handle.abort();
        }
    }

    fn spawn_ticker(&self) {
        let mut slot = self.ticker_slot();
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let epoch = {
            let mut shared = lock(&self.shared);
            shared.ticker_epoch += 1;
            shared.ticker_epoch
        };
        let shared = Arc::clone(&self.shared);
        let navigator = Arc::clone(&self.navigator);
        let period = self.tick_period;

        *slot = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                match tick_once(&shared, epoch) {
                    Step::Continue => continue,
                    Step::Stop => return,
                    Step::HandOff(Ok(workout_plan_id)) => {
                        tracing::info!(workout_plan_id, "workout.completed");
                        navigator.go_to_result(workout_plan_id);
                        return;
                    }
                    Step::HandOff(Err(e)) => {
                        tracing::error!(error = %e, "workout.hand_off_failed");
                        return;
                    }
                }
            }
        }));
    }
}

impl Drop for TrainingSession {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GymError;

    struct NoPlans;

    #[async_trait]
    impl PlanRegistry for NoPlans {
        async fn create_plan(&self, _plan: &CreateWorkoutPlan) -> Result<u64> {
            Err(GymError::Rejected { code: 1 })
        }
    }

    fn training() -> TrainingSession {
        TrainingSession::new(
            WorkoutSession::new(1, 1),
            Arc::new(NoPlans),
            Arc::new(|_: u64| {}),
            1,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_woken_before_pause_cannot_count() {
        let training = training();
        training.start().await.unwrap();
        let first_epoch = lock(&training.shared).ticker_epoch;

        // pause and resume land while the old ticker is between wake-up and lock
        training.pause().unwrap();
        training.resume().unwrap();
        assert!(lock(&training.shared).ticker_epoch > first_epoch);

        assert!(matches!(tick_once(&training.shared, first_epoch), Step::Stop));
        assert_eq!(training.remaining_seconds(), 60);

        let current = lock(&training.shared).ticker_epoch;
        assert!(matches!(tick_once(&training.shared, current), Step::Continue));
        assert_eq!(training.remaining_seconds(), 59);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_resume_keeps_the_epoch() {
        let training = training();
        training.start().await.unwrap();
        let epoch = lock(&training.shared).ticker_epoch;

        training.resume().unwrap();
        assert_eq!(lock(&training.shared).ticker_epoch, epoch);
        assert!(training.is_ticking());
    }
}
