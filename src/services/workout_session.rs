//! Countdown for a single timed exercise. Something else calls `tick` once per second.

use crate::clients::models::requests::CreateWorkoutPlan;
use crate::clients::models::responses::Exercise;
use crate::error::{GymError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Completed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running, or already at zero.
    Ignored,
    Counted { remaining: u32 },
    /// This tick reached zero. Returned once per session.
    Finished,
}

#[derive(Debug, Clone)]
pub struct WorkoutSession {
    exercise_id: u64,
    duration_minutes: u32,
    remaining_seconds: u32,
    workout_plan_id: Option<u64>,
    state: SessionState,
    error: Option<String>,
    hand_off_attempted: bool,
}

impl WorkoutSession {
    pub fn new(exercise_id: u64, duration_minutes: u32) -> Self {
        let duration_minutes = duration_minutes.max(1);
        Self {
            exercise_id,
            duration_minutes,
            remaining_seconds: duration_minutes.saturating_mul(60),
            workout_plan_id: None,
            state: SessionState::Idle,
            error: None,
            hand_off_attempted: false,
        }
    }

    pub fn for_exercise(exercise: &Exercise) -> Self {
        Self::new(exercise.id, exercise.duration_minutes())
    }

    pub fn exercise_id(&self) -> u64 {
        self.exercise_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn workout_plan_id(&self) -> Option<u64> {
        self.workout_plan_id
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn invalid(&self, action: &'static str) -> GymError {
        GymError::InvalidTransition {
            from: self.state.as_str(),
            action,
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(self.invalid("start"));
        }
        self.remaining_seconds = self.duration_seconds();
        self.state = SessionState::Running;
        Ok(())
    }

    pub fn plan_request(&self, user_id: u64, date: impl Into<String>) -> CreateWorkoutPlan {
        CreateWorkoutPlan {
            user_id,
            exercise_id: self.exercise_id,
            date: date.into(),
            duration: self.duration_minutes,
        }
    }

    pub fn link_plan(&mut self, workout_plan_id: u64) {
        self.workout_plan_id = Some(workout_plan_id);
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Pausing twice is harmless.
    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            SessionState::Running | SessionState::Paused => {
                self.state = SessionState::Paused;
                Ok(())
            }
            _ => Err(self.invalid("pause")),
        }
    }

    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            SessionState::Paused | SessionState::Running => {
                self.state = SessionState::Running;
                Ok(())
            }
            _ => Err(self.invalid("resume")),
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.state != SessionState::Running || self.remaining_seconds == 0 {
            return Tick::Ignored;
        }
        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            Tick::Finished
        } else {
            Tick::Counted {
                remaining: self.remaining_seconds,
            }
        }
    }

    // Without a linked plan the session stays Running at zero; attempted once
    pub fn complete(&mut self) -> Result<u64> {
        if self.state != SessionState::Running
            || self.remaining_seconds != 0
            || self.hand_off_attempted
        {
            return Err(self.invalid("complete"));
        }
        self.hand_off_attempted = true;

        match self.workout_plan_id {
            Some(id) => {
                self.state = SessionState::Completed;
                Ok(id)
            }
            None => {
                let err = GymError::PlanLinkMissing;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
