// src/session.rs
//! In-progress workout tracking.
//!
//! Every state change is written to the current-session slot before the call
//! returns, so a workout survives the process being killed mid-session.
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::model::{is_numeric_text, DayOfWeek, Exercise, SetUpdate, WorkoutSession};
use crate::plan::TrainingPlan;
use crate::storage::Storage;
use crate::store::KvStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No current session.
    Idle,
    Active,
    /// Archived into history and removed from the current slot.
    Finished,
    /// Removed from the current slot without a history entry.
    Cancelled,
}

pub struct SessionEngine<'s, S: KvStore> {
    storage: &'s Storage<S>,
    clock: &'s dyn Clock,
    state: SessionState,
    // Some exactly while `state` is Active
    session: Option<WorkoutSession>,
}

impl<'s, S: KvStore> SessionEngine<'s, S> {
    pub fn new(storage: &'s Storage<S>, clock: &'s dyn Clock) -> Self {
        Self {
            storage,
            clock,
            state: SessionState::Idle,
            session: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Option<&WorkoutSession> {
        self.session.as_ref()
    }

    fn session_mut(&mut self) -> Option<&mut WorkoutSession> {
        self.session.as_mut()
    }

    fn activate(&mut self, session: WorkoutSession) -> &WorkoutSession {
        self.state = SessionState::Active;
        self.session.insert(session)
    }

    fn persist(&self) {
        if let Some(session) = self.session() {
            self.storage.save_current_session(session);
        }
    }

    /// Restores today's stored session for `workout_name`, or starts a fresh one.
    /// A stored session from another day or another workout is replaced.
    pub fn load_or_create(&mut self, workout_name: &str, exercises: &[Exercise]) -> &WorkoutSession {
        let today = self.clock.today();
        let restored = self
            .storage
            .get_current_session()
            .filter(|s| s.date == today && s.workout_name == workout_name);

        let session = match restored {
            Some(session) => {
                debug!(workout = workout_name, "Restored in-progress session");
                session
            }
            None => {
                info!(workout = workout_name, exercises = exercises.len(), "Starting new session");
                let session = WorkoutSession::new(workout_name, exercises, self.clock.now());
                self.storage.save_current_session(&session);
                session
            }
        };
        self.activate(session)
    }

    /// Starts (or restores) the workout planned for `day`. Rest days have nothing to start.
    pub fn start_for_day(&mut self, plan: &TrainingPlan, day: DayOfWeek) -> Option<&WorkoutSession> {
        let workout = plan.day(day);
        if workout.is_rest() {
            debug!(%day, "Rest day, no session started");
            return None;
        }
        Some(self.load_or_create(&workout.name, &workout.exercises))
    }

    /// Restores whatever session is stored for today without creating one.
    /// A session left over from an earlier day is discarded.
    pub fn resume(&mut self) -> Option<&WorkoutSession> {
        let stored = self.storage.get_current_session()?;
        if stored.date != self.clock.today() {
            info!(date = %stored.date, workout = %stored.workout_name, "Discarding stale session");
            self.storage.clear_current_session();
            return None;
        }
        Some(self.activate(stored))
    }

    /// Merges `update` into one set and persists the session.
    /// Returns `false` when nothing was applied.
    pub fn update_set(&mut self, exercise_index: usize, set_index: usize, update: SetUpdate) -> bool {
        let Some(session) = self.session_mut() else {
            debug!("update_set without an active session ignored");
            return false;
        };
        let Some(set) = session
            .exercises
            .get_mut(exercise_index)
            .and_then(|ex| ex.sets.get_mut(set_index))
        else {
            warn!(exercise_index, set_index, "No such set in current session");
            return false;
        };

        let mut applied = false;
        if let Some(weight) = update.weight {
            let weight = weight.trim();
            if is_numeric_text(weight) {
                set.weight = weight.to_string();
                applied = true;
            } else {
                warn!(weight, "Rejected non-numeric weight");
            }
        }
        if let Some(reps) = update.reps {
            let reps = reps.trim();
            if is_numeric_text(reps) {
                set.reps = reps.to_string();
                applied = true;
            } else {
                warn!(reps, "Rejected non-numeric reps");
            }
        }
        if let Some(completed) = update.completed {
            set.completed = completed;
            applied = true;
        }

        if applied {
            self.persist();
        }
        applied
    }

    /// Marks a set done. Empty weight/reps are not checked here.
    pub fn complete_set(&mut self, exercise_index: usize, set_index: usize) -> bool {
        self.update_set(exercise_index, set_index, SetUpdate::completed())
    }

    /// Moves to `index`, clamped to the exercise list. Returns `true` if the position changed.
    pub fn set_current_exercise(&mut self, index: usize) -> bool {
        let Some(session) = self.session_mut() else {
            return false;
        };
        let Some(last) = session.exercises.len().checked_sub(1) else {
            return false;
        };
        let index = index.min(last);
        if index == session.current_exercise_index {
            return false;
        }
        session.current_exercise_index = index;
        self.persist();
        true
    }

    pub fn next_exercise(&mut self) -> bool {
        let Some(current) = self.session().map(|s| s.current_exercise_index) else {
            return false;
        };
        self.set_current_exercise(current + 1)
    }

    pub fn previous_exercise(&mut self) -> bool {
        match self.session().map(|s| s.current_exercise_index) {
            Some(current) if current > 0 => self.set_current_exercise(current - 1),
            _ => false,
        }
    }

    /// Stamps the end time, archives the session into history and clears the
    /// current slot. Returns the archived session.
    ///
    /// If history cannot be updated nothing changes: the session stays active
    /// and in the current slot, and `None` is returned.
    pub fn finish(&mut self) -> Option<WorkoutSession> {
        let mut archived = self.session.clone()?;
        archived.end_time = Some(self.clock.now());
        if !self.storage.save_workout_session(&archived) {
            error!(workout = %archived.workout_name, "Workout could not be archived, session kept");
            return None;
        }
        self.storage.clear_current_session();
        self.session = None;
        self.state = SessionState::Finished;
        info!(workout = %archived.workout_name, date = %archived.date, "Workout finished");
        Some(archived)
    }

    /// Drops the current session without archiving it.
    pub fn cancel(&mut self) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        self.storage.clear_current_session();
        info!("Workout cancelled");
        self.state = SessionState::Cancelled;
        true
    }
}
