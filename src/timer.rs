// src/timer.rs
//! Rest timer between sets, advanced by a once-per-second `tick`.
//!
//! Any path that stops or rewinds the timer cancels scheduled notifications so
//! a stale "rest over" alert cannot fire later.
use tracing::{debug, info};

pub const REST_COMPLETE_TITLE: &str = "Rest Timer Complete!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationHandle(pub String);

/// Local notification scheduler.
pub trait Notifier {
    fn schedule_one_shot(&self, delay_seconds: u32, title: &str, body: &str) -> Option<NotificationHandle>;
    fn cancel_all(&self);
}

/// Notifier that only writes to the log. Used when notifications are disabled
/// or there is no platform scheduler.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn schedule_one_shot(&self, delay_seconds: u32, title: &str, body: &str) -> Option<NotificationHandle> {
        info!(delay_seconds, title, body, "Notification scheduled");
        Some(NotificationHandle(format!("log-{delay_seconds}")))
    }

    fn cancel_all(&self) {
        debug!("Notifications cancelled");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Running { remaining: u32 },
    Completed,
}

pub struct RestTimer<'n> {
    exercise_name: String,
    total: u32,
    remaining: u32,
    active: bool,
    notifier: &'n dyn Notifier,
}

impl<'n> RestTimer<'n> {
    pub fn new(exercise_name: &str, rest_seconds: u32, notifier: &'n dyn Notifier) -> Self {
        Self {
            exercise_name: exercise_name.to_string(),
            total: rest_seconds,
            remaining: rest_seconds,
            active: false,
            notifier,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts or resumes the countdown and schedules the end-of-rest alert.
    pub fn start(&mut self) -> Option<NotificationHandle> {
        if self.active || self.remaining == 0 {
            return None;
        }
        self.active = true;
        self.notifier.cancel_all();
        self.notifier.schedule_one_shot(
            self.remaining,
            REST_COMPLETE_TITLE,
            &format!("Time to continue with {}", self.exercise_name),
        )
    }

    pub fn pause(&mut self) {
        self.active = false;
        self.notifier.cancel_all();
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.remaining = self.total;
        self.notifier.cancel_all();
    }

    /// Abandons the rest period. Same as `reset` from the timer's point of view.
    pub fn skip(&mut self) {
        self.reset();
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.active {
            return TickOutcome::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            self.notifier.cancel_all();
            return TickOutcome::Completed;
        }
        TickOutcome::Running {
            remaining: self.remaining,
        }
    }
}

/// `m:ss`, as shown on the timer.
pub fn format_seconds(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
