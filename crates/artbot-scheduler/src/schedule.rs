//! Minute-tick scheduler.
//!
//! Each tick either drains one queued trigger or, on a weekday, compares
//! the wall clock against the configured trigger times. A tick that is
//! missed is never replayed.

use artbot_core::ArtBotConfig;
use artbot_core::types::{DayOfWeek, TimeOfDay};

use crate::painter::PaintingEngine;
use crate::queue::TriggerQueue;
use crate::timeline::Timer;
use crate::trigger::{TriggerKind, TriggerRoutes};

/// Interval between scheduler ticks (seconds).
pub const TICK_INTERVAL_SECS: u64 = 60;

/// Source of the current day and minute.
pub trait Clock: Send {
    fn now(&self) -> (DayOfWeek, TimeOfDay);
}

/// The local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> (DayOfWeek, TimeOfDay) {
        let now = chrono::Local::now();
        (DayOfWeek::of(&now), TimeOfDay::of(&now))
    }
}

/// A clock stuck at one moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DayOfWeek, pub TimeOfDay);

impl Clock for FixedClock {
    fn now(&self) -> (DayOfWeek, TimeOfDay) {
        (self.0, self.1)
    }
}

/// Configured trigger times.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleTimes {
    pub daily_event: TimeOfDay,
    pub lunchtime: TimeOfDay,
    pub breaktime: TimeOfDay,
    pub teatime: TimeOfDay,
    pub humpday: DayOfWeek,
}

impl ScheduleTimes {
    pub fn from_config(config: &ArtBotConfig) -> Self {
        Self {
            daily_event: config.daily_event_time,
            lunchtime: config.lunchtime,
            breaktime: config.breaktime,
            teatime: config.teatime,
            humpday: config.humpday,
        }
    }
}

/// What happened to one trigger attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Started,
    Queued,
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A queued trigger was taken off the queue; no time check was made.
    Drained(TriggerKind, Dispatch),
    /// Saturday or Sunday.
    Weekend,
    /// Time-of-day matches for this minute, possibly none.
    Checked(Vec<(TriggerKind, Dispatch)>),
}

pub struct Scheduler {
    times: ScheduleTimes,
    routes: TriggerRoutes,
    queue: TriggerQueue,
}

impl Scheduler {
    pub fn new(times: ScheduleTimes, routes: TriggerRoutes) -> Self {
        Self {
            times,
            routes,
            queue: TriggerQueue::new(),
        }
    }

    pub fn from_config(config: &ArtBotConfig) -> Self {
        Self::new(ScheduleTimes::from_config(config), TriggerRoutes::from_config(config))
    }

    pub fn queue(&self) -> &TriggerQueue {
        &self.queue
    }

    /// Tick at whatever time `clock` reports.
    pub fn tick(
        &mut self,
        clock: &dyn Clock,
        engine: &mut PaintingEngine,
        timer: &mut dyn Timer,
    ) -> TickOutcome {
        let (day, time) = clock.now();
        self.tick_at(day, time, engine, timer)
    }

    /// Tick as if it were `time` on `day`.
    pub fn tick_at(
        &mut self,
        day: DayOfWeek,
        time: TimeOfDay,
        engine: &mut PaintingEngine,
        timer: &mut dyn Timer,
    ) -> TickOutcome {
        if let Some(kind) = self.queue.drain_one() {
            let dispatch = self.attempt(kind, engine, timer);
            tracing::info!("Drained queued {kind} trigger: {dispatch:?}");
            return TickOutcome::Drained(kind, dispatch);
        }

        if day.is_weekend() {
            return TickOutcome::Weekend;
        }

        tracing::debug!("Checking triggers for {day} {time}");
        let mut attempts = Vec::new();

        if time == self.times.daily_event && day == self.times.humpday {
            attempts.push((TriggerKind::Humpday, self.attempt(TriggerKind::Humpday, engine, timer)));
        }

        let daily = if time == self.times.lunchtime {
            Some(TriggerKind::Lunchtime)
        } else if time == self.times.breaktime {
            Some(TriggerKind::Breaktime)
        } else if time == self.times.teatime {
            Some(TriggerKind::Teatime)
        } else {
            None
        };
        if let Some(kind) = daily {
            attempts.push((kind, self.attempt(kind, engine, timer)));
        }

        TickOutcome::Checked(attempts)
    }

    /// Paint `kind` now, or queue it if the painter is busy.
    pub fn attempt(
        &mut self,
        kind: TriggerKind,
        engine: &mut PaintingEngine,
        timer: &mut dyn Timer,
    ) -> Dispatch {
        let route = self.routes.route(kind);
        if engine.request_paint(&route.target, &route.lines, false, timer) {
            tracing::info!("Fired {kind} trigger to {}", route.target);
            Dispatch::Started
        } else {
            tracing::info!("Painter busy, queued {kind} trigger");
            self.queue.enqueue(kind);
            Dispatch::Queued
        }
    }
}
