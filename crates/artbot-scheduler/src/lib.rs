//! # ArtBot Scheduler
//!
//! Time-of-day triggers and the paced, single-flight painting engine.
//!
//! ## Architecture
//! ```text
//! minute tick ──▶ Scheduler
//!                   ├── TriggerQueue::drain_one()   (one queued trigger per tick)
//!                   ├── weekend? stop
//!                   └── humpday / lunchtime / breaktime / teatime match
//!                          │
//!                          ▼
//!                 PaintingEngine::request_paint ──busy──▶ TriggerQueue::enqueue
//!                          │
//!                          ▼
//!                 Timeline (line, line, ..., quote, Finish)
//!                          │
//!                          ▼
//!                 LineSink::send_line ──▶ channel
//! ```

pub mod painter;
pub mod queue;
pub mod schedule;
pub mod timeline;
pub mod trigger;

pub use painter::{Pacing, PaintingEngine, colorize};
pub use queue::TriggerQueue;
pub use schedule::{
    Clock, Dispatch, FixedClock, LocalClock, ScheduleTimes, Scheduler, TICK_INTERVAL_SECS, TickOutcome,
};
pub use timeline::{PaintStep, Timeline, Timer};
pub use trigger::{Route, TriggerKind, TriggerRoutes};
