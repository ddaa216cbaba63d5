//! The ArtBot actor.
//!
//! One task owns every piece of mutable state (painting flag, trigger
//! queue, timeline) and handles minute ticks, incoming messages and due
//! paint steps strictly one at a time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use artbot_core::traits::LineSink;
use artbot_core::types::{DayOfWeek, IncomingMessage, TimeOfDay};
use artbot_core::{ArtBotConfig, MessageCatalog, Result};
use artbot_scheduler::{
    Clock, LocalClock, Pacing, PaintingEngine, Scheduler, TICK_INTERVAL_SECS, TickOutcome, Timeline,
};
use futures::{Stream, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::{Instant, MissedTickBehavior};

use crate::commands::{Intent, IntentParser, help_lines, tags_header};

pub struct ArtBot {
    config: Arc<ArtBotConfig>,
    catalog: Arc<MessageCatalog>,
    parser: IntentParser,
    engine: PaintingEngine,
    scheduler: Scheduler,
    timeline: Timeline,
    sink: Arc<dyn LineSink>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl ArtBot {
    pub fn new(config: ArtBotConfig, sink: Arc<dyn LineSink>) -> Self {
        let config = Arc::new(config);
        let catalog = Arc::new(MessageCatalog::from_config(&config));
        let engine = PaintingEngine::new(catalog.clone(), sink.clone(), Pacing::from(&config.pacing));
        Self {
            parser: IntentParser::new(&config.nick),
            scheduler: Scheduler::from_config(&config),
            timeline: Timeline::new(),
            clock: Box::new(LocalClock),
            rng: StdRng::from_entropy(),
            engine,
            catalog,
            sink,
            config,
        }
    }

    /// Replace the wall clock consulted on each minute tick.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed every random choice the bot makes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.engine = self.engine.with_rng(StdRng::seed_from_u64(seed.wrapping_add(1)));
        self
    }

    pub fn is_painting(&self) -> bool {
        self.engine.is_painting()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Move the clock to `now` and fire every paint step that became due.
    pub fn advance(&mut self, now: Duration) -> usize {
        self.timeline.set_now(now);
        self.engine.run_due(&mut self.timeline)
    }

    /// Minute tick against the configured clock.
    pub fn on_tick(&mut self) -> TickOutcome {
        self.scheduler.tick(self.clock.as_ref(), &mut self.engine, &mut self.timeline)
    }

    /// Minute tick at an explicit moment.
    pub fn on_tick_at(&mut self, day: DayOfWeek, time: TimeOfDay) -> TickOutcome {
        self.scheduler.tick_at(day, time, &mut self.engine, &mut self.timeline)
    }

    /// React to a channel message. Only the art channel takes commands.
    pub fn handle_incoming(&mut self, msg: &IncomingMessage) -> Intent {
        if msg.target != self.config.art_channel {
            return Intent::None;
        }
        let intent = self.parser.parse(&msg.content);
        if intent != Intent::None {
            tracing::debug!("{} asked for {intent:?}", msg.sender);
        }
        self.dispatch(&intent);
        intent
    }

    /// Carry out a command. Everything is dropped silently while painting.
    pub fn dispatch(&mut self, intent: &Intent) {
        let art = self.config.art_channel.as_str();
        match intent {
            Intent::Help => {
                if self.engine.is_painting() {
                    return;
                }
                for line in help_lines(&self.config.nick) {
                    self.sink.send_line(art, &line);
                }
            }
            Intent::ListTags => {
                if self.engine.is_painting() {
                    return;
                }
                self.sink.send_line(art, &tags_header(&self.config.nick));
                self.sink.send_line(art, &self.catalog.tags().join(", "));
            }
            Intent::PaintRandom => {
                let Some(painting) = self.catalog.random_painting(&mut self.rng) else {
                    return;
                };
                if !self.engine.request_paint(art, &painting.lines, painting.colored, &mut self.timeline) {
                    tracing::debug!("Dropped paint request for {}: busy", painting.tag);
                }
            }
            Intent::PaintByTag(tag) => {
                let Some(painting) = self.catalog.painting_by_tag(tag) else {
                    tracing::debug!("No painting tagged {tag:?}");
                    return;
                };
                if !self.engine.request_paint(art, &painting.lines, painting.colored, &mut self.timeline) {
                    tracing::debug!("Dropped paint request for {tag}: busy");
                }
            }
            Intent::None => {}
        }
    }

    /// Serve until `shutdown` resolves or `incoming` ends.
    pub async fn run<S, F>(mut self, mut incoming: S, shutdown: F) -> Result<()>
    where
        S: Stream<Item = IncomingMessage> + Unpin,
        F: Future<Output = ()>,
    {
        let epoch = Instant::now();
        let mut ticker = tokio::time::interval(Duration::from_secs(TICK_INTERVAL_SECS));
        // A missed minute is lost, never replayed.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        tracing::info!(
            "ArtBot serving {} and {} as {}",
            self.config.art_channel,
            self.config.tea_channel,
            self.config.nick
        );

        loop {
            let wake = self.timeline.next_deadline().and_then(|d| epoch.checked_add(d));
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                _ = sleep_until(wake) => {
                    self.advance(epoch.elapsed());
                }
                _ = ticker.tick() => {
                    self.advance(epoch.elapsed());
                    let outcome = self.on_tick();
                    tracing::debug!("Tick: {outcome:?}");
                }
                msg = incoming.next() => {
                    let Some(msg) = msg else {
                        tracing::info!("Incoming stream ended");
                        break;
                    };
                    self.advance(epoch.elapsed());
                    self.handle_incoming(&msg);
                }
            }
        }
        Ok(())
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
