//! Single-flight painting engine.
//!
//! A paint request turns into a burst of [`PaintStep`]s on the timer:
//!
//! ```text
//! t = lead_in                      line 1
//! t = lead_in + step               line 2
//! ...
//! t = lead_in + (N-1)·step         line N
//! t = lead_in + N·step             quote, then Finish
//! ```
//!
//! The painting flag is raised inside [`PaintingEngine::request_paint`]
//! and only lowered by the `Finish` step, so the whole window is exclusive.

use std::sync::Arc;
use std::time::Duration;

use artbot_core::MessageCatalog;
use artbot_core::config::PacingConfig;
use artbot_core::traits::LineSink;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::timeline::{PaintStep, Timeline, Timer};

/// Placeholder that colored paintings use for the IRC color control code.
pub const COLOR_MARKER: &str = "^k";

/// IRC "color code follows" control byte.
pub const COLOR_CODE: char = '\x03';

/// Replace every color marker in `line` with the IRC color control byte.
pub fn colorize(line: &str) -> String {
    line.replace(COLOR_MARKER, &COLOR_CODE.to_string())
}

/// Delays between the emissions of a paint sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub lead_in: Duration,
    pub line_step: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            lead_in: Duration::from_secs(1),
            line_step: Duration::from_secs(2),
        }
    }
}

impl From<&PacingConfig> for Pacing {
    fn from(config: &PacingConfig) -> Self {
        Self {
            lead_in: Duration::from_secs(config.lead_in_secs),
            line_step: Duration::from_secs(config.line_step_secs),
        }
    }
}

impl Pacing {
    /// Offset of the `index`-th emission. The quote and the reset of an
    /// `N`-line painting sit at index `N`. Saturates instead of overflowing.
    pub fn offset(&self, index: usize) -> Duration {
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.lead_in.saturating_add(self.line_step.saturating_mul(steps))
    }
}

/// Owns the painting flag and turns paint requests into timed sends.
pub struct PaintingEngine {
    painting: bool,
    pacing: Pacing,
    catalog: Arc<MessageCatalog>,
    sink: Arc<dyn LineSink>,
    rng: StdRng,
}

impl PaintingEngine {
    pub fn new(catalog: Arc<MessageCatalog>, sink: Arc<dyn LineSink>, pacing: Pacing) -> Self {
        Self {
            painting: false,
            pacing,
            catalog,
            sink,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed random source for quote selection.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Start painting `lines` to `target`.
    ///
    /// Returns `false` without scheduling anything while another sequence
    /// is still running; the caller decides whether to queue or drop.
    pub fn request_paint(
        &mut self,
        target: &str,
        lines: &[String],
        colored: bool,
        timer: &mut dyn Timer,
    ) -> bool {
        if self.painting {
            tracing::debug!("Paint for {target} rejected: already painting");
            return false;
        }
        self.painting = true;
        tracing::info!("Painting {} lines to {target}", lines.len());

        for (i, line) in lines.iter().enumerate() {
            let text = if colored { colorize(line) } else { line.clone() };
            let step = PaintStep::Line { target: target.to_string(), text };
            timer.schedule_after(self.pacing.offset(i), step);
        }

        let offset = self.pacing.offset(lines.len());

        if let Some(quote) = self.catalog.random_quote(&mut self.rng) {
            timer.schedule_after(offset, PaintStep::Line { target: target.to_string(), text: quote });
        }
        timer.schedule_after(offset, PaintStep::Finish);
        true
    }

    /// Carry out one step previously handed to the timer.
    pub fn fire(&mut self, step: PaintStep) {
        match step {
            PaintStep::Line { target, text } => {
                tracing::debug!("{target} <- {text}");
                self.sink.send_line(&target, &text);
            }
            PaintStep::Finish => {
                self.painting = false;
                tracing::info!("Painting finished");
            }
        }
    }

    /// Fire every step on `timeline` that is due. Returns how many fired.
    pub fn run_due(&mut self, timeline: &mut Timeline) -> usize {
        let mut fired = 0;
        while let Some(step) = timeline.pop_due() {
            self.fire(step);
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use artbot_core::Painting;
    use artbot_core::types::OutgoingMessage;
    use std::sync::Mutex;

    /// Records every line sent, in order.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) sent: Mutex<Vec<OutgoingMessage>>,
    }

    impl LineSink for RecordingSink {
        fn send_line(&self, target: &str, text: &str) {
            self.sent.lock().unwrap().push(OutgoingMessage::new(target, text));
        }
    }

    impl RecordingSink {
        pub(crate) fn texts(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|m| m.content.clone()).collect()
        }

        pub(crate) fn targets(&self) -> Vec<String> {
            self.sent.lock().unwrap().iter().map(|m| m.target.clone()).collect()
        }

        pub(crate) fn len(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    pub(crate) fn engine_with_sink() -> (PaintingEngine, Arc<RecordingSink>) {
        let catalog = MessageCatalog::new(
            vec![Painting { tag: "t".into(), lines: vec!["x".into()], colored: false }],
            vec!["Happy little trees.".into()],
            "Bob Ross",
        );
        let sink = Arc::new(RecordingSink::default());
        let engine = PaintingEngine::new(Arc::new(catalog), sink.clone(), Pacing::default());
        (engine, sink)
    }

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_colorize() {
        assert_eq!(colorize("^k04red^k and ^k09green"), "\x0304red\x03 and \x0309green");
        assert_eq!(colorize("plain"), "plain");
    }

    #[test]
    fn test_emission_offsets() {
        let (mut engine, sink) = engine_with_sink();
        let mut tl = Timeline::new();
        assert!(engine.request_paint("#art", &lines(3), false, &mut tl));
        assert!(engine.is_painting());
        assert_eq!(tl.len(), 5); // 3 lines + quote + finish

        // nothing before the lead-in
        tl.set_now(Duration::from_millis(999));
        assert_eq!(engine.run_due(&mut tl), 0);

        let mut arrivals = Vec::new();
        for t in 1..=7 {
            tl.set_now(secs(t));
            engine.run_due(&mut tl);
            arrivals.push(sink.len());
        }
        // lines at 1, 3, 5; quote at 7
        assert_eq!(arrivals, vec![1, 1, 2, 2, 3, 3, 4]);
        assert_eq!(
            sink.texts(),
            vec!["line 1", "line 2", "line 3", "Happy little trees. - Bob Ross"]
        );
        assert!(!engine.is_painting());
        assert!(tl.is_empty());
    }

    #[test]
    fn test_painting_until_last_offset() {
        let (mut engine, _sink) = engine_with_sink();
        let mut tl = Timeline::new();
        engine.request_paint("#art", &lines(2), false, &mut tl);

        tl.set_now(Duration::from_millis(4999));
        engine.run_due(&mut tl);
        assert!(engine.is_painting());

        tl.set_now(secs(5));
        engine.run_due(&mut tl);
        assert!(!engine.is_painting());
    }

    #[test]
    fn test_quote_sent_before_reset() {
        let (mut engine, sink) = engine_with_sink();
        let mut tl = Timeline::new();
        engine.request_paint("#art", &lines(1), false, &mut tl);
        tl.set_now(secs(3));

        // Fire one step at a time and observe the state in between.
        engine.fire(tl.pop_due().unwrap()); // line
        engine.fire(tl.pop_due().unwrap()); // quote
        assert_eq!(sink.len(), 2);
        assert!(engine.is_painting());
        engine.fire(tl.pop_due().unwrap()); // finish
        assert!(!engine.is_painting());
    }

    #[test]
    fn test_at_most_one_paint() {
        let (mut engine, sink) = engine_with_sink();
        let mut tl = Timeline::new();
        assert!(engine.request_paint("#art", &lines(2), false, &mut tl));
        assert!(!engine.request_paint("#art", &lines(9), false, &mut tl));

        for t in 1..5 {
            tl.set_now(secs(t));
            engine.run_due(&mut tl);
            assert!(!engine.request_paint("#tea", &lines(1), false, &mut tl));
        }
        tl.set_now(secs(5));
        engine.run_due(&mut tl);
        assert_eq!(sink.len(), 3);
        assert!(sink.targets().iter().all(|t| t == "#art"));

        assert!(engine.request_paint("#tea", &lines(1), false, &mut tl));
    }

    #[test]
    fn test_colored_lines_substituted() {
        let (mut engine, sink) = engine_with_sink();
        let mut tl = Timeline::new();
        let art = vec!["^k04red".to_string()];
        engine.request_paint("#art", &art, true, &mut tl);
        tl.set_now(secs(1));
        engine.run_due(&mut tl);
        assert_eq!(sink.texts(), vec!["\x0304red"]);
    }

    #[test]
    fn test_uncolored_lines_verbatim() {
        let (mut engine, sink) = engine_with_sink();
        let mut tl = Timeline::new();
        let art = vec!["^k04red".to_string()];
        engine.request_paint("#art", &art, false, &mut tl);
        tl.set_now(secs(1));
        engine.run_due(&mut tl);
        assert_eq!(sink.texts(), vec!["^k04red"]);
    }

    #[test]
    fn test_empty_painting_still_sends_quote() {
        let (mut engine, sink) = engine_with_sink();
        let mut tl = Timeline::new();
        engine.request_paint("#art", &[], false, &mut tl);
        tl.set_now(secs(1));
        engine.run_due(&mut tl);
        assert_eq!(sink.texts(), vec!["Happy little trees. - Bob Ross"]);
        assert!(!engine.is_painting());
    }

    #[test]
    fn test_huge_pacing_saturates() {
        let catalog = MessageCatalog::new(vec![], vec!["q".into()], "a");
        let sink = Arc::new(RecordingSink::default());
        let pacing = Pacing { lead_in: secs(1), line_step: Duration::MAX };
        let mut engine = PaintingEngine::new(Arc::new(catalog), sink.clone(), pacing);
        assert_eq!(pacing.offset(2), Duration::MAX);

        let mut tl = Timeline::new();
        assert!(engine.request_paint("#art", &lines(2), false, &mut tl));
        assert_eq!(tl.len(), 4);
        tl.set_now(secs(1));
        engine.run_due(&mut tl);
        assert_eq!(sink.texts(), vec!["line 1"]);
        assert!(engine.is_painting());
    }

    #[test]
    fn test_custom_pacing() {
        let catalog = MessageCatalog::new(vec![], vec!["q".into()], "a");
        let sink = Arc::new(RecordingSink::default());
        let pacing = Pacing::from(&PacingConfig { lead_in_secs: 0, line_step_secs: 5 });
        let mut engine = PaintingEngine::new(Arc::new(catalog), sink.clone(), pacing);
        assert_eq!(pacing.offset(0), secs(0));
        assert_eq!(pacing.offset(2), secs(10));

        let mut tl = Timeline::new();
        engine.request_paint("#art", &lines(2), false, &mut tl);
        engine.run_due(&mut tl);
        assert_eq!(sink.len(), 1);
        tl.set_now(secs(10));
        engine.run_due(&mut tl);
        assert_eq!(sink.texts(), vec!["line 1", "line 2", "q - a"]);
    }
}
