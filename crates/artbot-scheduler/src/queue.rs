//! Deferred triggers waiting for the painter to become free.

use crate::trigger::TriggerKind;

/// At most one pending flag per [`TriggerKind`].
#[derive(Debug, Clone, Default)]
pub struct TriggerQueue {
    queued: [bool; 4],
}

impl TriggerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `kind` as pending. Re-enqueuing is a no-op.
    pub fn enqueue(&mut self, kind: TriggerKind) {
        self.queued[kind.index()] = true;
    }

    /// Take the highest-priority pending kind, leaving the rest queued.
    pub fn drain_one(&mut self) -> Option<TriggerKind> {
        let kind = TriggerKind::ALL.into_iter().find(|k| self.queued[k.index()])?;
        self.queued[kind.index()] = false;
        Some(kind)
    }

    pub fn is_queued(&self, kind: TriggerKind) -> bool {
        self.queued[kind.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.queued.iter().any(|q| *q)
    }
}
