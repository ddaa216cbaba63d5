//! Scheduled trigger kinds and where each one paints.

use artbot_core::ArtBotConfig;

/// A scheduled painting. Declaration order is drain priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Humpday,
    Lunchtime,
    Breaktime,
    Teatime,
}

impl TriggerKind {
    /// All kinds, highest drain priority first.
    pub const ALL: [TriggerKind; 4] = [
        TriggerKind::Humpday,
        TriggerKind::Lunchtime,
        TriggerKind::Breaktime,
        TriggerKind::Teatime,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerKind::Humpday => write!(f, "humpday"),
            TriggerKind::Lunchtime => write!(f, "lunchtime"),
            TriggerKind::Breaktime => write!(f, "breaktime"),
            TriggerKind::Teatime => write!(f, "teatime"),
        }
    }
}

/// Fixed destination and content of one trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub target: String,
    pub lines: Vec<String>,
}

/// Routes for every trigger kind.
#[derive(Debug, Clone)]
pub struct TriggerRoutes {
    routes: [Route; 4],
}

impl TriggerRoutes {
    pub fn from_config(config: &ArtBotConfig) -> Self {
        let art = |lines: &Vec<String>| Route {
            target: config.art_channel.clone(),
            lines: lines.clone(),
        };
        Self {
            routes: [
                art(&config.humpday_painting),
                art(&config.lunchtime_painting),
                art(&config.breaktime_painting),
                Route {
                    target: config.tea_channel.clone(),
                    lines: config.teatime_painting.clone(),
                },
            ],
        }
    }

    pub fn route(&self, kind: TriggerKind) -> &Route {
        &self.routes[kind.index()]
    }
}
