//! Idle happenings: small random money/fan windfalls generated on demand.
//!
//! There is no scheduler; the frontend calls the pulse endpoint while the
//! dashboard is open and each call rolls a handful of events against the
//! roster.

use rand::Rng;

use crate::types::{DbId, Timestamp};

/// Cap on events per pulse call.
pub const MAX_EVENTS_PER_PULSE: usize = 2;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    InstagramPost,
    Livestream,
    Fansign,
    SoloRelease,
    PopUpBusking,
    BehindTheScenes,
}

struct EventConfig {
    money: (i64, i64),
    fans: (i64, i64),
    template: &'static str,
}

impl EventKind {
    const ALL: [Self; 6] = [
        Self::InstagramPost,
        Self::Livestream,
        Self::Fansign,
        Self::SoloRelease,
        Self::PopUpBusking,
        Self::BehindTheScenes,
    ];

    fn config(self) -> EventConfig {
        match self {
            Self::InstagramPost => EventConfig {
                money: (200, 400),
                fans: (50, 120),
                template: "{idol} posted a viral photo!",
            },
            Self::Livestream => EventConfig {
                money: (500, 900),
                fans: (150, 300),
                template: "{idol} went live and wowed fans!",
            },
            Self::Fansign => EventConfig {
                money: (800, 1_200),
                fans: (250, 400),
                template: "{idol} hosted a fansign event!",
            },
            Self::SoloRelease => EventConfig {
                money: (1_200, 2_000),
                fans: (400, 650),
                template: "{idol} dropped a solo track!",
            },
            Self::PopUpBusking => EventConfig {
                money: (300, 700),
                fans: (120, 220),
                template: "{idol} did a pop-up busking show!",
            },
            Self::BehindTheScenes => EventConfig {
                money: (150, 350),
                fans: (60, 140),
                template: "{idol} shared behind-the-scenes moments!",
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// One rolled happening, ready to be credited and shown in the log.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PulseEvent {
    pub kind: EventKind,
    pub idol_id: DbId,
    pub idol_name: String,
    pub money: i64,
    pub fans: i64,
    pub message: String,
    pub timestamp: Timestamp,
}

/// Roll the events for one pulse.
///
/// The event budget scales with roster size -- `min(2, ceil(count / 3))`,
/// at least one slot -- and the actual count is uniform in [0, budget], so
/// most pulses with a small roster produce nothing.
pub fn roll_events(
    rng: &mut impl Rng,
    idols: &[(DbId, String)],
    now: Timestamp,
) -> Vec<PulseEvent> {
    if idols.is_empty() {
        return Vec::new();
    }

    let budget = idols.len().div_ceil(3).clamp(1, MAX_EVENTS_PER_PULSE);
    let count = rng.random_range(0..=budget);

    (0..count)
        .map(|_| {
            let (idol_id, idol_name) = &idols[rng.random_range(0..idols.len())];
            let kind = EventKind::ALL[rng.random_range(0..EventKind::ALL.len())];
            let config = kind.config();

            PulseEvent {
                kind,
                idol_id: *idol_id,
                idol_name: idol_name.clone(),
                money: rng.random_range(config.money.0..=config.money.1),
                fans: rng.random_range(config.fans.0..=config.fans.1),
                message: config.template.replace("{idol}", idol_name),
                timestamp: now,
            }
        })
        .collect()
}
