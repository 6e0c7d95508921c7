//! Match lifecycle events
//!
//! The controller returns the events produced by each tick. Callers forward
//! them to whatever sinks they hold (UI, audio, result storage); the match
//! itself keeps no references to its observers.

use serde::{Deserialize, Serialize};

use super::ball::{BallId, BallKind};
use super::turn::{Player, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    MatchStarted {
        starting_player: PlayerId,
    },
    BallPotted {
        ball: BallId,
        kind: BallKind,
    },
    MotionStarted,
    MotionStopped {
        first_touched: Option<BallId>,
    },
    MatchEnded {
        winner: PlayerId,
        players: Vec<Player>,
    },
}

/// Receives match events
pub trait EventSink {
    fn on_event(&mut self, event: &MatchEvent);
}

/// Sink that keeps every event it sees
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<MatchEvent>,
}

impl EventSink for EventLog {
    fn on_event(&mut self, event: &MatchEvent) {
        self.events.push(event.clone());
    }
}

impl EventLog {
    pub fn potted(&self) -> impl Iterator<Item = BallId> + '_ {
        self.events.iter().filter_map(|e| match e {
            MatchEvent::BallPotted { ball, .. } => Some(*ball),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&MatchEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

/// Deliver events, in order, to every sink
pub fn dispatch(events: &[MatchEvent], sinks: &mut [&mut dyn EventSink]) {
    for event in events {
        for sink in sinks.iter_mut() {
            sink.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(usize);

    impl EventSink for Counter {
        fn on_event(&mut self, _event: &MatchEvent) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_dispatch_reaches_every_sink() {
        let events = vec![
            MatchEvent::MotionStarted,
            MatchEvent::BallPotted {
                ball: 5,
                kind: BallKind::from_id(5),
            },
            MatchEvent::MotionStopped {
                first_touched: Some(5),
            },
        ];
        let mut log = EventLog::default();
        let mut counter = Counter(0);
        let mut sinks: [&mut dyn EventSink; 2] = [&mut log, &mut counter];
        dispatch(&events, &mut sinks);

        assert_eq!(log.events, events);
        assert_eq!(counter.0, 3);
        assert_eq!(log.potted().collect::<Vec<_>>(), vec![5]);
        assert_eq!(log.count(|e| matches!(e, MatchEvent::MotionStarted)), 1);
    }
}
