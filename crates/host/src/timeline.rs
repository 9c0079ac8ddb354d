//! Scripted input for headless runs.
//!
//! A timeline is a JSON array of entries, each naming the tick before which
//! an event is applied:
//!
//! ```json
//! [
//!   { "tick": 0,   "event": { "mode": "question" } },
//!   { "tick": 30,  "event": { "drag": { "position": [195, 400], "velocity": [800, 0] } } },
//!   { "tick": 45,  "event": "release" },
//!   { "tick": 60,  "event": { "resize": { "width": 844, "height": 390 } } }
//! ]
//! ```

use glam::DVec2;
use serde::{Deserialize, Serialize};
use swarm_core::{Mode, SwarmError, Viewport};

/// One host callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Switch to a new mode.
    Mode(Mode),
    /// Pointer moved during a drag. `velocity` is optional.
    Drag {
        position: [f64; 2],
        #[serde(default)]
        velocity: Option<[f64; 2]>,
    },
    /// Drag ended.
    Release,
    /// The drawing area changed size.
    Resize { width: f64, height: f64 },
}

impl Event {
    pub fn drag(position: DVec2, velocity: Option<DVec2>) -> Self {
        Event::Drag {
            position: position.to_array(),
            velocity: velocity.map(|v| v.to_array()),
        }
    }

    pub fn resize(viewport: Viewport) -> Self {
        Event::Resize {
            width: viewport.width,
            height: viewport.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub tick: u64,
    pub event: Event,
}

/// Events ordered by tick. Entries sharing a tick keep their file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new(mut entries: Vec<TimelineEntry>) -> Self {
        entries.sort_by_key(|e| e.tick);
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self, SwarmError> {
        let entries: Vec<TimelineEntry> = serde_json::from_str(json)
            .map_err(|e| SwarmError::InvalidConfig(format!("malformed timeline JSON: {e}")))?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tick of the last scheduled event.
    pub fn last_tick(&self) -> Option<u64> {
        self.entries.last().map(|e| e.tick)
    }

    /// Events scheduled for exactly `tick`, in order.
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &Event> + '_ {
        let start = self.entries.partition_point(|e| e.tick < tick);
        self.entries[start..]
            .iter()
            .take_while(move |e| e.tick == tick)
            .map(|e| &e.event)
    }
}
