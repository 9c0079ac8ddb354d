//! The four swarm modes and what each one selects.
//!
//! A [`Mode`] picks the glyph the particles are sampled from, the motion
//! rule each particle follows every tick, and the animation curve a host
//! renderer may use when interpolating between frames.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SwarmError;
use crate::shape::Shape;

/// Behavioral state of the swarm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Idle,
    Listening,
    Speaking,
    Question,
}

/// Per-tick motion rule applied before any drag force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Small orbit around the particle's own base.
    Circulate,
    /// Rotating ring around the shared listening center.
    ExplodeOutward,
    /// Wide orbit around the base, stretched vertically.
    MoveToOutline,
}

/// Interpolation curve a renderer should use between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Spring,
    Linear { duration_secs: f64 },
}

impl Mode {
    /// All modes in selector order.
    pub const ALL: [Mode; 4] = [Mode::Idle, Mode::Listening, Mode::Speaking, Mode::Question];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Listening => "listening",
            Mode::Speaking => "speaking",
            Mode::Question => "question",
        }
    }

    /// Glyph the particle bases are sampled from.
    pub fn shape(self) -> Shape {
        match self {
            Mode::Idle | Mode::Listening | Mode::Speaking => Shape::Circle,
            Mode::Question => Shape::QuestionMark,
        }
    }

    pub fn motion(self) -> Motion {
        match self {
            Mode::Idle | Mode::Question => Motion::Circulate,
            Mode::Listening => Motion::ExplodeOutward,
            Mode::Speaking => Motion::MoveToOutline,
        }
    }

    pub fn curve(self) -> Curve {
        match self {
            Mode::Listening => Curve::Spring,
            _ => Curve::Linear { duration_secs: 0.5 },
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SwarmError::UnknownMode(s.to_string()))
    }
}
