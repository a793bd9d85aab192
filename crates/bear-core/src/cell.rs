//! The [`CellState`] type: what occupies a single grid cell.

use std::fmt;

/// State of one grid cell.
///
/// Each variant has a stable small-integer [`code`](CellState::code) that
/// renderers map to a fixed visual legend. Serialized forms use the code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CellState {
    /// Open ground.
    #[default]
    Empty = 0,
    /// The bear, standing on open ground.
    AgentOnEmpty = 1,
    /// The honey, lying on open ground.
    GoalOnEmpty = 2,
    /// A cell on the planned route.
    Path = 3,
    /// The bear, standing on the planned route.
    AgentOnPath = 4,
    /// The honey at the end of the planned route.
    GoalOnPath = 5,
    /// A tree. Never passable.
    Obstacle = 6,
}

impl CellState {
    /// Every variant, in code order.
    pub const ALL: [CellState; 7] = [
        CellState::Empty,
        CellState::AgentOnEmpty,
        CellState::GoalOnEmpty,
        CellState::Path,
        CellState::AgentOnPath,
        CellState::GoalOnPath,
        CellState::Obstacle,
    ];

    /// Stable integer code exposed to renderers.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`code`](CellState::code).
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellState::Empty),
            1 => Some(CellState::AgentOnEmpty),
            2 => Some(CellState::GoalOnEmpty),
            3 => Some(CellState::Path),
            4 => Some(CellState::AgentOnPath),
            5 => Some(CellState::GoalOnPath),
            6 => Some(CellState::Obstacle),
            _ => None,
        }
    }

    /// Legend name used by the page renderer.
    pub const fn name(self) -> &'static str {
        match self {
            CellState::Empty => "GRASS",
            CellState::AgentOnEmpty => "BEAR_ON_GRASS",
            CellState::GoalOnEmpty => "HONEY_ON_GRASS",
            CellState::Path => "PATH",
            CellState::AgentOnPath => "BEAR_ON_PATH",
            CellState::GoalOnPath => "HONEY_ON_PATH",
            CellState::Obstacle => "TREE",
        }
    }

    /// Whether this cell holds the bear.
    #[inline]
    pub const fn is_agent(self) -> bool {
        matches!(self, CellState::AgentOnEmpty | CellState::AgentOnPath)
    }

    /// Whether this cell holds the honey.
    #[inline]
    pub const fn is_goal(self) -> bool {
        matches!(self, CellState::GoalOnEmpty | CellState::GoalOnPath)
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `(name, code)` pairs for every cell state, in code order.
pub fn legend() -> impl Iterator<Item = (&'static str, u8)> {
    CellState::ALL.into_iter().map(|s| (s.name(), s.code()))
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CellState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        CellState::from_code(code).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown cell state code {code}"))
        })
    }
}
