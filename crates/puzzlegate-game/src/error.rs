use puzzlegate_core::Position;

use crate::InputBlockReason;

/// Errors returned by game operations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum GameError {
    /// The position is outside the grid.
    #[display("position ({}, {}) is outside the grid", pos.x, pos.y)]
    PositionOutOfRange {
        /// Rejected position.
        pos: Position,
    },
    /// The value is outside `1..=max`.
    #[display("value {value} is outside 1..={max}")]
    ValueOutOfRange {
        /// Rejected value.
        value: u8,
        /// Largest allowed value.
        max: u8,
    },
    /// No island has this id.
    #[display("unknown island {id}")]
    UnknownIsland {
        /// Rejected id.
        id: usize,
    },
    /// No region has this id.
    #[display("unknown region {id}")]
    UnknownRegion {
        /// Rejected id.
        id: usize,
    },
    /// No node has this id.
    #[display("unknown node {id}")]
    UnknownNode {
        /// Rejected id.
        id: usize,
    },
    /// A node coordinate is NaN or infinite.
    #[display("node coordinates must be finite")]
    NonFiniteCoordinate,
    /// The input is valid but not allowed in the current state.
    #[display("input blocked: {_0}")]
    #[from]
    Blocked(InputBlockReason),
}
