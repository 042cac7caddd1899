/// The effect of a player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum InputOperation {
    /// Nothing changed.
    NoOp,
    /// Something was placed, replaced or upgraded.
    Set,
    /// Something was removed.
    Removed,
}

/// Why a well-formed input was rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum InputBlockReason {
    /// The region shows a fixed clue colour.
    #[display("region colour is a fixed clue")]
    ClueRegion,
    /// Notes cannot be added to a filled cell.
    #[display("cell is filled")]
    FilledCell,
    /// A bridge cannot start and end at the same island.
    #[display("bridge endpoints are the same island")]
    SameIsland,
    /// The islands are not on a common row or column.
    #[display("islands are not aligned")]
    NotAligned,
    /// Another island lies between the two islands.
    #[display("an island is in the way")]
    IslandInTheWay,
    /// The bridge would cross an existing bridge.
    #[display("bridge would cross another bridge")]
    BridgeCrossing,
}
