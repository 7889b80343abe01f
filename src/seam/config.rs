//! Seam-level configuration. Survives [`reset_state`](super::StartEndDetectionInSeam::reset_state).

use serde::{Deserialize, Serialize};

/// Direction the workpiece moves through the field of view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Material enters at the top of the image.
    FromAbove,
    /// Material enters at the bottom of the image.
    FromBelow,
    #[default]
    Unknown,
}

impl Direction {
    /// Map the integer filter parameter: 0 from below, 1 from above.
    pub fn from_parameter(value: i32) -> Self {
        match value {
            0 => Self::FromBelow,
            1 => Self::FromAbove,
            _ => Self::Unknown,
        }
    }
}

/// Which seam edges the engine looks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchForEdges {
    #[default]
    Both,
    OnlyStart,
    OnlyEnd,
}

impl SearchForEdges {
    /// Map the integer filter parameter: 1 start only, 2 end only, anything else both.
    pub fn from_parameter(value: i32) -> Self {
        match value {
            1 => Self::OnlyStart,
            2 => Self::OnlyEnd,
            _ => Self::Both,
        }
    }
}

/// Parameters of the seam state machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeamConfig {
    /// Travel direction of the part.
    pub direction: Direction,
    /// Edges to look for.
    pub search_for_edges: SearchForEdges,
    /// Accept partial edges even after a full edge of the same kind was seen.
    pub always_accept_partial_edges: bool,
    /// Partial edges lying within this many rows of the top or bottom image
    /// border are ignored unless partial edges are always accepted; `0`
    /// disables the check.
    pub partial_edge_border_tolerance: i32,
    /// Consecutive material stripes required before a region counts as material.
    pub min_stripes_material: usize,
}

impl Default for SeamConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Unknown,
            search_for_edges: SearchForEdges::Both,
            always_accept_partial_edges: false,
            partial_edge_border_tolerance: 0,
            min_stripes_material: 3,
        }
    }
}
