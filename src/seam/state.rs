//! Seam state vocabulary and the transition tables of the seam engine.
//!
//! Overview
//! - A seam regularly runs through background, start edge(s), full material,
//!   end edge(s) and background again. [`SeamState`] records how far along
//!   that path the engine is and which edges were missed.
//! - Each transition method consumes the classification of one image. Edge
//!   transitions also report which stored edge kind the new edge belongs to,
//!   or `None` when the edge is not accepted.
//!
//! Naming: the `StartMissing` / `EndMissing` suffixes mark seams whose start
//! (or end) was never observed, e.g. because the search was restricted or the
//! sensor started in the middle of the part.

use super::config::SearchForEdges;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeamState {
    #[default]
    Unknown,
    Invalid,
    WaitingFirstStartEdge,
    WaitingFirstEndEdge,
    FirstStartEdgeFound,
    SecondStartEdgeFound,
    FullStartEdgeFound,
    FullStartEdgeFoundEndMissing,
    FullImageFound,
    FullImageFoundStartMissing,
    FirstEndEdgeFound,
    SecondEndEdgeFound,
    FirstEndEdgeFoundStartMissing,
    SecondEndEdgeFoundStartMissing,
    FullEndEdgeFound,
    FullEndEdgeFoundStartMissing,
    EndBackgroundImageFound,
    EndBackgroundImageFoundStartMissing,
    EndBackgroundImageFoundStartEndMissing,
    EndBackgroundImageFoundEndMissing,
}

/// Kind of seam edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Start,
    End,
}

/// Search region an edge was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSide {
    Left,
    Right,
}

impl EdgeSide {
    #[inline]
    pub fn is_left(self) -> bool {
        self == Self::Left
    }
}

/// Edge the engine expects to see next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitingForEdge {
    Start,
    End,
    None,
}

impl SeamState {
    /// Edge expected next, given the configured search.
    pub fn waiting_for_edge(self, search: SearchForEdges) -> WaitingForEdge {
        use SeamState::*;
        match self {
            Invalid => WaitingForEdge::None,
            Unknown => {
                if search == SearchForEdges::OnlyEnd {
                    WaitingForEdge::End
                } else {
                    WaitingForEdge::Start
                }
            }
            WaitingFirstStartEdge | FirstStartEdgeFound | SecondStartEdgeFound
            | FullStartEdgeFound => WaitingForEdge::Start,
            WaitingFirstEndEdge => WaitingForEdge::End,
            FullImageFound | FullImageFoundStartMissing | FirstEndEdgeFound => {
                if search == SearchForEdges::OnlyStart {
                    WaitingForEdge::None
                } else {
                    WaitingForEdge::End
                }
            }
            SecondEndEdgeFound
            | FirstEndEdgeFoundStartMissing
            | SecondEndEdgeFoundStartMissing
            | FullEndEdgeFound
            | FullEndEdgeFoundStartMissing => WaitingForEdge::End,
            EndBackgroundImageFound
            | EndBackgroundImageFoundStartMissing
            | EndBackgroundImageFoundStartEndMissing
            | EndBackgroundImageFoundEndMissing
            | FullStartEdgeFoundEndMissing => WaitingForEdge::None,
        }
    }

    /// State after an image showing background in both regions.
    pub fn after_only_background(self, search: SearchForEdges) -> SeamState {
        use SeamState::*;
        match self {
            Unknown => {
                if search == SearchForEdges::OnlyEnd {
                    WaitingFirstEndEdge
                } else {
                    WaitingFirstStartEdge
                }
            }
            WaitingFirstStartEdge
            | WaitingFirstEndEdge
            | FullStartEdgeFoundEndMissing
            | EndBackgroundImageFound
            | EndBackgroundImageFoundStartMissing
            | EndBackgroundImageFoundStartEndMissing
            | EndBackgroundImageFoundEndMissing
            | FullImageFound
            | FullImageFoundStartMissing => self,
            SecondEndEdgeFound | FullEndEdgeFound => EndBackgroundImageFound,
            FirstEndEdgeFound | FirstEndEdgeFoundStartMissing => EndBackgroundImageFoundEndMissing,
            SecondEndEdgeFoundStartMissing | FullEndEdgeFoundStartMissing => {
                EndBackgroundImageFoundStartMissing
            }
            Invalid | FirstStartEdgeFound | SecondStartEdgeFound | FullStartEdgeFound => Invalid,
        }
    }

    /// State after an image showing material in both regions.
    ///
    /// `both_sides_enabled` is false when one of the search regions has zero
    /// width, in which case a single start edge already completes the start.
    pub fn after_only_material(self, search: SearchForEdges, both_sides_enabled: bool) -> SeamState {
        use SeamState::*;
        match self {
            Unknown | WaitingFirstStartEdge | WaitingFirstEndEdge => FullImageFoundStartMissing,
            FirstStartEdgeFound => {
                if both_sides_enabled {
                    FullImageFoundStartMissing
                } else {
                    FullImageFound
                }
            }
            Invalid
            | SecondEndEdgeFound
            | FirstEndEdgeFound
            | FirstEndEdgeFoundStartMissing
            | SecondEndEdgeFoundStartMissing
            | FullEndEdgeFound
            | FullEndEdgeFoundStartMissing => Invalid,
            EndBackgroundImageFound
            | EndBackgroundImageFoundStartMissing
            | EndBackgroundImageFoundStartEndMissing
            | EndBackgroundImageFoundEndMissing
            | FullImageFoundStartMissing => self,
            FullImageFound | SecondStartEdgeFound | FullStartEdgeFound
            | FullStartEdgeFoundEndMissing => {
                if search == SearchForEdges::OnlyStart {
                    FullStartEdgeFoundEndMissing
                } else {
                    FullImageFound
                }
            }
        }
    }

    /// State after an image where exactly one region shows an edge.
    ///
    /// `side_start_found` / `side_end_found` tell whether the region of the
    /// new edge already holds a start / end edge.
    pub fn after_one_edge(
        self,
        side_start_found: bool,
        side_end_found: bool,
        always_accept_partial: bool,
    ) -> (SeamState, Option<EdgeKind>) {
        use SeamState::*;
        match self {
            Invalid | WaitingFirstEndEdge => (self, None),
            Unknown | WaitingFirstStartEdge => (FirstStartEdgeFound, Some(EdgeKind::Start)),
            FirstStartEdgeFound => {
                let next = if side_start_found {
                    FirstStartEdgeFound
                } else {
                    SecondStartEdgeFound
                };
                (next, Some(EdgeKind::Start))
            }
            SecondStartEdgeFound => (self, Some(EdgeKind::Start)),
            FullStartEdgeFound => (self, always_accept_partial.then_some(EdgeKind::Start)),
            FullImageFound => (FirstEndEdgeFound, Some(EdgeKind::End)),
            FullImageFoundStartMissing => (FirstEndEdgeFoundStartMissing, Some(EdgeKind::End)),
            FirstEndEdgeFound => {
                let next = if side_end_found {
                    FirstEndEdgeFound
                } else {
                    SecondEndEdgeFound
                };
                (next, Some(EdgeKind::End))
            }
            SecondEndEdgeFound => (self, Some(EdgeKind::End)),
            FirstEndEdgeFoundStartMissing | SecondEndEdgeFoundStartMissing => {
                let next = if side_end_found {
                    self
                } else {
                    SecondEndEdgeFoundStartMissing
                };
                (next, Some(EdgeKind::End))
            }
            FullEndEdgeFound | FullEndEdgeFoundStartMissing => {
                (self, always_accept_partial.then_some(EdgeKind::End))
            }
            EndBackgroundImageFound
            | EndBackgroundImageFoundStartMissing
            | EndBackgroundImageFoundStartEndMissing
            | EndBackgroundImageFoundEndMissing
            | FullStartEdgeFoundEndMissing => (self, None),
        }
    }

    /// State after an image where both regions show an edge.
    pub fn after_full_edge(self) -> (SeamState, Option<EdgeKind>) {
        use SeamState::*;
        match self {
            Invalid => (Invalid, None),
            Unknown | WaitingFirstStartEdge | FirstStartEdgeFound | SecondStartEdgeFound
            | FullStartEdgeFound => (FullStartEdgeFound, Some(EdgeKind::Start)),
            FullImageFoundStartMissing | FirstEndEdgeFoundStartMissing => {
                (SecondEndEdgeFoundStartMissing, Some(EdgeKind::End))
            }
            FullImageFound | FirstEndEdgeFound => (SecondEndEdgeFound, Some(EdgeKind::End)),
            SecondEndEdgeFound => (FullEndEdgeFound, Some(EdgeKind::End)),
            SecondEndEdgeFoundStartMissing => (FullEndEdgeFoundStartMissing, Some(EdgeKind::End)),
            FullEndEdgeFound | FullEndEdgeFoundStartMissing => (self, Some(EdgeKind::End)),
            EndBackgroundImageFound
            | EndBackgroundImageFoundStartMissing
            | EndBackgroundImageFoundStartEndMissing
            | EndBackgroundImageFoundEndMissing
            | FullStartEdgeFoundEndMissing
            | WaitingFirstEndEdge => (self, None),
        }
    }

    /// Name used in logs and state summaries.
    pub fn name(self) -> &'static str {
        use SeamState::*;
        match self {
            Unknown => "Unknown",
            Invalid => "Invalid",
            WaitingFirstStartEdge => "WaitingFirstStartEdge",
            WaitingFirstEndEdge => "WaitingFirstEndEdge",
            FirstStartEdgeFound => "FirstStartEdgeFound",
            SecondStartEdgeFound => "SecondStartEdgeFound",
            FullStartEdgeFound => "FullStartEdgeFound",
            FullStartEdgeFoundEndMissing => "FullStartEdgeFound_EndMissing",
            FullImageFound => "FullImageFound",
            FullImageFoundStartMissing => "FullImageFound_StartMissing",
            FirstEndEdgeFound => "FirstEndEdgeFound",
            SecondEndEdgeFound => "SecondEndEdgeFound",
            FirstEndEdgeFoundStartMissing => "FirstEndEdgeFound_StartMissing",
            SecondEndEdgeFoundStartMissing => "SecondEndEdgeFound_StartMissing",
            FullEndEdgeFound => "FullEndEdgeFound",
            FullEndEdgeFoundStartMissing => "FullEndEdgeFound_StartMissing",
            EndBackgroundImageFound => "EndBackgroundImageFound",
            EndBackgroundImageFoundStartMissing => "EndBackgroundImageFound_StartMissing",
            EndBackgroundImageFoundStartEndMissing => "EndBackgroundImageFound_StartEndMissing",
            EndBackgroundImageFoundEndMissing => "EndBackgroundImageFound_EndMissing",
        }
    }
}

impl fmt::Display for SeamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
