//! Stripe-based coarse classification of a vertical search region.
//!
//! A search region (ROI) of fixed width is cut into horizontal stripes of
//! `stripe_height` rows, aligned to the top of the image and keeping only
//! stripes that fit. Each stripe is reduced to a few intensity statistics and
//! labelled as material ("tube") or background. The label sequence is what
//! the per-image detector turns into an [`Appearance`](crate::types::Appearance).
//!
//! Modules
//! - [`positioning`] – stripe index ↔ ROI/image coordinate mapping.
//! - [`calculator`] – per-stripe statistics and tube/background labelling.
//! - [`search`] – locating runs of equally labelled stripes.
//! - [`range`] – appearance and valid rows of a region from its labels.

pub mod calculator;
pub mod positioning;
pub mod range;
pub mod search;

pub use calculator::{ImageStripeCalculator, StripeEvaluation, StripeStatistics, StripesResult};
pub use positioning::{StripeClip, StripeIndex, StripePositioning, StripeRoi};
pub use range::{update_valid_range, RoiValidRange};
pub use search::{find_stripe_index, SearchFrom};
