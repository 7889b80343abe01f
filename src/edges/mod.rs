//! Sub-stripe localisation of a material/background edge.
//!
//! The stripe classification only knows which stripe borders the material.
//! [`EdgeCalculator`] refines that to a fitted line: it slides a small window
//! along columns of the search region, starting inside the background stripe
//! and moving towards the material, and records the first window whose mean
//! exceeds the material threshold. The samples are trimmed of outliers and
//! fitted with the slope of the stripe midline.
//!
//! Window sums are read from a [`SummedAreaTable`](crate::image::SummedAreaTable)
//! built once per call over the searched rows.

pub mod calculator;

pub use calculator::{BackgroundPosition, EdgeCalculator};
