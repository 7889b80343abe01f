//! JSON configuration for the seam engine and the demo tool.
//!
//! Modules
//! - [`sequence`] – image list and output paths of the `seam_sequence` tool.

pub mod sequence;

use crate::detector::DetectionParams;
use crate::seam::{sanitize_threshold, SeamConfig, StartEndDetectionInSeam};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete parameter set of a [`StartEndDetectionInSeam`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeamDetectorConfig {
    pub seam: SeamConfig,
    pub detection: DetectionParams,
}

impl SeamDetectorConfig {
    /// Engine configured from these parameters, with out-of-range grey
    /// thresholds replaced by the default.
    pub fn build(&self) -> StartEndDetectionInSeam {
        let mut detection = self.detection.clone();
        detection.stripe.threshold_material = sanitize_threshold(detection.stripe.threshold_material);
        detection.stripe.threshold_background =
            sanitize_threshold(detection.stripe.threshold_background);
        detection.thresh_material_for_edge_recognition =
            sanitize_threshold(detection.thresh_material_for_edge_recognition);
        StartEndDetectionInSeam::new(self.seam.clone(), detection)
    }
}

pub fn load_config(path: &Path) -> Result<SeamDetectorConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
