use super::SeamDetectorConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of the `seam_sequence` tool.
#[derive(Debug, Deserialize)]
pub struct SequenceToolConfig {
    /// Frames of one seam in acquisition order.
    pub images: Vec<PathBuf>,
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
    #[serde(default)]
    pub detector: SeamDetectorConfig,
    pub output: SequenceOutputConfig,
}

/// How image counters map to positions along the seam.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Distance travelled between two frames.
    pub trigger_distance_mm: f64,
    pub pixel_to_mm: f64,
    /// Origin of the frames on the sensor.
    pub offset_x: i32,
    pub offset_y: i32,
    /// Full sensor height; `0` uses the frame height.
    pub sensor_image_height: i32,
    /// Expected frame count of the seam. When set together with
    /// `images_at_border`, frames in the middle of the seam are taken as
    /// full material without being analysed.
    pub num_triggers: Option<i32>,
    pub images_at_border: Option<i32>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            trigger_distance_mm: 1.0,
            pixel_to_mm: 1.0,
            offset_x: 0,
            offset_y: 0,
            sensor_image_height: 0,
            num_triggers: None,
            images_at_border: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SequenceOutputConfig {
    /// Per-frame reports and the seam summary.
    pub report_json: PathBuf,
    /// Offset passed to the valid-range computation of every frame.
    #[serde(default)]
    pub valid_range_offset: i32,
}

pub fn load_config(path: &Path) -> Result<SequenceToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
