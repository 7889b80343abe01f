pub mod synthetic_image;

use start_end_detector::types::InputImageContext;

/// Route `log` output of the library through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Context of frame `counter` for a sensor triggered every `trigger_mm`.
pub fn context(counter: i32, trigger_mm: f64) -> InputImageContext {
    InputImageContext {
        image_counter: counter,
        image_position_mm: trigger_mm * f64::from(counter),
        pixel_to_mm: 1.0,
        offset_x: 0,
        offset_y: 0,
        sensor_image_height: 1024,
    }
}
