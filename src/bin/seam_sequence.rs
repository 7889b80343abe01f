use start_end_detector::config::sequence::{load_config, SequenceToolConfig};
use start_end_detector::diagnostics::{ImageReport, SeamReport, SeamSummary, TimingBreakdown};
use start_end_detector::image::io::{load_grayscale_image, write_json_file};
use start_end_detector::seam::seam_position_info;
use start_end_detector::types::InputImageContext;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    if config.images.is_empty() {
        return Err("Config lists no images".to_string());
    }

    let mut seam = config.detector.build();
    let mut images = Vec::with_capacity(config.images.len());
    let mut timings = TimingBreakdown::default();

    for (index, path) in config.images.iter().enumerate() {
        let gray = load_grayscale_image(path)?;
        let counter = index as i32;
        let context = frame_context(&config, counter, gray.height());
        if let (Some(num_triggers), Some(at_border)) = (
            config.acquisition.num_triggers,
            config.acquisition.images_at_border,
        ) {
            seam.update_on_seam_position_info(seam_position_info(counter, num_triggers, at_border));
        }

        let view = gray.as_view();
        timings
            .measure(format!("frame {counter}"), || seam.process(&view, context))
            .map_err(|e| format!("Failed to process {}: {e}", path.display()))?;

        let report = ImageReport::capture(&seam, config.output.valid_range_offset);
        println!(
            "{:>4} {:<24} {:?}",
            counter,
            report.seam_state.to_string(),
            report.evaluation
        );
        images.push(report);
    }

    let summary = SeamSummary::capture(&seam, true);
    println!("{}", seam.state_summary());
    match (summary.start_misalignment_mm, summary.end_misalignment_mm) {
        (Some(start), Some(end)) => println!("Misalignment start {start:.3} mm, end {end:.3} mm"),
        (Some(start), None) => println!("Misalignment start {start:.3} mm, end not found"),
        (None, Some(end)) => println!("Misalignment start not found, end {end:.3} mm"),
        (None, None) => println!("No edge pair found"),
    }

    let report = SeamReport {
        images,
        summary,
        timings,
    };
    write_json_file(&config.output.report_json, &report)?;
    println!(
        "Saved report for {} frames to {} ({:.2} ms/frame)",
        report.images.len(),
        config.output.report_json.display(),
        report.timings.mean_ms()
    );

    Ok(())
}

fn frame_context(config: &SequenceToolConfig, counter: i32, frame_height: usize) -> InputImageContext {
    let acq = &config.acquisition;
    let sensor_image_height = if acq.sensor_image_height > 0 {
        acq.sensor_image_height
    } else {
        frame_height as i32
    };
    InputImageContext {
        image_counter: counter,
        image_position_mm: f64::from(counter) * acq.trigger_distance_mm,
        pixel_to_mm: acq.pixel_to_mm,
        offset_x: acq.offset_x,
        offset_y: acq.offset_y,
        sensor_image_height,
    }
}

fn usage() -> String {
    "Usage: seam_sequence <config.json>".to_string()
}
