mod common;

use nalgebra::Matrix3;

use tactus_core::calib::Calibration;
use tactus_core::config::{BaselineConfig, TouchConfig};
use tactus_core::frame::{Frame, PixelClass};
use tactus_core::pipeline::TouchPipeline;
use tactus_core::source::{Acquisition, FrameSource};

use common::{flat_frame, stamp_circle, VecSource};

const H: usize = 64;
const W: usize = 64;
const SURFACE_DEPTH: f32 = 800.0;

/// Warm-up frames with alternating +-5mm depth noise, so the baseline has
/// a nonzero stddev (~5.3) and a flat live frame is not foreground.
fn warmup_frames(n: usize) -> Vec<Option<Frame>> {
    (0..n)
        .map(|i| {
            let v = if i % 2 == 0 {
                SURFACE_DEPTH - 5.0
            } else {
                SURFACE_DEPTH + 5.0
            };
            Some(flat_frame(H, W, v, 80.0))
        })
        .collect()
}

/// A contact frame: a finger disk pressed 30mm above the surface with a
/// small fingertip bump at 12mm beside it.
fn contact_frame(finger_center: (usize, usize), tip_center: (usize, usize)) -> Frame {
    let mut frame = flat_frame(H, W, SURFACE_DEPTH, 80.0);
    stamp_circle(&mut frame, finger_center, 15, SURFACE_DEPTH - 30.0);
    stamp_circle(&mut frame, tip_center, 3, SURFACE_DEPTH - 12.0);
    frame
}

fn test_config() -> TouchConfig {
    TouchConfig {
        baseline: BaselineConfig {
            sample_count: 10,
            downsample_factor: 1,
        },
        ..TouchConfig::default()
    }
}

#[test]
fn test_end_to_end_touch_detection() {
    let mut frames = warmup_frames(10);
    // Tip bump just outside the finger disk, 4-connected to it.
    frames.push(Some(contact_frame((32, 28), (32, 47))));
    let mut source = VecSource::new((H, W), frames);

    let calibration = Calibration::new(
        Matrix3::new(1.0, 0.0, 1000.0, 0.0, 1.0, 2000.0, 0.0, 0.0, 1.0),
        W as u32,
        H as u32,
    );

    let mut pipeline =
        TouchPipeline::warm_up(&mut source, test_config(), calibration).unwrap();

    let frame = match source.acquire().unwrap() {
        Acquisition::Pair(frame) => frame,
        other => panic!("expected a frame, got {other:?}"),
    };
    let result = pipeline.process(&frame);

    let blob = result.blob.expect("contact should be detected");
    assert!(blob.size > 500);

    // The finger disk classifies as Finger, the bump as Tip.
    let finger = result
        .labels
        .iter()
        .filter(|&&l| l == PixelClass::Finger)
        .count();
    let tip = result
        .labels
        .iter()
        .filter(|&&l| l == PixelClass::Tip)
        .count();
    assert!(finger > 600, "finger pixels: {finger}");
    assert!(tip > 10, "tip pixels: {tip}");

    // One fingertip, translated by the homography.
    assert_eq!(result.tips.len(), 1);
    let tp = result.tips[0];
    assert!((tp.x - (47.0 + 1000.0)).abs() < 1.5, "x = {}", tp.x);
    assert!((tp.y - (32.0 + 2000.0)).abs() < 1.5, "y = {}", tp.y);
}

#[test]
fn test_no_contact_frame_is_all_background() {
    let mut frames = warmup_frames(10);
    frames.push(Some(flat_frame(H, W, SURFACE_DEPTH, 80.0)));
    let mut source = VecSource::new((H, W), frames);

    let mut pipeline = TouchPipeline::warm_up(
        &mut source,
        test_config(),
        Calibration::identity(W as u32, H as u32),
    )
    .unwrap();

    let frame = match source.acquire().unwrap() {
        Acquisition::Pair(frame) => frame,
        other => panic!("expected a frame, got {other:?}"),
    };
    let result = pipeline.process(&frame);

    assert!(result.blob.is_none());
    assert!(result.tips.is_empty());
    assert!(result
        .labels
        .iter()
        .all(|&l| l == PixelClass::Background));
}

#[test]
fn test_centroid_carries_across_frames() {
    let mut frames = warmup_frames(10);
    frames.push(Some(contact_frame((32, 28), (32, 47))));
    frames.push(Some(contact_frame((33, 29), (33, 48))));
    let mut source = VecSource::new((H, W), frames);

    let mut pipeline = TouchPipeline::warm_up(
        &mut source,
        test_config(),
        Calibration::identity(W as u32, H as u32),
    )
    .unwrap();

    for expected_row in [32.0f64, 33.0] {
        let frame = match source.acquire().unwrap() {
            Acquisition::Pair(frame) => frame,
            other => panic!("expected a frame, got {other:?}"),
        };
        let result = pipeline.process(&frame);
        let blob = result.blob.expect("contact in both frames");
        assert!((blob.centroid.0 - expected_row).abs() < 1.5);
    }
}

#[test]
fn test_rebuild_baseline_resets_session() {
    let mut frames = warmup_frames(10);
    frames.extend(warmup_frames(10));
    frames.push(Some(contact_frame((32, 28), (32, 47))));
    let mut source = VecSource::new((H, W), frames);

    let mut pipeline = TouchPipeline::warm_up(
        &mut source,
        test_config(),
        Calibration::identity(W as u32, H as u32),
    )
    .unwrap();

    pipeline.rebuild_baseline(&mut source).unwrap();

    let frame = match source.acquire().unwrap() {
        Acquisition::Pair(frame) => frame,
        other => panic!("expected a frame, got {other:?}"),
    };
    let result = pipeline.process(&frame);
    assert!(result.blob.is_some());
}
