mod common;

use ndarray::Array2;

use tactus_core::calib::Calibration;
use tactus_core::config::TipConfig;
use tactus_core::frame::PixelClass;
use tactus_core::tip::{locate_tips, shape_stats, tip_components, RawMoments};

use common::circle_mask;

fn tip_labels(h: usize, w: usize, mask: &Array2<bool>) -> Array2<PixelClass> {
    Array2::from_shape_fn((h, w), |idx| {
        if mask[idx] {
            PixelClass::Tip
        } else {
            PixelClass::Background
        }
    })
}

#[test]
fn test_zero_mass_rejected() {
    assert!(shape_stats(&RawMoments::default()).is_none());
    assert!(RawMoments::default().centroid().is_none());
}

#[test]
fn test_single_pixel_degenerate() {
    // One pixel has zero second central moments: collapsed major axis,
    // rejected rather than divided through.
    let m = RawMoments {
        m00: 1.0,
        m10: 5.0,
        m01: 7.0,
        m11: 35.0,
        m20: 25.0,
        m02: 49.0,
    };
    assert!(shape_stats(&m).is_none());
}

#[test]
fn test_elongated_contour_rejected_by_eccentricity() {
    // A 1x20 line: minor eigenvalue 0, eccentricity 1 — over any sane
    // bound, so it contributes no output point.
    let mut mask = Array2::from_elem((10, 30), false);
    for col in 5..25 {
        mask[[4, col]] = true;
    }
    let labels = tip_labels(10, 30, &mask);

    let components = tip_components(&labels);
    assert_eq!(components.len(), 1);
    let stats = shape_stats(&components[0]).unwrap();
    assert!(stats.eccentricity > TipConfig::default().max_eccentricity);

    let calib = Calibration::identity(30, 10);
    let tips = locate_tips(&labels, 1, &calib, &TipConfig::default());
    assert!(tips.is_empty());
}

#[test]
fn test_round_contour_accepted() {
    // A disk of radius 4: near-zero eccentricity, area within bounds.
    let mask = circle_mask(20, 20, (10, 10), 4);
    let labels = tip_labels(20, 20, &mask);

    let components = tip_components(&labels);
    assert_eq!(components.len(), 1);
    let stats = shape_stats(&components[0]).unwrap();
    assert!(stats.eccentricity < 0.2);
    let config = TipConfig::default();
    assert!(stats.area >= config.min_area && stats.area <= config.max_area);

    let calib = Calibration::identity(20, 20);
    let tips = locate_tips(&labels, 1, &calib, &config);
    assert_eq!(tips.len(), 1);
    // Identity homography, factor 1: output is the (x, y) centroid.
    assert!((tips[0].x - 10.0).abs() < 1e-6);
    assert!((tips[0].y - 10.0).abs() < 1e-6);
}

#[test]
fn test_area_bounds_reject() {
    let mask = circle_mask(40, 40, (20, 20), 4);
    let labels = tip_labels(40, 40, &mask);
    let calib = Calibration::identity(40, 40);

    let too_small = TipConfig {
        min_area: 1_000.0,
        ..TipConfig::default()
    };
    assert!(locate_tips(&labels, 1, &calib, &too_small).is_empty());

    let too_big = TipConfig {
        max_area: 1.0,
        ..TipConfig::default()
    };
    assert!(locate_tips(&labels, 1, &calib, &too_big).is_empty());
}

#[test]
fn test_multiple_components_raster_order() {
    let mut mask = Array2::from_elem((30, 30), false);
    let upper = circle_mask(30, 30, (8, 8), 3);
    let lower = circle_mask(30, 30, (22, 22), 3);
    mask.zip_mut_with(&upper, |m, &c| *m = *m || c);
    mask.zip_mut_with(&lower, |m, &c| *m = *m || c);
    let labels = tip_labels(30, 30, &mask);

    let calib = Calibration::identity(30, 30);
    let tips = locate_tips(&labels, 1, &calib, &TipConfig::default());
    assert_eq!(tips.len(), 2);
    // Raster discovery order: the upper component first.
    assert!(tips[0].y < tips[1].y);
    assert!((tips[0].x - 8.0).abs() < 1e-6);
    assert!((tips[1].x - 22.0).abs() < 1e-6);
}

#[test]
fn test_only_tip_band_is_extracted() {
    // Hand/Finger pixels adjacent to Tip pixels are not part of the
    // contour.
    let mut labels = Array2::<PixelClass>::default((10, 10));
    for col in 2..8 {
        labels[[4, col]] = PixelClass::Finger;
    }
    let tip = circle_mask(10, 10, (6, 5), 2);
    for (idx, &t) in tip.indexed_iter() {
        if t {
            labels[idx] = PixelClass::Tip;
        }
    }

    let components = tip_components(&labels);
    assert_eq!(components.len(), 1);
    let expected = tip.iter().filter(|&&v| v).count() as f64;
    assert!((components[0].m00 - expected).abs() < 1e-9);
}

#[test]
fn test_downsample_rescale_and_homography() {
    // Factor 2 doubles the centroid back to camera pixels before the
    // homography translation is applied.
    let mask = circle_mask(20, 20, (10, 12), 4);
    let labels = tip_labels(20, 20, &mask);

    let mut calib = Calibration::identity(40, 40);
    calib.homography[(0, 2)] = 100.0;
    calib.homography[(1, 2)] = -50.0;

    let tips = locate_tips(&labels, 2, &calib, &TipConfig::default());
    assert_eq!(tips.len(), 1);
    assert!((tips[0].x - (24.0 + 100.0)).abs() < 1e-6);
    assert!((tips[0].y - (20.0 - 50.0)).abs() < 1e-6);
}
