//! Fingertip extraction from a classified label image.
//!
//! Connected components of the Tip band are shape-filtered by their
//! image moments (area and covariance eccentricity), then the survivors'
//! centroids are rescaled to camera resolution and mapped through the
//! session homography.

use ndarray::Array2;

use crate::calib::Calibration;
use crate::config::TipConfig;
use crate::frame::{PixelClass, TipPoint};

/// Raw image moments of one connected component (unit pixel mass).
#[derive(Clone, Debug, Default)]
pub struct RawMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m11: f64,
    pub m20: f64,
    pub m02: f64,
}

impl RawMoments {
    fn add(&mut self, row: usize, col: usize) {
        // x = column, y = row, matching image coordinate convention.
        let x = col as f64;
        let y = row as f64;
        self.m00 += 1.0;
        self.m10 += x;
        self.m01 += y;
        self.m11 += x * y;
        self.m20 += x * x;
        self.m02 += y * y;
    }

    /// Centroid (x, y). None for an empty component.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Moment-derived shape descriptors of a component.
#[derive(Clone, Copy, Debug)]
pub struct ShapeStats {
    /// 4 * sqrt(|la * lb|), an ellipse-equivalent area.
    pub area: f64,
    /// sqrt(1 - lb/la) with la >= lb; 0 for a circle, ->1 when elongated.
    pub eccentricity: f64,
}

/// Derive area and eccentricity from the covariance eigenvalues of the
/// second central moments. Degenerate components (zero mass or a
/// collapsed major axis) yield None and are rejected by the caller
/// rather than propagating an arithmetic fault.
pub fn shape_stats(m: &RawMoments) -> Option<ShapeStats> {
    if m.m00 == 0.0 {
        return None;
    }
    let cx = m.m10 / m.m00;
    let cy = m.m01 / m.m00;
    let mu20 = m.m20 / m.m00 - cx * cx;
    let mu02 = m.m02 / m.m00 - cy * cy;
    let mu11 = m.m11 / m.m00 - cx * cy;

    let trace = mu20 + mu02;
    let root = (4.0 * mu11 * mu11 + (mu20 - mu02) * (mu20 - mu02)).sqrt();
    let la = 0.5 * (trace + root);
    let lb = 0.5 * (trace - root);

    if la <= 0.0 {
        return None;
    }

    Some(ShapeStats {
        area: 4.0 * (la * lb).abs().sqrt(),
        eccentricity: (1.0 - lb / la).max(0.0).sqrt(),
    })
}

/// Extract Tip-band connected components and their raw moments.
///
/// Two-pass labeling with union-find, 4-connectivity (left and upper
/// neighbors). Components are returned in raster order of their root
/// label's first pixel.
pub fn tip_components(labels: &Array2<PixelClass>) -> Vec<RawMoments> {
    let (h, w) = labels.dim();
    if h == 0 || w == 0 {
        return Vec::new();
    }

    let mut component = Array2::<u32>::zeros((h, w));
    let mut next_label: u32 = 1;
    // Union-find parent array. Index 0 unused; labels start at 1.
    let mut parent: Vec<u32> = vec![0; h * w / 2 + 2];

    // Pass 1: assign provisional labels.
    for row in 0..h {
        for col in 0..w {
            if labels[[row, col]] != PixelClass::Tip {
                continue;
            }

            let up = if row > 0 { component[[row - 1, col]] } else { 0 };
            let left = if col > 0 { component[[row, col - 1]] } else { 0 };

            match (up > 0, left > 0) {
                (false, false) => {
                    if next_label as usize >= parent.len() {
                        parent.resize(parent.len() * 2, 0);
                    }
                    parent[next_label as usize] = next_label;
                    component[[row, col]] = next_label;
                    next_label += 1;
                }
                (true, false) => {
                    component[[row, col]] = up;
                }
                (false, true) => {
                    component[[row, col]] = left;
                }
                (true, true) => {
                    let smaller = up.min(left);
                    let larger = up.max(left);
                    component[[row, col]] = smaller;
                    if smaller != larger {
                        union(&mut parent, smaller, larger);
                    }
                }
            }
        }
    }

    // Flatten parent references.
    for i in 1..next_label as usize {
        parent[i] = find(&parent, i as u32);
    }

    // Pass 2: resolve labels and accumulate moments, keyed by root in
    // first-seen (raster) order.
    let mut order: Vec<u32> = Vec::new();
    let mut moments = std::collections::HashMap::<u32, RawMoments>::new();

    for row in 0..h {
        for col in 0..w {
            let lbl = component[[row, col]];
            if lbl == 0 {
                continue;
            }
            let root = parent[lbl as usize];
            moments
                .entry(root)
                .or_insert_with(|| {
                    order.push(root);
                    RawMoments::default()
                })
                .add(row, col);
        }
    }

    order
        .into_iter()
        .filter_map(|root| moments.remove(&root))
        .collect()
}

/// Locate fingertip output points for one frame.
///
/// Components failing the area or eccentricity bounds (or degenerate
/// ones) contribute nothing. Surviving centroids are rescaled from the
/// downsampled grid back to camera pixels, then projected through the
/// calibration homography.
pub fn locate_tips(
    labels: &Array2<PixelClass>,
    downsample_factor: usize,
    calibration: &Calibration,
    config: &TipConfig,
) -> Vec<TipPoint> {
    let mut tips = Vec::new();

    for m in tip_components(labels) {
        let Some(stats) = shape_stats(&m) else {
            continue;
        };
        if stats.area < config.min_area || stats.area > config.max_area {
            continue;
        }
        if stats.eccentricity > config.max_eccentricity {
            continue;
        }
        let Some((cx, cy)) = m.centroid() else {
            continue;
        };

        let scale = downsample_factor as f64;
        let (x, y) = calibration.project(cx * scale, cy * scale);
        tips.push(TipPoint { x, y });
    }

    tips
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // Merge larger root into smaller root to keep labels consistent.
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}
