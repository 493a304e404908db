//! Edge-aware region growing and depth-band classification.
//!
//! The grower flood-fills the candidate mask with a 4-connected BFS,
//! refusing to propagate through edge pixels, and classifies every
//! absorbed pixel into a depth band. At most one blob survives per frame:
//! the first grown region that reaches the minimum hand size.

use ndarray::Array2;
use tracing::debug;

use crate::config::GrowConfig;
use crate::frame::PixelClass;

/// Cross-frame state owned by the grower: the previous frame's retained
/// blob centroid, in (row, col) order, used only as a seed-order hint.
/// A moving hand is usually still near its last position, so trying this
/// seed first converges faster and is less likely to re-discover a
/// smaller irrelevant blob.
#[derive(Clone, Debug, Default)]
pub struct GrowerContext {
    pub centroid: Option<(f64, f64)>,
}

/// Statistics of the retained blob.
#[derive(Clone, Debug)]
pub struct BlobStats {
    /// Absorbed pixel count, including band-less (Background-labeled)
    /// absorbed pixels.
    pub size: usize,
    /// First-order moment centroid in (row, col) order.
    pub centroid: (f64, f64),
    /// Bounding box as (min_row, max_row, min_col, max_col).
    pub bbox: (usize, usize, usize, usize),
}

/// Result of one frame's growth pass.
#[derive(Clone, Debug)]
pub struct GrowResult {
    /// Per-pixel classification; all-Background when no blob qualified.
    pub labels: Array2<PixelClass>,
    /// The retained blob, if any region reached the minimum size.
    pub blob: Option<BlobStats>,
}

/// Accumulator for one BFS region.
struct Region {
    pixels: Vec<(usize, usize)>,
    sum_row: f64,
    sum_col: f64,
    bbox: (usize, usize, usize, usize),
}

impl Region {
    fn new() -> Self {
        Self {
            pixels: Vec::new(),
            sum_row: 0.0,
            sum_col: 0.0,
            bbox: (usize::MAX, 0, usize::MAX, 0),
        }
    }

    fn absorb(&mut self, row: usize, col: usize) {
        self.pixels.push((row, col));
        self.sum_row += row as f64;
        self.sum_col += col as f64;
        self.bbox.0 = self.bbox.0.min(row);
        self.bbox.1 = self.bbox.1.max(row);
        self.bbox.2 = self.bbox.2.min(col);
        self.bbox.3 = self.bbox.3.max(col);
    }

    fn size(&self) -> usize {
        self.pixels.len()
    }

    fn centroid(&self) -> (f64, f64) {
        let n = self.pixels.len() as f64;
        (self.sum_row / n, self.sum_col / n)
    }
}

/// Grow and classify at most one blob from the current frame's masks.
///
/// Inputs are all at the downsampled resolution. The context's centroid
/// is tried as the first seed, then a raster scan covers the remaining
/// unvisited pixels. Each seed's region is grown to completion; the first
/// region whose size reaches `min_size_hand` is retained and no further
/// seeds are scanned. Undersized regions are reset to Background but stay
/// visited.
pub fn grow_region(
    candidate: &Array2<bool>,
    edges: &Array2<bool>,
    delta: &Array2<f32>,
    depth_stddev: &Array2<f32>,
    ctx: &mut GrowerContext,
    config: &GrowConfig,
) -> GrowResult {
    let (h, w) = candidate.dim();
    let mut labels = Array2::<PixelClass>::default((h, w));

    let candidates = candidate.iter().filter(|&&v| v).count();
    if candidates < config.early_reject_blob {
        debug!(candidates, "Early reject: too few candidate pixels");
        return GrowResult { labels, blob: None };
    }

    let mut visited = Array2::<bool>::from_elem((h, w), false);

    let hint = ctx.centroid.and_then(|(r, c)| {
        let row = r.round();
        let col = c.round();
        if row >= 0.0 && col >= 0.0 && (row as usize) < h && (col as usize) < w {
            Some((row as usize, col as usize))
        } else {
            None
        }
    });

    let seeds = hint
        .into_iter()
        .chain((0..h).flat_map(|row| (0..w).map(move |col| (row, col))));

    for seed in seeds {
        if visited[seed] {
            continue;
        }

        let region = flood(
            seed,
            candidate,
            edges,
            delta,
            depth_stddev,
            &mut visited,
            &mut labels,
            config,
        );

        if region.size() >= config.min_size_hand {
            let centroid = region.centroid();
            debug!(
                size = region.size(),
                row = centroid.0,
                col = centroid.1,
                "Blob accepted"
            );
            ctx.centroid = Some(centroid);
            let blob = BlobStats {
                size: region.size(),
                centroid,
                bbox: region.bbox,
            };
            return GrowResult {
                labels,
                blob: Some(blob),
            };
        }

        // Undersized: discard its labels, keep the visited marks.
        for &(row, col) in &region.pixels {
            labels[[row, col]] = PixelClass::Background;
        }
    }

    debug!("No blob reached minimum size");
    GrowResult { labels, blob: None }
}

/// One 4-connected BFS from a seed. Edge pixels are hard barriers: they
/// are marked visited but never labeled and never expanded, whether or
/// not they are candidates. Non-edge candidate pixels are absorbed and
/// expanded; non-edge non-candidate pixels just terminate the front.
#[allow(clippy::too_many_arguments)]
fn flood(
    seed: (usize, usize),
    candidate: &Array2<bool>,
    edges: &Array2<bool>,
    delta: &Array2<f32>,
    depth_stddev: &Array2<f32>,
    visited: &mut Array2<bool>,
    labels: &mut Array2<PixelClass>,
    config: &GrowConfig,
) -> Region {
    let (h, w) = candidate.dim();
    let mut region = Region::new();
    let mut queue = std::collections::VecDeque::new();

    visited[seed] = true;
    queue.push_back(seed);

    while let Some((row, col)) = queue.pop_front() {
        if edges[[row, col]] {
            continue;
        }
        if !candidate[[row, col]] {
            continue;
        }

        region.absorb(row, col);
        labels[[row, col]] = classify(delta[[row, col]], depth_stddev[[row, col]], config);

        for (nr, nc) in neighbors4(row, col, h, w) {
            if !visited[[nr, nc]] {
                visited[[nr, nc]] = true;
                queue.push_back((nr, nc));
            }
        }
    }

    region
}

/// Band classification of an absorbed pixel by its depth delta, ordered
/// deepest band first. A delta under the Tip floor still counts toward
/// blob size but carries no band label: it is the thinnest extremity
/// fringe, kept for bookkeeping only.
fn classify(delta: f32, stddev: f32, config: &GrowConfig) -> PixelClass {
    if delta >= config.hand_finger_depth_thresh {
        PixelClass::Hand
    } else if delta > config.finger_tip_depth_thresh {
        PixelClass::Finger
    } else if delta > config.tip_sigma_multiplier * stddev {
        PixelClass::Tip
    } else {
        PixelClass::Background
    }
}

fn neighbors4(
    row: usize,
    col: usize,
    h: usize,
    w: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let mut out = [(0usize, 0usize); 4];
    let mut n = 0;
    if row > 0 {
        out[n] = (row - 1, col);
        n += 1;
    }
    if row + 1 < h {
        out[n] = (row + 1, col);
        n += 1;
    }
    if col > 0 {
        out[n] = (row, col - 1);
        n += 1;
    }
    if col + 1 < w {
        out[n] = (row, col + 1);
        n += 1;
    }
    out.into_iter().take(n)
}
