//! Level geometry of the warping pyramid.
//!
//! Level `d` has size `ceil(nx·eta^d) × ceil(ny·eta^d)` and grid spacing
//! `hx·nx/nx_d`, `hy·ny/ny_d`, so physical displacements keep their meaning
//! on every level. The schedule is built once and walked coarsest first.
use log::warn;
use serde::Serialize;

/// Smallest side length a reduced level may have.
const MIN_LEVEL_SIZE: usize = 4;

/// Number of pyramid levels an `nx × ny` image supports for ratio `eta`.
///
/// Counts reductions until either side would drop below 4 pixels, backing
/// off one level when a side collapsed all the way to a single pixel.
pub fn compute_max_warp_levels(nx: usize, ny: usize, eta: f32) -> usize {
    let eta = eta as f64;
    let mut i = 1usize;
    let (mut nx_i, mut ny_i);
    loop {
        let factor = eta.powi(i as i32);
        nx_i = reduced_size(nx, factor);
        ny_i = reduced_size(ny, factor);
        if nx_i < MIN_LEVEL_SIZE || ny_i < MIN_LEVEL_SIZE {
            break;
        }
        i += 1;
    }
    if nx_i == 1 || ny_i == 1 {
        i -= 1;
    }
    i
}

#[inline]
fn reduced_size(n: usize, factor: f64) -> usize {
    (n as f64 * factor).ceil() as usize
}

/// Geometry of one pyramid level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    /// 0 is the finest (input) level
    pub depth: usize,
    pub nx: usize,
    pub ny: usize,
    pub hx: f32,
    pub hy: f32,
}

/// Levels to visit, coarsest first.
#[derive(Clone, Debug)]
pub struct WarpSchedule {
    pub levels: Vec<LevelDescriptor>,
}

impl WarpSchedule {
    /// Build the schedule for an `nx × ny` image with spacing `(hx, hy)`.
    ///
    /// The level count is `min(requested, supported)`, never below one.
    pub fn new(nx: usize, ny: usize, hx: f32, hy: f32, eta: f32, requested: usize) -> Self {
        if nx < MIN_LEVEL_SIZE || ny < MIN_LEVEL_SIZE {
            warn!(
                "image {nx}x{ny} is below {0}x{0}; solving on one level",
                MIN_LEVEL_SIZE
            );
        }
        let supported = compute_max_warp_levels(nx, ny, eta).max(1);
        let count = requested.min(supported).max(1);
        let eta = eta as f64;

        let levels = (0..count)
            .rev()
            .map(|depth| {
                if depth == 0 {
                    return LevelDescriptor { depth, nx, ny, hx, hy };
                }
                let factor = eta.powi(depth as i32);
                let nx_d = reduced_size(nx, factor).max(1);
                let ny_d = reduced_size(ny, factor).max(1);
                LevelDescriptor {
                    depth,
                    nx: nx_d,
                    ny: ny_d,
                    hx: hx * nx as f32 / nx_d as f32,
                    hy: hy * ny as f32 / ny_d as f32,
                }
            })
            .collect();
        Self { levels }
    }

    /// Index of the finest level.
    pub fn max_depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_levels_for_square_power_of_two() {
        assert_eq!(compute_max_warp_levels(64, 64, 0.5), 5);
        assert_eq!(compute_max_warp_levels(640, 480, 0.5), 8);
    }

    #[test]
    fn collapsed_side_backs_off_one_level() {
        // 2x2 reduces straight to 1x1, 8x2 to 4x1.
        assert_eq!(compute_max_warp_levels(2, 2, 0.5), 0);
        assert_eq!(compute_max_warp_levels(8, 2, 0.5), 0);
        assert_eq!(compute_max_warp_levels(7, 7, 0.5), 2);
    }

    #[test]
    fn schedule_runs_coarse_to_fine() {
        let s = WarpSchedule::new(64, 48, 1.0, 1.0, 0.5, 200);
        assert_eq!(s.len(), compute_max_warp_levels(64, 48, 0.5));
        let first = s.levels[0];
        let last = s.levels[s.max_depth()];
        assert_eq!(first.depth, s.max_depth());
        assert_eq!((last.nx, last.ny, last.hx, last.hy), (64, 48, 1.0, 1.0));
        for pair in s.levels.windows(2) {
            assert!(pair[0].nx <= pair[1].nx && pair[0].ny <= pair[1].ny);
        }
        assert!(first.nx >= 4 && first.ny >= 4);
    }

    #[test]
    fn spacing_follows_the_reduction() {
        let s = WarpSchedule::new(10, 10, 1.0, 1.0, 0.5, 2);
        assert_eq!(s.len(), 2);
        let coarse = s.levels[0];
        assert_eq!((coarse.nx, coarse.ny), (5, 5));
        assert!((coarse.hx - 2.0).abs() < 1e-6);
    }

    #[test]
    fn tiny_images_get_a_single_level() {
        let s = WarpSchedule::new(2, 3, 1.0, 1.0, 0.5, 10);
        assert_eq!(s.len(), 1);
        assert_eq!(s.levels[0].depth, 0);
    }
}
