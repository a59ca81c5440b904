//! Voxel grid holding the target, current and state fields of a surface net.
//!
//! Cells are stored x-fastest: `i = (z * res_y + y) * res_x + x`.

use nalgebra::Point3;

use crate::config::SurfaceNetConfig;

/// State value of a cell that is not growing.
pub const IDLE: f32 = -1.0;

#[derive(Debug, Clone)]
pub struct VoxelGrid {
    res: [usize; 3],
    /// Cells in one z slice.
    level: usize,
    len: usize,
    pub target: Vec<f32>,
    pub current: Vec<f32>,
    pub state: Vec<f32>,
    coords: Option<Vec<[usize; 3]>>,
    limit_max: f32,
    limit_min: f32,
}

/// Linear index to cell coordinates for a grid of resolution `res`.
fn delinearize(res: [usize; 3], i: usize) -> [usize; 3] {
    let x = i % res[0];
    let yz = i / res[0];
    [x, yz % res[1], yz / res[1]]
}

/// Every cell coordinate in index order.
pub fn make_coords(res: [usize; 3]) -> Vec<[usize; 3]> {
    let len = res[0] * res[1] * res[2];
    (0..len).map(|i| delinearize(res, i)).collect()
}

impl VoxelGrid {
    /// A cubic grid sized and bounded by `config`, every cell outside and idle.
    pub fn new(config: &SurfaceNetConfig) -> Self {
        let n = config.grid_size;
        Self::with_resolution([n, n, n], config.limit_min, config.limit_max, config.use_coords)
    }

    pub fn with_resolution(res: [usize; 3], limit_min: f32, limit_max: f32, use_coords: bool) -> Self {
        let level = res[0] * res[1];
        let len = level * res[2];
        Self {
            res,
            level,
            len,
            target: vec![limit_max; len],
            current: vec![limit_max; len],
            state: vec![IDLE; len],
            coords: use_coords.then(|| make_coords(res)),
            limit_max,
            limit_min,
        }
    }

    pub fn resolution(&self) -> [usize; 3] {
        self.res
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z * self.level + y * self.res[0] + x
    }

    pub fn coords(&self, i: usize) -> [usize; 3] {
        match &self.coords {
            Some(list) => list[i],
            None => delinearize(self.res, i),
        }
    }

    /// Cell centre in grid units.
    pub fn position(&self, i: usize) -> Point3<f64> {
        let [x, y, z] = self.coords(i);
        Point3::new(x as f64, y as f64, z as f64)
    }

    /// Geometric centre of the grid in grid units.
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.res[0] as f64 - 1.0) * 0.5,
            (self.res[1] as f64 - 1.0) * 0.5,
            (self.res[2] as f64 - 1.0) * 0.5,
        )
    }

    /// Face-adjacent cells that lie inside the grid.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        let [x, y, z] = self.coords(i);
        let [rx, ry, rz] = self.res;
        let candidates = [
            (x > 0).then(|| i - 1),
            (x + 1 < rx).then(|| i + 1),
            (y > 0).then(|| i - rx),
            (y + 1 < ry).then(|| i + rx),
            (z > 0).then(|| i - self.level),
            (z + 1 < rz).then(|| i + self.level),
        ];
        candidates.into_iter().flatten()
    }

    pub fn is_active(&self, i: usize) -> bool {
        self.state[i] >= 0.0
    }

    pub fn active_count(&self) -> usize {
        self.state.iter().filter(|&&s| s >= 0.0).count()
    }

    /// Whether a cell still has somewhere to go.
    pub fn is_settled(&self, i: usize) -> bool {
        self.current[i] == self.target[i]
    }

    /// Seed a ball in the middle of the grid.
    ///
    /// Targets become the distance to a sphere of radius `min(res) / 4`,
    /// clamped to the grid limits, so the inside reaches `limit_min`. Only
    /// the centre cell starts growing; the rest is woken by its neighbours.
    pub fn make_ball(&mut self) {
        let min_res = self.res.iter().copied().min().unwrap_or(0);
        let radius = min_res as f64 * 0.25;
        let center = self.center();

        for i in 0..self.len {
            let d = (self.position(i) - center).norm();
            self.target[i] = ((d - radius) as f32).clamp(self.limit_min, self.limit_max);
        }

        let [rx, ry, rz] = self.res;
        if self.len > 0 {
            let seed = self.index(rx / 2, ry / 2, rz / 2);
            if !self.is_settled(seed) {
                self.state[seed] = 0.0;
            }
        }
    }
}
