//! Time-driven growth of a surface net's scalar field.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{AnimateMode, SurfaceNetConfig};
use crate::error::SnetResult;
use crate::grid::{VoxelGrid, IDLE};
use crate::mesh::Mesh;
use crate::surface::extract_surface;

/// A surface net: the voxel grid plus its growth clock.
///
/// Every growing cell moves its current value toward its target by one
/// `step_size` per increment. `state_length` increments take `grow_time`
/// seconds. Passing the halfway increment wakes the cell's unsettled
/// neighbours, so growth spreads outward from the seed.
#[derive(Debug, Clone)]
pub struct SurfaceNet {
    config: SurfaceNetConfig,
    grid: VoxelGrid,
    growing: bool,
    /// Indices of cells with a growth state, in no particular order.
    active: Vec<usize>,
    /// Fraction of an increment carried over between steps.
    carry: f64,
    elapsed: Duration,
    steps: u64,
}

impl SurfaceNet {
    /// Create a net with a seeded ball and growth pending.
    ///
    /// In [`AnimateMode::Instant`] and [`AnimateMode::Animate`] the net is
    /// grown to completion before returning.
    pub fn new(config: SurfaceNetConfig) -> SnetResult<Self> {
        config.validate()?;
        let started = Instant::now();

        let mut grid = VoxelGrid::new(&config);
        grid.make_ball();
        let active: Vec<usize> = (0..grid.len()).filter(|&i| grid.is_active(i)).collect();
        let growing = !active.is_empty();

        if config.debug {
            debug!(
                cells = grid.len(),
                coords = config.use_coords,
                elapsed_us = started.elapsed().as_micros() as u64,
                "Built surface net grid"
            );
        }

        let mut net = Self {
            config,
            grid,
            growing,
            active,
            carry: 0.0,
            elapsed: Duration::ZERO,
            steps: 0,
        };
        if net.config.animate != AnimateMode::Redraw {
            net.run_to_completion();
        }
        Ok(net)
    }

    pub fn config(&self) -> &SurfaceNetConfig {
        &self.config
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn is_growing(&self) -> bool {
        self.growing
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Scene-update hook: step when still growing in
    /// [`AnimateMode::Redraw`]. Returns whether growth continues.
    pub fn update(&mut self, elapsed: Duration) -> bool {
        if self.growing && self.config.animate == AnimateMode::Redraw {
            self.grow_step(elapsed);
        }
        self.growing
    }

    /// Advance growth by `elapsed` wall time. At least one increment is
    /// applied per call.
    pub fn grow_step(&mut self, elapsed: Duration) {
        if !self.growing {
            return;
        }
        let per_increment = self.config.grow_time / f64::from(self.config.state_length);
        let exact = elapsed.as_secs_f64() / per_increment + self.carry;
        let increments = exact.floor().max(1.0);
        self.carry = (exact - increments).max(0.0);

        for _ in 0..increments as u64 {
            if !self.increment() {
                break;
            }
        }
        self.elapsed += elapsed;
        self.steps += 1;

        if self.config.debug {
            debug!(
                step = self.steps,
                increments = increments as u64,
                active = self.active.len(),
                "Grow step"
            );
        }
        if !self.growing {
            info!(steps = self.steps, elapsed_s = self.elapsed.as_secs_f64(), "Surface net finished growing");
        }
    }

    /// Apply one increment to every growing cell. Returns whether anything
    /// is still growing afterwards.
    fn increment(&mut self) -> bool {
        let step = self.config.step_size();
        let half = self.config.state_half() as f32;
        let grid = &mut self.grid;

        let active = std::mem::take(&mut self.active);
        let mut next = Vec::with_capacity(active.len());
        let mut woken = Vec::new();

        for i in active {
            let delta = grid.target[i] - grid.current[i];
            if delta.abs() <= step {
                grid.current[i] = grid.target[i];
            } else {
                grid.current[i] += step.copysign(delta);
            }

            let before = grid.state[i];
            grid.state[i] += 1.0;
            let settled = grid.is_settled(i);
            // A cell that settles early still hands growth on.
            if before < half && (grid.state[i] >= half || settled) {
                woken.extend(grid.neighbors(i).filter(|&n| !grid.is_active(n) && !grid.is_settled(n)));
            }
            if settled {
                grid.state[i] = IDLE;
            } else {
                next.push(i);
            }
        }

        for n in woken {
            if !grid.is_active(n) && !grid.is_settled(n) {
                grid.state[n] = 0.0;
                next.push(n);
            }
        }

        self.active = next;
        self.growing = !self.active.is_empty();
        self.growing
    }

    /// Grow with fixed one-increment steps until no cell is active.
    ///
    /// Returns the number of steps taken. Bounded by the number of increments
    /// the slowest possible growth front could need.
    pub fn run_to_completion(&mut self) -> u64 {
        let per_increment = Duration::from_secs_f64(self.config.grow_time / f64::from(self.config.state_length));
        let limit = (self.grid.len() as u64 + 1) * u64::from(self.config.state_length);
        let started = self.steps;
        while self.growing && self.steps - started < limit {
            self.grow_step(per_increment);
        }
        self.steps - started
    }

    /// Mesh the current field.
    pub fn to_mesh(&self) -> SnetResult<Mesh> {
        let started = Instant::now();
        let mesh = extract_surface(&self.grid, self.config.center_object)?;
        if self.config.debug {
            debug!(
                polygons = mesh.polygons.len(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "Extracted surface"
            );
        }
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(n: usize) -> SurfaceNetConfig {
        SurfaceNetConfig::default().grid_size(n).debug(false).state_length(10)
    }

    #[test]
    fn new_net_starts_growing() {
        let net = SurfaceNet::new(config(8)).unwrap();
        assert!(net.is_growing());
        assert_eq!(net.steps(), 0);
        assert_eq!(net.grid().active_count(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(SurfaceNet::new(config(1)).is_err());
        assert!(SurfaceNet::new(config(2)).is_err());
    }

    #[test]
    fn smallest_grid_still_meshes() {
        let net = SurfaceNet::new(config(SurfaceNetConfig::MIN_GRID_SIZE).animate(AnimateMode::Instant)).unwrap();
        assert!(!net.to_mesh().unwrap().polygons.is_empty());
    }

    #[test]
    fn growth_spreads_from_the_seed() {
        let mut net = SurfaceNet::new(config(8)).unwrap();
        let step = Duration::from_secs_f64(0.1);
        for _ in 0..6 {
            net.grow_step(step);
        }
        assert!(net.grid().active_count() > 1);
    }

    #[test]
    fn growth_reaches_every_target() {
        let mut net = SurfaceNet::new(config(8)).unwrap();
        let steps = net.run_to_completion();
        assert!(steps > 0);
        assert!(!net.is_growing());
        let grid = net.grid();
        for i in 0..grid.len() {
            assert_eq!(grid.current[i], grid.target[i], "cell {i} unsettled");
            assert!(!grid.is_active(i));
        }
    }

    #[test]
    fn large_elapsed_applies_many_increments() {
        let mut slow = SurfaceNet::new(config(8)).unwrap();
        let mut fast = SurfaceNet::new(config(8)).unwrap();
        slow.grow_step(Duration::from_millis(100));
        fast.grow_step(Duration::from_millis(1000));
        let moved = |net: &SurfaceNet| {
            let g = net.grid();
            (0..g.len()).filter(|&i| g.current[i] != 1.0).count()
        };
        assert!(moved(&fast) > moved(&slow));
    }

    #[test]
    fn update_skips_pregrown_nets() {
        let mut net = SurfaceNet::new(config(6).animate(AnimateMode::Animate)).unwrap();
        assert!(!net.is_growing());
        let steps = net.steps();
        assert!(!net.update(Duration::from_secs(1)));
        assert_eq!(net.steps(), steps);

        let mut live = SurfaceNet::new(config(6)).unwrap();
        assert!(live.update(Duration::from_millis(10)));
        assert_eq!(live.steps(), 1);
    }

    #[test]
    fn instant_net_is_grown_before_new_returns() {
        let mut net = SurfaceNet::new(config(8).animate(AnimateMode::Instant)).unwrap();
        assert!(!net.is_growing());
        assert!(net.steps() > 0);
        let grid = net.grid();
        assert_eq!(grid.active_count(), 0);
        for i in 0..grid.len() {
            assert_eq!(grid.current[i], grid.target[i], "cell {i} unsettled");
        }

        let steps = net.steps();
        assert!(!net.update(Duration::from_millis(1)));
        assert_eq!(net.steps(), steps);
    }

    #[test]
    fn active_list_matches_grid_state() {
        let mut net = SurfaceNet::new(config(10)).unwrap();
        let step = Duration::from_millis(50);
        while net.is_growing() {
            net.grow_step(step);
            let mut listed = net.active.clone();
            listed.sort_unstable();
            let grid = net.grid();
            let scanned: Vec<usize> = (0..grid.len()).filter(|&i| grid.is_active(i)).collect();
            assert_eq!(listed, scanned, "after step {}", net.steps());
        }
        assert!(net.active.is_empty());
    }
}
