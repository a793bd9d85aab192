//! Random scenario construction.
//!
//! A scenario is built by applying an ordered list of [`Provider`]s to a
//! fresh [`Grid`]. Providers never coordinate directly; each one only claims
//! cells that are still [`CellState::Empty`], so applying them one after
//! another can never overwrite an earlier placement.

use bear_core::{CellState, Grid, Point};
use log::debug;
use rand::{Rng, RngExt};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

/// Sample uniformly random points until one is empty, then claim it.
///
/// Gives up with [`SimError::PlacementExhausted`] after `max_attempts`
/// samples.
pub fn place<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    state: CellState,
    max_attempts: usize,
) -> SimResult<Point> {
    for _ in 0..max_attempts {
        let p = Point::new(
            rng.random_range(0..grid.width()),
            rng.random_range(0..grid.height()),
        );
        if grid.get(p) == CellState::Empty {
            grid.set(p, state);
            return Ok(p);
        }
    }
    Err(SimError::PlacementExhausted {
        state,
        attempts: max_attempts,
    })
}

/// A placement policy applied to a grid under construction.
pub trait Provider: Send {
    /// Mutate `grid`, claiming only empty cells.
    fn apply(&self, grid: &mut Grid, rng: &mut dyn Rng, max_attempts: usize) -> SimResult<()>;
}

/// Places the bear on open ground.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentProvider;

impl Provider for AgentProvider {
    fn apply(&self, grid: &mut Grid, rng: &mut dyn Rng, max_attempts: usize) -> SimResult<()> {
        place(grid, rng, CellState::AgentOnEmpty, max_attempts).map(|_| ())
    }
}

/// Places the honey on open ground.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalProvider;

impl Provider for GoalProvider {
    fn apply(&self, grid: &mut Grid, rng: &mut dyn Rng, max_attempts: usize) -> SimResult<()> {
        place(grid, rng, CellState::GoalOnEmpty, max_attempts).map(|_| ())
    }
}

/// Scatters a fixed number of trees.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleProvider {
    pub count: usize,
}

impl ObstacleProvider {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl Provider for ObstacleProvider {
    fn apply(&self, grid: &mut Grid, rng: &mut dyn Rng, max_attempts: usize) -> SimResult<()> {
        for _ in 0..self.count {
            place(grid, rng, CellState::Obstacle, max_attempts)?;
        }
        Ok(())
    }
}

/// Builds fresh grids by applying providers in order.
pub struct ScenarioBuilder {
    width: i32,
    height: i32,
    max_attempts: usize,
    providers: Vec<Box<dyn Provider>>,
}

impl ScenarioBuilder {
    /// An empty builder: grids come out all [`CellState::Empty`] until
    /// providers are added.
    pub fn new(width: i32, height: i32, max_attempts: usize) -> Self {
        Self {
            width,
            height,
            max_attempts,
            providers: Vec::new(),
        }
    }

    /// The standard scenario: bear, then honey, then trees.
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.width, config.height, config.max_placement_attempts)
            .with_provider(AgentProvider)
            .with_provider(GoalProvider)
            .with_provider(ObstacleProvider::new(config.obstacle_count))
    }

    /// Append a provider (builder).
    pub fn with_provider(mut self, provider: impl Provider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Width and height of every grid this builder produces.
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Number of providers applied per build.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Build a new grid.
    pub fn build<R: Rng>(&self, rng: &mut R) -> SimResult<Grid> {
        let mut grid = Grid::new(self.width, self.height);
        for provider in &self.providers {
            provider.apply(&mut grid, rng, self.max_attempts)?;
        }
        debug!(
            "built {}x{} scenario with {} providers",
            self.width,
            self.height,
            self.providers.len()
        );
        Ok(grid)
    }
}
