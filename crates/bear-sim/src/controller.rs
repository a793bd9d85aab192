//! The simulation controller: build a scenario, solve it, animate the bear.
//!
//! One cycle moves through these phases:
//!
//! ```text
//! Building -> Searching -> Announcing -> Advancing* -> Settling -> (done)
//!                  \
//!                   `-> (unsolvable, done)
//! ```
//!
//! [`Controller::run`] repeats cycles until its [`Context`] is cancelled.
//! Unsolvable scenarios are discarded silently and a new one is built; that
//! retry is part of the simulation, not error recovery.

use std::collections::VecDeque;
use std::thread::{self, JoinHandle};

use bear_core::{CellState, Grid, Point, Range};
use bear_paths::{PathRange, SearchResult};
use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;
use crate::context::Context;
use crate::error::{SimError, SimResult};
use crate::scenario::ScenarioBuilder;
use crate::sink::SnapshotSink;
use crate::snapshot::Snapshot;

/// How a single cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No route from bear to honey; the scenario was discarded.
    Unsolvable,
    /// The bear walked the whole path.
    Completed { steps: usize },
    /// Cancellation stopped the walk part-way.
    Interrupted { steps: usize },
}

enum Phase {
    Building,
    Searching(Grid),
    Announcing(Grid, Vec<Point>),
    Advancing {
        grid: Grid,
        path: VecDeque<Point>,
        steps: usize,
    },
    Settling(Grid, usize),
    Done(CycleOutcome),
}

/// Drives the build/search/animate loop and publishes every visible change.
pub struct Controller<S, R = StdRng> {
    config: SimConfig,
    builder: ScenarioBuilder,
    pathfinder: PathRange,
    sink: S,
    rng: R,
    cycles: u64,
}

impl<S: SnapshotSink> Controller<S, StdRng> {
    /// A controller for the standard scenario, seeded from `config.seed` or
    /// from the OS when no seed is set.
    pub fn new(config: SimConfig, sink: S) -> SimResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::with_rng(config, sink, rng)
    }
}

impl<S: SnapshotSink, R: Rng> Controller<S, R> {
    /// A controller for the standard scenario driven by `rng`.
    pub fn with_rng(config: SimConfig, sink: S, rng: R) -> SimResult<Self> {
        let builder = ScenarioBuilder::from_config(&config);
        Self::with_builder(config, builder, sink, rng)
    }

    /// A controller with a custom scenario builder.
    ///
    /// The builder must produce grids of the configured size and place
    /// exactly one [`CellState::AgentOnEmpty`] and one
    /// [`CellState::GoalOnEmpty`] cell.
    pub fn with_builder(
        config: SimConfig,
        builder: ScenarioBuilder,
        sink: S,
        rng: R,
    ) -> SimResult<Self> {
        config.validate()?;
        let (width, height) = builder.size();
        if (width, height) != (config.width, config.height) {
            return Err(SimError::Config(format!(
                "scenario builder makes {width}x{height} grids, configured for {}x{}",
                config.width, config.height
            )));
        }
        let pathfinder = PathRange::new(Range::sized(config.width, config.height));
        Ok(Self {
            config,
            builder,
            pathfinder,
            sink,
            rng,
            cycles: 0,
        })
    }

    /// Cycles started so far, solvable or not.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run cycles until `ctx` is cancelled or a fatal error occurs.
    pub fn run(&mut self, ctx: &Context) -> SimResult<()> {
        info!(
            "simulation started: {}x{} grid, {} obstacles",
            self.config.width, self.config.height, self.config.obstacle_count
        );
        while !ctx.is_done() {
            if let Err(e) = self.run_cycle(ctx) {
                error!("simulation stopped: {e}");
                return Err(e);
            }
        }
        info!("simulation stopped after {} cycles", self.cycles);
        Ok(())
    }

    /// Run exactly one cycle.
    pub fn run_cycle(&mut self, ctx: &Context) -> SimResult<CycleOutcome> {
        self.cycles += 1;
        let mut phase = Phase::Building;
        loop {
            phase = match self.advance(phase, ctx)? {
                Phase::Done(outcome) => return Ok(outcome),
                next => next,
            };
        }
    }

    fn advance(&mut self, phase: Phase, ctx: &Context) -> SimResult<Phase> {
        let next = match phase {
            Phase::Building => Phase::Searching(self.builder.build(&mut self.rng)?),

            Phase::Searching(grid) => {
                let start = grid
                    .find_one(CellState::AgentOnEmpty)
                    .ok_or(SimError::MissingCell(CellState::AgentOnEmpty))?;
                let goal = grid
                    .find_one(CellState::GoalOnEmpty)
                    .ok_or(SimError::MissingCell(CellState::GoalOnEmpty))?;
                let blocked = grid.find_all(CellState::Obstacle);
                match self.pathfinder.search(start, goal, blocked) {
                    SearchResult::Found(path) => {
                        debug!(
                            "cycle {}: path of {} steps from {start} to {goal}",
                            self.cycles,
                            path.len()
                        );
                        Phase::Announcing(grid, path)
                    }
                    SearchResult::NoPathFound => {
                        debug!(
                            "cycle {}: no path from {start} to {goal}, rebuilding",
                            self.cycles
                        );
                        Phase::Done(CycleOutcome::Unsolvable)
                    }
                }
            }

            Phase::Announcing(mut grid, path) => {
                self.emit(&grid);
                ctx.sleep(self.config.dwell());

                // The goal keeps its own marker; everything before it is trail.
                let trail = &path[..path.len().saturating_sub(1)];
                grid.set_many(trail, CellState::Path);
                grid.replace(CellState::AgentOnEmpty, CellState::AgentOnPath);
                grid.replace(CellState::GoalOnEmpty, CellState::GoalOnPath);
                self.emit(&grid);
                ctx.sleep(self.config.dwell());

                Phase::Advancing {
                    grid,
                    path: path.into(),
                    steps: 0,
                }
            }

            Phase::Advancing {
                mut grid,
                mut path,
                mut steps,
            } => {
                while !ctx.is_done() {
                    let Some(next) = path.pop_front() else {
                        break;
                    };
                    grid.replace(CellState::AgentOnPath, CellState::Path);
                    grid.set(next, CellState::AgentOnPath);
                    steps += 1;
                    trace!("cycle {}: step {steps} to {next}", self.cycles);
                    self.emit(&grid);
                    ctx.sleep(self.config.step());
                }
                if path.is_empty() {
                    Phase::Settling(grid, steps)
                } else {
                    debug!("cycle {}: interrupted after {steps} steps", self.cycles);
                    Phase::Done(CycleOutcome::Interrupted { steps })
                }
            }

            Phase::Settling(mut grid, steps) => {
                grid.replace(CellState::AgentOnPath, CellState::AgentOnEmpty);
                self.emit(&grid);
                ctx.sleep(self.config.dwell());
                Phase::Done(CycleOutcome::Completed { steps })
            }

            Phase::Done(outcome) => Phase::Done(outcome),
        };
        Ok(next)
    }

    fn emit(&self, grid: &Grid) {
        self.sink.publish(&Snapshot::of(grid));
    }
}

// ---------------------------------------------------------------------------
// ControllerHandle
// ---------------------------------------------------------------------------

/// A controller running on its own worker thread.
///
/// [`stop`](ControllerHandle::stop) cancels the worker and blocks until it
/// has left its loop. Dropping the handle does the same.
pub struct ControllerHandle {
    ctx: Context,
    handle: Option<JoinHandle<SimResult<()>>>,
}

impl ControllerHandle {
    /// Spawn `controller` on a dedicated `simulation` thread.
    pub fn spawn<S, R>(mut controller: Controller<S, R>) -> SimResult<Self>
    where
        S: SnapshotSink + Send + 'static,
        R: Rng + Send + 'static,
    {
        let ctx = Context::new();
        let worker_ctx = ctx.clone();
        let handle = thread::Builder::new()
            .name("simulation".into())
            .spawn(move || controller.run(&worker_ctx))?;
        Ok(Self {
            ctx,
            handle: Some(handle),
        })
    }

    /// The worker's stop signal.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Whether the worker has exited, on its own or after a stop.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Signal the worker and wait for it to exit, returning its result.
    pub fn stop(mut self) -> SimResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> SimResult<()> {
        self.ctx.cancel();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| SimError::WorkerPanicked)?,
            None => Ok(()),
        }
    }
}

impl Drop for ControllerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use super::*;
    use crate::scenario::Provider;
    use crate::sink::Broadcaster;

    #[derive(Default)]
    struct Recorder {
        frames: Mutex<Vec<Snapshot>>,
    }

    impl Recorder {
        fn frames(&self) -> Vec<Snapshot> {
            self.frames.lock().unwrap().clone()
        }
    }

    impl SnapshotSink for Recorder {
        fn publish(&self, snapshot: &Snapshot) {
            self.frames.lock().unwrap().push(snapshot.clone());
        }
    }

    /// Places a fixed layout, ignoring the RNG.
    struct Fixed(Vec<(Point, CellState)>);

    impl Provider for Fixed {
        fn apply(&self, grid: &mut Grid, _rng: &mut dyn Rng, _max: usize) -> SimResult<()> {
            for &(p, s) in &self.0 {
                grid.set(p, s);
            }
            Ok(())
        }
    }

    fn instant_config(width: i32, height: i32) -> SimConfig {
        SimConfig {
            width,
            height,
            obstacle_count: 0,
            dwell_ms: 0,
            step_ms: 0,
            seed: Some(1),
            ..SimConfig::default()
        }
    }

    /// 5x5 grid, a wall at x = 2 with one gap at (2, 3).
    fn wall_controller(sink: Arc<Recorder>) -> Controller<Arc<Recorder>> {
        let mut layout = vec![
            (Point::new(0, 0), CellState::AgentOnEmpty),
            (Point::new(4, 0), CellState::GoalOnEmpty),
        ];
        for y in [0, 1, 2, 4] {
            layout.push((Point::new(2, y), CellState::Obstacle));
        }
        let config = instant_config(5, 5);
        let builder = ScenarioBuilder::new(5, 5, 10).with_provider(Fixed(layout));
        Controller::with_builder(config, builder, sink, StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn solved_cycle_publishes_every_phase() {
        let sink = Arc::new(Recorder::default());
        let mut c = wall_controller(Arc::clone(&sink));
        let outcome = c.run_cycle(&Context::new()).unwrap();
        assert_eq!(outcome, CycleOutcome::Completed { steps: 10 });

        let frames = sink.frames();
        // before, marked path, ten steps, settled
        assert_eq!(frames.len(), 13);

        let before = &frames[0];
        assert_eq!(before.get(Point::new(0, 0)), Some(CellState::AgentOnEmpty));
        assert_eq!(before.get(Point::new(4, 0)), Some(CellState::GoalOnEmpty));
        assert_eq!(before.count(CellState::Path), 0);

        let marked = &frames[1];
        assert_eq!(marked.count(CellState::Path), 9);
        assert_eq!(marked.get(Point::new(0, 0)), Some(CellState::AgentOnPath));
        assert_eq!(marked.get(Point::new(4, 0)), Some(CellState::GoalOnPath));
        assert_eq!(marked.get(Point::new(2, 3)), Some(CellState::Path));

        for step in &frames[2..12] {
            assert_eq!(step.count(CellState::AgentOnPath), 1);
            assert_eq!(step.count(CellState::Obstacle), 4);
        }
        assert_eq!(frames[2].get(Point::new(0, 0)), Some(CellState::Path));
        assert_eq!(frames[11].get(Point::new(4, 0)), Some(CellState::AgentOnPath));
        assert_eq!(frames[11].count(CellState::GoalOnPath), 0);

        let settled = &frames[12];
        assert_eq!(settled.get(Point::new(4, 0)), Some(CellState::AgentOnEmpty));
        assert_eq!(settled.count(CellState::AgentOnPath), 0);
    }

    #[test]
    fn each_step_moves_one_cell() {
        let sink = Arc::new(Recorder::default());
        let mut c = wall_controller(Arc::clone(&sink));
        c.run_cycle(&Context::new()).unwrap();
        let frames = sink.frames();
        let positions: Vec<Point> = frames[1..12]
            .iter()
            .map(|f| f.find_one(CellState::AgentOnPath).unwrap())
            .collect();
        for w in positions.windows(2) {
            assert!(w[0].is_adjacent_4(w[1]));
        }
        assert!(positions.iter().all(|p| p.x != 2 || p.y == 3));
    }

    #[test]
    fn unsolvable_cycle_publishes_nothing() {
        let sink = Arc::new(Recorder::default());
        let mut layout = vec![
            (Point::new(0, 0), CellState::AgentOnEmpty),
            (Point::new(2, 0), CellState::GoalOnEmpty),
        ];
        for y in 0..3 {
            layout.push((Point::new(1, y), CellState::Obstacle));
        }
        let builder = ScenarioBuilder::new(3, 3, 10).with_provider(Fixed(layout));
        let mut c = Controller::with_builder(
            instant_config(3, 3),
            builder,
            Arc::clone(&sink),
            StdRng::seed_from_u64(2),
        )
        .unwrap();
        assert_eq!(c.run_cycle(&Context::new()).unwrap(), CycleOutcome::Unsolvable);
        assert!(sink.frames().is_empty());
        assert_eq!(c.cycles(), 1);
    }

    #[test]
    fn cancelled_context_interrupts_the_walk() {
        let sink = Arc::new(Recorder::default());
        let mut c = wall_controller(Arc::clone(&sink));
        let ctx = Context::new();
        ctx.cancel();
        let outcome = c.run_cycle(&ctx).unwrap();
        assert_eq!(outcome, CycleOutcome::Interrupted { steps: 0 });
        // Only the two announcement frames went out.
        assert_eq!(sink.frames().len(), 2);
    }

    #[test]
    fn missing_bear_is_an_error() {
        let builder = ScenarioBuilder::new(3, 3, 10)
            .with_provider(Fixed(vec![(Point::new(1, 1), CellState::GoalOnEmpty)]));
        let mut c = Controller::with_builder(
            instant_config(3, 3),
            builder,
            crate::sink::NoopSink,
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        assert!(matches!(
            c.run_cycle(&Context::new()),
            Err(SimError::MissingCell(CellState::AgentOnEmpty))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig {
            width: 2,
            height: 2,
            obstacle_count: 3,
            ..SimConfig::default()
        };
        assert!(matches!(
            Controller::new(config, crate::sink::NoopSink),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn builder_larger_than_config_is_rejected() {
        // Bear and honey side by side, but outside a 5x5 search range.
        let builder = ScenarioBuilder::new(10, 10, 10).with_provider(Fixed(vec![
            (Point::new(7, 7), CellState::AgentOnEmpty),
            (Point::new(8, 7), CellState::GoalOnEmpty),
        ]));
        let result = Controller::with_builder(
            instant_config(5, 5),
            builder,
            crate::sink::NoopSink,
            StdRng::seed_from_u64(4),
        );
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn random_cycles_keep_one_bear_and_static_trees() {
        let sink = Arc::new(Recorder::default());
        let config = SimConfig {
            width: 12,
            height: 8,
            obstacle_count: 25,
            dwell_ms: 0,
            step_ms: 0,
            seed: Some(11),
            ..SimConfig::default()
        };
        let mut c = Controller::new(config, Arc::clone(&sink)).unwrap();
        let ctx = Context::new();
        let mut completed = 0;
        for _ in 0..30 {
            let before = sink.frames().len();
            match c.run_cycle(&ctx).unwrap() {
                CycleOutcome::Completed { steps } => {
                    completed += 1;
                    let frames = &sink.frames()[before..];
                    assert_eq!(frames.len(), steps + 3);
                    for f in frames {
                        assert_eq!(f.count(CellState::Obstacle), 25);
                        let bears = f.count(CellState::AgentOnEmpty) + f.count(CellState::AgentOnPath);
                        assert_eq!(bears, 1);
                    }
                }
                CycleOutcome::Unsolvable => assert_eq!(sink.frames().len(), before),
                CycleOutcome::Interrupted { .. } => unreachable!("context never cancelled"),
            }
        }
        assert!(completed > 0);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = || {
            let sink = Arc::new(Recorder::default());
            let config = SimConfig {
                width: 10,
                height: 6,
                obstacle_count: 15,
                dwell_ms: 0,
                step_ms: 0,
                seed: Some(42),
                ..SimConfig::default()
            };
            let mut c = Controller::new(config, Arc::clone(&sink)).unwrap();
            for _ in 0..5 {
                c.run_cycle(&Context::new()).unwrap();
            }
            sink.frames()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn stop_right_after_start_returns_promptly() {
        // Production pacing: two-second dwells, half-second steps.
        let config = SimConfig {
            seed: Some(5),
            ..SimConfig::default()
        };
        let step = config.step();
        let c = Controller::new(config, crate::sink::NoopSink).unwrap();
        let handle = ControllerHandle::spawn(c).unwrap();
        let start = Instant::now();
        handle.stop().unwrap();
        assert!(start.elapsed() < step + Duration::from_millis(250));
    }

    #[test]
    fn stop_mid_animation_returns_promptly() {
        let config = SimConfig {
            width: 10,
            height: 10,
            obstacle_count: 5,
            dwell_ms: 20,
            step_ms: 200,
            seed: Some(8),
            ..SimConfig::default()
        };
        let step = config.step();
        let broadcaster = Arc::new(Broadcaster::new());
        let (_, rx) = broadcaster.attach();
        let c = Controller::new(config, Arc::clone(&broadcaster)).unwrap();
        let handle = ControllerHandle::spawn(c).unwrap();

        // Announcement, marked path, first step.
        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
        }
        assert!(!handle.is_finished());
        let start = Instant::now();
        handle.stop().unwrap();
        assert!(start.elapsed() < step + Duration::from_millis(250));
    }

    #[test]
    fn fatal_placement_error_ends_the_worker() {
        let config = instant_config(2, 2);
        // Four trees in a 2x2 grid leave no room for the bear.
        let trees = Range::sized(2, 2).iter().map(|p| (p, CellState::Obstacle)).collect();
        let builder = ScenarioBuilder::new(2, 2, 20)
            .with_provider(Fixed(trees))
            .with_provider(crate::scenario::AgentProvider);
        let c = Controller::with_builder(
            config,
            builder,
            crate::sink::NoopSink,
            StdRng::seed_from_u64(4),
        )
        .unwrap();
        let handle = ControllerHandle::spawn(c).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(handle.is_finished());
        assert!(matches!(
            handle.stop(),
            Err(SimError::PlacementExhausted {
                state: CellState::AgentOnEmpty,
                ..
            })
        ));
    }

    #[test]
    fn dropping_the_handle_stops_the_worker() {
        let broadcaster = Arc::new(Broadcaster::new());
        let (_, rx) = broadcaster.attach();
        let config = SimConfig {
            width: 8,
            height: 8,
            obstacle_count: 4,
            dwell_ms: 1,
            step_ms: 1,
            seed: Some(3),
            ..SimConfig::default()
        };
        let c = Controller::new(config, Arc::clone(&broadcaster)).unwrap();
        let handle = ControllerHandle::spawn(c).unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        drop(handle);
        // Joined: whatever was queued is all there will ever be.
        let _ = rx.try_iter().count();
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(rx.try_iter().count(), 0);
    }
}
