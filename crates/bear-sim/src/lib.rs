//! The hungry-bear simulation: random scenarios, solved with A*, played back
//! one step at a time to any number of observers.
//!
//! - [`ScenarioBuilder`] applies placement [`Provider`]s to a fresh grid.
//! - [`Controller`] runs the build/search/animate cycle and hands a
//!   [`Snapshot`] to its [`SnapshotSink`] after every visible change.
//! - [`Broadcaster`] is the sink that fans frames out to attached
//!   subscribers.
//! - [`ControllerHandle`] runs a controller on its own thread and stops it
//!   through a shared [`Context`].

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod scenario;
pub mod sink;
pub mod snapshot;

pub use config::SimConfig;
pub use context::Context;
pub use controller::{Controller, ControllerHandle, CycleOutcome};
pub use error::{SimError, SimResult};
pub use scenario::{AgentProvider, GoalProvider, ObstacleProvider, Provider, ScenarioBuilder};
pub use sink::{Broadcaster, NoopSink, SnapshotSink, SubscriberId};
pub use snapshot::Snapshot;
