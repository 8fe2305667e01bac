//! Core library for the Sortify visualizer.
//!
//! The crate runs classic sorting algorithms through an instrumented
//! accessor so that every comparison and move is counted, paced and
//! reported to observers. Modules follow the flow of a run: the
//! [`SequenceStore`] holds values, the [`PacingController`] turns a speed
//! setting into checkpoint delays, the [`ArrayAccessor`] is the only way an
//! [`Algorithm`] touches the sequence, and the [`RunController`] ties one run
//! together and reports its [`RunOutcome`].

pub mod accessor;
pub mod algorithms;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod export;
pub mod pacing;
pub mod sequence;
pub mod visual;

pub use accessor::{ArrayAccessor, RunContext, RunMetrics};
pub use algorithms::{Algorithm, AlgorithmInfo};
pub use config::{GenerationConfig, PacingConfig, VisualizerConfig};
pub use controller::{RunController, RunOutcome, RunPhase, RunStatus, Triggers};
pub use error::{Result, SortifyError};
pub use events::{tone_hz, NullObserver, ObserverSet, RunObserver, StepEvent};
pub use export::{ExportMetrics, ExportSnapshot, DEFAULT_EXPORT_FILE};
pub use pacing::{Clock, Pacer, PacingController, RunSignals, SystemClock, Unpaced};
pub use sequence::SequenceStore;
pub use visual::{Highlight, VisualState};
