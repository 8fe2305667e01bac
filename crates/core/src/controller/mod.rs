use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    pacing::validate_speed, Algorithm, ArrayAccessor, Clock, ExportSnapshot, ObserverSet,
    PacingController, Result, RunContext, RunMetrics, RunObserver, RunSignals, SequenceStore,
    SortifyError, StepEvent, SystemClock, VisualState, VisualizerConfig,
};

/// Whether a run is in progress. Completed and failed runs return to `Idle`
/// immediately; how they ended is recorded in [`RunOutcome::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Idle,
    Running,
}

/// Which UI triggers are enabled for the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Triggers {
    pub generate: bool,
    pub start: bool,
    pub pause: bool,
}

impl Triggers {
    fn for_phase(phase: RunPhase) -> Self {
        let idle = phase == RunPhase::Idle;
        Self {
            generate: idle,
            start: idle,
            pause: !idle,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Cancelled,
    Failed(String),
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub algorithm: Algorithm,
    pub status: RunStatus,
    pub metrics: RunMetrics,
    pub elapsed_ms: u64,
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// Orchestrates runs over a single sequence store. Share it behind an `Arc`:
/// one thread drives `start_run` while others pause, cancel or inspect it.
pub struct RunController {
    config: VisualizerConfig,
    store: Mutex<SequenceStore>,
    phase: Mutex<RunPhase>,
    last_run: Mutex<Option<RunOutcome>>,
    observers: Mutex<ObserverSet>,
    rng: Mutex<StdRng>,
    signals: RunSignals,
    clock: Arc<dyn Clock>,
}

impl RunController {
    /// Creates a controller that paces runs in real time.
    pub fn new(config: VisualizerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a controller whose pacing waits on the provided clock.
    pub fn with_clock(config: VisualizerConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.generation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let signals = RunSignals::new(config.pacing.default_speed);
        Self {
            config,
            store: Mutex::new(SequenceStore::new()),
            phase: Mutex::new(RunPhase::Idle),
            last_run: Mutex::new(None),
            observers: Mutex::new(ObserverSet::new()),
            rng: Mutex::new(rng),
            signals,
            clock,
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Registers a sink for visual and step events of every later run.
    pub fn subscribe(&self, observer: Box<dyn RunObserver + Send>) -> Result<()> {
        self.lock_observers()?.push(observer);
        Ok(())
    }

    /// Handle for pausing, cancelling and re-speeding runs from elsewhere.
    pub fn controls(&self) -> RunSignals {
        self.signals.clone()
    }

    pub fn set_pause(&self, paused: bool) {
        self.signals.set_paused(paused);
    }

    pub fn cancel(&self) {
        self.signals.cancel();
    }

    pub fn phase(&self) -> Result<RunPhase> {
        Ok(*self.lock_phase()?)
    }

    pub fn triggers(&self) -> Result<Triggers> {
        Ok(Triggers::for_phase(self.phase()?))
    }

    /// Current working sequence.
    pub fn sequence(&self) -> Result<Vec<u32>> {
        Ok(self.lock_store()?.values().to_vec())
    }

    pub fn last_run(&self) -> Result<Option<RunOutcome>> {
        Ok(self.lock_last_run()?.clone())
    }

    /// Replaces the sequence and its snapshot with `size` random values.
    pub fn generate(&self, size: usize) -> Result<Vec<u32>> {
        let _phase = self.idle_phase()?;
        let mut rng = self.lock_rng()?;
        let mut store = self.lock_store()?;
        let values = store
            .generate(size, &self.config.generation, &mut *rng)?
            .to_vec();
        *self.lock_last_run()? = None;
        tracing::debug!(size, "generated sequence");
        Ok(values)
    }

    /// Replaces the sequence and its snapshot with explicit values.
    pub fn load(&self, values: Vec<u32>) -> Result<()> {
        let _phase = self.idle_phase()?;
        self.lock_store()?.load(values);
        *self.lock_last_run()? = None;
        Ok(())
    }

    /// Restores the sequence from its snapshot and clears the last run.
    pub fn reset(&self) -> Result<Vec<u32>> {
        let _phase = self.idle_phase()?;
        let values = self.lock_store()?.reset().to_vec();
        *self.lock_last_run()? = None;
        tracing::debug!(len = values.len(), "sequence reset to snapshot");
        Ok(values)
    }

    /// Pure data projection of the snapshot, current values and last run.
    pub fn export_snapshot(&self) -> Result<ExportSnapshot> {
        let store = self.lock_store()?;
        let last_run = self.lock_last_run()?;
        Ok(ExportSnapshot::new(
            store.original(),
            store.values(),
            last_run.as_ref(),
        ))
    }

    /// Parses `selector` and runs that algorithm at `speed`.
    pub fn start_run(&self, selector: &str, speed: f64) -> Result<RunOutcome> {
        let algorithm: Algorithm = selector.parse()?;
        self.run(algorithm, speed)
    }

    /// Runs `algorithm` over the current sequence, blocking until it
    /// completes, fails or is cancelled. Starting while another run is in
    /// progress is rejected.
    pub fn run(&self, algorithm: Algorithm, speed: f64) -> Result<RunOutcome> {
        validate_speed(speed)?;
        let _running = RunningGuard::acquire(&self.phase)?;
        self.signals.begin_run(speed);

        let outcome = self.execute(algorithm)?;
        *self.lock_last_run()? = Some(outcome.clone());
        Ok(outcome)
    }

    fn execute(&self, algorithm: Algorithm) -> Result<RunOutcome> {
        let before = self.lock_store()?.values().to_vec();
        let mut values = before.clone();
        let mut observers = ObserverSlot::take(&self.observers)?;
        let mut sinks = LiveSequence {
            store: &self.store,
            observers: &mut observers.set,
        };
        let mut pacer = PacingController::new(
            self.config.pacing.clone(),
            self.signals.clone(),
            Arc::clone(&self.clock),
        );

        tracing::info!(%algorithm, len = values.len(), speed = self.signals.speed(), "run started");
        let started = Instant::now();
        let start_failure = guarded(|| sinks.on_run_started(algorithm, &values)).err();

        let (status, metrics) = {
            let mut ctx = RunContext::new(values.len(), &mut pacer, &mut sinks);
            let status = match start_failure {
                Some(reason) => RunStatus::Failed(reason),
                None => match guarded(|| {
                    let mut acc = ArrayAccessor::new(&mut values, &mut ctx);
                    algorithm.run(&mut acc)
                }) {
                    Ok(Ok(())) => RunStatus::Completed,
                    Ok(Err(SortifyError::Cancelled)) => RunStatus::Cancelled,
                    Ok(Err(err)) => RunStatus::Failed(err.to_string()),
                    Err(reason) => RunStatus::Failed(reason),
                },
            };

            let settled = if status == RunStatus::Completed {
                guarded(|| ctx.settle_sorted())
            } else {
                tracing::debug!(%algorithm, "clearing transient highlights");
                guarded(|| ctx.clear_transient())
            };
            if ctx.out_of_range_accesses() > 0 {
                tracing::warn!(
                    %algorithm,
                    count = ctx.out_of_range_accesses(),
                    "run issued out-of-range accesses"
                );
            }
            let status = match settled {
                Err(reason) if status == RunStatus::Completed => RunStatus::Failed(reason),
                _ => status,
            };
            (status, ctx.metrics())
        };

        let mut outcome = RunOutcome {
            algorithm,
            status,
            metrics,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        if let Err(reason) = guarded(|| sinks.on_run_finished(&outcome)) {
            outcome.status = RunStatus::Failed(reason);
        }

        // Partially executed runs are not guaranteed to hold a permutation of
        // the snapshot, so anything short of completion rolls the live
        // mirror back.
        self.lock_store()?.commit(if outcome.is_completed() {
            values
        } else {
            before
        });

        match &outcome.status {
            RunStatus::Completed => tracing::info!(
                %algorithm,
                comparisons = metrics.comparisons,
                swaps = metrics.swaps,
                elapsed_ms = outcome.elapsed_ms,
                "run completed"
            ),
            RunStatus::Cancelled => tracing::info!(%algorithm, "run cancelled"),
            RunStatus::Failed(reason) => tracing::warn!(%algorithm, reason = %reason, "run failed"),
        }
        Ok(outcome)
    }

    /// Locks the phase for the duration of a sequence edit, rejecting the
    /// edit while a run is in progress.
    fn idle_phase(&self) -> Result<MutexGuard<'_, RunPhase>> {
        let phase = self.lock_phase()?;
        match *phase {
            RunPhase::Idle => Ok(phase),
            RunPhase::Running => Err(SortifyError::AlreadyRunning),
        }
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, SequenceStore>> {
        self.store
            .lock()
            .map_err(|_| SortifyError::msg("sequence store has been poisoned"))
    }

    fn lock_phase(&self) -> Result<MutexGuard<'_, RunPhase>> {
        lock_phase(&self.phase)
    }

    fn lock_last_run(&self) -> Result<MutexGuard<'_, Option<RunOutcome>>> {
        self.last_run
            .lock()
            .map_err(|_| SortifyError::msg("run history has been poisoned"))
    }

    fn lock_observers(&self) -> Result<MutexGuard<'_, ObserverSet>> {
        lock_observers(&self.observers)
    }

    fn lock_rng(&self) -> Result<MutexGuard<'_, StdRng>> {
        self.rng
            .lock()
            .map_err(|_| SortifyError::msg("random generator has been poisoned"))
    }
}

impl std::fmt::Debug for RunController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunController")
            .field("config", &self.config)
            .field("signals", &self.signals)
            .finish_non_exhaustive()
    }
}

fn lock_phase(phase: &Mutex<RunPhase>) -> Result<MutexGuard<'_, RunPhase>> {
    phase
        .lock()
        .map_err(|_| SortifyError::msg("run phase has been poisoned"))
}

fn lock_observers(observers: &Mutex<ObserverSet>) -> Result<MutexGuard<'_, ObserverSet>> {
    observers
        .lock()
        .map_err(|_| SortifyError::msg("observer list has been poisoned"))
}

/// The subscribers of one run, taken out of the controller and put back on
/// every exit path. Observers subscribed during the run are kept after them.
struct ObserverSlot<'a> {
    slot: &'a Mutex<ObserverSet>,
    set: ObserverSet,
}

impl<'a> ObserverSlot<'a> {
    fn take(slot: &'a Mutex<ObserverSet>) -> Result<Self> {
        let set = std::mem::take(&mut *lock_observers(slot)?);
        Ok(Self { slot, set })
    }
}

impl Drop for ObserverSlot<'_> {
    fn drop(&mut self) {
        if let Ok(mut current) = self.slot.lock() {
            let mut set = std::mem::take(&mut self.set);
            set.append(std::mem::take(&mut *current));
            *current = set;
        }
    }
}

/// Mirrors every swap and write into the store before forwarding the event,
/// so the store and every subscriber agree on the values mid-run.
struct LiveSequence<'a> {
    store: &'a Mutex<SequenceStore>,
    observers: &'a mut ObserverSet,
}

impl LiveSequence<'_> {
    fn mirror(&self, apply: impl FnOnce(&mut SequenceStore)) {
        match self.store.lock() {
            Ok(mut store) => apply(&mut store),
            Err(_) => tracing::warn!("sequence store has been poisoned, live view is stale"),
        }
    }
}

impl RunObserver for LiveSequence<'_> {
    fn on_run_started(&mut self, algorithm: Algorithm, values: &[u32]) {
        self.observers.on_run_started(algorithm, values);
    }

    fn on_visual(&mut self, index: usize, state: VisualState) {
        self.observers.on_visual(index, state);
    }

    fn on_step(&mut self, event: &StepEvent) {
        match *event {
            StepEvent::Swapped { left, right, .. } => self.mirror(|store| store.swap(left, right)),
            StepEvent::ValueSet { index, value } => self.mirror(|store| store.set(index, value)),
            _ => {}
        }
        self.observers.on_step(event);
    }

    fn on_run_finished(&mut self, outcome: &RunOutcome) {
        self.observers.on_run_finished(outcome);
    }
}

/// Runs `f`, turning a panic into a readable failure reason.
fn guarded<T>(f: impl FnOnce() -> T) -> std::result::Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_reason(payload.as_ref()))
}

/// Holds the phase at `Running` and returns it to `Idle` on every exit path.
struct RunningGuard<'a> {
    phase: &'a Mutex<RunPhase>,
}

impl<'a> RunningGuard<'a> {
    fn acquire(phase: &'a Mutex<RunPhase>) -> Result<Self> {
        let mut current = lock_phase(phase)?;
        if *current == RunPhase::Running {
            return Err(SortifyError::AlreadyRunning);
        }
        *current = RunPhase::Running;
        Ok(Self { phase })
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut current) = self.phase.lock() {
            *current = RunPhase::Idle;
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("engine panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("engine panicked: {message}")
    } else {
        "engine panicked".to_string()
    }
}
