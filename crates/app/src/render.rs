use std::io::Write;

use sortify_core::{tone_hz, Algorithm, Highlight, RunObserver, RunOutcome, StepEvent, VisualState};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Draws the sequence as a single line of bar glyphs, redrawn in place
/// whenever a value or a highlight changes.
pub struct TerminalRenderer<W: Write> {
    out: W,
    values: Vec<u32>,
    states: Vec<VisualState>,
    ceiling: u32,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            values: Vec::new(),
            states: Vec::new(),
            ceiling: 1,
        }
    }

    fn frame(&self) -> String {
        let mut line = String::from("\r");
        for (value, state) in self.values.iter().zip(&self.states) {
            let level = (u64::from(*value) * 7 / u64::from(self.ceiling)).min(7) as usize;
            line.push_str(colour(*state));
            line.push(BARS[level]);
        }
        line.push_str("\x1b[0m");
        line
    }

    fn draw(&mut self) {
        let frame = self.frame();
        if let Err(err) = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::debug!(%err, "failed to draw frame");
        }
    }
}

impl<W: Write> RunObserver for TerminalRenderer<W> {
    fn on_run_started(&mut self, _algorithm: Algorithm, values: &[u32]) {
        self.values = values.to_vec();
        self.states = vec![VisualState::DEFAULT; values.len()];
        self.ceiling = values.iter().copied().max().unwrap_or(1).max(1);
        self.draw();
    }

    fn on_visual(&mut self, index: usize, state: VisualState) {
        if let Some(slot) = self.states.get_mut(index) {
            *slot = state;
            self.draw();
        }
    }

    fn on_step(&mut self, event: &StepEvent) {
        match *event {
            StepEvent::Swapped { left, right, .. }
                if left < self.values.len() && right < self.values.len() =>
            {
                self.values.swap(left, right);
            }
            StepEvent::ValueSet { index, value } if index < self.values.len() => {
                self.values[index] = value;
            }
            _ => return,
        }
        self.draw();
    }

    fn on_run_finished(&mut self, _outcome: &RunOutcome) {
        self.draw();
        // raw terminal mode does not return the carriage on its own
        if let Err(err) = self.out.write_all(b"\r\n") {
            tracing::debug!(%err, "failed to finish frame");
        }
    }
}

/// ANSI colour for the most prominent highlight of a position.
fn colour(state: VisualState) -> &'static str {
    const PRIORITY: [(Highlight, &str); 5] = [
        (Highlight::Swapping, "\x1b[31m"),
        (Highlight::Comparing, "\x1b[33m"),
        (Highlight::Pivot, "\x1b[35m"),
        (Highlight::Current, "\x1b[36m"),
        (Highlight::Sorted, "\x1b[32m"),
    ];
    PRIORITY
        .iter()
        .find(|(highlight, _)| state.contains(*highlight))
        .map_or("\x1b[0m", |(_, code)| *code)
}

/// Logs the audio cue of every highlighted step at trace level.
#[derive(Debug, Default)]
pub struct ToneTrace;

impl RunObserver for ToneTrace {
    fn on_step(&mut self, event: &StepEvent) {
        if let Some(hz) = tone_hz(event) {
            tracing::trace!(hz, "tone");
        }
    }
}
