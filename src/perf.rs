//! Frame timing and lightweight profiling.
//!
//! The render loop reports every frame build to a [`PerfMonitor`]; hit tests
//! report how many candidates the R-tree handed to the exact shape test.
//! `profile_scope!` compiles to nothing unless the `profiling` feature is on.
//!
//! ```ignore
//! fn build_grid() {
//!     profile_scope!("build_grid");
//!     // ...
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Instant;
use tracing::{debug, warn};

/// Frame budget at 60 Hz, in milliseconds.
pub const FRAME_BUDGET_MS: f64 = 1000.0 / 60.0;

/// Frames over this multiple of the budget count as slow.
const SLOW_FRAME_FACTOR: f64 = 2.0;

const FRAME_WINDOW: usize = 60;
const OPERATION_WINDOW: usize = 100;

/// Time the enclosing scope. A no-op without the `profiling` feature.
#[macro_export]
macro_rules! profile_scope {
    ($label:expr) => {
        $crate::profile_scope!($label, 1.0)
    };
    ($label:expr, $budget_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _scope_timer = $crate::perf::ScopedTimer::new($label, $budget_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($label, $budget_ms);
    };
}

pub use profile_scope;

fn millis_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Fixed-capacity ring of millisecond samples.
#[derive(Debug, Clone)]
struct SampleWindow {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl SampleWindow {
    fn with_capacity(capacity: usize) -> Self {
        Self { capacity, samples: VecDeque::with_capacity(capacity) }
    }

    fn push(&mut self, ms: f64) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(ms);
    }

    fn mean(&self) -> f64 {
        match self.samples.len() {
            0 => 0.0,
            n => self.samples.iter().sum::<f64>() / n as f64,
        }
    }

    fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |acc, &ms| acc.max(ms))
    }

    /// Nearest-rank percentile, `q` in `0.0..=1.0`.
    fn percentile(&self, q: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut ordered: Vec<f64> = self.samples.iter().copied().collect();
        ordered.sort_by(f64::total_cmp);
        let rank = (q * ordered.len() as f64).ceil() as usize;
        ordered[rank.clamp(1, ordered.len()) - 1]
    }

    fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Timing for one named step of frame building.
#[derive(Debug, Clone)]
pub struct OperationStats {
    window: SampleWindow,
    pub count: u64,
    pub max_ms: f64,
}

impl Default for OperationStats {
    fn default() -> Self {
        Self { window: SampleWindow::with_capacity(OPERATION_WINDOW), count: 0, max_ms: 0.0 }
    }
}

impl OperationStats {
    pub fn record(&mut self, ms: f64) {
        self.window.push(ms);
        self.count += 1;
        if ms > self.max_ms {
            self.max_ms = ms;
        }
    }

    /// Mean over the retained samples.
    pub fn average(&self) -> f64 {
        self.window.mean()
    }

    pub fn p95(&self) -> f64 {
        self.window.percentile(0.95)
    }
}

/// Rolling frame-time tracker owned by the render loop.
#[derive(Debug)]
pub struct PerfMonitor {
    frames: SampleWindow,
    started_at: Option<Instant>,
    frames_seen: u64,
    frames_over_budget: u64,
    operations: HashMap<&'static str, OperationStats>,
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerfMonitor {
    pub fn new() -> Self {
        Self {
            frames: SampleWindow::with_capacity(FRAME_WINDOW),
            started_at: None,
            frames_seen: 0,
            frames_over_budget: 0,
            operations: HashMap::new(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Close the frame opened by [`begin_frame`](Self::begin_frame) and
    /// return its duration. `None` when no frame was open.
    pub fn end_frame(&mut self) -> Option<f64> {
        let ms = millis_since(self.started_at.take()?);
        self.record_frame(ms);
        Some(ms)
    }

    pub fn record_frame(&mut self, ms: f64) {
        self.frames.push(ms);
        self.frames_seen += 1;
        if ms > FRAME_BUDGET_MS * SLOW_FRAME_FACTOR {
            self.frames_over_budget += 1;
            warn!(frame_ms = format!("{ms:.2}"), budget_ms = format!("{FRAME_BUDGET_MS:.2}"), "Frame build over budget");
        }
    }

    pub fn record_operation(&mut self, name: &'static str, elapsed_ms: f64) {
        self.operations.entry(name).or_default().record(elapsed_ms);
    }

    pub fn average_frame_time(&self) -> f64 {
        self.frames.mean()
    }

    pub fn max_frame_time(&self) -> f64 {
        self.frames.peak()
    }

    pub fn total_frames(&self) -> u64 {
        self.frames_seen
    }

    pub fn slow_frame_percentage(&self) -> f64 {
        if self.frames_seen == 0 {
            0.0
        } else {
            100.0 * self.frames_over_budget as f64 / self.frames_seen as f64
        }
    }

    pub fn estimated_fps(&self) -> f64 {
        match self.average_frame_time() {
            avg if avg > 0.0 => 1000.0 / avg,
            _ => 0.0,
        }
    }

    pub fn operation_stats(&self, name: &str) -> Option<&OperationStats> {
        self.operations.get(name)
    }

    /// Warn when the rolling mean misses the budget, then list the slowest
    /// operations at debug level.
    pub fn log_summary_if_slow(&self) {
        let mean = self.average_frame_time();
        if mean <= FRAME_BUDGET_MS {
            return;
        }
        warn!(
            mean_ms = format!("{mean:.2}"),
            peak_ms = format!("{:.2}", self.max_frame_time()),
            over_budget = format!("{:.1}%", self.slow_frame_percentage()),
            fps = format!("{:.1}", self.estimated_fps()),
            "Layout rendering below frame budget"
        );

        let mut slowest: Vec<(&&'static str, &OperationStats)> = self.operations.iter().collect();
        slowest.sort_by(|a, b| b.1.average().total_cmp(&a.1.average()));
        for (name, stats) in slowest.into_iter().take(5) {
            debug!(
                operation = *name,
                mean_ms = format!("{:.2}", stats.average()),
                p95_ms = format!("{:.2}", stats.p95()),
                max_ms = format!("{:.2}", stats.max_ms),
                samples = stats.count,
                "Operation timing"
            );
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Debug-logs its own lifetime on drop when it runs past `budget_ms`.
pub struct ScopedTimer {
    label: &'static str,
    started: Instant,
    budget_ms: f64,
}

impl ScopedTimer {
    pub fn new(label: &'static str, budget_ms: f64) -> Self {
        Self { label, started: Instant::now(), budget_ms }
    }

    pub fn elapsed_ms(&self) -> f64 {
        millis_since(self.started)
    }

    pub fn name(&self) -> &'static str {
        self.label
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let ms = self.elapsed_ms();
        if ms > self.budget_ms {
            debug!(scope = self.label, elapsed_ms = format!("{ms:.2}"), "Scope over budget");
        }
    }
}

/// Run `f`, returning its value and how long it took in milliseconds.
#[inline]
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let started = Instant::now();
    let value = f();
    (value, millis_since(started))
}

/// How well the R-tree prunes candidates before the exact shape test.
#[derive(Debug, Default, Clone)]
pub struct HitTestProfiler {
    queries: u64,
    candidates: u64,
    population: u64,
}

impl HitTestProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// One query that yielded `candidates` of the `population` placed items.
    pub fn record(&mut self, candidates: usize, population: usize) {
        self.queries += 1;
        self.candidates += candidates as u64;
        self.population += population as u64;
    }

    pub fn queries(&self) -> u64 {
        self.queries
    }

    pub fn candidate_ratio(&self) -> f64 {
        if self.population == 0 {
            0.0
        } else {
            self.candidates as f64 / self.population as f64
        }
    }
}
