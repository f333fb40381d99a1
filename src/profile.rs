//! Wall-clock profiling for the pipeline stages.
//!
//! Each GPU stage (upload, kernel, download) is bracketed by a
//! [`Stopwatch`]; the collected timings are printed as the program's
//! report once the pipeline finishes.

use std::time::Instant;

/// Elapsed wall-clock time for one named pipeline stage.
#[derive(Debug, Clone)]
pub struct StageTiming {
    /// Stage label, e.g. "write image".
    pub label: &'static str,
    /// Elapsed time in microseconds.
    pub micros: u128,
}

/// A running timer for a single stage. `Instant` is monotonic, so the
/// measurement is immune to wall-clock adjustments.
pub struct Stopwatch {
    label: &'static str,
    started: Instant,
}

impl Stopwatch {
    pub fn start(label: &'static str) -> Self {
        Stopwatch {
            label,
            started: Instant::now(),
        }
    }

    /// Stop the timer, consuming it and producing the stage record.
    pub fn stop(self) -> StageTiming {
        StageTiming {
            label: self.label,
            micros: self.started.elapsed().as_micros(),
        }
    }
}

/// Format one report line for a stage.
pub fn report_line(timing: &StageTiming) -> String {
    format!("Task {} - {} usec.", timing.label, timing.micros)
}

/// Print the timing report to stdout, one line per stage.
pub fn print_report(timings: &[StageTiming]) {
    for timing in timings {
        println!("{}", report_line(timing));
    }
}
