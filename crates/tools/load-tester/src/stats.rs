//! Per-task request statistics.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::Duration;

/// Counters and latencies for one task
#[derive(Debug, Clone, Default)]
pub struct TaskStats {
    pub requests: u64,
    pub failures: u64,
    latencies_ms: Vec<f64>,
}

impl TaskStats {
    pub fn record(&mut self, success: bool, elapsed: Duration) {
        self.requests += 1;
        if !success {
            self.failures += 1;
        }
        self.latencies_ms.push(elapsed.as_micros() as f64 / 1000.0);
    }

    pub fn merge(&mut self, other: TaskStats) {
        self.requests += other.requests;
        self.failures += other.failures;
        self.latencies_ms.extend(other.latencies_ms);
    }

    pub fn min(&self) -> f64 {
        self.latencies_ms.iter().copied().fold(f64::NAN, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.latencies_ms.iter().copied().fold(f64::NAN, f64::max)
    }

    pub fn avg(&self) -> f64 {
        if self.latencies_ms.is_empty() {
            return f64::NAN;
        }
        self.latencies_ms.iter().sum::<f64>() / self.latencies_ms.len() as f64
    }

    /// Nearest-rank percentile, `p` in 0..=100
    pub fn percentile(&self, p: usize) -> f64 {
        if self.latencies_ms.is_empty() {
            return f64::NAN;
        }
        let mut sorted = self.latencies_ms.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let rank = (sorted.len() * p.min(100)).div_ceil(100).max(1);
        sorted[rank - 1]
    }
}

/// Statistics for every task a run exercised, keyed by task name
#[derive(Debug, Clone, Default)]
pub struct Report {
    tasks: BTreeMap<&'static str, TaskStats>,
}

impl Report {
    pub fn record(&mut self, task: &'static str, success: bool, elapsed: Duration) {
        self.tasks.entry(task).or_default().record(success, elapsed);
    }

    pub fn merge(&mut self, other: Report) {
        for (task, stats) in other.tasks {
            self.tasks.entry(task).or_default().merge(stats);
        }
    }

    #[cfg(test)]
    pub fn get(&self, task: &str) -> Option<&TaskStats> {
        self.tasks.get(task)
    }

    pub fn total_requests(&self) -> u64 {
        self.tasks.values().map(|stats| stats.requests).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.tasks.values().map(|stats| stats.failures).sum()
    }

    /// Fixed-width table, one row per task plus a total row
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<34} {:>8} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9}",
            "task", "reqs", "fails", "min ms", "avg ms", "p50 ms", "p95 ms", "max ms"
        );
        let _ = writeln!(out, "{}", "-".repeat(101));

        let mut total = TaskStats::default();
        for (task, stats) in &self.tasks {
            let _ = writeln!(out, "{}", row(task, stats));
            total.merge(stats.clone());
        }

        let _ = writeln!(out, "{}", "-".repeat(101));
        let _ = writeln!(out, "{}", row("total", &total));
        out
    }
}

fn row(task: &str, stats: &TaskStats) -> String {
    format!(
        "{:<34} {:>8} {:>8} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>9.1}",
        task,
        stats.requests,
        stats.failures,
        stats.min(),
        stats.avg(),
        stats.percentile(50),
        stats.percentile(95),
        stats.max()
    )
}
