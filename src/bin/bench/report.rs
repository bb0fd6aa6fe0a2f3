// Benchmark Report Types
// Structured JSON output for the scaling runs

use serde::Serialize;

// ─── Statistics (per-size aggregation over seeded runs) ─────────────────────

/// Summary of one metric across seeded runs. `ci95` is the half width of
/// the normal-approximation 95% interval around `mean`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub ci95: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let Some((&first, rest)) = samples.split_first() else {
            return Self::default();
        };
        let n = samples.len() as f64;
        let (min, max, sum) = rest
            .iter()
            .fold((first, first, first), |(lo, hi, sum), &x| (lo.min(x), hi.max(x), sum + x));
        let mean = sum / n;
        let sq_dev: f64 = samples.iter().map(|x| (x - mean) * (x - mean)).sum();
        let std_dev = if samples.len() > 1 { (sq_dev / (n - 1.0)).sqrt() } else { 0.0 };
        Self {
            n: samples.len(),
            mean,
            std_dev,
            ci95: 1.96 * std_dev / n.sqrt(),
            min,
            max,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub seed: u64,
    pub wallets: usize,
    pub edges: usize,
    pub movements: usize,
    pub cycles: u32,
    pub elapsed_us: u128,
    pub idempotent: bool,
    pub non_negative: bool,
    pub final_capital: f64,
    pub total_commission: f64,
}

impl RunResult {
    pub fn pass(&self) -> bool {
        self.idempotent && self.non_negative
    }
}

// ─── Per-Size Aggregation ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SizeReport {
    pub wallets: usize,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub elapsed_us: Stats,
    pub edges: Stats,
    pub final_capital: Stats,
    pub total_commission: Stats,
    pub individual_runs: Vec<RunResult>,
}

impl SizeReport {
    pub fn from_runs(wallets: usize, runs: Vec<RunResult>) -> Self {
        let collect = |f: fn(&RunResult) -> f64| runs.iter().map(f).collect::<Vec<f64>>();
        let passed = runs.iter().filter(|r| r.pass()).count();
        Self {
            wallets,
            n_runs: runs.len(),
            pass_rate: if runs.is_empty() { 0.0 } else { passed as f64 / runs.len() as f64 },
            elapsed_us: Stats::from_samples(&collect(|r| r.elapsed_us as f64)),
            edges: Stats::from_samples(&collect(|r| r.edges as f64)),
            final_capital: Stats::from_samples(&collect(|r| r.final_capital)),
            total_commission: Stats::from_samples(&collect(|r| r.total_commission)),
            individual_runs: runs,
        }
    }
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub base_seed: u64,
    pub n_runs_per_size: usize,
    pub cycles: u32,
    pub rate_pct: f64,
    pub sizes: Vec<SizeReport>,
}

impl BenchReport {
    pub fn all_pass(&self) -> bool {
        self.sizes.iter().all(|s| s.pass_rate >= 1.0)
    }
}
