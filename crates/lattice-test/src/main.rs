//! Offline statistical harness: hash uniformity and bound soundness.
//!
//! Exits non-zero when any check fails, so it can gate CI runs that are too
//! slow for the unit test suite (large sample counts, every basis kind).

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use lattice_core::config::BasisKind;
use lattice_core::sampler::HashSampler;
use lattice_core::{BoxedNoise, NoiseGenerator, Region};

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lattice-test", about = "Statistical checks for lattice noise generators")]
struct Args {
    #[command(subcommand)]
    check: Option<Check>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Check {
    /// Bucket sequential lattice keys and compare against a flat histogram.
    Uniformity {
        #[arg(long, default_value = "3424")]
        seed: i32,
        #[arg(long, default_value = "1000000")]
        samples: u64,
        #[arg(long, default_value = "20")]
        buckets: usize,
        /// Allowed deviation per bucket, as a fraction of the expected count.
        #[arg(long, default_value = "0.05")]
        slack: f64,
    },
    /// Sample every basis kind at random coordinates and check declared bounds.
    Bounds {
        #[arg(long, default_value = "0")]
        seed: u64,
        /// Samples per basis kind and dimension.
        #[arg(long, default_value = "100000")]
        samples: usize,
    },
    /// Both checks with default settings.
    All,
}

// ── Reports ──────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
struct UniformityReport {
    seed: i32,
    samples: u64,
    expected: f64,
    counts: Vec<u64>,
    worst_deviation: f64,
    passed: bool,
}

#[derive(Serialize, Debug)]
struct BoundsReport {
    basis: &'static str,
    dims: usize,
    declared: [f64; 2],
    observed: [f64; 2],
    violations: usize,
    passed: bool,
}

#[derive(Serialize, Debug, Default)]
struct Report {
    uniformity: Option<UniformityReport>,
    bounds: Vec<BoundsReport>,
}

impl Report {
    fn passed(&self) -> bool {
        self.uniformity.as_ref().map_or(true, |u| u.passed) && self.bounds.iter().all(|b| b.passed)
    }
}

// ── Checks ───────────────────────────────────────────────────────────────────

fn uniformity(seed: i32, samples: u64, buckets: usize, slack: f64) -> Result<UniformityReport> {
    if buckets == 0 || samples == 0 {
        bail!("need at least one bucket and one sample");
    }
    let sampler = HashSampler::<lattice_core::hash::XxHash64>::default();
    let mut counts = vec![0u64; buckets];
    for key in 0..samples {
        // Walk a 2D lattice row by row so both packed halves vary.
        let x = (key % 1024) as i64;
        let y = (key / 1024) as i64;
        let v = sampler.hash_value(seed, [x, y]);
        let idx = ((v * buckets as f64) as usize).min(buckets - 1);
        counts[idx] += 1;
    }
    let expected = samples as f64 / buckets as f64;
    let worst_deviation = counts.iter().map(|&c| (c as f64 - expected).abs() / expected).fold(0.0, f64::max);
    debug!("uniformity counts: {counts:?}");
    Ok(UniformityReport { seed, samples, expected, counts, worst_deviation, passed: worst_deviation <= slack })
}

fn bounds_for<const D: usize>(kind: BasisKind, rng: &mut StdRng, samples: usize) -> Result<BoundsReport> {
    const EPS: f64 = 1e-12;
    const SIDE: usize = 8;
    let tree: BoxedNoise<D> = kind.build::<D>(rng.gen());
    let (min, max) = (tree.min(), tree.max());
    let mut observed = [f64::INFINITY, f64::NEG_INFINITY];
    let mut violations = 0;
    let mut seen = 0;
    while seen < samples {
        let origin: [f64; D] = std::array::from_fn(|_| rng.gen_range(-1.0e5..1.0e5));
        let step: [f64; D] = std::array::from_fn(|_| rng.gen_range(-4.0..4.0));
        let chunk = tree.sample(None, &Region::new(origin, [SIDE; D], step))?;
        for &v in chunk.as_slice() {
            observed[0] = observed[0].min(v);
            observed[1] = observed[1].max(v);
            if v < min - EPS || v > max + EPS {
                violations += 1;
            }
        }
        seen += chunk.len();
    }
    Ok(BoundsReport {
        basis: kind.name(),
        dims: D,
        declared: [min, max],
        observed,
        violations,
        passed: violations == 0,
    })
}

fn bounds(seed: u64, samples: usize) -> Result<Vec<BoundsReport>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut reports = Vec::new();
    for kind in BasisKind::ALL {
        reports.push(bounds_for::<2>(kind, &mut rng, samples)?);
        reports.push(bounds_for::<3>(kind, &mut rng, samples)?);
    }
    Ok(reports)
}

// ── Output ───────────────────────────────────────────────────────────────────

fn print_text(report: &Report) {
    if let Some(u) = &report.uniformity {
        println!(
            "uniformity  seed {}  {} samples  worst deviation {:.3}%  {}",
            u.seed,
            u.samples,
            u.worst_deviation * 100.0,
            if u.passed { "ok" } else { "FAIL" }
        );
    }
    for b in &report.bounds {
        println!(
            "bounds  {:<15} {}D  declared [{:>8.4}, {:>8.4}]  observed [{:>8.4}, {:>8.4}]  {}",
            b.basis,
            b.dims,
            b.declared[0],
            b.declared[1],
            b.observed[0],
            b.observed[1],
            if b.passed { "ok".to_string() } else { format!("FAIL ({} violations)", b.violations) }
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut report = Report::default();
    match args.check.clone().unwrap_or(Check::All) {
        Check::Uniformity { seed, samples, buckets, slack } => {
            report.uniformity = Some(uniformity(seed, samples, buckets, slack)?);
        }
        Check::Bounds { seed, samples } => {
            report.bounds = bounds(seed, samples)?;
        }
        Check::All => {
            report.uniformity = Some(uniformity(3424, 1_000_000, 20, 0.05)?);
            report.bounds = bounds(0, 100_000)?;
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }

    if !report.passed() {
        bail!("statistical checks failed");
    }
    info!("all checks passed");
    Ok(())
}
