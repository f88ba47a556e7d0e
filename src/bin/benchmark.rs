//! Performance benchmark comparing serial and parallel colony evolution

use std::time::Instant;

use mars_colony::domain::{ColonyRules, EvolveParams, Grid};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn seeded_grid(size: usize) -> Grid {
    let mut rng = StdRng::seed_from_u64(size as u64);
    Grid::new(size).randomize(&mut rng, 0.3)
}

fn benchmark(size: usize, iterations: u32, parallel: bool) -> f64 {
    let rules = ColonyRules::default();
    let params = EvolveParams { rules: &rules, survival_threshold: 2, hazard_damage: 0.0 };
    let mut grid = seeded_grid(size);

    let start = Instant::now();
    for _ in 0..iterations {
        grid = if parallel {
            grid.evolve_parallel(&params)
        } else {
            grid.evolve(&params)
        };
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn main() {
    println!("=== Colony Evolution Benchmark ===\n");

    let sizes = [20, 100, 500, 1000, 2000];
    let iterations = 20;

    println!("{:>10} {:>12} {:>12} {:>10}", "Size", "Serial", "Parallel", "Speedup");
    println!("{:-<48}", "");

    for size in sizes {
        let serial_ms = benchmark(size, iterations, false);
        let parallel_ms = benchmark(size, iterations, true);

        println!(
            "{:>10} {:>12.3} {:>12.3} {:>9.1}x",
            format!("{}x{}", size, size),
            serial_ms,
            parallel_ms,
            serial_ms / parallel_ms.max(f64::EPSILON)
        );
    }

    let size = 2000;
    let cells = (size * size) as f64;
    let parallel_ms = benchmark(size, iterations, true);
    println!(
        "\nParallel at {size}x{size}: {:.2} ms/gen, {:.1}M cells/sec",
        parallel_ms,
        cells / (parallel_ms / 1000.0) / 1_000_000.0
    );
}
