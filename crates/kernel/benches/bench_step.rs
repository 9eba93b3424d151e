use std::hint::black_box;
use std::time::Instant;

use relay_common::{Direction, GridPoint};
use relay_kernel::{SimulationState, World};

/// Points on a square lattice, so every holder has aligned neighbours.
fn make_lattice(point_count: usize) -> World {
    let side = (point_count as f64).sqrt().ceil() as usize;
    World::from_positions((0..point_count).map(|i| {
        GridPoint::new((i % side) as i64, (i / side) as i64)
    }))
}

fn bench_full_run(point_count: usize, iterations: usize) {
    let world = make_lattice(point_count);

    let start = Instant::now();
    let mut throws = 0;
    for _ in 0..iterations {
        let mut state = match SimulationState::new(world.clone(), 0, Direction::S) {
            Ok(state) => state,
            Err(e) => panic!("lattice must be valid: {e}"),
        };
        let (run, _) = state.run_to_end();
        throws += black_box(run.len());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  full run ({point_count} points, {iterations} iters): {per_iter:?}/iter, {} throws/run, total {elapsed:?}",
        throws / iterations
    );
}

fn bench_single_step(point_count: usize, iterations: usize) {
    let world = make_lattice(point_count);

    let start = Instant::now();
    for _ in 0..iterations {
        let mut state = match SimulationState::new(world.clone(), 0, Direction::S) {
            Ok(state) => state,
            Err(e) => panic!("lattice must be valid: {e}"),
        };
        let _ = black_box(state.step());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  first step incl. clone ({point_count} points, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Relay Engine Benchmarks ===\n");

    println!("Single step:");
    bench_single_step(100, 10000);
    bench_single_step(1000, 1000);
    bench_single_step(10000, 100);

    println!("\nFull run to termination:");
    bench_full_run(100, 1000);
    bench_full_run(1000, 100);
    bench_full_run(10000, 10);

    println!("\n=== Done ===");
}
