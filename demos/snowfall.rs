//! Print a generated snowfall without starting the TUI.
//!
//! Run with: cargo run --example snowfall [count] [seed]

use std::env;

use rand::SeedableRng;
use rand::rngs::StdRng;

use snowcard::snowfall::{OVERLAY_COUNT, ParticleRanges, generate};

fn main() {
    let args: Vec<String> = env::args().collect();

    let count = match args.get(1).map(|s| s.parse::<usize>()) {
        None => OVERLAY_COUNT,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Error: invalid count: {}", e);
            std::process::exit(1);
        }
    };

    let mut rng = match args.get(2).map(|s| s.parse::<u64>()) {
        None => StdRng::from_entropy(),
        Some(Ok(seed)) => StdRng::seed_from_u64(seed),
        Some(Err(e)) => {
            eprintln!("Error: invalid seed: {}", e);
            std::process::exit(1);
        }
    };

    let particles = generate(count, &ParticleRanges::OVERLAY, &mut rng);

    println!("Generated {} overlay particles:\n", particles.len());
    println!("  {:>3}  {:>6}  {:>6}  {:>6}  {:>5}  {:>7}", "id", "left%", "delay", "dur", "size", "opacity");

    for p in &particles {
        println!(
            "  {:>3}  {:>6.1}  {:>5.2}s  {:>5.2}s  {:>5.2}  {:>7.2}",
            p.id, p.left, p.delay, p.duration, p.size, p.opacity
        );
    }
}
