//! Terminal swarm demo: agents wander a random cave, asking for paths
//! that a paced request queue resolves a few per tick.
//!
//! Run: RUST_LOG=info cargo run --bin swarm -- [seed] [agents] [ticks]

use std::time::Duration;

use wayfind_demos::Swarm;
use wayfind_paths::ManagerConfig;

fn arg<T: std::str::FromStr>(n: usize, default: T) -> T {
    std::env::args()
        .nth(n)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() {
    env_logger::init();

    let seed: u64 = arg(1, 42);
    let agents: usize = arg(2, 8);
    let ticks: u32 = arg(3, 60);

    let pacing = ManagerConfig::default()
        .with_computations_per_frame(2)
        .with_frames_between_computations(1);
    let mut swarm = match Swarm::new(seed, agents, pacing) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    for _ in 0..ticks {
        swarm.tick();
        println!("\x1b[2J\x1b[H{}", swarm.render());
        swarm.report();
        std::thread::sleep(Duration::from_millis(80));
    }

    let s = swarm.stats();
    println!(
        "{} ticks: {} paths resolved, {} failed, {} still pending",
        s.ticks,
        s.resolved,
        s.failed,
        swarm.pending()
    );
}
