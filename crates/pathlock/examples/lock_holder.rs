//! Helper binary that takes a path lock and holds it until told to stop
//!
//! Usage: lock_holder <resource_path> <exclusive|shared> <ready_path> <release_path>
//!
//! Writes `ready_path` once the lock is held, then waits for `release_path`
//! to appear (at most 30 seconds) before releasing. Exits with status 2 if
//! the lock could not be obtained.

use pathlock::{try_with_lock, LockOptions};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const MAX_HOLD: Duration = Duration::from_secs(30);

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("Usage: lock_holder <resource_path> <exclusive|shared> <ready_path> <release_path>");
        std::process::exit(1);
    }

    let resource = PathBuf::from(&args[1]);
    let shared = match args[2].as_str() {
        "exclusive" => false,
        "shared" => true,
        other => {
            eprintln!("Unknown mode: {}", other);
            std::process::exit(1);
        }
    };
    let ready_path = PathBuf::from(&args[3]);
    let release_path = PathBuf::from(&args[4]);

    let options = LockOptions::default()
        .with_max_retries(500)
        .with_retry_delay(Duration::from_millis(10))
        .with_shared(shared);

    let held = try_with_lock(&resource, &options, |_| (), |_lock| {
        fs::write(&ready_path, "ready").expect("Failed to write ready marker");

        let deadline = Instant::now() + MAX_HOLD;
        while !release_path.exists() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        // Lock released when the session ends
    });

    if held.is_err() {
        eprintln!("Could not lock {}", resource.display());
        std::process::exit(2);
    }

    println!("Released {}", resource.display());
}
