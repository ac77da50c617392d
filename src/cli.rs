//! Graphtrace CLI - headless scenario replay
//! Reads a JSON event script, replays it against a guideline collection
//! and prints the resulting state dump

mod collection;
mod document;
mod geometry;
mod guideline;
mod scenario;
mod scene;
mod transform;

use std::env;
use std::path::Path;

use scenario::{load_scenario, run_scenario};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Graphtrace CLI - Guideline Scenario Replay");
        println!("Usage: graphtrace-cli <scenario.json>");
        println!();
        println!("Example: graphtrace-cli demos/lock_left.json");
        return;
    }

    let filename = &args[1];

    match load_scenario(Path::new(filename)) {
        Ok(scenario) => {
            print!("{}", run_scenario(&scenario));
        }
        Err(e) => {
            eprintln!("❌ Could not replay scenario '{}': {}", filename, e);
            std::process::exit(1);
        }
    }
}
