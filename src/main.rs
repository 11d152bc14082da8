/* 3rd party libraries */
use clap::Arg;
use log::{error, info};
use rand::Rng;
use std::thread::sleep;
use std::time::Duration;

/* Custom libraries */
use building::Building;
use engine::HttpEngine;

/* Modules */
mod building;
mod config;
mod engine;
mod shared;

/* Main */
fn main() {
    env_logger::init();

    let matches = clap::Command::new("elevator-sim")
        .about("Simulates a single elevator car driven by a remote engine")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("server")
                .short('s')
                .long("server")
                .takes_value(true)
                .help("Engine base address, overrides the configuration"),
        )
        .get_matches();

    // Load the configuration
    let mut config = config::load_config(matches.value_of("config").unwrap_or("config.toml"));
    if let Some(server) = matches.value_of("server") {
        config.engine.server_address = server.to_string();
    }

    // Wire the engine and the building
    let engine = unwrap_or_exit!(HttpEngine::new(&config.engine));
    let mut building = Building::new(&config.building, engine);

    info!("polling engine at {}", config.engine.server_address);

    // Tick loop
    let tick_interval = Duration::from_millis(config.building.tick_interval_ms);
    let mut rng = rand::thread_rng();
    loop {
        if rng.gen_bool(config.building.rider_arrival_probability) {
            building.add_rider();
        }
        building.tick();
        info!(
            "floor {} door {} riders {}",
            building.floor(),
            building.door(),
            building.riders().len()
        );
        sleep(tick_interval);
    }
}
