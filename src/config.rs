/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone)]
pub struct Config {
    pub building: BuildingConfig,
    pub engine: EngineConfig,
}

#[derive(Deserialize, Clone)]
pub struct BuildingConfig {
    pub lower_floor: i32,
    pub higher_floor: i32,
    pub max_riders: usize,
    pub tick_interval_ms: u64,
    pub rider_arrival_probability: f64,
}

#[derive(Deserialize, Clone)]
pub struct EngineConfig {
    pub server_address: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub workers: usize,
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> Config {
    let config_str = fs::read_to_string(path).expect("Failed to read configuration file");
    toml::from_str(&config_str).expect("Failed to parse configuration file")
}
