pub mod building;
pub mod building_tests;

pub use building::Building;
