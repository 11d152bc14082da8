pub mod engine;
pub mod http;

pub use engine::ElevatorEngine;
pub use engine::EngineError;
pub use http::HttpEngine;
