pub mod macros;
pub mod structs;

pub use structs::Command;
pub use structs::Direction;
pub use structs::Door;
pub use structs::Rider;
pub use structs::RiderEvent;
pub use structs::RiderState;
