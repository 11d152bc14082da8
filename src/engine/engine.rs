use crate::shared::{Command, Direction, Rider};
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Faults at the engine protocol boundary.
///
/// `Transport` covers everything where the network interaction itself went
/// wrong (refused connection, timeout, DNS, non-2xx status) and is what the
/// adapter latches. `Protocol` means the server answered but the body was
/// not a known command; it is raised immediately and never latched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Protocol(String),
}

/**
 * Capability contract between the building and the decision-making engine.
 *
 * `next_command` is the one blocking call, made once per tick; the building
 * cannot proceed without its answer. All other operations are notifications
 * dispatched fire-and-forget by implementations. `reset` must go through
 * even while the implementation considers its transport broken, since its
 * whole purpose is recovering from that state.
 */
pub trait ElevatorEngine {
    /// Polls the engine for the next command to apply. Blocking.
    fn next_command(&self) -> Result<Command, EngineError>;

    /// A rider pressed a call button at `at_floor`, wanting to travel `to`.
    fn call(&self, at_floor: i32, to: Direction) -> Result<(), EngineError>;

    /// A rider inside the car pressed the button for `floor_to_go`.
    fn go(&self, floor_to_go: i32) -> Result<(), EngineError>;

    /// A rider boarded the car.
    fn rider_entered(&self, rider: &Rider) -> Result<(), EngineError>;

    /// A rider left the car.
    fn rider_exited(&self, rider: &Rider) -> Result<(), EngineError>;

    /// Tells the engine to discard its internal state. Never short-circuited
    /// by a latched transport error.
    fn reset(&self, cause: &str) -> Result<(), EngineError>;
}
