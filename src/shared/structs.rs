/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::fmt;
use std::str::FromStr;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Commands the engine may answer to a `nextCommand` poll. The wire tokens
/// are case sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Open,
    Close,
    Nothing,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let token = match *self {
            Command::Up => "UP",
            Command::Down => "DOWN",
            Command::Open => "OPEN",
            Command::Close => "CLOSE",
            Command::Nothing => "NOTHING",
        };
        write!(f, "{}", token)
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(token: &str) -> Result<Command, ()> {
        match token {
            "UP" => Ok(Command::Up),
            "DOWN" => Ok(Command::Down),
            "OPEN" => Ok(Command::Open),
            "CLOSE" => Ok(Command::Close),
            "NOTHING" => Ok(Command::Nothing),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Door {
    Open,
    Closed,
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Door::Open => write!(f, "OPEN"),
            Door::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Travel direction of a call request, as sent in the `to` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiderState {
    Traveling,
    Done,
}

/// What a rider did in reaction to the door opening at a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiderEvent {
    None,
    Entered,
    Exited,
}

/**
 * A single rider of the building.
 *
 * A rider is created on some origin floor with a destination floor and stays
 * in the building's active set while traveling. When the door opens at its
 * origin it boards the car; when the door opens at its destination it is
 * done and gets removed by the building.
 *
 * # Fields
 * - `id`:          Identity within the building's active set.
 * - `origin`:      Floor the rider was created on. Never equals `destination`.
 * - `destination`: Floor the rider wants to reach.
 * - `entered`:     Whether the rider has boarded the car yet.
 * - `state`:       Traveling until the door opened at `destination`.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rider {
    id: u64,
    origin: i32,
    destination: i32,
    entered: bool,
    state: RiderState,
}

impl Rider {
    pub fn new(id: u64, origin: i32, destination: i32) -> Rider {
        debug_assert!(origin != destination);
        Rider {
            id,
            origin,
            destination,
            entered: false,
            state: RiderState::Traveling,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn origin(&self) -> i32 {
        self.origin
    }

    pub fn destination(&self) -> i32 {
        self.destination
    }

    pub fn direction(&self) -> Direction {
        if self.destination > self.origin {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == RiderState::Done
    }

    /// Delivers the "door opened at `floor`" event. Boards the rider when the
    /// door opened at its origin, finishes it when it opened at its
    /// destination.
    pub fn door_opened(&mut self, floor: i32) -> RiderEvent {
        if self.state == RiderState::Done {
            return RiderEvent::None;
        }
        if !self.entered && floor == self.origin {
            self.entered = true;
            return RiderEvent::Entered;
        }
        if floor == self.destination {
            self.state = RiderState::Done;
            return RiderEvent::Exited;
        }
        RiderEvent::None
    }
}
