/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{info, warn};
use rand::Rng;

/* Custom libraries */
use crate::config::BuildingConfig;
use crate::engine::ElevatorEngine;
use crate::shared::{Command, Door, Rider, RiderEvent};

/**
 * The building: a single car, its door, and the active riders.
 *
 * The building does not decide anything itself. Once per tick it polls the
 * engine for the next command, checks that the command is legal given the
 * current door and floor, and applies it. An illegal command, or a failed
 * poll, resets both sides: the engine is told to discard its state and the
 * building returns to (door closed, lowest floor, no riders). There is no
 * retry within a tick.
 *
 * # Fields
 * - `engine`:        The decision-making engine, polled once per tick.
 * - `lower_floor`:   Lowest reachable floor.
 * - `higher_floor`:  Highest reachable floor.
 * - `max_riders`:    Soft cap on the active rider set; overflow is ignored.
 * - `floor`:         Current floor, always within bounds.
 * - `door`:          Current door state.
 * - `riders`:        Active riders, each with a unique id.
 * - `next_rider_id`: Id handed to the next created rider.
 */
pub struct Building<E: ElevatorEngine> {
    engine: E,
    lower_floor: i32,
    higher_floor: i32,
    max_riders: usize,
    floor: i32,
    door: Door,
    riders: Vec<Rider>,
    next_rider_id: u64,
}

impl<E: ElevatorEngine> Building<E> {
    pub fn new(config: &BuildingConfig, engine: E) -> Building<E> {
        Building {
            engine,
            lower_floor: config.lower_floor,
            higher_floor: config.higher_floor,
            max_riders: config.max_riders,
            floor: config.lower_floor,
            door: Door::Closed,
            riders: Vec::new(),
            next_rider_id: 0,
        }
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn door(&self) -> Door {
        self.door
    }

    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    /// Adds a rider with a random origin and destination. Silently does
    /// nothing when the building is full; the cap is a soft limit.
    pub fn add_rider(&mut self) {
        if self.lower_floor >= self.higher_floor {
            return;
        }
        let mut rng = rand::thread_rng();
        let origin = rng.gen_range(self.lower_floor..=self.higher_floor);
        let destination = loop {
            let floor = rng.gen_range(self.lower_floor..=self.higher_floor);
            if floor != origin {
                break floor;
            }
        };
        self.add_rider_between(origin, destination);
    }

    /// Adds a rider with the given origin and destination and notifies the
    /// engine of its call. No-op at capacity, when origin equals
    /// destination, or when either floor is outside the building.
    pub fn add_rider_between(&mut self, origin: i32, destination: i32) {
        let bounds = self.lower_floor..=self.higher_floor;
        if self.riders.len() >= self.max_riders
            || origin == destination
            || !bounds.contains(&origin)
            || !bounds.contains(&destination)
        {
            return;
        }

        let rider = Rider::new(self.next_rider_id, origin, destination);
        self.next_rider_id += 1;

        if let Err(e) = self.engine.call(origin, rider.direction()) {
            warn!("call({}, {}) not delivered: {}", origin, rider.direction(), e);
        }
        info!(
            "rider {} travels {} -> {}",
            rider.id(),
            origin,
            destination
        );
        self.riders.push(rider);
    }

    /// One step of the state machine: poll, validate, apply or reset.
    pub fn tick(&mut self) {
        match self.engine.next_command() {
            Ok(command) if self.is_valid(command) => self.apply(command),
            Ok(command) => {
                let cause = format!(
                    "Command {} is invalid at floor {} with door {}",
                    command, self.floor, self.door
                );
                warn!("{}", cause);
                self.reset(&cause);
            }
            Err(e) => {
                warn!("nextCommand failed: {}", e);
                self.reset(&e.to_string());
            }
        }
    }

    fn is_valid(&self, command: Command) -> bool {
        match command {
            Command::Close => self.door == Door::Open,
            Command::Open => self.door == Door::Closed,
            Command::Down => self.door == Door::Closed && self.floor > self.lower_floor,
            Command::Up => self.door == Door::Closed && self.floor < self.higher_floor,
            Command::Nothing => true,
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Close => self.door = Door::Closed,
            Command::Open => self.open_door(),
            Command::Up => self.floor += 1,
            Command::Down => self.floor -= 1,
            Command::Nothing => {}
        }
    }

    fn open_door(&mut self) {
        self.door = Door::Open;
        let floor = self.floor;

        // First pass: deliver the door-open event to every rider, so removal
        // cannot hide the event from riders later in the set.
        for rider in self.riders.iter_mut() {
            match rider.door_opened(floor) {
                RiderEvent::Entered => {
                    if let Err(e) = self.engine.rider_entered(rider) {
                        warn!("userHasEntered not delivered: {}", e);
                    }
                    if let Err(e) = self.engine.go(rider.destination()) {
                        warn!("go({}) not delivered: {}", rider.destination(), e);
                    }
                }
                RiderEvent::Exited => {
                    if let Err(e) = self.engine.rider_exited(rider) {
                        warn!("userHasExited not delivered: {}", e);
                    }
                    info!("rider {} arrived at floor {}", rider.id(), floor);
                }
                RiderEvent::None => {}
            }
        }

        // Second pass: drop everyone who is done.
        self.riders.retain(|rider| !rider.is_done());
    }

    /// Hard fault recovery: tell the engine to start over, then return to the
    /// initial state. Keeps both sides of the protocol synchronized.
    fn reset(&mut self, cause: &str) {
        if let Err(e) = self.engine.reset(cause) {
            warn!("engine reset not delivered: {}", e);
        }
        self.floor = self.lower_floor;
        self.door = Door::Closed;
        self.riders.clear();
    }
}
