/*
 * Unit tests for the building module
 *
 * The unit tests follows the Arrange, Act, Assert pattern. The building is
 * driven against a scripted in-memory engine that records every
 * notification it receives.
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod building_tests {
    use crate::building::Building;
    use crate::config::BuildingConfig;
    use crate::engine::{ElevatorEngine, EngineError};
    use crate::shared::{Command, Direction, Door, Rider};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    struct MockEngine {
        commands: RefCell<VecDeque<Result<Command, EngineError>>>,
        resets: RefCell<Vec<String>>,
        calls: RefCell<Vec<(i32, Direction)>>,
        gos: RefCell<Vec<i32>>,
        entered: RefCell<usize>,
        exited: RefCell<usize>,
    }

    impl MockEngine {
        fn scripted(commands: Vec<Result<Command, EngineError>>) -> Rc<MockEngine> {
            Rc::new(MockEngine {
                commands: RefCell::new(commands.into()),
                resets: RefCell::new(Vec::new()),
                calls: RefCell::new(Vec::new()),
                gos: RefCell::new(Vec::new()),
                entered: RefCell::new(0),
                exited: RefCell::new(0),
            })
        }
    }

    impl ElevatorEngine for Rc<MockEngine> {
        fn next_command(&self) -> Result<Command, EngineError> {
            self.commands
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(Command::Nothing))
        }

        fn call(&self, at_floor: i32, to: Direction) -> Result<(), EngineError> {
            self.calls.borrow_mut().push((at_floor, to));
            Ok(())
        }

        fn go(&self, floor_to_go: i32) -> Result<(), EngineError> {
            self.gos.borrow_mut().push(floor_to_go);
            Ok(())
        }

        fn rider_entered(&self, _rider: &Rider) -> Result<(), EngineError> {
            *self.entered.borrow_mut() += 1;
            Ok(())
        }

        fn rider_exited(&self, _rider: &Rider) -> Result<(), EngineError> {
            *self.exited.borrow_mut() += 1;
            Ok(())
        }

        fn reset(&self, cause: &str) -> Result<(), EngineError> {
            self.resets.borrow_mut().push(cause.to_string());
            Ok(())
        }
    }

    fn test_config() -> BuildingConfig {
        BuildingConfig {
            lower_floor: 0,
            higher_floor: 5,
            max_riders: 10,
            tick_interval_ms: 1000,
            rider_arrival_probability: 0.0,
        }
    }

    fn setup_building(
        commands: Vec<Result<Command, EngineError>>,
    ) -> (Building<Rc<MockEngine>>, Rc<MockEngine>) {
        let engine = MockEngine::scripted(commands);
        let building = Building::new(&test_config(), engine.clone());
        (building, engine)
    }

    fn assert_initial_state(building: &Building<Rc<MockEngine>>) {
        assert_eq!(building.floor(), 0);
        assert_eq!(building.door(), Door::Closed);
        assert_eq!(building.riders().len(), 0);
    }

    #[test]
    fn test_building_init() {
        // Purpose: Verify the initial state after creation

        // Arrange & Act
        let (building, engine) = setup_building(vec![]);

        // Assert
        assert_initial_state(&building);
        assert_eq!(engine.resets.borrow().len(), 0);
    }

    #[test]
    fn test_open_and_close_toggle_door() {
        // Purpose: Verify that OPEN requires a closed door and CLOSE an open one

        // Arrange
        let (mut building, engine) =
            setup_building(vec![Ok(Command::Open), Ok(Command::Close)]);

        // Act & Assert
        building.tick();
        assert_eq!(building.door(), Door::Open);

        building.tick();
        assert_eq!(building.door(), Door::Closed);
        assert_eq!(engine.resets.borrow().len(), 0);
    }

    #[test]
    fn test_close_with_closed_door_resets() {
        // Purpose: Verify that CLOSE is rejected while the door is closed

        // Arrange
        let (mut building, engine) = setup_building(vec![Ok(Command::Close)]);

        // Act
        building.tick();

        // Assert
        assert_initial_state(&building);
        assert_eq!(engine.resets.borrow().len(), 1);
    }

    #[test]
    fn test_open_with_open_door_resets() {
        // Purpose: Verify that OPEN is rejected while the door is already open

        // Arrange
        let (mut building, engine) =
            setup_building(vec![Ok(Command::Open), Ok(Command::Open)]);

        // Act
        building.tick();
        building.tick();

        // Assert
        assert_initial_state(&building);
        assert_eq!(engine.resets.borrow().len(), 1);
    }

    #[test]
    fn test_up_and_down_move_the_car() {
        // Purpose: Verify that UP and DOWN move the car one floor at a time

        // Arrange
        let (mut building, engine) = setup_building(vec![
            Ok(Command::Up),
            Ok(Command::Up),
            Ok(Command::Down),
        ]);

        // Act & Assert
        building.tick();
        assert_eq!(building.floor(), 1);
        building.tick();
        assert_eq!(building.floor(), 2);
        building.tick();
        assert_eq!(building.floor(), 1);
        assert_eq!(engine.resets.borrow().len(), 0);
    }

    #[test]
    fn test_down_at_lowest_floor_resets() {
        // Purpose: Verify that DOWN is rejected at the lower bound

        // Arrange
        let (mut building, engine) = setup_building(vec![Ok(Command::Down)]);

        // Act
        building.tick();

        // Assert
        assert_initial_state(&building);
        assert_eq!(engine.resets.borrow().len(), 1);
    }

    #[test]
    fn test_up_at_highest_floor_resets() {
        // Purpose: Verify that UP is rejected at the upper bound

        // Arrange: the sixth UP arrives at floor 5
        let (mut building, engine) = setup_building(vec![Ok(Command::Up); 6]);

        // Act
        for _ in 0..5 {
            building.tick();
        }
        assert_eq!(building.floor(), 5);
        building.tick();

        // Assert
        assert_initial_state(&building);
        assert_eq!(engine.resets.borrow().len(), 1);
    }

    #[test]
    fn test_up_with_open_door_resets() {
        // Purpose: Verify that moving with an open door at floor 3 yields the
        // full reset state, not floor 4

        // Arrange
        let (mut building, engine) = setup_building(vec![
            Ok(Command::Up),
            Ok(Command::Up),
            Ok(Command::Up),
            Ok(Command::Open),
            Ok(Command::Up),
        ]);
        building.add_rider_between(3, 1);

        // Act
        for _ in 0..4 {
            building.tick();
        }
        assert_eq!(building.floor(), 3);
        assert_eq!(building.door(), Door::Open);
        building.tick();

        // Assert
        assert_initial_state(&building);
        assert_eq!(engine.resets.borrow().len(), 1);
    }

    #[test]
    fn test_nothing_is_always_valid() {
        // Purpose: Verify that NOTHING changes nothing, open door or not

        // Arrange
        let (mut building, engine) = setup_building(vec![
            Ok(Command::Nothing),
            Ok(Command::Open),
            Ok(Command::Nothing),
        ]);

        // Act
        building.tick();
        building.tick();
        building.tick();

        // Assert
        assert_eq!(building.floor(), 0);
        assert_eq!(building.door(), Door::Open);
        assert_eq!(engine.resets.borrow().len(), 0);
    }

    #[test]
    fn test_engine_fault_resets_both_sides() {
        // Purpose: Verify that a failed poll takes the same reset path as an
        // invalid command and forwards the cause to the engine

        // Arrange
        let (mut building, engine) = setup_building(vec![
            Ok(Command::Up),
            Err(EngineError::Transport("connection refused".to_string())),
        ]);

        // Act
        building.tick();
        building.tick();

        // Assert
        assert_initial_state(&building);
        let resets = engine.resets.borrow();
        assert_eq!(resets.len(), 1);
        assert!(resets[0].contains("connection refused"));
    }

    #[test]
    fn test_rider_capacity_is_a_soft_limit() {
        // Purpose: Verify that the 11th rider is silently ignored

        // Arrange
        let (mut building, engine) = setup_building(vec![]);

        // Act
        for _ in 0..11 {
            building.add_rider_between(0, 5);
        }

        // Assert
        assert_eq!(building.riders().len(), 10);
        assert_eq!(engine.calls.borrow().len(), 10);
    }

    #[test]
    fn test_out_of_bounds_rider_is_ignored() {
        // Purpose: Verify that riders with floors outside the building are
        // silently rejected and never occupy a capacity slot

        // Arrange
        let (mut building, engine) = setup_building(vec![]);

        // Act
        building.add_rider_between(-5, 99);
        building.add_rider_between(-1, 3);
        building.add_rider_between(0, 6);

        // Assert
        assert_eq!(building.riders().len(), 0);
        assert_eq!(engine.calls.borrow().len(), 0);
    }

    #[test]
    fn test_add_rider_notifies_call() {
        // Purpose: Verify that adding a rider emits a call with its direction

        // Arrange
        let (mut building, engine) = setup_building(vec![]);

        // Act
        building.add_rider_between(4, 1);

        // Assert
        assert_eq!(engine.calls.borrow().as_slice(), &[(4, Direction::Down)]);
    }

    #[test]
    fn test_random_riders_stay_within_bounds() {
        // Purpose: Verify that random riders respect floor bounds and the
        // origin/destination invariant

        // Arrange
        let (mut building, _engine) = setup_building(vec![]);

        // Act
        for _ in 0..10 {
            building.add_rider();
        }

        // Assert
        assert_eq!(building.riders().len(), 10);
        for rider in building.riders() {
            assert!((0..=5).contains(&rider.origin()));
            assert!((0..=5).contains(&rider.destination()));
            assert_ne!(rider.origin(), rider.destination());
        }
    }

    #[test]
    fn test_rider_boards_at_origin() {
        // Purpose: Verify that opening the door at a rider's origin emits
        // userHasEntered and the destination request

        // Arrange
        let (mut building, engine) = setup_building(vec![Ok(Command::Open)]);
        building.add_rider_between(0, 3);

        // Act
        building.tick();

        // Assert
        assert_eq!(*engine.entered.borrow(), 1);
        assert_eq!(engine.gos.borrow().as_slice(), &[3]);
        assert_eq!(building.riders().len(), 1);
    }

    #[test]
    fn test_rider_leaves_at_destination() {
        // Purpose: Verify that opening the door at a rider's destination
        // removes exactly that rider and leaves the others untouched

        // Arrange
        let (mut building, engine) = setup_building(vec![
            Ok(Command::Open),  // board both riders at floor 0
            Ok(Command::Close),
            Ok(Command::Up),
            Ok(Command::Up),
            Ok(Command::Open),  // floor 2: first rider leaves
        ]);
        building.add_rider_between(0, 2);
        building.add_rider_between(0, 4);

        // Act
        for _ in 0..5 {
            building.tick();
        }

        // Assert
        assert_eq!(building.riders().len(), 1);
        assert_eq!(building.riders()[0].destination(), 4);
        assert_eq!(*engine.exited.borrow(), 1);
    }

    #[test]
    fn test_open_without_matching_rider_keeps_the_set() {
        // Purpose: Verify that opening the door with no matching origin or
        // destination leaves the rider set unchanged

        // Arrange
        let (mut building, engine) = setup_building(vec![Ok(Command::Open)]);
        building.add_rider_between(1, 3);

        // Act
        building.tick();

        // Assert
        assert_eq!(building.riders().len(), 1);
        assert_eq!(*engine.entered.borrow(), 0);
        assert_eq!(*engine.exited.borrow(), 0);
    }

    #[test]
    fn test_reset_clears_riders() {
        // Purpose: Verify that an invalid command clears the rider set

        // Arrange
        let (mut building, engine) = setup_building(vec![Ok(Command::Close)]);
        building.add_rider_between(0, 3);
        building.add_rider_between(2, 5);

        // Act
        building.tick();

        // Assert
        assert_initial_state(&building);
        assert_eq!(engine.resets.borrow().len(), 1);
    }
}
