use intersection_sim::config::SignalsConfig;
use intersection_sim::simulation::{
    ControllerMode, Direction, LanePriority, LightState, OverrideReason, SignalController,
    SignalGroup,
};

fn signals(cycle: f32, set: usize, reset: usize, hold: f32) -> SignalController {
    SignalController::new(SignalsConfig {
        cycle_duration: cycle,
        congestion_set_threshold: set,
        congestion_reset_threshold: reset,
        emergency_hold: hold,
    })
}

const NO_QUEUES: [usize; 4] = [0; 4];
const NO_EMERGENCY: [bool; 4] = [false; 4];

#[test]
fn starts_east_west_green_and_cycles_on_schedule() {
    let mut controller = signals(5.0, 10, 5, 3.0);
    assert_eq!(controller.green_group(), SignalGroup::EastWest);
    assert_eq!(controller.light(Direction::East), LightState::Green);
    assert_eq!(controller.light(Direction::North), LightState::Red);

    controller.evaluate(4.9, NO_QUEUES, NO_EMERGENCY);
    assert_eq!(controller.green_group(), SignalGroup::EastWest);

    controller.evaluate(5.0, NO_QUEUES, NO_EMERGENCY);
    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);

    controller.evaluate(10.0, NO_QUEUES, NO_EMERGENCY);
    assert_eq!(controller.green_group(), SignalGroup::EastWest);
}

#[test]
fn congestion_override_engages_immediately() {
    let mut controller = signals(5.0, 10, 5, 3.0);
    controller.evaluate(1.0, [12, 0, 0, 0], NO_EMERGENCY);

    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);
    assert!(matches!(
        controller.mode(),
        ControllerMode::Override {
            group: SignalGroup::NorthSouth,
            reason: OverrideReason::Congestion,
            ..
        }
    ));
}

#[test]
fn congestion_override_releases_with_hysteresis() {
    let mut controller = signals(5.0, 10, 5, 3.0);
    controller.evaluate(1.0, [12, 0, 0, 0], NO_EMERGENCY);
    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);

    // Between the thresholds the lane stays high priority and the override
    // holds, so the signal cannot flap.
    controller.evaluate(2.0, [7, 0, 0, 0], NO_EMERGENCY);
    assert!(matches!(controller.mode(), ControllerMode::Override { .. }));
    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);

    // Below the reset threshold the override releases and cycling restarts
    // from now, keeping the drained group green for a full interval.
    controller.evaluate(3.0, [4, 0, 0, 0], NO_EMERGENCY);
    assert_eq!(controller.mode(), ControllerMode::Cycling);
    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);

    controller.evaluate(7.9, NO_QUEUES, NO_EMERGENCY);
    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);
    controller.evaluate(8.0, NO_QUEUES, NO_EMERGENCY);
    assert_eq!(controller.green_group(), SignalGroup::EastWest);
}

#[test]
fn emergency_outranks_congestion() {
    let mut controller = signals(5.0, 10, 5, 3.0);
    let emergency_east = [false, false, true, false];
    controller.evaluate(1.0, [12, 0, 0, 0], emergency_east);

    assert_eq!(controller.green_group(), SignalGroup::EastWest);
    assert!(matches!(
        controller.mode(),
        ControllerMode::Override {
            group: SignalGroup::EastWest,
            reason: OverrideReason::Emergency,
            ..
        }
    ));
}

#[test]
fn emergency_override_holds_minimum_duration() {
    let mut controller = signals(5.0, 10, 5, 3.0);
    let emergency_north = [true, false, false, false];
    controller.evaluate(1.0, NO_QUEUES, emergency_north);
    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);

    // The emergency clears right away, but the hold keeps the group green.
    controller.evaluate(2.0, NO_QUEUES, NO_EMERGENCY);
    assert!(matches!(
        controller.mode(),
        ControllerMode::Override {
            reason: OverrideReason::Emergency,
            ..
        }
    ));

    controller.evaluate(4.0, NO_QUEUES, NO_EMERGENCY);
    assert_eq!(controller.mode(), ControllerMode::Cycling);
    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);
}

#[test]
fn emergency_override_holds_while_vehicle_remains() {
    let mut controller = signals(5.0, 10, 5, 3.0);
    let emergency_north = [true, false, false, false];
    controller.evaluate(1.0, NO_QUEUES, emergency_north);

    // Long past the minimum hold, the group stays green while the emergency
    // vehicle is still on the approach.
    controller.evaluate(20.0, NO_QUEUES, emergency_north);
    assert!(matches!(
        controller.mode(),
        ControllerMode::Override {
            group: SignalGroup::NorthSouth,
            reason: OverrideReason::Emergency,
            ..
        }
    ));
}

#[test]
fn released_emergency_yields_to_waiting_group() {
    let mut controller = signals(5.0, 10, 5, 3.0);
    controller.evaluate(1.0, NO_QUEUES, [true, false, false, false]);
    assert_eq!(controller.green_group(), SignalGroup::NorthSouth);

    // North clears while an east emergency waits; the east-west group takes
    // over as soon as the hold elapses.
    controller.evaluate(5.0, NO_QUEUES, [false, false, true, false]);
    assert_eq!(controller.green_group(), SignalGroup::EastWest);
    assert!(matches!(
        controller.mode(),
        ControllerMode::Override {
            group: SignalGroup::EastWest,
            reason: OverrideReason::Emergency,
            ..
        }
    ));
}

#[test]
fn lane_priorities_follow_set_reset_thresholds() {
    let mut controller = signals(5.0, 10, 5, 3.0);

    controller.evaluate(1.0, [12, 0, 0, 0], NO_EMERGENCY);
    assert_eq!(controller.lane_priorities()[Direction::North.index()], LanePriority::High);
    assert_eq!(controller.lane_priorities()[Direction::East.index()], LanePriority::Normal);

    // Exactly at the set threshold is not over it.
    let mut fresh = signals(5.0, 10, 5, 3.0);
    fresh.evaluate(1.0, [10, 0, 0, 0], NO_EMERGENCY);
    assert_eq!(fresh.lane_priorities()[Direction::North.index()], LanePriority::Normal);

    // Sticky between the thresholds, cleared below reset.
    controller.evaluate(2.0, [6, 0, 0, 0], NO_EMERGENCY);
    assert_eq!(controller.lane_priorities()[Direction::North.index()], LanePriority::High);
    controller.evaluate(3.0, [2, 0, 0, 0], NO_EMERGENCY);
    assert_eq!(controller.lane_priorities()[Direction::North.index()], LanePriority::Normal);
}

#[test]
fn signal_groups_pair_opposing_approaches() {
    assert_eq!(Direction::North.group(), SignalGroup::NorthSouth);
    assert_eq!(Direction::South.group(), SignalGroup::NorthSouth);
    assert_eq!(Direction::East.group(), SignalGroup::EastWest);
    assert_eq!(Direction::West.group(), SignalGroup::EastWest);
    assert_eq!(SignalGroup::NorthSouth.other(), SignalGroup::EastWest);
}
