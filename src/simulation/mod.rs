use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

pub mod engine;
pub mod kinematics;
pub mod queue;
pub mod signals;
pub mod spawn;

pub use engine::*;
pub use kinematics::*;
pub use queue::*;
pub use signals::*;
pub use spawn::*;

pub type Vec2 = Vector2<f32>;
pub type Point = Point2<f32>;

/// Travel direction of an approach. Screen coordinates: y grows downward,
/// so North traffic moves toward -y and spawns at the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Wire code used by the lane-file spawn feed.
    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            0 => Some(Direction::North),
            1 => Some(Direction::South),
            2 => Some(Direction::East),
            3 => Some(Direction::West),
            _ => None,
        }
    }

    /// Unit travel vector in screen coordinates.
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::North => Vector2::new(0.0, -1.0),
            Direction::South => Vector2::new(0.0, 1.0),
            Direction::East => Vector2::new(1.0, 0.0),
            Direction::West => Vector2::new(-1.0, 0.0),
        }
    }

    /// Heading after a left turn.
    pub fn left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// Heading after a right turn.
    pub fn right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn group(self) -> SignalGroup {
        match self {
            Direction::North | Direction::South => SignalGroup::NorthSouth,
            Direction::East | Direction::West => SignalGroup::EastWest,
        }
    }
}

/// Vehicle category. Everything except `Car` is an emergency kind; all
/// emergency kinds share equal precedence. Cruising speeds and spawn weights
/// live in the vehicles config, keyed by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    Car,
    Ambulance,
    Police,
    FireTruck,
}

impl VehicleKind {
    /// Emergency kinds are exempt from red-light stopping (deliberate
    /// priority-access rule). They are never exempt from lane spacing.
    pub fn is_emergency(self) -> bool {
        !matches!(self, VehicleKind::Car)
    }

    /// Wire code used by the lane-file spawn feed.
    pub fn from_code(code: u8) -> Option<VehicleKind> {
        match code {
            0 => Some(VehicleKind::Car),
            1 => Some(VehicleKind::Ambulance),
            2 => Some(VehicleKind::Police),
            3 => Some(VehicleKind::FireTruck),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Moving,
    Decelerating,
    Stopped,
    Turning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnIntent {
    None,
    Left,
    Right,
}

/// Side within the approach's directional half of the road, relative to the
/// travel heading. `Left` is the inner lane next to the centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneSide {
    Left,
    Right,
}

/// Quarter-circle arc a turning vehicle is committed to.
#[derive(Debug, Clone)]
pub struct TurnPath {
    pub center: Point,
    pub radius: f32,
    /// Vector from the arc center to the entry point.
    pub entry: Vec2,
    /// Rotation sense: +1.0 for right turns, -1.0 for left turns.
    pub sense: f32,
    /// Heading once the arc completes.
    pub to: Direction,
    /// Arc progress in [0, 1].
    pub progress: f32,
}

impl TurnPath {
    pub fn arc_length(&self) -> f32 {
        self.radius * std::f32::consts::FRAC_PI_2
    }

    /// Position on the arc at the given progress.
    pub fn at(&self, progress: f32) -> Point {
        let theta = self.sense * progress * std::f32::consts::FRAC_PI_2;
        let rotation = nalgebra::Rotation2::new(theta);
        self.center + rotation * self.entry
    }
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub kind: VehicleKind,
    pub direction: Direction,
    pub position: Point,
    /// Scalar speed in distance units per tick.
    pub speed: f32,
    pub motion: MotionState,
    pub intent: TurnIntent,
    pub lane: LaneSide,
    pub active: bool,
    pub turn_path: Option<TurnPath>,
}

impl Vehicle {
    /// Position projected onto the travel axis. Grows as the vehicle
    /// approaches and passes the intersection.
    pub fn progress(&self) -> f32 {
        self.position.coords.dot(&self.direction.unit())
    }

    /// Axis-aligned draw bounds, centered on the position.
    pub fn bounds(&self) -> Rect {
        let (w, h) = match self.direction {
            Direction::North | Direction::South => (VEHICLE_WIDTH, VEHICLE_LENGTH),
            Direction::East | Direction::West => (VEHICLE_LENGTH, VEHICLE_WIDTH),
        };
        Rect {
            x: self.position.x - w / 2.0,
            y: self.position.y - h / 2.0,
            w,
            h,
        }
    }
}

pub const VEHICLE_WIDTH: f32 = 20.0;
pub const VEHICLE_LENGTH: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotId(pub usize);

/// Fixed-capacity arena for active vehicles. Slots are stable indices, so
/// admission and retirement never shift other vehicles or allocate.
#[derive(Debug, Clone)]
pub struct VehicleArena {
    slots: Vec<Option<Vehicle>>,
    free: Vec<usize>,
}

impl VehicleArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            free: (0..capacity).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn has_free_slot(&self) -> bool {
        !self.free.is_empty()
    }

    /// Places a vehicle into a free slot, or returns it when full.
    pub fn insert(&mut self, vehicle: Vehicle) -> Result<SlotId, Vehicle> {
        match self.free.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].is_none(), "free list out of sync");
                self.slots[index] = Some(vehicle);
                Ok(SlotId(index))
            }
            None => Err(vehicle),
        }
    }

    pub fn remove(&mut self, id: SlotId) -> Option<Vehicle> {
        let vehicle = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        Some(vehicle)
    }

    pub fn get(&self, id: SlotId) -> Option<&Vehicle> {
        self.slots.get(id.0)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Vehicle> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Vehicle)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (SlotId(i), v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut Vehicle)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (SlotId(i), v)))
    }
}

/// Aggregate counters, mutated only by the engine at enqueue, reject and
/// retirement events.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    pub spawned: u32,
    pub passed: u32,
    pub rejected: u32,
    pub vehicles_per_minute: f32,
}

/// Per-tick observability summary returned by `Intersection::tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummary {
    pub time: f32,
    pub admitted: u32,
    pub retired: u32,
    pub active: usize,
}

/// Read-only view of the simulation taken at a tick boundary, for the
/// rendering collaborator.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: f32,
    pub vehicles: Vec<VehicleView>,
    pub lights: [LightView; 4],
    pub queue_lengths: [usize; 4],
    pub mode: ControllerMode,
    pub stats: Statistics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleView {
    pub kind: VehicleKind,
    pub direction: Direction,
    pub position: Point,
    pub speed: f32,
    pub motion: MotionState,
    pub bounds: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightView {
    pub direction: Direction,
    pub state: LightState,
}
