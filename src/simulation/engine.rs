use super::{
    Direction, KinematicsEngine, LaneQueue, LightView, SignalController, SlotId, Snapshot,
    Statistics, TickSummary, VehicleArena, VehicleFactory, VehicleKind, VehicleView,
};
use crate::config::SimulationConfig;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("lane queue for {direction:?} is full ({capacity} pending)")]
    QueueFull {
        direction: Direction,
        capacity: usize,
    },
}

/// The intersection simulation: four lane queues feeding a fixed-capacity
/// arena of active vehicles, governed by the signal controller. All mutable
/// state is owned here and touched only through `spawn_request` and `tick`;
/// `snapshot` is the tick-boundary hand-off for rendering.
pub struct Intersection {
    config: SimulationConfig,
    kinematics: KinematicsEngine,
    signals: SignalController,
    factory: VehicleFactory,
    queues: [LaneQueue; 4],
    arena: VehicleArena,
    stats: Statistics,
    time: f32,
    dt: f32,
}

impl Intersection {
    pub fn new(config: SimulationConfig, dt: f32, seed: Option<u64>) -> Self {
        let profile = &config.intersection.intersection;
        let kinematics = KinematicsEngine::new(
            profile.geometry.clone(),
            profile.rules.clone(),
            config.vehicles.clone(),
        );
        let signals = SignalController::new(profile.signals.clone());
        let factory = VehicleFactory::new(
            profile.geometry.clone(),
            config.vehicles.clone(),
            seed.or(config.vehicles.random.seed),
        );
        let arena = VehicleArena::with_capacity(config.vehicles.simulation.max_active);

        Self {
            config,
            kinematics,
            signals,
            factory,
            queues: [
                LaneQueue::new(),
                LaneQueue::new(),
                LaneQueue::new(),
                LaneQueue::new(),
            ],
            arena,
            stats: Statistics::default(),
            time: 0.0,
            dt,
        }
    }

    /// Enqueues a new vehicle onto an approach. Rejects (never blocks) when
    /// the approach's administrative queue capacity is reached.
    pub fn spawn_request(
        &mut self,
        direction: Direction,
        kind: Option<VehicleKind>,
    ) -> Result<(), SpawnError> {
        let capacity = self.config.vehicles.simulation.queue_capacity;
        if self.queues[direction.index()].len() >= capacity {
            self.stats.rejected += 1;
            return Err(SpawnError::QueueFull {
                direction,
                capacity,
            });
        }

        let vehicle = self.factory.build(direction, kind);
        debug!(
            "queued {:?} on {:?} approach ({:?} lane, intent {:?})",
            vehicle.kind, direction, vehicle.lane, vehicle.intent
        );
        self.queues[direction.index()].push(vehicle);
        self.stats.spawned += 1;
        Ok(())
    }

    /// Advances the simulation by one discrete step: signal evaluation,
    /// queue admission, kinematics, retirement, statistics.
    pub fn tick(&mut self) -> TickSummary {
        self.time += self.dt;

        let queue_lengths = self.queue_lengths();
        let emergency = self.emergency_presence();
        self.signals.evaluate(self.time, queue_lengths, emergency);

        let admitted = self.admit_pending();
        self.kinematics.update(&mut self.arena, &self.signals);
        let retired = self.retire_inactive();
        self.update_throughput();

        TickSummary {
            time: self.time,
            admitted,
            retired,
            active: self.arena.active_count(),
        }
    }

    /// Read-only view of all active vehicles, light states and statistics.
    pub fn snapshot(&self) -> Snapshot {
        let vehicles = self
            .arena
            .iter()
            .map(|(_, v)| VehicleView {
                kind: v.kind,
                direction: v.direction,
                position: v.position,
                speed: v.speed,
                motion: v.motion,
                bounds: v.bounds(),
            })
            .collect();

        let lights = Direction::ALL.map(|direction| LightView {
            direction,
            state: self.signals.light(direction),
        });

        Snapshot {
            time: self.time,
            vehicles,
            lights,
            queue_lengths: self.queue_lengths(),
            mode: self.signals.mode(),
            stats: self.stats,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn stats(&self) -> Statistics {
        self.stats
    }

    pub fn active_count(&self) -> usize {
        self.arena.active_count()
    }

    pub fn queue_len(&self, direction: Direction) -> usize {
        self.queues[direction.index()].len()
    }

    pub fn light(&self, direction: Direction) -> super::LightState {
        self.signals.light(direction)
    }

    pub fn mode(&self) -> super::ControllerMode {
        self.signals.mode()
    }

    fn queue_lengths(&self) -> [usize; 4] {
        Direction::ALL.map(|d| self.queues[d.index()].len())
    }

    /// An approach counts as emergency-occupied when an emergency vehicle is
    /// active on it or waiting in its queue.
    fn emergency_presence(&self) -> [bool; 4] {
        let mut present = [false; 4];
        for (_, vehicle) in self.arena.iter() {
            if vehicle.active && vehicle.kind.is_emergency() {
                present[vehicle.direction.index()] = true;
            }
        }
        for direction in Direction::ALL {
            if self.queues[direction.index()]
                .iter()
                .any(|v| v.kind.is_emergency())
            {
                present[direction.index()] = true;
            }
        }
        present
    }

    /// Moves queued vehicles into free arena slots, one per approach per
    /// tick at most, and only while the entry area is clear so an admitted
    /// vehicle never materializes inside another's following distance.
    fn admit_pending(&mut self) -> u32 {
        let mut admitted = 0;
        for direction in Direction::ALL {
            if !self.arena.has_free_slot() {
                break;
            }
            let head_lane = match self.queues[direction.index()].peek() {
                Some(head) => head.lane,
                None => continue,
            };
            if !self.entry_clear(direction, head_lane) {
                continue;
            }
            let Some(vehicle) = self.queues[direction.index()].pop() else {
                continue;
            };
            match self.arena.insert(vehicle) {
                Ok(slot) => {
                    debug!("admitted vehicle into slot {} on {:?}", slot.0, direction);
                    admitted += 1;
                }
                Err(vehicle) => {
                    debug_assert!(false, "arena full despite free-slot check");
                    self.queues[direction.index()].push(vehicle);
                    break;
                }
            }
        }
        admitted
    }

    /// No active vehicle within following distance of the spawn point.
    fn entry_clear(&self, direction: Direction, lane: super::LaneSide) -> bool {
        let geometry = &self.config.intersection.intersection.geometry;
        let spawn = geometry.spawn_point(direction, lane);
        let min_distance = self
            .config
            .intersection
            .intersection
            .rules
            .min_following_distance;

        for (_, vehicle) in self.arena.iter() {
            if (vehicle.position - spawn).magnitude() < min_distance {
                return false;
            }
        }
        true
    }

    fn retire_inactive(&mut self) -> u32 {
        let exited: Vec<SlotId> = self
            .arena
            .iter()
            .filter(|(_, v)| !v.active)
            .map(|(id, _)| id)
            .collect();

        let mut retired = 0;
        for id in exited {
            if let Some(vehicle) = self.arena.remove(id) {
                debug!(
                    "retired {:?} travelling {:?} at {:.0},{:.0}",
                    vehicle.kind, vehicle.direction, vehicle.position.x, vehicle.position.y
                );
                self.stats.passed += 1;
                retired += 1;
            }
        }
        retired
    }

    fn update_throughput(&mut self) {
        let minutes = self.time / 60.0;
        self.stats.vehicles_per_minute = if minutes > 0.0 {
            self.stats.passed as f32 / minutes
        } else {
            0.0
        };
    }
}
