//! Main simulation world that ties everything together
//!
//! `SimWorld` owns every entity pool plus the clock, signal and random
//! source. A host calls `tick()` at its own cadence and reads `snapshot()`
//! between ticks.

use anyhow::{Context, Result};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::ambient::{self, SimBird, SimCloud};
use super::clock::EnvironmentClock;
use super::config::SimConfig;
use super::crossing::{count_crossers, update_crossing_pedestrians, update_sidewalk_pedestrians};
use super::layout::SceneLayout;
use super::pedestrian::{CrossingGate, PedestrianState, SimPedestrian};
use super::signal::SignalController;
use super::snapshot::SceneSnapshot;
use super::stats::SimulationStats;
use super::traffic::{corridor_occupied, spawn_vehicles, update_vehicles};
use super::types::{Direction, PathSide, PedestrianId, SimId};
use super::vehicle::SimVehicle;

/// Columns used by the ASCII road map
const MAP_COLUMNS: usize = 100;

/// The main simulation world
pub struct SimWorld {
    pub layout: SceneLayout,
    pub clock: EnvironmentClock,
    pub signal: SignalController,

    /// Fixed pool, recycled in place
    pub vehicles: Vec<SimVehicle>,

    /// Strollers that never cross
    pub sidewalk_pedestrians: Vec<SimPedestrian>,

    /// Pedestrians that shuttle across the corridor
    pub crossing_pedestrians: Vec<SimPedestrian>,

    pub birds: Vec<SimBird>,
    pub clouds: Vec<SimCloud>,

    pub stats: SimulationStats,

    /// Next ID to assign
    next_id: usize,

    /// Single source for every random draw
    rng: StdRng,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(config: &SimConfig, rng: StdRng) -> Self {
        let layout = SceneLayout::from_window(config.width, config.height);
        let clock = EnvironmentClock::new(config.start_time, config.time_rate, config.day_night_cycle);

        let mut world = Self {
            layout,
            clock,
            signal: SignalController::new(),
            vehicles: Vec::new(),
            sidewalk_pedestrians: Vec::new(),
            crossing_pedestrians: Vec::new(),
            birds: Vec::new(),
            clouds: Vec::new(),
            stats: SimulationStats::default(),
            next_id: 0,
            rng,
        };
        world.populate(config);
        world
    }

    /// Default scene with an OS-seeded random source
    pub fn new() -> Self {
        Self::new_internal(&SimConfig::default(), StdRng::from_rng(&mut rand::rng()))
    }

    /// Default scene with a seeded random source for reproducible runs
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(&SimConfig::default(), StdRng::seed_from_u64(seed))
    }

    /// Build from a validated configuration
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::from_config_with_rng(config, rng)
    }

    /// Build from a configuration using a caller-supplied random source
    pub fn from_config_with_rng(config: &SimConfig, rng: StdRng) -> Result<Self> {
        config.validate().context("Invalid simulation configuration")?;
        if !config.day_night_cycle && config.time_rate > 0.0 {
            warn!("Day/night cycle disabled; ignoring time rate {}", config.time_rate);
        }
        let world = Self::new_internal(config, rng);
        info!(
            "Built scene {}x{}: {} vehicles, {} sidewalk and {} crossing pedestrians",
            world.layout.width,
            world.layout.height,
            world.vehicles.len(),
            world.sidewalk_pedestrians.len(),
            world.crossing_pedestrians.len()
        );
        Ok(world)
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    fn populate(&mut self, config: &SimConfig) {
        self.vehicles = spawn_vehicles(config.vehicles, self.next_id, &self.layout, &mut self.rng);
        self.next_id += config.vehicles;

        for _ in 0..config.sidewalk_pedestrians {
            let id = PedestrianId(self.next_sim_id());
            let pedestrian = SimPedestrian::sidewalk(id, &self.layout, &mut self.rng);
            self.sidewalk_pedestrians.push(pedestrian);
        }

        // Crossers alternate which kerb they start on
        for i in 0..config.crossing_pedestrians {
            let id = PedestrianId(self.next_sim_id());
            let side = if i % 2 == 0 {
                PathSide::Upper
            } else {
                PathSide::Lower
            };
            let pedestrian = SimPedestrian::crosser(id, side, &self.layout, &mut self.rng);
            self.crossing_pedestrians.push(pedestrian);
        }

        self.birds = ambient::spawn_birds(self.clock.is_night(), &self.layout, &mut self.rng);
        self.clouds = ambient::spawn_clouds(config.clouds, &self.layout, &mut self.rng);
    }

    /// Pedestrians currently in the corridor
    pub fn crossers(&self) -> usize {
        count_crossers(&self.crossing_pedestrians)
    }

    pub fn corridor_occupied(&self) -> bool {
        corridor_occupied(&self.vehicles, &self.layout.corridor)
    }

    /// Main simulation tick: clock, signal, vehicles, then pedestrians
    pub fn tick(&mut self) {
        self.clock.tick();

        if let Some(change) = self.signal.tick() {
            self.stats.record_phase_change(&change);
        }
        let reading = self.signal.reading();

        let recycled = update_vehicles(&mut self.vehicles, &reading, &self.layout, &mut self.rng);
        self.stats.vehicles_recycled += recycled.len() as u64;

        let is_night = self.clock.is_night();
        let gate = CrossingGate::new(
            is_night,
            reading.phase,
            self.crossers(),
            self.corridor_occupied(),
        );
        let events = update_crossing_pedestrians(
            &mut self.crossing_pedestrians,
            gate,
            &self.layout,
            &mut self.rng,
        );
        for (_, event) in events {
            self.stats.record_crossing_event(event);
        }
        let crossers = self.crossers();
        self.stats.record_crossers(crossers);

        update_sidewalk_pedestrians(&mut self.sidewalk_pedestrians, is_night, &self.layout);

        ambient::update_birds(&mut self.birds, is_night, &self.layout, &mut self.rng);
        let alpha = self.clock.daylight_alpha();
        ambient::update_clouds(&mut self.clouds, is_night, alpha, &self.layout, &mut self.rng);

        self.stats.ticks += 1;
    }

    /// Run `ticks` ticks back to back
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Rebuild the layout for a new window size and re-seat every entity on it
    pub fn resize(&mut self, width: f32, height: f32) {
        let height = if height <= 0.0 { 1.0 } else { height };
        let previous_center = self.layout.corridor.center_x;
        self.layout = SceneLayout::from_window(width, height);
        let corridor_shift = self.layout.corridor.center_x - previous_center;

        for vehicle in &mut self.vehicles {
            vehicle.y = self.layout.lane_y(vehicle.direction);
        }
        for pedestrian in self
            .sidewalk_pedestrians
            .iter_mut()
            .chain(self.crossing_pedestrians.iter_mut())
        {
            pedestrian.reseat(&self.layout, corridor_shift);
        }
        info!("Resized scene to {}x{}", width, height);
    }

    /// Copy of everything a renderer needs for this frame
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            tick: self.stats.ticks,
            time_of_day: self.clock.time(),
            darkness: self.clock.darkness(),
            is_night: self.clock.is_night(),
            signal: self.signal.reading(),
            corridor: self.layout.corridor,
            vehicles: self.vehicles.clone(),
            sidewalk_pedestrians: self.sidewalk_pedestrians.clone(),
            crossing_pedestrians: self.crossing_pedestrians.clone(),
            birds: self.birds.clone(),
            clouds: self.clouds.clone(),
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Street Simulation Summary ===");
        println!(
            "Tick: {}, time of day: {:.3} ({}), darkness: {:.2}",
            self.stats.ticks,
            self.clock.time(),
            if self.clock.is_night() { "night" } else { "day" },
            self.clock.darkness()
        );
        println!(
            "Signal: {:?} ({} ticks left)",
            self.signal.phase(),
            self.signal.remaining()
        );
        println!(
            "Corridor: {} | crossers: {}",
            if self.corridor_occupied() {
                "occupied"
            } else {
                "clear"
            },
            self.crossers()
        );

        println!("--- Vehicles ---");
        for vehicle in &self.vehicles {
            println!(
                "  Vehicle {:?}: {:?} {:?} x={:.1} speed={:.2}/{:.2}",
                vehicle.id.0 .0,
                vehicle.kind,
                vehicle.direction,
                vehicle.x,
                vehicle.speed,
                vehicle.base_speed
            );
        }

        println!("--- Crossing Pedestrians ---");
        for pedestrian in &self.crossing_pedestrians {
            println!(
                "  Pedestrian {:?}: {:?} on {:?} at ({:.1}, {:.1})",
                pedestrian.id.0 .0, pedestrian.state, pedestrian.path_side, pedestrian.x, pedestrian.y
            );
        }
    }

    /// Draw the road strip in the terminal
    pub fn draw_map(&self) {
        let scale = MAP_COLUMNS as f32 / self.layout.width.max(1.0);
        let to_col = |x: f32| -> Option<usize> {
            let col = (x * scale).floor();
            if col < 0.0 || col >= MAP_COLUMNS as f32 {
                None
            } else {
                Some(col as usize)
            }
        };

        // Rows from top: upper sidewalk, backward lane, forward lane, lower sidewalk
        let levels = [
            self.layout.upper_sidewalk_y,
            self.layout.lane_backward_y,
            self.layout.lane_forward_y,
            self.layout.lower_sidewalk_y,
        ];
        let nearest_row = |y: f32| -> usize {
            levels
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    (*a - y)
                        .abs()
                        .partial_cmp(&(*b - y).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(row, _)| row)
                .unwrap_or(0)
        };

        let mut grid = vec![vec![' '; MAP_COLUMNS]; levels.len()];
        for row in &mut grid[1..3] {
            row.fill('-');
        }

        let corridor = &self.layout.corridor;
        for row in &mut grid[1..3] {
            let start = to_col(corridor.front_edge).unwrap_or(0);
            let end = to_col(corridor.back_edge).unwrap_or(MAP_COLUMNS - 1);
            for cell in &mut row[start..=end] {
                *cell = '=';
            }
        }
        if let Some(col) = to_col(corridor.stop_line_forward) {
            grid[2][col] = '|';
        }
        if let Some(col) = to_col(corridor.stop_line_backward) {
            grid[1][col] = '|';
        }

        for vehicle in &self.vehicles {
            let row = match vehicle.direction {
                Direction::Backward => 1,
                Direction::Forward => 2,
            };
            let glyph = match vehicle.direction {
                Direction::Forward => '>',
                Direction::Backward => '<',
            };
            let start = vehicle.x.max(0.0);
            let end = (vehicle.x + vehicle.width).min(self.layout.width);
            let mut x = start;
            while x < end {
                if let Some(col) = to_col(x) {
                    grid[row][col] = glyph;
                }
                x += 1.0 / scale;
            }
        }

        for pedestrian in &self.sidewalk_pedestrians {
            if let Some(col) = to_col(pedestrian.x) {
                grid[nearest_row(pedestrian.y)][col] = 'o';
            }
        }
        for pedestrian in &self.crossing_pedestrians {
            if let Some(col) = to_col(pedestrian.x) {
                let glyph = match pedestrian.state {
                    PedestrianState::Crossing => 'X',
                    _ => 'x',
                };
                grid[nearest_row(pedestrian.y)][col] = glyph;
            }
        }

        println!("\n=== Road Map ===");
        println!("Legend: >/< = Vehicle, = = Crossing, | = Stop line, o = Walker, x/X = Waiting/Crossing");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
