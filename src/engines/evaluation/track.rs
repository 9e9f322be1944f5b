use crate::config::simulation::TrackConfig;
use crate::engines::generation::genome::Genome;
use crate::engines::simulation::body::BodyBuilder;
use rayon::prelude::*;

/// Opaque handle to a body on a [`KinematicTrack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(usize);

/// Driving characteristics derived once from a genome.
#[derive(Debug, Clone, Copy)]
struct Body {
    x: f64,
    speed: f64,
    clearance: f64,
    stuck: bool,
}

/// Deterministic headless stand-in for a rigid-body world.
///
/// Bodies drive right along a 1D track whose bumps grow taller with
/// distance. Speed comes from wheel size against total mass; a body gets
/// stuck for good on the first rising bump taller than its clearance,
/// which grows with its largest wheel and its chassis size. This is enough
/// signal for evolution to act on without a physics engine.
pub struct KinematicTrack {
    config: TrackConfig,
    bodies: Vec<Option<Body>>,
    free_slots: Vec<usize>,
}

impl KinematicTrack {
    pub fn new(config: TrackConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    /// Terrain height at `x`.
    pub fn terrain_height(&self, x: f64) -> f64 {
        terrain_height(&self.config, x)
    }

    /// Advance every live body by `dt` seconds.
    ///
    /// Bodies are independent, so they are stepped in parallel; the call
    /// returns only after all of them have moved.
    pub fn advance(&mut self, dt: f64) {
        let config = &self.config;
        self.bodies.par_iter_mut().flatten().for_each(|body| {
            if body.stuck {
                return;
            }
            let next_x = body.x + body.speed * dt;
            let ahead = terrain_height(config, next_x);
            let climbing = ahead > terrain_height(config, body.x);
            if climbing && ahead > body.clearance {
                body.stuck = true;
            } else {
                body.x = next_x;
            }
        });
    }

    pub fn live_bodies(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_some()).count()
    }

    fn derive_body(&self, genome: &Genome) -> Body {
        let wheels = genome.wheels();
        let wheel_mass: f64 = wheels
            .iter()
            .map(|w| w.density * std::f64::consts::PI * w.radius * w.radius)
            .sum();
        let chassis_mass = genome.chassis_area();
        let total_radius: f64 = wheels.iter().map(|w| w.radius).sum();

        // Two axles on one vertex behave like a unicycle
        let traction = if wheels[0].vertex == wheels[1].vertex { 0.5 } else { 1.0 };

        let speed = self.config.motor_speed * traction * total_radius / (1.0 + 0.02 * wheel_mass + 0.5 * chassis_mass);
        let clearance = wheels.iter().map(|w| w.radius).fold(0.0, f64::max) * (1.0 + chassis_mass.sqrt() * 0.1);

        Body {
            x: 0.0,
            speed,
            clearance,
            stuck: false,
        }
    }
}

fn terrain_height(config: &TrackConfig, x: f64) -> f64 {
    let amplitude = (x.max(0.0) * config.roughness_growth).min(config.max_bump_height);
    amplitude * (x * config.bump_frequency).sin().abs()
}

impl BodyBuilder for KinematicTrack {
    type Handle = BodyHandle;

    fn build(&mut self, genome: &Genome) -> BodyHandle {
        let body = self.derive_body(genome);
        match self.free_slots.pop() {
            Some(slot) => {
                self.bodies[slot] = Some(body);
                BodyHandle(slot)
            }
            None => {
                self.bodies.push(Some(body));
                BodyHandle(self.bodies.len() - 1)
            }
        }
    }

    fn release(&mut self, handle: BodyHandle) {
        if let Some(slot) = self.bodies.get_mut(handle.0) {
            if slot.take().is_some() {
                self.free_slots.push(handle.0);
            }
        }
    }

    fn forward_position(&self, handle: &BodyHandle) -> f64 {
        self.bodies
            .get(handle.0)
            .and_then(|b| b.as_ref())
            .map(|b| b.x)
            .unwrap_or(f64::NAN)
    }
}
