//! Ambient particle simulation.
//!
//! # Invariants
//! - A particle orbits while any note center is within [`CAPTURE_RADIUS`];
//!   the first center in render order wins, not the nearest.
//! - The orbit radius is drawn once per capture and kept until release.
//! - Free particles bounce off canvas edges by flipping a velocity component.
//! - The field only reads note centers; it never touches the note model.

use super::canvas::{Canvas, Rgba};
use super::trail::{Trail, TRAIL_LENGTH};
use crate::model::geometry::Point;
use crate::model::prefs::Theme;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::ops::Range;

pub const PARTICLE_COUNT: usize = 160;
/// Distance under which a note center captures a particle.
pub const CAPTURE_RADIUS: f64 = 120.0;

const DOT_RADIUS: Range<f64> = 1.0..4.0;
const SPEED: Range<f64> = -0.5..0.5;
const BASE_ALPHA: Range<f64> = 0.2..0.7;
const ANGULAR_SPEED: Range<f64> = 0.02..0.04;
const ORBIT_RADIUS: Range<f64> = 30.0..80.0;
/// Smallest trail disc as a fraction of the particle radius.
const TAIL_RADIUS_FLOOR: f64 = 0.3;

const BACKGROUND_DARK: Rgba = Rgba::new(18, 18, 18, 0.2);
const BACKGROUND_LIGHT: Rgba = Rgba::new(248, 249, 250, 0.2);
const PARTICLE_DARK: Rgba = Rgba::new(255, 255, 255, 1.0);
const PARTICLE_LIGHT: Rgba = Rgba::new(50, 50, 50, 1.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    FreeRoam,
    Orbiting {
        center: Point,
        radius: f64,
        angle: f64,
    },
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Point,
    pub radius: f64,
    pub velocity: Point,
    pub base_alpha: f64,
    /// Angle an orbit starts from.
    pub seed_angle: f64,
    /// Radians advanced per frame while orbiting.
    pub angular_speed: f64,
    pub motion: Motion,
    pub trail: Trail,
}

impl Particle {
    fn spawn(rng: &mut StdRng, width: f64, height: f64) -> Self {
        Self {
            position: Point::new(rng.gen::<f64>() * width, rng.gen::<f64>() * height),
            radius: rng.gen_range(DOT_RADIUS),
            velocity: Point::new(rng.gen_range(SPEED), rng.gen_range(SPEED)),
            base_alpha: rng.gen_range(BASE_ALPHA),
            seed_angle: rng.gen_range(0.0..TAU),
            angular_speed: rng.gen_range(ANGULAR_SPEED),
            motion: Motion::FreeRoam,
            trail: Trail::new(),
        }
    }

    pub fn is_orbiting(&self) -> bool {
        matches!(self.motion, Motion::Orbiting { .. })
    }

    fn step(&mut self, centers: &[Point], width: f64, height: f64, rng: &mut StdRng) {
        let captured = centers
            .iter()
            .copied()
            .find(|center| self.position.distance_to(*center) < CAPTURE_RADIUS);

        match captured {
            Some(center) => {
                let (radius, angle) = match self.motion {
                    Motion::Orbiting { radius, angle, .. } => (radius, angle),
                    Motion::FreeRoam => (rng.gen_range(ORBIT_RADIUS), self.seed_angle),
                };
                let angle = angle + self.angular_speed;
                self.position = Point::new(
                    center.x + angle.cos() * radius,
                    center.y + angle.sin() * radius,
                );
                self.motion = Motion::Orbiting {
                    center,
                    radius,
                    angle,
                };
            }
            None => {
                self.motion = Motion::FreeRoam;
                self.position.x += self.velocity.x;
                self.position.y += self.velocity.y;
                if (self.position.x < 0.0 && self.velocity.x < 0.0)
                    || (self.position.x > width && self.velocity.x > 0.0)
                {
                    self.velocity.x = -self.velocity.x;
                }
                if (self.position.y < 0.0 && self.velocity.y < 0.0)
                    || (self.position.y > height && self.velocity.y > 0.0)
                {
                    self.velocity.y = -self.velocity.y;
                }
            }
        }

        self.trail.push(self.position);
    }

    fn draw(&self, canvas: &mut impl Canvas, color: Rgba) {
        let len = self.trail.len() as f64;
        let intensity = if self.is_orbiting() {
            1.0
        } else {
            self.base_alpha
        };
        for (index, point) in self.trail.iter().enumerate() {
            let index = index as f64;
            let alpha = (index + 1.0) / len * intensity;
            let radius = self.radius * (index / TRAIL_LENGTH as f64 + TAIL_RADIUS_FLOOR);
            canvas.fill_disc(*point, radius, color.with_alpha(alpha));
        }
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
    count: usize,
    width: f64,
    height: f64,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_rng(width, height, PARTICLE_COUNT, StdRng::from_entropy())
    }

    pub fn with_rng(width: f64, height: f64, count: usize, rng: StdRng) -> Self {
        let mut field = Self {
            particles: Vec::with_capacity(count),
            count,
            width,
            height,
            rng,
        };
        field.respawn();
        field
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Adopts a new canvas size and scatters every particle again.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.respawn();
        debug!(
            "event=particles_resize module=particles status=ok width={} height={} count={}",
            width, height, self.count
        );
    }

    /// Advances every particle one frame against the given note centers.
    pub fn step(&mut self, centers: &[Point]) {
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.step(centers, width, height, &mut self.rng);
        }
    }

    /// Paints the translucent background, then every trail.
    pub fn draw(&self, canvas: &mut impl Canvas, theme: Theme) {
        let (background, ink) = match theme {
            Theme::Dark => (BACKGROUND_DARK, PARTICLE_DARK),
            Theme::Light => (BACKGROUND_LIGHT, PARTICLE_LIGHT),
        };
        canvas.fill_background(background);
        for particle in &self.particles {
            particle.draw(canvas, ink);
        }
    }

    /// One animation tick. Returns `false` without touching anything when
    /// particles are disabled.
    pub fn frame(
        &mut self,
        centers: &[Point],
        theme: Theme,
        enabled: bool,
        canvas: &mut impl Canvas,
    ) -> bool {
        if !enabled {
            return false;
        }
        self.step(centers);
        self.draw(canvas, theme);
        true
    }

    fn respawn(&mut self) {
        let (width, height) = (self.width, self.height);
        let rng = &mut self.rng;
        self.particles = (0..self.count)
            .map(|_| Particle::spawn(rng, width, height))
            .collect();
    }
}
