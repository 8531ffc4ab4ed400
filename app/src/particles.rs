use rand::{Rng, SeedableRng, rngs::StdRng};
use sdl2::{pixels::Color, rect::Rect, render::Canvas, video::Window};
use std::time::{Duration, Instant};

const SPAWN_PERIOD: Duration = Duration::from_millis(100);
const GRAVITY: f32 = 0.05;

struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    life: u32,
    max_life: u32,
    size: u32,
}

/// Decorative particles emitted from the tracked dot. Spawn rate scales with
/// the current mood's intensity; each particle drifts, falls and fades out
/// over its lifetime.
pub struct ParticleOverlay {
    particles: Vec<Particle>,
    rng: StdRng,
    last_spawn: Instant,
}

impl ParticleOverlay {
    pub fn new(now: Instant) -> Self {
        Self {
            particles: Vec::new(),
            rng: StdRng::from_os_rng(),
            last_spawn: now - SPAWN_PERIOD,
        }
    }

    pub fn update(
        &mut self,
        dot_x: f32,
        dot_y: f32,
        intensity: f32,
        active: bool,
        now: Instant,
    ) {
        for particle in &mut self.particles {
            particle.x += particle.vx;
            particle.y += particle.vy;
            particle.vy += GRAVITY;
            particle.life += 1;
        }
        self.particles.retain(|p| p.life < p.max_life);
        if !active || intensity < 0.1 {
            return;
        }
        if now.duration_since(self.last_spawn) < SPAWN_PERIOD {
            return;
        }
        self.last_spawn = now;
        let count = (intensity * 5.0) as usize;
        for _ in 0..count {
            self.particles.push(Particle {
                x: dot_x + self.rng.random_range(-10.0..10.0),
                y: dot_y + self.rng.random_range(-10.0..10.0),
                vx: self.rng.random_range(-1.0..1.0),
                vy: self.rng.random_range(-1.0..1.0),
                life: 0,
                max_life: self.rng.random_range(60..120),
                size: self.rng.random_range(2..5),
            });
        }
    }

    pub fn draw(&self, canvas: &mut Canvas<Window>, color: Color) {
        for particle in &self.particles {
            let fade = 1.0 - particle.life as f32 / particle.max_life as f32;
            let alpha = (fade * 255.0) as u8;
            canvas.set_draw_color(Color::RGBA(
                color.r, color.g, color.b, alpha,
            ));
            let rect = Rect::new(
                particle.x as i32,
                particle.y as i32,
                particle.size,
                particle.size,
            );
            let _ = canvas.fill_rect(rect);
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.particles.len()
    }
}
