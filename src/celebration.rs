use rand::{seq::SliceRandom, Rng};
use std::time::{Duration, Instant};

const SPARKS: [char; 6] = ['✦', '✧', '★', '·', '✓', '*'];

/// Seconds of simulated time per animation step
const STEP: f64 = 0.1;

/// Particle for the win overlay animation
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// letters fly to a slot in the headline and stay there
    pub target: Option<(f64, f64)>,
}

impl Particle {
    fn spark<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *SPARKS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
            target: None,
        }
    }

    fn letter<R: Rng>(from: (f64, f64), to: (f64, f64), symbol: char, rng: &mut R) -> Self {
        Self {
            x: from.0,
            y: from.1,
            vel_x: (to.0 - from.0) * 2.0,
            vel_y: (to.1 - from.1) * 2.0,
            symbol,
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: f64::INFINITY,
            target: Some(to),
        }
    }

    /// Advance by `dt` seconds; false once the particle has burnt out
    fn update(&mut self, dt: f64) -> bool {
        match self.target {
            Some((tx, ty)) => {
                let dist = ((tx - self.x).powi(2) + (ty - self.y).powi(2)).sqrt();
                if dist > 0.5 {
                    self.x += self.vel_x * dt;
                    self.y += self.vel_y * dt;
                    self.vel_x = (tx - self.x) * 2.0;
                    self.vel_y = (ty - self.y) * 2.0;
                } else {
                    self.x = tx;
                    self.y = ty;
                }
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += 9.0 * dt;
            }
        }

        self.age += dt;
        self.age < self.max_age
    }
}

/// Burst of sparks that settles into the win headline
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    started_at: Option<Instant>,
    last_step: Option<Instant>,
    duration: Duration,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            started_at: None,
            last_step: None,
            duration: Duration::from_secs(3),
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start a burst centred in a `width` x `height` area spelling `headline`
    pub fn start<R: Rng>(
        &mut self,
        headline: &str,
        width: u16,
        height: u16,
        now: Instant,
        rng: &mut R,
    ) {
        self.particles.clear();
        self.started_at = Some(now);
        self.last_step = Some(now);
        self.width = width as f64;
        self.height = height as f64;

        let cx = self.width / 2.0;
        let cy = self.height / 2.0;

        let count = headline.chars().count() as f64;
        let left = cx - (count - 1.0) / 2.0;
        for (i, ch) in headline.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let from = (cx + rng.gen_range(-10.0..10.0), cy + rng.gen_range(-4.0..4.0));
            let to = (left + i as f64, cy - 1.0);
            self.particles.push(Particle::letter(from, to, ch, rng));
        }

        for _ in 0..24 {
            let x = cx + rng.gen_range(-14.0..14.0);
            let y = cy + rng.gen_range(-5.0..5.0);
            self.particles.push(Particle::spark(x, y, rng));
        }
    }

    /// Step the simulation up to `now`; stops once the burst has run its course
    pub fn update(&mut self, now: Instant) {
        let (Some(started), Some(mut last)) = (self.started_at, self.last_step) else {
            return;
        };

        if now.duration_since(started) >= self.duration {
            self.stop();
            return;
        }

        let (w, h) = (self.width, self.height);
        let step = Duration::from_secs_f64(STEP);
        while now.duration_since(last) >= step {
            self.particles.retain_mut(|p| {
                let alive = p.update(STEP);
                let off_screen = p.y > h + 2.0 || p.x < -2.0 || p.x > w + 2.0;
                alive && (p.target.is_some() || !off_screen)
            });
            last += step;
        }
        self.last_step = Some(last);
    }

    pub fn stop(&mut self) {
        self.particles.clear();
        self.started_at = None;
        self.last_step = None;
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
