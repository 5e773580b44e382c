use rand::Rng;

pub const PARTICLE_COUNT: usize = 50;

/// Particles closer than this are linked
pub const LINK_DISTANCE: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    pub radius: f64,
    pub opacity: f64,
}

/// A line between two nearby particles, fainter with distance.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub strength: f64,
}

/// Drifting particles bouncing inside a rectangle.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(width: f64, height: f64) -> Self {
        let mut field = Self {
            width,
            height,
            particles: Vec::with_capacity(PARTICLE_COUNT),
        };
        field.reseed();
        field
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// New bounds; every particle is re-seeded.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.reseed();
    }

    fn reseed(&mut self) {
        let mut rng = rand::thread_rng();
        self.particles.clear();
        for _ in 0..PARTICLE_COUNT {
            self.particles.push(Particle {
                x: rng.gen_range(0.0..=self.width.max(0.0)),
                y: rng.gen_range(0.0..=self.height.max(0.0)),
                vx: rng.gen_range(-1.0..1.0),
                vy: rng.gen_range(-1.0..1.0),
                radius: rng.gen_range(1.0..3.0),
                opacity: rng.gen_range(0.3..0.8),
            });
        }
    }

    /// Move every particle one frame, bouncing off the edges.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            if p.x < 0.0 || p.x > self.width {
                p.vx = -p.vx;
            }
            if p.y < 0.0 || p.y > self.height {
                p.vy = -p.vy;
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = (a.x - b.x).hypot(a.y - b.y);
                if distance < LINK_DISTANCE {
                    links.push(Link {
                        from: (a.x, a.y),
                        to: (b.x, b.y),
                        strength: 1.0 - distance / LINK_DISTANCE,
                    });
                }
            }
        }
        links
    }
}
