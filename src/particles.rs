pub const DEFAULT_PARTICLE_COUNT: usize = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub alpha: f64,
}

impl Particle {
    fn spawn(width: f64, height: f64, rng: &mut impl FnMut() -> f64) -> Self {
        Self {
            x: rng() * width,
            y: rng() * height,
            size: rng() * 2.0 + 1.0,
            speed_x: rng() * 0.5 - 0.25,
            speed_y: rng() * 0.5 - 0.25,
            alpha: rng() * 0.3,
        }
    }

    pub fn fill_style(&self) -> String {
        format!("rgba(255, 255, 255, {})", self.alpha)
    }

    fn advance(&mut self, width: f64, height: f64) {
        self.x += self.speed_x;
        self.y += self.speed_y;

        if self.x > width {
            self.x = 0.0;
        }
        if self.x < 0.0 {
            self.x = width;
        }
        if self.y > height {
            self.y = 0.0;
        }
        if self.y < 0.0 {
            self.y = height;
        }
    }
}

/// Drifting dots behind the hero section. Positions wrap at the edges.
#[derive(Clone, Debug)]
pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// `rng` yields values in `[0, 1)`.
    pub fn new(width: f64, height: f64, count: usize, mut rng: impl FnMut() -> f64) -> Self {
        let particles = (0..count)
            .map(|_| Particle::spawn(width, height, &mut rng))
            .collect();

        Self {
            width,
            height,
            particles,
        }
    }

    pub fn tick(&mut self) {
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.advance(width, height);
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(values: &'static [f64]) -> impl FnMut() -> f64 {
        let mut index = 0;
        move || {
            let value = values[index % values.len()];
            index += 1;
            value
        }
    }

    #[test]
    fn spawn_maps_unit_samples_into_ranges() {
        let field = ParticleField::new(100.0, 50.0, 1, sequence(&[0.5, 0.5, 0.5, 1.0, 0.0, 0.5]));
        let particle = &field.particles()[0];

        assert_eq!(particle.x, 50.0);
        assert_eq!(particle.y, 25.0);
        assert_eq!(particle.size, 2.0);
        assert_eq!(particle.speed_x, 0.25);
        assert_eq!(particle.speed_y, -0.25);
        assert_eq!(particle.alpha, 0.15);
        assert_eq!(particle.fill_style(), "rgba(255, 255, 255, 0.15)");
    }

    #[test]
    fn particles_wrap_across_edges() {
        // x starts at 99.9 moving right, y at 0.1 moving up.
        let mut field =
            ParticleField::new(100.0, 100.0, 1, sequence(&[0.999, 0.001, 0.0, 1.0, 0.0, 0.0]));

        field.tick();
        let particle = &field.particles()[0];
        assert_eq!(particle.x, 0.0);
        assert_eq!(particle.y, 100.0);
    }

    #[test]
    fn resize_keeps_particles() {
        let mut field = ParticleField::new(10.0, 10.0, DEFAULT_PARTICLE_COUNT, sequence(&[0.3]));

        field.resize(40.0, 20.0);

        assert_eq!(field.particles().len(), DEFAULT_PARTICLE_COUNT);
        assert_eq!(field.size(), (40.0, 20.0));
    }
}
