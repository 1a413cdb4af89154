use super::color::Rgb;
use super::constants::*;
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldVariant {
    /// Persistent page background: direct pointer nudge, no links.
    Drift,
    /// Eased repulsion with a drift back to the undisturbed path, plus
    /// connective lines between close particles.
    Constellation,
}

impl FieldVariant {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drift" => Some(FieldVariant::Drift),
            "constellation" => Some(FieldVariant::Constellation),
            _ => None,
        }
    }

    pub fn min_radius(self) -> f32 {
        match self {
            FieldVariant::Drift => DRIFT_MIN_RADIUS,
            FieldVariant::Constellation => CONSTELLATION_MIN_RADIUS,
        }
    }

    /// `(min, span)` of the random alpha range when alpha blending is on.
    pub fn alpha_range(self) -> (f32, f32) {
        match self {
            FieldVariant::Drift => (DRIFT_ALPHA_MIN, DRIFT_ALPHA_SPAN),
            FieldVariant::Constellation => (CONSTELLATION_ALPHA_MIN, CONSTELLATION_ALPHA_SPAN),
        }
    }

    pub fn interaction_radius(self) -> f32 {
        match self {
            FieldVariant::Drift => DRIFT_INTERACTION_RADIUS,
            FieldVariant::Constellation => CONSTELLATION_INTERACTION_RADIUS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParticleFieldConfig {
    pub count: usize,
    pub spread: f32,
    pub speed: f32,
    pub colors: Vec<Rgb>,
    pub hover_repel: bool,
    pub hover_factor: f32,
    pub alpha_blend: bool,
    pub variant: FieldVariant,
    /// Replace `count` with the device tier's count for the current viewport.
    pub adaptive_count: bool,
}

impl Default for ParticleFieldConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            spread: DEFAULT_PARTICLE_SPREAD,
            speed: DEFAULT_PARTICLE_SPEED,
            colors: vec![Rgb::WHITE],
            hover_repel: true,
            hover_factor: DEFAULT_HOVER_FACTOR,
            alpha_blend: true,
            variant: FieldVariant::Drift,
            adaptive_count: false,
        }
    }
}

impl ParticleFieldConfig {
    pub fn effective_count(&self, viewport: Viewport) -> usize {
        if self.adaptive_count {
            DeviceTier::for_width(viewport.width).particle_count()
        } else {
            self.count
        }
    }

    pub fn draws_links(&self) -> bool {
        self.alpha_blend && self.variant == FieldVariant::Constellation
    }
}

/// Viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceTier {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceTier {
    pub fn for_width(width: f32) -> Self {
        if width <= MOBILE_MAX_WIDTH {
            DeviceTier::Mobile
        } else if width <= TABLET_MAX_WIDTH {
            DeviceTier::Tablet
        } else {
            DeviceTier::Desktop
        }
    }

    pub fn particle_count(self) -> usize {
        match self {
            DeviceTier::Mobile => MOBILE_PARTICLES,
            DeviceTier::Tablet => TABLET_PARTICLES,
            DeviceTier::Desktop => DESKTOP_PARTICLES,
        }
    }
}

/// Last known pointer position in canvas-local CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub pos: Vec2,
    pub active: bool,
}

impl PointerState {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            active: true,
        }
    }
}

/// Where a displaced particle would be had the pointer never touched it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathAnchor {
    pub origin: Vec2,
    pub steps: u32,
}

impl PathAnchor {
    #[inline]
    pub fn point(&self, vel: Vec2) -> Vec2 {
        self.origin + vel * self.steps as f32
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
    pub anchor: Option<PathAnchor>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: Vec2,
    pub b: Vec2,
    pub alpha: f32,
}

/// Drawing seam for the field.
pub trait ParticleSurface {
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
    fn stroke_line(&mut self, a: Vec2, b: Vec2, alpha: f32, width: f32);
}

/// Displacement pushing a particle away from the pointer, or `None` when the
/// particle is outside the interaction radius.
pub fn repulsion(pointer: Vec2, pos: Vec2, radius: f32, factor: f32) -> Option<Vec2> {
    let away = pos - pointer;
    let distance = away.length();
    if distance >= radius {
        return None;
    }
    let force = (radius - distance) / radius * factor;
    let dir = away.try_normalize().unwrap_or(Vec2::NEG_X);
    Some(dir * force)
}

/// Map a coordinate back into `[0, extent)`. Leaving past the far edge
/// restarts at zero; leaving past zero re-enters from the far edge.
#[inline]
pub fn wrap_axis(v: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !v.is_finite() {
        return 0.0;
    }
    if v >= extent {
        return 0.0;
    }
    if v < 0.0 {
        let w = v.rem_euclid(extent);
        return if w >= extent { 0.0 } else { w };
    }
    v
}

pub struct ParticleField {
    config: ParticleFieldConfig,
    viewport: Viewport,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(config: ParticleFieldConfig, viewport: Viewport, rng: &mut R) -> Self {
        let mut field = Self {
            config,
            viewport,
            particles: Vec::new(),
        };
        field.reinitialize(viewport, rng);
        field
    }

    /// Build a field from an explicit particle set (positions are wrapped
    /// into the viewport).
    pub fn with_particles(
        config: ParticleFieldConfig,
        viewport: Viewport,
        mut particles: Vec<Particle>,
    ) -> Self {
        for p in particles.iter_mut() {
            p.pos = Vec2::new(
                wrap_axis(p.pos.x, viewport.width),
                wrap_axis(p.pos.y, viewport.height),
            );
        }
        Self {
            config,
            viewport,
            particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Replace the whole particle set for `viewport`.
    pub fn reinitialize<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.viewport = viewport;
        self.particles.clear();
        if viewport.is_empty() {
            return;
        }
        let count = self.config.effective_count(viewport);
        let speed = self.config.speed;
        let spread = self.config.spread.max(0.0);
        let min_radius = self.config.variant.min_radius();
        let (alpha_min, alpha_span) = self.config.variant.alpha_range();
        self.particles.reserve_exact(count);
        for _ in 0..count {
            let color = if self.config.colors.is_empty() {
                Rgb::WHITE
            } else {
                self.config.colors[rng.gen_range(0..self.config.colors.len())]
            };
            let alpha = if self.config.alpha_blend {
                alpha_min + rng.gen::<f32>() * alpha_span
            } else {
                1.0
            };
            self.particles.push(Particle {
                pos: Vec2::new(
                    wrap_axis(rng.gen::<f32>() * viewport.width, viewport.width),
                    wrap_axis(rng.gen::<f32>() * viewport.height, viewport.height),
                ),
                vel: Vec2::new(
                    (rng.gen::<f32>() - 0.5) * speed,
                    (rng.gen::<f32>() - 0.5) * speed,
                ),
                radius: min_radius + rng.gen::<f32>() * spread,
                color,
                alpha,
                anchor: None,
            });
        }
    }

    /// Advance one frame: integrate, react to the pointer, wrap.
    pub fn step(&mut self, pointer: &PointerState) {
        let Viewport { width, height } = self.viewport;
        let variant = self.config.variant;
        let radius = variant.interaction_radius();
        let factor = self.config.hover_factor;
        let repel = self.config.hover_repel;

        for p in self.particles.iter_mut() {
            if let Some(anchor) = p.anchor.as_mut() {
                anchor.steps = anchor.steps.saturating_add(1);
            } else if repel && pointer.active && variant == FieldVariant::Constellation {
                p.anchor = Some(PathAnchor {
                    origin: p.pos,
                    steps: 1,
                });
            }
            p.pos += p.vel;

            if repel {
                let push = if pointer.active {
                    repulsion(pointer.pos, p.pos, radius, factor)
                } else {
                    None
                };
                match variant {
                    FieldVariant::Drift => {
                        if let Some(push) = push {
                            p.pos += push;
                        }
                    }
                    FieldVariant::Constellation => ease_particle(p, push),
                }
            }

            let wrapped = Vec2::new(wrap_axis(p.pos.x, width), wrap_axis(p.pos.y, height));
            if wrapped != p.pos {
                p.pos = wrapped;
                p.anchor = None;
            }
        }
    }

    /// Pairs of particles close enough to be joined by a line.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let ps = &self.particles;
        (0..ps.len()).flat_map(move |i| {
            ps[i + 1..].iter().filter_map(move |q| {
                let a = ps[i].pos;
                let distance = a.distance(q.pos);
                (distance < LINK_DISTANCE).then(|| Link {
                    a,
                    b: q.pos,
                    alpha: LINK_MAX_ALPHA * (1.0 - distance / LINK_DISTANCE),
                })
            })
        })
    }

    pub fn render<S: ParticleSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear(self.viewport.width, self.viewport.height);
        for p in &self.particles {
            surface.fill_circle(p.pos, p.radius, p.color, p.alpha);
        }
        if self.config.draws_links() {
            for link in self.links() {
                surface.stroke_line(link.a, link.b, link.alpha, LINK_WIDTH);
            }
        }
    }
}

fn ease_particle(p: &mut Particle, push: Option<Vec2>) {
    if let Some(push) = push {
        let target = p.pos + push * REPEL_TARGET_SCALE;
        p.pos += (target - p.pos) * REPEL_EASE;
        return;
    }
    if let Some(anchor) = p.anchor {
        let path = anchor.point(p.vel);
        p.pos += (path - p.pos) * RETURN_EASE;
        if p.pos.distance(path) < RETURN_SNAP_DISTANCE {
            p.anchor = None;
        }
    }
}
