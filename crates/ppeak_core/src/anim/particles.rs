//! World-themed particle backdrop.
//!
//! # Responsibility
//! - Simulate a fixed pool of drifting glyphs on a host canvas.
//! - Pace drawing by host repaint callbacks, one pending request at a time.
//!
//! # Invariants
//! - The pool never holds more than `PARTICLE_COUNT` particles.
//! - No frame is requested while the page is hidden or after teardown.
//! - A world change reinitializes the whole pool.

use super::XorShift32;
use crate::model::world::World;
use log::debug;

pub const PARTICLE_COUNT: usize = 15;

/// Distance outside the canvas after which a particle is recycled.
const RECYCLE_MARGIN: f32 = 30.0;
/// Spawn offset below the bottom edge.
const SPAWN_OFFSET: f32 = 20.0;
const DRIFT_JITTER: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Serif,
    MonospaceBold,
}

/// Per-world appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleStyle {
    pub glyphs: &'static [&'static str],
    pub size_min: f32,
    pub size_span: f32,
    pub accent: &'static str,
    pub glow_blur: f32,
    pub font: FontFace,
}

const CLASSICAL_STYLE: ParticleStyle = ParticleStyle {
    glyphs: &["♪", "♫", "♩", "♬", "𝄞"],
    size_min: 16.0,
    size_span: 14.0,
    accent: "#c9a85c",
    glow_blur: 0.0,
    font: FontFace::Serif,
};

const GAMING_STYLE: ParticleStyle = ParticleStyle {
    glyphs: &["■", "□", "▪", "◆", "●", "○"],
    size_min: 8.0,
    size_span: 12.0,
    accent: "#70d4d0",
    glow_blur: 12.0,
    font: FontFace::MonospaceBold,
};

pub fn style_for(world: World) -> &'static ParticleStyle {
    match world {
        World::Classical => &CLASSICAL_STYLE,
        World::Gaming => &GAMING_STYLE,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub opacity: f32,
    pub glyph: &'static str,
}

/// One glyph draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPaint {
    pub glyph: &'static str,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub font: FontFace,
    pub color: &'static str,
    pub alpha: f32,
    pub glow_blur: f32,
}

/// 2D drawing surface the engine paints onto.
pub trait ParticleCanvas {
    fn size(&self) -> (f32, f32);
    fn set_size(&mut self, width: f32, height: f32);
    fn clear(&mut self);
    fn draw_glyph(&mut self, paint: &GlyphPaint);
}

/// Opaque id of a pending repaint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Display repaint clock (`requestAnimationFrame` equivalent).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    TornDown,
}

pub struct ParticleEngine<C: ParticleCanvas, F: FrameScheduler> {
    canvas: C,
    scheduler: F,
    world: World,
    particles: Vec<Particle>,
    rng: XorShift32,
    page_visible: bool,
    pending_frame: Option<FrameHandle>,
    lifecycle: Lifecycle,
}

impl<C: ParticleCanvas, F: FrameScheduler> ParticleEngine<C, F> {
    pub fn new(canvas: C, scheduler: F, world: World, seed: u32) -> Self {
        Self {
            canvas,
            scheduler,
            world,
            particles: Vec::with_capacity(PARTICLE_COUNT),
            rng: XorShift32::new(seed),
            page_visible: true,
            pending_frame: None,
            lifecycle: Lifecycle::Created,
        }
    }

    /// Sizes the canvas to the viewport, seeds the pool and draws the first
    /// frame. Calling it again after mount is a no-op.
    pub fn mount(&mut self, viewport_width: f32, viewport_height: f32) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        self.canvas.set_size(viewport_width, viewport_height);
        self.init_particles();
        debug!(
            "event=particles_mount module=anim status=ok world={} count={}",
            self.world,
            self.particles.len()
        );
        self.draw();
    }

    /// Host repaint callback for the pending request.
    pub fn on_frame(&mut self) {
        self.pending_frame = None;
        self.draw();
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if self.lifecycle == Lifecycle::Mounted {
            self.canvas.set_size(viewport_width, viewport_height);
        }
    }

    /// Visibility-change handler. Hiding cancels the pending frame; showing
    /// resumes drawing with the existing pool.
    pub fn set_page_hidden(&mut self, hidden: bool) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        self.page_visible = !hidden;
        if hidden {
            if let Some(handle) = self.pending_frame.take() {
                self.scheduler.cancel_frame(handle);
            }
        } else if self.pending_frame.is_none() {
            self.draw();
        }
    }

    /// Switches glyph set and colors, reinitializing the pool.
    pub fn set_world(&mut self, world: World) {
        self.world = world;
        if self.lifecycle == Lifecycle::Mounted {
            self.init_particles();
        }
    }

    /// Cancels the pending frame; afterwards every callback is ignored.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.lifecycle = Lifecycle::TornDown;
        debug!("event=particles_teardown module=anim status=ok");
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn world(&self) -> World {
        self.world
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted && self.page_visible
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    fn draw(&mut self) {
        if !self.is_active() {
            return;
        }

        let style = style_for(self.world);
        let (width, height) = self.canvas.size();
        self.canvas.clear();

        for index in 0..self.particles.len() {
            self.update_particle(index, width, height);
            let particle = self.particles[index];
            self.canvas.draw_glyph(&GlyphPaint {
                glyph: particle.glyph,
                x: particle.x,
                y: particle.y,
                size: particle.size,
                font: style.font,
                color: style.accent,
                alpha: particle.opacity,
                glow_blur: style.glow_blur,
            });
        }

        self.pending_frame = Some(self.scheduler.request_frame());
    }

    fn init_particles(&mut self) {
        self.particles.clear();
        let (width, height) = self.canvas.size();
        for _ in 0..PARTICLE_COUNT {
            let mut particle = self.spawn(width, height);
            particle.y = self.rng.next_f32() * height;
            self.particles.push(particle);
        }
    }

    fn update_particle(&mut self, index: usize, width: f32, height: f32) {
        let jitter = (self.rng.next_f32() - 0.5) * DRIFT_JITTER;
        let particle = &mut self.particles[index];
        particle.x += particle.speed_x;
        particle.y += particle.speed_y;
        particle.speed_x += jitter;

        let out_of_bounds = particle.y < -RECYCLE_MARGIN
            || particle.x < -RECYCLE_MARGIN
            || particle.x > width + RECYCLE_MARGIN;
        if out_of_bounds {
            self.particles[index] = self.spawn(width, height);
        }
    }

    fn spawn(&mut self, width: f32, height: f32) -> Particle {
        let style = style_for(self.world);
        let rng = &mut self.rng;
        Particle {
            x: rng.next_f32() * width,
            y: height + SPAWN_OFFSET,
            size: style.size_min + rng.next_f32() * style.size_span,
            speed_x: (rng.next_f32() - 0.5) * 0.5,
            speed_y: -(0.3 + rng.next_f32() * 0.5),
            opacity: 0.25 + rng.next_f32() * 0.35,
            glyph: style.glyphs[rng.next_index(style.glyphs.len())],
        }
    }
}
