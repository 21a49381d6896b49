//! Scroll-triggered entrance and parallax effect bindings.
//!
//! # Responsibility
//! - Describe fade-in, staggered fade-in and parallax effects declaratively.
//! - Register them with the host scroll-trigger engine while active.
//!
//! # Invariants
//! - `activate` registers every binding exactly once (stale registrations
//!   from a previous activation are killed first).
//! - After `deactivate` no registration made by this controller is live.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Power2Out,
    Linear,
}

/// Whether the tween animates from the given values or towards them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenDirection {
    From,
    To,
}

/// Vertical offset, either fixed or relative to the viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OffsetY {
    Px(f32),
    /// `-viewport_height * factor`, evaluated at registration time.
    ViewportFraction(f32),
}

impl OffsetY {
    pub fn resolve(self, viewport_height: f32) -> f32 {
        match self {
            Self::Px(value) => value,
            Self::ViewportFraction(factor) => -viewport_height * factor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TweenSpec {
    pub direction: TweenDirection,
    pub opacity: Option<f32>,
    pub y: OffsetY,
    pub duration_s: Option<f32>,
    pub stagger_s: Option<f32>,
    pub ease: Ease,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSpec {
    pub trigger: String,
    pub start: String,
    pub end: Option<String>,
    pub toggle_actions: Option<String>,
    pub scrub: bool,
}

/// One selector bound to one effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectBinding {
    pub selector: String,
    pub tween: TweenSpec,
    pub trigger: TriggerSpec,
}

/// Caller overrides for `fade_in_on_scroll`; unset fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FadeOverrides {
    pub opacity: Option<f32>,
    pub y: Option<f32>,
    pub duration_s: Option<f32>,
    pub ease: Option<Ease>,
    pub start: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub u64);

/// Host scroll-trigger engine (GSAP ScrollTrigger equivalent).
pub trait ScrollTriggerHost {
    /// Recomputes trigger positions after layout changes.
    fn refresh(&mut self);
    /// `resolved_y` is the binding's offset evaluated for the current viewport.
    fn register(&mut self, binding: &EffectBinding, resolved_y: f32) -> TriggerId;
    fn kill(&mut self, id: TriggerId);
}

pub struct ScrollAnimationController<H: ScrollTriggerHost> {
    host: H,
    bindings: Vec<EffectBinding>,
    live: Vec<TriggerId>,
    active: bool,
    viewport_height: f32,
}

impl<H: ScrollTriggerHost> ScrollAnimationController<H> {
    pub fn new(host: H, viewport_height: f32) -> Self {
        Self {
            host,
            bindings: Vec::new(),
            live: Vec::new(),
            active: false,
            viewport_height,
        }
    }

    /// Fade + rise entrance, reversed when scrolling back up.
    pub fn fade_in_on_scroll(
        &mut self,
        selector: &str,
        overrides: FadeOverrides,
    ) -> Option<TriggerId> {
        self.bind(EffectBinding {
            selector: selector.to_string(),
            tween: TweenSpec {
                direction: TweenDirection::From,
                opacity: Some(overrides.opacity.unwrap_or(0.0)),
                y: OffsetY::Px(overrides.y.unwrap_or(30.0)),
                duration_s: Some(overrides.duration_s.unwrap_or(0.8)),
                stagger_s: None,
                ease: overrides.ease.unwrap_or(Ease::Power2Out),
            },
            trigger: TriggerSpec {
                trigger: selector.to_string(),
                start: overrides.start.unwrap_or_else(|| "top 85%".to_string()),
                end: None,
                toggle_actions: Some("play none none reverse".to_string()),
                scrub: false,
            },
        })
    }

    /// Fade-in applied to every match of `selector`, `stagger_s` apart.
    pub fn stagger_fade_in(&mut self, selector: &str, stagger_s: f32) -> Option<TriggerId> {
        self.bind(EffectBinding {
            selector: selector.to_string(),
            tween: TweenSpec {
                direction: TweenDirection::From,
                opacity: Some(0.0),
                y: OffsetY::Px(20.0),
                duration_s: Some(0.6),
                stagger_s: Some(stagger_s),
                ease: Ease::Power2Out,
            },
            trigger: TriggerSpec {
                trigger: selector.to_string(),
                start: "top 85%".to_string(),
                end: None,
                toggle_actions: None,
                scrub: false,
            },
        })
    }

    /// Scroll-scrubbed vertical drift of `speed` viewport heights.
    pub fn parallax(&mut self, selector: &str, speed: f32) -> Option<TriggerId> {
        self.bind(EffectBinding {
            selector: selector.to_string(),
            tween: TweenSpec {
                direction: TweenDirection::To,
                opacity: None,
                y: OffsetY::ViewportFraction(speed),
                duration_s: None,
                stagger_s: None,
                ease: Ease::Linear,
            },
            trigger: TriggerSpec {
                trigger: selector.to_string(),
                start: "top bottom".to_string(),
                end: Some("bottom top".to_string()),
                toggle_actions: None,
                scrub: true,
            },
        })
    }

    /// Refreshes the host and (re)registers every binding.
    pub fn activate(&mut self) {
        self.kill_live();
        self.active = true;
        self.host.refresh();
        for binding in &self.bindings {
            let id = self
                .host
                .register(binding, binding.tween.y.resolve(self.viewport_height));
            self.live.push(id);
        }
        debug!(
            "event=scroll_activate module=anim status=ok bindings={}",
            self.live.len()
        );
    }

    /// Kills every live registration. Bindings are kept for the next
    /// activation.
    pub fn deactivate(&mut self) {
        self.kill_live();
        self.active = false;
    }

    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
    }

    pub fn bindings(&self) -> &[EffectBinding] {
        &self.bindings
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    fn bind(&mut self, binding: EffectBinding) -> Option<TriggerId> {
        let registered = if self.active {
            let id = self
                .host
                .register(&binding, binding.tween.y.resolve(self.viewport_height));
            self.live.push(id);
            Some(id)
        } else {
            None
        };
        self.bindings.push(binding);
        registered
    }

    fn kill_live(&mut self) {
        for id in self.live.drain(..) {
            self.host.kill(id);
        }
    }
}
