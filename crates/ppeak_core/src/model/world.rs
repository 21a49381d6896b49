//! World/theme domain model.
//!
//! # Responsibility
//! - Define the two presentation worlds and the color scheme derived from them.
//! - Provide the stable string forms mirrored onto the document root and
//!   into durable storage.
//!
//! # Invariants
//! - `ThemeState::is_dark == (world == World::Gaming)` for every value.
//! - A `ThemeState` can only be built from a `World`; the dark flag is never
//!   set independently.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Top-level aesthetic/content mode selected by the visitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum World {
    /// Concert-hall presentation, light color scheme.
    #[default]
    Classical,
    /// Game-soundtrack presentation, always dark.
    Gaming,
}

impl World {
    pub const ALL: [World; 2] = [World::Classical, World::Gaming];

    /// Stable string id used for `data-aesthetic` and persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classical => "classical",
            Self::Gaming => "gaming",
        }
    }

    /// Parses a persisted or user-supplied world id.
    ///
    /// Surrounding whitespace is ignored; anything else outside the two known
    /// ids yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "classical" => Some(Self::Classical),
            "gaming" => Some(Self::Gaming),
            _ => None,
        }
    }

    /// Color scheme implied by this world.
    pub fn color_scheme(self) -> ColorScheme {
        match self {
            Self::Classical => ColorScheme::Light,
            Self::Gaming => ColorScheme::Dark,
        }
    }
}

impl Display for World {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light/dark scheme mirrored as `data-theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Snapshot of the active world and its derived dark-mode flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ThemeState {
    world: World,
    is_dark: bool,
}

impl ThemeState {
    pub fn for_world(world: World) -> Self {
        Self {
            world,
            is_dark: world == World::Gaming,
        }
    }

    pub fn world(&self) -> World {
        self.world
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn color_scheme(&self) -> ColorScheme {
        if self.is_dark {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        }
    }
}

impl From<World> for ThemeState {
    fn from(world: World) -> Self {
        Self::for_world(world)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorScheme, ThemeState, World};

    #[test]
    fn parse_accepts_known_ids_only() {
        assert_eq!(World::parse("classical"), Some(World::Classical));
        assert_eq!(World::parse(" gaming\n"), Some(World::Gaming));
        assert_eq!(World::parse("Gaming"), None);
        assert_eq!(World::parse("\"gaming\""), None);
        assert_eq!(World::parse(""), None);
    }

    #[test]
    fn theme_state_derives_dark_flag_from_world() {
        for world in World::ALL {
            let state = ThemeState::for_world(world);
            assert_eq!(state.world(), world);
            assert_eq!(state.is_dark(), world == World::Gaming);
            assert_eq!(state.color_scheme(), world.color_scheme());
        }
    }

    #[test]
    fn default_state_is_classical_light() {
        let state = ThemeState::default();
        assert_eq!(state.world(), World::Classical);
        assert_eq!(state.color_scheme(), ColorScheme::Light);
    }
}
