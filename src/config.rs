//! Run configuration
//!
//! Supplied by the app shell when a session starts and read-only for the
//! rest of the run. Everything here is serde so the shell can hand it over
//! as JSON.

use serde::{Deserialize, Serialize};

use crate::clamp_rating;

/// Ambient mode of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Normal,
    Night,
    Snow,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "Normal",
            GameMode::Night => "Night",
            GameMode::Snow => "Snow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "night" => Some(GameMode::Night),
            "snow" => Some(GameMode::Snow),
            _ => None,
        }
    }

    /// HUD badge text
    pub fn badge(&self) -> &'static str {
        match self {
            GameMode::Normal => "☀️ Normal mode",
            GameMode::Night => "🌙 Night mode",
            GameMode::Snow => "❄️ Snow mode",
        }
    }
}

/// Speed/jump/defense ratings (base bike stats plus upgrades)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleStats {
    pub speed: f32,
    pub jump: f32,
    pub defense: f32,
}

impl Default for VehicleStats {
    /// Starter bike
    fn default() -> Self {
        Self {
            speed: 5.0,
            jump: 4.0,
            defense: 3.0,
        }
    }
}

impl VehicleStats {
    pub const ZERO: Self = Self {
        speed: 0.0,
        jump: 0.0,
        defense: 0.0,
    };

    /// Add purchased upgrade levels to base stats
    pub fn with_upgrades(&self, upgrades: &VehicleStats) -> Self {
        Self {
            speed: self.speed + upgrades.speed,
            jump: self.jump + upgrades.jump,
            defense: self.defense + upgrades.defense,
        }
    }

    /// Stats with every rating clamped to a safe range
    pub fn clamped(&self) -> Self {
        Self {
            speed: clamp_rating(self.speed),
            jump: clamp_rating(self.jump),
            defense: clamp_rating(self.defense),
        }
    }
}

/// Maximum decals drawn on the vehicle
pub const MAX_DECALS: usize = 3;

/// Purely visual vehicle customisation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cosmetics {
    /// Vehicle glyph
    pub emoji: String,
    /// Accent color (RGBA 0-1), used for chassis and HUD border
    pub color: [f32; 4],
    /// Decal glyphs; only the first `MAX_DECALS` are drawn
    pub decals: Vec<String>,
}

impl Default for Cosmetics {
    fn default() -> Self {
        Self {
            emoji: "🏍️".to_string(),
            color: [1.0, 0.42, 0.21, 1.0],
            decals: Vec::new(),
        }
    }
}

/// Player details shown in the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub username: String,
    pub avatar: String,
    /// Wallet coins before this run
    pub coins: u64,
    /// Premium currency
    pub gems: u64,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            username: "Rider".to_string(),
            avatar: "😎".to_string(),
            coins: 0,
            gems: 0,
        }
    }
}

/// Distance thresholds for one, two and three stars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarThresholds {
    pub one: f32,
    pub two: f32,
    pub three: f32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            one: 600.0,
            two: 1200.0,
            three: 2000.0,
        }
    }
}

impl StarThresholds {
    /// Thresholds scaled to a campaign level's target distance (level 1 = defaults)
    pub fn for_level(level: u32) -> Self {
        let target = 1000.0 + level.saturating_sub(1) as f32 * 500.0;
        Self {
            one: target * 0.6,
            two: target * 1.2,
            three: target * 2.0,
        }
    }

    /// Stars earned for a total distance
    pub fn stars_for(&self, distance: f32) -> u8 {
        if distance >= self.three {
            3
        } else if distance >= self.two {
            2
        } else if distance >= self.one {
            1
        } else {
            0
        }
    }
}

/// Immutable configuration for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunConfig {
    pub stats: VehicleStats,
    pub mode: GameMode,
    pub cosmetics: Cosmetics,
    pub profile: PlayerProfile,
    pub stars: StarThresholds,
}

impl RunConfig {
    pub fn new(stats: VehicleStats, mode: GameMode) -> Self {
        Self {
            stats,
            mode,
            ..Default::default()
        }
    }

    /// Copy with ratings clamped (applied by the session on start)
    pub fn sanitized(&self) -> Self {
        Self {
            stats: self.stats.clamped(),
            ..self.clone()
        }
    }
}
