//! Data-driven game balance
//!
//! The two shipped rule sets differ only in data, so both are presets of
//! the same `Tuning` struct. Loaded from JSON when `MOTO_DASH_TUNING`
//! points at a file.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ObstacleKind;

/// Errors from loading a tuning file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("tuning parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning has no obstacle kinds")]
    NoObstacleKinds,
    #[error("tuning field {field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

/// Size of one obstacle kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    pub width: f32,
    pub height: f32,
}

impl ObstacleSpec {
    pub const fn new(kind: ObstacleKind, width: f32, height: f32) -> Self {
        Self {
            kind,
            width,
            height,
        }
    }
}

/// Which HUD extras to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudLayout {
    pub avatar: bool,
    pub decals: bool,
}

impl Default for HudLayout {
    fn default() -> Self {
        Self {
            avatar: true,
            decals: true,
        }
    }
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    pub gravity: f32,
    pub base_jump_impulse: f32,
    pub jump_scale: f32,
    pub snow_jump_modifier: f32,
    pub base_speed: f32,
    pub speed_scale: f32,

    // === Spawning ===
    /// Minimum time between obstacle spawns
    pub obstacle_interval_ms: f64,
    /// Also require an obstacle interval timer fire before spawning
    pub obstacle_timer: bool,
    /// Coin timer period
    pub coin_interval_ms: f64,
    /// Chance that a coin timer fire spawns nothing
    pub coin_skip_chance: f32,
    /// Active obstacle kinds with their sizes (uniform pick)
    pub obstacles: Vec<ObstacleSpec>,
    /// Obstacles are dropped once `x + width` falls below `-margin`
    pub obstacle_despawn_margin: f32,
    /// Coins are dropped once `x` falls to this
    pub coin_despawn_x: f32,

    // === Collision & scoring ===
    /// Hit box inset on each side of the vehicle sprite
    pub hitbox_inset: f32,
    pub coin_pickup_radius: f32,
    pub coin_value: u64,
    /// Distance gained per unit of game speed per tick
    pub distance_rate: f32,
    /// Passive score per unit of game speed per tick (at least 1 per tick)
    pub score_rate: f32,
    /// Mitigation chance per defense point
    pub defense_scale: f32,

    // === Presentation ===
    pub hud: HudLayout,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::classic()
    }
}

impl Tuning {
    /// Cone variant: decals, avatar HUD, coin timer with obstacle gate
    pub fn classic() -> Self {
        Self {
            gravity: GRAVITY,
            base_jump_impulse: BASE_JUMP_IMPULSE,
            jump_scale: JUMP_SCALE,
            snow_jump_modifier: SNOW_JUMP_MODIFIER,
            base_speed: BASE_SPEED,
            speed_scale: SPEED_SCALE,

            obstacle_interval_ms: 1500.0,
            obstacle_timer: false,
            coin_interval_ms: 2000.0,
            coin_skip_chance: 0.3,
            obstacles: vec![
                ObstacleSpec::new(ObstacleKind::Spike, 45.0, 40.0),
                ObstacleSpec::new(ObstacleKind::Barrier, 45.0, 70.0),
                ObstacleSpec::new(ObstacleKind::Cone, 35.0, 60.0),
                ObstacleSpec::new(ObstacleKind::Hole, 100.0, 10.0),
            ],
            obstacle_despawn_margin: 100.0,
            coin_despawn_x: -30.0,

            hitbox_inset: 5.0,
            coin_pickup_radius: 40.0,
            coin_value: 10,
            distance_rate: 0.1,
            score_rate: 0.2,
            defense_scale: 0.1,

            hud: HudLayout::default(),
        }
    }

    /// Ramp variant: heavier jumps, timer-driven obstacles, plain HUD
    pub fn ramp() -> Self {
        Self {
            gravity: 0.8,
            base_jump_impulse: 15.0,
            jump_scale: 0.5,
            obstacle_timer: true,
            obstacles: vec![
                ObstacleSpec::new(ObstacleKind::Spike, 45.0, 40.0),
                ObstacleSpec::new(ObstacleKind::Barrier, 45.0, 70.0),
                ObstacleSpec::new(ObstacleKind::Hole, 100.0, 10.0),
                ObstacleSpec::new(ObstacleKind::Ramp, 60.0, 30.0),
            ],
            defense_scale: 0.05,
            hud: HudLayout {
                avatar: false,
                decals: false,
            },
            ..Self::classic()
        }
    }

    /// Parse tuning from JSON; missing fields take classic values
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validated()
    }

    /// Reject values that would stall or reverse motion, clamp the rest
    pub fn validated(mut self) -> Result<Self, TuningError> {
        if self.obstacles.is_empty() {
            return Err(TuningError::NoObstacleKinds);
        }
        let required = [
            ("gravity", f64::from(self.gravity)),
            ("base_speed", f64::from(self.base_speed)),
            ("base_jump_impulse", f64::from(self.base_jump_impulse)),
            ("coin_interval_ms", self.coin_interval_ms),
            ("obstacle_interval_ms", self.obstacle_interval_ms),
        ];
        for (field, value) in required {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        self.speed_scale = finite_or_zero(self.speed_scale).max(0.0);
        self.jump_scale = finite_or_zero(self.jump_scale).max(0.0);
        self.distance_rate = finite_or_zero(self.distance_rate).max(0.0);
        self.score_rate = finite_or_zero(self.score_rate).max(0.0);
        self.defense_scale = finite_or_zero(self.defense_scale).max(0.0);
        self.coin_skip_chance = finite_or_zero(self.coin_skip_chance).clamp(0.0, 1.0);
        Ok(self)
    }

    /// Load from the file in `MOTO_DASH_TUNING`, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("MOTO_DASH_TUNING") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {path}");
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to load {path}: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {path}: {e}, using defaults");
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }

    /// Horizontal scroll per tick for a speed rating
    pub fn game_speed(&self, speed_rating: f32) -> f32 {
        self.base_speed * (1.0 + speed_rating * self.speed_scale)
    }

    /// Upward velocity given by a jump (positive magnitude)
    pub fn jump_power(&self, jump_rating: f32, snow: bool) -> f32 {
        let modifier = if snow { self.snow_jump_modifier } else { 1.0 };
        (self.base_jump_impulse + jump_rating * self.jump_scale) * modifier
    }

    /// Chance that a hit is absorbed; at 1.0 or above every hit is
    pub fn mitigation(&self, defense_rating: f32) -> f32 {
        (defense_rating * self.defense_scale).max(0.0)
    }

    /// Passive score for one tick
    pub fn score_trickle(&self, game_speed: f32) -> u64 {
        ((game_speed * self.score_rate).floor() as u64).max(1)
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_speed() {
        let t = Tuning::classic();
        assert_eq!(t.game_speed(0.0), 5.0);
        assert!((t.game_speed(10.0) - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_jump_power_snow_penalty() {
        let t = Tuning::classic();
        let dry = t.jump_power(5.0, false);
        let snow = t.jump_power(5.0, true);
        assert!((dry - 16.0).abs() < 1e-4);
        assert!((snow - 16.0 * 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_mitigation_scales_without_cap() {
        let t = Tuning::classic();
        assert_eq!(t.mitigation(0.0), 0.0);
        assert_eq!(t.mitigation(-4.0), 0.0);
        assert!((t.mitigation(3.0) - 0.3).abs() < 1e-6);
        assert!(t.mitigation(12.0) >= 1.0);
        assert!(t.mitigation(19.0) >= 1.0);
    }

    #[test]
    fn test_score_trickle_never_zero() {
        let t = Tuning::classic();
        assert_eq!(t.score_trickle(5.0), 1);
        assert_eq!(t.score_trickle(19.25), 3);
    }

    #[test]
    fn test_ramp_preset_kinds() {
        let t = Tuning::ramp();
        assert!(t.obstacles.iter().any(|o| o.kind == ObstacleKind::Ramp));
        assert!(!t.obstacles.iter().any(|o| o.kind == ObstacleKind::Cone));
        assert!(t.obstacle_timer);
        assert_eq!(t.coin_interval_ms, Tuning::classic().coin_interval_ms);
    }

    #[test]
    fn test_from_json_partial() {
        let t = Tuning::from_json(r#"{"gravity": 1.0, "coin_value": 25}"#).unwrap();
        assert_eq!(t.gravity, 1.0);
        assert_eq!(t.coin_value, 25);
        assert_eq!(t.obstacles, Tuning::classic().obstacles);
    }

    #[test]
    fn test_from_json_rejects_empty_kinds() {
        let err = Tuning::from_json(r#"{"obstacles": []}"#).unwrap_err();
        assert!(matches!(err, TuningError::NoObstacleKinds));
        assert!(Tuning::from_json("not json").is_err());
    }

    #[test]
    fn test_from_json_rejects_reversing_motion() {
        let err = Tuning::from_json(r#"{"base_speed": -5.0}"#).unwrap_err();
        assert!(matches!(err, TuningError::NotPositive { field: "base_speed", .. }));

        let err = Tuning::from_json(r#"{"gravity": -0.1}"#).unwrap_err();
        assert!(matches!(err, TuningError::NotPositive { field: "gravity", .. }));

        for field in ["base_jump_impulse", "coin_interval_ms", "obstacle_interval_ms"] {
            let json = format!(r#"{{"{field}": 0.0}}"#);
            assert!(Tuning::from_json(&json).is_err(), "{field} = 0 accepted");
        }
    }

    #[test]
    fn test_from_json_clamps_rates() {
        let t = Tuning::from_json(
            r#"{"speed_scale": -1.0, "jump_scale": -2.0, "distance_rate": -0.1,
                "score_rate": -3.0, "coin_skip_chance": 1.5}"#,
        )
        .unwrap();
        assert_eq!(t.speed_scale, 0.0);
        assert_eq!(t.jump_scale, 0.0);
        assert_eq!(t.distance_rate, 0.0);
        assert_eq!(t.score_rate, 0.0);
        assert_eq!(t.coin_skip_chance, 1.0);
        assert!(t.game_speed(10.0) > 0.0);

        let t = Tuning::from_json(r#"{"coin_skip_chance": -0.5}"#).unwrap();
        assert_eq!(t.coin_skip_chance, 0.0);
    }

    #[test]
    fn test_presets_are_valid() {
        assert_eq!(Tuning::classic().validated().unwrap(), Tuning::classic());
        assert_eq!(Tuning::ramp().validated().unwrap(), Tuning::ramp());
    }
}
