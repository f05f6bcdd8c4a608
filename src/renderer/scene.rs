//! Render pass
//!
//! Draws one full frame from the session state: background, ground,
//! vehicle, obstacles, coins, HUD, and the pause overlay. Reads only.

use glam::Vec2;

use super::surface::{Color, DrawSurface, GradientStop, TextAlign, TextRun};
use super::vertex::colors;
use crate::config::{GameMode, MAX_DECALS, RunConfig};
use crate::consts::*;
use crate::sim::collision::Aabb;
use crate::sim::state::{Obstacle, ObstacleKind, SessionState, Vehicle};
use crate::tuning::Tuning;

/// Flakes drawn in snow mode
pub const SNOWFLAKES: usize = 50;
const FLAKE_SIZE: f32 = 3.0;
const HEADLIGHT_RADIUS: f32 = 200.0;
const SPIKE_TOOTH: f32 = 15.0;
const CONE_STRIPES: usize = 5;
const COIN_RADIUS: f32 = 12.0;

const HUD_PANEL: Aabb = Aabb {
    min: Vec2::new(10.0, 10.0),
    max: Vec2::new(290.0, 110.0),
};
const LIFE_BAR: Aabb = Aabb {
    min: Vec2::new(70.0, 65.0),
    max: Vec2::new(280.0, 73.0),
};

/// Everything the render pass reads for one frame
pub struct Frame<'a> {
    pub state: &'a SessionState,
    pub config: &'a RunConfig,
    pub tuning: &'a Tuning,
    /// Frame timestamp (ms), drives snow drift
    pub time_ms: f64,
    pub paused: bool,
}

/// Repaint the whole surface
pub fn draw_frame(surface: &mut dyn DrawSurface, frame: &Frame) {
    let size = surface.size();
    surface.begin_frame();

    draw_background(surface, frame, size);
    draw_ground(surface, size);
    for obstacle in &frame.state.obstacles {
        draw_obstacle(surface, obstacle);
    }
    draw_coins(surface, frame.state);
    draw_vehicle(surface, &frame.state.vehicle, frame.config, frame.tuning);
    draw_hud(surface, frame);
    draw_mode_badge(surface, frame.config.mode, size);
    if frame.paused {
        draw_pause_overlay(surface, size);
    }

    surface.end_frame();
}

fn text(text: impl Into<String>, pos: Vec2, size: f32, color: Color, align: TextAlign) -> TextRun {
    TextRun {
        text: text.into(),
        pos,
        size,
        color,
        align,
    }
}

fn draw_background(surface: &mut dyn DrawSurface, frame: &Frame, size: Vec2) {
    let field = Aabb::new(Vec2::ZERO, size);
    match frame.config.mode {
        GameMode::Normal => {
            surface.fill_vertical_gradient(
                field,
                &[
                    GradientStop::new(0.0, colors::SKY_TOP),
                    GradientStop::new(0.5, colors::SKY_MID),
                    GradientStop::new(1.0, colors::SKY_BOTTOM),
                ],
            );
        }
        GameMode::Night => {
            surface.fill_rect(field, colors::NIGHT);
            let vehicle = &frame.state.vehicle;
            let mut clear = colors::HEADLIGHT_EDGE;
            clear[3] = 0.0;
            surface.fill_radial_gradient(
                Vec2::new(vehicle.x + 100.0, vehicle.y),
                HEADLIGHT_RADIUS,
                &[
                    GradientStop::new(0.0, colors::HEADLIGHT_CORE),
                    GradientStop::new(0.5, colors::HEADLIGHT_EDGE),
                    GradientStop::new(1.0, clear),
                ],
            );
        }
        GameMode::Snow => {
            surface.fill_rect(field, colors::SNOW_SKY);
            let t = frame.time_ms.max(0.0);
            for i in 0..SNOWFLAKES {
                let x = (t * 0.1 + i as f64 * 16.0) % size.x as f64;
                let y = (t * 0.05 + i as f64 * 23.0) % size.y as f64;
                surface.fill_rect(
                    Aabb::from_xywh(x as f32, y as f32, FLAKE_SIZE, FLAKE_SIZE),
                    colors::SNOWFLAKE,
                );
            }
        }
    }
}

fn draw_ground(surface: &mut dyn DrawSurface, size: Vec2) {
    surface.fill_rect(
        Aabb::from_xywh(0.0, GROUND_SURFACE_Y, size.x, GROUND_STRIP_HEIGHT),
        colors::GROUND,
    );
}

fn draw_vehicle(surface: &mut dyn DrawSurface, vehicle: &Vehicle, config: &RunConfig, tuning: &Tuning) {
    let cosmetics = &config.cosmetics;
    let (x, y) = (vehicle.x, vehicle.y);

    // Chassis and wheels under the glyph
    surface.fill_rect(Aabb::from_xywh(x + 6.0, y + 22.0, 38.0, 12.0), cosmetics.color);
    surface.fill_circle(Vec2::new(x + 12.0, y + 42.0), 8.0, colors::WHEEL);
    surface.fill_circle(Vec2::new(x + 38.0, y + 42.0), 8.0, colors::WHEEL);

    let center = vehicle.center();
    surface.fill_text(text(
        cosmetics.emoji.clone(),
        center,
        VEHICLE_SIZE,
        colors::HUD_TEXT,
        TextAlign::Center,
    ));

    if tuning.hud.decals {
        for (i, decal) in cosmetics.decals.iter().take(MAX_DECALS).enumerate() {
            let offset = Vec2::new((i as f32 - 1.0) * 15.0, -10.0 + (i % 2) as f32 * 20.0);
            surface.fill_text(text(
                decal.clone(),
                center + offset,
                VEHICLE_SIZE * 0.5,
                colors::HUD_TEXT,
                TextAlign::Center,
            ));
        }
    }
}

fn draw_obstacle(surface: &mut dyn DrawSurface, obstacle: &Obstacle) {
    let b = obstacle.bounds();
    match obstacle.kind {
        ObstacleKind::Spike => {
            // Sawtooth, one triangle per tooth
            let mut i = 0.0;
            while i < obstacle.width {
                let tooth = SPIKE_TOOTH.min(obstacle.width - i);
                surface.fill_polygon(
                    &[
                        Vec2::new(b.left() + i, b.bottom()),
                        Vec2::new(b.left() + i + tooth / 2.0, b.top()),
                        Vec2::new(b.left() + i + tooth, b.bottom()),
                    ],
                    colors::SPIKE,
                );
                i += SPIKE_TOOTH;
            }
        }
        ObstacleKind::Barrier => {
            surface.fill_rect(b, colors::BARRIER);
            surface.stroke_rect(b, colors::BARRIER_EDGE, 3.0);
        }
        ObstacleKind::Cone => {
            let mid = b.left() + obstacle.width / 2.0;
            surface.fill_polygon(
                &[
                    Vec2::new(mid, b.top()),
                    Vec2::new(b.left(), b.bottom()),
                    Vec2::new(b.right(), b.bottom()),
                ],
                colors::CONE,
            );
            // Stripes follow the taper
            let band = obstacle.height / CONE_STRIPES as f32;
            let half_width_at = |f: f32| obstacle.width / 2.0 * f;
            for i in (1..CONE_STRIPES).step_by(2) {
                let f1 = i as f32 / CONE_STRIPES as f32;
                let f2 = (i + 1) as f32 / CONE_STRIPES as f32;
                let (y1, y2) = (b.top() + i as f32 * band, b.top() + (i + 1) as f32 * band);
                let (w1, w2) = (half_width_at(f1), half_width_at(f2));
                surface.fill_polygon(
                    &[
                        Vec2::new(mid - w1, y1),
                        Vec2::new(mid + w1, y1),
                        Vec2::new(mid + w2, y2),
                        Vec2::new(mid - w2, y2),
                    ],
                    colors::CONE_STRIPE,
                );
            }
        }
        ObstacleKind::Hole => {
            // Cuts through the ground strip
            let bottom = GROUND_SURFACE_Y + GROUND_STRIP_HEIGHT;
            surface.fill_rect(
                Aabb::new(b.min, Vec2::new(b.right(), bottom.max(b.bottom()))),
                colors::HOLE,
            );
        }
        ObstacleKind::Ramp => {
            surface.fill_polygon(
                &[
                    Vec2::new(b.left(), b.bottom()),
                    Vec2::new(b.right(), b.bottom()),
                    Vec2::new(b.right(), b.top()),
                ],
                colors::RAMP,
            );
        }
    }
}

fn draw_coins(surface: &mut dyn DrawSurface, state: &SessionState) {
    for coin in state.coins.iter().filter(|c| !c.collected) {
        surface.fill_circle(coin.pos, COIN_RADIUS, colors::COIN);
        surface.fill_circle(coin.pos, COIN_RADIUS * 0.6, colors::COIN_FACE);
    }
}

fn draw_hud(surface: &mut dyn DrawSurface, frame: &Frame) {
    let state = frame.state;
    let profile = &frame.config.profile;

    surface.fill_rect(HUD_PANEL, colors::HUD_PANEL);
    surface.stroke_rect(HUD_PANEL, frame.config.cosmetics.color, 3.0);

    if frame.tuning.hud.avatar {
        surface.fill_text(text(
            profile.avatar.clone(),
            Vec2::new(35.0, 45.0),
            32.0,
            colors::HUD_TEXT,
            TextAlign::Center,
        ));
    }

    let left = |s: String, x: f32, y: f32, size: f32| {
        text(s, Vec2::new(x, y), size, colors::HUD_TEXT, TextAlign::Left)
    };
    surface.fill_text(left(profile.username.clone(), 70.0, 35.0, 16.0));
    let wallet = profile.coins.saturating_add(state.collected_coins as u64);
    surface.fill_text(left(format!("💰 {wallet}"), 70.0, 55.0, 14.0));
    surface.fill_text(left(format!("💎 {}", profile.gems), 170.0, 55.0, 14.0));

    surface.fill_rect(LIFE_BAR, colors::LIFE_BAR_EMPTY);
    let filled = LIFE_BAR.width() * state.lives.min(STARTING_LIVES) as f32 / STARTING_LIVES as f32;
    if filled > 0.0 {
        surface.fill_rect(
            Aabb::from_xywh(LIFE_BAR.left(), LIFE_BAR.top(), filled, LIFE_BAR.height()),
            colors::LIFE_BAR_FULL,
        );
    }

    surface.fill_text(left(format!("❤️ {}/{}", state.lives, STARTING_LIVES), 70.0, 88.0, 12.0));
    surface.fill_text(left(format!("📏 {}m", state.distance.floor() as u64), 140.0, 88.0, 12.0));
    surface.fill_text(left(format!("🏆 {}", state.score), 230.0, 88.0, 12.0));
}

fn draw_mode_badge(surface: &mut dyn DrawSurface, mode: GameMode, size: Vec2) {
    let badge = Aabb::from_xywh(size.x - 170.0, 10.0, 160.0, 30.0);
    surface.fill_rect(badge, colors::HUD_PANEL);
    surface.fill_text(text(
        mode.badge(),
        badge.center(),
        14.0,
        colors::HUD_TEXT,
        TextAlign::Center,
    ));
}

fn draw_pause_overlay(surface: &mut dyn DrawSurface, size: Vec2) {
    surface.fill_rect(Aabb::new(Vec2::ZERO, size), colors::PAUSE_SHADE);
    let center = size / 2.0;
    surface.fill_text(text("PAUSED", center, 48.0, colors::HUD_TEXT, TextAlign::Center));
    surface.fill_text(text(
        "Press Esc to resume",
        center + Vec2::new(0.0, 40.0),
        16.0,
        colors::HUD_TEXT,
        TextAlign::Center,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VehicleStats;
    use crate::renderer::surface::{CommandList, DrawCommand};
    use crate::sim::state::Coin;

    fn render(state: &SessionState, config: &RunConfig, tuning: &Tuning, paused: bool) -> CommandList {
        let mut surface = CommandList::new();
        draw_frame(
            &mut surface,
            &Frame {
                state,
                config,
                tuning,
                time_ms: 1234.0,
                paused,
            },
        );
        surface
    }

    fn count(list: &CommandList, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        list.commands().iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_frame_is_bracketed() {
        let state = SessionState::new();
        let config = RunConfig::default();
        let list = render(&state, &config, &Tuning::classic(), false);
        let commands = list.commands();
        assert_eq!(commands.first(), Some(&DrawCommand::Begin));
        assert_eq!(commands.last(), Some(&DrawCommand::End));
        assert_eq!(list.frames(), 1);
    }

    #[test]
    fn test_background_per_mode() {
        let state = SessionState::new();
        let tuning = Tuning::classic();

        let normal = render(&state, &RunConfig::default(), &tuning, false);
        assert!(matches!(normal.commands()[1], DrawCommand::VerticalGradient { .. }));

        let night_config = RunConfig::new(VehicleStats::default(), GameMode::Night);
        let night = render(&state, &night_config, &tuning, false);
        let light = night
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::RadialGradient { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            });
        assert_eq!(light, Some((Vec2::new(VEHICLE_X + 100.0, GROUND_Y), 200.0)));

        let snow_config = RunConfig::new(VehicleStats::default(), GameMode::Snow);
        let snow = render(&state, &snow_config, &tuning, false);
        let flakes = count(&snow, |c| {
            matches!(c, DrawCommand::Rect { color, .. } if *color == colors::SNOWFLAKE)
        });
        assert_eq!(flakes, SNOWFLAKES);
    }

    #[test]
    fn test_hud_text() {
        let mut state = SessionState::new();
        state.score = 42;
        state.distance = 123.9;
        state.collected_coins = 2;
        state.lives = 2;
        let mut config = RunConfig::default();
        config.profile.coins = 100;
        config.profile.gems = 7;

        let list = render(&state, &config, &Tuning::classic(), false);
        let texts = list.texts();
        for expected in ["💰 102", "💎 7", "❤️ 2/3", "📏 123m", "🏆 42", "Rider", "😎"] {
            assert!(texts.iter().any(|t| t == expected), "missing {expected}");
        }
        assert!(texts.iter().any(|t| t == GameMode::Normal.badge()));
        assert!(!texts.iter().any(|t| t == "PAUSED"));
    }

    #[test]
    fn test_decals_and_avatar_follow_hud_layout() {
        let state = SessionState::new();
        let mut config = RunConfig::default();
        config.cosmetics.decals = ["🔥", "⚡", "⭐", "💀"].map(String::from).to_vec();

        let classic = render(&state, &config, &Tuning::classic(), false);
        let texts = classic.texts();
        assert!(texts.iter().any(|t| t == "⭐"));
        assert!(!texts.iter().any(|t| t == "💀"));

        let ramp = render(&state, &config, &Tuning::ramp(), false);
        let texts = ramp.texts();
        assert!(!texts.iter().any(|t| t == "🔥"));
        assert!(!texts.iter().any(|t| t == "😎"));
    }

    #[test]
    fn test_collected_coins_not_drawn() {
        let mut state = SessionState::new();
        state.coins.push(Coin {
            id: 1,
            pos: Vec2::new(400.0, 200.0),
            collected: false,
        });
        state.coins.push(Coin {
            id: 2,
            pos: Vec2::new(500.0, 200.0),
            collected: true,
        });
        let list = render(&state, &RunConfig::default(), &Tuning::classic(), false);
        let gold = count(&list, |c| {
            matches!(c, DrawCommand::Circle { color, .. } if *color == colors::COIN)
        });
        assert_eq!(gold, 1);
    }

    #[test]
    fn test_obstacle_shapes() {
        let mut state = SessionState::new();
        for (i, (kind, w, h)) in [
            (ObstacleKind::Spike, 45.0, 40.0),
            (ObstacleKind::Cone, 35.0, 60.0),
            (ObstacleKind::Ramp, 60.0, 30.0),
        ]
        .into_iter()
        .enumerate()
        {
            state.obstacles.push(Obstacle {
                id: i as u32,
                kind,
                x: 300.0 + i as f32 * 100.0,
                y: GROUND_SURFACE_Y - h,
                width: w,
                height: h,
            });
        }
        let list = render(&state, &RunConfig::default(), &Tuning::classic(), false);
        let spikes = count(&list, |c| {
            matches!(c, DrawCommand::Polygon { color, .. } if *color == colors::SPIKE)
        });
        assert_eq!(spikes, 3);
        let stripes = count(&list, |c| {
            matches!(c, DrawCommand::Polygon { color, .. } if *color == colors::CONE_STRIPE)
        });
        assert_eq!(stripes, 2);
        let ramps = count(&list, |c| {
            matches!(c, DrawCommand::Polygon { color, points } if *color == colors::RAMP && points.len() == 3)
        });
        assert_eq!(ramps, 1);
    }

    #[test]
    fn test_pause_overlay() {
        let state = SessionState::new();
        let list = render(&state, &RunConfig::default(), &Tuning::classic(), true);
        assert!(list.texts().iter().any(|t| t == "PAUSED"));
    }
}
