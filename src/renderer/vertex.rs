//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::renderer::surface::{Color, rgb, rgba};

    pub const SKY_TOP: Color = rgb(0x00d9ff);
    pub const SKY_MID: Color = rgb(0x1a2332);
    pub const SKY_BOTTOM: Color = rgb(0x0f1419);
    pub const NIGHT: Color = rgb(0x0a0a1a);
    pub const HEADLIGHT_CORE: Color = [1.0, 1.0, 200.0 / 255.0, 0.6];
    pub const HEADLIGHT_EDGE: Color = [1.0, 1.0, 100.0 / 255.0, 0.2];
    pub const SNOW_SKY: Color = rgb(0xe0f2fe);
    pub const SNOWFLAKE: Color = [1.0, 1.0, 1.0, 0.4];
    pub const GROUND: Color = rgb(0x2a3a4a);

    pub const WHEEL: Color = rgb(0x111827);
    pub const SPIKE: Color = rgb(0xef4444);
    pub const BARRIER: Color = rgb(0x10b981);
    pub const BARRIER_EDGE: Color = rgb(0x065f46);
    pub const CONE: Color = rgb(0xf97316);
    pub const CONE_STRIPE: Color = rgb(0xffffff);
    pub const HOLE: Color = rgb(0x000000);
    pub const RAMP: Color = rgb(0xa855f7);
    pub const COIN: Color = rgb(0xffd700);
    pub const COIN_FACE: Color = rgb(0xf5b700);

    pub const HUD_PANEL: Color = rgba(0x000000, 0.6);
    pub const HUD_TEXT: Color = rgb(0xffffff);
    pub const LIFE_BAR_EMPTY: Color = rgb(0xff6b35);
    pub const LIFE_BAR_FULL: Color = rgb(0x10b981);
    pub const PAUSE_SHADE: Color = rgba(0x000000, 0.5);
    pub const BACKGROUND: Color = [0.02, 0.02, 0.05, 1.0];
}
