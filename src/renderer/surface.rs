//! 2D drawing surface abstraction
//!
//! The render pass issues immediate-mode commands against a fixed logical
//! canvas (pixels, y down). Backends decide what to do with them: the
//! vertex batch tessellates for the GPU, the command list just records.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::collision::Aabb;

/// RGBA, 0-1
pub type Color = [f32; 4];

/// Build a color from `0xRRGGBB` and an alpha
pub const fn rgba(hex: u32, alpha: f32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Opaque color from `0xRRGGBB`
pub const fn rgb(hex: u32) -> Color {
    rgba(hex, 1.0)
}

/// A color at a position along a gradient (0 = start, 1 = end)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Sample a gradient at `t`; stops must be sorted by offset
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> Color {
    let Some(first) = stops.first() else {
        return [0.0; 4];
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let u = (t - a.offset) / span;
            let mut out = [0.0; 4];
            for (i, c) in out.iter_mut().enumerate() {
                *c = a.color[i] + (b.color[i] - a.color[i]) * u;
            }
            return out;
        }
    }
    stops[stops.len() - 1].color
}

/// Horizontal anchoring of text at its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A positioned run of text (glyphs are emoji or HUD labels)
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

/// Immediate-mode 2D canvas
pub trait DrawSurface {
    /// Logical size in pixels
    fn size(&self) -> Vec2 {
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)
    }

    /// Start a full repaint
    fn begin_frame(&mut self);

    fn fill_rect(&mut self, rect: Aabb, color: Color);

    fn stroke_rect(&mut self, rect: Aabb, color: Color, line_width: f32);

    /// Fill a convex polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Top-to-bottom gradient over `rect`
    fn fill_vertical_gradient(&mut self, rect: Aabb, stops: &[GradientStop]);

    /// Disc gradient from `center` (offset 0) to `radius` (offset 1)
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);

    fn fill_text(&mut self, run: TextRun);

    /// Finish and present the frame
    fn end_frame(&mut self);
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Begin,
    Rect { rect: Aabb, color: Color },
    StrokeRect { rect: Aabb, color: Color, line_width: f32 },
    Polygon { points: Vec<Vec2>, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    VerticalGradient { rect: Aabb, stops: Vec<GradientStop> },
    RadialGradient { center: Vec2, radius: f32, stops: Vec<GradientStop> },
    Text(TextRun),
    End,
}

/// Recording surface. Clones share the same recording, and each
/// `begin_frame` starts a fresh one.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Rc<RefCell<Vec<DrawCommand>>>,
    frames: Rc<RefCell<u64>>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the most recent frame
    pub fn commands(&self) -> Ref<'_, Vec<DrawCommand>> {
        self.commands.borrow()
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        *self.frames.borrow()
    }

    /// Text of every run in the most recent frame
    pub fn texts(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(run) => Some(run.text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.borrow_mut().push(command);
    }
}

impl DrawSurface for CommandList {
    fn begin_frame(&mut self) {
        let mut commands = self.commands.borrow_mut();
        commands.clear();
        commands.push(DrawCommand::Begin);
    }

    fn fill_rect(&mut self, rect: Aabb, color: Color) {
        self.push(DrawCommand::Rect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Aabb, color: Color, line_width: f32) {
        self.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_vertical_gradient(&mut self, rect: Aabb, stops: &[GradientStop]) {
        self.push(DrawCommand::VerticalGradient {
            rect,
            stops: stops.to_vec(),
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.push(DrawCommand::RadialGradient {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }

    fn fill_text(&mut self, run: TextRun) {
        self.push(DrawCommand::Text(run));
    }

    fn end_frame(&mut self) {
        self.push(DrawCommand::End);
        *self.frames.borrow_mut() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgba(0x000000, 0.5)[3], 0.5);
    }

    #[test]
    fn test_sample_gradient() {
        let stops = [
            GradientStop::new(0.0, [0.0, 0.0, 0.0, 1.0]),
            GradientStop::new(1.0, [1.0, 1.0, 1.0, 1.0]),
        ];
        assert_eq!(sample_gradient(&stops, -1.0), stops[0].color);
        assert_eq!(sample_gradient(&stops, 0.5), [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(sample_gradient(&stops, 2.0), stops[1].color);
        assert_eq!(sample_gradient(&[], 0.5), [0.0; 4]);
    }

    #[test]
    fn test_command_list_frames() {
        let mut surface = CommandList::new();
        let view = surface.clone();
        surface.begin_frame();
        surface.fill_rect(Aabb::from_xywh(0.0, 0.0, 1.0, 1.0), rgb(0xffffff));
        surface.end_frame();
        assert_eq!(view.frames(), 1);
        assert_eq!(view.commands().len(), 3);

        surface.begin_frame();
        assert_eq!(view.commands().len(), 1);
    }
}
