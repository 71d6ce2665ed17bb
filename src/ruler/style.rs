use iced::{Color, Rectangle, Theme};

/// Geometry and colors of the draggable time thumb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbStyle {
    pub fixed_width: f32,
    pub overflow_left: f32,
    pub overflow_right: f32,
    pub normal: Color,
    pub hover: Color,
    pub active: Color,
}

impl ThumbStyle {
    /// Clickable area of the thumb drawn at pixel `x` inside `ruler`.
    pub fn hit_rect(&self, x: f32, ruler: Rectangle) -> Rectangle {
        Rectangle {
            x: x.round() - self.overflow_left,
            y: ruler.y,
            width: self.fixed_width + self.overflow_left + self.overflow_right,
            height: ruler.height,
        }
    }
}

impl Default for ThumbStyle {
    fn default() -> Self {
        Self {
            fixed_width: 1.0,
            overflow_left: 5.0,
            overflow_right: 5.0,
            normal: Color::from_rgba(0.85, 0.25, 0.2, 0.8),
            hover: Color::from_rgb(0.95, 0.35, 0.3),
            active: Color::from_rgb(1.0, 0.45, 0.35),
        }
    }
}

/// Drawing resources for one ruler, owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerStyle {
    pub background: Color,
    pub tick: Color,
    pub label: Color,
    pub label_size: f32,
    pub playhead: Color,
    pub thumb: ThumbStyle,
}

impl Default for RulerStyle {
    fn default() -> Self {
        Self {
            background: Color::from_rgb(0.95, 0.95, 0.95),
            tick: Color::from_rgb(0.2, 0.2, 0.2),
            label: Color::from_rgb(0.3, 0.3, 0.3),
            label_size: 11.0,
            playhead: Color::from_rgb(0.85, 0.25, 0.2),
            thumb: ThumbStyle::default(),
        }
    }
}

impl RulerStyle {
    pub fn from_theme(theme: &Theme) -> Self {
        let palette = theme.extended_palette();
        let danger = palette.danger.base.color;
        Self {
            background: palette.background.weak.color,
            tick: palette.background.weak.text,
            label: palette.background.strong.text,
            playhead: danger,
            thumb: ThumbStyle {
                normal: Color { a: 0.8, ..danger },
                hover: palette.danger.strong.color,
                active: palette.danger.strong.color,
                ..ThumbStyle::default()
            },
            ..Self::default()
        }
    }
}

/// Multiplies the alpha of `color` by `factor`, clamped to opaque.
pub fn alpha_multiplied(color: Color, factor: f32) -> Color {
    Color {
        a: (color.a * factor).clamp(0.0, 1.0),
        ..color
    }
}
