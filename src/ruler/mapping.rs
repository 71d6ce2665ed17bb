//! Affine mapping between the shown value range and ruler pixels.

use iced::Rectangle;

/// An ordered pair of values, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const UNBOUNDED: Range = Range {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub fn new(a: f32, b: f32) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Maps `value` inside `range` onto the horizontal span of `rect`.
///
/// A zero-width range saturates to the nearest edge of `rect` instead of
/// dividing by zero.
pub fn value_to_pixel(value: f32, range: Range, rect: Rectangle) -> f32 {
    let width = range.width();
    if width <= 0.0 || !width.is_finite() {
        return if value <= range.min {
            rect.x
        } else {
            rect.x + rect.width
        };
    }
    (value - range.min) * rect.width / width + rect.x
}

/// Inverse of [`value_to_pixel`]. A zero-width rect maps everything to
/// `range.min`.
pub fn pixel_to_value(x: f32, range: Range, rect: Rectangle) -> f32 {
    if rect.width <= 0.0 {
        return range.min;
    }
    (x - rect.x) * range.width() / rect.width + range.min
}

/// Maps a frame index onto pixels by scaling the range into frame units.
///
/// Without a frame rate the frame is treated as a plain value.
pub fn frame_to_pixel(frame: f32, frame_rate: f32, range: Range, rect: Rectangle) -> f32 {
    if frame_rate <= 0.0 {
        return value_to_pixel(frame, range, rect);
    }
    let scaled = Range {
        min: range.min * frame_rate,
        max: range.max * frame_rate,
    };
    value_to_pixel(frame, scaled, rect)
}

/// The range/rect pair used for every conversion of a single pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub range: Range,
    pub rect: Rectangle,
}

impl CoordinateMapper {
    pub fn new(range: Range, rect: Rectangle) -> Self {
        Self { range, rect }
    }

    pub fn time_to_pixel(&self, time: f32) -> f32 {
        value_to_pixel(time, self.range, self.rect)
    }

    pub fn pixel_to_time(&self, x: f32) -> f32 {
        pixel_to_value(x, self.range, self.rect)
    }

    pub fn frame_to_pixel(&self, frame: f32, frame_rate: f32) -> f32 {
        frame_to_pixel(frame, frame_rate, self.range, self.rect)
    }

    /// Value units covered by one pixel, 0 when the rect is empty.
    pub fn value_per_pixel(&self) -> f32 {
        if self.rect.width <= 0.0 {
            0.0
        } else {
            self.range.width() / self.rect.width
        }
    }

    /// The same mapping expressed relative to the rect's own origin.
    pub fn local(&self) -> Self {
        Self {
            range: self.range,
            rect: Rectangle {
                x: 0.0,
                y: 0.0,
                ..self.rect
            },
        }
    }
}
