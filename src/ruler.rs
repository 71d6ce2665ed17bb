pub mod canvas;
pub mod format;
pub mod mapping;
pub mod render;
pub mod scrubber;
pub mod slider;
pub mod style;
pub mod ticks;

use iced::Rectangle;

use format::TimeFormat;
use mapping::{CoordinateMapper, Range};
use ticks::TickHandler;

/// Ticks closer than this many pixels are not drawn at all.
pub const TICK_RULER_DIST_MIN: f32 = 3.0;
/// Ticks this far apart are drawn at full strength.
pub const TICK_RULER_DIST_FULL: f32 = 80.0;
/// Minimum distance between two labelled ticks.
pub const TICK_RULER_DIST_LABEL: f32 = 40.0;
pub const TICK_RULER_HEIGHT_MAX: f32 = 0.7;
pub const TICK_RULER_FAT_THRESHOLD: f32 = 0.5;

/// Thresholds and proportions shared by every ruler pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerSettings {
    pub min_spacing: f32,
    pub full_spacing: f32,
    pub label_spacing: f32,
    pub height_max: f32,
    pub fat_threshold: f32,
    pub sqrt_strengths: bool,
    pub label_offset_x: f32,
    pub label_offset_y: f32,
}

impl Default for RulerSettings {
    fn default() -> Self {
        Self {
            min_spacing: TICK_RULER_DIST_MIN,
            full_spacing: TICK_RULER_DIST_FULL,
            label_spacing: TICK_RULER_DIST_LABEL,
            height_max: TICK_RULER_HEIGHT_MAX,
            fat_threshold: TICK_RULER_FAT_THRESHOLD,
            sqrt_strengths: true,
            label_offset_x: 3.0,
            label_offset_y: -3.0,
        }
    }
}

impl RulerSettings {
    pub fn label_spacing(mut self, label_spacing: f32) -> Self {
        self.label_spacing = label_spacing;
        self
    }

    pub fn spacing(mut self, min_spacing: f32, full_spacing: f32) -> Self {
        self.min_spacing = min_spacing;
        self.full_spacing = full_spacing;
        self
    }
}

/// Per-call options of the full ruler pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RulerOptions {
    pub labels: bool,
    pub use_entire_height: bool,
    pub alpha: f32,
    pub time_format: TimeFormat,
    /// Playhead time drawn on top of everything else.
    pub playhead: Option<f32>,
    pub playhead_thickness: f32,
}

impl Default for RulerOptions {
    fn default() -> Self {
        Self {
            labels: true,
            use_entire_height: false,
            alpha: 1.0,
            time_format: TimeFormat::TimeFrame,
            playhead: None,
            playhead_thickness: 1.0,
        }
    }
}

impl RulerOptions {
    pub fn labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn use_entire_height(mut self, use_entire_height: bool) -> Self {
        self.use_entire_height = use_entire_height;
        self
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    pub fn playhead(mut self, time: f32, thickness: f32) -> Self {
        self.playhead = Some(time);
        self.playhead_thickness = thickness;
        self
    }
}

/// The pan/zoom state of the surrounding area.
///
/// `shown_area` is in value space (x is time, y is value); `draw_rect` is the
/// pixel rectangle it is displayed in.
pub trait ShownArea {
    fn shown_area(&self) -> Rectangle;
    fn draw_rect(&self) -> Rectangle;

    /// Times outside these limits get no ticks.
    fn h_range_limits(&self) -> Range {
        Range::UNBOUNDED
    }
}

/// One frame's copy of a [`ShownArea`], shared by ticks, lines and labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSnapshot {
    pub shown: Rectangle,
    pub draw_rect: Rectangle,
    pub h_limits: Range,
}

impl AreaSnapshot {
    pub fn new(shown: Rectangle, draw_rect: Rectangle) -> Self {
        Self {
            shown,
            draw_rect,
            h_limits: Range::UNBOUNDED,
        }
    }

    pub fn capture(area: &impl ShownArea) -> Self {
        Self {
            shown: area.shown_area(),
            draw_rect: area.draw_rect(),
            h_limits: area.h_range_limits(),
        }
    }

    /// A horizontal-only area: `range` over `draw_rect`.
    pub fn horizontal(range: Range, draw_rect: Rectangle) -> Self {
        Self::new(
            Rectangle {
                x: range.min,
                y: 0.0,
                width: range.width(),
                height: 1.0,
            },
            draw_rect,
        )
    }

    pub fn with_limits(mut self, h_limits: Range) -> Self {
        self.h_limits = h_limits;
        self
    }

    pub fn h_range(&self) -> Range {
        Range::new(self.shown.x, self.shown.x + self.shown.width)
    }

    pub fn v_range(&self) -> Range {
        Range::new(self.shown.y, self.shown.y + self.shown.height)
    }

    /// Horizontal mapping onto `rect`, usually the ruler's own bounds.
    pub fn h_mapper(&self, rect: Rectangle) -> CoordinateMapper {
        CoordinateMapper::new(self.h_range(), rect)
    }

    pub fn h_value_per_pixel(&self) -> f32 {
        self.h_mapper(self.draw_rect).value_per_pixel()
    }

    pub fn v_value_per_pixel(&self) -> f32 {
        if self.draw_rect.height <= 0.0 {
            0.0
        } else {
            self.shown.height / self.draw_rect.height
        }
    }
}

impl ShownArea for AreaSnapshot {
    fn shown_area(&self) -> Rectangle {
        self.shown
    }

    fn draw_rect(&self) -> Rectangle {
        self.draw_rect
    }

    fn h_range_limits(&self) -> Range {
        self.h_limits
    }
}

/// Horizontal and vertical tick handlers over an injected area.
#[derive(Debug, Clone, Default)]
pub struct TimeRuler {
    pub h_ticks: TickHandler,
    pub v_ticks: TickHandler,
    pub settings: RulerSettings,
}

impl TimeRuler {
    pub fn new(settings: RulerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn set_tick_marker_ranges(&mut self, area: &AreaSnapshot) {
        let shown = area.shown;
        let draw = area.draw_rect;
        self.h_ticks
            .set_ranges(shown.x, shown.x + shown.width, draw.x, draw.x + draw.width);
        self.v_ticks
            .set_ranges(shown.y, shown.y + shown.height, draw.y, draw.y + draw.height);
    }

    /// Sets ranges and strengths of both axes for this frame.
    pub fn update_ticks(&mut self, area: &AreaSnapshot) {
        self.set_tick_marker_ranges(area);
        let RulerSettings {
            min_spacing,
            full_spacing,
            sqrt_strengths,
            ..
        } = self.settings;
        self.h_ticks
            .set_tick_strengths(min_spacing, full_spacing, sqrt_strengths);
        self.v_ticks
            .set_tick_strengths(min_spacing, full_spacing, sqrt_strengths);
    }

    pub fn format_time(&self, area: &AreaSnapshot, time: f32, frame_rate: f32, format: TimeFormat) -> String {
        format::format_time(time, frame_rate, format, area.h_value_per_pixel())
    }

    pub fn format_value(&self, area: &AreaSnapshot, value: f32) -> String {
        format::format_value(value, area.v_value_per_pixel())
    }
}
