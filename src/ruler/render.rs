//! Immediate-mode drawing of ticks, labels, playhead and thumb.
//!
//! Everything is drawn in the ruler's local coordinates, `(0, 0)` being the
//! top-left corner of `bounds`.

use iced::{Color, Point, Rectangle, Size};
use unicode_width::UnicodeWidthStr;

use super::format;
use super::mapping::CoordinateMapper;
use super::style::{alpha_multiplied, RulerStyle};
use super::{AreaSnapshot, RulerOptions, RulerSettings, TimeRuler};

/// The drawing primitives a backend provides.
pub trait DrawSurface {
    fn line(&mut self, from: Point, to: Point, width: f32, color: Color);
    fn fill_rect(&mut self, rect: Rectangle, color: Color);
    fn text(&mut self, content: String, position: Point, size: f32, color: Color);
}

/// Rough advance of one terminal column of label text, in font sizes.
const GLYPH_ADVANCE: f32 = 0.6;

/// Estimated pixel width of `content` at `size`.
pub fn label_extent(content: &str, size: f32) -> f32 {
    content.width() as f32 * size * GLYPH_ADVANCE
}

pub struct RulerRenderer<'a> {
    style: &'a RulerStyle,
    settings: &'a RulerSettings,
}

impl<'a> RulerRenderer<'a> {
    pub fn new(style: &'a RulerStyle, settings: &'a RulerSettings) -> Self {
        Self { style, settings }
    }

    fn tick_x(mapper: &CoordinateMapper, tick: f32, frame_rate: f32) -> f32 {
        if frame_rate > 0.0 {
            let frame = (tick * frame_rate).round();
            mapper.frame_to_pixel(frame, frame_rate)
        } else {
            mapper.time_to_pixel(tick)
        }
    }

    fn local_mapper(area: &AreaSnapshot, bounds: Size) -> CoordinateMapper {
        area.h_mapper(Rectangle::with_size(bounds))
    }

    /// Faint full-height lines for the strong levels only.
    pub fn draw_major_ticks(
        &self,
        surface: &mut impl DrawSurface,
        ruler: &mut TimeRuler,
        area: &AreaSnapshot,
        bounds: Size,
        frame_rate: f32,
    ) {
        ruler.update_ticks(area);
        let ticks = &ruler.h_ticks;
        let mapper = Self::local_mapper(area, bounds);
        let color = Color {
            a: 0.1,
            ..self.style.tick
        };

        for level in 0..ticks.tick_levels() {
            let strength = ticks.strength_of_level(level) * 0.9;
            if strength <= self.settings.fat_threshold {
                continue;
            }
            for tick in ticks.ticks_at_level(level, true) {
                if tick < 0.0 {
                    continue;
                }
                let x = Self::tick_x(&mapper, tick, frame_rate);
                self.vertical_line(surface, x, 0.0, bounds.height, color);
            }
        }
    }

    /// Background, faded tick levels, labels, then the playhead on top.
    pub fn draw_time_ruler(
        &self,
        surface: &mut impl DrawSurface,
        ruler: &mut TimeRuler,
        area: &AreaSnapshot,
        bounds: Size,
        frame_rate: f32,
        options: &RulerOptions,
    ) {
        ruler.update_ticks(area);
        let mapper = Self::local_mapper(area, bounds);

        surface.fill_rect(Rectangle::with_size(bounds), self.style.background);

        self.draw_tick_lines(surface, ruler, area, &mapper, bounds, frame_rate, options);

        if options.labels {
            self.draw_labels(surface, ruler, area, &mapper, frame_rate, options);
        }

        if let Some(time) = options.playhead {
            let x = mapper.time_to_pixel(time);
            self.draw_playhead(
                surface,
                x,
                0.0,
                bounds.height,
                options.playhead_thickness,
                options.alpha,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tick_lines(
        &self,
        surface: &mut impl DrawSurface,
        ruler: &TimeRuler,
        area: &AreaSnapshot,
        mapper: &CoordinateMapper,
        bounds: Size,
        frame_rate: f32,
        options: &RulerOptions,
    ) {
        let ticks = &ruler.h_ticks;
        let base = alpha_multiplied(self.style.tick, 0.75 * options.alpha);

        for level in (0..ticks.tick_levels()).rev() {
            let strength = ticks.strength_of_level(level) * 0.9;
            if strength <= 0.0 {
                continue;
            }
            let color = alpha_multiplied(base, strength / self.settings.fat_threshold);
            let height = if options.use_entire_height {
                bounds.height
            } else {
                bounds.height * strength.min(1.0) * self.settings.height_max
            };

            for tick in ticks.ticks_at_level(level, true) {
                if !area.h_limits.contains(tick) {
                    continue;
                }
                let x = Self::tick_x(mapper, tick, frame_rate);
                self.vertical_line(
                    surface,
                    x,
                    bounds.height - height + 0.5,
                    bounds.height - 0.5,
                    color,
                );
            }
        }
    }

    fn draw_labels(
        &self,
        surface: &mut impl DrawSurface,
        ruler: &TimeRuler,
        area: &AreaSnapshot,
        mapper: &CoordinateMapper,
        frame_rate: f32,
        options: &RulerOptions,
    ) {
        let ticks = &ruler.h_ticks;
        let level = ticks.level_with_min_separation(self.settings.label_spacing);
        let color = alpha_multiplied(self.style.label, options.alpha);
        let value_per_pixel = mapper.value_per_pixel();
        let mut last_label_end = f32::NEG_INFINITY;

        for tick in ticks.ticks_at_level(level, false) {
            if !area.h_limits.contains(tick) {
                continue;
            }
            let x = Self::tick_x(mapper, tick, frame_rate).floor() + self.settings.label_offset_x;
            if x < last_label_end {
                continue;
            }
            let content = format::format_time(tick, frame_rate, options.time_format, value_per_pixel);
            last_label_end = x + label_extent(&content, self.style.label_size);
            surface.text(
                content,
                Point::new(x, self.settings.label_offset_y),
                self.style.label_size,
                color,
            );
        }
    }

    /// A hairline for `thickness <= 1`, a filled band otherwise.
    pub fn draw_playhead(
        &self,
        surface: &mut impl DrawSurface,
        x: f32,
        y_min: f32,
        y_max: f32,
        thickness: f32,
        alpha: f32,
    ) {
        let color = alpha_multiplied(self.style.playhead, alpha);
        if thickness > 1.0 {
            let half = thickness * 0.5;
            surface.fill_rect(
                Rectangle {
                    x: x - half,
                    y: y_min,
                    width: thickness,
                    height: y_max - y_min,
                },
                color,
            );
        } else {
            self.vertical_line(surface, x, y_min, y_max, color);
        }
    }

    pub fn draw_thumb(&self, surface: &mut impl DrawSurface, hit_rect: Rectangle, active: bool, hover: bool) {
        let thumb = &self.style.thumb;
        let color = if active {
            thumb.active
        } else if hover {
            thumb.hover
        } else {
            thumb.normal
        };
        surface.fill_rect(
            Rectangle {
                x: hit_rect.x + thumb.overflow_left,
                width: thumb.fixed_width,
                ..hit_rect
            },
            color,
        );
        let head = Rectangle {
            height: (hit_rect.height * 0.3).min(8.0),
            ..hit_rect
        };
        surface.fill_rect(head, color);
    }

    /// Marks `time` on a slider track spanning `0..=max_time`.
    ///
    /// Nothing is drawn when the mark would land past the track's end.
    pub fn draw_time_on_slider(
        &self,
        surface: &mut impl DrawSurface,
        track: Rectangle,
        time: f32,
        max_time: f32,
        color: Color,
    ) {
        if max_time <= 0.0 {
            return;
        }
        let x = track.x + (time / max_time) * track.width;
        if x < track.x || x > track.x + track.width {
            return;
        }
        surface.fill_rect(
            Rectangle {
                x: x - 0.5,
                y: track.y,
                width: 1.0,
                height: track.height,
            },
            color,
        );
    }

    pub fn vertical_line(&self, surface: &mut impl DrawSurface, x: f32, y_min: f32, y_max: f32, color: Color) {
        surface.line(Point::new(x, y_min), Point::new(x, y_max), 1.0, color);
    }
}
