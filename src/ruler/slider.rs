//! Horizontal slider over the whole time range.
//!
//! The thumb is the shown range; dragging it pans the view. The current time
//! is marked on the track so it can be found while zoomed in.

use iced::mouse;
use iced::widget::canvas::{self, Action, Canvas, Geometry, Program};
use iced::{Color, Element, Event, Length, Point, Rectangle, Renderer, Theme};
use std::sync::Arc;

use super::mapping::Range;
use super::render::RulerRenderer;
use super::style::RulerStyle;
use super::RulerSettings;

const DEFAULT_HEIGHT: f32 = 14.0;
const TRACK_THICKNESS: f32 = 6.0;
const TRACK_PADDING: f32 = 6.0;
const MIN_THUMB_LENGTH: f32 = 16.0;

pub fn range_slider<'a, Message>(
    shown: Range,
    max_time: f32,
    on_pan: impl Fn(f32) -> Message + 'a,
) -> RangeSlider<'a, Message> {
    RangeSlider::new(shown, max_time, on_pan)
}

pub struct RangeSlider<'a, Message> {
    shown: Range,
    max_time: f32,
    time: Option<f32>,
    style: Option<&'a RulerStyle>,
    width: Length,
    on_pan: Arc<dyn Fn(f32) -> Message + 'a>,
}

impl<'a, Message> RangeSlider<'a, Message> {
    pub fn new(shown: Range, max_time: f32, on_pan: impl Fn(f32) -> Message + 'a) -> Self {
        Self {
            shown,
            max_time: max_time.max(0.0),
            time: None,
            style: None,
            width: Length::Fill,
            on_pan: Arc::new(on_pan),
        }
    }

    /// Marks `time` on the track with the style's playhead color.
    pub fn time(mut self, time: f32, style: &'a RulerStyle) -> Self {
        self.time = Some(time);
        self.style = Some(style);
        self
    }

    pub fn width(mut self, width: Length) -> Self {
        self.width = width;
        self
    }
}

impl<'a, Message> From<RangeSlider<'a, Message>> for Element<'a, Message>
where
    Message: 'a,
{
    fn from(slider: RangeSlider<'a, Message>) -> Self {
        let width = slider.width;
        let geometry = SliderGeometry {
            shown: slider.shown,
            max_time: slider.max_time,
        };
        Canvas::new(RangeSliderProgram {
            geometry,
            time: slider.time,
            style: slider.style,
            on_pan: slider.on_pan,
        })
        .width(width)
        .height(Length::Fixed(DEFAULT_HEIGHT))
        .into()
    }
}

/// Track and thumb layout, separated from the canvas plumbing.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SliderGeometry {
    shown: Range,
    max_time: f32,
}

impl SliderGeometry {
    fn track(&self, size: iced::Size) -> Rectangle {
        Rectangle {
            x: TRACK_PADDING,
            y: (size.height - TRACK_THICKNESS) * 0.5,
            width: (size.width - TRACK_PADDING * 2.0).max(1.0),
            height: TRACK_THICKNESS,
        }
    }

    fn thumb_fraction(&self) -> f32 {
        if self.max_time <= 0.0 {
            1.0
        } else {
            (self.shown.width() / self.max_time).clamp(0.0, 1.0)
        }
    }

    fn pan_limit(&self) -> f32 {
        (self.max_time - self.shown.width()).max(0.0)
    }

    fn thumb(&self, size: iced::Size) -> Rectangle {
        let track = self.track(size);
        let length = (track.width * self.thumb_fraction())
            .max(MIN_THUMB_LENGTH)
            .min(track.width);
        let available = track.width - length;
        let limit = self.pan_limit();
        let fraction = if limit <= 0.0 {
            0.0
        } else {
            (self.shown.min / limit).clamp(0.0, 1.0)
        };
        Rectangle {
            x: track.x + available * fraction,
            width: length,
            ..track
        }
    }

    /// Shown-range start for a thumb whose left edge is at `thumb_x`.
    fn start_for_thumb_x(&self, size: iced::Size, thumb_x: f32) -> f32 {
        let track = self.track(size);
        let available = track.width - self.thumb(size).width;
        if available <= 0.0 {
            return 0.0;
        }
        let fraction = ((thumb_x - track.x) / available).clamp(0.0, 1.0);
        fraction * self.pan_limit()
    }
}

#[derive(Default)]
struct RangeSliderState {
    grab_offset: Option<f32>,
}

struct RangeSliderProgram<'a, Message> {
    geometry: SliderGeometry,
    time: Option<f32>,
    style: Option<&'a RulerStyle>,
    on_pan: Arc<dyn Fn(f32) -> Message + 'a>,
}

impl<'a, Message> Program<Message> for RangeSliderProgram<'a, Message> {
    type State = RangeSliderState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let track = self.geometry.track(bounds.size());
        let thumb = self.geometry.thumb(bounds.size());

        frame.fill_rectangle(track.position(), track.size(), Color::from_rgb(0.92, 0.92, 0.92));
        frame.fill_rectangle(thumb.position(), thumb.size(), Color::from_rgb(0.75, 0.75, 0.78));

        if let (Some(time), Some(style)) = (self.time, self.style) {
            let settings = RulerSettings::default();
            RulerRenderer::new(style, &settings).draw_time_on_slider(
                &mut frame,
                track,
                time,
                self.geometry.max_time,
                style.playhead,
            );
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<Message>> {
        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                let thumb = self.geometry.thumb(bounds.size());
                let offset = if thumb.contains(Point::new(position.x, thumb.center_y())) {
                    position.x - thumb.x
                } else {
                    thumb.width * 0.5
                };
                state.grab_offset = Some(offset);
                let start = self
                    .geometry
                    .start_for_thumb_x(bounds.size(), position.x - offset);
                Some(Action::publish((self.on_pan)(start)).and_capture())
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) => {
                let offset = state.grab_offset?;
                let start = self
                    .geometry
                    .start_for_thumb_x(bounds.size(), position.x - bounds.x - offset);
                Some(Action::publish((self.on_pan)(start)).and_capture())
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.grab_offset.take().map(|_| Action::capture())
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.grab_offset.is_some() {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(position) if self.geometry.thumb(bounds.size()).contains(position) => {
                mouse::Interaction::Grab
            }
            _ => mouse::Interaction::default(),
        }
    }
}
