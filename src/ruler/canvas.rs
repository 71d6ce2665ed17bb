//! iced canvas backend: draws the ruler into a `canvas::Frame` and turns
//! iced events into [`PointerInput`]s for the application to scrub with.

use iced::mouse;
use iced::widget::canvas::{self, Action, Canvas, Geometry, Program};
use iced::{keyboard, Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme};
use std::sync::Arc;

use super::mapping::{CoordinateMapper, Range};
use super::render::{DrawSurface, RulerRenderer};
use super::scrubber::{Key, PointerButton, PointerInput};
use super::style::RulerStyle;
use super::{AreaSnapshot, RulerOptions, RulerSettings, TimeRuler};

const DEFAULT_HEIGHT: f32 = 24.0;

impl DrawSurface for canvas::Frame {
    fn line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.stroke(
            &canvas::Path::line(from, to),
            canvas::Stroke::default().with_color(color).with_width(width),
        );
    }

    fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        self.fill_rectangle(rect.position(), rect.size(), color);
    }

    fn text(&mut self, content: String, position: Point, size: f32, color: Color) {
        self.fill_text(canvas::Text {
            content,
            position,
            color,
            size: size.into(),
            ..Default::default()
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RulerMode {
    /// Labelled ruler with faded levels, thumb and playhead.
    #[default]
    Full,
    /// Faint full-height lines only, for drawing behind track content.
    MajorTicks,
}

/// A vertical wheel step over the ruler, `x` in the ruler's coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    pub delta: f32,
    pub x: f32,
    pub width: f32,
}

pub fn time_ruler<'a, Message>(
    shown: Range,
    time: f32,
    frame_rate: f32,
    style: &'a RulerStyle,
    on_input: impl Fn(PointerInput, Size) -> Message + 'a,
) -> TimeRulerView<'a, Message> {
    TimeRulerView::new(shown, time, frame_rate, style, on_input)
}

pub struct TimeRulerView<'a, Message> {
    program: TimeRulerProgram<'a, Message>,
    width: Length,
    height: Length,
}

impl<'a, Message> TimeRulerView<'a, Message> {
    pub fn new(
        shown: Range,
        time: f32,
        frame_rate: f32,
        style: &'a RulerStyle,
        on_input: impl Fn(PointerInput, Size) -> Message + 'a,
    ) -> Self {
        Self {
            program: TimeRulerProgram {
                shown,
                limits: Range::UNBOUNDED,
                time,
                frame_rate,
                style,
                settings: RulerSettings::default(),
                options: RulerOptions::default(),
                mode: RulerMode::Full,
                active: false,
                pick_anywhere: false,
                on_input: Arc::new(on_input),
                on_zoom: None,
            },
            width: Length::Fill,
            height: Length::Fixed(DEFAULT_HEIGHT),
        }
    }

    pub fn width(mut self, width: Length) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: Length) -> Self {
        self.height = height;
        self
    }

    pub fn limits(mut self, limits: Range) -> Self {
        self.program.limits = limits;
        self
    }

    pub fn settings(mut self, settings: RulerSettings) -> Self {
        self.program.settings = settings;
        self
    }

    pub fn options(mut self, options: RulerOptions) -> Self {
        self.program.options = options;
        self
    }

    pub fn mode(mut self, mode: RulerMode) -> Self {
        self.program.mode = mode;
        self
    }

    /// Whether this ruler's scrubber currently owns the pointer.
    pub fn active(mut self, active: bool) -> Self {
        self.program.active = active;
        self
    }

    pub fn pick_anywhere(mut self, pick_anywhere: bool) -> Self {
        self.program.pick_anywhere = pick_anywhere;
        self
    }

    pub fn on_zoom(mut self, on_zoom: impl Fn(Zoom) -> Message + 'a) -> Self {
        self.program.on_zoom = Some(Arc::new(on_zoom));
        self
    }
}

impl<'a, Message> From<TimeRulerView<'a, Message>> for Element<'a, Message>
where
    Message: 'a,
{
    fn from(view: TimeRulerView<'a, Message>) -> Self {
        Canvas::new(view.program)
            .width(view.width)
            .height(view.height)
            .into()
    }
}

#[derive(Default)]
pub struct RulerCanvasState {
    modifiers: keyboard::Modifiers,
}

struct TimeRulerProgram<'a, Message> {
    shown: Range,
    limits: Range,
    time: f32,
    frame_rate: f32,
    style: &'a RulerStyle,
    settings: RulerSettings,
    options: RulerOptions,
    mode: RulerMode,
    active: bool,
    pick_anywhere: bool,
    on_input: Arc<dyn Fn(PointerInput, Size) -> Message + 'a>,
    on_zoom: Option<Arc<dyn Fn(Zoom) -> Message + 'a>>,
}

impl<'a, Message> TimeRulerProgram<'a, Message> {
    fn area(&self, size: Size) -> AreaSnapshot {
        AreaSnapshot::horizontal(self.shown, Rectangle::with_size(size)).with_limits(self.limits)
    }

    /// Whether a primary press at `position` can start a drag here.
    fn grabs(&self, position: Point, size: Size) -> bool {
        self.pick_anywhere || self.thumb_rect(size).contains(position)
    }

    fn thumb_rect(&self, size: Size) -> Rectangle {
        let mapper = CoordinateMapper::new(self.shown, Rectangle::with_size(size));
        self.style
            .thumb
            .hit_rect(mapper.time_to_pixel(self.time), mapper.rect)
    }
}

/// The thumb lights up while the pointer is anywhere over the ruler.
fn thumb_hovered(bounds: Rectangle, cursor: mouse::Cursor) -> bool {
    cursor.is_over(bounds)
}

fn pointer_button(button: &mouse::Button) -> Option<PointerButton> {
    match button {
        mouse::Button::Left => Some(PointerButton::Primary),
        mouse::Button::Right => Some(PointerButton::Secondary),
        mouse::Button::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

impl<'a, Message> Program<Message> for TimeRulerProgram<'a, Message> {
    type State = RulerCanvasState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let size = bounds.size();
        let area = self.area(size);
        let mut ruler = TimeRuler::new(self.settings);
        let painter = RulerRenderer::new(self.style, &self.settings);

        match self.mode {
            RulerMode::MajorTicks => {
                painter.draw_major_ticks(&mut frame, &mut ruler, &area, size, self.frame_rate);
            }
            RulerMode::Full => {
                let options = RulerOptions {
                    playhead: None,
                    ..self.options
                };
                painter.draw_time_ruler(&mut frame, &mut ruler, &area, size, self.frame_rate, &options);

                let thumb = self.thumb_rect(size);
                painter.draw_thumb(&mut frame, thumb, self.active, thumb_hovered(bounds, cursor));

                let x = area.h_mapper(Rectangle::with_size(size)).time_to_pixel(self.time);
                painter.draw_playhead(
                    &mut frame,
                    x,
                    0.0,
                    size.height,
                    self.options.playhead_thickness,
                    self.options.alpha,
                );
            }
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
        if self.mode == RulerMode::MajorTicks {
            return None;
        }

        let input = match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = *modifiers;
                return None;
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let on_zoom = self.on_zoom.as_ref()?;
                let position = cursor.position_in(bounds)?;
                let (mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. }) = *delta;
                if y == 0.0 {
                    return None;
                }
                return Some(
                    Action::publish(on_zoom(Zoom {
                        delta: y,
                        x: position.x,
                        width: bounds.width,
                    }))
                    .and_capture(),
                );
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                if !self.grabs(position, bounds.size()) {
                    return None;
                }
                PointerInput::Down {
                    position,
                    button: PointerButton::Primary,
                    modifiers: state.modifiers,
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { position }) if self.active => {
                PointerInput::Move {
                    position: Point::new(position.x - bounds.x, position.y - bounds.y),
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(button)) if self.active => {
                let position = cursor.position().unwrap_or(bounds.position());
                PointerInput::Up {
                    position: Point::new(position.x - bounds.x, position.y - bounds.y),
                    button: pointer_button(button)?,
                }
            }
            Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) if self.active => {
                let key = match key {
                    keyboard::Key::Named(keyboard::key::Named::Escape) => Key::Escape,
                    _ => Key::Other,
                };
                PointerInput::Key {
                    key,
                    modifiers: *modifiers,
                }
            }
            _ => return None,
        };

        Some(Action::publish((self.on_input)(input, bounds.size())).and_capture())
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.mode == RulerMode::MajorTicks {
            return mouse::Interaction::default();
        }
        if self.active {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(position) if self.thumb_rect(bounds.size()).contains(position) => {
                mouse::Interaction::Grab
            }
            Some(_) if self.pick_anywhere => mouse::Interaction::Pointer,
            _ => mouse::Interaction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumb_follows_time() {
        let style = RulerStyle::default();
        let view = time_ruler(Range::new(0.0, 10.0), 2.5, 30.0, &style, |_, _| ());
        let rect = view.program.thumb_rect(Size::new(1000.0, 24.0));
        assert!(rect.contains(Point::new(250.0, 12.0)));
        assert!(!rect.contains(Point::new(300.0, 12.0)));
    }

    #[test]
    fn area_spans_ruler_bounds() {
        let style = RulerStyle::default();
        let view = time_ruler(Range::new(1.0, 3.0), 0.0, 0.0, &style, |_, _| ())
            .limits(Range::new(0.0, 100.0));
        let area = view.program.area(Size::new(400.0, 24.0));
        assert_eq!(area.h_range(), Range::new(1.0, 3.0));
        assert_eq!(area.draw_rect.width, 400.0);
        assert_eq!(area.h_limits, Range::new(0.0, 100.0));
    }

    #[test]
    fn presses_away_from_thumb_pass_through() {
        let style = RulerStyle::default();
        let size = Size::new(1000.0, 24.0);
        let view = time_ruler(Range::new(0.0, 10.0), 2.5, 30.0, &style, |_, _| ());
        assert!(view.program.grabs(Point::new(250.0, 12.0), size));
        assert!(!view.program.grabs(Point::new(600.0, 12.0), size));

        let view = view.pick_anywhere(true);
        assert!(view.program.grabs(Point::new(600.0, 12.0), size));
    }

    #[test]
    fn thumb_hovers_with_pointer_over_ruler() {
        let bounds = Rectangle::new(Point::new(10.0, 10.0), Size::new(1000.0, 24.0));
        assert!(thumb_hovered(bounds, mouse::Cursor::Available(Point::new(900.0, 20.0))));
        assert!(!thumb_hovered(bounds, mouse::Cursor::Available(Point::new(900.0, 50.0))));
        assert!(!thumb_hovered(bounds, mouse::Cursor::Unavailable));
    }

    #[test]
    fn only_primary_secondary_and_middle_buttons_map() {
        assert_eq!(pointer_button(&mouse::Button::Left), Some(PointerButton::Primary));
        assert_eq!(pointer_button(&mouse::Button::Back), None);
    }
}
