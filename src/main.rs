use iced::widget::{column, container, row, stack, text, text_input, Space};
use iced::{Alignment, Element, Length, Rectangle, Size, Task, Theme};
use iced_aw::{tab_bar, TabLabel};
use timeruler::ruler::canvas::{time_ruler, RulerMode, Zoom};
use timeruler::ruler::format::{self, TimeFormat};
use timeruler::ruler::mapping::{CoordinateMapper, Range};
use timeruler::ruler::scrubber::{
    ControlId, DragMode, InputEvent, PointerInput, PointerOwnership, ScrubberController,
};
use timeruler::ruler::slider::range_slider;
use timeruler::ruler::style::RulerStyle;
use timeruler::ruler::RulerOptions;

const FRAME_RATE: f32 = 30.0;
const MAX_TIME: f32 = 60.0;
const MIN_SHOWN: f32 = 0.1;
const TRACK_HEIGHT: f32 = 120.0;

pub fn main() -> iced::Result {
    iced::application(Scrub::new, Scrub::update, Scrub::view)
        .title(Scrub::title)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    FormatSelected(TimeFormat),
    RulerInput {
        ruler: usize,
        input: PointerInput,
        size: Size,
    },
    RulerZoomed(Zoom),
    Panned(f32),
    TimeTextChanged(String),
    TimeTextSubmitted,
}

struct Scrub {
    time: f32,
    time_text: String,
    format: TimeFormat,
    shown: Range,
    style: RulerStyle,
    ownership: PointerOwnership,
    scrubbers: [ScrubberController; 2],
}

impl Scrub {
    fn new() -> (Self, Task<Message>) {
        let style = RulerStyle::from_theme(&Theme::Light);
        let scrubbers = [
            ScrubberController::new(ControlId(1), style.thumb),
            ScrubberController::new(ControlId(2), style.thumb).pick_anywhere(true),
        ];
        let mut scrub = Scrub {
            time: 0.0,
            time_text: String::new(),
            format: TimeFormat::default(),
            shown: Range::new(0.0, 10.0),
            style,
            ownership: PointerOwnership::new(),
            scrubbers,
        };
        scrub.time_text = scrub.formatted_time();
        (scrub, Task::none())
    }

    fn title(&self) -> String {
        format!("timeruler - {}", self.formatted_time())
    }

    fn formatted_time(&self) -> String {
        format::format_time(self.time, FRAME_RATE, self.format, 0.001)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FormatSelected(format) => {
                self.format = format;
                self.time_text = self.formatted_time();
            }
            Message::RulerInput { ruler, input, size } => {
                let Some(scrubber) = self.scrubbers.get_mut(ruler) else {
                    return Task::none();
                };
                let mapper = CoordinateMapper::new(self.shown, Rectangle::with_size(size));
                let mut event = InputEvent::new(input);
                let response = scrubber.handle(
                    &mut event,
                    &mut self.time,
                    FRAME_RATE,
                    &mapper,
                    &mut self.ownership,
                );
                if response.changed || response.mode == DragMode::Cancel {
                    self.time = self.time.clamp(0.0, MAX_TIME);
                    self.time_text = self.formatted_time();
                }
            }
            Message::RulerZoomed(zoom) => {
                self.shown = zoom_around(self.shown, Range::new(0.0, MAX_TIME), zoom);
            }
            Message::Panned(start) => {
                let width = self.shown.width();
                self.shown = Range::new(start, start + width);
            }
            Message::TimeTextChanged(text) => {
                self.time_text = text;
            }
            Message::TimeTextSubmitted => {
                let time = format::commit_time_text(&self.time_text, self.time, FRAME_RATE, self.format);
                self.time = time.clamp(0.0, MAX_TIME);
                self.time_text = self.formatted_time();
            }
        }
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let mut bar = tab_bar::TabBar::new(Message::FormatSelected);
        for format in TimeFormat::ALL {
            bar = bar.push(format, TabLabel::Text(format.to_string()));
        }
        let bar = bar.set_active_tab(&self.format);

        let header = row![
            bar,
            Space::new().width(Length::Fill),
            text(format!("{FRAME_RATE} fps")),
            text_input("Time", &self.time_text)
                .on_input(Message::TimeTextChanged)
                .on_submit(Message::TimeTextSubmitted)
                .width(Length::Fixed(120.0)),
        ]
        .spacing(10)
        .padding(5)
        .align_y(Alignment::Center);

        let limits = Range::new(0.0, MAX_TIME);
        let options = RulerOptions::default().time_format(self.format);

        let top = time_ruler(self.shown, self.time, FRAME_RATE, &self.style, |input, size| {
            Message::RulerInput {
                ruler: 0,
                input,
                size,
            }
        })
        .limits(limits)
        .options(options)
        .active(self.scrubbers[0].is_active())
        .on_zoom(Message::RulerZoomed);

        let track = stack![
            time_ruler(self.shown, self.time, FRAME_RATE, &self.style, |input, size| {
                Message::RulerInput {
                    ruler: 0,
                    input,
                    size,
                }
            })
            .limits(limits)
            .mode(RulerMode::MajorTicks)
            .height(Length::Fixed(TRACK_HEIGHT)),
            container(text("Drag the markers, or click anywhere on the lower ruler"))
                .padding(10),
        ];

        let bottom = time_ruler(self.shown, self.time, FRAME_RATE, &self.style, |input, size| {
            Message::RulerInput {
                ruler: 1,
                input,
                size,
            }
        })
        .limits(limits)
        .options(options.playhead(self.time, 2.0))
        .active(self.scrubbers[1].is_active())
        .pick_anywhere(true)
        .on_zoom(Message::RulerZoomed);

        let slider = range_slider(self.shown, MAX_TIME, Message::Panned).time(self.time, &self.style);

        column![header, top, track, bottom, slider]
            .spacing(4)
            .padding(10)
            .into()
    }
}

/// Zooms `shown` by one wheel step, keeping the time under the pointer fixed.
fn zoom_around(shown: Range, limits: Range, zoom: Zoom) -> Range {
    let width = shown.width();
    if width <= 0.0 || zoom.width <= 0.0 {
        return shown;
    }
    let factor = if zoom.delta > 0.0 { 0.9 } else { 1.1 };
    let new_width = (width * factor).clamp(MIN_SHOWN, limits.width().max(MIN_SHOWN));
    let fraction = (zoom.x / zoom.width).clamp(0.0, 1.0);
    let anchor = shown.min + fraction * width;
    let start = (anchor - fraction * new_width).clamp(limits.min, (limits.max - new_width).max(limits.min));
    Range::new(start, start + new_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_in_keeps_pointer_time() {
        let zoomed = zoom_around(
            Range::new(0.0, 10.0),
            Range::new(0.0, MAX_TIME),
            Zoom {
                delta: 1.0,
                x: 500.0,
                width: 1000.0,
            },
        );
        assert!((zoomed.width() - 9.0).abs() < 1e-4);
        assert!(((zoomed.min + zoomed.max) * 0.5 - 5.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_out_stops_at_limits() {
        let zoomed = zoom_around(
            Range::new(0.0, 58.0),
            Range::new(0.0, MAX_TIME),
            Zoom {
                delta: -1.0,
                x: 0.0,
                width: 1000.0,
            },
        );
        assert_eq!(zoomed, Range::new(0.0, MAX_TIME));
    }
}
