//! Pointer handling for the draggable time marker.
//!
//! A [`ScrubberController`] is owned per ruler. It only touches the tracked
//! time while it holds the pointer in the shared [`PointerOwnership`]
//! registry, and it reports every change through [`ScrubResponse::changed`].

use iced::{keyboard, Point, Rectangle};

use super::format::snap_time_to_whole_fps;
use super::mapping::CoordinateMapper;
use super::style::ThumbStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub u64);

/// The single slot naming which control currently owns the pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerOwnership {
    hot: Option<ControlId>,
}

impl PointerOwnership {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<ControlId> {
        self.hot
    }

    pub fn is_owned_by(&self, id: ControlId) -> bool {
        self.hot == Some(id)
    }

    /// Replaces the owner with `new` only if it is `current`.
    ///
    /// Returns the previous owner on success and the actual owner on failure.
    pub fn compare_exchange(
        &mut self,
        current: Option<ControlId>,
        new: Option<ControlId>,
    ) -> Result<Option<ControlId>, Option<ControlId>> {
        if self.hot == current {
            self.hot = new;
            Ok(current)
        } else {
            Err(self.hot)
        }
    }

    /// Takes the pointer for `id` unless another control holds it.
    pub fn try_acquire(&mut self, id: ControlId) -> bool {
        self.is_owned_by(id) || self.compare_exchange(None, Some(id)).is_ok()
    }

    /// Gives the pointer back if `id` holds it.
    pub fn release(&mut self, id: ControlId) -> bool {
        self.compare_exchange(Some(id), None).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

/// Input delivered to the scrubber, positions in the ruler's coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down {
        position: Point,
        button: PointerButton,
        modifiers: keyboard::Modifiers,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: PointerButton,
    },
    Key {
        key: Key,
        modifiers: keyboard::Modifiers,
    },
}

/// An input that can be consumed by at most one control per dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub input: PointerInput,
    used: bool,
}

impl InputEvent {
    pub fn new(input: PointerInput) -> Self {
        Self { input, used: false }
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    pub fn mark_used(&mut self) {
        self.used = true;
    }
}

impl From<PointerInput> for InputEvent {
    fn from(input: PointerInput) -> Self {
        Self::new(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    None,
    Start,
    Dragging,
    End,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrubResponse {
    pub mode: DragMode,
    /// The tracked time was modified.
    pub changed: bool,
    pub consumed: bool,
}

impl ScrubResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn handled(mode: DragMode, changed: bool) -> Self {
        Self {
            mode,
            changed,
            consumed: true,
        }
    }
}

/// What the scrubber remembers while it owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub original_time: f32,
    /// Pointer x minus the marker's x when grabbed; 0 for pick-anywhere.
    pub pick_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScrubState {
    #[default]
    Idle,
    Armed(DragSession),
    Dragging(DragSession),
}

impl ScrubState {
    pub fn session(&self) -> Option<DragSession> {
        match self {
            ScrubState::Idle => None,
            ScrubState::Armed(session) | ScrubState::Dragging(session) => Some(*session),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrubberController {
    id: ControlId,
    state: ScrubState,
    pick_anywhere: bool,
    thumb: ThumbStyle,
}

impl ScrubberController {
    pub fn new(id: ControlId, thumb: ThumbStyle) -> Self {
        Self {
            id,
            state: ScrubState::Idle,
            pick_anywhere: false,
            thumb,
        }
    }

    pub fn pick_anywhere(mut self, pick_anywhere: bool) -> Self {
        self.pick_anywhere = pick_anywhere;
        self
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn state(&self) -> ScrubState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != ScrubState::Idle
    }

    /// Clickable thumb area for `time`, spanning the ruler's height.
    pub fn hit_rect(&self, time: f32, mapper: &CoordinateMapper) -> Rectangle {
        self.thumb.hit_rect(mapper.time_to_pixel(time), mapper.rect)
    }

    /// Runs one input through the drag state machine.
    ///
    /// `mapper.rect` is the ruler's rectangle in the same coordinates as the
    /// input positions.
    pub fn handle(
        &mut self,
        event: &mut InputEvent,
        time: &mut f32,
        frame_rate: f32,
        mapper: &CoordinateMapper,
        ownership: &mut PointerOwnership,
    ) -> ScrubResponse {
        if self.state != ScrubState::Idle && !ownership.is_owned_by(self.id) {
            log::debug!("scrubber {:?} lost the pointer, dropping its drag", self.id);
            self.state = ScrubState::Idle;
        }
        if event.is_used() {
            return ScrubResponse::ignored();
        }

        let response = match event.input {
            PointerInput::Down {
                position,
                button: PointerButton::Primary,
                ..
            } => self.pointer_down(position, time, frame_rate, mapper, ownership),
            PointerInput::Move { position } => self.pointer_move(position, time, frame_rate, mapper),
            PointerInput::Up {
                button: PointerButton::Primary,
                ..
            } => self.pointer_up(ownership),
            PointerInput::Key { key: Key::Escape, .. } => self.cancel(time, ownership),
            _ => ScrubResponse::ignored(),
        };

        if response.consumed {
            event.mark_used();
        }
        if response.mode != DragMode::None && response.mode != DragMode::Dragging {
            log::trace!("scrubber {:?}: {:?} at {}", self.id, response.mode, time);
        }
        response
    }

    fn pointer_down(
        &mut self,
        position: Point,
        time: &mut f32,
        frame_rate: f32,
        mapper: &CoordinateMapper,
        ownership: &mut PointerOwnership,
    ) -> ScrubResponse {
        if self.hit_rect(*time, mapper).contains(position) {
            if !ownership.try_acquire(self.id) {
                return ScrubResponse::ignored();
            }
            self.state = ScrubState::Armed(DragSession {
                original_time: *time,
                pick_offset: position.x - mapper.time_to_pixel(*time),
            });
            return ScrubResponse::handled(DragMode::Start, false);
        }

        if self.pick_anywhere && mapper.rect.contains(position) {
            if !ownership.try_acquire(self.id) {
                return ScrubResponse::ignored();
            }
            let picked = snap_time_to_whole_fps(mapper.pixel_to_time(position.x), frame_rate);
            let changed = picked != *time;
            self.state = ScrubState::Armed(DragSession {
                original_time: *time,
                pick_offset: 0.0,
            });
            *time = picked;
            return ScrubResponse::handled(DragMode::Start, changed);
        }

        ScrubResponse::ignored()
    }

    fn pointer_move(
        &mut self,
        position: Point,
        time: &mut f32,
        frame_rate: f32,
        mapper: &CoordinateMapper,
    ) -> ScrubResponse {
        let Some(session) = self.state.session() else {
            return ScrubResponse::ignored();
        };
        let dragged =
            snap_time_to_whole_fps(mapper.pixel_to_time(position.x - session.pick_offset), frame_rate);
        let changed = dragged != *time;
        *time = dragged;
        self.state = ScrubState::Dragging(session);
        ScrubResponse::handled(DragMode::Dragging, changed)
    }

    fn pointer_up(&mut self, ownership: &mut PointerOwnership) -> ScrubResponse {
        if self.state == ScrubState::Idle {
            return ScrubResponse::ignored();
        }
        ownership.release(self.id);
        self.state = ScrubState::Idle;
        ScrubResponse::handled(DragMode::End, false)
    }

    fn cancel(&mut self, time: &mut f32, ownership: &mut PointerOwnership) -> ScrubResponse {
        let Some(session) = self.state.session() else {
            return ScrubResponse::ignored();
        };
        let changed = *time != session.original_time;
        *time = session.original_time;
        ownership.release(self.id);
        self.state = ScrubState::Idle;
        ScrubResponse::handled(DragMode::Cancel, changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruler::mapping::Range;

    const FRAME_RATE: f32 = 30.0;

    fn mapper() -> CoordinateMapper {
        // 100 px per second.
        CoordinateMapper::new(
            Range::new(0.0, 10.0),
            Rectangle {
                x: 0.0,
                y: 0.0,
                width: 1000.0,
                height: 24.0,
            },
        )
    }

    fn down(x: f32) -> InputEvent {
        InputEvent::new(PointerInput::Down {
            position: Point::new(x, 10.0),
            button: PointerButton::Primary,
            modifiers: keyboard::Modifiers::default(),
        })
    }

    fn moved(x: f32) -> InputEvent {
        InputEvent::new(PointerInput::Move {
            position: Point::new(x, 10.0),
        })
    }

    fn up(x: f32) -> InputEvent {
        InputEvent::new(PointerInput::Up {
            position: Point::new(x, 10.0),
            button: PointerButton::Primary,
        })
    }

    fn escape() -> InputEvent {
        InputEvent::new(PointerInput::Key {
            key: Key::Escape,
            modifiers: keyboard::Modifiers::default(),
        })
    }

    fn scrubber(id: u64) -> ScrubberController {
        ScrubberController::new(ControlId(id), ThumbStyle::default())
    }

    #[test]
    fn grab_drag_release() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1);
        let mut time = 2.0;

        let response = scrub.handle(&mut down(203.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::Start);
        assert!(!response.changed);
        assert!(response.consumed);
        assert!(ownership.is_owned_by(ControlId(1)));

        // The 3px grab offset is kept: the marker lands at 300px.
        let response = scrub.handle(&mut moved(303.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::Dragging);
        assert!(response.changed);
        assert_eq!(time, 3.0);

        let response = scrub.handle(&mut up(303.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::End);
        assert_eq!(ownership.owner(), None);
        assert_eq!(scrub.state(), ScrubState::Idle);
    }

    #[test]
    fn drag_snaps_to_whole_frames() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1);
        let mut time = 2.0;

        scrub.handle(&mut down(200.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        scrub.handle(&mut moved(251.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);

        // 2.51s is 75.3 frames.
        assert_eq!(time, 75.0 / FRAME_RATE);
    }

    #[test]
    fn unchanged_value_raises_no_change_flag() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1);
        let mut time = 2.0;

        scrub.handle(&mut down(200.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        let response = scrub.handle(&mut moved(200.4), &mut time, FRAME_RATE, &mapper(), &mut ownership);

        assert_eq!(response.mode, DragMode::Dragging);
        assert!(!response.changed);
        assert_eq!(time, 2.0);
    }

    #[test]
    fn escape_restores_original_time() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1);
        let mut time = 2.0;

        scrub.handle(&mut down(200.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        scrub.handle(&mut moved(600.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(time, 6.0);

        let response = scrub.handle(&mut escape(), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::Cancel);
        assert!(response.changed);
        assert_eq!(time, 2.0);
        assert_eq!(ownership.owner(), None);
    }

    #[test]
    fn pick_anywhere_jumps_to_pointer() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1).pick_anywhere(true);
        let mut time = 2.0;

        let response = scrub.handle(&mut down(512.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::Start);
        assert!(response.changed);
        // 5.12s snaps to frame 154.
        assert_eq!(time, 154.0 / FRAME_RATE);

        // No grab offset: the marker follows the raw pointer.
        scrub.handle(&mut moved(700.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(time, 7.0);

        scrub.handle(&mut escape(), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(time, 2.0);
    }

    #[test]
    fn down_away_from_marker_is_ignored() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1);
        let mut time = 2.0;
        let mut event = down(700.0);

        let response = scrub.handle(&mut event, &mut time, FRAME_RATE, &mapper(), &mut ownership);

        assert_eq!(response, ScrubResponse::default());
        assert!(!event.is_used());
        assert_eq!(ownership.owner(), None);

        let response = scrub.handle(&mut moved(800.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::None);
        assert_eq!(time, 2.0);
    }

    #[test]
    fn second_control_cannot_steal_the_pointer() {
        let mut ownership = PointerOwnership::new();
        let mut first = scrubber(1);
        let mut second = scrubber(2).pick_anywhere(true);
        let mut first_time = 2.0;
        let mut second_time = 2.0;

        first.handle(&mut down(200.0), &mut first_time, FRAME_RATE, &mapper(), &mut ownership);
        first.handle(&mut moved(400.0), &mut first_time, FRAME_RATE, &mapper(), &mut ownership);

        let response = second.handle(&mut down(600.0), &mut second_time, FRAME_RATE, &mapper(), &mut ownership);

        assert_eq!(response.mode, DragMode::None);
        assert_eq!(second_time, 2.0);
        assert!(ownership.is_owned_by(ControlId(1)));
        assert_eq!(first_time, 4.0);
        assert!(first.is_active());
    }

    #[test]
    fn used_events_are_not_handled_twice() {
        let mut ownership = PointerOwnership::new();
        let mut first = scrubber(1);
        let mut second = scrubber(2);
        let mut time = 2.0;
        let mut event = down(200.0);

        first.handle(&mut event, &mut time, FRAME_RATE, &mapper(), &mut ownership);
        let response = second.handle(&mut event, &mut time, FRAME_RATE, &mapper(), &mut ownership);

        assert!(event.is_used());
        assert!(!response.consumed);
        assert!(!second.is_active());
    }

    #[test]
    fn losing_ownership_drops_the_session() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1);
        let mut time = 2.0;

        scrub.handle(&mut down(200.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert!(ownership.release(ControlId(1)));

        let response = scrub.handle(&mut moved(500.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::None);
        assert_eq!(time, 2.0);
        assert!(!scrub.is_active());
    }

    #[test]
    fn secondary_button_does_not_grab() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1).pick_anywhere(true);
        let mut time = 2.0;
        let mut event = InputEvent::new(PointerInput::Down {
            position: Point::new(200.0, 10.0),
            button: PointerButton::Secondary,
            modifiers: keyboard::Modifiers::default(),
        });

        let response = scrub.handle(&mut event, &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::None);
        assert_eq!(ownership.owner(), None);
    }

    #[test]
    fn other_button_release_keeps_dragging() {
        let mut ownership = PointerOwnership::new();
        let mut scrub = scrubber(1);
        let mut time = 2.0;

        scrub.handle(&mut down(200.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        scrub.handle(&mut moved(300.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        let mut release = InputEvent::new(PointerInput::Up {
            position: Point::new(300.0, 10.0),
            button: PointerButton::Secondary,
        });
        let response = scrub.handle(&mut release, &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::None);
        assert!(!release.is_used());
        assert!(scrub.is_active());
        assert!(ownership.is_owned_by(ControlId(1)));

        let response = scrub.handle(&mut up(300.0), &mut time, FRAME_RATE, &mapper(), &mut ownership);
        assert_eq!(response.mode, DragMode::End);
        assert_eq!(time, 3.0);
    }

    #[test]
    fn ownership_compare_exchange() {
        let mut ownership = PointerOwnership::new();
        assert_eq!(ownership.compare_exchange(None, Some(ControlId(3))), Ok(None));
        assert_eq!(
            ownership.compare_exchange(None, Some(ControlId(4))),
            Err(Some(ControlId(3)))
        );
        assert!(!ownership.release(ControlId(4)));
        assert!(ownership.try_acquire(ControlId(3)));
        assert!(ownership.release(ControlId(3)));
        assert_eq!(ownership.owner(), None);
    }
}
