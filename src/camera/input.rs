use glam::Vec2;

/// Pointer travel (pixels) past which a press becomes a drag.
const CLICK_SLOP: f32 = 4.0;

/// Which mouse button a gesture started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Any other button.
    Other,
}

/// What a pointer movement should do to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragGesture {
    /// Orbit around the target.
    Orbit(Vec2),
    /// Pan the target.
    Pan(Vec2),
}

/// Tracks one pointer to tell clicks from drags.
///
/// A press followed by a release without travelling more than a few pixels
/// is a click. Anything else is a drag: left-drag orbits, right-drag or
/// shift-drag pans.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Vec2,
    pressed: Option<(PointerButton, Vec2)>,
    dragging: bool,
    shift: bool,
}

impl PointerState {
    /// New pointer with no button held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position in physical pixels.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Update the shift modifier.
    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// A button went down at the current position.
    pub fn press(&mut self, button: PointerButton) {
        self.pressed = Some((button, self.position));
        self.dragging = false;
    }

    /// The pointer moved to `position`. Returns the camera gesture, if a
    /// button is held and the pointer has left the click slop.
    pub fn moved(&mut self, position: Vec2) -> Option<DragGesture> {
        let delta = position - self.position;
        self.position = position;
        let (button, origin) = self.pressed?;
        if !self.dragging && (position - origin).length() > CLICK_SLOP {
            self.dragging = true;
        }
        if !self.dragging {
            return None;
        }
        match button {
            PointerButton::Left if self.shift => Some(DragGesture::Pan(delta)),
            PointerButton::Left => Some(DragGesture::Orbit(delta)),
            PointerButton::Right => Some(DragGesture::Pan(delta)),
            PointerButton::Other => None,
        }
    }

    /// A button went up. Returns the click position when the gesture was a
    /// left click rather than a drag.
    pub fn release(&mut self, button: PointerButton) -> Option<Vec2> {
        let (pressed, _) = self.pressed.take()?;
        let was_drag = std::mem::take(&mut self.dragging);
        (pressed == button && button == PointerButton::Left && !was_drag)
            .then_some(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_motion_is_a_click() {
        let mut pointer = PointerState::new();
        let _ = pointer.moved(Vec2::new(100.0, 100.0));
        pointer.press(PointerButton::Left);
        assert_eq!(pointer.moved(Vec2::new(102.0, 101.0)), None);
        assert_eq!(
            pointer.release(PointerButton::Left),
            Some(Vec2::new(102.0, 101.0))
        );
    }

    #[test]
    fn drag_orbits_and_is_not_a_click() {
        let mut pointer = PointerState::new();
        pointer.press(PointerButton::Left);
        let gesture = pointer.moved(Vec2::new(30.0, 0.0));
        assert_eq!(gesture, Some(DragGesture::Orbit(Vec2::new(30.0, 0.0))));
        assert_eq!(pointer.release(PointerButton::Left), None);
    }

    #[test]
    fn shift_or_right_button_pans() {
        let mut pointer = PointerState::new();
        pointer.set_shift(true);
        pointer.press(PointerButton::Left);
        assert!(matches!(
            pointer.moved(Vec2::new(10.0, 10.0)),
            Some(DragGesture::Pan(_))
        ));
        let _ = pointer.release(PointerButton::Left);

        pointer.set_shift(false);
        pointer.press(PointerButton::Right);
        assert!(matches!(
            pointer.moved(Vec2::new(30.0, 30.0)),
            Some(DragGesture::Pan(_))
        ));
        assert_eq!(pointer.release(PointerButton::Right), None);
    }

    #[test]
    fn hover_without_press_does_nothing() {
        let mut pointer = PointerState::new();
        assert_eq!(pointer.moved(Vec2::new(50.0, 50.0)), None);
        assert_eq!(pointer.release(PointerButton::Left), None);
    }
}
