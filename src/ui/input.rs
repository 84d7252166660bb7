use minifb::{Key, MouseButton, MouseMode, Window};

/// Per-frame input snapshot consumed by `Camera::update`.
///
/// Kept free of window types so the camera can be driven from tests or a
/// scripted driver.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub move_forward: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Cursor movement since the previous frame, in pixels (+y is down).
    pub mouse_delta: (f32, f32),
    pub left_button: bool,
    pub right_button: bool,
}

/// Builds an [`InputState`] from a minifb window each frame.
///
/// minifb only reports absolute cursor positions, so deltas are taken against
/// the position seen on the previous poll.
#[derive(Debug, Default)]
pub struct InputTracker {
    last_mouse_pos: Option<(f32, f32)>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, window: &Window) -> InputState {
        let down = |a: Key, b: Key| window.is_key_down(a) || window.is_key_down(b);

        let left_button = window.get_mouse_down(MouseButton::Left);
        let right_button = window.get_mouse_down(MouseButton::Right);

        let position = window.get_mouse_pos(MouseMode::Pass);
        let mouse_delta = match (position, self.last_mouse_pos) {
            (Some((x, y)), Some((last_x, last_y))) if left_button || right_button => {
                (x - last_x, y - last_y)
            }
            _ => (0.0, 0.0),
        };
        self.last_mouse_pos = position;

        InputState {
            move_forward: down(Key::W, Key::Up),
            move_back: down(Key::S, Key::Down),
            move_left: down(Key::A, Key::Left),
            move_right: down(Key::D, Key::Right),
            mouse_delta,
            left_button,
            right_button,
        }
    }
}
