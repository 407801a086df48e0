/// Maps crossterm events onto app actions and camera input.
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use atom3d_core::{
    projection::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH},
    ButtonAction, InputEvent, PointerButton,
};

use crate::renderer::Viewport;

/// Scroll delta per wheel notch
const SCROLL_STEP: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    ResetCamera,
    TogglePause,
    ToggleDebug,
    Resize { columns: u16, rows: u16 },
    Camera(InputEvent),
}

pub fn map_event(event: &Event, viewport: &Viewport) -> Option<Action> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse, viewport).map(Action::Camera),
        Event::Resize(columns, rows) => Some(Action::Resize {
            columns: *columns,
            rows: *rows,
        }),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::ResetCamera),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('d') => Some(Action::ToggleDebug),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            Some(Action::Camera(InputEvent::Scroll(SCROLL_STEP)))
        }
        KeyCode::Char('-') => Some(Action::Camera(InputEvent::Scroll(-SCROLL_STEP))),
        _ => None,
    }
}

/// Translate a mouse event, with cell positions mapped onto the logical
/// 800x600 viewport.
pub fn map_mouse(mouse: &MouseEvent, viewport: &Viewport) -> Option<InputEvent> {
    let button_event = |button: MouseButton, action| InputEvent::Button {
        button: pointer_button(button),
        action,
    };

    match mouse.kind {
        MouseEventKind::Down(button) => Some(button_event(button, ButtonAction::Press)),
        MouseEventKind::Up(button) => Some(button_event(button, ButtonAction::Release)),
        MouseEventKind::Drag(_) | MouseEventKind::Moved => {
            let (x, y) =
                viewport.to_logical(mouse.column, mouse.row, VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
            Some(InputEvent::PointerMove { x, y })
        }
        MouseEventKind::ScrollUp => Some(InputEvent::Scroll(SCROLL_STEP)),
        MouseEventKind::ScrollDown => Some(InputEvent::Scroll(-SCROLL_STEP)),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Right => PointerButton::Right,
        MouseButton::Middle => PointerButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        left: 0,
        top: 1,
        width: 80,
        height: 30,
    };

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_scroll_direction() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::ScrollUp, 3, 3), &VIEWPORT),
            Some(Action::Camera(InputEvent::Scroll(1.0)))
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::ScrollDown, 3, 3), &VIEWPORT),
            Some(Action::Camera(InputEvent::Scroll(-1.0)))
        );
    }

    #[test]
    fn test_buttons() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), &VIEWPORT),
            Some(Action::Camera(InputEvent::Button {
                button: PointerButton::Left,
                action: ButtonAction::Press,
            }))
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::Up(MouseButton::Right), 0, 0), &VIEWPORT),
            Some(Action::Camera(InputEvent::Button {
                button: PointerButton::Right,
                action: ButtonAction::Release,
            }))
        );
    }

    #[test]
    fn test_drag_maps_to_logical_viewport() {
        let drag = mouse(MouseEventKind::Drag(MouseButton::Left), 40, 16);
        let action = map_event(&drag, &VIEWPORT);
        let Some(Action::Camera(InputEvent::PointerMove { x, y })) = action else {
            panic!("expected a pointer move, got {action:?}");
        };
        assert!((x - 405.0).abs() < 1e-3);
        assert!((y - 310.0).abs() < 1e-3);
    }

    #[test]
    fn test_keys() {
        let press = |code| map_event(&key(code, KeyModifiers::NONE), &VIEWPORT);
        assert_eq!(press(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(press(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(
            map_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), &VIEWPORT),
            Some(Action::Quit)
        );
        assert_eq!(press(KeyCode::Char('r')), Some(Action::ResetCamera));
        assert_eq!(
            press(KeyCode::Char('-')),
            Some(Action::Camera(InputEvent::Scroll(-1.0)))
        );
        assert_eq!(press(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            map_event(&Event::Resize(120, 40), &VIEWPORT),
            Some(Action::Resize { columns: 120, rows: 40 })
        );
    }
}
