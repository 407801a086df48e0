/// Input events consumed by the orbit camera, independent of any windowing
/// backend. Pointer coordinates are in logical viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Positive values zoom in
    Scroll(f32),
    Button {
        button: PointerButton,
        action: ButtonAction,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Press,
    Release,
}
