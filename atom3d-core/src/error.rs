/// Errors raised by the checked geometry constructors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("invalid sphere resolution: {sectors} sectors x {stacks} stacks (need at least 3 x 2)")]
    InvalidResolution { sectors: u32, stacks: u32 },

    #[error("sphere resolution too large: {sectors} x {stacks} overflows u32 indices")]
    ResolutionTooLarge { sectors: u32, stacks: u32 },

    #[error("invalid orbit radius: {0}")]
    InvalidRadius(f32),

    #[error("invalid orbit segment count: {0} (need at least 3)")]
    InvalidSegments(u32),
}
