#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FramePhase {
    Begin,
    Update,
    Render,
    End,
}

impl FramePhase {
    /// Execution order within one tick.
    pub const ORDER: [FramePhase; 4] = [
        FramePhase::Begin,
        FramePhase::Update,
        FramePhase::Render,
        FramePhase::End,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FramePhase::Begin => "Begin",
            FramePhase::Update => "Update",
            FramePhase::Render => "Render",
            FramePhase::End => "End",
        }
    }
}
