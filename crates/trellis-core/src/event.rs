use crate::geometry::{Pos, Size};

/// Pointer input delivered by the host, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down(Pos<i32>),
    Moved(Pos<i32>),
    Up(Pos<i32>),
}

impl PointerEvent {
    pub fn position(&self) -> Pos<i32> {
        match self {
            PointerEvent::Down(pos) | PointerEvent::Moved(pos) | PointerEvent::Up(pos) => *pos,
        }
    }
}

/// Window notifications the host forwards to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Resized(Size<u32>),
    Pointer(PointerEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleStatus {
    pub handled: bool,
    pub consumed: bool,
}

impl HandleStatus {
    pub const fn consumed() -> Self {
        Self {
            handled: true,
            consumed: true,
        }
    }

    pub const fn handled() -> Self {
        Self {
            handled: true,
            consumed: false,
        }
    }

    pub const fn ignored() -> Self {
        Self {
            handled: false,
            consumed: false,
        }
    }
}
