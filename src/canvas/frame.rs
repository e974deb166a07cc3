//! Frame Mode: whether drawing pushes immediately or is batched.

/// Push policy for the compositor.
///
/// ```text
///             begin_frame               begin_frame (no-op)
///  Immediate ─────────────▶ Buffered ◀──────┐
///      ▲                      │  └──────────┘
///      └──────────────────────┘
///        end_frame (one push)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameMode {
    /// Every mutation is followed by a push.
    #[default]
    Immediate,
    /// Pushes are suppressed until the frame ends.
    Buffered,
}

impl FrameMode {
    /// Enter Buffered mode.
    ///
    /// Returns `true` if this call changed the mode; nesting is not counted.
    pub fn begin(&mut self) -> bool {
        let entered = *self == Self::Immediate;
        *self = Self::Buffered;
        entered
    }

    /// Return to Immediate mode.
    ///
    /// Returns `true` if a frame was actually open, meaning exactly one push
    /// is now due. Ending while Immediate returns `false`.
    pub fn end(&mut self) -> bool {
        let was_buffered = *self == Self::Buffered;
        *self = Self::Immediate;
        was_buffered
    }

    /// Whether a mutation should push right away.
    #[inline]
    pub const fn should_push(self) -> bool {
        matches!(self, Self::Immediate)
    }

    /// Whether a frame is open.
    #[inline]
    pub const fn is_buffered(self) -> bool {
        matches!(self, Self::Buffered)
    }
}
