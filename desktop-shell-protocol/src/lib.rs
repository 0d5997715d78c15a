// SPDX-License-Identifier: MPL-2.0

//! Client bindings for the private `desktop_shell` protocol, plus the mapping
//! from its cursor enum to the cursors the shell knows how to show.

/// generated client side of `desktop-shell.xml`
#[allow(
    non_snake_case,
    non_upper_case_globals,
    non_camel_case_types,
    dead_code,
    unused_imports,
    missing_docs
)]
pub mod client {
    use wayland_client;
    use wayland_client::protocol::*;

    pub mod __interfaces {
        use wayland_client::{backend as wayland_backend, protocol::__interfaces::*};
        wayland_scanner::generate_interfaces!("protocols/desktop-shell.xml");
    }
    use self::__interfaces::*;

    wayland_scanner::generate_client_code!("protocols/desktop-shell.xml");
}

pub use client::desktop_shell::{self, Cursor, DesktopShell};

/// First protocol version that knows about `desktop_ready`.
pub const DESKTOP_READY_SINCE: u32 = 2;

/// Highest protocol version this client speaks.
pub const MAX_VERSION: u32 = 2;

/// Cursor shown on the grab surface while the compositor runs a grab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabCursor {
    /// hide the cursor
    Blank,
    /// busy
    Watch,
    /// moving a window
    Dragging,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// plain arrow
    #[default]
    LeftPtr,
}

impl From<Cursor> for GrabCursor {
    fn from(cursor: Cursor) -> Self {
        match cursor {
            Cursor::None => Self::Blank,
            Cursor::Busy => Self::Watch,
            Cursor::Move => Self::Dragging,
            Cursor::ResizeTop => Self::Top,
            Cursor::ResizeBottom => Self::Bottom,
            Cursor::ResizeLeft => Self::Left,
            Cursor::ResizeRight => Self::Right,
            Cursor::ResizeTopLeft => Self::TopLeft,
            Cursor::ResizeTopRight => Self::TopRight,
            Cursor::ResizeBottomLeft => Self::BottomLeft,
            Cursor::ResizeBottomRight => Self::BottomRight,
            _ => Self::LeftPtr,
        }
    }
}

impl From<u32> for GrabCursor {
    fn from(raw: u32) -> Self {
        Cursor::try_from(raw).map(Self::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_cursors_map_to_local_cursors() {
        assert_eq!(GrabCursor::from(0), GrabCursor::Blank);
        assert_eq!(GrabCursor::from(11), GrabCursor::Watch);
        assert_eq!(GrabCursor::from(7), GrabCursor::Dragging);
        assert_eq!(GrabCursor::from(1), GrabCursor::Top);
        assert_eq!(GrabCursor::from(2), GrabCursor::Bottom);
        assert_eq!(GrabCursor::from(4), GrabCursor::Left);
        assert_eq!(GrabCursor::from(8), GrabCursor::Right);
        assert_eq!(GrabCursor::from(5), GrabCursor::TopLeft);
        assert_eq!(GrabCursor::from(9), GrabCursor::TopRight);
        assert_eq!(GrabCursor::from(6), GrabCursor::BottomLeft);
        assert_eq!(GrabCursor::from(10), GrabCursor::BottomRight);
    }

    #[test]
    fn arrow_and_unknown_values_fall_back_to_pointer() {
        assert_eq!(GrabCursor::from(3), GrabCursor::LeftPtr);
        assert_eq!(GrabCursor::from(12), GrabCursor::LeftPtr);
        assert_eq!(GrabCursor::from(u32::MAX), GrabCursor::LeftPtr);
    }
}
