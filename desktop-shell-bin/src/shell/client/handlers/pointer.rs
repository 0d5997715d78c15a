// SPDX-License-Identifier: MPL-2.0

use desktop_shell_protocol::GrabCursor;
use sctk::{
    delegate_pointer,
    reexports::client::{protocol::wl_pointer, Connection, QueueHandle},
    seat::pointer::{CursorIcon, PointerEvent, PointerHandler},
};

use crate::shell::shared_state::GlobalState;

impl PointerHandler for GlobalState {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        pointer: &wl_pointer::WlPointer,
        events: &[PointerEvent],
    ) {
        self.pointer_frame_inner(pointer, events);
    }
}

/// Themed cursor for a grab cursor; `None` hides the pointer.
pub(crate) fn cursor_icon(cursor: GrabCursor) -> Option<CursorIcon> {
    Some(match cursor {
        GrabCursor::Blank => return None,
        GrabCursor::Watch => CursorIcon::Wait,
        GrabCursor::Dragging => CursorIcon::Grabbing,
        GrabCursor::Top => CursorIcon::NResize,
        GrabCursor::Bottom => CursorIcon::SResize,
        GrabCursor::Left => CursorIcon::WResize,
        GrabCursor::Right => CursorIcon::EResize,
        GrabCursor::TopLeft => CursorIcon::NwResize,
        GrabCursor::TopRight => CursorIcon::NeResize,
        GrabCursor::BottomLeft => CursorIcon::SwResize,
        GrabCursor::BottomRight => CursorIcon::SeResize,
        GrabCursor::LeftPtr => CursorIcon::Default,
    })
}

delegate_pointer!(GlobalState);
