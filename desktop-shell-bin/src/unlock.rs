// SPDX-License-Identifier: MPL-2.0

use tiny_skia::{Color, FillRule, GradientStop, Paint, PathBuilder, Point, RadialGradient, SpreadMode};

use crate::render::{Canvas, Circle, Rect};

pub(crate) const DIALOG_WIDTH: u32 = 260;
pub(crate) const DIALOG_HEIGHT: u32 = 230;

/// What to do with a prepare_lock_surface request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LockAction {
    /// tell the compositor to unlock right away
    Unlock,
    /// put up the unlock dialog
    ShowDialog,
}

pub(crate) fn lock_action(locking: bool, has_unlocker: bool) -> LockAction {
    if locking && has_unlocker {
        LockAction::ShowDialog
    } else {
        LockAction::Unlock
    }
}

/// The modal dialog shown while the session is locked
#[derive(Debug)]
pub(crate) struct UnlockDialog<S> {
    pub(crate) surface: S,
    pub(crate) button_focused: bool,
    closing: bool,
    button: Circle,
}

impl<S> UnlockDialog<S> {
    /// Track the pointer; returns whether the hover state changed.
    pub(crate) fn pointer_at(&mut self, x: f64, y: f64) -> bool {
        let focused = self.button.contains(x, y);
        std::mem::replace(&mut self.button_focused, focused) != focused
    }

    pub(crate) fn pointer_left(&mut self) -> bool {
        std::mem::replace(&mut self.button_focused, false)
    }

    /// Paint the scrim and button for a `width` x `height` dialog.
    pub(crate) fn draw(&mut self, canvas: &mut Canvas, width: u32, height: u32) {
        self.button = draw_dialog(canvas, width, height, self.button_focused);
    }
}

/// Owner of the (at most one) unlock dialog
#[derive(Debug)]
pub(crate) struct Unlocker<S> {
    dialog: Option<UnlockDialog<S>>,
}

impl<S> Default for Unlocker<S> {
    fn default() -> Self {
        Self { dialog: None }
    }
}

impl<S> Unlocker<S> {
    /// Show the dialog unless it is already up. `create` builds its
    /// surface; returns whether a dialog was created.
    pub(crate) fn lock(&mut self, create: impl FnOnce() -> S) -> bool {
        if self.dialog.is_some() {
            return false;
        }
        self.dialog = Some(UnlockDialog {
            surface: create(),
            button_focused: false,
            closing: false,
            button: Circle::default(),
        });
        true
    }

    pub(crate) fn dialog(&self) -> Option<&UnlockDialog<S>> {
        self.dialog.as_ref()
    }

    pub(crate) fn dialog_mut(&mut self) -> Option<&mut UnlockDialog<S>> {
        self.dialog.as_mut()
    }

    /// Primary button released on the unlock button. Returns true exactly
    /// once per dialog: the caller then schedules [`Unlocker::finish`].
    pub(crate) fn button_released(&mut self) -> bool {
        match self.dialog.as_mut() {
            Some(dialog) if !dialog.closing => {
                dialog.closing = true;
                true
            },
            _ => false,
        }
    }

    /// Take the dialog down, handing it back for teardown.
    pub(crate) fn finish(&mut self) -> Option<UnlockDialog<S>> {
        self.dialog.take()
    }
}

/// Scrim plus a green radial button; returns the button bounds.
pub(crate) fn draw_dialog(canvas: &mut Canvas, width: u32, height: u32, focused: bool) -> Circle {
    canvas.fill_rect(
        Rect::new(0, 0, width as i32, height as i32),
        Color::from_rgba(0.0, 0.0, 0.0, 0.6).unwrap_or(Color::BLACK),
    );

    let f = if focused { 1.0 } else { 0.7 };
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let r = cx.min(cy) * 0.4;
    let button = Circle { cx, cy, r };

    let rgb = |r: f32, g: f32, b: f32| Color::from_rgba(r, g, b, 1.0).unwrap_or(Color::BLACK);
    let inner = rgb(0.0, 0.86 * f, 0.0);
    let ring = rgb(0.2 * f, f, 0.2 * f);
    // the gradient runs from 0.7r to r; inside 0.7r it holds the first stop
    let stops = vec![
        GradientStop::new(0.0, inner),
        GradientStop::new(0.7, inner),
        GradientStop::new(0.7 + 0.3 * 0.85, ring),
        GradientStop::new(1.0, inner),
    ];
    let center = Point::from_xy(cx as f32, cy as f32);
    let (Some(shader), Some(path)) = (
        RadialGradient::new(
            center,
            center,
            r as f32,
            stops,
            SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        ),
        PathBuilder::from_circle(cx as f32, cy as f32, r as f32),
    ) else {
        return button;
    };
    let paint = Paint { shader, anti_alias: true, ..Default::default() };
    let base = canvas.base();
    canvas.pixmap.fill_path(&path, &paint, FillRule::Winding, base, None);
    button
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_policy() {
        assert_eq!(lock_action(true, true), LockAction::ShowDialog);
        assert_eq!(lock_action(false, true), LockAction::Unlock);
        assert_eq!(lock_action(true, false), LockAction::Unlock);
    }

    #[test]
    fn second_lock_request_keeps_the_dialog() {
        let mut unlocker = Unlocker::default();
        assert!(unlocker.lock(|| 1));
        assert!(!unlocker.lock(|| 2));
        assert_eq!(unlocker.dialog().map(|d| d.surface), Some(1));
    }

    #[test]
    fn rapid_releases_schedule_one_unlock() {
        let mut unlocker = Unlocker::default();
        unlocker.lock(|| ());
        assert!(unlocker.button_released());
        assert!(!unlocker.button_released());
        assert!(unlocker.dialog().unwrap().closing);

        assert!(unlocker.finish().is_some());
        assert!(unlocker.dialog().is_none());
        assert!(!unlocker.button_released());
    }

    #[test]
    fn relocking_after_finish_starts_fresh() {
        let mut unlocker = Unlocker::default();
        unlocker.lock(|| ());
        unlocker.button_released();
        unlocker.finish();
        assert!(unlocker.lock(|| ()));
        assert!(unlocker.button_released());
    }

    #[test]
    fn button_is_centered_and_tracks_hover() {
        let mut unlocker = Unlocker::default();
        unlocker.lock(|| ());
        let dialog = unlocker.dialog_mut().unwrap();
        let mut canvas = Canvas::new(DIALOG_WIDTH, DIALOG_HEIGHT, 1).unwrap();
        dialog.draw(&mut canvas, DIALOG_WIDTH, DIALOG_HEIGHT);

        let button = dialog.button;
        assert_eq!((button.cx, button.cy), (130.0, 115.0));
        assert!((button.r - 46.0).abs() < 1e-9);

        assert!(dialog.pointer_at(130.0, 115.0));
        assert!(dialog.button_focused);
        assert!(!dialog.pointer_at(131.0, 115.0));
        assert!(dialog.pointer_at(5.0, 5.0));
        assert!(!dialog.pointer_left());
    }

    #[test]
    fn scrim_covers_the_dialog() {
        let mut canvas = Canvas::new(DIALOG_WIDTH, DIALOG_HEIGHT, 1).unwrap();
        draw_dialog(&mut canvas, DIALOG_WIDTH, DIALOG_HEIGHT, false);
        let corner = canvas.pixmap.pixel(0, 0).unwrap();
        assert_eq!(corner.alpha(), 153);
        let center = canvas.pixmap.pixel(130, 115).unwrap();
        assert_eq!(center.alpha(), 255);
        assert!(center.green() > 0);
    }
}
