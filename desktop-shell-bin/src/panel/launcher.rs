// SPDX-License-Identifier: MPL-2.0

use std::{ffi::OsString, path::Path, rc::Rc};

use desktop_shell_config::LauncherConfig;
use sctk::seat::pointer::BTN_LEFT;
use tiny_skia::Pixmap;
use tracing::warn;

use super::PanelWidget;
use crate::{
    command::LaunchCommand,
    process,
    render::{highlight_mask, Canvas, Rect, TextRenderer},
};

/// Icon on the panel that starts a program when clicked
#[derive(Debug)]
pub(crate) struct Launcher {
    icon: Rc<Pixmap>,
    highlight: Pixmap,
    command: LaunchCommand,
    env: Vec<(OsString, OsString)>,
    name: String,
    allocation: Rect,
    focused: bool,
    pressed: bool,
}

impl Launcher {
    pub(crate) fn new(icon: Rc<Pixmap>, config: &LauncherConfig) -> Self {
        Self::with_environment(icon, config, std::env::vars_os())
    }

    pub(crate) fn with_environment(
        icon: Rc<Pixmap>,
        config: &LauncherConfig,
        base: impl IntoIterator<Item = (OsString, OsString)>,
    ) -> Self {
        let command = LaunchCommand::parse(&config.path);
        let env = command.environment(base);
        let name = command
            .program()
            .map(|program| {
                Path::new(program)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| program.to_string())
            })
            .unwrap_or_default();
        Self {
            highlight: highlight_mask(&icon),
            icon,
            command,
            env,
            name,
            allocation: Rect::default(),
            focused: false,
            pressed: false,
        }
    }

    pub(crate) fn size(&self) -> (u32, u32) {
        (self.icon.width(), self.icon.height())
    }

    pub(crate) fn set_allocation(&mut self, allocation: Rect) {
        self.allocation = allocation;
    }

    fn activate(&self) {
        if !self.command.is_valid() {
            warn!("nothing to launch in '{}'", self.command.command_line());
            return;
        }
        process::launch(&self.command, &self.env);
    }
}

impl PanelWidget for Launcher {
    fn allocation(&self) -> Rect {
        self.allocation
    }

    fn draw(&self, canvas: &mut Canvas, _text: &mut TextRenderer) {
        let (mut x, mut y) = (self.allocation.x as f64, self.allocation.y as f64);
        if self.pressed {
            x += 1.0;
            y += 1.0;
        }
        canvas.draw_image(&self.icon, x, y);
        if self.focused {
            canvas.draw_image(&self.highlight, x, y);
        }
    }

    fn enter(&mut self, _x: f64, _y: f64) {
        self.focused = true;
    }

    fn leave(&mut self) {
        self.focused = false;
        self.pressed = false;
    }

    fn button(&mut self, button: u32, pressed: bool) {
        if button != BTN_LEFT {
            return;
        }
        self.pressed = pressed;
        if !pressed && self.focused {
            self.activate();
        }
    }

    fn tooltip(&self) -> Option<&str> {
        Some(&self.name).filter(|name| !name.is_empty()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fallback_icon;

    fn launcher(path: &str) -> Launcher {
        let config = LauncherConfig { icon: "unused.png".into(), path: path.to_string() };
        Launcher::with_environment(
            Rc::new(fallback_icon()),
            &config,
            [("HOME".into(), "/home/u".into()), ("LANG".into(), "C".into())],
        )
    }

    #[test]
    fn tooltip_is_the_program_basename() {
        let launcher = launcher("LANG=de_DE.UTF-8 /usr/bin/weston-terminal --shell=/bin/bash");
        assert_eq!(launcher.tooltip(), Some("weston-terminal"));
        assert_eq!(launcher.command.argv, ["/usr/bin/weston-terminal", "--shell=/bin/bash"]);
        assert_eq!(
            launcher.env,
            [
                (OsString::from("HOME"), OsString::from("/home/u")),
                (OsString::from("LANG"), OsString::from("de_DE.UTF-8"))
            ]
        );
        assert_eq!(launcher.size(), (20, 20));
    }

    #[test]
    fn press_follows_focus() {
        let mut launcher = launcher("/nonexistent/desktop-shell-test-binary");
        launcher.enter(1.0, 1.0);
        launcher.button(BTN_LEFT, true);
        assert!(launcher.pressed);
        launcher.leave();
        assert!(!launcher.pressed);

        launcher.enter(1.0, 1.0);
        launcher.button(BTN_LEFT + 1, true);
        assert!(!launcher.pressed);
    }

    #[test]
    fn pressed_icon_shifts_by_one() {
        let mut launcher = launcher("/nonexistent/desktop-shell-test-binary");
        launcher.set_allocation(Rect::new(0, 0, 21, 21));
        let mut text = TextRenderer::new();

        let mut canvas = Canvas::new(24, 24, 1).unwrap();
        launcher.draw(&mut canvas, &mut text);
        assert_eq!(canvas.pixmap.pixel(0, 0).unwrap().alpha(), 255);

        launcher.enter(1.0, 1.0);
        launcher.button(BTN_LEFT, true);
        let mut canvas = Canvas::new(24, 24, 1).unwrap();
        launcher.draw(&mut canvas, &mut text);
        assert_eq!(canvas.pixmap.pixel(0, 0).unwrap().alpha(), 0);
        assert_eq!(canvas.pixmap.pixel(1, 1).unwrap().alpha(), 255);
    }

    #[test]
    fn release_while_hovered_launches_without_a_press_here() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("launched");
        let mut launcher = launcher(&format!("/bin/sh -c :>{}", marker.display()));

        launcher.enter(1.0, 1.0);
        launcher.button(BTN_LEFT, false);
        for _ in 0..100 {
            if marker.exists() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert!(marker.exists());
        assert!(!launcher.pressed);
    }

    #[test]
    fn release_after_leaving_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("launched");
        let mut launcher = launcher(&format!("/bin/sh -c :>{}", marker.display()));

        launcher.enter(1.0, 1.0);
        launcher.button(BTN_LEFT, true);
        launcher.leave();
        launcher.button(BTN_LEFT, false);
        std::thread::sleep(std::time::Duration::from_millis(200));
        assert!(!marker.exists());
    }
}
