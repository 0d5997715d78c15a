// SPDX-License-Identifier: MPL-2.0

use std::rc::Rc;

use desktop_shell_config::DesktopShellConfig;
use tiny_skia::Pixmap;
use tracing::{error, warn};

use crate::render::{fallback_icon, load_image};

/// Images decoded once at startup and shared by every output
#[derive(Debug, Default)]
pub(crate) struct Assets {
    pub(crate) background: Option<Rc<Pixmap>>,
    /// one per configured launcher, in order
    pub(crate) icons: Vec<Rc<Pixmap>>,
}

impl Assets {
    pub(crate) fn load(config: &DesktopShellConfig) -> Self {
        let background = config.background.image.as_deref().and_then(|path| {
            load_image(path)
                .map_err(|err| error!("{:#}, painting the background color instead", err))
                .ok()
                .map(Rc::new)
        });
        let icons = config
            .panel
            .launchers
            .iter()
            .map(|launcher| {
                let icon = load_image(&launcher.icon).unwrap_or_else(|err| {
                    warn!("{:#}", err);
                    fallback_icon()
                });
                Rc::new(icon)
            })
            .collect();
        Self { background, icons }
    }
}

#[cfg(test)]
mod tests {
    use desktop_shell_config::{BackgroundConfig, LauncherConfig};

    use super::*;

    #[test]
    fn missing_images_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let icon_path = dir.path().join("icon.png");
        image::RgbaImage::from_pixel(8, 6, image::Rgba([255, 0, 0, 128]))
            .save(&icon_path)
            .unwrap();

        let mut config = DesktopShellConfig::default();
        config.background =
            BackgroundConfig { image: Some(dir.path().join("missing.png")), ..Default::default() };
        config.panel.launchers = vec![
            LauncherConfig { icon: icon_path, path: "/bin/true".into() },
            LauncherConfig { icon: dir.path().join("missing.png"), path: "/bin/true".into() },
        ];

        let assets = Assets::load(&config);
        assert!(assets.background.is_none());
        assert_eq!(assets.icons.len(), 2);
        assert_eq!((assets.icons[0].width(), assets.icons[0].height()), (8, 6));
        // premultiplied on load
        assert_eq!(assets.icons[0].pixel(0, 0).unwrap().red(), 128);
        assert_eq!((assets.icons[1].width(), assets.icons[1].height()), (20, 20));
    }
}
