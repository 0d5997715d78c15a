// SPDX-License-Identifier: MPL-2.0

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::warn;

use crate::{find_config_file, Argb, Section, WestonConfig, CONFIG_FILE};

pub static DEFAULT_BACKGROUND_IMAGE: &str = "/usr/share/weston/pattern.png";
pub const DEFAULT_BACKGROUND_COLOR: Argb = Argb(0xff002244);
pub const DEFAULT_PANEL_COLOR: Argb = Argb(0xaa000000);
pub static DEFAULT_LAUNCHER_ICON: &str = "/usr/share/weston/terminal.png";
pub static DEFAULT_LAUNCHER_PATH: &str = "/usr/bin/weston-terminal";

/// How the background image covers its output
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FillMode {
    /// stretch to the output, ignoring aspect ratio
    Scale,
    /// keep aspect ratio, crop what does not fit
    ScaleCrop,
    /// repeat at native size
    #[default]
    Tile,
}

impl Display for FillMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillMode::Scale => write!(f, "scale"),
            FillMode::ScaleCrop => write!(f, "scale-crop"),
            FillMode::Tile => write!(f, "tile"),
        }
    }
}

impl FromStr for FillMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scale" => Ok(Self::Scale),
            "scale-crop" => Ok(Self::ScaleCrop),
            "tile" => Ok(Self::Tile),
            _ => Err(anyhow::anyhow!("invalid background-type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundConfig {
    /// `None` paints the plain color
    pub image: Option<PathBuf>,
    pub fill: FillMode,
    pub color: Argb,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            image: Some(PathBuf::from(DEFAULT_BACKGROUND_IMAGE)),
            fill: FillMode::default(),
            color: DEFAULT_BACKGROUND_COLOR,
        }
    }
}

impl BackgroundConfig {
    fn from_section(section: &Section) -> Self {
        let defaults = Self::default();
        let image = match section.get_string("image") {
            Some("") => None,
            Some(image) => Some(PathBuf::from(image)),
            None => defaults.image,
        };
        let fill = match section.get_string("type").map(FillMode::from_str) {
            Some(Ok(fill)) => fill,
            Some(Err(err)) => {
                warn!("{}", err);
                defaults.fill
            },
            None => defaults.fill,
        };
        let color = Argb(section.get_uint("color", defaults.color.0));
        Self { image, fill, color }
    }
}

/// One `[launcher]` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub icon: PathBuf,
    /// command line, optionally prefixed by `KEY=VALUE` environment overrides
    pub path: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            icon: PathBuf::from(DEFAULT_LAUNCHER_ICON),
            path: DEFAULT_LAUNCHER_PATH.to_string(),
        }
    }
}

/// Staging area for the keys of a single `[launcher]` section. It is filled
/// from exactly one section and consumed by [`LauncherSection::finish`], so
/// nothing leaks from one section into the next.
#[derive(Debug, Default)]
struct LauncherSection<'a> {
    icon: Option<&'a str>,
    path: Option<&'a str>,
}

impl<'a> LauncherSection<'a> {
    fn read(section: &'a Section) -> Self {
        let mut staged = Self::default();
        for (key, value) in section.entries() {
            match key {
                "icon" => staged.icon = Some(value),
                "path" => staged.path = Some(value),
                _ => {},
            }
        }
        staged
    }

    fn finish(self) -> Option<LauncherConfig> {
        match (self.icon, self.path) {
            (Some(icon), Some(path)) if !path.trim().is_empty() => {
                Some(LauncherConfig { icon: PathBuf::from(icon), path: path.to_string() })
            },
            _ => {
                warn!("invalid launcher section");
                None
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub color: Argb,
    pub launchers: Vec<LauncherConfig>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { color: DEFAULT_PANEL_COLOR, launchers: vec![LauncherConfig::default()] }
    }
}

/// `[shell]` keys the desktop client cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// show the unlock dialog when the compositor locks the screen
    pub locking: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { locking: true }
    }
}

/// Everything the desktop client reads from weston.ini
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DesktopShellConfig {
    pub background: BackgroundConfig,
    pub panel: PanelConfig,
    pub shell: ShellConfig,
}

impl DesktopShellConfig {
    /// load weston.ini from the usual places
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = find_config_file(CONFIG_FILE) else {
            anyhow::bail!("config file \"{}\" not found", CONFIG_FILE);
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        WestonConfig::load(path).map(|config| Self::from_weston_config(&config))
    }

    pub fn from_weston_config(config: &WestonConfig) -> Self {
        let background = config
            .section("background")
            .map(BackgroundConfig::from_section)
            .unwrap_or_default();
        let color = config
            .section("panel")
            .map(|panel| Argb(panel.get_uint("color", DEFAULT_PANEL_COLOR.0)))
            .unwrap_or(DEFAULT_PANEL_COLOR);
        let mut launchers: Vec<_> = config
            .sections()
            .filter(|s| s.name == "launcher")
            .filter_map(|s| LauncherSection::read(s).finish())
            .collect();
        if launchers.is_empty() {
            launchers.push(LauncherConfig::default());
        }
        let shell = config
            .section("shell")
            .map(|shell| ShellConfig { locking: shell.get_bool("locking", true) })
            .unwrap_or_default();

        Self { background, panel: PanelConfig { color, launchers }, shell }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(text: &str) -> DesktopShellConfig {
        DesktopShellConfig::from_weston_config(&WestonConfig::parse(text).unwrap())
    }

    #[test]
    fn empty_file_uses_builtin_defaults() {
        let config = parse("");
        assert_eq!(config, DesktopShellConfig::default());
        assert_eq!(config.background.fill, FillMode::Tile);
        assert_eq!(config.background.color, Argb(0xff002244));
        assert_eq!(config.panel.color, Argb(0xaa000000));
        assert_eq!(config.panel.launchers, [LauncherConfig::default()]);
        assert!(config.shell.locking);
    }

    #[test]
    fn reads_every_section() {
        let config = parse(
            "[background]\nimage=/wall.jpg\ntype=scale\ncolor=0xff000000\n\
             [panel]\ncolor=0x80ffffff\n\
             [launcher]\nicon=/a.png\npath=/bin/a\n\
             [launcher]\nicon=/b.png\npath=FOO=1 /bin/b --x=y\n\
             [shell]\nlocking=false\n",
        );
        assert_eq!(config.background.image.as_deref(), Some(Path::new("/wall.jpg")));
        assert_eq!(config.background.fill, FillMode::Scale);
        assert_eq!(config.background.color, Argb(0xff000000));
        assert_eq!(config.panel.color, Argb(0x80ffffff));
        assert_eq!(config.panel.launchers.len(), 2);
        assert_eq!(config.panel.launchers[1].path, "FOO=1 /bin/b --x=y");
        assert!(!config.shell.locking);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = parse("[background]\ntype=stretch\ncolor=blue\nimage=\n");
        assert_eq!(config.background.fill, FillMode::Tile);
        assert_eq!(config.background.color, DEFAULT_BACKGROUND_COLOR);
        assert_eq!(config.background.image, None);
    }

    #[test]
    fn incomplete_launchers_are_skipped() {
        let config = parse(
            "[launcher]\nicon=/only-icon.png\n\
             [launcher]\npath=/only/path\n\
             [launcher]\nicon=/ok.png\npath=/bin/ok\n",
        );
        assert_eq!(config.panel.launchers, [LauncherConfig {
            icon: PathBuf::from("/ok.png"),
            path: "/bin/ok".into()
        }]);
    }

    #[test]
    fn keys_do_not_leak_between_launcher_sections() {
        let config = parse("[launcher]\nicon=/first.png\n[launcher]\npath=/bin/second\n");
        assert_eq!(config.panel.launchers, [LauncherConfig::default()]);
    }

    #[test]
    fn fill_mode_round_trips_through_display() {
        for mode in [FillMode::Scale, FillMode::ScaleCrop, FillMode::Tile] {
            assert_eq!(mode.to_string().parse::<FillMode>().unwrap(), mode);
        }
    }

    #[test]
    fn load_from_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[panel]\ncolor=0x11223344").unwrap();
        let config = DesktopShellConfig::load_from(file.path()).unwrap();
        assert_eq!(config.panel.color, Argb(0x11223344));
    }
}
