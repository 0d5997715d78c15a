// SPDX-License-Identifier: MPL-2.0
#![warn(missing_debug_implementations)]

//! Desktop client for weston's desktop-shell: wallpaper, panel and unlock
//! dialog for every output.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use desktop_shell_config::DesktopShellConfig;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod assets;
mod background;
mod command;
mod desktop;
mod panel;
mod process;
mod render;
mod shell;
mod surface;
mod unlock;

const USAGE: &str = "USAGE: desktop-shell [-c|--config <weston.ini>]";

#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Help,
    Run { config: Option<PathBuf> },
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Invocation> {
    let mut args = args.into_iter();
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-c" | "--config" => {
                let path = args.next().with_context(|| format!("{} expects a path", arg))?;
                config = Some(PathBuf::from(path));
            },
            _ => bail!("unknown argument '{}'\n{}", arg, USAGE),
        }
    }
    Ok(Invocation::Run { config })
}

/// The given file, or whatever the search path turns up. Unreadable or
/// missing configuration leaves the defaults in place.
fn load_config(path: Option<&Path>) -> DesktopShellConfig {
    let loaded = match path {
        Some(path) => DesktopShellConfig::load_from(path),
        None => DesktopShellConfig::load(),
    };
    loaded.unwrap_or_else(|err| {
        warn!("Falling back to the default configuration: {:#}", err);
        DesktopShellConfig::default()
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,desktop_shell=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(tracing_journald::layer().ok())
        .init();
    log_panics::init();
}

fn main() -> Result<()> {
    init_logging();

    let config = match parse_args(std::env::args().skip(1))? {
        Invocation::Help => {
            println!("{}", USAGE);
            return Ok(());
        },
        Invocation::Run { config } => load_config(config.as_deref()),
    };
    info!(launchers = config.panel.launchers.len(), "starting desktop-shell");

    shell::run(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Invocation> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn config_path_is_optional() {
        assert_eq!(args(&[]).unwrap(), Invocation::Run { config: None });
        assert_eq!(
            args(&["--config", "/tmp/weston.ini"]).unwrap(),
            Invocation::Run { config: Some("/tmp/weston.ini".into()) }
        );
        assert_eq!(
            args(&["-c", "a.ini", "-c", "b.ini"]).unwrap(),
            Invocation::Run { config: Some("b.ini".into()) }
        );
    }

    #[test]
    fn help_wins_and_junk_is_rejected() {
        assert_eq!(args(&["-c", "a.ini", "--help"]).unwrap(), Invocation::Help);
        assert!(args(&["--config"]).is_err());
        assert!(args(&["--verbose"]).is_err());
    }

    #[test]
    fn bad_config_path_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("weston.ini");
        assert_eq!(load_config(Some(missing.as_path())), DesktopShellConfig::default());

        std::fs::write(&missing, "color=0x11223344 with no section\n").unwrap();
        assert_eq!(load_config(Some(missing.as_path())), DesktopShellConfig::default());

        std::fs::write(&missing, "[panel]\ncolor=0x11223344\n").unwrap();
        assert_eq!(load_config(Some(missing.as_path())).panel.color.0, 0x11223344);
    }
}
