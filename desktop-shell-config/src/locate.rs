// SPDX-License-Identifier: MPL-2.0

use std::path::{Path, PathBuf};

use tracing::info;
use xdg::BaseDirectories;

/// name of the shared compositor/shell config file
pub static CONFIG_FILE: &str = "weston.ini";

/// Places a config file called `name` is looked for, most important first:
/// the user config dir, `weston/` below every system config dir, then the
/// working directory.
pub fn config_candidates(
    config_home: Option<&Path>,
    config_dirs: &[PathBuf],
    cwd: &Path,
    name: &str,
) -> Vec<PathBuf> {
    config_home
        .map(|home| home.join(name))
        .into_iter()
        .chain(config_dirs.iter().map(|dir| dir.join("weston").join(name)))
        .chain(std::iter::once(cwd.join(name)))
        .collect()
}

/// find `name` using the XDG base directories of the current user
pub fn find_config_file(name: &str) -> Option<PathBuf> {
    let (config_home, config_dirs) = match BaseDirectories::new() {
        Ok(dirs) => (Some(dirs.get_config_home()), dirs.get_config_dirs()),
        Err(_) => (None, vec![PathBuf::from("/etc/xdg")]),
    };
    let cwd = PathBuf::from(".");

    let found = config_candidates(config_home.as_deref(), &config_dirs, &cwd, name)
        .into_iter()
        .find(|path| path.is_file());
    if let Some(path) = found.as_ref().filter(|path| path.starts_with(&cwd)) {
        info!("using config in current working directory: {}", path.display());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_config_wins_over_system_dirs() {
        let candidates = config_candidates(
            Some(Path::new("/home/me/.config")),
            &[PathBuf::from("/etc/xdg"), PathBuf::from("/opt/xdg")],
            Path::new("/work"),
            CONFIG_FILE,
        );
        assert_eq!(
            candidates,
            [
                PathBuf::from("/home/me/.config/weston.ini"),
                PathBuf::from("/etc/xdg/weston/weston.ini"),
                PathBuf::from("/opt/xdg/weston/weston.ini"),
                PathBuf::from("/work/weston.ini"),
            ]
        );
    }

    #[test]
    fn falls_back_to_working_directory() {
        let candidates = config_candidates(None, &[], Path::new("."), CONFIG_FILE);
        assert_eq!(candidates, [PathBuf::from("./weston.ini")]);
    }
}
