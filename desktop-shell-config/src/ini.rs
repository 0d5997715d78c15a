// SPDX-License-Identifier: MPL-2.0

use std::{fs, path::Path};

use anyhow::{bail, Context};
use tracing::warn;

/// One `[name]` block of a weston.ini file, entries kept in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), entries: Vec::new() }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// first value stored under `key`
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Unsigned integer in C notation (`0x` hex, leading `0` octal).
    /// Missing keys and unparsable values yield `default`.
    pub fn get_uint(&self, key: &str, default: u32) -> u32 {
        match self.get_string(key) {
            Some(value) => parse_c_uint(value).unwrap_or_else(|| {
                warn!("[{}] invalid unsigned integer for '{}': {}", self.name, key, value);
                default
            }),
            None => default,
        }
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.get_string(key) {
            Some(value) => parse_c_int(value).unwrap_or_else(|| {
                warn!("[{}] invalid integer for '{}': {}", self.name, key, value);
                default
            }),
            None => default,
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_string(key) {
            Some("true") => true,
            Some("false") => false,
            Some(value) => {
                warn!("[{}] invalid bool for '{}': {}", self.name, key, value);
                default
            },
            None => default,
        }
    }
}

/// Parsed weston.ini
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WestonConfig {
    sections: Vec<Section>,
}

impl WestonConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to open '{}'", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse '{}'", path.display()))
    }

    /// Parse ini text. A malformed section header or a line that is neither
    /// a comment nor `key=value` inside a section rejects the whole file.
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let mut sections: Vec<Section> = Vec::new();

        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                match header.split_once(']') {
                    Some((name, "")) => sections.push(Section::new(name)),
                    _ => bail!("malformed section header on line {}: {}", lineno + 1, line),
                }
                continue;
            }

            let Some(section) = sections.last_mut() else {
                bail!("malformed config line {} outside of a section: {}", lineno + 1, line);
            };
            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    section.push(key.trim(), value.trim());
                },
                _ => bail!("malformed config line {}: {}", lineno + 1, line),
            }
        }

        Ok(Self { sections })
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// first section called `name`
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

fn split_radix(value: &str) -> (&str, u32) {
    if let Some(hex) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        (hex, 16)
    } else if value.len() > 1 && value.starts_with('0') {
        (&value[1..], 8)
    } else {
        (value, 10)
    }
}

/// `strtoul(value, &end, 0)` that insists on consuming the whole string
pub fn parse_c_uint(value: &str) -> Option<u32> {
    let value = value.trim();
    let value = value.strip_prefix('+').unwrap_or(value);
    let (digits, radix) = split_radix(value);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

/// `strtol(value, &end, 0)` that insists on consuming the whole string
pub fn parse_c_int(value: &str) -> Option<i32> {
    let value = value.trim();
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let (digits, radix) = split_radix(unsigned);
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = "\
# sample
[background]
image=/tmp/wall.png
type=scale-crop
color=0xff112233

[launcher]
icon=/usr/share/icons/term.png
path=/usr/bin/weston-terminal

[launcher]
icon = /usr/share/icons/flower.png
path = /usr/bin/flower
";

    #[test]
    fn keeps_sections_and_entries_in_order() {
        let config = WestonConfig::parse(SAMPLE).unwrap();
        let names: Vec<_> = config.sections().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["background", "launcher", "launcher"]);

        let launchers: Vec<_> = config
            .sections()
            .filter(|s| s.name == "launcher")
            .filter_map(|s| s.get_string("path"))
            .collect();
        assert_eq!(launchers, ["/usr/bin/weston-terminal", "/usr/bin/flower"]);
    }

    #[test]
    fn typed_getters_follow_c_conventions() {
        let config = WestonConfig::parse(SAMPLE).unwrap();
        let background = config.section("background").unwrap();
        assert_eq!(background.get_uint("color", 0), 0xff112233);
        assert_eq!(background.get_string("type"), Some("scale-crop"));
        assert_eq!(background.get_uint("missing", 7), 7);

        let mut section = Section::new("shell");
        section.push("locking", "false");
        section.push("broken", "maybe");
        section.push("num", "-12");
        section.push("bad", "12px");
        assert!(!section.get_bool("locking", true));
        assert!(section.get_bool("broken", true));
        assert_eq!(section.get_int("num", 0), -12);
        assert_eq!(section.get_int("bad", 3), 3);
        assert_eq!(section.get_uint("bad", 5), 5);
    }

    #[test]
    fn parses_integer_radixes() {
        assert_eq!(parse_c_uint("0xaa000000"), Some(0xaa000000));
        assert_eq!(parse_c_uint("0XFF"), Some(255));
        assert_eq!(parse_c_uint("010"), Some(8));
        assert_eq!(parse_c_uint("0"), Some(0));
        assert_eq!(parse_c_uint("42"), Some(42));
        assert_eq!(parse_c_uint("0x"), None);
        assert_eq!(parse_c_uint("0x1ffffffff"), None);
        assert_eq!(parse_c_int("-0x10"), Some(-16));
        assert_eq!(parse_c_int("--1"), None);
    }

    #[test]
    fn rejects_malformed_files() {
        assert!(WestonConfig::parse("[panel\ncolor=1\n").is_err());
        assert!(WestonConfig::parse("[panel] trailing\n").is_err());
        assert!(WestonConfig::parse("color=1\n").is_err());
        assert!(WestonConfig::parse("[panel]\njust words\n").is_err());
        assert!(WestonConfig::parse("[panel]\n=value\n").is_err());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = WestonConfig::load(file.path()).unwrap();
        assert_eq!(config.sections().count(), 3);
        assert!(WestonConfig::load(Path::new("/nonexistent/weston.ini")).is_err());
    }
}
