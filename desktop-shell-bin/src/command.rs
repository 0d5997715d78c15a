// SPDX-License-Identifier: MPL-2.0

use std::ffi::OsString;

/// A launcher command line split into leading `KEY=VALUE` environment
/// overrides and the argument vector.
///
/// Only tokens before the first plain token count as overrides; once argv
/// has started every token belongs to it, `=` or not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LaunchCommand {
    pub(crate) overrides: Vec<(String, String)>,
    pub(crate) argv: Vec<String>,
}

impl LaunchCommand {
    pub(crate) fn parse(line: &str) -> Self {
        let mut command = Self::default();
        for token in line.split_whitespace() {
            match token.split_once('=') {
                Some((key, value)) if command.argv.is_empty() => {
                    command.overrides.push((key.to_string(), value.to_string()));
                },
                _ => command.argv.push(token.to_string()),
            }
        }
        command
    }

    /// something to exec
    pub(crate) fn is_valid(&self) -> bool {
        !self.argv.is_empty()
    }

    pub(crate) fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// `base` with the overrides applied: a variable of the same name is
    /// replaced where it stands, anything new goes at the end.
    pub(crate) fn environment(
        &self,
        base: impl IntoIterator<Item = (OsString, OsString)>,
    ) -> Vec<(OsString, OsString)> {
        let mut env: Vec<(OsString, OsString)> = base.into_iter().collect();
        for (key, value) in &self.overrides {
            match env.iter_mut().find(|(k, _)| k.as_os_str() == key.as_str()) {
                Some(existing) => existing.1 = value.into(),
                None => env.push((key.into(), value.into())),
            }
        }
        env
    }

    /// the command line this was parsed from, whitespace normalised
    pub(crate) fn command_line(&self) -> String {
        self.overrides
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .chain(self.argv.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    fn os_pair(k: &str, v: &str) -> (OsString, OsString) {
        (k.into(), v.into())
    }

    #[test]
    fn equals_after_the_program_is_an_argument() {
        let command = LaunchCommand::parse("FOO=bar myprog BAZ=qux");
        assert_eq!(command.overrides, [pair("FOO", "bar")]);
        assert_eq!(command.argv, ["myprog", "BAZ=qux"]);
        assert_eq!(command.program(), Some("myprog"));
    }

    #[test]
    fn overrides_replace_in_place_or_append() {
        let command = LaunchCommand::parse("PATH=/opt/bin  NEW=1\t/usr/bin/weston-terminal --fullscreen");
        let env = command.environment([os_pair("HOME", "/root"), os_pair("PATH", "/usr/bin")]);
        assert_eq!(
            env,
            [os_pair("HOME", "/root"), os_pair("PATH", "/opt/bin"), os_pair("NEW", "1")]
        );
        assert_eq!(command.argv, ["/usr/bin/weston-terminal", "--fullscreen"]);
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let command = LaunchCommand::parse("OPTS=a=b prog");
        assert_eq!(command.overrides, [pair("OPTS", "a=b")]);
    }

    #[test]
    fn reparse_is_idempotent() {
        for line in ["/usr/bin/weston-terminal", "A=1 B=2 prog -x y", "  X=y   run  "] {
            let once = LaunchCommand::parse(line);
            let twice = LaunchCommand::parse(&once.command_line());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn non_utf8_variables_pass_through() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![b'/', 0xff, b'x']);
        let command = LaunchCommand::parse("LANG=C prog");
        let env = command.environment([(OsString::from("ODD"), raw.clone())]);
        assert_eq!(env, [(OsString::from("ODD"), raw), os_pair("LANG", "C")]);
    }

    #[test]
    fn overrides_alone_are_not_runnable() {
        assert!(!LaunchCommand::parse("FOO=bar").is_valid());
        assert!(!LaunchCommand::parse("   ").is_valid());
        assert!(LaunchCommand::parse("true").is_valid());
    }
}
