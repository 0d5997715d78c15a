// SPDX-License-Identifier: MPL-2.0

use std::{
    ffi::OsString,
    process::{Child, Command},
};

use anyhow::{bail, Context, Result};
use calloop::{
    signals::{Signal, Signals},
    LoopHandle,
};
use rustix::process::{wait, WaitOptions};
use tracing::{error, info};

use crate::{command::LaunchCommand, shell::shared_state::GlobalState};

/// Start `command` with exactly `env` as its environment. No shell is
/// involved and the child is not waited for; see [`insert_child_reaper`].
///
/// A program that cannot be executed is reported here as an error, no child
/// is left behind for it.
pub(crate) fn spawn(command: &LaunchCommand, env: &[(OsString, OsString)]) -> Result<Child> {
    let Some((program, args)) = command.argv.split_first() else {
        bail!("nothing to execute in '{}'", command.command_line());
    };
    Command::new(program)
        .args(args)
        .env_clear()
        .envs(env.iter().map(|(k, v)| (k, v)))
        .spawn()
        .with_context(|| format!("execl '{}' failed", program))
}

/// Collect every child that has exited so far.
pub(crate) fn reap_children() {
    loop {
        match wait(WaitOptions::NOHANG) {
            Ok(Some((pid, status))) => info!(?pid, ?status, "child exited"),
            Ok(None) => break,
            // ECHILD once nothing is left to wait for
            Err(_) => break,
        }
    }
}

pub(crate) fn insert_child_reaper(handle: &LoopHandle<'static, GlobalState>) -> Result<()> {
    let signals = Signals::new(&[Signal::SIGCHLD])?;
    handle
        .insert_source(signals, |_, _, _| reap_children())
        .map_err(|err| anyhow::anyhow!("failed to watch SIGCHLD: {}", err.error))?;
    Ok(())
}

/// Stop the shell on SIGINT/SIGTERM.
pub(crate) fn insert_shutdown_handler(handle: &LoopHandle<'static, GlobalState>) -> Result<()> {
    let signals = Signals::new(&[Signal::SIGINT, Signal::SIGTERM])?;
    handle
        .insert_source(signals, |event, _, state| {
            info!("received {:?}, shutting down", event.signal());
            state.exit = true;
        })
        .map_err(|err| anyhow::anyhow!("failed to watch termination signals: {}", err.error))?;
    Ok(())
}

/// Launch and forget; failures only get logged.
pub(crate) fn launch(command: &LaunchCommand, env: &[(OsString, OsString)]) {
    match spawn(command, env) {
        Ok(child) => info!(pid = child.id(), "launched '{}'", command.command_line()),
        Err(err) => error!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_with_only_the_given_environment() {
        let command = LaunchCommand::parse("MARKER=set /bin/sh -c exit");
        let env = command.environment(Vec::new());
        let mut child = spawn(&command, &env).unwrap();
        assert!(child.wait().unwrap().success());
    }

    #[test]
    fn missing_program_is_an_error() {
        let command = LaunchCommand::parse("/nonexistent/desktop-shell-test-binary");
        assert!(spawn(&command, &[]).is_err());
        assert!(spawn(&LaunchCommand::parse("A=b"), &[]).is_err());
    }
}
