// SPDX-License-Identifier: MPL-2.0

//! Config for desktop-shell, read from `weston.ini`

mod color;
mod ini;
mod locate;
mod shell_config;

pub use color::*;
pub use ini::*;
pub use locate::*;
pub use shell_config::*;
