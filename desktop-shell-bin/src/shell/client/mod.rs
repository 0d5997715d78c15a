// SPDX-License-Identifier: MPL-2.0

pub(crate) mod handlers;
pub(crate) mod state;
