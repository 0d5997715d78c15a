// SPDX-License-Identifier: MPL-2.0

use std::{fmt, time::Duration};

use anyhow::anyhow;
use calloop::{
    timer::{TimeoutAction, Timer},
    LoopHandle, RegistrationToken,
};
use chrono::{DateTime, Local, TimeZone};
use tiny_skia::Color;

use super::PanelWidget;
use crate::{
    desktop::OutputId,
    render::{Canvas, Rect, TextRenderer},
    shell::shared_state::GlobalState,
};

pub(crate) const CLOCK_PERIOD: Duration = Duration::from_secs(60);
const TEXT_SIZE: f32 = 14.0;

pub(crate) fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format("%a %b %d, %I:%M %p").to_string()
}

/// registration of the periodic redraw; removed from the loop on drop
struct ClockTimer {
    handle: LoopHandle<'static, GlobalState>,
    token: RegistrationToken,
}

impl Drop for ClockTimer {
    fn drop(&mut self) {
        self.handle.remove(self.token);
    }
}

/// Wall clock at the right end of a panel
pub(crate) struct Clock {
    allocation: Rect,
    _timer: ClockTimer,
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock").field("allocation", &self.allocation).finish_non_exhaustive()
    }
}

impl Clock {
    /// Start ticking for the panel of `output`.
    pub(crate) fn new(
        handle: &LoopHandle<'static, GlobalState>,
        output: OutputId,
    ) -> anyhow::Result<Self> {
        let token = handle
            .insert_source(Timer::from_duration(CLOCK_PERIOD), move |deadline, _, state| {
                if let Some(panel) = state.desktop.panel_mut(output) {
                    panel.surface.schedule_redraw();
                }
                TimeoutAction::ToInstant(deadline + CLOCK_PERIOD)
            })
            .map_err(|err| anyhow!("failed to start the clock timer: {}", err.error))?;
        Ok(Self { allocation: Rect::default(), _timer: ClockTimer { handle: handle.clone(), token } })
    }

    pub(crate) fn set_allocation(&mut self, allocation: Rect) {
        self.allocation = allocation;
    }
}

impl PanelWidget for Clock {
    fn allocation(&self) -> Rect {
        self.allocation
    }

    fn draw(&self, canvas: &mut Canvas, text: &mut TextRenderer) {
        if self.allocation.width == 0 {
            return;
        }
        let label = format_clock(&Local::now());
        let x = (self.allocation.x + 4) as f64;
        let baseline = (self.allocation.y + 3 * (self.allocation.height / 4)) as f64;
        text.draw(canvas, &label, TEXT_SIZE, x + 1.0, baseline + 1.0, Color::BLACK);
        text.draw(canvas, &label, TEXT_SIZE, x, baseline, Color::WHITE);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn clock_format() {
        let time = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(format_clock(&time), "Tue Mar 05, 02:07 PM");
        let time = Utc.with_ymd_and_hms(2024, 12, 31, 0, 30, 0).unwrap();
        assert_eq!(format_clock(&time), "Tue Dec 31, 12:30 AM");
    }
}
