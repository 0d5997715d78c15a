// SPDX-License-Identifier: MPL-2.0

/// A shell surface that has, or has not yet, put its first frame on screen.
pub(crate) trait Painted {
    fn painted(&self) -> bool;
}

/// true when every surface that exists has painted; absent ones don't count
pub(crate) fn all_painted<'a>(surfaces: impl IntoIterator<Item = Option<&'a dyn Painted>>) -> bool {
    surfaces.into_iter().flatten().all(|surface| surface.painted())
}

/// One-shot barrier in front of `desktop_ready`
#[derive(Debug, Default)]
pub(crate) struct ReadyLatch {
    fired: bool,
}

impl ReadyLatch {
    /// Returns true the first time it is called with `all_painted` set, and
    /// never again after that.
    pub(crate) fn update(&mut self, all_painted: bool) -> bool {
        if self.fired || !all_painted {
            return false;
        }
        self.fired = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fake(bool);

    impl Painted for Fake {
        fn painted(&self) -> bool {
            self.0
        }
    }

    fn check(latch: &mut ReadyLatch, panels: &[Fake]) -> bool {
        let surfaces = panels.iter().flat_map(|panel| [None, Some(panel as &dyn Painted)]);
        latch.update(all_painted(surfaces))
    }

    #[test]
    fn fires_once_after_the_last_panel_paints() {
        let mut latch = ReadyLatch::default();
        let mut panels = [Fake(false), Fake(false)];

        panels[0].0 = true;
        assert!(!check(&mut latch, &panels));
        assert!(!latch.fired);

        panels[1].0 = true;
        assert!(check(&mut latch, &panels));
        assert!(latch.fired);

        assert!(!check(&mut latch, &panels));
    }

    #[test]
    fn nothing_to_paint_counts_as_painted() {
        assert!(all_painted([None::<&dyn Painted>, None]));
        let mut latch = ReadyLatch::default();
        assert!(latch.update(all_painted(std::iter::empty::<Option<&dyn Painted>>())));
    }
}
