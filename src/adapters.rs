//! Unary stages: one upstream, one downstream, one thread in between.
//!
//! Each stage closes its downstream when its upstream closes or when its own
//! stop condition fires. Stages that stop early drop their upstream without
//! draining it.

use crate::iter::{spawn_stage, Iter};

impl<T: Send + 'static> Iter<T> {
    /// `f(element)` for every element, in order.
    pub fn map<U, F>(self, mut f: F) -> Iter<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        let config = self.shared_config();
        spawn_stage(config, "map", move |out| {
            for value in self {
                out.push(f(value))?;
            }
            Ok(())
        })
    }

    /// Keep elements for which `pred` holds.
    pub fn filter<P>(self, pred: P) -> Iter<T>
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        self.retain("filter", pred, true)
    }

    /// Keep elements for which `pred` does not hold.
    pub fn filter_false<P>(self, pred: P) -> Iter<T>
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        self.retain("filter_false", pred, false)
    }

    fn retain<P>(self, stage: &'static str, mut pred: P, keep: bool) -> Iter<T>
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        let config = self.shared_config();
        spawn_stage(config, stage, move |out| {
            for value in self {
                if pred(&value) == keep {
                    out.push(value)?;
                }
            }
            Ok(())
        })
    }

    /// Forward elements while `pred` holds. The first failing element is
    /// discarded and upstream is abandoned at that point.
    pub fn take_while<P>(self, mut pred: P) -> Iter<T>
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        let config = self.shared_config();
        spawn_stage(config, "take_while", move |out| {
            for value in self {
                if !pred(&value) {
                    break;
                }
                out.push(value)?;
            }
            Ok(())
        })
    }

    /// Discard leading elements while `pred` holds, then forward the rest
    /// without testing them again.
    pub fn drop_while<P>(self, mut pred: P) -> Iter<T>
    where
        P: FnMut(&T) -> bool + Send + 'static,
    {
        let config = self.shared_config();
        spawn_stage(config, "drop_while", move |out| {
            let mut upstream = self.into_iter();
            for value in upstream.by_ref() {
                if !pred(&value) {
                    out.push(value)?;
                    break;
                }
            }
            for value in upstream {
                out.push(value)?;
            }
            Ok(())
        })
    }

    /// Zero-based slice of the sequence.
    ///
    /// The element at `start` is always emitted. After it, elements are kept
    /// every `step` positions until index `stop` is reached; a `stop` of `0`
    /// never stops. `count(0).slice(3, 11, 3)` yields `3, 6, 9`.
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn slice(self, start: usize, stop: usize, step: usize) -> Iter<T> {
        assert!(step > 0, "step must be > 0");
        let stop = (stop > 0).then_some(stop);

        let config = self.shared_config();
        spawn_stage(config, "slice", move |out| {
            let mut upstream = self.into_iter();
            match upstream.nth(start) {
                Some(first) => out.push(first)?,
                None => return Ok(()),
            }

            let mut index = start + 1;
            while stop.map_or(true, |stop| index < stop) {
                let Some(value) = upstream.next() else {
                    break;
                };
                if (index - start) % step == 0 {
                    out.push(value)?;
                }
                index += 1;
            }
            Ok(())
        })
    }
}
