//! Source generators: sequences that do not read from another sequence, plus
//! the replaying and concatenating sources built on top of one.
//!
//! Every generator spawns its producer thread immediately and returns.

use std::sync::Arc;

use crate::config::Config;
use crate::iter::{spawn_stage, Iter};

/// Emit `values` in order, then close.
pub fn new<I>(values: I) -> Iter<I::Item>
where
    I: IntoIterator,
    I::Item: Send + 'static,
{
    Config::default().values(values)
}

/// Emit whatever `values` yields, pulling from it lazily on the stage thread.
/// Closes when the iterator is exhausted; never closes for an endless one.
pub fn from_source<I>(values: I) -> Iter<I::Item>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    from_source_with(Arc::new(Config::default()), values)
}

pub(crate) fn from_source_with<I>(config: Arc<Config>, values: I) -> Iter<I::Item>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    let values = values.into_iter();
    spawn_stage(config, "source", move |out| {
        for value in values {
            out.push(value)?;
        }
        Ok(())
    })
}

//==============================================================================
// Count / Repeat
//==============================================================================

/// Numeric types [`count`] can step through.
///
/// Integers wrap at their maximum instead of overflowing, so a count never
/// closes on its own: `count(254u8)` yields `254, 255, 0, 1, ...`.
pub trait Countable: Clone + Send + 'static {
    /// The value after `self`.
    fn step(&self) -> Self;
}

macro_rules! countable_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Countable for $ty {
                fn step(&self) -> Self {
                    self.wrapping_add(1)
                }
            }
        )*
    };
}

macro_rules! countable_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Countable for $ty {
                fn step(&self) -> Self {
                    self + 1.0
                }
            }
        )*
    };
}

countable_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
countable_float!(f32, f64);

/// `start, start + 1, start + 2, ...` forever.
///
/// Integer counts wrap around at the type's maximum; see [`Countable`].
pub fn count<T: Countable>(start: T) -> Iter<T> {
    count_with(Arc::new(Config::default()), start)
}

pub(crate) fn count_with<T: Countable>(config: Arc<Config>, start: T) -> Iter<T> {
    spawn_stage(config, "count", move |out| {
        let mut current = start;
        loop {
            let next = current.step();
            out.push(current)?;
            current = next;
        }
    })
}

/// `value` forever.
pub fn repeat<T>(value: T) -> Iter<T>
where
    T: Clone + Send + 'static,
{
    Config::default().repeat(value)
}

/// `value` exactly `n` times, then close.
pub fn repeat_n<T>(value: T, n: usize) -> Iter<T>
where
    T: Clone + Send + 'static,
{
    Config::default().repeat_n(value, n)
}

//==============================================================================
// Chain
//==============================================================================

/// Drain each input fully, in order, then close after the last one closes.
/// An endless input keeps every later input from ever being read.
pub fn chain<T, I>(iters: I) -> Iter<T>
where
    T: Send + 'static,
    I: IntoIterator<Item = Iter<T>>,
{
    let inputs: Vec<Iter<T>> = iters.into_iter().collect();
    let config = inputs
        .first()
        .map(Iter::shared_config)
        .unwrap_or_default();

    spawn_stage(config, "chain", move |out| {
        for input in inputs {
            for value in input {
                out.push(value)?;
            }
        }
        Ok(())
    })
}

impl<T: Send + 'static> Iter<T> {
    /// Everything from `self`, then everything from `other`.
    pub fn chain(self, other: Iter<T>) -> Iter<T> {
        chain([self, other])
    }
}

//==============================================================================
// Cycle
//==============================================================================

impl<T: Clone + Send + 'static> Iter<T> {
    /// Re-emit upstream while recording it, then replay the recording forever.
    ///
    /// Holds every upstream element in memory. An empty upstream yields an
    /// empty sequence.
    pub fn cycle(self) -> Iter<T> {
        let config = self.shared_config();
        spawn_stage(config, "cycle", move |out| {
            let mut seen = Vec::new();
            for value in self {
                seen.push(value.clone());
                out.push(value)?;
            }
            if seen.is_empty() {
                return Ok(());
            }
            loop {
                for value in &seen {
                    out.push(value.clone())?;
                }
            }
        })
    }
}
