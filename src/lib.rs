//! # chanseq
//!
//! Lazy sequences backed by channels, with the classic itertools family of
//! combinators.
//!
//! Every source and every combinator owns one producer thread that pushes
//! into a handoff channel. By default the channel holds nothing, so a
//! producer only runs ahead of its consumer by one element and a pull on the
//! last sequence of a pipeline propagates demand one hop at a time.
//!
//! ## Building blocks
//!
//! - **Sources**: [`new`], [`from_source`], [`count`], [`repeat`],
//!   [`repeat_n`], [`chain`], [`Iter::cycle`]
//! - **Stages**: [`Iter::map`], [`Iter::filter`], [`Iter::filter_false`],
//!   [`Iter::take_while`], [`Iter::drop_while`], [`Iter::slice`],
//!   [`Iter::starmap`]
//! - **Fan-in**: [`multi_map`], [`multi_map_longest`], [`zip`],
//!   [`zip_longest`], [`Iter::zip`]
//! - **Fan-out**: [`Iter::tee`], [`Iter::tee2`]
//! - **Terminal**: [`Iter::list`], [`Iter::reduce`]
//!
//! ## Example
//!
//! ```
//! let evens = chanseq::count(0u32)
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * 10)
//!     .slice(0, 4, 1)
//!     .list();
//! assert_eq!(evens.into_vec(), vec![0, 20, 40, 60]);
//! ```
//!
//! ## Ownership of the pipeline
//!
//! A sequence has one consumer; [`Iter`] is not `Clone`. Whoever holds it
//! either drains it or drops it. Dropping disconnects the channel, the
//! producer stops on its next push and drops its own upstream in turn, so an
//! abandoned pipeline shuts down hop by hop. A producer whose consumer is
//! alive but never pulls stays blocked; use [`Iter::with_cancel`] when a
//! pipeline must be stopped from another thread.
//!
//! [`Iter::list`] and [`Iter::reduce`] never return on an endless sequence.

mod adapters;
pub mod cancel;
pub mod config;
pub mod error;
pub mod fan_in;
pub mod iter;
pub mod list;
pub mod source;
mod tee;
mod terminal;
pub mod value;

pub use cancel::{cancel_pair, CancelToken, Canceller};
pub use config::Config;
pub use error::{Error, Result};
pub use fan_in::{multi_map, multi_map_longest, zip, zip_longest, Args};
pub use iter::{IntoIter, Iter, Pull, Pulls};
pub use list::List;
pub use source::{chain, count, from_source, new, repeat, repeat_n, Countable};
pub use value::Value;
