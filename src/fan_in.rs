//! Fan-in: several input sequences merged into one, round by round.
//!
//! A round pulls one element from every input in input order, so round
//! membership depends only on position, never on arrival time. Two
//! termination policies exist:
//!
//! - shortest (`multi_map`, `zip`): the round stops at the first closed input
//!   and the whole sequence closes. Elements already pulled from earlier
//!   inputs in that round are dropped.
//! - longest (`multi_map_longest`, `zip_longest`): a closed input contributes
//!   `None` and the sequence closes only once every input is closed.
//!
//! With no inputs at all, every fan-in sequence is empty.

use std::sync::Arc;

use crate::config::Config;
use crate::iter::{spawn_stage, Iter};
use crate::value::Value;

fn first_config<T>(inputs: &[Iter<T>]) -> Arc<Config> {
    inputs.first().map(Iter::shared_config).unwrap_or_default()
}

fn rounds_shortest<T, U, F>(inputs: Vec<Iter<T>>, stage: &'static str, mut f: F) -> Iter<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(Vec<T>) -> U + Send + 'static,
{
    let config = first_config(&inputs);
    let mut inputs = inputs;
    spawn_stage(config, stage, move |out| {
        if inputs.is_empty() {
            return Ok(());
        }
        loop {
            let mut round = Vec::with_capacity(inputs.len());
            for input in inputs.iter_mut() {
                match input.next() {
                    Some(value) => round.push(value),
                    None => return Ok(()),
                }
            }
            out.push(f(round))?;
        }
    })
}

fn rounds_longest<T, U, F>(inputs: Vec<Iter<T>>, stage: &'static str, mut f: F) -> Iter<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(Vec<Option<T>>) -> U + Send + 'static,
{
    let config = first_config(&inputs);
    let mut inputs: Vec<Option<Iter<T>>> = inputs.into_iter().map(Some).collect();
    spawn_stage(config, stage, move |out| loop {
        let mut round = Vec::with_capacity(inputs.len());
        let mut open = 0;
        for slot in inputs.iter_mut() {
            let value = slot.as_mut().and_then(|input| input.next());
            if value.is_some() {
                open += 1;
            } else {
                *slot = None;
            }
            round.push(value);
        }
        if open == 0 {
            return Ok(());
        }
        out.push(f(round))?;
    })
}

/// `f(a, b, ...)` over one element from each input per round; closes with
/// the first input to close.
pub fn multi_map<T, U, I, F>(iters: I, f: F) -> Iter<U>
where
    T: Send + 'static,
    U: Send + 'static,
    I: IntoIterator<Item = Iter<T>>,
    F: FnMut(Vec<T>) -> U + Send + 'static,
{
    rounds_shortest(iters.into_iter().collect(), "multi_map", f)
}

/// Like [`multi_map`], but runs until every input is closed, passing `None`
/// for inputs that already ended.
pub fn multi_map_longest<T, U, I, F>(iters: I, f: F) -> Iter<U>
where
    T: Send + 'static,
    U: Send + 'static,
    I: IntoIterator<Item = Iter<T>>,
    F: FnMut(Vec<Option<T>>) -> U + Send + 'static,
{
    rounds_longest(iters.into_iter().collect(), "multi_map_longest", f)
}

/// Group one element from each input per round; as long as the shortest.
pub fn zip<T, I>(iters: I) -> Iter<Vec<T>>
where
    T: Send + 'static,
    I: IntoIterator<Item = Iter<T>>,
{
    rounds_shortest(iters.into_iter().collect(), "zip", |round| round)
}

/// Group one element from each input per round; as long as the longest.
pub fn zip_longest<T, I>(iters: I) -> Iter<Vec<Option<T>>>
where
    T: Send + 'static,
    I: IntoIterator<Item = Iter<T>>,
{
    rounds_longest(iters.into_iter().collect(), "zip_longest", |round| round)
}

impl<T: Send + 'static> Iter<T> {
    /// Pair up with a sequence of another element type; as long as the
    /// shorter of the two.
    pub fn zip<U: Send + 'static>(self, other: Iter<U>) -> Iter<(T, U)> {
        let config = self.shared_config();
        spawn_stage(config, "zip", move |out| {
            let mut left = self;
            let mut right = other;
            loop {
                let Some(a) = left.next() else {
                    return Ok(());
                };
                let Some(b) = right.next() else {
                    return Ok(());
                };
                out.push((a, b))?;
            }
        })
    }
}

//==============================================================================
// Starmap
//==============================================================================

/// Elements that can be spread into an argument list.
pub trait Args {
    type Arg;

    fn into_args(self) -> Vec<Self::Arg>;
}

impl<A> Args for Vec<A> {
    type Arg = A;

    fn into_args(self) -> Vec<A> {
        self
    }
}

/// A group value spreads into its members; any other value is a single
/// argument.
impl Args for Value {
    type Arg = Value;

    fn into_args(self) -> Vec<Value> {
        self.into_group().unwrap_or_else(|single| vec![single])
    }
}

impl<T: Args + Send + 'static> Iter<T> {
    /// `f(args...)` where each element is spread into the argument list.
    pub fn starmap<U, F>(self, mut f: F) -> Iter<U>
    where
        U: Send + 'static,
        F: FnMut(Vec<T::Arg>) -> U + Send + 'static,
    {
        let config = self.shared_config();
        spawn_stage(config, "starmap", move |out| {
            for value in self {
                out.push(f(value.into_args()))?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{count, new, repeat_n};
    use proptest::prelude::*;

    #[test]
    fn test_multi_map_shortest() {
        let sums = multi_map(
            vec![
                new(vec![5.2, 1.6, 2.2]),
                new(vec![5.2, 1.0]),
                new(vec![0.0, 0.6, 0.0]),
            ],
            |round: Vec<f64>| round.iter().sum::<f64>(),
        )
        .list();
        let sums = sums.into_vec();
        assert_eq!(sums.len(), 2);
        assert!((sums[0] - 10.4).abs() < 1e-9);
        assert!((sums[1] - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_multi_map_longest_fills_gaps() {
        let sums = multi_map_longest(vec![new(vec![1, 2, 3]), new(vec![10])], |round| {
            round.into_iter().flatten().sum::<i32>()
        })
        .list();
        assert_eq!(sums.into_vec(), vec![11, 2, 3]);
    }

    #[test]
    fn test_multi_map_stops_mid_round() {
        let mut left = new(vec![1, 2, 3]);
        assert_eq!(left.next(), Some(1));
        let pairs = multi_map(vec![left, new(vec![20])], |round| round).list();
        assert_eq!(pairs.into_vec(), vec![vec![2, 20]]);
    }

    #[test]
    fn test_zip_heterogeneous_values() {
        let rounds = zip(vec![
            count(1i32).map(Value::from),
            new(vec![Value::from("a")]),
        ])
        .list()
        .into_vec();

        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0][0].get::<i32>().unwrap(), 1);
        assert_eq!(rounds[0][1].as_str().unwrap(), "a");
    }

    #[test]
    fn test_zip_longest_placeholders() {
        let rounds = zip_longest(vec![
            count(1i32).slice(0, 3, 1).map(Value::from),
            new(vec![Value::from("a")]),
        ])
        .list()
        .into_vec();

        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[0][1].as_ref().map(|v| v.as_str().unwrap()), Some("a"));
        assert!(rounds[1][1].is_none());
        assert_eq!(rounds[2][0].as_ref().map(|v| v.get::<i32>().unwrap()), Some(3));
        assert!(rounds[2][1].is_none());
    }

    #[test]
    fn test_zip_without_inputs_is_empty() {
        assert!(zip(Vec::<Iter<u8>>::new()).list().is_empty());
        assert!(zip_longest(Vec::<Iter<u8>>::new()).list().is_empty());
        assert!(multi_map(Vec::<Iter<u8>>::new(), |r| r.len()).list().is_empty());
    }

    #[test]
    fn test_typed_zip_pairs() {
        let pairs = new(vec!['a', 'b', 'c']).zip(count(0usize)).list();
        assert_eq!(pairs.into_vec(), vec![('a', 0), ('b', 1), ('c', 2)]);
    }

    #[test]
    fn test_starmap_after_zip() {
        let products = zip(vec![new(vec![1, 2, 3]), repeat_n(10, 3)])
            .starmap(|args: Vec<i32>| args.iter().product::<i32>())
            .list();
        assert_eq!(products.into_vec(), vec![10, 20, 30]);
    }

    #[test]
    fn test_starmap_single_values() {
        let mixed = new(vec![
            Value::group(vec![Value::from(2i32), Value::from(3i32)]),
            Value::from(7i32),
        ]);
        let products = mixed
            .starmap(|args| {
                args.iter()
                    .map(|arg| arg.get::<i32>().unwrap())
                    .product::<i32>()
            })
            .list();
        assert_eq!(products.into_vec(), vec![6, 7]);
    }

    proptest! {
        #[test]
        fn prop_zip_is_shortest(a in 0usize..30, b in 0usize..30) {
            let rounds = zip(vec![new(0..a), new(0..b)]).list();
            prop_assert_eq!(rounds.len(), a.min(b));
        }

        #[test]
        fn prop_zip_longest_is_longest(a: Vec<u8>, b: Vec<u8>) {
            let rounds = zip_longest(vec![new(a.clone()), new(b.clone())]).list().into_vec();
            prop_assert_eq!(rounds.len(), a.len().max(b.len()));
            for (index, round) in rounds.iter().enumerate() {
                prop_assert_eq!(round[0], a.get(index).copied());
                prop_assert_eq!(round[1], b.get(index).copied());
            }
        }
    }
}
