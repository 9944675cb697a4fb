//! Terminal operations: drain a sequence on the calling thread.
//!
//! Both block until the sequence closes, so neither returns for an endless
//! one. Bound it first with `slice`, `take_while` or a fan-in partner.

use crate::iter::Iter;
use crate::list::List;

impl<T> Iter<T> {
    /// Collect every remaining element, in order.
    pub fn list(self) -> List<T> {
        self.into_iter().collect()
    }

    /// Left fold: `acc = f(acc, element)` for each element, starting from
    /// `initial`.
    pub fn reduce<A, F>(self, mut f: F, initial: A) -> A
    where
        F: FnMut(A, T) -> A,
    {
        let mut acc = initial;
        for value in self {
            acc = f(acc, value);
        }
        acc
    }
}
