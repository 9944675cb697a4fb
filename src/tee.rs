//! Fan-out: one upstream read by several independently paced branches.
//!
//! Each branch has its own queue and its own stage thread. A branch pops
//! from its queue under that queue's lock alone. When the queue is empty it
//! takes the refill lock, checks its queue again (another branch may have
//! refilled it meanwhile), pulls one element from upstream and appends a
//! clone to every live branch queue. Locks are always taken refill first,
//! then a single queue.
//!
//! Memory grows with the gap between the fastest and slowest live branch.
//! A branch whose consumer drops its handle is detached and stops receiving
//! copies, so an abandoned branch does not pin memory.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::iter::{spawn_stage, Detached, IntoIter, Iter, Producer};

struct BranchQueue<T> {
    items: VecDeque<T>,
    detached: bool,
}

struct Shared<T> {
    /// The refill lock. `None` once upstream has closed.
    upstream: Mutex<Option<IntoIter<T>>>,
    branches: Vec<Mutex<BranchQueue<T>>>,
}

/// Stage bodies never panic while holding these locks except through a
/// panicking `Clone`, after which the queues are still structurally sound.
fn lock<Q>(mutex: &Mutex<Q>) -> MutexGuard<'_, Q> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone> Shared<T> {
    fn pop(&self, index: usize) -> Option<T> {
        lock(&self.branches[index]).items.pop_front()
    }

    fn refill(&self, index: usize) -> Option<T> {
        let mut upstream = lock(&self.upstream);
        if let Some(value) = self.pop(index) {
            return Some(value);
        }

        let source = upstream.as_mut()?;
        let Some(value) = source.next() else {
            *upstream = None;
            return None;
        };

        for (other, branch) in self.branches.iter().enumerate() {
            if other == index {
                continue;
            }
            let mut queue = lock(branch);
            if !queue.detached {
                queue.items.push_back(value.clone());
            }
        }
        Some(value)
    }

    fn detach(&self, index: usize) {
        let mut queue = lock(&self.branches[index]);
        queue.detached = true;
        queue.items.clear();
    }

    fn run_branch(&self, index: usize, out: &mut Producer<T>) -> Result<(), Detached> {
        loop {
            let Some(value) = self.pop(index).or_else(|| self.refill(index)) else {
                debug!(branch = index, "tee branch closed");
                return Ok(());
            };
            if let Err(detached) = out.push(value) {
                self.detach(index);
                debug!(branch = index, "tee branch detached");
                return Err(detached);
            }
        }
    }
}

impl<T: Clone + Send + 'static> Iter<T> {
    /// Split into `n` sequences that each yield every upstream element, in
    /// order, at their own pace.
    ///
    /// `tee(0)` returns no branches and drops upstream.
    pub fn tee(self, n: usize) -> Vec<Iter<T>> {
        if n == 0 {
            return Vec::new();
        }

        let config = self.shared_config();
        let shared = Arc::new(Shared {
            upstream: Mutex::new(Some(self.into_iter())),
            branches: (0..n)
                .map(|_| {
                    Mutex::new(BranchQueue {
                        items: VecDeque::new(),
                        detached: false,
                    })
                })
                .collect(),
        });

        (0..n)
            .map(|index| {
                let shared = Arc::clone(&shared);
                spawn_stage(Arc::clone(&config), "tee", move |out| {
                    shared.run_branch(index, out)
                })
            })
            .collect()
    }

    pub fn tee2(self) -> (Iter<T>, Iter<T>) {
        let mut branches = self.tee(2).into_iter();
        match (branches.next(), branches.next()) {
            (Some(first), Some(second)) => (first, second),
            _ => unreachable!("tee(2) always yields two branches"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{count, from_source, new};
    use rand::Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_tee2_lockstep() {
        let (mut first, mut second) = new(vec![5, 4, 3, 2, 1]).tee2();
        let mut seen = Vec::new();
        while let Some(a) = first.next() {
            assert_eq!(second.next(), Some(a));
            seen.push(a);
        }
        assert_eq!(second.next(), None);
        assert_eq!(seen, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_tee2_one_branch_first() {
        let (first, second) = new(vec![1, 2, 3, 4, 5, 6]).tee2();
        assert_eq!(first.list().into_vec(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(second.list().into_vec(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_tee_three_ways() {
        let branches = new(vec![3, 4, 5]).tee(3);
        assert_eq!(branches.len(), 3);
        for branch in branches {
            assert_eq!(branch.list().into_vec(), vec![3, 4, 5]);
        }
    }

    #[test]
    fn test_tee_degenerate_counts() {
        assert!(new(vec![1]).tee(0).is_empty());

        let mut single = new(vec![1, 2]).tee(1);
        assert_eq!(single.remove(0).list().into_vec(), vec![1, 2]);
    }

    #[test]
    fn test_tee_pulls_upstream_once_per_element() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulls);
        let source = (0..10).map(move |n| {
            counter.fetch_add(1, Ordering::SeqCst);
            n
        });

        let branches = from_source(source).tee(4);
        let handles: Vec<_> = branches
            .into_iter()
            .map(|branch| thread::spawn(move || branch.list().into_vec()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), (0..10).collect::<Vec<_>>());
        }
        assert_eq!(pulls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_tee_random_pacing() {
        let branches = count(0u32).slice(0, 200, 1).tee(3);
        let handles: Vec<_> = branches
            .into_iter()
            .map(|branch| {
                thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    let mut seen = Vec::new();
                    for value in branch {
                        if rng.gen_bool(0.05) {
                            thread::sleep(Duration::from_millis(rng.gen_range(0..3)));
                        }
                        seen.push(value);
                    }
                    seen
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), (0..200).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_dropped_branch_does_not_block_others() {
        let (first, second) = count(0u64).tee2();
        drop(second);
        let taken: Vec<u64> = first.into_iter().take(1000).collect();
        assert_eq!(taken, (0..1000).collect::<Vec<_>>());
    }
}
