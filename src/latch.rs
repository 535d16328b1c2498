// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A counting latch: "wait until N things have finished".  Both
//! schedulers use it as their only completion signal.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

struct State {
    remaining: usize,
    poisoned: bool,
}

/// Returned by `wait` when a worker died before counting down.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Poisoned;

/// Blocks waiters until its count reaches zero.
pub struct Latch {
    state: Mutex<State>,
    zero: Condvar,
}

impl Latch {
    /// A latch that opens after `count` calls to `count_down`.
    pub fn new(count: usize) -> Self {
        Latch {
            state: Mutex::new(State {
                remaining: count,
                poisoned: false,
            }),
            zero: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raises the count; used before launching more work.
    pub fn add(&self, count: usize) {
        self.lock().remaining += count;
    }

    /// Records one completion.
    pub fn count_down(&self) {
        let mut state = self.lock();
        debug_assert!(state.remaining > 0, "latch counted below zero");
        state.remaining = state.remaining.saturating_sub(1);
        if state.remaining == 0 {
            self.zero.notify_all();
        }
    }

    /// Releases every waiter with an error.  The count can never reach
    /// zero once a worker has died holding work.
    pub fn poison(&self) {
        self.lock().poisoned = true;
        self.zero.notify_all();
    }

    /// Completions still outstanding.
    pub fn remaining(&self) -> usize {
        self.lock().remaining
    }

    /// Blocks until the count is zero or the latch is poisoned.
    pub fn wait(&self) -> Result<(), Poisoned> {
        let mut state = self.lock();
        while state.remaining > 0 && !state.poisoned {
            state = self
                .zero
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.poisoned {
            Err(Poisoned)
        } else {
            Ok(())
        }
    }

    /// A guard that poisons the latch if it is dropped during a panic.
    pub fn watch(&self) -> Watch {
        Watch { latch: self }
    }
}

/// Held by a worker for its lifetime; see `Latch::watch`.
pub struct Watch<'a> {
    latch: &'a Latch,
}

impl<'a> Drop for Watch<'a> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.latch.poison();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn zero_latch_is_open() {
        assert_eq!(Latch::new(0).wait(), Ok(()));
    }

    #[test]
    fn opens_after_every_count_down() {
        let latch = Latch::new(4);
        let done = AtomicUsize::new(0);
        crossbeam::scope(|spawner| {
            for _ in 0..4 {
                spawner.spawn(|_| {
                    thread::sleep(Duration::from_millis(5));
                    done.fetch_add(1, Ordering::SeqCst);
                    latch.count_down();
                });
            }
            assert_eq!(latch.wait(), Ok(()));
            assert_eq!(done.load(Ordering::SeqCst), 4);
        })
        .unwrap();
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn add_raises_the_count() {
        let latch = Latch::new(0);
        latch.add(2);
        assert_eq!(latch.remaining(), 2);
        latch.count_down();
        latch.count_down();
        assert_eq!(latch.wait(), Ok(()));
    }

    #[test]
    fn panicking_watcher_releases_waiters() {
        let latch = Latch::new(1);
        let result = crossbeam::scope(|spawner| {
            spawner.spawn(|_| {
                let _watch = latch.watch();
                panic!("worker fell over");
            });
            assert_eq!(latch.wait(), Err(Poisoned));
        });
        assert!(result.is_err());
    }
}
