// Descriptor wallet library extending bitcoin & miniscript functionality
// by LNP/BP Association (https://lnp-bp.org)
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@lnp-bp.org>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the Apache-2.0 License
// along with this software.
// If not, see <https://opensource.org/licenses/Apache-2.0>.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use proptest::strategy::{NewTree, Strategy, ValueTree};
use proptest::test_runner::{Reason, TestRunner};

/// Strategy drawing values from the source strategy until one of them is
/// accepted by the predicate, giving up after a fixed number of draws.
///
/// Unlike [`Strategy::prop_filter`], which relies on the rejection limits of
/// the whole test runner, the number of attempts is bounded per value.
pub struct Retry<S, F> {
    source: S,
    whence: &'static str,
    max_attempts: u32,
    accept: Arc<F>,
}

impl<S: Clone, F> Clone for Retry<S, F> {
    fn clone(&self) -> Self {
        Retry {
            source: self.source.clone(),
            whence: self.whence,
            max_attempts: self.max_attempts,
            accept: Arc::clone(&self.accept),
        }
    }
}

impl<S: Debug, F> Debug for Retry<S, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("source", &self.source)
            .field("whence", &self.whence)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl<S, F> Retry<S, F>
where
    S: Strategy,
    F: Fn(&S::Value) -> bool,
{
    /// Constructs retrying strategy. `whence` describes the rejected values
    /// and is used in logs and in the failure reason. A zero `max_attempts`
    /// is treated as a single attempt.
    pub fn new(source: S, whence: &'static str, max_attempts: u32, accept: F) -> Self {
        Retry {
            source,
            whence,
            max_attempts: max_attempts.max(1),
            accept: Arc::new(accept),
        }
    }

    /// Maximal number of draws from the source strategy
    #[inline]
    pub fn max_attempts(&self) -> u32 { self.max_attempts }
}

impl<S, F> Strategy for Retry<S, F>
where
    S: Strategy,
    S::Value: Clone,
    F: Fn(&S::Value) -> bool,
{
    type Tree = RetryValueTree<S::Tree, F>;
    type Value = S::Value;

    fn new_tree(&self, runner: &mut TestRunner) -> NewTree<Self> {
        for attempt in 1..=self.max_attempts {
            let tree = self.source.new_tree(runner)?;
            let value = tree.current();
            if (self.accept)(&value) {
                return Ok(RetryValueTree {
                    source: tree,
                    accepted: value,
                    accept: Arc::clone(&self.accept),
                });
            }
            trace!("rejected value #{}: {}", attempt, self.whence);
        }
        debug!("giving up after {} attempts: {}", self.max_attempts, self.whence);
        Err(Reason::from(format!(
            "{} in all of {} attempts",
            self.whence, self.max_attempts
        )))
    }
}

/// Value tree of the [`Retry`] strategy.
///
/// Always exposes the last accepted value of the source tree: if shrinking
/// leads the source to a rejected value it can't complicate back from, the
/// step is reported as unsuccessful and the accepted value is kept.
pub struct RetryValueTree<T: ValueTree, F> {
    source: T,
    accepted: T::Value,
    accept: Arc<F>,
}

impl<T, F> RetryValueTree<T, F>
where
    T: ValueTree,
    T::Value: Clone,
    F: Fn(&T::Value) -> bool,
{
    // Simplification may step onto a rejected value; walking back with
    // `complicate` returns to an accepted one, if there is any.
    fn settle(&mut self) -> bool {
        loop {
            let value = self.source.current();
            if (self.accept)(&value) {
                self.accepted = value;
                return true;
            }
            if !self.source.complicate() {
                return false;
            }
        }
    }
}

impl<T, F> ValueTree for RetryValueTree<T, F>
where
    T: ValueTree,
    T::Value: Clone,
    F: Fn(&T::Value) -> bool,
{
    type Value = T::Value;

    fn current(&self) -> T::Value { self.accepted.clone() }

    fn simplify(&mut self) -> bool { self.source.simplify() && self.settle() }

    fn complicate(&mut self) -> bool { self.source.complicate() && self.settle() }
}

#[cfg(test)]
mod test {
    use proptest::collection::vec;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn accepts_only_matching_values() {
        let strategy = Retry::new(0u8..10, "odd number", 1000, |n: &u8| n % 2 == 0);
        let mut runner = TestRunner::deterministic();
        for _ in 0..200 {
            let value = strategy.new_tree(&mut runner).unwrap().current();
            assert_eq!(value % 2, 0);
        }
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let strategy = Retry::new(Just(1u8), "value is always rejected", 7, |_: &u8| false);
        let mut runner = TestRunner::deterministic();
        let err = strategy.new_tree(&mut runner).err().unwrap();
        assert_eq!(err.message(), "value is always rejected in all of 7 attempts");
    }

    #[test]
    fn zero_attempts_means_one() {
        let strategy = Retry::new(Just(1u8), "never", 0, |_: &u8| true);
        assert_eq!(strategy.max_attempts(), 1);
        let mut runner = TestRunner::deterministic();
        assert_eq!(strategy.new_tree(&mut runner).unwrap().current(), 1);
    }

    // Simplifies by decrementing and can never be complicated back.
    #[derive(Debug)]
    struct Countdown(u8);

    impl ValueTree for Countdown {
        type Value = u8;

        fn current(&self) -> u8 { self.0 }

        fn simplify(&mut self) -> bool {
            if self.0 == 0 {
                return false;
            }
            self.0 -= 1;
            true
        }

        fn complicate(&mut self) -> bool { false }
    }

    #[test]
    fn keeps_accepted_value_when_shrinking_gets_stuck() {
        let mut tree = RetryValueTree {
            source: Countdown(3),
            accepted: 3,
            accept: Arc::new(|n: &u8| n % 2 == 1),
        };
        assert!(!tree.simplify());
        assert_eq!(tree.current(), 3);
        assert!(tree.simplify());
        assert_eq!(tree.current(), 1);
        assert!(!tree.simplify());
        assert_eq!(tree.current(), 1);
        assert!(!tree.complicate());
        assert_eq!(tree.current(), 1);
    }

    #[test]
    fn shrinks_to_accepted_values() {
        let strategy = Retry::new(vec(any::<u8>(), 0..16), "empty vector", 1000, |v: &Vec<u8>| {
            !v.is_empty()
        });
        let mut runner = TestRunner::deterministic();
        for _ in 0..50 {
            let mut tree = strategy.new_tree(&mut runner).unwrap();
            while tree.simplify() {
                assert!(!tree.current().is_empty());
            }
            assert!(!tree.current().is_empty());
        }
    }
}
