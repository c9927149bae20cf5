//! Engine traits.

use crate::step::Step;
use std::iter::FusedIterator;

/// A resumable clustering computation.
///
/// Each call to [`Iterator::next`] performs exactly the work needed to
/// produce one [`Step`] and then suspends. After [`Step::Finished`] the
/// iterator yields `None` forever.
pub trait StepEngine: Iterator<Item = Step> + FusedIterator {
    /// Whether the terminal event has been emitted.
    fn is_finished(&self) -> bool;

    /// Pull at most `budget` events, handing each to `sink`.
    ///
    /// Returns the number of events pulled.
    fn pull<F>(&mut self, budget: usize, mut sink: F) -> usize
    where
        Self: Sized,
        F: FnMut(Step),
    {
        let mut pulled = 0;
        while pulled < budget {
            match self.next() {
                Some(step) => {
                    pulled += 1;
                    sink(step);
                }
                None => break,
            }
        }
        pulled
    }
}
