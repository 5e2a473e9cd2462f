//! Sequential key generator.

use crate::generator::IntegerGenerator;
use rand::Rng;

/// Issues consecutive integers starting at `start`.
///
/// Ignores the RNG; it exists so sequential keys can be used wherever a
/// distribution is expected.
#[derive(Debug, Clone)]
pub struct CounterGenerator {
    start: i64,
    next: i64,
    last: Option<i64>,
}

impl CounterGenerator {
    pub fn new(start: i64) -> Self {
        Self {
            start,
            next: start,
            last: None,
        }
    }

    /// Skip `count` keys without issuing them.
    ///
    /// Used to resume a load after the first `count` keys were committed.
    pub fn skip(&mut self, count: u64) {
        self.next = self.next.wrapping_add(count as i64);
    }

    /// The key the next call will return.
    pub fn peek(&self) -> i64 {
        self.next
    }

    pub fn start(&self) -> i64 {
        self.start
    }
}

impl IntegerGenerator for CounterGenerator {
    fn next_rank<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> i64 {
        let value = self.next;
        self.next = self.next.wrapping_add(1);
        self.last = Some(value);
        value
    }

    fn last_rank(&self) -> Option<i64> {
        self.last
    }

    /// Midpoint of the keys issued so far, or `start` before the first.
    fn mean(&self) -> f64 {
        match self.last {
            Some(last) => (self.start as f64 + last as f64) / 2.0,
            None => self.start as f64,
        }
    }
}
