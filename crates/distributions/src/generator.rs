//! The capability shared by every integer generator.

use crate::{CounterGenerator, FocusedZipfianGenerator, UniformGenerator, ZipfianGenerator};
use rand::Rng;

/// Trait for drawing integer keys from a distribution.
///
/// Implementors keep their own "last value" cache; there is no shared base
/// state. The RNG is passed on every draw so one seeded source can feed
/// every generator in a run.
pub trait IntegerGenerator {
    /// Draw the next value.
    fn next_rank<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i64;

    /// The most recent draw, or `None` before the first one.
    fn last_rank(&self) -> Option<i64>;

    /// Closed-form expected value of a draw.
    fn mean(&self) -> f64;
}

impl<G: IntegerGenerator> IntegerGenerator for &mut G {
    fn next_rank<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i64 {
        (**self).next_rank(rng)
    }

    fn last_rank(&self) -> Option<i64> {
        (**self).last_rank()
    }

    fn mean(&self) -> f64 {
        (**self).mean()
    }
}

/// A generator chosen at runtime, typically from configuration.
#[derive(Debug, Clone)]
pub enum KeyGenerator {
    Counter(CounterGenerator),
    Uniform(UniformGenerator),
    Zipfian(ZipfianGenerator),
    FocusedZipfian(FocusedZipfianGenerator),
}

impl KeyGenerator {
    /// Short name of the distribution, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            KeyGenerator::Counter(_) => "sequential",
            KeyGenerator::Uniform(_) => "uniform",
            KeyGenerator::Zipfian(_) => "zipfian",
            KeyGenerator::FocusedZipfian(_) => "focused_zipfian",
        }
    }
}

impl IntegerGenerator for KeyGenerator {
    fn next_rank<R: Rng + ?Sized>(&mut self, rng: &mut R) -> i64 {
        match self {
            KeyGenerator::Counter(g) => g.next_rank(rng),
            KeyGenerator::Uniform(g) => g.next_rank(rng),
            KeyGenerator::Zipfian(g) => g.next_rank(rng),
            KeyGenerator::FocusedZipfian(g) => g.next_rank(rng),
        }
    }

    fn last_rank(&self) -> Option<i64> {
        match self {
            KeyGenerator::Counter(g) => g.last_rank(),
            KeyGenerator::Uniform(g) => g.last_rank(),
            KeyGenerator::Zipfian(g) => g.last_rank(),
            KeyGenerator::FocusedZipfian(g) => g.last_rank(),
        }
    }

    fn mean(&self) -> f64 {
        match self {
            KeyGenerator::Counter(g) => g.mean(),
            KeyGenerator::Uniform(g) => g.mean(),
            KeyGenerator::Zipfian(g) => g.mean(),
            KeyGenerator::FocusedZipfian(g) => g.mean(),
        }
    }
}

impl From<CounterGenerator> for KeyGenerator {
    fn from(g: CounterGenerator) -> Self {
        KeyGenerator::Counter(g)
    }
}

impl From<UniformGenerator> for KeyGenerator {
    fn from(g: UniformGenerator) -> Self {
        KeyGenerator::Uniform(g)
    }
}

impl From<ZipfianGenerator> for KeyGenerator {
    fn from(g: ZipfianGenerator) -> Self {
        KeyGenerator::Zipfian(g)
    }
}

impl From<FocusedZipfianGenerator> for KeyGenerator {
    fn from(g: FocusedZipfianGenerator) -> Self {
        KeyGenerator::FocusedZipfian(g)
    }
}
