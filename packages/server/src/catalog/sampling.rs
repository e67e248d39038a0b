//! Uniform draws over a filtered id population.
//!
//! Callers collect the matching ids first, then draw here. Drawing is done
//! synchronously so the thread-local RNG never lives across an `.await`.

use rand::Rng;
use rand::seq::{SliceRandom, index};

/// Draw up to `amount` distinct elements uniformly, without replacement, in draw order.
pub fn sample<T: Copy, R: Rng + ?Sized>(rng: &mut R, population: &[T], amount: usize) -> Vec<T> {
    let amount = amount.min(population.len());
    index::sample(rng, population.len(), amount)
        .into_iter()
        .map(|i| population[i])
        .collect()
}

/// A uniform random permutation of `population`.
pub fn permute<T, R: Rng + ?Sized>(rng: &mut R, mut population: Vec<T>) -> Vec<T> {
    population.shuffle(rng);
    population
}

/// [`sample`] using the thread-local RNG.
pub fn draw<T: Copy>(population: &[T], amount: usize) -> Vec<T> {
    sample(&mut rand::rng(), population, amount)
}

/// [`permute`] using the thread-local RNG.
pub fn shuffled<T>(population: Vec<T>) -> Vec<T> {
    permute(&mut rand::rng(), population)
}
