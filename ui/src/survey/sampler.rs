//! Draw the ordered image sample shown in one session.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle a copy of `catalog` and keep the first `size` entries. A short
/// catalog yields every entry once.
pub fn sample<T: Clone, R: Rng + ?Sized>(catalog: &[T], size: usize, rng: &mut R) -> Vec<T> {
    let mut drawn = catalog.to_vec();
    drawn.shuffle(rng);
    drawn.truncate(size);
    drawn
}

pub fn sample_random<T: Clone>(catalog: &[T], size: usize) -> Vec<T> {
    sample(catalog, size, &mut rand::thread_rng())
}
