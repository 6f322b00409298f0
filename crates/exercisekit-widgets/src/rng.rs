//! Randomness for shuffles and scatter.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use exercisekit_core::traits::RenderContext;

/// A generator seeded from the configured seed, or from entropy.
pub(crate) fn widget_rng(context: &RenderContext) -> StdRng {
    match context.shuffle_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Shuffle a copy of `items`.
pub(crate) fn shuffled<T: Clone>(items: &[T], rng: &mut StdRng) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Move the element at `from` to `to`, shifting the ones in between.
/// Out-of-range indices are ignored.
pub(crate) fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() || from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}
