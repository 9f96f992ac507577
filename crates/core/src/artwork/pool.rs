//! Contender pool assembly shared by repository implementations.
//!
//! A pool is built from two queries around a benchmark rating: up to
//! `pool_size` artworks rated above it (closest first), then a number of
//! artworks rated at or below it (closest first) chosen by [`lower_pool_size`].

use super::Artwork;

/// How many at-or-below artworks to fetch after `higher_found` above were found.
pub fn lower_pool_size(higher_found: usize, pool_size: usize) -> usize {
    // higher_found == 0 matters for pool_size 1, where pool_size / 2 is 0.
    if higher_found < pool_size / 2 || higher_found == 0 {
        pool_size.saturating_sub(higher_found)
    } else {
        pool_size / 2
    }
}

/// Merge both sides into one pool ordered by rating ascending and cap it at
/// `pool_size`. The cap drops the artworks furthest above the benchmark.
pub fn assemble_pool(
    lower_closest_first: Vec<Artwork>,
    higher_closest_first: Vec<Artwork>,
    pool_size: usize,
) -> Vec<Artwork> {
    let mut pool: Vec<Artwork> = lower_closest_first.into_iter().rev().collect();
    pool.extend(higher_closest_first);
    pool.truncate(pool_size);
    pool
}
