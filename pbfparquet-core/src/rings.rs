//! Join way node sequences into closed rings and merged lines.
//!
//! Sequences are joined on shared endpoint node ids, reversing a sequence
//! when needed. Ids are compared rather than coordinates so that two distinct
//! nodes at the same position never fuse.

use thiserror::Error;

/// A chain of sequences could not be closed into a ring.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{open_chains} member chain(s) do not close into a ring")]
pub struct UnclosedRing {
    /// Number of chains left open.
    pub open_chains: usize,
}

fn is_ring<T: PartialEq>(sequence: &[T]) -> bool {
    sequence.len() >= 4 && sequence.first() == sequence.last()
}

/// Append `next` to `chain`, dropping the shared endpoint.
fn extend_chain<T: Copy>(chain: &mut Vec<T>, next: &[T]) {
    chain.extend(next.iter().skip(1).copied());
}

/// Find a sequence whose start or end touches `endpoint` and return it
/// oriented so that it starts at `endpoint`.
fn take_touching<T: Copy + PartialEq>(pool: &mut Vec<Vec<T>>, endpoint: T) -> Option<Vec<T>> {
    let index = pool.iter().position(|candidate| {
        candidate.first() == Some(&endpoint) || candidate.last() == Some(&endpoint)
    })?;
    let mut found = pool.remove(index);
    if found.first() != Some(&endpoint) {
        found.reverse();
    }
    Some(found)
}

/// Stitch sequences into closed rings.
///
/// Every sequence must end up in a ring; otherwise the number of chains that
/// stayed open is reported. Sequences with fewer than two ids are ignored.
///
/// # Examples
/// ```
/// use pbfparquet_core::stitch_rings;
///
/// let rings = stitch_rings(vec![vec![1, 2, 3], vec![1, 4, 3]])?;
/// assert_eq!(rings, vec![vec![1, 2, 3, 4, 1]]);
/// # Ok::<(), pbfparquet_core::UnclosedRing>(())
/// ```
pub fn stitch_rings<T: Copy + PartialEq>(
    sequences: Vec<Vec<T>>,
) -> Result<Vec<Vec<T>>, UnclosedRing> {
    let mut pool: Vec<Vec<T>> = sequences
        .into_iter()
        .filter(|sequence| sequence.len() >= 2)
        .collect();
    // Popping from the back must visit sequences in source order.
    pool.reverse();
    let mut rings = Vec::new();
    let mut open_chains = 0;

    while let Some(mut chain) = pool.pop() {
        loop {
            if is_ring(&chain) {
                rings.push(chain);
                break;
            }
            let Some(end) = chain.last().copied() else {
                break;
            };
            match take_touching(&mut pool, end) {
                Some(next) => extend_chain(&mut chain, &next),
                None => {
                    open_chains += 1;
                    break;
                }
            }
        }
    }

    if open_chains == 0 {
        Ok(rings)
    } else {
        Err(UnclosedRing { open_chains })
    }
}

/// Merge sequences that share endpoints into the longest possible lines.
///
/// Unlike [`stitch_rings`] this never fails: sequences that connect to nothing
/// are returned unchanged.
///
/// # Examples
/// ```
/// use pbfparquet_core::merge_lines;
///
/// let merged = merge_lines(vec![vec![2, 3], vec![1, 2], vec![7, 8]]);
/// assert_eq!(merged, vec![vec![1, 2, 3], vec![7, 8]]);
/// ```
#[must_use]
pub fn merge_lines<T: Copy + PartialEq>(sequences: Vec<Vec<T>>) -> Vec<Vec<T>> {
    let mut pool: Vec<Vec<T>> = sequences
        .into_iter()
        .filter(|sequence| sequence.len() >= 2)
        .collect();
    pool.reverse();
    let mut lines = Vec::new();

    while let Some(mut chain) = pool.pop() {
        loop {
            if chain.len() > 2 && chain.first() == chain.last() {
                break;
            }
            if let Some(end) = chain.last().copied()
                && let Some(next) = take_touching(&mut pool, end)
            {
                extend_chain(&mut chain, &next);
                continue;
            }
            if let Some(start) = chain.first().copied()
                && let Some(mut previous) = take_touching(&mut pool, start)
            {
                previous.reverse();
                extend_chain(&mut previous, &chain);
                chain = previous;
                continue;
            }
            break;
        }
        lines.push(chain);
    }
    lines
}
