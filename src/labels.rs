//! Label allocation.
//!
//! With an alphabet of `K` letters, the first `p` letters are reserved as
//! prefixes for two-letter labels and the remaining `K - p` letters are used
//! as single-letter labels. `p` is the smallest value that yields enough
//! labels, so most targets get a one-keystroke hint and no single-letter
//! label is ever the start of a longer one.
//!
//! Labels are emitted single letters first, then `prefix + letter` for each
//! prefix in alphabet order. Callers hand labels out in document order, so
//! earlier targets receive the shorter labels. Growing the count only
//! appends labels while the number of prefixes stays the same; crossing a
//! prefix boundary turns one more single letter into a prefix.

use crate::alphabet::AlphabetSpec;
use crate::types::Labeled;

/// Number of alphabet letters reserved as two-letter prefixes for `count` labels.
///
/// Smallest `p` in `[0, k]` with `(k - p) + p * k >= count`, or `k` when no
/// such `p` exists.
pub fn prefix_count(k: usize, count: usize) -> usize {
    (0..=k)
        .find(|&p| (k - p).saturating_add(p.saturating_mul(k)) >= count)
        .unwrap_or(k)
}

/// Largest number of distinct labels an alphabet of `k` letters can produce.
pub fn capacity(k: usize) -> usize {
    k.max(k.saturating_mul(k))
}

/// Produce up to `count` unique labels, shortest first.
///
/// Returns fewer than `count` labels only when `count` exceeds
/// [`capacity`]; an empty alphabet yields no labels at all.
pub fn allocate(alphabet: &AlphabetSpec, count: usize) -> Vec<String> {
    let letters = alphabet.letters();
    let k = letters.len();
    if k == 0 || count == 0 {
        return Vec::new();
    }

    let prefixes = &letters[..prefix_count(k, count)];
    let mut labels = Vec::with_capacity(count.min(capacity(k)));

    for &letter in letters {
        if labels.len() == count {
            return labels;
        }
        if !prefixes.contains(&letter) {
            labels.push(letter.to_string());
        }
    }

    for &prefix in prefixes {
        for &letter in letters {
            if labels.len() == count {
                return labels;
            }
            let mut label = String::with_capacity(prefix.len_utf8() + letter.len_utf8());
            label.push(prefix);
            label.push(letter);
            labels.push(label);
        }
    }

    labels
}

/// Attach labels to `items` in the order given.
///
/// Items beyond the alphabet's capacity get no label and are dropped, so
/// every returned entry is selectable.
pub fn assign_labels<T>(items: Vec<T>, alphabet: &AlphabetSpec) -> Vec<Labeled<T>> {
    let total = items.len();
    let labels = allocate(alphabet, total);
    if labels.len() < total {
        log::debug!(
            "[jumplink-labels] {} targets exceed label capacity, keeping the first {}",
            total,
            labels.len()
        );
    }
    labels
        .into_iter()
        .zip(items)
        .map(|(label, target)| Labeled { label, target })
        .collect()
}
