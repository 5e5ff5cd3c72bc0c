//! Labelling for links found in a rendered preview.
//!
//! The host collects anchors and embeds with their pixel positions; ordering
//! is reading order (top, then left). In live-preview mode rendered links and
//! source links share one label sequence, rendered links first.

use crate::alphabet::AlphabetSpec;
use crate::labels::{allocate, assign_labels};
use crate::types::{Candidate, Labeled, LabeledCandidate, LabeledRenderedLink, RenderedLink};

fn sort_reading_order(links: &mut [RenderedLink]) {
    links.sort_by(|a, b| a.top.cmp(&b.top).then(a.left.cmp(&b.left)));
}

/// Sort rendered links into reading order and label them.
pub fn label_rendered_links(mut links: Vec<RenderedLink>, alphabet: &AlphabetSpec) -> Vec<LabeledRenderedLink> {
    sort_reading_order(&mut links);
    assign_labels(links, alphabet)
}

/// Label rendered and source links from one sequence.
///
/// `source` must already be sorted by position, as returned by
/// [`find_link_candidates`](super::find_link_candidates).
pub fn label_live_preview(
    mut rendered: Vec<RenderedLink>,
    source: Vec<Candidate>,
    alphabet: &AlphabetSpec,
) -> (Vec<LabeledRenderedLink>, Vec<LabeledCandidate>) {
    sort_reading_order(&mut rendered);
    let mut labels = allocate(alphabet, rendered.len() + source.len()).into_iter();

    let rendered = rendered
        .into_iter()
        .zip(labels.by_ref())
        .map(|(target, label)| Labeled { label, target })
        .collect();
    let source = source
        .into_iter()
        .zip(labels)
        .map(|(target, label)| Labeled { label, target })
        .collect();
    (rendered, source)
}
