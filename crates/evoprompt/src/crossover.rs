//! Segment-based single-point crossover

use crate::mutation::{split_sentences, SENTENCE_SEPARATOR};
use crate::prompt::PromptRecord;
use rand::Rng;

/// Recombine two parents into two offspring.
///
/// With probability `1 - crossover_rate`, or when either parent has fewer
/// than two sentence segments, both parents are returned as plain clones
/// with generation, scores and lineage preserved. Otherwise each parent is
/// cut at an independent random sentence boundary and the tails are swapped.
/// Both offspring are stamped `current_generation + 1` and share the same
/// lineage pair `[fingerprint(a), fingerprint(b)]`.
pub fn crossover<R: Rng + ?Sized>(
    parent_a: &PromptRecord,
    parent_b: &PromptRecord,
    crossover_rate: f64,
    current_generation: u32,
    rng: &mut R,
) -> (PromptRecord, PromptRecord) {
    if rng.gen::<f64>() > crossover_rate {
        return (parent_a.clone(), parent_b.clone());
    }

    let segments_a = split_sentences(parent_a.content());
    let segments_b = split_sentences(parent_b.content());

    if segments_a.len() < 2 || segments_b.len() < 2 {
        return (parent_a.clone(), parent_b.clone());
    }

    let cut_a = rng.gen_range(1..segments_a.len());
    let cut_b = rng.gen_range(1..segments_b.len());

    let content_a = [&segments_a[..cut_a], &segments_b[cut_b..]]
        .concat()
        .join(SENTENCE_SEPARATOR);
    let content_b = [&segments_b[..cut_b], &segments_a[cut_a..]]
        .concat()
        .join(SENTENCE_SEPARATOR);

    let lineage = vec![parent_a.fingerprint(), parent_b.fingerprint()];
    let offspring_a = PromptRecord::offspring(content_a, current_generation + 1, lineage.clone());
    let offspring_b = PromptRecord::offspring(content_b, current_generation + 1, lineage);

    (offspring_a, offspring_b)
}
