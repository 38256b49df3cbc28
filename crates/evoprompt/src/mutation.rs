//! Text mutation operators
//!
//! Five pure transformations over prompt text. Each is total on non-empty
//! input: an operator that cannot structurally apply returns the input
//! unchanged rather than failing.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Separator used for sentence segmentation across mutation and crossover
pub(crate) const SENTENCE_SEPARATOR: &str = ". ";

const EMPHASIS_MARKERS: &[&str] = &["IMPORTANT:", "CRITICAL:", "NOTE:", "EMPHASIS:"];

const CONTEXT_PHRASES: &[&str] = &[
    "Consider the strategic implications.",
    "Think step-by-step.",
    "Analyze from multiple perspectives.",
    "Focus on core principles.",
];

const FILLER_WORDS: &[&str] = &["very", "quite", "really", "just", "simply"];

const SPECIFICITY_PHRASES: &[&str] = &[
    "Provide concrete examples.",
    "Use precise terminology.",
    "Reference established frameworks.",
    "Maintain logical consistency.",
];

/// Split content into sentence segments
pub(crate) fn split_sentences(content: &str) -> Vec<&str> {
    content.split(SENTENCE_SEPARATOR).collect()
}

/// Mutation operators available to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Insert an emphasis marker at a random word boundary
    AddEmphasis,
    /// Shuffle sentence order
    ReorderSentences,
    /// Append one fixed contextual phrase
    AddContext,
    /// Remove filler words
    Simplify,
    /// Append one fixed instruction phrase
    AddSpecificity,
}

impl MutationKind {
    /// All operators, in dispatch order
    pub const ALL: [MutationKind; 5] = [
        MutationKind::AddEmphasis,
        MutationKind::ReorderSentences,
        MutationKind::AddContext,
        MutationKind::Simplify,
        MutationKind::AddSpecificity,
    ];

    /// Pick one operator uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Apply this operator to `content`
    pub fn apply<R: Rng + ?Sized>(&self, content: &str, rng: &mut R) -> String {
        match self {
            MutationKind::AddEmphasis => add_emphasis(content, rng),
            MutationKind::ReorderSentences => reorder_sentences(content, rng),
            MutationKind::AddContext => append_phrase(content, CONTEXT_PHRASES, rng),
            MutationKind::Simplify => simplify(content),
            MutationKind::AddSpecificity => append_phrase(content, SPECIFICITY_PHRASES, rng),
        }
    }
}

fn add_emphasis<R: Rng + ?Sized>(content: &str, rng: &mut R) -> String {
    let mut words: Vec<&str> = content.split_whitespace().collect();
    if words.len() < 3 {
        return content.to_string();
    }

    let marker = EMPHASIS_MARKERS[rng.gen_range(0..EMPHASIS_MARKERS.len())];
    let insert_pos = rng.gen_range(0..words.len());
    words.insert(insert_pos, marker);

    words.join(" ")
}

fn reorder_sentences<R: Rng + ?Sized>(content: &str, rng: &mut R) -> String {
    let mut sentences = split_sentences(content);
    if sentences.len() < 2 {
        return content.to_string();
    }

    sentences.shuffle(rng);
    sentences.join(SENTENCE_SEPARATOR)
}

fn append_phrase<R: Rng + ?Sized>(content: &str, pool: &[&str], rng: &mut R) -> String {
    let phrase = pool.choose(rng).copied().unwrap_or_default();
    format!("{} {}", content, phrase)
}

fn simplify(content: &str) -> String {
    let kept: Vec<&str> = content
        .split_whitespace()
        .filter(|w| !FILLER_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();

    if kept.is_empty() {
        return content.to_string();
    }

    kept.join(" ")
}
