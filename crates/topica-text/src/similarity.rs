//! Cosine similarity over sparse term vectors.

use crate::vectorizer::TermVector;

/// Compute cosine similarity between two sparse vectors.
///
/// Returns 0.0 if either vector has zero magnitude. Weights are non-negative,
/// so the result lies in [0, 1]; rounding noise above 1.0 is clamped.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    let mag_a = a.norm();
    let mag_b = b.norm();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    (a.dot(b) / (mag_a * mag_b)).min(1.0)
}
