use std::fmt;

use super::error::ClassifierError;

/// The predicted class and the model's confidence score for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Position of the class in the model's output vector
    pub index: usize,
    /// Raw model score, not a calibrated probability
    pub confidence: f32,
}

impl fmt::Display for Prediction {
    /// Writes `Class {index} (Confidence: {confidence})` using the shortest
    /// representation that round-trips the `f32`, without rounding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class {} (Confidence: {})", self.index, self.confidence)
    }
}

/// Picks the highest-scoring class.
///
/// A later index only wins when its score is strictly greater, so ties go to the
/// lowest index.
///
/// # Errors
/// - `EmptyVectorError` if `output` has no entries
///
/// # Example
/// ```
/// use pca200::classify;
///
/// let prediction = classify(&[0.2, 0.9, 0.9, 0.1]).unwrap();
/// assert_eq!(prediction.index, 1);
/// ```
pub fn classify(output: &[f32]) -> Result<Prediction, ClassifierError> {
    let (&first, rest) = output.split_first().ok_or(ClassifierError::EmptyVectorError)?;

    let mut best = Prediction { index: 0, confidence: first };
    for (offset, &value) in rest.iter().enumerate() {
        if value > best.confidence {
            best = Prediction { index: offset + 1, confidence: value };
        }
    }

    Ok(best)
}

/// Returns up to `k` predictions ordered from highest to lowest score.
///
/// The head is always the [`classify`] winner. The rest follow by descending
/// score, ascending index on ties, with NaN scores last.
pub fn top_k(output: &[f32], k: usize) -> Result<Vec<Prediction>, ClassifierError> {
    let best = classify(output)?;

    let mut rest: Vec<Prediction> = output
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != best.index)
        .map(|(index, &confidence)| Prediction { index, confidence })
        .collect();
    rest.sort_by(|a, b| match (a.confidence.is_nan(), b.confidence.is_nan()) {
        (false, false) => b.confidence.total_cmp(&a.confidence),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    });

    let mut ranked = Vec::with_capacity(k.min(output.len()));
    ranked.push(best);
    ranked.extend(rest);
    ranked.truncate(k);

    Ok(ranked)
}

/// Formats a prediction for display, e.g. `Class 2 (Confidence: 0.7)`.
pub fn format_prediction(prediction: &Prediction) -> String {
    prediction.to_string()
}
