use crate::errors::constants::MAX_SCORE;

/// Canonical comparison form: every whitespace character removed, then
/// case-folded.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Levenshtein distance between two char sequences.
///
/// Rows follow `candidate`, columns follow `reference`. The first row and
/// column hold the cost of building each prefix from nothing.
pub fn edit_distance(reference: &[char], candidate: &[char]) -> usize {
    let columns = reference.len() + 1;
    let mut matrix = vec![vec![0usize; columns]; candidate.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..columns {
        matrix[0][j] = j;
    }

    for i in 1..=candidate.len() {
        for j in 1..=reference.len() {
            matrix[i][j] = if candidate[i - 1] == reference[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                1 + matrix[i - 1][j - 1]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j])
            };
        }
    }

    matrix[candidate.len()][reference.len()]
}

/// Similarity of two already-normalized char sequences as a whole
/// percentage. Two empty sequences are a perfect match.
pub fn similarity_percent(reference: &[char], candidate: &[char]) -> u8 {
    let max_length = reference.len().max(candidate.len());
    if max_length == 0 {
        return MAX_SCORE;
    }

    let distance = edit_distance(reference, candidate);
    let ratio = (max_length - distance) as f64 / max_length as f64;
    (ratio * f64::from(MAX_SCORE)).round() as u8
}

/// Overall 0-100 similarity between a reference and a transcribed
/// candidate. Never fails, whatever the input.
#[tracing::instrument(level = "trace")]
pub fn overall_score(reference: &str, candidate: &str) -> u8 {
    let reference: Vec<char> = normalize(reference).chars().collect();
    let candidate: Vec<char> = normalize(candidate).chars().collect();
    similarity_percent(&reference, &candidate)
}
