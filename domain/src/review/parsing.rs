//! Score extraction from free-text peer reviews.

/// Score used when a critique carries no parsable `Score: N` line.
pub const DEFAULT_REVIEW_SCORE: u8 = 5;

/// Extract the first `Score: N` (case-insensitive) from a critique.
///
/// The value is clamped to 1..=10; anything unparsable yields
/// [`DEFAULT_REVIEW_SCORE`].
pub fn parse_review_score(critique: &str) -> u8 {
    let lower = critique.to_lowercase();
    let mut rest = lower.as_str();
    while let Some(pos) = rest.find("score") {
        let after = &rest[pos + "score".len()..];
        let after = after.trim_start();
        if let Some(value) = after.strip_prefix(':') {
            let digits: String = value
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(n) = digits.parse::<u32>() {
                return n.clamp(1, 10) as u8;
            }
        }
        rest = &rest[pos + "score".len()..];
    }
    DEFAULT_REVIEW_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_score_line() {
        assert_eq!(parse_review_score("Critique: fine\nScore: 7"), 7);
        assert_eq!(parse_review_score("SCORE:9/10"), 9);
        assert_eq!(parse_review_score("score : 3"), 3);
    }

    #[test]
    fn test_skips_mentions_without_value() {
        assert_eq!(parse_review_score("The score is low.\nScore: 2"), 2);
    }

    #[test]
    fn test_defaults_and_clamps() {
        assert_eq!(parse_review_score("no rating here"), DEFAULT_REVIEW_SCORE);
        assert_eq!(parse_review_score("Score: high"), DEFAULT_REVIEW_SCORE);
        assert_eq!(parse_review_score("Score: 0"), 1);
        assert_eq!(parse_review_score("Score: 99"), 10);
    }
}
