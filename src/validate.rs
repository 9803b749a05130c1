use itertools::Itertools;

/// Result of comparing a submission with the target
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Compare a submission with the target after normalizing both.
///
/// An empty submission is not an attempt and yields `None`.
pub fn check(target: &str, submitted: &str) -> Option<Outcome> {
    let entered = normalize(submitted);
    if entered.is_empty() {
        return None;
    }

    if entered == normalize(target) {
        Some(Outcome::Correct)
    } else {
        Some(Outcome::Incorrect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_normalize_collapses_and_trims() {
        assert_eq!(normalize("  a   b "), "a b");
        assert_eq!(normalize("a\t\tb\n\nc"), "a b c");
        assert_eq!(normalize("\r\n x \u{a0} y"), "x y");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(" Ab3 \n  x%Y  ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_check_exact_match() {
        assert_matches!(check("ab!c de#f", "ab!c de#f"), Some(Outcome::Correct));
    }

    #[test]
    fn test_check_ignores_whitespace_shape() {
        assert_matches!(check("ab!c de#f", " ab!c\n\nde#f  "), Some(Outcome::Correct));
    }

    #[test]
    fn test_check_is_case_sensitive() {
        assert_matches!(check("Abc", "abc"), Some(Outcome::Incorrect));
    }

    #[test]
    fn test_check_partial_is_incorrect() {
        assert_matches!(check("abc def", "abc"), Some(Outcome::Incorrect));
    }

    #[test]
    fn test_check_empty_is_not_an_attempt() {
        assert_eq!(check("abc", ""), None);
        assert_eq!(check("abc", " \n\t"), None);
    }
}
