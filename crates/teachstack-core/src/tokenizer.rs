use crate::error::{Result, TeachStackError};

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

pub const MARKER_NAME: &str = "n/";
pub const MARKER_ID: &str = "id/";
pub const MARKER_EMAIL: &str = "e/";
pub const MARKER_GRADE: &str = "gr/";
pub const MARKER_GROUP: &str = "g/";

// ---------------------------------------------------------------------------
// Tokenized
// ---------------------------------------------------------------------------

/// Result of splitting an argument string on recognized markers: the leading
/// unprefixed text plus, per marker, the values that followed it in input
/// order. Produced by [`tokenize`]; pure data, no further parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    preamble: String,
    values: Vec<(&'static str, String)>,
}

impl Tokenized {
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn has(&self, marker: &str) -> bool {
        self.values.iter().any(|(m, _)| *m == marker)
    }

    /// The value of a single-valued marker. When the marker was repeated the
    /// last occurrence wins; duplicate rejection is the parser's call via
    /// [`Tokenized::reject_duplicates`].
    pub fn value(&self, marker: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(m, _)| *m == marker)
            .map(|(_, v)| v.as_str())
    }

    /// All values attached to `marker`, in input order.
    pub fn all_values(&self, marker: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(m, _)| *m == marker)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Errors if any of the given markers appears more than once.
    pub fn reject_duplicates(&self, markers: &[&'static str]) -> Result<()> {
        for &marker in markers {
            if self.values.iter().filter(|(m, _)| *m == marker).count() > 1 {
                return Err(TeachStackError::DuplicateMarker(marker));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// tokenize
// ---------------------------------------------------------------------------

/// Splits `input` into a preamble and marker/value pairs.
///
/// A marker only counts at the start of the input or directly after
/// whitespace, so marker-like substrings inside free text (`e/` inside
/// `Jane/Doe`, `g/` inside an email local part) never cause a split. Each
/// value runs to the next recognized marker or end of input and is trimmed.
pub fn tokenize(input: &str, markers: &[&'static str]) -> Tokenized {
    let mut hits: Vec<(usize, &'static str)> = Vec::new();
    for &marker in markers {
        let mut from = 0;
        while let Some(offset) = input[from..].find(marker) {
            let at = from + offset;
            let word_start = at == 0 || input[..at].ends_with(char::is_whitespace);
            if word_start {
                hits.push((at, marker));
            }
            from = at + marker.len();
        }
    }
    hits.sort_by_key(|&(at, _)| at);

    let preamble_end = hits.first().map_or(input.len(), |&(at, _)| at);
    let preamble = input[..preamble_end].trim().to_string();

    let mut values = Vec::with_capacity(hits.len());
    for (i, &(at, marker)) in hits.iter().enumerate() {
        let value_start = at + marker.len();
        let value_end = hits.get(i + 1).map_or(input.len(), |&(next, _)| next);
        values.push((marker, input[value_start..value_end].trim().to_string()));
    }

    Tokenized { preamble, values }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[&str] = &[MARKER_NAME, MARKER_ID, MARKER_EMAIL, MARKER_GRADE, MARKER_GROUP];

    #[test]
    fn empty_input() {
        let toks = tokenize("", ALL);
        assert_eq!(toks.preamble(), "");
        assert!(!toks.has(MARKER_NAME));
    }

    #[test]
    fn preamble_only() {
        let toks = tokenize("  A0123456A  ", ALL);
        assert_eq!(toks.preamble(), "A0123456A");
    }

    #[test]
    fn single_marker() {
        let toks = tokenize("n/Alice Pauline", ALL);
        assert_eq!(toks.preamble(), "");
        assert_eq!(toks.value(MARKER_NAME), Some("Alice Pauline"));
    }

    #[test]
    fn full_add_line() {
        let toks = tokenize(
            "n/Alice id/A0123456A e/alice@example.com gr/A g/Group 1",
            ALL,
        );
        assert_eq!(toks.value(MARKER_NAME), Some("Alice"));
        assert_eq!(toks.value(MARKER_ID), Some("A0123456A"));
        assert_eq!(toks.value(MARKER_EMAIL), Some("alice@example.com"));
        assert_eq!(toks.value(MARKER_GRADE), Some("A"));
        assert_eq!(toks.all_values(MARKER_GROUP), vec!["Group 1"]);
    }

    #[test]
    fn repeated_marker_keeps_order() {
        let toks = tokenize("g/Group 2B id/A0123456A id/A0234567B", ALL);
        assert_eq!(toks.value(MARKER_GROUP), Some("Group 2B"));
        assert_eq!(toks.all_values(MARKER_ID), vec!["A0123456A", "A0234567B"]);
    }

    #[test]
    fn last_occurrence_wins_for_value() {
        let toks = tokenize("gr/A gr/B+", ALL);
        assert_eq!(toks.value(MARKER_GRADE), Some("B+"));
        assert_eq!(toks.all_values(MARKER_GRADE), vec!["A", "B+"]);
    }

    #[test]
    fn marker_inside_free_text_is_not_split() {
        // "e/" not preceded by whitespace stays part of the name value
        let toks = tokenize("n/Jane/Doe id/A0123456A", ALL);
        assert_eq!(toks.value(MARKER_NAME), Some("Jane/Doe"));
        assert!(!toks.has(MARKER_EMAIL));
    }

    #[test]
    fn group_value_may_contain_spaces() {
        let toks = tokenize("g/Group 2B id/A0123456A", ALL);
        assert_eq!(toks.value(MARKER_GROUP), Some("Group 2B"));
    }

    #[test]
    fn gr_is_not_mistaken_for_g() {
        let toks = tokenize("gr/A", ALL);
        assert_eq!(toks.value(MARKER_GRADE), Some("A"));
        assert!(!toks.has(MARKER_GROUP));
    }

    #[test]
    fn empty_value_between_markers() {
        let toks = tokenize("g/ id/A0123456A", ALL);
        assert_eq!(toks.all_values(MARKER_GROUP), vec![""]);
    }

    #[test]
    fn reject_duplicates_flags_repeats() {
        let toks = tokenize("n/Alice n/Bob", ALL);
        assert!(matches!(
            toks.reject_duplicates(&[MARKER_NAME]),
            Err(TeachStackError::DuplicateMarker(MARKER_NAME))
        ));
        assert!(toks.reject_duplicates(&[MARKER_ID]).is_ok());
    }

    // Re-emitting the recognized markers canonically and tokenizing again
    // yields the same mapping.
    #[test]
    fn tokenize_reemit_is_identity() {
        let inputs = [
            "n/Alice id/A0123456A e/alice@example.com gr/A g/Group 1 g/Group 2B",
            "g/Group 2B id/A0123456A id/A0234567B",
            "preamble text n/Bob Choo",
        ];
        for input in inputs {
            let first = tokenize(input, ALL);
            let mut reemitted = first.preamble().to_string();
            for (marker, value) in &first.values {
                if !reemitted.is_empty() {
                    reemitted.push(' ');
                }
                reemitted.push_str(marker);
                reemitted.push_str(value);
            }
            let second = tokenize(&reemitted, ALL);
            assert_eq!(first, second, "not idempotent for: {input}");
        }
    }
}
