use std::sync::LazyLock;

use regex::Regex;

static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9]").expect("non-alphanumeric pattern must compile")
});

/// Lower-cases `text` and replaces every character outside `[a-zA-Z0-9]`
/// with a single space.
///
/// The replacement is one-to-one: runs of punctuation become runs of spaces,
/// so character positions are preserved for ASCII input.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_ALPHANUMERIC.replace_all(&lowered, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_each_symbol_with_one_space() {
        assert_eq!(normalize("Good!! Movie_123"), "good   movie 123");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn non_ascii_letters_become_spaces() {
        assert_eq!(normalize("Café ☕"), "caf   ");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "",
            "Good!! Movie_123",
            "  TABS\tand\nnewlines ",
            "Ünïcödé ẞ İstanbul",
            "already clean 42",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input: {sample:?}");
        }
    }
}
