/// Punctuation stripped before comparing free-text answers. Includes the
/// curly quote variants word processors insert.
const STRIPPED_PUNCTUATION: &[char] =
    &['.', ',', '!', '?', ';', ':', '\'', '"', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Canonicalize a free-text answer for comparison: trim, lowercase, strip
/// punctuation, collapse whitespace runs. Total and idempotent.
pub(crate) fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped: String =
        lowered.chars().filter(|ch| !STRIPPED_PUNCTUATION.contains(ch)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("  The Answer, please!  "), "the answer please");
        assert_eq!(normalize("\u{201C}Don\u{2019}t stop\u{201D}"), "dont stop");
    }

    #[test]
    fn collapses_internal_whitespace() {
        assert_eq!(normalize("a   b\t\tc\n d"), "a b c d");
    }

    #[test]
    fn handles_empty_and_punctuation_only_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  ?!.,  "), "");
    }

    #[test]
    fn is_idempotent() {
        let samples = ["  Hello,   WORLD!  ", "it is blue-ish", "", "a.b.c", "Số BẢY?"];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once);
        }
    }
}
