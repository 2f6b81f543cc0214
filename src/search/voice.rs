// Cleanup for dictated search queries.
//
// Speech recognizers end utterances with punctuation and users tend to say
// "hymn number twelve" rather than "12". We drop the punctuation and the
// leading filler words so the remainder can be matched against titles.
use crate::search::normalize::normalize;

const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', '،', '؟', '?', '!', '؛', ';', ':', '"', '\'', '«', '»', '“', '”',
];

/// Arabic punctuation that never appears inside hymn titles.
const INNER_PUNCTUATION: &[char] = &['،', '؟', '؛', '«', '»', '“', '”'];

/// Filler words, already in normalized form.
const FILLER_WORDS: &[&str] = &[
    "ترتيله", "ترنيمه", "رقم", "hymn", "number", "song",
];

pub fn clean_voice_input(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if INNER_PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect();

    let mut words: Vec<&str> = replaced
        .trim()
        .trim_matches(EDGE_PUNCTUATION)
        .split_whitespace()
        .collect();

    // Only strip fillers while something meaningful remains.
    while words.len() > 1 && FILLER_WORDS.contains(&normalize(words[0]).as_str()) {
        words.remove(0);
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_recognizer_punctuation() {
        assert_eq!(clean_voice_input("يسوع حبيبي."), "يسوع حبيبي");
        assert_eq!(clean_voice_input("أين أنت؟"), "أين أنت");
        assert_eq!(clean_voice_input("  hallelujah! "), "hallelujah");
    }

    #[test]
    fn test_leading_fillers() {
        assert_eq!(clean_voice_input("ترتيلة رقم ١٢"), "١٢");
        assert_eq!(clean_voice_input("Hymn number 476."), "476");
        assert_eq!(clean_voice_input("ترنيمة الراعي الصالح"), "الراعي الصالح");
    }

    #[test]
    fn test_lone_filler_is_kept() {
        assert_eq!(clean_voice_input("ترتيلة"), "ترتيلة");
    }

    #[test]
    fn test_inner_dots_survive() {
        assert_eq!(clean_voice_input("12. Amazing"), "12. Amazing");
        assert_eq!(clean_voice_input("a.b"), "a.b");
    }
}
