// Text folding used for matching hymn titles.
//
// Arabic titles are printed with and without harakat, with several alef
// shapes and with tatweel stretching ("الـجـيـتـار"); users type none of
// that. Both sides of a comparison go through `normalize`.

const TATWEEL: char = '\u{0640}';

fn is_arabic_mark(c: char) -> bool {
    matches!(c,
        '\u{064B}'..='\u{065F}' // harakat, shadda, sukun, maddah/hamza marks
        | '\u{0670}'            // superscript alef
        | '\u{06D6}'..='\u{06ED}' // Quranic annotation marks
    )
}

fn fold_letter(c: char) -> char {
    match c {
        'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
        'ى' => 'ي',
        'ة' => 'ه',
        'ؤ' => 'و',
        'ئ' => 'ي',
        _ => fold_digit(c),
    }
}

/// Arabic-Indic (U+0660..) and Eastern Arabic-Indic (U+06F0..) digits to ASCII.
fn fold_digit(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

/// Converts every Arabic digit in `text` to ASCII, leaving the rest untouched.
pub fn fold_digits(text: &str) -> String {
    text.chars().map(fold_digit).collect()
}

/// Case-folds, strips diacritics and tatweel, unifies letter variants and
/// digits, and collapses runs of whitespace into one space.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c == TATWEEL || is_arabic_mark(c) {
            continue;
        }
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(fold_letter(c));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_harakat() {
        assert_eq!(normalize("أَبَانَا الَّذِي"), "ابانا الذي");
        assert_eq!(normalize("مُبَارَكٌ"), "مبارك");
    }

    #[test]
    fn test_strips_tatweel() {
        assert_eq!(normalize("كوردات الـجـيـتـار"), "كوردات الجيتار");
    }

    #[test]
    fn test_unifies_letter_variants() {
        assert_eq!(normalize("إسم"), "اسم");
        assert_eq!(normalize("آمين"), "امين");
        assert_eq!(normalize("ترتيلة"), "ترتيله");
        assert_eq!(normalize("مستشفى"), "مستشفي");
        assert_eq!(normalize("مؤمن"), "مومن");
    }

    #[test]
    fn test_case_digits_and_spaces() {
        assert_eq!(normalize("  Music   LESSON "), "music lesson");
        assert_eq!(normalize("ترتيلة ١٢"), "ترتيله 12");
        assert_eq!(normalize("۴۷۶"), "476");
        assert_eq!(fold_digits("٤٧٧. info"), "477. info");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
