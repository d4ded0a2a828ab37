/// The Hebrew combining marks removed by [`strip_niqqud`]: vowel points
/// and cantillation marks U+05B0–U+05BD plus the shin/sin dots and the
/// upper/lower dots.
pub const NIQQUD: [char; 18] = [
    '\u{05B0}', '\u{05B1}', '\u{05B2}', '\u{05B3}', '\u{05B4}', '\u{05B5}', '\u{05B6}',
    '\u{05B7}', '\u{05B8}', '\u{05B9}', '\u{05BA}', '\u{05BB}', '\u{05BC}', '\u{05BD}',
    '\u{05C1}', '\u{05C2}', '\u{05C4}', '\u{05C5}',
];

/// Precomposed presentation forms that survive combining-mark removal,
/// paired with the bare letter they collapse to.
const LIGATURES: [(char, char); 7] = [
    ('\u{FB2A}', 'ש'), // shin with shin dot
    ('\u{FB2B}', 'ש'), // shin with sin dot
    ('\u{FB3B}', 'כ'), // kaf with dagesh
    ('\u{FB31}', 'ב'), // bet with dagesh
    ('\u{FB44}', 'פ'), // pe with dagesh
    ('\u{FB4B}', 'ו'), // vav with holam
    ('\u{FB35}', 'ו'), // vav with dagesh (shuruk)
];

fn is_niqqud(c: char) -> bool {
    NIQQUD.contains(&c)
}

/// Returns true if the text carries any niqqud mark.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::contains_niqqud;
///
/// assert!(contains_niqqud("סֵפֶר"));
/// assert!(!contains_niqqud("ספר"));
/// ```
pub fn contains_niqqud(text: &str) -> bool {
    text.chars().any(is_niqqud)
}

/// Removes niqqud from Hebrew text and collapses dotted ligatures to their
/// bare letters. The result is trimmed.
///
/// Idempotent: `strip_niqqud(&strip_niqqud(x)) == strip_niqqud(x)`.
///
/// # Examples
///
/// ```
/// use yesod::normalizer::strip_niqqud;
///
/// assert_eq!(strip_niqqud("שָׁלוֹם"), "שלום");
/// assert_eq!(strip_niqqud(" סֵפֶר "), "ספר");
/// ```
pub fn strip_niqqud(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !is_niqqud(*c))
        .map(|c| {
            LIGATURES
                .iter()
                .find(|(ligature, _)| *ligature == c)
                .map_or(c, |(_, bare)| *bare)
        })
        .collect();

    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_every_listed_mark() {
        let marked: String = NIQQUD.iter().map(|m| format!("ב{m}")).collect();
        assert_eq!(strip_niqqud(&marked), "ב".repeat(NIQQUD.len()));
    }

    #[test]
    fn keeps_marks_outside_the_list() {
        // Maqaf (U+05BE) and sof pasuq (U+05C3) are punctuation, not niqqud
        assert_eq!(strip_niqqud("בית־ספר\u{05C3}"), "בית־ספר\u{05C3}");
    }

    #[test]
    fn collapses_presentation_forms() {
        assert_eq!(strip_niqqud("\u{FB2A}\u{FB2B}"), "שש");
        assert_eq!(strip_niqqud("\u{FB3B}\u{FB31}\u{FB44}"), "כבפ");
        assert_eq!(strip_niqqud("\u{FB4B}\u{FB35}"), "וו");
    }

    #[test]
    fn decomposed_vav_with_holam_and_shuruk() {
        assert_eq!(strip_niqqud("ו\u{05B9}ו\u{05BC}"), "וו");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(strip_niqqud("  ספר\t"), "ספר");
        assert_eq!(strip_niqqud("   "), "");
    }

    #[test]
    fn leaves_english_untouched() {
        assert_eq!(strip_niqqud("book"), "book");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "שָׁלוֹם",
            "  בְּרֵאשִׁית  ",
            "\u{FB2A}\u{05B8}לוֹם",
            "good morning - בֹּקֶר טוֹב",
            "",
            "\u{05B0}",
        ];
        for sample in samples {
            let once = strip_niqqud(sample);
            assert_eq!(strip_niqqud(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn stripped_text_has_no_niqqud() {
        assert!(!contains_niqqud(&strip_niqqud("בְּרֵאשִׁית בָּרָא")));
    }
}
