use regex::{Captures, Regex};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use crate::core::numerals::{cardinal_words, ordinal_words, roman_digits};

static ORDINAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)(?:st|nd|rd|th)").unwrap());

// Letters glued to either side of a digit run are captured so that a numeral
// spelled inside a word ("se7en") can be folded onto its spelling.
static CARDINAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z]*)([0-9]+)([a-z]*)").unwrap());

static SEPARATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_,/\\|]").unwrap());

static NON_ALPHA_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z ]").unwrap());

static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const SYMBOLS: [(char, &str); 4] = [
    ('&', " and "),
    ('%', " percent "),
    ('@', " at "),
    ('°', " degrees "),
];

/// Reduce a free-text title to the key used for equality comparison.
///
/// The key is lowercase ASCII letters and single spaces only. Numerals (roman,
/// ordinal and cardinal) are spelled out, a handful of symbols become words,
/// separators become spaces, every literal `"the "` is dropped and diacritics
/// are folded away. The reduction is deliberately lossy.
///
/// # Examples
/// ```
/// use tomato_match::normalize;
///
/// assert_eq!(normalize("Rocky II"), "rocky two");
/// assert_eq!(normalize("Se7en"), normalize("SEVEN"));
/// assert_eq!(normalize("The Hateful 8"), "hateful eight");
/// ```
pub fn normalize(raw: &str) -> String {
    let text = raw.trim().to_lowercase();
    let text = expand_roman_numerals(&text);
    let text = text.replace('½', " and a half ").replace("1/2", " and a half ");
    let text = ORDINAL_PATTERN
        .replace_all(&text, |caps: &Captures<'_>| ordinal_words(&caps[1]))
        .into_owned();
    let text = CARDINAL_PATTERN
        .replace_all(&text, |caps: &Captures<'_>| {
            splice_numeral(&caps[1], &cardinal_words(&caps[2]), &caps[3])
        })
        .into_owned();
    let text = substitute_symbols(&text);
    let text = SEPARATOR_PATTERN.replace_all(&text, " ").replace("the ", "");
    let text: String = text.nfd().collect();
    let text = NON_ALPHA_PATTERN.replace_all(&text, "");

    WHITESPACE_PATTERN.replace_all(&text, " ").trim().to_string()
}

/// Replace whole-word roman numerals with their digits.
///
/// A word is a maximal run of ASCII word characters, so `ii` in `rocky ii`
/// converts while `iiii` or the `i` in `i2` do not.
fn expand_roman_numerals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) {
            word_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = word_start.take() {
            push_word(&mut out, &text[start..idx]);
        }
        out.push(ch);
    }

    if let Some(start) = word_start {
        push_word(&mut out, &text[start..]);
    }

    out
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn push_word(out: &mut String, word: &str) {
    out.push_str(roman_digits(word).unwrap_or(word));
}

/// Put the spelled numeral between its neighbouring letters.
///
/// When the spelling is a single word, and the letters on both sides already
/// spell its head and tail, the numeral stands in for the middle of that word
/// and the overlap is folded: `se` + `seven` + `en` gives `seven`.
fn splice_numeral(left: &str, spelled: &str, right: &str) -> String {
    if !left.is_empty() && !right.is_empty() && !spelled.contains(' ') {
        let head = (1..=left.len().min(spelled.len()))
            .rev()
            .find(|&k| left.ends_with(&spelled[..k]))
            .unwrap_or(0);
        let tail = (1..=right.len().min(spelled.len()))
            .rev()
            .find(|&k| right.starts_with(&spelled[spelled.len() - k..]))
            .unwrap_or(0);

        if head > 0 && tail > 0 && head + tail < spelled.len() {
            return format!("{}{}{}", &left[..left.len() - head], spelled, &right[tail..]);
        }
    }

    format!("{}{}{}", left, spelled, right)
}

fn substitute_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match SYMBOLS.iter().find(|(symbol, _)| *symbol == ch) {
            Some((_, word)) => out.push_str(word),
            None => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(normalize("  Heat  "), "heat");
        assert_eq!(normalize("HEAT"), normalize("heat"));
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_roman_numerals_whole_words_only() {
        assert_eq!(normalize("Rocky II"), "rocky two");
        assert_eq!(normalize("Rocky IV"), "rocky four");
        assert_eq!(normalize("Malcolm X"), "malcolm ten");
        assert_eq!(normalize("Iiii"), "iiii");
        assert_eq!(normalize("Vivid"), "vivid");
        assert_eq!(normalize("X-Men"), "ten men");
    }

    #[test]
    fn test_roman_expansion_helper() {
        assert_eq!(expand_roman_numerals("part ii: the end"), "part 2: the end");
        assert_eq!(expand_roman_numerals("ii2 i_"), "ii2 i_");
        assert_eq!(expand_roman_numerals("vi"), "6");
    }

    #[test]
    fn test_halves() {
        assert_eq!(normalize("8½"), "eight and a half");
        assert_eq!(normalize("8 1/2"), "eight and a half");
    }

    #[test]
    fn test_ordinals_and_cardinals() {
        assert_eq!(normalize("The 13th Warrior"), "thirteenth warrior");
        assert_eq!(normalize("2001: A Space Odyssey"), "two thousand one a space odyssey");
        assert_eq!(normalize("Apollo 13"), "apollo thirteen");
        assert_eq!(normalize("21 Jump Street"), "twenty one jump street");
    }

    #[test]
    fn test_embedded_numeral_folds_onto_spelling() {
        assert_eq!(normalize("Se7en"), "seven");
        assert_eq!(normalize("SEVEN"), "seven");
        assert_eq!(splice_numeral("se", "seven", "en"), "seven");
        assert_eq!(splice_numeral("m", "three", "gan"), "mthreegan");
        assert_eq!(splice_numeral("", "four", "ever"), "fourever");
    }

    #[test]
    fn test_symbols_and_separators() {
        assert_eq!(normalize("Fast & Furious"), "fast and furious");
        assert_eq!(normalize("100% Wolf"), "one hundred percent wolf");
        assert_eq!(normalize("Love @ First Sight"), "love at first sight");
        assert_eq!(normalize("451°"), "four hundred fifty one degrees");
        assert_eq!(normalize("Face/Off"), "face off");
        assert_eq!(normalize("Spider-Man"), "spider man");
        assert_eq!(normalize("Crouching_Tiger|Hidden\\Dragon, yes"), "crouching tiger hidden dragon yes");
    }

    #[test]
    fn test_literal_article_removal() {
        assert_eq!(normalize("The Matrix"), "matrix");
        assert_eq!(normalize("Lord of the Rings"), "lord of rings");
        // Literal substring removal, even mid-word
        assert_eq!(normalize("Breathe In"), "breain");
        assert_eq!(normalize("Breathe"), "breathe");
    }

    #[test]
    fn test_diacritics_and_punctuation() {
        assert_eq!(normalize("Amélie"), "amelie");
        assert_eq!(normalize("Léon: The Professional"), "leon professional");
        assert_eq!(normalize("Who Framed Roger Rabbit?!"), "who framed roger rabbit");
        assert_eq!(normalize("Crazy 😎 Movie"), "crazy movie");
    }

    #[test]
    fn test_idempotent_on_titles() {
        for title in [
            "Se7en",
            "Rocky II",
            "The 13th Warrior",
            "Amélie",
            "8½",
            "Fast & Furious 6",
            "Star Wars: Episode IV - A New Hope",
            "Léon: The Professional",
        ] {
            let once = normalize(title);
            assert_eq!(normalize(&once), once, "not idempotent for {title}");
        }
    }

    #[test]
    fn test_article_exposed_by_stripping_is_removed_on_second_pass() {
        // "the" is only followed by a space once punctuation and accents are gone
        let once = normalize("Where's the... Money");
        assert_eq!(once, "wheres the money");
        assert_eq!(normalize(&once), "wheres money");

        let once = normalize("Thé Matrix");
        assert_eq!(once, "the matrix");
        assert_eq!(normalize(&once), "matrix");
    }
}
