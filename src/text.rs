use unicode_normalization::UnicodeNormalization;

const REPLACEMENTS: [(char, &str); 2] = [('Œ', "Oe"), ('œ', "oe")];

/// Swaps ligatures that don't survive downstream tooling for ASCII pairs.
pub fn clean_special_chars(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match REPLACEMENTS.iter().find(|(x, _)| *x == c) {
            Some((_, replacement)) => output.push_str(replacement),
            None => output.push(c),
        }
    }
    output
}

/// Ligature cleanup, then NFD with combining marks dropped: "Œufs brûlés" -> "Oeufs brules".
pub fn normalize_text(text: &str) -> String {
    clean_special_chars(text)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// The cleaner the phases apply to display text.
pub fn clean(text: &str, strip_diacritics: bool) -> String {
    if strip_diacritics {
        normalize_text(text)
    } else {
        clean_special_chars(text)
    }
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ligatures() {
        assert_eq!(clean_special_chars("Œuf"), "Oeuf");
        assert_eq!(clean_special_chars("bœuf haché"), "boeuf haché");
        assert_eq!(clean_special_chars(""), "");
    }

    #[test]
    fn diacritics() {
        assert_eq!(normalize_text("Crème brûlée"), "Creme brulee");
        assert_eq!(normalize_text("Œufs brûlés"), "Oeufs brules");
        assert_eq!(normalize_text("Zürich Gruyère"), "Zurich Gruyere");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn nothing_left_behind() {
        for input in ["ŒŒœœ", "cœur à l'œil", "e\u{0301}te\u{0301}", "Ñandú Ærø"] {
            let output = normalize_text(input);
            assert!(!output.contains(['Œ', 'œ']), "{output}");
            assert!(!output.chars().any(is_combining_mark), "{output}");
        }
    }

    #[test]
    fn clean_switch() {
        assert_eq!(clean("Crème œuf", false), "Crème oeuf");
        assert_eq!(clean("Crème œuf", true), "Creme oeuf");
    }
}
