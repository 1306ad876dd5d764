//! Greedy word wrap for labels.
//!
//! Targets measure text their own way, so the measurement is passed in.

/// Split `text` into lines no wider than `wrap_width`.
///
/// Explicit newlines always break. Within a line, words are packed greedily
/// while `measure(candidate) < wrap_width`; a single word wider than the
/// limit gets a line of its own. Without a width only newlines break.
pub fn wrap_text<F>(text: &str, wrap_width: Option<f64>, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let Some(limit) = wrap_width else {
        return text.split('\n').map(str::to_string).collect();
    };

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure(&candidate) < limit {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// Rough advance width of `text` for a font of `size_mm` em height.
pub fn approximate_width(text: &str, size_mm: f64) -> f64 {
    text.chars().count() as f64 * size_mm * 0.55
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> f64 {
        s.chars().count() as f64
    }

    #[test]
    fn no_width_splits_only_on_newlines() {
        assert_eq!(wrap_text("a b\nc", None, chars), vec!["a b", "c"]);
    }

    #[test]
    fn greedy_packing() {
        let lines = wrap_text("sandy loam with gravel", Some(12.0), chars);
        assert_eq!(lines, vec!["sandy loam", "with gravel"]);
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let lines = wrap_text("a andesibasaltic b", Some(5.0), chars);
        assert_eq!(lines, vec!["a", "andesibasaltic", "b"]);
    }

    #[test]
    fn newline_inside_wrapped_text() {
        let lines = wrap_text("one two\nthree", Some(100.0), chars);
        assert_eq!(lines, vec!["one two", "three"]);
    }
}
