/// Longest accepted chirp, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

const MASK: &str = "****";

/// Mask every space-separated word whose lowercase form is banned.
///
/// Leading and trailing punctuation is ignored when matching and kept in
/// the output, so "Fornax!" becomes "****!".
pub fn clean_body(body: &str, banned: &[String]) -> String {
    body.split(' ')
        .map(|word| mask_word(word, banned))
        .collect::<Vec<_>>()
        .join(" ")
}

fn mask_word(word: &str, banned: &[String]) -> String {
    let is_punct = |c: char| !c.is_alphanumeric();
    let core = word.trim_matches(is_punct);
    if core.is_empty() {
        return word.to_string();
    }
    let lower = core.to_lowercase();
    if !banned.iter().any(|b| *b == lower) {
        return word.to_string();
    }
    let start = word.len() - word.trim_start_matches(is_punct).len();
    let end = start + core.len();
    format!("{}{}{}", &word[..start], MASK, &word[end..])
}

pub fn is_too_long(body: &str) -> bool {
    body.chars().count() > MAX_CHIRP_LENGTH
}
