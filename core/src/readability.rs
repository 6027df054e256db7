use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+(\s|$)").expect("valid regex");
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}']*").expect("valid regex");
    static ref VOWEL_GROUP: Regex = Regex::new(r"[aeiouy]+").expect("valid regex");
}

/// Flesch reading ease: higher scores read more easily.
///
/// `206.835 - 1.015 * words/sentence - 84.6 * syllables/word`. Text with no
/// words scores zero.
pub fn flesch_reading_ease(text: &str) -> f32 {
    let words: Vec<String> = WORD.find_iter(text).map(|m| m.as_str().to_lowercase()).collect();
    if words.is_empty() {
        return 0.0;
    }
    let sentences = SENTENCE_END.find_iter(text.trim()).count().max(1);
    let syllables: usize = words.iter().map(|w| syllable_count(w)).sum();

    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;
    (206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word) as f32
}

/// Vowel-group estimate; a trailing silent `e` is not counted.
pub fn syllable_count(word: &str) -> usize {
    let word = word.trim_end_matches('\'');
    let mut count = VOWEL_GROUP.find_iter(word).count();
    if count > 1 && word.ends_with('e') && !word.ends_with("le") && !word.ends_with("ee") {
        count -= 1;
    }
    count.max(1)
}
