use ascent_core::tokenizer::{term_counts, tokenize};

#[test]
fn it_normalizes_and_stems() {
    let words = tokenize("Running Runners RUN! The café's menu.");
    assert!(words.contains(&"run".to_string()));
    assert!(words.iter().any(|w| w.starts_with("caf")));
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn counts_match_token_stream() {
    let text = "Parsers parse parsed input; lexers lex.";
    let total: u32 = term_counts(text).values().sum();
    assert_eq!(total as usize, tokenize(text).len());
}
