use cinesearch_core::tokenizer::{analyze, tokenize};

#[test]
fn it_lowercases_and_keeps_alphabetic_runs() {
    let words = tokenize("Spider-Man SWINGS through New York in 2099!");
    assert!(words.contains(&"spider".to_string()));
    assert!(words.contains(&"man".to_string()));
    assert!(words.contains(&"swings".to_string()));
    assert!(words.contains(&"york".to_string()));
    // Digits never form tokens.
    assert!(!words.iter().any(|w| w.chars().any(|c| c.is_ascii_digit())));
}

#[test]
fn it_drops_short_tokens_and_mixed_words() {
    let words = tokenize("A b cd x2 abc9 R2D2 café");
    assert_eq!(words, vec!["cd"]);
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_emits_unigrams_then_bigrams() {
    let terms = analyze("Giant spiders attack", (1, 2));
    assert_eq!(terms, vec!["giant", "spiders", "attack", "giant spiders", "spiders attack"]);
}
