use search_core::tokenizer::tokenize;

fn words(text: &str) -> Vec<String> {
    tokenize(text)
}

#[test]
fn it_splits_words() {
    assert_eq!(words("word1 word2"), vec!["word1", "word2"]);
}

#[test]
fn it_isolates_comma_and_period() {
    assert_eq!(words("For now, we are here"), vec!["for", "now", ",", "we", "are", "here"]);
    assert_eq!(words("For now, we are here."), vec!["for", "now", ",", "we", "are", "here", "."]);
}

#[test]
fn it_isolates_other_non_word_chars() {
    assert_eq!(words("10% of $5 is 50 c"), vec!["10", "%", "of", "$", "5", "is", "50", "c"]);
}

#[test]
fn it_keeps_contractions_and_names() {
    assert_eq!(
        words("He said 'Isn't O'Brian the best?'"),
        vec!["he", "said", "'", "isn't", "o'brian", "the", "best", "?", "'"]
    );
}

#[test]
fn it_collapses_ellipsis() {
    assert_eq!(words("More..."), vec!["more", "..."]);
    assert_eq!(words("wait. . . what"), vec!["wait", "...", "what"]);
}

#[test]
fn it_keeps_hyphens_and_splits_decimals() {
    assert_eq!(
        words("pre-school children (22.5%). It occurred year-round"),
        vec!["pre-school", "children", "(", "22", ".", "5", "%", ")", ".", "it", "occurred", "year-round"]
    );
}

#[test]
fn it_does_not_merge_title_abbreviations() {
    assert_eq!(words("Dr. Ross"), vec!["dr", ".", "ross"]);
}

#[test]
fn it_is_deterministic() {
    let samples = ["", "The café's menu.", "a\tb\nc", "¿Qué? ¡Sí!", "x'y'z"];
    for s in samples {
        assert_eq!(tokenize(s), tokenize(s));
    }
}

#[test]
fn it_joins_apostrophes_left_to_right() {
    assert_eq!(words("x'y'z"), vec!["x'y", "'", "z"]);
}
