use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything that is not a word character or a hyphen becomes its own token.
    static ref SEPARATOR: Regex = Regex::new(r"([^\w-])").expect("valid regex");
    static ref APOSTROPHE: Regex = Regex::new(r"(\w) ' (\w)").expect("valid regex");
    static ref ELLIPSIS: Regex = Regex::new(r"\.\s+\.\s+\.").expect("valid regex");
}

/// Turns raw text into a sequence of normalized terms.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// The default tokenizer: lowercases, isolates punctuation and symbols, keeps
/// contractions, hyphenated words and ellipses together.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexTokenizer;

impl RegexTokenizer {
    pub fn new() -> Self { Self }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text)
    }
}

/// Tokenize text with the default rules. Total: every input, including the
/// empty string, yields a (possibly empty) token list.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let spaced = SEPARATOR.replace_all(&lowered, " ${1} ");
    let joined = APOSTROPHE.replace_all(&spaced, "${1}'${2}");
    let collapsed = ELLIPSIS.replace_all(&joined, "...");
    collapsed.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runner's run!");
        assert_eq!(t, vec!["running", ",", "runner's", "run", "!"]);
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
    }

    #[test]
    fn trait_object_matches_free_function() {
        let tokenizer: Box<dyn Tokenizer> = Box::new(RegexTokenizer::new());
        let text = "More... of the same, isn't it?";
        assert_eq!(tokenizer.tokenize(text), tokenize(text));
    }
}
