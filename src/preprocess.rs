use regex::Regex;

/// Splits a sentence into lowercase word tokens.
///
/// Runs of word characters (joined by inner hyphens) are tokens, a leading
/// apostrophe starts a clitic token (`holmes's` -> `holmes`, `'s`), and
/// punctuation is split off. Tokens without a single alphabetic character,
/// like `.` or `1887`, are dropped.
pub fn preprocess(sentence: &str) -> Vec<String> {
  lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"'\w+|\w+(?:-\w+)*|[^\w\s]+").unwrap();
  }

  TOKEN
    .find_iter(sentence)
    .map(|m| m.as_str().to_lowercase())
    .filter(|w| w.chars().any(char::is_alphabetic))
    .collect()
}
