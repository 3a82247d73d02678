//! Simple recursive-descent parsing of grammar files, one rule group per line:
//!
//! ```text
//! # comment
//! S -> NP VP
//! NP -> N | Det N
//! N -> "holmes" | 'day'
//! ```

use regex::Regex;
use std::str::FromStr;

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::rules::{Production, Rule, Symbol};

impl FromStr for Grammar {
  type Err = GrammarError;

  /// Parses a grammar from a string. Assumes the first rule's symbol
  /// is the start symbol.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let rules = parse_rules(s)?;
    let start = rules
      .first()
      .ok_or(GrammarError::Empty)?
      .symbol_str()
      .to_string();
    Grammar::new(start, rules)
  }
}

type Infallible<'a, T> = (T, &'a str);
type ParseResult<'a, T> = Result<(T, &'a str), String>;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// Try to consume a regex, returning None if it doesn't match
fn optional_re<'a>(re: &'static Regex, s: &'a str) -> Infallible<'a, Option<&'a str>> {
  match re.find(s) {
    Some(m) if m.start() == 0 => (Some(m.as_str()), &s[m.end()..]),
    _ => (None, s),
  }
}

/// Try to consume a regex, failing if it doesn't match
fn needed_re<'a>(re: &'static Regex, s: &'a str) -> ParseResult<'a, &'a str> {
  if let (Some(c), rest) = optional_re(re, s) {
    Ok((c, rest))
  } else {
    Err(format!("couldn't match {} at {:?}", re, s))
  }
}

/// Try to consume a char, returning None if it doesn't match
fn optional_char(c: char, s: &str) -> Infallible<'_, Option<char>> {
  match s.strip_prefix(c) {
    Some(rest) => (Some(c), rest),
    None => (None, s),
  }
}

/// Skips spaces and tabs, and a trailing comment if that's all that's left
fn skip_whitespace(s: &str) -> &str {
  let s = s.trim_start_matches([' ', '\t']);
  if s.starts_with('#') { "" } else { s }
}

/// Tries to parse a name made of letters, numbers, - and _
fn parse_name(s: &str) -> ParseResult<'_, &str> {
  regex_static!(NAME, r"[a-zA-Z0-9\-_]+");
  needed_re(&*NAME, s).map_err(|err| format!("name: {}", err))
}

/// A single- or double-quoted literal word
fn parse_terminal(s: &str) -> ParseResult<'_, String> {
  regex_static!(QUOTED, r#"^(?:"[^"]*"|'[^']*')"#);
  let (quoted, s) = needed_re(&*QUOTED, s).map_err(|err| format!("terminal: {}", err))?;
  let word = &quoted[1..quoted.len() - 1];
  if word.is_empty() {
    Err("terminal: empty quotes".to_string())
  } else {
    Ok((word.to_string(), s))
  }
}

fn parse_production(s: &str) -> ParseResult<'_, Production> {
  if s.starts_with('"') || s.starts_with('\'') {
    let (word, s) = parse_terminal(s)?;
    Ok((Production::Terminal(word), s))
  } else {
    let (name, s) = parse_name(s)?;
    Ok((Production::Nonterminal(Symbol::new(name)), s))
  }
}

/// Productions up to the next `|` or the end of the line
fn parse_alternative(s: &str) -> ParseResult<'_, Vec<Production>> {
  let mut productions = Vec::new();
  let mut rem = skip_whitespace(s);
  while !rem.is_empty() && !rem.starts_with('|') {
    let (prod, s) = parse_production(rem)?;
    productions.push(prod);
    rem = skip_whitespace(s);
  }

  if productions.is_empty() {
    Err("empty alternative".to_string())
  } else {
    Ok((productions, rem))
  }
}

/// Symbol, arrow, alternatives. Blank and comment-only lines give no rules.
fn parse_line(s: &str) -> Result<Vec<Rule>, String> {
  #![allow(clippy::trivial_regex)]
  regex_static!(ARROW, "->");

  let s = skip_whitespace(s);
  if s.is_empty() {
    return Ok(Vec::new());
  }

  let (name, s) = parse_name(s).map_err(|e| format!("rule symbol: {}", e))?;
  let s = skip_whitespace(s);
  let (_, s) = needed_re(&*ARROW, s).map_err(|e| format!("rule arrow: {}", e))?;

  let mut rules = Vec::new();
  let mut rem = s;
  loop {
    let (productions, s) = parse_alternative(rem)?;
    rules.push(Rule::new(Symbol::new(name), productions));
    match optional_char('|', s) {
      (Some(_), s) => rem = s,
      (None, _) => return Ok(rules),
    }
  }
}

fn parse_rules(s: &str) -> Result<Vec<Rule>, GrammarError> {
  let mut rules = Vec::new();
  for (idx, line) in s.lines().enumerate() {
    let mut parsed = parse_line(line).map_err(|message| GrammarError::Syntax {
      line: idx + 1,
      message,
    })?;
    rules.append(&mut parsed);
  }
  Ok(rules)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_alternatives() {
    let g: Grammar = r#"
      # a comment
      S -> NP VP   # trailing comment
      NP -> N | Det N
      VP -> V
      Det -> 'the'
      N -> "holmes" | "day"
      V -> "sat"
    "#
    .parse()
    .unwrap();

    assert_eq!(g.start(), "S");
    assert_eq!(g.rules().len(), 8);
    let np = g
      .rules_for("NP")
      .iter()
      .map(|r| r.to_string())
      .collect::<Vec<_>>();
    assert_eq!(np, vec!["NP -> N", "NP -> Det N"]);
    assert_eq!(g.rules_for("Det")[0].word(), Some("the"));
  }

  #[test]
  fn test_roundtrip_display() {
    let g: Grammar = "S -> A B\nA -> \"a\"\nB -> \"b\" | A".parse().unwrap();
    let again: Grammar = g.to_string().parse().unwrap();
    assert_eq!(g.rules(), again.rules());
  }

  #[test]
  fn test_syntax_errors() {
    let err = "S -> NP\nNP => N\nN -> \"x\"".parse::<Grammar>().unwrap_err();
    assert!(matches!(err, GrammarError::Syntax { line: 2, .. }), "{}", err);

    let err = "S -> A |\nA -> \"a\"".parse::<Grammar>().unwrap_err();
    assert_eq!(
      err,
      GrammarError::Syntax {
        line: 1,
        message: "empty alternative".to_string()
      }
    );

    let err = "S -> \"\"".parse::<Grammar>().unwrap_err();
    assert!(matches!(err, GrammarError::Syntax { line: 1, .. }));

    assert_eq!("# nothing here\n".parse::<Grammar>().unwrap_err(), GrammarError::Empty);
  }

  #[test]
  fn test_validation_runs() {
    let err = "S -> NP VP\nNP -> \"x\"".parse::<Grammar>().unwrap_err();
    assert!(matches!(err, GrammarError::UndefinedSymbol { ref symbol, .. } if symbol == "VP"));

    let err = "S -> V \"home\"\nV -> \"came\"".parse::<Grammar>().unwrap_err();
    assert!(matches!(err, GrammarError::MixedRule { .. }));
  }
}
