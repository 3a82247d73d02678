use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::GrammarError;
use crate::rules::{Production, Rule};
use crate::Err;

/// The grammar the sentence parser ships with
pub const SENTENCES_GRAMMAR: &str = include_str!("../grammars/sentences.cfg");

/// An immutable, validated rule table.
///
/// Rules are shared behind `Arc` so a single grammar can be used from several
/// threads at once; nothing in it changes after `Grammar::new`.
#[derive(Debug)]
pub struct Grammar {
  start: String,
  rules: Vec<Arc<Rule>>,
  by_symbol: HashMap<String, Vec<Arc<Rule>>>,
  terminals: HashSet<String>,
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "# start: {}", self.start)?;
    for rule in self.rules.iter() {
      writeln!(f, "{}", rule)?;
    }
    Ok(())
  }
}

impl Grammar {
  /// Builds and validates a grammar. Exact duplicate rules are kept once, at
  /// the position they were first declared.
  pub fn new(start: impl Into<String>, rules: Vec<Rule>) -> Result<Self, GrammarError> {
    let start = start.into();
    if rules.is_empty() {
      return Err(GrammarError::Empty);
    }

    let mut seen: HashSet<Rule> = HashSet::new();
    let mut kept = Vec::with_capacity(rules.len());
    for rule in rules {
      if rule.is_empty() {
        return Err(GrammarError::EmptyRule {
          symbol: rule.symbol_str().to_string(),
        });
      }
      if rule.is_mixed() {
        return Err(GrammarError::MixedRule {
          rule: rule.to_string(),
        });
      }
      if seen.contains(&rule) {
        debug!(%rule, "dropping duplicate rule");
        continue;
      }
      seen.insert(rule.clone());
      kept.push(Arc::new(rule));
    }

    let by_symbol: HashMap<String, Vec<Arc<Rule>>> =
      kept.iter().fold(HashMap::new(), |mut map, rule| {
        map
          .entry(rule.symbol_str().to_string())
          .or_insert_with(Vec::new)
          .push(rule.clone());
        map
      });

    let terminals = kept
      .iter()
      .filter_map(|r| r.word())
      .map(str::to_string)
      .collect::<HashSet<_>>();

    if !by_symbol.contains_key(&start) {
      return Err(GrammarError::MissingStart { symbol: start });
    }

    for rule in kept.iter() {
      for p in rule.productions.iter() {
        if let Production::Nonterminal(s) = p {
          if !by_symbol.contains_key(&s.name) {
            return Err(GrammarError::UndefinedSymbol {
              symbol: s.name.clone(),
              referenced_by: rule.to_string(),
            });
          }
        }
      }
    }

    if let Some(symbols) = Self::find_unit_cycle(&kept, &by_symbol) {
      return Err(GrammarError::UnitCycle { symbols });
    }

    debug!(
      start = %start,
      rules = kept.len(),
      nonterminals = by_symbol.len(),
      terminals = terminals.len(),
      "built grammar"
    );

    Ok(Self {
      start,
      rules: kept,
      by_symbol,
      terminals,
    })
  }

  /// Depth-first search over the `A -> B` edges. Returns the symbols on the
  /// first cycle found, in the order they're visited.
  fn find_unit_cycle(
    rules: &[Arc<Rule>],
    by_symbol: &HashMap<String, Vec<Arc<Rule>>>,
  ) -> Option<Vec<String>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
      Active,
      Done,
    }

    fn visit<'a>(
      symbol: &'a str,
      by_symbol: &'a HashMap<String, Vec<Arc<Rule>>>,
      marks: &mut HashMap<&'a str, Mark>,
      path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
      match marks.get(symbol) {
        Some(Mark::Done) => return None,
        Some(Mark::Active) => {
          let pos = path.iter().position(|s| *s == symbol)?;
          return Some(path[pos..].iter().map(|s| s.to_string()).collect());
        }
        None => {}
      }

      marks.insert(symbol, Mark::Active);
      path.push(symbol);
      for rule in by_symbol.get(symbol).into_iter().flatten() {
        if let Some(target) = rule.unit_target() {
          if let Some(cycle) = visit(target, by_symbol, marks, path) {
            return Some(cycle);
          }
        }
      }
      path.pop();
      marks.insert(symbol, Mark::Done);
      None
    }

    let mut marks = HashMap::new();
    let mut path = Vec::new();
    for rule in rules {
      let found = visit(rule.symbol_str(), by_symbol, &mut marks, &mut path);
      if found.is_some() {
        return found;
      }
    }
    None
  }

  /// The grammar of simple English sentences in `grammars/sentences.cfg`,
  /// starting at `S`.
  pub fn sentences() -> Result<Self, GrammarError> {
    SENTENCES_GRAMMAR.parse()
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, Err> {
    let src = fs::read_to_string(path)?;
    Ok(src.parse()?)
  }

  pub fn start(&self) -> &str {
    &self.start
  }

  /// Every rule, in declaration order
  pub fn rules(&self) -> &[Arc<Rule>] {
    &self.rules
  }

  /// Rules with `symbol` on the left, in declaration order. Empty if the
  /// symbol has no rules.
  pub fn rules_for(&self, symbol: &str) -> &[Arc<Rule>] {
    self
      .by_symbol
      .get(symbol)
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn is_terminal_word(&self, word: &str) -> bool {
    self.terminals.contains(word)
  }

  /// Tokens that no terminal rule can produce, in input order
  pub fn uncovered(&self, tokens: &[&str]) -> Vec<String> {
    tokens
      .iter()
      .filter(|t| !self.is_terminal_word(t))
      .map(|t| t.to_string())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn holmes_rules() -> Vec<Rule> {
    vec![
      Rule::nonterminal("S", &["NP", "VP"]),
      Rule::nonterminal("NP", &["N"]),
      Rule::nonterminal("VP", &["V"]),
      Rule::terminal("N", "holmes"),
      Rule::terminal("V", "sat"),
    ]
  }

  #[test]
  fn test_rules_for() {
    let g = Grammar::new("S", holmes_rules()).unwrap();
    assert_eq!(g.start(), "S");
    assert_eq!(g.rules_for("NP").len(), 1);
    assert_eq!(g.rules_for("NP")[0].to_string(), "NP -> N");
    assert!(g.rules_for("PP").is_empty());
    assert!(g.is_terminal_word("holmes"));
    assert!(!g.is_terminal_word("N"));
    assert_eq!(g.uncovered(&["holmes", "ran", "sat", "off"]), vec!["ran", "off"]);
  }

  #[test]
  fn test_duplicates_dropped() {
    let mut rules = holmes_rules();
    rules.push(Rule::terminal("N", "holmes"));
    rules.push(Rule::terminal("N", "day"));
    let g = Grammar::new("S", rules).unwrap();

    let words = g
      .rules_for("N")
      .iter()
      .filter_map(|r| r.word())
      .collect::<Vec<_>>();
    assert_eq!(words, vec!["holmes", "day"]);
    assert_eq!(g.rules().len(), 6);
  }

  #[test]
  fn test_undefined_symbol() {
    let mut rules = holmes_rules();
    rules.push(Rule::nonterminal("VP", &["V", "PP"]));
    assert_eq!(
      Grammar::new("S", rules).unwrap_err(),
      GrammarError::UndefinedSymbol {
        symbol: "PP".to_string(),
        referenced_by: "VP -> V PP".to_string(),
      }
    );
  }

  #[test]
  fn test_missing_start() {
    assert_eq!(
      Grammar::new("ROOT", holmes_rules()).unwrap_err(),
      GrammarError::MissingStart {
        symbol: "ROOT".to_string()
      }
    );
    assert_eq!(Grammar::new("S", Vec::new()).unwrap_err(), GrammarError::Empty);
  }

  #[test]
  fn test_unit_cycle() {
    let mut rules = holmes_rules();
    rules.push(Rule::nonterminal("N", &["X"]));
    rules.push(Rule::nonterminal("X", &["NP"]));
    assert_eq!(
      Grammar::new("S", rules).unwrap_err(),
      GrammarError::UnitCycle {
        symbols: vec!["NP".to_string(), "N".to_string(), "X".to_string()]
      }
    );

    // recursion through a longer rule is fine
    let mut rules = holmes_rules();
    rules.push(Rule::nonterminal("NP", &["NP", "NP"]));
    assert!(Grammar::new("S", rules).is_ok());
  }

  #[test]
  fn test_mixed_rule() {
    let mut rules = holmes_rules();
    rules.push(Rule::new(
      crate::rules::Symbol::new("VP"),
      vec![
        Production::Nonterminal(crate::rules::Symbol::new("V")),
        Production::Terminal("home".to_string()),
      ],
    ));
    assert!(matches!(
      Grammar::new("S", rules),
      Err(GrammarError::MixedRule { .. })
    ));
  }

  #[test]
  fn test_sentences_grammar() {
    let g = Grammar::sentences().unwrap();
    assert_eq!(g.start(), "S");
    assert!(g.is_terminal_word("holmes"));
    assert!(g.is_terminal_word("thursday"));
    // "home" is both a noun and a verb
    assert!(g.rules_for("N").iter().any(|r| r.word() == Some("home")));
    assert!(g.rules_for("V").iter().any(|r| r.word() == Some("home")));
  }
}
