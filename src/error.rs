use std::fmt;

/// The token sequence can't be searched at all. Nothing is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
  /// Zero tokens
  Empty,
  /// A token without a single alphabetic character
  NotAWord { index: usize, token: String },
  /// Tokens that no terminal rule of the grammar produces, in input order
  Uncovered(Vec<String>),
}

impl fmt::Display for InputError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Empty => write!(f, "no words to parse: at least one token is required"),
      Self::NotAWord { index, token } => {
        write!(f, "token {} ({:?}) contains no alphabetic character", index, token)
      }
      Self::Uncovered(words) => {
        write!(f, "grammar does not cover some of the input words: ")?;
        for (idx, w) in words.iter().enumerate() {
          if idx > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{:?}", w)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for InputError {}

/// The grammar itself is broken. These are configuration problems, distinct
/// from a sentence the grammar simply doesn't generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
  Empty,
  EmptyRule { symbol: String },
  /// A terminal appears in a rule next to other productions
  MixedRule { rule: String },
  MissingStart { symbol: String },
  UndefinedSymbol { symbol: String, referenced_by: String },
  /// Unit rules that lead from a symbol back to itself, e.g. `A -> B`, `B -> A`
  UnitCycle { symbols: Vec<String> },
  Syntax { line: usize, message: String },
}

impl fmt::Display for GrammarError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Empty => write!(f, "empty ruleset"),
      Self::EmptyRule { symbol } => write!(f, "rule for {} has no productions", symbol),
      Self::MixedRule { rule } => {
        write!(f, "rule `{}` mixes a terminal with other productions", rule)
      }
      Self::MissingStart { symbol } => write!(f, "no rules for start symbol {}", symbol),
      Self::UndefinedSymbol {
        symbol,
        referenced_by,
      } => write!(
        f,
        "missing rules for symbol {} (referenced by `{}`)",
        symbol, referenced_by
      ),
      Self::UnitCycle { symbols } => {
        let first = symbols.first().map(String::as_str).unwrap_or_default();
        write!(f, "cycle of unit rules: {} -> {}", symbols.join(" -> "), first)
      }
      Self::Syntax { line, message } => write!(f, "line {}: {}", line, message),
    }
  }
}

impl std::error::Error for GrammarError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
  Input(InputError),
  Grammar(GrammarError),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Input(e) => write!(f, "invalid input: {}", e),
      Self::Grammar(e) => write!(f, "grammar error: {}", e),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Input(e) => Some(e),
      Self::Grammar(e) => Some(e),
    }
  }
}

impl From<InputError> for Error {
  fn from(e: InputError) -> Self {
    Self::Input(e)
  }
}

impl From<GrammarError> for Error {
  fn from(e: GrammarError) -> Self {
    Self::Grammar(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages() {
    let e: Error = InputError::Uncovered(vec!["zebra".to_string(), "ran".to_string()]).into();
    assert_eq!(
      e.to_string(),
      r#"invalid input: grammar does not cover some of the input words: "zebra", "ran""#
    );

    let e = GrammarError::UnitCycle {
      symbols: vec!["A".to_string(), "B".to_string()],
    };
    assert_eq!(e.to_string(), "cycle of unit rules: A -> B -> A");
  }
}
