use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
  pub name: String,
}

impl Symbol {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Production {
  Terminal(String),
  Nonterminal(Symbol),
}

impl Production {
  pub fn symbol_str(&self) -> &str {
    match self {
      Self::Terminal(s) => s,
      Self::Nonterminal(s) => &s.name,
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Terminal(_))
  }

  pub fn is_nonterminal(&self) -> bool {
    matches!(self, Self::Nonterminal(_))
  }
}

impl fmt::Display for Production {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Terminal(s) => write!(f, "{:?}", s),
      Self::Nonterminal(s) => write!(f, "{}", s),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
  pub symbol: Symbol,
  pub productions: Vec<Production>,
}

impl Rule {
  pub fn new(symbol: Symbol, productions: Vec<Production>) -> Self {
    Self {
      symbol,
      productions,
    }
  }

  /// `X -> "word"`
  pub fn terminal(symbol: &str, word: &str) -> Self {
    Self::new(Symbol::new(symbol), vec![Production::Terminal(word.to_string())])
  }

  /// `X -> Y1 Y2 ... Yk`
  pub fn nonterminal(symbol: &str, children: &[&str]) -> Self {
    Self::new(
      Symbol::new(symbol),
      children
        .iter()
        .map(|c| Production::Nonterminal(Symbol::new(*c)))
        .collect(),
    )
  }

  pub fn len(&self) -> usize {
    self.productions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn symbol_str(&self) -> &str {
    &self.symbol.name
  }

  /// The word this rule produces, if it's a terminal rule
  pub fn word(&self) -> Option<&str> {
    match self.productions.as_slice() {
      [Production::Terminal(w)] => Some(w),
      _ => None,
    }
  }

  /// A rule with a single nonterminal on the right, like `NP -> N`
  pub fn unit_target(&self) -> Option<&str> {
    match self.productions.as_slice() {
      [Production::Nonterminal(s)] => Some(&s.name),
      _ => None,
    }
  }

  /// Terminals only ever appear alone on the right-hand side
  pub fn is_mixed(&self) -> bool {
    self.len() > 1 && self.productions.iter().any(Production::is_terminal)
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.symbol)?;
    for p in self.productions.iter() {
      write!(f, " {}", p)?;
    }
    Ok(())
  }
}
