use std::fmt;
use std::ptr;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Constituent<T> {
  pub value: T,
  pub span: (usize, usize),
}

impl<T> fmt::Display for Constituent<T>
where
  T: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Word<U> {
  pub value: U,
  pub span: (usize, usize),
}

impl<U> fmt::Display for Word<U>
where
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

/// A parse tree. Branches are labeled with a grammar symbol, leaves hold
/// the input tokens. Every node owns its children; nothing is shared
/// between trees.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SynTree<T, U> {
  Branch(Constituent<T>, Vec<SynTree<T, U>>),
  Leaf(Word<U>),
}

impl<T, U> SynTree<T, U> {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn is_branch(&self) -> bool {
    matches!(self, Self::Branch(_, _))
  }

  pub fn get_leaf(&self) -> Option<&Word<U>> {
    match self {
      Self::Leaf(w) => Some(w),
      _ => None,
    }
  }

  pub fn get_branch(&self) -> Option<(&Constituent<T>, &Vec<SynTree<T, U>>)> {
    match self {
      Self::Branch(c, cs) => Some((c, cs)),
      _ => None,
    }
  }

  /// Children in order; always empty for a leaf
  pub fn children(&self) -> &[SynTree<T, U>] {
    match self {
      Self::Branch(_, children) => children,
      Self::Leaf(_) => &[],
    }
  }

  /// The token span `[start, end)` this node covers
  pub fn span(&self) -> (usize, usize) {
    match self {
      Self::Branch(c, _) => c.span,
      Self::Leaf(w) => w.span,
    }
  }

  /// Every node under (and including) this one, depth-first, parents before
  /// their children. Calling it again starts over.
  pub fn subtrees(&self) -> Subtrees<'_, T, U> {
    Subtrees { stack: vec![self] }
  }

  /// True if `other` is this very node or one of its descendants. This is
  /// identity, not structural equality: an equal tree built elsewhere isn't
  /// contained.
  pub fn contains(&self, other: &SynTree<T, U>) -> bool {
    self.subtrees().any(|t| ptr::eq(t, other))
  }

  /// The leaf tokens, left to right
  pub fn flatten(&self) -> Vec<&U> {
    self
      .subtrees()
      .filter_map(|t| t.get_leaf())
      .map(|w| &w.value)
      .collect()
  }
}

impl<T> SynTree<T, T> {
  /// The symbol of a branch, or the token of a leaf
  pub fn label(&self) -> &T {
    match self {
      Self::Branch(c, _) => &c.value,
      Self::Leaf(w) => &w.value,
    }
  }
}

/// Pre-order iterator returned by [`SynTree::subtrees`]
pub struct Subtrees<'a, T, U> {
  stack: Vec<&'a SynTree<T, U>>,
}

impl<'a, T, U> Iterator for Subtrees<'a, T, U> {
  type Item = &'a SynTree<T, U>;

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.stack.pop()?;
    self.stack.extend(node.children().iter().rev());
    Some(node)
  }
}

/// Bracketed, one child per line unless a node has a single short child:
///
/// ```text
/// (S
///   (NP (N holmes))
///   (VP (V sat)))
/// ```
impl<T, U> fmt::Display for SynTree<T, U>
where
  T: fmt::Display,
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(w) => write!(f, "{}", w.value),
      Self::Branch(c, ts) => {
        write!(f, "({}", c.value)?;
        for t in ts.iter() {
          let fmt = format!("{}", t);
          if ts.len() == 1 && !fmt.contains('\n') {
            write!(f, " {}", fmt)?;
          } else {
            for line in fmt.lines() {
              write!(f, "\n  {}", line)?;
            }
          }
        }
        write!(f, ")")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn branch(label: &str, span: (usize, usize), children: Vec<SynTree<String, String>>) -> SynTree<String, String> {
    SynTree::Branch(
      Constituent {
        value: label.to_string(),
        span,
      },
      children,
    )
  }

  fn leaf(word: &str, at: usize) -> SynTree<String, String> {
    SynTree::Leaf(Word {
      value: word.to_string(),
      span: (at, at + 1),
    })
  }

  fn holmes_sat() -> SynTree<String, String> {
    branch(
      "S",
      (0, 2),
      vec![
        branch("NP", (0, 1), vec![branch("N", (0, 1), vec![leaf("holmes", 0)])]),
        branch("VP", (1, 2), vec![branch("V", (1, 2), vec![leaf("sat", 1)])]),
      ],
    )
  }

  #[test]
  fn test_subtrees_preorder() {
    let tree = holmes_sat();
    let labels = tree.subtrees().map(|t| t.label().as_str()).collect::<Vec<_>>();
    assert_eq!(labels, vec!["S", "NP", "N", "holmes", "VP", "V", "sat"]);

    // restartable
    assert_eq!(tree.subtrees().count(), 7);
    assert_eq!(tree.subtrees().count(), 7);
  }

  #[test]
  fn test_flatten_and_children() {
    let tree = holmes_sat();
    assert_eq!(tree.flatten(), vec!["holmes", "sat"]);
    assert_eq!(tree.children().len(), 2);
    assert_eq!(tree.children()[1].flatten(), vec!["sat"]);
    assert!(leaf("sat", 1).children().is_empty());
    assert_eq!(tree.children()[1].span(), (1, 2));
  }

  #[test]
  fn test_contains_is_identity() {
    let tree = holmes_sat();
    let np = &tree.children()[0];
    let n = &np.children()[0];

    assert!(tree.contains(&tree));
    assert!(tree.contains(n));
    assert!(np.contains(n));
    assert!(!n.contains(np));
    assert!(!np.contains(&tree.children()[1]));

    let copy = np.clone();
    assert_eq!(&copy, np);
    assert!(!tree.contains(&copy));
  }

  #[test]
  fn test_display() {
    assert_eq!(
      holmes_sat().to_string(),
      "(S\n  (NP (N holmes))\n  (VP (V sat)))"
    );
  }
}
