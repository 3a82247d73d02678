use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tracing::debug;

use crate::earley::Chart;
use crate::grammar::Grammar;
use crate::rules::Rule;
use crate::syntree::{Constituent, SynTree, Word};
use crate::utils::combinations;

#[derive(Debug, Clone, PartialEq)]
pub struct ForestState {
  rule: Arc<Rule>,
  span: (usize, usize),
}

impl ForestState {
  pub fn new(rule: &Arc<Rule>, start: usize, end: usize) -> Self {
    Self {
      rule: rule.clone(),
      span: (start, end),
    }
  }
}

impl fmt::Display for ForestState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.rule)
  }
}

/// The completed states of a chart, indexed by the span they cover. A rule is
/// in the forest over `start..end` iff its symbol derives exactly those
/// tokens with it as the top rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
  len: usize,
  by_span: HashMap<(usize, usize), Vec<ForestState>>,
}

impl Forest {
  /// Number of input tokens
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn states_at(&self, start: usize, end: usize) -> &[ForestState] {
    self
      .by_span
      .get(&(start, end))
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Was `rule` completed over `start..end`?
  pub fn has_rule(&self, rule: &Rule, start: usize, end: usize) -> bool {
    self
      .states_at(start, end)
      .iter()
      .any(|s| *s.rule == *rule)
  }

  /// Can `symbol` derive exactly `start..end`?
  pub fn derives(&self, symbol: &str, start: usize, end: usize) -> bool {
    self
      .states_at(start, end)
      .iter()
      .any(|s| s.rule.symbol_str() == symbol)
  }

  /// All distinct trees for the grammar's start symbol over the whole input,
  /// ordered by rule declaration order, then by partition from left to
  /// right.
  pub fn trees(&self, g: &Grammar, input: &[&str]) -> Vec<SynTree<String, String>> {
    if self.is_empty() {
      return Vec::new();
    }

    let mut builder = TreeBuilder {
      forest: self,
      grammar: g,
      input,
      memo: HashMap::new(),
    };
    let trees = builder.derivations(g.start(), 0, self.len());
    debug!(
      memoized = builder.memo.len(),
      trees = trees.len(),
      "enumerated forest"
    );
    drop(builder);
    Rc::try_unwrap(trees).unwrap_or_else(|shared| shared.as_ref().clone())
  }
}

impl From<Chart> for Forest {
  fn from(chart: Chart) -> Self {
    // no rule can have its origin at the end of the string, so the input is
    // one shorter than the chart
    let len = chart.len().saturating_sub(1);
    let mut by_span: HashMap<(usize, usize), Vec<ForestState>> = HashMap::new();

    for (k, states) in chart.into_iter() {
      for state in states {
        // exclude unfinished rules that can't contribute to a tree
        if !state.lr0.is_active() {
          by_span
            .entry((state.origin, k))
            .or_default()
            .push(ForestState::new(&state.lr0.rule, state.origin, k));
        }
      }
    }

    Self { len, by_span }
  }
}

impl fmt::Display for Forest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for start in 0..self.len {
      writeln!(f, "Origin {}:", start)?;
      for end in start + 1..=self.len {
        for fs in self.states_at(start, end) {
          writeln!(f, "  {}", fs)?;
        }
      }
    }

    Ok(())
  }
}

type Tree = SynTree<String, String>;

/// Reads trees out of a forest. Each `(symbol, start, end)` is expanded once
/// and its trees are kept, so ambiguous sub-spans shared by many parents
/// aren't searched again.
struct TreeBuilder<'a> {
  forest: &'a Forest,
  grammar: &'a Grammar,
  input: &'a [&'a str],
  memo: HashMap<(&'a str, usize, usize), Rc<Vec<Tree>>>,
}

impl<'a> TreeBuilder<'a> {
  fn derivations(&mut self, symbol: &'a str, start: usize, end: usize) -> Rc<Vec<Tree>> {
    if let Some(trees) = self.memo.get(&(symbol, start, end)) {
      return trees.clone();
    }

    let (grammar, forest) = (self.grammar, self.forest);
    let mut trees = Vec::new();
    for rule in grammar.rules_for(symbol) {
      if !forest.has_rule(rule, start, end) {
        continue;
      }

      let cons = Constituent {
        value: symbol.to_string(),
        span: (start, end),
      };

      if rule.word().is_some() {
        let leaf = SynTree::Leaf(Word {
          value: self.input[start].to_string(),
          span: (start, end),
        });
        trees.push(SynTree::Branch(cons, vec![leaf]));
        continue;
      }

      for partition in self.partitions(rule, 0, start, end) {
        let child_sets = rule
          .productions
          .iter()
          .zip(partition)
          .map(|(p, (s, e))| self.derivations(p.symbol_str(), s, e))
          .collect::<Vec<_>>();
        let child_sets = child_sets.iter().map(|c| c.as_slice()).collect::<Vec<_>>();

        trees.extend(
          combinations(&child_sets)
            .into_iter()
            .map(|children| SynTree::Branch(cons.clone(), children)),
        );
      }
    }

    let trees = Rc::new(trees);
    self.memo.insert((symbol, start, end), trees.clone());
    trees
  }

  /// Every way to split `search_start..search_end` into non-empty spans, one
  /// per production of `rule` from `prod_idx` on, such that each production
  /// derives its span. Splits come out with earlier boundaries first.
  ///
  /// So for `S -> S S` over "x x x":
  ///
  /// ```text
  /// [[0..1, 1..3], [0..2, 2..3]]
  /// ```
  fn partitions(
    &self,
    rule: &'a Rule,
    prod_idx: usize,
    search_start: usize,
    search_end: usize,
  ) -> Vec<Vec<(usize, usize)>> {
    if prod_idx == rule.len() && search_start == search_end {
      // base case, we consumed the whole rule and the whole span together.
      // provide a single empty sequence as a base for prepending onto as we unwind the stack
      return vec![Vec::new()];
    } else if prod_idx == rule.len() || search_start == search_end {
      // we either ran out of productions before consuming everything, or ran out of stuff to consume before
      // satisfying all the productions. bail with 0 possible sequences.
      return Vec::new();
    }

    // leave at least one token for each production after this one
    let remaining = rule.len() - prod_idx - 1;
    if search_end - search_start < remaining + 1 {
      return Vec::new();
    }

    let wanted_symbol = rule.productions[prod_idx].symbol_str();
    let mut found = Vec::new();
    for mid in search_start + 1..=search_end - remaining {
      if !self.forest.derives(wanted_symbol, search_start, mid) {
        continue;
      }
      for mut rest in self.partitions(rule, prod_idx + 1, mid, search_end) {
        rest.insert(0, (search_start, mid));
        found.push(rest);
      }
    }
    found
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::earley::parse_chart;

  #[test]
  fn test_parse_chart() {
    let g: Grammar = r#"
      S -> "x"
      S -> S S
    "#
    .parse()
    .unwrap();

    let rule1 = g.rules_for("S").iter().find(|r| r.len() == 1).unwrap();
    let rule2 = g.rules_for("S").iter().find(|r| r.len() == 2).unwrap();

    let forest: Forest = parse_chart(&g, &["x", "x", "x"]).unwrap().into();
    println!("{}", forest);

    assert_eq!(forest.len(), 3);
    assert_eq!(forest.states_at(0, 1), &[ForestState::new(rule1, 0, 1)]);
    assert_eq!(forest.states_at(0, 2), &[ForestState::new(rule2, 0, 2)]);
    assert_eq!(forest.states_at(1, 3), &[ForestState::new(rule2, 1, 3)]);
    assert!(forest.derives("S", 0, 3));
    assert!(!forest.derives("S", 1, 1));
  }

  #[test]
  fn test_tree_generation() {
    // test the tree ambiguity problem that naive earley forest processing has
    // correct algorithm finds 2 trees:
    //  (S (S x) (S (S x) (S x)))           -> [x][xx]
    //  (S (S (S x) (S x)) (S x))           -> [xx][x]
    // naive algorithm finds 2 addl. spurious trees:
    //  (S (S x) (S x))                     -> [x][x]
    //  (S (S (S x) (S x)) (S (S x) (S x))) -> [xx][xx]
    let g: Grammar = r#"
      S -> "x"
      S -> S S
    "#
    .parse()
    .unwrap();

    let input = ["x", "x", "x"];
    let forest: Forest = parse_chart(&g, &input).unwrap().into();
    let trees = forest.trees(&g, &input);

    for tree in trees.iter() {
      println!("{}\n", tree);
    }

    assert_eq!(trees.len(), 2);
    // [x][xx] comes before [xx][x]
    assert_eq!(trees[0].children()[0].span(), (0, 1));
    assert_eq!(trees[1].children()[0].span(), (0, 2));
  }

  #[test]
  fn test_catalan_counts() {
    let g: Grammar = "S -> S S | \"x\"".parse().unwrap();

    // binary bracketings of n leaves
    for (n, expected) in [(1, 1), (2, 1), (3, 2), (4, 5), (5, 14), (6, 42), (8, 429)] {
      let input = vec!["x"; n];
      let forest: Forest = parse_chart(&g, &input).unwrap().into();
      assert_eq!(forest.trees(&g, &input).len(), expected, "n = {}", n);
    }
  }

  #[test]
  fn test_partitions_order() {
    let g: Grammar = "S -> S S | \"x\"".parse().unwrap();
    let input = ["x", "x", "x"];
    let forest: Forest = parse_chart(&g, &input).unwrap().into();
    let builder = TreeBuilder {
      forest: &forest,
      grammar: &g,
      input: &input,
      memo: HashMap::new(),
    };

    let rule = g.rules_for("S").iter().find(|r| r.len() == 2).unwrap();
    assert_eq!(
      builder.partitions(rule, 0, 0, 3),
      vec![vec![(0, 1), (1, 3)], vec![(0, 2), (2, 3)]]
    );
    assert!(builder.partitions(rule, 0, 0, 1).is_empty());
  }
}
