#[macro_use]
extern crate lazy_static;

pub mod chunk;
pub mod earley;
pub mod error;
pub mod forest;
pub mod grammar;
pub mod parse_grammar;
pub mod preprocess;
pub mod rules;
pub mod syntree;
pub mod utils;

use tracing::debug;

use crate::earley::{parse_chart, Chart};
use crate::forest::Forest;
pub use crate::chunk::{chunks, np_chunks};
pub use crate::error::{Error, GrammarError, InputError};
pub use crate::grammar::Grammar;
pub use crate::preprocess::preprocess;
pub use crate::syntree::SynTree;
pub use crate::utils::Err;

impl Grammar {
  /// Rejects input that can't be searched: no tokens, tokens that aren't
  /// words, or words the grammar has no terminal for.
  fn check_input(&self, input: &[&str]) -> Result<(), InputError> {
    if input.is_empty() {
      return Err(InputError::Empty);
    }

    if let Some((index, token)) = input
      .iter()
      .enumerate()
      .find(|(_, t)| !t.chars().any(char::is_alphabetic))
    {
      return Err(InputError::NotAWord {
        index,
        token: token.to_string(),
      });
    }

    let uncovered = self.uncovered(input);
    if !uncovered.is_empty() {
      return Err(InputError::Uncovered(uncovered));
    }

    Ok(())
  }

  pub fn parse_chart(&self, input: &[&str]) -> Result<Chart, Error> {
    self.check_input(input)?;
    Ok(parse_chart(self, input)?)
  }

  fn parse_forest(&self, input: &[&str]) -> Result<Forest, Error> {
    Ok(Forest::from(self.parse_chart(input)?))
  }

  /// Every parse tree of `input` rooted at the start symbol, each exactly
  /// once, in a deterministic order. A sentence the grammar doesn't generate
  /// gives an empty list; only unusable input or a broken grammar is an error.
  pub fn parse(&self, input: &[&str]) -> Result<Vec<SynTree<String, String>>, Error> {
    let forest = self.parse_forest(input)?;
    let trees = forest.trees(self, input);
    debug!(tokens = input.len(), trees = trees.len(), "parsed");
    Ok(trees)
  }
}
