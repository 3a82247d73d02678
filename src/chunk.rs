use crate::syntree::SynTree;

pub const NOUN_PHRASE: &str = "NP";

/// The topmost subtrees labeled `label`, left to right. A matching subtree
/// inside one that's already been picked is skipped, so the result never
/// holds two nested chunks.
pub fn chunks<'t, T, U>(tree: &'t SynTree<T, U>, label: &str) -> Vec<&'t SynTree<T, U>>
where
  T: AsRef<str>,
{
  let mut found: Vec<&SynTree<T, U>> = Vec::new();

  // pre-order visits a parent before anything inside it
  for subtree in tree.subtrees() {
    let matches = subtree
      .get_branch()
      .is_some_and(|(cons, _)| cons.value.as_ref() == label);
    if matches && !found.iter().any(|chunk| chunk.contains(subtree)) {
      found.push(subtree);
    }
  }

  found
}

/// Maximal noun phrases of a parse tree
pub fn np_chunks<T, U>(tree: &SynTree<T, U>) -> Vec<&SynTree<T, U>>
where
  T: AsRef<str>,
{
  chunks(tree, NOUN_PHRASE)
}
