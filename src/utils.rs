use std::error::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// Takes a list where each element is a set of choices, and returns all the possible sets
/// generated, leftmost choice varying slowest. Will clone the elements.
///
/// ```
/// let v = vec![&[1][..], &[2, 3][..], &[4][..], &[5, 6][..]];
///
/// assert_eq!(npchunk::utils::combinations(&v), vec![
///   vec![1, 2, 4, 5],
///   vec![1, 2, 4, 6],
///   vec![1, 3, 4, 5],
///   vec![1, 3, 4, 6],
/// ]);
/// ```
pub fn combinations<T>(list: &[&[T]]) -> Vec<Vec<T>>
where
  T: Clone,
{
  match list.split_first() {
    None => Vec::new(),
    Some((head, [])) => head.iter().map(|e| vec![e.clone()]).collect(),
    Some((head, tail)) => {
      let rest = combinations(tail);
      head
        .iter()
        .flat_map(|h| {
          // prepend every element of the head to every possible subseq
          rest.iter().map(move |subseq| {
            let mut newseq = Vec::with_capacity(subseq.len() + 1);
            newseq.push(h.clone());
            newseq.extend(subseq.iter().cloned());
            newseq
          })
        })
        .collect()
    }
  }
}
