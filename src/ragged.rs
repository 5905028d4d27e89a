use std::slice;

use serde::{Deserialize, Serialize};

/// A ragged nested sequence.
///
/// A ragged value is either a leaf or a sequence of ragged values.
/// Sibling sequences can have different lengths at every level of
/// nesting and leaves can occur at any depth.
///
/// Nested literals can be constructed with the [`ragged!`] macro or
/// deserialized from nested arrays.
#[derive(Clone, Debug, Deserialize, Hash, Serialize)]
#[serde(untagged)]
pub enum Ragged<T> {
    Leaf(T),
    Seq(Vec<Ragged<T>>),
}

/// Construct a ragged value from a nested literal.
///
/// ```
/// use ragged_wordpieces::{ragged, Ragged};
///
/// let words: Ragged<&str> = ragged!([["don't"], ["tread", "lightly"]]);
/// assert_eq!(words.nested_row_lengths(), vec![vec![2], vec![1, 2]]);
/// ```
#[macro_export]
macro_rules! ragged {
    ([$($inner:tt),* $(,)?]) => {
        $crate::Ragged::Seq(vec![$($crate::ragged!($inner)),*])
    };
    ($leaf:expr) => {
        $crate::Ragged::Leaf($leaf)
    };
}

impl<T> Ragged<T> {
    /// Returns `true` if this value is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Ragged::Leaf(_))
    }

    /// Unwrap a leaf if present.
    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Ragged::Leaf(leaf) => Some(leaf),
            Ragged::Seq(_) => None,
        }
    }

    /// Get the element at `index` of a sequence.
    pub fn get(&self, index: usize) -> Option<&Ragged<T>> {
        match self {
            Ragged::Leaf(_) => None,
            Ragged::Seq(seq) => seq.get(index),
        }
    }

    /// The number of elements of a sequence, zero for a leaf.
    ///
    /// A leaf is not empty, see [`is_empty`](Ragged::is_empty).
    pub fn len(&self) -> usize {
        match self {
            Ragged::Leaf(_) => 0,
            Ragged::Seq(seq) => seq.len(),
        }
    }

    /// Returns `true` for a sequence without elements. A leaf is
    /// never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Ragged::Leaf(_) => false,
            Ragged::Seq(seq) => seq.is_empty(),
        }
    }

    /// The maximum nesting depth. A leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Ragged::Leaf(_) => 0,
            Ragged::Seq(seq) => 1 + seq.iter().map(Ragged::depth).max().unwrap_or(0),
        }
    }

    /// Row lengths at each level of nesting.
    ///
    /// Level `i` lists the lengths of all sequences at depth `i`, in
    /// order.
    pub fn nested_row_lengths(&self) -> Vec<Vec<usize>> {
        let mut lengths = Vec::new();
        self.collect_row_lengths(0, &mut lengths);
        lengths
    }

    fn collect_row_lengths(&self, level: usize, lengths: &mut Vec<Vec<usize>>) {
        if let Ragged::Seq(seq) = self {
            if lengths.len() == level {
                lengths.push(Vec::new());
            }
            lengths[level].push(seq.len());

            for child in seq {
                child.collect_row_lengths(level + 1, lengths);
            }
        }
    }

    /// The number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.leaves().count()
    }

    /// Iterate over the leaves, in order.
    pub fn leaves(&self) -> Leaves<'_, T> {
        match self {
            Ragged::Leaf(leaf) => Leaves {
                leaf: Some(leaf),
                stack: Vec::new(),
            },
            Ragged::Seq(seq) => Leaves {
                leaf: None,
                stack: vec![seq.iter()],
            },
        }
    }

    /// Map every leaf, keeping the shape.
    pub fn map<U, F>(self, mut f: F) -> Ragged<U>
    where
        F: FnMut(T) -> U,
    {
        self.map_inner(&mut f)
    }

    fn map_inner<U, F>(self, f: &mut F) -> Ragged<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            Ragged::Leaf(leaf) => Ragged::Leaf(f(leaf)),
            Ragged::Seq(seq) => {
                Ragged::Seq(seq.into_iter().map(|child| child.map_inner(f)).collect())
            }
        }
    }

    /// Map every leaf by reference, keeping the shape.
    pub fn map_ref<U, F>(&self, mut f: F) -> Ragged<U>
    where
        F: FnMut(&T) -> U,
    {
        self.map_ref_inner(&mut f)
    }

    fn map_ref_inner<U, F>(&self, f: &mut F) -> Ragged<U>
    where
        F: FnMut(&T) -> U,
    {
        match self {
            Ragged::Leaf(leaf) => Ragged::Leaf(f(leaf)),
            Ragged::Seq(seq) => {
                Ragged::Seq(seq.iter().map(|child| child.map_ref_inner(f)).collect())
            }
        }
    }

    /// Map every leaf by reference with a fallible function, keeping
    /// the shape. Stops at the first error.
    pub fn try_map_ref<U, E, F>(&self, mut f: F) -> Result<Ragged<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        self.try_map_ref_inner(&mut f)
    }

    fn try_map_ref_inner<U, E, F>(&self, f: &mut F) -> Result<Ragged<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        match self {
            Ragged::Leaf(leaf) => f(leaf).map(Ragged::Leaf),
            Ragged::Seq(seq) => seq
                .iter()
                .map(|child| child.try_map_ref_inner(f))
                .collect::<Result<_, _>>()
                .map(Ragged::Seq),
        }
    }

    /// Expand every leaf into a sequence of leaves.
    ///
    /// The result has one more level of nesting at every leaf. A leaf
    /// value expands into a sequence.
    pub fn flat_map<U, I, F>(self, mut f: F) -> Ragged<U>
    where
        F: FnMut(T) -> I,
        I: IntoIterator<Item = U>,
    {
        self.map(|leaf| Ragged::Seq(f(leaf).into_iter().map(Ragged::Leaf).collect()))
            .flatten_leaves()
    }

    /// Expand every leaf by reference into a sequence of leaves.
    pub fn flat_map_ref<U, I, F>(&self, mut f: F) -> Ragged<U>
    where
        F: FnMut(&T) -> I,
        I: IntoIterator<Item = U>,
    {
        self.map_ref(|leaf| Ragged::Seq(f(leaf).into_iter().map(Ragged::Leaf).collect()))
            .flatten_leaves()
    }
}

impl<T> Ragged<Ragged<T>> {
    /// Replace every leaf by the ragged value it holds.
    pub fn flatten_leaves(self) -> Ragged<T> {
        match self {
            Ragged::Leaf(inner) => inner,
            Ragged::Seq(seq) => Ragged::Seq(seq.into_iter().map(Ragged::flatten_leaves).collect()),
        }
    }
}

impl<T> From<Vec<Ragged<T>>> for Ragged<T> {
    fn from(seq: Vec<Ragged<T>>) -> Self {
        Ragged::Seq(seq)
    }
}

impl<T, U> PartialEq<Ragged<U>> for Ragged<T>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Ragged<U>) -> bool {
        match (self, other) {
            (Ragged::Leaf(l), Ragged::Leaf(r)) => l == r,
            (Ragged::Seq(l), Ragged::Seq(r)) => {
                l.len() == r.len() && l.iter().zip(r).all(|(l, r)| l == r)
            }
            _ => false,
        }
    }
}

impl<T> Eq for Ragged<T> where T: Eq {}

/// In-order iterator over the leaves of a ragged value.
pub struct Leaves<'a, T> {
    leaf: Option<&'a T>,
    stack: Vec<slice::Iter<'a, Ragged<T>>>,
}

impl<'a, T> Iterator for Leaves<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(leaf) = self.leaf.take() {
            return Some(leaf);
        }

        while let Some(iter) = self.stack.last_mut() {
            match iter.next() {
                Some(Ragged::Leaf(leaf)) => return Some(leaf),
                Some(Ragged::Seq(seq)) => self.stack.push(seq.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::Ragged;

    #[test]
    fn literal_shape() {
        let words: Ragged<&str> = ragged!([[["don't"], ["treadness"]], [["you", "hello"]], []]);

        assert_eq!(words.depth(), 3);
        assert_eq!(words.len(), 3);
        assert_eq!(words.num_leaves(), 4);
        assert_eq!(
            words.nested_row_lengths(),
            vec![vec![3], vec![2, 1, 0], vec![1, 1, 2]]
        );
        assert_eq!(
            words.leaves().cloned().collect::<Vec<_>>(),
            vec!["don't", "treadness", "you", "hello"]
        );
        assert_eq!(
            words.get(1).and_then(|r| r.get(0)).and_then(|r| r.get(1)).and_then(Ragged::as_leaf),
            Some(&"hello")
        );
    }

    #[test]
    fn leaf_is_not_empty() {
        let leaf: Ragged<&str> = ragged!("tread");
        assert_eq!(leaf.len(), 0);
        assert!(!leaf.is_empty());

        let empty: Ragged<&str> = ragged!([]);
        assert!(empty.is_empty());
        let nested_empty: Ragged<&str> = ragged!([[]]);
        assert!(!nested_empty.is_empty());
    }

    #[test]
    fn scalar_is_a_leaf() {
        let word: Ragged<&str> = ragged!("купиха");

        assert!(word.is_leaf());
        assert_eq!(word.depth(), 0);
        assert!(word.nested_row_lengths().is_empty());
        assert_eq!(word.leaves().collect::<Vec<_>>(), vec![&"купиха"]);
    }

    #[test]
    fn flat_map_adds_a_dimension() {
        let words: Ragged<&str> = ragged!([["ab", ""], ["c"]]);
        let chars = words.flat_map_ref(|word| word.chars().collect::<Vec<_>>());

        let expected: Ragged<char> = ragged!([[['a', 'b'], []], [['c']]]);
        assert_eq!(chars, expected);

        let scalar: Ragged<&str> = ragged!("ab");
        let expected: Ragged<char> = ragged!(['a', 'b']);
        assert_eq!(scalar.flat_map(|word| word.chars().collect::<Vec<_>>()), expected);
    }

    #[test]
    fn cross_type_equality() {
        let borrowed: Ragged<&str> = ragged!([["a"], []]);
        let owned: Ragged<String> = borrowed.map_ref(|s| s.to_string());
        assert_eq!(owned, borrowed);

        let different: Ragged<&str> = ragged!([["a"], ["b"]]);
        assert_ne!(owned, different);
        let leaf: Ragged<&str> = ragged!("a");
        assert_ne!(owned, leaf);
    }

    #[test]
    fn try_map_ref_stops_at_error() {
        let numbers: Ragged<i32> = ragged!([[1, 2], [3]]);

        let doubled: Result<Ragged<i32>, String> = numbers.try_map_ref(|&n| Ok(n * 2));
        let expected: Ragged<i32> = ragged!([[2, 4], [6]]);
        assert_eq!(doubled.unwrap(), expected);

        let failed: Result<Ragged<i32>, String> =
            numbers.try_map_ref(|&n| if n == 2 { Err("two".to_string()) } else { Ok(n) });
        assert_eq!(failed.unwrap_err(), "two");
    }

    #[test]
    fn deserialize_nested_arrays() {
        let words: Ragged<String> =
            serde_json::from_str(r#"[["don't"], ["tread", "lightly"]]"#).unwrap();
        let expected: Ragged<&str> = ragged!([["don't"], ["tread", "lightly"]]);
        assert_eq!(words, expected);

        let scalar: Ragged<String> = serde_json::from_str(r#""tread""#).unwrap();
        assert_eq!(scalar, Ragged::Leaf("tread"));
    }

    fn nest(leaves: &[u8], splits: &[u8]) -> Ragged<u8> {
        // Build an irregular tree from the split sizes.
        let mut rows: Vec<Ragged<u8>> = Vec::new();
        let mut remaining = leaves;
        for &split in splits {
            let n = (split as usize % 4).min(remaining.len());
            let (row, rest) = remaining.split_at(n);
            let row = Ragged::Seq(row.iter().cloned().map(Ragged::Leaf).collect());
            rows.push(Ragged::Seq(vec![row]));
            remaining = rest;
        }
        rows.push(Ragged::Seq(remaining.iter().cloned().map(Ragged::Leaf).collect()));
        Ragged::Seq(rows)
    }

    quickcheck! {
        fn leaves_in_order_prop(leaves: Vec<u8>, splits: Vec<u8>) -> bool {
            let ragged = nest(&leaves, &splits);
            ragged.leaves().cloned().collect::<Vec<_>>() == leaves
                && ragged.num_leaves() == leaves.len()
        }
    }

    quickcheck! {
        fn map_preserves_shape_prop(leaves: Vec<u8>, splits: Vec<u8>) -> bool {
            let ragged = nest(&leaves, &splits);
            let mapped = ragged.map_ref(|&leaf| leaf as u32 + 1);
            mapped.nested_row_lengths() == ragged.nested_row_lengths()
                && mapped.leaves().zip(ragged.leaves()).all(|(&m, &l)| m == l as u32 + 1)
        }
    }
}
