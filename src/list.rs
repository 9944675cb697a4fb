//! `List`: a materialized sequence.

use itertools::Itertools;
use std::ops::Deref;

use crate::error::Result;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct List<T>(Vec<T>);

impl<T> List<T> {
    pub fn new() -> Self {
        List(Vec::new())
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for List<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(values: Vec<T>) -> Self {
        List(values)
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        List(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<S: AsRef<str>> List<S> {
    /// Distinct strings in order of first appearance.
    pub fn unique_string(&self) -> Vec<String> {
        self.iter()
            .map(AsRef::<str>::as_ref)
            .unique()
            .map(str::to_string)
            .collect()
    }

    /// All strings, sorted lexicographically. Duplicates are kept.
    pub fn sort_string(&self) -> Vec<String> {
        self.iter()
            .map(|s| s.as_ref().to_string())
            .sorted()
            .collect()
    }
}

impl List<Value> {
    /// [`List::unique_string`] for dynamically typed elements; fails on the
    /// first element that is not a string.
    pub fn try_unique_string(&self) -> Result<Vec<String>> {
        let strings = self.iter().map(Value::as_str).collect::<Result<Vec<_>>>()?;
        Ok(strings.into_iter().unique().map(str::to_string).collect())
    }

    pub fn try_sort_string(&self) -> Result<Vec<String>> {
        let strings = self.iter().map(Value::as_str).collect::<Result<Vec<_>>>()?;
        Ok(strings.into_iter().sorted().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn letters() -> List<&'static str> {
        List::from(vec!["a", "a", "b", "c", "d", "c", "b"])
    }

    #[test]
    fn test_unique_string_keeps_first_order() {
        assert_eq!(letters().unique_string(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_string_keeps_duplicates() {
        let sorted = letters().sort_string();
        assert_eq!(sorted.len(), 7);
        assert_eq!(sorted[4], "c");
        assert_eq!(sorted, vec!["a", "a", "b", "b", "c", "c", "d"]);
    }

    #[test]
    fn test_value_strings() {
        let list: List<Value> = letters().into_iter().map(Value::from).collect();
        assert_eq!(list.try_unique_string().unwrap().len(), 4);
        assert_eq!(list.try_sort_string().unwrap()[6], "d");
    }

    #[test]
    fn test_value_strings_type_mismatch() {
        let list = List::from(vec![Value::from("a"), Value::from(1i32)]);
        assert!(matches!(
            list.try_unique_string(),
            Err(Error::TypeMismatch { found: "i32", .. })
        ));
    }

    #[test]
    fn test_deref_and_collect() {
        let list: List<i32> = (1..=3).collect();
        assert_eq!(list.len(), 3);
        assert_eq!(&list[..], &[1, 2, 3]);
        assert_eq!(List::<i32>::new(), List::default());
    }
}
