//! Sort keys and the stable sort pass.

use core::cmp::Ordering;

/// Comparator for one user-selectable sort option.
pub trait SortKey<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Keeps the filtered order untouched.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct NoSort;

impl<T> SortKey<T> for NoSort {
    fn compare(&self, _a: &T, _b: &T) -> Ordering {
        Ordering::Equal
    }
}

/// Reverses another key. Ties stay in input order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Descending<S>(pub S);

impl<T, S: SortKey<T>> SortKey<T> for Descending<S> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T, S: SortKey<T> + ?Sized> SortKey<T> for &S {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (**self).compare(a, b)
    }
}

/// Stable in-place sort; records equal under `key` keep their relative order.
pub fn sort_stable<T, S>(rows: &mut [&T], key: &S)
where
    S: SortKey<T> + ?Sized,
{
    rows.sort_by(|a, b| key.compare(a, b));
}

/// Case-insensitive text ordering, falling back to byte order so that
/// `"apple"` and `"Apple"` still compare deterministically.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Total order over `f64` for numeric sort keys such as ratings.
pub fn compare_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ByLen;
    impl SortKey<&'static str> for ByLen {
        fn compare(&self, a: &&'static str, b: &&'static str) -> Ordering {
            a.len().cmp(&b.len())
        }
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let data = ["bb", "a1", "ccc", "a2", "dd"];
        let mut rows: Vec<&&str> = data.iter().collect();
        sort_stable(&mut rows, &ByLen);
        let out: Vec<&str> = rows.into_iter().copied().collect();
        assert_eq!(out, vec!["a1", "a2", "bb", "dd", "ccc"]);
    }

    #[test]
    fn descending_keeps_ties_in_input_order() {
        let data = ["a1", "ccc", "a2"];
        let mut rows: Vec<&&str> = data.iter().collect();
        sort_stable(&mut rows, &Descending(ByLen));
        let out: Vec<&str> = rows.into_iter().copied().collect();
        assert_eq!(out, vec!["ccc", "a1", "a2"]);
    }

    #[test]
    fn text_comparison_ignores_case_first() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Zebra", "apple"), Ordering::Greater);
        assert_ne!(compare_text("Apple", "apple"), Ordering::Equal);
    }
}
