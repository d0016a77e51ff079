// Ranking - Multi-key ordering with explicit directions and a limit
//
// Sorting is stable: rows that tie on every key keep their input order.
// Floats compare with `total_cmp`, so NaN never breaks the ordering.

use std::cmp::Ordering;

/// Order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    }
}

type Comparator<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync + 'a>;

/// Ranking builder
///
/// Example:
/// ```
/// use skillgraph_analytics::{Order, Ranking};
///
/// let rows = vec![("sql", 3), ("python", 3), ("r", 1)];
/// let ranked = Ranking::new()
///     .order_by_key(|row: &(&str, u32)| row.1, Order::Desc)
///     .order_by(|a, b| a.0.cmp(b.0), Order::Asc)
///     .limit(2)
///     .apply(rows);
/// assert_eq!(ranked, vec![("python", 3), ("sql", 3)]);
/// ```
pub struct Ranking<'a, T> {
    keys: Vec<(Comparator<'a, T>, Order)>,
    limit: Option<usize>,
}

impl<'a, T> Default for Ranking<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> Ranking<'a, T> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            limit: None,
        }
    }

    /// Add a sort key given as a comparator
    pub fn order_by<F>(mut self, compare: F, order: Order) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'a,
    {
        self.keys.push((Box::new(compare), order));
        self
    }

    /// Add a sort key extracted as an `Ord` value
    pub fn order_by_key<K, F>(self, key: F, order: Order) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'a,
    {
        self.order_by(move |a, b| key(a).cmp(&key(b)), order)
    }

    /// Add a floating-point sort key
    pub fn order_by_float<F>(self, key: F, order: Order) -> Self
    where
        F: Fn(&T) -> f64 + Send + Sync + 'a,
    {
        self.order_by(move |a, b| key(a).total_cmp(&key(b)), order)
    }

    /// Keep at most `n` rows (0 = empty result)
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.keys
            .iter()
            .map(|(compare, order)| order.apply(compare(a, b)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Sort and truncate
    pub fn apply(&self, mut rows: Vec<T>) -> Vec<T> {
        if self.limit == Some(0) {
            return Vec::new();
        }
        if !self.keys.is_empty() {
            rows.sort_by(|a, b| self.compare(a, b));
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        rows
    }
}
