//! Query model evaluated by transports.
//!
//! A [`Query`] is a conjunction of field [`Predicate`]s with optional ordering, cursor
//! bounds on the ordered field, and a result limit. It carries no collection; the access
//! layer pairs it with a [`CollectionRef`](crate::collection::CollectionRef) per call.
//!
//! # Example
//!
//! ```ignore
//! use docaccess::query::{Query, Comparison, Direction};
//!
//! let query = Query::new()
//!     .filter("status", Comparison::Eq, "active")
//!     .filter("age", Comparison::Gte, 18)
//!     .order_by("name", Direction::Asc)
//!     .limit(20);
//! ```

use bson::Bson;

/// Upper sentinel appended to a prefix to bound a range scan.
pub const PREFIX_SENTINEL: char = '\u{f8ff}';

/// Comparison operators for field predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    /// The array field contains the value.
    ArrayContains,
    /// The array field contains at least one of the values in the given array.
    ArrayContainsAny,
    /// The field equals one of the values in the given array.
    In,
    /// The field equals none of the values in the given array.
    NotIn,
}

/// A single `field <op> value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: Comparison,
    pub value: Bson,
}

/// Sort direction for ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Ordering of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

/// A structured document query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Conditions a document must all satisfy.
    pub predicates: Vec<Predicate>,
    pub order: Option<Order>,
    /// Inclusive lower cursor on the ordered field.
    pub start_at: Option<Bson>,
    /// Inclusive upper cursor on the ordered field.
    pub end_at: Option<Bson>,
    pub limit: Option<usize>,
}

impl Query {
    /// A query matching every document in a collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents whose string `field` starts with `term`, ordered by that field.
    pub fn prefix(field: impl Into<String>, term: &str) -> Self {
        Query::new()
            .order_by(field, Direction::Asc)
            .start_at(term)
            .end_at(format!("{term}{PREFIX_SENTINEL}"))
    }

    /// Adds a predicate. Predicates are combined with logical AND.
    pub fn filter(mut self, field: impl Into<String>, op: Comparison, value: impl Into<Bson>) -> Self {
        self.predicates.push(Predicate { field: field.into(), op, value: value.into() });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Order { field: field.into(), direction });
        self
    }

    /// Sets the lower cursor. Only meaningful together with [`Query::order_by`].
    pub fn start_at(mut self, value: impl Into<Bson>) -> Self {
        self.start_at = Some(value.into());
        self
    }

    /// Sets the upper cursor. Only meaningful together with [`Query::order_by`].
    pub fn end_at(mut self, value: impl Into<Bson>) -> Self {
        self.end_at = Some(value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether the query places no restriction on the collection.
    pub fn is_unrestricted(&self) -> bool {
        self.predicates.is_empty()
            && self.start_at.is_none()
            && self.end_at.is_none()
            && self.limit.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_predicates() {
        let query = Query::new()
            .filter("status", Comparison::Eq, "active")
            .filter("age", Comparison::Gte, 18)
            .limit(5);

        assert_eq!(query.predicates.len(), 2);
        assert_eq!(query.predicates[1].op, Comparison::Gte);
        assert_eq!(query.predicates[1].value, Bson::Int32(18));
        assert_eq!(query.limit, Some(5));
        assert!(!query.is_unrestricted());
    }

    #[test]
    fn prefix_bounds_the_ordered_field() {
        let query = Query::prefix("name", "Mil");
        assert_eq!(query.order, Some(Order { field: "name".into(), direction: Direction::Asc }));
        assert_eq!(query.start_at, Some(Bson::String("Mil".into())));
        assert_eq!(query.end_at, Some(Bson::String("Mil\u{f8ff}".into())));
    }

    #[test]
    fn new_query_is_unrestricted() {
        assert!(Query::new().is_unrestricted());
        assert!(Query::new().order_by("name", Direction::Desc).is_unrestricted());
    }
}
