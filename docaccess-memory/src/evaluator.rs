//! Query evaluation over in-memory documents.
//!
//! Applies a [`Query`] to a sequence of stored documents: predicates first, then
//! ordering, cursor bounds and the limit, in that order.

use std::{cmp::Ordering, collections::HashMap};

use bson::{Bson, Document, datetime::DateTime};

use docaccess_core::{
    error::{ProviderError, codes},
    query::{Comparison, Direction, Predicate, Query},
};

/// Type-erased, comparable view of a BSON value.
///
/// All numeric types are normalized to `f64`. Values of different kinds are never
/// equal and have no ordering between them.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(values) => Comparable::Array(values.iter().map(Comparable::from).collect()),
            Bson::Document(document) => Comparable::Map(
                document
                    .iter()
                    .map(|(key, value)| (key.as_str(), Comparable::from(value)))
                    .collect(),
            ),
            _ => Comparable::Null,
        }
    }
}

impl PartialEq for Comparable<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Comparable<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Whether `document` satisfies `predicate`. A missing field never matches.
pub(crate) fn matches(document: &Document, predicate: &Predicate) -> bool {
    let Some(field) = document.get(&predicate.field) else {
        return false;
    };

    let left = Comparable::from(field);
    let right = Comparable::from(&predicate.value);

    match predicate.op {
        Comparison::Eq => left == right,
        Comparison::Ne => left != right,
        Comparison::Lt => left.partial_cmp(&right) == Some(Ordering::Less),
        Comparison::Lte => matches!(left.partial_cmp(&right), Some(Ordering::Less | Ordering::Equal)),
        Comparison::Gt => left.partial_cmp(&right) == Some(Ordering::Greater),
        Comparison::Gte => {
            matches!(left.partial_cmp(&right), Some(Ordering::Greater | Ordering::Equal))
        }
        Comparison::ArrayContains => match left {
            Comparable::Array(items) => items.contains(&right),
            _ => false,
        },
        Comparison::ArrayContainsAny => match (left, right) {
            (Comparable::Array(items), Comparable::Array(candidates)) => {
                candidates.iter().any(|candidate| items.contains(candidate))
            }
            _ => false,
        },
        Comparison::In => match right {
            Comparable::Array(candidates) => candidates.contains(&left),
            _ => false,
        },
        Comparison::NotIn => match right {
            Comparable::Array(candidates) => !candidates.contains(&left),
            _ => false,
        },
    }
}

/// Applies `query` to `documents`, returning the ids and documents that survive in
/// result order.
///
/// # Errors
///
/// Cursor bounds without an ordering are rejected with
/// [`codes::INVALID_ARGUMENT`].
pub(crate) fn evaluate<'a>(
    documents: impl IntoIterator<Item = (&'a String, &'a Document)>,
    query: &Query,
) -> Result<Vec<(&'a String, &'a Document)>, ProviderError> {
    if query.order.is_none() && (query.start_at.is_some() || query.end_at.is_some()) {
        return Err(ProviderError::new(
            codes::INVALID_ARGUMENT,
            "cursor bounds require an order_by field",
        ));
    }

    let mut selected: Vec<_> = documents
        .into_iter()
        .filter(|(_, document)| query.predicates.iter().all(|predicate| matches(document, predicate)))
        .collect();

    if let Some(order) = &query.order {
        // Documents without the ordered field are not part of an ordered result.
        selected.retain(|(_, document)| document.contains_key(&order.field));

        selected.sort_by(|(_, a), (_, b)| {
            let left = a.get(&order.field).map(Comparable::from).unwrap_or(Comparable::Null);
            let right = b.get(&order.field).map(Comparable::from).unwrap_or(Comparable::Null);
            let ordering = left.partial_cmp(&right).unwrap_or(Ordering::Equal);

            match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });

        selected.retain(|(_, document)| {
            let Some(value) = document.get(&order.field).map(Comparable::from) else {
                return false;
            };
            within(&value, query.start_at.as_ref(), order.direction, Bound::Start)
                && within(&value, query.end_at.as_ref(), order.direction, Bound::End)
        });
    }

    if let Some(limit) = query.limit {
        selected.truncate(limit);
    }

    Ok(selected)
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Inclusive cursor check in the direction of the ordering.
fn within(value: &Comparable<'_>, cursor: Option<&Bson>, direction: Direction, bound: Bound) -> bool {
    let Some(cursor) = cursor else {
        return true;
    };

    let Some(ordering) = value.partial_cmp(&Comparable::from(cursor)) else {
        return false;
    };

    match (bound, direction) {
        (Bound::Start, Direction::Asc) | (Bound::End, Direction::Desc) => ordering != Ordering::Less,
        (Bound::End, Direction::Asc) | (Bound::Start, Direction::Desc) => ordering != Ordering::Greater,
    }
}
