//! Typed records and sort comparators

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A typed record held by a store
///
/// The identifier is unique within a collection and immutable after
/// creation. `field` exposes the record's sortable fields by name.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// A sortable field value
///
/// Same-variant values order naturally; mixed variants fall back to the
/// declaration order here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Time(DateTime<Utc>),
}

/// Total order over two records of a collection
pub enum Comparator<M> {
    /// Order by a named field; `descending` reverses
    Field { name: String, descending: bool },
    /// Arbitrary ordering function
    Custom(Arc<dyn Fn(&M, &M) -> Ordering + Send + Sync>),
}

impl<M: Record> Comparator<M> {
    /// Build a field comparator from a spec such as `"id"` or `"-id"`
    /// (leading `-` sorts descending)
    pub fn by_field(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(name) => Comparator::Field {
                name: name.to_string(),
                descending: true,
            },
            None => Comparator::Field {
                name: spec.to_string(),
                descending: false,
            },
        }
    }

    /// Wrap an ordering function
    pub fn custom(cmp: impl Fn(&M, &M) -> Ordering + Send + Sync + 'static) -> Self {
        Comparator::Custom(Arc::new(cmp))
    }

    /// Compare two records; records missing the field sort first
    pub fn compare(&self, a: &M, b: &M) -> Ordering {
        match self {
            Comparator::Field { name, descending } => {
                let ordering = a.field(name).cmp(&b.field(name));
                if *descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
            Comparator::Custom(cmp) => cmp(a, b),
        }
    }
}

impl<M> Clone for Comparator<M> {
    fn clone(&self) -> Self {
        match self {
            Comparator::Field { name, descending } => Comparator::Field {
                name: name.clone(),
                descending: *descending,
            },
            Comparator::Custom(cmp) => Comparator::Custom(cmp.clone()),
        }
    }
}

impl<M> std::fmt::Debug for Comparator<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparator::Field { name, descending } => f
                .debug_struct("Field")
                .field("name", name)
                .field("descending", descending)
                .finish(),
            Comparator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        id: String,
        weight: Option<i64>,
    }

    impl Record for Item {
        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(FieldValue::Str(self.id.clone())),
                "weight" => self.weight.map(FieldValue::Int),
                _ => None,
            }
        }
    }

    fn item(id: &str, weight: Option<i64>) -> Item {
        Item {
            id: id.to_string(),
            weight,
        }
    }

    #[test]
    fn test_by_field_ascending() {
        let cmp: Comparator<Item> = Comparator::by_field("id");
        assert_eq!(
            cmp.compare(&item("a", None), &item("b", None)),
            Ordering::Less
        );
    }

    #[test]
    fn test_by_field_descending() {
        let cmp: Comparator<Item> = Comparator::by_field("-id");
        assert_eq!(
            cmp.compare(&item("a", None), &item("b", None)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_missing_field_sorts_first() {
        let cmp: Comparator<Item> = Comparator::by_field("weight");
        assert_eq!(
            cmp.compare(&item("a", None), &item("b", Some(1))),
            Ordering::Less
        );
    }

    #[test]
    fn test_custom_comparator() {
        let cmp: Comparator<Item> =
            Comparator::custom(|a: &Item, b: &Item| b.id.cmp(&a.id));
        assert_eq!(
            cmp.compare(&item("a", None), &item("b", None)),
            Ordering::Greater
        );
    }
}
