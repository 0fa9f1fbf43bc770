//! Total ordering over JSON values and documents.
//!
//! Mirrors the cross-type ordering document stores use for `orderBy`:
//! null < booleans < numbers < strings < arrays < maps. Numbers compare by
//! value regardless of integer/float representation.

use crate::document::Document;
use crate::query::{Direction, OrderBy, OrderField};
use serde_json::Value;
use std::cmp::Ordering;

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Compares two values using store ordering.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.total_cmp(&y)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y) {
                let ord = compare_values(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => {
            let mut xs: Vec<_> = x.iter().collect();
            let mut ys: Vec<_> = y.iter().collect();
            xs.sort_by(|l, r| l.0.cmp(r.0));
            ys.sort_by(|l, r| l.0.cmp(r.0));
            for ((lk, lv), (rk, rv)) in xs.iter().zip(&ys) {
                let ord = lk.cmp(rk).then_with(|| compare_values(lv, rv));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            xs.len().cmp(&ys.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Equality as used by `where_eq`: same value under store ordering.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Ordering::Equal
}

/// The value a document contributes to one order clause, if any.
pub(crate) fn order_value<'a>(doc: &'a Document, field: &OrderField) -> Option<OrderValue<'a>> {
    match field {
        OrderField::Field(path) => doc.field(path).map(OrderValue::Field),
        OrderField::DocumentId => Some(OrderValue::Id(&doc.id)),
    }
}

pub(crate) enum OrderValue<'a> {
    Field(&'a Value),
    Id(&'a str),
}

impl OrderValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OrderValue::Field(a), OrderValue::Field(b)) => compare_values(a, b),
            (OrderValue::Id(a), OrderValue::Id(b)) => a.cmp(b),
            (OrderValue::Field(_), OrderValue::Id(_)) => Ordering::Less,
            (OrderValue::Id(_), OrderValue::Field(_)) => Ordering::Greater,
        }
    }
}

/// Compares two documents under a list of order clauses.
///
/// Documents missing an ordered field compare as equal on that clause; the
/// memory store filters them out before sorting.
pub fn compare_documents(a: &Document, b: &Document, order: &[OrderBy]) -> Ordering {
    for clause in order {
        let ord = match (order_value(a, &clause.field), order_value(b, &clause.field)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        };
        let ord = match clause.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
