//! Plain-data entity queries.
//!
//! A query is a list of `(field, operator, value)` conditions scoped to one
//! entity type. The query carries no execution logic; the store interprets
//! it. Rules attach conditions through `EntityQuery::condition`, which is
//! chainable:
//!
//! ```
//! use transit_entity::{EntityQuery, Operator};
//! use serde_json::json;
//!
//! let mut query = EntityQuery::new("node");
//! query
//!     .condition("status", json!("draft"), Operator::Eq)
//!     .condition("weight", json!(10), Operator::Lt);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Condition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Equality.
    Eq,
    /// Inequality.
    Ne,
    /// Membership in an array value.
    In,
    /// Non-membership in an array value.
    NotIn,
    /// Greater than (numbers).
    Gt,
    /// Greater or equal (numbers).
    Gte,
    /// Less than (numbers).
    Lt,
    /// Less or equal (numbers).
    Lte,
}

impl Operator {
    /// SQL-ish symbol for logs and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single query condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    /// Field name or dotted path into the entity's fields.
    pub field: String,

    /// Comparison operator.
    pub op: Operator,

    /// Comparison value. For `In`/`NotIn` this is an array.
    pub value: Value,
}

impl Condition {
    /// Evaluates the condition against an actual field value.
    ///
    /// Comparison semantics: null equals only null, numbers compare by value
    /// regardless of integer/float representation, ordering operators apply
    /// to numbers only and are false for anything else.
    pub fn matches(&self, actual: &Value) -> bool {
        match self.op {
            Operator::Eq => values_equal(actual, &self.value),
            Operator::Ne => !values_equal(actual, &self.value),
            Operator::In => match &self.value {
                Value::Array(candidates) => candidates.iter().any(|v| values_equal(actual, v)),
                other => values_equal(actual, other),
            },
            Operator::NotIn => match &self.value {
                Value::Array(candidates) => !candidates.iter().any(|v| values_equal(actual, v)),
                other => !values_equal(actual, other),
            },
            Operator::Gt => compare(actual, &self.value).map(|o| o > 0.0).unwrap_or(false),
            Operator::Gte => compare(actual, &self.value)
                .map(|o| o >= 0.0)
                .unwrap_or(false),
            Operator::Lt => compare(actual, &self.value).map(|o| o < 0.0).unwrap_or(false),
            Operator::Lte => compare(actual, &self.value)
                .map(|o| o <= 0.0)
                .unwrap_or(false),
        }
    }
}

/// A query scoped to one entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityQuery {
    entity_type: String,
    conditions: Vec<Condition>,
}

impl EntityQuery {
    /// Creates an empty query for the given entity type.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            conditions: Vec::new(),
        }
    }

    /// Adds a condition. Conditions are combined with AND.
    pub fn condition(
        &mut self,
        field: impl Into<String>,
        value: Value,
        op: Operator,
    ) -> &mut Self {
        self.conditions.push(Condition {
            field: field.into(),
            op,
            value,
        });
        self
    }

    /// The entity type this query is scoped to.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// The attached conditions, in attachment order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .map(|(a, b)| (a - b).abs() < f64::EPSILON)
            .unwrap_or(false),
        (Value::String(a), Value::String(b)) => a == b,
        _ => false,
    }
}

/// Numeric difference `a - b`, or None when either side is not a number.
fn compare(a: &Value, b: &Value) -> Option<f64> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64().zip(b.as_f64()).map(|(a, b)| a - b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(field: &str, op: Operator, value: Value) -> Condition {
        Condition {
            field: field.to_string(),
            op,
            value,
        }
    }

    #[test]
    fn test_equality() {
        assert!(cond("s", Operator::Eq, json!("draft")).matches(&json!("draft")));
        assert!(!cond("s", Operator::Eq, json!("draft")).matches(&json!("published")));
        assert!(cond("s", Operator::Ne, json!("draft")).matches(&json!("published")));
        // Numbers compare by value, not representation
        assert!(cond("n", Operator::Eq, json!(1)).matches(&json!(1.0)));
    }

    #[test]
    fn test_membership() {
        let c = cond("b", Operator::In, json!(["article", "page"]));
        assert!(c.matches(&json!("article")));
        assert!(!c.matches(&json!("event")));

        let c = cond("b", Operator::NotIn, json!(["article"]));
        assert!(c.matches(&json!("page")));
        assert!(!c.matches(&json!("article")));
    }

    #[test]
    fn test_membership_scalar_value() {
        // A scalar value behaves like a singleton set
        assert!(cond("b", Operator::In, json!("article")).matches(&json!("article")));
    }

    #[test]
    fn test_ordering() {
        assert!(cond("w", Operator::Gt, json!(5)).matches(&json!(6)));
        assert!(!cond("w", Operator::Gt, json!(5)).matches(&json!(5)));
        assert!(cond("w", Operator::Gte, json!(5)).matches(&json!(5)));
        assert!(cond("w", Operator::Lt, json!(5)).matches(&json!(4)));
        assert!(cond("w", Operator::Lte, json!(5)).matches(&json!(5)));
        // Ordering on non-numbers is always false
        assert!(!cond("w", Operator::Gt, json!(5)).matches(&json!("6")));
    }

    #[test]
    fn test_null_semantics() {
        assert!(cond("x", Operator::Eq, Value::Null).matches(&Value::Null));
        assert!(!cond("x", Operator::Eq, json!("a")).matches(&Value::Null));
        assert!(cond("x", Operator::Ne, json!("a")).matches(&Value::Null));
    }

    #[test]
    fn test_query_building() {
        let mut query = EntityQuery::new("node");
        query
            .condition("status", json!("draft"), Operator::Eq)
            .condition("bundle", json!(["article"]), Operator::In);

        assert_eq!(query.entity_type(), "node");
        assert_eq!(query.conditions().len(), 2);
        assert_eq!(query.conditions()[0].field, "status");
        assert_eq!(query.conditions()[1].op, Operator::In);
    }
}
