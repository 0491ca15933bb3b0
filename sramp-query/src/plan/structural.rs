// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Backend-neutral structural query model
//!
//! A [`StructuralQuery`] is a join tree of named selectors, one constraint
//! tree, optional orderings and the output columns. It mirrors the query
//! object model of a hierarchical content store: selectors name node types,
//! joins relate them by property equality or by parent/child position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named node-type source, the analog of a table alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub node_type: String,
    pub alias: String,
}

impl Selector {
    pub fn new(node_type: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            alias: alias.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    LeftOuter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinCondition {
    /// `left.[left_property] = right.[right_property]`
    Equi {
        left_selector: String,
        left_property: String,
        right_selector: String,
        right_property: String,
    },
    /// `child` is a direct child node of `parent`
    ChildNode { child: String, parent: String },
}

impl JoinCondition {
    pub fn equi(
        left_selector: impl Into<String>,
        left_property: impl Into<String>,
        right_selector: impl Into<String>,
        right_property: impl Into<String>,
    ) -> Self {
        JoinCondition::Equi {
            left_selector: left_selector.into(),
            left_property: left_property.into(),
            right_selector: right_selector.into(),
            right_property: right_property.into(),
        }
    }

    pub fn child_node(child: impl Into<String>, parent: impl Into<String>) -> Self {
        JoinCondition::ChildNode {
            child: child.into(),
            parent: parent.into(),
        }
    }
}

/// Left-deep join tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Source {
    Selector(Selector),
    Join {
        left: Box<Source>,
        join_type: JoinType,
        right: Selector,
        condition: JoinCondition,
    },
}

impl Source {
    pub fn selector(node_type: impl Into<String>, alias: impl Into<String>) -> Self {
        Source::Selector(Selector::new(node_type, alias))
    }

    /// Join `right` onto this source
    pub fn join(self, join_type: JoinType, right: Selector, condition: JoinCondition) -> Self {
        Source::Join {
            left: Box::new(self),
            join_type,
            right,
            condition,
        }
    }

    /// Selectors in join order, leftmost first
    pub fn selectors(&self) -> Vec<&Selector> {
        match self {
            Source::Selector(selector) => vec![selector],
            Source::Join { left, right, .. } => {
                let mut selectors = left.selectors();
                selectors.push(right);
                selectors
            }
        }
    }

    pub fn find_selector(&self, alias: &str) -> Option<&Selector> {
        self.selectors().into_iter().find(|s| s.alias == alias)
    }

    /// Number of joins in the tree
    pub fn join_count(&self) -> usize {
        match self {
            Source::Selector(_) => 0,
            Source::Join { left, .. } => 1 + left.join_count(),
        }
    }
}

/// A property of a selector, used as a dynamic operand
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyValue {
    pub selector: String,
    pub property: String,
}

impl PropertyValue {
    pub fn new(selector: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            property: property.into(),
        }
    }
}

/// Typed literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Long(i64),
    Double(f64),
    Date(NaiveDate),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::EqualTo => "=",
            Operator::NotEqualTo => "<>",
            Operator::LessThan => "<",
            Operator::LessThanOrEqualTo => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqualTo => ">=",
            Operator::Like => "LIKE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    Comparison {
        operand: PropertyValue,
        operator: Operator,
        value: Value,
    },
    PropertyExistence(PropertyValue),
    /// Full-text search over one property, or every property when `property` is `None`
    FullTextSearch {
        selector: String,
        property: Option<String>,
        expression: String,
    },
    InList {
        operand: PropertyValue,
        values: Vec<Value>,
    },
    InSubquery {
        operand: PropertyValue,
        subquery: Box<StructuralQuery>,
    },
    DescendantNode {
        selector: String,
        ancestor_path: String,
    },
    And(Box<Constraint>, Box<Constraint>),
    Or(Box<Constraint>, Box<Constraint>),
    Not(Box<Constraint>),
}

impl Constraint {
    pub fn comparison(operand: PropertyValue, operator: Operator, value: impl Into<Value>) -> Self {
        Constraint::Comparison {
            operand,
            operator,
            value: value.into(),
        }
    }

    pub fn equal_to(selector: &str, property: &str, value: impl Into<Value>) -> Self {
        Self::comparison(PropertyValue::new(selector, property), Operator::EqualTo, value)
    }

    pub fn exists(selector: &str, property: &str) -> Self {
        Constraint::PropertyExistence(PropertyValue::new(selector, property))
    }

    pub fn full_text_search(selector: &str, expression: impl Into<String>) -> Self {
        Constraint::FullTextSearch {
            selector: selector.to_string(),
            property: None,
            expression: expression.into(),
        }
    }

    pub fn in_list(selector: &str, property: &str, values: Vec<Value>) -> Self {
        Constraint::InList {
            operand: PropertyValue::new(selector, property),
            values,
        }
    }

    pub fn in_subquery(selector: &str, property: &str, subquery: StructuralQuery) -> Self {
        Constraint::InSubquery {
            operand: PropertyValue::new(selector, property),
            subquery: Box::new(subquery),
        }
    }

    pub fn descendant_node(selector: &str, ancestor_path: &str) -> Self {
        Constraint::DescendantNode {
            selector: selector.to_string(),
            ancestor_path: ancestor_path.to_string(),
        }
    }

    pub fn and(left: Constraint, right: Constraint) -> Self {
        Constraint::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Constraint, right: Constraint) -> Self {
        Constraint::Or(Box::new(left), Box::new(right))
    }

    pub fn not(constraint: Constraint) -> Self {
        Constraint::Not(Box::new(constraint))
    }

    /// Flatten a tree of ANDs into its conjuncts, left to right
    pub fn conjuncts(&self) -> Vec<&Constraint> {
        match self {
            Constraint::And(left, right) => {
                let mut items = left.conjuncts();
                items.extend(right.conjuncts());
                items
            }
            other => vec![other],
        }
    }
}

/// Output column; `property = None` selects every property of the selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub selector: String,
    pub property: Option<String>,
    pub alias: Option<String>,
}

impl Column {
    pub fn new(selector: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            property: Some(property.into()),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ordering {
    pub operand: PropertyValue,
    pub ascending: bool,
}

impl Ordering {
    pub fn ascending(operand: PropertyValue) -> Self {
        Self {
            operand,
            ascending: true,
        }
    }

    pub fn descending(operand: PropertyValue) -> Self {
        Self {
            operand,
            ascending: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralQuery {
    pub source: Source,
    pub constraint: Option<Constraint>,
    pub orderings: Vec<Ordering>,
    pub columns: Vec<Column>,
}

impl StructuralQuery {
    pub fn new(source: Source, constraint: Option<Constraint>, columns: Vec<Column>) -> Self {
        Self {
            source,
            constraint,
            orderings: Vec::new(),
            columns,
        }
    }

    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    /// Top-level conjuncts of the constraint, empty when unconstrained
    pub fn conjuncts(&self) -> Vec<&Constraint> {
        self.constraint
            .as_ref()
            .map(Constraint::conjuncts)
            .unwrap_or_default()
    }
}
