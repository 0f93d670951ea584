//! Flag store and flag-dependency evaluation
//!
//! Flags are plain strings set by selected options. The store is owned by
//! one wizard run and passed explicitly to every evaluation.

use std::collections::BTreeMap;

/// Flag name to last written value, scoped to one package install
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagStore {
    values: BTreeMap<String, String>,
}

impl FlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite any previous value of `name`
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The flag exists and, when a value is expected, holds exactly that value
    pub fn satisfies(&self, condition: &FlagCondition) -> bool {
        match (self.get(&condition.flag), &condition.value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        }
    }
}

/// How the conditions of an expression combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl Operator {
    /// Parse the `operator` attribute; absent means `And`
    pub fn from_attr(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::And),
            Some(v) if v.eq_ignore_ascii_case("and") => Some(Self::And),
            Some(v) if v.eq_ignore_ascii_case("or") => Some(Self::Or),
            Some(_) => None,
        }
    }
}

/// One `(flag, value?)` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagCondition {
    pub flag: String,
    pub value: Option<String>,
}

impl FlagCondition {
    pub fn new(flag: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            flag: flag.into(),
            value: value.map(str::to_string),
        }
    }
}

/// Ordered conditions joined by one operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagExpression {
    pub operator: Operator,
    pub conditions: Vec<FlagCondition>,
}

impl FlagExpression {
    pub fn new(operator: Operator, conditions: Vec<FlagCondition>) -> Self {
        Self {
            operator,
            conditions,
        }
    }

    /// Evaluate against `flags`
    ///
    /// `And` stops at the first unsatisfied entry and is true for an empty
    /// list; `Or` stops at the first satisfied entry and is false for an
    /// empty list.
    pub fn evaluate(&self, flags: &FlagStore) -> bool {
        match self.operator {
            Operator::And => self.conditions.iter().all(|c| flags.satisfies(c)),
            Operator::Or => self.conditions.iter().any(|c| flags.satisfies(c)),
        }
    }
}
