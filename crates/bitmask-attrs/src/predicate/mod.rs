//! # Predicates
//!
//! Filters over a bitmask column are built as an abstract [`Predicate`] tree.
//! This crate never executes queries against a real database; a query layer
//! translates the tree (see [`sql`]) or evaluates it in memory
//! ([`Predicate::evaluate`]).
//!
//! Evaluation follows SQL three-valued logic: comparisons against a NULL
//! column are unknown (`None`), and only rows evaluating to `Some(true)`
//! match.

pub mod scopes;
pub mod sql;

use crate::attribute::BackingField;
use crate::error::Result;
use crate::mask::Mask;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// `field = value`
    Eq { field: String, value: Mask },
    /// `field IS NULL`
    IsNull { field: String },
    /// `field > value`
    Gt { field: String, value: Mask },
    /// `(field & mask) = value`
    BitAndEq {
        field: String,
        mask: Mask,
        value: Mask,
    },
    /// `(field & mask) <> value`
    BitAndNe {
        field: String,
        mask: Mask,
        value: Mask,
    },
    And { all: Vec<Predicate> },
    Or { any: Vec<Predicate> },
    Not { inner: Box<Predicate> },
}

impl Predicate {
    pub fn eq(field: &str, value: Mask) -> Self {
        Predicate::Eq {
            field: field.to_string(),
            value,
        }
    }

    pub fn is_null(field: &str) -> Self {
        Predicate::IsNull {
            field: field.to_string(),
        }
    }

    pub fn gt(field: &str, value: Mask) -> Self {
        Predicate::Gt {
            field: field.to_string(),
            value,
        }
    }

    pub fn bit_and_eq(field: &str, mask: Mask, value: Mask) -> Self {
        Predicate::BitAndEq {
            field: field.to_string(),
            mask,
            value,
        }
    }

    pub fn bit_and_ne(field: &str, mask: Mask, value: Mask) -> Self {
        Predicate::BitAndNe {
            field: field.to_string(),
            mask,
            value,
        }
    }

    /// Conjunction; a single operand is returned as is. No operands is
    /// always true.
    pub fn and(mut all: Vec<Predicate>) -> Self {
        if all.len() == 1 {
            return all.remove(0);
        }
        Predicate::And { all }
    }

    /// Disjunction; a single operand is returned as is. No operands is
    /// always false.
    pub fn or(mut any: Vec<Predicate>) -> Self {
        if any.len() == 1 {
            return any.remove(0);
        }
        Predicate::Or { any }
    }

    pub fn not(inner: Predicate) -> Self {
        Predicate::Not {
            inner: Box::new(inner),
        }
    }

    /// Three-valued evaluation against one record.
    pub fn evaluate<R: BackingField + ?Sized>(&self, record: &R) -> Option<bool> {
        match self {
            Predicate::Eq { field, value } => record.read_field(field).map(|v| &v == value),
            Predicate::IsNull { field } => Some(record.read_field(field).is_none()),
            Predicate::Gt { field, value } => record.read_field(field).map(|v| &v > value),
            Predicate::BitAndEq { field, mask, value } => record
                .read_field(field)
                .map(|v| &v.intersection(mask) == value),
            Predicate::BitAndNe { field, mask, value } => record
                .read_field(field)
                .map(|v| &v.intersection(mask) != value),
            Predicate::And { all } => {
                let mut unknown = false;
                for operand in all {
                    match operand.evaluate(record) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(true)
                }
            }
            Predicate::Or { any } => {
                let mut unknown = false;
                for operand in any {
                    match operand.evaluate(record) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(false)
                }
            }
            Predicate::Not { inner } => inner.evaluate(record).map(|v| !v),
        }
    }

    pub fn matches<R: BackingField + ?Sized>(&self, record: &R) -> bool {
        self.evaluate(record) == Some(true)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cell(Option<Mask>);

    impl BackingField for Cell {
        fn read_field(&self, _column: &str) -> Option<Mask> {
            self.0.clone()
        }

        fn write_field(&mut self, _column: &str, value: Mask) {
            self.0 = Some(value);
        }
    }

    fn cell(value: u64) -> Cell {
        Cell(Some(Mask::from(value)))
    }

    #[test]
    fn comparisons() {
        let gt = Predicate::gt("m", Mask::zero());
        assert!(gt.matches(&cell(1)));
        assert!(!gt.matches(&cell(0)));

        let bit = Predicate::bit_and_ne("m", Mask::from(2u64), Mask::zero());
        assert!(bit.matches(&cell(3)));
        assert!(!bit.matches(&cell(5)));

        let none_of = Predicate::bit_and_eq("m", Mask::from(6u64), Mask::zero());
        assert!(none_of.matches(&cell(9)));
        assert!(!none_of.matches(&cell(4)));
    }

    #[test]
    fn null_comparisons_are_unknown() {
        let null = Cell(None);
        assert_eq!(Predicate::eq("m", Mask::zero()).evaluate(&null), None);
        assert_eq!(Predicate::is_null("m").evaluate(&null), Some(true));
        assert_eq!(
            Predicate::not(Predicate::gt("m", Mask::zero())).evaluate(&null),
            None
        );
    }

    #[test]
    fn three_valued_connectives() {
        let null = Cell(None);
        let unknown = Predicate::gt("m", Mask::zero());
        let yes = Predicate::is_null("m");
        let no = Predicate::not(Predicate::is_null("m"));

        assert_eq!(
            Predicate::or(vec![unknown.clone(), yes.clone()]).evaluate(&null),
            Some(true)
        );
        assert_eq!(
            Predicate::or(vec![unknown.clone(), no.clone()]).evaluate(&null),
            None
        );
        assert_eq!(
            Predicate::and(vec![unknown.clone(), no]).evaluate(&null),
            Some(false)
        );
        assert_eq!(Predicate::and(vec![unknown, yes]).evaluate(&null), None);
    }

    #[test]
    fn single_operand_connectives_collapse() {
        let p = Predicate::is_null("m");
        assert_eq!(Predicate::and(vec![p.clone()]), p);
        assert_eq!(Predicate::or(vec![p.clone()]), p);
    }

    #[test]
    fn empty_connectives_are_constants() {
        let null = Cell(None);
        assert_eq!(Predicate::and(vec![]).evaluate(&null), Some(true));
        assert_eq!(Predicate::or(vec![]).evaluate(&cell(3)), Some(false));
    }

    #[test]
    fn exports_tagged_json() {
        let p = Predicate::or(vec![
            Predicate::eq("medium", Mask::zero()),
            Predicate::is_null("medium"),
        ]);
        assert_eq!(
            p.to_json().unwrap(),
            r#"{"op":"or","any":[{"op":"eq","field":"medium","value":0},{"op":"is_null","field":"medium"}]}"#
        );
    }
}
