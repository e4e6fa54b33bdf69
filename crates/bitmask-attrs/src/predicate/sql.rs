//! SQL rendering of predicate trees.
//!
//! The tree itself is backend-neutral; a [`Dialect`] decides how identifiers
//! are quoted and how the bitwise AND is spelled. Identifiers that are not
//! plain `[A-Za-z_][A-Za-z0-9_]*` (or that contain upper-case letters, which
//! some engines fold) are always quoted.

use super::Predicate;
use std::fmt::{self, Write};

pub trait Dialect {
    /// Opening and closing identifier quote.
    fn quote_char(&self) -> char;

    fn quote_ident(&self, name: &str) -> String {
        if !needs_quoting(name) {
            return name.to_string();
        }
        let quote = self.quote_char();
        let doubled = format!("{quote}{quote}");
        format!("{quote}{}{quote}", name.replace(quote, &doubled))
    }

    fn bit_and(&self, column: &str, mask: &str) -> String {
        format!("({column} & {mask})")
    }
}

/// Standard double-quoted identifiers (SQLite, PostgreSQL).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi;

impl Dialect for Ansi {
    fn quote_char(&self) -> char {
        '"'
    }
}

/// Backtick-quoted identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_char(&self) -> char {
        '`'
    }
}

fn needs_quoting(name: &str) -> bool {
    let Some(first) = name.bytes().next() else {
        return true;
    };
    if !(first.is_ascii_lowercase() || first == b'_') {
        return true;
    }
    name.bytes()
        .any(|b| !(b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_'))
}

/// Render `predicate` as a SQL boolean expression.
///
/// An empty `And` renders as `1 = 1` and an empty `Or` as `1 = 0`, matching
/// [`Predicate::evaluate`].
pub fn to_sql(predicate: &Predicate, dialect: &dyn Dialect) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_predicate(&mut out, predicate, dialect);
    out
}

fn write_predicate(out: &mut String, predicate: &Predicate, dialect: &dyn Dialect) -> fmt::Result {
    match predicate {
        Predicate::Eq { field, value } => write!(out, "{} = {value}", dialect.quote_ident(field)),
        Predicate::IsNull { field } => write!(out, "{} IS NULL", dialect.quote_ident(field)),
        Predicate::Gt { field, value } => write!(out, "{} > {value}", dialect.quote_ident(field)),
        Predicate::BitAndEq { field, mask, value } => write!(
            out,
            "{} = {value}",
            dialect.bit_and(&dialect.quote_ident(field), &mask.to_string())
        ),
        Predicate::BitAndNe { field, mask, value } => write!(
            out,
            "{} <> {value}",
            dialect.bit_and(&dialect.quote_ident(field), &mask.to_string())
        ),
        Predicate::And { all } if all.is_empty() => out.write_str("1 = 1"),
        Predicate::Or { any } if any.is_empty() => out.write_str("1 = 0"),
        Predicate::And { all } => write_joined(out, all, " AND ", dialect),
        Predicate::Or { any } => write_joined(out, any, " OR ", dialect),
        Predicate::Not { inner } => {
            out.write_str("NOT ")?;
            write_operand(out, inner, dialect)
        }
    }
}

fn write_joined(
    out: &mut String,
    operands: &[Predicate],
    separator: &str,
    dialect: &dyn Dialect,
) -> fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            out.write_str(separator)?;
        }
        write_operand(out, operand, dialect)?;
    }
    Ok(())
}

/// Compound operands are parenthesized so precedence survives rendering.
fn write_operand(out: &mut String, operand: &Predicate, dialect: &dyn Dialect) -> fmt::Result {
    let compound = match operand {
        Predicate::And { all } => all.len() > 1,
        Predicate::Or { any } => any.len() > 1,
        Predicate::Not { .. } => true,
        _ => false,
    };
    if compound {
        out.write_char('(')?;
        write_predicate(out, operand, dialect)?;
        out.write_char(')')
    } else {
        write_predicate(out, operand, dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::Mask;

    #[test]
    fn plain_identifiers_are_left_alone() {
        assert_eq!(Ansi.quote_ident("medium"), "medium");
        assert_eq!(Ansi.quote_ident("allow_zero"), "allow_zero");
    }

    #[test]
    fn unsafe_identifiers_are_quoted() {
        assert_eq!(Ansi.quote_ident("2x"), "\"2x\"");
        assert_eq!(Ansi.quote_ident("Legacy"), "\"Legacy\"");
        assert_eq!(Ansi.quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(MySql.quote_ident("2x"), "`2x`");
        assert_eq!(MySql.quote_ident("a`b"), "`a``b`");
    }

    #[test]
    fn renders_leaves() {
        let p = Predicate::bit_and_ne("medium", Mask::from(6u64), Mask::zero());
        assert_eq!(to_sql(&p, &Ansi), "(medium & 6) <> 0");

        let p = Predicate::bit_and_eq("2x", Mask::from(1u64), Mask::zero());
        assert_eq!(to_sql(&p, &Ansi), "(\"2x\" & 1) = 0");
    }

    #[test]
    fn renders_nested_connectives() {
        let p = Predicate::and(vec![
            Predicate::or(vec![
                Predicate::is_null("medium"),
                Predicate::bit_and_eq("medium", Mask::from(2u64), Mask::zero()),
            ]),
            Predicate::gt("medium", Mask::zero()),
        ]);
        assert_eq!(
            to_sql(&p, &Ansi),
            "(medium IS NULL OR (medium & 2) = 0) AND medium > 0"
        );

        let p = Predicate::not(Predicate::or(vec![
            Predicate::eq("medium", Mask::zero()),
            Predicate::is_null("medium"),
        ]));
        assert_eq!(to_sql(&p, &MySql), "NOT (medium = 0 OR medium IS NULL)");
    }

    #[test]
    fn wide_masks_are_exact_literals() {
        let p = Predicate::eq("values", Mask::bit(100));
        assert_eq!(to_sql(&p, &Ansi), format!("values = {}", 1u128 << 100));
    }

    #[test]
    fn empty_connectives_render_constants() {
        let and = Predicate::And { all: vec![] };
        let or = Predicate::Or { any: vec![] };
        assert_eq!(to_sql(&and, &Ansi), "1 = 1");
        assert_eq!(to_sql(&or, &Ansi), "1 = 0");
        assert_eq!(to_sql(&Predicate::not(or), &Ansi), "NOT 1 = 0");

        let nested = Predicate::and(vec![Predicate::is_null("m"), Predicate::Or { any: vec![] }]);
        assert_eq!(to_sql(&nested, &Ansi), "m IS NULL AND 1 = 0");
    }
}
