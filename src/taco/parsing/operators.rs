//! Operator table
//!
//!     Static descriptors for the binary operators, keyed by token kind. A descriptor
//!     says how tightly the operator binds, whether it groups to the right, which node
//!     kind it builds and the ESTree operator string recorded on that node.
//!
//!     Binding powers, loosest first:
//!
//!         1   || or              Logical
//!         2   && and             Logical
//!         3   |
//!         4   ^
//!         5   &
//!         6   == != is isnt ~= !~=
//!         7   < > <= >= in instanceof
//!         8   << >> >>>
//!         9   + -
//!         10  * / %
//!         11  **                 right associative
//!
//!     Plugins add entries on top of the built-in table for their parser session only.

use crate::taco::token::TokenKind;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorNode {
    Binary,
    Logical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorDescriptor {
    pub power: i32,
    pub right_associative: bool,
    pub node: OperatorNode,
    /// ESTree operator string
    pub operator: &'static str,
}

impl OperatorDescriptor {
    pub const fn binary(power: i32, operator: &'static str) -> Self {
        Self {
            power,
            right_associative: false,
            node: OperatorNode::Binary,
            operator,
        }
    }

    pub const fn logical(power: i32, operator: &'static str) -> Self {
        Self {
            power,
            right_associative: false,
            node: OperatorNode::Logical,
            operator,
        }
    }

    pub const fn right(mut self) -> Self {
        self.right_associative = true;
        self
    }
}

static BUILTIN_OPERATORS: Lazy<BTreeMap<TokenKind, OperatorDescriptor>> = Lazy::new(|| {
    use TokenKind::*;
    BTreeMap::from([
        (LogicalOr, OperatorDescriptor::logical(1, "||")),
        (Or, OperatorDescriptor::logical(1, "||")),
        (LogicalAnd, OperatorDescriptor::logical(2, "&&")),
        (And, OperatorDescriptor::logical(2, "&&")),
        (BitOr, OperatorDescriptor::binary(3, "|")),
        (BitXor, OperatorDescriptor::binary(4, "^")),
        (BitAnd, OperatorDescriptor::binary(5, "&")),
        (Equality, OperatorDescriptor::binary(6, "===")),
        (Is, OperatorDescriptor::binary(6, "===")),
        (Inequality, OperatorDescriptor::binary(6, "!==")),
        (Isnt, OperatorDescriptor::binary(6, "!==")),
        (LooseEquality, OperatorDescriptor::binary(6, "==")),
        (LooseInequality, OperatorDescriptor::binary(6, "!=")),
        (Lt, OperatorDescriptor::binary(7, "<")),
        (Gt, OperatorDescriptor::binary(7, ">")),
        (LtEq, OperatorDescriptor::binary(7, "<=")),
        (GtEq, OperatorDescriptor::binary(7, ">=")),
        (In, OperatorDescriptor::binary(7, "in")),
        (Instanceof, OperatorDescriptor::binary(7, "instanceof")),
        (LShift, OperatorDescriptor::binary(8, "<<")),
        (RShift, OperatorDescriptor::binary(8, ">>")),
        (URShift, OperatorDescriptor::binary(8, ">>>")),
        (Plus, OperatorDescriptor::binary(9, "+")),
        (Minus, OperatorDescriptor::binary(9, "-")),
        (Star, OperatorDescriptor::binary(10, "*")),
        (Slash, OperatorDescriptor::binary(10, "/")),
        (Modulo, OperatorDescriptor::binary(10, "%")),
        (StarStar, OperatorDescriptor::binary(11, "**").right()),
    ])
});

/// The operator table of one parser session
#[derive(Debug, Clone)]
pub struct OperatorTable {
    entries: BTreeMap<TokenKind, OperatorDescriptor>,
}

impl OperatorTable {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_OPERATORS.clone(),
        }
    }

    /// Add or replace the entry for `kind`
    pub fn extend(&mut self, kind: TokenKind, descriptor: OperatorDescriptor) {
        self.entries.insert(kind, descriptor);
    }

    pub fn get(&self, kind: TokenKind) -> Option<&OperatorDescriptor> {
        self.entries.get(&kind)
    }

    /// Source spelling of an operator when it differs from the ESTree string
    pub fn raw_operator(kind: TokenKind, descriptor: &OperatorDescriptor) -> Option<String> {
        let code = kind.code();
        (code != descriptor.operator).then(|| code.to_string())
    }
}

/// Source spellings that produce the ESTree operator, first one preferred
pub fn spellings(operator: &str) -> &'static [&'static str] {
    match operator {
        "===" => &["==", "is"],
        "!==" => &["!=", "isnt"],
        "==" => &["~="],
        "!=" => &["!~="],
        "||" => &["or", "||"],
        "&&" => &["and", "&&"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicative_binds_tighter() {
        let table = OperatorTable::builtin();
        let plus = table.get(TokenKind::Plus).unwrap();
        let star = table.get(TokenKind::Star).unwrap();
        assert!(star.power > plus.power);
    }

    #[test]
    fn test_keyword_operators_share_descriptors() {
        let table = OperatorTable::builtin();
        assert_eq!(table.get(TokenKind::Or), table.get(TokenKind::LogicalOr));
        assert_eq!(table.get(TokenKind::Is).unwrap().operator, "===");
        assert_eq!(table.get(TokenKind::Pipeline), None);
    }

    #[test]
    fn test_raw_operator() {
        let table = OperatorTable::builtin();
        let is = table.get(TokenKind::Is).unwrap();
        assert_eq!(
            OperatorTable::raw_operator(TokenKind::Is, is),
            Some("is".to_string())
        );
        let plus = table.get(TokenKind::Plus).unwrap();
        assert_eq!(OperatorTable::raw_operator(TokenKind::Plus, plus), None);
    }

    #[test]
    fn test_extend_is_per_table() {
        let mut table = OperatorTable::builtin();
        table.extend(TokenKind::Pipeline, OperatorDescriptor::binary(0, "|>"));
        assert!(table.get(TokenKind::Pipeline).is_some());
        assert!(OperatorTable::builtin().get(TokenKind::Pipeline).is_none());
    }
}
