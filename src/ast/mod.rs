// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! SQL Abstract Syntax Tree (AST) types.
//!
//! Statements and expressions are closed sum types; the layout engine matches
//! exhaustively so the compiler keeps renderers in sync with the grammar.
//! Every node exclusively owns its children and nothing holds back-references,
//! so the whole tree lives exactly as long as one formatting call.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::ddl::{
    AlterAction, AlterColumnOp, AlterTable, ColumnDef, ColumnOption, ColumnOptionDef, CreateIndex,
    CreatePolicy, CreateTable, CreateView, Drop, DropBehavior, Grant, GrantObjects, ObjectType,
    PolicyCommand, Privileges, ReferentialAction, SqlOption, TableConstraint, Truncate,
    TruncateIdentity,
};
pub use self::dml::{
    Assignment, AssignmentTarget, ConflictAction, Delete, Explain, ExplainOption, Insert,
    InsertSource, Merge, MergeAction, MergeWhen, OnConflict, Overriding, Update, ValuesStatement,
};
pub use self::expr::{
    BinaryOperator, CaseExpr, CaseWhen, Expr, FrameBound, FrameExclusion, FrameUnits, FunctionCall,
    IsTail, LikeKind, Literal, Over, Quantifier, Subscript, TrimSide, TypeName, UnaryOperator,
    WindowFrame, WindowSpec,
};
pub use self::query::{
    Cte, CycleClause, Direction, Distinct, Fetch, FromClause, GroupBy, GroupingElement, Join,
    JoinConstraint, JoinType, Limit, LockMode, LockWait, LockingClause, NamedWindow, NullsOrder,
    Offset, OrderByExpr, QueryExpr, Relation, SearchClause, Select, SelectColumn, SetMember,
    SetOpChain, SetOpKind, SetOperator, SetQuantifier, TableAlias, TableRef, TableSample, Top,
    ValuesClause, WithQuery,
};

pub mod ddl;
pub mod dml;
pub mod expr;
pub mod query;

/// The lexical style of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CommentStyle {
    /// `-- ...`
    Line,
    /// `/* ... */`
    Block,
}

/// A comment attached to an AST node. `text` is the verbatim comment,
/// delimiters included. `blank_lines_before` records whether the source had a
/// blank line between the previous content and this comment (capped at one so
/// runs of blank lines collapse).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comment {
    pub style: CommentStyle,
    pub text: String,
    pub blank_lines_before: usize,
}

/// An identifier as written in the source. Quoted identifiers keep their
/// original spelling and quotes; unquoted identifiers are lowercased when
/// displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ident {
    /// Verbatim lexeme, including quotes when `quoted`.
    pub text: String,
    pub quoted: bool,
}

impl Ident {
    pub fn new(text: impl Into<String>) -> Ident {
        Ident {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Ident {
        Ident {
            text: text.into(),
            quoted: true,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.quoted {
            f.write_str(&self.text)
        } else {
            f.write_str(&self.text.to_ascii_lowercase())
        }
    }
}

/// A possibly multi-part name, i.e. `db.schema.obj`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectName(pub Vec<Ident>);

impl ObjectName {
    pub fn single(ident: Ident) -> ObjectName {
        ObjectName(vec![ident])
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut sep = "";
        for part in &self.0 {
            write!(f, "{sep}{part}")?;
            sep = ".";
        }
        Ok(())
    }
}

/// Why a statement was preserved verbatim instead of being reformatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RawReason {
    /// A recognised production failed and recovery captured the text.
    ParseError,
    /// The statement kind is intentionally passed through (`VACUUM`, `GO`,
    /// `DELIMITER`, ...).
    Unsupported,
    /// Standalone comments with no statement following.
    CommentOnly,
}

/// A passthrough statement kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Raw {
    pub text: String,
    pub reason: RawReason,
    pub leading_comments: Vec<Comment>,
}

/// A top-level SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Statement {
    /// `SELECT`, a set-operation chain, or `WITH`.
    Query(QueryExpr),
    Insert(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
    Merge(Box<Merge>),
    CreateTable(Box<CreateTable>),
    AlterTable(Box<AlterTable>),
    Drop(Box<Drop>),
    CreateIndex(Box<CreateIndex>),
    CreateView(Box<CreateView>),
    CreatePolicy(Box<CreatePolicy>),
    /// `GRANT` or `REVOKE` (distinguished by [`Grant::revoke`]).
    Grant(Box<Grant>),
    Truncate(Box<Truncate>),
    /// A standalone `VALUES` statement.
    Values(Box<ValuesStatement>),
    Explain(Box<Explain>),
    /// Verbatim passthrough.
    Raw(Box<Raw>),
}

impl Statement {
    /// Comments emitted before the statement's first line.
    pub fn leading_comments(&self) -> &[Comment] {
        match self {
            Statement::Query(q) => q.leading_comments(),
            Statement::Insert(s) => &s.leading_comments,
            Statement::Update(s) => &s.leading_comments,
            Statement::Delete(s) => &s.leading_comments,
            Statement::Merge(s) => &s.leading_comments,
            Statement::CreateTable(s) => &s.leading_comments,
            Statement::AlterTable(s) => &s.leading_comments,
            Statement::Drop(s) => &s.leading_comments,
            Statement::CreateIndex(s) => &s.leading_comments,
            Statement::CreateView(s) => &s.leading_comments,
            Statement::CreatePolicy(s) => &s.leading_comments,
            Statement::Grant(s) => &s.leading_comments,
            Statement::Truncate(s) => &s.leading_comments,
            Statement::Values(s) => &s.leading_comments,
            Statement::Explain(s) => &s.leading_comments,
            Statement::Raw(s) => &s.leading_comments,
        }
    }

    pub fn leading_comments_mut(&mut self) -> &mut Vec<Comment> {
        match self {
            Statement::Query(q) => q.leading_comments_mut(),
            Statement::Insert(s) => &mut s.leading_comments,
            Statement::Update(s) => &mut s.leading_comments,
            Statement::Delete(s) => &mut s.leading_comments,
            Statement::Merge(s) => &mut s.leading_comments,
            Statement::CreateTable(s) => &mut s.leading_comments,
            Statement::AlterTable(s) => &mut s.leading_comments,
            Statement::Drop(s) => &mut s.leading_comments,
            Statement::CreateIndex(s) => &mut s.leading_comments,
            Statement::CreateView(s) => &mut s.leading_comments,
            Statement::CreatePolicy(s) => &mut s.leading_comments,
            Statement::Grant(s) => &mut s.leading_comments,
            Statement::Truncate(s) => &mut s.leading_comments,
            Statement::Values(s) => &mut s.leading_comments,
            Statement::Explain(s) => &mut s.leading_comments,
            Statement::Raw(s) => &mut s.leading_comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_display_lowercases_unquoted() {
        assert_eq!(Ident::new("FileHash").to_string(), "filehash");
        assert_eq!(Ident::quoted("\"FileHash\"").to_string(), "\"FileHash\"");
    }

    #[test]
    fn object_name_display() {
        let name = ObjectName(vec![Ident::new("Public"), Ident::quoted("\"T\"")]);
        assert_eq!(name.to_string(), "public.\"T\"");
    }
}
