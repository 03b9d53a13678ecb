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

//! Query structure: SELECT, set-operation chains, and WITH.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::expr::Expr;
use super::{Comment, Ident, ObjectName};

/// A query expression: a plain `SELECT`, a chain of set operations, or a
/// `WITH` block. Subqueries, CTE bodies, and view bodies all hold one of
/// these, so the structure is recursive with no cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QueryExpr {
    Select(Box<Select>),
    SetOp(Box<SetOpChain>),
    With(Box<WithQuery>),
}

impl QueryExpr {
    pub fn leading_comments(&self) -> &[Comment] {
        match self {
            QueryExpr::Select(s) => &s.leading_comments,
            QueryExpr::SetOp(s) => &s.leading_comments,
            QueryExpr::With(s) => &s.leading_comments,
        }
    }

    pub fn leading_comments_mut(&mut self) -> &mut Vec<Comment> {
        match self {
            QueryExpr::Select(s) => &mut s.leading_comments,
            QueryExpr::SetOp(s) => &mut s.leading_comments,
            QueryExpr::With(s) => &mut s.leading_comments,
        }
    }
}

/// One `SELECT` statement with all of its clauses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Select {
    pub leading_comments: Vec<Comment>,
    pub distinct: Option<Distinct>,
    /// T-SQL `TOP (n) [PERCENT] [WITH TIES]`.
    pub top: Option<Top>,
    pub columns: Vec<SelectColumn>,
    pub from: Option<FromClause>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Expr>,
    /// `WINDOW w AS (...), ...`.
    pub windows: Vec<NamedWindow>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<Limit>,
    pub offset: Option<Offset>,
    pub fetch: Option<Fetch>,
    pub locking: Vec<LockingClause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distinct {
    Distinct,
    /// PostgreSQL `DISTINCT ON (expr, ...)`.
    On(Vec<Expr>),
}

/// T-SQL row limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Top {
    pub quantity: Expr,
    pub parenthesized: bool,
    pub percent: bool,
    pub with_ties: bool,
}

/// One item of the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectColumn {
    pub expr: Expr,
    pub alias: Option<Ident>,
    pub leading_comments: Vec<Comment>,
    /// A comment on the same source line as the column; stays on the
    /// column's output line and forces the list to break.
    pub trailing_comment: Option<Comment>,
}

impl SelectColumn {
    pub fn bare(expr: Expr) -> SelectColumn {
        SelectColumn {
            expr,
            alias: None,
            leading_comments: Vec::new(),
            trailing_comment: None,
        }
    }
}

/// The `FROM` clause: one or more comma-separated table references.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FromClause {
    pub items: Vec<TableRef>,
}

/// A table reference with its trimmings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableRef {
    pub relation: Relation,
    pub alias: Option<TableAlias>,
    pub lateral: bool,
    pub tablesample: Option<TableSample>,
}

impl TableRef {
    pub fn named(name: ObjectName) -> TableRef {
        TableRef {
            relation: Relation::Table(name),
            alias: None,
            lateral: false,
            tablesample: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Relation {
    Table(ObjectName),
    /// `(SELECT ...)`.
    Subquery(Box<QueryExpr>),
    /// Table function call, e.g. `unnest(arr)` or `generate_series(1, 10)`.
    Function(Box<Expr>),
    /// `(VALUES (...), (...))`.
    Values(ValuesClause),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableAlias {
    pub name: Ident,
    /// `t (a, b)` column aliases.
    pub columns: Vec<Ident>,
}

/// `TABLESAMPLE method (args) [REPEATABLE (seed)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableSample {
    pub method: Ident,
    pub args: Vec<Expr>,
    pub repeatable: Option<Expr>,
}

/// One join step after the first FROM item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Join {
    pub join_type: JoinType,
    pub relation: TableRef,
    pub constraint: Option<JoinConstraint>,
    pub leading_comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JoinType {
    /// Bare `JOIN`.
    Plain,
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Full,
    FullOuter,
    Cross,
    Natural,
    NaturalLeft,
    NaturalRight,
    /// MySQL `STRAIGHT_JOIN`.
    Straight,
}

impl JoinType {
    /// The rendered keyword phrase, e.g. `LEFT OUTER JOIN`.
    pub fn phrase(&self) -> &'static str {
        match self {
            JoinType::Plain => "JOIN",
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::LeftOuter => "LEFT OUTER JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::RightOuter => "RIGHT OUTER JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::FullOuter => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
            JoinType::Natural => "NATURAL JOIN",
            JoinType::NaturalLeft => "NATURAL LEFT JOIN",
            JoinType::NaturalRight => "NATURAL RIGHT JOIN",
            JoinType::Straight => "STRAIGHT_JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<Ident>),
}

/// The `GROUP BY` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupBy {
    pub quantifier: Option<SetQuantifier>,
    pub elements: Vec<GroupingElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GroupingElement {
    Expr(Expr),
    Rollup(Vec<Expr>),
    Cube(Vec<Expr>),
    GroupingSets(Vec<Vec<Expr>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedWindow {
    pub name: Ident,
    pub spec: super::expr::WindowSpec,
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderByExpr {
    pub expr: Expr,
    pub direction: Option<Direction>,
    pub nulls: Option<NullsOrder>,
    /// PostgreSQL `USING <operator>`.
    pub using_op: Option<String>,
}

impl OrderByExpr {
    pub fn plain(expr: Expr) -> OrderByExpr {
        OrderByExpr {
            expr,
            direction: None,
            nulls: None,
            using_op: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NullsOrder {
    First,
    Last,
}

impl fmt::Display for NullsOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            NullsOrder::First => "NULLS FIRST",
            NullsOrder::Last => "NULLS LAST",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Limit {
    All,
    Count(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Offset {
    pub value: Expr,
    /// `OFFSET 5 ROWS` vs plain `OFFSET 5`.
    pub rows: bool,
}

/// `FETCH {FIRST|NEXT} [n] {ROW|ROWS} {ONLY|WITH TIES}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fetch {
    pub first: bool,
    pub quantity: Option<Expr>,
    pub percent: bool,
    pub with_ties: bool,
}

/// `FOR UPDATE [OF t] [NOWAIT | SKIP LOCKED]` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LockingClause {
    pub mode: LockMode,
    pub of: Vec<ObjectName>,
    pub wait: Option<LockWait>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LockMode {
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            LockMode::Update => "UPDATE",
            LockMode::NoKeyUpdate => "NO KEY UPDATE",
            LockMode::Share => "SHARE",
            LockMode::KeyShare => "KEY SHARE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LockWait {
    Nowait,
    SkipLocked,
}

impl fmt::Display for LockWait {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            LockWait::Nowait => "NOWAIT",
            LockWait::SkipLocked => "SKIP LOCKED",
        })
    }
}

/// A chain of set operations: `members[0] op[0] members[1] op[1] ...`.
/// `operators` is always one shorter than `members`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetOpChain {
    pub leading_comments: Vec<Comment>,
    pub members: Vec<SetMember>,
    pub operators: Vec<SetOperator>,
    /// Clauses trailing the whole chain, e.g. `... UNION ... ORDER BY 1`.
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<Limit>,
    pub offset: Option<Offset>,
    pub fetch: Option<Fetch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetMember {
    pub query: QueryExpr,
    pub parenthesized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetOperator {
    pub kind: SetOpKind,
    pub quantifier: Option<SetQuantifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

impl fmt::Display for SetOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SetOpKind::Union => "UNION",
            SetOpKind::Intersect => "INTERSECT",
            SetOpKind::Except => "EXCEPT",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SetQuantifier {
    All,
    Distinct,
}

impl fmt::Display for SetQuantifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SetQuantifier::All => "ALL",
            SetQuantifier::Distinct => "DISTINCT",
        })
    }
}

/// `WITH [RECURSIVE] cte [, ...] [SEARCH ...] [CYCLE ...] <main query>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WithQuery {
    pub leading_comments: Vec<Comment>,
    pub recursive: bool,
    pub ctes: Vec<Cte>,
    pub search: Option<SearchClause>,
    pub cycle: Option<CycleClause>,
    pub body: Box<QueryExpr>,
}

/// One common table expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cte {
    pub leading_comments: Vec<Comment>,
    pub name: Ident,
    pub columns: Vec<Ident>,
    /// `AS MATERIALIZED` (true) / `AS NOT MATERIALIZED` (false).
    pub materialized: Option<bool>,
    pub query: QueryExpr,
}

/// `SEARCH {BREADTH|DEPTH} FIRST BY cols SET col`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchClause {
    pub breadth_first: bool,
    pub by: Vec<Ident>,
    pub set: Ident,
}

/// `CYCLE cols SET col [TO v DEFAULT v] [USING col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleClause {
    pub columns: Vec<Ident>,
    pub set: Ident,
    pub to_value: Option<Expr>,
    pub default_value: Option<Expr>,
    pub using: Option<Ident>,
}

/// `VALUES (...), (...)` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValuesClause {
    pub rows: Vec<Vec<Expr>>,
}
