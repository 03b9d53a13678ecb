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

//! INSERT, UPDATE, DELETE, MERGE, standalone VALUES, and EXPLAIN.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::expr::Expr;
use super::query::{FromClause, Join, QueryExpr, SelectColumn, TableRef, ValuesClause};
use super::{Comment, Ident, ObjectName, Statement};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Insert {
    pub leading_comments: Vec<Comment>,
    pub table: ObjectName,
    pub columns: Vec<Ident>,
    /// `OVERRIDING {SYSTEM|USER} VALUE`.
    pub overriding: Option<Overriding>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,
    /// MySQL `ON DUPLICATE KEY UPDATE`.
    pub on_duplicate_update: Vec<Assignment>,
    pub returning: Vec<SelectColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InsertSource {
    Values(ValuesClause),
    Query(QueryExpr),
    DefaultValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Overriding {
    System,
    User,
}

/// PostgreSQL `ON CONFLICT [target] DO ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OnConflict {
    /// Conflict target columns/expressions, possibly empty.
    pub target: Vec<Expr>,
    /// `ON CONFLICT ON CONSTRAINT name`.
    pub on_constraint: Option<ObjectName>,
    pub action: ConflictAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConflictAction {
    DoNothing,
    DoUpdate {
        assignments: Vec<Assignment>,
        where_clause: Option<Expr>,
    },
}

/// One `SET` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    pub target: AssignmentTarget,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AssignmentTarget {
    Column(ObjectName),
    /// Row-value form: `(a, b) = (...)`.
    Tuple(Vec<ObjectName>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Update {
    pub leading_comments: Vec<Comment>,
    pub table: TableRef,
    pub assignments: Vec<Assignment>,
    pub from: Option<FromClause>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<SelectColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Delete {
    pub leading_comments: Vec<Comment>,
    pub table: TableRef,
    pub using: Vec<TableRef>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<SelectColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Merge {
    pub leading_comments: Vec<Comment>,
    pub into: TableRef,
    pub using: TableRef,
    pub on: Expr,
    pub clauses: Vec<MergeWhen>,
}

/// `WHEN [NOT] MATCHED [AND <condition>] THEN <action>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergeWhen {
    pub matched: bool,
    pub condition: Option<Expr>,
    pub action: MergeAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MergeAction {
    Update(Vec<Assignment>),
    Insert {
        columns: Vec<Ident>,
        values: Vec<Expr>,
    },
    Delete,
    DoNothing,
}

/// Standalone `VALUES (...), (...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValuesStatement {
    pub leading_comments: Vec<Comment>,
    pub values: ValuesClause,
}

/// `EXPLAIN [ANALYZE] [VERBOSE] [(options)] <statement>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Explain {
    pub leading_comments: Vec<Comment>,
    pub analyze: bool,
    pub verbose: bool,
    pub options: Vec<ExplainOption>,
    pub inner: Box<Statement>,
}

/// One option inside `EXPLAIN (...)`. A bare name is an implicit TRUE and
/// stays bare on output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExplainOption {
    pub name: String,
    pub value: Option<String>,
}
