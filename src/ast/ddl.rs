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

//! DDL statements: CREATE/ALTER TABLE, DROP, indexes, views, policies,
//! GRANT/REVOKE, TRUNCATE.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::expr::{Expr, TypeName};
use super::query::{OrderByExpr, QueryExpr};
use super::{Comment, Ident, ObjectName};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CreateTable {
    pub leading_comments: Vec<Comment>,
    pub temporary: bool,
    pub unlogged: bool,
    pub if_not_exists: bool,
    pub name: ObjectName,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
    pub inherits: Vec<ObjectName>,
    /// `PARTITION BY RANGE (col, ...)`: method plus key expressions.
    pub partition_by: Option<(String, Vec<Expr>)>,
    /// PostgreSQL `WITH (fillfactor = 70)`.
    pub with_options: Vec<SqlOption>,
    pub tablespace: Option<Ident>,
    /// MySQL trailing options: `ENGINE=InnoDB`, `DEFAULT CHARSET=utf8mb4`.
    pub table_options: Vec<SqlOption>,
    pub as_query: Option<QueryExpr>,
}

/// A `name = value` option in a WITH list or MySQL table tail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SqlOption {
    pub name: String,
    pub value: Option<Expr>,
}

/// One column element of CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnDef {
    pub name: Ident,
    pub data_type: TypeName,
    pub collation: Option<ObjectName>,
    pub options: Vec<ColumnOptionDef>,
    pub leading_comments: Vec<Comment>,
    pub trailing_comment: Option<Comment>,
}

/// An optionally-named column constraint: `[CONSTRAINT name] <option>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnOptionDef {
    pub name: Option<Ident>,
    pub option: ColumnOption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColumnOption {
    NotNull,
    Null,
    Default(Expr),
    PrimaryKey,
    Unique,
    /// MySQL `AUTO_INCREMENT`.
    AutoIncrement,
    /// `GENERATED {ALWAYS | BY DEFAULT} AS IDENTITY`.
    GeneratedIdentity { always: bool },
    /// `GENERATED ALWAYS AS (expr) [STORED]`.
    GeneratedExpr { expr: Expr, stored: bool },
    References {
        table: ObjectName,
        columns: Vec<Ident>,
        on_delete: Option<ReferentialAction>,
        on_update: Option<ReferentialAction>,
    },
    Check(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        })
    }
}

/// Table-level constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TableConstraint {
    Unique {
        name: Option<Ident>,
        columns: Vec<Ident>,
    },
    PrimaryKey {
        name: Option<Ident>,
        columns: Vec<Ident>,
    },
    ForeignKey {
        name: Option<Ident>,
        columns: Vec<Ident>,
        foreign_table: ObjectName,
        referred_columns: Vec<Ident>,
        on_delete: Option<ReferentialAction>,
        on_update: Option<ReferentialAction>,
    },
    Check {
        name: Option<Ident>,
        expr: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlterTable {
    pub leading_comments: Vec<Comment>,
    pub if_exists: bool,
    pub only: bool,
    pub name: ObjectName,
    pub actions: Vec<AlterAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlterAction {
    AddColumn {
        if_not_exists: bool,
        def: ColumnDef,
    },
    DropColumn {
        if_exists: bool,
        name: Ident,
        cascade: bool,
    },
    AlterColumn {
        name: Ident,
        op: AlterColumnOp,
    },
    AddConstraint(TableConstraint),
    DropConstraint {
        if_exists: bool,
        name: Ident,
        cascade: bool,
    },
    RenameColumn {
        old: Ident,
        new: Ident,
    },
    RenameTable(ObjectName),
    OwnerTo(Ident),
    SetSchema(Ident),
    EnableRowLevelSecurity,
    DisableRowLevelSecurity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlterColumnOp {
    SetDefault(Expr),
    DropDefault,
    SetNotNull,
    DropNotNull,
    SetType {
        data_type: TypeName,
        using: Option<Expr>,
    },
}

/// `DROP <objtype> [IF EXISTS] name [, ...] [CASCADE | RESTRICT]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Drop {
    pub leading_comments: Vec<Comment>,
    pub object_type: ObjectType,
    pub if_exists: bool,
    pub concurrently: bool,
    pub names: Vec<ObjectName>,
    /// `DROP POLICY p ON t` / `DROP TRIGGER tg ON t`.
    pub on_table: Option<ObjectName>,
    pub behavior: Option<DropBehavior>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectType {
    Table,
    View,
    MaterializedView,
    Index,
    Schema,
    Sequence,
    Function,
    Trigger,
    Policy,
    Role,
    Extension,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ObjectType::Table => "TABLE",
            ObjectType::View => "VIEW",
            ObjectType::MaterializedView => "MATERIALIZED VIEW",
            ObjectType::Index => "INDEX",
            ObjectType::Schema => "SCHEMA",
            ObjectType::Sequence => "SEQUENCE",
            ObjectType::Function => "FUNCTION",
            ObjectType::Trigger => "TRIGGER",
            ObjectType::Policy => "POLICY",
            ObjectType::Role => "ROLE",
            ObjectType::Extension => "EXTENSION",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DropBehavior {
    Cascade,
    Restrict,
}

impl fmt::Display for DropBehavior {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            DropBehavior::Cascade => "CASCADE",
            DropBehavior::Restrict => "RESTRICT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CreateIndex {
    pub leading_comments: Vec<Comment>,
    pub unique: bool,
    pub concurrently: bool,
    pub if_not_exists: bool,
    pub name: Option<Ident>,
    pub table: ObjectName,
    /// `USING btree` / `USING gin`.
    pub using: Option<Ident>,
    pub columns: Vec<OrderByExpr>,
    pub include: Vec<Ident>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CreateView {
    pub leading_comments: Vec<Comment>,
    pub or_replace: bool,
    pub materialized: bool,
    pub if_not_exists: bool,
    pub name: ObjectName,
    pub columns: Vec<Ident>,
    pub query: QueryExpr,
    pub with_check_option: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CreatePolicy {
    pub leading_comments: Vec<Comment>,
    pub name: Ident,
    pub table: ObjectName,
    /// `AS PERMISSIVE` (true) / `AS RESTRICTIVE` (false).
    pub permissive: Option<bool>,
    pub command: Option<PolicyCommand>,
    pub to: Vec<Ident>,
    pub using: Option<Expr>,
    pub with_check: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolicyCommand {
    All,
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for PolicyCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            PolicyCommand::All => "ALL",
            PolicyCommand::Select => "SELECT",
            PolicyCommand::Insert => "INSERT",
            PolicyCommand::Update => "UPDATE",
            PolicyCommand::Delete => "DELETE",
        })
    }
}

/// `GRANT` and `REVOKE` share a shape; `revoke` flips the rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grant {
    pub leading_comments: Vec<Comment>,
    pub revoke: bool,
    /// `REVOKE GRANT OPTION FOR ...`.
    pub grant_option_for: bool,
    pub privileges: Privileges,
    pub objects: GrantObjects,
    pub grantees: Vec<Ident>,
    pub with_grant_option: bool,
    pub granted_by: Option<Ident>,
    pub behavior: Option<DropBehavior>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Privileges {
    All,
    /// Privilege names, each with optional column list:
    /// `SELECT (id, name), UPDATE`.
    Actions(Vec<(String, Vec<Ident>)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GrantObjects {
    Tables(Vec<ObjectName>),
    Sequences(Vec<ObjectName>),
    Schemas(Vec<ObjectName>),
    AllTablesInSchema(Vec<ObjectName>),
    AllSequencesInSchema(Vec<ObjectName>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Truncate {
    pub leading_comments: Vec<Comment>,
    /// Whether the optional `TABLE` keyword was present.
    pub table_keyword: bool,
    pub only: bool,
    pub tables: Vec<ObjectName>,
    pub identity: Option<TruncateIdentity>,
    pub behavior: Option<DropBehavior>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TruncateIdentity {
    Restart,
    Continue,
}

impl fmt::Display for TruncateIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TruncateIdentity::Restart => "RESTART IDENTITY",
            TruncateIdentity::Continue => "CONTINUE IDENTITY",
        })
    }
}
