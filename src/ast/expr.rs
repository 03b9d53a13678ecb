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

//! Expression nodes and the operator vocabulary.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::query::{OrderByExpr, QueryExpr};
use super::{Ident, ObjectName};

/// An SQL expression of any type.
///
/// The parser does not distinguish between expressions of different types
/// (boolean vs string vs numeric); the layout engine only decides how to
/// render them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// Column or table name, e.g. `file_hash`.
    Identifier(Ident),
    /// Multi-part name, e.g. `r.last_name` or `schema.table.col`.
    Compound(Vec<Ident>),
    /// Bare `*`.
    Wildcard,
    /// `alias.*` or `schema.table.*`.
    QualifiedWildcard(Vec<Ident>),
    /// A literal value; see [`Literal`].
    Literal(Literal),
    /// `DATE '2020-01-01'` and other `<type> '<text>'` constants.
    TypedString { data_type: TypeName, value: String },
    /// `INTERVAL '90' MINUTE [TO SECOND]`; `value` is the verbatim literal,
    /// `qualifier` the uppercased unit words, if any.
    Interval {
        value: String,
        qualifier: Option<String>,
    },
    /// Binary operation, e.g. `1 + 1` or `foo > bar`.
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    /// Unary operation, e.g. `NOT foo` or `-x`.
    Unary { op: UnaryOperator, expr: Box<Expr> },
    /// `IS [NOT] NULL | TRUE | FALSE | UNKNOWN | DISTINCT FROM <expr>`.
    Is {
        expr: Box<Expr>,
        negated: bool,
        tail: IsTail,
    },
    /// `<expr> [NOT] BETWEEN <low> AND <high>`.
    Between {
        expr: Box<Expr>,
        negated: bool,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    /// `[NOT] IN (val1, val2, ...)`.
    InList {
        expr: Box<Expr>,
        negated: bool,
        list: Vec<Expr>,
    },
    /// `[NOT] IN (SELECT ...)`. Kept apart from [`Expr::InList`]: every
    /// layout branch depends on which case it is.
    InSubquery {
        expr: Box<Expr>,
        negated: bool,
        subquery: Box<QueryExpr>,
    },
    /// `[NOT] LIKE | ILIKE | SIMILAR TO <pattern> [ESCAPE <char>]`.
    Like {
        expr: Box<Expr>,
        negated: bool,
        kind: LikeKind,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
    },
    /// `[NOT] EXISTS (SELECT ...)`.
    Exists {
        subquery: Box<QueryExpr>,
        negated: bool,
    },
    /// `foo > ANY (...)`, `foo = SOME (...)`, `foo <> ALL (...)`.
    AnyAll {
        left: Box<Expr>,
        op: BinaryOperator,
        quantifier: Quantifier,
        right: Box<Expr>,
    },
    /// Parenthesised expression, e.g. `(foo > bar)`.
    Nested(Box<Expr>),
    /// Row value without the `ROW` keyword: `(a, b)`.
    Tuple(Vec<Expr>),
    /// `ROW(a, b)`.
    Row(Vec<Expr>),
    /// Function call, including aggregates and window functions.
    Function(FunctionCall),
    /// `CASE [<operand>] WHEN ... THEN ... [ELSE ...] END`.
    Case(CaseExpr),
    /// `CAST(<expr> AS <type>)`.
    Cast {
        expr: Box<Expr>,
        data_type: TypeName,
    },
    /// PostgreSQL `<expr>::<type>`.
    PgCast {
        expr: Box<Expr>,
        data_type: TypeName,
    },
    /// `<expr> AT TIME ZONE <zone>`.
    AtTimeZone { expr: Box<Expr>, zone: Box<Expr> },
    /// `EXTRACT(<field> FROM <expr>)`.
    Extract { field: String, expr: Box<Expr> },
    /// `POSITION(<needle> IN <haystack>)`.
    Position {
        needle: Box<Expr>,
        haystack: Box<Expr>,
    },
    /// `SUBSTRING(<expr> [FROM <start>] [FOR <len>])`.
    Substring {
        expr: Box<Expr>,
        from: Option<Box<Expr>>,
        for_length: Option<Box<Expr>>,
    },
    /// `OVERLAY(<expr> PLACING <what> FROM <start> [FOR <len>])`.
    Overlay {
        expr: Box<Expr>,
        placing: Box<Expr>,
        from: Box<Expr>,
        for_length: Option<Box<Expr>>,
    },
    /// `TRIM([BOTH | LEADING | TRAILING] [<what> FROM] <expr>)`.
    Trim {
        side: Option<TrimSide>,
        what: Option<Box<Expr>>,
        expr: Box<Expr>,
    },
    /// `ARRAY[1, 2, 3]`.
    Array(Vec<Expr>),
    /// `ARRAY(SELECT ...)`.
    ArraySubquery(Box<QueryExpr>),
    /// `arr[2]` or `arr[1:3]`.
    Subscript {
        expr: Box<Expr>,
        subscript: Box<Subscript>,
    },
    /// `<expr> COLLATE <collation>`.
    Collate {
        expr: Box<Expr>,
        collation: ObjectName,
    },
    /// Scalar subquery `(SELECT ...)`.
    Subquery(Box<QueryExpr>),
    /// Verbatim fallback for constructs the grammar recognises but does not
    /// model (e.g. `OPERATOR(schema.+)`).
    Raw(String),
}

/// A literal value. String-like literals stay verbatim (quotes and prefixes
/// included) so nothing inside them ever changes case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// Numeric literal, kept as written (`1.50` does not become `1.5`).
    Number(String),
    /// `'text'`, `E'text'`, `X'ff'`, kept verbatim.
    String(String),
    /// `$tag$ ... $tag$`, kept verbatim.
    DollarString(String),
    Boolean(bool),
    Null,
    /// `$1` or `?` placeholders.
    Parameter(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Number(s) | Literal::String(s) | Literal::DollarString(s) => f.write_str(s),
            Literal::Boolean(true) => f.write_str("TRUE"),
            Literal::Boolean(false) => f.write_str("FALSE"),
            Literal::Null => f.write_str("NULL"),
            Literal::Parameter(s) => f.write_str(s),
        }
    }
}

/// Tail of an `IS [NOT] ...` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IsTail {
    Null,
    True,
    False,
    Unknown,
    DistinctFrom(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LikeKind {
    Like,
    ILike,
    SimilarTo,
    /// MySQL `REGEXP` / `RLIKE`.
    Regexp,
}

impl fmt::Display for LikeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            LikeKind::Like => "LIKE",
            LikeKind::ILike => "ILIKE",
            LikeKind::SimilarTo => "SIMILAR TO",
            LikeKind::Regexp => "REGEXP",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Quantifier {
    Any,
    Some,
    All,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Quantifier::Any => "ANY",
            Quantifier::Some => "SOME",
            Quantifier::All => "ALL",
        })
    }
}

/// Binary operators, rendered with a space on each side except for the
/// tightly-binding JSON and cast operators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOperator {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    StringConcat,
    BitwiseOr,
    BitwiseAnd,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    /// `->`
    Arrow,
    /// `->>`
    LongArrow,
    /// `#>`
    HashArrow,
    /// `#>>`
    HashLongArrow,
    /// `@>`
    AtArrow,
    /// `<@`
    ArrowAt,
    /// `?`
    Question,
    /// `?|`
    QuestionPipe,
    /// `?&`
    QuestionAnd,
    /// `&&` (array overlap)
    Overlap,
    /// `~`
    Regex,
    /// `~*`
    RegexCI,
    /// `!~`
    NotRegex,
    /// `!~*`
    NotRegexCI,
}

impl BinaryOperator {
    /// JSON path operators keep their operands snug (`payload->>'id'`).
    pub fn is_tight(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Arrow
                | BinaryOperator::LongArrow
                | BinaryOperator::HashArrow
                | BinaryOperator::HashLongArrow
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            BinaryOperator::Or => "OR",
            BinaryOperator::And => "AND",
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Exponent => "^",
            BinaryOperator::StringConcat => "||",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseXor => "#",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Arrow => "->",
            BinaryOperator::LongArrow => "->>",
            BinaryOperator::HashArrow => "#>",
            BinaryOperator::HashLongArrow => "#>>",
            BinaryOperator::AtArrow => "@>",
            BinaryOperator::ArrowAt => "<@",
            BinaryOperator::Question => "?",
            BinaryOperator::QuestionPipe => "?|",
            BinaryOperator::QuestionAnd => "?&",
            BinaryOperator::Overlap => "&&",
            BinaryOperator::Regex => "~",
            BinaryOperator::RegexCI => "~*",
            BinaryOperator::NotRegex => "!~",
            BinaryOperator::NotRegexCI => "!~*",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    /// `~` (bitwise not)
    BitwiseNot,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "NOT",
            UnaryOperator::BitwiseNot => "~",
        })
    }
}

/// A subscript: `arr[i]` or `arr[i:j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Subscript {
    Index(Expr),
    Slice {
        lower: Option<Expr>,
        upper: Option<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrimSide {
    Both,
    Leading,
    Trailing,
}

impl fmt::Display for TrimSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TrimSide::Both => "BOTH",
            TrimSide::Leading => "LEADING",
            TrimSide::Trailing => "TRAILING",
        })
    }
}

/// A type name with optional parameters and array dimensions, e.g.
/// `NUMERIC(10,2)`, `TIMESTAMP WITH TIME ZONE`, `TEXT[]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeName {
    /// Uppercased, possibly multi-word name (`DOUBLE PRECISION`).
    pub name: String,
    /// Parenthesised modifiers, kept as written (`10`, `2`).
    pub modifiers: Vec<String>,
    /// Number of `[]` suffixes.
    pub array_dims: usize,
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> TypeName {
        TypeName {
            name: name.into(),
            modifiers: Vec::new(),
            array_dims: 0,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.modifiers.is_empty() {
            write!(f, "({})", self.modifiers.join(", "))?;
        }
        for _ in 0..self.array_dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// Scalar or aggregate function call, with the aggregate and window
/// trimmings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionCall {
    pub name: ObjectName,
    pub args: Vec<Expr>,
    pub distinct: bool,
    /// `ARRAY_AGG(x ORDER BY y)`: ordering inside the call.
    pub order_by: Vec<OrderByExpr>,
    /// `WITHIN GROUP (ORDER BY ...)`.
    pub within_group: Vec<OrderByExpr>,
    /// `FILTER (WHERE ...)`.
    pub filter: Option<Box<Expr>>,
    /// `OVER w` or `OVER (...)`.
    pub over: Option<Over>,
}

impl FunctionCall {
    pub fn bare(name: ObjectName, args: Vec<Expr>) -> FunctionCall {
        FunctionCall {
            name,
            args,
            distinct: false,
            order_by: Vec::new(),
            within_group: Vec::new(),
            filter: None,
            over: None,
        }
    }
}

/// The `OVER` clause of a window function.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Over {
    /// Reference to a window named in the `WINDOW` clause.
    Named(Ident),
    Spec(WindowSpec),
}

/// An inline window specification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowSpec {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub frame: Option<WindowFrame>,
}

/// `ROWS|RANGE|GROUPS BETWEEN <start> AND <end> [EXCLUDE ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    /// `None` when the frame was written with a single bound.
    pub end: Option<FrameBound>,
    pub exclude: Option<FrameExclusion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameUnits {
    Rows,
    Range,
    Groups,
}

impl fmt::Display for FrameUnits {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            FrameUnits::Rows => "ROWS",
            FrameUnits::Range => "RANGE",
            FrameUnits::Groups => "GROUPS",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameBound {
    CurrentRow,
    UnboundedPreceding,
    UnboundedFollowing,
    Preceding(Box<Expr>),
    Following(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameExclusion {
    CurrentRow,
    Group,
    Ties,
    NoOthers,
}

impl fmt::Display for FrameExclusion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            FrameExclusion::CurrentRow => "EXCLUDE CURRENT ROW",
            FrameExclusion::Group => "EXCLUDE GROUP",
            FrameExclusion::Ties => "EXCLUDE TIES",
            FrameExclusion::NoOthers => "EXCLUDE NO OTHERS",
        })
    }
}

/// `CASE [<operand>] WHEN <condition> THEN <result> ... [ELSE <result>] END`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseExpr {
    pub operand: Option<Box<Expr>>,
    pub branches: Vec<CaseWhen>,
    pub else_result: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseWhen {
    pub condition: Expr,
    pub result: Expr,
}
