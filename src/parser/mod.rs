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

//! Recursive-descent SQL parser with statement-boundary recovery.
//!
//! The statement loop classifies the current token against the dialect's
//! statement starters and dispatches to a dedicated production. Starters
//! without a production (`VACUUM`, `GO`, `DELIMITER`, ...) are captured
//! verbatim as raw passthrough nodes. When a recognised production fails and
//! recovery is enabled, the parser rewinds to the statement's first token,
//! skips to the next boundary, and emits a raw node so one broken statement
//! never poisons the rest of the input.

use std::error::Error;
use std::fmt;

use log::debug;

use crate::ast::*;
use crate::dialect::DialectProfile;
use crate::tokenizer::{Token, TokenKind};

mod ddl;
mod expr;

/// Parser failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// Grammar violation at the given byte offset.
    Syntax { message: String, offset: usize },
    /// The recursion depth guard tripped before the stack could overflow.
    RecursionLimitExceeded,
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParserError::Syntax { message, offset } => {
                write!(f, "{message} at byte {offset}")
            }
            ParserError::RecursionLimitExceeded => f.write_str("recursion limit exceeded"),
        }
    }
}

impl Error for ParserError {}

/// What happened to a statement that did not parse cleanly. Indices are
/// 1-based positions in the attempted-statement sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEvent {
    pub statement_index: usize,
    /// Position in the output statement list, when the statement produced one.
    pub slot: Option<usize>,
    pub kind: ParseEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEventKind {
    /// A production failed; recovery captured the text as a raw node.
    Recovered(ParserError),
    /// A production failed and no text could be captured.
    Dropped(ParserError),
    /// An intentionally unsupported statement passed through verbatim.
    Passthrough,
}

/// A comment pulled out of the token stream, waiting to be attached.
#[derive(Debug, Clone)]
struct PendingComment {
    comment: Comment,
    /// Whether a line break separated it from the preceding token.
    starts_line: bool,
    offset: usize,
}

/// Recursive-descent parser over a token slice.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    src: &'a str,
    profile: &'a DialectProfile,
    index: usize,
    depth: usize,
    max_depth: usize,
    recover: bool,
    pending: Vec<PendingComment>,
    prev_end: usize,
    events: Vec<ParseEvent>,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        src: &'a str,
        profile: &'a DialectProfile,
        max_depth: usize,
        recover: bool,
    ) -> Parser<'a> {
        let mut parser = Parser {
            tokens,
            src,
            profile,
            index: 0,
            depth: 0,
            max_depth,
            recover,
            pending: Vec::new(),
            prev_end: 0,
            events: Vec::new(),
        };
        parser.collect_comments();
        parser
    }

    // ------------------------------------------------------------------
    // Token primitives
    // ------------------------------------------------------------------

    fn peek_token(&self) -> &Token {
        &self.tokens[self.index]
    }

    fn at_eof(&self) -> bool {
        self.peek_token().kind == TokenKind::Eof
    }

    /// Uppercased text of the token `n` non-comment positions ahead.
    fn peek_upper_at(&self, n: usize) -> &str {
        let mut remaining = n;
        let mut i = self.index;
        while i < self.tokens.len() {
            if self.tokens[i].is_comment() {
                i += 1;
                continue;
            }
            if remaining == 0 {
                return &self.tokens[i].upper;
            }
            remaining -= 1;
            i += 1;
        }
        ""
    }

    /// Does the current token (case-insensitively) equal `expected`?
    fn check(&self, expected: &str) -> bool {
        let token = self.peek_token();
        token.kind != TokenKind::Eof
            && !matches!(
                token.kind,
                TokenKind::String | TokenKind::DollarString | TokenKind::QuotedIdentifier
            )
            && token.upper == expected
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek_token().kind
    }

    /// Kind of the token `n` non-comment positions ahead.
    fn peek_kind_at(&self, n: usize) -> Option<TokenKind> {
        let mut remaining = n;
        let mut i = self.index;
        while i < self.tokens.len() {
            if self.tokens[i].is_comment() {
                i += 1;
                continue;
            }
            if remaining == 0 {
                return Some(self.tokens[i].kind);
            }
            remaining -= 1;
            i += 1;
        }
        None
    }

    fn peek_text_starts_with(&self, ch: char) -> bool {
        self.peek_token().text.starts_with(ch)
    }

    fn profile_name(&self) -> &str {
        self.profile.name()
    }

    /// Is the current token a word (keyword or identifier)?
    fn check_word_token(&self) -> bool {
        matches!(
            self.peek_token().kind,
            TokenKind::Keyword | TokenKind::Identifier
        )
    }

    /// Consumes and returns the current token, pulling any comments that
    /// follow it into the pending queue.
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.index].clone();
        if token.kind != TokenKind::Eof {
            self.prev_end = token.end();
            self.index += 1;
            self.collect_comments();
        }
        token
    }

    /// Consumes the current token if it equals `expected`.
    fn consume(&mut self, expected: &str) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the whole word sequence or nothing.
    fn consume_seq(&mut self, words: &[&str]) -> bool {
        for (i, word) in words.iter().enumerate() {
            if self.peek_upper_at(i) != *word {
                return false;
            }
        }
        for _ in words {
            self.advance();
        }
        true
    }

    fn expect(&mut self, expected: &str) -> Result<Token, ParserError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            self.expected(expected)
        }
    }

    fn expected<T>(&self, what: &str) -> Result<T, ParserError> {
        let token = self.peek_token();
        Err(ParserError::Syntax {
            message: format!("expected {what}, found: {token}"),
            offset: token.offset,
        })
    }

    fn with_depth<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParserError>,
    ) -> Result<T, ParserError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            return Err(ParserError::RecursionLimitExceeded);
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ------------------------------------------------------------------
    // Comment threading
    // ------------------------------------------------------------------

    /// Pulls consecutive comment tokens at the cursor into the pending queue.
    fn collect_comments(&mut self) {
        while self.index < self.tokens.len() && self.tokens[self.index].is_comment() {
            let token = &self.tokens[self.index];
            let gap = &self.src[self.prev_end.min(token.offset)..token.offset];
            let newlines = gap.matches('\n').count();
            let style = match token.kind {
                TokenKind::LineComment => CommentStyle::Line,
                _ => CommentStyle::Block,
            };
            self.pending.push(PendingComment {
                comment: Comment {
                    style,
                    text: token.text.clone(),
                    blank_lines_before: usize::from(newlines >= 2),
                },
                starts_line: newlines > 0 || token.offset == 0,
                offset: token.offset,
            });
            self.prev_end = token.end();
            self.index += 1;
        }
    }

    /// Takes every pending comment as a leading-comment list.
    fn take_leading_comments(&mut self) -> Vec<Comment> {
        self.pending.drain(..).map(|p| p.comment).collect()
    }

    /// Takes one pending comment as a trailing comment if it sits on the
    /// same source line as the content that just finished.
    fn take_trailing_comment(&mut self) -> Option<Comment> {
        if let Some(first) = self.pending.first() {
            if !first.starts_line {
                return Some(self.pending.remove(0).comment);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Statement loop
    // ------------------------------------------------------------------

    /// Parses every statement in the input. With recovery enabled the only
    /// errors that escape are depth-guard trips on the very first statement
    /// token (nothing consumed yet, nothing to capture).
    pub fn parse_statements(mut self) -> Result<(Vec<Statement>, Vec<ParseEvent>), ParserError> {
        let mut statements: Vec<Statement> = Vec::new();
        let mut attempt = 0usize;

        loop {
            while self.check(";") {
                self.advance();
            }
            if self.at_eof() {
                let leading = self.take_leading_comments();
                if !leading.is_empty() {
                    statements.push(Statement::Raw(Box::new(Raw {
                        text: String::new(),
                        reason: RawReason::CommentOnly,
                        leading_comments: leading,
                    })));
                }
                break;
            }

            attempt += 1;
            let leading = self.take_leading_comments();
            let start_index = self.index;
            let start_offset = self.peek_token().offset;

            match self.parse_statement() {
                Ok(mut statement) => {
                    let mut comments = leading;
                    comments.append(statement.leading_comments_mut());
                    *statement.leading_comments_mut() = comments;
                    if matches!(&statement, Statement::Raw(r) if r.reason == RawReason::Unsupported)
                    {
                        self.events.push(ParseEvent {
                            statement_index: attempt,
                            slot: Some(statements.len()),
                            kind: ParseEventKind::Passthrough,
                        });
                    }
                    statements.push(statement);
                }
                // Depth-guard trips are not recoverable: truncating a grammar
                // production cannot be done safely.
                Err(error)
                    if self.recover && error != ParserError::RecursionLimitExceeded =>
                {
                    debug!("recovering from parse error: {error}");
                    self.index = start_index;
                    self.pending.retain(|p| p.offset < start_offset);
                    self.prev_end = start_offset;
                    self.collect_comments();
                    let end_offset = self.skip_to_boundary();
                    let text = self.src[start_offset..end_offset].trim().to_string();
                    self.pending.retain(|p| p.offset >= end_offset);
                    if text.is_empty() {
                        self.events.push(ParseEvent {
                            statement_index: attempt,
                            slot: None,
                            kind: ParseEventKind::Dropped(error),
                        });
                    } else {
                        self.events.push(ParseEvent {
                            statement_index: attempt,
                            slot: Some(statements.len()),
                            kind: ParseEventKind::Recovered(error),
                        });
                        statements.push(Statement::Raw(Box::new(Raw {
                            text,
                            reason: RawReason::ParseError,
                            leading_comments: leading,
                        })));
                    }
                }
                Err(error) => return Err(error),
            }
        }

        Ok((statements, self.events))
    }

    /// Skips tokens until a statement boundary: a `;` (always), or a
    /// statement starter at paren depth 0 that begins a new source line.
    /// Returns the byte offset one past the captured text.
    fn skip_to_boundary(&mut self) -> usize {
        let mut paren_depth = 0i64;
        let mut last_end = self.peek_token().offset;
        let mut consumed_any = false;
        while !self.at_eof() {
            if self.check(";") {
                let token = self.advance();
                return token.end();
            }
            if consumed_any && paren_depth == 0 && self.at_fresh_statement_starter(last_end) {
                return last_end;
            }
            let token = self.advance();
            consumed_any = true;
            match token.text.as_str() {
                "(" => paren_depth += 1,
                ")" => paren_depth -= 1,
                _ => {}
            }
            last_end = token.end();
        }
        last_end
    }

    /// Is one of the join-introducing keywords next?
    fn join_keyword_follows(&self) -> bool {
        matches!(
            self.peek_upper_at(0),
            "JOIN"
                | "INNER"
                | "LEFT"
                | "RIGHT"
                | "FULL"
                | "CROSS"
                | "NATURAL"
                | "STRAIGHT_JOIN"
        )
    }

    /// A starter keyword preceded by a line break ends a semicolonless
    /// statement such as T-SQL `GO`.
    fn at_fresh_statement_starter(&self, prev_end: usize) -> bool {
        let token = self.peek_token();
        if !self.check_word_token() || !self.profile.is_statement_starter(&token.upper) {
            return false;
        }
        self.src[prev_end.min(token.offset)..token.offset].contains('\n')
    }

    // ------------------------------------------------------------------
    // Statement dispatch
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        let starter = self.peek_upper_at(0).to_string();
        if self.check("(") {
            return Ok(Statement::Query(self.parse_query_expr()?));
        }
        if !self.check_word_token() {
            return self.expected("a statement");
        }
        match starter.as_str() {
            "SELECT" => Ok(Statement::Query(self.parse_query_expr()?)),
            "WITH" => Ok(Statement::Query(self.parse_query_expr()?)),
            "INSERT" => self.parse_insert(),
            "UPDATE" => self.parse_update(),
            "DELETE" => self.parse_delete(),
            "MERGE" => self.parse_merge(),
            "CREATE" => self.parse_create(),
            "ALTER" => {
                if self.peek_upper_at(1) == "TABLE" {
                    self.parse_alter_table()
                } else {
                    self.parse_passthrough()
                }
            }
            "DROP" => self.parse_drop(),
            "GRANT" => self.parse_grant(false),
            "REVOKE" => self.parse_grant(true),
            "TRUNCATE" => self.parse_truncate(),
            "VALUES" => self.parse_values_statement(),
            "EXPLAIN" => self.parse_explain(),
            _ if self.profile.is_statement_starter(&starter) => self.parse_passthrough(),
            _ => self.expected("a statement"),
        }
    }

    /// Captures an intentionally unsupported statement verbatim.
    fn parse_passthrough(&mut self) -> Result<Statement, ParserError> {
        let start_offset = self.peek_token().offset;
        debug!("passing through unsupported statement: {}", self.peek_token());
        let end_offset = self.skip_to_boundary();
        self.pending.retain(|p| p.offset >= end_offset);
        let text = self.src[start_offset..end_offset].trim().to_string();
        Ok(Statement::Raw(Box::new(Raw {
            text,
            reason: RawReason::Unsupported,
            leading_comments: Vec::new(),
        })))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Parses a query expression: `WITH`, a `SELECT`, or a chain of set
    /// operations, with any chain-level ORDER BY / LIMIT tail.
    pub(crate) fn parse_query_expr(&mut self) -> Result<QueryExpr, ParserError> {
        self.with_depth(|p| {
            if p.check("WITH") {
                return Ok(QueryExpr::With(Box::new(p.parse_with_query()?)));
            }

            let first = p.parse_set_member()?;
            let mut members = vec![first];
            let mut operators = Vec::new();
            loop {
                let kind = if p.check("UNION") {
                    SetOpKind::Union
                } else if p.check("INTERSECT") {
                    SetOpKind::Intersect
                } else if p.check("EXCEPT") {
                    SetOpKind::Except
                } else {
                    break;
                };
                p.advance();
                let quantifier = if p.consume("ALL") {
                    Some(SetQuantifier::All)
                } else if p.consume("DISTINCT") {
                    Some(SetQuantifier::Distinct)
                } else {
                    None
                };
                operators.push(SetOperator { kind, quantifier });
                // Comments between the operator and the next member attach
                // to the member, which keeps reformatting stable.
                members.push(p.parse_set_member()?);
            }

            if operators.is_empty() {
                let member = members.pop().expect("at least one member");
                return Ok(member.query);
            }

            let mut chain = SetOpChain {
                leading_comments: Vec::new(),
                members,
                operators,
                order_by: Vec::new(),
                limit: None,
                offset: None,
                fetch: None,
            };
            self_consume_order_tail(p, &mut chain)?;
            Ok(QueryExpr::SetOp(Box::new(chain)))
        })
    }

    fn parse_set_member(&mut self) -> Result<SetMember, ParserError> {
        let leading = self.take_leading_comments();
        if self.check("(") {
            self.advance();
            let mut query = self.parse_query_expr()?;
            self.expect(")")?;
            let mut comments = leading;
            comments.append(query.leading_comments_mut());
            *query.leading_comments_mut() = comments;
            return Ok(SetMember {
                query,
                parenthesized: true,
            });
        }
        if !self.check("SELECT") && !self.check("WITH") {
            return self.expected("SELECT");
        }
        let mut query = if self.check("WITH") {
            QueryExpr::With(Box::new(self.parse_with_query()?))
        } else {
            QueryExpr::Select(Box::new(self.parse_select()?))
        };
        let mut comments = leading;
        comments.append(query.leading_comments_mut());
        *query.leading_comments_mut() = comments;
        Ok(SetMember {
            query,
            parenthesized: false,
        })
    }

    fn parse_with_query(&mut self) -> Result<WithQuery, ParserError> {
        self.expect("WITH")?;
        let recursive = self.consume("RECURSIVE");
        let mut ctes = Vec::new();
        loop {
            ctes.push(self.parse_cte()?);
            if !self.consume(",") {
                break;
            }
        }
        let search = if self.check("SEARCH") {
            Some(self.parse_search_clause()?)
        } else {
            None
        };
        let cycle = if self.check("CYCLE") {
            Some(self.parse_cycle_clause()?)
        } else {
            None
        };
        let body = Box::new(self.parse_query_expr()?);
        Ok(WithQuery {
            leading_comments: Vec::new(),
            recursive,
            ctes,
            search,
            cycle,
            body,
        })
    }

    fn parse_cte(&mut self) -> Result<Cte, ParserError> {
        let leading = self.take_leading_comments();
        let name = self.parse_identifier()?;
        let columns = if self.check("(") {
            self.parse_paren_identifier_list()?
        } else {
            Vec::new()
        };
        self.expect("AS")?;
        let materialized = if self.consume("MATERIALIZED") {
            Some(true)
        } else if self.consume_seq(&["NOT", "MATERIALIZED"]) {
            Some(false)
        } else {
            None
        };
        self.expect("(")?;
        let query = self.parse_query_expr()?;
        self.expect(")")?;
        Ok(Cte {
            leading_comments: leading,
            name,
            columns,
            materialized,
            query,
        })
    }

    fn parse_search_clause(&mut self) -> Result<SearchClause, ParserError> {
        self.expect("SEARCH")?;
        let breadth_first = if self.consume("BREADTH") {
            true
        } else if self.consume("DEPTH") {
            false
        } else {
            return self.expected("BREADTH or DEPTH");
        };
        self.expect("FIRST")?;
        self.expect("BY")?;
        let by = self.parse_identifier_list()?;
        self.expect("SET")?;
        let set = self.parse_identifier()?;
        Ok(SearchClause {
            breadth_first,
            by,
            set,
        })
    }

    fn parse_cycle_clause(&mut self) -> Result<CycleClause, ParserError> {
        self.expect("CYCLE")?;
        let columns = self.parse_identifier_list()?;
        self.expect("SET")?;
        let set = self.parse_identifier()?;
        let (mut to_value, mut default_value) = (None, None);
        if self.consume("TO") {
            to_value = Some(self.parse_expr()?);
            self.expect("DEFAULT")?;
            default_value = Some(self.parse_expr()?);
        }
        let using = if self.consume("USING") {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        Ok(CycleClause {
            columns,
            set,
            to_value,
            default_value,
            using,
        })
    }

    pub(crate) fn parse_select(&mut self) -> Result<Select, ParserError> {
        self.expect("SELECT")?;
        let mut select = Select::default();

        if self.consume("DISTINCT") {
            select.distinct = if self.consume("ON") {
                self.expect("(")?;
                let exprs = self.parse_expr_list()?;
                self.expect(")")?;
                Some(Distinct::On(exprs))
            } else {
                Some(Distinct::Distinct)
            };
        } else {
            self.consume("ALL");
        }

        // TOP is only a keyword under the T-SQL profile; anywhere else the
        // word stays an ordinary identifier.
        if self.peek_kind() == TokenKind::Keyword && self.check("TOP") {
            select.top = Some(self.parse_top()?);
        }

        select.columns = self.parse_select_columns()?;

        if self.consume("FROM") {
            let mut items = vec![self.parse_table_ref()?];
            while self.consume(",") {
                items.push(self.parse_table_ref()?);
            }
            select.from = Some(FromClause { items });
            select.joins = self.parse_joins()?;
        }

        if self.consume("WHERE") {
            select.where_clause = Some(self.parse_expr()?);
        }
        if self.check("GROUP") {
            select.group_by = Some(self.parse_group_by()?);
        }
        if self.consume("HAVING") {
            select.having = Some(self.parse_expr()?);
        }
        if self.consume("WINDOW") {
            loop {
                let name = self.parse_identifier()?;
                self.expect("AS")?;
                self.expect("(")?;
                let spec = self.parse_window_spec()?;
                self.expect(")")?;
                select.windows.push(NamedWindow { name, spec });
                if !self.consume(",") {
                    break;
                }
            }
        }
        if self.consume_seq(&["ORDER", "BY"]) {
            select.order_by = self.parse_order_by_list()?;
        }
        if self.consume("LIMIT") {
            select.limit = Some(if self.consume("ALL") {
                Limit::All
            } else {
                Limit::Count(self.parse_expr()?)
            });
        }
        if self.consume("OFFSET") {
            let value = self.parse_expr()?;
            let rows = self.consume("ROWS") || self.consume("ROW");
            select.offset = Some(Offset { value, rows });
        }
        if self.check("FETCH") {
            select.fetch = Some(self.parse_fetch()?);
        }
        while self.check("FOR") {
            select.locking.push(self.parse_locking_clause()?);
        }
        Ok(select)
    }

    fn parse_top(&mut self) -> Result<Top, ParserError> {
        self.expect("TOP")?;
        let parenthesized = self.consume("(");
        let quantity = self.parse_expr()?;
        if parenthesized {
            self.expect(")")?;
        }
        let percent = self.consume("PERCENT");
        let with_ties = self.consume_seq(&["WITH", "TIES"]);
        Ok(Top {
            quantity,
            parenthesized,
            percent,
            with_ties,
        })
    }

    fn parse_select_columns(&mut self) -> Result<Vec<SelectColumn>, ParserError> {
        let mut columns = Vec::new();
        loop {
            let leading = self.take_leading_comments();
            let expr = self.parse_expr()?;
            let alias = self.parse_column_alias()?;
            let mut column = SelectColumn {
                expr,
                alias,
                leading_comments: leading,
                trailing_comment: None,
            };
            let more = self.consume(",");
            column.trailing_comment = self.take_trailing_comment();
            columns.push(column);
            if !more {
                break;
            }
        }
        Ok(columns)
    }

    /// `RETURNING` shares the select-list grammar.
    fn parse_returning(&mut self) -> Result<Vec<SelectColumn>, ParserError> {
        self.parse_select_columns()
    }

    fn parse_group_by(&mut self) -> Result<GroupBy, ParserError> {
        self.expect("GROUP")?;
        self.expect("BY")?;
        let quantifier = if self.consume("ALL") {
            Some(SetQuantifier::All)
        } else if self.consume("DISTINCT") {
            Some(SetQuantifier::Distinct)
        } else {
            None
        };
        let mut elements = Vec::new();
        loop {
            elements.push(self.parse_grouping_element()?);
            if !self.consume(",") {
                break;
            }
        }
        Ok(GroupBy {
            quantifier,
            elements,
        })
    }

    fn parse_grouping_element(&mut self) -> Result<GroupingElement, ParserError> {
        if self.consume("ROLLUP") {
            self.expect("(")?;
            let exprs = self.parse_expr_list()?;
            self.expect(")")?;
            return Ok(GroupingElement::Rollup(exprs));
        }
        if self.consume("CUBE") {
            self.expect("(")?;
            let exprs = self.parse_expr_list()?;
            self.expect(")")?;
            return Ok(GroupingElement::Cube(exprs));
        }
        if self.consume_seq(&["GROUPING", "SETS"]) {
            self.expect("(")?;
            let mut sets = Vec::new();
            loop {
                self.expect("(")?;
                if self.consume(")") {
                    sets.push(Vec::new());
                } else {
                    sets.push(self.parse_expr_list()?);
                    self.expect(")")?;
                }
                if !self.consume(",") {
                    break;
                }
            }
            self.expect(")")?;
            return Ok(GroupingElement::GroupingSets(sets));
        }
        Ok(GroupingElement::Expr(self.parse_expr()?))
    }

    fn parse_fetch(&mut self) -> Result<Fetch, ParserError> {
        self.expect("FETCH")?;
        let first = if self.consume("FIRST") {
            true
        } else if self.consume("NEXT") {
            false
        } else {
            return self.expected("FIRST or NEXT");
        };
        let quantity = if self.check("ROW") || self.check("ROWS") {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let percent = self.consume("PERCENT");
        if !self.consume("ROWS") {
            self.consume("ROW");
        }
        let with_ties = if self.consume("ONLY") {
            false
        } else {
            self.consume_seq(&["WITH", "TIES"])
        };
        Ok(Fetch {
            first,
            quantity,
            percent,
            with_ties,
        })
    }

    fn parse_locking_clause(&mut self) -> Result<LockingClause, ParserError> {
        self.expect("FOR")?;
        let mode = if self.consume("UPDATE") {
            LockMode::Update
        } else if self.consume_seq(&["NO", "KEY", "UPDATE"]) {
            LockMode::NoKeyUpdate
        } else if self.consume_seq(&["KEY", "SHARE"]) {
            LockMode::KeyShare
        } else if self.consume("SHARE") {
            LockMode::Share
        } else {
            return self.expected("a lock mode");
        };
        let of = if self.consume("OF") {
            let mut names = vec![self.parse_object_name()?];
            while self.consume(",") {
                names.push(self.parse_object_name()?);
            }
            names
        } else {
            Vec::new()
        };
        let wait = if self.consume("NOWAIT") {
            Some(LockWait::Nowait)
        } else if self.consume_seq(&["SKIP", "LOCKED"]) {
            Some(LockWait::SkipLocked)
        } else {
            None
        };
        Ok(LockingClause { mode, of, wait })
    }

    // ------------------------------------------------------------------
    // FROM and JOIN
    // ------------------------------------------------------------------

    fn parse_table_ref(&mut self) -> Result<TableRef, ParserError> {
        let lateral = self.consume("LATERAL");
        let relation = if self.check("(") {
            self.advance();
            if self.check("SELECT") || self.check("WITH") || self.check("(") {
                let query = self.parse_query_expr()?;
                self.expect(")")?;
                Relation::Subquery(Box::new(query))
            } else if self.check("VALUES") {
                self.advance();
                let values = self.parse_values_rows()?;
                self.expect(")")?;
                Relation::Values(values)
            } else {
                return self.expected("a subquery or VALUES");
            }
        } else {
            let name = self.parse_object_name()?;
            if self.check("(") {
                // Table function such as unnest(...) or generate_series(...).
                let call = self.parse_function_call_with_name(name)?;
                Relation::Function(Box::new(call))
            } else {
                Relation::Table(name)
            }
        };
        let alias = self.parse_table_alias()?;
        let tablesample = if self.consume("TABLESAMPLE") {
            let method = self.parse_identifier()?;
            self.expect("(")?;
            let args = self.parse_expr_list()?;
            self.expect(")")?;
            let repeatable = if self.consume("REPEATABLE") {
                self.expect("(")?;
                let seed = self.parse_expr()?;
                self.expect(")")?;
                Some(seed)
            } else {
                None
            };
            Some(TableSample {
                method,
                args,
                repeatable,
            })
        } else {
            None
        };
        Ok(TableRef {
            relation,
            alias,
            lateral,
            tablesample,
        })
    }

    fn parse_joins(&mut self) -> Result<Vec<Join>, ParserError> {
        let mut joins = Vec::new();
        loop {
            if !self.join_keyword_follows() {
                break;
            }
            let leading = self.take_leading_comments();
            let join_type = if self.consume_seq(&["INNER", "JOIN"]) {
                JoinType::Inner
            } else if self.consume_seq(&["LEFT", "OUTER", "JOIN"]) {
                JoinType::LeftOuter
            } else if self.consume_seq(&["LEFT", "JOIN"]) {
                JoinType::Left
            } else if self.consume_seq(&["RIGHT", "OUTER", "JOIN"]) {
                JoinType::RightOuter
            } else if self.consume_seq(&["RIGHT", "JOIN"]) {
                JoinType::Right
            } else if self.consume_seq(&["FULL", "OUTER", "JOIN"]) {
                JoinType::FullOuter
            } else if self.consume_seq(&["FULL", "JOIN"]) {
                JoinType::Full
            } else if self.consume_seq(&["CROSS", "JOIN"]) {
                JoinType::Cross
            } else if self.consume_seq(&["NATURAL", "LEFT", "JOIN"]) {
                JoinType::NaturalLeft
            } else if self.consume_seq(&["NATURAL", "RIGHT", "JOIN"]) {
                JoinType::NaturalRight
            } else if self.consume_seq(&["NATURAL", "JOIN"]) {
                JoinType::Natural
            } else if self.consume("STRAIGHT_JOIN") {
                JoinType::Straight
            } else if self.consume("JOIN") {
                JoinType::Plain
            } else {
                return self.expected("JOIN");
            };
            let relation = self.parse_table_ref()?;
            let constraint = if self.consume("ON") {
                Some(JoinConstraint::On(self.parse_expr()?))
            } else if self.consume("USING") {
                Some(JoinConstraint::Using(self.parse_paren_identifier_list()?))
            } else {
                None
            };
            joins.push(Join {
                join_type,
                relation,
                constraint,
                leading_comments: leading,
            });
        }
        Ok(joins)
    }

    // ------------------------------------------------------------------
    // DML
    // ------------------------------------------------------------------

    fn parse_insert(&mut self) -> Result<Statement, ParserError> {
        self.expect("INSERT")?;
        self.expect("INTO")?;
        let table = self.parse_object_name()?;
        let columns = if self.check("(") {
            self.parse_paren_identifier_list()?
        } else {
            Vec::new()
        };
        let overriding = if self.consume_seq(&["OVERRIDING", "SYSTEM", "VALUE"]) {
            Some(Overriding::System)
        } else if self.consume_seq(&["OVERRIDING", "USER", "VALUE"]) {
            Some(Overriding::User)
        } else {
            None
        };
        let source = if self.consume_seq(&["DEFAULT", "VALUES"]) {
            InsertSource::DefaultValues
        } else if self.check("VALUES") {
            self.advance();
            let values = self.parse_values_rows()?;
            if self.check("SELECT") || self.check("WITH") {
                return self.expected("end of VALUES clause");
            }
            InsertSource::Values(values)
        } else if self.check("SELECT") || self.check("WITH") || self.check("(") {
            InsertSource::Query(self.parse_query_expr()?)
        } else {
            return self.expected("VALUES, SELECT, or DEFAULT VALUES");
        };
        let on_conflict = if self.consume_seq(&["ON", "CONFLICT"]) {
            Some(self.parse_on_conflict()?)
        } else {
            None
        };
        let on_duplicate_update = if self.consume_seq(&["ON", "DUPLICATE", "KEY", "UPDATE"]) {
            self.parse_assignments()?
        } else {
            Vec::new()
        };
        let returning = if self.consume("RETURNING") {
            self.parse_returning()?
        } else {
            Vec::new()
        };
        Ok(Statement::Insert(Box::new(Insert {
            leading_comments: Vec::new(),
            table,
            columns,
            overriding,
            source,
            on_conflict,
            on_duplicate_update,
            returning,
        })))
    }

    fn parse_on_conflict(&mut self) -> Result<OnConflict, ParserError> {
        let mut target = Vec::new();
        let mut on_constraint = None;
        if self.consume_seq(&["ON", "CONSTRAINT"]) {
            on_constraint = Some(self.parse_object_name()?);
        } else if self.check("(") {
            self.advance();
            target = self.parse_expr_list()?;
            self.expect(")")?;
        }
        self.expect("DO")?;
        let action = if self.consume("NOTHING") {
            ConflictAction::DoNothing
        } else {
            self.expect("UPDATE")?;
            self.expect("SET")?;
            let assignments = self.parse_assignments()?;
            let where_clause = if self.consume("WHERE") {
                Some(self.parse_expr()?)
            } else {
                None
            };
            ConflictAction::DoUpdate {
                assignments,
                where_clause,
            }
        };
        Ok(OnConflict {
            target,
            on_constraint,
            action,
        })
    }

    fn parse_assignments(&mut self) -> Result<Vec<Assignment>, ParserError> {
        let mut assignments = Vec::new();
        loop {
            let target = if self.check("(") {
                self.advance();
                let mut names = vec![self.parse_object_name()?];
                while self.consume(",") {
                    names.push(self.parse_object_name()?);
                }
                self.expect(")")?;
                AssignmentTarget::Tuple(names)
            } else {
                AssignmentTarget::Column(self.parse_object_name()?)
            };
            self.expect("=")?;
            let value = self.parse_expr()?;
            assignments.push(Assignment { target, value });
            if !self.consume(",") {
                break;
            }
        }
        Ok(assignments)
    }

    fn parse_update(&mut self) -> Result<Statement, ParserError> {
        self.expect("UPDATE")?;
        self.consume("ONLY");
        let table = self.parse_plain_table_ref()?;
        self.expect("SET")?;
        let assignments = self.parse_assignments()?;
        let (mut from, mut joins) = (None, Vec::new());
        if self.consume("FROM") {
            let mut items = vec![self.parse_table_ref()?];
            while self.consume(",") {
                items.push(self.parse_table_ref()?);
            }
            from = Some(FromClause { items });
            joins = self.parse_joins()?;
        }
        let where_clause = if self.consume("WHERE") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let returning = if self.consume("RETURNING") {
            self.parse_returning()?
        } else {
            Vec::new()
        };
        Ok(Statement::Update(Box::new(Update {
            leading_comments: Vec::new(),
            table,
            assignments,
            from,
            joins,
            where_clause,
            returning,
        })))
    }

    fn parse_delete(&mut self) -> Result<Statement, ParserError> {
        self.expect("DELETE")?;
        self.expect("FROM")?;
        self.consume("ONLY");
        let table = self.parse_plain_table_ref()?;
        let using = if self.consume("USING") {
            let mut items = vec![self.parse_table_ref()?];
            while self.consume(",") {
                items.push(self.parse_table_ref()?);
            }
            items
        } else {
            Vec::new()
        };
        let where_clause = if self.consume("WHERE") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let returning = if self.consume("RETURNING") {
            self.parse_returning()?
        } else {
            Vec::new()
        };
        Ok(Statement::Delete(Box::new(Delete {
            leading_comments: Vec::new(),
            table,
            using,
            where_clause,
            returning,
        })))
    }

    /// A named table with optional alias; subqueries not allowed (UPDATE and
    /// DELETE targets).
    fn parse_plain_table_ref(&mut self) -> Result<TableRef, ParserError> {
        let name = self.parse_object_name()?;
        let alias = self.parse_table_alias()?;
        Ok(TableRef {
            relation: Relation::Table(name),
            alias,
            lateral: false,
            tablesample: None,
        })
    }

    fn parse_merge(&mut self) -> Result<Statement, ParserError> {
        self.expect("MERGE")?;
        self.expect("INTO")?;
        let into = self.parse_plain_table_ref()?;
        self.expect("USING")?;
        let using = self.parse_table_ref()?;
        self.expect("ON")?;
        let on = self.parse_expr()?;
        let mut clauses = Vec::new();
        while self.check("WHEN") {
            clauses.push(self.parse_merge_when()?);
        }
        if clauses.is_empty() {
            return self.expected("WHEN");
        }
        Ok(Statement::Merge(Box::new(Merge {
            leading_comments: Vec::new(),
            into,
            using,
            on,
            clauses,
        })))
    }

    fn parse_merge_when(&mut self) -> Result<MergeWhen, ParserError> {
        self.expect("WHEN")?;
        let matched = if self.consume("NOT") {
            self.expect("MATCHED")?;
            false
        } else {
            self.expect("MATCHED")?;
            true
        };
        let condition = if self.consume("AND") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect("THEN")?;
        let action = if self.consume("UPDATE") {
            self.expect("SET")?;
            MergeAction::Update(self.parse_assignments()?)
        } else if self.consume("DELETE") {
            MergeAction::Delete
        } else if self.consume_seq(&["DO", "NOTHING"]) {
            MergeAction::DoNothing
        } else if self.consume("INSERT") {
            let columns = if self.check("(") {
                self.parse_paren_identifier_list()?
            } else {
                Vec::new()
            };
            self.expect("VALUES")?;
            self.expect("(")?;
            let values = self.parse_expr_list()?;
            self.expect(")")?;
            MergeAction::Insert { columns, values }
        } else {
            return self.expected("UPDATE, INSERT, DELETE, or DO NOTHING");
        };
        Ok(MergeWhen {
            matched,
            condition,
            action,
        })
    }

    fn parse_values_statement(&mut self) -> Result<Statement, ParserError> {
        self.expect("VALUES")?;
        let values = self.parse_values_rows()?;
        Ok(Statement::Values(Box::new(ValuesStatement {
            leading_comments: Vec::new(),
            values,
        })))
    }

    fn parse_values_rows(&mut self) -> Result<ValuesClause, ParserError> {
        let mut rows = Vec::new();
        loop {
            self.expect("(")?;
            let row = self.parse_expr_list()?;
            self.expect(")")?;
            rows.push(row);
            if !self.consume(",") {
                break;
            }
        }
        Ok(ValuesClause { rows })
    }

    fn parse_explain(&mut self) -> Result<Statement, ParserError> {
        self.expect("EXPLAIN")?;
        let mut options = Vec::new();
        let mut analyze = false;
        let mut verbose = false;
        if self.check("(") {
            self.advance();
            loop {
                let token = self.advance();
                let name = token.upper.clone();
                // A bare option name is an implicit TRUE.
                let value = if self.check(",") || self.check(")") {
                    None
                } else {
                    Some(self.advance().upper)
                };
                options.push(ExplainOption { name, value });
                if !self.consume(",") {
                    break;
                }
            }
            self.expect(")")?;
        } else {
            loop {
                if self.consume("ANALYZE") {
                    analyze = true;
                } else if self.consume("VERBOSE") {
                    verbose = true;
                } else {
                    break;
                }
            }
        }
        let inner = self.with_depth(|p| p.parse_statement())?;
        if matches!(&inner, Statement::Raw(_)) {
            return self.expected("an explainable statement");
        }
        Ok(Statement::Explain(Box::new(Explain {
            leading_comments: Vec::new(),
            analyze,
            verbose,
            options,
            inner: Box::new(inner),
        })))
    }

    // ------------------------------------------------------------------
    // Names, identifiers, aliases
    // ------------------------------------------------------------------

    pub(crate) fn parse_identifier(&mut self) -> Result<Ident, ParserError> {
        let token = self.peek_token();
        match token.kind {
            TokenKind::Identifier => {
                let token = self.advance();
                Ok(Ident::new(token.text))
            }
            TokenKind::QuotedIdentifier => {
                let token = self.advance();
                Ok(Ident::quoted(token.text))
            }
            _ => self.expected("an identifier"),
        }
    }

    pub(crate) fn parse_object_name(&mut self) -> Result<ObjectName, ParserError> {
        let mut parts = vec![self.parse_identifier()?];
        while self.check(".") {
            self.advance();
            parts.push(self.parse_identifier()?);
        }
        Ok(ObjectName(parts))
    }

    fn parse_identifier_list(&mut self) -> Result<Vec<Ident>, ParserError> {
        let mut idents = vec![self.parse_identifier()?];
        while self.consume(",") {
            idents.push(self.parse_identifier()?);
        }
        Ok(idents)
    }

    fn parse_paren_identifier_list(&mut self) -> Result<Vec<Ident>, ParserError> {
        self.expect("(")?;
        let idents = self.parse_identifier_list()?;
        self.expect(")")?;
        Ok(idents)
    }

    /// Optional column alias: `AS name`, or a bare word that is not a clause
    /// keyword.
    fn parse_column_alias(&mut self) -> Result<Option<Ident>, ParserError> {
        if self.consume("AS") {
            return Ok(Some(self.parse_alias_name()?));
        }
        if self.implicit_alias_follows() {
            return Ok(Some(self.parse_alias_name()?));
        }
        Ok(None)
    }

    fn parse_table_alias(&mut self) -> Result<Option<TableAlias>, ParserError> {
        let name = if self.consume("AS") {
            self.parse_alias_name()?
        } else if self.implicit_alias_follows() {
            self.parse_alias_name()?
        } else {
            return Ok(None);
        };
        let columns = if self.check("(") && !self.profile.is_clause_keyword(self.peek_upper_at(1)) {
            self.parse_paren_identifier_list()?
        } else {
            Vec::new()
        };
        Ok(Some(TableAlias { name, columns }))
    }

    fn implicit_alias_follows(&self) -> bool {
        let token = self.peek_token();
        match token.kind {
            TokenKind::Identifier | TokenKind::QuotedIdentifier => true,
            // Clause keywords end the aliasable position; starter keywords
            // (T-SQL `GO`, PostgreSQL `VACUUM`, ...) begin the next
            // statement and must not be eaten as aliases either.
            TokenKind::Keyword => {
                !self.profile.is_clause_keyword(&token.upper)
                    && !self.profile.is_statement_starter(&token.upper)
            }
            _ => false,
        }
    }

    /// After `AS`, any word may serve as the alias.
    fn parse_alias_name(&mut self) -> Result<Ident, ParserError> {
        let token = self.peek_token();
        match token.kind {
            TokenKind::Identifier | TokenKind::Keyword => {
                let token = self.advance();
                Ok(Ident::new(token.text))
            }
            TokenKind::QuotedIdentifier => {
                let token = self.advance();
                Ok(Ident::quoted(token.text))
            }
            _ => self.expected("an alias"),
        }
    }
}

/// Parses an `ORDER BY ... LIMIT ... OFFSET ... FETCH ...` tail onto a set
/// chain. Free function so the closure in `parse_query_expr` stays
/// readable.
fn self_consume_order_tail(p: &mut Parser, chain: &mut SetOpChain) -> Result<(), ParserError> {
    if p.consume_seq(&["ORDER", "BY"]) {
        chain.order_by = p.parse_order_by_list()?;
    }
    if p.consume("LIMIT") {
        chain.limit = Some(if p.consume("ALL") {
            Limit::All
        } else {
            Limit::Count(p.parse_expr()?)
        });
    }
    if p.consume("OFFSET") {
        let value = p.parse_expr()?;
        let rows = p.consume("ROWS") || p.consume("ROW");
        chain.offset = Some(Offset { value, rows });
    }
    if p.check("FETCH") {
        chain.fetch = Some(p.parse_fetch()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn parse(sql: &str) -> (Vec<Statement>, Vec<ParseEvent>) {
        let profile = DialectProfile::postgres();
        let tokens = Tokenizer::new(profile, sql).tokenize().unwrap();
        Parser::new(tokens, sql, profile, 200, true)
            .parse_statements()
            .unwrap()
    }

    #[test]
    fn statements_split_on_semicolons() {
        let (statements, events) = parse("SELECT 1; SELECT 2; SELECT 3;");
        assert_eq!(statements.len(), 3);
        assert!(events.is_empty());
    }

    #[test]
    fn is_without_valid_tail_stays_for_the_alias() {
        // `is` here is a column alias, not a comparison.
        let (statements, _) = parse("SELECT flag is FROM t;");
        let Statement::Query(QueryExpr::Select(select)) = &statements[0] else {
            panic!("expected a select");
        };
        assert_eq!(select.columns[0].alias, Some(Ident::new("is")));
    }

    #[test]
    fn is_not_null_parses_as_comparison() {
        let (statements, _) = parse("SELECT flag IS NOT NULL FROM t;");
        let Statement::Query(QueryExpr::Select(select)) = &statements[0] else {
            panic!("expected a select");
        };
        assert!(matches!(
            &select.columns[0].expr,
            Expr::Is {
                negated: true,
                tail: IsTail::Null,
                ..
            }
        ));
    }

    #[test]
    fn recovery_captures_the_broken_statement() {
        let (statements, events) = parse("SELECT 1; SELECT (; SELECT 2;");
        assert_eq!(statements.len(), 3);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].statement_index, 2);
        assert!(matches!(events[0].kind, ParseEventKind::Recovered(_)));
        let Statement::Raw(raw) = &statements[1] else {
            panic!("expected a raw node");
        };
        assert_eq!(raw.text, "SELECT (;");
        assert_eq!(raw.reason, RawReason::ParseError);
    }

    #[test]
    fn union_chain_keeps_parallel_arrays() {
        let (statements, _) =
            parse("SELECT 1 UNION ALL SELECT 2 INTERSECT SELECT 3;");
        let Statement::Query(QueryExpr::SetOp(chain)) = &statements[0] else {
            panic!("expected a set-op chain");
        };
        assert_eq!(chain.members.len(), 3);
        assert_eq!(chain.operators.len(), 2);
        assert_eq!(chain.operators[0].kind, SetOpKind::Union);
        assert_eq!(chain.operators[0].quantifier, Some(SetQuantifier::All));
        assert_eq!(chain.operators[1].kind, SetOpKind::Intersect);
    }

    #[test]
    fn depth_guard_trips_before_the_stack() {
        let mut sql = String::from("SELECT ");
        for _ in 0..500 {
            sql.push('(');
        }
        sql.push('1');
        for _ in 0..500 {
            sql.push(')');
        }
        let profile = DialectProfile::ansi();
        let tokens = Tokenizer::new(profile, &sql).tokenize().unwrap();
        let result = Parser::new(tokens, &sql, profile, 200, true).parse_statements();
        assert_eq!(result.unwrap_err(), ParserError::RecursionLimitExceeded);
    }
}
