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

//! Expression grammar: a precedence ladder from `OR` down to primaries.
//!
//! Lowest to highest: `OR`; `AND`; `NOT`; comparisons (including `IS`,
//! `BETWEEN`, `IN`, the LIKE family, and regex operators); bitwise or/xor/and;
//! shifts; additive (`+ - ||`); multiplicative; unary sign; exponent; JSON
//! operators; postfix casts, subscripts, `COLLATE`, `AT TIME ZONE`; primaries.

use super::{Parser, ParserError};
use crate::ast::*;
use crate::tokenizer::TokenKind;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParserError> {
        self.with_depth(|p| p.parse_or())
    }

    pub(crate) fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParserError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.consume(",") {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_or(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_and()?;
        while self.consume("OR") {
            let right = self.parse_and()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: BinaryOperator::Or,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_not()?;
        while self.consume("AND") {
            let right = self.parse_not()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: BinaryOperator::And,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_not(&mut self) -> Result<Expr, ParserError> {
        // `NOT BETWEEN` / `NOT IN` / `NOT LIKE` belong to the comparison
        // level; only a bare boolean NOT is consumed here.
        if self.check("NOT")
            && !matches!(
                self.peek_upper_at(1),
                "BETWEEN" | "IN" | "LIKE" | "ILIKE" | "SIMILAR" | "REGEXP" | "RLIKE"
            )
        {
            self.advance();
            let expr = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOperator::Not,
                expr: Box::new(expr),
            });
        }
        self.parse_comparison()
    }

    fn comparison_operator(&self) -> Option<BinaryOperator> {
        if self.peek_kind() != TokenKind::Operator {
            return None;
        }
        match self.peek_upper_at(0) {
            "=" => Some(BinaryOperator::Eq),
            "<>" | "!=" => Some(BinaryOperator::NotEq),
            "<" => Some(BinaryOperator::Lt),
            "<=" => Some(BinaryOperator::LtEq),
            ">" => Some(BinaryOperator::Gt),
            ">=" => Some(BinaryOperator::GtEq),
            "~" => Some(BinaryOperator::Regex),
            "~*" => Some(BinaryOperator::RegexCI),
            "!~" => Some(BinaryOperator::NotRegex),
            "!~*" => Some(BinaryOperator::NotRegexCI),
            _ => None,
        }
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_bitwise_or()?;
        loop {
            if let Some(op) = self.comparison_operator() {
                self.advance();
                if let Some(quantifier) = self.parse_quantifier()? {
                    let right = self.parse_quantified_operand()?;
                    expr = Expr::AnyAll {
                        left: Box::new(expr),
                        op,
                        quantifier,
                        right: Box::new(right),
                    };
                } else {
                    let right = self.parse_bitwise_or()?;
                    expr = Expr::Binary {
                        left: Box::new(expr),
                        op,
                        right: Box::new(right),
                    };
                }
                continue;
            }

            if self.check("IS") {
                match self.parse_is_tail(expr)? {
                    Ok(is_expr) => {
                        expr = is_expr;
                        continue;
                    }
                    // `IS` had no valid tail; it stays for the caller.
                    Err(original) => return Ok(original),
                }
            }

            // Only a NOT that introduces BETWEEN/IN/LIKE belongs to this
            // level; `NOT NULL` in a column option must stay unconsumed.
            let negated = if self.check("NOT")
                && matches!(
                    self.peek_upper_at(1),
                    "BETWEEN" | "IN" | "LIKE" | "ILIKE" | "SIMILAR" | "REGEXP" | "RLIKE"
                ) {
                self.advance();
                true
            } else {
                false
            };

            if self.consume("BETWEEN") {
                // The first AND after BETWEEN closes the range; boolean AND
                // resumes above this level.
                let low = self.parse_bitwise_or()?;
                self.expect("AND")?;
                let high = self.parse_bitwise_or()?;
                expr = Expr::Between {
                    expr: Box::new(expr),
                    negated,
                    low: Box::new(low),
                    high: Box::new(high),
                };
                continue;
            }
            if self.consume("IN") {
                expr = self.parse_in_tail(expr, negated)?;
                continue;
            }
            if self.consume("LIKE") {
                expr = self.parse_like_tail(expr, negated, LikeKind::Like)?;
                continue;
            }
            // ILIKE / SIMILAR TO / REGEXP are dialect-flavored: they only
            // act as operators where the profile knows them as keywords.
            if self.peek_kind() == TokenKind::Keyword {
                if self.consume("ILIKE") {
                    expr = self.parse_like_tail(expr, negated, LikeKind::ILike)?;
                    continue;
                }
                if self.consume_seq(&["SIMILAR", "TO"]) {
                    expr = self.parse_like_tail(expr, negated, LikeKind::SimilarTo)?;
                    continue;
                }
                if self.consume("REGEXP") || self.consume("RLIKE") {
                    expr = self.parse_like_tail(expr, negated, LikeKind::Regexp)?;
                    continue;
                }
            }
            if negated {
                return self.expected("BETWEEN, IN, or LIKE after NOT");
            }
            return Ok(expr);
        }
    }

    fn parse_quantifier(&mut self) -> Result<Option<Quantifier>, ParserError> {
        let quantifier = match self.peek_upper_at(0) {
            "ANY" => Quantifier::Any,
            "SOME" => Quantifier::Some,
            "ALL" => Quantifier::All,
            _ => return Ok(None),
        };
        if self.peek_upper_at(1) != "(" {
            return Ok(None);
        }
        self.advance();
        Ok(Some(quantifier))
    }

    fn parse_quantified_operand(&mut self) -> Result<Expr, ParserError> {
        self.expect("(")?;
        let inner = if self.check("SELECT") || self.check("WITH") {
            Expr::Subquery(Box::new(self.parse_query_expr()?))
        } else {
            self.parse_expr()?
        };
        self.expect(")")?;
        Ok(inner)
    }

    /// Consumes `IS [NOT] <tail>` when a valid tail follows; otherwise leaves
    /// the `IS` token in place and hands the expression back unchanged.
    #[allow(clippy::type_complexity)]
    fn parse_is_tail(&mut self, expr: Expr) -> Result<Result<Expr, Expr>, ParserError> {
        let mut at = 1;
        let mut negated = false;
        if self.peek_upper_at(at) == "NOT" {
            negated = true;
            at += 1;
        }
        let tail = match self.peek_upper_at(at) {
            "NULL" => Some(IsTail::Null),
            "TRUE" => Some(IsTail::True),
            "FALSE" => Some(IsTail::False),
            "UNKNOWN" => Some(IsTail::Unknown),
            "DISTINCT" if self.peek_upper_at(at + 1) == "FROM" => None,
            _ => return Ok(Err(expr)),
        };
        self.advance(); // IS
        if negated {
            self.advance(); // NOT
        }
        let tail = match tail {
            Some(tail) => {
                self.advance();
                tail
            }
            None => {
                self.advance(); // DISTINCT
                self.advance(); // FROM
                let right = self.parse_bitwise_or()?;
                IsTail::DistinctFrom(Box::new(right))
            }
        };
        Ok(Ok(Expr::Is {
            expr: Box::new(expr),
            negated,
            tail,
        }))
    }

    fn parse_in_tail(&mut self, expr: Expr, negated: bool) -> Result<Expr, ParserError> {
        self.expect("(")?;
        if self.check("SELECT") || self.check("WITH") {
            let subquery = self.parse_query_expr()?;
            self.expect(")")?;
            return Ok(Expr::InSubquery {
                expr: Box::new(expr),
                negated,
                subquery: Box::new(subquery),
            });
        }
        let list = self.parse_expr_list()?;
        self.expect(")")?;
        Ok(Expr::InList {
            expr: Box::new(expr),
            negated,
            list,
        })
    }

    fn parse_like_tail(
        &mut self,
        expr: Expr,
        negated: bool,
        kind: LikeKind,
    ) -> Result<Expr, ParserError> {
        let pattern = self.parse_bitwise_or()?;
        let escape = if self.consume("ESCAPE") {
            Some(Box::new(self.parse_bitwise_or()?))
        } else {
            None
        };
        Ok(Expr::Like {
            expr: Box::new(expr),
            negated,
            kind,
            pattern: Box::new(pattern),
            escape,
        })
    }

    fn parse_bitwise_or(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_bitwise_xor()?;
        while self.peek_kind() == TokenKind::Operator && self.check("|") {
            self.advance();
            let right = self.parse_bitwise_xor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: BinaryOperator::BitwiseOr,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_bitwise_xor(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_bitwise_and()?;
        while self.peek_kind() == TokenKind::Operator && self.check("#") {
            self.advance();
            let right = self.parse_bitwise_and()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: BinaryOperator::BitwiseXor,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_bitwise_and(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_shift()?;
        while self.peek_kind() == TokenKind::Operator && self.check("&") {
            self.advance();
            let right = self.parse_shift()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: BinaryOperator::BitwiseAnd,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_shift(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = if self.check("<<") {
                BinaryOperator::ShiftLeft
            } else if self.check(">>") {
                BinaryOperator::ShiftRight
            } else {
                return Ok(expr);
            };
            self.advance();
            let right = self.parse_additive()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = if self.check("+") {
                BinaryOperator::Plus
            } else if self.check("-") {
                BinaryOperator::Minus
            } else if self.check("||") {
                BinaryOperator::StringConcat
            } else if self.adjacent_string_literal(&expr) {
                // `'a' 'b'` concatenates implicitly.
                let right = self.parse_multiplicative()?;
                expr = Expr::Binary {
                    left: Box::new(expr),
                    op: BinaryOperator::StringConcat,
                    right: Box::new(right),
                };
                continue;
            } else {
                return Ok(expr);
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
    }

    fn adjacent_string_literal(&self, left: &Expr) -> bool {
        if !matches!(
            self.peek_kind(),
            TokenKind::String | TokenKind::DollarString
        ) {
            return false;
        }
        matches!(
            left,
            Expr::Literal(Literal::String(_))
                | Expr::Literal(Literal::DollarString(_))
                | Expr::Binary {
                    op: BinaryOperator::StringConcat,
                    ..
                }
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = if self.check("*") {
                BinaryOperator::Multiply
            } else if self.check("/") {
                BinaryOperator::Divide
            } else if self.check("%") {
                BinaryOperator::Modulo
            } else {
                return Ok(expr);
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParserError> {
        if self.peek_kind() == TokenKind::Operator {
            let op = match self.peek_upper_at(0) {
                "+" => Some(UnaryOperator::Plus),
                "-" => Some(UnaryOperator::Minus),
                "~" => Some(UnaryOperator::BitwiseNot),
                _ => None,
            };
            if let Some(op) = op {
                self.advance();
                let expr = self.parse_unary()?;
                return Ok(Expr::Unary {
                    op,
                    expr: Box::new(expr),
                });
            }
        }
        self.parse_exponent()
    }

    fn parse_exponent(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_json_op()?;
        while self.peek_kind() == TokenKind::Operator && self.check("^") {
            self.advance();
            let right = self.parse_json_op()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op: BinaryOperator::Exponent,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn json_operator(&self) -> Option<BinaryOperator> {
        if self.peek_kind() != TokenKind::Operator {
            return None;
        }
        match self.peek_upper_at(0) {
            "->" => Some(BinaryOperator::Arrow),
            "->>" => Some(BinaryOperator::LongArrow),
            "#>" => Some(BinaryOperator::HashArrow),
            "#>>" => Some(BinaryOperator::HashLongArrow),
            "@>" => Some(BinaryOperator::AtArrow),
            "<@" => Some(BinaryOperator::ArrowAt),
            "?" => Some(BinaryOperator::Question),
            "?|" => Some(BinaryOperator::QuestionPipe),
            "?&" => Some(BinaryOperator::QuestionAnd),
            "&&" => Some(BinaryOperator::Overlap),
            _ => None,
        }
    }

    fn parse_json_op(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_postfix()?;
        while let Some(op) = self.json_operator() {
            self.advance();
            let right = self.parse_postfix()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    /// Postfix suffixes: `::type`, subscripts, `COLLATE`, `AT TIME ZONE`.
    fn parse_postfix(&mut self) -> Result<Expr, ParserError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.check("::") {
                self.advance();
                let data_type = self.parse_type_name()?;
                expr = Expr::PgCast {
                    expr: Box::new(expr),
                    data_type,
                };
                continue;
            }
            if self.check("[") {
                self.advance();
                let subscript = self.parse_subscript()?;
                self.expect("]")?;
                expr = Expr::Subscript {
                    expr: Box::new(expr),
                    subscript: Box::new(subscript),
                };
                continue;
            }
            if self.check("COLLATE") {
                self.advance();
                let collation = self.parse_object_name()?;
                expr = Expr::Collate {
                    expr: Box::new(expr),
                    collation,
                };
                continue;
            }
            if self.check("AT") && self.peek_upper_at(1) == "TIME" && self.peek_upper_at(2) == "ZONE"
            {
                self.advance();
                self.advance();
                self.advance();
                let zone = self.parse_primary()?;
                expr = Expr::AtTimeZone {
                    expr: Box::new(expr),
                    zone: Box::new(zone),
                };
                continue;
            }
            return Ok(expr);
        }
    }

    fn parse_subscript(&mut self) -> Result<Subscript, ParserError> {
        if self.consume(":") {
            let upper = if self.check("]") {
                None
            } else {
                Some(self.parse_expr()?)
            };
            return Ok(Subscript::Slice { lower: None, upper });
        }
        let first = self.parse_expr()?;
        if self.consume(":") {
            let upper = if self.check("]") {
                None
            } else {
                Some(self.parse_expr()?)
            };
            return Ok(Subscript::Slice {
                lower: Some(first),
                upper,
            });
        }
        Ok(Subscript::Index(first))
    }

    // ------------------------------------------------------------------
    // Primaries
    // ------------------------------------------------------------------

    fn parse_primary(&mut self) -> Result<Expr, ParserError> {
        self.with_depth(|p| p.parse_primary_inner())
    }

    fn parse_primary_inner(&mut self) -> Result<Expr, ParserError> {
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.advance();
                return Ok(Expr::Literal(Literal::Number(token.text)));
            }
            TokenKind::String => {
                let token = self.advance();
                return Ok(Expr::Literal(Literal::String(token.text)));
            }
            TokenKind::DollarString => {
                let token = self.advance();
                return Ok(Expr::Literal(Literal::DollarString(token.text)));
            }
            TokenKind::Operator if self.check("*") => {
                self.advance();
                return Ok(Expr::Wildcard);
            }
            TokenKind::Operator if self.check("?") && self.profile_is_mysql() => {
                self.advance();
                return Ok(Expr::Literal(Literal::Parameter("?".into())));
            }
            TokenKind::Identifier if self.peek_text_starts_with('$') => {
                let token = self.advance();
                return Ok(Expr::Literal(Literal::Parameter(token.text)));
            }
            TokenKind::Punctuation if self.check("(") => {
                return self.parse_parenthesized();
            }
            _ => {}
        }

        if !self.check_word_token() {
            return self.expected("an expression");
        }

        let upper = self.peek_upper_at(0).to_string();
        match upper.as_str() {
            "NULL" => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            "TRUE" => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            "FALSE" => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            "CASE" => self.parse_case(),
            "CAST" => self.parse_cast(),
            "EXTRACT" => self.parse_extract(),
            "POSITION" => self.parse_position(),
            "SUBSTRING" => self.parse_substring(),
            "OVERLAY" => self.parse_overlay(),
            "TRIM" => self.parse_trim(),
            "ARRAY" if self.peek_upper_at(1) == "[" || self.peek_upper_at(1) == "(" => {
                self.parse_array()
            }
            "EXISTS" if self.peek_upper_at(1) == "(" => {
                self.advance();
                self.expect("(")?;
                let subquery = self.parse_query_expr()?;
                self.expect(")")?;
                Ok(Expr::Exists {
                    subquery: Box::new(subquery),
                    negated: false,
                })
            }
            "INTERVAL" => self.parse_interval(),
            "ROW" if self.peek_upper_at(1) == "(" => {
                self.advance();
                self.advance();
                let items = if self.check(")") {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                self.expect(")")?;
                Ok(Expr::Row(items))
            }
            "CURRENT_DATE" | "CURRENT_TIME" | "CURRENT_TIMESTAMP" | "LOCALTIME"
            | "LOCALTIMESTAMP" | "CURRENT_USER" | "SESSION_USER" => {
                self.advance();
                Ok(Expr::Raw(upper))
            }
            "DATE" | "TIME" | "TIMESTAMP"
                if matches!(
                    self.peek_kind_at(1),
                    Some(TokenKind::String | TokenKind::DollarString)
                ) =>
            {
                self.advance();
                let value = self.advance();
                Ok(Expr::TypedString {
                    data_type: TypeName::simple(upper),
                    value: value.text,
                })
            }
            _ => self.parse_name_or_call(),
        }
    }

    fn profile_is_mysql(&self) -> bool {
        self.profile_name() == "mysql"
    }

    fn parse_parenthesized(&mut self) -> Result<Expr, ParserError> {
        self.advance();
        if self.check("SELECT") || self.check("WITH") {
            let subquery = self.parse_query_expr()?;
            self.expect(")")?;
            return Ok(Expr::Subquery(Box::new(subquery)));
        }
        let first = self.parse_expr()?;
        if self.consume(",") {
            let mut items = vec![first];
            loop {
                items.push(self.parse_expr()?);
                if !self.consume(",") {
                    break;
                }
            }
            self.expect(")")?;
            return Ok(Expr::Tuple(items));
        }
        self.expect(")")?;
        Ok(Expr::Nested(Box::new(first)))
    }

    fn parse_case(&mut self) -> Result<Expr, ParserError> {
        self.expect("CASE")?;
        let operand = if self.check("WHEN") {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let mut branches = Vec::new();
        while self.consume("WHEN") {
            let condition = self.parse_expr()?;
            self.expect("THEN")?;
            let result = self.parse_expr()?;
            branches.push(CaseWhen { condition, result });
        }
        if branches.is_empty() {
            return self.expected("WHEN");
        }
        let else_result = if self.consume("ELSE") {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect("END")?;
        Ok(Expr::Case(CaseExpr {
            operand,
            branches,
            else_result,
        }))
    }

    fn parse_cast(&mut self) -> Result<Expr, ParserError> {
        self.expect("CAST")?;
        self.expect("(")?;
        let expr = self.parse_expr()?;
        self.expect("AS")?;
        let data_type = self.parse_type_name()?;
        self.expect(")")?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
        })
    }

    fn parse_extract(&mut self) -> Result<Expr, ParserError> {
        self.expect("EXTRACT")?;
        self.expect("(")?;
        if !self.check_word_token() {
            return self.expected("a datetime field");
        }
        let field = self.advance().upper;
        self.expect("FROM")?;
        let expr = self.parse_expr()?;
        self.expect(")")?;
        Ok(Expr::Extract {
            field,
            expr: Box::new(expr),
        })
    }

    fn parse_position(&mut self) -> Result<Expr, ParserError> {
        self.expect("POSITION")?;
        self.expect("(")?;
        let needle = self.parse_additive()?;
        self.expect("IN")?;
        let haystack = self.parse_expr()?;
        self.expect(")")?;
        Ok(Expr::Position {
            needle: Box::new(needle),
            haystack: Box::new(haystack),
        })
    }

    fn parse_substring(&mut self) -> Result<Expr, ParserError> {
        self.expect("SUBSTRING")?;
        self.expect("(")?;
        let expr = self.parse_expr()?;
        let (mut from, mut for_length) = (None, None);
        if self.consume("FROM") {
            from = Some(Box::new(self.parse_expr()?));
            if self.consume("FOR") {
                for_length = Some(Box::new(self.parse_expr()?));
            }
        } else if self.consume(",") {
            from = Some(Box::new(self.parse_expr()?));
            if self.consume(",") {
                for_length = Some(Box::new(self.parse_expr()?));
            }
        }
        self.expect(")")?;
        Ok(Expr::Substring {
            expr: Box::new(expr),
            from,
            for_length,
        })
    }

    fn parse_overlay(&mut self) -> Result<Expr, ParserError> {
        self.expect("OVERLAY")?;
        self.expect("(")?;
        let expr = self.parse_expr()?;
        self.expect("PLACING")?;
        let placing = self.parse_expr()?;
        self.expect("FROM")?;
        let from = self.parse_expr()?;
        let for_length = if self.consume("FOR") {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect(")")?;
        Ok(Expr::Overlay {
            expr: Box::new(expr),
            placing: Box::new(placing),
            from: Box::new(from),
            for_length,
        })
    }

    fn parse_trim(&mut self) -> Result<Expr, ParserError> {
        self.expect("TRIM")?;
        self.expect("(")?;
        let side = if self.consume("BOTH") {
            Some(TrimSide::Both)
        } else if self.consume("LEADING") {
            Some(TrimSide::Leading)
        } else if self.consume("TRAILING") {
            Some(TrimSide::Trailing)
        } else {
            None
        };
        if self.consume("FROM") {
            // `TRIM(LEADING FROM x)`.
            let expr = self.parse_expr()?;
            self.expect(")")?;
            return Ok(Expr::Trim {
                side,
                what: None,
                expr: Box::new(expr),
            });
        }
        let first = self.parse_expr()?;
        if self.consume("FROM") {
            let expr = self.parse_expr()?;
            self.expect(")")?;
            return Ok(Expr::Trim {
                side,
                what: Some(Box::new(first)),
                expr: Box::new(expr),
            });
        }
        self.expect(")")?;
        Ok(Expr::Trim {
            side,
            what: None,
            expr: Box::new(first),
        })
    }

    fn parse_array(&mut self) -> Result<Expr, ParserError> {
        self.expect("ARRAY")?;
        if self.consume("(") {
            let subquery = self.parse_query_expr()?;
            self.expect(")")?;
            return Ok(Expr::ArraySubquery(Box::new(subquery)));
        }
        self.expect("[")?;
        let elems = if self.check("]") {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        self.expect("]")?;
        Ok(Expr::Array(elems))
    }

    fn parse_interval(&mut self) -> Result<Expr, ParserError> {
        self.expect("INTERVAL")?;
        let value = match self.peek_kind() {
            TokenKind::String | TokenKind::Number => self.advance().text,
            _ => return self.expected("an interval literal"),
        };
        let mut words: Vec<String> = Vec::new();
        loop {
            let upper = self.peek_upper_at(0);
            let unit = matches!(
                upper,
                "YEAR" | "MONTH" | "DAY" | "HOUR" | "MINUTE" | "SECOND"
            );
            let to = upper == "TO" && !words.is_empty();
            if !unit && !to {
                break;
            }
            words.push(self.advance().upper);
        }
        let qualifier = if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        };
        Ok(Expr::Interval { value, qualifier })
    }

    /// Identifier, compound name, qualified wildcard, or function call.
    fn parse_name_or_call(&mut self) -> Result<Expr, ParserError> {
        let first = self.parse_name_part()?;
        let mut parts = vec![first];
        loop {
            if !self.check(".") {
                break;
            }
            if self.peek_upper_at(1) == "*" {
                self.advance();
                self.advance();
                return Ok(Expr::QualifiedWildcard(parts));
            }
            self.advance();
            parts.push(self.parse_name_part()?);
        }
        if self.check("(") {
            return self.parse_function_call_with_name(ObjectName(parts));
        }
        if parts.len() == 1 {
            Ok(Expr::Identifier(parts.pop().expect("one part")))
        } else {
            Ok(Expr::Compound(parts))
        }
    }

    /// One dotted-name segment. Keywords are allowed when a call or another
    /// segment follows (`LEFT(name, 3)`), since plain keywords never reach
    /// this point through `parse_primary`.
    fn parse_name_part(&mut self) -> Result<Ident, ParserError> {
        match self.peek_kind() {
            TokenKind::Identifier | TokenKind::Keyword => {
                let token = self.advance();
                Ok(Ident::new(token.text))
            }
            TokenKind::QuotedIdentifier => {
                let token = self.advance();
                Ok(Ident::quoted(token.text))
            }
            _ => self.expected("a name"),
        }
    }

    pub(crate) fn parse_function_call_with_name(
        &mut self,
        name: ObjectName,
    ) -> Result<Expr, ParserError> {
        self.expect("(")?;
        let distinct = self.consume("DISTINCT");
        let mut args = Vec::new();
        let mut order_by = Vec::new();
        if !self.check(")") {
            args = self.parse_expr_list()?;
            if self.consume_seq(&["ORDER", "BY"]) {
                order_by = self.parse_order_by_list()?;
            }
        }
        self.expect(")")?;
        let within_group = if self.consume_seq(&["WITHIN", "GROUP"]) {
            self.expect("(")?;
            self.expect("ORDER")?;
            self.expect("BY")?;
            let list = self.parse_order_by_list()?;
            self.expect(")")?;
            list
        } else {
            Vec::new()
        };
        let filter = if self.consume("FILTER") {
            self.expect("(")?;
            self.expect("WHERE")?;
            let predicate = self.parse_expr()?;
            self.expect(")")?;
            Some(Box::new(predicate))
        } else {
            None
        };
        let over = if self.consume("OVER") {
            if self.consume("(") {
                let spec = self.parse_window_spec()?;
                self.expect(")")?;
                Some(Over::Spec(spec))
            } else {
                Some(Over::Named(self.parse_identifier()?))
            }
        } else {
            None
        };
        Ok(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
            order_by,
            within_group,
            filter,
            over,
        }))
    }

    // ------------------------------------------------------------------
    // Windows, ordering, types
    // ------------------------------------------------------------------

    pub(crate) fn parse_window_spec(&mut self) -> Result<WindowSpec, ParserError> {
        let mut spec = WindowSpec::default();
        if self.consume_seq(&["PARTITION", "BY"]) {
            spec.partition_by = self.parse_expr_list()?;
        }
        if self.consume_seq(&["ORDER", "BY"]) {
            spec.order_by = self.parse_order_by_list()?;
        }
        if self.check("ROWS") || self.check("RANGE") || self.check("GROUPS") {
            spec.frame = Some(self.parse_window_frame()?);
        }
        Ok(spec)
    }

    fn parse_window_frame(&mut self) -> Result<WindowFrame, ParserError> {
        let units = if self.consume("ROWS") {
            FrameUnits::Rows
        } else if self.consume("RANGE") {
            FrameUnits::Range
        } else {
            self.expect("GROUPS")?;
            FrameUnits::Groups
        };
        let (start, end) = if self.consume("BETWEEN") {
            let start = self.parse_frame_bound()?;
            self.expect("AND")?;
            let end = self.parse_frame_bound()?;
            (start, Some(end))
        } else {
            (self.parse_frame_bound()?, None)
        };
        let exclude = if self.consume("EXCLUDE") {
            Some(if self.consume_seq(&["CURRENT", "ROW"]) {
                FrameExclusion::CurrentRow
            } else if self.consume("GROUP") {
                FrameExclusion::Group
            } else if self.consume("TIES") {
                FrameExclusion::Ties
            } else if self.consume_seq(&["NO", "OTHERS"]) {
                FrameExclusion::NoOthers
            } else {
                return self.expected("CURRENT ROW, GROUP, TIES, or NO OTHERS");
            })
        } else {
            None
        };
        Ok(WindowFrame {
            units,
            start,
            end,
            exclude,
        })
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParserError> {
        if self.consume_seq(&["UNBOUNDED", "PRECEDING"]) {
            return Ok(FrameBound::UnboundedPreceding);
        }
        if self.consume_seq(&["UNBOUNDED", "FOLLOWING"]) {
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.consume_seq(&["CURRENT", "ROW"]) {
            return Ok(FrameBound::CurrentRow);
        }
        let expr = self.parse_expr()?;
        if self.consume("PRECEDING") {
            Ok(FrameBound::Preceding(Box::new(expr)))
        } else if self.consume("FOLLOWING") {
            Ok(FrameBound::Following(Box::new(expr)))
        } else {
            self.expected("PRECEDING or FOLLOWING")
        }
    }

    pub(crate) fn parse_order_by_list(&mut self) -> Result<Vec<OrderByExpr>, ParserError> {
        let mut list = vec![self.parse_order_by_expr()?];
        while self.consume(",") {
            list.push(self.parse_order_by_expr()?);
        }
        Ok(list)
    }

    fn parse_order_by_expr(&mut self) -> Result<OrderByExpr, ParserError> {
        let expr = self.parse_expr()?;
        let direction = if self.consume("ASC") {
            Some(Direction::Asc)
        } else if self.consume("DESC") {
            Some(Direction::Desc)
        } else {
            None
        };
        let using_op = if self.consume("USING") {
            if self.peek_kind() != TokenKind::Operator {
                return self.expected("an operator");
            }
            Some(self.advance().text)
        } else {
            None
        };
        let nulls = if self.consume_seq(&["NULLS", "FIRST"]) {
            Some(NullsOrder::First)
        } else if self.consume_seq(&["NULLS", "LAST"]) {
            Some(NullsOrder::Last)
        } else {
            None
        };
        Ok(OrderByExpr {
            expr,
            direction,
            nulls,
            using_op,
        })
    }

    /// A type name: possibly multi-word (`DOUBLE PRECISION`, `TIMESTAMP WITH
    /// TIME ZONE`), possibly parameterised (`NUMERIC(10,2)`), possibly an
    /// array (`TEXT[]`).
    pub(crate) fn parse_type_name(&mut self) -> Result<TypeName, ParserError> {
        if !self.check_word_token() {
            return self.expected("a type name");
        }
        let token = self.advance();
        let keyword = token.kind == TokenKind::Keyword;
        let mut name = if keyword {
            token.upper
        } else {
            token.text.to_ascii_lowercase()
        };

        match name.as_str() {
            "DOUBLE" => {
                if self.consume("PRECISION") {
                    name.push_str(" PRECISION");
                }
            }
            "CHARACTER" | "CHAR" | "NCHAR" => {
                if self.consume("VARYING") {
                    name.push_str(" VARYING");
                }
            }
            "TIMESTAMP" | "TIME" => {
                if self.consume_seq(&["WITH", "TIME", "ZONE"]) {
                    name.push_str(" WITH TIME ZONE");
                } else if self.consume_seq(&["WITHOUT", "TIME", "ZONE"]) {
                    name.push_str(" WITHOUT TIME ZONE");
                }
            }
            _ => {}
        }

        let mut modifiers = Vec::new();
        if self.check("(") {
            self.advance();
            loop {
                let token = self.advance();
                if token.kind == TokenKind::Eof {
                    return self.expected("a type parameter");
                }
                modifiers.push(token.upper);
                if !self.consume(",") {
                    break;
                }
            }
            self.expect(")")?;
        }

        let mut array_dims = 0;
        while self.check("[") && self.peek_upper_at(1) == "]" {
            self.advance();
            self.advance();
            array_dims += 1;
        }

        Ok(TypeName {
            name,
            modifiers,
            array_dims,
        })
    }
}
