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

//! Expression rendering: one-line forms plus the context-sensitive wraps
//! (boolean chains, IN lists, BETWEEN, CASE, window specs, subqueries).
//!
//! Multi-line renderers follow one convention: the first returned line
//! carries no indentation (the caller splices it after its own prefix);
//! every following line is absolutely indented.

use itertools::Itertools;

use super::width::display_width;
use super::LayoutEngine;
use crate::ast::*;

/// Exceeding the render depth budget degrades to this marker instead of
/// failing the whole statement.
pub(crate) const DEPTH_MARKER: &str = "/* depth exceeded */";

pub(crate) fn spaces(n: usize) -> String {
    " ".repeat(n)
}

impl<'a> LayoutEngine<'a> {
    // ------------------------------------------------------------------
    // One-line rendering
    // ------------------------------------------------------------------

    /// Renders a function name: single unquoted names uppercase when the
    /// dialect knows them as functions, lowercase otherwise.
    fn function_name(&self, name: &ObjectName) -> String {
        if name.0.len() == 1 && !name.0[0].quoted {
            let upper = name.0[0].text.to_ascii_uppercase();
            if self.profile.is_function_keyword(&upper) {
                return upper;
            }
        }
        name.to_string()
    }

    pub(crate) fn expr_inline(&self, expr: &Expr, depth: usize) -> String {
        if depth > self.max_depth {
            return DEPTH_MARKER.to_string();
        }
        let d = depth + 1;
        match expr {
            Expr::Identifier(ident) => ident.to_string(),
            Expr::Compound(parts) => parts.iter().map(|p| p.to_string()).join("."),
            Expr::Wildcard => "*".to_string(),
            Expr::QualifiedWildcard(parts) => {
                format!("{}.*", parts.iter().map(|p| p.to_string()).join("."))
            }
            Expr::Literal(literal) => literal.to_string(),
            Expr::TypedString { data_type, value } => format!("{data_type} {value}"),
            Expr::Interval { value, qualifier } => match qualifier {
                Some(q) => format!("INTERVAL {value} {q}"),
                None => format!("INTERVAL {value}"),
            },
            Expr::Binary { left, op, right } => {
                let l = self.expr_inline(left, d);
                let r = self.expr_inline(right, d);
                if op.is_tight() {
                    format!("{l}{op}{r}")
                } else {
                    format!("{l} {op} {r}")
                }
            }
            Expr::Unary { op, expr } => match op {
                UnaryOperator::Not => format!("NOT {}", self.expr_inline(expr, d)),
                _ => format!("{op}{}", self.expr_inline(expr, d)),
            },
            Expr::Is {
                expr,
                negated,
                tail,
            } => {
                let e = self.expr_inline(expr, d);
                let not = if *negated { "NOT " } else { "" };
                match tail {
                    IsTail::Null => format!("{e} IS {not}NULL"),
                    IsTail::True => format!("{e} IS {not}TRUE"),
                    IsTail::False => format!("{e} IS {not}FALSE"),
                    IsTail::Unknown => format!("{e} IS {not}UNKNOWN"),
                    IsTail::DistinctFrom(right) => {
                        format!("{e} IS {not}DISTINCT FROM {}", self.expr_inline(right, d))
                    }
                }
            }
            Expr::Between {
                expr,
                negated,
                low,
                high,
            } => format!(
                "{} {}BETWEEN {} AND {}",
                self.expr_inline(expr, d),
                if *negated { "NOT " } else { "" },
                self.expr_inline(low, d),
                self.expr_inline(high, d),
            ),
            Expr::InList {
                expr,
                negated,
                list,
            } => format!(
                "{} {}IN ({})",
                self.expr_inline(expr, d),
                if *negated { "NOT " } else { "" },
                list.iter().map(|e| self.expr_inline(e, d)).join(", "),
            ),
            Expr::InSubquery {
                expr,
                negated,
                subquery,
            } => format!(
                "{} {}IN ({})",
                self.expr_inline(expr, d),
                if *negated { "NOT " } else { "" },
                self.query_inline(subquery, d),
            ),
            Expr::Like {
                expr,
                negated,
                kind,
                pattern,
                escape,
            } => {
                let mut out = format!(
                    "{} {}{kind} {}",
                    self.expr_inline(expr, d),
                    if *negated { "NOT " } else { "" },
                    self.expr_inline(pattern, d),
                );
                if let Some(escape) = escape {
                    out.push_str(" ESCAPE ");
                    out.push_str(&self.expr_inline(escape, d));
                }
                out
            }
            Expr::Exists { subquery, negated } => format!(
                "{}EXISTS ({})",
                if *negated { "NOT " } else { "" },
                self.query_inline(subquery, d),
            ),
            Expr::AnyAll {
                left,
                op,
                quantifier,
                right,
            } => format!(
                "{} {op} {quantifier} ({})",
                self.expr_inline(left, d),
                self.expr_inline(right, d),
            ),
            Expr::Nested(inner) => format!("({})", self.expr_inline(inner, d)),
            Expr::Tuple(items) => {
                format!("({})", items.iter().map(|e| self.expr_inline(e, d)).join(", "))
            }
            Expr::Row(items) => {
                format!("ROW({})", items.iter().map(|e| self.expr_inline(e, d)).join(", "))
            }
            Expr::Function(call) => self.function_inline(call, d),
            Expr::Case(case) => self.case_inline(case, d),
            Expr::Cast { expr, data_type } => {
                format!("CAST({} AS {data_type})", self.expr_inline(expr, d))
            }
            Expr::PgCast { expr, data_type } => {
                format!("{}::{data_type}", self.expr_inline(expr, d))
            }
            Expr::AtTimeZone { expr, zone } => format!(
                "{} AT TIME ZONE {}",
                self.expr_inline(expr, d),
                self.expr_inline(zone, d)
            ),
            Expr::Extract { field, expr } => {
                format!("EXTRACT({field} FROM {})", self.expr_inline(expr, d))
            }
            Expr::Position { needle, haystack } => format!(
                "POSITION({} IN {})",
                self.expr_inline(needle, d),
                self.expr_inline(haystack, d)
            ),
            Expr::Substring {
                expr,
                from,
                for_length,
            } => {
                let mut out = format!("SUBSTRING({}", self.expr_inline(expr, d));
                if let Some(from) = from {
                    out.push_str(" FROM ");
                    out.push_str(&self.expr_inline(from, d));
                }
                if let Some(len) = for_length {
                    out.push_str(" FOR ");
                    out.push_str(&self.expr_inline(len, d));
                }
                out.push(')');
                out
            }
            Expr::Overlay {
                expr,
                placing,
                from,
                for_length,
            } => {
                let mut out = format!(
                    "OVERLAY({} PLACING {} FROM {}",
                    self.expr_inline(expr, d),
                    self.expr_inline(placing, d),
                    self.expr_inline(from, d),
                );
                if let Some(len) = for_length {
                    out.push_str(" FOR ");
                    out.push_str(&self.expr_inline(len, d));
                }
                out.push(')');
                out
            }
            Expr::Trim { side, what, expr } => {
                let mut out = "TRIM(".to_string();
                if let Some(side) = side {
                    out.push_str(&side.to_string());
                    out.push(' ');
                }
                if let Some(what) = what {
                    out.push_str(&self.expr_inline(what, d));
                    out.push_str(" FROM ");
                } else if side.is_some() {
                    out.push_str("FROM ");
                }
                out.push_str(&self.expr_inline(expr, d));
                out.push(')');
                out
            }
            Expr::Array(items) => format!(
                "ARRAY[{}]",
                items.iter().map(|e| self.expr_inline(e, d)).join(", ")
            ),
            Expr::ArraySubquery(query) => format!("ARRAY({})", self.query_inline(query, d)),
            Expr::Subscript { expr, subscript } => {
                let base = self.expr_inline(expr, d);
                match subscript.as_ref() {
                    Subscript::Index(index) => format!("{base}[{}]", self.expr_inline(index, d)),
                    Subscript::Slice { lower, upper } => format!(
                        "{base}[{}:{}]",
                        lower.as_ref().map(|e| self.expr_inline(e, d)).unwrap_or_default(),
                        upper.as_ref().map(|e| self.expr_inline(e, d)).unwrap_or_default(),
                    ),
                }
            }
            Expr::Collate { expr, collation } => {
                format!("{} COLLATE {collation}", self.expr_inline(expr, d))
            }
            Expr::Subquery(query) => format!("({})", self.query_inline(query, d)),
            Expr::Raw(text) => text.clone(),
        }
    }

    fn function_inline(&self, call: &FunctionCall, d: usize) -> String {
        let mut out = self.function_name(&call.name);
        out.push('(');
        if call.distinct {
            out.push_str("DISTINCT ");
        }
        out.push_str(&call.args.iter().map(|e| self.expr_inline(e, d)).join(", "));
        if !call.order_by.is_empty() {
            out.push_str(" ORDER BY ");
            out.push_str(&self.order_by_inline(&call.order_by, d));
        }
        out.push(')');
        if !call.within_group.is_empty() {
            out.push_str(" WITHIN GROUP (ORDER BY ");
            out.push_str(&self.order_by_inline(&call.within_group, d));
            out.push(')');
        }
        if let Some(filter) = &call.filter {
            out.push_str(" FILTER (WHERE ");
            out.push_str(&self.expr_inline(filter, d));
            out.push(')');
        }
        match &call.over {
            Some(Over::Named(name)) => {
                out.push_str(" OVER ");
                out.push_str(&name.to_string());
            }
            Some(Over::Spec(spec)) => {
                out.push_str(" OVER (");
                out.push_str(&self.window_spec_inline(spec, d));
                out.push(')');
            }
            None => {}
        }
        out
    }

    pub(crate) fn order_by_inline(&self, list: &[OrderByExpr], d: usize) -> String {
        list.iter().map(|o| self.order_by_expr_inline(o, d)).join(", ")
    }

    pub(crate) fn order_by_expr_inline(&self, item: &OrderByExpr, d: usize) -> String {
        let mut out = self.expr_inline(&item.expr, d);
        if let Some(direction) = &item.direction {
            out.push(' ');
            out.push_str(&direction.to_string());
        }
        if let Some(op) = &item.using_op {
            out.push_str(" USING ");
            out.push_str(op);
        }
        if let Some(nulls) = &item.nulls {
            out.push(' ');
            out.push_str(&nulls.to_string());
        }
        out
    }

    fn case_inline(&self, case: &CaseExpr, d: usize) -> String {
        let mut out = "CASE".to_string();
        if let Some(operand) = &case.operand {
            out.push(' ');
            out.push_str(&self.expr_inline(operand, d));
        }
        for branch in &case.branches {
            out.push_str(" WHEN ");
            out.push_str(&self.expr_inline(&branch.condition, d));
            out.push_str(" THEN ");
            out.push_str(&self.expr_inline(&branch.result, d));
        }
        if let Some(else_result) = &case.else_result {
            out.push_str(" ELSE ");
            out.push_str(&self.expr_inline(else_result, d));
        }
        out.push_str(" END");
        out
    }

    pub(crate) fn window_spec_inline(&self, spec: &WindowSpec, d: usize) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !spec.partition_by.is_empty() {
            parts.push(format!(
                "PARTITION BY {}",
                spec.partition_by.iter().map(|e| self.expr_inline(e, d)).join(", ")
            ));
        }
        if !spec.order_by.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_inline(&spec.order_by, d)));
        }
        if let Some(frame) = &spec.frame {
            parts.push(self.frame_inline(frame, d));
        }
        parts.join(" ")
    }

    fn frame_inline(&self, frame: &WindowFrame, d: usize) -> String {
        let mut out = frame.units.to_string();
        match &frame.end {
            Some(end) => {
                out.push_str(" BETWEEN ");
                out.push_str(&self.frame_bound_inline(&frame.start, d));
                out.push_str(" AND ");
                out.push_str(&self.frame_bound_inline(end, d));
            }
            None => {
                out.push(' ');
                out.push_str(&self.frame_bound_inline(&frame.start, d));
            }
        }
        if let Some(exclude) = &frame.exclude {
            out.push(' ');
            out.push_str(&exclude.to_string());
        }
        out
    }

    pub(crate) fn frame_bound_inline(&self, bound: &FrameBound, d: usize) -> String {
        match bound {
            FrameBound::CurrentRow => "CURRENT ROW".to_string(),
            FrameBound::UnboundedPreceding => "UNBOUNDED PRECEDING".to_string(),
            FrameBound::UnboundedFollowing => "UNBOUNDED FOLLOWING".to_string(),
            FrameBound::Preceding(e) => format!("{} PRECEDING", self.expr_inline(e, d)),
            FrameBound::Following(e) => format!("{} FOLLOWING", self.expr_inline(e, d)),
        }
    }

    // ------------------------------------------------------------------
    // Wrapped rendering
    // ------------------------------------------------------------------

    /// Renders an expression starting at `col`. The first line comes back
    /// bare; continuation lines are indented absolutely. Falls back to the
    /// one-line form when nothing fits better.
    ///
    /// Subquery forms bypass the inline-fit shortcut entirely: a subquery
    /// whose river rendering takes more than two lines always breaks, no
    /// matter how short its one-line form would be.
    pub(crate) fn render_expr_at(&self, expr: &Expr, col: usize, depth: usize) -> Vec<String> {
        if depth > self.max_depth {
            return vec![DEPTH_MARKER.to_string()];
        }
        let d = depth + 1;
        match expr {
            Expr::InSubquery {
                expr,
                negated,
                subquery,
            } => {
                let head = format!(
                    "{} {}IN",
                    self.expr_inline(expr, d),
                    if *negated { "NOT " } else { "" }
                );
                return self.attach_subquery(head, col, subquery, d);
            }
            Expr::Exists { subquery, negated } => {
                let head = format!("{}EXISTS", if *negated { "NOT " } else { "" });
                return self.attach_subquery(head, col, subquery, d);
            }
            Expr::Subquery(subquery) => {
                let mut lines = self.render_subquery_block(subquery, col, d);
                if let Some(first) = lines.first_mut() {
                    *first = first.trim_start().to_string();
                }
                return lines;
            }
            _ => {}
        }
        let inline = self.expr_inline(expr, depth);
        if col + display_width(&inline) <= self.policy.expr_wrap_max() {
            return vec![inline];
        }
        match expr {
            Expr::InList {
                expr,
                negated,
                list,
            } => {
                let head = format!(
                    "{} {}IN (",
                    self.expr_inline(expr, d),
                    if *negated { "NOT " } else { "" }
                );
                let mut lines = self.fill_list(&head, col, list, d);
                if let Some(last) = lines.last_mut() {
                    last.push(')');
                }
                lines
            }
            Expr::Array(items) => {
                let mut lines = self.fill_list("ARRAY[", col, items, d);
                if let Some(last) = lines.last_mut() {
                    last.push(']');
                }
                lines
            }
            Expr::Between {
                expr,
                negated,
                low,
                high,
            } => {
                let head = format!(
                    "{} {}BETWEEN ",
                    self.expr_inline(expr, d),
                    if *negated { "NOT " } else { "" }
                );
                let value_col = col + display_width(&head);
                vec![
                    format!("{head}{}", self.expr_inline(low, d)),
                    format!("{}AND {}", spaces(value_col), self.expr_inline(high, d)),
                ]
            }
            Expr::Case(case) => self.render_case(case, col, d),
            Expr::Nested(inner) if is_bool_chain(inner) => {
                let mut lines = Vec::new();
                let (first, ops) = flatten_bool(inner);
                let inner_col = col + 1;
                let mut head = self.render_expr_at(first, inner_col, d);
                head[0] = format!("({}", head[0]);
                lines.append(&mut head);
                for (op, term) in ops {
                    let mut term_lines = self.render_expr_at(term, inner_col + 4, d);
                    term_lines[0] = format!("{}{op} {}", spaces(inner_col), term_lines[0]);
                    lines.append(&mut term_lines);
                }
                if let Some(last) = lines.last_mut() {
                    last.push(')');
                }
                lines
            }
            Expr::Binary { op, .. } if *op == BinaryOperator::StringConcat => {
                let terms = flatten_concat(expr);
                let mut lines = Vec::new();
                for (i, term) in terms.iter().enumerate() {
                    let rendered = self.expr_inline(term, d);
                    if i == 0 {
                        lines.push(rendered);
                    } else {
                        lines.push(format!("{}|| {rendered}", spaces(col)));
                    }
                }
                lines
            }
            Expr::Binary { left, op, right } if !op.is_tight() => {
                // Comparison against something big: keep the operator on the
                // first line and let the right side wrap at its column.
                let head = format!("{} {op} ", self.expr_inline(left, d));
                let right_col = col + display_width(&head);
                let mut right_lines = self.render_expr_at(right, right_col, d);
                right_lines[0] = format!("{head}{}", right_lines[0]);
                right_lines
            }
            Expr::Function(call) => self.render_function(call, col, d),
            _ => vec![inline],
        }
    }

    /// `head` + a subquery: inline after the head when the block is two
    /// lines or fewer, otherwise on its own lines beneath.
    fn attach_subquery(
        &self,
        head: String,
        col: usize,
        subquery: &QueryExpr,
        d: usize,
    ) -> Vec<String> {
        let open_col = col + display_width(&head) + 1;
        let block = self.render_subquery_block(subquery, open_col, d);
        if block.len() <= 2 {
            let mut lines = block;
            lines[0] = format!("{head} {}", lines[0].trim_start());
            return lines;
        }
        let mut lines = vec![head];
        lines.extend(self.render_subquery_block(subquery, col, d));
        lines
    }

    /// Greedy fill of a comma-separated list: continuation lines align
    /// beneath the first value.
    fn fill_list(&self, head: &str, col: usize, items: &[Expr], d: usize) -> Vec<String> {
        let value_col = col + display_width(head);
        let max = self.policy.expr_wrap_max();
        let mut lines: Vec<String> = Vec::new();
        let mut current = head.to_string();
        let mut current_width = value_col;
        for (i, item) in items.iter().enumerate() {
            let mut piece = self.expr_inline(item, d);
            if i + 1 < items.len() {
                piece.push(',');
            }
            let piece_width = display_width(&piece);
            if i > 0 {
                if current_width + 1 + piece_width > max {
                    lines.push(current);
                    current = format!("{}{piece}", spaces(value_col));
                    current_width = value_col + piece_width;
                    continue;
                }
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&piece);
            current_width += piece_width;
        }
        lines.push(current);
        lines
    }

    fn render_case(&self, case: &CaseExpr, col: usize, d: usize) -> Vec<String> {
        let branch_col = col + 5;
        let mut lines = Vec::new();
        let mut first = "CASE".to_string();
        if let Some(operand) = &case.operand {
            first.push(' ');
            first.push_str(&self.expr_inline(operand, d));
        }
        for (i, branch) in case.branches.iter().enumerate() {
            let condition = self.expr_inline(&branch.condition, d);
            let result = self.expr_inline(&branch.result, d);
            let one_line = format!("WHEN {condition} THEN {result}");
            let prefix = if i == 0 {
                first.push(' ');
                std::mem::take(&mut first)
            } else {
                spaces(branch_col)
            };
            if branch_col + display_width(&one_line) <= self.policy.expr_wrap_max() {
                lines.push(format!("{prefix}{one_line}"));
            } else {
                let mut condition_lines =
                    self.render_expr_at(&branch.condition, branch_col + 5, d);
                condition_lines[0] = format!("{prefix}WHEN {}", condition_lines[0]);
                lines.append(&mut condition_lines);
                let mut result_lines = self.render_expr_at(&branch.result, branch_col + 5, d);
                result_lines[0] = format!("{}THEN {}", spaces(branch_col), result_lines[0]);
                lines.append(&mut result_lines);
            }
        }
        if let Some(else_result) = &case.else_result {
            let mut else_lines = self.render_expr_at(else_result, branch_col + 5, d);
            else_lines[0] = format!("{}ELSE {}", spaces(branch_col), else_lines[0]);
            lines.append(&mut else_lines);
        }
        lines.push(format!("{}END", spaces(col)));
        lines
    }

    /// A function call that overflows: wrap its OVER clause if it has one,
    /// otherwise fall back to the one-line form.
    fn render_function(&self, call: &FunctionCall, col: usize, d: usize) -> Vec<String> {
        let Some(Over::Spec(spec)) = &call.over else {
            return vec![self.function_inline(call, d)];
        };
        let mut head = {
            let mut bare = call.clone();
            bare.over = None;
            self.function_inline(&bare, d)
        };
        head.push_str(" OVER (");
        let open_col = col + display_width(&head);
        let mut lines = self.render_window_spec(spec, open_col, d);
        lines[0] = format!("{head}{}", lines[0]);
        if let Some(last) = lines.last_mut() {
            last.push(')');
        }
        lines
    }

    /// Multi-line window spec at `open_col` (the column just after the
    /// opening paren). The BY keywords right-align with each other.
    pub(crate) fn render_window_spec(
        &self,
        spec: &WindowSpec,
        open_col: usize,
        d: usize,
    ) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let by_width = match (!spec.partition_by.is_empty(), !spec.order_by.is_empty()) {
            (true, _) => "PARTITION BY".len(),
            (false, true) => "ORDER BY".len(),
            _ => 0,
        };
        if !spec.partition_by.is_empty() {
            let exprs = spec.partition_by.iter().map(|e| self.expr_inline(e, d)).join(", ");
            lines.push(format!("{:>by_width$} {exprs}", "PARTITION BY"));
        }
        if !spec.order_by.is_empty() {
            let exprs = self.order_by_inline(&spec.order_by, d);
            let line = format!("{:>by_width$} {exprs}", "ORDER BY");
            if lines.is_empty() {
                lines.push(line);
            } else {
                lines.push(format!("{}{line}", spaces(open_col)));
            }
        }
        if let Some(frame) = &spec.frame {
            let unit = frame.units.to_string();
            match &frame.end {
                Some(end) => {
                    let first = format!(
                        "{unit} BETWEEN {}",
                        self.frame_bound_inline(&frame.start, d)
                    );
                    let and = format!(
                        "{}AND {}",
                        spaces(open_col + display_width(&unit) + 1),
                        self.frame_bound_inline(end, d)
                    );
                    if lines.is_empty() {
                        lines.push(first);
                    } else {
                        lines.push(format!("{}{first}", spaces(open_col)));
                    }
                    lines.push(and);
                }
                None => {
                    let line = format!("{unit} {}", self.frame_bound_inline(&frame.start, d));
                    if lines.is_empty() {
                        lines.push(line);
                    } else {
                        lines.push(format!("{}{line}", spaces(open_col)));
                    }
                }
            }
            if let Some(exclude) = &frame.exclude {
                lines.push(format!("{}{exclude}", spaces(open_col)));
            }
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    /// Boolean condition under a river clause (`WHERE` / `HAVING`): the
    /// chain's operators right-align to the river so every term starts at
    /// the content column.
    pub(crate) fn render_condition_river(
        &self,
        expr: &Expr,
        indent: usize,
        river: usize,
        keyword: &str,
        depth: usize,
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        // AND/OR chains always split; other expressions wrap only on
        // overflow (or when they hold a multi-line subquery).
        let (first, ops) = flatten_bool(expr);
        let mut first_lines = self.render_expr_at(first, content_col, depth);
        first_lines[0] = format!("{}{keyword:>river$} {}", spaces(indent), first_lines[0]);
        let mut lines = first_lines;
        for (op, term) in ops {
            let op_word = op.to_string();
            let mut term_lines = self.render_expr_at(term, content_col, depth);
            term_lines[0] = format!("{}{op_word:>river$} {}", spaces(indent), term_lines[0]);
            lines.append(&mut term_lines);
        }
        lines
    }

    /// Boolean condition under a join's `ON`: the `ON` keyword right-aligns
    /// to the river and continuation operators start at the content column.
    pub(crate) fn render_condition_on(
        &self,
        expr: &Expr,
        indent: usize,
        river: usize,
        keyword: &str,
        depth: usize,
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        let (first, ops) = flatten_bool(expr);
        let mut first_lines = self.render_expr_at(first, content_col, depth);
        first_lines[0] = format!("{}{keyword:>river$} {}", spaces(indent), first_lines[0]);
        let mut lines = first_lines;
        for (op, term) in ops {
            let mut term_lines = self.render_expr_at(term, content_col + 4, depth);
            term_lines[0] = format!("{}{op} {}", spaces(content_col), term_lines[0]);
            lines.append(&mut term_lines);
        }
        lines
    }
}

/// Is this a top-level AND/OR chain worth splitting?
pub(crate) fn is_bool_chain(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Binary {
            op: BinaryOperator::And | BinaryOperator::Or,
            ..
        }
    )
}

/// Flattens a left-associative AND/OR tree into the first term plus
/// `(operator, term)` pairs in source order.
pub(crate) fn flatten_bool(expr: &Expr) -> (&Expr, Vec<(&BinaryOperator, &Expr)>) {
    match expr {
        Expr::Binary { left, op, right }
            if matches!(op, BinaryOperator::And | BinaryOperator::Or) =>
        {
            let (first, mut ops) = flatten_bool(left);
            ops.push((op, right));
            (first, ops)
        }
        other => (other, Vec::new()),
    }
}

/// Flattens a `||` chain into its terms in source order.
fn flatten_concat(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Binary { left, op, right } if *op == BinaryOperator::StringConcat => {
            let mut terms = flatten_concat(left);
            terms.push(right);
            terms
        }
        other => vec![other],
    }
}
