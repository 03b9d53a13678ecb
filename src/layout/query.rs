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

//! Query layout: SELECT bodies, set-operation chains, WITH blocks, column
//! lists, FROM/JOIN structure, and nested subqueries.

use itertools::Itertools;

use super::expr::{spaces, DEPTH_MARKER};
use super::width::display_width;
use super::LayoutEngine;
use crate::ast::*;

impl<'a> LayoutEngine<'a> {
    // ------------------------------------------------------------------
    // River computation
    // ------------------------------------------------------------------

    /// The statement's river width: the longest clause keyword it will emit.
    pub(crate) fn query_river(&self, query: &QueryExpr) -> usize {
        match query {
            QueryExpr::Select(select) => self.select_river(select),
            QueryExpr::SetOp(chain) => {
                let mut width = chain
                    .members
                    .iter()
                    .map(|m| self.query_river(&m.query))
                    .max()
                    .unwrap_or(0);
                for op in &chain.operators {
                    width = width.max(op.kind.to_string().len());
                }
                if !chain.order_by.is_empty() {
                    width = width.max("ORDER".len());
                }
                if chain.limit.is_some() {
                    width = width.max("LIMIT".len());
                }
                if chain.offset.is_some() {
                    width = width.max("OFFSET".len());
                }
                if chain.fetch.is_some() {
                    width = width.max("FETCH".len());
                }
                width
            }
            QueryExpr::With(with) => "WITH".len().max(self.query_river(&with.body)),
        }
    }

    fn select_river(&self, select: &Select) -> usize {
        // Joins are absent here: a plain JOIN (4 columns) never widens the
        // river past SELECT, and qualified joins render at the content
        // column rather than inside the river.
        let mut width = "SELECT".len();
        if select.having.is_some() {
            width = width.max("HAVING".len());
        }
        if !select.windows.is_empty() {
            width = width.max("WINDOW".len());
        }
        if select.offset.is_some() {
            width = width.max("OFFSET".len());
        }
        width
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Renders a query at `indent` with a precomputed `river`. `nested` is
    /// true inside subqueries, where inline-fit budgets loosen.
    pub(crate) fn render_query_with_river(
        &self,
        query: &QueryExpr,
        indent: usize,
        river: usize,
        depth: usize,
        nested: bool,
    ) -> Vec<String> {
        if depth > self.max_depth {
            return vec![format!("{}{DEPTH_MARKER}", spaces(indent))];
        }
        match query {
            QueryExpr::Select(select) => self.render_select(select, indent, river, depth, nested),
            QueryExpr::SetOp(chain) => self.render_setop(chain, indent, river, depth, nested),
            QueryExpr::With(with) => self.render_with(with, indent, river, depth, nested),
        }
    }

    pub(crate) fn render_query(
        &self,
        query: &QueryExpr,
        indent: usize,
        depth: usize,
        nested: bool,
    ) -> Vec<String> {
        let river = self.query_river(query);
        self.render_query_with_river(query, indent, river, depth, nested)
    }

    /// Renders a subquery inside parens: `(` sits at `col`, the body is
    /// shifted one column right, and `)` hugs the last character.
    pub(crate) fn render_subquery_block(
        &self,
        query: &QueryExpr,
        col: usize,
        depth: usize,
    ) -> Vec<String> {
        if depth > self.max_depth {
            return vec![format!("{}({DEPTH_MARKER})", spaces(col))];
        }
        let inner_indent = col + 1;
        let mut lines = self.render_comments(query.leading_comments(), inner_indent);
        lines.extend(self.render_query(query, inner_indent, depth + 1, true));
        if let Some(first) = lines.first_mut() {
            first.replace_range(col..col + 1, "(");
        }
        if let Some(last) = lines.last_mut() {
            last.push(')');
        }
        lines
    }

    // ------------------------------------------------------------------
    // SELECT
    // ------------------------------------------------------------------

    fn render_select(
        &self,
        select: &Select,
        indent: usize,
        river: usize,
        depth: usize,
        nested: bool,
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        let mut lines: Vec<String> = Vec::new();

        let mut head = String::new();
        match &select.distinct {
            Some(Distinct::Distinct) => head.push_str("DISTINCT "),
            Some(Distinct::On(exprs)) => {
                head.push_str("DISTINCT ON (");
                head.push_str(&exprs.iter().map(|e| self.expr_inline(e, depth)).join(", "));
                head.push_str(") ");
            }
            None => {}
        }
        if let Some(top) = &select.top {
            let quantity = self.expr_inline(&top.quantity, depth);
            if top.parenthesized {
                head.push_str(&format!("TOP ({quantity}) "));
            } else {
                head.push_str(&format!("TOP {quantity} "));
            }
            if top.percent {
                head.push_str("PERCENT ");
            }
            if top.with_ties {
                head.push_str("WITH TIES ");
            }
        }

        lines.extend(self.render_select_columns(
            &select.columns,
            &head,
            indent,
            river,
            depth,
            nested,
        ));

        if let Some(from) = &select.from {
            lines.extend(self.render_from(from, indent, river, depth));
        }
        lines.extend(self.render_joins(&select.joins, indent, river, depth));

        if let Some(where_clause) = &select.where_clause {
            lines.extend(self.render_condition_river(where_clause, indent, river, "WHERE", depth));
        }
        if let Some(group_by) = &select.group_by {
            lines.extend(self.render_group_by(group_by, indent, river, depth));
        }
        if let Some(having) = &select.having {
            lines.extend(self.render_condition_river(having, indent, river, "HAVING", depth));
        }
        for (i, window) in select.windows.iter().enumerate() {
            let body = format!(
                "{} AS ({})",
                window.name,
                self.window_spec_inline(&window.spec, depth)
            );
            if i == 0 {
                lines.push(format!("{}{:>river$} {body}", spaces(indent), "WINDOW"));
            } else {
                if let Some(last) = lines.last_mut() {
                    last.push(',');
                }
                lines.push(format!("{}{body}", spaces(content_col)));
            }
        }

        lines.extend(self.render_order_tail(
            &select.order_by,
            &select.limit,
            &select.offset,
            &select.fetch,
            indent,
            river,
            depth,
        ));

        for locking in &select.locking {
            let mut line = format!("{}{:>river$} {}", spaces(indent), "FOR", locking.mode);
            if !locking.of.is_empty() {
                line.push_str(" OF ");
                line.push_str(&locking.of.iter().map(|n| n.to_string()).join(", "));
            }
            if let Some(wait) = &locking.wait {
                line.push(' ');
                line.push_str(&wait.to_string());
            }
            lines.push(line);
        }

        lines
    }

    // ------------------------------------------------------------------
    // Column list
    // ------------------------------------------------------------------

    fn column_inline(&self, column: &SelectColumn, depth: usize) -> String {
        let mut out = self.expr_inline(&column.expr, depth);
        if let Some(alias) = &column.alias {
            out.push_str(" AS ");
            out.push_str(&alias.to_string());
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn render_select_columns(
        &self,
        columns: &[SelectColumn],
        head: &str,
        indent: usize,
        river: usize,
        depth: usize,
        nested: bool,
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        let has_comments = columns
            .iter()
            .any(|c| !c.leading_comments.is_empty() || c.trailing_comment.is_some());
        let rendered: Vec<String> = columns.iter().map(|c| self.column_inline(c, depth)).collect();
        let joined = format!("{head}{}", rendered.iter().join(", "));
        let joined_width = display_width(&joined);

        let fits = if nested {
            content_col + joined_width <= self.policy.nested_inline_columns_max()
        } else {
            joined_width <= self.policy.top_inline_columns_max(river)
        };
        let alias_count = columns.iter().filter(|c| c.alias.is_some()).count();
        let alias_break = !nested
            && alias_count >= 2
            && columns.len() >= 3
            && joined_width > self.policy.alias_break_min();

        if fits && !alias_break && !has_comments {
            return vec![format!("{}{:>river$} {joined}", spaces(indent), "SELECT")];
        }

        // Broken layout: first column stays on the SELECT line, the rest go
        // beneath at the content column. Comment-free runs of three or more
        // short columns pack onto shared lines.
        let mut lines: Vec<String> = Vec::new();
        let first = &columns[0];
        let first_col_start = content_col + display_width(head);
        if first_col_start + display_width(&rendered[0]) > self.policy.expr_wrap_max() {
            // The first column alone overflows: give it the wrapped
            // treatment right on the SELECT line.
            let mut expr_lines = self.render_expr_at(&first.expr, first_col_start, depth);
            if let Some(alias) = &first.alias {
                if let Some(last) = expr_lines.last_mut() {
                    last.push_str(" AS ");
                    last.push_str(&alias.to_string());
                }
            }
            if columns.len() > 1 {
                if let Some(last) = expr_lines.last_mut() {
                    last.push(',');
                }
            }
            expr_lines[0] = format!(
                "{}{:>river$} {head}{}",
                spaces(indent),
                "SELECT",
                expr_lines[0]
            );
            if let Some(comment) = &first.trailing_comment {
                if let Some(last) = expr_lines.last_mut() {
                    last.push(' ');
                    last.push_str(&comment.text);
                }
            }
            lines.extend(expr_lines);
        } else {
            let mut first_line = format!(
                "{}{:>river$} {head}{}",
                spaces(indent),
                "SELECT",
                rendered[0]
            );
            if columns.len() > 1 {
                first_line.push(',');
            }
            if let Some(comment) = &first.trailing_comment {
                first_line.push(' ');
                first_line.push_str(&comment.text);
            }
            lines.push(first_line);
        }

        let mut group: Vec<String> = Vec::new();
        let max = self.policy.expr_wrap_max();
        let flush = |group: &mut Vec<String>, lines: &mut Vec<String>| {
            if group.is_empty() {
                return;
            }
            let total: usize =
                group.iter().map(|s| display_width(s)).sum::<usize>() + group.len() - 1;
            if group.len() >= 3 && content_col + total <= max {
                let packed = group.join(" ");
                lines.push(format!("{}{packed}", spaces(content_col)));
            } else {
                for piece in group.iter() {
                    lines.push(format!("{}{piece}", spaces(content_col)));
                }
            }
            group.clear();
        };

        for (i, column) in columns.iter().enumerate().skip(1) {
            if !column.leading_comments.is_empty() {
                flush(&mut group, &mut lines);
                lines.extend(self.render_comments(&column.leading_comments, content_col));
            }
            let mut piece = rendered[i].clone();
            if i + 1 < columns.len() {
                piece.push(',');
            }
            if let Some(comment) = &column.trailing_comment {
                piece.push(' ');
                piece.push_str(&comment.text);
                group.push(piece);
                flush(&mut group, &mut lines);
            } else if content_col + display_width(&piece) > max {
                // Oversized column: give it a full wrapped rendering.
                flush(&mut group, &mut lines);
                let mut expr_lines = self.render_expr_at(&column.expr, content_col, depth);
                if let Some(alias) = &column.alias {
                    if let Some(last) = expr_lines.last_mut() {
                        last.push_str(" AS ");
                        last.push_str(&alias.to_string());
                    }
                }
                if i + 1 < columns.len() {
                    if let Some(last) = expr_lines.last_mut() {
                        last.push(',');
                    }
                }
                expr_lines[0] = format!("{}{}", spaces(content_col), expr_lines[0]);
                lines.extend(expr_lines);
            } else {
                group.push(piece);
            }
        }
        flush(&mut group, &mut lines);
        lines
    }

    // ------------------------------------------------------------------
    // FROM and JOIN
    // ------------------------------------------------------------------

    fn table_ref_suffix(&self, table: &TableRef, depth: usize) -> String {
        let mut out = String::new();
        if let Some(alias) = &table.alias {
            out.push_str(" AS ");
            out.push_str(&alias.name.to_string());
            if !alias.columns.is_empty() {
                out.push_str(" (");
                out.push_str(&alias.columns.iter().map(|c| c.to_string()).join(", "));
                out.push(')');
            }
        }
        if let Some(sample) = &table.tablesample {
            out.push_str(" TABLESAMPLE ");
            out.push_str(&sample.method.text.to_ascii_uppercase());
            out.push_str(" (");
            out.push_str(&sample.args.iter().map(|e| self.expr_inline(e, depth)).join(", "));
            out.push(')');
            if let Some(seed) = &sample.repeatable {
                out.push_str(" REPEATABLE (");
                out.push_str(&self.expr_inline(seed, depth));
                out.push(')');
            }
        }
        out
    }

    pub(crate) fn table_ref_inline(&self, table: &TableRef, depth: usize) -> String {
        let mut out = String::new();
        if table.lateral {
            out.push_str("LATERAL ");
        }
        match &table.relation {
            Relation::Table(name) => out.push_str(&name.to_string()),
            Relation::Subquery(query) => {
                out.push('(');
                out.push_str(&self.query_inline(query, depth));
                out.push(')');
            }
            Relation::Function(call) => out.push_str(&self.expr_inline(call, depth)),
            Relation::Values(values) => {
                out.push_str("(VALUES ");
                out.push_str(&self.values_rows_inline(values, depth));
                out.push(')');
            }
        }
        out.push_str(&self.table_ref_suffix(table, depth));
        out
    }

    pub(crate) fn values_rows_inline(&self, values: &ValuesClause, depth: usize) -> String {
        values
            .rows
            .iter()
            .map(|row| {
                format!(
                    "({})",
                    row.iter().map(|e| self.expr_inline(e, depth)).join(", ")
                )
            })
            .join(", ")
    }

    /// One table reference at `col`, bare first line. Subqueries get the
    /// parenthesised block treatment.
    fn render_table_ref_at(&self, table: &TableRef, col: usize, depth: usize) -> Vec<String> {
        let inline = self.table_ref_inline(table, depth);
        if col + display_width(&inline) <= self.policy.expr_wrap_max() {
            return vec![inline];
        }
        match &table.relation {
            Relation::Subquery(query) => {
                let prefix = if table.lateral { "LATERAL " } else { "" };
                let open_col = col + prefix.len();
                let mut lines = self.render_subquery_block(query, open_col, depth);
                lines[0] = format!("{prefix}{}", lines[0].trim_start());
                if let Some(last) = lines.last_mut() {
                    last.push_str(&self.table_ref_suffix(table, depth));
                }
                lines
            }
            _ => vec![inline],
        }
    }

    fn render_from(
        &self,
        from: &FromClause,
        indent: usize,
        river: usize,
        depth: usize,
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        let inline = from
            .items
            .iter()
            .map(|t| self.table_ref_inline(t, depth))
            .join(", ");
        if content_col + display_width(&inline) <= self.policy.expr_wrap_max() {
            return vec![format!("{}{:>river$} {inline}", spaces(indent), "FROM")];
        }
        let mut lines = Vec::new();
        for (i, item) in from.items.iter().enumerate() {
            let mut item_lines = self.render_table_ref_at(item, content_col, depth);
            if i + 1 < from.items.len() {
                if let Some(last) = item_lines.last_mut() {
                    last.push(',');
                }
            }
            if i == 0 {
                item_lines[0] = format!("{}{:>river$} {}", spaces(indent), "FROM", item_lines[0]);
            } else {
                item_lines[0] = format!("{}{}", spaces(content_col), item_lines[0]);
            }
            lines.extend(item_lines);
        }
        lines
    }

    fn join_wants_gap(&self, join: &Join) -> bool {
        join.constraint.is_some() || matches!(join.relation.relation, Relation::Subquery(_))
    }

    fn render_joins(
        &self,
        joins: &[Join],
        indent: usize,
        river: usize,
        depth: usize,
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        let mut lines: Vec<String> = Vec::new();
        for (i, join) in joins.iter().enumerate() {
            if i > 0 && (self.join_wants_gap(&joins[i - 1]) || self.join_wants_gap(join)) {
                lines.push(String::new());
            }
            lines.extend(self.render_comments(&join.leading_comments, indent));

            // Plain JOIN right-aligns to the river like FROM; qualified
            // joins sit flush at the content column.
            let phrase = join.join_type.phrase();
            let (lead, table_col) = if phrase == "JOIN" {
                (
                    format!("{}{phrase:>river$} ", spaces(indent)),
                    content_col,
                )
            } else {
                (
                    format!("{}{phrase} ", spaces(content_col)),
                    content_col + phrase.len() + 1,
                )
            };
            let mut table_lines = self.render_table_ref_at(&join.relation, table_col, depth);
            table_lines[0] = format!("{lead}{}", table_lines[0]);
            lines.extend(table_lines);

            match &join.constraint {
                Some(JoinConstraint::On(predicate)) => {
                    lines.extend(self.render_condition_on(predicate, indent, river, "ON", depth));
                }
                Some(JoinConstraint::Using(columns)) => {
                    lines.push(format!(
                        "{}{:>river$} ({})",
                        spaces(indent),
                        "USING",
                        columns.iter().map(|c| c.to_string()).join(", ")
                    ));
                }
                None => {}
            }
        }
        lines
    }

    // ------------------------------------------------------------------
    // GROUP BY / ORDER BY tails
    // ------------------------------------------------------------------

    fn grouping_element_inline(&self, element: &GroupingElement, depth: usize) -> String {
        match element {
            GroupingElement::Expr(e) => self.expr_inline(e, depth),
            GroupingElement::Rollup(exprs) => format!(
                "ROLLUP ({})",
                exprs.iter().map(|e| self.expr_inline(e, depth)).join(", ")
            ),
            GroupingElement::Cube(exprs) => format!(
                "CUBE ({})",
                exprs.iter().map(|e| self.expr_inline(e, depth)).join(", ")
            ),
            GroupingElement::GroupingSets(sets) => format!(
                "GROUPING SETS ({})",
                sets.iter()
                    .map(|set| format!(
                        "({})",
                        set.iter().map(|e| self.expr_inline(e, depth)).join(", ")
                    ))
                    .join(", ")
            ),
        }
    }

    fn render_group_by(
        &self,
        group_by: &GroupBy,
        indent: usize,
        river: usize,
        depth: usize,
    ) -> Vec<String> {
        let mut prefix = "BY ".to_string();
        if let Some(quantifier) = &group_by.quantifier {
            prefix.push_str(&quantifier.to_string());
            prefix.push(' ');
        }
        let items: Vec<String> = group_by
            .elements
            .iter()
            .map(|e| self.grouping_element_inline(e, depth))
            .collect();
        self.render_by_list(indent, river, "GROUP", &prefix, &items)
    }

    #[allow(clippy::too_many_arguments)]
    fn render_order_tail(
        &self,
        order_by: &[OrderByExpr],
        limit: &Option<Limit>,
        offset: &Option<Offset>,
        fetch: &Option<Fetch>,
        indent: usize,
        river: usize,
        depth: usize,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        if !order_by.is_empty() {
            let items: Vec<String> = order_by
                .iter()
                .map(|o| self.order_by_expr_inline(o, depth))
                .collect();
            lines.extend(self.render_by_list(indent, river, "ORDER", "BY ", &items));
        }
        match limit {
            Some(Limit::All) => {
                lines.push(format!("{}{:>river$} ALL", spaces(indent), "LIMIT"));
            }
            Some(Limit::Count(expr)) => {
                lines.push(format!(
                    "{}{:>river$} {}",
                    spaces(indent),
                    "LIMIT",
                    self.expr_inline(expr, depth)
                ));
            }
            None => {}
        }
        if let Some(offset) = offset {
            let mut line = format!(
                "{}{:>river$} {}",
                spaces(indent),
                "OFFSET",
                self.expr_inline(&offset.value, depth)
            );
            if offset.rows {
                line.push_str(" ROWS");
            }
            lines.push(line);
        }
        if let Some(fetch) = fetch {
            let mut line = format!(
                "{}{:>river$} {}",
                spaces(indent),
                "FETCH",
                if fetch.first { "FIRST" } else { "NEXT" }
            );
            if let Some(quantity) = &fetch.quantity {
                line.push(' ');
                line.push_str(&self.expr_inline(quantity, depth));
                if fetch.percent {
                    line.push_str(" PERCENT");
                }
                line.push_str(" ROWS");
            } else {
                line.push_str(" ROW");
            }
            line.push_str(if fetch.with_ties { " WITH TIES" } else { " ONLY" });
            lines.push(line);
        }
        lines
    }

    /// `GROUP BY` / `ORDER BY` style lists: keyword at the river, `BY` plus
    /// the first item after it, continuation items aligned under the first.
    fn render_by_list(
        &self,
        indent: usize,
        river: usize,
        keyword: &str,
        prefix: &str,
        items: &[String],
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        let inline = format!("{prefix}{}", items.iter().join(", "));
        if content_col + display_width(&inline) <= self.policy.expr_wrap_max() {
            return vec![format!("{}{keyword:>river$} {inline}", spaces(indent))];
        }
        let item_col = content_col + display_width(prefix);
        let first_comma = if items.len() > 1 { "," } else { "" };
        let mut lines = vec![format!(
            "{}{keyword:>river$} {prefix}{}{first_comma}",
            spaces(indent),
            items[0]
        )];
        for (i, item) in items.iter().enumerate().skip(1) {
            let comma = if i + 1 < items.len() { "," } else { "" };
            lines.push(format!("{}{item}{comma}", spaces(item_col)));
        }
        lines
    }

    // ------------------------------------------------------------------
    // Set operations
    // ------------------------------------------------------------------

    fn render_setop(
        &self,
        chain: &SetOpChain,
        indent: usize,
        river: usize,
        depth: usize,
        nested: bool,
    ) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for (i, member) in chain.members.iter().enumerate() {
            if i > 0 {
                let op = &chain.operators[i - 1];
                let word = op.kind.to_string();
                let mut line = format!("{}{word:>river$}", spaces(indent));
                if let Some(quantifier) = &op.quantifier {
                    line.push(' ');
                    line.push_str(&quantifier.to_string());
                }
                lines.push(line);
            }
            if member.parenthesized {
                // The block renderer emits the member's comments itself.
                lines.extend(self.render_subquery_block(&member.query, indent, depth));
            } else {
                lines.extend(self.render_comments(member.query.leading_comments(), indent));
                lines.extend(
                    self.render_query_with_river(&member.query, indent, river, depth, nested),
                );
            }
        }
        lines.extend(self.render_order_tail(
            &chain.order_by,
            &chain.limit,
            &chain.offset,
            &chain.fetch,
            indent,
            river,
            depth,
        ));
        lines
    }

    // ------------------------------------------------------------------
    // WITH
    // ------------------------------------------------------------------

    fn cte_header(&self, cte: &Cte) -> String {
        let mut out = cte.name.to_string();
        if !cte.columns.is_empty() {
            out.push_str(" (");
            out.push_str(&cte.columns.iter().map(|c| c.to_string()).join(", "));
            out.push(')');
        }
        out.push_str(" AS ");
        match cte.materialized {
            Some(true) => out.push_str("MATERIALIZED "),
            Some(false) => out.push_str("NOT MATERIALIZED "),
            None => {}
        }
        out.push('(');
        out
    }

    fn render_with(
        &self,
        with: &WithQuery,
        indent: usize,
        river: usize,
        depth: usize,
        nested: bool,
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        let mut lines: Vec<String> = Vec::new();

        for (i, cte) in with.ctes.iter().enumerate() {
            if i == 0 {
                lines.extend(self.render_comments(&cte.leading_comments, indent));
                let recursive = if with.recursive { "RECURSIVE " } else { "" };
                lines.push(format!(
                    "{}{:>river$} {recursive}{}",
                    spaces(indent),
                    "WITH",
                    self.cte_header(cte)
                ));
            } else {
                lines.extend(self.render_comments(&cte.leading_comments, content_col));
                lines.push(format!("{}{}", spaces(content_col), self.cte_header(cte)));
            }
            lines.extend(self.render_comments(cte.query.leading_comments(), content_col));
            lines.extend(self.render_query(&cte.query, content_col, depth + 1, true));
            let close = if i + 1 < with.ctes.len() { ")," } else { ")" };
            lines.push(format!("{}{close}", spaces(content_col)));
        }

        if let Some(search) = &with.search {
            let order = if search.breadth_first { "BREADTH" } else { "DEPTH" };
            lines.push(format!(
                "{}SEARCH {order} FIRST BY {} SET {}",
                spaces(content_col),
                search.by.iter().map(|c| c.to_string()).join(", "),
                search.set
            ));
        }
        if let Some(cycle) = &with.cycle {
            let mut line = format!(
                "{}CYCLE {} SET {}",
                spaces(content_col),
                cycle.columns.iter().map(|c| c.to_string()).join(", "),
                cycle.set
            );
            if let (Some(to), Some(default)) = (&cycle.to_value, &cycle.default_value) {
                line.push_str(&format!(
                    " TO {} DEFAULT {}",
                    self.expr_inline(to, depth),
                    self.expr_inline(default, depth)
                ));
            }
            if let Some(using) = &cycle.using {
                line.push_str(&format!(" USING {using}"));
            }
            lines.push(line);
        }

        lines.extend(self.render_query_with_river(&with.body, indent, river, depth, nested));
        lines
    }

    // ------------------------------------------------------------------
    // One-line query rendering (fit checks and tiny inline subqueries)
    // ------------------------------------------------------------------

    pub(crate) fn query_inline(&self, query: &QueryExpr, depth: usize) -> String {
        if depth > self.max_depth {
            return DEPTH_MARKER.to_string();
        }
        let d = depth + 1;
        match query {
            QueryExpr::Select(select) => self.select_inline(select, d),
            QueryExpr::SetOp(chain) => {
                let mut out = String::new();
                for (i, member) in chain.members.iter().enumerate() {
                    if i > 0 {
                        let op = &chain.operators[i - 1];
                        out.push(' ');
                        out.push_str(&op.kind.to_string());
                        if let Some(quantifier) = &op.quantifier {
                            out.push(' ');
                            out.push_str(&quantifier.to_string());
                        }
                        out.push(' ');
                    }
                    if member.parenthesized {
                        out.push('(');
                        out.push_str(&self.query_inline(&member.query, d));
                        out.push(')');
                    } else {
                        out.push_str(&self.query_inline(&member.query, d));
                    }
                }
                out.push_str(&self.order_tail_inline(
                    &chain.order_by,
                    &chain.limit,
                    &chain.offset,
                    &chain.fetch,
                    d,
                ));
                out
            }
            QueryExpr::With(with) => {
                let mut out = "WITH ".to_string();
                if with.recursive {
                    out.push_str("RECURSIVE ");
                }
                for (i, cte) in with.ctes.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.cte_header(cte));
                    out.push_str(&self.query_inline(&cte.query, d));
                    out.push(')');
                }
                out.push(' ');
                out.push_str(&self.query_inline(&with.body, d));
                out
            }
        }
    }

    fn select_inline(&self, select: &Select, d: usize) -> String {
        let mut out = "SELECT ".to_string();
        match &select.distinct {
            Some(Distinct::Distinct) => out.push_str("DISTINCT "),
            Some(Distinct::On(exprs)) => {
                out.push_str("DISTINCT ON (");
                out.push_str(&exprs.iter().map(|e| self.expr_inline(e, d)).join(", "));
                out.push_str(") ");
            }
            None => {}
        }
        if let Some(top) = &select.top {
            out.push_str("TOP ");
            if top.parenthesized {
                out.push_str(&format!("({}) ", self.expr_inline(&top.quantity, d)));
            } else {
                out.push_str(&format!("{} ", self.expr_inline(&top.quantity, d)));
            }
        }
        out.push_str(
            &select
                .columns
                .iter()
                .map(|c| self.column_inline(c, d))
                .join(", "),
        );
        if let Some(from) = &select.from {
            out.push_str(" FROM ");
            out.push_str(
                &from
                    .items
                    .iter()
                    .map(|t| self.table_ref_inline(t, d))
                    .join(", "),
            );
        }
        for join in &select.joins {
            out.push(' ');
            out.push_str(join.join_type.phrase());
            out.push(' ');
            out.push_str(&self.table_ref_inline(&join.relation, d));
            match &join.constraint {
                Some(JoinConstraint::On(predicate)) => {
                    out.push_str(" ON ");
                    out.push_str(&self.expr_inline(predicate, d));
                }
                Some(JoinConstraint::Using(columns)) => {
                    out.push_str(" USING (");
                    out.push_str(&columns.iter().map(|c| c.to_string()).join(", "));
                    out.push(')');
                }
                None => {}
            }
        }
        if let Some(where_clause) = &select.where_clause {
            out.push_str(" WHERE ");
            out.push_str(&self.expr_inline(where_clause, d));
        }
        if let Some(group_by) = &select.group_by {
            out.push_str(" GROUP BY ");
            if let Some(quantifier) = &group_by.quantifier {
                out.push_str(&quantifier.to_string());
                out.push(' ');
            }
            out.push_str(
                &group_by
                    .elements
                    .iter()
                    .map(|e| self.grouping_element_inline(e, d))
                    .join(", "),
            );
        }
        if let Some(having) = &select.having {
            out.push_str(" HAVING ");
            out.push_str(&self.expr_inline(having, d));
        }
        for (i, window) in select.windows.iter().enumerate() {
            out.push_str(if i == 0 { " WINDOW " } else { ", " });
            out.push_str(&format!(
                "{} AS ({})",
                window.name,
                self.window_spec_inline(&window.spec, d)
            ));
        }
        out.push_str(&self.order_tail_inline(
            &select.order_by,
            &select.limit,
            &select.offset,
            &select.fetch,
            d,
        ));
        for locking in &select.locking {
            out.push_str(" FOR ");
            out.push_str(&locking.mode.to_string());
            if !locking.of.is_empty() {
                out.push_str(" OF ");
                out.push_str(&locking.of.iter().map(|n| n.to_string()).join(", "));
            }
            if let Some(wait) = &locking.wait {
                out.push(' ');
                out.push_str(&wait.to_string());
            }
        }
        out
    }

    fn order_tail_inline(
        &self,
        order_by: &[OrderByExpr],
        limit: &Option<Limit>,
        offset: &Option<Offset>,
        fetch: &Option<Fetch>,
        d: usize,
    ) -> String {
        let mut out = String::new();
        if !order_by.is_empty() {
            out.push_str(" ORDER BY ");
            out.push_str(&self.order_by_inline(order_by, d));
        }
        match limit {
            Some(Limit::All) => out.push_str(" LIMIT ALL"),
            Some(Limit::Count(expr)) => {
                out.push_str(" LIMIT ");
                out.push_str(&self.expr_inline(expr, d));
            }
            None => {}
        }
        if let Some(offset) = offset {
            out.push_str(" OFFSET ");
            out.push_str(&self.expr_inline(&offset.value, d));
            if offset.rows {
                out.push_str(" ROWS");
            }
        }
        if let Some(fetch) = fetch {
            out.push_str(" FETCH ");
            out.push_str(if fetch.first { "FIRST" } else { "NEXT" });
            if let Some(quantity) = &fetch.quantity {
                out.push(' ');
                out.push_str(&self.expr_inline(quantity, d));
                if fetch.percent {
                    out.push_str(" PERCENT");
                }
                out.push_str(" ROWS");
            } else {
                out.push_str(" ROW");
            }
            out.push_str(if fetch.with_ties { " WITH TIES" } else { " ONLY" });
        }
        out
    }
}
