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

//! The layout engine.
//!
//! Walks parsed statements in source order and renders each according to the
//! river discipline: clause keywords right-justified to the statement's
//! river, content starting one column to the right, wrapping decided by the
//! [`LayoutPolicy`]. Statements are separated by a blank line and terminated
//! with `;` (raw passthrough text is emitted verbatim).

use itertools::Itertools;

pub use self::policy::LayoutPolicy;

use self::expr::spaces;
use crate::ast::*;
use crate::dialect::DialectProfile;

mod ddl;
mod expr;
mod policy;
mod query;
mod width;

/// AST-to-text renderer, parameterized by dialect profile and policy.
pub struct LayoutEngine<'a> {
    pub(crate) profile: &'a DialectProfile,
    pub(crate) policy: LayoutPolicy,
    pub(crate) max_depth: usize,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(profile: &'a DialectProfile, policy: LayoutPolicy, max_depth: usize) -> Self {
        LayoutEngine {
            profile,
            policy,
            max_depth,
        }
    }

    /// Renders all statements, blank-line separated, each ending in `;`.
    pub fn format_statements(&self, statements: &[Statement]) -> String {
        let mut blocks: Vec<Vec<String>> = Vec::new();
        for statement in statements {
            let mut lines = self.render_comments(statement.leading_comments(), 0);
            let body = self.render_statement(statement);
            let terminate = !matches!(statement, Statement::Raw(_));
            let had_body = !body.is_empty();
            lines.extend(body);
            if terminate && had_body {
                if let Some(last) = lines.last_mut() {
                    last.push(';');
                }
            }
            if !lines.is_empty() {
                blocks.push(lines);
            }
        }
        blocks.iter().map(|block| block.join("\n")).join("\n\n")
    }

    /// One statement's body lines, without leading comments or the final
    /// semicolon.
    pub(crate) fn render_statement(&self, statement: &Statement) -> Vec<String> {
        match statement {
            Statement::Query(query) => self.render_query(query, 0, 0, false),
            Statement::Insert(insert) => self.render_insert(insert),
            Statement::Update(update) => self.render_update(update),
            Statement::Delete(delete) => self.render_delete(delete),
            Statement::Merge(merge) => self.render_merge(merge),
            Statement::CreateTable(table) => self.render_create_table(table),
            Statement::AlterTable(alter) => self.render_alter_table(alter),
            Statement::Drop(drop) => self.render_drop(drop),
            Statement::CreateIndex(index) => self.render_create_index(index),
            Statement::CreateView(view) => self.render_create_view(view),
            Statement::CreatePolicy(policy) => self.render_create_policy(policy),
            Statement::Grant(grant) => self.render_grant(grant),
            Statement::Truncate(truncate) => self.render_truncate(truncate),
            Statement::Values(values) => self.render_values_statement(values),
            Statement::Explain(explain) => self.render_explain(explain),
            Statement::Raw(raw) => raw.text.lines().map(|l| l.to_string()).collect(),
        }
    }

    /// Comment lines at a column; a recorded blank line becomes one empty
    /// output line. Multi-line block comments keep their inner lines
    /// verbatim.
    pub(crate) fn render_comments(&self, comments: &[Comment], col: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for comment in comments {
            if comment.blank_lines_before > 0 && !lines.is_empty() {
                lines.push(String::new());
            }
            for (i, text_line) in comment.text.lines().enumerate() {
                if i == 0 {
                    lines.push(format!("{}{}", spaces(col), text_line));
                } else {
                    lines.push(text_line.to_string());
                }
            }
        }
        lines
    }

    // ------------------------------------------------------------------
    // DML
    // ------------------------------------------------------------------

    fn insert_river(&self, insert: &Insert) -> usize {
        let mut width = "INSERT".len();
        if !insert.returning.is_empty() {
            width = width.max("RETURNING".len());
        }
        if let InsertSource::Query(query) = &insert.source {
            width = width.max(self.query_river(query));
        }
        if let Some(OnConflict {
            action: ConflictAction::DoUpdate { .. },
            ..
        }) = &insert.on_conflict
        {
            width = width.max("WHERE".len());
        }
        width
    }

    fn render_insert(&self, insert: &Insert) -> Vec<String> {
        let river = self.insert_river(insert);
        let content_col = river + 1;
        let mut lines: Vec<String> = Vec::new();

        let mut into = format!("{:>river$} INTO {}", "INSERT", insert.table);
        if !insert.columns.is_empty() {
            into.push_str(" (");
            into.push_str(&insert.columns.iter().map(|c| c.to_string()).join(", "));
            into.push(')');
        }
        match insert.overriding {
            Some(Overriding::System) => into.push_str(" OVERRIDING SYSTEM VALUE"),
            Some(Overriding::User) => into.push_str(" OVERRIDING USER VALUE"),
            None => {}
        }
        lines.push(into);

        match &insert.source {
            InsertSource::Values(values) => {
                lines.extend(self.render_values_rows(values, 0, river));
            }
            InsertSource::Query(query) => {
                lines.extend(self.render_query_with_river(query, 0, river, 0, false));
            }
            InsertSource::DefaultValues => {
                lines.push(format!("{:>river$} VALUES", "DEFAULT"));
            }
        }

        if let Some(on_conflict) = &insert.on_conflict {
            let mut line = format!("{:>river$} CONFLICT", "ON");
            if let Some(constraint) = &on_conflict.on_constraint {
                line.push_str(&format!(" ON CONSTRAINT {constraint}"));
            } else if !on_conflict.target.is_empty() {
                line.push_str(&format!(
                    " ({})",
                    on_conflict
                        .target
                        .iter()
                        .map(|e| self.expr_inline(e, 0))
                        .join(", ")
                ));
            }
            match &on_conflict.action {
                ConflictAction::DoNothing => {
                    line.push_str(" DO NOTHING");
                    lines.push(line);
                }
                ConflictAction::DoUpdate {
                    assignments,
                    where_clause,
                } => {
                    line.push_str(" DO UPDATE");
                    lines.push(line);
                    lines.extend(self.render_assignments(assignments, 0, river));
                    if let Some(predicate) = where_clause {
                        lines.extend(self.render_condition_river(predicate, 0, river, "WHERE", 0));
                    }
                }
            }
        }

        if !insert.on_duplicate_update.is_empty() {
            lines.push(format!("{:>river$} DUPLICATE KEY UPDATE", "ON"));
            for (i, assignment) in insert.on_duplicate_update.iter().enumerate() {
                let comma = if i + 1 < insert.on_duplicate_update.len() {
                    ","
                } else {
                    ""
                };
                lines.push(format!(
                    "{}{}{comma}",
                    spaces(content_col),
                    self.assignment_inline(assignment)
                ));
            }
        }

        lines.extend(self.render_returning(&insert.returning, river));
        lines
    }

    /// VALUES rows: the first row shares the VALUES line, the rest align
    /// beneath it.
    fn render_values_rows(&self, values: &ValuesClause, indent: usize, river: usize) -> Vec<String> {
        let content_col = indent + river + 1;
        let mut lines = Vec::new();
        for (i, row) in values.rows.iter().enumerate() {
            let rendered = format!(
                "({})",
                row.iter().map(|e| self.expr_inline(e, 0)).join(", ")
            );
            let comma = if i + 1 < values.rows.len() { "," } else { "" };
            if i == 0 {
                lines.push(format!(
                    "{}{:>river$} {rendered}{comma}",
                    spaces(indent),
                    "VALUES"
                ));
            } else {
                lines.push(format!("{}{rendered}{comma}", spaces(content_col)));
            }
        }
        lines
    }

    fn assignment_inline(&self, assignment: &Assignment) -> String {
        let target = match &assignment.target {
            AssignmentTarget::Column(name) => name.to_string(),
            AssignmentTarget::Tuple(names) => {
                format!("({})", names.iter().map(|n| n.to_string()).join(", "))
            }
        };
        format!("{target} = {}", self.expr_inline(&assignment.value, 0))
    }

    /// SET assignments: first on the SET line, the rest at the content
    /// column.
    fn render_assignments(
        &self,
        assignments: &[Assignment],
        indent: usize,
        river: usize,
    ) -> Vec<String> {
        let content_col = indent + river + 1;
        let mut lines = Vec::new();
        for (i, assignment) in assignments.iter().enumerate() {
            let comma = if i + 1 < assignments.len() { "," } else { "" };
            let rendered = self.assignment_inline(assignment);
            if i == 0 {
                lines.push(format!(
                    "{}{:>river$} {rendered}{comma}",
                    spaces(indent),
                    "SET"
                ));
            } else {
                lines.push(format!("{}{rendered}{comma}", spaces(content_col)));
            }
        }
        lines
    }

    fn render_returning(&self, returning: &[SelectColumn], river: usize) -> Vec<String> {
        if returning.is_empty() {
            return Vec::new();
        }
        let items = returning
            .iter()
            .map(|c| {
                let mut out = self.expr_inline(&c.expr, 0);
                if let Some(alias) = &c.alias {
                    out.push_str(" AS ");
                    out.push_str(&alias.to_string());
                }
                out
            })
            .join(", ");
        vec![format!("{:>river$} {items}", "RETURNING")]
    }

    fn update_river(&self, update: &Update) -> usize {
        let mut width = "UPDATE".len();
        if !update.returning.is_empty() {
            width = width.max("RETURNING".len());
        }
        width
    }

    fn render_update(&self, update: &Update) -> Vec<String> {
        let river = self.update_river(update);
        let mut lines = vec![format!(
            "{:>river$} {}",
            "UPDATE",
            self.table_ref_inline(&update.table, 0)
        )];
        lines.extend(self.render_assignments(&update.assignments, 0, river));
        if let Some(from) = &update.from {
            let items = from
                .items
                .iter()
                .map(|t| self.table_ref_inline(t, 0))
                .join(", ");
            lines.push(format!("{:>river$} {items}", "FROM"));
        }
        lines.extend(self.render_update_joins(&update.joins, river));
        if let Some(where_clause) = &update.where_clause {
            lines.extend(self.render_condition_river(where_clause, 0, river, "WHERE", 0));
        }
        lines.extend(self.render_returning(&update.returning, river));
        lines
    }

    fn render_update_joins(&self, joins: &[Join], river: usize) -> Vec<String> {
        let content_col = river + 1;
        let mut lines = Vec::new();
        for join in joins {
            // Same discipline as the SELECT join list: plain JOIN
            // right-aligns to the river, qualified joins sit flush at the
            // content column.
            let phrase = join.join_type.phrase();
            let mut line = if phrase == "JOIN" {
                format!("{phrase:>river$} ")
            } else {
                format!("{}{phrase} ", spaces(content_col))
            };
            line.push_str(&self.table_ref_inline(&join.relation, 0));
            lines.push(line);
            match &join.constraint {
                Some(JoinConstraint::On(predicate)) => {
                    lines.extend(self.render_condition_on(predicate, 0, river, "ON", 0));
                }
                Some(JoinConstraint::Using(columns)) => {
                    lines.push(format!(
                        "{:>river$} ({})",
                        "USING",
                        columns.iter().map(|c| c.to_string()).join(", ")
                    ));
                }
                None => {}
            }
        }
        lines
    }

    fn render_delete(&self, delete: &Delete) -> Vec<String> {
        let mut river = "DELETE".len();
        if !delete.returning.is_empty() {
            river = river.max("RETURNING".len());
        }
        let mut lines = vec![format!(
            "{:>river$} FROM {}",
            "DELETE",
            self.table_ref_inline(&delete.table, 0)
        )];
        if !delete.using.is_empty() {
            let items = delete
                .using
                .iter()
                .map(|t| self.table_ref_inline(t, 0))
                .join(", ");
            lines.push(format!("{:>river$} {items}", "USING"));
        }
        if let Some(where_clause) = &delete.where_clause {
            lines.extend(self.render_condition_river(where_clause, 0, river, "WHERE", 0));
        }
        lines.extend(self.render_returning(&delete.returning, river));
        lines
    }

    fn render_merge(&self, merge: &Merge) -> Vec<String> {
        let river = "MERGE".len();
        let content_col = river + 1;
        let mut lines = vec![format!(
            "{:>river$} INTO {}",
            "MERGE",
            self.table_ref_inline(&merge.into, 0)
        )];
        lines.push(format!(
            "{:>river$} {}",
            "USING",
            self.table_ref_inline(&merge.using, 0)
        ));
        lines.extend(self.render_condition_on(&merge.on, 0, river, "ON", 0));
        for when in &merge.clauses {
            let mut line = format!(
                "{:>river$} {}MATCHED",
                "WHEN",
                if when.matched { "" } else { "NOT " }
            );
            if let Some(condition) = &when.condition {
                line.push_str(" AND ");
                line.push_str(&self.expr_inline(condition, 0));
            }
            line.push_str(" THEN");
            lines.push(line);
            match &when.action {
                MergeAction::Update(assignments) => {
                    let rendered = assignments.iter().map(|a| self.assignment_inline(a)).join(", ");
                    lines.push(format!("{}UPDATE SET {rendered}", spaces(content_col)));
                }
                MergeAction::Insert { columns, values } => {
                    let mut line = format!("{}INSERT", spaces(content_col));
                    if !columns.is_empty() {
                        line.push_str(&format!(
                            " ({})",
                            columns.iter().map(|c| c.to_string()).join(", ")
                        ));
                    }
                    line.push_str(&format!(
                        " VALUES ({})",
                        values.iter().map(|e| self.expr_inline(e, 0)).join(", ")
                    ));
                    lines.push(line);
                }
                MergeAction::Delete => {
                    lines.push(format!("{}DELETE", spaces(content_col)));
                }
                MergeAction::DoNothing => {
                    lines.push(format!("{}DO NOTHING", spaces(content_col)));
                }
            }
        }
        lines
    }

    fn render_values_statement(&self, values: &ValuesStatement) -> Vec<String> {
        self.render_values_rows(&values.values, 0, "VALUES".len())
    }

    fn render_explain(&self, explain: &Explain) -> Vec<String> {
        let mut head = "EXPLAIN".to_string();
        if !explain.options.is_empty() {
            head.push_str(" (");
            head.push_str(
                &explain
                    .options
                    .iter()
                    .map(|option| match &option.value {
                        Some(value) => format!("{} {value}", option.name),
                        None => option.name.clone(),
                    })
                    .join(", "),
            );
            head.push(')');
        } else {
            if explain.analyze {
                head.push_str(" ANALYZE");
            }
            if explain.verbose {
                head.push_str(" VERBOSE");
            }
        }
        let mut lines = vec![head];
        lines.extend(self.render_statement(&explain.inner));
        lines
    }
}
