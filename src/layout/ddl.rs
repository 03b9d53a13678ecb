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

//! DDL layout: CREATE TABLE with aligned columns, ALTER TABLE, DROP,
//! indexes, views, policies, GRANT/REVOKE, TRUNCATE.

use itertools::Itertools;

use super::expr::spaces;
use super::width::display_width;
use super::LayoutEngine;
use crate::ast::*;

const DDL_INDENT: usize = 4;

impl<'a> LayoutEngine<'a> {
    pub(crate) fn render_create_table(&self, table: &CreateTable) -> Vec<String> {
        let mut head = "CREATE ".to_string();
        if table.temporary {
            head.push_str("TEMPORARY ");
        }
        if table.unlogged {
            head.push_str("UNLOGGED ");
        }
        head.push_str("TABLE ");
        if table.if_not_exists {
            head.push_str("IF NOT EXISTS ");
        }
        head.push_str(&table.name.to_string());

        let mut lines = Vec::new();
        if table.columns.is_empty() && table.constraints.is_empty() {
            if let Some(query) = &table.as_query {
                lines.push(format!("{head} AS"));
                lines.extend(self.render_query(query, 0, 0, false));
                return lines;
            }
            lines.push(head);
            return lines;
        }

        head.push_str(" (");
        lines.push(head);

        let max_name_len = table
            .columns
            .iter()
            .map(|c| display_width(&c.name.to_string()))
            .max()
            .unwrap_or(0);
        let max_type_len = table
            .columns
            .iter()
            .map(|c| display_width(&c.data_type.to_string()))
            .filter(|w| *w <= self.policy.type_align_cap())
            .max()
            .unwrap_or(0);

        let element_count = table.columns.len() + table.constraints.len();
        let mut emitted = 0usize;
        for column in &table.columns {
            lines.extend(self.render_comments(&column.leading_comments, DDL_INDENT));
            emitted += 1;
            let mut line = spaces(DDL_INDENT);
            let name = column.name.to_string();
            line.push_str(&name);
            line.push_str(&spaces(
                max_name_len.saturating_sub(display_width(&name)) + 1,
            ));
            let type_text = column.data_type.to_string();
            line.push_str(&type_text);
            let options = self.column_options_text(column);
            if !options.is_empty() {
                line.push_str(&spaces(
                    max_type_len.saturating_sub(display_width(&type_text)) + 1,
                ));
                line.push_str(&options);
            }
            if emitted < element_count {
                line.push(',');
            }
            if let Some(comment) = &column.trailing_comment {
                line.push(' ');
                line.push_str(&comment.text);
            }
            lines.push(line.trim_end().to_string());
        }

        for constraint in &table.constraints {
            emitted += 1;
            let mut constraint_lines = self.table_constraint_lines(constraint);
            if emitted < element_count {
                if let Some(last) = constraint_lines.last_mut() {
                    last.push(',');
                }
            }
            lines.extend(constraint_lines);
        }

        let mut close = ")".to_string();
        if !table.inherits.is_empty() {
            close.push_str(" INHERITS (");
            close.push_str(&table.inherits.iter().map(|n| n.to_string()).join(", "));
            close.push(')');
        }
        if let Some((method, keys)) = &table.partition_by {
            close.push_str(" PARTITION BY ");
            close.push_str(method);
            close.push_str(" (");
            close.push_str(&keys.iter().map(|e| self.expr_inline(e, 0)).join(", "));
            close.push(')');
        }
        if !table.with_options.is_empty() {
            close.push_str(" WITH (");
            close.push_str(
                &table
                    .with_options
                    .iter()
                    .map(|o| self.sql_option_text(o, " = "))
                    .join(", "),
            );
            close.push(')');
        }
        if let Some(tablespace) = &table.tablespace {
            close.push_str(" TABLESPACE ");
            close.push_str(&tablespace.to_string());
        }
        if !table.table_options.is_empty() {
            close.push(' ');
            close.push_str(
                &table
                    .table_options
                    .iter()
                    .map(|o| self.sql_option_text(o, "="))
                    .join(" "),
            );
        }
        lines.push(close);

        if let Some(query) = &table.as_query {
            if let Some(last) = lines.last_mut() {
                last.push_str(" AS");
            }
            lines.extend(self.render_query(query, 0, 0, false));
        }
        lines
    }

    fn sql_option_text(&self, option: &SqlOption, eq: &str) -> String {
        match &option.value {
            Some(value) => format!("{}{eq}{}", option.name, self.expr_inline(value, 0)),
            None => option.name.clone(),
        }
    }

    fn column_options_text(&self, column: &ColumnDef) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(collation) = &column.collation {
            parts.push(format!("COLLATE {collation}"));
        }
        for def in &column.options {
            let mut piece = String::new();
            if let Some(name) = &def.name {
                piece.push_str("CONSTRAINT ");
                piece.push_str(&name.to_string());
                piece.push(' ');
            }
            piece.push_str(&self.column_option_text(&def.option));
            parts.push(piece);
        }
        parts.join(" ")
    }

    fn column_option_text(&self, option: &ColumnOption) -> String {
        match option {
            ColumnOption::NotNull => "NOT NULL".to_string(),
            ColumnOption::Null => "NULL".to_string(),
            ColumnOption::Default(expr) => format!("DEFAULT {}", self.expr_inline(expr, 0)),
            ColumnOption::PrimaryKey => "PRIMARY KEY".to_string(),
            ColumnOption::Unique => "UNIQUE".to_string(),
            ColumnOption::AutoIncrement => "AUTO_INCREMENT".to_string(),
            ColumnOption::GeneratedIdentity { always: true } => {
                "GENERATED ALWAYS AS IDENTITY".to_string()
            }
            ColumnOption::GeneratedIdentity { always: false } => {
                "GENERATED BY DEFAULT AS IDENTITY".to_string()
            }
            ColumnOption::GeneratedExpr { expr, stored } => {
                let mut out = format!("GENERATED ALWAYS AS ({})", self.expr_inline(expr, 0));
                if *stored {
                    out.push_str(" STORED");
                }
                out
            }
            ColumnOption::References {
                table,
                columns,
                on_delete,
                on_update,
            } => {
                let mut out = format!("REFERENCES {table}");
                if !columns.is_empty() {
                    out.push_str(" (");
                    out.push_str(&columns.iter().map(|c| c.to_string()).join(", "));
                    out.push(')');
                }
                if let Some(action) = on_delete {
                    out.push_str(&format!(" ON DELETE {action}"));
                }
                if let Some(action) = on_update {
                    out.push_str(&format!(" ON UPDATE {action}"));
                }
                out
            }
            ColumnOption::Check(expr) => format!("CHECK ({})", self.expr_inline(expr, 0)),
        }
    }

    /// Table constraints sit at the column indent; FOREIGN KEY splits its
    /// REFERENCES and ON DELETE/UPDATE parts onto indented lines.
    fn table_constraint_lines(&self, constraint: &TableConstraint) -> Vec<String> {
        let prefix = |name: &Option<Ident>| match name {
            Some(name) => format!("CONSTRAINT {name} "),
            None => String::new(),
        };
        match constraint {
            TableConstraint::PrimaryKey { name, columns } => vec![format!(
                "{}{}PRIMARY KEY ({})",
                spaces(DDL_INDENT),
                prefix(name),
                columns.iter().map(|c| c.to_string()).join(", ")
            )],
            TableConstraint::Unique { name, columns } => vec![format!(
                "{}{}UNIQUE ({})",
                spaces(DDL_INDENT),
                prefix(name),
                columns.iter().map(|c| c.to_string()).join(", ")
            )],
            TableConstraint::Check { name, expr } => vec![format!(
                "{}{}CHECK ({})",
                spaces(DDL_INDENT),
                prefix(name),
                self.expr_inline(expr, 0)
            )],
            TableConstraint::ForeignKey {
                name,
                columns,
                foreign_table,
                referred_columns,
                on_delete,
                on_update,
            } => {
                let mut lines = vec![format!(
                    "{}{}FOREIGN KEY ({})",
                    spaces(DDL_INDENT),
                    prefix(name),
                    columns.iter().map(|c| c.to_string()).join(", ")
                )];
                let mut references = format!("{}REFERENCES {foreign_table}", spaces(DDL_INDENT * 2));
                if !referred_columns.is_empty() {
                    references.push_str(" (");
                    references
                        .push_str(&referred_columns.iter().map(|c| c.to_string()).join(", "));
                    references.push(')');
                }
                lines.push(references);
                if let Some(action) = on_delete {
                    lines.push(format!("{}ON DELETE {action}", spaces(DDL_INDENT * 2)));
                }
                if let Some(action) = on_update {
                    lines.push(format!("{}ON UPDATE {action}", spaces(DDL_INDENT * 2)));
                }
                lines
            }
        }
    }

    pub(crate) fn render_alter_table(&self, alter: &AlterTable) -> Vec<String> {
        let mut head = "ALTER TABLE ".to_string();
        if alter.if_exists {
            head.push_str("IF EXISTS ");
        }
        if alter.only {
            head.push_str("ONLY ");
        }
        head.push_str(&alter.name.to_string());

        let actions: Vec<String> = alter
            .actions
            .iter()
            .map(|a| self.alter_action_text(a))
            .collect();
        if actions.len() == 1 {
            let inline = format!("{head} {}", actions[0]);
            if display_width(&inline) <= self.policy.expr_wrap_max() {
                return vec![inline];
            }
        }
        let mut lines = vec![head];
        for (i, action) in actions.iter().enumerate() {
            let comma = if i + 1 < actions.len() { "," } else { "" };
            lines.push(format!("{}{action}{comma}", spaces(DDL_INDENT)));
        }
        lines
    }

    fn alter_action_text(&self, action: &AlterAction) -> String {
        match action {
            AlterAction::AddColumn { if_not_exists, def } => {
                let mut out = "ADD COLUMN ".to_string();
                if *if_not_exists {
                    out.push_str("IF NOT EXISTS ");
                }
                out.push_str(&self.column_def_inline(def));
                out
            }
            AlterAction::DropColumn {
                if_exists,
                name,
                cascade,
            } => {
                let mut out = "DROP COLUMN ".to_string();
                if *if_exists {
                    out.push_str("IF EXISTS ");
                }
                out.push_str(&name.to_string());
                if *cascade {
                    out.push_str(" CASCADE");
                }
                out
            }
            AlterAction::AlterColumn { name, op } => {
                let mut out = format!("ALTER COLUMN {name} ");
                match op {
                    AlterColumnOp::SetDefault(expr) => {
                        out.push_str(&format!("SET DEFAULT {}", self.expr_inline(expr, 0)));
                    }
                    AlterColumnOp::DropDefault => out.push_str("DROP DEFAULT"),
                    AlterColumnOp::SetNotNull => out.push_str("SET NOT NULL"),
                    AlterColumnOp::DropNotNull => out.push_str("DROP NOT NULL"),
                    AlterColumnOp::SetType { data_type, using } => {
                        out.push_str(&format!("TYPE {data_type}"));
                        if let Some(using) = using {
                            out.push_str(&format!(" USING {}", self.expr_inline(using, 0)));
                        }
                    }
                }
                out
            }
            AlterAction::AddConstraint(constraint) => {
                let lines = self.table_constraint_lines(constraint);
                format!(
                    "ADD {}",
                    lines.iter().map(|l| l.trim_start()).join(" ")
                )
            }
            AlterAction::DropConstraint {
                if_exists,
                name,
                cascade,
            } => {
                let mut out = "DROP CONSTRAINT ".to_string();
                if *if_exists {
                    out.push_str("IF EXISTS ");
                }
                out.push_str(&name.to_string());
                if *cascade {
                    out.push_str(" CASCADE");
                }
                out
            }
            AlterAction::RenameColumn { old, new } => format!("RENAME COLUMN {old} TO {new}"),
            AlterAction::RenameTable(name) => format!("RENAME TO {name}"),
            AlterAction::OwnerTo(owner) => format!("OWNER TO {owner}"),
            AlterAction::SetSchema(schema) => format!("SET SCHEMA {schema}"),
            AlterAction::EnableRowLevelSecurity => "ENABLE ROW LEVEL SECURITY".to_string(),
            AlterAction::DisableRowLevelSecurity => "DISABLE ROW LEVEL SECURITY".to_string(),
        }
    }

    fn column_def_inline(&self, def: &ColumnDef) -> String {
        let mut out = format!("{} {}", def.name, def.data_type);
        let options = self.column_options_text(def);
        if !options.is_empty() {
            out.push(' ');
            out.push_str(&options);
        }
        out
    }

    pub(crate) fn render_drop(&self, drop: &Drop) -> Vec<String> {
        let mut line = format!("DROP {} ", drop.object_type);
        if drop.concurrently {
            line.push_str("CONCURRENTLY ");
        }
        if drop.if_exists {
            line.push_str("IF EXISTS ");
        }
        line.push_str(&drop.names.iter().map(|n| n.to_string()).join(", "));
        if let Some(on_table) = &drop.on_table {
            line.push_str(&format!(" ON {on_table}"));
        }
        if let Some(behavior) = &drop.behavior {
            line.push_str(&format!(" {behavior}"));
        }
        vec![line]
    }

    pub(crate) fn render_create_index(&self, index: &CreateIndex) -> Vec<String> {
        let mut head = "CREATE ".to_string();
        if index.unique {
            head.push_str("UNIQUE ");
        }
        head.push_str("INDEX ");
        if index.concurrently {
            head.push_str("CONCURRENTLY ");
        }
        if index.if_not_exists {
            head.push_str("IF NOT EXISTS ");
        }
        if let Some(name) = &index.name {
            head.push_str(&name.to_string());
        }
        let head = head.trim_end().to_string();

        let mut on = format!("ON {}", index.table);
        if let Some(using) = &index.using {
            on.push_str(&format!(" USING {}", using.text.to_ascii_lowercase()));
        }
        on.push_str(&format!(
            " ({})",
            index
                .columns
                .iter()
                .map(|c| self.order_by_expr_inline(c, 0))
                .join(", ")
        ));

        let mut tail_parts: Vec<String> = Vec::new();
        if !index.include.is_empty() {
            tail_parts.push(format!(
                "INCLUDE ({})",
                index.include.iter().map(|c| c.to_string()).join(", ")
            ));
        }
        if let Some(where_clause) = &index.where_clause {
            tail_parts.push(format!("WHERE {}", self.expr_inline(where_clause, 0)));
        }

        let inline = {
            let mut out = format!("{head} {on}");
            for part in &tail_parts {
                out.push(' ');
                out.push_str(part);
            }
            out
        };
        if display_width(&inline) <= self.policy.expr_wrap_max() {
            return vec![inline];
        }
        let mut lines = vec![head];
        lines.push(format!("{}{on}", spaces(DDL_INDENT)));
        for part in tail_parts {
            lines.push(format!("{}{part}", spaces(DDL_INDENT)));
        }
        lines
    }

    pub(crate) fn render_create_view(&self, view: &CreateView) -> Vec<String> {
        let mut head = "CREATE ".to_string();
        if view.or_replace {
            head.push_str("OR REPLACE ");
        }
        if view.materialized {
            head.push_str("MATERIALIZED ");
        }
        head.push_str("VIEW ");
        if view.if_not_exists {
            head.push_str("IF NOT EXISTS ");
        }
        head.push_str(&view.name.to_string());
        if !view.columns.is_empty() {
            head.push_str(" (");
            head.push_str(&view.columns.iter().map(|c| c.to_string()).join(", "));
            head.push(')');
        }
        head.push_str(" AS");
        let mut lines = vec![head];
        lines.extend(self.render_query(&view.query, 0, 0, false));
        if view.with_check_option {
            lines.push("WITH CHECK OPTION".to_string());
        }
        lines
    }

    pub(crate) fn render_create_policy(&self, policy: &CreatePolicy) -> Vec<String> {
        let mut lines = vec![format!("CREATE POLICY {} ON {}", policy.name, policy.table)];
        match policy.permissive {
            Some(true) => lines.push(format!("{}AS PERMISSIVE", spaces(DDL_INDENT))),
            Some(false) => lines.push(format!("{}AS RESTRICTIVE", spaces(DDL_INDENT))),
            None => {}
        }
        if let Some(command) = &policy.command {
            lines.push(format!("{}FOR {command}", spaces(DDL_INDENT)));
        }
        if !policy.to.is_empty() {
            lines.push(format!(
                "{}TO {}",
                spaces(DDL_INDENT),
                policy.to.iter().map(|r| r.to_string()).join(", ")
            ));
        }
        if let Some(using) = &policy.using {
            lines.push(format!(
                "{}USING ({})",
                spaces(DDL_INDENT),
                self.expr_inline(using, 0)
            ));
        }
        if let Some(with_check) = &policy.with_check {
            lines.push(format!(
                "{}WITH CHECK ({})",
                spaces(DDL_INDENT),
                self.expr_inline(with_check, 0)
            ));
        }
        lines
    }

    pub(crate) fn render_grant(&self, grant: &Grant) -> Vec<String> {
        let verb = if grant.revoke { "REVOKE" } else { "GRANT" };
        let river = verb.len();

        let mut privileges = String::new();
        if grant.grant_option_for {
            privileges.push_str("GRANT OPTION FOR ");
        }
        match &grant.privileges {
            Privileges::All => privileges.push_str("ALL"),
            Privileges::Actions(actions) => {
                privileges.push_str(
                    &actions
                        .iter()
                        .map(|(name, columns)| {
                            if columns.is_empty() {
                                name.clone()
                            } else {
                                format!(
                                    "{name} ({})",
                                    columns.iter().map(|c| c.to_string()).join(", ")
                                )
                            }
                        })
                        .join(", "),
                );
            }
        }

        let objects = match &grant.objects {
            GrantObjects::Tables(names) => names.iter().map(|n| n.to_string()).join(", "),
            GrantObjects::Sequences(names) => format!(
                "SEQUENCE {}",
                names.iter().map(|n| n.to_string()).join(", ")
            ),
            GrantObjects::Schemas(names) => {
                format!("SCHEMA {}", names.iter().map(|n| n.to_string()).join(", "))
            }
            GrantObjects::AllTablesInSchema(names) => format!(
                "ALL TABLES IN SCHEMA {}",
                names.iter().map(|n| n.to_string()).join(", ")
            ),
            GrantObjects::AllSequencesInSchema(names) => format!(
                "ALL SEQUENCES IN SCHEMA {}",
                names.iter().map(|n| n.to_string()).join(", ")
            ),
        };

        let direction = if grant.revoke { "FROM" } else { "TO" };
        let grantees = grant.grantees.iter().map(|g| g.to_string()).join(", ");

        let mut tail = String::new();
        if grant.with_grant_option {
            tail.push_str(" WITH GRANT OPTION");
        }
        if let Some(granted_by) = &grant.granted_by {
            tail.push_str(&format!(" GRANTED BY {granted_by}"));
        }
        if let Some(behavior) = &grant.behavior {
            tail.push_str(&format!(" {behavior}"));
        }

        let inline = format!("{verb} {privileges} ON {objects} {direction} {grantees}{tail}");
        if display_width(&inline) <= self.policy.expr_wrap_max() {
            return vec![inline];
        }
        let mut lines = vec![format!("{verb} {privileges}")];
        lines.push(format!("{:>river$} {objects}", "ON"));
        lines.push(format!("{direction:>river$} {grantees}"));
        if !tail.is_empty() {
            lines.push(tail.trim_start().to_string());
        }
        lines
    }

    pub(crate) fn render_truncate(&self, truncate: &Truncate) -> Vec<String> {
        let mut line = "TRUNCATE ".to_string();
        if truncate.table_keyword {
            line.push_str("TABLE ");
        }
        if truncate.only {
            line.push_str("ONLY ");
        }
        line.push_str(&truncate.tables.iter().map(|n| n.to_string()).join(", "));
        if let Some(identity) = &truncate.identity {
            line.push_str(&format!(" {identity}"));
        }
        if let Some(behavior) = &truncate.behavior {
            line.push_str(&format!(" {behavior}"));
        }
        vec![line]
    }
}
