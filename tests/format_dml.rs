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

#![warn(clippy::all)]
//! INSERT / UPDATE / DELETE / MERGE / VALUES / EXPLAIN layout.

use pretty_assertions::assert_eq;
use sqlfmt::dialect::DialectProfile;
use sqlfmt::{format, FormatOptions};

fn fmt(sql: &str) -> String {
    format(sql, FormatOptions::default()).unwrap()
}

fn fmt_pg(sql: &str) -> String {
    format(
        sql,
        FormatOptions {
            dialect: DialectProfile::postgres(),
            ..FormatOptions::default()
        },
    )
    .unwrap()
}

fn fmt_mysql(sql: &str) -> String {
    format(
        sql,
        FormatOptions {
            dialect: DialectProfile::mysql(),
            ..FormatOptions::default()
        },
    )
    .unwrap()
}

#[test]
fn insert_values_align_rows() {
    let sql = "insert into films (code, title, kind) values \
               ('UA502', 'Bananas', 'Comedy'), ('T_601', 'Yojimbo', 'Drama');";
    assert_eq!(
        fmt(sql),
        "INSERT INTO films (code, title, kind)\n\
         VALUES ('UA502', 'Bananas', 'Comedy'),\n\
         \x20      ('T_601', 'Yojimbo', 'Drama');\n",
    );
}

#[test]
fn insert_from_query_shares_the_river() {
    let sql = "insert into archive select * from events where created_at < now();";
    assert_eq!(
        fmt_pg(sql),
        "INSERT INTO archive\n\
         SELECT *\n\
         \x20 FROM events\n\
         \x20WHERE created_at < NOW();\n",
    );
}

#[test]
fn insert_on_conflict_do_update() {
    let sql = "insert into metrics (key, value_count) values ('visits', 1) \
               on conflict (key) do update set value_count = metrics.value_count + 1 \
               where metrics.stale = false;";
    assert_eq!(
        fmt_pg(sql),
        "INSERT INTO metrics (key, value_count)\n\
         VALUES ('visits', 1)\n\
         \x20   ON CONFLICT (key) DO UPDATE\n\
         \x20  SET value_count = metrics.value_count + 1\n\
         \x20WHERE metrics.stale = FALSE;\n",
    );
}

#[test]
fn insert_default_values() {
    assert_eq!(
        fmt("insert into audit_log default values;"),
        "INSERT INTO audit_log\nDEFAULT VALUES;\n",
    );
}

#[test]
fn mysql_on_duplicate_key_update() {
    let sql = "insert into counters (name, hits) values ('home', 1) \
               on duplicate key update hits = hits + 1;";
    assert_eq!(
        fmt_mysql(sql),
        "INSERT INTO counters (name, hits)\n\
         VALUES ('home', 1)\n\
         \x20   ON DUPLICATE KEY UPDATE\n\
         \x20      hits = hits + 1;\n",
    );
}

#[test]
fn update_with_returning_widens_the_river() {
    let sql = "update films set kind = 'Dramatic' where kind = 'Drama' returning id, kind;";
    assert_eq!(
        fmt_pg(sql),
        "\x20  UPDATE films\n\
         \x20     SET kind = 'Dramatic'\n\
         \x20   WHERE kind = 'Drama'\n\
         RETURNING id, kind;\n",
    );
}

#[test]
fn update_assignments_align() {
    assert_eq!(
        fmt("update t set a = 1, b = 2 where id = 3;"),
        "UPDATE t\n\
         \x20  SET a = 1,\n\
         \x20      b = 2\n\
         \x20WHERE id = 3;\n",
    );
}

#[test]
fn update_from_with_qualified_join() {
    let sql = "update totals set amount = d.amount from daily d \
               inner join regions r on d.region_id = r.id \
               where totals.day = d.day;";
    assert_eq!(
        fmt(sql),
        "UPDATE totals\n\
         \x20  SET amount = d.amount\n\
         \x20 FROM daily AS d\n\
         \x20      INNER JOIN regions AS r\n\
         \x20   ON d.region_id = r.id\n\
         \x20WHERE totals.day = d.day;\n",
    );
}

#[test]
fn delete_using_where() {
    let sql = "delete from sessions using users \
               where sessions.user_id = users.id and users.disabled;";
    assert_eq!(
        fmt(sql),
        "DELETE FROM sessions\n\
         \x20USING users\n\
         \x20WHERE sessions.user_id = users.id\n\
         \x20  AND users.disabled;\n",
    );
}

#[test]
fn merge_when_clauses() {
    let sql = "merge into inventory as i using deliveries as d on i.sku = d.sku \
               when matched then update set qty = i.qty + d.qty \
               when not matched then insert (sku, qty) values (d.sku, d.qty);";
    assert_eq!(
        fmt(sql),
        "MERGE INTO inventory AS i\n\
         USING deliveries AS d\n\
         \x20  ON i.sku = d.sku\n\
         \x20WHEN MATCHED THEN\n\
         \x20     UPDATE SET qty = i.qty + d.qty\n\
         \x20WHEN NOT MATCHED THEN\n\
         \x20     INSERT (sku, qty) VALUES (d.sku, d.qty);\n",
    );
}

#[test]
fn standalone_values() {
    assert_eq!(
        fmt("values (1, 'one'), (2, 'two');"),
        "VALUES (1, 'one'),\n\x20      (2, 'two');\n",
    );
}

#[test]
fn explain_analyze_wraps_inner_statement() {
    assert_eq!(
        fmt_pg("explain analyze select count(*) from big_table group by region;"),
        "EXPLAIN ANALYZE\n\
         SELECT COUNT(*)\n\
         \x20 FROM big_table\n\
         \x20GROUP BY region;\n",
    );
}

#[test]
fn explain_options_accept_bare_names() {
    assert_eq!(
        fmt_pg("explain (analyze, buffers) select 1;"),
        "EXPLAIN (ANALYZE, BUFFERS)\nSELECT 1;\n",
    );
}

#[test]
fn insert_values_then_select_is_an_error() {
    let out = fmt("insert into t (a) values (1) select 2;");
    // The malformed statement is preserved verbatim by recovery.
    assert!(out.contains("values (1) select 2"), "got:\n{out}");
}
