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
//! SELECT layout: the river, column lists, joins, subqueries, CASE, and
//! window functions.

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

#[test]
fn basic_select_river() {
    assert_eq!(
        fmt("select file_hash from file_system where file_name = '.vimrc';"),
        "SELECT file_hash\n  FROM file_system\n WHERE file_name = '.vimrc';\n",
    );
}

#[test]
fn join_with_and_in_on_clause() {
    // Qualified joins sit flush at the content column (where FROM's table
    // starts); the ON clause right-aligns to the river beneath them.
    let sql = "select r.last_name from riders as r inner join bikes as b \
               on r.bike_vin_num = b.vin_num and b.engine_tally > 2;";
    assert_eq!(
        fmt(sql),
        "SELECT r.last_name\n\
         \x20 FROM riders AS r\n\
         \x20      INNER JOIN bikes AS b\n\
         \x20   ON r.bike_vin_num = b.vin_num\n\
         \x20      AND b.engine_tally > 2;\n",
    );
}

#[test]
fn plain_join_right_aligns_like_from() {
    let sql = "select a.id from a join b using (id);";
    assert_eq!(
        fmt(sql),
        "SELECT a.id\n\
         \x20 FROM a\n\
         \x20 JOIN b\n\
         \x20USING (id);\n",
    );
}

#[test]
fn long_column_list_breaks_one_per_line() {
    let sql = "select one_really_long_column_name, another_really_long_column_name, \
               third_really_long_column_name from wide_table;";
    assert_eq!(
        fmt(sql),
        "SELECT one_really_long_column_name,\n\
         \x20      another_really_long_column_name,\n\
         \x20      third_really_long_column_name\n\
         \x20 FROM wide_table;\n",
    );
}

#[test]
fn aliased_columns_break_past_threshold() {
    let sql = "select user_id as id, user_name as name, user_email as contact_email from users;";
    assert_eq!(
        fmt(sql),
        "SELECT user_id AS id,\n\
         \x20      user_name AS name,\n\
         \x20      user_email AS contact_email\n\
         \x20 FROM users;\n",
    );
}

#[test]
fn in_subquery_breaks_beneath_in() {
    let sql = "select id, status from tickets where id in \
               (select id from active union select id from archived);";
    assert_eq!(
        fmt(sql),
        "SELECT id, status\n\
         \x20 FROM tickets\n\
         \x20WHERE id IN\n\
         \x20      (SELECT id\n\
         \x20         FROM active\n\
         \x20        UNION\n\
         \x20       SELECT id\n\
         \x20         FROM archived);\n",
    );
}

#[test]
fn cte_bodies_indent_inside_parens() {
    let sql = "with regional as (select region, sum(amount) as total from orders \
               group by region) select region, total from regional where total > 1000000;";
    assert_eq!(
        fmt(sql),
        "  WITH regional AS (\n\
         \x20      SELECT region, SUM(amount) AS total\n\
         \x20        FROM orders\n\
         \x20       GROUP BY region\n\
         \x20      )\n\
         SELECT region, total\n\
         \x20 FROM regional\n\
         \x20WHERE total > 1000000;\n",
    );
}

#[test]
fn union_members_share_the_river() {
    let sql = "select id from a union all select id from b;";
    assert_eq!(
        fmt(sql),
        "SELECT id\n  FROM a\n UNION ALL\nSELECT id\n  FROM b;\n",
    );
}

#[test]
fn exists_subquery_breaks() {
    let sql = "select id from users u where exists \
               (select 1 from orders o where o.user_id = u.id);";
    assert_eq!(
        fmt(sql),
        "SELECT id\n\
         \x20 FROM users AS u\n\
         \x20WHERE EXISTS\n\
         \x20      (SELECT 1\n\
         \x20         FROM orders AS o\n\
         \x20        WHERE o.user_id = u.id);\n",
    );
}

#[test]
fn long_in_list_fills_and_aligns() {
    let sql = "select id from t where status in ('active', 'pending', 'blocked', \
               'archived', 'deleted', 'suspended', 'waiting');";
    assert_eq!(
        fmt(sql),
        "SELECT id\n\
         \x20 FROM t\n\
         \x20WHERE status IN ('active', 'pending', 'blocked', 'archived', 'deleted',\n\
         \x20                 'suspended', 'waiting');\n",
    );
}

#[test]
fn case_expression_aligns_branches() {
    let sql = "select case when status = 'active' and verified then 'ok' \
               when status = 'pending' then 'wait' else 'blocked' end as status_label \
               from accounts;";
    assert_eq!(
        fmt(sql),
        "SELECT CASE WHEN status = 'active' AND verified THEN 'ok'\n\
         \x20           WHEN status = 'pending' THEN 'wait'\n\
         \x20           ELSE 'blocked'\n\
         \x20      END AS status_label\n\
         \x20 FROM accounts;\n",
    );
}

#[test]
fn window_function_stays_inline_when_it_fits() {
    let sql = "select user_id, row_number() over (partition by user_id \
               order by created_at desc) as rn from events;";
    assert_eq!(
        fmt(sql),
        "SELECT user_id,\n\
         \x20      ROW_NUMBER() OVER (PARTITION BY user_id ORDER BY created_at DESC) AS rn\n\
         \x20 FROM events;\n",
    );
}

#[test]
fn window_frame_splits_with_aligned_by_keywords() {
    let sql = "select sum(amount) over (partition by customer_id, region order by created_at \
               rows between unbounded preceding and current row) as running_total from orders;";
    assert_eq!(
        fmt(sql),
        "SELECT SUM(amount) OVER (PARTITION BY customer_id, region\n\
         \x20                            ORDER BY created_at\n\
         \x20                        ROWS BETWEEN UNBOUNDED PRECEDING\n\
         \x20                             AND CURRENT ROW) AS running_total\n\
         \x20 FROM orders;\n",
    );
}

#[test]
fn order_limit_offset_align_to_the_river() {
    let sql = "select name from users order by created_at desc nulls last limit 10 offset 5;";
    assert_eq!(
        fmt(sql),
        "SELECT name\n\
         \x20 FROM users\n\
         \x20ORDER BY created_at DESC NULLS LAST\n\
         \x20LIMIT 10\n\
         OFFSET 5;\n",
    );
}

#[test]
fn distinct_on_stays_with_select() {
    assert_eq!(
        fmt_pg("select distinct on (customer_id) customer_id, total from orders;"),
        "SELECT DISTINCT ON (customer_id) customer_id, total\n  FROM orders;\n",
    );
}

#[test]
fn group_by_rollup_renders_inline() {
    assert_eq!(
        fmt("select region, sum(total) from sales group by rollup (region, city);"),
        "SELECT region, SUM(total)\n\
         \x20 FROM sales\n\
         \x20GROUP BY ROLLUP (region, city);\n",
    );
}

#[test]
fn between_binds_the_first_and() {
    assert_eq!(
        fmt("select id from t where price between 10 and 20 and in_stock;"),
        "SELECT id\n\
         \x20 FROM t\n\
         \x20WHERE price BETWEEN 10 AND 20\n\
         \x20  AND in_stock;\n",
    );
}

#[test]
fn named_windows_render_after_having() {
    let sql = "select avg(score) over w from results window w as (partition by player);";
    assert_eq!(
        fmt(sql),
        "SELECT AVG(score) OVER w\n\
         \x20 FROM results\n\
         WINDOW w AS (PARTITION BY player);\n",
    );
}

#[test]
fn subquery_in_from_gets_an_alias() {
    let sql = "select t.n from (select count(*) as n from events) as t;";
    assert_eq!(
        fmt(sql),
        "SELECT t.n\n  FROM (SELECT COUNT(*) AS n FROM events) AS t;\n",
    );
}

#[test]
fn lateral_marks_survive() {
    let sql = "select u.id, o.total from users u, lateral (select sum(x) as total \
               from orders where user_id = u.id) o;";
    let out = fmt(sql);
    assert!(out.contains("LATERAL ("), "missing LATERAL in:\n{out}");
}
