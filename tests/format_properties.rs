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
//! Universal properties: idempotence, newline discipline, statement
//! ordering, case normalisation, comment preservation.

use pretty_assertions::assert_eq;
use sqlfmt::dialect::DialectProfile;
use sqlfmt::{format, FormatOptions};

fn fmt_with(profile: &'static DialectProfile, sql: &str) -> String {
    format(
        sql,
        FormatOptions {
            dialect: profile,
            ..FormatOptions::default()
        },
    )
    .unwrap()
}

const CORPUS: &[(&str, &str)] = &[
    ("ansi", "select file_hash from file_system where file_name = '.vimrc';"),
    (
        "ansi",
        "select r.last_name from riders as r inner join bikes as b \
         on r.bike_vin_num = b.vin_num and b.engine_tally > 2;",
    ),
    (
        "ansi",
        "with regional as (select region, sum(amount) as total from orders group by region) \
         select region, total from regional where total > 1000000;",
    ),
    ("ansi", "select id from a union all select id from b order by 1 limit 3;"),
    (
        "ansi",
        "select id, status from tickets where id in (select id from active union \
         select id from archived);",
    ),
    (
        "ansi",
        "insert into films (code, title) values ('a', 'b'), ('c', 'd');",
    ),
    (
        "postgres",
        "insert into metrics (key, n) values ('visits', 1) on conflict (key) \
         do update set n = metrics.n + 1;",
    ),
    ("ansi", "update t set a = 1, b = 2 where id = 3 and active;"),
    (
        "postgres",
        "create table films (film_id integer not null, title varchar(255), \
         primary key (film_id));",
    ),
    (
        "postgres",
        "select payload->>'id' as id from events where payload @> '{\"a\": 1}';",
    ),
    (
        "ansi",
        "select case when a = 1 then 'one' when a = 2 then 'two' else 'many' end from t;",
    ),
    (
        "ansi",
        "select sum(amount) over (partition by customer_id order by created_at \
         rows between unbounded preceding and current row) from orders;",
    ),
    ("ansi", "SELECT 1; SELECT (; SELECT 2;"),
    ("ansi", "-- header\nselect id, -- keep id\n name from users;"),
    ("tsql", "SELECT 1\nGO\nSELECT 2;"),
    (
        "postgres",
        "grant select, update (name) on table films to editors with grant option;",
    ),
    ("ansi", "select 名前, 住所 from 顧客;"),
];

fn profile(name: &str) -> &'static DialectProfile {
    DialectProfile::by_name(name).expect("known profile")
}

#[test]
fn formatting_is_idempotent_across_the_corpus() {
    for (dialect, sql) in CORPUS {
        let once = fmt_with(profile(dialect), sql);
        let twice = fmt_with(profile(dialect), &once);
        assert_eq!(once, twice, "not idempotent for input:\n{sql}");
    }
}

#[test]
fn output_ends_with_one_newline_and_no_trailing_spaces() {
    for (dialect, sql) in CORPUS {
        let out = fmt_with(profile(dialect), sql);
        assert!(out.ends_with('\n'), "missing newline for:\n{sql}");
        assert!(!out.ends_with("\n\n"), "double newline for:\n{sql}");
        for line in out.lines() {
            assert_eq!(line, line.trim_end(), "trailing whitespace in:\n{out}");
        }
    }
}

#[test]
fn statement_order_is_preserved() {
    let out = format(
        "select 2; select 1; create table t (a int); select 3;",
        FormatOptions::default(),
    )
    .unwrap();
    let blocks: Vec<&str> = out.split("\n\n").collect();
    assert_eq!(blocks.len(), 4);
    assert!(blocks[0].starts_with("SELECT 2"));
    assert!(blocks[1].starts_with("SELECT 1"));
    assert!(blocks[2].starts_with("CREATE TABLE t"));
    assert!(blocks[3].starts_with("SELECT 3"));
}

#[test]
fn keywords_upper_identifiers_lower_quoted_verbatim() {
    let out = format(
        "SELECT \"MiXeD\", NAME from T where NAME = 'Value';",
        FormatOptions::default(),
    )
    .unwrap();
    assert_eq!(
        out,
        "SELECT \"MiXeD\", name\n  FROM t\n WHERE name = 'Value';\n",
    );
}

#[test]
fn every_comment_appears_exactly_once() {
    let sql = "-- header\nselect id, -- keep id\n name from users;";
    let out = format(sql, FormatOptions::default()).unwrap();
    assert_eq!(out.matches("-- header").count(), 1);
    assert_eq!(out.matches("-- keep id").count(), 1);
    assert_eq!(
        out,
        "-- header\n\
         SELECT id, -- keep id\n\
         \x20      name\n\
         \x20 FROM users;\n",
    );
}

#[test]
fn leading_comment_blank_lines_collapse_to_one() {
    let sql = "-- first\n\n\n-- second\nselect 1;";
    let out = format(sql, FormatOptions::default()).unwrap();
    assert_eq!(out, "-- first\n\n-- second\nSELECT 1;\n");
}

#[test]
fn statements_are_separated_by_one_blank_line() {
    assert_eq!(
        format("select 1; select 2;", FormatOptions::default()).unwrap(),
        "SELECT 1;\n\nSELECT 2;\n",
    );
}

#[test]
fn cjk_identifiers_render_and_measure() {
    assert_eq!(
        format("select 名前, 住所 from 顧客;", FormatOptions::default()).unwrap(),
        "SELECT 名前, 住所\n  FROM 顧客;\n",
    );
}

#[test]
fn builtin_profiles_are_stable_across_custom_builds() {
    let before = DialectProfile::postgres().clone();
    let _custom = sqlfmt::dialect::ProfileBuilder::from(DialectProfile::postgres())
        .keywords(["FLARP"])
        .build();
    assert_eq!(&before, DialectProfile::postgres());
}
