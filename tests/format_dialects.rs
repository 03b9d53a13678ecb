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
//! Dialect-specific behavior: keyword recognition per profile, dollar
//! quoting, JSON operators, T-SQL TOP, passthrough statements, custom
//! profiles.

use pretty_assertions::assert_eq;
use sqlfmt::dialect::{DialectProfile, ProfileBuilder};
use sqlfmt::{format, FormatOptions};

fn fmt_with(profile: &DialectProfile, sql: &str) -> String {
    format(
        sql,
        FormatOptions {
            dialect: profile,
            ..FormatOptions::default()
        },
    )
    .unwrap()
}

#[test]
fn auto_increment_is_a_keyword_only_under_mysql() {
    let sql = "CREATE TABLE t (id INT auto_increment);";
    assert_eq!(
        fmt_with(DialectProfile::mysql(), sql),
        "CREATE TABLE t (\n    id INT AUTO_INCREMENT\n);\n",
    );
    // Under PostgreSQL the word is not recognised, the column options fail
    // to parse, and the statement passes through verbatim.
    let pg = fmt_with(DialectProfile::postgres(), sql);
    assert!(pg.contains("auto_increment"), "got:\n{pg}");
}

#[test]
fn dollar_quoted_strings_stay_verbatim() {
    assert_eq!(
        fmt_with(
            DialectProfile::postgres(),
            "select $tag$ hello 'world' $tag$ as greeting;"
        ),
        "SELECT $tag$ hello 'world' $tag$ AS greeting;\n",
    );
}

#[test]
fn json_operators_keep_their_spacing() {
    let sql = "select payload->>'id' as id, payload#>>'{a,b}' as ab from events \
               where payload @> '{\"type\": \"click\"}';";
    assert_eq!(
        fmt_with(DialectProfile::postgres(), sql),
        "SELECT payload->>'id' AS id, payload#>>'{a,b}' AS ab\n\
         \x20 FROM events\n\
         \x20WHERE payload @> '{\"type\": \"click\"}';\n",
    );
}

#[test]
fn pg_cast_and_regex_operators() {
    assert_eq!(
        fmt_with(
            DialectProfile::postgres(),
            "select total::numeric(10,2) from sales where sku ~* '^ab';"
        ),
        "SELECT total::NUMERIC(10, 2)\n\
         \x20 FROM sales\n\
         \x20WHERE sku ~* '^ab';\n",
    );
}

#[test]
fn tsql_top_percent() {
    assert_eq!(
        fmt_with(
            DialectProfile::tsql(),
            "select top (10) percent name from products order by price desc;"
        ),
        "SELECT TOP (10) PERCENT name\n\
         \x20 FROM products\n\
         \x20ORDER BY price DESC;\n",
    );
}

#[test]
fn tsql_go_passes_through() {
    assert_eq!(
        fmt_with(DialectProfile::tsql(), "SELECT 1\nGO\nSELECT 2;"),
        "SELECT 1;\n\nGO\n\nSELECT 2;\n",
    );
}

#[test]
fn mysql_delimiter_passes_through() {
    assert_eq!(
        fmt_with(DialectProfile::mysql(), "DELIMITER //\nselect 1;"),
        "DELIMITER //\n\nSELECT 1;\n",
    );
}

#[test]
fn mysql_placeholders() {
    assert_eq!(
        fmt_with(
            DialectProfile::mysql(),
            "select * from users where id = ? and status = 'x';"
        ),
        "SELECT *\n\
         \x20 FROM users\n\
         \x20WHERE id = ?\n\
         \x20  AND status = 'x';\n",
    );
}

#[test]
fn postgres_vacuum_passes_through() {
    assert_eq!(
        fmt_with(DialectProfile::postgres(), "vacuum full analyze;select 1;"),
        "vacuum full analyze;\n\nSELECT 1;\n",
    );
}

#[test]
fn custom_profile_uppercases_its_function_keywords() {
    let warehouse = ProfileBuilder::from(DialectProfile::postgres())
        .name("warehouse")
        .function_keywords(["hll_union"])
        .build();
    assert_eq!(
        fmt_with(&warehouse, "select hll_union(views) from daily;"),
        "SELECT HLL_UNION(views)\n  FROM daily;\n",
    );
    // The base profile is untouched.
    assert_eq!(
        fmt_with(DialectProfile::postgres(), "select hll_union(views) from daily;"),
        "SELECT hll_union(views)\n  FROM daily;\n",
    );
}

#[test]
fn interval_literals() {
    assert_eq!(
        fmt_with(
            DialectProfile::postgres(),
            "select now() - interval '90' minute from t;"
        ),
        "SELECT NOW() - INTERVAL '90' MINUTE\n  FROM t;\n",
    );
}

#[test]
fn escape_strings_stay_verbatim() {
    assert_eq!(
        fmt_with(DialectProfile::postgres(), "select E'line\\n' as s;"),
        "SELECT E'line\\n' AS s;\n",
    );
}
