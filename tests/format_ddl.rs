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
//! DDL layout: CREATE TABLE alignment, constraints, ALTER, DROP, indexes,
//! views, policies, GRANT/REVOKE, TRUNCATE.

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
fn create_table_aligns_names_and_types() {
    let sql = "create table films (film_id integer not null, title varchar(255) not null, \
               kind varchar(10), release_date date default now(), primary key (film_id));";
    assert_eq!(
        fmt_pg(sql),
        "CREATE TABLE films (\n\
         \x20   film_id      INTEGER      NOT NULL,\n\
         \x20   title        VARCHAR(255) NOT NULL,\n\
         \x20   kind         VARCHAR(10),\n\
         \x20   release_date DATE         DEFAULT NOW(),\n\
         \x20   PRIMARY KEY (film_id)\n\
         );\n",
    );
}

#[test]
fn foreign_key_constraint_splits_lines() {
    let sql = "create table orders (order_id int primary key, customer_id int not null, \
               constraint orders_customer_fk foreign key (customer_id) references \
               customers (customer_id) on delete restrict on update cascade);";
    assert_eq!(
        fmt(sql),
        "CREATE TABLE orders (\n\
         \x20   order_id    INT PRIMARY KEY,\n\
         \x20   customer_id INT NOT NULL,\n\
         \x20   CONSTRAINT orders_customer_fk FOREIGN KEY (customer_id)\n\
         \x20       REFERENCES customers (customer_id)\n\
         \x20       ON DELETE RESTRICT\n\
         \x20       ON UPDATE CASCADE\n\
         );\n",
    );
}

#[test]
fn generated_identity_column() {
    let sql = "create table events (id bigint generated always as identity, body text);";
    assert_eq!(
        fmt_pg(sql),
        "CREATE TABLE events (\n\
         \x20   id   BIGINT GENERATED ALWAYS AS IDENTITY,\n\
         \x20   body TEXT\n\
         );\n",
    );
}

#[test]
fn alter_table_actions_one_per_line() {
    let sql = "alter table users add column email text not null, drop column legacy_flag;";
    assert_eq!(
        fmt_pg(sql),
        "ALTER TABLE users\n\
         \x20   ADD COLUMN email TEXT NOT NULL,\n\
         \x20   DROP COLUMN legacy_flag;\n",
    );
}

#[test]
fn alter_table_single_action_stays_inline() {
    assert_eq!(
        fmt("alter table users owner to admin;"),
        "ALTER TABLE users OWNER TO admin;\n",
    );
}

#[test]
fn drop_objects_single_line() {
    assert_eq!(
        fmt("drop table if exists temp_import, temp_backup cascade;"),
        "DROP TABLE IF EXISTS temp_import, temp_backup CASCADE;\n",
    );
    assert_eq!(
        fmt_pg("drop policy user_isolation on documents;"),
        "DROP POLICY user_isolation ON documents;\n",
    );
}

#[test]
fn create_index_splits_when_long() {
    let sql = "create unique index concurrently idx_users_email on users using btree \
               (lower(email)) where deleted_at is null;";
    assert_eq!(
        fmt_pg(sql),
        "CREATE UNIQUE INDEX CONCURRENTLY idx_users_email\n\
         \x20   ON users USING btree (LOWER(email))\n\
         \x20   WHERE deleted_at IS NULL;\n",
    );
}

#[test]
fn create_index_inline_when_short() {
    assert_eq!(
        fmt("create index idx_a on t (a);"),
        "CREATE INDEX idx_a ON t (a);\n",
    );
}

#[test]
fn create_view_places_query_below() {
    let sql = "create or replace view active_users as select id, name from users \
               where active = true;";
    assert_eq!(
        fmt(sql),
        "CREATE OR REPLACE VIEW active_users AS\n\
         SELECT id, name\n\
         \x20 FROM users\n\
         \x20WHERE active = TRUE;\n",
    );
}

#[test]
fn create_policy_clauses_indent() {
    let sql = "create policy user_isolation on documents as permissive for select \
               to public using (owner_id = current_user);";
    assert_eq!(
        fmt_pg(sql),
        "CREATE POLICY user_isolation ON documents\n\
         \x20   AS PERMISSIVE\n\
         \x20   FOR SELECT\n\
         \x20   TO public\n\
         \x20   USING (owner_id = CURRENT_USER);\n",
    );
}

#[test]
fn grant_inline_when_short() {
    assert_eq!(
        fmt("grant select, update (name) on table films to editors with grant option;"),
        "GRANT SELECT, UPDATE (name) ON films TO editors WITH GRANT OPTION;\n",
    );
}

#[test]
fn revoke_all_with_behavior() {
    assert_eq!(
        fmt("revoke all privileges on schema analytics from interns cascade;"),
        "REVOKE ALL ON SCHEMA analytics FROM interns CASCADE;\n",
    );
}

#[test]
fn truncate_with_identity_and_behavior() {
    assert_eq!(
        fmt("truncate table events restart identity cascade;"),
        "TRUNCATE TABLE events RESTART IDENTITY CASCADE;\n",
    );
}

#[test]
fn create_table_as_query() {
    assert_eq!(
        fmt("create table recent as select id from events where fresh;"),
        "CREATE TABLE recent AS\n\
         SELECT id\n\
         \x20 FROM events\n\
         \x20WHERE fresh;\n",
    );
}
