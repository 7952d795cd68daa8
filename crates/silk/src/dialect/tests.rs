use super::*;
use crate::clause::{Filter, Join, Order, Placeholder, RawFragment};
use crate::value::Value;

fn users() -> ClauseModel {
    ClauseModel {
        table: "users".to_string(),
        ..ClauseModel::default()
    }
}

fn filter(field: &str, op: &str, args: Vec<Value>, placeholder: Placeholder) -> Filter {
    Filter {
        field: field.to_string(),
        operation: op.to_string(),
        placeholder,
        args,
    }
}

fn marker_count(sql: &str, dialect: &dyn Dialect) -> usize {
    match dialect.name() {
        "postgres" => sql.matches('$').count(),
        _ => sql.matches('?').count(),
    }
}

#[test]
fn select_with_filters_in_and_limit() {
    let mut model = users();
    model
        .filters
        .push(filter("age", ">", vec![Value::Int(18)], Placeholder::Single));
    model.filters.push(filter(
        "role",
        "in",
        vec!["admin".into(), "editor".into()],
        Placeholder::List(2),
    ));
    model.limit = Some(10);

    let unquoted = MySql::new().with_quoting(false);
    let stmt = unquoted.statement(StatementKind::Select, &model).unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM users WHERE age > ? AND role in (?,?) LIMIT 10"
    );
    assert_eq!(
        stmt.args,
        vec![Value::Int(18), "admin".into(), "editor".into()]
    );

    assert_eq!(
        MySql::new().compile(StatementKind::Select, &model).unwrap(),
        "SELECT * FROM `users` WHERE `age` > ? AND `role` in (?,?) LIMIT 10"
    );
    assert_eq!(
        Postgres::new().compile(StatementKind::Select, &model).unwrap(),
        r#"SELECT * FROM "users" WHERE "age" > $1 AND "role" in ($2,$3) LIMIT 10"#
    );
}

#[test]
fn select_fields_joins_order_offset() {
    let mut model = users();
    model.fields = vec!["users.id".into(), "roles.name".into(), "count(*)".into()];
    model.joins.push(Join {
        table: "roles".into(),
        operation: "=".into(),
        left_field: "users.role_id".into(),
        right_field: "roles.id".into(),
    });
    model.order = Some(Order {
        field: "users.id".into(),
        direction: "desc".into(),
    });
    model.offset = Some(20);

    assert_eq!(
        Postgres::new().compile(StatementKind::Select, &model).unwrap(),
        r#"SELECT "users"."id", "roles"."name", count(*) FROM "users" LEFT JOIN "roles" ON "users"."role_id" = "roles"."id" ORDER BY "users"."id" desc OFFSET 20"#
    );
    assert!(
        MySql::new()
            .compile(StatementKind::Select, &model)
            .unwrap()
            .ends_with("LIMIT 18446744073709551615 OFFSET 20")
    );
    assert!(
        Sqlite::new()
            .compile(StatementKind::Select, &model)
            .unwrap()
            .ends_with("LIMIT -1 OFFSET 20")
    );
}

#[test]
fn raw_filter_comes_first_and_is_parenthesized() {
    let mut model = users();
    model
        .filters
        .push(filter("id", "=", vec![Value::Int(1)], Placeholder::Single));
    model.raw_filter = Some(RawFragment {
        expression: "status = ? or name = 'who?'".into(),
        args: vec!["active".into()],
    });

    let stmt = Postgres::new()
        .statement(StatementKind::Delete, &model)
        .unwrap();
    assert_eq!(
        stmt.sql,
        r#"DELETE FROM "users" WHERE (status = $1 or name = 'who?') AND "id" = $2"#
    );
    assert_eq!(stmt.args, vec![Value::from("active"), Value::Int(1)]);
}

#[test]
fn raw_filter_alone_is_not_wrapped() {
    let mut model = users();
    model.raw_filter = Some(RawFragment {
        expression: "deleted_at IS NULL".into(),
        args: vec![],
    });
    assert_eq!(
        Sqlite::new().compile(StatementKind::Select, &model).unwrap(),
        r#"SELECT * FROM "users" WHERE deleted_at IS NULL"#
    );
}

#[test]
fn insert_columns_and_markers_share_one_order() {
    let mut model = users();
    model.values.insert("name".into(), "a".into());
    model.values.insert("age".into(), Value::Int(3));
    model.values.insert("email".into(), "a@x".into());

    let stmt = Postgres::new()
        .statement(StatementKind::Insert, &model)
        .unwrap();
    assert_eq!(
        stmt.sql,
        r#"INSERT INTO "users" ("age", "email", "name") VALUES ($1, $2, $3)"#
    );
    assert_eq!(stmt.args, vec![Value::Int(3), "a@x".into(), "a".into()]);
}

#[test]
fn update_renders_raw_fragments_before_values() {
    let mut model = users();
    model.raw_updates.push(RawFragment {
        expression: "hits = hits + ?".into(),
        args: vec![Value::Int(1)],
    });
    model.raw_updates.push(RawFragment {
        expression: "updated_at = now()".into(),
        args: vec![],
    });
    model.values.insert("name".into(), "b".into());
    model
        .filters
        .push(filter("id", "=", vec![Value::Int(9)], Placeholder::Single));

    let stmt = Postgres::new()
        .statement(StatementKind::Update, &model)
        .unwrap();
    assert_eq!(
        stmt.sql,
        r#"UPDATE "users" SET hits = hits + $1, updated_at = now(), "name" = $2 WHERE "id" = $3"#
    );
    assert_eq!(stmt.args, vec![Value::Int(1), "b".into(), Value::Int(9)]);
}

#[test]
fn update_and_delete_ignore_select_modifiers() {
    let mut model = users();
    model.values.insert("name".into(), "b".into());
    model.order = Some(Order {
        field: "id".into(),
        direction: "asc".into(),
    });
    model.limit = Some(1);

    let sql = MySql::new().compile(StatementKind::Update, &model).unwrap();
    assert_eq!(sql, "UPDATE `users` SET `name` = ?");
    let sql = MySql::new().compile(StatementKind::Delete, &model).unwrap();
    assert_eq!(sql, "DELETE FROM `users`");
}

#[test]
fn raw_marker_mismatch_is_invalid() {
    let mut model = users();
    model.raw_filter = Some(RawFragment {
        expression: "a = ? and b = ?".into(),
        args: vec![Value::Int(1)],
    });
    let err = Sqlite::new()
        .compile(StatementKind::Select, &model)
        .unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn doubled_question_mark_is_a_literal() {
    let mut model = users();
    model.raw_filter = Some(RawFragment {
        expression: "data ?? 'admin' and tags ??| array['a'] and n = ?".into(),
        args: vec![Value::Int(1)],
    });
    let stmt = Postgres::new()
        .statement(StatementKind::Select, &model)
        .unwrap();
    assert_eq!(
        stmt.sql,
        r#"SELECT * FROM "users" WHERE data ? 'admin' and tags ?| array['a'] and n = $1"#
    );
    assert_eq!(stmt.args, vec![Value::Int(1)]);

    model.raw_filter = Some(RawFragment {
        expression: "data ?? 'admin'".into(),
        args: vec![Value::Int(1)],
    });
    let err = MySql::new()
        .compile(StatementKind::Select, &model)
        .unwrap_err();
    assert!(err.is_invalid_statement());
}

#[test]
fn empty_table_is_invalid_for_every_kind() {
    let model = ClauseModel::default();
    for kind in [
        StatementKind::Select,
        StatementKind::Insert,
        StatementKind::Update,
        StatementKind::Delete,
    ] {
        assert!(
            Postgres::new()
                .compile(kind, &model)
                .unwrap_err()
                .is_invalid_statement()
        );
    }
}

#[test]
fn marker_count_matches_args_for_every_dialect() {
    let mut model = users();
    model.raw_filter = Some(RawFragment {
        expression: "tenant = ?".into(),
        args: vec![Value::Int(4)],
    });
    model.raw_updates.push(RawFragment {
        expression: "n = n + ?".into(),
        args: vec![Value::Int(1)],
    });
    model
        .filters
        .push(filter("a", "=", vec![Value::Int(1)], Placeholder::Single));
    model.filters.push(filter(
        "b",
        "not in",
        vec![Value::Int(2), Value::Int(3), Value::Int(4)],
        Placeholder::List(3),
    ));
    model.values.insert("c".into(), Value::Null);

    let dialects: [&dyn Dialect; 3] = [&MySql::new(), &Postgres::new(), &Sqlite::new()];
    for dialect in dialects {
        for kind in [
            StatementKind::Select,
            StatementKind::Insert,
            StatementKind::Update,
            StatementKind::Delete,
        ] {
            let stmt = dialect.statement(kind, &model).unwrap();
            assert_eq!(
                marker_count(&stmt.sql, dialect),
                stmt.args.len(),
                "{} {:?}: {}",
                dialect.name(),
                kind,
                stmt.sql
            );
            assert_eq!(stmt.args.len(), model.placeholder_count(kind));
        }
    }
}

#[test]
fn postgres_markers_beyond_lookup_table() {
    let pg = Postgres::new();
    assert_eq!(pg.placeholder(1), "$1");
    assert_eq!(pg.placeholder(16), "$16");
    assert_eq!(pg.placeholder(17), "$17");
    assert_eq!(pg.placeholder(230), "$230");
}

#[test]
fn quoting_leaves_expressions_alone() {
    let pg = Postgres::new();
    assert_eq!(pg.quote_ident("users"), r#""users""#);
    assert_eq!(pg.quote_ident("public.users"), r#""public"."users""#);
    assert_eq!(pg.quote_ident("users.*"), r#""users".*"#);
    assert_eq!(pg.quote_ident("*"), "*");
    assert_eq!(pg.quote_ident("count(*)"), "count(*)");
    assert_eq!(pg.quote_ident("name AS n"), "name AS n");
    assert_eq!(MySql::new().quote_ident("order"), "`order`");
}

#[test]
fn introspection_statements() {
    assert_eq!(MySql::new().show_tables().sql, "SHOW TABLES");
    assert_eq!(
        MySql::new().show_columns("users").unwrap().sql,
        "SHOW COLUMNS FROM `users`"
    );
    assert_eq!(
        Sqlite::new().show_columns("users").unwrap().sql,
        r#"PRAGMA table_info("users")"#
    );

    let pg = Postgres::new().show_columns("users").unwrap();
    assert!(pg.sql.contains("table_name = $1"));
    assert_eq!(pg.args, vec![Value::from("users")]);
    assert!(Postgres::new().show_columns("").is_err());
}

#[test]
fn dialect_kind_from_config_names() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        dialect: DialectKind,
    }
    let w: Wrapper = toml::from_str(r#"dialect = "postgresql""#).unwrap();
    assert_eq!(w.dialect, DialectKind::Postgres);
    let w: Wrapper = toml::from_str(r#"dialect = "mysql""#).unwrap();
    assert_eq!(w.dialect.dialect().name(), "mysql");
}
