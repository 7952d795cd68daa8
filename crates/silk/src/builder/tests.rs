use super::*;
use crate::Db;
use crate::dialect::{MySql, Postgres};
use crate::executor::mock::MockExecutor;
use crate::h;

fn db(mock: MockExecutor) -> (Arc<MockExecutor>, Db<MockExecutor>) {
    let mock = Arc::new(mock);
    let db = Db::from_shared(mock.clone(), Arc::new(MySql::new().with_quoting(false)));
    (mock, db)
}

fn row(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn select_binds_in_declaration_order() {
    let (mock, db) = db(MockExecutor::default());
    db.table("users")
        .where_("age", ">", 18)
        .where_in("role", ["admin", "editor"])
        .take(10)
        .all()
        .await
        .unwrap();

    let (sql, args) = mock.last();
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE age > ? AND role in (?,?) LIMIT 10"
    );
    assert_eq!(args, vec![Value::Int(18), "admin".into(), "editor".into()]);
}

#[tokio::test]
async fn empty_in_lists_leave_the_model_untouched() {
    let (_, db) = db(MockExecutor::default());
    let builder = db.table("users").where_("a", "=", 1);
    let before = builder.model().clone();

    let builder = builder
        .where_in("role", Vec::<Value>::new())
        .where_not_in("id", Vec::<i64>::new());
    assert_eq!(builder.model(), &before);
    assert_eq!(
        builder.model().args(StatementKind::Select),
        before.args(StatementKind::Select)
    );
}

#[tokio::test]
async fn insert_then_update_bind_in_declaration_order() {
    let (mock, db) = db(MockExecutor::default().with_exec(1, 7).with_exec(1, 0));

    let id = db.table("users").insert(h! { "name" => "a" }).await.unwrap();
    assert_eq!(id, 7);
    let (sql, args) = mock.last();
    assert_eq!(sql, "INSERT INTO users (name) VALUES (?)");
    assert_eq!(args, vec![Value::from("a")]);

    db.table("users")
        .where_("id", "=", 1)
        .update(h! { "name" => "b" })
        .await
        .unwrap();
    let (sql, args) = mock.last();
    assert_eq!(sql, "UPDATE users SET name = ? WHERE id = ?");
    assert_eq!(args, vec![Value::from("b"), Value::Int(1)]);
}

#[tokio::test]
async fn exec_runs_raw_set_fragments() {
    let (mock, db) = db(MockExecutor::default().with_exec(2, 0));
    db.table("posts")
        .update_raw("hits = hits + ?", [Value::Int(1)])
        .update_raw("touched_at = now()", [])
        .where_("id", "=", 3)
        .exec()
        .await
        .unwrap();

    let (sql, args) = mock.last();
    assert_eq!(
        sql,
        "UPDATE posts SET hits = hits + ?, touched_at = now() WHERE id = ?"
    );
    assert_eq!(args, vec![Value::Int(1), Value::Int(3)]);
}

#[tokio::test]
async fn where_raw_last_call_wins() {
    let (mock, db) = db(MockExecutor::default());
    db.table("users")
        .where_raw("a = ?", [Value::Int(1)])
        .where_raw("b = ? or c = ?", [Value::Int(2), Value::Int(3)])
        .where_("d", "<", 4)
        .all()
        .await
        .unwrap();

    let (sql, args) = mock.last();
    assert_eq!(sql, "SELECT * FROM users WHERE (b = ? or c = ?) AND d < ?");
    assert_eq!(args, vec![Value::Int(2), Value::Int(3), Value::Int(4)]);
}

#[tokio::test]
async fn first_on_no_rows_is_empty_result() {
    let (_, db) = db(MockExecutor::default());
    let err = db.table("users").first().await.unwrap_err();
    assert!(err.is_empty_result());
}

#[tokio::test]
async fn find_filters_by_id() {
    let (mock, db) = db(MockExecutor::default().with_rows(vec![row(&[("id", Value::Int(5))])]));
    let record = db.table("users").find(5).await.unwrap();
    assert_eq!(record.get("id"), Some(&Value::Int(5)));
    assert_eq!(mock.last().0, "SELECT * FROM users WHERE id = ?");
}

#[tokio::test]
async fn count_reads_the_aggregate() {
    let (mock, db) = db(MockExecutor::default()
        .with_rows(vec![row(&[("count", Value::Int(3))])])
        .with_rows(vec![row(&[("count(*)", "12".into())])])
        .with_rows(vec![]));

    let n = db
        .table("users")
        .where_("age", ">", 18)
        .order_by("id", "desc")
        .skip(5)
        .take(1)
        .count()
        .await
        .unwrap();
    assert_eq!(n, 3);
    assert_eq!(mock.last().0, "SELECT count(*) FROM users WHERE age > ?");

    assert_eq!(db.table("users").count().await.unwrap(), 12);
    assert_eq!(db.table("users").count().await.unwrap(), 0);
}

#[tokio::test]
async fn writes_without_affected_rows_fail() {
    let (mock, db) = db(MockExecutor::default()
        .with_exec(0, 0)
        .with_exec(0, 0)
        .with_exec(0, 7)
        .with_exec(0, 0));
    let err = db
        .table("users")
        .insert(h! { "name" => "x" })
        .await
        .unwrap_err();
    assert!(err.is_no_affected_rows());

    let err = db
        .table("users")
        .update_raw("hits = hits + ?", [Value::Int(1)])
        .where_("id", "=", 1)
        .exec()
        .await
        .unwrap_err();
    assert!(err.is_no_affected_rows());
    assert_eq!(mock.last().0, "UPDATE users SET hits = hits + ? WHERE id = ?");

    let err = db
        .table("users")
        .where_("id", "=", 1)
        .update(h! { "name" => "x" })
        .await
        .unwrap_err();
    assert!(err.is_no_affected_rows());

    let err = db.table("users").where_("id", "=", 1).delete().await.unwrap_err();
    assert!(err.is_no_affected_rows());
}

#[tokio::test]
async fn delete_reports_rows() {
    let (mock, db) = db(MockExecutor::default().with_exec(4, 0));
    let n = db
        .table("sessions")
        .where_("expired", "=", true)
        .delete()
        .await
        .unwrap();
    assert_eq!(n, 4);
    assert_eq!(mock.last().0, "DELETE FROM sessions WHERE expired = ?");
}

#[tokio::test]
async fn introspection_bypasses_the_model() {
    let (mock, db) = db(MockExecutor::default());
    db.table("users")
        .where_("a", "=", 1)
        .show_columns()
        .await
        .unwrap();
    let (sql, args) = mock.last();
    assert_eq!(sql, "SHOW COLUMNS FROM users");
    assert!(args.is_empty());

    db.builder().show_tables().await.unwrap();
    assert_eq!(mock.last().0, "SHOW TABLES");
}

#[tokio::test]
async fn frame_returns_to_pool_on_every_path() {
    let (_, ok) = db(MockExecutor::default().with_rows(vec![row(&[("id", Value::Int(1))])]));
    ok.table("users").where_("id", "=", 1).first().await.unwrap();
    assert_eq!(ok.pool().idle(), 1);

    // Executor failure.
    let failing = Db::from_shared(
        Arc::new(MockExecutor::default().failing()),
        Arc::new(Postgres::new()),
    )
    .with_pool(ok.pool().clone());
    let err = failing.table("users").all().await.unwrap_err();
    assert!(matches!(err, SilkError::Connection(_)));
    assert_eq!(ok.pool().idle(), 1);

    // Compile failure.
    let err = ok.builder().where_("a", "=", 1).first().await.unwrap_err();
    assert!(err.is_invalid_statement());

    // Dropped without a terminal call.
    drop(ok.table("users").select(["id"]));

    assert_eq!(ok.pool().idle(), 1);
    assert_eq!(ok.pool().created(), 1);
    assert_eq!(ok.pool().reused(), 3);

    let fresh = ok.builder();
    assert!(fresh.model().is_empty());
    assert!(fresh.statement().is_empty());
}

#[tokio::test]
async fn to_statement_compiles_without_executing() {
    let (mock, db) = db(MockExecutor::default());
    let builder = db
        .table("users")
        .left_join("roles", "users.role_id", "=", "roles.id")
        .select(["users.id", "roles.name"]);
    let stmt = builder.to_statement(StatementKind::Select).unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT users.id, roles.name FROM users LEFT JOIN roles ON users.role_id = roles.id"
    );
    assert!(builder.statement().is_empty());
    assert!(mock.calls.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_builders_share_one_pool() {
    let (mock, db) = db(MockExecutor::default());
    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                let builder = db.table(format!("t{i}")).where_("n", "=", i);
                assert_eq!(builder.model().filters.len(), 1);
                builder.all().await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(mock.calls.lock().unwrap().len(), 32);
    assert_eq!(db.pool().created() + db.pool().reused(), 32);
    assert!(db.pool().idle() <= db.pool().created());
}
