use std::io::Write;

use sql_dbi::prelude::*;

fn memory() -> Result<Connection, SqlDbiError> {
    sql_dbi::open("sqlite3", ConnectOptions::from([("dbname", ":memory:")]))
}

#[test]
fn every_operation_after_close_is_a_connection_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory()?;
    db.exec("CREATE TABLE t (n INTEGER); INSERT INTO t VALUES (1), (2), (3);")?;
    let mut outstanding = db.query("SELECT n FROM t", ())?;
    assert!(outstanding.next()?);

    db.close()?;

    assert_eq!(db.exec("SELECT 1").unwrap_err().kind(), ErrorKind::Connection);
    assert_eq!(db.query("SELECT 1", ()).unwrap_err().kind(), ErrorKind::Connection);
    assert_eq!(
        db.exec_with("INSERT INTO t VALUES (?)", BindParams::positional([4]))
            .unwrap_err()
            .kind(),
        ErrorKind::Connection
    );
    assert_eq!(db.close().unwrap_err().kind(), ErrorKind::Connection);

    // result sets die with their connection
    assert_eq!(outstanding.num_rows().unwrap_err().kind(), ErrorKind::Connection);
    assert_eq!(outstanding.next().unwrap_err().kind(), ErrorKind::Connection);
    assert_eq!(outstanding.get(0).unwrap_err().kind(), ErrorKind::Connection);
    assert_eq!(outstanding.to_array(false).unwrap_err().kind(), ErrorKind::Connection);
    Ok(())
}

#[test]
fn unknown_driver_is_rejected() {
    let err = sql_dbi::open("oracle", ConnectOptions::from([("dbname", ":memory:")])).unwrap_err();
    assert!(matches!(err, SqlDbiError::ConnectionError(_)));
}

#[test]
fn unreachable_database_fails_to_open() -> Result<(), Box<dyn std::error::Error>> {
    let missing_dir = sql_dbi::open(
        "sqlite3",
        ConnectOptions::from([("dbname", "/definitely/not/a/dir/test.sqlite3")]),
    );
    assert_eq!(missing_dir.unwrap_err().kind(), ErrorKind::Connection);

    let missing_name = sql_dbi::open("sqlite3", ConnectOptions::new());
    assert_eq!(missing_name.unwrap_err().kind(), ErrorKind::Connection);

    let mut garbage = tempfile::NamedTempFile::new()?;
    garbage.write_all(&b"not a sqlite database. ".repeat(200))?;
    garbage.flush()?;
    let not_a_db = sql_dbi::open(
        "sqlite3",
        ConnectOptions::new().with("dbname", garbage.path().display()),
    );
    assert_eq!(not_a_db.unwrap_err().kind(), ErrorKind::Connection);
    Ok(())
}

#[test]
fn data_persists_across_connections() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let opts = SqliteOptionsBuilder::new("persist.sqlite3")
        .dbdir(dir.path())
        .busy_timeout(std::time::Duration::from_millis(500))
        .finish();

    let mut first = Connection::open(DatabaseType::Sqlite, opts.clone())?;
    assert_eq!(first.options().get("sqlite3_timeout"), Some("500"));
    first.exec("CREATE TABLE IF NOT EXISTS test (foo TEXT)")?;
    let inserted = first.exec_with("INSERT INTO test (foo) VALUES (:foo)", BindParams::named([("foo", "kept")]))?;
    assert_eq!(inserted, 1);
    first.close()?;

    let mut second = Connection::open(DatabaseType::Sqlite, opts)?;
    assert_eq!(second.database_type(), DatabaseType::Sqlite);
    let rows = second.query("SELECT foo FROM test", ())?.to_objects()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("foo"), Some(&RowValues::Text("kept".into())));
    second.close()?;
    Ok(())
}

#[test]
fn failed_batch_leaves_no_partial_writes() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory()?;
    db.exec("CREATE TABLE t (n INTEGER); INSERT INTO t VALUES (1), (2), (3);")?;

    let err = db
        .exec("INSERT INTO t VALUES (10); INSERT INTO nosuch VALUES (1);")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Statement);

    let count = db.query("SELECT COUNT(*) FROM t", ())?.to_arrays()?;
    assert_eq!(count, vec![vec![RowValues::Int(3)]]);

    // the connection is back in autocommit and usable
    db.exec("INSERT INTO t VALUES (4)")?;
    let count = db.query("SELECT COUNT(*) FROM t", ())?.to_arrays()?;
    assert_eq!(count, vec![vec![RowValues::Int(4)]]);
    Ok(())
}

#[test]
fn caller_controlled_transactions() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory()?;
    db.exec("CREATE TABLE t (n INTEGER)")?;

    db.exec("BEGIN")?;
    db.exec("INSERT INTO t VALUES (1); INSERT INTO t VALUES (2);")?;
    db.exec_with("INSERT INTO t VALUES (?)", BindParams::positional([3]))?;
    db.exec("ROLLBACK")?;
    assert_eq!(db.query("SELECT n FROM t", ())?.num_rows()?, 0);

    db.exec("BEGIN")?;
    db.exec("INSERT INTO t VALUES (1); INSERT INTO t VALUES (2);")?;
    db.exec("COMMIT")?;
    assert_eq!(db.query("SELECT n FROM t", ())?.num_rows()?, 2);
    Ok(())
}

#[test]
fn statement_failures_are_statement_errors() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory()?;
    db.exec("CREATE TABLE u (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")?;

    assert_eq!(db.exec("CREATE TABLE").unwrap_err().kind(), ErrorKind::Statement);
    assert_eq!(db.query("SELEC 1", ()).unwrap_err().kind(), ErrorKind::Statement);
    assert_eq!(
        db.query("SELECT * FROM no_such_table", ()).unwrap_err().kind(),
        ErrorKind::Statement
    );

    db.exec_with("INSERT INTO u (id, name) VALUES (?, ?)", BindParams::positional([
        RowValues::Int(1),
        RowValues::Text("a".into()),
    ]))?;
    let dup = db.exec_with("INSERT INTO u (id, name) VALUES (?, ?)", BindParams::positional([
        RowValues::Int(1),
        RowValues::Text("b".into()),
    ]));
    assert_eq!(dup.unwrap_err().kind(), ErrorKind::Statement);

    let not_null = db.exec_with("INSERT INTO u (id, name) VALUES (?, ?)", BindParams::positional([
        RowValues::Int(2),
        RowValues::Null,
    ]));
    assert_eq!(not_null.unwrap_err().kind(), ErrorKind::Statement);

    let rows_from_exec = db.exec_with("SELECT * FROM u WHERE id = ?", BindParams::positional([1]));
    assert_eq!(rows_from_exec.unwrap_err().kind(), ErrorKind::Statement);

    // nothing partial was written
    let count = db.query("SELECT COUNT(*) FROM u", ())?.to_arrays()?;
    assert_eq!(count, vec![vec![RowValues::Int(1)]]);
    Ok(())
}
