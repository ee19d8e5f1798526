use std::collections::BTreeMap;

use sql_dbi::prelude::*;

fn setup() -> Result<Connection, SqlDbiError> {
    let db = SqliteOptionsBuilder::memory().open()?;
    db.exec(
        "CREATE TABLE test (foo TEXT, bar INTEGER, whizz DECIMAL(6,3));
         INSERT INTO test VALUES ('hello', 42, 3.141), ('world', -7, 2.718), ('quickjs', 1337, 1.618);",
    )?;
    Ok(db)
}

fn bind_kind<T: std::fmt::Debug>(res: Result<T, SqlDbiError>) -> ErrorKind {
    res.unwrap_err().kind()
}

#[test]
fn positional_list_against_named_markers() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup()?;
    let res = db.query("SELECT * FROM test WHERE whizz >= :whizz", BindParams::positional([2.0]));
    assert_eq!(bind_kind(res), ErrorKind::Bind);
    Ok(())
}

#[test]
fn named_mapping_against_positional_markers() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup()?;
    let res = db.query("SELECT * FROM test WHERE bar > ?", BindParams::named([("bar", 5)]));
    assert_eq!(bind_kind(res), ErrorKind::Bind);
    Ok(())
}

#[test]
fn arity_mismatches() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup()?;
    let sql = "SELECT * FROM test WHERE bar > ? AND whizz < ?";

    assert_eq!(bind_kind(db.query(sql, BindParams::positional([5]))), ErrorKind::Bind);
    assert_eq!(bind_kind(db.query(sql, BindParams::positional([5, 6, 7]))), ErrorKind::Bind);
    assert_eq!(bind_kind(db.query(sql, ())), ErrorKind::Bind);

    let ok = db.query(sql, vec![RowValues::Int(5), RowValues::Float(2.0)])?;
    assert_eq!(ok.num_rows()?, 1);
    Ok(())
}

#[test]
fn named_keys_must_match_placeholders() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup()?;
    let sql = "SELECT foo FROM test WHERE bar > :lo AND bar < :hi";

    let missing = db.query(sql, BindParams::named([("lo", 0)]));
    assert_eq!(bind_kind(missing), ErrorKind::Bind);

    let extra = db.query(sql, BindParams::named([("lo", 0), ("hi", 100), ("unused", 1)]));
    assert_eq!(bind_kind(extra), ErrorKind::Bind);

    let none = db.query("SELECT foo FROM test", BindParams::named([("lo", 0)]));
    assert_eq!(bind_kind(none), ErrorKind::Bind);

    let mut map = BTreeMap::new();
    map.insert(":lo".to_string(), RowValues::Int(0));
    map.insert("hi".to_string(), RowValues::Int(100));
    let rows = db.query(sql, map)?.to_arrays()?;
    assert_eq!(rows, vec![vec![RowValues::Text("hello".into())]]);
    Ok(())
}

#[test]
fn other_named_sigils_and_numbered_markers() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup()?;

    let rows = db
        .query(
            "SELECT foo FROM test WHERE bar = @bar OR foo = $foo",
            BindParams::named([("bar", RowValues::Int(-7)), ("foo", RowValues::Text("quickjs".into()))]),
        )?
        .to_arrays()?;
    assert_eq!(rows.len(), 2);

    // ?1 used twice is a single parameter
    let rows = db
        .query("SELECT foo FROM test WHERE bar > ?1 AND whizz > ?1 - 39", BindParams::positional([41]))?
        .to_arrays()?;
    assert_eq!(rows, vec![vec![RowValues::Text("hello".into())]]);
    Ok(())
}

#[test]
fn placeholders_inside_literals_are_not_parameters() -> Result<(), Box<dyn std::error::Error>> {
    let db = setup()?;
    let mut res = db.query("SELECT '?' AS q, ':name' AS n FROM test WHERE bar = ?", BindParams::positional([42]))?;
    assert!(res.next()?);
    assert_eq!(res.get_by_name("q")?, &RowValues::Text("?".into()));
    assert_eq!(res.get_by_name("n")?, &RowValues::Text(":name".into()));
    Ok(())
}

#[test]
fn exec_with_binds_every_value_kind() -> Result<(), Box<dyn std::error::Error>> {
    let db = SqliteOptionsBuilder::memory().open()?;
    db.exec("CREATE TABLE kinds (i INTEGER, f REAL, t TEXT, b BOOLEAN, ts TIMESTAMP, n TEXT, j TEXT, bl BLOB)")?;

    let ts = chrono::NaiveDate::from_ymd_opt(2024, 4, 12)
        .and_then(|d| d.and_hms_milli_opt(12, 30, 45, 789))
        .ok_or("bad date")?;
    let changed = db.exec_with(
        "INSERT INTO kinds VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        BindParams::positional([
            RowValues::Int(7),
            RowValues::Float(1.5),
            RowValues::Text("x".into()),
            RowValues::Bool(true),
            RowValues::Timestamp(ts),
            RowValues::Null,
            RowValues::JSON(serde_json::json!({"k": [1, 2]})),
            RowValues::Blob(vec![0xde, 0xad]),
        ]),
    )?;
    assert_eq!(changed, 1);

    let rows = db.query("SELECT * FROM kinds", ())?.to_arrays()?;
    assert_eq!(
        rows[0],
        vec![
            RowValues::Int(7),
            RowValues::Float(1.5),
            RowValues::Text("x".into()),
            RowValues::Bool(true),
            RowValues::Timestamp(ts),
            RowValues::Null,
            RowValues::Text(r#"{"k":[1,2]}"#.into()),
            RowValues::Blob(vec![0xde, 0xad]),
        ]
    );
    assert_eq!(rows[0][7].as_blob(), Some(&[0xde, 0xad][..]));
    assert_eq!(rows[0][2].as_blob(), None);
    Ok(())
}
