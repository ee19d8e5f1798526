use sql_dbi::prelude::*;

use crate::args::DemoConfig;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS test(
        foo TEXT,
        bar INTEGER,
        whizz DECIMAL(6,3),
        bang BOOLEAN,
        woop DATETIME
    );
";

const SEED_ROWS: &str = "
    INSERT INTO test (foo, bar, whizz, bang, woop) VALUES
        ('hello', 42, 3.141, 1, datetime('now','-1 day','localtime')),
        ('world', -7, 2.718, 0, datetime('2024-04-12 12:30:45.789')),
        ('quickjs', 1337, 1.618, 1, datetime('now'));
";

pub(crate) fn run(config: &DemoConfig) -> Result<(), SqlDbiError> {
    let mut db = Connection::open(config.driver_type, config.connect_options())?;

    db.exec(CREATE_TABLE)?;
    seed_if_empty(&db)?;

    println!("=== manual output, array bind ===");
    manual_cursor(&db, config.pretty)?;

    println!("=== array output, dict bind ===");
    let rows = db
        .query(
            "SELECT foo, bar, whizz, bang, woop FROM test WHERE whizz >= :whizz",
            BindParams::named([("whizz", 2.0)]),
        )?
        .to_array(RowShape::Arrays)?;
    print_lines(&rows)?;

    println!("=== dict output, naked bind ===");
    let rows = db.query("SELECT * FROM test", ())?.to_array(RowShape::Objects)?;
    print_lines(&rows)?;

    db.close()
}

fn seed_if_empty(db: &Connection) -> Result<(), SqlDbiError> {
    let counted = db.query("SELECT COUNT(*) AS n FROM test", ())?.to_objects()?;
    let existing = counted
        .first()
        .and_then(|row| row.get("n"))
        .and_then(RowValues::as_int)
        .copied()
        .unwrap_or(0);
    if existing == 0 {
        db.exec(SEED_ROWS)?;
        tracing::info!("seeded sample rows");
    } else {
        tracing::info!(rows = existing, "table already populated");
    }
    Ok(())
}

fn manual_cursor(db: &Connection, pretty: bool) -> Result<(), SqlDbiError> {
    let mut res = db.query("SELECT * FROM test WHERE bar > ?", BindParams::positional([5]))?;
    let num_rows = res.num_rows()?;
    let num_fields = res.num_fields()?;
    println!("Got {num_rows} rows, and {num_fields} fields.");

    while res.next()? {
        let mut row = Vec::with_capacity(num_fields);
        for idx in 0..num_fields {
            row.push(res.get(idx)?.clone());
        }
        let rendered = if pretty {
            serde_json::to_string_pretty(&row)?
        } else {
            serde_json::to_string(&row)?
        };
        println!("{rendered}");
    }
    Ok(())
}

fn print_lines(rows: &MaterializedRows) -> Result<(), SqlDbiError> {
    for line in rows.to_json_lines()? {
        println!("{line}");
    }
    Ok(())
}
