use std::io::{Cursor, Write};
use std::path::Path;

use rusqlite::Connection;
use wtf_core::db::open_db_in_memory;
use wtf_core::loader::populate;
use wtf_core::{Database, LoadError, LoadReport, Loader, LookupService, RepoError};

fn write_source(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("acronyms.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

fn count_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM acronyms;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn populate_parses_grammar_and_skips_noise() {
    let mut conn = open_db_in_memory().unwrap();
    let source = "LOL  laughing out loud\n\
                  \n\
                  NOSEPARATOR\n\
                  \tindented line\n\
                  brb\tbe right back\n";

    let report = populate(&mut conn, Cursor::new(source)).unwrap();

    assert_eq!(
        report,
        LoadReport {
            lines: 5,
            parsed: 2,
            inserted: 2,
            duplicates: 0,
            skipped: 0,
        }
    );
    let (acronym, translation): (String, String) = conn
        .query_row(
            "SELECT acronym, translation FROM acronyms WHERE acronym = 'LOL';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(acronym, "LOL");
    assert_eq!(translation, "laughing out loud");
    assert_eq!(count_rows(&conn), 2);
}

#[test]
fn populate_counts_duplicates_within_and_across_runs() {
    let mut conn = open_db_in_memory().unwrap();
    let source = "FOO\tBar\nfoo\tBar\nFOO\tBaz\n";

    let first = populate(&mut conn, Cursor::new(source)).unwrap();
    assert_eq!((first.inserted, first.duplicates), (2, 1));

    let second = populate(&mut conn, Cursor::new(source)).unwrap();
    assert_eq!((second.inserted, second.duplicates), (0, 3));
    assert_eq!(count_rows(&conn), 2);
}

#[test]
fn populate_skips_oversized_translation_without_aborting() {
    let mut conn = open_db_in_memory().unwrap();
    let source = format!("BIG\t{}\nOK\tfine\n", "x".repeat(301));

    let report = populate(&mut conn, Cursor::new(source)).unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(count_rows(&conn), 1);
}

#[test]
fn storage_error_mid_file_rolls_back_every_line() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER fail_on_boom BEFORE INSERT ON acronyms
         WHEN NEW.acronym = 'BOOM'
         BEGIN
             SELECT RAISE(ABORT, 'injected storage failure');
         END;",
    )
    .unwrap();
    let source = (1..=10)
        .map(|n| {
            if n == 5 {
                "BOOM\tfails here\n".to_string()
            } else {
                format!("A{n}\tentry {n}\n")
            }
        })
        .collect::<String>();

    let err = populate(&mut conn, Cursor::new(source)).unwrap_err();

    match err {
        LoadError::Storage {
            line: 5,
            source: RepoError::Db(_),
        } => {}
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count_rows(&conn), 0);
}

#[test]
fn unreadable_line_rolls_back_earlier_inserts() {
    let mut conn = open_db_in_memory().unwrap();
    let mut source = b"OK\tfirst\n".to_vec();
    source.extend_from_slice(&[0xff, 0xfe, b'\n']);

    let err = populate(&mut conn, Cursor::new(source)).unwrap_err();

    assert!(matches!(err, LoadError::Io(_)));
    assert_eq!(count_rows(&conn), 0);
}

#[test]
fn loader_rejects_missing_file_before_touching_storage() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("wtf.db");
    let db = Database::open(&db_path).unwrap();
    let loader = Loader::new(db);

    let missing = dir.path().join("nope.txt");
    assert!(matches!(
        loader.populate_from_file(&missing),
        Err(LoadError::InvalidSource(path)) if path == missing
    ));
    assert!(matches!(
        loader.populate_from_file(dir.path()),
        Err(LoadError::InvalidSource(_))
    ));
}

#[test]
fn loaded_file_is_visible_through_lookup_service() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(
        dir.path(),
        "API\tApplication Programming Interface\nAPI\tA Problematic Idea\n",
    );
    let db = Database::open(dir.path().join("wtf.db")).unwrap();

    let report = Loader::new(db.clone()).populate_from_file(&source).unwrap();
    assert_eq!(report.inserted, 2);

    let lookup = LookupService::new(db);
    let mut translations = lookup.wtf_is("api");
    translations.sort();
    assert_eq!(
        translations,
        vec!["A Problematic Idea", "Application Programming Interface"]
    );
    assert_eq!(lookup.list(), vec!["API"]);
}

#[test]
fn hash_prefixed_acronym_loads_like_any_other() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "#1\tnumber one\n");
    let db = Database::open(dir.path().join("wtf.db")).unwrap();

    let report = Loader::new(db.clone()).populate_from_file(&source).unwrap();
    assert_eq!((report.lines, report.parsed, report.inserted), (1, 1, 1));

    let lookup = LookupService::new(db);
    assert_eq!(lookup.wtf_is("#1"), vec!["number one"]);
    assert_eq!(lookup.list(), vec!["#1"]);
}
