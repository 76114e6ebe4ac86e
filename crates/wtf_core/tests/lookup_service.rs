use wtf_core::{Database, DbError, LookupService};

fn seeded_database() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.with_connection(|conn| {
        conn.execute_batch(
            "INSERT INTO acronyms (id, acronym, translation) VALUES
                ('00000000-0000-4000-8000-000000000001', 'TLA', 'Three Letter Acronym'),
                ('00000000-0000-4000-8000-000000000002', 'IMHO', 'In My Humble Opinion'),
                ('00000000-0000-4000-8000-000000000003', 'TLA', 'Two Letter Abbreviation');",
        )
        .map_err(DbError::from)
    })
    .unwrap();
    db
}

#[test]
fn wtf_is_is_case_insensitive_and_keeps_storage_order() {
    let lookup = LookupService::new(seeded_database());

    let expected = vec!["Three Letter Acronym", "Two Letter Abbreviation"];
    assert_eq!(lookup.wtf_is("TLA"), expected);
    assert_eq!(lookup.wtf_is("tla"), expected);
    assert_eq!(lookup.wtf_is("TlA"), expected);
    assert_eq!(lookup.wtf_is(" tla\t"), expected);
}

#[test]
fn unknown_acronym_returns_empty_list() {
    let lookup = LookupService::new(seeded_database());
    assert!(lookup.wtf_is("NOPE").is_empty());
    assert!(lookup.wtf_is("").is_empty());
}

#[test]
fn list_returns_distinct_sorted_acronyms() {
    let lookup = LookupService::new(seeded_database());
    assert_eq!(lookup.list(), vec!["IMHO", "TLA"]);
}

#[test]
fn entries_return_full_records_sorted_by_acronym() {
    let lookup = LookupService::new(seeded_database());

    let acronyms = lookup
        .entries()
        .into_iter()
        .map(|record| record.acronym)
        .collect::<Vec<_>>();
    assert_eq!(acronyms, vec!["IMHO", "TLA", "TLA"]);
}

#[test]
fn unreachable_store_degrades_to_empty_results() {
    let db = seeded_database();
    db.with_connection(|conn| conn.execute_batch("DROP TABLE acronyms;").map_err(DbError::from))
        .unwrap();
    let lookup = LookupService::new(db);

    assert!(lookup.wtf_is("ANY").is_empty());
    assert!(lookup.list().is_empty());
    assert!(lookup.entries().is_empty());
}

#[test]
fn corrupted_rows_degrade_to_empty_results() {
    let db = seeded_database();
    db.with_connection(|conn| {
        conn.execute_batch("UPDATE acronyms SET id = 'bad-' || rowid WHERE acronym = 'TLA';")
            .map_err(DbError::from)
    })
    .unwrap();
    let lookup = LookupService::new(db);

    assert!(lookup.wtf_is("TLA").is_empty());
    assert_eq!(lookup.wtf_is("IMHO"), vec!["In My Humble Opinion"]);
}
