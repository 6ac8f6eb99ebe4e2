use visitor_log_core::storage::models::*;
use visitor_log_core::storage::Database;
use visitor_log_core::{statistics, tasks, VisitorStore};

fn make_test_visitor(institution: &str, id_number: &str, date: &str, sha1: &str) -> VisitorRecord {
    VisitorRecord {
        institution: institution.to_string(),
        full_name: format!("Visitor {}", id_number),
        id_document: "dni".to_string(),
        id_number: id_number.to_string(),
        date: date.to_string(),
        time_start: "09:00".to_string(),
        time_end: "10:00".to_string(),
        entity: "ACME".to_string(),
        office: "Mesa de partes".to_string(),
        reason: "Reunión".to_string(),
        host_name: "Ana".to_string(),
        host_title: String::new(),
        sha1: sha1.to_string(),
    }
}

#[test]
fn test_insert_and_lookup_visitor() {
    let db = Database::open_in_memory().unwrap();
    let visitor = make_test_visitor("perucompras", "1", "2019-01-01", "aaa");

    assert!(!db.exists_by_hash("aaa").unwrap());
    assert_eq!(db.bulk_insert(&[visitor.clone()]).unwrap(), 1);
    assert!(db.exists_by_hash("aaa").unwrap());

    let stored = db.get_visitor_by_hash("aaa").unwrap().unwrap();
    assert_eq!(stored, visitor);
    assert!(db.get_visitor_by_hash("bbb").unwrap().is_none());
}

#[test]
fn test_bulk_insert_ignores_existing_hashes() {
    let db = Database::open_in_memory().unwrap();
    db.insert_visitors(&[make_test_visitor("perucompras", "1", "2019-01-01", "aaa")])
        .unwrap();

    let batch = vec![
        make_test_visitor("perucompras", "1", "2019-01-01", "aaa"),
        make_test_visitor("perucompras", "2", "2019-01-02", "bbb"),
        make_test_visitor("perucompras", "2", "2019-01-02", "bbb"),
    ];
    assert_eq!(db.insert_visitors(&batch).unwrap(), 1);
    assert_eq!(db.count_visitors().unwrap(), 2);
}

#[test]
fn test_count_by_institution() {
    let db = Database::open_in_memory().unwrap();
    db.insert_visitors(&[
        make_test_visitor("perucompras", "1", "2019-01-01", "a"),
        make_test_visitor("perucompras", "2", "2019-01-01", "b"),
        make_test_visitor("minedu", "3", "2019-01-01", "c"),
    ])
    .unwrap();

    let counts = db.count_visitors_by_institution().unwrap();
    assert_eq!(
        counts,
        vec![("minedu".to_string(), 1), ("perucompras".to_string(), 2)]
    );
}

#[test]
fn test_get_visitors_newest_first_with_paging() {
    let db = Database::open_in_memory().unwrap();
    db.insert_visitors(&[
        make_test_visitor("perucompras", "1", "2019-01-01", "a"),
        make_test_visitor("perucompras", "2", "2019-03-01", "b"),
        make_test_visitor("perucompras", "3", "2019-02-01", "c"),
    ])
    .unwrap();

    let page = db.get_visitors("perucompras", 0, 2).unwrap();
    let dates: Vec<&str> = page.iter().map(|v| v.date.as_str()).collect();
    assert_eq!(dates, vec!["2019-03-01", "2019-02-01"]);

    let rest = db.get_visitors("perucompras", 2, 2).unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].date, "2019-01-01");
}

#[test]
fn test_import_sessions_newest_first() {
    let db = Database::open_in_memory().unwrap();
    for (i, file) in ["a.csv", "b.csv"].iter().enumerate() {
        db.insert_import_session(&ImportSession {
            id: 0,
            file_path: file.to_string(),
            institution: "perucompras".to_string(),
            started_at: "2024-01-01T00:00:00+00:00".to_string(),
            completed_at: "2024-01-01T00:00:01+00:00".to_string(),
            rows_read: 10,
            inserted: i as i64,
            duplicates_in_file: 0,
            duplicates_in_store: 0,
            conflicts: 0,
            skipped_rows: 0,
        })
        .unwrap();
    }

    let sessions = db.list_import_sessions(0, 10).unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].file_path, "b.csv");
    assert!(sessions[0].id > sessions[1].id);
}

#[test]
fn test_recompute_statistics() {
    let db = Database::open_in_memory().unwrap();
    db.insert_visitors(&[
        make_test_visitor("perucompras", "1", "2019-01-05", "a"),
        make_test_visitor("perucompras", "1", "2019-02-01", "b"),
        make_test_visitor("perucompras", "2", "", "c"),
        make_test_visitor("minedu", "3", "2018-07-01", "d"),
    ])
    .unwrap();

    assert_eq!(statistics::recompute(&db).unwrap(), 2);

    let stats = db.get_institution_stats().unwrap();
    assert_eq!(stats.len(), 2);
    let peru = &stats[0];
    assert_eq!(peru.institution, "perucompras");
    assert_eq!(peru.visit_count, 3);
    assert_eq!(peru.distinct_visitors, 2);
    assert_eq!(peru.first_visit.as_deref(), Some("2019-01-05"));
    assert_eq!(peru.last_visit.as_deref(), Some("2019-02-01"));
}

#[test]
fn test_recompute_statistics_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    db.insert_visitors(&[make_test_visitor("perucompras", "1", "2019-01-05", "a")])
        .unwrap();

    statistics::recompute(&db).unwrap();
    let first: Vec<(String, i64)> = db
        .get_institution_stats()
        .unwrap()
        .into_iter()
        .map(|s| (s.institution, s.visit_count))
        .collect();
    statistics::recompute(&db).unwrap();
    let second: Vec<(String, i64)> = db
        .get_institution_stats()
        .unwrap()
        .into_iter()
        .map(|s| (s.institution, s.visit_count))
        .collect();

    assert_eq!(first, second);
    assert_eq!(first, vec![("perucompras".to_string(), 1)]);
}

#[test]
fn test_run_stats_task_swallows_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let unreachable = tmp.path().join("missing_dir").join("visitors.db");
    assert!(!tasks::run_stats(&unreachable));

    let db_path = tmp.path().join("visitors.db");
    {
        let db = Database::open(&db_path).unwrap();
        db.insert_visitors(&[make_test_visitor("perucompras", "1", "2019-01-05", "a")])
            .unwrap();
    }
    assert!(tasks::run_stats(&db_path));
    let db = Database::open(&db_path).unwrap();
    assert_eq!(db.get_institution_stats().unwrap().len(), 1);
}

#[test]
fn test_reopen_keeps_visitors() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("visitors.db");
    {
        let db = Database::open(&db_path).unwrap();
        db.insert_visitors(&[make_test_visitor("perucompras", "1", "2019-01-05", "a")])
            .unwrap();
    }
    let db = Database::open(&db_path).unwrap();
    assert_eq!(db.count_visitors().unwrap(), 1);
}
