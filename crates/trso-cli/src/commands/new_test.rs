use super::*;
use chrono::TimeZone;
use tempfile::tempdir;

fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, second).unwrap()
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Add users"), "add_users");
    assert_eq!(slugify("  create -- orders table!  "), "create_orders_table");
    assert_eq!(slugify("v2.index"), "v2_index");
    assert_eq!(slugify("???"), "");
}

#[test]
fn test_create_migration_names_file_by_timestamp() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("db").join("migrations");

    let path = create_migration(&dir, "Add users", at(12, 0, 5)).unwrap();

    assert_eq!(path, dir.join("20240601120005_add_users.sql"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "-- Add users\n");
}

#[test]
fn test_created_files_sort_in_creation_order() {
    let temp = tempdir().unwrap();

    let first = create_migration(temp.path(), "zeta", at(9, 59, 59)).unwrap();
    let second = create_migration(temp.path(), "alpha", at(10, 0, 0)).unwrap();

    assert!(first.file_name() < second.file_name());
}

#[test]
fn test_create_migration_rejects_empty_slug() {
    let temp = tempdir().unwrap();

    let err = create_migration(temp.path(), "!!!", at(0, 0, 0)).unwrap_err();

    assert!(err.to_string().contains("Invalid migration name"));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_create_migration_refuses_to_overwrite() {
    let temp = tempdir().unwrap();
    create_migration(temp.path(), "init", at(1, 2, 3)).unwrap();

    let err = create_migration(temp.path(), "init", at(1, 2, 3)).unwrap_err();

    assert!(err.to_string().contains("already exists"));
}
