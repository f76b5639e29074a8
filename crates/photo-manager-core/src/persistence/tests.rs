#[allow(clippy::module_inception)]
#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::super::{
        is_shard_name, read_shard, shard_file_name, store::write_replace, PhotoRecord,
        RecordQuery, RecordStore, StoreError,
    };

    // 2025-08-15 12:00:00 UTC, mid-month so every timezone agrees on the shard
    const AUG_2025: i64 = 1_755_259_200;
    // 2025-09-15 12:00:00 UTC
    const SEP_2025: i64 = 1_757_937_600;

    fn record(hash: &str, created_at: i64) -> PhotoRecord {
        PhotoRecord {
            filename: format!("photo.{}.jpg", &hash[..8]),
            hash: hash.to_string(),
            created_at,
            tags: vec!["travel".into(), "sea".into()],
            desc: "Evening at the harbour".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_shard_file_name() {
        assert_eq!(shard_file_name(AUG_2025).unwrap(), "2025-08.json");
        assert_eq!(shard_file_name(SEP_2025).unwrap(), "2025-09.json");
        assert!(matches!(
            shard_file_name(i64::MAX),
            Err(StoreError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_shard_file_name_rejects_years_without_four_digits() {
        // 10000-01-16 and 0997-10-12 UTC
        for created_at in [253_403_596_800, -30_700_000_000] {
            assert!(matches!(
                shard_file_name(created_at),
                Err(StoreError::InvalidTimestamp(t)) if t == created_at
            ));
        }
        assert!(is_shard_name(&shard_file_name(0).unwrap()));
    }

    #[test]
    fn test_append_with_out_of_range_year_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());

        let result = store.append(&record("aaaaaaaa1111", 253_403_596_800));

        assert!(matches!(result, Err(StoreError::InvalidTimestamp(_))));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_is_shard_name() {
        assert!(is_shard_name("2025-08.json"));
        assert!(!is_shard_name("2025-8.json"));
        assert!(!is_shard_name("notes.json"));
        assert!(!is_shard_name("2025-08.json.tmp"));
        assert!(!is_shard_name("2025-08.txt"));
    }

    #[test]
    fn test_append_creates_directory_and_shard() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path().join("records"));

        let shard = store.append(&record("aaaaaaaa1111", AUG_2025)).unwrap();

        assert_eq!(shard, temp_dir.path().join("records").join("2025-08.json"));
        let records = read_shard(&shard).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hash, "aaaaaaaa1111");
    }

    #[test]
    fn test_append_preserves_order() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());

        let hashes = ["11111111aaaa", "22222222bbbb", "33333333cccc"];
        for hash in hashes {
            store.append(&record(hash, AUG_2025)).unwrap();
        }

        let shard = store.shard_path(AUG_2025).unwrap();
        let stored: Vec<String> = read_shard(&shard)
            .unwrap()
            .into_iter()
            .map(|r| r.hash)
            .collect();
        assert_eq!(stored, hashes);

        store.append(&record("44444444dddd", AUG_2025)).unwrap();
        let stored = read_shard(&shard).unwrap();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored.last().unwrap().hash, "44444444dddd");
    }

    #[test]
    fn test_append_writes_indented_json_without_temp_file() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());

        let shard = store.append(&record("aaaaaaaa1111", AUG_2025)).unwrap();

        let text = fs::read_to_string(&shard).unwrap();
        assert!(text.starts_with("[\n  {\n    \"filename\""));
        assert!(!shard.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_append_to_empty_shard() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        fs::write(temp_dir.path().join("2025-08.json"), "").unwrap();

        store.append(&record("aaaaaaaa1111", AUG_2025)).unwrap();

        let records = read_shard(&temp_dir.path().join("2025-08.json")).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_append_to_corrupt_target_shard_fails() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        let shard = temp_dir.path().join("2025-08.json");
        fs::write(&shard, "{ not json").unwrap();

        let result = store.append(&record("aaaaaaaa1111", AUG_2025));

        assert!(matches!(result, Err(StoreError::Parse { .. })));
        assert_eq!(fs::read_to_string(&shard).unwrap(), "{ not json");
    }

    #[test]
    fn test_append_fails_when_temp_file_cannot_be_created() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        store.append(&record("aaaaaaaa1111", AUG_2025)).unwrap();
        let shard = temp_dir.path().join("2025-08.json");
        let before = fs::read(&shard).unwrap();
        // A directory in the temp file's place blocks the write
        fs::create_dir(temp_dir.path().join("2025-08.json.tmp")).unwrap();

        let result = store.append(&record("bbbbbbbb2222", AUG_2025));

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(fs::read(&shard).unwrap(), before);
        assert!(store.exists_by_hash("bbbbbbbb2222").unwrap().is_none());
    }

    #[test]
    fn test_write_replace_failed_rename_removes_temp_file() {
        let temp_dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file
        let target = temp_dir.path().join("2025-08.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let result = write_replace(&target, b"[]");

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(target.join("keep").exists());
        assert!(!temp_dir.path().join("2025-08.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_append_to_read_only_directory_fails() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        store.append(&record("aaaaaaaa1111", AUG_2025)).unwrap();
        let shard = temp_dir.path().join("2025-08.json");
        let before = fs::read(&shard).unwrap();

        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
        // Permission bits do not bind a privileged user
        let enforced = fs::write(temp_dir.path().join("check"), "").is_err();
        let result = store.append(&record("bbbbbbbb2222", AUG_2025));
        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        if enforced {
            assert!(matches!(result, Err(StoreError::Io { .. })));
            assert_eq!(fs::read(&shard).unwrap(), before);
            assert!(!temp_dir.path().join("2025-08.json.tmp").exists());
        }
    }

    #[test]
    fn test_append_ignores_corrupt_unrelated_shard() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        fs::write(temp_dir.path().join("2024-01.json"), "garbage").unwrap();

        assert!(store.append(&record("aaaaaaaa1111", AUG_2025)).is_ok());
    }

    #[test]
    fn test_exists_by_hash_after_append() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());

        assert!(store.exists_by_hash("aaaaaaaa1111").unwrap().is_none());

        store.append(&record("aaaaaaaa1111", AUG_2025)).unwrap();
        store.append(&record("bbbbbbbb2222", SEP_2025)).unwrap();

        let found = store.exists_by_hash("bbbbbbbb2222").unwrap().unwrap();
        assert_eq!(found.created_at, SEP_2025);
        assert!(store.exists_by_hash("aaaaaaaa1111").unwrap().is_some());
        assert!(store.exists_by_hash("cccccccc3333").unwrap().is_none());
    }

    #[test]
    fn test_exists_by_hash_missing_directory() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path().join("never-created"));

        assert!(store.exists_by_hash("aaaaaaaa1111").unwrap().is_none());
    }

    #[test]
    fn test_exists_by_hash_skips_corrupt_shards() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());

        fs::write(temp_dir.path().join("2024-01.json"), "[{\"hash\": ").unwrap();
        fs::write(temp_dir.path().join("2024-02.json"), "{\"hash\": \"x\"}").unwrap();
        fs::write(temp_dir.path().join("2024-03.json"), "").unwrap();
        store.append(&record("aaaaaaaa1111", AUG_2025)).unwrap();

        let found = store.exists_by_hash("aaaaaaaa1111").unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_exists_by_hash_matches_partly_decodable_elements() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        fs::write(
            temp_dir.path().join("2025-08.json"),
            r#"[
                {"hash": "aaaaaaaa1111", "width": "wide"},
                42,
                {"hash": "bbbbbbbb2222", "filename": "ok.bbbbbbbb.png"}
            ]"#,
        )
        .unwrap();

        let found = store.exists_by_hash("bbbbbbbb2222").unwrap().unwrap();
        assert_eq!(found.filename, "ok.bbbbbbbb.png");

        let partial = store.exists_by_hash("aaaaaaaa1111").unwrap().unwrap();
        assert_eq!(partial.hash, "aaaaaaaa1111");
        assert!(store.exists_by_hash("cccccccc3333").unwrap().is_none());
    }

    #[test]
    fn test_exists_by_hash_reads_legacy_fractional_size() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        fs::write(
            temp_dir.path().join("2025-07.json"),
            r#"[{"hash": "aaaaaaaa1111", "filename": "pier.aaaaaaaa.png", "size_kb": 12.5}]"#,
        )
        .unwrap();

        let found = store.exists_by_hash("aaaaaaaa1111").unwrap().unwrap();
        assert_eq!(found.filename, "pier.aaaaaaaa.png");
        assert_eq!(found.size_kb, 12);
    }

    #[test]
    fn test_exists_by_hash_ignores_non_shard_files() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        fs::write(
            temp_dir.path().join("backup.json"),
            r#"[{"hash": "aaaaaaaa1111"}]"#,
        )
        .unwrap();

        assert!(store.exists_by_hash("aaaaaaaa1111").unwrap().is_none());
    }

    #[test]
    fn test_read_all_in_shard_order() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());

        store.append(&record("bbbbbbbb2222", SEP_2025)).unwrap();
        store.append(&record("aaaaaaaa1111", AUG_2025)).unwrap();
        store.append(&record("cccccccc3333", AUG_2025)).unwrap();
        fs::write(temp_dir.path().join("2025-10.json"), "  \n").unwrap();
        fs::write(temp_dir.path().join("README.txt"), "not a shard").unwrap();

        let hashes: Vec<String> = store
            .read_all()
            .unwrap()
            .into_iter()
            .map(|r| r.hash)
            .collect();
        assert_eq!(hashes, ["aaaaaaaa1111", "cccccccc3333", "bbbbbbbb2222"]);
    }

    #[test]
    fn test_read_all_propagates_parse_errors() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        fs::write(temp_dir.path().join("2025-08.json"), "{}").unwrap();

        assert!(matches!(store.read_all(), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_query_filters() {
        let temp_dir = tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());

        let mut beach = record("aaaaaaaa1111", AUG_2025);
        beach.filename = "Beach.aaaaaaaa.jpg".into();
        let mut city = record("bbbbbbbb2222", SEP_2025);
        city.filename = "city.bbbbbbbb.jpg".into();
        city.tags = vec!["Guangzhou Tower".into()];
        city.desc = "Skyline at night".into();
        store.append(&beach).unwrap();
        store.append(&city).unwrap();

        let by_name = RecordQuery {
            name: Some("beach".into()),
            ..Default::default()
        };
        assert_eq!(store.query(&by_name).unwrap(), vec![beach.clone()]);

        let by_tag = RecordQuery {
            tag: Some("tower".into()),
            ..Default::default()
        };
        assert_eq!(store.query(&by_tag).unwrap(), vec![city.clone()]);

        let by_desc_and_month = RecordQuery {
            desc: Some("night".into()),
            month: Some("2025-08".into()),
            ..Default::default()
        };
        assert!(store.query(&by_desc_and_month).unwrap().is_empty());

        let by_month = RecordQuery {
            month: Some("2025-09".into()),
            ..Default::default()
        };
        assert_eq!(store.query(&by_month).unwrap(), vec![city]);

        let bad_month = RecordQuery {
            month: Some("../secrets".into()),
            ..Default::default()
        };
        assert!(store.query(&bad_month).unwrap().is_empty());

        assert_eq!(store.query(&RecordQuery::default()).unwrap().len(), 2);
    }
}
