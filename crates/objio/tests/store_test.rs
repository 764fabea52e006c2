use objio::{Close, Error, ObjectAttributes, Scheme, Store, StoreOption};
use objio_testing::helpers::init_tracing;
use objio_testing::{Call, MemoryRemote, TestDir};
use std::io::Read;
use std::sync::Arc;
use std::thread;

fn remote_store() -> (Store, MemoryRemote) {
    init_tracing();
    let remote = MemoryRemote::new();
    let store = Store::new([StoreOption::remote(remote.clone())]);
    (store, remote)
}

#[test]
fn test_remote_requires_client() {
    let store = Store::default();
    let result = store.new_object("gs://foo/bar");
    assert!(matches!(result, Err(Error::OptionRequired(_))));
}

#[test]
fn test_foreign_host_rejected_without_io() {
    let (store, remote) = remote_store();
    let err = store
        .new_object("file://fileserver/does/not/exist.csv")
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedHost(ref host) if host == "fileserver"));
    assert!(remote.calls().is_empty());
}

#[test]
fn test_network_path_host_rejected_without_io() {
    let (store, remote) = remote_store();
    let err = store.new_object("//fileserver/share/report.csv").unwrap_err();
    assert!(matches!(err, Error::UnsupportedHost(ref host) if host == "fileserver"));
    assert!(remote.calls().is_empty());
}

#[test]
fn test_bare_path_escapes_and_query() {
    let test_dir = TestDir::new().unwrap();
    test_dir.create_file("a b.csv", b"x,y\n").unwrap();
    let store = Store::default();

    let uri = format!("{}?x=1#top", test_dir.uri("a%20b.csv"));
    let object = store.new_object(&uri).unwrap();
    assert_eq!(object.local_path(), Some(test_dir.path().join("a b.csv").as_path()));
    assert_eq!(object.content_type(), "text/csv");

    let mut contents = Vec::new();
    let mut reader = object.new_reader().unwrap();
    reader.read_to_end(&mut contents).unwrap();
    reader.close().unwrap();
    assert_eq!(contents, b"x,y\n");
}

#[test]
fn test_missing_remote_object_keeps_inferred_metadata() {
    let (store, remote) = remote_store();
    let object = store.new_object("gs://bucket/exports/day.ndjson.gz").unwrap();

    assert_eq!(object.scheme(), Scheme::Gs);
    assert_eq!(object.content_type(), "application/x-ndjson");
    assert_eq!(object.content_encoding(), "gzip");
    assert!(object.metadata().stored().is_none());
    assert_eq!(
        remote.calls(),
        vec![Call::Attributes {
            bucket: "bucket".to_string(),
            key: "exports/day.ndjson.gz".to_string(),
        }]
    );
}

#[test]
fn test_stored_attributes_override_inference() {
    let (store, remote) = remote_store();
    remote.insert(
        "bucket",
        "report.csv.gz",
        b"a,b\n",
        ObjectAttributes {
            content_type: "text/plain".to_string(),
            content_encoding: String::new(),
            cache_control: String::new(),
        },
    );

    let mut object = store.new_object("gs://bucket/report.csv.gz").unwrap();
    assert_eq!(object.content_type(), "text/plain");
    assert_eq!(object.content_encoding(), "");
    assert_eq!(object.metadata().inferred().content_type, "text/csv");

    object.set_content_type("text/csv");
    assert_eq!(object.content_type(), "text/csv");
}

#[test]
fn test_attribute_failure_propagates() {
    let (store, remote) = remote_store();
    remote.fail_attributes("permission denied");

    let err = store.new_object("gs://bucket/key").unwrap_err();
    assert!(matches!(err, Error::Remote(_)));
    assert!(err.to_string().contains("permission denied"));
}

#[test]
fn test_url_is_a_copy() {
    let (store, _remote) = remote_store();
    let object = store.new_object("gs://bucket/dir/key.json").unwrap();

    let url = object.url();
    assert_eq!(url.scheme(), "gs");
    assert_eq!(url.host(), Some("bucket"));
    assert_eq!(url.path(), "/dir/key.json");
    drop(url);
    assert_eq!(object.url().as_str(), "gs://bucket/dir/key.json");
}

#[test]
fn test_local_uri_forms() {
    let test_dir = TestDir::new().unwrap();
    let store = Store::default();

    let bare = store.new_object(&test_dir.uri("rows.csv")).unwrap();
    let file = store.new_object(&test_dir.file_uri("rows.csv")).unwrap();
    assert_eq!(bare.local_path(), file.local_path());
    assert_eq!(file.content_type(), "text/csv");
}

#[test]
fn test_concurrent_resolution() {
    let (store, _remote) = remote_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let uri = if i % 2 == 0 {
                    format!("gs://bucket/part-{}.json.gz", i)
                } else {
                    format!("part-{}.txt", i)
                };
                let object = store.new_object(&uri).unwrap();
                (object.content_type().to_string(), object.content_encoding().to_string())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (content_type, content_encoding) = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(content_type, "application/json");
            assert_eq!(content_encoding, "gzip");
        } else {
            assert_eq!(content_type, "text/plain");
            assert_eq!(content_encoding, "");
        }
    }
}
