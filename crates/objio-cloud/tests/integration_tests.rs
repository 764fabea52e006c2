//! Integration tests for objio-cloud

use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, ObjectStore};
use objio::{Close, ContentAttrs, RemoteClient, Store, StoreOption};
use objio_cloud::{CloudConfig, CloudReader, CloudWriter, ObjectStoreClient};
use objio_testing::fixtures::{multi_block, ndjson, round_trip_payloads};
use objio_testing::helpers::{gunzip, init_tracing, is_gzip};
use std::io::{Read, Write};
use std::sync::Arc;

fn memory_store() -> Arc<dyn ObjectStore> {
    init_tracing();
    Arc::new(InMemory::new())
}

fn cloud_store(memory: &Arc<dyn ObjectStore>) -> Store {
    let client = ObjectStoreClient::from_store(Arc::clone(memory));
    Store::new([StoreOption::remote(client)])
}

fn raw_bytes(memory: &Arc<dyn ObjectStore>, key: &str) -> Vec<u8> {
    let path = ObjectPath::from(key);
    let mut reader = CloudReader::open(Arc::clone(memory), path).unwrap();
    let mut data = Vec::new();
    reader.read_to_end(&mut data).unwrap();
    data
}

#[test]
fn test_write_and_read() {
    let store = memory_store();
    let path = ObjectPath::from("test/file.txt");
    let test_data = b"Hello, objio-cloud! This is a test.";

    let mut writer = CloudWriter::new(
        store.clone(),
        path.clone(),
        &ContentAttrs::new("text/plain", ""),
        CloudConfig::default(),
    );
    writer.write_all(test_data).unwrap();
    assert_eq!(writer.bytes_written(), test_data.len() as u64);
    writer.finalize().unwrap();

    let mut reader = CloudReader::open(store, path).unwrap();
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).unwrap();
    assert_eq!(buffer, test_data);
}

#[test]
fn test_large_object_uses_multipart() {
    let store = memory_store();
    let path = ObjectPath::from("test/large.bin");
    let test_data: Vec<u8> = (0..5 * 1024 * 1024).map(|i| (i % 256) as u8).collect();

    let config = CloudConfig {
        buffer_size: 1024 * 1024,
        multipart_threshold: 2 * 1024 * 1024,
        ..Default::default()
    };
    let content = ContentAttrs::new("application/octet-stream", "");

    let mut writer = CloudWriter::new(store.clone(), path.clone(), &content, config);
    for chunk in test_data.chunks(256 * 1024) {
        writer.write_all(chunk).unwrap();
    }
    assert!(writer.is_multipart());
    writer.finalize().unwrap();

    assert_eq!(raw_bytes(&store, "test/large.bin"), test_data);

    let client = ObjectStoreClient::from_store(store);
    let attributes = client.attributes("bucket", "test/large.bin").unwrap();
    assert_eq!(attributes.content_type, "application/octet-stream");
}

#[test]
fn test_multipart_disabled_keeps_single_put() {
    let store = memory_store();
    let config = CloudConfig {
        use_multipart_upload: false,
        multipart_threshold: 16,
        buffer_size: 16,
        ..Default::default()
    };

    let mut writer = CloudWriter::new(
        store.clone(),
        ObjectPath::from("single"),
        &ContentAttrs::default(),
        config,
    );
    writer.write_all(&ndjson(50)).unwrap();
    assert!(!writer.is_multipart());
    writer.finalize().unwrap();

    assert_eq!(raw_bytes(&store, "single"), ndjson(50));
}

#[test]
fn test_drop_finalizes_unclosed_writer() {
    let store = memory_store();
    {
        let mut writer = CloudWriter::new(
            store.clone(),
            ObjectPath::from("dropped"),
            &ContentAttrs::default(),
            CloudConfig::default(),
        );
        writer.write_all(b"still uploaded").unwrap();
    }
    assert_eq!(raw_bytes(&store, "dropped"), b"still uploaded");
}

#[test]
fn test_client_reports_not_found() {
    let client = ObjectStoreClient::from_store(memory_store());

    assert!(client.attributes("bucket", "missing").unwrap_err().is_not_found());
    match client.open_reader("bucket", "missing", false) {
        Err(err) => assert!(err.is_not_found()),
        Ok(_) => panic!("opened a missing object"),
    }
}

#[test]
fn test_client_reads_cache_control() {
    let store = memory_store();
    let path = ObjectPath::from("blob");
    let mut attributes = object_store::Attributes::new();
    attributes.insert(Attribute::ContentType, "application/x-gzip".into());
    attributes.insert(Attribute::CacheControl, "no-transform".into());
    let opts = object_store::PutOptions {
        attributes,
        ..Default::default()
    };
    tokio_block_on(store.put_opts(&path, b"data".to_vec().into(), opts)).unwrap();

    let client = ObjectStoreClient::from_store(store);
    let attributes = client.attributes("bucket", "blob").unwrap();
    assert_eq!(attributes.content_type, "application/x-gzip");
    assert_eq!(attributes.content_encoding, "");
    assert_eq!(attributes.cache_control, "no-transform");
}

#[test]
fn test_store_gzip_round_trip() {
    let memory = memory_store();
    let store = cloud_store(&memory);

    for (name, payload) in round_trip_payloads() {
        let key = format!("exports/{}.json.gz", name);
        let uri = format!("gs://bucket/{}", key);

        let object = store.new_object(&uri).unwrap();
        let mut writer = object.new_writer().unwrap();
        writer.write_all(&payload).unwrap();
        writer.close().unwrap();

        let stored = raw_bytes(&memory, &key);
        assert!(is_gzip(&stored), "{} was not compressed", name);
        assert_eq!(gunzip(&stored).unwrap(), payload);

        let object = store.new_object(&uri).unwrap();
        assert_eq!(object.content_type(), "application/json");
        assert_eq!(object.content_encoding(), "gzip");

        let mut reader = object.new_reader().unwrap();
        assert!(reader.is_decompressing());
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).unwrap();
        reader.close().unwrap();
        assert_eq!(contents, payload, "round trip of {}", name);
    }
}

#[test]
fn test_store_delete() {
    let memory = memory_store();
    let store = cloud_store(&memory);

    let object = store.new_object("gs://bucket/tmp/data.bin").unwrap();
    let mut writer = object.new_writer().unwrap();
    writer.write_all(&multi_block()).unwrap();
    writer.close().unwrap();

    object.delete().unwrap();
    let object = store.new_object("gs://bucket/tmp/data.bin").unwrap();
    assert!(object.metadata().stored().is_none());
    assert!(object.new_reader().unwrap_err().is_not_found());
}

#[test]
fn test_escaped_keys_reach_the_store() {
    let memory = memory_store();
    let store = cloud_store(&memory);

    let object = store.new_object("gs://bucket/reports/q1%20final.csv").unwrap();
    let mut writer = Some(object.new_writer().unwrap());
    if let Some(w) = writer.as_mut() {
        w.write_all(b"a,b\n1,2\n").unwrap();
    }
    writer.close().unwrap();

    assert_eq!(raw_bytes(&memory, "reports/q1 final.csv"), b"a,b\n1,2\n");
}

fn tokio_block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

