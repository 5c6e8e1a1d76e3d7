//! Concurrency and thread-safety tests for the store and the pipeline.

use std::sync::Arc;
use std::thread;

use paperfind::{Document, IngestPipeline, PaperStore, PipelineConfig, ProviderConfig};

fn make_document(title: &str, vector: &[f64]) -> Document {
    Document {
        title: title.into(),
        authors: "A. Author".into(),
        abstract_: format!("Abstract of {title}"),
        keywords: vec!["alpha".into(), "beta".into()],
        content_uri: format!("stub://papers/{title}"),
        vector: paperfind::encode(vector).expect("encode"),
    }
}

#[test]
fn concurrent_appends_land_exactly_once() {
    let store = Arc::new(PaperStore::new());
    let writers = 8;
    let per_writer = 25;

    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..per_writer {
                    let title = format!("doc-{w}-{i}");
                    store
                        .append(make_document(&title, &[0.25, 0.5, 0.75]))
                        .expect("append should succeed");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread");
    }

    let stored = store.all_documents();
    assert_eq!(stored.len(), writers * per_writer);

    // No duplicates and no partial documents.
    let mut titles: Vec<&str> = stored.iter().map(|d| d.title.as_str()).collect();
    titles.sort_unstable();
    titles.dedup();
    assert_eq!(titles.len(), writers * per_writer);
    for doc in &stored {
        assert!(!doc.content_uri.is_empty());
        assert_eq!(doc.vector.len(), 3);
    }

    // Per-writer insertion order is a valid interleaving: each writer's own
    // documents appear in the order it appended them.
    for w in 0..writers {
        let own: Vec<&str> = stored
            .iter()
            .map(|d| d.title.as_str())
            .filter(|t| t.starts_with(&format!("doc-{w}-")))
            .collect();
        let expected: Vec<String> = (0..per_writer).map(|i| format!("doc-{w}-{i}")).collect();
        assert_eq!(own, expected);
    }
}

#[test]
fn searches_run_against_consistent_snapshots() {
    let store = Arc::new(PaperStore::new());
    let total = 100;

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..total {
                let x = i as f64 / total as f64;
                store
                    .append(make_document(&format!("doc-{i}"), &[x, 1.0 - x, 0.5]))
                    .expect("append should succeed");
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..50 {
                    let results = store.search(&[0.5, 0.5, 0.5]).expect("search");
                    // Every observed snapshot is complete and sorted.
                    assert!(results.len() <= total);
                    for pair in results.windows(2) {
                        assert!(
                            pair[0].similarity >= pair[1].similarity
                                || pair[1].similarity.is_nan()
                        );
                    }
                }
            })
        })
        .collect();

    writer.join().expect("writer thread");
    for reader in readers {
        reader.join().expect("reader thread");
    }

    assert_eq!(store.len(), total);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ingestions_all_complete() {
    let providers = ProviderConfig {
        embedding_dim: 16,
        ..Default::default()
    }
    .build()
    .expect("stub providers");
    let pipeline = Arc::new(IngestPipeline::new(
        providers,
        Arc::new(PaperStore::new()),
        PipelineConfig::default(),
    ));

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                let content = format!(
                    "Paper Number {i}\nA. Author\nAbstract text about subject {i} with enough distinct words."
                );
                pipeline
                    .ingest(content.as_bytes(), &format!("paper-{i}.txt"))
                    .await
                    .expect("ingest")
            })
        })
        .collect();

    for task in tasks {
        task.await.expect("ingest task");
    }

    let stored = pipeline.store().all_documents();
    assert_eq!(stored.len(), 20);

    let mut titles: Vec<&str> = stored.iter().map(|d| d.title.as_str()).collect();
    titles.sort_unstable();
    titles.dedup();
    assert_eq!(titles.len(), 20, "every ingestion appended exactly once");
}
