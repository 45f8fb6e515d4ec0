//! Bulk loader sink: buffers one table's documents, then issues a single
//! bulk insert against the destination collection named after the table.

use std::mem;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document as BsonDocument};
use tracing::{debug, info};

use crate::document::Document;
use crate::error::Result;
use crate::sink::DocumentSink;
use crate::target::TargetStore;
use crate::value::Scalar;

/// Sink accumulating a table's documents in memory and flushing them with
/// one `insert_many` on table completion.
///
/// The accumulator is scoped to a single table's lifetime; it is taken and
/// discarded on [`finish_table`](DocumentSink::finish_table).
pub struct BulkLoaderSink {
    target: Arc<dyn TargetStore>,
    pending: Vec<BsonDocument>,
}

impl BulkLoaderSink {
    /// Create a sink writing to the given destination store.
    pub fn new(target: Arc<dyn TargetStore>) -> Self {
        Self {
            target,
            pending: Vec::new(),
        }
    }
}

/// Convert a document to BSON, preserving field order.
fn to_bson(document: &Document) -> BsonDocument {
    let mut out = BsonDocument::new();
    for (key, value) in document.fields() {
        let bson = match value {
            Scalar::Number(n) => Bson::Double(n.as_f64()),
            Scalar::Text(s) => Bson::String(s.clone()),
        };
        out.insert(key, bson);
    }
    out
}

#[async_trait]
impl DocumentSink for BulkLoaderSink {
    async fn accept(&mut self, _table: &str, document: &Document) -> Result<()> {
        self.pending.push(to_bson(document));
        Ok(())
    }

    async fn finish_table(&mut self, table: &str) -> Result<()> {
        let documents = mem::take(&mut self.pending);
        if documents.is_empty() {
            // The driver rejects empty bulk inserts; an empty table simply
            // maps to an empty destination collection.
            debug!("{}: no documents to bulk-insert", table);
            return Ok(());
        }

        let inserted = self.target.insert_many(table, documents).await?;
        info!("{}: bulk-inserted {} documents", table, inserted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::{ColumnDescriptor, TableSchema};
    use crate::source::SourceRow;
    use crate::value::RawValue;

    /// Records every bulk insert instead of talking to a real store.
    #[derive(Default)]
    struct RecordingStore {
        inserts: Mutex<Vec<(String, Vec<BsonDocument>)>>,
    }

    #[async_trait]
    impl TargetStore for RecordingStore {
        async fn drop_database(&self) -> Result<()> {
            Ok(())
        }

        async fn insert_many(
            &self,
            collection: &str,
            documents: Vec<BsonDocument>,
        ) -> Result<u64> {
            let count = documents.len() as u64;
            self.inserts
                .lock()
                .unwrap()
                .push((collection.to_string(), documents));
            Ok(count)
        }
    }

    fn users_document(id: i64, name: &str, score: f64) -> Document {
        let schema = TableSchema {
            name: "users".to_string(),
            columns: vec![
                ColumnDescriptor {
                    name: "id".to_string(),
                    declared_type: "INTEGER".to_string(),
                },
                ColumnDescriptor {
                    name: "name".to_string(),
                    declared_type: "TEXT".to_string(),
                },
                ColumnDescriptor {
                    name: "score".to_string(),
                    declared_type: "REAL".to_string(),
                },
            ],
        };
        let row: SourceRow = vec![
            ("id".to_string(), RawValue::Integer(id)),
            ("name".to_string(), RawValue::Text(name.to_string())),
            ("score".to_string(), RawValue::Real(score)),
        ]
        .into_iter()
        .collect();
        Document::from_row(&row, &schema)
    }

    #[tokio::test]
    async fn test_single_bulk_insert_per_table() {
        // N accepted documents arrive as one insert of N documents.
        let store = Arc::new(RecordingStore::default());
        let mut sink = BulkLoaderSink::new(store.clone());

        for id in 1..=3 {
            let doc = users_document(id, "Ada", 9.5);
            sink.accept("users", &doc).await.unwrap();
        }
        sink.finish_table("users").await.unwrap();

        let inserts = store.inserts.lock().unwrap();
        assert_eq!(inserts.len(), 1);
        let (collection, documents) = &inserts[0];
        assert_eq!(collection, "users");
        assert_eq!(documents.len(), 3);
    }

    #[tokio::test]
    async fn test_bson_field_order_and_kinds() {
        let store = Arc::new(RecordingStore::default());
        let mut sink = BulkLoaderSink::new(store.clone());

        let doc = users_document(1, "Ada", 9.5);
        sink.accept("users", &doc).await.unwrap();
        sink.finish_table("users").await.unwrap();

        let inserts = store.inserts.lock().unwrap();
        let bson = &inserts[0].1[0];
        let keys: Vec<_> = bson.keys().collect();
        assert_eq!(keys, vec!["id", "name", "score"]);
        assert_eq!(bson.get("id"), Some(&Bson::Double(1.0)));
        assert_eq!(bson.get("name"), Some(&Bson::String("Ada".to_string())));
        assert_eq!(bson.get("score"), Some(&Bson::Double(9.5)));
    }

    #[tokio::test]
    async fn test_empty_table_skips_insert() {
        // Finishing an empty table completes without an insert call.
        let store = Arc::new(RecordingStore::default());
        let mut sink = BulkLoaderSink::new(store.clone());

        sink.finish_table("empty").await.unwrap();

        assert!(store.inserts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accumulator_resets_between_tables() {
        let store = Arc::new(RecordingStore::default());
        let mut sink = BulkLoaderSink::new(store.clone());

        sink.accept("users", &users_document(1, "Ada", 9.5))
            .await
            .unwrap();
        sink.finish_table("users").await.unwrap();

        sink.accept("users", &users_document(2, "Grace", 8.0))
            .await
            .unwrap();
        sink.finish_table("users").await.unwrap();

        let inserts = store.inserts.lock().unwrap();
        assert_eq!(inserts.len(), 2);
        assert_eq!(inserts[0].1.len(), 1);
        assert_eq!(inserts[1].1.len(), 1);
    }
}
