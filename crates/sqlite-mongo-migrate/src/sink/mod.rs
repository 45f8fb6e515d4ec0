//! Delivery targets for converted documents.

mod bulk;
mod file;

pub use bulk::BulkLoaderSink;
pub use file::FileSink;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;

/// A delivery target for documents.
///
/// Every document of a table arrives through [`accept`](Self::accept), then
/// [`finish_table`](Self::finish_table) signals that the table's rows are
/// exhausted. Sinks that buffer per table flush on that signal. There is no
/// atomicity across sinks: documents already delivered to one sink stay
/// delivered if another sink fails afterwards.
#[async_trait]
pub trait DocumentSink: Send {
    /// Deliver one document belonging to `table`.
    async fn accept(&mut self, table: &str, document: &Document) -> Result<()>;

    /// Signal that all rows of `table` have been delivered.
    async fn finish_table(&mut self, table: &str) -> Result<()>;
}
