/// Document ids are opaque strings assigned by the document store.
pub type DocId = String;

/// All normalized timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
