pub mod alert_labels;
pub mod reading;
pub mod record_source;
pub mod schema;
