//! Persistence models.

mod message_record;

pub use message_record::MessageRecord;
