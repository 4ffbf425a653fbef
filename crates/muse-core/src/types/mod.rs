mod id;
mod timestamp;

pub use id::{Id, MessageId, SessionId};
pub use timestamp::Timestamp;
