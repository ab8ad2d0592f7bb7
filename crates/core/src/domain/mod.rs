pub mod comment;
pub mod program;

pub use comment::{Comment, DateRange, PersistedRecord};
pub use program::{Program, Sentiment};
