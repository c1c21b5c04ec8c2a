pub mod models;
pub mod tuple;
pub mod value;

pub use models::{Event, Reading};
pub use tuple::{MetaValue, ReadingMeta, SourceTuple};
pub use value::{infer_value, RtValue, ValueKind};
