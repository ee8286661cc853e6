//! Tag index and the vault scanner that fills it

mod builder;
mod tag_index;

pub use builder::{
    BuildError, BuildResult, FileResult, IndexBuilder, NoopReporter, ProgressReporter, note_id,
};
pub use tag_index::{DEFAULT_POPULAR_LIMIT, Subscription, TagIndex, TagRecord};
