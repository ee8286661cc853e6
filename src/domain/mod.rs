//! Core types: Metadata, MetaValue, KanbanStatus, Tag

mod metadata;
mod status;
mod tag;
mod value;

pub use metadata::{Metadata, keys};
pub use status::{KanbanStatus, ParseKanbanStatusError};
pub use tag::{DEFAULT_TAG_COLOR, ParseTagError, Tag, normalize as normalize_tag};
pub use value::{MetaValue, MetaValueError};
