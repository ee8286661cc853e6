//! Header codec, tag extraction, note file I/O

pub mod frontmatter;
mod fs;
mod slug;
mod tags;

pub use frontmatter::{
    ParsedNote, create_new, extract_fast, has_header, parse, serialize, update,
};
pub use fs::{
    FsError, delete_note, read_note, read_note_content, rename_note, scan_notes_directory,
    write_note, write_note_content,
};
pub use slug::{generate_filename, slugify, unique_note_path};
pub use tags::extract_tags;
