//! Upload handling building blocks.
//!
//! - [`filename`]: turning a client-supplied filename into one that is safe to write under the
//!   upload directory, and the extension allow-list check
//! - [`size`]: human readable byte counts
//! - [`storage`]: where accepted uploads end up

pub mod filename;
pub mod size;
pub mod storage;

pub use filename::{allowed_file, sanitize_filename};
pub use size::format_file_size;
pub use storage::{LocalUploadStore, StoredUpload, UploadStore};
