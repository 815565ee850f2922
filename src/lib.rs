//! Structure a Dockerfile into its instructions and splice targeted edits
//! (base image, cmd, labels) back in place without disturbing the rest of
//! the file.

mod editor;
mod error;
mod parser;
mod store;

pub use editor::Dockerfile;
pub use error::{EditError, Result};
pub use parser::{label_pairs, structure, Instruction};
pub use store::{split_lines, FileStore, LineStore, MemStore, DOCKERFILE_FILENAME};
