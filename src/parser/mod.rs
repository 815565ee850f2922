mod labels;
mod structurer;
mod types;

pub use labels::{label_pairs, rewrite_label_line};
pub use structurer::structure;
pub use types::Instruction;
