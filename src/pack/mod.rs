mod copy;
mod options;
mod packer;
mod report;

pub use options::{Compression, PackOptions};
pub use packer::Packer;
pub use report::{PackReport, PackedEntry};
