//! Filesystem operations used by the exporter.

mod atomic;
mod copy;
mod helpers;
mod lock;
mod util;

pub use copy::copy_overwrite;
pub use lock::{acquire_dir_lock, lock_file_path, try_acquire_dir_lock, DirLock};

pub(crate) use helpers::{describe_io_error, io_error_with_help};
