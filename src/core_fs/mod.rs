pub mod error;
pub mod listing;
pub mod path;

pub use error::FsError;
pub use listing::{get_file_list, FileEntry, ListFormatter, LongListFormatter, NameListFormatter};
pub use path::{clean_virtual_path, resolve, resolve_virtual_path, to_real_path, ResolvedPath};
