//! Configuration: types, default paths and XML loading.
//! CLI flags are applied on top of the loaded values by the binary.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor, CONFIG_ENV};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config, load_config_from_xml_path, LoadResult};
