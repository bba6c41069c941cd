pub mod app_ids;
pub mod types;

pub use app_ids::{
    AppIdError, app_path, normalize_app_id, paths, restart_path, same_app, validate_app_id,
    versions_path,
};
pub use types::*;
