//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use taskbid_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const TASK_EXPIRED: i32 = 4002;
    pub const THROTTLED: i32 = 4003;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
///
/// `TaskExpired` keeps its own code so clients can tell "never existed"
/// (4001) apart from "too late" (4002). `NoBids` and `UnknownCriteria` are
/// bad-request-class signals with distinguishable messages.
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::TaskNotFound(task_id) => ErrorObjectOwned::owned(
            code::NOT_FOUND,
            format!("Task not found: {}", task_id),
            None::<()>,
        ),
        AppError::TaskExpired(task_id) => ErrorObjectOwned::owned(
            code::TASK_EXPIRED,
            format!("Task expired: {}", task_id),
            None::<()>,
        ),
        AppError::NoBids(task_id) => ErrorObjectOwned::owned(
            code::VALIDATION_ERROR,
            format!("No bids submitted for task: {}", task_id),
            None::<()>,
        ),
        AppError::UnknownCriteria { task_id, criteria } => ErrorObjectOwned::owned(
            code::VALIDATION_ERROR,
            format!("Unknown criteria on task {}: {}", task_id, criteria),
            None::<()>,
        ),
        AppError::Database(msg) => ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>),
        AppError::Io(e) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>),
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}
