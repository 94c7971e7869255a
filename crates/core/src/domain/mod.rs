// Domain Layer - Entities and domain rules

pub mod bid;
pub mod error;
pub mod task;

pub use bid::{Bid, BidId};
pub use error::DomainError;
pub use task::{Criteria, Task, TaskId};
