// Application Layer - Use cases and services

pub mod bidding;
pub mod evaluation;
pub mod expiry;

pub use bidding::{BiddingService, CreateTask, SubmitBid};
pub use evaluation::{select_winner, EvaluationError};
pub use expiry::ExpirySweeper;
