//! In-memory storage for analysis results

mod result_store;

pub use result_store::ResultStore;
