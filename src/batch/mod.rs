//! Batch driver: loads a JSON array of records, enriches each record on the blocking
//! thread pool and writes the array back in input order.

pub mod error;
pub mod io;
pub mod runner;
pub mod summary;


pub use error::{BatchError, BatchResult};
pub use io::{into_records, load_records, save_records};
pub use runner::{BatchOutput, BatchRunner};
pub use summary::BatchSummary;
