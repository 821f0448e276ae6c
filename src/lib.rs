pub mod aggregate;
pub mod cli;
pub mod error;
pub mod filter;
pub mod parser;
pub mod range;
pub mod schema;
pub mod writer;

pub use aggregate::Dashboard;
pub use cli::{Cli, Commands};
pub use error::{DashboardError, Result};
pub use parser::{load_transactions, read_transactions, Transaction};
pub use range::DateRange;
