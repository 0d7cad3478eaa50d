pub mod cli;
pub mod config;
pub mod error;
pub mod javadoc;
pub mod record;
pub mod search;
pub mod server;
pub mod session;
pub mod state;
pub mod tools;
pub mod tracing;

pub use config::LookupConfig;
pub use error::{LoadError, LookupError};
pub use record::{Category, RawEntry, SymbolRecord, TargetRef, normalize};
pub use search::{IndexSnapshot, SymbolIndex};
pub use session::{QuerySession, ResultSet, SessionState};
pub use state::LookupOutcome;
