//! duplitab
//!
//! Query the state of duplicity backup collections without scraping its
//! output yourself: runs `duplicity collection-status` and turns the report
//! into typed chains and sets.
//!
//! ```rust,no_run
//! use duplitab::Collection;
//!
//! let status = Collection::new("file:///media/backup/home").request_status(Some(30))?;
//! if let Some(time) = status.last_full_backup_time() {
//!     println!("last full backup: {time}");
//! }
//! # Ok::<(), duplitab::DuplitabError>(())
//! ```

pub mod collection;
pub mod config;
pub mod duplicity;
pub mod status;
pub mod utils;

// Re-export commonly used types
pub use collection::Collection;
pub use config::Config;
pub use duplicity::Duplicity;
pub use status::{BackupType, ChainStatus, CollectionStatus, SetStatus};
pub use utils::errors::{DuplitabError, ParseError};
pub type Result<T> = std::result::Result<T, DuplitabError>;
