pub mod config;
pub mod error;
pub mod claims;
pub mod lookup;
pub mod skill;
pub mod server;

pub use config::Config;
pub use error::{ConceptMapError, Result};
pub use claims::{ClaimsInfo, ClaimsQuery, ItemInfo};
pub use skill::IntentOrchestrator;
