pub mod case;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod requests;
pub mod stats;
pub mod status;

pub use case::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use filter::*;
pub use requests::*;
pub use stats::*;
pub use status::*;
