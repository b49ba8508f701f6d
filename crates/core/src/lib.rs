pub mod claims;
pub mod config;
pub mod entity;
pub mod error;
pub mod feature;
pub mod flag;
pub mod policy;
pub mod warning;

pub use claims::*;
pub use config::{load_dotenv, Config};
pub use entity::*;
pub use error::*;
pub use feature::*;
pub use flag::*;
pub use policy::*;
pub use warning::*;
