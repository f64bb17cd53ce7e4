pub mod error;
pub mod feature_flags;
pub mod models;

// Academy domain modules
pub mod certificates;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod export;
pub mod list;
pub mod people;
pub mod search;

pub use error::*;
pub use feature_flags::*;
pub use models::*;

pub use certificates::*;
pub use common::*;
pub use courses::*;
pub use dashboard::*;
pub use export::*;
pub use list::*;
pub use people::*;
pub use search::*;
