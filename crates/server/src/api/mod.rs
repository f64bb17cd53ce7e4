#[cfg(feature = "server")]
pub(crate) mod auth;

mod session;
pub use session::*;

mod dashboard;
pub use dashboard::*;

mod people;
pub use people::*;

mod certificates;
pub use certificates::*;

mod courses;
pub use courses::*;

mod settings;
pub use settings::*;
