mod loader;
mod model;

pub use loader::{ENV_PREFIX, load_defaults};
pub use model::{Defaults, HardwareDefaults, OsDefaults};
