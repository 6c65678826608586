mod args;
mod list;
mod params;
mod resolve;
mod resolved_command;
mod validate;

pub use args::{Args, Command, parse_args};
pub use list::{list_appliances, run_list};
pub use params::{ListParams, OutputTarget, ResolveParams, ValidateParams};
pub use resolve::run_resolve;
pub use resolved_command::{ResolvedCommand, resolve_command};
pub use validate::run_validate;
