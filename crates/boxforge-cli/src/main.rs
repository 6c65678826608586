use boxforge_lib::cli::{
    ResolvedCommand, parse_args, resolve_command, run_list, run_resolve, run_validate,
};
use boxforge_lib::error::BoxForgeError;

fn main() -> Result<(), BoxForgeError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::Resolve(params) => {
            run_resolve(params)?;
        }
        ResolvedCommand::Validate(params) => {
            run_validate(params)?;
        }
        ResolvedCommand::List(params) => run_list(params)?,
    }

    Ok(())
}
