use crate::cli::ValidateParams;
use crate::error::BoxForgeError;
use crate::validation::{ValidationReport, validate_catalog};

pub fn run_validate(params: ValidateParams) -> Result<ValidationReport, BoxForgeError> {
    let ValidateParams { catalog } = params;

    tracing::info!("Validating {} appliance definitions...", catalog.len());
    let report = validate_catalog(&catalog);

    for issue in &report.issues {
        tracing::error!("{}", issue);
    }

    if report.is_valid() {
        tracing::info!("All appliance definitions are valid");
    }

    report.clone().into_result().map(|()| report)
}
