mod analyze;
mod classify;
mod correct;
mod generate;

pub use analyze::run_analyze;
pub use classify::run_classify;
pub use correct::run_correct;
pub use generate::run_generate;

use dfc_lib::{load_design, parse_resource, DfcError, LoadedDesign, ResourceDescriptor};
use tracing::debug;

/// Parse and load `input`, selecting `node_id` (or the root).
async fn load_input(
    input: &str,
    node_id: Option<&str>,
) -> Result<(ResourceDescriptor, LoadedDesign), DfcError> {
    let resource = parse_resource(input).map_err(|err| DfcError::Config(err.to_string()))?;
    debug!(kind = ?resource.kind, input, "loading design input");
    let design = load_design(&resource, node_id).await?;
    Ok((
        ResourceDescriptor {
            kind: resource.kind,
            value: resource.value,
        },
        design,
    ))
}
