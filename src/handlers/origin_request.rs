//! Origin-request rewriter.

use crate::event::{Headers, Origin, Request, S3Origin};
use crate::handlers::EdgeError;
use crate::routing::{region_of, Deployment, X_BLUE_GREEN_CONTEXT};

/// Auth method the bucket is reached with.
pub const ORIGIN_AUTH_METHOD: &str = "origin-access-identity";

/// Point the storage origin at the deployment's subdirectory.
///
/// The `host` header at this stage is the bucket's domain. Without a routing
/// context the origin is left untouched.
pub fn rewrite(mut request: Request) -> Result<Request, EdgeError> {
    let domain_name = request
        .headers
        .first_value("host")
        .ok_or(EdgeError::MissingHeader("host"))?
        .to_string();
    let region = region_of(&domain_name)
        .ok_or_else(|| EdgeError::MalformedHost(domain_name.clone()))?
        .to_string();

    let Some(context) = request.headers.first_value(X_BLUE_GREEN_CONTEXT) else {
        tracing::info!("Did not find Blue Green Context");
        return Ok(request);
    };
    let deployment: Deployment = context
        .parse()
        .map_err(EdgeError::InvalidContext)?;

    tracing::info!(context = %deployment, "Blue Green Context found");

    request.origin = Some(Origin::S3(S3Origin {
        auth_method: ORIGIN_AUTH_METHOD.to_string(),
        custom_headers: Headers::new(),
        domain_name,
        path: deployment.origin_path(),
        region,
    }));

    Ok(request)
}
