//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3.0 specification for the REST API to `openapi.json`,
//! for clients that consume the spec without a running server.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = "openapi.json";
    std::fs::write(path, ApiDoc::openapi().to_pretty_json()?)?;
    println!("OpenAPI specification generated at {}", path);
    Ok(())
}
