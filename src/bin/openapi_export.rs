use std::{fs, path::PathBuf};

use anyhow::Context;
use inventory_admin::openapi::ApiDocV1;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let openapi = ApiDocV1::openapi();
    let json = serde_json::to_string_pretty(&openapi)?;

    let output_dir = PathBuf::from("openapi");
    fs::create_dir_all(&output_dir).context("creating openapi/ directory")?;

    let output_path = output_dir.join("inventory-admin.v1.json");
    fs::write(&output_path, json)
        .with_context(|| format!("writing {}", output_path.display()))?;

    println!("OpenAPI spec written to {}", output_path.display());
    Ok(())
}
