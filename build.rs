use anyhow::{Context, Result};
use fs_extra::{copy_items, dir::CopyOptions};
use std::{env, path::PathBuf};

/// Copies the scene's textures, models and fonts into the build output
/// directory for packaging. Native runs read them from `./assets`.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.exists() {
        println!("cargo:warning=no assets directory, the scene will load nothing");
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let copy_options = CopyOptions {
        overwrite: true,
        ..CopyOptions::new()
    };
    copy_items(&[assets], &out_dir, &copy_options)
        .with_context(|| format!("could not copy assets into {out_dir}"))?;

    Ok(())
}
