//! Bundling matched image and metadata pairs into the deployable `assets/` folder

use crate::io::context::RunContext;
use crate::io::error::{ForgeError, Result, WithPath};
use crate::io::scaffold::ProjectPaths;
use crate::metadata::assembler::ProjectConstants;
use crate::metadata::store::{load_record, write_json, write_output};
use crate::metadata::translation::{MissingPolicy, ValueMap, apply_media_host, apply_translation};

/// Rewrites applied to metadata while bundling
#[derive(Clone, Copy, Debug, Default)]
pub struct BundleRewrites<'a> {
    /// Attribute value translation
    pub translation: Option<&'a ValueMap>,
    /// Image uri rewriting
    pub media_host: Option<&'a ValueMap>,
}

impl BundleRewrites<'_> {
    const fn is_identity(&self) -> bool {
        self.translation.is_none() && self.media_host.is_none()
    }
}

/// Per-token outcome of [`combine_assets`]
#[derive(Debug, Default)]
pub struct BundleReport {
    /// Tokens whose pair was copied
    pub copied: Vec<u64>,
    /// Tokens whose pair already existed
    pub skipped: Vec<u64>,
    /// Tokens that could not be bundled
    pub failed: Vec<(u64, ForgeError)>,
}

/// Copy `{n}.{fmt}` and `{n}.json` for every token into `assets/`
///
/// A pair where either target already exists is skipped unless `overwrite`
/// is set. Metadata passes through the rewrites with missing entries treated
/// as errors; without rewrites it is copied byte for byte. A token that fails
/// leaves nothing behind in `assets/`, so a later run retries it.
///
/// # Errors
///
/// Returns [`ForgeError::FileSystem`] if the assets folder cannot be created.
/// Per-token failures are collected in the report.
pub fn combine_assets(
    paths: &ProjectPaths,
    constants: &ProjectConstants,
    rewrites: BundleRewrites<'_>,
    overwrite: bool,
    ctx: &RunContext,
) -> Result<BundleReport> {
    let assets = paths.assets();
    std::fs::create_dir_all(&assets).with_path(&assets, "create directory")?;

    let mut report = BundleReport::default();
    for token in 0..constants.num_tokens {
        match combine_token(paths, constants, token, rewrites, overwrite) {
            Ok(true) => {
                tracing::info!(parent: ctx.span(), token, "combined assets");
                report.copied.push(token);
            }
            Ok(false) => {
                tracing::warn!(
                    parent: ctx.span(),
                    token,
                    "assets already exist, pass --overwrite to replace them"
                );
                report.skipped.push(token);
            }
            Err(err) => {
                tracing::error!(parent: ctx.span(), token, error = %err, "failed to combine assets");
                report.failed.push((token, err));
            }
        }
    }
    Ok(report)
}

fn combine_token(
    paths: &ProjectPaths,
    constants: &ProjectConstants,
    token: u64,
    rewrites: BundleRewrites<'_>,
    overwrite: bool,
) -> Result<bool> {
    let image_name = constants.image_file_name(token);
    let metadata_name = format!("{token}.json");

    let image_source = paths.images().join(&image_name);
    let metadata_source = paths.metadata().join(&metadata_name);
    let image_dest = paths.assets().join(&image_name);
    let metadata_dest = paths.assets().join(&metadata_name);

    if !overwrite && (image_dest.exists() || metadata_dest.exists()) {
        return Ok(false);
    }

    let rewritten = if rewrites.is_identity() {
        None
    } else {
        let original = load_record(&metadata_source)?;
        let translated = apply_translation(&original, rewrites.translation, MissingPolicy::Fail)?;
        Some(apply_media_host(&translated, rewrites.media_host, MissingPolicy::Fail)?)
    };

    let bundled = std::fs::copy(&image_source, &image_dest)
        .map(drop)
        .with_path(&image_source, "copy image")
        .and_then(|()| match rewritten {
            None => std::fs::copy(&metadata_source, &metadata_dest)
                .map(drop)
                .with_path(&metadata_source, "copy metadata"),
            Some(hosted) => write_output(&metadata_dest, true, |writer| {
                write_json(writer, &hosted, &metadata_dest)
            })
            .map(drop),
        });

    // A pair is bundled whole or not at all
    if let Err(err) = bundled {
        let _ = std::fs::remove_file(&image_dest);
        let _ = std::fs::remove_file(&metadata_dest);
        return Err(err);
    }
    Ok(true)
}
