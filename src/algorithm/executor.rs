use crate::{
    algorithm::sampler::{AttributeSet, SamplingStrategy},
    algorithm::selection::RandomSelector,
    catalog::{TraitAlgorithm, TraitCatalog},
    io::configuration::LAYER_EXTENSION,
    io::context::RunContext,
    io::csv_source::load_attribute_rows,
    io::error::{ForgeError, Result, WithPath},
    io::progress::ProgressManager,
    io::scaffold::ProjectPaths,
    metadata::assembler::{ProjectConstants, assemble},
    metadata::store::{MetadataStore, SaveReport, load_record},
    render::composite::{composite, save_png},
    render::plan::ImagePlanResolver,
};
use std::path::Path;

/// Per-token outcome of [`Generator::generate_images`]
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Tokens whose image was written
    pub rendered: Vec<u64>,
    /// Tokens whose image already existed
    pub skipped: Vec<u64>,
    /// Tokens that could not be rendered
    pub failed: Vec<(u64, ForgeError)>,
}

impl GenerationReport {
    /// True when no token failed
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the metadata and image stages of one project
///
/// Catalog and constants are shared read-only across the whole batch. A token
/// that fails to render is recorded and the batch moves on.
pub struct Generator<'a> {
    catalog: &'a TraitCatalog,
    constants: &'a ProjectConstants,
    paths: &'a ProjectPaths,
    ctx: &'a RunContext,
}

impl<'a> Generator<'a> {
    /// Create a generator over a validated catalog
    pub const fn new(
        catalog: &'a TraitCatalog,
        constants: &'a ProjectConstants,
        paths: &'a ProjectPaths,
        ctx: &'a RunContext,
    ) -> Self {
        Self {
            catalog,
            constants,
            paths,
            ctx,
        }
    }

    /// Attribute sets for every token, sampled or read from the CSV table
    ///
    /// # Errors
    ///
    /// Returns sampling errors from [`SamplingStrategy::sample`] and read
    /// errors from [`load_attribute_rows`].
    pub fn attribute_sets(&self, selector: &mut RandomSelector) -> Result<Vec<AttributeSet>> {
        if self.catalog.algorithm() == TraitAlgorithm::Csv {
            let rows = load_attribute_rows(&self.paths.csv())?;
            if rows.len() as u64 != self.constants.num_tokens {
                tracing::warn!(
                    parent: self.ctx.span(),
                    rows = rows.len(),
                    num_tokens = self.constants.num_tokens,
                    "attribute table size differs from num_tokens"
                );
            }
            return Ok(rows);
        }

        let strategy = SamplingStrategy::for_catalog(self.catalog)?;
        (0..self.constants.num_tokens)
            .map(|token| {
                let attributes = strategy.sample(self.catalog, selector, self.ctx)?;
                tracing::debug!(parent: self.ctx.span(), token, ?attributes, "sampled");
                Ok(attributes)
            })
            .collect()
    }

    /// Sample, assemble and persist the metadata of every token
    ///
    /// # Errors
    ///
    /// Returns sampling and assembly errors, which indicate a broken catalog
    /// or constants. Per-record save failures are collected in the report.
    pub fn generate_metadata(
        &self,
        selector: &mut RandomSelector,
        overwrite: bool,
        mut progress: Option<&mut ProgressManager>,
    ) -> Result<SaveReport> {
        self.constants.validate()?;
        let sets = self.attribute_sets(selector)?;

        if let Some(pm) = progress.as_deref_mut() {
            pm.start_stage("metadata", sets.len() as u64);
        }

        let mut records = Vec::with_capacity(sets.len());
        for (token, attributes) in (0_u64..).zip(&sets) {
            records.push(assemble(self.constants, token, attributes)?);
            if let Some(pm) = progress.as_deref_mut() {
                pm.complete_token(token, "assembled");
            }
        }

        let store = MetadataStore::new(self.paths.metadata());
        std::fs::create_dir_all(store.dir()).with_path(store.dir(), "create directory")?;
        let report = store.save_batch(&records, overwrite, self.ctx);

        if let Some(pm) = progress {
            pm.finish();
        }
        tracing::info!(
            parent: self.ctx.span(),
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "metadata stage done"
        );
        Ok(report)
    }

    /// Composite an image for every persisted metadata document
    ///
    /// Documents are processed in numeric token order.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::FileSystem`] if the metadata or images folder
    /// cannot be accessed. Per-token failures are collected in the report.
    pub fn generate_images(
        &self,
        overwrite: bool,
        mut progress: Option<&mut ProgressManager>,
    ) -> Result<GenerationReport> {
        let store = MetadataStore::new(self.paths.metadata());
        let documents = store.list()?;
        let images = self.paths.images();
        std::fs::create_dir_all(&images).with_path(&images, "create directory")?;

        let resolver = ImagePlanResolver::new(self.paths.traits(), LAYER_EXTENSION);
        let mut report = GenerationReport::default();

        if let Some(pm) = progress.as_deref_mut() {
            pm.start_stage("images", documents.len() as u64);
        }

        for (token, document) in documents {
            let target = images.join(self.constants.image_file_name(token));
            let outcome = if !overwrite && target.exists() {
                Ok(false)
            } else {
                self.render_token(&resolver, &document, &target, overwrite)
            };

            match outcome {
                Ok(true) => {
                    tracing::info!(parent: self.ctx.span(), token, "rendered image");
                    report.rendered.push(token);
                    if let Some(pm) = progress.as_deref_mut() {
                        pm.complete_token(token, "rendered");
                    }
                }
                Ok(false) => {
                    tracing::warn!(
                        parent: self.ctx.span(),
                        token,
                        "image already exists, pass --overwrite to replace it"
                    );
                    report.skipped.push(token);
                    if let Some(pm) = progress.as_deref_mut() {
                        pm.complete_token(token, "skipped");
                    }
                }
                Err(err) => {
                    tracing::error!(parent: self.ctx.span(), token, error = %err, "failed to render image");
                    if let Some(pm) = progress.as_deref_mut() {
                        pm.fail_token(token, &err.to_string());
                    }
                    report.failed.push((token, err));
                }
            }
        }

        if let Some(pm) = progress {
            pm.finish();
        }
        Ok(report)
    }

    fn render_token(
        &self,
        resolver: &ImagePlanResolver,
        document: &Path,
        target: &Path,
        overwrite: bool,
    ) -> Result<bool> {
        let record = load_record(document)?;
        let plan = resolver.resolve(self.catalog, &record, self.ctx)?;
        let image = composite(&plan)?;
        save_png(&image, target, overwrite)
    }
}
