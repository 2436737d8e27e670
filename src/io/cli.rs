//! Command-line interface driving the stages of one project

use crate::algorithm::executor::Generator;
use crate::algorithm::selection::RandomSelector;
use crate::analysis::rarity::{ValidationOptions, ValidationReport, validate};
use crate::catalog::TraitCatalog;
use crate::io::assets::{BundleRewrites, combine_assets};
use crate::io::configuration::{
    DEFAULT_CONFIG_FILE, DEFAULT_PROJECT, ProjectConfig, load_config,
};
use crate::io::context::RunContext;
use crate::io::error::{Result, WithPath};
use crate::io::frontend::{FrontendEnv, FrontendOptions, Network};
use crate::io::progress::ProgressManager;
use crate::io::scaffold::{ProjectPaths, initialize_project};
use crate::metadata::assembler::ProjectConstants;
use crate::metadata::translation::ValueMap;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "traitforge")]
#[command(
    author,
    version,
    about = "Generate layered trait art collections with weighted metadata"
)]
/// Command-line arguments for the collection pipeline
// Each stage is an independent opt-in flag
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Project name inside the configuration document
    #[arg(long, default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// Configuration document
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Create the project folder layout
    #[arg(long)]
    pub initialize: bool,

    /// Sample attributes and write metadata documents
    #[arg(long)]
    pub generate_metadata: bool,

    /// Composite images for the written metadata
    #[arg(long)]
    pub generate_images: bool,

    /// Bundle image and metadata pairs into assets/
    #[arg(long)]
    pub combine_assets: bool,

    /// Check the bundle for completeness and rarity
    #[arg(long)]
    pub validate: bool,

    /// Replace outputs that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Random seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the front-end environment to stdout
    #[arg(long)]
    pub react_env: bool,

    /// Mint start date, e.g. "01 Jan 2021 00:00:00 GMT"
    #[arg(long, value_name = "DATE")]
    pub react_env_start_date: Option<String>,

    /// Candy machine id of the deployed collection
    #[arg(long, value_name = "ID")]
    pub react_env_candy_machine_id: Option<String>,

    /// Target cluster: devnet or mainnet-beta
    #[arg(long, default_value = "devnet")]
    pub env: String,

    /// Treasury address to use instead of the creator address
    #[arg(long, value_name = "ADDRESS")]
    pub override_treasury_address: Option<String>,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Result of a run the binary turns into an exit status
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Validation report when `--validate` ran
    pub validation: Option<ValidationReport>,
    /// Tokens that failed in any generation or bundling stage
    pub failed_tokens: usize,
}

impl RunOutcome {
    /// True when validation, if it ran, succeeded
    pub fn is_success(&self) -> bool {
        self.validation.as_ref().is_none_or(|report| report.success)
    }
}

/// Orchestrates the requested stages for one project
pub struct ProjectRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl ProjectRunner {
    /// Create a runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run every stage the CLI asked for, in pipeline order
    ///
    /// # Errors
    ///
    /// Returns configuration and catalog errors before any stage runs, and
    /// stage-level errors that stop the run. Per-token failures are counted
    /// in the outcome instead.
    pub fn run(&mut self) -> Result<RunOutcome> {
        let config = load_config(&self.cli.config, &self.cli.project)?;
        let ctx = RunContext::new(&self.cli.project);
        let catalog = config.catalog()?;
        let constants = config.settings.constants();
        constants.validate()?;

        let paths = ProjectPaths::new(
            &resolve_working_dir(&self.cli.config, &config.settings.working_dir),
            &self.cli.project,
        );
        tracing::info!(parent: ctx.span(), config = %self.cli.config.display(), root = %paths.root().display(), "using config");

        let mut outcome = RunOutcome::default();

        if self.cli.initialize {
            initialize_project(&paths, &catalog, &ctx)?;
        }

        if self.cli.generate_metadata || self.cli.generate_images {
            outcome.failed_tokens += self.generate(&catalog, &constants, &paths, &ctx)?;
        }

        if self.cli.combine_assets {
            let (translation, media_host) = load_rewrites(&config, &paths)?;
            let rewrites = BundleRewrites {
                translation: translation.as_ref(),
                media_host: media_host.as_ref(),
            };
            let report = combine_assets(&paths, &constants, rewrites, self.cli.overwrite, &ctx)?;
            outcome.failed_tokens += report.failed.len();
        }

        if self.cli.validate {
            outcome.validation = Some(self.validate(&config, &catalog, &constants, &paths, &ctx)?);
        }

        if self.cli.react_env {
            self.print_frontend_env(&constants, &paths)?;
        }

        Ok(outcome)
    }

    fn generate(
        &mut self,
        catalog: &TraitCatalog,
        constants: &ProjectConstants,
        paths: &ProjectPaths,
        ctx: &RunContext,
    ) -> Result<usize> {
        let generator = Generator::new(catalog, constants, paths, ctx);
        let mut failed = 0;

        if self.cli.generate_metadata {
            let mut selector = self
                .cli
                .seed
                .map_or_else(RandomSelector::from_os_rng, RandomSelector::new);
            let report = generator.generate_metadata(
                &mut selector,
                self.cli.overwrite,
                self.progress_manager.as_mut(),
            )?;
            failed += report.failed.len();
        }

        if self.cli.generate_images {
            let report =
                generator.generate_images(self.cli.overwrite, self.progress_manager.as_mut())?;
            failed += report.failed.len();
        }
        Ok(failed)
    }

    // Allow print for the machine-readable report consumed by CI
    #[allow(clippy::print_stdout)]
    fn validate(
        &self,
        config: &ProjectConfig,
        catalog: &TraitCatalog,
        constants: &ProjectConstants,
        paths: &ProjectPaths,
        ctx: &RunContext,
    ) -> Result<ValidationReport> {
        let (translation, _) = load_rewrites(config, paths)?;
        let options = ValidationOptions {
            min_rarity_basis: config.validation.min_rarity_basis,
            translation,
        };
        let report = validate(catalog, constants, &paths.assets(), &options, ctx);

        if !self.cli.quiet {
            let json = serde_json::to_string_pretty(&report)
                .with_path(&paths.assets(), "serialize validation report")?;
            println!("{json}");
        }
        Ok(report)
    }

    // Allow print for the .env lines the front end is configured from
    #[allow(clippy::print_stdout)]
    fn print_frontend_env(&self, constants: &ProjectConstants, paths: &ProjectPaths) -> Result<()> {
        let options = FrontendOptions {
            candy_machine_id: self.cli.react_env_candy_machine_id.clone(),
            network: self.cli.env.parse::<Network>()?,
            start_date: self.cli.react_env_start_date.clone(),
            treasury_override: self.cli.override_treasury_address.clone(),
        };
        let env = FrontendEnv::build(
            &options,
            &constants.creator_address,
            &paths.cache(),
            chrono::Utc::now(),
        )?;
        print!("{env}");
        Ok(())
    }
}

/// Project folders live under `working_dir`, relative to the config file
fn resolve_working_dir(config_path: &Path, working_dir: &Path) -> PathBuf {
    if working_dir.is_absolute() {
        return working_dir.to_path_buf();
    }
    config_path
        .parent()
        .map_or_else(|| working_dir.to_path_buf(), |dir| dir.join(working_dir))
}

/// Translation and media-host tables named by the catalog, when present
///
/// # Errors
///
/// Returns the load errors of [`ValueMap::load`].
pub fn load_rewrites(
    config: &ProjectConfig,
    paths: &ProjectPaths,
) -> Result<(Option<ValueMap>, Option<ValueMap>)> {
    let translation = match config.traits.trait_translation.as_deref() {
        Some(name) => ValueMap::load(&paths.translations(), name)?,
        None => None,
    };
    let media_host = match config.traits.trait_media_host.as_deref() {
        Some(name) => ValueMap::load(&paths.media_hosts(), name)?,
        None => None,
    };
    Ok((translation, media_host))
}
