use anyhow::{Context, Result, bail};
use tracing::info;

use trade_cli::build::{BuildRequest, run_build, select_presets, write_summary_json};
use trade_cli::types::BuildResult;
use trade_concordance::{CodeConcordance, ReferenceSummary, reference_root};
use trade_core::presets;
use trade_ingest::{LoadPolicy, SourceConfig};
use trade_model::DataType;

use crate::cli::{BuildArgs, DataTypeArg, LoadArg, ReferenceArgs};
use crate::summary::{print_presets, print_reference_summary};

pub fn run_recipes() -> Result<()> {
    print_presets(&presets());
    Ok(())
}

pub fn run_verify_reference(args: &ReferenceArgs) -> Result<ReferenceSummary> {
    let dir = args.reference_dir.clone().unwrap_or_else(reference_root);
    let (_, summary) = CodeConcordance::verify_and_load(&dir)
        .with_context(|| format!("verify reference tables in {}", dir.display()))?;
    print_reference_summary(&summary);
    Ok(summary)
}

pub fn run_build_command(args: &BuildArgs) -> Result<BuildResult> {
    let request = build_request(args)?;
    info!(
        recipes = request.recipes.len(),
        data_types = request.data_types.len(),
        years = request.years.len(),
        "starting build"
    );
    let result = run_build(&request)?;
    if let Some(path) = &args.summary_json {
        write_summary_json(path, &result)?;
    }
    Ok(result)
}

fn build_request(args: &BuildArgs) -> Result<BuildRequest> {
    if args.first_year > args.last_year {
        bail!(
            "first year {} is after last year {}",
            args.first_year,
            args.last_year
        );
    }
    if args.rebuild_cache && !matches!(args.load, LoadArg::CacheOrSource) {
        bail!("--rebuild-cache requires --load cache-or-source");
    }
    let mut source = SourceConfig::new(&args.source_dir);
    if let Some(dir) = &args.cache_dir {
        source = source.with_cache_dir(dir);
    }
    let load_policy = match args.load {
        LoadArg::Source => LoadPolicy::SourceOnly,
        LoadArg::Cache => LoadPolicy::CacheOnly,
        LoadArg::CacheOrSource => LoadPolicy::CacheOrSource {
            rebuild_cache: args.rebuild_cache,
        },
    };
    let data_types = if args.data_types.is_empty() {
        DataType::ALL.to_vec()
    } else {
        args.data_types
            .iter()
            .map(|arg| match arg {
                DataTypeArg::Trade => DataType::Trade,
                DataTypeArg::Export => DataType::Export,
                DataTypeArg::Import => DataType::Import,
            })
            .collect()
    };
    let output_dir = if args.dry_run {
        None
    } else {
        Some(
            args.output_dir
                .clone()
                .unwrap_or_else(|| args.source_dir.join("output")),
        )
    };
    Ok(BuildRequest {
        source,
        load_policy,
        years: (args.first_year..=args.last_year).collect(),
        recipes: select_presets(&args.recipes)?,
        data_types,
        adjustment: args.adjustment.clone(),
        reference_dir: args.reference_dir.clone().unwrap_or_else(reference_root),
        output_dir,
        force: args.force,
    })
}
