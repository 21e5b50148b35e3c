//! Load, adjust and build: the work behind `trade-prep build`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use trade_concordance::CodeConcordance;
use trade_core::transforms::merge_adjustment_data;
use trade_core::{RecipePreset, construct_dataset, load_dataset, preset, presets};
use trade_ingest::{LoadPolicy, SourceConfig, load_adjustment_table};
use trade_model::DataType;
use trade_output::{OutputData, write_output};

use crate::types::{BuildResult, RecipeSummary};

/// Everything a build needs, resolved from CLI flags.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub source: SourceConfig,
    pub load_policy: LoadPolicy,
    pub years: Vec<i32>,
    pub recipes: Vec<RecipePreset>,
    pub data_types: Vec<DataType>,
    pub adjustment: Option<PathBuf>,
    pub reference_dir: PathBuf,
    /// `None` builds without writing.
    pub output_dir: Option<PathBuf>,
    pub force: bool,
}

/// Resolves preset names; an empty list selects every preset.
pub fn select_presets(names: &[String]) -> Result<Vec<RecipePreset>> {
    if names.is_empty() {
        return Ok(presets());
    }
    names
        .iter()
        .map(|name| {
            preset(name).with_context(|| format!("unknown recipe preset '{name}'"))
        })
        .collect()
}

pub fn run_build(request: &BuildRequest) -> Result<BuildResult> {
    if request.years.is_empty() {
        bail!("no years selected");
    }
    let (concordance, _) = CodeConcordance::verify_and_load(&request.reference_dir)
        .with_context(|| format!("load reference tables from {}", request.reference_dir.display()))?;

    let mut dataset = load_dataset(
        &request.source,
        request.years.iter().copied(),
        request.load_policy,
    )
    .context("load source years")?;

    let adjusted_rows = match &request.adjustment {
        Some(path) => {
            let table = load_adjustment_table(path)
                .with_context(|| format!("load adjustment table {}", path.display()))?;
            let affected = merge_adjustment_data(&mut dataset, &table)
                .context("merge adjustment table")?;
            Some(affected)
        }
        None => None,
    };

    let mut recipes = Vec::with_capacity(request.recipes.len() * request.data_types.len());
    for recipe in &request.recipes {
        let config = recipe.config.with_force(request.force);
        for &data_type in &request.data_types {
            let span = info_span!("recipe", name = %recipe.name, data_type = %data_type);
            let _guard = span.enter();
            let started = Instant::now();
            let output = construct_dataset(&dataset, &config, data_type, &concordance)
                .with_context(|| format!("build {} ({data_type})", recipe.name))?;
            let table = OutputData::from_recipe(&output)
                .with_context(|| format!("shape {} ({data_type})", recipe.name))?;
            let path = match &request.output_dir {
                Some(dir) => Some(write_output(dir, &recipe.name, &table).with_context(|| {
                    format!("write {} ({data_type}) to {}", recipe.name, dir.display())
                })?),
                None => None,
            };
            info!(
                rows = output.frame.height(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "recipe built"
            );
            recipes.push(RecipeSummary {
                recipe: recipe.name.clone(),
                data_type,
                rows: output.frame.height(),
                output: path,
                coverage: output.coverage,
                issues: output.quality.issues.len(),
                ledger: output.ledger.entries().to_vec(),
            });
        }
    }

    Ok(BuildResult {
        output_dir: request.output_dir.clone(),
        years: dataset.years().iter().copied().collect(),
        source_rows: dataset.height(),
        adjusted_rows,
        recipes,
    })
}

/// Writes the build summary as pretty JSON.
pub fn write_summary_json(path: &Path, result: &BuildResult) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), result)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
