//! # CLI Command Implementations
//!
//! Each command loads the configuration, calls into `asisi-core` and prints
//! either a text or a JSON rendering.

use asisi::config::AsisiConfig;
use asisi::input::{LoadedBatch, load_batch};
use asisi::report::Report;
use asisi_core::primitives::{CRITICAL_THRESHOLD, WARNING_THRESHOLD};
use asisi_core::AsisiError;
use std::path::{Path, PathBuf};

// =============================================================================
// HELPERS
// =============================================================================

/// Load the configuration and the batch it applies to.
fn load_inputs(
    config_path: Option<&Path>,
    file: &Path,
) -> Result<(AsisiConfig, LoadedBatch), AsisiError> {
    let config = AsisiConfig::load(config_path)?;
    let batch = load_batch(file, config.capacity.people_per_center)?;
    Ok((config, batch))
}

/// Validate an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, AsisiError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Canonicalize parent to resolve ".." and symlinks
    let canonical_parent = parent.canonicalize().map_err(|e| {
        AsisiError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(AsisiError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| AsisiError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SCORE COMMAND
// =============================================================================

/// Score a batch and print the report.
pub fn cmd_score(
    config_path: Option<&Path>,
    json_mode: bool,
    file: &Path,
    seed: Option<u64>,
    top: Option<usize>,
) -> Result<(), AsisiError> {
    let (config, loaded) = load_inputs(config_path, file)?;
    let calculator = config.calculator()?;
    let mut noise = config.noise(seed);

    let batch = calculator.score_batch(&loaded.records, noise.as_mut());

    for exclusion in &batch.excluded {
        tracing::warn!("Excluded '{}': {}", exclusion.region, exclusion.reason);
    }
    tracing::info!(
        "Scored {} regions ({} excluded, {} unmatched) with weights {}",
        batch.regions.len(),
        batch.excluded.len(),
        loaded.unmatched.len(),
        batch.weights_version
    );

    let report = Report::from_batch(&batch, top);
    if json_mode {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Run the exclusion rules of `score` without scoring.
///
/// Fails when any record would be excluded.
pub fn cmd_validate(
    config_path: Option<&Path>,
    json_mode: bool,
    file: &Path,
) -> Result<(), AsisiError> {
    let (config, loaded) = load_inputs(config_path, file)?;
    let calculator = config.calculator()?;

    let failures: Vec<(String, String)> = calculator
        .check_batch(&loaded.records)
        .into_iter()
        .map(|exclusion| (exclusion.region, exclusion.reason))
        .collect();

    if json_mode {
        let output = serde_json::json!({
            "records": loaded.records.len(),
            "valid": loaded.records.len() - failures.len(),
            "unmatched": loaded.unmatched,
            "failures": failures
                .iter()
                .map(|(region, reason)| serde_json::json!({"region": region, "reason": reason}))
                .collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("Batch Validation");
        println!("================");
        println!("File:      {:?}", file);
        println!("Records:   {}", loaded.records.len());
        println!("Valid:     {}", loaded.records.len() - failures.len());
        println!("Unmatched: {}", loaded.unmatched.len());
        for (region, reason) in &failures {
            println!("  {}: {}", region, reason);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(AsisiError::InvalidInput {
            region: format!("{} record(s)", failures.len()),
            field: "batch",
            reason: "failed validation".to_string(),
        })
    }
}

// =============================================================================
// WEIGHTS COMMAND
// =============================================================================

/// Show the active weight set and thresholds.
pub fn cmd_weights(config_path: Option<&Path>, json_mode: bool) -> Result<(), AsisiError> {
    let config = AsisiConfig::load(config_path)?;
    let weights = &config.weights;

    if json_mode {
        let output = serde_json::json!({
            "weights": weights,
            "thresholds": {
                "critical": CRITICAL_THRESHOLD,
                "warning": WARNING_THRESHOLD,
            },
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Stress Weights");
    println!("==============");
    println!("Version:    {}", weights.version);
    println!();
    println!("Load:       {:.2}", weights.load);
    println!("Quality:    {:.2}", weights.quality);
    println!("Resilience: {:.2}", weights.resilience);
    println!("Saturation: {:.2}", weights.saturation);
    println!("Sum:        {:.2}", weights.sum());
    println!();
    println!("Critical:   score > {:.2}", CRITICAL_THRESHOLD);
    println!("Warning:    score > {:.2}", WARNING_THRESHOLD);

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write the default configuration file.
pub fn cmd_init(output: &Path, force: bool) -> Result<(), AsisiError> {
    let validated = validate_output_path(output)?;

    if validated.exists() && !force {
        return Err(AsisiError::Io(format!(
            "Config already exists at {:?}. Use --force to overwrite.",
            validated
        )));
    }

    let text = AsisiConfig::default().to_toml_string()?;
    std::fs::write(&validated, text)
        .map_err(|e| AsisiError::Io(format!("Write config: {}", e)))?;

    tracing::info!("Wrote default configuration to {:?}", validated);
    Ok(())
}
