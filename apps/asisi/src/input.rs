//! # Batch Input
//!
//! Loads region batches from JSON.
//!
//! Two document shapes are accepted:
//!
//! - A merged list of region records:
//!   `[{"name": "Patna", "enrollment_volume": 2300, ...}, ...]`
//! - Separate census and activity sources, joined on the normalized
//!   district key:
//!   `{"census": [...], "activity": [...]}`
//!
//! Census rows carry the 2011 population, which is projected to 2025.
//! Centers are taken from the row when present and estimated otherwise.

use asisi_core::{AsisiError, RegionKey, RegionRecord, estimate_centers, project_population};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

// =============================================================================
// INPUT LIMITS
// =============================================================================

/// Maximum input file size (64 MB).
pub const MAX_INPUT_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Maximum number of regions in one batch.
pub const MAX_BATCH_SIZE: usize = 100_000;

// =============================================================================
// DOCUMENT SHAPES
// =============================================================================

/// One district from the census source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensusRow {
    #[serde(default)]
    pub state: Option<String>,
    pub district: String,
    pub population_2011: f64,
    pub rural_households: f64,
    pub urban_households: f64,
    #[serde(default)]
    pub estimated_centers: Option<f64>,
}

/// One district from the activity logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRow {
    #[serde(default)]
    pub state: Option<String>,
    pub district: String,
    #[serde(alias = "enrolment_volume")]
    pub enrollment_volume: f64,
    pub demo_update_volume: f64,
    pub bio_update_volume: f64,
    pub auth_volume: f64,
    pub history_7_days: Vec<f64>,
}

/// Accepted top-level document shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BatchDocument {
    Regions(Vec<RegionRecord>),
    Sources {
        census: Vec<CensusRow>,
        activity: Vec<ActivityRow>,
    },
}

/// A batch ready for scoring.
#[derive(Debug, Clone, Default)]
pub struct LoadedBatch {
    pub records: Vec<RegionRecord>,
    /// Districts present in only one source of a two-source document.
    pub unmatched: Vec<String>,
}

// =============================================================================
// LOADING
// =============================================================================

/// Validate an input path: it must resolve to a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AsisiError> {
    let canonical = path.canonicalize().map_err(|e| {
        AsisiError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(AsisiError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Load and parse a batch file.
pub fn load_batch(path: &Path, people_per_center: f64) -> Result<LoadedBatch, AsisiError> {
    let validated = validate_file_path(path)?;

    let metadata = std::fs::metadata(&validated)
        .map_err(|e| AsisiError::Io(format!("Cannot read file metadata: {}", e)))?;
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(AsisiError::Parse(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }

    let contents = std::fs::read(&validated)
        .map_err(|e| AsisiError::Io(format!("Read file: {}", e)))?;

    tracing::info!("Loading batch from {:?}", validated);
    parse_batch(&contents, people_per_center)
}

/// Parse a batch document from JSON bytes.
pub fn parse_batch(bytes: &[u8], people_per_center: f64) -> Result<LoadedBatch, AsisiError> {
    let document: BatchDocument = serde_json::from_slice(bytes).map_err(|e| {
        AsisiError::Parse(format!(
            "Expected a list of regions or {{\"census\", \"activity\"}} sources: {}",
            e
        ))
    })?;

    let loaded = match document {
        BatchDocument::Regions(records) => LoadedBatch {
            records,
            unmatched: Vec::new(),
        },
        BatchDocument::Sources { census, activity } => {
            join_sources(census, activity, people_per_center)?
        }
    };

    if loaded.records.len() > MAX_BATCH_SIZE {
        return Err(AsisiError::Parse(format!(
            "Region count {} exceeds maximum {}",
            loaded.records.len(),
            MAX_BATCH_SIZE
        )));
    }

    Ok(loaded)
}

/// Inner-join census and activity rows on the normalized district key.
///
/// Output follows activity order. The first census row wins for a repeated
/// key; repeated activity rows are passed through and left to the scorer's
/// duplicate check.
pub fn join_sources(
    census: Vec<CensusRow>,
    activity: Vec<ActivityRow>,
    people_per_center: f64,
) -> Result<LoadedBatch, AsisiError> {
    if !people_per_center.is_finite() || people_per_center <= 0.0 {
        return Err(AsisiError::Config(format!(
            "people_per_center must be positive, got {}",
            people_per_center
        )));
    }

    let mut by_key: BTreeMap<RegionKey, CensusRow> = BTreeMap::new();
    for row in census {
        match by_key.entry(RegionKey::normalize(&row.district)) {
            Entry::Occupied(_) => {
                tracing::warn!("Duplicate census row for '{}', keeping the first", row.district);
            }
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }

    let mut records = Vec::with_capacity(activity.len());
    let mut unmatched = Vec::new();
    let mut matched = BTreeSet::new();

    for row in activity {
        let key = RegionKey::normalize(&row.district);
        let Some(census_row) = by_key.get(&key) else {
            tracing::warn!("No census row for district '{}', skipping", row.district);
            unmatched.push(row.district);
            continue;
        };

        let population_2025 = project_population(census_row.population_2011);
        let estimated_centers = match census_row.estimated_centers {
            Some(centers) => centers,
            None => match estimate_centers(&row.district, population_2025, people_per_center) {
                Ok(centers) => f64::from(centers),
                Err(e) => {
                    // A zero count is rejected later by Intake with the region name.
                    tracing::warn!("Cannot estimate centers for '{}': {}", row.district, e);
                    0.0
                }
            },
        };

        matched.insert(key.clone());
        records.push(RegionRecord {
            name: census_row.district.clone(),
            key: Some(key),
            state: row.state.or_else(|| census_row.state.clone()),
            enrollment_volume: row.enrollment_volume,
            demo_update_volume: row.demo_update_volume,
            bio_update_volume: row.bio_update_volume,
            auth_volume: row.auth_volume,
            rural_households: census_row.rural_households,
            urban_households: census_row.urban_households,
            population_2025,
            estimated_centers,
            history_7_days: row.history_7_days,
        });
    }

    for (_, leftover) in by_key.into_iter().filter(|(k, _)| !matched.contains(k)) {
        tracing::warn!("No activity rows for district '{}', skipping", leftover.district);
        unmatched.push(leftover.district);
    }

    Ok(LoadedBatch { records, unmatched })
}

// =============================================================================
// TESTS
// =============================================================================
