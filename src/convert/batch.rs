//! Directory batch conversion.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::render::{to_json, JsonFormat};

use super::{ExtractorRegistry, OutlineOptions};

/// Result of converting one file.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Input file
    pub input: PathBuf,
    /// Output file (written only on success)
    pub output: PathBuf,
    /// Number of outline entries, or the failure
    pub result: Result<usize>,
}

/// Summary of a batch run, in input-path order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    /// Number of files converted.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Files that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Suffix of outputs written next to a `.json` input of the same stem.
const OUTLINE_SUFFIX: &str = ".outline.json";

/// Convert every supported file in `input_dir` to `<stem>.json` in
/// `output_dir`.
///
/// The output directory is created if missing. An output that would replace
/// one of the inputs is written as `<stem>.outline.json` instead. When two
/// inputs still map to the same output, the later one (in path order) fails
/// with `Error::OutputConflict`. A failing file is recorded in the report
/// and does not stop the batch. `on_done` is called after each file, from
/// worker threads when `parallel` is set.
pub fn convert_dir<F>(
    registry: &ExtractorRegistry,
    input_dir: &Path,
    output_dir: &Path,
    options: &OutlineOptions,
    format: JsonFormat,
    parallel: bool,
    on_done: F,
) -> Result<BatchReport>
where
    F: Fn(&BatchOutcome) + Sync,
{
    options.validate()?;
    fs::create_dir_all(output_dir)?;

    let inputs = batch_inputs(registry, input_dir, output_dir)?;
    log::debug!(
        "converting {} files from {} to {}",
        inputs.len(),
        input_dir.display(),
        output_dir.display()
    );
    let jobs = plan_outputs(&inputs, output_dir);

    let convert = |job: &Job| {
        let result = match &job.taken_by {
            Some(first) => Err(Error::OutputConflict {
                output: job.output.clone(),
                first: first.clone(),
            }),
            None => convert_one(registry, &job.input, &job.output, options, format),
        };
        if let Err(e) = &result {
            log::warn!("Failed to convert {}: {}", job.input.display(), e);
        }
        let outcome = BatchOutcome {
            input: job.input.clone(),
            output: job.output.clone(),
            result,
        };
        on_done(&outcome);
        outcome
    };

    let outcomes: Vec<BatchOutcome> = if parallel {
        jobs.par_iter().map(convert).collect()
    } else {
        jobs.iter().map(convert).collect()
    };

    Ok(BatchReport { outcomes })
}

/// Supported files directly inside `input_dir`, sorted by path.
///
/// When `output_dir` is the same directory, earlier `.outline.json` outputs
/// are not inputs.
pub fn batch_inputs(
    registry: &ExtractorRegistry,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let in_place = path_key(input_dir) == path_key(output_dir);
    let mut inputs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| registry.supports(ext));
        let previous_output = in_place
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(OUTLINE_SUFFIX));
        if path.is_file() && supported && !previous_output {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// One planned conversion.
struct Job {
    input: PathBuf,
    output: PathBuf,
    /// Earlier input already assigned `output`
    taken_by: Option<PathBuf>,
}

fn plan_outputs(inputs: &[PathBuf], output_dir: &Path) -> Vec<Job> {
    let input_keys: HashSet<PathBuf> = inputs.iter().map(|p| path_key(p)).collect();
    let mut owners: HashMap<PathBuf, PathBuf> = HashMap::new();

    inputs
        .iter()
        .map(|input| {
            let mut output = output_path_for(input, output_dir, ".json");
            if input_keys.contains(&path_key(&output)) {
                output = output_path_for(input, output_dir, OUTLINE_SUFFIX);
            }
            let taken_by = match owners.entry(path_key(&output)) {
                Entry::Occupied(owner) => Some(owner.get().clone()),
                Entry::Vacant(slot) => {
                    slot.insert(input.clone());
                    None
                }
            };
            Job {
                input: input.clone(),
                output,
                taken_by,
            }
        })
        .collect()
}

fn output_path_for(input: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
    let mut name = input
        .file_stem()
        .unwrap_or(input.as_os_str())
        .to_os_string();
    name.push(suffix);
    output_dir.join(name)
}

/// Absolute form of a path that may not exist yet, for comparing paths.
fn path_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

fn convert_one(
    registry: &ExtractorRegistry,
    input: &Path,
    output: &Path,
    options: &OutlineOptions,
    format: JsonFormat,
) -> Result<usize> {
    let doc = registry.extract(input, options)?;
    fs::write(output, to_json(&doc, format)?)?;
    Ok(doc.outline.len())
}
