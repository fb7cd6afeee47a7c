//! Parallel conversion of independent files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::{convert_file, default_output_path, ConvertOptions};
use crate::error::Result;
use crate::render::ConversionResult;

/// Outcome of converting one file in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Input file
    pub input: PathBuf,

    /// Conversion result or the error that stopped it
    pub result: Result<ConversionResult>,
}

impl BatchOutcome {
    /// Check if the file converted successfully.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Output path of a batch input: `<dir>/<stem>.docx` when an output
/// directory is given, otherwise next to the input.
pub fn batch_output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    match (out_dir, input.file_stem()) {
        (Some(dir), Some(stem)) => dir.join(format!("{}.docx", stem.to_string_lossy())),
        _ => default_output_path(input),
    }
}

/// Output paths for a whole batch, one per input.
///
/// Inputs that would land on the same file (same stem from different
/// directories) get a numeric suffix: `plan.docx`, `plan-2.docx`, ...
pub fn plan_outputs(inputs: &[PathBuf], out_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let base = batch_output_path(input, out_dir);
            let mut candidate = base.clone();
            let mut n = 2;
            while !taken.insert(candidate.clone()) {
                candidate = numbered_path(&base, n);
                n += 1;
            }
            if candidate != base {
                log::debug!("{} -> {} (name collision)", input.display(), candidate.display());
            }
            candidate
        })
        .collect()
}

fn numbered_path(path: &Path, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}-{}.docx", stem, n))
}

/// Convert several files in parallel.
///
/// Outcomes are returned in input order. A failing file does not stop the
/// others. Every input writes to its own file (see [`plan_outputs`]).
pub fn convert_batch(
    inputs: &[PathBuf],
    out_dir: Option<&Path>,
    options: &ConvertOptions,
) -> Vec<BatchOutcome> {
    convert_batch_with(inputs, out_dir, options, |_| {})
}

/// Convert several files in parallel, calling `on_done` as each finishes.
pub fn convert_batch_with<F>(
    inputs: &[PathBuf],
    out_dir: Option<&Path>,
    options: &ConvertOptions,
    on_done: F,
) -> Vec<BatchOutcome>
where
    F: Fn(&BatchOutcome) + Sync,
{
    log::info!("Converting {} files", inputs.len());
    let outputs = plan_outputs(inputs, out_dir);
    inputs
        .par_iter()
        .zip(outputs.par_iter())
        .map(|(input, output)| {
            let outcome = BatchOutcome {
                input: input.clone(),
                result: convert_file(input, Some(output.as_path()), options),
            };
            if let Err(ref e) = outcome.result {
                log::warn!("{}: {}", input.display(), e);
            }
            on_done(&outcome);
            outcome
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_output_path() {
        assert_eq!(
            batch_output_path(Path::new("a/plan.md"), Some(Path::new("out"))),
            PathBuf::from("out/plan.docx")
        );
        assert_eq!(
            batch_output_path(Path::new("a/plan.md"), None),
            PathBuf::from("a/plan.docx")
        );
    }

    #[test]
    fn test_plan_outputs_disambiguates_stems() {
        let inputs = vec![
            PathBuf::from("a/plan.md"),
            PathBuf::from("b/plan.md"),
            PathBuf::from("c/plan.md"),
            PathBuf::from("a/other.md"),
        ];
        let outputs = plan_outputs(&inputs, Some(Path::new("out")));
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/plan.docx"),
                PathBuf::from("out/plan-2.docx"),
                PathBuf::from("out/plan-3.docx"),
                PathBuf::from("out/other.docx"),
            ]
        );
    }

    #[test]
    fn test_plan_outputs_without_dir_keeps_inputs_apart() {
        let inputs = vec![PathBuf::from("a/plan.md"), PathBuf::from("b/plan.md")];
        let outputs = plan_outputs(&inputs, None);
        assert_eq!(
            outputs,
            vec![PathBuf::from("a/plan.docx"), PathBuf::from("b/plan.docx")]
        );
    }

    #[test]
    fn test_missing_inputs_do_not_abort() {
        let inputs = vec![PathBuf::from("missing-1.md"), PathBuf::from("missing-2.md")];
        let outcomes = convert_batch(&inputs, None, &ConvertOptions::default());
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.is_ok()));
        assert_eq!(outcomes[1].input, PathBuf::from("missing-2.md"));
    }
}
