//! Run records for `crack --out`.
//!
//! Next to `crack.json` the CLI writes `crack.provenance.json`: the build that
//! ran, the flags it was given and how the search ended. A ranking can then be
//! traced back to the exact run that produced it.

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use enigma::api::{IocBand, LetterTargets, SearchOutcome, SearchStatus};
use serde::Serialize;

/// Build facts, shared by the sidecar and `report`.
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    pub code_rev: String,
    pub version: &'static str,
    pub threads_available: usize,
}

impl BuildInfo {
    pub fn collect() -> Self {
        Self {
            code_rev: code_rev(),
            version: enigma::VERSION,
            threads_available: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

/// Search flags as the operator gave them, after defaults.
#[derive(Clone, Debug, Serialize)]
pub struct CrackParams {
    pub catalog: String,
    pub slots: usize,
    /// `"<slot>=<rotors>"`, slots counted from 1.
    pub slot_rotors: Vec<String>,
    pub reflectors: String,
    /// Fixed ring letters, or `"all"`.
    pub rings: String,
    pub positions: Option<String>,
    pub crib: Option<String>,
    pub crib_offset: Option<usize>,
    pub ngrams: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
    pub x_separated: bool,
    pub min_words: usize,
    pub band: IocBand,
    pub letter_targets: Option<LetterTargets>,
    /// Flag string such as `D-K`.
    pub scorers: String,
    pub top: usize,
    pub threads: Option<usize>,
    pub timeout: Option<f64>,
    pub plugboard: Option<String>,
    pub hill_climb: Option<usize>,
    pub climb_candidates: usize,
}

/// How the search ended, without the full record list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutcomeSummary {
    pub status: SearchStatus,
    pub evaluated: u64,
    pub keyspace_len: u64,
    pub elapsed_secs: f64,
    pub best_key: Option<String>,
    pub best_score: Option<f64>,
}

impl From<&SearchOutcome> for OutcomeSummary {
    fn from(outcome: &SearchOutcome) -> Self {
        let best = outcome.records.first();
        Self {
            status: outcome.status,
            evaluated: outcome.evaluated,
            keyspace_len: outcome.keyspace_len,
            elapsed_secs: outcome.elapsed.as_secs_f64(),
            best_key: best.map(|r| r.key.to_string()),
            best_score: best.map(|r| r.score),
        }
    }
}

#[derive(Serialize)]
struct WrittenBy {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    build: BuildInfo,
    written_by: WrittenBy,
    results: &'a Path,
    params: &'a CrackParams,
    outcome: OutcomeSummary,
}

/// `runs/crack.json` -> `runs/crack.provenance.json`.
pub fn sidecar_path_for(results: &Path) -> PathBuf {
    results.with_extension("provenance.json")
}

/// Write the sidecar of an already written results file.
#[track_caller]
pub fn write_sidecar(
    results: &Path,
    params: &CrackParams,
    outcome: &SearchOutcome,
) -> Result<PathBuf> {
    let caller = Location::caller();
    let doc = Sidecar {
        build: BuildInfo::collect(),
        written_by: WrittenBy {
            file: caller.file(),
            line: caller.line(),
        },
        results,
        params,
        outcome: outcome.into(),
    };
    let path = sidecar_path_for(results);
    let bytes = serde_json::to_vec_pretty(&doc).context("serializing provenance")?;
    std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `GIT_COMMIT` baked in at build time, then from the environment, then the
/// checkout's `HEAD`.
fn code_rev() -> String {
    let set = |s: String| (!s.trim().is_empty()).then_some(s);
    option_env!("GIT_COMMIT")
        .map(str::to_owned)
        .and_then(set)
        .or_else(|| std::env::var("GIT_COMMIT").ok().and_then(set))
        .or_else(git_head)
        .unwrap_or_else(|| "unknown".to_owned())
}

fn git_head() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_owned()).filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enigma::api::{Language, MachineSettings, ScoreRecord, ScorerFlags};
    use serde_json::Value;
    use std::time::Duration;
    use tempfile::tempdir;

    fn params() -> CrackParams {
        CrackParams {
            catalog: "I II III".into(),
            slots: 3,
            slot_rotors: vec!["1=II".into()],
            reflectors: "B".into(),
            rings: "AAA".into(),
            positions: None,
            crib: Some("WEATHER".into()),
            crib_offset: Some(0),
            ngrams: None,
            dictionary: None,
            x_separated: false,
            min_words: 2,
            band: Language::English.band(),
            letter_targets: None,
            scorers: "--K".into(),
            top: 3,
            threads: Some(2),
            timeout: None,
            plugboard: None,
            hill_climb: None,
            climb_candidates: 10,
        }
    }

    fn outcome(records: Vec<ScoreRecord>, status: SearchStatus) -> SearchOutcome {
        SearchOutcome {
            records,
            status,
            evaluated: 42,
            keyspace_len: 17_576,
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn sidecar_sits_next_to_the_results() {
        assert_eq!(
            sidecar_path_for(Path::new("/tmp/runs/crack.json")),
            Path::new("/tmp/runs/crack.provenance.json")
        );
        assert_eq!(
            sidecar_path_for(Path::new("keys")),
            Path::new("keys.provenance.json")
        );
    }

    #[test]
    fn summary_names_the_best_key() {
        let record = ScoreRecord {
            key: MachineSettings::default(),
            score: 0.5,
            flags: ScorerFlags::KNOWN_PLAINTEXT,
            index: 7,
        };
        let summary = OutcomeSummary::from(&outcome(vec![record], SearchStatus::Cancelled));
        assert_eq!(summary.status, SearchStatus::Cancelled);
        assert_eq!(
            summary.best_key.as_deref(),
            Some("I-II-III UKW-B rings AAA start AAA")
        );
        assert_eq!(summary.best_score, Some(0.5));
        assert_eq!(summary.elapsed_secs, 1.5);

        let empty = OutcomeSummary::from(&outcome(Vec::new(), SearchStatus::Completed));
        assert_eq!(empty.best_key, None);
    }

    #[test]
    fn write_sidecar_records_build_params_and_outcome() {
        let dir = tempdir().unwrap();
        let results = dir.path().join("crack.json");
        std::fs::write(&results, "{}").unwrap();
        let path = write_sidecar(
            &results,
            &params(),
            &outcome(Vec::new(), SearchStatus::Completed),
        )
        .unwrap();
        assert_eq!(path, dir.path().join("crack.provenance.json"));

        let doc: Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["results"], results.to_string_lossy().as_ref());
        assert_eq!(doc["params"]["scorers"], "--K");
        assert_eq!(doc["params"]["slot_rotors"][0], "1=II");
        assert_eq!(doc["outcome"]["status"], "Completed");
        assert_eq!(doc["outcome"]["evaluated"], 42);
        assert_eq!(doc["build"]["version"], enigma::VERSION);
        assert!(!doc["build"]["code_rev"].as_str().unwrap().is_empty());
        assert!(doc["written_by"]["file"].as_str().unwrap().ends_with("provenance.rs"));
    }

    #[test]
    fn missing_results_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let results = dir.path().join("absent").join("crack.json");
        let err = write_sidecar(
            &results,
            &params(),
            &outcome(Vec::new(), SearchStatus::Completed),
        )
        .unwrap_err();
        assert!(err.to_string().contains("crack.provenance.json"));
    }
}
