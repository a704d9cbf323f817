//! Layer pull coordination.
//!
//! Downloads run on a bounded pool of worker threads, each writing its
//! verified blob to a per-layer staging file. Extraction then runs strictly
//! sequentially in manifest order, so later layers overwrite earlier ones
//! exactly as the overlay semantics require. All workers are joined before
//! extraction begins; an individual layer failure never aborts its siblings
//! and is never retried within a run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use jailbox_common::error::{JailboxError, Result};
use jailbox_common::types::{AuthToken, Digest, ImageReference, LayerOutcome};

use crate::registry::RegistryClient;

/// Aggregate result of a pull: how many layers were attempted and how many
/// were fetched, verified, and extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullSummary {
    /// Number of layers in the manifest.
    pub total: usize,
    /// Number of layers applied to the destination root.
    pub succeeded: usize,
}

/// Tuning knobs for a pull.
#[derive(Debug, Clone, Copy)]
pub struct PullOptions {
    /// Ceiling on simultaneous in-flight downloads.
    pub concurrency: usize,
}

impl Default for PullOptions {
    fn default() -> Self {
        Self {
            concurrency: jailbox_common::constants::DEFAULT_CONCURRENCY,
        }
    }
}

/// Downloads every layer digest and materializes them under `dest_root`.
///
/// # Errors
///
/// Returns an error only for run-level failures (staging directory
/// creation); per-layer failures are recorded in the summary instead.
pub fn pull_layers(
    client: &RegistryClient,
    image: &ImageReference,
    token: &AuthToken,
    digests: &[Digest],
    dest_root: &Path,
    opts: &PullOptions,
) -> Result<PullSummary> {
    let total = digests.len();
    std::fs::create_dir_all(dest_root).map_err(|e| JailboxError::Io {
        path: dest_root.to_path_buf(),
        source: e,
    })?;
    let staging = tempfile::tempdir().map_err(|e| JailboxError::Io {
        path: "<staging>".into(),
        source: e,
    })?;

    // Phase 1: download + verify into staging files, bounded fan-out.
    let jobs: Vec<_> = digests
        .iter()
        .enumerate()
        .map(|(i, digest)| {
            let staged = staging.path().join(format!("layer-{i}.tar.gz"));
            let digest = digest.clone();
            move || {
                tracing::info!(layer = i + 1, total, digest = %digest, "fetching layer");
                download_layer(client, image, token, &digest, &staged)
            }
        })
        .collect();
    let fetched = run_bounded(jobs, opts.concurrency);

    // Phase 2: extract sequentially in manifest order so that
    // last-layer-wins overlay semantics hold.
    let mut outcomes = Vec::with_capacity(total);
    for (i, digest) in digests.iter().enumerate() {
        let succeeded = fetched[i] && extract_staged(&staged_path(staging.path(), i), dest_root);
        if !succeeded {
            tracing::warn!(layer = i + 1, total, digest = %digest, "layer not applied");
        }
        outcomes.push(LayerOutcome {
            digest: digest.clone(),
            succeeded,
        });
    }

    let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
    tracing::info!(succeeded, total, "layer pull finished");
    Ok(PullSummary { total, succeeded })
}

fn staged_path(staging: &Path, index: usize) -> PathBuf {
    staging.join(format!("layer-{index}.tar.gz"))
}

fn download_layer(
    client: &RegistryClient,
    image: &ImageReference,
    token: &AuthToken,
    digest: &Digest,
    staged: &Path,
) -> Result<()> {
    let mut response = client.fetch_blob(image, digest, token)?;
    let mut file = std::fs::File::create(staged).map_err(|e| JailboxError::Io {
        path: staged.to_path_buf(),
        source: e,
    })?;
    let computed = crate::hash::copy_and_hash(&mut response, &mut file)?;
    crate::hash::verify_digest(&computed, digest)
}

fn extract_staged(staged: &Path, dest_root: &Path) -> bool {
    let file = match std::fs::File::open(staged) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %staged.display(), error = %e, "staged layer unreadable");
            return false;
        }
    };
    match crate::extract::extract(file, dest_root) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %staged.display(), error = %e, "layer extraction failed");
            false
        }
    }
}

/// Runs jobs on at most `limit` worker threads, joining them all before
/// returning the per-job success flags in job order.
///
/// Jobs are statically striped across workers; a failed job is logged and
/// recorded, never retried, and never aborts its siblings.
fn run_bounded<F>(jobs: Vec<F>, limit: usize) -> Vec<bool>
where
    F: FnOnce() -> Result<()> + Send,
{
    let total = jobs.len();
    if total == 0 {
        return Vec::new();
    }
    let workers = limit.clamp(1, total);

    let done: Vec<AtomicBool> = (0..total).map(|_| AtomicBool::new(false)).collect();
    let mut buckets: Vec<Vec<(usize, F)>> = (0..workers).map(|_| Vec::new()).collect();
    for (i, job) in jobs.into_iter().enumerate() {
        buckets[i % workers].push((i, job));
    }

    std::thread::scope(|scope| {
        let done = &done;
        for bucket in buckets {
            let _ = scope.spawn(move || {
                for (i, job) in bucket {
                    match job() {
                        Ok(()) => done[i].store(true, Ordering::SeqCst),
                        Err(e) => tracing::warn!(job = i, error = %e, "layer job failed"),
                    }
                }
            });
        }
    });

    done.iter().map(|flag| flag.load(Ordering::SeqCst)).collect()
}
