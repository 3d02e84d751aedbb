//! Bootstrap of the process-wide embedded PostgreSQL cluster.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` by default, which
//! sandboxed runners refuse. When `PG_RUNTIME_DIR` or `PG_DATA_DIR` is
//! missing, both are pointed at fresh directories under the target directory
//! for the duration of the bootstrap. `PG_PASSWORD` is pinned as well so a
//! reused data directory keeps accepting the credentials it was created with.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::ClusterHandle;
use uuid::Uuid;

static PG_EMBED_BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static SHARED_CLUSTER: OnceLock<&'static ClusterHandle> = OnceLock::new();

const MAX_RETRIES: u32 = 3;

/// Base delay between attempts, doubled on each retry.
const RETRY_DELAY_MS: u64 = 500;

const STABLE_PASSWORD: &str = "carmarket_embedded_test";

fn pg_embed_target_dir() -> PathBuf {
    if let Some(target_dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir).join("pg-embed");
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("pg-embed")
}

fn create_unique_pg_embed_dirs() -> Result<(PathBuf, PathBuf), std::io::Error> {
    let unique = format!("bootstrap-{}-{}", std::process::id(), Uuid::new_v4());
    let base = pg_embed_target_dir().join(unique);
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");

    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;

    Ok((runtime_dir, data_dir))
}

/// Whether the bootstrap failure looks like a flaky binary download.
fn is_transient_error(err: &str) -> bool {
    let transient_patterns = [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timeout",
        "timed out",
        "temporarily unavailable",
        "network unreachable",
        "dns error",
        "failed to lookup",
    ];

    let err_lower = err.to_lowercase();
    transient_patterns
        .iter()
        .any(|pattern| err_lower.contains(pattern))
}

/// Environment overrides needed for this bootstrap, if any.
fn bootstrap_overrides() -> Result<Vec<(&'static str, Option<String>)>, String> {
    let mut overrides = Vec::new();
    if std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none() {
        let (runtime_dir, data_dir) =
            create_unique_pg_embed_dirs().map_err(|err| err.to_string())?;
        overrides.push((
            "PG_RUNTIME_DIR",
            Some(runtime_dir.to_string_lossy().into_owned()),
        ));
        overrides.push(("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())));
    }
    if std::env::var_os("PG_PASSWORD").is_none() {
        overrides.push(("PG_PASSWORD", Some(STABLE_PASSWORD.to_owned())));
    }
    Ok(overrides)
}

/// Returns the cluster shared by every suite in this test binary.
///
/// The cluster starts on first use and lives until the process exits.
/// Bootstrap is retried up to [`MAX_RETRIES`] times on transient errors.
#[expect(clippy::print_stderr, reason = "retry notice for CI logs")]
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _bootstrap_guard = PG_EMBED_BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    if let Some(handle) = SHARED_CLUSTER.get() {
        return Ok(handle);
    }

    let overrides = bootstrap_overrides()?;
    let _env_guard = (!overrides.is_empty()).then(|| env_lock::lock_env(overrides));

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(*SHARED_CLUSTER.get_or_init(|| handle)),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt < MAX_RETRIES && is_transient_error(&last_error) {
                    let delay = Duration::from_millis(RETRY_DELAY_MS * (1 << attempt));
                    eprintln!(
                        "pg-embed: transient error on attempt {}/{}, retrying in {delay:?}: {last_error}",
                        attempt + 1,
                        MAX_RETRIES + 1,
                    );
                    std::thread::sleep(delay);
                } else {
                    break;
                }
            }
        }
    }

    Err(last_error)
}
