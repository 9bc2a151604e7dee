//! # neonchk-cli — Command-Line Front End
//!
//! Provides the `neon-checker` binary.
//!
//! ## Subcommands
//!
//! - `neon-checker disallowed` — report disallowed keys and values.
//! - `neon-checker validate` (alias `check`) — report files that do not
//!   decode and, with `--type strict-scalar`, non-scalar leaves.
//!
//! ```bash
//! neon-checker disallowed app/config --disallowed-keys http:csp \
//!     --disallowed-values http:frames:yes
//! neon-checker validate app/config --type strict-scalar -vv
//! ```
//!
//! The exit status of both subcommands is the number of problems found,
//! capped at 255. Operational errors exit with 1.

pub mod config;
pub mod disallowed;
pub mod output;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to a base directory.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `base` resolves there; otherwise it stays relative to the current
/// directory.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let based = base.join(path);
    if based.exists() {
        based
    } else {
        path.to_path_buf()
    }
}

/// Turn a problem count into a process exit status without wrapping.
pub fn exit_code(count: usize) -> u8 {
    u8::try_from(count).unwrap_or(u8::MAX)
}
