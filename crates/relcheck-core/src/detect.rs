//! Project type detection.
//!
//! Classifies a project directory by probing for marker files in a fixed
//! priority cascade. Detection only checks file existence — it never reads
//! content, runs tools, or fails.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use relcheck_core::detect;
//!
//! let ty = detect::detect_project_type(Utf8Path::new("."));
//! println!("detected: {ty}");
//! ```

use camino::Utf8Path;
use tracing::{debug, instrument};

use crate::ecosystem::ProjectType;

/// Detect the project type for `project_root`.
///
/// The cascade order is significant and fixed — first match wins. A
/// directory carrying both a plugin manifest and a `go.mod` is a
/// claude-plugin. An unrecognized layout resolves to [`ProjectType::Generic`]
/// rather than failing.
#[instrument(fields(root = %project_root))]
pub fn detect_project_type(project_root: &Utf8Path) -> ProjectType {
    for ty in ProjectType::ALL {
        for marker in ty.marker_files() {
            if project_root.join(marker).is_file() {
                debug!(%ty, marker, "matched ecosystem marker");
                return *ty;
            }
        }
    }

    if project_root.join(".git").exists() {
        debug!("no ecosystem markers, git directory present");
    } else {
        debug!("no ecosystem markers");
    }
    ProjectType::Generic
}

/// Check whether a binary is available on `PATH`.
pub fn has_binary(name: &str) -> bool {
    which::which(name).is_ok()
}
