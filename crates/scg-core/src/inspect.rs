//! Best-effort derivation of JVM parameters from an output directory.

use std::path::{Component, Path};

use log::debug;

use crate::params::JvmParams;

/// Gradle build descriptors, in lookup order.
pub const GRADLE_BUILD_FILES: [&str; 2] = ["build.gradle.kts", "build.gradle"];

/// Source roots after which directory names form the package.
const SOURCE_ROOTS: [&str; 2] = ["java", "kotlin"];

/// Derives default JVM parameters for an output directory.
///
/// Implementations must not fail: a missing or unreadable directory yields
/// empty strings.
pub trait DirectoryInspector {
    fn inspect(&self, dir: &Path) -> JvmParams;
}

/// Inspector backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsInspector;

impl DirectoryInspector for FsInspector {
    fn inspect(&self, dir: &Path) -> JvmParams {
        let params = JvmParams {
            package_path: package_from_path(dir),
            gradle_build_location: find_gradle_build(dir)
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        };
        debug!("inspected {}: {:?}", dir.display(), params);
        params
    }
}

/// Package name from the directories below the last `java`/`kotlin` root,
/// e.g. `app/src/main/java/com/acme/api` gives `com.acme.api`.
pub fn package_from_path(dir: &Path) -> String {
    let parts: Vec<&str> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    match parts.iter().rposition(|p| SOURCE_ROOTS.contains(p)) {
        Some(i) => parts[i + 1..].join("."),
        None => String::new(),
    }
}

/// Nearest Gradle build file in `dir` or one of its ancestors.
pub fn find_gradle_build(dir: &Path) -> Option<std::path::PathBuf> {
    dir.ancestors().find_map(|d| {
        GRADLE_BUILD_FILES
            .iter()
            .map(|name| d.join(name))
            .find(|candidate| candidate.is_file())
    })
}
