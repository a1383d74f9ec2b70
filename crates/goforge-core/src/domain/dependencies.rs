//! Dependency resolution: from selected imports to go.mod requirements.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{error::DomainError, manifest::Manifest, request::GenerateRequest};

/// Modules every generated project requires.
pub const BASELINE_MODULES: [&str; 3] = [
    "github.com/google/uuid",
    "github.com/sirupsen/logrus",
    "github.com/spf13/viper",
];

/// Deduplicated, lexicographically sorted module references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencySet(BTreeSet<String>);

impl DependencySet {
    /// Collect the framework's and each selected library's imports, normalize
    /// them, and add the baseline.
    pub fn resolve(request: &GenerateRequest, manifest: &Manifest) -> Result<Self, DomainError> {
        let framework = manifest.framework(&request.framework)?;
        let mut imports: Vec<&str> = framework.imports.iter().map(String::as_str).collect();

        for lib in request.selected_libs() {
            imports.extend(manifest.lib(&lib)?.imports.iter().map(String::as_str));
        }

        Ok(Self::from_imports(imports))
    }

    /// Normalize raw import paths and add the baseline modules.
    pub fn from_imports<'a>(imports: impl IntoIterator<Item = &'a str>) -> Self {
        let mut modules: BTreeSet<String> = imports.into_iter().map(module_path).collect();
        modules.extend(BASELINE_MODULES.iter().map(|m| m.to_string()));
        Self(modules)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.0.contains(module)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Reduce an import path to the module that provides it.
///
/// - A trailing `v<digits>` segment marks a major-version module path, kept
///   whole: `github.com/redis/go-redis/v9`.
/// - Otherwise a host-qualified path (contains a dot, two or more segments)
///   keeps at most its first three segments:
///   `github.com/segmentio/kafka-go/compress` becomes
///   `github.com/segmentio/kafka-go`.
/// - Anything else is returned as is.
///
/// The three-segment cut approximates "repository root". Modules whose root
/// is deeper than three segments without a version suffix are truncated
/// wrongly; every import in the shipped manifest is pinned by tests.
pub fn module_path(import: &str) -> String {
    let segments: Vec<&str> = import.split('/').collect();

    if let Some(last) = segments.last() {
        if is_major_version(last) {
            return import.to_string();
        }
    }

    if import.contains('.') && segments.len() >= 2 {
        return segments[..segments.len().min(3)].join("/");
    }

    import.to_string()
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_paths_are_kept_whole() {
        assert_eq!(
            module_path("github.com/redis/go-redis/v9"),
            "github.com/redis/go-redis/v9"
        );
        assert_eq!(
            module_path("github.com/gofiber/fiber/v2"),
            "github.com/gofiber/fiber/v2"
        );
        assert_eq!(
            module_path("github.com/jackc/pgx/v5/pgxpool"),
            "github.com/jackc/pgx"
        );
    }

    #[test]
    fn host_paths_truncate_to_three_segments() {
        assert_eq!(module_path("gorm.io/gorm"), "gorm.io/gorm");
        assert_eq!(module_path("gorm.io/driver/postgres"), "gorm.io/driver/postgres");
        assert_eq!(
            module_path("github.com/labstack/echo/v4/middleware"),
            "github.com/labstack/echo"
        );
        assert_eq!(
            module_path("go.opentelemetry.io/otel/sdk/trace"),
            "go.opentelemetry.io/otel/sdk"
        );
    }

    #[test]
    fn bare_paths_are_untouched() {
        assert_eq!(module_path("context"), "context");
        assert_eq!(module_path("net/http"), "net/http");
        assert_eq!(module_path("v2"), "v2");
        assert_eq!(module_path("example.com"), "example.com");
    }

    #[test]
    fn version_segment_needs_digits() {
        assert!(is_major_version("v10"));
        assert!(!is_major_version("v"));
        assert!(!is_major_version("vendor"));
        assert!(!is_major_version("v2beta"));
    }

    #[test]
    fn resolution_is_order_independent_and_deduplicated() {
        let a = DependencySet::from_imports([
            "github.com/gin-gonic/gin",
            "github.com/redis/go-redis/v9",
        ]);
        let b = DependencySet::from_imports([
            "github.com/redis/go-redis/v9",
            "github.com/gin-gonic/gin",
            "github.com/gin-gonic/gin",
        ]);

        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        let sorted = a.to_vec();
        let mut expected = sorted.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn baseline_is_always_present() {
        let set = DependencySet::from_imports([]);
        for module in BASELINE_MODULES {
            assert!(set.contains(module));
        }
    }
}
