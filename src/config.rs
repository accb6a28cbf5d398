//! Audit configuration: input locations, extraction patterns, normalization.
//!
//! Every field has a default matching the conventional layout of the audited
//! web application, so an empty `navdrift.yaml` (or none at all) is valid.
//!
//! ```yaml
//! root: ../erp-ui
//! inputs:
//!   module_registry: src/data/appModules.ts
//!   routes: src/App.tsx
//!   menu: src/components/AppsMegaMenu.tsx
//!   files: src/pages/apps
//! retry: extra_only
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::ServiceContext;
use crate::error::AuditError;
use crate::extract::PatternSpec;
use crate::normalize::Normalizer;
use crate::reconcile::RetryPolicy;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "navdrift.yaml";

/// Environment variable overriding the configured root.
pub const ROOT_ENV: &str = "NAVDRIFT_ROOT";

/// Top-level audit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Directory relative input paths resolve against.
    pub root: Option<PathBuf>,
    /// Where each text source lives.
    pub inputs: InputPaths,
    /// Extraction patterns per source.
    pub patterns: Patterns,
    /// Normalizer for the second reconciliation pass.
    pub normalizer: Normalizer,
    /// How implementation file names become keys.
    pub files: FileListing,
    /// Route slugs ignored before comparison (parameterized routes).
    pub route_exclude: Vec<String>,
    /// Which side of each comparison gets the normalized retry.
    pub retry: RetryPolicy,
}

/// Locations of the audited sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputPaths {
    /// Module registry text; always required.
    pub module_registry: PathBuf,
    /// Router configuration text.
    pub routes: Option<PathBuf>,
    /// Navigation menu text.
    pub menu: Option<PathBuf>,
    /// Directory holding one implementation file per module.
    pub files: Option<PathBuf>,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            module_registry: PathBuf::from("src/data/appModules.ts"),
            routes: Some(PathBuf::from("src/App.tsx")),
            menu: Some(PathBuf::from("src/components/AppsMegaMenu.tsx")),
            files: Some(PathBuf::from("src/pages/apps")),
        }
    }
}

/// Extraction patterns, one per text source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Patterns {
    /// Module registry records: `slug` and optionally `name`.
    pub module_registry: PatternSpec,
    /// Route records: `slug`.
    pub route: PatternSpec,
    /// Menu item groups: `name`, block capture.
    pub menu_item: PatternSpec,
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            module_registry: PatternSpec::inline(
                "createModule(",
                r"createModule\(\s*'([^']+)',\s*'([^']+)'",
                &["slug", "name"],
            ),
            route: PatternSpec::inline("<Route", r#"<Route path="/apps/([^"]+)""#, &["slug"]),
            menu_item: PatternSpec::block("items:", r"(?s)items:\s*\[(.*?)\]", "name", ",", "'\""),
        }
    }
}

/// File listing keys: extension stripped, then normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileListing {
    /// Extension of implementation files; other entries are ignored.
    pub extension: String,
    /// Separators stripped from basenames and slugs.
    pub normalizer: Normalizer,
}

impl Default for FileListing {
    fn default() -> Self {
        Self { extension: ".tsx".to_string(), normalizer: Normalizer::new("-_") }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            root: None,
            inputs: InputPaths::default(),
            patterns: Patterns::default(),
            normalizer: Normalizer::default(),
            files: FileListing::default(),
            route_exclude: vec![":slug".to_string()],
            retry: RetryPolicy::ExtraOnly,
        }
    }
}

impl AuditConfig {
    /// Parses a YAML document. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Config`] when the YAML is malformed or carries
    /// unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self, AuditError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| AuditError::Config(e.to_string()))
    }

    /// Serializes the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Config`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, AuditError> {
        serde_yaml::to_string(self).map_err(|e| AuditError::Config(e.to_string()))
    }

    /// Loads the configuration and pins `root` to a concrete directory.
    ///
    /// With an explicit `path` the file must exist. Otherwise
    /// `navdrift.yaml` in `cwd` is used when present, defaults when not.
    /// A relative `root` resolves against the config file's directory; a
    /// missing one becomes that directory (or `cwd`). `root_override`
    /// (from `NAVDRIFT_ROOT`) wins over both.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Config`] when the file cannot be read or parsed.
    pub fn load(
        ctx: &ServiceContext,
        path: Option<&Path>,
        cwd: &Path,
        root_override: Option<PathBuf>,
    ) -> Result<Self, AuditError> {
        let candidate = match path {
            Some(p) => Some(cwd.join(p)),
            None => Some(cwd.join(DEFAULT_CONFIG_FILE)).filter(|p| ctx.fs.exists(p)),
        };

        let (mut config, base) = match candidate {
            Some(file) => {
                let yaml = ctx.fs.read_to_string(&file).map_err(|e| {
                    AuditError::Config(format!("failed to read {}: {e}", file.display()))
                })?;
                debug!(path = %file.display(), "loaded config");
                let base = file.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
                (Self::from_yaml(&yaml)?, base)
            }
            None => (Self::default(), cwd.to_path_buf()),
        };

        config.root = Some(match (root_override, config.root.take()) {
            (Some(root), _) => cwd.join(root),
            (None, Some(root)) => base.join(root),
            (None, None) => base,
        });
        Ok(config)
    }

    /// Resolves an input path against `root`.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryFileSystem;
    use crate::extract::Capture;

    fn ctx_with(files: &[(&str, &str)]) -> ServiceContext {
        let mut fs = InMemoryFileSystem::new();
        for (path, body) in files {
            fs.add_file(path, body);
        }
        ServiceContext::with_fs(Box::new(fs))
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(AuditConfig::from_yaml("").unwrap(), AuditConfig::default());
        assert_eq!(AuditConfig::from_yaml("{}").unwrap(), AuditConfig::default());
    }

    #[test]
    fn defaults_match_conventional_layout() {
        let c = AuditConfig::default();
        assert_eq!(c.inputs.module_registry, PathBuf::from("src/data/appModules.ts"));
        assert_eq!(c.patterns.route.boundary, "<Route");
        assert!(matches!(c.patterns.menu_item.capture, Capture::Block { .. }));
        assert_eq!(c.retry, RetryPolicy::ExtraOnly);
        assert_eq!(c.route_exclude, vec![":slug"]);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "inputs:\n  routes: web/router.tsx\n  menu: null\nretry: symmetric\n";
        let c = AuditConfig::from_yaml(yaml).unwrap();
        assert_eq!(c.inputs.routes, Some(PathBuf::from("web/router.tsx")));
        assert_eq!(c.inputs.menu, None);
        assert_eq!(c.inputs.module_registry, PathBuf::from("src/data/appModules.ts"));
        assert_eq!(c.retry, RetryPolicy::Symmetric);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AuditConfig::from_yaml("inptus: {}\n").unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn yaml_round_trip() {
        let c = AuditConfig::default();
        let back = AuditConfig::from_yaml(&c.to_yaml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn load_without_file_uses_defaults_rooted_at_cwd() {
        let ctx = ctx_with(&[]);
        let c = AuditConfig::load(&ctx, None, Path::new("/work"), None).unwrap();
        assert_eq!(c.root, Some(PathBuf::from("/work")));
        assert_eq!(
            c.resolve(&c.inputs.module_registry),
            PathBuf::from("/work/src/data/appModules.ts")
        );
    }

    #[test]
    fn load_resolves_relative_root_against_config_dir() {
        let ctx = ctx_with(&[("/work/conf/navdrift.yaml", "root: ../app\n")]);
        let c = AuditConfig::load(&ctx, Some(Path::new("conf/navdrift.yaml")), Path::new("/work"), None)
            .unwrap();
        assert_eq!(c.root, Some(PathBuf::from("/work/conf/../app")));
    }

    #[test]
    fn load_picks_up_default_file() {
        let ctx = ctx_with(&[("/work/navdrift.yaml", "retry: symmetric\n")]);
        let c = AuditConfig::load(&ctx, None, Path::new("/work"), None).unwrap();
        assert_eq!(c.retry, RetryPolicy::Symmetric);
    }

    #[test]
    fn root_override_wins() {
        let ctx = ctx_with(&[("/work/navdrift.yaml", "root: elsewhere\n")]);
        let c = AuditConfig::load(&ctx, None, Path::new("/work"), Some(PathBuf::from("/srv/app")))
            .unwrap();
        assert_eq!(c.root, Some(PathBuf::from("/srv/app")));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let ctx = ctx_with(&[]);
        let err = AuditConfig::load(&ctx, Some(Path::new("nope.yaml")), Path::new("/work"), None)
            .unwrap_err();
        assert!(err.to_string().contains("nope.yaml"));
    }
}
