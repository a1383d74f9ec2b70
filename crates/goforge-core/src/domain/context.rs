//! Typed render contexts.
//!
//! Each template family receives one closed context shape. Every shape
//! embeds [`CommonContext`], so module name, project name, framework and the
//! full `includes` flag set are available to every template.

use serde::Serialize;

use crate::domain::{
    deps_meta::{ConfigBinding, DepBinding},
    includes::Includes,
    request::GenerateRequest,
};

/// Fields shared by every render call of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonContext {
    pub module_name: String,
    pub project_name: String,
    pub framework: String,
    pub architecture: String,
    pub include_example: bool,
    pub includes: Includes,
}

impl CommonContext {
    pub fn new(request: &GenerateRequest, includes: Includes) -> Self {
        Self {
            module_name: request.module_name.clone(),
            project_name: request.project_name.clone(),
            framework: request.framework.clone(),
            architecture: request.architecture.clone(),
            include_example: request.include_example,
            includes,
        }
    }
}

/// Context passed to a template render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RenderContext {
    /// Framework glue, middleware, example layers, app and meta files.
    Project(ProjectContext),
    /// One library's adapter package.
    Library(LibraryContext),
    /// Container build file.
    Container(ContainerContext),
    /// Module descriptor listing every resolved dependency.
    BuildManifest(BuildManifestContext),
    /// The deps container enumerating selected library bindings.
    Dependencies(DependenciesContext),
    /// The config accessor companion of the deps container.
    ConfigAccessor(ConfigAccessorContext),
    /// A per-library helper in the deps package.
    Helper(HelperContext),
}

impl RenderContext {
    pub fn common(&self) -> &CommonContext {
        match self {
            Self::Project(c) => &c.common,
            Self::Library(c) => &c.common,
            Self::Container(c) => &c.common,
            Self::BuildManifest(c) => &c.common,
            Self::Dependencies(c) => &c.common,
            Self::ConfigAccessor(c) => &c.common,
            Self::Helper(c) => &c.common,
        }
    }

    pub fn project(common: &CommonContext) -> Self {
        Self::Project(ProjectContext {
            common: common.clone(),
        })
    }

    pub fn library(common: &CommonContext, lib: &str) -> Self {
        Self::Library(LibraryContext {
            common: common.clone(),
            lib: lib.into(),
        })
    }

    pub fn helper(common: &CommonContext, key: &str) -> Self {
        Self::Helper(HelperContext {
            common: common.clone(),
            key: key.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectContext {
    #[serde(flatten)]
    pub common: CommonContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryContext {
    #[serde(flatten)]
    pub common: CommonContext,
    pub lib: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerContext {
    #[serde(flatten)]
    pub common: CommonContext,
    pub binary_name: String,
    pub port: u16,
    pub go_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildManifestContext {
    #[serde(flatten)]
    pub common: CommonContext,
    pub go_version: String,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependenciesContext {
    #[serde(flatten)]
    pub common: CommonContext,
    pub imports: Vec<String>,
    pub bindings: Vec<DepBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigAccessorContext {
    #[serde(flatten)]
    pub common: CommonContext,
    pub imports: Vec<String>,
    pub fields: Vec<ConfigBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelperContext {
    #[serde(flatten)]
    pub common: CommonContext,
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::manifest::Manifest;

    fn common() -> CommonContext {
        let manifest =
            Manifest::from_json(r#"{"version":"1.0.0","frameworks":{},"libs":{"redis":{}}}"#)
                .unwrap();
        let request = GenerateRequest::new("demo-api", "example.com/demo-api", "gin")
            .with_lib("redis")
            .with_example(true);
        CommonContext::new(&request, Includes::derive(&manifest, &request.libs))
    }

    #[test]
    fn contexts_serialize_flat() {
        let ctx = RenderContext::library(&common(), "redis");
        let json = serde_json::to_value(&ctx).unwrap();

        assert_eq!(json["module_name"], "example.com/demo-api");
        assert_eq!(json["framework"], "gin");
        assert_eq!(json["includes"]["redis"], true);
        assert_eq!(json["include_example"], true);
        assert_eq!(json["lib"], "redis");
    }

    #[test]
    fn container_context_carries_build_settings() {
        let ctx = RenderContext::Container(ContainerContext {
            common: common(),
            binary_name: "demo-api".into(),
            port: 8080,
            go_version: "1.20".into(),
        });
        let json = serde_json::to_value(&ctx).unwrap();

        assert_eq!(json["port"], 8080);
        assert_eq!(json["binary_name"], "demo-api");
        assert_eq!(ctx.common().project_name, "demo-api");
    }
}
