//! Fixed layout of the generated Go project and of the template tree.
//!
//! All paths are relative and use `/` separators. Template identifiers are
//! relative to the asset root; output paths are relative to the staging root.

/// Directory every template and fragment must live under.
pub const TEMPLATE_ROOT: &str = "templates/";
pub const TEMPLATE_EXT: &str = ".tmpl";
pub const FRAGMENT_EXT: &str = ".json";
pub const GO_EXT: &str = ".go";

/// Placeholder replaced by the request's module name in metadata imports.
pub const MODULE_NAME_PLACEHOLDER: &str = "{{module_name}}";

/// Go toolchain version written into generated build files.
pub const DEFAULT_GO_VERSION: &str = "1.20";
/// Port the generated service listens on.
pub const DEFAULT_PORT: u16 = 8080;

/// Library whose selection enables the background-job layer.
pub const SCHEDULER_LIB: &str = "cron";
/// Libraries that each get a consumer file in the example layer.
pub const BROKER_LIBS: [&str; 3] = ["rabbitmq", "kafka", "activemq"];
/// Middleware shims rendered for every framework.
pub const MIDDLEWARE_KINDS: [&str; 3] = ["logging", "tracing", "ratelimit"];

pub mod dirs {
    pub const CMD: &str = "cmd";
    pub const DOCS: &str = "docs";
    pub const APP: &str = "internal/app";
    pub const INFRA: &str = "internal/infrastructure";
    pub const DEPS: &str = "internal/deps";
    pub const MIDDLEWARE: &str = "internal/middleware";
    pub const CONFIG: &str = "config";

    pub const DOMAIN: &str = "internal/domain";
    pub const ERRORS: &str = "internal/errors";
    pub const USECASE: &str = "internal/usecase";
    pub const REPOSITORY: &str = "internal/infrastructure/repository";
    pub const MODELS: &str = "internal/infrastructure/repository/models";
    pub const HANDLER: &str = "internal/adapter/handler";
    pub const JOBS: &str = "internal/jobs";
    pub const CONSUMERS: &str = "internal/adapter/consumer";

    /// Created for every project.
    pub const BASE: [&str; 7] = [CMD, DOCS, APP, INFRA, DEPS, MIDDLEWARE, CONFIG];
    /// Added when example code is requested.
    pub const EXAMPLE: [&str; 7] = [DOMAIN, ERRORS, USECASE, REPOSITORY, MODELS, HANDLER, JOBS];
}

pub mod templates {
    pub const DOCKERFILE: &str = "templates/Dockerfile.tmpl";
    pub const GITIGNORE: &str = "templates/gitignore.tmpl";
    pub const ENV_EXAMPLE: &str = "templates/env_example.tmpl";
    pub const README: &str = "templates/README.tmpl";
    pub const MAIN: &str = "templates/cmd/main.tmpl";
    pub const DOCS: &str = "templates/docs/swagger.tmpl";
    pub const GO_MOD: &str = "templates/go_mod.tmpl";

    pub const DOMAIN_ENTITY: &str = "templates/domain/entity.tmpl";
    pub const ERRORS: &str = "templates/errors/errors.tmpl";
    pub const USER_MODEL: &str = "templates/infrastructure/models/user_model.tmpl";
    pub const USER_REPOSITORY: &str = "templates/infrastructure/repository/user_repository.tmpl";
    pub const CACHE_REPOSITORY: &str = "templates/infrastructure/repository/cache_repository.tmpl";
    pub const USER_USECASE: &str = "templates/usecase/user_usecase.tmpl";
    pub const USER_HANDLER: &str = "templates/handler/user_handler.tmpl";
    pub const EXAMPLE_JOB: &str = "templates/jobs/example_job.tmpl";

    pub const SERVER: &str = "templates/app/server.tmpl";
    pub const SERVER_SIMPLE: &str = "templates/app/server_simple.tmpl";
    pub const ROUTES: &str = "templates/app/routes.tmpl";
    pub const ROUTES_SAMPLE: &str = "templates/app/routes_sample.tmpl";
    pub const BOOTSTRAP: &str = "templates/app/bootstrap.tmpl";
    pub const BOOTSTRAP_SAMPLE: &str = "templates/app/bootstrap_sample.tmpl";

    pub const DEPS_DIR: &str = "templates/deps/";
    pub const DEPS: &str = "templates/deps/deps.tmpl";
    pub const DEPS_CONFIG: &str = "templates/deps/config.tmpl";
    pub const DEPS_META: &str = "templates/deps/deps_meta.json";
    pub const CONFIG_META: &str = "templates/deps/config_meta.json";

    /// Templates rendered for every request regardless of selection.
    pub const ALWAYS: [&str; 12] = [
        SERVER_SIMPLE,
        ROUTES_SAMPLE,
        BOOTSTRAP_SAMPLE,
        MAIN,
        DEPS,
        DEPS_CONFIG,
        DOCS,
        GO_MOD,
        DOCKERFILE,
        GITIGNORE,
        ENV_EXAMPLE,
        README,
    ];

    /// Templates rendered whenever example code is requested.
    pub const EXAMPLE: [&str; 10] = [
        DOMAIN_ENTITY,
        ERRORS,
        USER_MODEL,
        USER_REPOSITORY,
        CACHE_REPOSITORY,
        USER_USECASE,
        USER_HANDLER,
        SERVER,
        ROUTES,
        BOOTSTRAP,
    ];
}

pub mod files {
    pub const CONFIG: &str = "config/config.json";
    pub const GO_MOD: &str = "go.mod";
    pub const DOCKERFILE: &str = "Dockerfile";
    pub const GITIGNORE: &str = ".gitignore";
    pub const ENV_EXAMPLE: &str = ".env.example";
    pub const README: &str = "README.md";
    pub const MAIN: &str = "cmd/main.go";
    pub const DOCS: &str = "docs/docs.go";

    pub const SERVER: &str = "internal/app/server.go";
    pub const ROUTES: &str = "internal/app/routes.go";
    pub const BOOTSTRAP: &str = "internal/app/bootstrap.go";
    pub const DEPS: &str = "internal/deps/deps.go";
    pub const DEPS_CONFIG: &str = "internal/deps/config.go";

    pub const DOMAIN_ENTITY: &str = "internal/domain/entity.go";
    pub const ERRORS: &str = "internal/errors/errors.go";
    pub const USER_MODEL: &str = "internal/infrastructure/repository/models/user_model.go";
    pub const USER_REPOSITORY: &str = "internal/infrastructure/repository/user_repository.go";
    pub const CACHE_REPOSITORY: &str = "internal/infrastructure/repository/cache_repository.go";
    pub const USER_USECASE: &str = "internal/usecase/user_usecase.go";
    pub const USER_HANDLER: &str = "internal/adapter/handler/user_handler.go";
    pub const EXAMPLE_JOB: &str = "internal/jobs/example_job.go";
}

/// Middleware template for one framework.
pub fn middleware_template(framework: &str, kind: &str) -> String {
    format!("templates/middleware/{}/{}{}", framework, kind, TEMPLATE_EXT)
}

pub fn middleware_output(kind: &str) -> String {
    format!("{}/{}{}", dirs::MIDDLEWARE, kind, GO_EXT)
}

pub fn consumer_template(broker: &str) -> String {
    format!("templates/consumers/{}_consumer{}", broker, TEMPLATE_EXT)
}

pub fn consumer_output(broker: &str) -> String {
    format!("{}/user_{}_consumer{}", dirs::CONSUMERS, broker, GO_EXT)
}

/// Helper template named by dependency metadata.
pub fn helper_template(file: &str) -> String {
    format!("{}{}", templates::DEPS_DIR, base_name(file))
}

pub fn helper_output(file: &str) -> String {
    format!("{}/{}", dirs::DEPS, go_file_name(file))
}

/// Output path for a framework glue template.
pub fn framework_output(template: &str) -> String {
    format!("{}/{}", dirs::APP, go_file_name(template))
}

/// Output path for a library template; each library gets its own package.
pub fn library_output(lib: &str, template: &str) -> String {
    format!("{}/{}/{}", dirs::INFRA, lib, go_file_name(template))
}

/// `templates/libs/redis/client.tmpl` becomes `client.go`.
pub fn go_file_name(template: &str) -> String {
    let base = base_name(template);
    let stem = base.strip_suffix(TEMPLATE_EXT).unwrap_or(base);
    format!("{}{}", stem, GO_EXT)
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Template identifiers must live under the template root and carry the
/// template extension.
pub fn check_template_path(path: &str) -> Result<(), String> {
    check_resource_path(path, TEMPLATE_EXT, "template path")
}

/// Config fragments must live under the template root and be JSON files.
pub fn check_fragment_path(path: &str) -> Result<(), String> {
    check_resource_path(path, FRAGMENT_EXT, "config section")
}

fn check_resource_path(path: &str, ext: &str, what: &str) -> Result<(), String> {
    if !path.starts_with(TEMPLATE_ROOT) {
        return Err(format!("{} must be under {}: {}", what, TEMPLATE_ROOT, path));
    }
    if !path.ends_with(ext) {
        return Err(format!("{} must end with {}: {}", what, ext, path));
    }
    if path.split('/').any(|segment| segment == "..") || path.contains('\\') {
        return Err(format!("{} must not leave {}: {}", what, TEMPLATE_ROOT, path));
    }
    Ok(())
}
