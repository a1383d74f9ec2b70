use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("project name regex is valid"));

static MODULE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9._-]*/[a-z0-9][a-z0-9._-]*(/[a-z0-9][a-z0-9._-]*)*$")
        .expect("module name regex is valid")
});

const PROJECT_NAME_LEN: std::ops::RangeInclusive<usize> = 1..=50;
const MODULE_NAME_LEN: std::ops::RangeInclusive<usize> = 3..=200;

/// Field-level request rules.
///
/// All checks run before a staging area exists, so a rejected request never
/// touches the filesystem.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        const FIELD: &str = "project_name";

        if name.is_empty() {
            return Err(DomainError::MissingRequiredField { field: FIELD });
        }
        reject_traversal(FIELD, name)?;
        if name.contains('/') {
            return Err(invalid(FIELD, "must not contain '/'"));
        }
        check_length(FIELD, name, PROJECT_NAME_LEN)?;
        if !PROJECT_NAME_RE.is_match(name) {
            return Err(invalid(
                FIELD,
                "only lowercase letters, digits and hyphens are allowed",
            ));
        }
        Ok(())
    }

    pub fn validate_module_name(name: &str) -> Result<(), DomainError> {
        const FIELD: &str = "module_name";

        if name.is_empty() {
            return Err(DomainError::MissingRequiredField { field: FIELD });
        }
        reject_traversal(FIELD, name)?;
        check_length(FIELD, name, MODULE_NAME_LEN)?;
        if !MODULE_NAME_RE.is_match(name) {
            return Err(invalid(
                FIELD,
                "expected a lowercase path like github.com/owner/repo",
            ));
        }
        Ok(())
    }

    pub fn validate_framework(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "framework" });
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> DomainError {
    DomainError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn reject_traversal(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.contains("..") || value.contains('\\') || value.contains('\0') {
        return Err(invalid(field, "path traversal sequences are not allowed"));
    }
    Ok(())
}

fn check_length(
    field: &'static str,
    value: &str,
    bounds: std::ops::RangeInclusive<usize>,
) -> Result<(), DomainError> {
    let len = value.chars().count();
    if !bounds.contains(&len) {
        return Err(DomainError::InvalidField {
            field,
            reason: format!(
                "length must be between {} and {} characters",
                bounds.start(),
                bounds.end()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_names() {
        for ok in ["demo-api", "a", "svc-2", "0-0"] {
            assert!(DomainValidator::validate_project_name(ok).is_ok(), "{ok}");
        }
        for bad in ["My_Project", "demo api", "demo/api", "demo..api", "Demo", "a\0b"] {
            assert!(DomainValidator::validate_project_name(bad).is_err(), "{bad}");
        }
        assert!(DomainValidator::validate_project_name(&"a".repeat(51)).is_err());
        assert!(matches!(
            DomainValidator::validate_project_name(""),
            Err(DomainError::MissingRequiredField { .. })
        ));
    }

    #[test]
    fn module_names() {
        for ok in [
            "example.com/demo-api",
            "github.com/acme/svc",
            "gitlab.com/group/sub/repo",
            "a/b",
        ] {
            assert!(DomainValidator::validate_module_name(ok).is_ok(), "{ok}");
        }
        for bad in [
            "demo",
            "github.com/Acme/svc",
            "/github.com/acme",
            "github.com/acme/",
            "github.com/../etc",
            "github.com\\acme\\svc",
        ] {
            assert!(DomainValidator::validate_module_name(bad).is_err(), "{bad}");
        }
        let long = format!("example.com/{}", "a".repeat(200));
        assert!(DomainValidator::validate_module_name(&long).is_err());
    }

    #[test]
    fn framework_is_required() {
        assert!(DomainValidator::validate_framework("gin").is_ok());
        assert!(DomainValidator::validate_framework(" ").is_err());
    }
}
