use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputNotFound,
    InputReadFailed,
    InputParseFailed,
    InputShapeInvalid,

    NameInvalid,
    NameCollision,

    OutputWriteFailed,

    ConfigInvalid,

    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InputNotFound => "input.not_found",
            ErrorCode::InputReadFailed => "input.read_failed",
            ErrorCode::InputParseFailed => "input.parse_failed",
            ErrorCode::InputShapeInvalid => "input.shape_invalid",

            ErrorCode::NameInvalid => "name.invalid",
            ErrorCode::NameCollision => "name.collision",

            ErrorCode::OutputWriteFailed => "output.write_failed",

            ErrorCode::ConfigInvalid => "config.invalid",

            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDetails {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDetails {
    pub path: String,
    pub found: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidNameDetails {
    pub group: String,
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionDetails {
    pub collisions: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::InputNotFound
    }

    pub fn input_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::InputNotFound,
            format!("Input file not found: {}", path),
            to_details(PathDetails { path, error: None }),
        )
        .with_hint("Deploy the stacks with an outputs file first, or drop --fail-on-missing")
    }

    pub fn input_read_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        Self::new(
            ErrorCode::InputReadFailed,
            format!("Failed to read {}: {}", path, error),
            to_details(PathDetails {
                path,
                error: Some(error),
            }),
        )
    }

    pub fn input_parse_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        Self::new(
            ErrorCode::InputParseFailed,
            format!("Failed to parse {}: {}", path, error),
            to_details(PathDetails {
                path,
                error: Some(error),
            }),
        )
    }

    pub fn input_shape_invalid(path: impl Into<String>, found: impl Into<String>) -> Self {
        let path = path.into();
        let found = found.into();
        Self::new(
            ErrorCode::InputShapeInvalid,
            format!("Expected a top-level object in {}, found {}", path, found),
            to_details(ShapeDetails { path, found }),
        )
    }

    pub fn name_invalid(group: impl Into<String>, key: impl Into<String>) -> Self {
        let group = group.into();
        let key = key.into();
        Self::new(
            ErrorCode::NameInvalid,
            format!(
                "Output {}.{} does not produce a usable variable name",
                group, key
            ),
            to_details(InvalidNameDetails { group, key }),
        )
    }

    pub fn name_collision(collisions: BTreeMap<String, Vec<String>>) -> Self {
        let summary = collisions
            .iter()
            .map(|(name, origins)| format!("{} <= {}", name, origins.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(
            ErrorCode::NameCollision,
            format!(
                "{} variable name(s) produced by more than one output: {}",
                collisions.len(),
                summary
            ),
            to_details(CollisionDetails { collisions }),
        )
        .with_hint("Rename the colliding outputs so they differ in letters or digits")
    }

    pub fn output_write_failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        let error = error.into();
        Self::new(
            ErrorCode::OutputWriteFailed,
            format!("Failed to write {}: {}", path, error),
            to_details(PathDetails {
                path,
                error: Some(error),
            }),
        )
    }

    pub fn config_invalid(
        field: impl Into<String>,
        problem: impl Into<String>,
        path: Option<String>,
    ) -> Self {
        let field = field.into();
        let problem = problem.into();
        Self::new(
            ErrorCode::ConfigInvalid,
            format!("Invalid configuration for '{}': {}", field, problem),
            to_details(ConfigInvalidDetails {
                field,
                problem,
                path,
            }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": error.into(),
            "context": context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON serialization failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_strings() {
        assert_eq!(ErrorCode::InputNotFound.as_str(), "input.not_found");
        assert_eq!(ErrorCode::NameCollision.as_str(), "name.collision");
        assert_eq!(ErrorCode::OutputWriteFailed.as_str(), "output.write_failed");
    }

    #[test]
    fn not_found_carries_path_and_hint() {
        let err = Error::input_not_found("cdk-outputs.json");
        assert!(err.is_not_found());
        assert_eq!(err.details["path"], "cdk-outputs.json");
        assert_eq!(err.hints.len(), 1);
        assert_eq!(err.to_string(), "Input file not found: cdk-outputs.json");
    }

    #[test]
    fn collision_lists_every_origin() {
        let mut collisions = BTreeMap::new();
        collisions.insert(
            "A_B".to_string(),
            vec!["A.b".to_string(), "a.B".to_string()],
        );
        let err = Error::name_collision(collisions);

        assert_eq!(err.code, ErrorCode::NameCollision);
        assert!(err.message.contains("A_B <= A.b, a.B"));
        assert_eq!(err.details["collisions"]["A_B"][1], "a.B");
    }

    #[test]
    fn invalid_name_identifies_origin() {
        let err = Error::name_invalid("!!", "??");
        assert_eq!(err.details["group"], "!!");
        assert_eq!(err.details["key"], "??");
        assert!(!err.is_not_found());
    }
}
