use validator::ValidationErrors;

use crate::types::DocId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DocId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for CoreError {
    /// Collapse field-level errors into one message listing the offending
    /// fields in a stable (sorted) order.
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();
        CoreError::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1))]
        title: String,
        #[validate(length(min = 1))]
        issuer: String,
    }

    #[test]
    fn validation_errors_list_fields_sorted() {
        let form = Form {
            title: String::new(),
            issuer: String::new(),
        };
        let err = CoreError::from(form.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation failed: Missing required fields: issuer, title"
        );
    }

    #[test]
    fn not_found_display_includes_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Project",
            id: DocId::new("abc"),
        };
        assert_eq!(err.to_string(), "Entity not found: Project with id abc");
    }
}
