//! Book entity, projections and mutation views.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, FieldViolation};
use crate::models::patch::PatchTarget;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
}

/// Externally-facing book shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_id: Uuid,
}

impl BookDto {
    /// Entity-to-DTO projection; pure, no ambient mapping registry.
    pub fn from_entity(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            description: book.description.clone(),
            author_id: book.author_id,
        }
    }
}

/// Payload for creating a book under an author.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookForCreation {
    #[validate(length(min = 1, max = 100, message = "The title must be 1 to 100 characters."))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "The description must be 1 to 500 characters."
    ))]
    pub description: String,
}

impl BookForCreation {
    /// Field constraints plus the cross-field rule; all violations are
    /// collected into one structured list.
    pub fn check(&self) -> Result<(), AppError> {
        check_book_fields(self, &self.title, &self.description)
    }
}

/// The mutable projection of a book used by full updates and patches.
///
/// `Default` yields empty fields: the starting point when a patch document
/// targets a book that does not exist yet.
#[derive(Debug, Clone, Default, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookForUpdate {
    #[validate(length(min = 1, max = 100, message = "The title must be 1 to 100 characters."))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 500,
        message = "The description must be 1 to 500 characters."
    ))]
    pub description: String,
}

impl BookForUpdate {
    /// Project an existing book into its mutable fields.
    pub fn from_entity(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            description: book.description.clone(),
        }
    }

    /// Field constraints plus the cross-field rule; runs after any patch
    /// sequence has been fully applied.
    pub fn check(&self) -> Result<(), AppError> {
        check_book_fields(self, &self.title, &self.description)
    }
}

fn check_book_fields<V: Validate>(
    payload: &V,
    title: &str,
    description: &str,
) -> Result<(), AppError> {
    let mut details = match payload.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => FieldViolation::from_validation(&errors),
    };
    if title == description {
        details.push(FieldViolation::new(
            "description",
            "The description should be different from the title.",
        ));
    }
    if details.is_empty() {
        Ok(())
    } else {
        Err(AppError::Unprocessable(details))
    }
}

impl PatchTarget for BookForUpdate {
    fn write_field(&mut self, path: &str, value: Option<&Value>) -> Result<(), FieldViolation> {
        let slot = match path {
            "/title" => &mut self.title,
            "/description" => &mut self.description,
            other => {
                return Err(FieldViolation::new(
                    other.to_string(),
                    "Unknown field path; only /title and /description can be patched.",
                ))
            }
        };
        match value {
            Some(v) => {
                *slot = v
                    .as_str()
                    .ok_or_else(|| {
                        FieldViolation::new(path.to_string(), "Expected a string value.")
                    })?
                    .to_string();
            }
            None => slot.clear(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patch::{apply_patch, PatchOpKind, PatchOperation};
    use serde_json::json;

    fn book() -> Book {
        Book {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "The Shining".into(),
            description: "A haunted hotel.".into(),
        }
    }

    #[test]
    fn dto_projection_is_flat() {
        let b = book();
        let dto = BookDto::from_entity(&b);
        assert_eq!(dto.id, b.id);
        assert_eq!(dto.author_id, b.author_id);
        assert_eq!(dto.title, b.title);
    }

    #[test]
    fn update_view_projects_only_mutable_fields() {
        let b = book();
        let view = BookForUpdate::from_entity(&b);
        assert_eq!(view.title, "The Shining");
        assert_eq!(view.description, "A haunted hotel.");
    }

    #[test]
    fn valid_payload_passes() {
        let view = BookForUpdate {
            title: "T".into(),
            description: "D".into(),
        };
        assert!(view.check().is_ok());
    }

    #[test]
    fn description_equal_to_title_is_rejected() {
        let view = BookForUpdate {
            title: "Same".into(),
            description: "Same".into(),
        };
        let err = view.check().unwrap_err();
        assert!(err.is_unprocessable());
    }

    #[test]
    fn empty_fields_are_rejected() {
        let err = BookForUpdate::default().check().unwrap_err();
        match err {
            AppError::Unprocessable(details) => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert!(fields.contains(&"title"));
                assert!(fields.contains(&"description"));
            }
            other => panic!("expected Unprocessable, got {other:?}"),
        }
    }

    #[test]
    fn overlong_title_is_rejected() {
        let view = BookForCreation {
            title: "x".repeat(101),
            description: "fine".into(),
        };
        assert!(view.check().unwrap_err().is_unprocessable());
    }

    #[test]
    fn patch_replaces_description() {
        let mut view = BookForUpdate::from_entity(&book());
        let ops = vec![PatchOperation {
            op: PatchOpKind::Replace,
            path: "/description".into(),
            value: Some(json!("A different summary.")),
        }];
        apply_patch(&mut view, &ops).unwrap();
        assert_eq!(view.description, "A different summary.");
        assert_eq!(view.title, "The Shining");
    }

    #[test]
    fn patch_rejects_foreign_path() {
        let mut view = BookForUpdate::default();
        let ops = vec![PatchOperation {
            op: PatchOpKind::Replace,
            path: "/author_id".into(),
            value: Some(json!("not allowed")),
        }];
        assert!(apply_patch(&mut view, &ops).is_err());
    }

    #[test]
    fn validation_runs_after_full_patch_application() {
        // Intermediate state is invalid (title == description) but the final
        // state is fine; only the final state is validated.
        let mut view = BookForUpdate {
            title: "T".into(),
            description: "D".into(),
        };
        let ops = vec![
            PatchOperation {
                op: PatchOpKind::Replace,
                path: "/description".into(),
                value: Some(json!("T")),
            },
            PatchOperation {
                op: PatchOpKind::Replace,
                path: "/description".into(),
                value: Some(json!("better")),
            },
        ];
        apply_patch(&mut view, &ops).unwrap();
        assert!(view.check().is_ok());
    }
}
