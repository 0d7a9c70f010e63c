//! Author entity, projections and creation payload.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::book::BookForCreation;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub genre: String,
}

/// Externally-facing author shape: full name and age instead of the raw
/// name parts and date of birth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub genre: String,
}

impl AuthorDto {
    /// Entity-to-DTO projection; pure, no ambient mapping registry.
    pub fn from_entity(author: &Author) -> Self {
        Self::project(author, Utc::now().date_naive())
    }

    /// Projection with an explicit clock, so tests get a fixed age.
    pub fn project(author: &Author, today: NaiveDate) -> Self {
        Self {
            id: author.id,
            name: format!("{} {}", author.first_name, author.last_name),
            age: age_in_years(author.date_of_birth, today),
            genre: author.genre.clone(),
        }
    }
}

fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Payload for creating an author, optionally with an initial set of books
/// persisted in the same transaction.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 50, message = "The first name must be 1 to 50 characters."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "The last name must be 1 to 50 characters."))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, max = 50, message = "The genre must be 1 to 50 characters."))]
    pub genre: String,
    #[serde(default)]
    #[validate(nested)]
    pub books: Vec<BookForCreation>,
}
