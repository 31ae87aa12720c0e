/// Profile model: per-user role and contact details
///
/// Every registered user gets exactly one profile. The profile role decides
/// what the role-gated content listing shows: teachers see drafts, students
/// only see published content.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE profile_role AS ENUM ('teacher', 'student');
///
/// CREATE TABLE profiles (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
///     role profile_role NOT NULL DEFAULT 'student',
///     phone_number VARCHAR(20),
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};

/// Role a user plays across the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    Teacher,
    #[default]
    Student,
}

impl ProfileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::Teacher => "teacher",
            ProfileRole::Student => "student",
        }
    }

    /// Whether unpublished course content is visible to this role
    pub fn sees_unpublished(&self) -> bool {
        matches!(self, ProfileRole::Teacher)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub role: ProfileRole,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProfile {
    pub user_id: i64,
    #[serde(default)]
    pub role: ProfileRole,
    pub phone_number: Option<String>,
    pub description: Option<String>,
}

impl Profile {
    /// Creates the profile inside the registration transaction
    ///
    /// # Errors
    ///
    /// Fails with a unique violation if the user already has a profile.
    pub async fn create_in(
        tx: &mut Transaction<'_, Postgres>,
        data: CreateProfile,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, role, phone_number, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, role, phone_number, description, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.role)
        .bind(data.phone_number)
        .bind(data.description)
        .fetch_one(&mut **tx)
        .await
    }

    /// Finds the profile belonging to a user
    pub async fn find_by_user(pool: &PgPool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, role, phone_number, description, created_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Role of a user, treating a missing profile as a student
    pub async fn role_of(pool: &PgPool, user_id: i64) -> Result<ProfileRole, sqlx::Error> {
        Ok(Self::find_by_user(pool, user_id)
            .await?
            .map(|profile| profile.role)
            .unwrap_or_default())
    }
}
