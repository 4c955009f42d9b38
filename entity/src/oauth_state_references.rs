//! One row per in-flight OAuth login attempt.
//!
//! The primary key doubles as the OAuth2 `state` parameter handed to the identity
//! provider. Rows are inserted when a login begins and removed when the provider's
//! callback consumes them; they are never updated.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "oauth_state_references")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    /// Where the user is sent back to once the login completes.
    #[sea_orm(column_type = "Text")]
    pub referrer: String,
    #[serde(skip_deserializing)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
