use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CharacterId;

/// Identity of the saved character a build is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMarker {
    pub id: CharacterId,
    pub created_at: DateTime<Utc>,
}
