use serde::{Deserialize, Serialize};

/// Job and department label used for creator pseudo-crew rows.
pub const CREATOR_JOB: &str = "Creator";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastAppearance {
    pub person_id: i64,
    pub series_id: i64,
    pub name: String,
    pub character: Option<String>,
    pub billing_order: i32,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewAppearance {
    pub person_id: i64,
    pub series_id: i64,
    pub name: String,
    pub job: String,
    pub department: Option<String>,
    pub profile_path: Option<String>,
}
