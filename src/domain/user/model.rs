use serde::Deserialize;

/// One entry of the user list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "userID")]
    pub id: i32,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "roleName", default)]
    pub role_name: Option<String>,
}

impl UserSummary {
    /// Name to show in confirmations: the username, or `ID <n>`
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) => name.clone(),
            None => format!("ID {}", self.id),
        }
    }
}
