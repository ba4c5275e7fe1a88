use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct User {
    pub email: String,
}

/// Body of `/auth/register` and `/auth/login`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Never print the password, even in debug logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// `/auth/me` answer. Extra profile fields are ignored.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct MeResponse {
    pub email: String,
}

/// What survives a reload in sessionStorage under `"auth"`.
///
/// The credential itself lives in an httpOnly cookie and never lands here.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    #[serde(rename = "isAuthed")]
    pub is_authed: bool,
}
