use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct LoginPayload {
    email_address: String,
    password: String,
}

impl LoginPayload {
    pub fn new(email_address: String, password: String) -> Self {
        LoginPayload {
            email_address,
            password,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionResult {
    pub session_token: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LogoutResult {
    pub logged_out: Option<bool>,
}
