//! Fixtures shared by the HTTP tests.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::MockServer;

use crate::KagClient;

pub fn client_for(server: &MockServer) -> KagClient {
    KagClient::with_base_url(&server.uri()).expect("mock server URI is a valid base")
}

/// Client whose requests give up long before [`SLOW`] responses arrive.
pub fn impatient_client_for(server: &MockServer) -> KagClient {
    KagClient::with_timeout(&server.uri(), Duration::from_millis(200))
        .expect("mock server URI is a valid base")
}

pub const SLOW: Duration = Duration::from_secs(2);

pub fn player_info(username: &str, role: i64) -> Value {
    json!({
        "username": username,
        "active": true,
        "banned": false,
        "gold": true,
        "role": role,
    })
}

pub fn banned_player_info(username: &str) -> Value {
    json!({
        "username": username,
        "active": true,
        "banned": true,
        "gold": false,
        "role": 0,
        "banExpiration": "2022-03-02 09:09:53",
        "banReason": "Speedhacking",
    })
}

pub fn avatar_sizes(id: u32) -> Value {
    json!({
        "small": avatar_url("s", id),
        "medium": avatar_url("m", id),
        "large": avatar_url("l", id),
    })
}

pub fn avatar_url(size: &str, id: u32) -> String {
    format!("https://forum.kag2d.com/data/avatars/{size}/0/{id}.jpg")
}

pub fn not_found() -> Value {
    json!({ "statusMessage": "Player not found" })
}
