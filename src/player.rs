use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::{Document, KagClient, KagError, avatar::Avatar, cache::Cached, role::Role, util};

/// Typed view of a successful `/player/{nick}/info` response.
/// Returned by [`Player::profile`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub username: String,
    pub active: bool,
    pub banned: bool,
    pub gold: bool,
    pub role: i64,
    /// Only present for banned players.
    pub ban_expiration: Option<String>,
    /// Only present for banned players.
    pub ban_reason: Option<String>,
}

/// A King Arthur's Gold player, looked up by nick.
///
/// Info is fetched on first access and cached on the instance; pass
/// `force = true` to [`Player::info`] to refetch. An unknown nick is not an
/// error: the API answers with a `statusMessage` document, see
/// [`Player::exists`].
#[derive(Debug, Clone)]
pub struct Player {
    nick: String,
    client: KagClient,
    avatar: Avatar,
    info: Cached,
}

impl Player {
    pub fn new(client: KagClient, nick: impl Into<String>) -> Self {
        let nick = nick.into();
        Self {
            avatar: Avatar::new(client.clone(), nick.clone()),
            nick,
            client,
            info: Cached::default(),
        }
    }

    /// The nick this player was created with. Not the same as
    /// [`Player::username`], which carries the API's capitalization.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    pub async fn info(&mut self, force: bool) -> Result<&Document, KagError> {
        let url = self.client.endpoint(&["player", self.nick.as_str(), "info"])?;
        self.info.load(force, self.client.fetch(url)).await
    }

    /// The info document if it has been fetched, without touching the network.
    pub fn cached_info(&self) -> Option<&Document> {
        self.info.get()
    }

    pub async fn status_message(&mut self) -> Result<Option<&str>, KagError> {
        Ok(util::status_message(self.info(false).await?))
    }

    pub async fn exists(&mut self) -> Result<bool, KagError> {
        Ok(self.status_message().await?.is_none())
    }

    pub async fn is_active(&mut self) -> Result<Option<bool>, KagError> {
        self.flag("active").await
    }

    pub async fn username(&mut self) -> Result<Option<&str>, KagError> {
        self.text("username").await
    }

    pub async fn is_banned(&mut self) -> Result<Option<bool>, KagError> {
        self.flag("banned").await
    }

    /// Gold accounts are the ones that bought the game.
    pub async fn is_gold(&mut self) -> Result<Option<bool>, KagError> {
        self.flag("gold").await
    }

    /// The raw role code.
    pub async fn role(&mut self) -> Result<Option<i64>, KagError> {
        Ok(self.info(false).await?.get("role").and_then(Value::as_i64))
    }

    /// The role code mapped to a [`Role`]; `None` for codes the API does not assign.
    pub async fn readable_role(&mut self) -> Result<Option<Role>, KagError> {
        Ok(self.role().await?.and_then(Role::from_code))
    }

    pub async fn ban_expiration(&mut self) -> Result<Option<DateTime<Utc>>, KagError> {
        self.text("banExpiration")
            .await?
            .map(parse_timestamp)
            .transpose()
    }

    pub async fn ban_reason(&mut self) -> Result<Option<&str>, KagError> {
        self.text("banReason").await
    }

    /// Any field of the info document by name, for fields without a typed
    /// accessor. Snake_case names also match camelCase keys.
    ///
    /// Fails with [`KagError::UnknownMember`] when the document has no such key.
    pub async fn field(&mut self, name: &str) -> Result<&Value, KagError> {
        util::lookup(self.info(false).await?, name)
    }

    /// `None` when the player does not exist.
    pub async fn profile(&mut self) -> Result<Option<PlayerInfo>, KagError> {
        util::typed(self.info(false).await?, "PlayerInfo")
    }

    async fn flag(&mut self, key: &str) -> Result<Option<bool>, KagError> {
        Ok(self.info(false).await?.get(key).and_then(Value::as_bool))
    }

    async fn text(&mut self, key: &str) -> Result<Option<&str>, KagError> {
        Ok(self.info(false).await?.get(key).and_then(Value::as_str))
    }
}

/// Accepts RFC 3339 as well as the API's `YYYY-MM-DD HH:MM:SS` (taken as UTC).
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, KagError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| KagError::DateTimeParse {
            value: value.to_string(),
        })
}
