use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::{Document, KagClient, KagError, cache::Cached, util};

/// The three avatar sizes served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvatarSize {
    Small,
    Medium,
    Large,
}

impl AvatarSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Key of this size in the `/avatar` document.
    pub fn key(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Path suffix of the dedicated `/avatar/{s|m|l}` endpoint.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Small => "s",
            Self::Medium => "m",
            Self::Large => "l",
        }
    }
}

impl fmt::Display for AvatarSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AvatarSize {
    type Err = KagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.key() == s)
            .ok_or_else(|| KagError::unknown_member(s))
    }
}

/// Typed view of a successful `/player/{nick}/avatar` response.
/// Returned by [`Avatar::urls`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash)]
pub struct AvatarSizes {
    pub small: String,
    pub medium: String,
    pub large: String,
}

/// Result of a single-size lookup: the URL when the response has one,
/// otherwise the whole response (for an unknown player, the `statusMessage`
/// document).
#[derive(Debug, Clone, PartialEq)]
pub enum AvatarUrl {
    Url(String),
    Response(Document),
}

impl AvatarUrl {
    fn from_document(size: AvatarSize, document: Document) -> Self {
        let url = document
            .get(size.key())
            .and_then(Value::as_str)
            .map(str::to_owned);
        match url {
            Some(url) => Self::Url(url),
            None => Self::Response(document),
        }
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Response(_) => None,
        }
    }

    pub fn status_message(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Response(document) => util::status_message(document),
        }
    }
}

/// Avatar URLs of a player. Usually reached through
/// [`crate::Player::avatar_mut`].
#[derive(Debug, Clone)]
pub struct Avatar {
    nick: String,
    client: KagClient,
    sizes: Cached,
}

impl Avatar {
    pub fn new(client: KagClient, nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            client,
            sizes: Cached::default(),
        }
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// All three sizes from `/player/{nick}/avatar`, cached after the first call.
    pub async fn sizes(&mut self, force: bool) -> Result<&Document, KagError> {
        let url = self.client.endpoint(&["player", self.nick.as_str(), "avatar"])?;
        self.sizes.load(force, self.client.fetch(url)).await
    }

    pub fn cached_sizes(&self) -> Option<&Document> {
        self.sizes.get()
    }

    /// Without `force`, reads the size out of [`Avatar::sizes`]. With `force`,
    /// asks the dedicated endpoint for that size and leaves the cache alone.
    pub async fn size(&mut self, size: AvatarSize, force: bool) -> Result<AvatarUrl, KagError> {
        let document = if force {
            self.size_response(size).await?
        } else {
            self.sizes(false).await?.clone()
        };
        Ok(AvatarUrl::from_document(size, document))
    }

    pub async fn small(&mut self, force: bool) -> Result<AvatarUrl, KagError> {
        self.size(AvatarSize::Small, force).await
    }

    pub async fn medium(&mut self, force: bool) -> Result<AvatarUrl, KagError> {
        self.size(AvatarSize::Medium, force).await
    }

    pub async fn large(&mut self, force: bool) -> Result<AvatarUrl, KagError> {
        self.size(AvatarSize::Large, force).await
    }

    /// Raw response of `/player/{nick}/avatar/{s|m|l}`. Never cached.
    pub async fn size_response(&self, size: AvatarSize) -> Result<Document, KagError> {
        self.client
            .get_json(&["player", self.nick.as_str(), "avatar", size.suffix()])
            .await
    }

    /// Size lookup by name. Anything but `small`, `medium` or `large` fails
    /// with [`KagError::UnknownMember`].
    pub async fn get(&mut self, name: &str, force: bool) -> Result<AvatarUrl, KagError> {
        let size: AvatarSize = name.parse()?;
        self.size(size, force).await
    }

    pub async fn status_message(&mut self) -> Result<Option<&str>, KagError> {
        Ok(util::status_message(self.sizes(false).await?))
    }

    pub async fn exists(&mut self) -> Result<bool, KagError> {
        Ok(self.status_message().await?.is_none())
    }

    /// `None` when the player does not exist.
    pub async fn urls(&mut self) -> Result<Option<AvatarSizes>, KagError> {
        util::typed(self.sizes(false).await?, "AvatarSizes")
    }
}
