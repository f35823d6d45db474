use serde::{Deserialize, Serialize};

/// Kind of learning resource attached to an answer.
///
/// The wire spelling is `"ppt"` for slide decks and `"video"` for videos.
/// Anything else is outside the closed set and gets dropped at validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "ppt")]
    SlideDeck,
    #[serde(rename = "video")]
    Video,
}

impl ResourceKind {
    /// Parse the wire spelling; unknown kinds yield `None` so the caller can
    /// drop the record instead of rejecting the whole answer.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ppt" => Some(Self::SlideDeck),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    /// Call-to-action label shown on the resource card. Derived, never stored.
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Watch Video",
            Self::SlideDeck => "Open PPT",
        }
    }
}

/// A validated learning resource attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: ResourceKind,
    pub url: String,
}

/// Raw resource record as it appears on the wire, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub url: String,
}

impl ResourceRecord {
    /// Validate a raw record into a `Resource`.
    ///
    /// Requires a kind inside the closed set and every field present and
    /// non-empty; otherwise returns `None` and the caller drops the record.
    pub fn validate(self) -> Option<Resource> {
        let kind = ResourceKind::parse(&self.kind)?;

        if self.id.is_empty()
            || self.title.is_empty()
            || self.description.is_empty()
            || self.url.is_empty()
        {
            return None;
        }

        Some(Resource {
            id: self.id,
            title: self.title,
            description: self.description,
            kind,
            url: self.url,
        })
    }
}
