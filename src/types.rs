use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Number;

use crate::sanitize::Sanitizer;

/// A stored bookmark record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub rating: Option<Number>,
}

impl Bookmark {
    /// Returns the record with its free-text fields escaped for output.
    pub fn sanitized(self, sanitizer: &dyn Sanitizer) -> Self {
        Bookmark {
            id: self.id,
            title: sanitizer.sanitize(&self.title),
            url: sanitizer.sanitize(&self.url),
            description: sanitizer.sanitize(&self.description),
            rating: self.rating,
        }
    }
}

/// Fields of a bookmark that passed creation checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: String,
    pub rating: Option<Number>,
}

/// Fields to overwrite on an existing bookmark; `None` leaves the column alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<Number>,
}

impl BookmarkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.rating.is_none()
    }
}

/// Body of `POST /api/bookmarks`. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookmarkBody {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "numeric")]
    pub rating: Option<Number>,
}

/// Body of `PATCH /api/bookmarks/:id`. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookmarkBody {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "numeric")]
    pub rating: Option<Number>,
}

/// Accepts a JSON number or a string holding one, e.g. `4`, `4.5` or `"1"`.
fn numeric<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(Number),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => s
            .trim()
            .parse::<Number>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("rating: {:?} is not a number", s))),
    }
}
