//! Render edge identity
//!
//! A merged render edge is identified by `(from, to, labels)`. The renderer
//! only understands string ids, so [`EdgeKey::encode`] flattens the key into
//! `from#$#to#$#label1, label2` and [`EdgeKey::decode`] reverses it when the
//! renderer hands an id back for editing.

use imgraph_model::{join_labels, EdgeEdit, LABEL_JOINER};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between the parts of an encoded edge id
pub const EDGE_ID_SEPARATOR: &str = "#$#";

/// Structured identity of a merged render edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    /// Source node name
    pub from: String,
    /// Target node name
    pub to: String,
    /// Labels of all merged relationships, in relationship order
    pub labels: Vec<String>,
}

impl EdgeKey {
    /// Create edge key
    #[inline]
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            labels,
        }
    }

    /// Full, untruncated title: labels joined with `", "`
    #[inline]
    #[must_use]
    pub fn title(&self) -> String {
        join_labels(&self.labels)
    }

    /// Encode as `from#$#to#$#title`
    #[must_use]
    pub fn encode(&self) -> String {
        [self.from.as_str(), self.to.as_str(), self.title().as_str()].join(EDGE_ID_SEPARATOR)
    }

    /// Decode an encoded edge id
    ///
    /// # Errors
    /// Returns [`EdgeIdError::Malformed`] unless the id has exactly three
    /// separator-delimited parts.
    pub fn decode(id: &str) -> Result<Self, EdgeIdError> {
        let parts: Vec<&str> = id.split(EDGE_ID_SEPARATOR).collect();
        let [from, to, title] = parts.as_slice() else {
            return Err(EdgeIdError::Malformed {
                id: id.to_string(),
                parts: parts.len(),
            });
        };

        Ok(Self {
            from: (*from).to_string(),
            to: (*to).to_string(),
            labels: title.split(LABEL_JOINER).map(str::to_string).collect(),
        })
    }

    /// One `(from, to, label)` triple per label
    pub fn triples(&self) -> impl Iterator<Item = EdgeEdit> + '_ {
        self.labels
            .iter()
            .map(move |label| EdgeEdit::new(&self.from, &self.to, label))
    }
}

impl Display for EdgeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for EdgeKey {
    type Err = EdgeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Errors decoding edge ids
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EdgeIdError {
    /// Wrong number of separator-delimited parts
    #[error("malformed edge id '{id}': expected 3 parts, found {parts}")]
    Malformed { id: String, parts: usize },
}
