//! Reply item types decoded from the service's `answer` array

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

// ============================================================================
// Reply Items
// ============================================================================

/// One typed element of a service answer.
///
/// Decoded from the wire `type` tag once, at the parse boundary. Unrecognized
/// tags keep their raw tag value and remaining fields in `Unknown`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyItem {
    PlainText {
        text: Option<String>,
    },
    OptionQuestion {
        display_content: Option<String>,
        options: Vec<SelectionOption>,
    },
    ProducerCard(Card),
    ProductCard(Card),
    /// Fallback for any other tag; `kind` is the raw `type` value (null when absent)
    Unknown {
        kind: Value,
        fields: Map<String, Value>,
    },
}

/// A selectable answer offered by an option question
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SelectionOption {
    #[serde(default, deserialize_with = "lenient_text")]
    pub display_content: Option<String>,
    /// Sent back verbatim as the next user message when the option is chosen
    #[serde(default, deserialize_with = "lenient_payload")]
    pub next_user_query: String,
}

/// Fields shared by producer and product cards
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Card {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub display_content: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub img_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: Option<String>,
}

impl Card {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Image URL, when present and non-empty
    pub fn image(&self) -> Option<&str> {
        self.img_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Call-to-action link, when present and non-empty
    pub fn cta_link(&self) -> Option<&str> {
        self.link.as_deref().filter(|link| !link.is_empty())
    }
}

/// Which card variant a groupable item is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Producer,
    Product,
}

impl CardKind {
    pub fn cta_label(self) -> &'static str {
        match self {
            CardKind::Producer => "View Producer",
            CardKind::Product => "View Product",
        }
    }
}

#[derive(Deserialize)]
struct WirePlainText {
    #[serde(default, deserialize_with = "lenient_text")]
    text: Option<String>,
}

#[derive(Deserialize)]
struct WireOptionQuestion {
    #[serde(default, deserialize_with = "lenient_text")]
    display_content: Option<String>,
    #[serde(default, deserialize_with = "lenient_options")]
    options: Vec<SelectionOption>,
}

impl ReplyItem {
    pub fn plain_text(text: impl Into<String>) -> Self {
        ReplyItem::PlainText {
            text: Some(text.into()),
        }
    }

    /// Wire tag of this item, `None` for an unknown item without a string tag
    pub fn tag(&self) -> Option<&str> {
        match self {
            ReplyItem::PlainText { .. } => Some("plaintext"),
            ReplyItem::OptionQuestion { .. } => Some("optionquestion"),
            ReplyItem::ProducerCard(_) => Some("producercomponent"),
            ReplyItem::ProductCard(_) => Some("productcomponent"),
            ReplyItem::Unknown { kind, .. } => kind.as_str(),
        }
    }

    /// Card-like items cluster into horizontal scroll groups. Decided by tag only.
    pub fn is_groupable(&self) -> bool {
        matches!(self, ReplyItem::ProducerCard(_) | ReplyItem::ProductCard(_))
    }

    pub fn as_card(&self) -> Option<(CardKind, &Card)> {
        match self {
            ReplyItem::ProducerCard(card) => Some((CardKind::Producer, card)),
            ReplyItem::ProductCard(card) => Some((CardKind::Product, card)),
            _ => None,
        }
    }

    /// Decode one element of the `answer` array. Never fails.
    pub fn from_value(value: Value) -> Self {
        let tag = value.get("type").and_then(Value::as_str).map(str::to_owned);
        match tag.as_deref() {
            Some("plaintext") => serde_json::from_value::<WirePlainText>(value.clone())
                .map_or_else(|_| Self::unknown(value), |w| ReplyItem::PlainText { text: w.text }),
            Some("optionquestion") => serde_json::from_value::<WireOptionQuestion>(value.clone())
                .map_or_else(
                    |_| Self::unknown(value),
                    |w| ReplyItem::OptionQuestion {
                        display_content: w.display_content,
                        options: w.options,
                    },
                ),
            Some("producercomponent") => serde_json::from_value::<Card>(value.clone())
                .map_or_else(|_| Self::unknown(value), ReplyItem::ProducerCard),
            Some("productcomponent") => serde_json::from_value::<Card>(value.clone())
                .map_or_else(|_| Self::unknown(value), ReplyItem::ProductCard),
            _ => Self::unknown(value),
        }
    }

    fn unknown(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => {
                let kind = fields.remove("type").unwrap_or(Value::Null);
                ReplyItem::Unknown { kind, fields }
            }
            _ => ReplyItem::Unknown {
                kind: Value::Null,
                fields: Map::new(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for ReplyItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(ReplyItem::from_value)
    }
}

// ============================================================================
// Answer
// ============================================================================

/// The `answer` field of a successful reply
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Items(Vec<ReplyItem>),
    /// `answer` was truthy but not an array
    Unrecognized(Value),
}

impl Answer {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                Answer::Items(items.into_iter().map(ReplyItem::from_value).collect())
            }
            other => Answer::Unrecognized(other),
        }
    }

    pub fn items(&self) -> &[ReplyItem] {
        match self {
            Answer::Items(items) => items,
            Answer::Unrecognized(_) => &[],
        }
    }
}

impl From<Vec<ReplyItem>> for Answer {
    fn from(items: Vec<ReplyItem>) -> Self {
        Answer::Items(items)
    }
}

// ============================================================================
// Lenient field decoding
// ============================================================================

/// Strings pass through; any other JSON value counts as absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_payload<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

/// Arrays decode element-wise, skipping non-object entries; anything else is no options
fn lenient_options<'de, D>(deserializer: D) -> Result<Vec<SelectionOption>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}
