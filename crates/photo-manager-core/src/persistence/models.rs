use serde::{Deserialize, Deserializer, Serialize};

/// Persisted metadata for one ingested photo.
///
/// Built up stage by stage during an ingest run and never modified once
/// appended to a shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoRecord {
    /// Renamed base file name, `{stem}.{hash8}.{ext}`
    pub filename: String,

    /// Public URL of the original
    pub url: String,

    /// Path the image was ingested from
    pub path: String,

    /// Public URL of the thumbnail
    pub thumb_url: String,

    /// Thumbnail base file name
    pub thumb_name: String,

    /// Thumbnail location on disk
    pub thumb_path: String,

    /// Unix timestamp taken when the ingest started
    pub created_at: i64,

    #[serde(deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,

    pub desc: String,

    #[serde(deserialize_with = "whole_kilobytes")]
    pub size_kb: u64,
    pub width: u32,
    pub height: u32,

    /// Lowercase hex content fingerprint, unique across the store
    pub hash: String,

    /// Location of the original after renaming
    pub rename_path: String,
}

impl PhotoRecord {
    /// First eight characters of the fingerprint
    pub fn short_hash(&self) -> &str {
        self.hash.get(..8).unwrap_or(&self.hash)
    }

    /// Best-effort record from a raw shard element whose fields do not all
    /// decode. Text fields and `created_at` are kept; the rest stay default.
    pub fn from_raw(element: &serde_json::Value) -> Self {
        let text = |key: &str| -> String {
            element
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            filename: text("filename"),
            url: text("url"),
            path: text("path"),
            thumb_url: text("thumb_url"),
            thumb_name: text("thumb_name"),
            thumb_path: text("thumb_path"),
            created_at: element
                .get("created_at")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or_default(),
            desc: text("desc"),
            hash: text("hash"),
            rename_path: text("rename_path"),
            ..Default::default()
        }
    }
}

// Older shards store `"tags": null` for untagged photos
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// Older shards store `size_kb` as a float rounded to two places
fn whole_kilobytes<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Kilobytes {
        Whole(u64),
        Fractional(f64),
    }

    Ok(match Option::<Kilobytes>::deserialize(deserializer)? {
        Some(Kilobytes::Whole(kb)) => kb,
        Some(Kilobytes::Fractional(kb)) if kb.is_finite() && kb >= 0.0 => kb as u64,
        Some(Kilobytes::Fractional(kb)) => {
            return Err(serde::de::Error::custom(format!("invalid size_kb {}", kb)))
        }
        None => 0,
    })
}
