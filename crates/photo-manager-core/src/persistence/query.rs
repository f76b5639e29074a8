use super::error::StoreResult;
use super::models::PhotoRecord;
use super::store::{is_shard_name, read_shard, RecordStore};

/// Filters for searching the record store. Unset filters match everything;
/// text comparisons ignore case.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    /// Substring of the renamed file name
    pub name: Option<String>,

    /// Substring of any tag
    pub tag: Option<String>,

    /// Substring of the description
    pub desc: Option<String>,

    /// Restrict to one shard, `YYYY-MM`
    pub month: Option<String>,
}

impl RecordQuery {
    pub fn matches(&self, record: &PhotoRecord) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |n| contains_ignore_case(&record.filename, n));
        let tag_ok = self
            .tag
            .as_deref()
            .map_or(true, |t| record.tags.iter().any(|tag| contains_ignore_case(tag, t)));
        let desc_ok = self
            .desc
            .as_deref()
            .map_or(true, |d| contains_ignore_case(&record.desc, d));

        name_ok && tag_ok && desc_ok
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl RecordStore {
    /// Records matching `query`, in shard order then append order
    pub fn query(&self, query: &RecordQuery) -> StoreResult<Vec<PhotoRecord>> {
        let records = match query.month.as_deref() {
            Some(month) => {
                let name = format!("{}.json", month);
                if !is_shard_name(&name) {
                    return Ok(Vec::new());
                }
                read_shard(&self.dir().join(name))?
            }
            None => self.read_all()?,
        };

        Ok(records.into_iter().filter(|r| query.matches(r)).collect())
    }
}
