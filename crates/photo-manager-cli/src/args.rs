//! Tag and description parsing for the free-form tokens after the image path.

/// Tags and description collected from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub tags: Vec<String>,
    pub desc: String,
}

const TAGS_PREFIX: &str = "tags:";
const DESC_PREFIX: &str = "desc:";

/// Split a comma separated list, trimming each entry and dropping empties
pub fn split_tags(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classify the extra tokens.
///
/// `tags:a,b` and `desc:text` are taken literally. Otherwise a token with a
/// comma is a tag list, a token seen once a description exists is a tag, and
/// the last remaining token becomes the description. Values from `--tags`
/// and `--desc` are applied first.
pub fn parse_annotations(tokens: &[String], flag_tags: &[String], flag_desc: Option<&str>) -> Annotations {
    let mut out = Annotations {
        tags: flag_tags.iter().flat_map(|t| split_tags(t)).collect(),
        desc: flag_desc.map(str::trim).unwrap_or_default().to_string(),
    };

    let last = tokens.len().saturating_sub(1);
    for (i, token) in tokens.iter().enumerate() {
        if let Some(list) = token.strip_prefix(TAGS_PREFIX) {
            out.tags.extend(split_tags(list));
        } else if let Some(desc) = token.strip_prefix(DESC_PREFIX) {
            if !desc.is_empty() {
                out.desc = desc.to_string();
            }
        } else if token.contains(',') {
            out.tags.extend(split_tags(token));
        } else if !out.desc.is_empty() || i != last {
            out.tags.push(token.clone());
        } else {
            out.desc = token.clone();
        }
    }

    out
}
