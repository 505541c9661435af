use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static NON_IDENTIFIER_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z0-9]+").expect("static pattern compiles"));

/// Groups whose name starts with this (case-sensitive) get a `CDK_` prefix.
const CDK_GROUP_PREFIX: &str = "Cdk";
const CDK_NAME_PREFIX: &str = "CDK_";

/// Derive the exported variable name for `group.key`.
///
/// `group_key` is upper-cased, every run of characters outside `[A-Z0-9]`
/// collapses to one `_`, and leading/trailing `_` are trimmed. A leading digit
/// gets a `V_` prefix. Groups named `Cdk...` always produce a `CDK_` name.
pub fn normalize(group: &str, key: &str) -> Result<String> {
    let joined = format!("{}_{}", group, key).to_uppercase();
    let collapsed = NON_IDENTIFIER_RUN.replace_all(&joined, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.is_empty() {
        return Err(Error::name_invalid(group, key));
    }

    let mut name = if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("V_{}", trimmed)
    } else {
        trimmed.to_string()
    };

    if group.starts_with(CDK_GROUP_PREFIX) && !name.starts_with(CDK_NAME_PREFIX) {
        name.insert_str(0, CDK_NAME_PREFIX);
    }

    Ok(name)
}
