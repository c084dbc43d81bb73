//! Conversion of view models into template values.

use chrono::{DateTime, Utc};

use crate::storage::{AccountInfo, DirectoryEntry, SearchMatch, SharedLink, StorageUsage};
use crate::template::Value;

/// Name shown for the root folder or an unresolvable folder.
pub const ROOT_FOLDER_NAME: &str = "Root folder";

/// Percent-encode a path for use in a query string.
pub fn query_param(path: &str) -> String {
    urlencoding::encode(path).into_owned()
}

/// Timestamp as shown in listings.
pub fn format_modified(modified: &DateTime<Utc>) -> String {
    modified.format("%Y-%m-%d %H:%M").to_string()
}

pub fn account(info: &AccountInfo) -> Value {
    Value::object([
        ("name", Value::from(info.name.as_str())),
        ("email", Value::from(info.email.as_str())),
        ("country", Value::from(info.country.clone())),
        ("profile_photo_url", Value::from(info.profile_photo_url.clone())),
    ])
}

pub fn usage(usage: &StorageUsage) -> Value {
    Value::object([
        ("used", Value::Float(usage.used)),
        ("allocated", Value::Float(usage.allocated)),
        ("free", Value::Float(usage.free)),
        ("used_percentage", Value::Float(usage.used_percentage)),
    ])
}

/// A listing entry. Folder entries carry no size or modification time.
pub fn entry(entry: &DirectoryEntry) -> Value {
    let mut fields = vec![
        ("name", Value::from(entry.name.as_str())),
        ("path", Value::from(entry.path.as_str())),
        ("path_query", Value::from(query_param(&entry.path))),
        ("is_folder", Value::Bool(entry.is_folder)),
    ];

    if let Some(file) = &entry.file {
        fields.push(("size", Value::from(file.size)));
        fields.push(("size_mb", Value::Float(file.size_mb)));
        fields.push((
            "modified",
            Value::from(file.modified.as_ref().map(format_modified)),
        ));
    }

    Value::object(fields)
}

pub fn shared_link(link: &SharedLink) -> Value {
    Value::object([
        ("url", Value::from(link.url.as_str())),
        ("name", Value::from(link.name.as_str())),
        ("path", Value::from(link.path.clone())),
    ])
}

pub fn search_match(m: &SearchMatch) -> Value {
    Value::object([
        ("name", Value::from(m.name.as_str())),
        ("path", Value::from(m.path.as_str())),
        ("path_query", Value::from(query_param(&m.path))),
        ("is_folder", Value::Bool(m.is_folder)),
        ("match_type", Value::from(m.match_type.as_str())),
    ])
}

pub fn list<T>(items: &[T], f: impl Fn(&T) -> Value) -> Value {
    Value::List(items.iter().map(f).collect())
}
