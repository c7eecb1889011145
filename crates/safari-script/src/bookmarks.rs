//! Safari bookmark tree
//!
//! Safari keeps bookmarks and the Reading List in a single property list,
//! `~/Library/Safari/Bookmarks.plist`. Converted to JSON with
//! `plutil -convert json`, it is a tree of dictionaries:
//!
//! ```json
//! {
//!   "WebBookmarkType": "WebBookmarkTypeList",
//!   "Children": [
//!     {
//!       "WebBookmarkType": "WebBookmarkTypeList",
//!       "Title": "BookmarksBar",
//!       "Children": [
//!         {
//!           "WebBookmarkType": "WebBookmarkTypeLeaf",
//!           "URLString": "https://google.com",
//!           "URIDictionary": { "title": "Google" }
//!         }
//!       ]
//!     },
//!     {
//!       "WebBookmarkType": "WebBookmarkTypeList",
//!       "Title": "com.apple.ReadingList",
//!       "Children": [ ... leaves with "ReadingList": { "DateAdded": ... } ... ]
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

/// Title of the folder that holds Reading List items
pub const READING_LIST_TITLE: &str = "com.apple.ReadingList";

/// Folder filter that matches every folder
pub const ALL_FOLDERS: &str = "*";

/// Reading list default item count
pub const DEFAULT_READING_LIST_LIMIT: usize = 50;

pub const READING_LIST_EMPTY: &str = "Reading list is empty";

const UNTITLED: &str = "Untitled";

/// Node type, from the `WebBookmarkType` key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "WebBookmarkTypeList")]
    Folder,
    #[serde(rename = "WebBookmarkTypeLeaf")]
    Leaf,
    /// Proxies (History) and anything Safari adds in future
    #[default]
    #[serde(other)]
    Other,
}

/// One node of the bookmark tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkNode {
    #[serde(rename = "WebBookmarkType", default)]
    pub kind: NodeKind,

    #[serde(rename = "Title")]
    pub title: Option<String>,

    #[serde(rename = "URLString")]
    pub url: Option<String>,

    #[serde(rename = "URIDictionary")]
    pub uri_dictionary: Option<UriDictionary>,

    #[serde(rename = "Children", default)]
    pub children: Vec<BookmarkNode>,

    #[serde(rename = "ReadingList")]
    pub reading_list: Option<ReadingListInfo>,
}

/// Leaf metadata; Safari stores a leaf's display title here
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UriDictionary {
    pub title: Option<String>,
}

/// Reading List metadata attached to Reading List leaves
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingListInfo {
    #[serde(rename = "DateAdded")]
    pub date_added: Option<Value>,
}

impl BookmarkNode {
    /// Parse the JSON rendering of a bookmarks plist
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn is_leaf(&self) -> bool {
        match self.kind {
            NodeKind::Leaf => true,
            NodeKind::Folder => false,
            NodeKind::Other => self.url.is_some(),
        }
    }

    pub fn is_folder(&self) -> bool {
        match self.kind {
            NodeKind::Folder => true,
            NodeKind::Leaf => false,
            NodeKind::Other => self.url.is_none() && !self.children.is_empty(),
        }
    }

    /// Title as a user sees it in Safari.
    ///
    /// Leaves prefer `URIDictionary.title`; the two built-in folders are
    /// stored under internal names and mapped to their menu names.
    pub fn display_title(&self) -> Option<&str> {
        if self.is_leaf()
            && let Some(title) = self.uri_dictionary.as_ref().and_then(|d| d.title.as_deref())
        {
            return Some(title);
        }
        match self.title.as_deref() {
            Some("BookmarksBar") => Some("Favorites Bar"),
            Some("BookmarksMenu") => Some("Bookmarks Menu"),
            other => other,
        }
    }

    /// When the item was added to the Reading List, as text
    pub fn date_added(&self) -> Option<String> {
        match self.reading_list.as_ref()?.date_added.as_ref()? {
            Value::Null => None,
            Value::String(date) => Some(date.clone()),
            other => Some(other.to_string()),
        }
    }

    fn is_reading_list(&self) -> bool {
        self.title.as_deref() == Some(READING_LIST_TITLE)
    }
}

/// Render every bookmark in folders whose title contains `folder`.
///
/// Matching is case-insensitive; [`ALL_FOLDERS`] matches every folder. Each
/// leaf of a matching folder becomes `[<path>] <title>: <url>`, where `path`
/// is the slash-joined chain of folder titles down to the matching folder.
/// Nested folders are visited whether or not their parent matched. The
/// Reading List container is not a bookmark folder and is skipped.
pub fn format_bookmarks(root: &BookmarkNode, folder: &str) -> String {
    let target = folder.to_lowercase();
    let mut path = Vec::new();
    let mut lines = Vec::new();
    collect_bookmarks(root, &target, &mut path, &mut lines);

    if lines.is_empty() {
        format!("No bookmarks found in folder '{folder}'")
    } else {
        lines.join("\n")
    }
}

fn collect_bookmarks<'a>(
    node: &'a BookmarkNode,
    target: &str,
    path: &mut Vec<&'a str>,
    lines: &mut Vec<String>,
) {
    if !node.is_folder() || node.is_reading_list() {
        return;
    }

    let title = node.display_title().filter(|t| !t.is_empty());
    if let Some(title) = title {
        path.push(title);
    }

    if folder_matches(title, target) {
        let location = if path.is_empty() {
            "Bookmarks".to_string()
        } else {
            path.join("/")
        };
        for child in node.children.iter().filter(|c| c.is_leaf()) {
            if let Some(url) = child.url.as_deref() {
                let name = child.display_title().unwrap_or(UNTITLED);
                lines.push(format!("[{location}] {name}: {url}"));
            }
        }
    }

    for child in &node.children {
        collect_bookmarks(child, target, path, lines);
    }

    if title.is_some() {
        path.pop();
    }
}

fn folder_matches(title: Option<&str>, target: &str) -> bool {
    if target == ALL_FOLDERS {
        return true;
    }
    title.is_some_and(|t| t.to_lowercase().contains(target))
}

/// Render up to `limit` Reading List items.
///
/// The first `limit` children of the Reading List container are considered;
/// each leaf with a URL becomes a block
///
/// ```text
/// - <title>
///   URL: <url>
///   Added: <date>
/// ```
///
/// with the `Added` line omitted when Safari recorded no date.
pub fn format_reading_list(root: &BookmarkNode, limit: usize) -> String {
    let entries: Vec<String> = find_reading_list(root)
        .map(|list| {
            list.children
                .iter()
                .take(limit)
                .filter_map(reading_list_entry)
                .collect()
        })
        .unwrap_or_default();

    if entries.is_empty() {
        READING_LIST_EMPTY.to_string()
    } else {
        entries.join("\n\n")
    }
}

fn find_reading_list(node: &BookmarkNode) -> Option<&BookmarkNode> {
    if node.is_reading_list() {
        return Some(node);
    }
    node.children.iter().find_map(find_reading_list)
}

fn reading_list_entry(node: &BookmarkNode) -> Option<String> {
    if !node.is_leaf() {
        return None;
    }
    let url = node.url.as_deref()?;
    let title = node.display_title().unwrap_or(UNTITLED);

    let mut entry = format!("- {title}\n  URL: {url}");
    if let Some(date) = node.date_added() {
        entry.push_str(&format!("\n  Added: {date}"));
    }
    Some(entry)
}
