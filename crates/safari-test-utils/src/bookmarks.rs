//! Builders for `Bookmarks.plist`-shaped JSON, as `plutil -convert json`
//! would print it.
//!
//! ```rust
//! use safari_test_utils::bookmarks::{folder, leaf, root};
//!
//! let tree = root(vec![folder("BookmarksBar", vec![leaf("Google", "https://google.com")])]);
//! assert!(tree.to_string().contains("WebBookmarkTypeLeaf"));
//! ```

use serde_json::{Value, json};

/// Untitled top-level folder
pub fn root(children: Vec<Value>) -> Value {
    json!({
        "WebBookmarkType": "WebBookmarkTypeList",
        "Children": children,
    })
}

pub fn folder(title: &str, children: Vec<Value>) -> Value {
    json!({
        "WebBookmarkType": "WebBookmarkTypeList",
        "Title": title,
        "Children": children,
    })
}

/// Bookmark with its display title in `URIDictionary`, as Safari stores it
pub fn leaf(title: &str, url: &str) -> Value {
    json!({
        "WebBookmarkType": "WebBookmarkTypeLeaf",
        "URLString": url,
        "URIDictionary": { "title": title },
    })
}

/// The `com.apple.ReadingList` container
pub fn reading_list(items: Vec<Value>) -> Value {
    folder("com.apple.ReadingList", items)
}

pub fn reading_item(title: &str, url: &str, date_added: Option<&str>) -> Value {
    let mut item = leaf(title, url);
    item["ReadingList"] = match date_added {
        Some(date) => json!({ "DateAdded": date }),
        None => json!({}),
    };
    item
}

/// `count` reading items titled "Item 1".."Item N"
pub fn numbered_reading_items(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|n| {
            reading_item(
                &format!("Item {n}"),
                &format!("https://example.com/{n}"),
                None,
            )
        })
        .collect()
}
