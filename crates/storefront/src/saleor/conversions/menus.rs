//! Menu flattening.

use std::collections::HashSet;

use saleor_storefront_core::Menu;

use super::super::queries::{MenuFields, MenuItemFields, MenuTargetFields};

/// Deepest menu nesting level that is flattened.
pub const MAX_MENU_DEPTH: usize = 4;

/// Origin Saleor development instances put into absolute menu URLs.
const DEVELOPMENT_ORIGIN: &str = "http://localhost:8000";

/// Flatten a menu tree into navigation entries.
///
/// Items linking to a collection or category without products are dropped
/// together with their children. Items that resolve to no path are skipped
/// but their children are still visited. Nesting deeper than
/// [`MAX_MENU_DEPTH`] is ignored.
pub fn flatten_menu_items(items: &[MenuItemFields]) -> Vec<Menu> {
    let mut entries = Vec::new();
    flatten_into(items, 1, &mut entries);
    entries
}

fn flatten_into(items: &[MenuItemFields], depth: usize, entries: &mut Vec<Menu>) {
    if depth > MAX_MENU_DEPTH {
        return;
    }

    for item in items {
        if item.category.as_ref().is_some_and(is_empty_target)
            || item.collection.as_ref().is_some_and(is_empty_target)
        {
            continue;
        }

        if let Some(path) = item_path(item) {
            entries.push(Menu {
                title: item.name.clone(),
                path,
            });
        }

        if let Some(children) = &item.children {
            flatten_into(children, depth + 1, entries);
        }
    }
}

fn is_empty_target(target: &MenuTargetFields) -> bool {
    target
        .products
        .as_ref()
        .and_then(|products| products.total_count)
        .unwrap_or(0)
        == 0
}

fn item_path(item: &MenuItemFields) -> Option<String> {
    if let Some(url) = item.url.as_ref().filter(|url| !url.is_empty()) {
        return Some(url.clone());
    }
    if let Some(collection) = &item.collection {
        return Some(format!("/search/{}", collection.slug));
    }
    item.category
        .as_ref()
        .map(|category| format!("/search/{}", category.slug))
}

/// Convert a menu into navigation entries.
///
/// Entries are flattened, deduplicated by path keeping the first occurrence,
/// and development URLs are rewritten to `instance_origin`. With `limit` set
/// only the first entries are kept.
pub fn convert_menu(menu: MenuFields, instance_origin: &str, limit: Option<usize>) -> Vec<Menu> {
    let mut seen = HashSet::new();

    let entries = flatten_menu_items(&menu.items.unwrap_or_default())
        .into_iter()
        .filter(|entry| seen.insert(entry.path.clone()))
        .map(|entry| Menu {
            path: entry.path.replace(DEVELOPMENT_ORIGIN, instance_origin),
            title: entry.title,
        });

    match limit {
        Some(limit) => entries.take(limit).collect(),
        None => entries.collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn item(name: &str, extra: Value) -> Value {
        let mut item = json!({
            "id": format!("item-{name}"),
            "name": name,
            "url": null,
            "collection": null,
            "category": null,
            "page": null,
            "children": []
        });
        if let (Some(item), Some(extra)) = (item.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                item.insert(key.clone(), value.clone());
            }
        }
        item
    }

    fn collection(slug: &str, count: i64) -> Value {
        json!({ "slug": slug, "products": { "totalCount": count } })
    }

    fn items(json: Value) -> Vec<MenuItemFields> {
        serde_json::from_value(json).unwrap()
    }

    fn paths(entries: &[Menu]) -> Vec<&str> {
        entries.iter().map(|entry| entry.path.as_str()).collect()
    }

    #[test]
    fn test_flatten_four_levels_omits_empty_leaf() {
        let tree = items(json!([
            item("Shop", json!({ "url": "/shop", "children": [
                item("Drinks", json!({ "category": collection("drinks", 4), "children": [
                    item("Juice", json!({ "collection": collection("juice", 2), "children": [
                        item("Mango", json!({ "collection": collection("mango", 1) })),
                        item("Kiwi", json!({ "collection": collection("kiwi", 0) }))
                    ] }))
                ] }))
            ] }))
        ]));

        let entries = flatten_menu_items(&tree);

        assert_eq!(
            paths(&entries),
            vec!["/shop", "/search/drinks", "/search/juice", "/search/mango"]
        );
        assert_eq!(entries[3].title, "Mango");
    }

    #[test]
    fn test_empty_target_drops_children() {
        let tree = items(json!([
            item("Empty", json!({ "category": collection("empty", 0), "children": [
                item("Child", json!({ "url": "/child" }))
            ] })),
            item("Missing count", json!({ "collection": { "slug": "x", "products": null } }))
        ]));

        assert!(flatten_menu_items(&tree).is_empty());
    }

    #[test]
    fn test_pathless_item_keeps_children() {
        let tree = items(json!([
            item("Group", json!({ "page": { "slug": "about" }, "children": [
                item("Child", json!({ "url": "/child" }))
            ] }))
        ]));

        assert_eq!(paths(&flatten_menu_items(&tree)), vec!["/child"]);
    }

    #[test]
    fn test_url_wins_over_collection() {
        let tree = items(json!([
            item("Sale", json!({ "url": "/sale", "collection": collection("sale", 3) }))
        ]));

        assert_eq!(paths(&flatten_menu_items(&tree)), vec!["/sale"]);
    }

    #[test]
    fn test_depth_beyond_limit_is_ignored() {
        let tree = items(json!([
            item("1", json!({ "url": "/1", "children": [
                item("2", json!({ "url": "/2", "children": [
                    item("3", json!({ "url": "/3", "children": [
                        item("4", json!({ "url": "/4", "children": [
                            item("5", json!({ "url": "/5" }))
                        ] }))
                    ] }))
                ] }))
            ] }))
        ]));

        assert_eq!(
            paths(&flatten_menu_items(&tree)),
            vec!["/1", "/2", "/3", "/4"]
        );
    }

    fn menu(items: Value) -> MenuFields {
        serde_json::from_value(json!({
            "id": "TWVudTox",
            "slug": "navbar",
            "name": "navbar",
            "items": items
        }))
        .unwrap()
    }

    #[test]
    fn test_convert_menu_dedupes_keeping_first() {
        let entries = convert_menu(
            menu(json!([
                item("First", json!({ "url": "/about" })),
                item("Second", json!({ "url": "/about" })),
                item("Third", json!({ "url": "/contact" }))
            ])),
            "https://shop.example.com",
            None,
        );

        assert_eq!(paths(&entries), vec!["/about", "/contact"]);
        assert_eq!(entries[0].title, "First");
    }

    #[test]
    fn test_convert_menu_rewrites_development_origin() {
        let entries = convert_menu(
            menu(json!([
                item("Docs", json!({ "url": "http://localhost:8000/docs/" }))
            ])),
            "https://shop.example.com",
            None,
        );

        assert_eq!(entries[0].path, "https://shop.example.com/docs/");
    }

    #[test]
    fn test_convert_menu_limit_keeps_first_entries() {
        let entries = convert_menu(
            menu(json!([
                item("A", json!({ "url": "/a" })),
                item("B", json!({ "url": "/b" })),
                item("C", json!({ "url": "/c" })),
                item("D", json!({ "url": "/d" })),
                item("E", json!({ "url": "/e" }))
            ])),
            "https://shop.example.com",
            Some(3),
        );

        assert_eq!(paths(&entries), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_convert_menu_without_items() {
        let entries = convert_menu(menu(Value::Null), "https://shop.example.com", Some(3));
        assert!(entries.is_empty());
    }
}
