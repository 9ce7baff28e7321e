// src/extractors/hierarchy.rs

// --- Imports ---
use indexmap::{IndexMap, IndexSet};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::extractors::boundary::{locate_boundary, ColumnBoundary};
use crate::sheet::table::{non_blank, normalize_ellipsis, Table};

// --- Data Structures ---

/// One level of the canonical tree. A node may carry attributes (it was the
/// last level of some row) and children (it was an intermediate level of
/// another row) at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    children: IndexMap<String, Node>,
    attributes: IndexMap<String, String>,
    /// First-insertion order of every key, attribute or child.
    order: IndexSet<String>,
}

impl Node {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Distinct keys at this level, attributes and children together.
    pub fn key_count(&self) -> usize {
        self.order.len()
    }

    pub fn children(&self) -> &IndexMap<String, Node> {
        &self.children
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Child named `name`, created empty if absent.
    pub fn child_mut(&mut self, name: &str) -> &mut Node {
        if !self.order.contains(name) {
            self.order.insert(name.to_string());
        }
        self.children.entry(name.to_string()).or_default()
    }

    /// Walks a path of level names, creating missing levels along the way.
    pub fn descend_mut<'a, I>(&mut self, path: I) -> &mut Node
    where
        I: IntoIterator<Item = &'a str>,
    {
        path.into_iter().fold(self, |node, level| node.child_mut(level))
    }

    /// Follows a path without creating anything.
    #[cfg(test)]
    pub fn get(&self, path: &[&str]) -> Option<&Node> {
        path.iter().try_fold(self, |node, level| node.children.get(*level))
    }

    /// Adds attributes, overwriting same-named ones and keeping the rest.
    pub fn merge_attributes(&mut self, attributes: IndexMap<String, String>) {
        for (key, value) in attributes {
            self.set_attribute(key, value);
        }
    }

    pub fn set_attribute(&mut self, key: String, value: String) {
        if !self.order.contains(&key) {
            self.order.insert(key.clone());
        }
        self.attributes.insert(key, value);
    }

    /// A tree whose root holds exactly one level is framed by that level's
    /// name (e.g. the message envelope); drop the frame.
    pub fn unwrap_single_root(mut self) -> Node {
        if self.children.len() == 1 && self.attributes.is_empty() {
            if let Some((name, only)) = self.children.pop() {
                tracing::debug!("Unwrapping single root level '{}'", name);
                return only;
            }
        }
        self
    }
}

/// Flattened into one JSON object, keys in the order they were first added
/// by any row. A child shadows an attribute of the same name.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;

        for key in &self.order {
            match (self.children.get(key), self.attributes.get(key)) {
                (Some(child), attribute) => {
                    if attribute.is_some() {
                        tracing::warn!("Attribute '{}' is shadowed by a child level of the same name", key);
                    }
                    map.serialize_entry(key, child)?;
                }
                (None, Some(value)) => map.serialize_entry(key, value)?,
                (None, None) => {}
            }
        }
        map.end()
    }
}

// --- Extraction ---

/// Builds the nested level tree from a mapping table.
///
/// Columns between the first titled column and `Source Occurs` name the
/// levels of each row (blank cells skipped); the anchor column and every
/// column after it become attributes of the row's last level. If the
/// boundary cannot be found an empty tree is returned and a warning logged.
pub fn extract_hierarchy(table: &Table) -> Node {
    let boundary = match locate_boundary(&table.columns) {
        Ok(boundary) => boundary,
        Err(e) => {
            tracing::warn!("Could not determine hierarchy columns correctly: {}", e);
            return Node::default();
        }
    };
    tracing::debug!(
        "Hierarchy columns {:?}, attribute columns {:?}",
        &table.columns[boundary.hierarchy()],
        &table.columns[boundary.attributes()]
    );

    let mut root = Node::default();
    let mut skipped = 0usize;

    for row in table.row_indices() {
        let path = hierarchy_path(table, row, &boundary);

        let Some((last, parents)) = path.split_last() else {
            tracing::trace!("Skipping row {} without hierarchy levels", row);
            skipped += 1;
            continue;
        };

        let terminal = root.descend_mut(parents.iter().copied()).child_mut(last);
        terminal.merge_attributes(row_attributes(table, row, &boundary));
    }

    tracing::debug!(
        "Built hierarchy with {} top-level entries ({} rows skipped)",
        root.children.len(),
        skipped
    );
    root.unwrap_single_root()
}

/// Non-blank, trimmed level names of one row, left to right.
fn hierarchy_path<'t>(table: &'t Table, row: usize, boundary: &ColumnBoundary) -> Vec<&'t str> {
    boundary
        .hierarchy()
        .filter_map(|col| table.cell(row, col).and_then(non_blank))
        .collect()
}

/// Attribute-region cells with content; blank cells are left out entirely.
fn row_attributes(table: &Table, row: usize, boundary: &ColumnBoundary) -> IndexMap<String, String> {
    boundary
        .attributes()
        .filter_map(|col| {
            let value = table.cell(row, col).and_then(non_blank)?;
            Some((table.columns[col].clone(), normalize_ellipsis(value)))
        })
        .collect()
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: [&str; 6] = ["", "", "Level1", "Level2", "Source Occurs", "Note"];

    #[test]
    fn test_root_unwrapping() {
        let table = Table::from_strs(
            &COLUMNS,
            &[
                &["", "", "Order", "", "1..1", ""],
                &["", "", "", "Header", "1..1", "envelope"],
            ],
        );
        // Second row has path ["Header"] only, so the root holds two levels.
        let tree = extract_hierarchy(&table);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "Order": { "Source Occurs": "1..1" },
                "Header": { "Source Occurs": "1..1", "Note": "envelope" }
            })
        );

        let nested = Table::from_strs(
            &["L1", "L2", "L3", "Source Occurs"],
            &[&["Root", "A", "", "0..1"], &["Root", "A", "B", "1..n"]],
        );
        let tree = extract_hierarchy(&nested);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({ "A": { "Source Occurs": "0..1", "B": { "Source Occurs": "1..n" } } }),
            "Root frame should be dropped and A should keep both attributes and children"
        );
    }

    #[test]
    fn test_blank_level_cells_are_skipped() {
        let table = Table::from_strs(
            &["L1", "L2", "L3", "Source Occurs"],
            &[&["", "B", "", "1"], &["  ", " C ", "", "2"]],
        );
        let tree = extract_hierarchy(&table);
        assert_eq!(tree.children.len(), 2, "B and C should both be top-level");
        assert_eq!(tree.get(&["B"]).unwrap().attributes["Source Occurs"], "1");
        assert_eq!(tree.get(&["C"]).unwrap().attributes["Source Occurs"], "2", "Level names are trimmed");
    }

    #[test]
    fn test_rows_without_levels_are_dropped() {
        let table = Table::from_strs(
            &["L1", "L2", "Source Occurs", "Note"],
            &[&["", "", "1..1", "orphan"], &["X", "Y", "1", ""], &["Z", "", "1", ""]],
        );
        let tree = extract_hierarchy(&table);
        assert!(tree.get(&["X", "Y"]).is_some());
        assert!(!serde_json::to_string(&tree).unwrap().contains("orphan"));
    }

    #[test]
    fn test_empty_attributes_are_omitted() {
        let table = Table::from_strs(
            &["L1", "Source Occurs", "Note", "Type"],
            &[&["A", "1", "   ", ""], &["B", "1", "", "string"]],
        );
        let tree = extract_hierarchy(&table);
        let a = tree.get(&["A"]).unwrap();
        assert!(!a.attributes.contains_key("Note"), "Whitespace-only cell must not become an attribute");
        assert!(!a.attributes.contains_key("Type"), "Missing cell must not become an attribute");
        assert_eq!(tree.get(&["B"]).unwrap().attributes.get("Type").map(String::as_str), Some("string"));
    }

    #[test]
    fn test_attributes_accumulate_and_later_rows_win() {
        let table = Table::from_strs(
            &["L1", "L2", "Source Occurs", "x", "y"],
            &[
                &["A", "B", "", "1", ""],
                &["A", "B", "", "", "2"],
                &["A", "C", "", "old", ""],
                &["A", "C", "", "new", ""],
                &["Other", "", "1", "", ""],
            ],
        );
        let tree = extract_hierarchy(&table);

        let b = tree.get(&["A", "B"]).unwrap();
        assert_eq!(b.attributes.get("x").map(String::as_str), Some("1"));
        assert_eq!(b.attributes.get("y").map(String::as_str), Some("2"));
        assert_eq!(tree.get(&["A", "C"]).unwrap().attributes["x"], "new");
    }

    #[test]
    fn test_attribute_values_are_trimmed_and_ellipsis_normalized() {
        let table = Table::from_strs(&["L1", "Source Occurs", "Note"], &[&["A", "0..n", "  see \u{2026} below "], &["B", "1", ""]]);
        let tree = extract_hierarchy(&table);
        assert_eq!(tree.get(&["A"]).unwrap().attributes["Note"], "see ... below");
    }

    #[test]
    fn test_boundary_failure_returns_empty_tree() {
        let table = Table::from_strs(&["L1", "L2", "Note"], &[&["A", "B", "x"]]);
        assert!(extract_hierarchy(&table).is_empty());

        let untitled = Table::from_strs(&["", ""], &[&["A", "B"]]);
        assert!(extract_hierarchy(&untitled).is_empty());
    }

    #[test]
    fn test_keys_keep_row_order_across_attributes_and_children() {
        let table = Table::from_strs(
            &["L1", "L2", "Source Occurs", "Note"],
            &[
                &["Root", "", "1", ""],
                &["Root", "Item", "0..n", ""],
                &["Root", "", "", "added later"],
                &["Other", "", "1", ""],
            ],
        );
        let tree = extract_hierarchy(&table);
        let root = tree.get(&["Root"]).unwrap();

        let text = serde_json::to_string(root).unwrap();
        assert_eq!(
            text,
            r#"{"Source Occurs":"1","Item":{"Source Occurs":"0..n"},"Note":"added later"}"#,
            "A later row's attribute should follow the earlier child"
        );
        assert_eq!(root.key_count(), 3);
    }

    #[test]
    fn test_serialization_order_and_shadowing() {
        let mut node = Node::default();
        node.set_attribute("Source Occurs".into(), "1".into());
        node.set_attribute("Item".into(), "attr".into());
        node.child_mut("Item").set_attribute("Type".into(), "string".into());

        let text = serde_json::to_string(&node).unwrap();
        assert_eq!(text, r#"{"Source Occurs":"1","Item":{"Type":"string"}}"#);
    }

    #[test]
    fn test_unwrap_keeps_multi_root_and_attributed_root() {
        let mut two = Node::default();
        two.child_mut("A");
        two.child_mut("B");
        assert_eq!(two.clone().unwrap_single_root(), two);

        let mut one = Node::default();
        one.child_mut("Root").child_mut("A").set_attribute("k".into(), "v".into());
        let unwrapped = one.unwrap_single_root();
        assert_eq!(unwrapped.get(&["A"]).unwrap().attributes["k"], "v");
    }
}
