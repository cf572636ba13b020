use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name → content or nested directory, in traversal order.
pub type FileTree = IndexMap<String, TreeEntry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    File(String),
    /// A visited directory. Empty when nothing inside it was selected.
    Dir(FileTree),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatFileRecord {
    pub name: String,
    pub content: String,
}

/// Depth-first, pre-order listing of every file in `tree`.
pub fn flatten(tree: &FileTree) -> Vec<FlatFileRecord> {
    let mut records = Vec::new();
    flatten_into(tree, "", &mut records);
    records
}

fn flatten_into(tree: &FileTree, prefix: &str, records: &mut Vec<FlatFileRecord>) {
    for (name, entry) in tree {
        match entry {
            TreeEntry::Dir(children) => {
                flatten_into(children, &format!("{}{}/", prefix, name), records);
            }
            TreeEntry::File(content) => records.push(FlatFileRecord {
                name: format!("{}{}", prefix, name),
                content: content.clone(),
            }),
        }
    }
}

/// Rebuilds a tree from '/'-joined records. Empty directories cannot be
/// recovered.
pub fn unflatten(records: &[FlatFileRecord]) -> FileTree {
    let mut root = FileTree::new();
    for record in records {
        let mut parts: Vec<&str> = record.name.split('/').filter(|p| !p.is_empty()).collect();
        let Some(file_name) = parts.pop() else {
            continue;
        };
        insert_file(&mut root, &parts, file_name, &record.content);
    }
    root
}

fn insert_file(level: &mut FileTree, dirs: &[&str], file_name: &str, content: &str) {
    let Some((dir, rest)) = dirs.split_first() else {
        level.insert(file_name.to_string(), TreeEntry::File(content.to_string()));
        return;
    };
    let entry = level
        .entry(dir.to_string())
        .or_insert_with(|| TreeEntry::Dir(FileTree::new()));
    match entry {
        TreeEntry::Dir(children) => insert_file(children, rest, file_name, content),
        // A file and a directory share a name; the directory wins.
        TreeEntry::File(_) => {
            let mut children = FileTree::new();
            insert_file(&mut children, rest, file_name, content);
            *entry = TreeEntry::Dir(children);
        }
    }
}

/// Drops directories that (recursively) contain no files. Returns the number
/// of directories removed.
pub fn prune_empty_dirs(tree: &mut FileTree) -> usize {
    let mut removed = 0;
    tree.retain(|_, entry| match entry {
        TreeEntry::File(_) => true,
        TreeEntry::Dir(children) => {
            removed += prune_empty_dirs(children);
            if children.is_empty() {
                removed += 1;
                false
            } else {
                true
            }
        }
    });
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content: &str) -> TreeEntry {
        TreeEntry::File(content.to_string())
    }

    fn dir(entries: Vec<(&str, TreeEntry)>) -> TreeEntry {
        TreeEntry::Dir(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn sample() -> FileTree {
        let mut tree = FileTree::new();
        tree.insert("z.py".into(), file("z"));
        tree.insert(
            "pkg".into(),
            dir(vec![
                ("b.py", file("b")),
                ("inner", dir(vec![("c.py", file("c"))])),
                ("a.py", file("a")),
            ]),
        );
        tree.insert("empty".into(), dir(vec![]));
        tree.insert("m.py".into(), file("m"));
        tree
    }

    #[test]
    fn test_flatten_preserves_insertion_order() {
        let names: Vec<String> = flatten(&sample()).into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["z.py", "pkg/b.py", "pkg/inner/c.py", "pkg/a.py", "m.py"]
        );
    }

    #[test]
    fn test_flatten_empty_dir_contributes_nothing() {
        let mut tree = FileTree::new();
        tree.insert("only".into(), dir(vec![("deeper", dir(vec![]))]));
        assert!(flatten(&tree).is_empty());
    }

    #[test]
    fn test_round_trip_ignoring_empty_dirs() {
        let mut tree = sample();
        let records = flatten(&tree);
        assert_eq!(prune_empty_dirs(&mut tree), 1);
        assert_eq!(unflatten(&records), tree);
        assert_eq!(flatten(&unflatten(&records)), records);
    }

    #[test]
    fn test_unflatten_directory_replaces_same_named_file() {
        let records = vec![
            FlatFileRecord {
                name: "pkg".to_string(),
                content: "was a file".to_string(),
            },
            FlatFileRecord {
                name: "pkg/a.py".to_string(),
                content: "a".to_string(),
            },
        ];
        let mut expected = FileTree::new();
        expected.insert("pkg".into(), dir(vec![("a.py", file("a"))]));
        assert_eq!(unflatten(&records), expected);
    }

    #[test]
    fn test_prune_nested_empties() {
        let mut tree = FileTree::new();
        tree.insert("a".into(), dir(vec![("b", dir(vec![("c", dir(vec![]))]))]));
        tree.insert("x.py".into(), file(""));
        assert_eq!(prune_empty_dirs(&mut tree), 3);
        assert_eq!(tree.len(), 1);
    }
}
