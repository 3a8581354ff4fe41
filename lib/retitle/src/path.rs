/// Lexically normalize a path to an absolute, `/`-separated form.
///
/// Backslashes count as separators, `.` segments are dropped and `..` pops the
/// previous segment (never above the root). The filesystem is not consulted, so
/// paths recorded by a remote server on another machine normalize the same way.
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// True when `item_path` is `root` itself or lies somewhere beneath it.
///
/// Comparison is per path segment: `/data/ShowsExtra` is not under `/data/Shows`.
pub fn matches(item_path: &str, root: &str) -> bool {
    let item = normalize(item_path);
    let root = normalize(root);
    if root == "/" {
        return true;
    }
    item == root
        || item
            .strip_prefix(&root)
            .is_some_and(|rest| rest.starts_with('/'))
}
