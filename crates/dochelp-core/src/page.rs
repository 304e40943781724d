//! Page token normalization.
//!
//! Page names use underscores and spaces interchangeably. Lookup keys
//! are underscore-separated, so spaces are normalized away before
//! resolution.

/// Canonicalize a page token for lookup.
///
/// When the token contains a path separator, only the final segment is
/// touched (directory names keep their spaces); otherwise all spaces
/// become underscores.
#[must_use]
pub fn normalize(page: &str) -> String {
    if let Some((dir, name)) = page.rsplit_once('/') {
        format!("{dir}/{}", name.replace(' ', "_"))
    } else {
        page.replace(' ', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_name_replaces_all_spaces() {
        assert_eq!(normalize("Draft Line"), "Draft_Line");
        assert_eq!(normalize("A B C"), "A_B_C");
    }

    #[test]
    fn test_path_replaces_final_segment_only() {
        assert_eq!(
            normalize("/home/my user/docs/Draft Line.md"),
            "/home/my user/docs/Draft_Line.md"
        );
        assert_eq!(
            normalize("https://docs.example.com/wiki/Draft Line"),
            "https://docs.example.com/wiki/Draft_Line"
        );
    }

    #[test]
    fn test_already_normalized_is_unchanged() {
        assert_eq!(normalize("Draft_Line"), "Draft_Line");
        assert_eq!(normalize("wiki/Draft_Line"), "wiki/Draft_Line");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }
}
