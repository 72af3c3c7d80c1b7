//! Route-requirement table: which permission a path needs.
//!
//! Matching is prefix-based and deterministic: the longest registered
//! prefix that matches wins, and a prefix only matches at a path-segment
//! boundary, so `/api/notes` covers `/api/notes` and `/api/notes/42` but
//! never `/api/notesx`. Paths with no matching prefix have no requirement
//! beyond authentication.

use crate::authz::Permission;

/// Static mapping from path prefixes to required permissions.
#[derive(Debug, Clone, Default)]
pub struct RouteRequirements {
    // Kept sorted by prefix length, longest first.
    entries: Vec<(String, Permission)>,
}

impl RouteRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's compiled-in requirement table.
    pub fn with_defaults() -> Self {
        Self::new()
            .require("/api/users", Permission::Admin)
            .require("/api/tables", Permission::Admin)
            .require("/api/notes", Permission::Read)
    }

    /// Registers a requirement. Later registrations of the same prefix
    /// replace earlier ones.
    pub fn require(mut self, prefix: impl Into<String>, permission: Permission) -> Self {
        let prefix = normalize_prefix(prefix.into());
        self.entries.retain(|(existing, _)| *existing != prefix);
        self.entries.push((prefix, permission));
        self.entries
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self
    }

    /// Looks up the permission required for `path`, if any.
    pub fn required_for(&self, path: &str) -> Option<Permission> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.entries
            .iter()
            .find(|(prefix, _)| prefix_matches(prefix, path))
            .map(|(_, permission)| *permission)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_prefix(mut prefix: String) -> String {
    while prefix.len() > 1 && prefix.ends_with('/') {
        prefix.pop();
    }
    prefix
}

/// A prefix matches only at a segment boundary.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_nested_paths_match() {
        let routes = RouteRequirements::new().require("/api/notes", Permission::Write);
        assert_eq!(routes.required_for("/api/notes"), Some(Permission::Write));
        assert_eq!(
            routes.required_for("/api/notes/42"),
            Some(Permission::Write)
        );
        assert_eq!(routes.required_for("/api/notesx"), None);
        assert_eq!(routes.required_for("/api"), None);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let routes = RouteRequirements::new()
            .require("/api", Permission::Read)
            .require("/api/tables", Permission::Admin);
        assert_eq!(
            routes.required_for("/api/tables/utenti"),
            Some(Permission::Admin)
        );
        assert_eq!(routes.required_for("/api/notes"), Some(Permission::Read));
    }

    #[test]
    fn test_query_string_is_ignored() {
        let routes = RouteRequirements::new().require("/api/notes", Permission::Write);
        assert_eq!(
            routes.required_for("/api/notes?limit=10"),
            Some(Permission::Write)
        );
    }

    #[test]
    fn test_re_registering_replaces() {
        let routes = RouteRequirements::new()
            .require("/api/notes", Permission::Read)
            .require("/api/notes", Permission::Write);
        assert_eq!(routes.required_for("/api/notes"), Some(Permission::Write));
    }

    #[test]
    fn test_trailing_slash_prefix_normalized() {
        let routes = RouteRequirements::new().require("/api/notes/", Permission::Write);
        assert_eq!(routes.required_for("/api/notes"), Some(Permission::Write));
    }

    #[test]
    fn test_root_prefix_matches_everything() {
        let routes = RouteRequirements::new().require("/", Permission::Read);
        assert_eq!(routes.required_for("/anything"), Some(Permission::Read));
    }

    #[test]
    fn test_defaults_table() {
        let routes = RouteRequirements::with_defaults();
        assert_eq!(routes.required_for("/api/users"), Some(Permission::Admin));
        assert_eq!(
            routes.required_for("/api/tables/note/rows"),
            Some(Permission::Admin)
        );
        assert_eq!(routes.required_for("/api/auth/sign-in"), None);
    }
}
