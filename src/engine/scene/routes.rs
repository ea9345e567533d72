use crate::engine::scene::SceneKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    Exact,
    Prefix,
}

#[derive(Debug, Clone)]
struct RouteRule {
    pattern: String,
    kind: Match,
    scene: SceneKey,
}

impl RouteRule {
    fn matches(&self, path: &str) -> bool {
        let n = self.pattern.len();
        let Some(head) = path.get(..n) else {
            return false;
        };
        if !head.eq_ignore_ascii_case(&self.pattern) {
            return false;
        }
        match self.kind {
            Match::Exact => path.len() == n,
            // "/blog" matches "/blog" and "/blog/post", never "/blogroll".
            Match::Prefix => path.len() == n || path[n..].starts_with('/'),
        }
    }
}

/// Maps URL pathnames to scenes. Exact rules win over prefix rules;
/// among prefix rules the longest pattern wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
    fallback: SceneKey,
}

impl RouteTable {
    pub fn new(fallback: SceneKey) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    pub fn exact(mut self, path: &str, scene: SceneKey) -> Self {
        self.rules.push(RouteRule {
            pattern: normalize_path(path),
            kind: Match::Exact,
            scene,
        });
        self
    }

    pub fn prefix(mut self, path: &str, scene: SceneKey) -> Self {
        self.rules.push(RouteRule {
            pattern: normalize_path(path),
            kind: Match::Prefix,
            scene,
        });
        self
    }

    /// Scene for `path`, or the fallback when no rule matches.
    pub fn scene_for(&self, path: &str) -> SceneKey {
        self.lookup(path).unwrap_or(self.fallback)
    }

    /// Scene for `path` if some rule matches.
    pub fn lookup(&self, path: &str) -> Option<SceneKey> {
        let path = normalize_path(path);

        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.kind == Match::Exact && r.matches(&path))
        {
            return Some(rule.scene);
        }

        self.rules
            .iter()
            .filter(|r| r.kind == Match::Prefix && r.matches(&path))
            .max_by_key(|r| r.pattern.len())
            .map(|r| r.scene)
    }
}

impl Default for RouteTable {
    /// Site routes.
    fn default() -> Self {
        RouteTable::new(SceneKey::Home)
            .exact("/", SceneKey::Home)
            .exact("/about", SceneKey::Stairs)
            .exact("/services", SceneKey::Stairs)
            .exact("/people", SceneKey::Stairs)
            .prefix("/lab", SceneKey::Arcade)
            .prefix("/basketball", SceneKey::Hoop)
            .prefix("/showcase", SceneKey::Projects)
            .prefix("/blog", SceneKey::Menu)
            .prefix("/post", SceneKey::Menu)
    }
}

/// Strip query and fragment, ensure a leading slash, drop trailing slashes.
/// Case is kept; rules compare case-insensitively.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path[..end].trim_end_matches('/');

    if path.is_empty() {
        return "/".to_string();
    }
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("about/"), "/about");
        assert_eq!(normalize_path("/Showcase/Foo?x=1#top"), "/Showcase/Foo");
        assert_eq!(normalize_path("/?ref=nav"), "/");
    }

    #[test]
    fn site_routes_map_to_scenes() {
        let routes = RouteTable::default();
        assert_eq!(routes.scene_for("/"), SceneKey::Home);
        assert_eq!(routes.scene_for("/about"), SceneKey::Stairs);
        assert_eq!(routes.scene_for("/lab"), SceneKey::Arcade);
        assert_eq!(routes.scene_for("/showcase/some-project"), SceneKey::Projects);
        assert_eq!(routes.scene_for("/blog/a-post/"), SceneKey::Menu);
        assert_eq!(routes.scene_for("/basketball"), SceneKey::Hoop);
    }

    #[test]
    fn rules_match_regardless_of_case() {
        let routes = RouteTable::default();
        assert_eq!(routes.scene_for("/About"), SceneKey::Stairs);
        assert_eq!(routes.scene_for("/Blog/Post-A"), SceneKey::Menu);
        assert_eq!(routes.lookup("/BLOGROLL"), None);
    }

    #[test]
    fn unknown_paths_fall_back() {
        let routes = RouteTable::default();
        assert_eq!(routes.lookup("/unmapped-page"), None);
        assert_eq!(routes.scene_for("/unmapped-page"), SceneKey::Home);
        // Prefix rules only match whole segments.
        assert_eq!(routes.lookup("/blogroll"), None);
    }

    #[test]
    fn exact_beats_prefix_and_longest_prefix_wins() {
        let routes = RouteTable::new(SceneKey::Home)
            .prefix("/showcase", SceneKey::Projects)
            .prefix("/showcase/arcade", SceneKey::Arcade)
            .exact("/showcase/menu", SceneKey::Menu);

        assert_eq!(routes.scene_for("/showcase/arcade/cabinet"), SceneKey::Arcade);
        assert_eq!(routes.scene_for("/showcase/menu"), SceneKey::Menu);
        assert_eq!(routes.scene_for("/showcase/other"), SceneKey::Projects);
    }
}
