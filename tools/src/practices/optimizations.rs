//! Priority-tagged optimization suggestions per framework

use serde::Serialize;

use crate::framework::Framework;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub priority: Priority,
    pub title: &'static str,
    pub description: &'static str,
    pub example: &'static str,
    /// Set only when code was supplied: whether it already applies the suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
}

struct Entry {
    priority: Priority,
    title: &'static str,
    description: &'static str,
    example: &'static str,
    markers: &'static [&'static str],
}

const RAILS: &[Entry] = &[
    Entry {
        priority: Priority::High,
        title: "Eager load associations",
        description: "Avoid N+1 queries when iterating records that touch associations",
        example: "Post.includes(:author).each { |p| p.author.name }",
        markers: &["includes(", "preload(", "eager_load("],
    },
    Entry {
        priority: Priority::High,
        title: "Index foreign keys",
        description: "Add database indexes on columns used in where clauses and joins",
        example: "add_index :posts, :user_id",
        markers: &["add_index", "index: true"],
    },
    Entry {
        priority: Priority::Medium,
        title: "Cache expensive fragments",
        description: "Use fragment or low-level caching for rarely changing output",
        example: "Rails.cache.fetch([post, :summary]) { post.summary }",
        markers: &["Rails.cache", "cache "],
    },
    Entry {
        priority: Priority::Low,
        title: "Move slow work to background jobs",
        description: "Send mail and call external APIs from ActiveJob",
        example: "WelcomeMailer.with(user: user).welcome.deliver_later",
        markers: &["deliver_later", "perform_later"],
    },
];

const REACT_NATIVE: &[Entry] = &[
    Entry {
        priority: Priority::High,
        title: "Virtualize long lists",
        description: "Render collections with FlatList instead of mapping inside ScrollView",
        example: "<FlatList data={items} keyExtractor={(i) => i.id} renderItem={renderItem} />",
        markers: &["<FlatList", "<SectionList"],
    },
    Entry {
        priority: Priority::High,
        title: "Memoize callbacks and pure components",
        description: "Stable props prevent needless re-renders of children",
        example: "const onPress = useCallback(() => select(id), [id]);",
        markers: &["useCallback", "React.memo", "useMemo"],
    },
    Entry {
        priority: Priority::Medium,
        title: "Define styles once",
        description: "StyleSheet.create avoids recreating style objects on every render",
        example: "const styles = StyleSheet.create({ row: { padding: 8 } });",
        markers: &["StyleSheet.create"],
    },
    Entry {
        priority: Priority::Low,
        title: "Optimize images",
        description: "Size images for the device and cache remote images",
        example: "<FastImage source={{ uri, priority: FastImage.priority.normal }} />",
        markers: &["FastImage", "resizeMode"],
    },
];

const GRAPHQL: &[Entry] = &[
    Entry {
        priority: Priority::High,
        title: "Batch association loading",
        description: "Resolve associations through dataloader sources",
        example: "dataloader.with(Sources::Record, User).load(object.user_id)",
        markers: &["dataloader", "GraphQL::Batch", "BatchLoader"],
    },
    Entry {
        priority: Priority::High,
        title: "Limit query cost",
        description: "Bound depth and complexity to protect the server",
        example: "max_depth 10\nmax_complexity 200",
        markers: &["max_depth", "max_complexity"],
    },
    Entry {
        priority: Priority::Medium,
        title: "Paginate collections",
        description: "Expose lists as connection types with first/after arguments",
        example: "field :posts, Types::PostType.connection_type, null: false",
        markers: &["connection_type"],
    },
    Entry {
        priority: Priority::Low,
        title: "Persist queries",
        description: "Use persisted queries to shrink payloads and allow CDN caching",
        example: "use GraphQL::PersistedQueries",
        markers: &["PersistedQueries"],
    },
];

/// Suggestions for `framework`, highest priority first. With `code`, each
/// suggestion is marked applied when one of its markers already appears.
pub fn suggest(framework: Framework, code: Option<&str>) -> Vec<Suggestion> {
    let entries = match framework {
        Framework::Rails => RAILS,
        Framework::ReactNative => REACT_NATIVE,
        Framework::Graphql => GRAPHQL,
    };

    entries
        .iter()
        .map(|e| Suggestion {
            priority: e.priority,
            title: e.title,
            description: e.description,
            example: e.example,
            applied: code.map(|c| e.markers.iter().any(|m| c.contains(m))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_suggestions_per_framework() {
        for framework in Framework::ALL {
            let suggestions = suggest(framework, None);
            assert_eq!(suggestions.len(), 4);
            assert_eq!(suggestions[0].priority, Priority::High);
            assert!(suggestions.iter().all(|s| s.applied.is_none()));
        }
    }

    #[test]
    fn test_applied_marking() {
        let suggestions = suggest(Framework::Rails, Some("Post.includes(:author)"));
        assert_eq!(suggestions[0].applied, Some(true));
        assert_eq!(suggestions[1].applied, Some(false));
    }

    #[test]
    fn test_deterministic() {
        let a = serde_json::to_value(suggest(Framework::Graphql, None)).unwrap();
        let b = serde_json::to_value(suggest(Framework::Graphql, None)).unwrap();
        assert_eq!(a, b);
    }
}
