use super::{ContentBundle, ContentItem, ContentSource};

/// Built-in content used when the CMS is unconfigured or unreachable.
pub fn fallback_content() -> ContentBundle {
    ContentBundle {
        primary_items: vec![
            ContentItem::new(
                "1",
                "Q4 Market Insights",
                "Deep dive into emerging tech trends.",
                "#",
            ),
            ContentItem::new(
                "2",
                "The AI Revolution",
                "How Generative AI is changing B2B.",
                "#",
            ),
        ],
        secondary_items: vec![ContentItem::new(
            "3",
            "Future of Holography",
            "Download our whitepaper.",
            "#",
        )],
    }
}

/// Serves `fallback_content()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticContent;

impl ContentSource for StaticContent {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch_content(&self) -> ContentBundle {
        fallback_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_set_shape() {
        let bundle = StaticContent.fetch_content();
        assert_eq!(bundle.primary_items.len(), 2);
        assert_eq!(bundle.secondary_items.len(), 1);
        assert_eq!(bundle.secondary_items[0].title, "Future of Holography");
    }
}
