//! Text node type

use crate::attr::TextContent;

/// Text content node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    /// Text content
    pub content: TextContent,
}

impl Text {
    /// Create a new text node
    pub fn new(content: impl Into<TextContent>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Check if text content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Get text length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if text is only whitespace
    pub fn is_whitespace(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_node() {
        let text = Text::new("  hello  ");
        assert!(!text.is_empty());
        assert!(!text.is_whitespace());
        assert_eq!(text.len(), 9);
        assert!(Text::new(" \n").is_whitespace());
        assert!(Text::default().is_empty());
    }
}
