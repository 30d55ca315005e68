//! Property-based tests for marker merging.

#[cfg(test)]
mod proptest_tests {
    use crate::target::{ArtifactKind, CommentStyle};
    use crate::writer::{Block, Markers, Writer, GENERATOR};
    use proptest::prelude::*;
    use std::path::Path;

    fn writer() -> Writer {
        Writer::new(Markers::new(GENERATOR, CommentStyle::XML))
    }

    /// User-owned lines that never look like markers
    fn user_lines() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-z <>/=\"]{0,20}", 0..8)
    }

    proptest! {
        /// Property: merging the same block twice changes nothing the second time
        #[test]
        fn merge_is_idempotent(before in user_lines(), body in "[a-z<>/ ]{0,30}") {
            let existing: String = before.iter().map(|l| format!("{l}\n")).collect();
            let block = Block::new(ArtifactKind::Dependencies, format!("{body}\n"));

            let first = writer()
                .merge(Path::new("f"), Some(&existing), "", std::slice::from_ref(&block))
                .unwrap();
            let second = writer().merge(Path::new("f"), Some(&first), "", &[block]).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: text around the marker pair survives a regeneration unchanged
        #[test]
        fn merge_preserves_surrounding_text(
            before in user_lines(),
            after in user_lines(),
            old in "[a-z]{0,10}",
            new in "[a-z]{0,10}",
        ) {
            let head: String = before.iter().map(|l| format!("{l}\n")).collect();
            let tail: String = after.iter().map(|l| format!("{l}\n")).collect();
            let existing = format!(
                "{head}<!-- BEGIN project-synth:identity -->\n{old}\n<!-- END project-synth:identity -->\n{tail}"
            );

            let merged = writer()
                .merge(
                    Path::new("f"),
                    Some(&existing),
                    "",
                    &[Block::new(ArtifactKind::Identity, format!("{new}\n"))],
                )
                .unwrap();
            prop_assert!(merged.starts_with(&head));
            prop_assert!(merged.ends_with(&tail));
        }
    }
}
