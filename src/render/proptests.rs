//! Property-based tests for card grouping
//!
//! - Output order equals input order
//! - One wrapper per maximal run of groupable items
//! - Escaping holds for arbitrary reply text

use super::grouping::{group, segments, Segment};
use crate::protocol::{Card, ReplyItem};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Items tagged by index so order can be recovered from rendered text
fn arb_items() -> impl Strategy<Value = Vec<ReplyItem>> {
    proptest::collection::vec(0u8..3, 0..24).prop_map(|kinds| {
        kinds
            .into_iter()
            .enumerate()
            .map(|(idx, kind)| {
                let label = format!("[{idx}]");
                match kind {
                    0 => ReplyItem::plain_text(label),
                    1 => ReplyItem::ProducerCard(Card::titled(label)),
                    _ => ReplyItem::ProductCard(Card::titled(label)),
                }
            })
            .collect()
    })
}

fn count_runs(items: &[ReplyItem]) -> usize {
    items
        .iter()
        .enumerate()
        .filter(|(idx, item)| item.is_groupable() && (*idx == 0 || !items[idx - 1].is_groupable()))
        .count()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_wrapper_count_equals_run_count(items in arb_items()) {
        let fragment = group(&items);
        let wrappers = fragment
            .nodes
            .iter()
            .filter_map(|n| n.as_element())
            .filter(|el| el.has_class("chatbot-horizontal-scroll"))
            .count();
        prop_assert_eq!(wrappers, count_runs(&items));
        prop_assert_eq!(
            fragment.to_html().matches("chatbot-horizontal-scroll").count(),
            count_runs(&items)
        );
    }

    #[test]
    fn prop_order_is_preserved(items in arb_items()) {
        let text: String = group(&items).nodes.iter().map(|n| n.text_content()).collect();
        let expected: String = (0..items.len()).map(|idx| format!("[{idx}]")).collect();
        prop_assert_eq!(text, expected);
    }

    #[test]
    fn prop_segments_cover_input_exactly(items in arb_items()) {
        let segs = segments(&items);
        let flattened: Vec<&ReplyItem> = segs
            .iter()
            .flat_map(|seg| match seg {
                Segment::Cards(run) => run.iter().collect::<Vec<_>>(),
                Segment::Standalone(item) => vec![*item],
            })
            .collect();
        prop_assert_eq!(flattened.len(), items.len());
        for (a, b) in flattened.iter().zip(items.iter()) {
            prop_assert!(std::ptr::eq(*a, b));
        }

        // No two card runs are adjacent: a standalone item separates them
        for pair in segs.windows(2) {
            let both_runs = matches!(pair, [Segment::Cards(_), Segment::Cards(_)]);
            prop_assert!(!both_runs);
        }
        // Runs hold only groupable items; standalone segments never do
        for seg in &segs {
            match seg {
                Segment::Cards(run) => {
                    prop_assert!(!run.is_empty());
                    prop_assert!(run.iter().all(ReplyItem::is_groupable));
                }
                Segment::Standalone(item) => {
                    prop_assert!(!item.is_groupable());
                }
            }
        }
    }

    #[test]
    fn prop_reply_text_never_injects_markup(text in ".{0,40}", title in ".{0,40}") {
        let items = vec![
            ReplyItem::plain_text(text),
            ReplyItem::ProductCard(Card::titled(title)),
        ];
        let html = group(&items).to_html();
        // Only the renderer's own tags may appear
        let tags: Vec<&str> = html
            .split('<')
            .skip(1)
            .map(|rest| rest.split(['>', ' ']).next().unwrap_or_default())
            .collect();
        for tag in tags {
            prop_assert!(
                ["p", "/p", "div", "/div", "h3", "/h3"].contains(&tag),
                "unexpected tag {:?} in {}",
                tag,
                html
            );
        }
    }
}
