//! Card grouping engine
//!
//! Runs are maximal contiguous spans of groupable items. Each run is wrapped in
//! one horizontal scroll container; standalone items render unwrapped. Output
//! order always equals input order.

use super::component::{plain_paragraph, render, render_card};
use super::Fragment;
use crate::markup::{Element, Node};
use crate::protocol::{Answer, ReplyItem};
use crate::sanitize::Escaped;

/// Paragraph shown when `answer` is not an array
pub const UNRECOGNIZED_FORMAT_MESSAGE: &str = "Unexpected response format.";

/// One step of the partition: a run of cards or a single standalone item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<'a> {
    Cards(&'a [ReplyItem]),
    Standalone(&'a ReplyItem),
}

/// Partition items into alternating card runs and standalone items
pub fn segments(items: &[ReplyItem]) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut run_start: Option<usize> = None;

    for (idx, item) in items.iter().enumerate() {
        if item.is_groupable() {
            let start = *run_start.get_or_insert(idx);
            let next_is_card = items.get(idx + 1).is_some_and(ReplyItem::is_groupable);
            if !next_is_card {
                out.push(Segment::Cards(&items[start..=idx]));
                run_start = None;
            }
        } else {
            out.push(Segment::Standalone(item));
        }
    }

    out
}

/// Render an ordered item sequence with card clustering
pub fn group(items: &[ReplyItem]) -> Fragment {
    let mut fragment = Fragment::default();

    for segment in segments(items) {
        match segment {
            Segment::Cards(run) => {
                let cards = run
                    .iter()
                    .filter_map(ReplyItem::as_card)
                    .map(|(kind, card)| Node::from(render_card(kind, card)));
                fragment.extend(Fragment::node(
                    Element::new("div")
                        .class("chatbot-horizontal-scroll")
                        .children(cards),
                ));
            }
            Segment::Standalone(item) => fragment.extend(render(item)),
        }
    }

    fragment
}

/// Render a reply's answer, degrading to a fallback paragraph when malformed
pub fn render_answer(answer: &Answer) -> Fragment {
    match answer {
        Answer::Items(items) => group(items),
        Answer::Unrecognized(value) => {
            tracing::warn!(answer = %value, "Answer is not an array");
            Fragment::node(plain_paragraph(Escaped::literal(UNRECOGNIZED_FORMAT_MESSAGE)))
        }
    }
}
