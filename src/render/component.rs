//! Component renderer: one reply item to one markup fragment

use super::{Fragment, OptionControl};
use crate::markup::{Element, Node};
use crate::protocol::{Card, CardKind, ReplyItem, SelectionOption};
use crate::sanitize::{escape, escape_opt, escape_value, Escaped};

/// Render a single reply item. Pure apart from debug logging.
pub fn render(item: &ReplyItem) -> Fragment {
    match item {
        ReplyItem::PlainText { text } => {
            Fragment::node(plain_paragraph(escape_opt(text.as_deref())))
        }
        ReplyItem::OptionQuestion {
            display_content,
            options,
        } => render_option_question(display_content.as_deref(), options),
        ReplyItem::ProducerCard(card) => Fragment::node(render_card(CardKind::Producer, card)),
        ReplyItem::ProductCard(card) => Fragment::node(render_card(CardKind::Product, card)),
        ReplyItem::Unknown { kind, .. } => {
            tracing::debug!(kind = %kind, "Rendering unsupported reply item");
            Fragment::node(unsupported_paragraph(&escape_value(kind)))
        }
    }
}

/// `<p class="chatbot-plaintext">`
pub fn plain_paragraph(text: Escaped) -> Element {
    Element::new("p").class("chatbot-plaintext").text(text)
}

fn unsupported_paragraph(tag: &Escaped) -> Element {
    Element::new("p").class("chatbot-plaintext").child(
        Element::new("i")
            .text(Escaped::literal("[Unsupported type: "))
            .text(tag.clone())
            .text(Escaped::literal("]")),
    )
}

fn render_option_question(prompt: Option<&str>, options: &[SelectionOption]) -> Fragment {
    let controls: Vec<OptionControl> = options
        .iter()
        .map(|opt| OptionControl {
            label: opt.display_content.clone().unwrap_or_default(),
            payload: opt.next_user_query.clone(),
        })
        .collect();

    let buttons = options.iter().map(|opt| {
        Node::from(
            Element::new("button")
                .class("btn--primary btn--s chatbot-option-button")
                .attr("data-next-query", escape(&opt.next_user_query))
                .text(escape_opt(opt.display_content.as_deref())),
        )
    });

    let block = Element::new("div")
        .class("chatbot-optionquestion")
        .child(
            Element::new("p")
                .class("chatbot-optionquestion-text")
                .text(escape_opt(prompt)),
        )
        .child(
            Element::new("div")
                .class("chatbot-optionquestion-options")
                .children(buttons),
        );

    Fragment {
        nodes: vec![block.into()],
        controls,
    }
}

/// A producer or product card. Image and call-to-action are omitted when absent.
pub fn render_card(kind: CardKind, card: &Card) -> Element {
    tracing::debug!(
        kind = ?kind,
        title = card.title.as_deref().unwrap_or_default(),
        img_url = card.image().unwrap_or_default(),
        "Rendering card"
    );

    let title = escape_opt(card.title.as_deref());
    let mut el = Element::new("div").attr(
        "class",
        match kind {
            CardKind::Producer => Escaped::literal("chatbot-component-card chatbot-producer"),
            CardKind::Product => Escaped::literal("chatbot-component-card chatbot-product"),
        },
    );

    if let Some(url) = card.image() {
        el = el.child(
            Element::new("img")
                .attr("src", escape(url))
                .attr("alt", title.clone())
                .attr("style", Escaped::literal("max-width:250px;")),
        );
    }

    el = el
        .child(Element::new("h3").text(title))
        .child(Element::new("p").text(escape_opt(card.display_content.as_deref())));

    if let Some(link) = card.cta_link() {
        el = el.child(
            Element::new("a")
                .attr("href", escape(link))
                .attr("target", Escaped::literal("_blank"))
                .class("chatbot-button")
                .text(Escaped::literal(kind.cta_label())),
        );
    }

    el
}
