//! Property-based tests for the submission controller
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::state::*;
use super::transition::*;
use super::*;
use crate::protocol::{ChatReply, ExchangeError, ReplyItem};
use crate::session::SessionState;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> WidgetContext {
    WidgetContext::new(1)
}

/// Tracks what the executor would observe while applying effects
#[derive(Debug, Default)]
struct Observed {
    input_disabled: bool,
    outstanding_requests: usize,
    sent: Vec<Option<String>>,
}

impl Observed {
    fn apply(&mut self, effects: &[Effect], session: &mut SessionState) {
        for effect in effects {
            match effect {
                Effect::DisableInput => self.input_disabled = true,
                Effect::EnableInput => self.input_disabled = false,
                Effect::SendRequest { envelope } => {
                    self.outstanding_requests += 1;
                    self.sent.push(envelope.session_uuid.clone());
                }
                Effect::UpdateSession { session_uuid } => {
                    session.update(session_uuid.as_deref());
                }
                _ => {}
            }
        }
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_submit() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(Event::submit),
        "[ \t\n]{0,4}".prop_map(Event::submit),
    ]
}

fn arb_reply() -> impl Strategy<Value = Event> {
    (
        proptest::option::of("[a-f0-9]{0,6}"),
        any::<bool>(),
        "[a-z]{0,8}",
    )
        .prop_map(|(session_uuid, stop_chat, text)| {
            let mut reply = ChatReply::new(vec![ReplyItem::plain_text(text)], session_uuid);
            reply.stop_chat = stop_chat;
            Event::ReplyReceived { reply }
        })
}

fn arb_failure() -> impl Strategy<Value = Event> {
    prop_oneof![
        "[a-z ]{1,12}".prop_map(ExchangeError::transport),
        (400u16..600, "[a-z ]{1,12}").prop_map(|(s, m)| ExchangeError::backend(s, m)),
        (200u16..600, ".{0,12}").prop_map(|(status, raw_body)| ExchangeError::Decode {
            status,
            raw_body
        }),
    ]
    .prop_map(|error| Event::ExchangeFailed { error })
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_submit(), arb_reply(), arb_failure()]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Never two requests outstanding; input disabled exactly while in flight
    #[test]
    fn prop_single_flight(events in proptest::collection::vec(arb_event(), 0..40)) {
        let ctx = test_context();
        let mut state = WidgetState::Idle;
        let mut session = SessionState::new();
        let mut observed = Observed::default();

        for event in events {
            let resolves = matches!(
                event,
                Event::ReplyReceived { .. } | Event::ExchangeFailed { .. }
            );
            match transition(&state, &ctx, &session, event) {
                Ok(result) => {
                    if resolves {
                        observed.outstanding_requests -= 1;
                    }
                    observed.apply(&result.effects, &mut session);
                    state = result.new_state;
                }
                Err(TransitionError::Busy) => {
                    prop_assert!(state.is_in_flight());
                }
                Err(TransitionError::InvalidTransition(_)) => {
                    prop_assert!(!state.is_in_flight());
                    prop_assert!(resolves);
                }
            }
            prop_assert!(observed.outstanding_requests <= 1);
            prop_assert_eq!(observed.outstanding_requests == 1, state.is_in_flight());
            prop_assert_eq!(observed.input_disabled, state.is_in_flight());
        }
    }

    /// Blank input is a complete no-op
    #[test]
    fn prop_blank_submit_has_no_effects(text in "[ \t\n\r\u{feff}]{0,10}") {
        let result = transition(
            &WidgetState::Idle,
            &test_context(),
            &SessionState::new(),
            Event::submit(text),
        ).unwrap();
        prop_assert_eq!(result.new_state, WidgetState::Idle);
        prop_assert!(result.effects.is_empty());
    }

    /// The envelope message is the trimmed input and the in-flight state records it
    #[test]
    fn prop_submit_sends_trimmed_text(pad in "[ \t]{0,3}", body in "[a-z][a-z ]{0,10}[a-z]") {
        let text = format!("{pad}{body}{pad}");
        let result = transition(
            &WidgetState::Idle,
            &test_context(),
            &SessionState::new(),
            Event::submit(text),
        ).unwrap();
        prop_assert_eq!(&result.new_state, &WidgetState::InFlight { message: body.clone() });
        let sent = result.effects.iter().find_map(|e| match e {
            Effect::SendRequest { envelope } => Some(envelope.message.clone()),
            _ => None,
        });
        prop_assert_eq!(sent, Some(body));
    }

    /// Each request carries the latest non-empty session identifier seen
    #[test]
    fn prop_session_follows_latest_reply(
        uuids in proptest::collection::vec(proptest::option::of("[a-f0-9]{0,4}"), 1..10)
    ) {
        let ctx = test_context();
        let mut state = WidgetState::Idle;
        let mut session = SessionState::new();
        let mut observed = Observed::default();
        let mut expected: Option<String> = None;

        for uuid in uuids {
            let result = transition(&state, &ctx, &session, Event::submit("hi")).unwrap();
            observed.apply(&result.effects, &mut session);
            state = result.new_state;
            prop_assert_eq!(observed.sent.last().cloned().flatten(), expected.clone());

            if let Some(id) = uuid.as_ref().filter(|id| !id.is_empty()) {
                expected = Some(id.clone());
            }
            let reply = ChatReply::new(Vec::<ReplyItem>::new(), uuid);
            let result =
                transition(&state, &ctx, &session, Event::ReplyReceived { reply }).unwrap();
            observed.apply(&result.effects, &mut session);
            state = result.new_state;
            prop_assert_eq!(session.current(), expected.as_deref());
        }
    }

    /// Every resolution ends with the input enabled and focused
    #[test]
    fn prop_resolution_restores_input(event in prop_oneof![arb_reply(), arb_failure()]) {
        let state = WidgetState::InFlight { message: "x".to_string() };
        let result = transition(&state, &test_context(), &SessionState::new(), event).unwrap();
        prop_assert_eq!(result.new_state, WidgetState::Idle);
        let n = result.effects.len();
        prop_assert!(n >= 3);
        prop_assert_eq!(&result.effects[n - 2..], &[Effect::EnableInput, Effect::FocusInput][..]);
        let appended = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::AppendTurn(_)))
            .count();
        prop_assert_eq!(appended, 1);
    }
}
