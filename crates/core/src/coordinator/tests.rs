use std::sync::{Arc, Mutex};
use std::time::Duration;

use support_chat_test_provider::{
    PresetErrorKind, PresetReply, TestReplyProvider,
};
use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use crate::config::{
    DEFAULT_ERROR_TEXT, DEFAULT_GREETING, DEFAULT_TIMEOUT_TEXT,
};
use crate::conversation::Role;
use crate::{
    ChatView, ConfigError, Coordinator, CoordinatorBuilder,
    CoordinatorConfigBuilder, SubmitError,
};

fn coordinator(provider: &TestReplyProvider) -> Coordinator {
    CoordinatorBuilder::with_reply_provider(provider.clone())
        .build()
        .unwrap()
}

fn turns(view: &ChatView) -> Vec<(Role, &str, bool)> {
    view.messages
        .iter()
        .map(|msg| (msg.role(), msg.text(), msg.is_failed()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_simple_reply() {
    let mut provider = TestReplyProvider::default();
    provider.add_reply(PresetReply::with_text("Hi, what can I do for you?"));

    let (idle_tx, mut idle_rx) = watch::channel::<bool>(false);
    let coordinator = CoordinatorBuilder::with_reply_provider(provider.clone())
        .on_idle(move || {
            idle_tx.send(true).unwrap();
        })
        .build()
        .unwrap();
    coordinator.submit("Hello").await.unwrap();

    timeout(Duration::from_millis(500), idle_rx.wait_for(|v| *v))
        .await
        .unwrap()
        .unwrap();

    let view = coordinator.snapshot().await.unwrap();
    assert!(!view.busy);
    assert_eq!(
        turns(&view),
        [
            (Role::Responder, DEFAULT_GREETING, false),
            (Role::Requester, "Hello", false),
            (Role::Responder, "Hi, what can I do for you?", false),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_late_reply_loses_to_fallback() {
    let mut provider = TestReplyProvider::default();
    provider.add_reply(
        PresetReply::with_text("Too late").after(Duration::from_secs(20)),
    );
    let coordinator = coordinator(&provider);

    coordinator.submit("Are you there?").await.unwrap();
    sleep(Duration::from_secs(16)).await;
    let view = coordinator.snapshot().await.unwrap();
    assert!(!view.busy);
    assert_eq!(view.messages.len(), 3);

    // Let the reply arrive; it must not add anything.
    sleep(Duration::from_secs(30)).await;
    let view = coordinator.snapshot().await.unwrap();
    assert!(!view.busy);
    assert_eq!(
        turns(&view)[1..],
        [
            (Role::Requester, "Are you there?", false),
            (Role::Responder, DEFAULT_TIMEOUT_TEXT, true),
        ]
    );
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_early_reply_suppresses_fallback() {
    let mut provider = TestReplyProvider::default();
    provider.add_reply(
        PresetReply::with_text("Here you go.").after(Duration::from_secs(5)),
    );
    let coordinator = coordinator(&provider);

    coordinator.submit("Send me the invoice").await.unwrap();
    sleep(Duration::from_secs(6)).await;
    let view = coordinator.snapshot().await.unwrap();
    assert!(!view.busy);
    assert_eq!(view.messages.len(), 3);

    sleep(Duration::from_secs(30)).await;
    let view = coordinator.snapshot().await.unwrap();
    assert_eq!(
        turns(&view)[1..],
        [
            (Role::Requester, "Send me the invoice", false),
            (Role::Responder, "Here you go.", false),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_error_reply() {
    let mut provider = TestReplyProvider::default();
    provider.add_reply(
        PresetReply::with_failure(PresetErrorKind::Status)
            .after(Duration::from_secs(2)),
    );
    provider.add_reply(PresetReply::with_failure(PresetErrorKind::Malformed));
    let coordinator = coordinator(&provider);

    coordinator.submit("Hi").await.unwrap();
    sleep(Duration::from_secs(3)).await;
    coordinator.submit("Hi again").await.unwrap();
    sleep(Duration::from_secs(30)).await;

    let view = coordinator.snapshot().await.unwrap();
    assert!(!view.busy);
    assert_eq!(
        turns(&view)[1..],
        [
            (Role::Requester, "Hi", false),
            (Role::Responder, DEFAULT_ERROR_TEXT, true),
            (Role::Requester, "Hi again", false),
            (Role::Responder, DEFAULT_ERROR_TEXT, true),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_submit_while_busy() {
    let mut provider = TestReplyProvider::default();
    provider.add_reply(PresetReply::with_text("one").after(Duration::from_secs(5)));
    provider.add_reply(PresetReply::with_text("two"));
    let coordinator = coordinator(&provider);

    coordinator.submit("first").await.unwrap();
    assert_eq!(coordinator.submit("second").await, Err(SubmitError::Busy));

    let view = coordinator.snapshot().await.unwrap();
    assert!(view.busy);
    assert_eq!(view.messages.len(), 2);
    assert_eq!(provider.requests().len(), 1);

    sleep(Duration::from_secs(6)).await;
    coordinator.submit("second").await.unwrap();
    sleep(Duration::from_secs(1)).await;
    let view = coordinator.snapshot().await.unwrap();
    let texts: Vec<_> = view.messages[1..].iter().map(|m| m.text()).collect();
    assert_eq!(texts, ["first", "one", "second", "two"]);
}

#[tokio::test(start_paused = true)]
async fn test_empty_input() {
    let provider = TestReplyProvider::default();
    let coordinator = coordinator(&provider);
    coordinator.set_draft("half a thought").unwrap();

    for input in ["", "   ", "\n\t"] {
        assert_eq!(
            coordinator.submit(input).await,
            Err(SubmitError::EmptyInput)
        );
    }

    let view = coordinator.snapshot().await.unwrap();
    assert!(!view.busy);
    assert_eq!(view.messages.len(), 1);
    assert_eq!(view.draft, "half a thought");
    assert!(provider.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_submit_trims_and_clears_draft() {
    let mut provider = TestReplyProvider::default();
    provider.add_reply(PresetReply::with_text("ok").after(Duration::from_secs(1)));
    let coordinator = coordinator(&provider);

    coordinator.set_draft("  cancel my plan \n").unwrap();
    coordinator.submit("  cancel my plan \n").await.unwrap();

    let view = coordinator.snapshot().await.unwrap();
    assert!(view.busy);
    assert_eq!(view.draft, "");
    assert_eq!(view.messages[1].text(), "cancel my plan");

    sleep(Duration::from_secs(2)).await;
    assert_eq!(provider.requests()[0].message, "cancel my plan");
}

#[tokio::test(start_paused = true)]
async fn test_history_skips_failed_exchange() {
    let mut provider = TestReplyProvider::default();
    provider.add_reply(PresetReply::with_failure(PresetErrorKind::Network));
    provider.add_reply(PresetReply::with_text("Pro includes 50 seats."));
    provider.add_reply(PresetReply::with_text("You're welcome!"));
    let coordinator = coordinator(&provider);

    for input in ["Is the API down?", "What does Pro include?", "hi"] {
        coordinator.submit(input).await.unwrap();
        sleep(Duration::from_secs(1)).await;
    }

    let requests = provider.requests();
    let last = &requests[2];
    assert_eq!(last.message, "hi");
    let history: Vec<_> = last
        .history
        .iter()
        .map(|entry| (entry.role, entry.text.as_str()))
        .collect();
    assert_eq!(
        history,
        [
            (Role::Responder, DEFAULT_GREETING),
            (Role::Requester, "What does Pro include?"),
            (Role::Responder, "Pro includes 50 seats."),
        ]
    );
    assert!(history.iter().all(|(_, text)| *text != "Is the API down?"));
}

#[tokio::test(start_paused = true)]
async fn test_history_is_truncated() {
    let mut provider = TestReplyProvider::default();
    for i in 0..11 {
        provider.add_reply(PresetReply::with_text(format!("answer {i}")));
    }
    let coordinator = coordinator(&provider);

    for i in 0..10 {
        coordinator.submit(format!("question {i}")).await.unwrap();
        sleep(Duration::from_secs(1)).await;
    }
    let before = coordinator.snapshot().await.unwrap();
    assert_eq!(before.messages.len(), 21);

    coordinator.submit("hi").await.unwrap();
    sleep(Duration::from_secs(1)).await;

    let request = provider.requests().pop().unwrap();
    let expected: Vec<_> = before.messages[15..]
        .iter()
        .map(|msg| msg.text().to_owned())
        .collect();
    let sent: Vec<_> =
        request.history.into_iter().map(|entry| entry.text).collect();
    assert_eq!(sent.len(), 6);
    assert_eq!(sent, expected);
    assert_eq!(sent[0], "question 7");
}

#[tokio::test(start_paused = true)]
async fn test_stale_reply_does_not_resolve_next_dispatch() {
    let mut provider = TestReplyProvider::default();
    provider
        .add_reply(PresetReply::with_text("stale").after(Duration::from_secs(20)));
    provider
        .add_reply(PresetReply::with_text("fresh").after(Duration::from_secs(10)));
    let coordinator = coordinator(&provider);

    coordinator.submit("one").await.unwrap();
    sleep(Duration::from_secs(16)).await;
    // The first request is still in flight and will settle at t=20.
    coordinator.submit("two").await.unwrap();

    sleep(Duration::from_secs(6)).await;
    let view = coordinator.snapshot().await.unwrap();
    assert!(view.busy);
    assert_eq!(view.messages.len(), 4);

    sleep(Duration::from_secs(20)).await;
    let view = coordinator.snapshot().await.unwrap();
    assert!(!view.busy);
    assert_eq!(
        turns(&view)[1..],
        [
            (Role::Requester, "one", false),
            (Role::Responder, DEFAULT_TIMEOUT_TEXT, true),
            (Role::Requester, "two", false),
            (Role::Responder, "fresh", false),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_on_update() {
    let mut provider = TestReplyProvider::default();
    provider.add_reply(PresetReply::with_text("Sure."));

    let updates = Arc::new(Mutex::new(Vec::new()));
    let coordinator = CoordinatorBuilder::with_reply_provider(provider)
        .on_update({
            let updates = Arc::clone(&updates);
            move |view| {
                updates
                    .lock()
                    .unwrap()
                    .push((view.messages.len(), view.busy));
            }
        })
        .build()
        .unwrap();

    coordinator.set_draft("Can").unwrap();
    coordinator.submit("Can you help?").await.unwrap();
    sleep(Duration::from_secs(1)).await;

    let updates = updates.lock().unwrap().clone();
    assert_eq!(updates, [(1, false), (2, true), (3, false)]);
}

#[tokio::test(start_paused = true)]
async fn test_custom_config() {
    let mut provider = TestReplyProvider::default();
    provider.set_service_timeout(Duration::from_secs(2));
    provider.add_reply(
        PresetReply::with_text("slow").after(Duration::from_secs(4)),
    );

    let config = CoordinatorConfigBuilder::new()
        .with_fallback_timeout(Duration::from_secs(3))
        .with_greeting("Welcome back!")
        .with_timeout_text("No answer yet.")
        .build();
    let coordinator = CoordinatorBuilder::with_reply_provider(provider)
        .with_config(config)
        .build()
        .unwrap();

    coordinator.submit("status?").await.unwrap();
    sleep(Duration::from_secs(10)).await;
    let view = coordinator.snapshot().await.unwrap();
    assert_eq!(
        turns(&view),
        [
            (Role::Responder, "Welcome back!", false),
            (Role::Requester, "status?", false),
            (Role::Responder, "No answer yet.", true),
        ]
    );
}

#[tokio::test]
async fn test_fallback_must_outlast_service_timeout() {
    let mut provider = TestReplyProvider::default();
    provider.set_service_timeout(Duration::from_secs(15));

    let result = CoordinatorBuilder::with_reply_provider(provider.clone()).build();
    assert!(matches!(
        result,
        Err(ConfigError::FallbackNotAfterServiceTimeout { .. })
    ));

    let config = CoordinatorConfigBuilder::new()
        .with_fallback_timeout(Duration::from_secs(20))
        .build();
    let result = CoordinatorBuilder::with_reply_provider(provider)
        .with_config(config)
        .build();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_closed() {
    let provider = TestReplyProvider::default();
    let coordinator = coordinator(&provider);
    coordinator.close();
    sleep(Duration::from_millis(10)).await;

    assert!(coordinator.is_closed());
    assert_eq!(coordinator.submit("hello").await, Err(SubmitError::Closed));
    assert!(coordinator.snapshot().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_timed_out_requests_are_not_tracked() {
    let mut provider = TestReplyProvider::default();
    for _ in 0..5 {
        provider.add_reply(
            PresetReply::with_text("never").after(Duration::from_secs(86_400)),
        );
    }
    let coordinator = coordinator(&provider);

    for i in 0..5 {
        coordinator.submit(format!("attempt {i}")).await.unwrap();
        sleep(Duration::from_secs(16)).await;
    }

    let in_flight = coordinator
        .handle
        .call(|state, _| state.in_flight.len())
        .await
        .unwrap();
    assert_eq!(in_flight, 0);

    let view = coordinator.snapshot().await.unwrap();
    assert!(!view.busy);
    assert_eq!(view.messages.len(), 11);
    assert!(view.messages[1..].iter().skip(1).step_by(2).all(|m| m.is_failed()));
}

#[tokio::test]
async fn test_blank_texts_are_rejected() {
    let provider = TestReplyProvider::default();
    let config = CoordinatorConfigBuilder::new().with_error_text(" ").build();
    let result = CoordinatorBuilder::with_reply_provider(provider)
        .with_config(config)
        .build();
    assert!(matches!(result, Err(ConfigError::EmptyText("error text"))));
}
