mod common;

use axum::http::StatusCode;

use assessment_backend::models::prompt::PromptKind;
use assessment_backend::sequencer::{Deck, Phase, SessionEvent, TestKind, TestSession, TimingProfile};
use common::{empty_request, send, spawn_app};

#[tokio::test]
async fn deck_carries_timing_and_a_blank_slide_for_tat() {
    let app = spawn_app().await;
    let (status, body) = send(&app.router, empty_request("GET", "/api/deck/tat", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "tat");
    assert_eq!(body["timing"]["display_seconds"], 30);
    assert_eq!(body["timing"]["gap_seconds"], 240);
    assert_eq!(body["countdown"], "00:30");
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], -1);
    assert_eq!(entries[0]["payload"], "");
}

#[tokio::test]
async fn sdt_deck_uses_the_requested_persona() {
    let app = spawn_app().await;
    let content = &app.state.content_service;
    content
        .create(PromptKind::SdtProfessional, "What does your manager think of you?", true)
        .await
        .unwrap();
    content
        .create(PromptKind::SdtStudent, "What do your teachers think about you?", true)
        .await
        .unwrap();

    let (status, body) = send(
        &app.router,
        empty_request("GET", "/api/deck/sdt?persona=professional", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["persona"], "professional");
    assert_eq!(body["countdown"], "15:00");
    assert_eq!(body["timing"]["per_item"], false);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["payload"], "What does your manager think of you?");
}

#[tokio::test]
async fn unknown_kind_or_persona_is_not_found() {
    let app = spawn_app().await;
    let (status, _) = send(&app.router, empty_request("GET", "/api/deck/ppdt", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app.router,
        empty_request("GET", "/api/deck/sdt?persona=retired", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn served_wat_deck_completes_after_its_ticks() {
    let app = spawn_app().await;
    app.state
        .content_service
        .merge_texts(PromptKind::Wat, ["Courage", "Fear", "Family"])
        .await
        .unwrap();

    let (_, body) = send(&app.router, empty_request("GET", "/api/deck/wat", None)).await;
    let deck: Deck = serde_json::from_value(body["entries"].clone()).unwrap();
    assert_eq!(deck.len(), 3);
    let timing: TimingProfile = serde_json::from_value(body["timing"].clone()).unwrap();

    let mut session = TestSession::new(TestKind::Wat);
    session.start(deck, timing).unwrap();

    let mut events = Vec::new();
    for _ in 0..45 {
        events.extend(session.on_tick());
    }
    assert_eq!(session.phase(), Phase::Complete);
    assert_eq!(
        events.last(),
        Some(&SessionEvent::Completed {
            kind: TestKind::Wat,
            items_presented: 3
        })
    );

    assert_eq!(session.on_tick(), None);
    assert_eq!(session.cursor(), 2);
}
