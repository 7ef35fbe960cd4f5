use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use tower::ServiceExt;

use cue_timer::{
    create_router,
    services::{Cue, CuePlayer},
    tasks::ManualScheduler,
    AppState,
};

#[derive(Default)]
struct RecordingCues(Mutex<Vec<Cue>>);

impl CuePlayer for RecordingCues {
    fn play(&self, cue: Cue) {
        self.0.lock().unwrap().push(cue);
    }
}

struct Harness {
    router: Router,
    scheduler: Arc<ManualScheduler>,
    cues: Arc<RecordingCues>,
}

impl Harness {
    fn new() -> Self {
        let scheduler = Arc::new(ManualScheduler::new());
        let cues = Arc::new(RecordingCues::default());
        let state = Arc::new(AppState::new(
            20560,
            "127.0.0.1".to_string(),
            60,
            scheduler.clone(),
            cues.clone(),
        ));
        Self {
            router: create_router(state),
            scheduler,
            cues,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(&self, uri: &str) -> Value {
        let (status, json) = self.send(Method::POST, uri, None).await;
        assert_eq!(status, StatusCode::OK, "POST {}", uri);
        json
    }

    fn cues(&self) -> Vec<Cue> {
        std::mem::take(&mut *self.cues.0.lock().unwrap())
    }
}

#[tokio::test]
async fn test_start_pause_resume_over_http() {
    let h = Harness::new();

    let json = h.post("/start").await;
    assert_eq!(json["status"], "running");
    assert_eq!(json["timer"]["remaining"], 60);
    assert_eq!(json["timer"]["display"], "01:00");

    h.scheduler.advance(25);
    let json = h.post("/pause").await;
    assert_eq!(json["status"], "paused");
    assert_eq!(json["timer"]["remaining"], 35);
    assert_eq!(json["timer"]["running"], false);

    let json = h.post("/start").await;
    assert_eq!(json["timer"]["remaining"], 35);
    assert_eq!(
        h.cues(),
        vec![Cue::Start, Cue::Threshold, Cue::Pause, Cue::Start]
    );
}

#[tokio::test]
async fn test_stop_and_skip_reset_to_zero() {
    let h = Harness::new();

    h.post("/start").await;
    h.scheduler.advance(3);
    let json = h.post("/stop").await;
    assert_eq!(json["status"], "idle");
    assert_eq!(json["timer"]["display"], "00:00");

    h.post("/start").await;
    let json = h.post("/skip").await;
    assert_eq!(json["timer"]["remaining"], 0);
    assert_eq!(json["timer"]["running"], false);
    assert!(!h.scheduler.is_active());

    assert_eq!(h.cues(), vec![Cue::Start, Cue::Stop, Cue::Start, Cue::Skip]);
}

#[tokio::test]
async fn test_countdown_runs_out() {
    let h = Harness::new();
    h.post("/start").await;
    h.scheduler.advance(60);

    let (status, json) = h.send(Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timer"]["remaining"], 0);
    assert_eq!(json["timer"]["running"], false);
    assert_eq!(json["last_action"], "start");
    assert_eq!(h.cues().last(), Some(&Cue::Stop));
}

#[tokio::test]
async fn test_duration_endpoints() {
    let h = Harness::new();

    let (status, json) = h
        .send(Method::PUT, "/duration", Some(serde_json::json!({ "seconds": 90 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timer"]["configured_duration"], 90);

    let json = h.post("/duration/increment").await;
    assert_eq!(json["timer"]["configured_duration"], 95);
    let json = h.post("/duration/decrement").await;
    assert_eq!(json["timer"]["configured_duration"], 90);

    let json = h.post("/start").await;
    assert_eq!(json["timer"]["remaining"], 90);
}

#[tokio::test]
async fn test_invalid_duration_is_bad_request() {
    let h = Harness::new();

    for seconds in [0, 5, 601, 63] {
        let (status, json) = h
            .send(Method::PUT, "/duration", Some(serde_json::json!({ "seconds": seconds })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert_eq!(json["timer"]["configured_duration"], 60);
    }

    let malformed = [
        json!({ "seconds": -5 }),
        json!({ "seconds": 99999999999u64 }),
        json!({ "seconds": "60" }),
        json!({}),
    ];
    for body in malformed {
        let (status, json) = h.send(Method::PUT, "/duration", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(json["status"], "error");
        assert!(!json["message"].as_str().unwrap().is_empty());
        assert_eq!(json["timer"]["configured_duration"], 60);
    }
    assert_eq!(h.cues(), Vec::<Cue>::new());
}

#[tokio::test]
async fn test_status_and_health() {
    let h = Harness::new();

    let (status, json) = h.send(Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timer"]["display"], "00:00");
    assert_eq!(json["timer"]["configured_duration"], 60);
    assert_eq!(json["port"], 20560);
    assert_eq!(json["last_action"], Value::Null);

    let (status, json) = h.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

/// Read body frames until the accumulated text contains `needle`
async fn read_until<S, B, E>(events: &mut S, needle: &str) -> String
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Debug,
{
    let mut text = String::new();
    while !text.contains(needle) {
        let frame = tokio::time::timeout(Duration::from_secs(5), events.next())
            .await
            .expect("timed out waiting for an event")
            .expect("event stream ended")
            .unwrap();
        text.push_str(std::str::from_utf8(frame.as_ref()).unwrap());
    }
    text
}

#[tokio::test]
async fn test_events_stream_every_change() {
    let h = Harness::new();
    let response = h
        .router
        .clone()
        .oneshot(Request::get("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/event-stream"));

    let mut events = response.into_body().into_data_stream();

    let first = read_until(&mut events, "\n\n").await;
    assert!(first.contains("event: timer"));
    assert!(first.contains(r#""remaining":0"#));
    assert!(first.contains(r#""display":"00:00""#));

    h.post("/start").await;
    let started = read_until(&mut events, r#""remaining":60"#).await;
    assert!(started.contains(r#""running":true"#));

    h.scheduler.advance(1);
    let ticked = read_until(&mut events, r#""display":"00:59""#).await;
    assert!(ticked.contains(r#""remaining":59"#));
}
