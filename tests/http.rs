use chrono::{Duration as Days, Local};
use once_cell::sync::Lazy;
use reqwest::{header, redirect::Policy, Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DayView {
    day: usize,
    completed: bool,
    available: bool,
    title: Option<String>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ParticipantView {
    id: String,
    available_days: usize,
    completed_count: usize,
    days: Vec<DayView>,
}

#[derive(Debug, Deserialize)]
struct ChallengeResponse {
    available_days: usize,
    total_days: usize,
    progress_percent: f64,
    participants: Vec<ParticipantView>,
}

#[derive(Debug, Deserialize)]
struct DraftResponse {
    day: usize,
    title: String,
    summary: String,
}

#[derive(Debug, Deserialize)]
struct CheckInResponse {
    day: usize,
    celebrate: bool,
    completed_count: usize,
    record: DayView,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/challenge")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    // Four days ago, so five days are unlocked.
    let start = Local::now().date_naive() - Days::days(4);
    let child = Command::new(env!("CARGO_BIN_EXE_challenge_tracker"))
        .env("PORT", port.to_string())
        .env("HOST", "127.0.0.1")
        .env("CHALLENGE_START_DATE", start.to_string())
        .env("CHALLENGE_PARTICIPANTS", "vini:Vini,neto:Neto")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn participant(client: &Client, base_url: &str, id: &str) -> ParticipantView {
    client
        .get(format!("{base_url}/api/participants/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_challenge_reports_unlocked_prefix() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let challenge: ChallengeResponse = client
        .get(format!("{}/api/challenge", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(challenge.available_days, 5);
    assert_eq!(challenge.total_days, 30);
    assert!((challenge.progress_percent - 5.0 / 30.0 * 100.0).abs() < 1e-9);
    assert_eq!(challenge.participants.len(), 2);
    assert_eq!(challenge.participants[0].id, "vini");

    for participant in &challenge.participants {
        assert_eq!(participant.available_days, 5);
        assert_eq!(participant.days.len(), 30);
        for day in &participant.days {
            assert_eq!(day.available, day.day <= 5, "day {}", day.day);
        }
    }
}

#[tokio::test]
async fn http_check_in_celebrates_once_then_edits() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let day_url = format!("{}/api/participants/vini/days/3", server.base_url);

    let draft: DraftResponse = client.get(&day_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(draft.day, 3);
    assert_eq!(draft.title, "");
    assert_eq!(draft.summary, "");

    let first: CheckInResponse = client
        .post(format!("{day_url}/check-in"))
        .json(&serde_json::json!({ "title": "  Ran 5k ", "summary": "easy pace" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(first.celebrate);
    assert_eq!(first.day, 3);
    assert!(first.record.completed);
    assert_eq!(first.record.title.as_deref(), Some("Ran 5k"));
    assert_eq!(first.record.summary.as_deref(), Some("easy pace"));

    let draft: DraftResponse = client.get(&day_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(draft.title, "Ran 5k");
    assert_eq!(draft.summary, "easy pace");

    let edit: CheckInResponse = client
        .post(format!("{day_url}/check-in"))
        .json(&serde_json::json!({ "title": "Ran 5k (edited)" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!edit.celebrate);
    assert_eq!(edit.completed_count, first.completed_count);
    assert_eq!(edit.record.title.as_deref(), Some("Ran 5k (edited)"));
    assert_eq!(edit.record.summary.as_deref(), Some(""));

    let vini = participant(&client, &server.base_url, "vini").await;
    assert_eq!(vini.days[2].title.as_deref(), Some("Ran 5k (edited)"));
}

#[tokio::test]
async fn http_blank_title_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = participant(&client, &server.base_url, "neto").await;
    let response = client
        .post(format!("{}/api/participants/neto/days/1/check-in", server.base_url))
        .json(&serde_json::json!({ "title": "   ", "summary": "ignored" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = participant(&client, &server.base_url, "neto").await;
    assert_eq!(after.completed_count, before.completed_count);
    assert!(!after.days[0].completed);
    assert_eq!(after.days[0].summary, None);
}

#[tokio::test]
async fn http_locked_and_unknown_days_are_refused() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let locked = client
        .post(format!("{base}/api/participants/neto/days/6/check-in"))
        .json(&serde_json::json!({ "title": "Too early" }))
        .send()
        .await
        .unwrap();
    assert_eq!(locked.status(), StatusCode::CONFLICT);

    let locked_open = client.get(format!("{base}/api/participants/neto/days/30")).send().await.unwrap();
    assert_eq!(locked_open.status(), StatusCode::CONFLICT);

    for path in [
        "/api/participants/ghost",
        "/api/participants/ghost/days/1",
        "/api/participants/vini/days/0",
        "/api/participants/vini/days/31",
    ] {
        let response = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }

    let neto = participant(&client, base, "neto").await;
    assert!(!neto.days[5].completed);
}

#[tokio::test]
async fn http_form_check_in_redirects_home() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::builder().redirect(Policy::none()).build().unwrap();

    let response = client
        .post(format!("{}/participants/neto/days/4/check-in", server.base_url))
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("title=Yoga&summary=morning+class")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let neto = participant(&client, &server.base_url, "neto").await;
    assert!(neto.days[3].completed);
    assert_eq!(neto.days[3].title.as_deref(), Some("Yoga"));
    assert_eq!(neto.days[3].summary.as_deref(), Some("morning class"));
}

#[tokio::test]
async fn http_index_renders_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client.get(&server.base_url).send().await.unwrap();
    assert!(response.status().is_success());
    let html = response.text().await.unwrap();
    assert!(html.contains("<h1>Become</h1>"));
    assert!(html.contains("5/30 days"));
    assert!(html.contains("Vini"));
    assert!(html.contains("Neto"));
}

#[tokio::test]
async fn http_day_page_offers_plain_form() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = &server.base_url;

    let response = client.get(format!("{base}/participants/vini/days/2")).send().await.unwrap();
    assert!(response.status().is_success());
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"action="/participants/vini/days/2/check-in""#));
    assert!(html.contains("Vini · Day 2"));

    let index = client.get(base.as_str()).send().await.unwrap().text().await.unwrap();
    assert!(index.contains(r#"formaction="/participants/vini/days/2""#));

    let locked = client.get(format!("{base}/participants/neto/days/20")).send().await.unwrap();
    assert_eq!(locked.status(), StatusCode::CONFLICT);
}
