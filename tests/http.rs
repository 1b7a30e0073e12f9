use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct SaveLogResponse {
    message: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("monk_mode_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/data")).send().await {
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
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_monk_mode"))
        .env("APP_HOST", "127.0.0.1")
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = spawn_server().await;
    #[cfg(unix)]
    cleanup::register(server.child.id());
    let server = Arc::new(server);
    *guard = Some(Arc::clone(&server));
    server
}

async fn fetch_document(client: &Client, base_url: &str) -> Value {
    client
        .get(format!("{base_url}/api/data"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_log(client: &Client, base_url: &str, log: Value) -> SaveLogResponse {
    let response = client
        .post(format!("{base_url}/api/log"))
        .json(&log)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

fn logs_for<'a>(document: &'a Value, date: &str) -> Vec<&'a Value> {
    document["daily_logs"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|log| log["date"] == date)
        .collect()
}

#[tokio::test]
async fn http_empty_store_serves_seeded_document() {
    let server = spawn_server().await;
    let client = Client::new();

    let document = fetch_document(&client, &server.base_url).await;

    assert_eq!(document["daily_logs"], json!([]));
    assert_eq!(document["user_profile"]["days_completed"], 0);
    assert_eq!(document["user_profile"]["streak_count"], 0);
    let badges = document["achievement_badges"].as_array().unwrap();
    assert!(!badges.is_empty());
    assert!(badges.iter().all(|badge| badge["earned"] == false));
    assert!(document["monk_mode_curriculum"].is_object());
}

#[tokio::test]
async fn http_first_log_on_empty_store_counts_one_day() {
    let server = spawn_server().await;
    let client = Client::new();

    let saved = post_log(
        &client,
        &server.base_url,
        json!({
            "date": "2024-01-01",
            "deep_work_hours": 3,
            "phone_screen_time": 0.5,
            "exercise_done": true,
            "sleep_hours": 7,
            "mood_score": 8,
            "meditation_done": true
        }),
    )
    .await;

    assert_eq!(saved.message, "Log saved successfully");
    assert_eq!(saved.data["daily_logs"].as_array().unwrap().len(), 1);
    assert_eq!(saved.data["user_profile"]["days_completed"], 1);
    assert_eq!(saved.data["daily_logs"][0]["exercise_type"], "");

    let stored = fetch_document(&client, &server.base_url).await;
    assert_eq!(stored, saved.data);
}

#[tokio::test]
async fn http_same_date_twice_keeps_second_value() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    post_log(&client, &server.base_url, json!({ "date": "2031-05-01", "mood_score": 3 })).await;
    let saved = post_log(&client, &server.base_url, json!({ "date": "2031-05-01", "mood_score": 9 })).await;

    let entries = logs_for(&saved.data, "2031-05-01");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["mood_score"], 9.0);

    let total = saved.data["daily_logs"].as_array().unwrap().len();
    assert_eq!(saved.data["user_profile"]["days_completed"], total);
    assert_eq!(saved.data["user_profile"]["streak_count"], total);
}

#[tokio::test]
async fn http_new_date_appends_after_existing_logs() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    post_log(&client, &server.base_url, json!({ "date": "2031-06-01" })).await;
    let saved = post_log(&client, &server.base_url, json!({ "date": "2031-06-02" })).await;

    let logs = saved.data["daily_logs"].as_array().unwrap();
    assert_eq!(logs.last().unwrap()["date"], "2031-06-02");
    assert_eq!(logs[logs.len() - 2]["date"], "2031-06-01");
}

#[tokio::test]
async fn http_log_without_date_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_document(&client, &server.base_url).await;
    let response = client
        .post(format!("{}/api/log", server.base_url))
        .json(&json!({ "deep_work_hours": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.unwrap();
    assert!(!body.message.is_empty());

    let after = fetch_document(&client, &server.base_url).await;
    assert_eq!(before["daily_logs"], after["daily_logs"]);
}

#[tokio::test]
async fn http_stats_fill_the_requested_window() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    post_log(
        &client,
        &server.base_url,
        json!({ "date": "2031-07-03", "deep_work_hours": 7, "sleep_hours": 7 }),
    )
    .await;

    let stats: Value = client
        .get(format!("{}/api/stats?date=2031-07-03&days=7", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let days = stats["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["date"], "2031-06-27");
    assert_eq!(days[6]["date"], "2031-07-03");
    assert_eq!(days[0]["mood_score"], 5.0);
    assert_eq!(stats["summary"]["avg_deep_work_hours"], 1.0);
    assert_eq!(stats["summary"]["avg_sleep_hours"], 1.0);
    assert_eq!(stats["current_streak"], 1);
}

#[tokio::test]
async fn http_loose_field_values_are_coerced() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let saved = post_log(
        &client,
        &server.base_url,
        json!({
            "date": "2031-08-01",
            "mood_score": "8",
            "exercise_done": "true",
            "sleep_hours": null,
            "notes": null
        }),
    )
    .await;

    let entries = logs_for(&saved.data, "2031-08-01");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["mood_score"], 8.0);
    assert_eq!(entries[0]["exercise_done"], true);
    assert_eq!(entries[0]["sleep_hours"], 0.0);
    assert_eq!(entries[0]["notes"], "");
}

#[tokio::test]
async fn http_unreadable_field_value_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/log", server.base_url))
        .json(&json!({ "date": "2031-08-02", "mood_score": [8] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = fetch_document(&client, &server.base_url).await;
    assert!(logs_for(&after, "2031-08-02").is_empty());
}

#[tokio::test]
async fn http_stats_reject_dates_at_the_calendar_edge() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/stats?date=%2B262142-12-31", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = response.json().await.unwrap();
    assert!(body.message.contains("out of range"));

    // the server is still answering
    let document = fetch_document(&client, &server.base_url).await;
    assert!(document["daily_logs"].is_array());
}

#[tokio::test]
async fn http_export_is_an_attachment() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"monk-mode-data-"));

    let body: Value = response.json().await.unwrap();
    assert!(body["daily_logs"].is_array());
}

#[tokio::test]
async fn http_dashboard_form_saves_today() {
    let server = spawn_server().await;
    let client = Client::new();

    let page = client.get(&server.base_url).send().await.unwrap();
    assert!(page.status().is_success());
    assert!(page.text().await.unwrap().contains("Monk Mode"));

    let response = client
        .post(format!("{}/log", server.base_url))
        .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("deep_work_hours=2.5&phone_screen_time=&exercise_done=true&exercise_type=Run&mood_score=7")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(response.text().await.unwrap().contains("saved successfully"));

    let document = fetch_document(&client, &server.base_url).await;
    let logs = document["daily_logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["deep_work_hours"], 2.5);
    assert_eq!(logs[0]["exercise_type"], "Run");
    assert_eq!(document["user_profile"]["days_completed"], 1);
}
