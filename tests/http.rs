use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Totals {
    good: u64,
    meh: u64,
    bad: u64,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct Averages {
    db: i64,
}

#[derive(Debug, Deserialize)]
struct RangeAggregate {
    device_id: String,
    scope: String,
    totals: Totals,
    total: u64,
    series: Vec<SeriesPoint>,
    averages: Averages,
    noise_level: Option<String>,
    air_quality: Option<String>,
    used_fallback: bool,
}

const TODAY: &str = "2025-06-11";

struct TestServer {
    base_url: String,
    data_dir: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::{Once, OnceLock};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);
    static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

    // The shared server lives in a static and is never dropped, so the
    // exit hook owns both the process and its data directory.
    pub fn register(pid: u32, data_dir: PathBuf) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            let _ = DATA_DIR.set(data_dir);
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
        if let Some(dir) = DATA_DIR.get() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("mood_monitor_http_{}_{}", std::process::id(), nanos));
    path
}

fn write_file(root: &Path, key: &str, body: &str) {
    let path = root.join(key);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

fn today() -> NaiveDate {
    NaiveDate::parse_from_str(TODAY, "%Y-%m-%d").unwrap()
}

fn seed_data(root: &Path) {
    let today = today();
    write_file(
        root,
        &format!("lab/{}/totals.json", today.format("%Y/%m/%d")),
        r#"{"good":2,"meh":1,"bad":0,"avg_sensor_day":{"temp":20,"db":40,"voc":30,"count":5}}"#,
    );
    write_file(root, "dept/totals.json", r#"{"good":9,"meh":3,"bad":1,"db":250}"#);
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
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
    let data_dir = unique_data_dir();
    seed_data(&data_dir);

    let child = Command::new(env!("CARGO_BIN_EXE_mood_monitor"))
        .env("PORT", port.to_string())
        .env("DASHBOARD_DATA_DIR", &data_dir)
        .env("DASHBOARD_DEVICE", "lab")
        .env("DASHBOARD_TODAY", TODAY)
        .env_remove("DASHBOARD_BASE_URL")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id(), data_dir.clone());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_dir,
        child,
    }
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

async fn fetch_aggregate(server: &TestServer, device: &str, scope: &str) -> RangeAggregate {
    Client::new()
        .get(format!("{}/api/aggregate", server.base_url))
        .query(&[("device", device), ("scope", scope)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_day_aggregate_reads_todays_file() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let aggregate = fetch_aggregate(&server, "lab", "day").await;

    assert_eq!(aggregate.device_id, "lab");
    assert_eq!(aggregate.scope, "day");
    assert_eq!((aggregate.totals.good, aggregate.totals.meh, aggregate.totals.bad), (2, 1, 0));
    assert_eq!(aggregate.total, 3);
    assert_eq!(aggregate.series.len(), 24);
    assert!(aggregate.series.iter().all(|point| point.value == 20.0));
    assert_eq!(aggregate.averages.db, 40);
    assert_eq!(aggregate.noise_level.as_deref(), Some("Sprechen"));
    assert_eq!(aggregate.air_quality.as_deref(), Some("gut"));
    assert!(!aggregate.used_fallback);
}

#[tokio::test]
async fn http_unknown_device_yields_zeros() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let aggregate = fetch_aggregate(&server, "nobody", "year").await;

    assert_eq!(aggregate.total, 0);
    assert_eq!(aggregate.series.len(), 12);
    assert!(aggregate.series.iter().all(|point| point.value == 0.0));
    assert_eq!(aggregate.averages.db, 0);
    assert!(!aggregate.used_fallback);
}

#[tokio::test]
async fn http_department_fallback_fills_empty_range() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let aggregate = fetch_aggregate(&server, "dept", "week").await;

    assert!(aggregate.used_fallback);
    assert_eq!((aggregate.totals.good, aggregate.totals.meh, aggregate.totals.bad), (9, 3, 1));
    assert_eq!(aggregate.series.len(), 7);
    assert_eq!(aggregate.averages.db, 250);
    assert_eq!(aggregate.noise_level, None);
}

#[tokio::test]
async fn http_rejects_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/aggregate", server.base_url))
        .query(&[("device", "lab"), ("scope", "decade")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/api/aggregate", server.base_url))
        .query(&[("device", "../lab"), ("scope", "day")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_select_updates_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let selected: Value = client
        .post(format!("{}/api/select", server.base_url))
        .json(&serde_json::json!({ "device": "lab", "scope": "week" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(selected["applied"], true);
    assert_eq!(selected["aggregate"]["series"].as_array().unwrap().len(), 7);
    // Pinned to a Wednesday: the seeded day is the third bucket.
    assert_eq!(selected["aggregate"]["series"][2]["value"], 20.0);
    assert_eq!(selected["aggregate"]["start_date"], "2025-06-09");

    let dashboard: Value = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dashboard["token"], selected["token"]);
    assert_eq!(dashboard["selection"]["device_id"], "lab");
    assert_eq!(dashboard["selection"]["scope"], "week");

    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"<a class="tab active" href="/?device=lab&scope=week">"#));
}

#[tokio::test]
async fn http_year_summary_counts_todays_votes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let today = today();

    let summary: Value = Client::new()
        .get(format!("{}/api/summary", server.base_url))
        .query(&[("device", "lab")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary["year"], today.year());
    assert_eq!(summary["totals"]["good"], 2);
    assert_eq!(summary["days_with_data"], 1);
    let month = &summary["months"][today.month0() as usize];
    assert_eq!(month["days_with_data"], 1);
    assert_eq!(summary["percent"]["good"], 67);
}
