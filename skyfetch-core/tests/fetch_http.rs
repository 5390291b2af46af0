//! Request execution tests against a local mock HTTP server.
//!
//! Covers both execution paths end to end: the blocking call on a worker
//! thread and the async executor, plus the error surface for HTTP failures,
//! empty and malformed bodies, and unreachable hosts.

use std::io::Write;
use std::sync::{Arc, Mutex};

use mockito::Matcher;
use skyfetch_core::{
    FetchError, MainReadings, RequestExecutor, Units, WeatherCall, WeatherEndpoint, WeatherQuery,
    WeatherRecord, execute_blocking,
};
use tracing_subscriber::fmt::MakeWriter;

/// Response body as OpenWeatherMap sends it, including fields the
/// decoder is expected to ignore.
const SAMPLE_BODY: &str = r#"{"coord":{"lon":-0.1257,"lat":51.5085},"main":{"temp":15.0,"pressure":1012,"humidity":72},"name":"London","cod":200}"#;

fn london_call(base_url: &str) -> WeatherCall {
    let query = WeatherQuery::new("London", Units::Metric, "test-key");
    WeatherEndpoint::new(base_url).current_weather(&query)
}

fn query_matcher() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("q".into(), "London".into()),
        Matcher::UrlEncoded("units".into(), "metric".into()),
        Matcher::UrlEncoded("APPID".into(), "test-key".into()),
    ])
}

fn expected_record() -> WeatherRecord {
    WeatherRecord {
        main: MainReadings {
            temp: 15.0,
            pressure: 1012,
            humidity: 72,
        },
    }
}

/// Bind a port, then release it, so requests against it are refused.
fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Collects formatted log output from the thread running under
/// `warnings_during`.
#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> LogSink {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber capturing warn-and-above events;
/// returns the formatted log text.
fn warnings_during(f: impl FnOnce()) -> String {
    let sink = LogSink::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(sink.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = sink.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn blocking_fetch_decodes_weather() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/data/2.5/weather")
        .match_query(query_matcher())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SAMPLE_BODY)
        .create();

    let record = execute_blocking(&london_call(&server.url())).unwrap();

    assert_eq!(record, expected_record());
    mock.assert();
}

#[test]
fn blocking_fetch_reports_http_status() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/data/2.5/weather")
        .match_query(query_matcher())
        .with_status(401)
        .with_body(r#"{"cod":401,"message":"Invalid API key"}"#)
        .create();

    let err = execute_blocking(&london_call(&server.url())).unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"), "unexpected body: {body}");
        }
        other => panic!("expected a status error, got: {other:?}"),
    }
    mock.assert();
}

#[test]
fn blocking_fetch_flags_empty_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/data/2.5/weather")
        .match_query(query_matcher())
        .with_status(200)
        .with_body("")
        .create();

    let err = execute_blocking(&london_call(&server.url())).unwrap_err();

    assert!(matches!(err, FetchError::EmptyBody), "got: {err:?}");
    mock.assert();
}

#[test]
fn blocking_fetch_flags_malformed_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/data/2.5/weather")
        .match_query(query_matcher())
        .with_status(200)
        .with_body("surprise, not json")
        .create();

    let err = execute_blocking(&london_call(&server.url())).unwrap_err();

    assert!(matches!(err, FetchError::Malformed(_)), "got: {err:?}");
    mock.assert();
}

#[test]
fn blocking_fetch_surfaces_connection_errors() {
    let err = execute_blocking(&london_call(&refused_base_url())).unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)), "got: {err:?}");
}

#[test]
fn worker_thread_delivers_outcome_over_channel() {
    // Mirrors the CLI's sync path: the blocking call runs on its own
    // thread and the outcome travels back over a oneshot channel.
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/data/2.5/weather")
        .match_query(query_matcher())
        .with_status(200)
        .with_body(SAMPLE_BODY)
        .create();

    let call = london_call(&server.url());
    let (tx, rx) = tokio::sync::oneshot::channel();
    std::thread::spawn(move || {
        let _ = tx.send(execute_blocking(&call));
    });

    let record = rx.blocking_recv().unwrap().unwrap();
    assert_eq!(record, expected_record());
    mock.assert();
}

#[tokio::test]
async fn async_fetch_decodes_weather() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/data/2.5/weather")
        .match_query(query_matcher())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SAMPLE_BODY)
        .create_async()
        .await;

    let executor = RequestExecutor::new().unwrap();
    let record = executor.execute(&london_call(&server.url())).await.unwrap();

    assert_eq!(record, expected_record());
    mock.assert_async().await;
}

#[tokio::test]
async fn pending_outcome_delivers_the_record() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/data/2.5/weather")
        .match_query(query_matcher())
        .with_status(200)
        .with_body(SAMPLE_BODY)
        .create_async()
        .await;

    let executor = RequestExecutor::new().unwrap();
    let pending = executor.execute_async(london_call(&server.url()));

    let record = pending.outcome().await.unwrap();
    assert_eq!(record, expected_record());
    mock.assert_async().await;
}

#[tokio::test]
async fn pending_outcome_delivers_connection_errors() {
    let executor = RequestExecutor::new().unwrap();
    let pending = executor.execute_async(london_call(&refused_base_url()));

    let err = pending.outcome().await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got: {err:?}");
}

#[test]
fn pending_outcome_aborts_when_runtime_shuts_down() {
    // Bound but never accepting: requests connect and then wait forever,
    // so the task is still in flight when its runtime is torn down.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let pending = rt.block_on(async {
        let executor = RequestExecutor::new().unwrap();
        executor.execute_async(london_call(&format!("http://{addr}")))
    });
    drop(rt);

    let outcome = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(pending.outcome());

    assert!(matches!(outcome, Err(FetchError::Aborted)), "got: {outcome:?}");
}

#[test]
fn transport_failure_emits_a_warning() {
    let logs = warnings_during(|| {
        let outcome = execute_blocking(&london_call(&refused_base_url()));
        assert!(matches!(outcome, Err(FetchError::Transport(_))));
    });

    assert!(logs.contains("current-weather request failed"), "got: {logs}");
}

#[test]
fn malformed_body_emits_a_warning() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/data/2.5/weather")
        .match_query(query_matcher())
        .with_status(200)
        .with_body("surprise, not json")
        .create();

    let logs = warnings_during(|| {
        let outcome = execute_blocking(&london_call(&server.url()));
        assert!(matches!(outcome, Err(FetchError::Malformed(_))));
    });

    assert!(logs.contains("current-weather request failed"), "got: {logs}");
    mock.assert();
}
