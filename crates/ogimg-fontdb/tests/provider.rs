// this_file: crates/ogimg-fontdb/tests/provider.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ogimg_core::FontError;
use ogimg_fontdb::{FontFetcher, FontProvider, FontSource, LEGACY_USER_AGENT};

const CSS_URL: &str = "https://fonts.test/css2?family=Noto+Sans+KR:wght@700";
const FONT_URL: &str = "https://static.fonts.test/noto-sans-kr-700.ttf";
const TEST_FONT: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../test-fonts/Tuffy.ttf"));

enum Stylesheet {
    Found,
    Missing,
    Fails,
}

/// Counts requests and answers from fixtures, with an optional delay
struct MockFetcher {
    stylesheet: Stylesheet,
    binary: Vec<u8>,
    delay: Duration,
    text_calls: AtomicUsize,
    byte_calls: AtomicUsize,
    agents: Mutex<Vec<String>>,
}

impl MockFetcher {
    fn new(stylesheet: Stylesheet) -> Self {
        Self {
            stylesheet,
            binary: TEST_FONT.to_vec(),
            delay: Duration::ZERO,
            text_calls: AtomicUsize::new(0),
            byte_calls: AtomicUsize::new(0),
            agents: Mutex::new(Vec::new()),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn serving(mut self, binary: &[u8]) -> Self {
        self.binary = binary.to_vec();
        self
    }
}

#[async_trait]
impl FontFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str, user_agent: &str) -> Result<String, FontError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.agents.lock().unwrap().push(user_agent.to_string());
        tokio::time::sleep(self.delay).await;

        assert_eq!(url, CSS_URL);
        match self.stylesheet {
            Stylesheet::Found => Ok(format!(
                "@font-face {{\n  font-family: 'Noto Sans KR';\n  src: url({}) format('truetype');\n}}\n",
                FONT_URL
            )),
            Stylesheet::Missing => Ok("/* nothing for you */".to_string()),
            Stylesheet::Fails => Err(FontError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FontError> {
        self.byte_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(url, FONT_URL);
        Ok(self.binary.clone())
    }
}

fn provider(fetcher: &Arc<MockFetcher>) -> FontProvider {
    let source = FontSource::default().with_stylesheet_url(CSS_URL);
    FontProvider::with_fetcher(source, fetcher.clone())
}

#[tokio::test]
async fn test_concurrent_first_loads_share_one_fetch() {
    let fetcher = Arc::new(MockFetcher::new(Stylesheet::Found).with_delay(Duration::from_millis(50)));
    let provider = Arc::new(provider(&fetcher));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let provider = provider.clone();
            tokio::spawn(async move { provider.load().await })
        })
        .collect();

    for result in futures::future::join_all(handles).await {
        let font = result.expect("task joined").expect("font loaded");
        assert_eq!(font.family(), "Noto Sans KR");
        assert_eq!(font.weight(), 700);
    }

    assert_eq!(fetcher.text_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.byte_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_later_loads_are_cache_hits() {
    let fetcher = Arc::new(MockFetcher::new(Stylesheet::Found));
    let provider = provider(&fetcher);

    let first = provider.load().await.unwrap();
    let second = provider.load().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.data(), TEST_FONT);
    assert_eq!(fetcher.text_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.byte_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stylesheet_request_uses_legacy_agent() {
    let fetcher = Arc::new(MockFetcher::new(Stylesheet::Found));
    provider(&fetcher).load().await.unwrap();

    assert_eq!(*fetcher.agents.lock().unwrap(), vec![LEGACY_USER_AGENT.to_string()]);
}

#[tokio::test]
async fn test_missing_url_is_a_resolution_error() {
    let fetcher = Arc::new(MockFetcher::new(Stylesheet::Missing));
    let provider = provider(&fetcher);

    let err = provider.load().await.unwrap_err();
    assert_eq!(
        err,
        FontError::Resolution {
            url: CSS_URL.to_string()
        }
    );
    assert_eq!(fetcher.byte_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failure_is_cached_not_retried() {
    let fetcher = Arc::new(MockFetcher::new(Stylesheet::Fails));
    let provider = provider(&fetcher);

    let first = provider.load().await.unwrap_err();
    let second = provider.load().await.unwrap_err();

    assert!(matches!(first, FontError::Network { .. }));
    assert_eq!(first, second);
    assert_eq!(fetcher.text_calls.load(Ordering::SeqCst), 1);
    assert!(matches!(provider.cached(), Some(Err(_))));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let fetcher = Arc::new(MockFetcher::new(Stylesheet::Found).with_delay(Duration::from_secs(5)));
    let source = FontSource::default()
        .with_stylesheet_url(CSS_URL)
        .with_timeout(Duration::from_millis(50));
    let provider = FontProvider::with_fetcher(source, fetcher.clone());

    let err = provider.load().await.unwrap_err();
    assert!(matches!(err, FontError::Timeout { .. }));
    assert_eq!(fetcher.byte_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_font_body_is_a_cached_failure() {
    let fetcher = Arc::new(
        MockFetcher::new(Stylesheet::Found).serving(b"<!DOCTYPE html><title>Service Unavailable</title>"),
    );
    let provider = provider(&fetcher);

    let err = provider.load().await.unwrap_err();
    match &err {
        FontError::Invalid { url, .. } => assert_eq!(url, FONT_URL),
        other => panic!("expected an invalid font error, got {other:?}"),
    }

    assert_eq!(provider.load().await.unwrap_err(), err);
    assert_eq!(fetcher.byte_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_timeout_reports_sub_second_budget() {
    let fetcher = Arc::new(MockFetcher::new(Stylesheet::Found).with_delay(Duration::from_secs(5)));
    let source = FontSource::default()
        .with_stylesheet_url(CSS_URL)
        .with_timeout(Duration::from_millis(50));
    let provider = FontProvider::with_fetcher(source, fetcher);

    let err = provider.load().await.unwrap_err();
    assert_eq!(
        err,
        FontError::Timeout {
            after: Duration::from_millis(50)
        }
    );
    assert_eq!(err.to_string(), "Font fetch timed out after 50ms");
}
