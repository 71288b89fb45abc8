//! Integration tests for the identifier exchange: platform discovery,
//! binding, the two-transaction protocol, and callback delivery.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use tokio::sync::mpsc;

use adrun::AdIdClient;
use adrun::AdInfo;
use adrun::BindTarget;
use adrun::Deferred;
use adrun::Error;
use adrun::Immediate;
use adrun::Listener;
use adrun::LocalPlatform;
use adrun::Platform;
use adrun::Transport;
use adrun::client::PROVIDER_PACKAGE;
use adrun::client::SERVICE_ACTION;
use adrun::client::SERVICE_PACKAGE;
use adrun::connector::Notifier;
use adrun::get_ad_info;
use adrun::mock_service::MockIdentifierService;
use adwire::RemoteFault;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn identifier_target() -> BindTarget {
    BindTarget::new(SERVICE_ACTION, SERVICE_PACKAGE)
}

fn platform_with_service(service: Arc<dyn Transport>) -> LocalPlatform {
    let platform = LocalPlatform::new();
    platform.add_package(PROVIDER_PACKAGE);
    platform.add_service(identifier_target(), service);
    platform
}

/// Listener that forwards the outcome over a channel and counts deliveries.
struct ChannelListener {
    tx: mpsc::UnboundedSender<Result<AdInfo, Error>>,
    deliveries: Arc<AtomicUsize>,
}

impl ChannelListener {
    fn new() -> (
        Self,
        mpsc::UnboundedReceiver<Result<AdInfo, Error>>,
        Arc<AtomicUsize>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let deliveries = Arc::new(AtomicUsize::new(0));
        (
            Self {
                tx,
                deliveries: Arc::clone(&deliveries),
            },
            rx,
            deliveries,
        )
    }
}

impl Listener for ChannelListener {
    fn on_success(&self, info: AdInfo) {
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(Ok(info));
    }

    fn on_error(&self, error: Error) {
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send(Err(error));
    }
}

/// Platform wrapper that counts unbind calls.
struct CountingPlatform {
    inner: LocalPlatform,
    unbinds: AtomicUsize,
}

impl CountingPlatform {
    fn new(inner: LocalPlatform) -> Self {
        Self {
            inner,
            unbinds: AtomicUsize::new(0),
        }
    }
}

impl Platform for CountingPlatform {
    fn has_package(&self, package: &str) -> bool {
        self.inner.has_package(package)
    }

    fn bind(&self, target: &BindTarget, notifier: Notifier) -> bool {
        self.inner.bind(target, notifier)
    }

    fn unbind(&self, target: &BindTarget) {
        self.unbinds.fetch_add(1, Ordering::SeqCst);
        self.inner.unbind(target);
    }
}

/// Drives one exchange with an immediate executor and returns the outcome
/// plus how many times the listener fired.
async fn run_exchange(platform: Arc<dyn Platform>) -> (Result<AdInfo, Error>, usize) {
    let (listener, mut rx, deliveries) = ChannelListener::new();
    let client = AdIdClient::new(platform, Arc::new(Immediate::new()));
    client.fetch(listener).await;

    let outcome = rx.recv().await.expect("Outcome was never delivered");
    (outcome, deliveries.load(Ordering::SeqCst))
}

// --- Test 1: Successful Exchange ---

#[tokio::test]
async fn test_successful_exchange() {
    init_tracing();
    let platform = Arc::new(platform_with_service(Arc::new(MockIdentifierService::new(
        "abc123", true,
    ))));

    let (outcome, deliveries) = run_exchange(platform).await;
    assert_eq!(
        outcome.expect("Exchange failed"),
        AdInfo {
            id: "abc123".to_string(),
            tracking_limited: true,
        }
    );
    assert_eq!(deliveries, 1);
}

// --- Test 2: Provider Missing ---

#[tokio::test]
async fn test_provider_missing() {
    let platform = Arc::new(LocalPlatform::new());

    let (outcome, deliveries) = run_exchange(platform).await;
    let error = outcome.expect_err("Exchange should have failed");
    assert!(matches!(error, Error::ProviderMissing(_)));
    assert_eq!(error.to_string(), "package 'com.android.vending' not found");
    assert_eq!(deliveries, 1);
}

// --- Test 3: Synchronous Bind Refusal ---

#[tokio::test]
async fn test_bind_refusal_without_release() {
    // provider installed, but nothing answers the bind action
    let inner = LocalPlatform::new();
    inner.add_package(PROVIDER_PACKAGE);
    let counting = Arc::new(CountingPlatform::new(inner));

    let (outcome, deliveries) = run_exchange(counting.clone()).await;
    let error = outcome.expect_err("Exchange should have failed");
    assert!(matches!(error, Error::BadConnection));
    assert_eq!(error.to_string(), "Bad GMS service connection");
    assert_eq!(counting.unbinds.load(Ordering::SeqCst), 0);
    assert_eq!(deliveries, 1);
}

// --- Test 4: Remote Fault After a Live Connection ---

#[tokio::test]
async fn test_remote_fault_releases_once() {
    let fault = RemoteFault {
        code: -7,
        message: "identifier backend gone".to_string(),
    };
    let inner = platform_with_service(Arc::new(MockIdentifierService::faulty(fault)));
    let counting = Arc::new(CountingPlatform::new(inner));

    let (outcome, deliveries) = run_exchange(counting.clone()).await;
    let error = outcome.expect_err("Exchange should have failed");
    assert!(matches!(error, Error::Remote(_)));
    assert!(error.to_string().contains("identifier backend gone"));
    assert_eq!(counting.unbinds.load(Ordering::SeqCst), 1);
    assert_eq!(deliveries, 1);
}

// --- Test 5: Empty Identifier ---

#[tokio::test]
async fn test_empty_identifier_is_a_failure() {
    let inner = platform_with_service(Arc::new(MockIdentifierService::new("", false)));
    let counting = Arc::new(CountingPlatform::new(inner));

    let (outcome, deliveries) = run_exchange(counting.clone()).await;
    let error = outcome.expect_err("Exchange should have failed");
    assert!(matches!(error, Error::EmptyIdentifier));
    assert_eq!(error.to_string(), "Ad ID is null or empty");
    assert_eq!(counting.unbinds.load(Ordering::SeqCst), 1);
    assert_eq!(deliveries, 1);
}

// --- Test 6: Abandoned Connection Wait ---

struct AbandoningPlatform {
    unbinds: AtomicUsize,
}

impl Platform for AbandoningPlatform {
    fn has_package(&self, _package: &str) -> bool {
        true
    }

    fn bind(&self, _target: &BindTarget, notifier: Notifier) -> bool {
        // accept the bind, then never connect
        drop(notifier);
        true
    }

    fn unbind(&self, _target: &BindTarget) {
        self.unbinds.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_abandoned_wait_is_interrupted() {
    let abandoning = Arc::new(AbandoningPlatform {
        unbinds: AtomicUsize::new(0),
    });

    let (outcome, deliveries) = run_exchange(abandoning.clone()).await;
    let error = outcome.expect_err("Exchange should have failed");
    assert!(matches!(error, Error::Interrupted(_)));
    assert_eq!(abandoning.unbinds.load(Ordering::SeqCst), 1);
    assert_eq!(deliveries, 1);
}

// --- Test 7: Immediate Context Delivers Synchronously ---

struct SlotListener {
    slot: Arc<Mutex<Option<Result<AdInfo, Error>>>>,
}

impl Listener for SlotListener {
    fn on_success(&self, info: AdInfo) {
        *self.slot.lock().unwrap() = Some(Ok(info));
    }

    fn on_error(&self, error: Error) {
        *self.slot.lock().unwrap() = Some(Err(error));
    }
}

#[tokio::test]
async fn test_immediate_delivery_is_synchronous() {
    let platform: Arc<dyn Platform> = Arc::new(platform_with_service(Arc::new(
        MockIdentifierService::new("abc123", false),
    )));
    let slot = Arc::new(Mutex::new(None));
    let listener = SlotListener {
        slot: Arc::clone(&slot),
    };

    let client = AdIdClient::new(platform, Arc::new(Immediate::new()));
    client.fetch(listener).await;

    // no queue to drain: the callback already ran on this path
    assert!(slot.lock().unwrap().is_some());
}

// --- Test 8: Deferred Context Delivers Only After the Queue Drains ---

#[tokio::test]
async fn test_deferred_delivery_waits_for_drain() {
    let platform: Arc<dyn Platform> = Arc::new(platform_with_service(Arc::new(
        MockIdentifierService::new("abc123", false),
    )));
    let slot = Arc::new(Mutex::new(None));
    let listener = SlotListener {
        slot: Arc::clone(&slot),
    };

    let (executor, mut queue) = Deferred::channel();
    let client = AdIdClient::new(platform, Arc::new(executor));
    client.fetch(listener).await;

    assert!(slot.lock().unwrap().is_none());
    assert_eq!(queue.drain(), 1);
    assert!(slot.lock().unwrap().is_some());
}

// --- Test 9: One-Call Entry Point ---

#[tokio::test]
async fn test_get_ad_info_spawns_and_delivers() {
    let platform: Arc<dyn Platform> = Arc::new(platform_with_service(Arc::new(
        MockIdentifierService::new("abc123", true),
    )));
    let (listener, mut rx, deliveries) = ChannelListener::new();

    get_ad_info(platform, listener);

    let outcome = rx.recv().await.expect("Outcome was never delivered");
    let info = outcome.expect("Exchange failed");
    assert_eq!(info.id, "abc123");
    assert!(info.tracking_limited);
    assert_eq!(deliveries.load(Ordering::SeqCst), 1);
}

// --- Test 10: Arbitrary Identifiers Survive the Full Exchange ---

#[tokio::test]
async fn test_arbitrary_identifier_roundtrip() {
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    let id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(36)
        .map(char::from)
        .collect();

    let platform = Arc::new(platform_with_service(Arc::new(MockIdentifierService::new(
        id.clone(),
        false,
    ))));

    let (outcome, _) = run_exchange(platform).await;
    assert_eq!(outcome.expect("Exchange failed").id, id);
}
