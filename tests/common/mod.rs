#![allow(dead_code)]

use async_trait::async_trait;
use payhere_ipn::application::processor::NotificationProcessor;
use payhere_ipn::domain::acquirer::AcquirerConfig;
use payhere_ipn::domain::notification::RawFields;
use payhere_ipn::domain::ports::{EchoGateway, Lookup, MerchantNotifier, TransactionRepository};
use payhere_ipn::domain::transaction::Transaction;
use payhere_ipn::error::{NotifyError, Result};
use payhere_ipn::infrastructure::in_memory::InMemoryTransactionRepository;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How the fake gateway answers echo requests.
#[derive(Clone, Copy)]
pub enum Answer {
    /// Answers with the notification's status code as a bare number.
    Mirror,
    /// Answers with a fixed body, such as `VERIFIED` or `INVALID`.
    Fixed(&'static str),
    Unavailable,
}

pub struct FakeGateway {
    pub answer: Answer,
    pub delay: Duration,
    pub calls: AtomicUsize,
}

impl FakeGateway {
    pub fn new(answer: Answer) -> Arc<Self> {
        Self::with_delay(answer, Duration::ZERO)
    }

    pub fn with_delay(answer: Answer, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            answer,
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EchoGateway for FakeGateway {
    async fn post_echo(&self, _url: &str, fields: &RawFields) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.answer {
            Answer::Mirror => Ok(fields.get("status_code").cloned().unwrap_or_default()),
            Answer::Fixed(body) => Ok(body.to_string()),
            Answer::Unavailable => Err(NotifyError::EchoUnavailable("connection reset".to_string())),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub advisories: AtomicUsize,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.advisories.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MerchantNotifier for RecordingNotifier {
    async fn send_configuration_advisory(&self, _acquirer: &AcquirerConfig, _reference: &str) -> Result<()> {
        self.advisories.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory repository that counts writes.
#[derive(Clone, Default)]
pub struct CountingRepository {
    pub inner: InMemoryTransactionRepository,
    pub saves: Arc<AtomicUsize>,
}

impl CountingRepository {
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn get(&self, reference: &str) -> Transaction {
        match self.inner.find(reference).await.unwrap() {
            Lookup::Found(tx) => tx,
            other => panic!("expected a single transaction for {reference}, got {other:?}"),
        }
    }
}

#[async_trait]
impl TransactionRepository for CountingRepository {
    async fn find(&self, reference: &str) -> Result<Lookup> {
        self.inner.find(reference).await
    }

    async fn create(&self, tx: Transaction) -> Result<()> {
        self.inner.create(tx).await
    }

    async fn save(&self, tx: Transaction) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(tx).await
    }
}

pub struct Harness {
    pub processor: Arc<NotificationProcessor>,
    pub repo: CountingRepository,
    pub gateway: Arc<FakeGateway>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn acquirer() -> AcquirerConfig {
    AcquirerConfig {
        email_account: "dummy".to_string(),
        use_ipn: true,
        ..AcquirerConfig::default()
    }
}

pub fn harness(gateway: Arc<FakeGateway>, acquirer: AcquirerConfig) -> Harness {
    let repo = CountingRepository::default();
    let notifier = Arc::new(RecordingNotifier::default());
    let processor = NotificationProcessor::new(
        Box::new(repo.clone()),
        gateway.clone(),
        notifier.clone(),
        acquirer,
    );
    Harness {
        processor: Arc::new(processor),
        repo,
        gateway,
        notifier,
    }
}

/// Typical data posted by the gateway for a pending multi-currency payment.
pub fn pending_notification() -> RawFields {
    [
        ("merchant_id", "dummy"),
        ("order_id", "test_ref_2"),
        ("payment_id", "08D73520KX778924N"),
        ("payhere_amount", "1.95"),
        ("payhere_currency", "EUR"),
        ("status_code", "0"),
        ("pending_reason", "multi_currency"),
        ("handling_amount", "0.00"),
        ("receiver_email", "dummy"),
        ("receiver_id", "dummy"),
        ("business", "dummy"),
        ("payer_id", "VTDKRZQSAHYPS"),
        ("payment_date", "03:21:19 Nov 18, 2013 PST"),
        ("test_ipn", "1"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn with(mut fields: RawFields, key: &str, value: &str) -> RawFields {
    fields.insert(key.to_string(), value.to_string());
    fields
}
