mod common;

use common::{Answer, FakeGateway, acquirer, harness, pending_notification, with};
use payhere_ipn::domain::ports::TransactionRepository;
use payhere_ipn::domain::transaction::{Transaction, TransactionState};
use rand::seq::SliceRandom;
use rust_decimal_macros::dec;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicates_transition_once() {
    let h = harness(
        FakeGateway::with_delay(Answer::Fixed("VERIFIED"), Duration::from_millis(10)),
        acquirer(),
    );
    h.repo
        .create(Transaction::new("test_ref_2", dec!(1.95), "EUR"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let processor = h.processor.clone();
        handles.push(tokio::spawn(async move {
            processor.handle(&pending_notification()).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(h.repo.get("test_ref_2").await.state, TransactionState::Pending);
    assert_eq!(h.repo.saves(), 1);
    assert_eq!(h.notifier.count(), 1);
    assert_eq!(h.gateway.calls(), 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_out_of_order_delivery_settles_on_done() {
    let mut deliveries = Vec::new();
    for _ in 0..5 {
        deliveries.push(pending_notification());
        deliveries.push(with(pending_notification(), "status_code", "2"));
    }
    deliveries.shuffle(&mut rand::thread_rng());

    let h = harness(FakeGateway::new(Answer::Fixed("VERIFIED")), acquirer());
    h.repo
        .create(Transaction::new("test_ref_2", dec!(1.95), "EUR"))
        .await
        .unwrap();

    let handles: Vec<_> = deliveries
        .into_iter()
        .map(|fields| {
            let processor = h.processor.clone();
            tokio::spawn(async move { processor.handle(&fields).await.unwrap() })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let tx = h.repo.get("test_ref_2").await;
    assert_eq!(tx.state, TransactionState::Done);
    assert!(tx.completed_at.is_some());
    // draft -> done, or draft -> pending -> done
    assert!((1..=2).contains(&h.repo.saves()));
    assert!(h.notifier.count() <= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_references_are_processed_independently() {
    let h = harness(
        FakeGateway::with_delay(Answer::Fixed("VERIFIED"), Duration::from_millis(5)),
        acquirer(),
    );
    for i in 0..10 {
        h.repo
            .create(Transaction::new(format!("SO{i}"), dec!(1.95), "EUR"))
            .await
            .unwrap();
    }

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let processor = h.processor.clone();
            let fields = with(
                with(pending_notification(), "order_id", &format!("SO{i}-1")),
                "status_code",
                "2",
            );
            tokio::spawn(async move { processor.handle(&fields).await.unwrap() })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_processed());
    }

    for i in 0..10 {
        assert_eq!(h.repo.get(&format!("SO{i}")).await.state, TransactionState::Done);
    }
    assert_eq!(h.repo.saves(), 10);
}
