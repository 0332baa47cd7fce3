use payhere_ipn::domain::ports::{Lookup, TransactionRepository, TransactionRepositoryBox};
use payhere_ipn::domain::transaction::{Transaction, TransactionState};
use payhere_ipn::infrastructure::in_memory::InMemoryTransactionRepository;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_repository_as_trait_object() {
    let shared = InMemoryTransactionRepository::new();
    let repository: TransactionRepositoryBox = Box::new(shared.clone());

    let tx = Transaction::new("SO1", dec!(100.0), "LKR");

    // Verify Send + Sync by spawning tasks
    let handle = tokio::spawn(async move {
        repository.create(tx.clone()).await.unwrap();
        let mut pending = tx;
        pending.state = TransactionState::Pending;
        repository.save(pending).await.unwrap();
        repository.find("SO1").await.unwrap()
    });

    let Lookup::Found(found) = handle.await.unwrap() else {
        panic!("transaction not found");
    };
    assert_eq!(found.state, TransactionState::Pending);
    assert_eq!(shared.all("SO1").await, vec![found]);
}
