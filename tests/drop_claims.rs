use std::sync::Arc;
use std::time::Duration;

use cointill::{
    AccountId, DropOutcome, Economy, EconomyError, EconomyStore, Item, MemStore, Payload,
};
use tokio::sync::Barrier;

fn setup() -> (Arc<MemStore>, Economy) {
    let store = Arc::new(MemStore::new());
    let economy = Economy::new(store.clone() as Arc<dyn EconomyStore>);
    (store, economy)
}

const DROPPER: AccountId = AccountId(100);

#[tokio::test]
async fn dropping_escrows_the_amount_immediately() {
    let (store, economy) = setup();
    store.seed_balances(DROPPER, 500, 0).await;

    let drop = economy.drop_coins(DROPPER, 300).await.unwrap();
    assert_eq!(store.balances(DROPPER).await.unwrap().wallet, 200);
    assert_eq!(drop.payload(), Payload::Coins(300));
}

#[tokio::test]
async fn dropping_more_than_held_aborts_before_escrow() {
    let (store, economy) = setup();
    store.seed_item(DROPPER, Item::Ore, 1).await;

    let err = economy
        .drop_items(DROPPER, Item::Ore, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::InsufficientItems { .. }));
    assert_eq!(
        store.quantity_of(DROPPER, Item::Ore).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn first_claimant_wins_and_is_credited() {
    let (store, economy) = setup();
    store.seed_balances(DROPPER, 500, 0).await;

    let drop = economy
        .drop_entity(DROPPER, Payload::Coins(500))
        .await
        .unwrap();

    let winner = AccountId(7);
    drop.claim(winner).await.unwrap();
    assert!(matches!(
        drop.claim(AccountId(8)).await.unwrap_err(),
        EconomyError::AlreadyClaimed
    ));

    assert_eq!(
        drop.resolve_within(Duration::from_millis(10)).await.unwrap(),
        DropOutcome::Claimed(winner)
    );
    assert_eq!(store.balances(winner).await.unwrap().wallet, 500);
    assert_eq!(store.balances(DROPPER).await.unwrap().wallet, 0);
}

#[tokio::test]
async fn self_claims_are_rejected_without_consuming_the_drop() {
    let (store, economy) = setup();
    store.seed_balances(DROPPER, 100, 0).await;

    let drop = economy
        .drop_entity(DROPPER, Payload::Coins(100))
        .await
        .unwrap();

    assert!(matches!(
        drop.claim(DROPPER).await.unwrap_err(),
        EconomyError::InvalidTarget(_)
    ));

    // The drop stays open for somebody else.
    drop.claim(AccountId(9)).await.unwrap();
    assert_eq!(store.balances(AccountId(9)).await.unwrap().wallet, 100);
}

#[tokio::test]
async fn concurrent_claims_produce_exactly_one_winner() {
    let (store, economy) = setup();
    store.seed_balances(DROPPER, 1_000, 0).await;

    let drop = Arc::new(
        economy
            .drop_entity(DROPPER, Payload::Coins(1_000))
            .await
            .unwrap(),
    );

    let contenders = 8;
    let barrier = Arc::new(Barrier::new(contenders));
    let mut handles = Vec::new();
    for n in 0..contenders {
        let drop = drop.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            drop.claim(AccountId(200 + n as u64)).await
        }));
    }

    let mut wins = 0;
    let mut losses = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => wins += 1,
            Err(EconomyError::AlreadyClaimed) => losses += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(losses, contenders - 1);

    // The full escrow went to exactly one contender.
    let winner = match drop.resolve_within(Duration::from_millis(10)).await.unwrap() {
        DropOutcome::Claimed(winner) => winner,
        DropOutcome::Expired => panic!("drop should have been claimed"),
    };
    assert_eq!(store.balances(winner).await.unwrap().wallet, 1_000);
    let credited: i64 = {
        let mut total = 0;
        for n in 0..contenders {
            total += store
                .balances(AccountId(200 + n as u64))
                .await
                .unwrap()
                .wallet;
        }
        total
    };
    assert_eq!(credited, 1_000);
}

#[tokio::test]
async fn unclaimed_drop_expires_and_refunds_exactly_once() {
    let (store, economy) = setup();
    store.seed_item(DROPPER, Item::Fish, 3).await;

    let drop = economy
        .drop_entity(DROPPER, Payload::Items(Item::Fish, 3))
        .await
        .unwrap();
    assert_eq!(store.quantity_of(DROPPER, Item::Fish).await.unwrap(), 0);

    assert_eq!(
        drop.resolve_within(Duration::from_millis(20)).await.unwrap(),
        DropOutcome::Expired
    );
    assert_eq!(store.quantity_of(DROPPER, Item::Fish).await.unwrap(), 3);

    // A late claim after expiry loses and triggers no second credit.
    assert!(matches!(
        drop.claim(AccountId(5)).await.unwrap_err(),
        EconomyError::AlreadyClaimed
    ));
    assert_eq!(store.quantity_of(DROPPER, Item::Fish).await.unwrap(), 3);
    assert_eq!(store.quantity_of(AccountId(5), Item::Fish).await.unwrap(), 0);

    // Resolving again is idempotent.
    assert_eq!(
        drop.resolve_within(Duration::from_millis(1)).await.unwrap(),
        DropOutcome::Expired
    );
    assert_eq!(store.quantity_of(DROPPER, Item::Fish).await.unwrap(), 3);
}

#[tokio::test]
async fn item_drops_conserve_total_quantity() {
    let (store, economy) = setup();
    store.seed_item(DROPPER, Item::Ore, 10).await;

    let drop = economy
        .drop_entity(DROPPER, Payload::Items(Item::Ore, 4))
        .await
        .unwrap();
    let claimant = AccountId(42);
    drop.claim(claimant).await.unwrap();

    let total = store.quantity_of(DROPPER, Item::Ore).await.unwrap()
        + store.quantity_of(claimant, Item::Ore).await.unwrap();
    assert_eq!(total, 10);
}
