use std::sync::Arc;

use cointill::prompt::{AutoConfirm, AutoDecline, Confirm, Decision};
use cointill::{
    AccountId, Economy, EconomyError, EconomyStore, Item, Member, MemStore, Payload,
};

fn setup() -> (Arc<MemStore>, Economy) {
    let store = Arc::new(MemStore::new());
    let economy = Economy::new(store.clone() as Arc<dyn EconomyStore>);
    (store, economy)
}

fn alice() -> Member {
    Member::new(AccountId(1), "alice")
}

fn bob() -> Member {
    Member::new(AccountId(2), "bob")
}

#[tokio::test]
async fn sharing_coins_conserves_the_pair_total() {
    let (store, economy) = setup();
    store.seed_balances(alice().id, 1_000, 0).await;
    store.seed_balances(bob().id, 250, 0).await;

    let receipt = economy
        .share(&alice(), &bob(), Payload::Coins(400), &AutoConfirm)
        .await
        .unwrap();
    assert_eq!(receipt.sender_after, 600);
    assert_eq!(receipt.recipient_after, 650);

    let total = store.balances(alice().id).await.unwrap().wallet
        + store.balances(bob().id).await.unwrap().wallet;
    assert_eq!(total, 1_250);
}

#[tokio::test]
async fn sharing_items_moves_quantity_and_records_a_notification() {
    let (store, economy) = setup();
    store.seed_item(alice().id, Item::Fish, 5).await;

    let receipt = economy
        .share(&alice(), &bob(), Payload::Items(Item::Fish, 2), &AutoConfirm)
        .await
        .unwrap();
    assert_eq!(receipt.sender_after, 3);
    assert_eq!(receipt.recipient_after, 2);

    let notifications = economy.notifications(bob().id).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "You got items!");
    assert!(notifications[0].content.contains("alice"));

    // Sender gets no notification.
    assert!(economy.notifications(alice().id).await.unwrap().is_empty());
}

#[tokio::test]
async fn share_rejects_self_and_bot_targets() {
    let (store, economy) = setup();
    store.seed_balances(alice().id, 1_000, 0).await;

    let err = economy
        .share(&alice(), &alice(), Payload::Coins(10), &AutoConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::InvalidTarget(_)));

    let mut robot = bob();
    robot.bot = true;
    let err = economy
        .share(&alice(), &robot, Payload::Coins(10), &AutoConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::InvalidTarget(_)));

    assert_eq!(store.balances(alice().id).await.unwrap().wallet, 1_000);
}

#[tokio::test]
async fn share_without_funds_applies_neither_side() {
    let (store, economy) = setup();
    store.seed_balances(alice().id, 100, 0).await;

    let err = economy
        .share(&alice(), &bob(), Payload::Coins(101), &AutoConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::InsufficientFunds { .. }));
    assert_eq!(store.balances(alice().id).await.unwrap().wallet, 100);
    assert_eq!(store.balances(bob().id).await.unwrap().wallet, 0);
    assert!(economy.notifications(bob().id).await.unwrap().is_empty());
}

#[tokio::test]
async fn untradeable_items_cannot_be_shared() {
    let (store, economy) = setup();
    store.seed_item(alice().id, Item::XpBooster, 1).await;

    let err = economy
        .share(
            &alice(),
            &bob(),
            Payload::Items(Item::XpBooster, 1),
            &AutoConfirm,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::InvalidTarget(_)));
}

#[tokio::test]
async fn buy_debits_wallet_and_credits_inventory() {
    let (store, economy) = setup();
    store.seed_balances(alice().id, 1_000, 0).await;

    // Fish costs 20.
    let receipt = economy
        .buy(alice().id, Item::Fish, 3, &AutoConfirm)
        .await
        .unwrap();
    assert_eq!(receipt.coins, 60);
    assert_eq!(receipt.balances.wallet, 940);
    assert_eq!(store.quantity_of(alice().id, Item::Fish).await.unwrap(), 3);
}

#[tokio::test]
async fn declined_confirmation_cancels_with_no_side_effects() {
    let (store, economy) = setup();
    store.seed_balances(alice().id, 1_000, 0).await;
    store.seed_item(alice().id, Item::Fish, 4).await;

    let err = economy
        .buy(alice().id, Item::Fish, 1, &AutoDecline)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::Cancelled));

    let err = economy
        .sell(alice().id, Item::Fish, 2, &AutoDecline)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::Cancelled));

    assert_eq!(store.balances(alice().id).await.unwrap().wallet, 1_000);
    assert_eq!(store.quantity_of(alice().id, Item::Fish).await.unwrap(), 4);
}

#[tokio::test(start_paused = true)]
async fn unanswered_confirmation_counts_as_cancelled() {
    struct Unanswered;

    #[async_trait::async_trait]
    impl Confirm for Unanswered {
        async fn confirm(&self, _prompt: &str) -> Decision {
            std::future::pending().await
        }
    }

    let (store, economy) = setup();
    store.seed_balances(alice().id, 1_000, 0).await;

    let err = economy
        .buy(alice().id, Item::Fish, 1, &Unanswered)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::Cancelled));
    assert_eq!(store.balances(alice().id).await.unwrap().wallet, 1_000);
}

#[tokio::test]
async fn sell_credits_the_sell_value() {
    let (store, economy) = setup();
    store.seed_item(alice().id, Item::Fish, 10).await;

    // Fish sells for 10.
    let receipt = economy
        .sell(alice().id, Item::Fish, 4, &AutoConfirm)
        .await
        .unwrap();
    assert_eq!(receipt.coins, 40);
    assert_eq!(store.balances(alice().id).await.unwrap().wallet, 40);
    assert_eq!(store.quantity_of(alice().id, Item::Fish).await.unwrap(), 6);
}

#[tokio::test]
async fn absurd_quantities_are_refused_instead_of_overflowing() {
    let (store, economy) = setup();
    store.seed_balances(alice().id, 1_000, 0).await;
    store.seed_item(alice().id, Item::Fish, 10).await;

    // A cost that would exceed i64 must fail as a typed error, not wrap
    // into a negative debit.
    let err = economy
        .buy(alice().id, Item::Fish, i64::MAX / 2, &AutoConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::InvalidTarget(_)));

    let err = economy
        .sell(alice().id, Item::Fish, i64::MAX / 2, &AutoConfirm)
        .await
        .unwrap_err();
    assert!(matches!(err, EconomyError::InvalidTarget(_)));

    assert_eq!(store.balances(alice().id).await.unwrap().wallet, 1_000);
    assert_eq!(store.quantity_of(alice().id, Item::Fish).await.unwrap(), 10);
}

#[tokio::test]
async fn unbuyable_and_unsellable_items_are_refused() {
    let (store, economy) = setup();
    store.seed_balances(alice().id, 1_000_000, 0).await;
    store.seed_item(alice().id, Item::XpBooster, 1).await;

    // Golden fish has no buy price; XP boosters have no sell value.
    assert!(matches!(
        economy
            .buy(alice().id, Item::GoldenFish, 1, &AutoConfirm)
            .await
            .unwrap_err(),
        EconomyError::InvalidTarget(_)
    ));
    assert!(matches!(
        economy
            .sell(alice().id, Item::XpBooster, 1, &AutoConfirm)
            .await
            .unwrap_err(),
        EconomyError::InvalidTarget(_)
    ));
}

#[tokio::test]
async fn using_a_banknote_expands_the_bank() {
    let (store, economy) = setup();
    store.seed_item(alice().id, Item::Banknote, 2).await;
    let before = store.balances(alice().id).await.unwrap().max_bank;

    let report = economy.use_item(alice().id, Item::Banknote, 2).await.unwrap();
    assert!(report.consumed);

    let after = store.balances(alice().id).await.unwrap().max_bank;
    assert!(after > before);
    assert_eq!(
        store.quantity_of(alice().id, Item::Banknote).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn booster_activates_once_and_can_be_removed() {
    let (store, economy) = setup();
    store.seed_item(alice().id, Item::XpBooster, 2).await;

    economy.use_item(alice().id, Item::XpBooster, 1).await.unwrap();
    assert!(store.balances(alice().id).await.unwrap().boost_active);

    // A second activation is refused while one is running.
    assert!(matches!(
        economy
            .use_item(alice().id, Item::XpBooster, 1)
            .await
            .unwrap_err(),
        EconomyError::InvalidTarget(_)
    ));

    economy.remove_item(alice().id, Item::XpBooster).await.unwrap();
    assert!(!store.balances(alice().id).await.unwrap().boost_active);

    // Removing with nothing active is also refused.
    assert!(matches!(
        economy
            .remove_item(alice().id, Item::XpBooster)
            .await
            .unwrap_err(),
        EconomyError::InvalidTarget(_)
    ));
}

#[tokio::test]
async fn unusable_items_are_refused() {
    let (store, economy) = setup();
    store.seed_item(alice().id, Item::Ore, 1).await;

    assert!(matches!(
        economy.use_item(alice().id, Item::Ore, 1).await.unwrap_err(),
        EconomyError::InvalidTarget(_)
    ));
    assert!(matches!(
        economy.remove_item(alice().id, Item::Ore).await.unwrap_err(),
        EconomyError::InvalidTarget(_)
    ));
}
