use std::sync::Arc;

use cointill::inventory::Inventory;
use cointill::{AccountId, EconomyError, EconomyStore, Item, MemStore, Mutation};

const OWNER: AccountId = AccountId(31);

fn setup() -> (Arc<MemStore>, Inventory) {
    let store = Arc::new(MemStore::new());
    let inventory = Inventory::new(store.clone() as Arc<dyn EconomyStore>);
    (store, inventory)
}

#[tokio::test]
async fn add_item_updates_store_and_cache() {
    let (store, inventory) = setup();

    assert_eq!(inventory.add_item(OWNER, Item::Fish, 5).await.unwrap(), 5);
    assert_eq!(inventory.add_item(OWNER, Item::Fish, -2).await.unwrap(), 3);

    // The facade's own mutations keep the cache current.
    assert_eq!(inventory.quantity_of(OWNER, Item::Fish).await.unwrap(), 3);
    assert_eq!(store.quantity_of(OWNER, Item::Fish).await.unwrap(), 3);
}

#[tokio::test]
async fn consuming_more_than_held_fails_without_effect() {
    let (store, inventory) = setup();
    store.seed_item(OWNER, Item::Ore, 2).await;

    let err = inventory.add_item(OWNER, Item::Ore, -3).await.unwrap_err();
    assert!(matches!(
        err,
        EconomyError::InsufficientItems {
            item: Item::Ore,
            needed: 3,
            held: 2
        }
    ));
    assert_eq!(store.quantity_of(OWNER, Item::Ore).await.unwrap(), 2);
}

#[tokio::test]
async fn cache_needs_a_refresh_after_external_mutations() {
    let (store, inventory) = setup();
    store.seed_item(OWNER, Item::Fish, 1).await;

    // Prime the cache.
    assert_eq!(inventory.quantity_of(OWNER, Item::Fish).await.unwrap(), 1);

    // Mutate behind the facade's back.
    store
        .apply(&[Mutation::item(OWNER, Item::Fish, 9)])
        .await
        .unwrap();

    // The snapshot is stale until explicitly refreshed.
    assert_eq!(inventory.quantity_of(OWNER, Item::Fish).await.unwrap(), 1);
    let snapshot = inventory.refresh(OWNER).await.unwrap();
    assert_eq!(snapshot.quantity_of(Item::Fish), 10);
    assert_eq!(inventory.quantity_of(OWNER, Item::Fish).await.unwrap(), 10);
}

#[tokio::test]
async fn snapshot_omits_zeroed_entries() {
    let (_store, inventory) = setup();

    inventory.add_item(OWNER, Item::Fish, 4).await.unwrap();
    inventory.add_item(OWNER, Item::Fish, -4).await.unwrap();
    inventory.add_item(OWNER, Item::Worm, 2).await.unwrap();

    let snapshot = inventory.refresh(OWNER).await.unwrap();
    let listed: Vec<(Item, i64)> = snapshot.iter().collect();
    assert_eq!(listed, vec![(Item::Worm, 2)]);
    assert_eq!(snapshot.quantity_of(Item::Fish), 0);
}
