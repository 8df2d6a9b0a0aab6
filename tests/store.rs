mod common;

use common::{pizza, restaurant};
use pizza_api::{Entity, NewRestaurantPizza, Price, Store, StoreError, ValidationError};

#[tokio::test]
async fn prices_at_both_bounds_are_persisted() {
    let store = Store::in_memory().await.unwrap();
    let r = restaurant(&store, "A", "Main St").await;
    let p = pizza(&store, "Cheese", "Dough, Sauce, Cheese").await;

    for price in [1, 30] {
        let created = store
            .create_restaurant_pizza(NewRestaurantPizza::new(price, p.id, r.id).unwrap())
            .await
            .unwrap();
        assert_eq!(created.price.get(), price);
    }
    assert_eq!(store.list_restaurant_pizzas().await.unwrap().len(), 2);
}

#[tokio::test]
async fn out_of_range_prices_never_reach_the_store() {
    let store = Store::in_memory().await.unwrap();
    let r = restaurant(&store, "A", "Main St").await;
    let p = pizza(&store, "Cheese", "Dough, Sauce, Cheese").await;

    assert_eq!(
        NewRestaurantPizza::new(0, p.id, r.id),
        Err(ValidationError::PriceOutOfRange(0))
    );
    assert_eq!(
        NewRestaurantPizza::new(31, p.id, r.id),
        Err(ValidationError::PriceOutOfRange(31))
    );
    assert!(store.list_restaurant_pizzas().await.unwrap().is_empty());
}

#[tokio::test]
async fn table_rejects_out_of_range_price_written_directly() {
    let store = Store::in_memory().await.unwrap();
    let r = restaurant(&store, "A", "Main St").await;
    let p = pizza(&store, "Cheese", "Dough").await;

    let result = sqlx::query("INSERT INTO restaurant_pizzas (price, pizza_id, restaurant_id) VALUES (?, ?, ?)")
        .bind(31_i64)
        .bind(p.id)
        .bind(r.id)
        .execute(store.pool())
        .await;
    assert!(result.is_err());
    assert!(store.list_restaurant_pizzas().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_references_leave_nothing_behind() {
    let store = Store::in_memory().await.unwrap();
    let r = restaurant(&store, "A", "Main St").await;
    let p = pizza(&store, "Cheese", "Dough").await;

    let err = store
        .create_restaurant_pizza(NewRestaurantPizza::new(5, p.id + 1, r.id).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::MissingReference { entity: Entity::Pizza, id } if id == p.id + 1
    ));

    let err = store
        .create_restaurant_pizza(NewRestaurantPizza::new(5, p.id, r.id + 1).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::MissingReference { entity: Entity::Restaurant, .. }
    ));
    assert!(store.list_restaurant_pizzas().await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_follows_creation_order() {
    let store = Store::in_memory().await.unwrap();
    let names = ["Zeta", "Alpha", "Mu"];
    for name in names {
        restaurant(&store, name, "somewhere").await;
        pizza(&store, name, "Dough").await;
    }
    let restaurants: Vec<String> = store
        .list_restaurants()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    let pizzas: Vec<String> = store.list_pizzas().await.unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(restaurants, names);
    assert_eq!(pizzas, names);
}

#[tokio::test]
async fn get_missing_rows() {
    let store = Store::in_memory().await.unwrap();
    assert!(matches!(
        store.get_restaurant(1).await,
        Err(StoreError::NotFound { entity: Entity::Restaurant, id: 1 })
    ));
    assert!(matches!(
        store.get_pizza(2).await,
        Err(StoreError::NotFound { entity: Entity::Pizza, id: 2 })
    ));
    assert!(matches!(
        store.get_restaurant_pizza(3).await,
        Err(StoreError::NotFound { entity: Entity::RestaurantPizza, id: 3 })
    ));
    assert!(matches!(
        store.delete_restaurant(4).await,
        Err(StoreError::NotFound { entity: Entity::Restaurant, id: 4 })
    ));
}

#[tokio::test]
async fn deleting_a_pizza_removes_its_join_rows() {
    let store = Store::in_memory().await.unwrap();
    let r = restaurant(&store, "A", "Main St").await;
    let cheese = pizza(&store, "Cheese", "Dough").await;
    let plain = pizza(&store, "Plain", "Dough").await;
    store
        .create_restaurant_pizza(NewRestaurantPizza::new(8, cheese.id, r.id).unwrap())
        .await
        .unwrap();
    let kept = store
        .create_restaurant_pizza(NewRestaurantPizza::new(9, plain.id, r.id).unwrap())
        .await
        .unwrap();

    store.delete_pizza(cheese.id).await.unwrap();
    assert_eq!(store.list_restaurant_pizzas().await.unwrap(), vec![kept]);
    assert_eq!(store.get_restaurant(r.id).await.unwrap(), r);
}

#[tokio::test]
async fn price_update_goes_through_validation() {
    let store = Store::in_memory().await.unwrap();
    let r = restaurant(&store, "A", "Main St").await;
    let p = pizza(&store, "Cheese", "Dough").await;
    let created = store
        .create_restaurant_pizza(NewRestaurantPizza::new(8, p.id, r.id).unwrap())
        .await
        .unwrap();

    assert!(Price::new(31).is_err());
    let updated = store
        .update_restaurant_pizza_price(created.id, Price::new(30).unwrap())
        .await
        .unwrap();
    assert_eq!(updated.price.get(), 30);
    assert_eq!(store.get_restaurant_pizza(created.id).await.unwrap(), updated);

    assert!(matches!(
        store.update_restaurant_pizza_price(created.id + 1, Price::new(2).unwrap()).await,
        Err(StoreError::NotFound { entity: Entity::RestaurantPizza, .. })
    ));
}

#[tokio::test]
async fn relations_hold_the_rows_each_side_needs() {
    let store = Store::in_memory().await.unwrap();
    let a = restaurant(&store, "A", "Main St").await;
    let b = restaurant(&store, "B", "Side St").await;
    let p = pizza(&store, "Cheese", "Dough").await;
    let rp_a = store
        .create_restaurant_pizza(NewRestaurantPizza::new(8, p.id, a.id).unwrap())
        .await
        .unwrap();
    let rp_b = store
        .create_restaurant_pizza(NewRestaurantPizza::new(9, p.id, b.id).unwrap())
        .await
        .unwrap();

    let relations = store.restaurant_relations(a.id).await.unwrap();
    let joins: Vec<_> = relations.restaurant_pizzas_of_restaurant(a.id).cloned().collect();
    assert_eq!(joins, vec![rp_a.clone()]);
    assert_eq!(relations.pizza(p.id), Some(&p));

    let relations = store.pizza_relations(p.id).await.unwrap();
    let joins: Vec<_> = relations.restaurant_pizzas_of_pizza(p.id).cloned().collect();
    assert_eq!(joins, vec![rp_a.clone(), rp_b]);
    assert_eq!(relations.restaurant(b.id), Some(&b));

    let relations = store.restaurant_pizza_relations(&rp_a).await.unwrap();
    assert_eq!(relations.restaurant(a.id), Some(&a));
    assert_eq!(relations.pizza(p.id), Some(&p));
}
