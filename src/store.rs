//! SQLite-backed data access for restaurants, pizzas and their join rows.
//! Every mutating call runs in its own transaction.

use crate::error::{Entity, StoreError};
use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Price, Relations, Restaurant, RestaurantPizza,
    RestaurantPizzaRow,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use std::str::FromStr;
use std::time::Duration;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS restaurants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pizzas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        ingredients TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS restaurant_pizzas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        price INTEGER NOT NULL CHECK (price BETWEEN 1 AND 30),
        pizza_id INTEGER NOT NULL REFERENCES pizzas (id) ON DELETE CASCADE,
        restaurant_id INTEGER NOT NULL REFERENCES restaurants (id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS restaurant_pizzas_restaurant_id ON restaurant_pizzas (restaurant_id)",
    "CREATE INDEX IF NOT EXISTS restaurant_pizzas_pizza_id ON restaurant_pizzas (pizza_id)",
];

const RESTAURANT_COLUMNS: &str = "id, name, address";
const PIZZA_COLUMNS: &str = "id, name, ingredients";
const RESTAURANT_PIZZA_COLUMNS: &str = "id, price, pizza_id, restaurant_id";

/// Handle to the relational store. Cheap to clone; clones share the pool.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool on `database_url`, creating the database file if missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// Fresh migrated in-memory database. Each `:memory:` connection is its own database,
    /// so the pool is pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        tracing::debug!("schema ready");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All restaurants in creation order.
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, StoreError> {
        let sql = format!("SELECT {} FROM restaurants ORDER BY id", RESTAURANT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Restaurant>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn get_restaurant(&self, id: i64) -> Result<Restaurant, StoreError> {
        let sql = format!("SELECT {} FROM restaurants WHERE id = ?", RESTAURANT_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Restaurant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: Entity::Restaurant, id })
    }

    pub async fn create_restaurant(&self, new: NewRestaurant) -> Result<Restaurant, StoreError> {
        let sql = format!(
            "INSERT INTO restaurants (name, address) VALUES (?, ?) RETURNING {}",
            RESTAURANT_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let mut tx = self.pool.begin().await?;
        let restaurant = sqlx::query_as::<_, Restaurant>(&sql)
            .bind(&new.name)
            .bind(&new.address)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(restaurant)
    }

    /// Delete a restaurant together with its join rows.
    pub async fn delete_restaurant(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let joins = delete_where(&mut tx, "DELETE FROM restaurant_pizzas WHERE restaurant_id = ?", id).await?;
        let deleted = delete_where(&mut tx, "DELETE FROM restaurants WHERE id = ?", id).await?;
        if deleted == 0 {
            return Err(StoreError::NotFound { entity: Entity::Restaurant, id });
        }
        tx.commit().await?;
        tracing::info!(id, joins, "deleted restaurant");
        Ok(())
    }

    /// All pizzas in creation order.
    pub async fn list_pizzas(&self) -> Result<Vec<Pizza>, StoreError> {
        let sql = format!("SELECT {} FROM pizzas ORDER BY id", PIZZA_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        Ok(sqlx::query_as::<_, Pizza>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn get_pizza(&self, id: i64) -> Result<Pizza, StoreError> {
        let sql = format!("SELECT {} FROM pizzas WHERE id = ?", PIZZA_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Pizza>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: Entity::Pizza, id })
    }

    pub async fn create_pizza(&self, new: NewPizza) -> Result<Pizza, StoreError> {
        let sql = format!(
            "INSERT INTO pizzas (name, ingredients) VALUES (?, ?) RETURNING {}",
            PIZZA_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let mut tx = self.pool.begin().await?;
        let pizza = sqlx::query_as::<_, Pizza>(&sql)
            .bind(&new.name)
            .bind(&new.ingredients)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(pizza)
    }

    /// Delete a pizza together with its join rows.
    pub async fn delete_pizza(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let joins = delete_where(&mut tx, "DELETE FROM restaurant_pizzas WHERE pizza_id = ?", id).await?;
        let deleted = delete_where(&mut tx, "DELETE FROM pizzas WHERE id = ?", id).await?;
        if deleted == 0 {
            return Err(StoreError::NotFound { entity: Entity::Pizza, id });
        }
        tx.commit().await?;
        tracing::info!(id, joins, "deleted pizza");
        Ok(())
    }

    /// Insert a join row. Both referenced rows must exist; nothing is written otherwise.
    pub async fn create_restaurant_pizza(&self, new: NewRestaurantPizza) -> Result<RestaurantPizza, StoreError> {
        let mut tx = self.pool.begin().await?;
        if !exists(&mut tx, "pizzas", new.pizza_id).await? {
            return Err(StoreError::MissingReference { entity: Entity::Pizza, id: new.pizza_id });
        }
        if !exists(&mut tx, "restaurants", new.restaurant_id).await? {
            return Err(StoreError::MissingReference {
                entity: Entity::Restaurant,
                id: new.restaurant_id,
            });
        }
        let sql = format!(
            "INSERT INTO restaurant_pizzas (price, pizza_id, restaurant_id) VALUES (?, ?, ?) RETURNING {}",
            RESTAURANT_PIZZA_COLUMNS
        );
        tracing::debug!(sql = %sql, price = new.price.get(), "query (tx)");
        let row = sqlx::query_as::<_, RestaurantPizzaRow>(&sql)
            .bind(new.price.get())
            .bind(new.pizza_id)
            .bind(new.restaurant_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        row.try_into()
    }

    pub async fn get_restaurant_pizza(&self, id: i64) -> Result<RestaurantPizza, StoreError> {
        let sql = format!("SELECT {} FROM restaurant_pizzas WHERE id = ?", RESTAURANT_PIZZA_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, RestaurantPizzaRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound { entity: Entity::RestaurantPizza, id })?
            .try_into()
    }

    /// All join rows in creation order.
    pub async fn list_restaurant_pizzas(&self) -> Result<Vec<RestaurantPizza>, StoreError> {
        let sql = format!("SELECT {} FROM restaurant_pizzas ORDER BY id", RESTAURANT_PIZZA_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        sqlx::query_as::<_, RestaurantPizzaRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(RestaurantPizza::try_from)
            .collect()
    }

    pub async fn update_restaurant_pizza_price(&self, id: i64, price: Price) -> Result<RestaurantPizza, StoreError> {
        let sql = format!(
            "UPDATE restaurant_pizzas SET price = ? WHERE id = ? RETURNING {}",
            RESTAURANT_PIZZA_COLUMNS
        );
        tracing::debug!(sql = %sql, id, price = price.get(), "query (tx)");
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, RestaurantPizzaRow>(&sql)
            .bind(price.get())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound { entity: Entity::RestaurantPizza, id })?;
        tx.commit().await?;
        row.try_into()
    }

    /// Join rows of a restaurant plus the pizzas they point at.
    pub async fn restaurant_relations(&self, restaurant_id: i64) -> Result<Relations, StoreError> {
        let joins_sql = format!(
            "SELECT {} FROM restaurant_pizzas WHERE restaurant_id = ? ORDER BY id",
            RESTAURANT_PIZZA_COLUMNS
        );
        let pizzas_sql = "SELECT DISTINCT p.id, p.name, p.ingredients FROM pizzas p \
                          JOIN restaurant_pizzas rp ON rp.pizza_id = p.id WHERE rp.restaurant_id = ?";
        tracing::debug!(sql = %joins_sql, restaurant_id, "query");
        let joins = sqlx::query_as::<_, RestaurantPizzaRow>(&joins_sql)
            .bind(restaurant_id)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!(sql = %pizzas_sql, restaurant_id, "query");
        let pizzas = sqlx::query_as::<_, Pizza>(pizzas_sql)
            .bind(restaurant_id)
            .fetch_all(&self.pool)
            .await?;

        let mut relations = Relations::new();
        for row in joins {
            relations.insert_restaurant_pizza(row.try_into()?);
        }
        for pizza in pizzas {
            relations.insert_pizza(pizza);
        }
        Ok(relations)
    }

    /// Join rows of a pizza plus the restaurants they point at.
    pub async fn pizza_relations(&self, pizza_id: i64) -> Result<Relations, StoreError> {
        let joins_sql = format!(
            "SELECT {} FROM restaurant_pizzas WHERE pizza_id = ? ORDER BY id",
            RESTAURANT_PIZZA_COLUMNS
        );
        let restaurants_sql = "SELECT DISTINCT r.id, r.name, r.address FROM restaurants r \
                               JOIN restaurant_pizzas rp ON rp.restaurant_id = r.id WHERE rp.pizza_id = ?";
        tracing::debug!(sql = %joins_sql, pizza_id, "query");
        let joins = sqlx::query_as::<_, RestaurantPizzaRow>(&joins_sql)
            .bind(pizza_id)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!(sql = %restaurants_sql, pizza_id, "query");
        let restaurants = sqlx::query_as::<_, Restaurant>(restaurants_sql)
            .bind(pizza_id)
            .fetch_all(&self.pool)
            .await?;

        let mut relations = Relations::new();
        for row in joins {
            relations.insert_restaurant_pizza(row.try_into()?);
        }
        for restaurant in restaurants {
            relations.insert_restaurant(restaurant);
        }
        Ok(relations)
    }

    /// The pizza and restaurant a join row points at.
    pub async fn restaurant_pizza_relations(&self, restaurant_pizza: &RestaurantPizza) -> Result<Relations, StoreError> {
        let mut relations = Relations::new();
        relations.insert_pizza(self.get_pizza(restaurant_pizza.pizza_id).await?);
        relations.insert_restaurant(self.get_restaurant(restaurant_pizza.restaurant_id).await?);
        relations.insert_restaurant_pizza(restaurant_pizza.clone());
        Ok(relations)
    }
}

async fn exists(conn: &mut SqliteConnection, table: &'static str, id: i64) -> Result<bool, StoreError> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", table);
    tracing::debug!(sql = %sql, id, "query (tx)");
    let count: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(&mut *conn).await?;
    Ok(count > 0)
}

async fn delete_where(conn: &mut SqliteConnection, sql: &'static str, id: i64) -> Result<u64, StoreError> {
    tracing::debug!(sql = %sql, id, "query (tx)");
    let result = sqlx::query(sql).bind(id).execute(&mut *conn).await?;
    Ok(result.rows_affected())
}
