//! Entities, insert payloads and the price invariant.

use crate::error::{StoreError, ValidationError};
use serde_json::Value;
use std::collections::BTreeMap;

pub const MIN_PRICE: i64 = 1;
pub const MAX_PRICE: i64 = 30;

/// Menu price in whole units. Only constructible inside `MIN_PRICE..=MAX_PRICE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if !(MIN_PRICE..=MAX_PRICE).contains(&value) {
            return Err(ValidationError::PriceOutOfRange(value));
        }
        Ok(Price(value))
    }

    /// Coerce a JSON value to an integer, then range-check it.
    pub fn coerce(value: Option<&Value>) -> Result<Self, ValidationError> {
        Self::new(coerce_integer("price", value)?)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

/// Integers, floats without a fractional part, and strings holding an integer are accepted.
pub fn coerce_integer(field: &'static str, value: Option<&Value>) -> Result<i64, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
                _ => Err(ValidationError::NotAnInteger(field)),
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::NotAnInteger(field)),
        Some(_) => Err(ValidationError::NotAnInteger(field)),
    }
}

fn non_blank(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(value)
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Pizza {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestaurantPizza {
    pub id: i64,
    pub price: Price,
    pub pizza_id: i64,
    pub restaurant_id: i64,
}

impl RestaurantPizza {
    /// Replace the price in place; the old price is kept on failure.
    pub fn set_price(&mut self, price: i64) -> Result<(), ValidationError> {
        self.price = Price::new(price)?;
        Ok(())
    }
}

/// Raw `restaurant_pizzas` row; the price is re-validated on the way out.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RestaurantPizzaRow {
    pub id: i64,
    pub price: i64,
    pub pizza_id: i64,
    pub restaurant_id: i64,
}

impl TryFrom<RestaurantPizzaRow> for RestaurantPizza {
    type Error = StoreError;

    fn try_from(row: RestaurantPizzaRow) -> Result<Self, Self::Error> {
        Ok(RestaurantPizza {
            id: row.id,
            price: Price::new(row.price)?,
            pizza_id: row.pizza_id,
            restaurant_id: row.restaurant_id,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRestaurant {
    pub(crate) name: String,
    pub(crate) address: String,
}

impl NewRestaurant {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(NewRestaurant {
            name: non_blank("name", name.into())?,
            address: non_blank("address", address.into())?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPizza {
    pub(crate) name: String,
    pub(crate) ingredients: String,
}

impl NewPizza {
    pub fn new(name: impl Into<String>, ingredients: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(NewPizza {
            name: non_blank("name", name.into())?,
            ingredients: non_blank("ingredients", ingredients.into())?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewRestaurantPizza {
    pub(crate) price: Price,
    pub(crate) pizza_id: i64,
    pub(crate) restaurant_id: i64,
}

impl NewRestaurantPizza {
    pub fn new(price: i64, pizza_id: i64, restaurant_id: i64) -> Result<Self, ValidationError> {
        Ok(NewRestaurantPizza {
            price: Price::new(price)?,
            pizza_id,
            restaurant_id,
        })
    }

    /// Build from a request body `{price, pizza_id, restaurant_id}`.
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let fields = body.as_object().ok_or(ValidationError::NotAnObject)?;
        let price = coerce_integer("price", fields.get("price"))?;
        let pizza_id = coerce_integer("pizza_id", fields.get("pizza_id"))?;
        let restaurant_id = coerce_integer("restaurant_id", fields.get("restaurant_id"))?;
        Self::new(price, pizza_id, restaurant_id)
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn pizza_id(&self) -> i64 {
        self.pizza_id
    }

    pub fn restaurant_id(&self) -> i64 {
        self.restaurant_id
    }
}

/// Related rows loaded alongside an entity so the serializer can expand relations
/// without touching storage.
#[derive(Clone, Debug, Default)]
pub struct Relations {
    restaurants: BTreeMap<i64, Restaurant>,
    pizzas: BTreeMap<i64, Pizza>,
    restaurant_pizzas: BTreeMap<i64, RestaurantPizza>,
}

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_restaurant(&mut self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id, restaurant);
    }

    pub fn insert_pizza(&mut self, pizza: Pizza) {
        self.pizzas.insert(pizza.id, pizza);
    }

    pub fn insert_restaurant_pizza(&mut self, restaurant_pizza: RestaurantPizza) {
        self.restaurant_pizzas.insert(restaurant_pizza.id, restaurant_pizza);
    }

    pub fn restaurant(&self, id: i64) -> Option<&Restaurant> {
        self.restaurants.get(&id)
    }

    pub fn pizza(&self, id: i64) -> Option<&Pizza> {
        self.pizzas.get(&id)
    }

    /// Join rows of one restaurant, in creation order.
    pub fn restaurant_pizzas_of_restaurant(&self, restaurant_id: i64) -> impl Iterator<Item = &RestaurantPizza> {
        self.restaurant_pizzas
            .values()
            .filter(move |rp| rp.restaurant_id == restaurant_id)
    }

    /// Join rows of one pizza, in creation order.
    pub fn restaurant_pizzas_of_pizza(&self, pizza_id: i64) -> impl Iterator<Item = &RestaurantPizza> {
        self.restaurant_pizzas.values().filter(move |rp| rp.pizza_id == pizza_id)
    }
}
