//! JSON records for entities, with bounded expansion of related entities.
//!
//! Each entity has its own options type naming the relations it may expand and the
//! top-level fields to drop. Expansion is one hop past the join row:
//! a restaurant's join rows expand their pizza only, a pizza's join rows expand their
//! restaurant only, and a join row's pizza or restaurant is never expanded further.
//! The builders enforce this, so an options value can never describe a cycle.

use crate::models::{Pizza, Relations, Restaurant, RestaurantPizza};
use serde_json::{Map, Value};

pub type Record = Map<String, Value>;

trait FieldKey: Copy {
    fn key(self) -> &'static str;
}

fn strip<F: FieldKey>(record: &mut Record, exclude: &[F]) {
    for field in exclude {
        record.remove(field.key());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestaurantField {
    Id,
    Name,
    Address,
    RestaurantPizzas,
}

impl FieldKey for RestaurantField {
    fn key(self) -> &'static str {
        match self {
            RestaurantField::Id => "id",
            RestaurantField::Name => "name",
            RestaurantField::Address => "address",
            RestaurantField::RestaurantPizzas => "restaurant_pizzas",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PizzaField {
    Id,
    Name,
    Ingredients,
    RestaurantPizzas,
}

impl FieldKey for PizzaField {
    fn key(self) -> &'static str {
        match self {
            PizzaField::Id => "id",
            PizzaField::Name => "name",
            PizzaField::Ingredients => "ingredients",
            PizzaField::RestaurantPizzas => "restaurant_pizzas",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestaurantPizzaField {
    Id,
    Price,
    PizzaId,
    RestaurantId,
    Pizza,
    Restaurant,
}

impl FieldKey for RestaurantPizzaField {
    fn key(self) -> &'static str {
        match self {
            RestaurantPizzaField::Id => "id",
            RestaurantPizzaField::Price => "price",
            RestaurantPizzaField::PizzaId => "pizza_id",
            RestaurantPizzaField::RestaurantId => "restaurant_id",
            RestaurantPizzaField::Pizza => "pizza",
            RestaurantPizzaField::Restaurant => "restaurant",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestaurantOptions {
    restaurant_pizzas: Option<Box<RestaurantPizzaOptions>>,
    exclude: Vec<RestaurantField>,
}

impl RestaurantOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `restaurant_pizzas`, each join row with its pizza.
    pub fn include_restaurant_pizzas(self) -> Self {
        self.include_restaurant_pizzas_with(RestaurantPizzaOptions::new().include_pizza())
    }

    /// Expand `restaurant_pizzas` with custom join-row options. A `restaurant` include on
    /// `child` is dropped.
    pub fn include_restaurant_pizzas_with(mut self, child: RestaurantPizzaOptions) -> Self {
        self.restaurant_pizzas = Some(Box::new(RestaurantPizzaOptions { restaurant: None, ..child }));
        self
    }

    pub fn exclude(mut self, field: RestaurantField) -> Self {
        self.exclude.push(field);
        self
    }

    fn leaf(self) -> Self {
        Self { restaurant_pizzas: None, ..self }
    }

    pub fn expands_restaurant_pizzas(&self) -> bool {
        self.restaurant_pizzas.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PizzaOptions {
    restaurant_pizzas: Option<Box<RestaurantPizzaOptions>>,
    exclude: Vec<PizzaField>,
}

impl PizzaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `restaurant_pizzas`, each join row with its restaurant.
    pub fn include_restaurant_pizzas(self) -> Self {
        self.include_restaurant_pizzas_with(RestaurantPizzaOptions::new().include_restaurant())
    }

    /// Expand `restaurant_pizzas` with custom join-row options. A `pizza` include on
    /// `child` is dropped.
    pub fn include_restaurant_pizzas_with(mut self, child: RestaurantPizzaOptions) -> Self {
        self.restaurant_pizzas = Some(Box::new(RestaurantPizzaOptions { pizza: None, ..child }));
        self
    }

    pub fn exclude(mut self, field: PizzaField) -> Self {
        self.exclude.push(field);
        self
    }

    fn leaf(self) -> Self {
        Self { restaurant_pizzas: None, ..self }
    }

    pub fn expands_restaurant_pizzas(&self) -> bool {
        self.restaurant_pizzas.is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestaurantPizzaOptions {
    pizza: Option<Box<PizzaOptions>>,
    restaurant: Option<Box<RestaurantOptions>>,
    exclude: Vec<RestaurantPizzaField>,
}

impl RestaurantPizzaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_pizza(self) -> Self {
        self.include_pizza_with(PizzaOptions::new())
    }

    /// Expand `pizza`; any relation expansion on `pizza` is dropped.
    pub fn include_pizza_with(mut self, pizza: PizzaOptions) -> Self {
        self.pizza = Some(Box::new(pizza.leaf()));
        self
    }

    pub fn include_restaurant(self) -> Self {
        self.include_restaurant_with(RestaurantOptions::new())
    }

    /// Expand `restaurant`; any relation expansion on `restaurant` is dropped.
    pub fn include_restaurant_with(mut self, restaurant: RestaurantOptions) -> Self {
        self.restaurant = Some(Box::new(restaurant.leaf()));
        self
    }

    pub fn exclude(mut self, field: RestaurantPizzaField) -> Self {
        self.exclude.push(field);
        self
    }

    pub fn expands_pizza(&self) -> bool {
        self.pizza.is_some()
    }

    pub fn expands_restaurant(&self) -> bool {
        self.restaurant.is_some()
    }
}

pub fn restaurant_record(restaurant: &Restaurant, relations: &Relations, options: &RestaurantOptions) -> Record {
    let mut record = Record::new();
    record.insert(RestaurantField::Id.key().into(), restaurant.id.into());
    record.insert(RestaurantField::Name.key().into(), restaurant.name.clone().into());
    record.insert(RestaurantField::Address.key().into(), restaurant.address.clone().into());
    if let Some(child) = &options.restaurant_pizzas {
        let items = relations
            .restaurant_pizzas_of_restaurant(restaurant.id)
            .map(|rp| Value::Object(restaurant_pizza_record(rp, relations, child)))
            .collect();
        record.insert(RestaurantField::RestaurantPizzas.key().into(), Value::Array(items));
    }
    strip(&mut record, &options.exclude);
    record
}

pub fn pizza_record(pizza: &Pizza, relations: &Relations, options: &PizzaOptions) -> Record {
    let mut record = Record::new();
    record.insert(PizzaField::Id.key().into(), pizza.id.into());
    record.insert(PizzaField::Name.key().into(), pizza.name.clone().into());
    record.insert(PizzaField::Ingredients.key().into(), pizza.ingredients.clone().into());
    if let Some(child) = &options.restaurant_pizzas {
        let items = relations
            .restaurant_pizzas_of_pizza(pizza.id)
            .map(|rp| Value::Object(restaurant_pizza_record(rp, relations, child)))
            .collect();
        record.insert(PizzaField::RestaurantPizzas.key().into(), Value::Array(items));
    }
    strip(&mut record, &options.exclude);
    record
}

/// Serialize a join row. A relation missing from `relations` is emitted as `null`.
pub fn restaurant_pizza_record(
    restaurant_pizza: &RestaurantPizza,
    relations: &Relations,
    options: &RestaurantPizzaOptions,
) -> Record {
    let mut record = Record::new();
    record.insert(RestaurantPizzaField::Id.key().into(), restaurant_pizza.id.into());
    record.insert(RestaurantPizzaField::Price.key().into(), restaurant_pizza.price.get().into());
    record.insert(RestaurantPizzaField::PizzaId.key().into(), restaurant_pizza.pizza_id.into());
    record.insert(
        RestaurantPizzaField::RestaurantId.key().into(),
        restaurant_pizza.restaurant_id.into(),
    );
    if let Some(pizza_options) = &options.pizza {
        let pizza = relations
            .pizza(restaurant_pizza.pizza_id)
            .map(|p| Value::Object(pizza_record(p, relations, pizza_options)))
            .unwrap_or(Value::Null);
        record.insert(RestaurantPizzaField::Pizza.key().into(), pizza);
    }
    if let Some(restaurant_options) = &options.restaurant {
        let restaurant = relations
            .restaurant(restaurant_pizza.restaurant_id)
            .map(|r| Value::Object(restaurant_record(r, relations, restaurant_options)))
            .unwrap_or(Value::Null);
        record.insert(RestaurantPizzaField::Restaurant.key().into(), restaurant);
    }
    strip(&mut record, &options.exclude);
    record
}
