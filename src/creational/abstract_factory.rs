// Abstract Factory - families of related products
// Each concrete factory produces one variant of every product, so products
// coming out of the same factory are always compatible.

use log::debug;

// ============================================================================
// Products
// ============================================================================

pub trait AbstractProductA {
    fn useful_function_a(&self) -> String;
}

pub trait AbstractProductB {
    fn useful_function_b(&self) -> String;

    /// B can work with any A, but only gives meaningful results with the A of
    /// its own variant.
    fn another_useful_function_b(&self, collaborator: &dyn AbstractProductA) -> String;
}

pub struct ConcreteProductA1;
pub struct ConcreteProductA2;

impl AbstractProductA for ConcreteProductA1 {
    fn useful_function_a(&self) -> String {
        "The result of the product A1.".to_string()
    }
}

impl AbstractProductA for ConcreteProductA2 {
    fn useful_function_a(&self) -> String {
        "The result of the product A2.".to_string()
    }
}

pub struct ConcreteProductB1;
pub struct ConcreteProductB2;

impl AbstractProductB for ConcreteProductB1 {
    fn useful_function_b(&self) -> String {
        "The result of the product B1.".to_string()
    }

    fn another_useful_function_b(&self, collaborator: &dyn AbstractProductA) -> String {
        format!(
            "The result of the B1 collaborating with ( {} )",
            collaborator.useful_function_a()
        )
    }
}

impl AbstractProductB for ConcreteProductB2 {
    fn useful_function_b(&self) -> String {
        "The result of the product B2.".to_string()
    }

    fn another_useful_function_b(&self, collaborator: &dyn AbstractProductA) -> String {
        format!(
            "The result of the B2 collaborating with ( {} )",
            collaborator.useful_function_a()
        )
    }
}

impl Drop for ConcreteProductB1 {
    fn drop(&mut self) {
        debug!("Product B1 was deleted;");
    }
}

impl Drop for ConcreteProductB2 {
    fn drop(&mut self) {
        debug!("Product B2 was deleted;");
    }
}

// ============================================================================
// Factories
// ============================================================================

pub trait AbstractFactory {
    fn create_product_a(&self) -> Box<dyn AbstractProductA>;
    fn create_product_b(&self) -> Box<dyn AbstractProductB>;
}

pub struct ConcreteFactory1;
pub struct ConcreteFactory2;

impl AbstractFactory for ConcreteFactory1 {
    fn create_product_a(&self) -> Box<dyn AbstractProductA> {
        Box::new(ConcreteProductA1)
    }

    fn create_product_b(&self) -> Box<dyn AbstractProductB> {
        Box::new(ConcreteProductB1)
    }
}

impl AbstractFactory for ConcreteFactory2 {
    fn create_product_a(&self) -> Box<dyn AbstractProductA> {
        Box::new(ConcreteProductA2)
    }

    fn create_product_b(&self) -> Box<dyn AbstractProductB> {
        Box::new(ConcreteProductB2)
    }
}

/// Picks a factory at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    First,
    Second,
}

impl FactoryKind {
    pub const ALL: [FactoryKind; 2] = [FactoryKind::First, FactoryKind::Second];

    pub fn factory(self) -> Box<dyn AbstractFactory> {
        match self {
            FactoryKind::First => Box::new(ConcreteFactory1),
            FactoryKind::Second => Box::new(ConcreteFactory2),
        }
    }
}

/// Works only through the abstract interfaces, so any factory can be passed in.
pub fn client_code(factory: &dyn AbstractFactory) -> Vec<String> {
    let product_a = factory.create_product_a();
    let product_b = factory.create_product_b();
    vec![
        product_b.useful_function_b(),
        product_b.another_useful_function_b(product_a.as_ref()),
    ]
}

pub fn transcript() -> Vec<String> {
    let mut lines = vec!["Client: Testing client code with the first factory type:".to_string()];
    lines.extend(client_code(FactoryKind::First.factory().as_ref()));
    lines.push(String::new());
    lines.push("Client: Testing the same client code with the second factory type:".to_string());
    lines.extend(client_code(FactoryKind::Second.factory().as_ref()));
    lines
}

// ============================================================================
// Tests
// ============================================================================
