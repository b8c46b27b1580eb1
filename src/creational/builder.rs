// Builder Pattern - step-by-step construction driven by a Director
// The same construction steps produce different products depending on which
// steps the director (or the client) chooses to run.

// ============================================================================
// Product
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Product {
    pub parts: Vec<String>,
}

impl Product {
    /// `Product parts: PartA1, PartB1, PartC1`
    pub fn list_parts(&self) -> String {
        format!("Product parts: {}", self.parts.join(", "))
    }
}

// ============================================================================
// Builder interface and a concrete builder
// ============================================================================

pub trait Builder {
    fn produce_part_a(&mut self);
    fn produce_part_b(&mut self);
    fn produce_part_c(&mut self);
}

/// Assembles a [`Product`] one part at a time. Taking the product out resets
/// the builder so it is ready for the next one.
#[derive(Debug, Default)]
pub struct PartsBuilder {
    product: Product,
}

impl PartsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.product = Product::default();
    }

    pub fn product(&mut self) -> Product {
        std::mem::take(&mut self.product)
    }
}

impl Builder for PartsBuilder {
    fn produce_part_a(&mut self) {
        self.product.parts.push("PartA1".to_string());
    }

    fn produce_part_b(&mut self) {
        self.product.parts.push("PartB1".to_string());
    }

    fn produce_part_c(&mut self) {
        self.product.parts.push("PartC1".to_string());
    }
}

// ============================================================================
// Director
// ============================================================================

/// Knows which steps to run, in which order, for each product variation.
/// Works with any [`Builder`]; the client keeps ownership of the builder.
#[derive(Debug, Default, Clone, Copy)]
pub struct Director;

impl Director {
    pub fn build_minimal_viable_product(&self, builder: &mut dyn Builder) {
        builder.produce_part_a();
    }

    pub fn build_full_featured_product(&self, builder: &mut dyn Builder) {
        builder.produce_part_a();
        builder.produce_part_b();
        builder.produce_part_c();
    }
}

pub fn client_code(director: &Director) -> Vec<String> {
    let mut builder = PartsBuilder::new();
    let mut lines = Vec::new();

    lines.push("Standard basic product:".to_string());
    director.build_minimal_viable_product(&mut builder);
    lines.push(builder.product().list_parts());
    lines.push(String::new());

    lines.push("Standard full featured product:".to_string());
    director.build_full_featured_product(&mut builder);
    lines.push(builder.product().list_parts());
    lines.push(String::new());

    // The builder works without a director too.
    lines.push("Custom product:".to_string());
    builder.produce_part_a();
    builder.produce_part_c();
    lines.push(builder.product().list_parts());

    lines
}

// ============================================================================
// Tests
// ============================================================================
