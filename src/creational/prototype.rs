// Prototype Pattern - new objects by cloning registered exemplars
// The factory keeps one prototype per kind and hands out independent clones.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

pub trait Prototype: fmt::Debug + Send + Sync {
    fn clone_box(&self) -> Box<dyn Prototype>;
    fn name(&self) -> &str;
    fn field(&self) -> f32;

    /// Updates the shared field and describes the call.
    fn method(&mut self, field: f32) -> String;
}

impl Clone for Box<dyn Prototype> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// ============================================================================
// Concrete prototypes
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ConcretePrototype1 {
    name: String,
    field: f32,
    concrete_field1: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConcretePrototype2 {
    name: String,
    field: f32,
    concrete_field2: f32,
}

impl ConcretePrototype1 {
    pub fn new(name: impl Into<String>, concrete_field: f32) -> Self {
        Self {
            name: name.into(),
            field: 0.0,
            concrete_field1: concrete_field,
        }
    }

    pub fn concrete_field(&self) -> f32 {
        self.concrete_field1
    }
}

impl ConcretePrototype2 {
    pub fn new(name: impl Into<String>, concrete_field: f32) -> Self {
        Self {
            name: name.into(),
            field: 0.0,
            concrete_field2: concrete_field,
        }
    }

    pub fn concrete_field(&self) -> f32 {
        self.concrete_field2
    }
}

// Both concrete types share the same Prototype surface.
macro_rules! impl_prototype {
    ($ty:ty) => {
        impl Prototype for $ty {
            fn clone_box(&self) -> Box<dyn Prototype> {
                Box::new(self.clone())
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn field(&self) -> f32 {
                self.field
            }

            fn method(&mut self, field: f32) -> String {
                self.field = field;
                format!("Call Method from {} with field : {}", self.name, field)
            }
        }
    };
}

impl_prototype!(ConcretePrototype1);
impl_prototype!(ConcretePrototype2);

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrototypeKind {
    Prototype1,
    Prototype2,
}

#[derive(Debug, Clone)]
pub struct PrototypeFactory {
    prototypes: HashMap<PrototypeKind, Box<dyn Prototype>>,
}

lazy_static! {
    static ref SHARED: PrototypeFactory = PrototypeFactory::new();
}

impl Default for PrototypeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PrototypeFactory {
    pub fn new() -> Self {
        let mut prototypes: HashMap<PrototypeKind, Box<dyn Prototype>> = HashMap::new();
        prototypes.insert(
            PrototypeKind::Prototype1,
            Box::new(ConcretePrototype1::new("PROTOTYPE_1", 50.0)),
        );
        prototypes.insert(
            PrototypeKind::Prototype2,
            Box::new(ConcretePrototype2::new("PROTOTYPE_2", 60.0)),
        );
        Self { prototypes }
    }

    /// Process-wide registry holding the default prototypes.
    pub fn shared() -> &'static PrototypeFactory {
        &SHARED
    }

    /// Replaces the exemplar for `kind`.
    pub fn register(&mut self, kind: PrototypeKind, prototype: Box<dyn Prototype>) {
        self.prototypes.insert(kind, prototype);
    }

    /// Returns a fresh clone; the registered exemplar is never handed out.
    pub fn create(&self, kind: PrototypeKind) -> Option<Box<dyn Prototype>> {
        self.prototypes.get(&kind).map(|prototype| prototype.clone_box())
    }

    pub fn exemplar(&self, kind: PrototypeKind) -> Option<&dyn Prototype> {
        self.prototypes.get(&kind).map(|prototype| prototype.as_ref())
    }
}

pub fn client_code(factory: &PrototypeFactory) -> Vec<String> {
    let mut lines = Vec::new();

    for (kind, label, field) in [
        (PrototypeKind::Prototype1, "1", 90.0),
        (PrototypeKind::Prototype2, "2", 10.0),
    ] {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("Let's create a Prototype {label}"));
        if let Some(mut prototype) = factory.create(kind) {
            lines.push(prototype.method(field));
        }
    }

    lines
}

// ============================================================================
// Tests
// ============================================================================
