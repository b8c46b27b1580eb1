// Adapter Pattern - make an incompatible interface fit the one clients expect

/// The interface client code works with.
pub trait Target {
    fn request(&self) -> String {
        "Target: The default target's behavior.".to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTarget;

impl Target for DefaultTarget {}

/// Useful behaviour behind an interface the client cannot use directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct Adaptee;

impl Adaptee {
    pub fn specific_request(&self) -> String {
        ".eetpadA eht fo roivaheb laicepS".to_string()
    }
}

/// Translates [`Adaptee::specific_request`] into the [`Target`] interface.
#[derive(Debug, Default, Clone, Copy)]
pub struct Adapter {
    adaptee: Adaptee,
}

impl Adapter {
    pub fn new(adaptee: Adaptee) -> Self {
        Self { adaptee }
    }
}

impl Target for Adapter {
    fn request(&self) -> String {
        let translated: String = self.adaptee.specific_request().chars().rev().collect();
        format!("Adapter: (TRANSLATED) {translated}")
    }
}

pub fn client_code(target: &dyn Target) -> String {
    target.request()
}

pub fn transcript() -> Vec<String> {
    let adaptee = Adaptee;
    vec![
        "Client: I can work just fine with the Target objects:".to_string(),
        client_code(&DefaultTarget),
        String::new(),
        "Client: The Adaptee class has a weird interface. See, I don't understand it:".to_string(),
        format!("Adaptee: {}", adaptee.specific_request()),
        String::new(),
        "Client: But I can work with it via the Adapter:".to_string(),
        client_code(&Adapter::new(adaptee)),
    ]
}
