// Decorator Pattern - wrap a component to extend what it returns
// Decorators share the Component interface, so they can wrap plain components
// and other decorators alike.

pub trait Component {
    fn operation(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConcreteComponent;

impl Component for ConcreteComponent {
    fn operation(&self) -> String {
        "ConcreteComponent".to_string()
    }
}

impl<C: Component + ?Sized> Component for Box<C> {
    fn operation(&self) -> String {
        (**self).operation()
    }
}

pub struct DecoratorA {
    wrapped: Box<dyn Component>,
}

impl DecoratorA {
    pub fn new(wrapped: impl Component + 'static) -> Self {
        Self {
            wrapped: Box::new(wrapped),
        }
    }
}

impl Component for DecoratorA {
    fn operation(&self) -> String {
        format!("ConcreteDecoratorA({})", self.wrapped.operation())
    }
}

pub struct DecoratorB {
    wrapped: Box<dyn Component>,
}

impl DecoratorB {
    pub fn new(wrapped: impl Component + 'static) -> Self {
        Self {
            wrapped: Box::new(wrapped),
        }
    }
}

impl Component for DecoratorB {
    fn operation(&self) -> String {
        format!("ConcreteDecoratorB({})", self.wrapped.operation())
    }
}

pub fn client_code(component: &dyn Component) -> String {
    format!("RESULT: {}", component.operation())
}

pub fn transcript() -> Vec<String> {
    let simple = ConcreteComponent;
    let decorated = DecoratorB::new(DecoratorA::new(simple));
    vec![
        "Client: I've got a simple component:".to_string(),
        client_code(&simple),
        String::new(),
        "Client: Now I've got a decorated component:".to_string(),
        client_code(&decorated),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_component() {
        assert_eq!(client_code(&ConcreteComponent), "RESULT: ConcreteComponent");
    }

    #[test]
    fn test_nested_decorators() {
        let decorated = DecoratorB::new(DecoratorA::new(ConcreteComponent));
        assert_eq!(
            decorated.operation(),
            "ConcreteDecoratorB(ConcreteDecoratorA(ConcreteComponent))"
        );
    }

    #[test]
    fn test_decorators_stack_from_trait_objects() {
        let mut component: Box<dyn Component> = Box::new(ConcreteComponent);
        for _ in 0..2 {
            component = Box::new(DecoratorA::new(component));
        }
        assert_eq!(
            component.operation(),
            "ConcreteDecoratorA(ConcreteDecoratorA(ConcreteComponent))"
        );
    }
}
