// Catalogue of runnable demos
// Each entry renders the console transcript of one pattern as lines, so the
// binaries only have to print and the tests only have to compare.

use crate::behavioral::chain::{self, TokenHandler};
use crate::config::{ChainConfig, PatternsConfig};
use crate::creational::{abstract_factory, builder, prototype, singleton};
use crate::error::{PatternError, Result};
use crate::structural::{adapter, decorator, facade};

pub struct Demo {
    pub name: &'static str,
    pub title: &'static str,
    render: fn(&PatternsConfig) -> Result<Vec<String>>,
}

impl Demo {
    pub fn run(&self, config: &PatternsConfig) -> Result<Vec<String>> {
        log::debug!("running demo '{}'", self.name);
        (self.render)(config)
    }
}

pub const DEMOS: &[Demo] = &[
    Demo {
        name: "builder",
        title: "Builder",
        render: |_| Ok(builder::client_code(&builder::Director)),
    },
    Demo {
        name: "abstract-factory",
        title: "Abstract Factory",
        render: |_| Ok(abstract_factory::transcript()),
    },
    Demo {
        name: "prototype",
        title: "Prototype",
        render: |_| Ok(prototype::client_code(prototype::PrototypeFactory::shared())),
    },
    Demo {
        name: "singleton",
        title: "Singleton",
        render: |config| {
            singleton::client_code(&config.singleton.seeds, config.singleton.delay())
        },
    },
    Demo {
        name: "adapter",
        title: "Adapter",
        render: |_| Ok(adapter::transcript()),
    },
    Demo {
        name: "decorator",
        title: "Decorator",
        render: |_| Ok(decorator::transcript()),
    },
    Demo {
        name: "facade",
        title: "Facade",
        render: |_| Ok(facade::client_code(&facade::Facade::default())),
    },
    Demo {
        name: "chain",
        title: "Chain of Responsibility",
        render: |config| chain_transcript(&config.chain),
    },
];

pub fn names() -> Vec<&'static str> {
    DEMOS.iter().map(|demo| demo.name).collect()
}

pub fn find(name: &str) -> Result<&'static Demo> {
    DEMOS
        .iter()
        .find(|demo| demo.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| PatternError::UnknownDemo(name.to_string(), names().join(", ")))
}

/// Full chain then the subchain starting at `subchain_from`.
pub fn chain_transcript(config: &ChainConfig) -> Result<Vec<String>> {
    let (handlers, ids) = chain::linear_chain::<str, _, _>(
        config
            .handlers
            .iter()
            .map(|spec| TokenHandler::new(&spec.name, spec.token.clone())),
    )?;
    let (Some(&head), Some(&sub)) = (ids.first(), ids.get(config.subchain_from)) else {
        return Err(PatternError::invalid_config(
            "chain needs at least one handler and a valid subchain_from",
        ));
    };

    let mut lines = vec![format!("Chain: {}", handlers.describe(head)), String::new()];
    lines.extend(chain::client_code(&handlers, head, &config.requests)?);
    lines.push(String::new());
    lines.push(format!("Subchain: {}", handlers.describe(sub)));
    lines.push(String::new());
    lines.extend(chain::client_code(&handlers, sub, &config.requests)?);
    Ok(lines)
}
