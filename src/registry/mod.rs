use crate::commands::{self, Command};
use crate::config::ConfigStore;
use crate::providers::{accu, rp5, WeatherSource};

pub type ProviderFactory = fn(&ConfigStore) -> Box<dyn WeatherSource>;
pub type CommandFactory = fn() -> Box<dyn Command>;

/// Insertion-ordered name -> factory map backing verb resolution. Names are
/// unique; re-adding one swaps the factory without moving the entry, so
/// "list all" and "run all" stay in registration order.
pub struct Registry<F> {
    entries: Vec<(String, F)>,
}

impl<F> Registry<F> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, name: &str, factory: F) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = factory;
        } else {
            self.entries.push((name.to_string(), factory));
        }
    }

    pub fn get(&self, name: &str) -> Option<&F> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &F)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type ProviderRegistry = Registry<ProviderFactory>;
pub type CommandRegistry = Registry<CommandFactory>;

impl Registry<ProviderFactory> {
    /// All built-in weather providers, in the order they run by default.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.add(accu::PROVIDER_ID, accu::build);
        registry.add(rp5::PROVIDER_ID, rp5::build);
        registry
    }
}

impl Registry<CommandFactory> {
    /// All built-in commands.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.add(commands::providers::NAME, commands::providers::build);
        registry.add(commands::configurate::NAME, commands::configurate::build);
        registry
    }
}
