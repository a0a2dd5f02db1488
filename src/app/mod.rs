use std::io::{self, BufRead, BufReader, Write};

use crate::cache::PageCache;
use crate::config::{self, ConfigStore};
use crate::errors::{SkycastError, SkycastResult};
use crate::fetch::{Fetcher, HttpTransport, PageSource};
use crate::format::{self, Formatter, DEFAULT_FORMATTER};
use crate::registry::{CommandRegistry, ProviderRegistry};

/// Top-level options shared by every verb.
#[derive(Debug, Clone)]
pub struct Options {
    /// Bypass the page cache for this invocation.
    pub refresh: bool,
    /// Name of the output formatter.
    pub formatter: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            refresh: false,
            formatter: DEFAULT_FORMATTER.to_string(),
        }
    }
}

/// The application driver: owns the registries, the config store and the
/// IO handles, and resolves a CLI verb into a command or provider run.
pub struct App {
    pub options: Options,
    pub config: ConfigStore,
    pub providers: ProviderRegistry,
    pub commands: CommandRegistry,
    pub input: Box<dyn BufRead>,
    pub out: Box<dyn Write>,
}

impl App {
    pub fn new(options: Options) -> SkycastResult<Self> {
        Ok(Self::with_config(options, ConfigStore::open_default()?))
    }

    /// Build an app around an explicit config store. Registries are
    /// constructed here, once, and passed around by reference.
    pub fn with_config(options: Options, config: ConfigStore) -> Self {
        Self {
            options,
            config,
            providers: ProviderRegistry::with_builtins(),
            commands: CommandRegistry::with_builtins(),
            input: Box::new(BufReader::new(io::stdin())),
            out: Box::new(io::stdout()),
        }
    }

    pub fn with_input(mut self, input: Box<dyn BufRead>) -> Self {
        self.input = input;
        self
    }

    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    /// The cache-backed page fetcher for this invocation.
    pub fn fetcher(&self) -> SkycastResult<Fetcher<HttpTransport>> {
        let cache = PageCache::new(config::cache_dir()?, config::CACHE_TTL);
        Ok(Fetcher::new(
            HttpTransport::new(),
            cache,
            self.options.refresh,
        ))
    }

    fn formatter(&self) -> SkycastResult<Box<dyn Formatter>> {
        format::by_name(&self.options.formatter)
            .ok_or_else(|| SkycastError::UnknownFormatter(self.options.formatter.clone()))
    }

    /// Resolve the verb and run it. Commands take precedence over
    /// providers; no verb at all runs every provider in registration order.
    pub fn run(&mut self, verb: Option<&str>, args: &[String]) -> SkycastResult<()> {
        let Some(verb) = verb else {
            let pages = self.fetcher()?;
            return self.run_all(&pages);
        };

        if let Some(factory) = self.commands.get(verb).copied() {
            return factory().run(self, args);
        }

        if self.providers.contains(verb) {
            let pages = self.fetcher()?;
            return self.run_provider(verb, &pages);
        }

        Err(SkycastError::UnknownVerb(verb.to_string()))
    }

    /// Run one provider and emit its block through the selected formatter.
    pub fn run_provider(&mut self, name: &str, pages: &dyn PageSource) -> SkycastResult<()> {
        let formatter = self.formatter()?;

        let factory = *self
            .providers
            .get(name)
            .ok_or_else(|| SkycastError::UnknownProvider(name.to_string()))?;
        let provider = factory(&self.config);

        let reading = provider.run(pages)?;
        let block = formatter.emit(provider.title(), &provider.location().name, &reading);
        self.out.write_all(block.as_bytes())?;

        Ok(())
    }

    /// Run every registered provider in registration order. A failing
    /// provider is logged and skipped so the rest of the batch still runs.
    pub fn run_all(&mut self, pages: &dyn PageSource) -> SkycastResult<()> {
        let names: Vec<String> = self.providers.names().map(str::to_string).collect();

        for name in names {
            if let Err(error) = self.run_provider(&name, pages) {
                log::error!("error during provider {name} run: {error}");
            }
        }

        Ok(())
    }
}
