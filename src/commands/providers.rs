use std::io::Write;

use crate::app::App;
use crate::commands::Command;
use crate::errors::SkycastResult;

pub const NAME: &str = "providers";

/// Print all available providers, one `Title: id` line each.
pub struct Providers;

pub fn build() -> Box<dyn Command> {
    Box::new(Providers)
}

impl Command for Providers {
    fn run(&self, app: &mut App, _args: &[String]) -> SkycastResult<()> {
        let lines: Vec<String> = app
            .providers
            .iter()
            .map(|(name, factory)| {
                let provider = factory(&app.config);
                format!("{}: {}", provider.title(), name)
            })
            .collect();

        for line in lines {
            writeln!(app.out, "{line}")?;
        }

        Ok(())
    }
}
