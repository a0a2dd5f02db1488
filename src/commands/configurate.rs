use crate::app::App;
use crate::commands::Command;
use crate::errors::{SkycastError, SkycastResult};

pub const NAME: &str = "configurate";

/// Run a provider's interactive location drill-down.
pub struct Configurate;

pub fn build() -> Box<dyn Command> {
    Box::new(Configurate)
}

impl Command for Configurate {
    fn run(&self, app: &mut App, args: &[String]) -> SkycastResult<()> {
        let name = args.first().ok_or_else(|| {
            SkycastError::InvalidInput(
                "provider name is required, e.g. `skycast configurate accu`".to_string(),
            )
        })?;

        let factory = *app
            .providers
            .get(name)
            .ok_or_else(|| SkycastError::UnknownProvider(name.clone()))?;

        let provider = factory(&app.config);
        let pages = app.fetcher()?;

        let App {
            config, input, out, ..
        } = app;

        provider.configure(&pages, config, input.as_mut(), out.as_mut())
    }
}
