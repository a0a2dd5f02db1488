use crate::app::App;
use crate::errors::SkycastResult;

pub mod configurate;
pub mod providers;

/// A registry-resolved action that is not a weather provider.
pub trait Command {
    fn run(&self, app: &mut App, args: &[String]) -> SkycastResult<()>;
}
