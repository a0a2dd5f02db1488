use clap::Parser;
use log::LevelFilter;

use skycast::app::{App, Options};
use skycast::cli::Cli;
use skycast::errors::{SkycastError, SkycastResult};

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    if let Err(error) = run(&cli) {
        report(&error, cli.debug);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> SkycastResult<()> {
    let options = Options {
        refresh: cli.refresh,
        formatter: cli.formatter.clone(),
    };

    let mut app = App::new(options)?;
    app.run(cli.verb.as_deref(), &cli.args)
}

fn init_logging(verbose: u8, debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn report(error: &SkycastError, debug: bool) {
    if debug {
        eprintln!("Error: {error:?}");
        return;
    }

    match error {
        SkycastError::UnknownVerb(_)
        | SkycastError::UnknownProvider(_)
        | SkycastError::UnknownFormatter(_)
        | SkycastError::InvalidInput(_)
        | SkycastError::ConfigurationAborted => eprintln!("Error: {error}"),
        _ => {
            log::error!("{error}");
            eprintln!("The program can not continue to work due to a runtime error.");
        }
    }
}
