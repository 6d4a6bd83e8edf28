use crate::report::{
    run_authorities, run_qualify, run_standard, run_towns, QualifyArgs, StandardArgs, TownsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use vash_standards::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "VASH Payment Standards",
    about = "Look up HUD-VASH payment standards and check listings against them",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the configured housing authorities
    Authorities,
    /// List the towns an authority's table covers
    Towns(TownsArgs),
    /// Show the payment standard for one or more towns or ZIP codes
    Standard(StandardArgs),
    /// Check a listings export against a voucher search
    Qualify(QualifyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Authorities => run_authorities(),
        Command::Towns(args) => run_towns(args),
        Command::Standard(args) => run_standard(args),
        Command::Qualify(args) => run_qualify(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vash_standards::standards::BedroomSize;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["vash-standards-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn qualify_splits_sizes_and_locations() {
        let cli = Cli::try_parse_from([
            "vash-standards-api",
            "qualify",
            "--county",
            "cook",
            "--voucher",
            "2",
            "--sizes",
            "studio,2",
            "--locations",
            "Alsip,60803",
            "--listings",
            "listings.json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Qualify(args)) => {
                assert_eq!(args.voucher, BedroomSize::new(2));
                assert_eq!(args.sizes, vec![BedroomSize::STUDIO, BedroomSize::new(2)]);
                assert_eq!(args.locations, vec!["Alsip", "60803"]);
            }
            other => panic!("expected qualify, got {other:?}"),
        }
    }

    #[test]
    fn standard_rejects_unknown_bedroom_words() {
        let result = Cli::try_parse_from([
            "vash-standards-api",
            "standard",
            "--county",
            "cook",
            "--location",
            "60803",
            "--voucher",
            "two",
        ]);
        assert!(result.is_err());
    }
}
