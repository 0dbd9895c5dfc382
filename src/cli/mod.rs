use clap::{Parser, Subcommand};

use crate::seed::DEFAULT_COUNT;

#[derive(Parser)]
#[command(name = "campground-api")]
#[command(about = "Campground listings and reviews over HTTP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve(ServeArgs),

    #[command(about = "Replace all campgrounds with generated demo data")]
    Seed(SeedArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides configuration)")]
    pub port: Option<u16>,

    #[arg(long, value_name = "COUNT", help = "Seed this many campgrounds before serving")]
    pub seed: Option<usize>,

    #[arg(long, value_name = "NAME", requires = "seed", help = "Owner of seeded campgrounds")]
    pub seed_author: Option<String>,

    #[arg(
        long,
        value_name = "PASSWORD",
        requires = "seed_author",
        help = "Register the seed author with this password if missing"
    )]
    pub seed_password: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SeedArgs {
    #[arg(long, default_value_t = DEFAULT_COUNT, help = "Number of campgrounds to generate")]
    pub count: usize,

    #[arg(long, value_name = "NAME", help = "Existing user who will own the campgrounds")]
    pub author: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["campground-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn seed_defaults_count() {
        let cli = Cli::try_parse_from(["campground-api", "seed", "--author", "alice"]).unwrap();
        match cli.command {
            Some(Commands::Seed(args)) => {
                assert_eq!(args.count, DEFAULT_COUNT);
                assert_eq!(args.author, "alice");
            }
            _ => panic!("expected seed subcommand"),
        }
    }

    #[test]
    fn seed_author_requires_seed_count() {
        assert!(Cli::try_parse_from(["campground-api", "serve", "--seed-author", "alice"]).is_err());
    }
}
