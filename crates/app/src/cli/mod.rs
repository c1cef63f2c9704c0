use clap::{Parser, Subcommand};

mod db;
mod promo_code;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    PromoCode(promo_code::PromoCodeCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::PromoCode(command) => promo_code::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
