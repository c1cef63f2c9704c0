use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct PromoCodeCommand {
    #[command(subcommand)]
    command: PromoCodeSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoCodeSubcommand {
    Create(create::CreatePromoCodeArgs),
}

pub(crate) async fn run(command: PromoCodeCommand) -> Result<(), String> {
    match command.command {
        PromoCodeSubcommand::Create(args) => create::run(args).await,
    }
}
