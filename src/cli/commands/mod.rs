//! Command handlers. Each takes the resolved [`AppContext`] and prints its
//! own output; errors propagate to `main` for exit-code mapping.

pub mod assessment;
pub mod init;
pub mod score;

use super::args::{Cli, Commands};
use super::setup::AppContext;
use anyhow::Result;

pub use assessment::{
    handle_add, handle_delete, handle_export, handle_import, handle_list, handle_show, AddFactor,
};
pub use init::init_config;
pub use score::{handle_matrix, handle_ratings, handle_score};

pub fn run(cli: Cli) -> Result<()> {
    // init must work even when an existing config file is broken.
    if let Commands::Init { force } = cli.command {
        return init_config(force);
    }

    let ctx = AppContext::from_cli(&cli)?;
    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Add {
            matter,
            axis,
            categories,
            rating,
            explanation,
        } => handle_add(
            &ctx,
            AddFactor {
                matter,
                axis,
                categories,
                rating,
                explanation,
            },
        ),
        Commands::Show {
            matter,
            format,
            output,
            scoring,
        } => handle_show(&ctx, &matter, format, output, scoring),
        Commands::Export {
            matter,
            format,
            output,
            copy,
            scoring,
        } => handle_export(&ctx, &matter, format, output, copy, scoring),
        Commands::Score {
            likelihood,
            severity,
            format,
            scoring,
        } => handle_score(&ctx, &likelihood, &severity, format, scoring),
        Commands::Matrix { rule } => handle_matrix(&ctx, rule),
        Commands::List => handle_list(&ctx),
        Commands::Delete { matter } => handle_delete(&ctx, &matter),
        Commands::Import { file, force } => handle_import(&ctx, &file, force),
        Commands::Ratings => handle_ratings(&ctx),
    }
}
