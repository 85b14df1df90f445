//! Generate-secret command.

use anyhow::Result;
use gateway_webhook_sync::SecretGenerator;

use crate::cli::GenerateSecretArgs;

/// Run the generate-secret command
pub fn run(args: GenerateSecretArgs) -> Result<()> {
    let generator = SecretGenerator::new();
    for _ in 0..args.count.max(1) {
        println!("{}", generator.generate());
    }
    Ok(())
}
