//! Profile commands — `pms user`.

use anyhow::Result;

use pms::errors::MessageOverrides;

use super::Context;
use crate::UserCommands;

pub async fn cmd_user(ctx: &mut Context, command: UserCommands) -> Result<()> {
    ctx.require_login()?;

    match command {
        UserCommands::Show { username_slug } => {
            let overrides = MessageOverrides::new().not_found("Could not find that user.");
            let result = ctx.api.user_profile(&mut ctx.session, &username_slug).await;
            let user = ctx.settle(result, &overrides)?;

            println!("{}", console::style(&user.username).bold());
            if !user.email.is_empty() {
                println!("  email:   {}", user.email);
            }
            if let Some(picture) = &user.profile_picture {
                println!("  picture: {}", picture);
            }
        }
        UserCommands::Rename { username } => {
            if username.trim().is_empty() {
                anyhow::bail!("A username is required.");
            }
            let overrides = MessageOverrides::new().bad_request("That username is not available.");
            let result = ctx.api.update_username(&mut ctx.session, &username).await;
            let user = ctx.settle(result, &overrides)?;

            println!(
                "{} Username changed to {}",
                console::style("✓").green(),
                console::style(&user.username).bold()
            );
        }
    }

    Ok(())
}
