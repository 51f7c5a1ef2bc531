//! Account commands — `pms login`, `pms logout`, `pms signup`, `pms whoami`.

use anyhow::{Context as _, Result};
use dialoguer::{Input, Password};

use pms::errors::MessageOverrides;
use pms::models::{Credentials, Registration};

use super::{Context, print_problems};

pub async fn cmd_login(
    ctx: &mut Context,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    let credentials = Credentials {
        username: username.trim().to_string(),
        password,
    };
    let overrides = MessageOverrides::new().bad_request("Unable to log in with the provided credentials.");
    let result = ctx.api.login(&mut ctx.session, &credentials).await;
    let user = ctx.settle(result, &overrides)?;

    println!(
        "{} Logged in as {}",
        console::style("✓").green(),
        console::style(&user.username).bold()
    );
    Ok(())
}

pub async fn cmd_logout(ctx: &mut Context) -> Result<()> {
    if !ctx.session.is_logged_in() {
        println!("Not logged in.");
        return Ok(());
    }
    let result = ctx.api.logout(&mut ctx.session).await;
    ctx.save_session()?;
    if let Err(err) = result {
        tracing::warn!(error = %err, "server did not confirm logout");
    }
    println!("Logged out.");
    Ok(())
}

pub async fn cmd_signup(ctx: &mut Context, username: &str, email: &str) -> Result<()> {
    let password1 = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;
    let password2 = Password::new()
        .with_prompt("Confirm password")
        .interact()
        .context("Failed to read password")?;

    let registration = Registration {
        username: username.trim().to_string(),
        email: email.trim().to_string(),
        password1,
        password2,
    };
    print_problems(&registration.validate())?;

    let result = ctx.api.register(&mut ctx.session, &registration).await;
    let user = ctx.settle(result, &MessageOverrides::new())?;

    println!(
        "{} Account {} created",
        console::style("✓").green(),
        console::style(&user.username).bold()
    );
    if !ctx.session.is_logged_in() {
        println!("Run 'pms login' to sign in.");
    }
    Ok(())
}

pub fn cmd_whoami(ctx: &Context) -> Result<()> {
    match &ctx.session.user {
        Some(user) => {
            println!("{}", console::style(&user.username).bold());
            if !user.email.is_empty() {
                println!("  email: {}", user.email);
            }
            println!("  api:   {}", ctx.config.api_url());
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
