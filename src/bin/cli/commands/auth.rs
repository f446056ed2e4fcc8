use std::io::Write;

use anyhow::{bail, Result};

use recallforge::api::ApiError;
use recallforge::auth::SessionState;

use crate::app::App;

pub async fn run_register(
    app: &App,
    username: &str,
    email: &str,
    password: Option<&str>,
) -> Result<()> {
    let password = resolve_password(password)?;
    let mut session = app.session();

    match session.register(username, email, &password).await {
        Ok(profile) => {
            println!("Registered and logged in as {} <{}>", profile.username, profile.email);
            Ok(())
        }
        Err(ApiError::Conflict(message)) => bail!("Registration rejected: {}", message),
        Err(err) => Err(err.into()),
    }
}

pub async fn run_login(app: &App, username: &str, password: Option<&str>) -> Result<()> {
    let password = resolve_password(password)?;
    let mut session = app.session();

    match session.login(username, &password).await {
        Ok(profile) => {
            println!("Logged in as {}", profile.username);
            Ok(())
        }
        Err(ApiError::AuthenticationRejected) => bail!("Invalid credentials. Please try again."),
        Err(err) => Err(err.into()),
    }
}

pub fn run_logout(app: &App) -> Result<()> {
    let mut session = app.session();
    session.logout();
    println!("Logged out.");
    Ok(())
}

pub async fn run_whoami(app: &App) -> Result<()> {
    let mut session = app.session();
    match session.bootstrap().await {
        SessionState::Authenticated => {
            if let Some(user) = session.current_user() {
                println!("{} <{}> (id {})", user.username, user.email, user.id);
            }
        }
        SessionState::Anonymous => println!("Not logged in."),
    }
    Ok(())
}

/// Use the provided password or prompt for one on stdin.
fn resolve_password(password: Option<&str>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password.to_string());
    }

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}
