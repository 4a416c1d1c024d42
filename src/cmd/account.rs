use crate::{
    conf::settings,
    pkg::client::{AccountsClient, ClientSession},
    prelude::Result,
};

fn client() -> AccountsClient {
    AccountsClient::new(&settings.api_url)
}

pub async fn signup(username: &str, password: &str) -> Result<()> {
    client().signup(username, password).await?;
    println!("Signup successful! Please log in.");
    Ok(())
}

pub async fn login(username: &str, password: &str) -> Result<()> {
    let session = client().login(username, password).await?;
    session.save(&settings.session_file).await?;
    println!("Logged in as {}", session.username);
    Ok(())
}

pub async fn logout(session: Option<&ClientSession>) -> Result<()> {
    if let Some(session) = session {
        if let Err(e) = client().logout(session).await {
            tracing::warn!("server-side logout failed: {:?}", e);
        }
    }
    ClientSession::clear(&settings.session_file).await?;
    println!("Logged out successfully.");
    Ok(())
}

pub async fn whoami(session: Option<&ClientSession>) -> Result<()> {
    match session {
        Some(session) => println!("Logged in as {}", client().whoami(session).await?),
        None => println!("Not logged in"),
    }
    Ok(())
}
