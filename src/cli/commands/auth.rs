use crate::config::Config;

pub fn cmd_auth(config: &Config, token: &str) -> anyhow::Result<()> {
    let token = token.trim();
    if token.is_empty() {
        println!("Token is empty, nothing saved.");
        return Ok(());
    }

    let mut config = config.clone();
    config.tmdb.api_token = token.to_string();
    config.save()?;

    println!("✓ TMDB credential saved.");
    Ok(())
}
