//! Walks through a provider login: print the authorization URL, then (when a code is supplied)
//! exchange it and read the user's identity.
//!
//! ```sh
//! OAUTH_CLIENT_ID=... OAUTH_CLIENT_SECRET=... cargo run --example login_flow -- google
//! OAUTH_CLIENT_ID=... OAUTH_CLIENT_SECRET=... cargo run --example login_flow -- google <code>
//! ```

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use oauth2_identity::{
	client::ClientConfig,
	event::{CERTIFICATES_QUEUE_NAME, CertificateEvent, MemoryQueue},
	provider,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = env::args().skip(1);
	let provider_name = args.next().unwrap_or_else(|| "google".into());
	let code = args.next();
	let config = ClientConfig::new(
		env::var("OAUTH_CLIENT_ID").unwrap_or_else(|_| "demo-client".into()),
		env::var("OAUTH_CLIENT_SECRET").unwrap_or_else(|_| "demo-secret".into()),
		"https://app.example.com/v1/account/sessions/oauth2/callback",
	)?
	.with_state_entry("project", "demo-project")
	.with_state_entry("success", "https://app.example.com/welcome");
	let provider = provider::from_name(&provider_name, config)?;

	println!("Send your user to {}.", provider.login_url());
	println!("Requested scopes: {}.", provider.scopes().join(" "));

	let Some(code) = code else {
		println!("Re-run with the `code` query parameter from the callback to finish the login.");

		return Ok(());
	};
	// One exchange; the derived accessors would each spend the code again.
	let tokens = provider.tokens(&code).await?;

	if tokens.access_token.is_empty() {
		return Err(eyre!("{provider_name} returned no access token."));
	}

	let access_token = tokens.access_token.expose();

	println!("Access token expires in {}s.", tokens.expires_in);
	println!("User id: {}.", provider.user_id(access_token).await?);
	println!(
		"Email: {} (verified: {}).",
		provider.user_email(access_token).await?,
		provider.is_email_verified(access_token).await?
	);
	println!("Name: {}.", provider.user_name(access_token).await?);

	let queue = MemoryQueue::default();
	let job = CertificateEvent::new("demo-project").trigger(&queue).await?;

	println!("Queued certificate job {job:?} ({} pending).", queue.len(CERTIFICATES_QUEUE_NAME));

	Ok(())
}
