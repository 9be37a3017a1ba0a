//! Posts a message, then edits it in place.
//!
//! ```sh
//! cargo run --example post_message -- <token> <channel> "deploy started"
//! ```
//!
//! Rate-limit errors carry a wait hint; the client refuses further calls locally until it passes.

// crates.io
use color_eyre::{Result, eyre::eyre};
use time::OffsetDateTime;
// self
use slack_gate::{ClientConfig, Error, SlackClient};

fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = std::env::args().skip(1);
	let (Some(token), Some(channel)) = (args.next(), args.next()) else {
		return Err(eyre!("usage: post_message <token> <channel> [text]"));
	};
	let text = args.next().unwrap_or_else(|| "deploy started".into());
	let config = ClientConfig::builder().user_agent("slack-gate-demo/0.1").build()?;
	let client = SlackClient::from_config(token, config)?;
	let posted = match client.post_message(&channel, &text, [("unfurl_links", "false")]) {
		Ok(response) => response.message_ref()?,
		Err(Error::RateLimited(limited)) => {
			let wait = limited.wait_hint(OffsetDateTime::now_utc());

			return Err(eyre!("Slack is throttling us; try again in {}s.", wait.whole_seconds()));
		},
		Err(e) => return Err(e.into()),
	};

	println!("posted {} in {}", posted.ts, posted.channel);

	client.update_message(&posted.channel, &format!("{text} (finished)"), &posted.ts)?;

	println!("updated {}", posted.ts);

	Ok(())
}
