//! Routes `WARN`+ tracing events to a Slack channel while printing everything to stdout.
//!
//! ```sh
//! cargo run --example log_to_channel --features layer -- <token> <channel>
//! ```

// crates.io
use color_eyre::{Result, eyre::eyre};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};
// self
use slack_gate::layer::SlackLayer;

fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = std::env::args().skip(1);
	let (Some(token), Some(channel)) = (args.next(), args.next()) else {
		return Err(eyre!("usage: log_to_channel <token> <channel>"));
	};
	let slack = SlackLayer::from_token(token, channel)?
		.with_option("username", "log-relay")
		.with_option("icon_emoji", ":scroll:");

	tracing_subscriber::registry().with(fmt::layer()).with(slack).try_init()?;

	tracing::info!("stays local");
	tracing::warn!(queue = "payments", depth = 1_024, "queue backing up");
	tracing::error!("worker crashed");

	Ok(())
}
