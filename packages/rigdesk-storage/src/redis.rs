use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, Result};
use rigdesk_domain::throttle::{self, Rate, ThrottleKeys};

/// Builds Redis clients from the configured cache location.
///
/// Every [`RedisFactory::connection`] call opens a fresh connection; nothing is pooled.
#[derive(Debug, Clone)]
pub struct RedisFactory {
	url: String,
}
impl RedisFactory {
	pub fn new(cfg: &rigdesk_config::Redis) -> Self {
		Self { url: cfg.cache_location.clone() }
	}

	pub fn client(&self) -> Result<Client> {
		Ok(Client::open(self.url.as_str())?)
	}

	pub async fn connection(&self) -> Result<MultiplexedConnection> {
		Ok(self.client()?.get_multiplexed_async_connection().await?)
	}
}

/// Fixed-window throttle with a schedule of future slots once a window is full.
#[derive(Debug, Clone)]
pub struct RedisThrottle {
	factory: RedisFactory,
	name: String,
	rate: Rate,
}
impl RedisThrottle {
	pub fn new(factory: RedisFactory, name: impl Into<String>, rate: Rate) -> Self {
		Self { factory, name: name.into(), rate }
	}

	/// Seconds the caller identified by `key` must wait. Zero means proceed now.
	pub async fn wait_secs(&self, key: Option<&str>, now: OffsetDateTime) -> Result<f64> {
		let keys = ThrottleKeys::new(&self.name, key);
		let mut conn = self.factory.connection().await?;
		let current: Option<String> = conn.get(&keys.counter).await?;
		let Some(current) = current else {
			let _: () = conn.set_ex(&keys.counter, 1, self.rate.period_secs).await?;

			return Ok(0.0);
		};
		let current = current
			.parse::<u64>()
			.map_err(|_| {
				Error::InvalidArgument(format!("Throttle counter {current:?} is not a number."))
			})?;

		if current < self.rate.count {
			let updated: i64 = conn.incr(&keys.counter, 1).await?;

			// The counter expired between GET and INCR, so INCR recreated it without a TTL.
			if updated == 1 {
				let _: () = conn.expire(&keys.counter, self.rate.period_secs as i64).await?;
			}

			return Ok(0.0);
		}

		let scheduled: Option<String> = conn.get(&keys.schedule).await?;
		let scheduled = scheduled.and_then(|raw| OffsetDateTime::parse(&raw, &Rfc3339).ok());

		match scheduled {
			Some(scheduled) if scheduled >= now => {
				let next = throttle::next_slot(scheduled, self.rate);

				let _: () = conn.set(&keys.schedule, format_timestamp(next)?).await?;

				Ok((next - now).as_seconds_f64())
			},
			_ => self.schedule_next_window(&mut conn, &keys, now).await,
		}
	}

	async fn schedule_next_window(
		&self,
		conn: &mut MultiplexedConnection,
		keys: &ThrottleKeys,
		now: OffsetDateTime,
	) -> Result<f64> {
		let ttl: i64 = conn.ttl(&keys.counter).await?;

		// -2 means the counter already expired, -1 means it has no TTL.
		if ttl < 0 {
			return Ok(0.0);
		}

		let next = now + Duration::seconds(ttl);
		let _: () = conn.set(&keys.schedule, format_timestamp(next)?).await?;

		Ok(ttl as f64)
	}
}

fn format_timestamp(ts: OffsetDateTime) -> Result<String> {
	ts.format(&Rfc3339)
		.map_err(|err| Error::InvalidArgument(format!("Failed to format timestamp: {err}.")))
}
