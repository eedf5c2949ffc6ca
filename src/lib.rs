
pub mod almanac;
pub mod gnss;
pub mod time;

pub mod utils;

use thiserror::Error;

use crate::gnss::signal::SignalType;

#[derive(Debug, Error)]
pub enum GnssSimErr {
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	#[error("almanac parse error on line {line}: {reason}")]
	AlmanacParse{ line:usize, reason:String },
	#[error("timed out acquiring lock {0}")]
	LockTimeout(&'static str),
	#[error("generation failed: {0}")]
	Generation(String),
	#[error("signal {0:?} is not configured")]
	UnsupportedSignal(SignalType),
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GnssSimErr>;
