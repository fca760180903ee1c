use crate::tracker::{Participant, Tracker, TrackerError};
use chrono::{Local, NaiveDate};
use std::{env, net::IpAddr, net::SocketAddr};
use thiserror::Error;

const DEFAULT_PARTICIPANTS: &str = "vini:Vini,neto:Neto";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Date(String),
    #[error("invalid participant entry '{0}', expected id:Name[:YYYY-MM-DD]")]
    Participant(String),
    #[error("invalid participant roster: {0}")]
    Roster(#[from] TrackerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantConfig {
    pub id: String,
    pub name: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub start_date: NaiveDate,
    pub participants: Vec<ParticipantConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host: IpAddr = match env::var("HOST") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "HOST",
                value,
            })?,
            Err(_) => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            Err(_) => 8080,
        };

        let start_date = match env::var("CHALLENGE_START_DATE") {
            Ok(value) => parse_date(&value)?,
            Err(_) => Local::now().date_naive(),
        };

        let roster =
            env::var("CHALLENGE_PARTICIPANTS").unwrap_or_else(|_| DEFAULT_PARTICIPANTS.to_string());

        Ok(Self {
            addr: SocketAddr::new(host, port),
            start_date,
            participants: parse_participants(&roster)?,
        })
    }

    pub fn build_tracker(&self) -> Result<Tracker, ConfigError> {
        let participants = self
            .participants
            .iter()
            .map(|entry| {
                Participant::new(
                    entry.id.clone(),
                    entry.name.clone(),
                    entry.start_date.unwrap_or(self.start_date),
                )
            })
            .collect();
        Ok(Tracker::new(participants)?)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ConfigError::Date(value.to_string()))
}

pub fn parse_participants(raw: &str) -> Result<Vec<ParticipantConfig>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':').map(str::trim);
            let id = parts.next().unwrap_or_default();
            let name = parts.next().unwrap_or_default();
            if id.is_empty() || name.is_empty() {
                return Err(ConfigError::Participant(entry.to_string()));
            }
            let start_date = parts.next().map(parse_date).transpose()?;
            Ok(ParticipantConfig {
                id: id.to_string(),
                name: name.to_string(),
                start_date,
            })
        })
        .collect()
}
