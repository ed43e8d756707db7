// In: src/config.rs

//! Configuration for a datasource instance and for individual queries.
//!
//! `DatasourceSettings` is parsed once per datasource instance from the JSON the
//! host application stores, and handed read-only to the transport collaborator.
//! `QueryModel` is parsed per query and steers the query path in `crate::query`.

use serde::{Deserialize, Serialize};

use crate::error::TranscodeError;

//==================================================================================
// I. Query Model
//==================================================================================

/// How the caller wants the result frame shaped.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryFormat {
    /// **Default:** Fields are returned in result-set order.
    #[default]
    Table,

    /// The time column, if one is found, is moved to the front of the frame.
    TimeSeries,
}

/// A single query as sent by the query editor.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryModel {
    #[serde(rename = "rawSql", default)]
    pub raw_sql: String,

    #[serde(default)]
    pub format: QueryFormat,
}

impl QueryModel {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, TranscodeError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

//==================================================================================
// II. Datasource Settings
//==================================================================================

/// Connection settings for one datasource instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DatasourceSettings {
    #[serde(default)]
    pub host: String,

    /// A port of `0` or an absent port both select the default.
    #[serde(default = "default_port", deserialize_with = "port_or_default")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(rename = "useTLS", default)]
    pub use_tls: bool,

    #[serde(rename = "skipTLSVerify", default)]
    pub skip_tls_verify: bool,
}

impl Default for DatasourceSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            username: String::new(),
            use_tls: false,
            skip_tls_verify: false,
        }
    }
}

impl DatasourceSettings {
    pub fn from_json(bytes: &[u8]) -> Result<Self, TranscodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// `host:port`, as dialled by the transport.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Helper for `serde` to provide the default Flight SQL port.
fn default_port() -> u16 {
    31337
}

fn port_or_default<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let port = u16::deserialize(deserializer)?;
    Ok(if port == 0 { default_port() } else { port })
}
