//! Shipment models
//!
//! Records exchanged with clients and the typed row decoders for the stored
//! procedures' result sets.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Delivery person, as returned by `sp_cbox_listar_repartidor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Repartidor {
    pub repartidor_id: i64,
    pub nombre: String,
    pub apellido: String,
    pub telefono: String,
}

/// Shipment status, as returned by `sp_cbox_listar_estado_envio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EstadoEnvio {
    pub estado_id: i64,
    pub nombre_estado: String,
}

/// Client-supplied shipment fields for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvioInput {
    pub remitente: String,
    pub destinatario: String,
    pub direccion_envio: String,
    #[serde(with = "fecha")]
    pub fecha_envio: NaiveDateTime,
    pub repartidor_id: i64,
    pub estado_id: i64,
}

/// Row shape of `sp_listar_envio` and `sp_listar_envio_por_id`.
#[derive(Debug, Clone, FromRow)]
pub struct EnvioRow {
    pub envio_id: i64,
    pub remitente: String,
    pub destinatario: String,
    pub direccion_envio: String,
    pub fecha_envio: NaiveDateTime,
    pub nombre_repartidor: String,
    pub apellido_repartidor: String,
    pub estado: String,
}

/// Joined shipment view returned by the listing and lookup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvioOut {
    pub envio_id: i64,
    pub remitente: String,
    pub destinatario: String,
    pub direccion_envio: String,
    /// ISO-8601 local date-time
    pub fecha_envio: String,
    pub nombre_repartidor: String,
    pub apellido_repartidor: String,
    pub estado: String,
}

impl From<EnvioRow> for EnvioOut {
    fn from(row: EnvioRow) -> Self {
        Self {
            envio_id: row.envio_id,
            remitente: row.remitente,
            destinatario: row.destinatario,
            direccion_envio: row.direccion_envio,
            fecha_envio: fecha::to_iso8601(&row.fecha_envio),
            nombre_repartidor: row.nombre_repartidor,
            apellido_repartidor: row.apellido_repartidor,
            estado: row.estado,
        }
    }
}

/// Shipment as written: its id plus the fields the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envio {
    pub envio_id: i64,
    pub remitente: String,
    pub destinatario: String,
    pub direccion_envio: String,
    #[serde(with = "fecha")]
    pub fecha_envio: NaiveDateTime,
    pub repartidor_id: i64,
    pub estado_id: i64,
}

impl Envio {
    pub fn from_input(envio_id: i64, input: EnvioInput) -> Self {
        Self {
            envio_id,
            remitente: input.remitente,
            destinatario: input.destinatario,
            direccion_envio: input.direccion_envio,
            fecha_envio: input.fecha_envio,
            repartidor_id: input.repartidor_id,
            estado_id: input.estado_id,
        }
    }
}

/// Plain `{"message": ...}` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Shipment date encoding.
///
/// Output is `YYYY-MM-DDTHH:MM:SS`, with `.ffffff` appended when the
/// microseconds are non-zero. Input also accepts a space separator, a bare
/// date (midnight) or a Unix timestamp in seconds, read as UTC. Numbers above
/// `2e10` are taken as milliseconds.
///
/// Dates are stored without a zone. An RFC 3339 offset in the input is
/// dropped: `2024-01-01T10:00:00-05:00` is stored and echoed back as
/// `2024-01-01T10:00:00`.
pub mod fecha {
    use std::fmt;

    use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    const LOCAL_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    /// Timestamps larger than this are milliseconds, not seconds.
    const MILLIS_THRESHOLD: f64 = 2e10;

    pub fn to_iso8601(value: &NaiveDateTime) -> String {
        let base = value.format("%Y-%m-%dT%H:%M:%S").to_string();
        match value.nanosecond() / 1_000 {
            0 => base,
            micros => format!("{}.{:06}", base, micros),
        }
    }

    pub fn parse(raw: &str) -> Result<NaiveDateTime, String> {
        let raw = raw.trim();

        for format in LOCAL_FORMATS {
            if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(value);
            }
        }
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Ok(value.naive_local());
        }
        if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(midnight);
        }

        Err(format!("invalid datetime: {:?}", raw))
    }

    /// Convert a Unix timestamp to a UTC wall-clock time.
    pub fn from_timestamp(value: f64) -> Result<NaiveDateTime, String> {
        if !value.is_finite() {
            return Err(format!("invalid timestamp: {}", value));
        }
        let millis = if value.abs() > MILLIS_THRESHOLD {
            value.round()
        } else {
            (value * 1_000.0).round()
        };
        if millis.abs() >= i64::MAX as f64 {
            return Err(format!("timestamp out of range: {}", value));
        }

        DateTime::<Utc>::from_timestamp_millis(millis as i64)
            .map(|value| value.naive_utc())
            .ok_or_else(|| format!("timestamp out of range: {}", value))
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_iso8601(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FechaVisitor)
    }

    struct FechaVisitor;

    impl<'de> Visitor<'de> for FechaVisitor {
        type Value = NaiveDateTime;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an ISO-8601 datetime string or a Unix timestamp")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            parse(value).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            from_timestamp(value as f64).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            from_timestamp(value as f64).map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            from_timestamp(value).map_err(E::custom)
        }
    }
}
