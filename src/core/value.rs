//! Tagged value representation for structured attributes
//!
//! A [`Value`] packs one datum into a 64-bit numeric slot plus an auxiliary
//! slot, interpreted by its [`Kind`]. Numeric kinds keep their bit pattern in
//! the numeric slot; strings keep their length there and borrow the text for
//! the lifetime `'a`, so building a value from a `&str` never copies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Any,
    Bool,
    Duration,
    Float64,
    Int64,
    Uint64,
    String,
    Time,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Any => "Any",
            Kind::Bool => "Bool",
            Kind::Duration => "Duration",
            Kind::Float64 => "Float64",
            Kind::Int64 => "Int64",
            Kind::Uint64 => "Uint64",
            Kind::String => "String",
            Kind::Time => "Time",
        };
        f.write_str(name)
    }
}

/// A value that can be encoded by a generic structural encoder.
///
/// Implemented for every `Serialize + Debug` type, so any serde type can be
/// attached to a record with [`Value::any`].
pub trait Structured: fmt::Debug + Send + Sync {
    /// Append the compact JSON encoding of `self` to `out`.
    fn write_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()>;

    fn to_json_value(&self) -> serde_json::Result<serde_json::Value>;
}

impl<T> Structured for T
where
    T: Serialize + fmt::Debug + Send + Sync,
{
    fn write_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()> {
        serde_json::to_writer(out, self)
    }

    fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[derive(Clone)]
enum Aux<'a> {
    Empty,
    Str(Cow<'a, str>),
    Duration(Duration),
    Time(DateTime<Utc>),
    Any(Arc<dyn Structured>),
}

/// One typed datum.
///
/// Accessors never panic. The numeric ones reinterpret the numeric slot
/// whatever the kind; `as_str`, `as_duration` and `as_time` return a zero
/// value for a kind they do not match.
#[derive(Clone)]
pub struct Value<'a> {
    num: u64,
    aux: Aux<'a>,
    kind: Kind,
}

impl<'a> Value<'a> {
    /// Borrowed or owned text; a `&str` is borrowed, not copied.
    pub fn string(value: impl Into<Cow<'a, str>>) -> Self {
        let value = value.into();
        Self {
            num: value.len() as u64,
            aux: Aux::Str(value),
            kind: Kind::String,
        }
    }

    pub fn int64(value: i64) -> Self {
        Self::numeric(value as u64, Kind::Int64)
    }

    pub fn uint64(value: u64) -> Self {
        Self::numeric(value, Kind::Uint64)
    }

    pub fn float64(value: f64) -> Self {
        Self::numeric(value.to_bits(), Kind::Float64)
    }

    pub fn bool(value: bool) -> Self {
        Self::numeric(u64::from(value), Kind::Bool)
    }

    pub fn duration(value: Duration) -> Self {
        Self {
            num: 0,
            aux: Aux::Duration(value),
            kind: Kind::Duration,
        }
    }

    pub fn time(value: DateTime<Utc>) -> Self {
        Self {
            num: 0,
            aux: Aux::Time(value),
            kind: Kind::Time,
        }
    }

    /// Box an arbitrary serde value for generic JSON encoding.
    pub fn any<T>(value: T) -> Self
    where
        T: Serialize + fmt::Debug + Send + Sync + 'static,
    {
        Self::structured(Arc::new(value))
    }

    pub fn structured(value: Arc<dyn Structured>) -> Self {
        Self {
            num: 0,
            aux: Aux::Any(value),
            kind: Kind::Any,
        }
    }

    fn numeric(num: u64, kind: Kind) -> Self {
        Self {
            num,
            aux: Aux::Empty,
            kind,
        }
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The text of a `String` value, or `""` for any other kind.
    pub fn as_str(&self) -> &str {
        match &self.aux {
            Aux::Str(s) if self.kind == Kind::String => s,
            _ => "",
        }
    }

    pub fn as_int64(&self) -> i64 {
        self.num as i64
    }

    pub fn as_uint64(&self) -> u64 {
        self.num
    }

    pub fn as_float64(&self) -> f64 {
        f64::from_bits(self.num)
    }

    pub fn as_bool(&self) -> bool {
        self.num == 1
    }

    pub fn as_duration(&self) -> Duration {
        match self.aux {
            Aux::Duration(d) => d,
            _ => Duration::ZERO,
        }
    }

    pub fn as_time(&self) -> DateTime<Utc> {
        match self.aux {
            Aux::Time(t) => t,
            _ => DateTime::<Utc>::default(),
        }
    }

    /// The boxed value of an `Any` value.
    pub fn structured_value(&self) -> Option<&Arc<dyn Structured>> {
        match &self.aux {
            Aux::Any(v) => Some(v),
            _ => None,
        }
    }

    /// Detach from any borrowed text, copying it.
    pub fn into_owned(self) -> Value<'static> {
        let aux = match self.aux {
            Aux::Empty => Aux::Empty,
            Aux::Str(s) => Aux::Str(Cow::Owned(s.into_owned())),
            Aux::Duration(d) => Aux::Duration(d),
            Aux::Time(t) => Aux::Time(t),
            Aux::Any(v) => Aux::Any(v),
        };
        Value {
            num: self.num,
            aux,
            kind: self.kind,
        }
    }

    /// Append the plain-text rendering of the value to `out`.
    ///
    /// This is the rendering used for template interpolation and for the
    /// unquoted positions of logfmt and pretty output.
    pub fn write_text(&self, out: &mut String) {
        use std::fmt::Write as _;
        match self.kind {
            Kind::String => out.push_str(self.as_str()),
            _ => {
                let _ = write!(out, "{}", self);
            }
        }
    }
}

/// Go-style duration text: `0s`, `150ns`, `1.5µs`, `20ms`, `1s`, `1m30s`, `2h0m5.25s`.
pub fn format_duration(d: Duration) -> String {
    const NANOS_PER_SEC: u128 = 1_000_000_000;

    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", fraction(nanos, 1_000, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", fraction(nanos, 1_000_000, 6));
    }

    let secs = nanos / NANOS_PER_SEC;
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&fraction(seconds * NANOS_PER_SEC + nanos % NANOS_PER_SEC, NANOS_PER_SEC, 9));
    out.push('s');
    out
}

fn fraction(value: u128, unit: u128, digits: usize) -> String {
    let (whole, rem) = (value / unit, value % unit);
    if rem == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", rem, width = digits);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::String => f.write_str(self.as_str()),
            Kind::Int64 => write!(f, "{}", self.as_int64()),
            Kind::Uint64 => write!(f, "{}", self.as_uint64()),
            Kind::Float64 => write!(f, "{}", self.as_float64()),
            Kind::Bool => write!(f, "{}", self.as_bool()),
            Kind::Duration => f.write_str(&format_duration(self.as_duration())),
            Kind::Time => f.write_str(&format_time(&self.as_time())),
            Kind::Any => match self.structured_value() {
                Some(v) => match v.to_json_value() {
                    // Bare strings render without JSON quotes
                    Ok(serde_json::Value::String(s)) => f.write_str(&s),
                    Ok(json) => write!(f, "{}", json),
                    Err(_) => write!(f, "{:?}", v),
                },
                None => Ok(()),
            },
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::String => write!(f, "String({:?})", self.as_str()),
            Kind::Any => match self.structured_value() {
                Some(v) => write!(f, "Any({:?})", v),
                None => f.write_str("Any"),
            },
            kind => write!(f, "{}({})", kind, self),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match (&self.aux, &other.aux) {
            (Aux::Str(a), Aux::Str(b)) => a == b,
            (Aux::Duration(a), Aux::Duration(b)) => a == b,
            (Aux::Time(a), Aux::Time(b)) => a == b,
            (Aux::Any(a), Aux::Any(b)) => Arc::ptr_eq(a, b),
            (Aux::Empty, Aux::Empty) => self.num == other.num,
            _ => false,
        }
    }
}

/// The generic-encoder view: every kind maps to its natural serde shape.
impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind {
            Kind::String => serializer.serialize_str(self.as_str()),
            Kind::Int64 => serializer.serialize_i64(self.as_int64()),
            Kind::Uint64 => serializer.serialize_u64(self.as_uint64()),
            Kind::Float64 => serializer.serialize_f64(self.as_float64()),
            Kind::Bool => serializer.serialize_bool(self.as_bool()),
            Kind::Duration => serializer.collect_str(&format_duration(self.as_duration())),
            Kind::Time => serializer.collect_str(&format_time(&self.as_time())),
            Kind::Any => match self.structured_value() {
                Some(v) => v
                    .to_json_value()
                    .map_err(serde::ser::Error::custom)?
                    .serialize(serializer),
                None => serializer.serialize_unit(),
            },
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value<'_> {
    fn from(value: String) -> Self {
        Value::string(value)
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    fn from(value: Cow<'a, str>) -> Self {
        Value::string(value)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(value: $t) -> Self {
                Value::int64(value as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(value: $t) -> Self {
                Value::uint64(value as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::float64(value)
    }
}

impl From<f32> for Value<'_> {
    fn from(value: f32) -> Self {
        Value::float64(f64::from(value))
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::bool(value)
    }
}

impl From<Duration> for Value<'_> {
    fn from(value: Duration) -> Self {
        Value::duration(value)
    }
}

impl From<DateTime<Utc>> for Value<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        Value::time(value)
    }
}

impl From<SystemTime> for Value<'_> {
    fn from(value: SystemTime) -> Self {
        Value::time(value.into())
    }
}
