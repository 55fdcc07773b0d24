// src/survey/emitter.rs
//! Output sinks for finished readings.

use crate::math::types::*;
use crate::survey::error::{SurveyError, SurveyResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Receives every reading that survives the error pipeline.
///
/// Failures are reported to the caller, which logs them and moves on to the
/// next sample.
pub trait VectorEmitter: Send + Sync {
    fn emit(&mut self, reading: Point3D) -> SurveyResult<()>;

    /// Short description for log output.
    fn describe(&self) -> String;
}

/// Prints `[x, y, z]` lines to stdout.
#[derive(Debug, Default)]
pub struct StdOutEmitter;

impl VectorEmitter for StdOutEmitter {
    fn emit(&mut self, reading: Point3D) -> SurveyResult<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "[{}, {}, {}]", reading.x, reading.y, reading.z)?;
        Ok(())
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}

/// Appends `x<delimiter>y<delimiter>z` lines to a file.
#[derive(Debug)]
pub struct DelimitedFileEmitter {
    path: PathBuf,
    delimiter: char,
    writer: BufWriter<File>,
}

impl DelimitedFileEmitter {
    pub fn open(path: impl AsRef<Path>, delimiter: char) -> SurveyResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SurveyError::Emitter {
                emitter: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path,
            delimiter,
            writer: BufWriter::new(file),
        })
    }

    pub fn csv(path: impl AsRef<Path>) -> SurveyResult<Self> {
        Self::open(path, ',')
    }

    pub fn tsv(path: impl AsRef<Path>) -> SurveyResult<Self> {
        Self::open(path, '\t')
    }
}

impl VectorEmitter for DelimitedFileEmitter {
    fn emit(&mut self, reading: Point3D) -> SurveyResult<()> {
        let d = self.delimiter;
        writeln!(self.writer, "{}{d}{}{d}{}", reading.x, reading.y, reading.z)?;
        self.writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} ({:?}-separated)", self.path.display(), self.delimiter)
    }
}

/// JSON body sent to an HTTP endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Point3D> for Reading {
    fn from(v: Point3D) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Sends every reading as an HTTP `PUT` with a JSON body.
pub struct EndpointEmitter {
    url: String,
    client: reqwest::blocking::Client,
}

impl EndpointEmitter {
    pub fn new(url: impl Into<String>) -> SurveyResult<Self> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(ENDPOINT_TIMEOUT)
            .build()
            .map_err(|e| SurveyError::Emitter {
                emitter: url.clone(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { url, client })
    }
}

impl VectorEmitter for EndpointEmitter {
    fn emit(&mut self, reading: Point3D) -> SurveyResult<()> {
        let body = serde_json::to_string(&Reading::from(reading))?;
        let failed = |reason: String| SurveyError::Emitter {
            emitter: self.url.clone(),
            reason,
        };

        let response = self
            .client
            .put(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("PUT returned status {}", response.status())));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("PUT {}", self.url)
    }
}

/// Where readings go, parsed from `<kind>@<destination>` or `stdout`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EmitterSpec {
    #[default]
    StdOut,
    Csv(PathBuf),
    Tsv(PathBuf),
    Endpoint(String),
}

impl EmitterSpec {
    pub fn open(&self) -> SurveyResult<Box<dyn VectorEmitter>> {
        let emitter: Box<dyn VectorEmitter> = match self {
            EmitterSpec::StdOut => Box::new(StdOutEmitter),
            EmitterSpec::Csv(path) => Box::new(DelimitedFileEmitter::csv(path)?),
            EmitterSpec::Tsv(path) => Box::new(DelimitedFileEmitter::tsv(path)?),
            EmitterSpec::Endpoint(url) => Box::new(EndpointEmitter::new(url.clone())?),
        };
        Ok(emitter)
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, EmitterSpec::StdOut)
    }
}

impl FromStr for EmitterSpec {
    type Err = SurveyError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        if spec.eq_ignore_ascii_case("stdout") {
            return Ok(EmitterSpec::StdOut);
        }

        let invalid = |reason: &str| SurveyError::InvalidSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };
        let (kind, destination) = spec
            .split_once('@')
            .ok_or_else(|| invalid("expected <kind>@<destination>"))?;
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(invalid("missing destination"));
        }

        match kind.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(EmitterSpec::Csv(PathBuf::from(destination))),
            "tsv" => Ok(EmitterSpec::Tsv(PathBuf::from(destination))),
            "endpoint" => Ok(EmitterSpec::Endpoint(destination.to_string())),
            other => Err(invalid(&format!(
                "unknown emitter '{}' (expected csv, tsv or endpoint)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for EmitterSpec {
    type Error = SurveyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EmitterSpec> for String {
    fn from(spec: EmitterSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for EmitterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitterSpec::StdOut => write!(f, "stdout"),
            EmitterSpec::Csv(path) => write!(f, "csv@{}", path.display()),
            EmitterSpec::Tsv(path) => write!(f, "tsv@{}", path.display()),
            EmitterSpec::Endpoint(url) => write!(f, "endpoint@{}", url),
        }
    }
}
