//! Command message kind: remote process execution on the device.
//!
//! The execution password travels as [`WireSecret`].

use super::{body_value, parse_body};
use crate::envelope::WireSecret;
use crate::error::CodecResult;
use fleetlink_domain::{MetricValue, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const APP_NAME: &str = "CMD";
pub const APP_VERSION: &str = "V1";
pub const SCHEMA: &str = "command";

pub const METRIC_COMMAND: &str = "command.command";
pub const METRIC_ARGUMENT: &str = "command.argument";
pub const METRIC_ENVIRONMENT: &str = "command.environment";
pub const METRIC_WORKING_DIRECTORY: &str = "command.working.directory";
pub const METRIC_STDIN: &str = "command.stdin";
pub const METRIC_TIMEOUT: &str = "command.timeout";
pub const METRIC_RUN_ASYNC: &str = "command.run.async";
pub const METRIC_PASSWORD: &str = "command.password";
pub const METRIC_STDOUT: &str = "command.stdout";
pub const METRIC_STDERR: &str = "command.stderr";
pub const METRIC_EXIT_CODE: &str = "command.exit.code";
pub const METRIC_TIMED_OUT: &str = "command.timed.out";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CommandBody {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub command: Option<String>,
    /// Space-separated argument list; absent means no arguments.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub argument: Option<String>,
    /// `NAME=value` pairs, space-separated.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub working_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stdin: Option<String>,
    /// Seconds before the device kills the process; absent means the device
    /// default.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub run_async: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<WireSecret>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exit_code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timed_out: Option<bool>,
}

pub fn encode_request(payload: &Payload) -> CodecResult<Value> {
    let body = CommandBody {
        command: payload.string_metric(METRIC_COMMAND).map(str::to_string),
        argument: payload.string_metric(METRIC_ARGUMENT).map(str::to_string),
        environment: payload.string_metric(METRIC_ENVIRONMENT).map(str::to_string),
        working_directory: payload
            .string_metric(METRIC_WORKING_DIRECTORY)
            .map(str::to_string),
        stdin: payload.string_metric(METRIC_STDIN).map(str::to_string),
        timeout: payload.i64_metric(METRIC_TIMEOUT),
        run_async: payload.bool_metric(METRIC_RUN_ASYNC),
        password: payload
            .secret_metric(METRIC_PASSWORD)
            .map(WireSecret::from_secret),
        stdout: payload.string_metric(METRIC_STDOUT).map(str::to_string),
        stderr: payload.string_metric(METRIC_STDERR).map(str::to_string),
        exit_code: payload.i64_metric(METRIC_EXIT_CODE),
        timed_out: payload.bool_metric(METRIC_TIMED_OUT),
    };
    body_value(&body, SCHEMA)
}

pub fn decode_body(value: &Value, raw: &[u8]) -> CodecResult<Payload> {
    let body: CommandBody = parse_body(value, SCHEMA, raw)?;
    let mut payload = Payload::new();
    if let Some(v) = body.command {
        payload.set_metric(METRIC_COMMAND, MetricValue::String(v));
    }
    if let Some(v) = body.argument {
        payload.set_metric(METRIC_ARGUMENT, MetricValue::String(v));
    }
    if let Some(v) = body.environment {
        payload.set_metric(METRIC_ENVIRONMENT, MetricValue::String(v));
    }
    if let Some(v) = body.working_directory {
        payload.set_metric(METRIC_WORKING_DIRECTORY, MetricValue::String(v));
    }
    if let Some(v) = body.stdin {
        payload.set_metric(METRIC_STDIN, MetricValue::String(v));
    }
    if let Some(v) = body.timeout {
        payload.set_metric(METRIC_TIMEOUT, MetricValue::I64(v));
    }
    if let Some(v) = body.run_async {
        payload.set_metric(METRIC_RUN_ASYNC, MetricValue::Bool(v));
    }
    if let Some(v) = body.password {
        payload.set_metric(METRIC_PASSWORD, MetricValue::Secret(v.into_secret()));
    }
    if let Some(v) = body.stdout {
        payload.set_metric(METRIC_STDOUT, MetricValue::String(v));
    }
    if let Some(v) = body.stderr {
        payload.set_metric(METRIC_STDERR, MetricValue::String(v));
    }
    if let Some(v) = body.exit_code {
        payload.set_metric(METRIC_EXIT_CODE, MetricValue::I64(v));
    }
    if let Some(v) = body.timed_out {
        payload.set_metric(METRIC_TIMED_OUT, MetricValue::Bool(v));
    }
    Ok(payload)
}
