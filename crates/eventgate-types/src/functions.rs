//! Function descriptors.

use serde::{Deserialize, Serialize};

use crate::ids::FunctionId;

/// A function the gateway can invoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    #[serde(rename = "functionId", default)]
    pub id: FunctionId,
    pub provider: Provider,
}

/// Where and how a function is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Provider {
    #[serde(rename = "awslambda", rename_all = "camelCase")]
    AwsLambda {
        arn: String,
        region: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aws_access_key_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aws_secret_access_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        aws_session_token: Option<String>,
    },
    #[serde(rename = "http")]
    Http { url: String },
    #[serde(rename = "emulator", rename_all = "camelCase")]
    Emulator {
        emulator_url: String,
        api_version: String,
    },
}
