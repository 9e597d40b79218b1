use serde::{Deserialize, Serialize};

use crate::ids::{EndpointId, FunctionId};

/// HTTP trigger backed by a function.
///
/// `path` may contain `:name` parameter segments and a trailing `*name` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(rename = "endpointId", default)]
    pub id: EndpointId,
    pub function_id: FunctionId,
    pub method: String,
    pub path: String,
}
