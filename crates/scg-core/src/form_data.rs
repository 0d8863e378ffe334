use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::Format;
use crate::params::{AdditionalParams, JvmParams, TypeScriptTestUnitParams};

/// Snapshot of a confirmed configuration, as handed to the generator and
/// saved to history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwaggerFormData {
    pub output: String,
    pub url: String,
    pub additional_params: AdditionalParams,
    pub format: Format,
}

impl SwaggerFormData {
    /// Decode a persisted record one field at a time.
    ///
    /// A field that is missing or has the wrong shape takes its default
    /// value; the remaining fields are still read.
    pub fn from_value_lenient(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            warn!("history record is not an object, using defaults");
            return Self::default();
        };

        let params = object.get("additionalParams");
        let additional_params = AdditionalParams {
            jvm: params.and_then(|p| p.get("jvm")).and_then(jvm_lenient),
            type_script_test_unit: params
                .and_then(|p| p.get("typeScriptTestUnit"))
                .and_then(type_script_test_unit_lenient),
        };

        Self {
            output: object
                .get("output")
                .and_then(|v| field("output", v))
                .unwrap_or_default(),
            url: object
                .get("url")
                .and_then(|v| field("url", v))
                .unwrap_or_default(),
            additional_params,
            format: object
                .get("format")
                .and_then(|v| field("format", v))
                .unwrap_or_default(),
        }
    }
}

fn jvm_lenient(value: &Value) -> Option<JvmParams> {
    let Some(object) = value.as_object() else {
        if !value.is_null() {
            warn!("ignoring malformed history field `additionalParams.jvm`");
        }
        return None;
    };
    Some(JvmParams {
        package_path: object
            .get("packagePath")
            .and_then(|v| field("additionalParams.jvm.packagePath", v))
            .unwrap_or_default(),
        gradle_build_location: object
            .get("gradleBuildLocation")
            .and_then(|v| field("additionalParams.jvm.gradleBuildLocation", v))
            .unwrap_or_default(),
    })
}

fn type_script_test_unit_lenient(value: &Value) -> Option<TypeScriptTestUnitParams> {
    let Some(object) = value.as_object() else {
        if !value.is_null() {
            warn!("ignoring malformed history field `additionalParams.typeScriptTestUnit`");
        }
        return None;
    };
    Some(TypeScriptTestUnitParams {
        controllers: object
            .get("controllers")
            .and_then(|v| field("additionalParams.typeScriptTestUnit.controllers", v))
            .unwrap_or_default(),
    })
}

fn field<T: DeserializeOwned>(name: &str, value: &Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("ignoring malformed history field `{name}`: {e}");
            None
        }
    }
}
