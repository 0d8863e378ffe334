use serde::{Deserialize, Serialize};

use crate::format::ParamBlock;

/// Parameters shared by the JVM targets (Java - Retrofit2, Kotlin).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JvmParams {
    pub package_path: String,
    pub gradle_build_location: String,
}

/// Parameters for the TypeScript REST test suite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeScriptTestUnitParams {
    pub controllers: Vec<String>,
}

/// Format-specific parameter blocks.
///
/// A block is created the first time its family is selected and is kept
/// afterwards, even when another format becomes active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm: Option<JvmParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_script_test_unit: Option<TypeScriptTestUnitParams>,
}

impl AdditionalParams {
    pub fn is_empty(&self) -> bool {
        self.jvm.is_none() && self.type_script_test_unit.is_none()
    }

    pub fn has_block(&self, block: ParamBlock) -> bool {
        match block {
            ParamBlock::Jvm => self.jvm.is_some(),
            ParamBlock::TypeScriptTestUnit => self.type_script_test_unit.is_some(),
        }
    }

    /// Create the block with empty fields unless it already exists.
    pub fn ensure_block(&mut self, block: ParamBlock) {
        match block {
            ParamBlock::Jvm => {
                self.jvm.get_or_insert_with(JvmParams::default);
            }
            ParamBlock::TypeScriptTestUnit => {
                self.type_script_test_unit
                    .get_or_insert_with(TypeScriptTestUnitParams::default);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_block_keeps_existing() {
        let mut params = AdditionalParams {
            jvm: Some(JvmParams {
                package_path: "com.acme".to_string(),
                gradle_build_location: "/p/build.gradle".to_string(),
            }),
            type_script_test_unit: None,
        };
        params.ensure_block(ParamBlock::Jvm);
        assert_eq!(params.jvm.as_ref().unwrap().package_path, "com.acme");
        assert!(!params.has_block(ParamBlock::TypeScriptTestUnit));

        params.ensure_block(ParamBlock::TypeScriptTestUnit);
        assert!(
            params
                .type_script_test_unit
                .as_ref()
                .unwrap()
                .controllers
                .is_empty()
        );
    }

    #[test]
    fn test_empty_blocks_not_serialized() {
        let json = serde_json::to_string(&AdditionalParams::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
