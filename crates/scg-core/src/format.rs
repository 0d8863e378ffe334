use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownFormat;

/// Target code-generation template.
///
/// Formats are persisted by their stable [`Format::id`], never by position,
/// so variants can be reordered or added without breaking saved history.
/// Display labels are still accepted when reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    #[default]
    #[serde(rename = "typescript-axios", alias = "TypeScript - Axios")]
    TypeScriptAxios,
    #[serde(rename = "typescript-rest-test", alias = "TypeScript - Rest test")]
    TypeScriptRestTest,
    #[serde(rename = "java-retrofit2", alias = "Java - Retrofit2")]
    JavaRetrofit2,
    #[serde(rename = "kotlin", alias = "Kotlin")]
    Kotlin,
}

/// Family of format-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamBlock {
    Jvm,
    TypeScriptTestUnit,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::TypeScriptAxios,
        Format::TypeScriptRestTest,
        Format::JavaRetrofit2,
        Format::Kotlin,
    ];

    /// Human-readable name shown in pickers.
    pub fn label(self) -> &'static str {
        match self {
            Format::TypeScriptAxios => "TypeScript - Axios",
            Format::TypeScriptRestTest => "TypeScript - Rest test",
            Format::JavaRetrofit2 => "Java - Retrofit2",
            Format::Kotlin => "Kotlin",
        }
    }

    /// Stable identifier used in persisted data.
    pub fn id(self) -> &'static str {
        match self {
            Format::TypeScriptAxios => "typescript-axios",
            Format::TypeScriptRestTest => "typescript-rest-test",
            Format::JavaRetrofit2 => "java-retrofit2",
            Format::Kotlin => "kotlin",
        }
    }

    pub fn from_label(label: &str) -> Option<Format> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }

    pub fn from_id(id: &str) -> Option<Format> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    pub fn is_jvm(self) -> bool {
        matches!(self, Format::JavaRetrofit2 | Format::Kotlin)
    }

    /// The parameter family this format owns, if any.
    pub fn param_block(self) -> Option<ParamBlock> {
        match self {
            Format::JavaRetrofit2 | Format::Kotlin => Some(ParamBlock::Jvm),
            Format::TypeScriptRestTest => Some(ParamBlock::TypeScriptTestUnit),
            Format::TypeScriptAxios => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    /// Accepts an id or a label, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(s) || f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_axios() {
        assert_eq!(Format::default(), Format::TypeScriptAxios);
    }

    #[test]
    fn test_param_blocks() {
        assert_eq!(Format::TypeScriptAxios.param_block(), None);
        assert_eq!(
            Format::TypeScriptRestTest.param_block(),
            Some(ParamBlock::TypeScriptTestUnit)
        );
        assert_eq!(Format::JavaRetrofit2.param_block(), Some(ParamBlock::Jvm));
        assert_eq!(Format::Kotlin.param_block(), Some(ParamBlock::Jvm));
    }

    #[test]
    fn test_parse_id_and_label() {
        assert_eq!("kotlin".parse::<Format>().unwrap(), Format::Kotlin);
        assert_eq!(
            "Java - Retrofit2".parse::<Format>().unwrap(),
            Format::JavaRetrofit2
        );
        assert_eq!(
            "TYPESCRIPT-REST-TEST".parse::<Format>().unwrap(),
            Format::TypeScriptRestTest
        );
        assert!("cobol".parse::<Format>().is_err());
    }

    #[test]
    fn test_serialized_by_id() {
        let json = serde_json::to_string(&Format::JavaRetrofit2).unwrap();
        assert_eq!(json, "\"java-retrofit2\"");
    }

    #[test]
    fn test_deserialize_label_alias() {
        let format: Format = serde_json::from_str("\"TypeScript - Rest test\"").unwrap();
        assert_eq!(format, Format::TypeScriptRestTest);
    }

    #[test]
    fn test_ids_and_labels_unique() {
        for a in Format::ALL {
            assert_eq!(Format::from_id(a.id()), Some(a));
            assert_eq!(Format::from_label(a.label()), Some(a));
        }
    }
}
