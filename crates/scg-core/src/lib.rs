pub mod config;
pub mod error;
pub mod format;
pub mod form_data;
pub mod history;
pub mod inspect;
pub mod params;
pub mod state;

pub use form_data::SwaggerFormData;
pub use format::{Format, ParamBlock};
pub use params::{AdditionalParams, JvmParams, TypeScriptTestUnitParams};
pub use state::{BlockSignal, ConfigState, FormatChange};
