//! Live form state for one configuration session.
//!
//! [`ConfigState`] holds the values a presentation layer edits and applies the
//! format rules: selecting a format creates its parameter block, the previous
//! block is deactivated and the new one activated. Presentation code
//! subscribes through the `on_*` hooks instead of being called directly.

use std::fmt;
use std::path::Path;

use log::{debug, warn};

use crate::error::HistoryError;
use crate::form_data::SwaggerFormData;
use crate::format::{Format, ParamBlock};
use crate::history::HistoryStore;
use crate::inspect::{DirectoryInspector, FsInspector};
use crate::params::{AdditionalParams, JvmParams, TypeScriptTestUnitParams};

/// Visibility signal for a parameter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSignal {
    Activate(ParamBlock),
    Deactivate(ParamBlock),
}

/// Emitted after every `set_format`, once block signals have been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChange {
    pub previous: Format,
    pub current: Format,
}

type UrlHook = Box<dyn FnMut(&str)>;
type FormatHook = Box<dyn FnMut(FormatChange)>;
type BlockHook = Box<dyn FnMut(BlockSignal, &AdditionalParams)>;
type DirectoryHandler = Box<dyn FnMut(&str, &dyn DirectoryInspector, &mut AdditionalParams)>;

pub struct ConfigState {
    output: String,
    url: String,
    format: Format,
    additional_params: AdditionalParams,
    inspector: Box<dyn DirectoryInspector>,
    url_hooks: Vec<UrlHook>,
    format_hooks: Vec<FormatHook>,
    block_hooks: Vec<BlockHook>,
    directory_handlers: Vec<(Format, DirectoryHandler)>,
}

impl ConfigState {
    /// Empty state: no output, no url, `TypeScript - Axios`, no blocks.
    pub fn new(inspector: impl DirectoryInspector + 'static) -> Self {
        Self {
            output: String::new(),
            url: String::new(),
            format: Format::default(),
            additional_params: AdditionalParams::default(),
            inspector: Box::new(inspector),
            url_hooks: Vec::new(),
            format_hooks: Vec::new(),
            block_hooks: Vec::new(),
            directory_handlers: Vec::new(),
        }
    }

    /// State seeded from a previous snapshot. The seeded format's block is
    /// created if missing; the Retrofit2 derivation is not run.
    pub fn seeded(
        inspector: impl DirectoryInspector + 'static,
        seed: Option<SwaggerFormData>,
    ) -> Self {
        let mut state = Self::new(inspector);
        if let Some(seed) = seed {
            state.output = seed.output;
            state.url = seed.url;
            state.format = seed.format;
            state.additional_params = seed.additional_params;
            if let Some(block) = state.format.param_block() {
                state.additional_params.ensure_block(block);
            }
        }
        state
    }

    /// State seeded from history, falling back to defaults if it can't be read.
    pub fn from_history(
        inspector: impl DirectoryInspector + 'static,
        store: &dyn HistoryStore,
    ) -> Self {
        let seed = store.load().unwrap_or_else(|e| {
            warn!("could not load history, starting empty: {e}");
            None
        });
        Self::seeded(inspector, seed)
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn additional_params(&self) -> &AdditionalParams {
        &self.additional_params
    }

    /// Block owned by the current format.
    pub fn active_block(&self) -> Option<ParamBlock> {
        self.format.param_block()
    }

    pub fn jvm_mut(&mut self) -> Option<&mut JvmParams> {
        self.additional_params.jvm.as_mut()
    }

    pub fn type_script_test_unit_mut(&mut self) -> Option<&mut TypeScriptTestUnitParams> {
        self.additional_params.type_script_test_unit.as_mut()
    }

    /// Called with the new url on every `set_url`, in registration order.
    pub fn on_url_change(&mut self, hook: impl FnMut(&str) + 'static) {
        self.url_hooks.push(Box::new(hook));
    }

    pub fn on_format_change(&mut self, hook: impl FnMut(FormatChange) + 'static) {
        self.format_hooks.push(Box::new(hook));
    }

    pub fn on_block_signal(&mut self, hook: impl FnMut(BlockSignal, &AdditionalParams) + 'static) {
        self.block_hooks.push(Box::new(hook));
    }

    /// Run `handler` on `set_output` while `format` is selected.
    pub fn on_directory_change(
        &mut self,
        format: Format,
        handler: impl FnMut(&str, &dyn DirectoryInspector, &mut AdditionalParams) + 'static,
    ) {
        self.directory_handlers.push((format, Box::new(handler)));
    }

    /// Store the url and notify observers. Repeated values are not filtered.
    pub fn set_url(&mut self, value: impl Into<String>) {
        self.url = value.into();
        for hook in &mut self.url_hooks {
            hook(&self.url);
        }
    }

    /// Store the format, create its block if missing, then deactivate the
    /// previous block, derive Retrofit2 defaults from the output folder and
    /// activate the new block.
    pub fn set_format(&mut self, format: Format) {
        let previous = self.format;
        self.format = format;
        debug!("format {} -> {}", previous, format);

        if format.is_jvm() {
            self.additional_params.ensure_block(ParamBlock::Jvm);
        } else if format == Format::TypeScriptRestTest {
            self.additional_params
                .ensure_block(ParamBlock::TypeScriptTestUnit);
        }

        if let Some(block) = previous.param_block() {
            self.signal(BlockSignal::Deactivate(block));
        }

        if format == Format::JavaRetrofit2 && !self.output.is_empty() {
            let derived = self.inspector.inspect(Path::new(&self.output));
            debug!("derived jvm params from {}: {:?}", self.output, derived);
            self.additional_params.jvm = Some(derived);
        }

        if let Some(block) = format.param_block() {
            self.signal(BlockSignal::Activate(block));
        }

        let change = FormatChange {
            previous,
            current: format,
        };
        for hook in &mut self.format_hooks {
            hook(change);
        }
    }

    /// Store the output folder and run the directory handlers registered for
    /// the current format.
    pub fn set_output(&mut self, value: impl Into<String>) {
        self.output = value.into();
        for (format, handler) in &mut self.directory_handlers {
            if *format == self.format {
                handler(
                    &self.output,
                    self.inspector.as_ref(),
                    &mut self.additional_params,
                );
            }
        }
    }

    pub fn build(&self) -> SwaggerFormData {
        SwaggerFormData {
            output: self.output.clone(),
            url: self.url.clone(),
            additional_params: self.additional_params.clone(),
            format: self.format,
        }
    }

    /// Build the snapshot and save it as the new history entry.
    pub fn confirm(&self, store: &dyn HistoryStore) -> Result<SwaggerFormData, HistoryError> {
        let data = self.build();
        store.save(&data)?;
        Ok(data)
    }

    fn signal(&mut self, signal: BlockSignal) {
        for hook in &mut self.block_hooks {
            hook(signal, &self.additional_params);
        }
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        Self::new(FsInspector)
    }
}

impl fmt::Debug for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigState")
            .field("output", &self.output)
            .field("url", &self.url)
            .field("format", &self.format)
            .field("additional_params", &self.additional_params)
            .finish_non_exhaustive()
    }
}

/// Directory handler that refreshes the JVM block from the new output folder.
///
/// An empty folder leaves the block untouched.
pub fn rederive_jvm_params(
    output: &str,
    inspector: &dyn DirectoryInspector,
    params: &mut AdditionalParams,
) {
    if output.is_empty() {
        return;
    }
    params.jvm = Some(inspector.inspect(Path::new(output)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FixedInspector;

    impl DirectoryInspector for FixedInspector {
        fn inspect(&self, dir: &Path) -> JvmParams {
            JvmParams {
                package_path: format!("pkg.{}", dir.display()),
                gradle_build_location: "/proj/build.gradle".to_string(),
            }
        }
    }

    #[test]
    fn test_defaults() {
        let state = ConfigState::new(FixedInspector);
        let data = state.build();
        assert_eq!(data.output, "");
        assert_eq!(data.url, "");
        assert_eq!(data.format, Format::TypeScriptAxios);
        assert!(data.additional_params.is_empty());
        assert_eq!(state.active_block(), None);
    }

    #[test]
    fn test_url_notifies_every_call() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut state = ConfigState::new(FixedInspector);
        let sink = Rc::clone(&seen);
        state.on_url_change(move |url| sink.borrow_mut().push(format!("a:{url}")));
        let sink = Rc::clone(&seen);
        state.on_url_change(move |url| sink.borrow_mut().push(format!("b:{url}")));

        state.set_url("http://x");
        state.set_url("http://x");

        assert_eq!(
            *seen.borrow(),
            vec!["a:http://x", "b:http://x", "a:http://x", "b:http://x"]
        );
    }

    #[test]
    fn test_signal_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut state = ConfigState::new(FixedInspector);
        let sink = Rc::clone(&seen);
        state.on_block_signal(move |signal, _| sink.borrow_mut().push(format!("{signal:?}")));
        let sink = Rc::clone(&seen);
        state.on_format_change(move |change| {
            sink.borrow_mut()
                .push(format!("{:?}->{:?}", change.previous, change.current))
        });

        state.set_format(Format::Kotlin);
        state.set_format(Format::TypeScriptRestTest);

        assert_eq!(
            *seen.borrow(),
            vec![
                "Activate(Jvm)",
                "TypeScriptAxios->Kotlin",
                "Deactivate(Jvm)",
                "Activate(TypeScriptTestUnit)",
                "Kotlin->TypeScriptRestTest",
            ]
        );
    }

    #[test]
    fn test_retrofit_derivation_needs_output() {
        let mut state = ConfigState::new(FixedInspector);
        state.set_format(Format::JavaRetrofit2);
        assert_eq!(state.additional_params().jvm, Some(JvmParams::default()));
    }

    #[test]
    fn test_activation_sees_derived_params() {
        let seen = Rc::new(RefCell::new(None));
        let mut state = ConfigState::new(FixedInspector);
        let sink = Rc::clone(&seen);
        state.on_block_signal(move |signal, params| {
            if signal == BlockSignal::Activate(ParamBlock::Jvm) {
                *sink.borrow_mut() = params.jvm.clone();
            }
        });
        state.set_output("out");
        state.set_format(Format::JavaRetrofit2);

        assert_eq!(seen.borrow().as_ref().unwrap().package_path, "pkg.out");
    }

    #[test]
    fn test_kotlin_does_not_derive() {
        let mut state = ConfigState::new(FixedInspector);
        state.set_output("out");
        state.set_format(Format::Kotlin);
        assert_eq!(state.additional_params().jvm, Some(JvmParams::default()));
    }

    #[test]
    fn test_output_handler_scoped_to_format() {
        let mut state = ConfigState::new(FixedInspector);
        state.on_directory_change(Format::JavaRetrofit2, rederive_jvm_params);

        state.set_format(Format::Kotlin);
        state.set_output("a");
        assert_eq!(state.additional_params().jvm, Some(JvmParams::default()));

        state.set_format(Format::JavaRetrofit2);
        state.set_output("b");
        assert_eq!(state.additional_params().jvm.as_ref().unwrap().package_path, "pkg.b");
    }

    #[test]
    fn test_output_without_handler_keeps_params() {
        let mut state = ConfigState::new(FixedInspector);
        state.set_format(Format::JavaRetrofit2);
        state.jvm_mut().unwrap().package_path = "com.manual".to_string();
        state.set_output("elsewhere");
        assert_eq!(
            state.additional_params().jvm.as_ref().unwrap().package_path,
            "com.manual"
        );
    }

    #[test]
    fn test_rederive_ignores_empty_output() {
        let mut params = AdditionalParams::default();
        rederive_jvm_params("", &FixedInspector, &mut params);
        assert!(params.jvm.is_none());
    }

    #[test]
    fn test_confirm_saves_snapshot() {
        let store = crate::history::MemoryStore::default();
        let mut state = ConfigState::new(FixedInspector);
        state.set_url("http://a");
        let data = state.confirm(&store).unwrap();
        assert_eq!(store.load().unwrap(), Some(data));
    }
}
