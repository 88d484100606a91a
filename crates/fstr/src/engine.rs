//! The rendering engine: parse cache, registry and color policy bundled
//! behind one `render` call.
//!
//! Most programs use the process-wide engine through the crate-level
//! functions and macros. Build an [`Engine`] directly to isolate the cache,
//! use a private [`Registry`], or pin the color policy.
//!
//! ```rust
//! use fstr::{args, ColorChoice, Engine};
//!
//! let engine = Engine::builder()
//!     .cache_capacity(64)
//!     .colors(ColorChoice::Never)
//!     .build();
//!
//! assert_eq!(engine.render("{:>5}|{name|red}", &args!(42, name = "ok")), "   42|ok");
//! ```

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::cache::ParseCache;
use crate::env;
use crate::error::{RenderError, Result};
use crate::parse::Template;
use crate::registry::{global_registry, Registry};
use crate::render::Renderer;
use crate::resolve::Args;
use crate::validate::validate;

/// When to emit ANSI color codes for `|color` tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color unless `NO_COLOR` is set to a non-empty value.
    #[default]
    Auto,
    /// Always emit color codes.
    Always,
    /// Never emit color codes; color tags are ignored.
    Never,
}

impl ColorChoice {
    /// Resolves the choice to a concrete on/off decision.
    pub fn should_use_color(self) -> bool {
        match self {
            ColorChoice::Auto => !env::no_color(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of cached templates; 0 disables the cache.
    pub cache_capacity: usize,
    pub colors: ColorChoice,
    /// Expand `$VAR` / `${VAR}` in the rendered output.
    pub expand_env: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: ParseCache::DEFAULT_CAPACITY,
            colors: ColorChoice::Auto,
            expand_env: false,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `FSTR_CACHE_CAPACITY`, `FSTR_EXPAND_ENV` and
    /// `NO_COLOR`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(env::CACHE_CAPACITY) {
            match raw.trim().parse() {
                Ok(capacity) => config.cache_capacity = capacity,
                Err(err) => tracing::debug!(
                    var = env::CACHE_CAPACITY,
                    value = %raw,
                    error = %err,
                    "ignoring invalid cache capacity"
                ),
            }
        }
        if let Some(expand) = env::flag(env::EXPAND_ENV) {
            config.expand_env = expand;
        }
        if env::no_color() {
            config.colors = ColorChoice::Never;
        }
        config
    }
}

/// Builder for [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    registry: Option<Arc<Registry>>,
}

impl EngineBuilder {
    /// Starts from an existing configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn colors(mut self, colors: ColorChoice) -> Self {
        self.config.colors = colors;
        self
    }

    pub fn expand_env(mut self, expand: bool) -> Self {
        self.config.expand_env = expand;
        self
    }

    /// Uses a private registry instead of the global one.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Engine {
        let colors = self.config.colors.should_use_color();
        Engine {
            cache: ParseCache::new(self.config.cache_capacity),
            registry: self
                .registry
                .unwrap_or_else(|| Arc::clone(global_registry())),
            colors,
            config: self.config,
        }
    }
}

/// A configured renderer. Cheap to share across threads.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    colors: bool,
    cache: ParseCache,
    registry: Arc<Registry>,
}

impl Engine {
    /// An engine with default settings and the global registry.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Renders `format` with `args`. Never fails: missing values and fields
    /// render as sentinels and malformed braces render literally.
    pub fn render(&self, format: &str, args: &Args) -> String {
        let rendered = self.renderer().render(format, args);
        if self.config.expand_env {
            env::expand_env(&rendered).into_owned()
        } else {
            rendered
        }
    }

    /// Renders an already parsed template.
    pub fn render_template(&self, template: &Template, args: &Args) -> String {
        let rendered = self.renderer().render_template(template, args);
        if self.config.expand_env {
            env::expand_env(&rendered).into_owned()
        } else {
            rendered
        }
    }

    /// Validates `format`, then renders it, catching panics raised by custom
    /// formatters and verbs.
    pub fn try_render(&self, format: &str, args: &Args) -> Result<String> {
        validate(format)?;
        panic::catch_unwind(AssertUnwindSafe(|| self.render(format, args))).map_err(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::warn!(format, panic = %message, "formatter panicked during render");
            RenderError::FormatterPanic(message)
        })
    }

    /// Like [`Engine::render`], but a panicking formatter yields
    /// `<format error: ...>` instead of unwinding. Format strings are not
    /// validated; malformed braces still render literally.
    pub fn render_safe(&self, format: &str, args: &Args) -> String {
        panic::catch_unwind(AssertUnwindSafe(|| self.render(format, args))).unwrap_or_else(
            |payload| {
                let message = panic_message(payload.as_ref());
                tracing::warn!(format, panic = %message, "formatter panicked during render");
                format!("<format error: {}>", message)
            },
        )
    }

    /// Renders into a writer. Only the writer's errors are reported.
    pub fn write_render<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        format: &str,
        args: &Args,
    ) -> io::Result<()> {
        writer.write_all(self.render(format, args).as_bytes())
    }

    /// Renders into a writer followed by a newline.
    pub fn writeln_render<W: Write + ?Sized>(
        &self,
        writer: &mut W,
        format: &str,
        args: &Args,
    ) -> io::Result<()> {
        let mut rendered = self.render(format, args);
        rendered.push('\n');
        writer.write_all(rendered.as_bytes())
    }

    /// Parses `format` through this engine's cache.
    pub fn parse(&self, format: &str) -> Arc<Template> {
        self.cache.get_or_parse(format)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether color tags produce escape codes, resolved at build time.
    pub fn colors_enabled(&self) -> bool {
        self.colors
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.registry, &self.cache, self.colors)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

static GLOBAL_ENGINE: Lazy<Engine> = Lazy::new(|| Engine::with_config(EngineConfig::from_env()));

/// The process-wide engine behind the crate-level functions. Configured from
/// the environment on first use.
pub fn global_engine() -> &'static Engine {
    &GLOBAL_ENGINE
}
