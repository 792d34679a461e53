//! Type-safe logging macros with key/value context
//!
//! Thin layer over the `log` facade. Context values accept any `Display`
//! type and are rendered after the message as `[key=value ...]`, so probe
//! diagnostics on stderr stay greppable. Stdout belongs to the plugin
//! protocol and is never written from here.
//!
//! ```
//! use vmprobe_base::log_info;
//!
//! log_info!("Inventory filtered", "vms" => 12, "datastores" => 3);
//! ```

#[doc(hidden)]
pub use log as __log;

/// Render a message followed by its context pairs
pub fn render_context(message: &str, context: &[(&str, String)]) -> String {
    if context.is_empty() {
        return message.to_string();
    }

    let pairs: Vec<String> = context
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();

    format!("{} [{}]", message, pairs.join(" "))
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_with_context {
    ($level:ident, $message:expr) => {
        $crate::logging::__log::$level!("{}", $message)
    };

    ($level:ident, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::__log::$level!(
                "{}",
                $crate::logging::render_context(&$message, &context_strings)
            )
        }
    };
}

/// Log at debug level with optional `"key" => value` context
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {
        $crate::__log_with_context!(debug, $($arg)+)
    };
}

/// Log at info level with optional `"key" => value` context
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {
        $crate::__log_with_context!(info, $($arg)+)
    };
}

/// Log at warn level with optional `"key" => value` context
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)+) => {
        $crate::__log_with_context!(warn, $($arg)+)
    };
}

/// Log at error level with optional `"key" => value` context
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {
        $crate::__log_with_context!(error, $($arg)+)
    };
}
