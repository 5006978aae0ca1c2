//! 浏览器控制台日志
//!
//! 把 `log` 门面的记录转发到 `console.*`，核心库与前端共用同一套宏。

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// 构建时通过 `SUKARI_LOG` 指定级别，默认 info
fn build_level() -> LevelFilter {
    option_env!("SUKARI_LOG")
        .and_then(|s| s.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// 安装全局 logger；重复调用无副作用
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(build_level());
    }
}
