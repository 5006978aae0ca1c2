//! 构建期配置
//!
//! WASM 中没有进程环境变量，配置在编译时通过 `option_env!` 注入，
//! 解析规则与默认值由核心库的 `ClientConfig::from_lookup` 统一处理。

use sukari::config::{ENV_API_URL, ENV_DEFAULT_LANGUAGE, ENV_REQUEST_TIMEOUT_MS};
use sukari::ClientConfig;

pub fn client_config() -> ClientConfig {
    ClientConfig::from_lookup(|key| {
        let value = match key {
            ENV_API_URL => option_env!("SUKARI_API_URL"),
            ENV_REQUEST_TIMEOUT_MS => option_env!("SUKARI_REQUEST_TIMEOUT_MS"),
            ENV_DEFAULT_LANGUAGE => option_env!("SUKARI_DEFAULT_LANGUAGE"),
            _ => None,
        };
        value.map(String::from)
    })
}
