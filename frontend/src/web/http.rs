//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`，
//! 超时通过 `gloo-timers` 与请求 future 竞速实现。

use std::time::Duration;

use futures::future::{Either, select};
use gloo_timers::future::TimeoutFuture;
use sukari::error::{ClientError, ClientResult};
use sukari::request::{HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy)]
pub struct BrowserHttpClient {
    timeout_ms: u32,
}

impl BrowserHttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout_ms: u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX),
        }
    }
}

/// 构建并发送一次 fetch，读取完整响应体
async fn fetch(req: HttpRequest) -> ClientResult<HttpResponse> {
    let headers = Headers::new()
        .map_err(|e| ClientError::network(format!("创建 Headers 失败: {:?}", e)))?;

    for (key, value) in &req.headers {
        headers
            .set(key, value)
            .map_err(|e| ClientError::network(format!("设置 Header 失败: {:?}", e)))?;
    }

    let opts = RequestInit::new();
    opts.set_method(req.method.as_str());
    opts.set_headers(&headers.into());

    if let Some(body) = &req.body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(&req.url, &opts)
        .map_err(|e| ClientError::network(format!("{:?}", e)))?;

    let window = web_sys::window().ok_or_else(|| ClientError::network("无法获取 window 对象"))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| ClientError::network(format!("{:?}", e)))?;

    let response: Response = resp_value
        .dyn_into()
        .map_err(|e| ClientError::decode(format!("Response 类型转换失败: {:?}", e)))?;

    let status = response.status();
    let promise = response
        .text()
        .map_err(|e| ClientError::decode(format!("{:?}", e)))?;
    let text = JsFuture::from(promise)
        .await
        .map_err(|e| ClientError::network(format!("{:?}", e)))?;
    let body = text
        .as_string()
        .ok_or_else(|| ClientError::decode("响应体无法转换为字符串"))?;

    Ok(HttpResponse { status, body })
}

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let op = format!("{} {}", req.method.as_str(), req.url);
        let request = Box::pin(fetch(req));
        let deadline = TimeoutFuture::new(self.timeout_ms);

        match select(request, deadline).await {
            Either::Left((result, _)) => result.map_err(|e| e.in_op_with("http.send", op)),
            Either::Right(((), _)) => {
                log::warn!("[Http] {} timed out after {}ms", op, self.timeout_ms);
                Err(ClientError::timeout(format!(
                    "no response within {}ms",
                    self.timeout_ms
                ))
                .in_op_with("http.send", op))
            }
        }
    }
}
