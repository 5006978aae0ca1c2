//! 页面共用的小组件与表单状态

use leptos::prelude::*;
use sukari::ClientError;
use sukari::validate::FieldErrors;

/// 表单提交状态：忙碌标记、顶部错误与逐字段错误
#[derive(Clone, Copy)]
pub struct FormStatus {
    pub busy: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub notice: RwSignal<Option<String>>,
    fields: RwSignal<FieldErrors>,
}

impl FormStatus {
    pub fn new() -> Self {
        Self {
            busy: RwSignal::new(false),
            error: RwSignal::new(None),
            notice: RwSignal::new(None),
            fields: RwSignal::new(FieldErrors::default()),
        }
    }

    /// 开始提交；已在提交中时返回 false
    pub fn begin(&self) -> bool {
        if self.busy.get_untracked() {
            return false;
        }
        self.busy.set(true);
        self.error.set(None);
        self.notice.set(None);
        self.fields.set(FieldErrors::default());
        true
    }

    pub fn succeed(&self, notice: Option<String>) {
        self.busy.set(false);
        self.notice.set(notice);
    }

    /// 校验错误显示在字段下方，其余错误显示在顶部
    pub fn fail(&self, err: &ClientError, fallback: &str) {
        self.busy.set(false);
        match err.field_errors() {
            Some(fields) => self.fields.set(fields.clone()),
            None => self.error.set(Some(err.user_message(fallback))),
        }
        log::warn!("{}", err);
    }

    pub fn field(&self, name: &'static str) -> Signal<Option<String>> {
        let fields = self.fields;
        Signal::derive(move || fields.with(|f| f.get(name).map(str::to_string)))
    }
}

impl Default for FormStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn Notice(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="status" class="alert alert-success text-sm py-2">
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

#[component]
pub fn FieldHint(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <span class="label-text-alt text-error">{move || message.get().unwrap_or_default()}</span>
        </Show>
    }
}

#[component]
pub fn Loading(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center gap-2 py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
            {label.map(|l| view! { <span class="text-base-content/70">{l}</span> })}
        </div>
    }
}

/// 提交按钮，忙碌时显示转圈
#[component]
pub fn SubmitButton(
    busy: RwSignal<bool>,
    #[prop(into)] label: String,
    #[prop(into)] busy_label: String,
) -> impl IntoView {
    view! {
        <button type="submit" class="btn btn-primary" disabled=move || busy.get()>
            {move || if busy.get() {
                view! { <span class="loading loading-spinner"></span> {busy_label.clone()} }.into_any()
            } else {
                label.clone().into_any()
            }}
        </button>
    }
}

/// 页面外壳：标题 + 内容容器
#[component]
pub fn Page(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <div class="container mx-auto max-w-4xl p-4 space-y-6">
            <h1 class="text-2xl font-bold">{title}</h1>
            {children()}
        </div>
    }
}

/// 当前本地日期与时间，作为表单默认值
pub fn today() -> String {
    chrono::Local::now().format(sukari_shared::DATE_FORMAT).to_string()
}

pub fn now_clock() -> String {
    chrono::Local::now().format(sukari_shared::TIME_FORMAT).to_string()
}
