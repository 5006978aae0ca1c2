use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::Route;
use sukari::auth::{MSG_RESET_FAILED, request_password_reset};
use sukari::validate::ForgotPasswordForm;

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, FieldHint, FormStatus, Notice, SubmitButton};
use crate::web::router::Link;

const MSG_RESET_SENT: &str = "If that email is registered, a reset link is on its way.";

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let auth = use_auth();
    let form = RwSignal::new(ForgotPasswordForm::default());
    let status = FormStatus::new();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !status.begin() {
            return;
        }
        let api = auth.api();
        let input = form.get_untracked();
        spawn_local(async move {
            match request_password_reset(&api, &input).await {
                Ok(resp) => {
                    let message = resp
                        .message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| MSG_RESET_SENT.to_string());
                    status.succeed(Some(message));
                }
                Err(e) => status.fail(&e, MSG_RESET_FAILED),
            }
        });
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Reset your password"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=status.error />
                        <Notice message=status.notice />
                        <div class="form-control">
                            <label class="label" for="email"><span class="label-text">"Email"</span></label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.email.clone())
                                class="input input-bordered"
                            />
                            <FieldHint message=status.field("email") />
                        </div>
                        <div class="form-control mt-6">
                            <SubmitButton busy=status.busy label="Send reset link" busy_label="Sending..." />
                        </div>
                        <Link to=Route::Login class="link link-hover text-sm">"Back to login"</Link>
                    </form>
                </div>
            </div>
        </div>
    }
}
