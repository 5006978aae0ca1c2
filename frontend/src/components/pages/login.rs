use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::Route;
use sukari::auth::{MSG_LOGIN_FAILED, authenticate};
use sukari::validate::LoginForm;

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, FieldHint, FormStatus, SubmitButton};
use crate::onboarding::use_progress;
use crate::web::router::Link;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let progress = use_progress();
    let form = RwSignal::new(LoginForm::default());
    let status = FormStatus::new();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !status.begin() {
            return;
        }
        let api = auth.api();
        let input = form.get_untracked();
        spawn_local(async move {
            match authenticate(&api, &input).await {
                Ok(resp) => {
                    status.succeed(None);
                    // 登录后路由服务自动重定向到面板
                    auth.login(resp);
                    progress.invalidate();
                }
                Err(e) => status.fail(&e, MSG_LOGIN_FAILED),
            }
        });
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Welcome back"</h1>
                    <p class="text-base-content/70">"Log in to continue managing your diabetes"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=status.error />

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.email.clone())
                                class="input input-bordered"
                            />
                            <FieldHint message=status.field("email") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.password.clone())
                                class="input input-bordered"
                            />
                            <FieldHint message=status.field("password") />
                        </div>
                        <div class="form-control mt-6">
                            <SubmitButton busy=status.busy label="Log in" busy_label="Logging in..." />
                        </div>
                        <div class="flex justify-between text-sm mt-2">
                            <Link to=Route::ForgotPassword class="link link-hover">"Forgot password?"</Link>
                            <Link to=Route::Signup class="link link-primary">"Create an account"</Link>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
