use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::Route;
use sukari::auth::{MSG_SIGNUP_FAILED, register};
use sukari::validate::SignupForm;
use sukari_shared::DIABETES_TYPES;

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, FieldHint, FormStatus, SubmitButton};
use crate::onboarding::use_progress;
use crate::web::router::{Link, use_router};

#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let progress = use_progress();
    let form = RwSignal::new(SignupForm::default());
    let status = FormStatus::new();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !status.begin() {
            return;
        }
        let api = auth.api();
        let input = form.get_untracked();
        spawn_local(async move {
            match register(&api, &input).await {
                Ok(resp) => {
                    status.succeed(None);
                    auth.signup(resp);
                    progress.invalidate();
                    // 新用户先走引导向导，跳过的步骤由面板守卫补上
                    router.navigate_to(Route::Onboarding);
                }
                Err(e) => status.fail(&e, MSG_SIGNUP_FAILED),
            }
        });
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create your account"</h1>
                    <p class="text-base-content/70">"A few details and we'll set up your plan"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=status.error />

                        <div class="form-control">
                            <label class="label" for="name"><span class="label-text">"Name"</span></label>
                            <input
                                id="name"
                                type="text"
                                on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.name.clone())
                                class="input input-bordered"
                            />
                            <FieldHint message=status.field("name") />
                        </div>
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
                        <div class="form-control">
                            <label class="label" for="password"><span class="label-text">"Password"</span></label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.password.clone())
                                class="input input-bordered"
                            />
                            <FieldHint message=status.field("password") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="diabetes_type"><span class="label-text">"Diabetes type"</span></label>
                            <select
                                id="diabetes_type"
                                class="select select-bordered"
                                on:change=move |ev| form.update(|f| f.diabetes_type = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.diabetes_type.clone())
                            >
                                <option value="">"Select (optional)"</option>
                                {DIABETES_TYPES
                                    .iter()
                                    .map(|t| view! { <option value=*t>{*t}</option> })
                                    .collect_view()}
                            </select>
                            <FieldHint message=status.field("diabetes_type") />
                        </div>
                        <div class="form-control mt-6">
                            <SubmitButton busy=status.busy label="Sign up" busy_label="Creating account..." />
                        </div>
                        <p class="text-sm mt-2">
                            "Already registered? "
                            <Link to=Route::Login class="link link-primary">"Log in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
