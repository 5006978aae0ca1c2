use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::validate::ProfileForm;
use sukari::wizard::actions::{MSG_PROFILE_FAILED, save_profile_details};
use sukari_shared::{Bmi, DIABETES_TYPES, Doctor};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, FieldHint, FormStatus, Notice, Page, SubmitButton};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let form = RwSignal::new(auth.state.with_untracked(|s| ProfileForm::from_user(s.session.user.as_ref())));
    let status = FormStatus::new();
    let doctors = RwSignal::new(Vec::<Doctor>::new());
    let bmi = RwSignal::new(None::<Bmi>);

    // 医生列表是公开接口，失败时下拉框为空
    {
        let api = auth.api();
        spawn_local(async move {
            match api.doctors().await {
                Ok(list) => doctors.set(list),
                Err(e) => log::warn!("[Profile] doctors unavailable: {}", e),
            }
        });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(token) = auth.token() else {
            return;
        };
        if !status.begin() {
            return;
        }
        let api = auth.api();
        let input = form.get_untracked();
        spawn_local(async move {
            match save_profile_details(&api, &token, &input).await {
                Ok(saved) => {
                    auth.apply_profile(saved.profile);
                    bmi.set(saved.bmi);
                    status.succeed(Some("Saved!".to_string()));
                }
                Err(e) => status.fail(&e, MSG_PROFILE_FAILED),
            }
        });
    };

    let user_name = move || auth.state.with(|s| s.session.user.as_ref().map(|u| u.name.clone()).unwrap_or_default());

    view! {
        <Page title="Your profile">
            <p class="text-base-content/70">
                {move || format!("Hi {}, height and weight let us tailor your plan.", user_name())}
            </p>
            <div class="card bg-base-100 shadow">
                <form class="card-body" on:submit=on_submit>
                    <ErrorAlert message=status.error />
                    <Notice message=status.notice />

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="diabetes_type"><span class="label-text">"Diabetes type"</span></label>
                            <select
                                id="diabetes_type"
                                class="select select-bordered"
                                on:change=move |ev| form.update(|f| f.diabetes_type = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.diabetes_type.clone())
                            >
                                <option value="">"Not set"</option>
                                {DIABETES_TYPES
                                    .iter()
                                    .map(|t| view! { <option value=*t>{*t}</option> })
                                    .collect_view()}
                            </select>
                            <FieldHint message=status.field("diabetes_type") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="doctor_id"><span class="label-text">"Doctor"</span></label>
                            <select
                                id="doctor_id"
                                class="select select-bordered"
                                on:change=move |ev| form.update(|f| f.doctor_id = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.doctor_id.clone())
                            >
                                <option value="">"None"</option>
                                {move || doctors
                                    .get()
                                    .into_iter()
                                    .map(|d| view! { <option value=d.id.to_string()>{d.name}</option> })
                                    .collect_view()}
                            </select>
                            <FieldHint message=status.field("doctor_id") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="height_cm"><span class="label-text">"Height (cm)"</span></label>
                            <input
                                id="height_cm"
                                type="number"
                                step="0.1"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.height_cm = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.height_cm.clone())
                            />
                            <FieldHint message=status.field("height_cm") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="weight_kg"><span class="label-text">"Weight (kg)"</span></label>
                            <input
                                id="weight_kg"
                                type="number"
                                step="0.1"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.weight_kg = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.weight_kg.clone())
                            />
                            <FieldHint message=status.field("weight_kg") />
                        </div>
                    </div>

                    <div class="card-actions justify-end mt-4">
                        <SubmitButton busy=status.busy label="Save" busy_label="Saving..." />
                    </div>
                </form>
            </div>

            {move || bmi.get().map(|b| view! {
                <div class="stats shadow">
                    <div class="stat">
                        <div class="stat-title">"BMI"</div>
                        <div class="stat-value">{format!("{:.1}", b.bmi)}</div>
                        <div class="stat-desc">{b.category}</div>
                    </div>
                </div>
            })}

            <AdviceCard />
        </Page>
    }
}

/// 服务端按档案生成的建议
#[component]
pub fn AdviceCard() -> impl IntoView {
    let auth = use_auth();
    let advice = move || auth.state.with(|s| s.session.advice.clone());

    let section = |title: &'static str, items: Vec<String>| {
        (!items.is_empty()).then(|| view! {
            <div>
                <h3 class="font-semibold">{title}</h3>
                <ul class="list-disc list-inside">
                    {items.into_iter().map(|i| view! { <li>{i}</li> }).collect_view()}
                </ul>
            </div>
        })
    };

    view! {
        <Show when=move || !advice().is_empty()>
            <div class="card bg-base-100 shadow">
                <div class="card-body space-y-3">
                    <h2 class="card-title">"Personal advice"</h2>
                    {move || {
                        let a = advice();
                        view! {
                            {section("Nutrition", a.nutrition)}
                            {section("Exercise", a.exercise)}
                            {section("Medication", a.medication)}
                        }
                    }}
                </div>
            </div>
        </Show>
    }
}
