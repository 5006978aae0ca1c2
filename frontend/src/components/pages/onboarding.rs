//! 引导向导页
//!
//! 步骤状态放在信号里，写操作拆成"开始 → 请求 → 结束"三段，
//! 请求期间不持有向导状态。

use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::validate::{MedicationForm, ProfileForm, ReadingForm};
use sukari::wizard::actions::{
    MSG_MEDICATION_FAILED, MSG_PROFILE_FAILED, MSG_READING_FAILED, add_medication,
    log_first_reading, save_profile,
};
use sukari::wizard::{OnboardingWizard, WizardEntry, WizardStep};
use sukari::{ClientResult, Route};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, Page, now_clock, today};
use crate::onboarding::use_progress;
use crate::web::router::use_router;

#[component]
pub fn OnboardingPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let progress = use_progress();

    let entry = auth
        .read(OnboardingWizard::enter)
        .unwrap_or(WizardEntry::Start(OnboardingWizard::new()));
    let (wizard, redirect) = match entry {
        WizardEntry::Start(w) => (RwSignal::new(w), None),
        WizardEntry::Redirect(target) => (RwSignal::new(OnboardingWizard::new()), Some(target)),
    };
    Effect::new(move |_| {
        if let Some(target) = redirect {
            router.redirect(target);
        }
    });

    let profile = RwSignal::new(
        auth.state
            .with_untracked(|s| ProfileForm::from_user(s.session.user.as_ref())),
    );
    let reading = RwSignal::new(ReadingForm {
        date: today(),
        time: now_clock(),
        ..Default::default()
    });
    let medication = RwSignal::new(MedicationForm::default());

    let step = Memo::new(move |_| wizard.with(|w| w.step()));
    let busy = Memo::new(move |_| wizard.with(|w| w.is_busy()));
    let error = Signal::derive(move || wizard.with(|w| w.error().map(str::to_string)));

    // 结束一次写操作：成功前进，失败留在本步骤
    let finish = move |result: ClientResult<()>, fallback: &'static str| {
        let result = result.map_err(|e| e.user_message(fallback));
        wizard.update(|w| w.finish_action(result));
    };

    let submit = move |_: leptos::ev::MouseEvent| {
        let Some(token) = auth.token() else {
            return;
        };
        let current = step.get_untracked();
        if !wizard.try_update(|w| w.begin_action()).unwrap_or(false) {
            return;
        }
        let api = auth.api();
        match current {
            WizardStep::Profile => {
                let form = profile.get_untracked();
                spawn_local(async move {
                    let result = save_profile(&api, &token, &form).await.map(|saved| {
                        auth.apply_profile(saved.profile);
                    });
                    finish(result, MSG_PROFILE_FAILED);
                });
            }
            WizardStep::GlucoseReading => {
                let form = reading.get_untracked();
                spawn_local(async move {
                    let result = log_first_reading(&api, &token, &form, || progress.invalidate())
                        .await
                        .map(|_| ());
                    finish(result, MSG_READING_FAILED);
                });
            }
            WizardStep::Medication => {
                let form = medication.get_untracked();
                spawn_local(async move {
                    let result = add_medication(&api, &token, &form).await.map(|_| ());
                    finish(result, MSG_MEDICATION_FAILED);
                });
            }
            _ => {}
        }
    };

    let complete = move |_: leptos::ev::MouseEvent| {
        let mut w = wizard.get_untracked();
        let target = auth.mutate(|m| w.complete(m)).flatten();
        wizard.set(w);
        if let Some(target) = target {
            router.navigate_to(target);
        }
    };

    view! {
        <Page title="Getting started">
            <ul class="steps w-full">
                {WizardStep::ALL
                    .iter()
                    .map(|s| {
                        let s = *s;
                        view! {
                            <li class=move || {
                                if step.get().index() >= s.index() { "step step-primary" } else { "step" }
                            }>{s.title()}</li>
                        }
                    })
                    .collect_view()}
            </ul>

            <div class="card bg-base-100 shadow">
                <div class="card-body space-y-4">
                    <h2 class="card-title">{move || step.get().title()}</h2>
                    <ErrorAlert message=error />

                    {move || match step.get() {
                        WizardStep::Welcome => view! {
                            <p>"We'll set up your health profile, log a first reading and add your medication. It takes about two minutes."</p>
                        }.into_any(),
                        WizardStep::Profile => view! {
                            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                <input
                                    type="number"
                                    placeholder="Height (cm)"
                                    class="input input-bordered"
                                    on:input=move |ev| profile.update(|f| f.height_cm = event_target_value(&ev))
                                    prop:value=move || profile.with(|f| f.height_cm.clone())
                                />
                                <input
                                    type="number"
                                    placeholder="Weight (kg)"
                                    class="input input-bordered"
                                    on:input=move |ev| profile.update(|f| f.weight_kg = event_target_value(&ev))
                                    prop:value=move || profile.with(|f| f.weight_kg.clone())
                                />
                            </div>
                        }.into_any(),
                        WizardStep::GlucoseReading => view! {
                            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                                <input
                                    type="number"
                                    placeholder="mg/dL"
                                    class="input input-bordered"
                                    on:input=move |ev| reading.update(|f| f.value = event_target_value(&ev))
                                    prop:value=move || reading.with(|f| f.value.clone())
                                />
                                <input
                                    type="date"
                                    class="input input-bordered"
                                    on:input=move |ev| reading.update(|f| f.date = event_target_value(&ev))
                                    prop:value=move || reading.with(|f| f.date.clone())
                                />
                                <input
                                    type="time"
                                    class="input input-bordered"
                                    on:input=move |ev| reading.update(|f| f.time = event_target_value(&ev))
                                    prop:value=move || reading.with(|f| f.time.clone())
                                />
                            </div>
                            <p class="text-sm text-base-content/70">"We'll also remind you daily at this time."</p>
                        }.into_any(),
                        WizardStep::Medication => view! {
                            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                                <input
                                    type="text"
                                    placeholder="Name"
                                    class="input input-bordered"
                                    on:input=move |ev| medication.update(|f| f.name = event_target_value(&ev))
                                    prop:value=move || medication.with(|f| f.name.clone())
                                />
                                <input
                                    type="text"
                                    placeholder="Dose"
                                    class="input input-bordered"
                                    on:input=move |ev| medication.update(|f| f.dose = event_target_value(&ev))
                                    prop:value=move || medication.with(|f| f.dose.clone())
                                />
                                <input
                                    type="time"
                                    class="input input-bordered"
                                    on:input=move |ev| medication.update(|f| f.time = event_target_value(&ev))
                                    prop:value=move || medication.with(|f| f.time.clone())
                                />
                            </div>
                        }.into_any(),
                        WizardStep::Alerts => view! {
                            <p>"Smart alerts watch your readings for patterns and tell you when something needs attention."</p>
                            <button class="btn btn-outline btn-sm w-fit" on:click=move |_| router.navigate_to(Route::SmartAlerts)>
                                "Go to Alerts"
                            </button>
                        }.into_any(),
                        WizardStep::Done => view! {
                            <p>"You're all set. Your dashboard is ready."</p>
                        }.into_any(),
                    }}

                    <div class="card-actions justify-between">
                        <button
                            class="btn btn-ghost"
                            disabled=move || busy.get() || step.get() == WizardStep::Welcome
                            on:click=move |_| wizard.update(|w| w.back())
                        >
                            "Back"
                        </button>
                        <div class="flex gap-2">
                            <Show when=move || step.get().is_skippable()>
                                <button class="btn btn-ghost" disabled=move || busy.get() on:click=move |_| wizard.update(|w| w.skip())>
                                    "Later"
                                </button>
                            </Show>
                            {move || {
                                let current = step.get();
                                if current == WizardStep::Done {
                                    view! { <button class="btn btn-primary" on:click=complete>"Go to dashboard"</button> }.into_any()
                                } else if current.has_action() {
                                    view! {
                                        <button class="btn btn-primary" disabled=move || busy.get() on:click=submit>
                                            {move || if busy.get() { "Saving..." } else { "Save and continue" }}
                                        </button>
                                    }.into_any()
                                } else {
                                    view! { <button class="btn btn-primary" on:click=move |_| wizard.update(|w| w.proceed())>"Continue"</button> }.into_any()
                                }
                            }}
                        </div>
                    </div>
                </div>
            </div>
        </Page>
    }
}
