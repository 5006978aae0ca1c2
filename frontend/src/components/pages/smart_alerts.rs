use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::Route;
use sukari_shared::insights::{FoodImpactPrediction, GlucoseAlerts};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, FormStatus, Loading, Page, SubmitButton};
use crate::web::router::Link;

fn severity_class(severity: &str) -> &'static str {
    match severity {
        "high" | "critical" => "alert alert-error",
        "medium" => "alert alert-warning",
        _ => "alert alert-info",
    }
}

#[component]
pub fn SmartAlertsPage() -> impl IntoView {
    let auth = use_auth();
    let alerts = RwSignal::new(None::<GlucoseAlerts>);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let food = RwSignal::new(String::new());
    let prediction = RwSignal::new(None::<FoodImpactPrediction>);
    let status = FormStatus::new();

    Effect::new(move |_| {
        let lang = auth.language();
        let Some(token) = auth.token() else {
            return;
        };
        let api = auth.api();
        loading.set(true);
        spawn_local(async move {
            match api.glucose_alerts(&token, lang).await {
                Ok(data) => {
                    alerts.set(Some(data));
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Failed to load alerts"))),
            }
            loading.set(false);
        });
    });

    let on_predict = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name = food.get_untracked().trim().to_string();
        let Some(token) = auth.token() else {
            return;
        };
        if name.is_empty() || !status.begin() {
            return;
        }
        let api = auth.api();
        let lang = auth.language_untracked();
        spawn_local(async move {
            match api.food_impact(&token, &name, lang).await {
                Ok(impact) => {
                    prediction.set(impact.prediction);
                    status.succeed(None);
                }
                Err(e) => status.fail(&e, "Prediction failed"),
            }
        });
    };

    view! {
        <Page title="Smart alerts">
            <ErrorAlert message=error />
            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Analysing your readings..." /> }>
                {move || alerts.get().map(|data| {
                    let lang = auth.language();
                    view! {
                        {data.patterns_summary.map(|p| view! {
                            <div class="stats shadow w-full">
                                <div class="stat">
                                    <div class="stat-title">"Readings"</div>
                                    <div class="stat-value">{p.total_readings}</div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"High"</div>
                                    <div class="stat-value text-error">{p.high_readings}</div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"Low"</div>
                                    <div class="stat-value text-warning">{p.low_readings}</div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"Trend"</div>
                                    <div class="stat-value text-base">{p.recent_trend}</div>
                                </div>
                            </div>
                        })}
                        {data.message.map(|m| view! { <p class="text-base-content/70">{m}</p> })}
                        <div class="space-y-2">
                            {data.alerts.into_iter().map(|a| view! {
                                <div role="alert" class=severity_class(&a.severity)>
                                    <div>
                                        <h3 class="font-bold">{a.title.pick(lang.code()).to_string()}</h3>
                                        <p>{a.message.pick(lang.code()).to_string()}</p>
                                        <ul class="list-disc list-inside text-sm">
                                            {a.recommendations.into_iter().map(|r| view! { <li>{r}</li> }).collect_view()}
                                        </ul>
                                    </div>
                                </div>
                            }).collect_view()}
                        </div>
                    }
                })}
            </Show>

            <div class="card bg-base-100 shadow">
                <form class="card-body" on:submit=on_predict>
                    <h2 class="card-title">"How will this food affect me?"</h2>
                    <ErrorAlert message=status.error />
                    <div class="join w-full">
                        <input
                            type="text"
                            placeholder="e.g. ugali"
                            class="input input-bordered join-item w-full"
                            on:input=move |ev| food.set(event_target_value(&ev))
                            prop:value=food
                        />
                        <SubmitButton busy=status.busy label="Predict" busy_label="Predicting..." />
                    </div>
                    {move || prediction.get().map(|p| view! {
                        <div class="alert mt-2">
                            <div>
                                <div class="font-semibold">
                                    {format!("{}: {} impact, about +{:.0} mg/dL", p.food, p.glucose_impact, p.estimated_spike)}
                                </div>
                                <ul class="list-disc list-inside text-sm">
                                    {p.recommendations.into_iter().map(|r| view! { <li>{r}</li> }).collect_view()}
                                </ul>
                            </div>
                        </div>
                    })}
                </form>
            </div>

            <div class="flex gap-2">
                <Link to=Route::Readings class="btn btn-outline btn-sm">"Log a reading"</Link>
                <Link to=Route::FoodInsights class="btn btn-outline btn-sm">"Food insights"</Link>
            </div>
        </Page>
    }
}
