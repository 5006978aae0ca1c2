use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::Route;
use sukari_shared::reading::GlucoseStatus;
use sukari_shared::{Bmi, DashboardSummary};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, Loading, Page};
use crate::components::pages::profile::AdviceCard;
use crate::web::router::Link;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let summary = RwSignal::new(None::<DashboardSummary>);
    let bmi = RwSignal::new(None::<Bmi>);
    let error = RwSignal::new(None::<String>);

    if let Some(token) = auth.token() {
        let api = auth.api();
        spawn_local(async move {
            match api.dashboard(&token).await {
                Ok(data) => summary.set(Some(data)),
                Err(e) => error.set(Some(e.user_message("Failed to load dashboard"))),
            }
            // BMI 只是附加信息
            match api.bmi(&token).await {
                Ok(b) => bmi.set(Some(b)),
                Err(e) => log::debug!("[Dashboard] BMI unavailable: {}", e),
            }
        });
    }

    let education = move || auth.state.with(|s| s.session.education.clone());
    let name = move || auth.state.with(|s| s.session.user.as_ref().map(|u| u.name.clone()).unwrap_or_default());

    view! {
        <Page title="Dashboard">
            <p class="text-lg">{move || format!("Welcome, {}", name())}</p>
            <ErrorAlert message=error />

            <Show
                when=move || summary.with(Option::is_some) || error.with(Option::is_some)
                fallback=|| view! { <Loading /> }
            >
                {move || summary.get().map(|data| {
                    let latest = data.latest_reading.clone();
                    view! {
                        <div class="stats stats-vertical md:stats-horizontal shadow w-full">
                            <div class="stat">
                                <div class="stat-title">"Latest reading"</div>
                                {match latest {
                                    Some(r) => {
                                        let status = GlucoseStatus::evaluate(r.value, r.context.as_deref());
                                        view! {
                                            <div class="stat-value">{r.value}</div>
                                            <div class="stat-desc">{format!("{:?} · {} {}", status, r.date.unwrap_or_default(), r.time.unwrap_or_default())}</div>
                                        }.into_any()
                                    }
                                    None => view! { <div class="stat-value text-base-content/50">"–"</div> }.into_any(),
                                }}
                            </div>
                            <div class="stat">
                                <div class="stat-title">"BMI"</div>
                                <div class="stat-value">{move || bmi.get().map(|b| format!("{:.1}", b.bmi)).unwrap_or_else(|| "–".into())}</div>
                                <div class="stat-desc">{move || bmi.get().map(|b| b.category).unwrap_or_default()}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Medications"</div>
                                <div class="stat-value">{data.medications.len()}</div>
                            </div>
                        </div>

                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h2 class="card-title">"Recent readings"</h2>
                                <ul class="divide-y divide-base-200">
                                    {data.recent_readings.into_iter().map(|r| view! {
                                        <li class="py-2 flex justify-between">
                                            <span>{format!("{} {}", r.date.unwrap_or_default(), r.time.unwrap_or_default())}</span>
                                            <span class="font-semibold">{format!("{} mg/dL", r.value)}</span>
                                        </li>
                                    }).collect_view()}
                                </ul>
                                <div class="card-actions justify-end">
                                    <Link to=Route::Readings class="btn btn-sm btn-primary">"Add reading"</Link>
                                </div>
                            </div>
                        </div>
                    }
                })}
            </Show>

            <Show when=move || !education().is_empty()>
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">"Tips for you"</h2>
                        <ul class="list-disc list-inside">
                            {move || education().into_iter().map(|tip| view! { <li>{tip}</li> }).collect_view()}
                        </ul>
                    </div>
                </div>
            </Show>
            <AdviceCard />
        </Page>
    }
}
