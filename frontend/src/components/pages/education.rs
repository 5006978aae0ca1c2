use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::Route;
use sukari_shared::insights::EducationalInsights;

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, Loading, Page};
use crate::web::router::use_router;

#[component]
pub fn EducationPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let insights = RwSignal::new(None::<EducationalInsights>);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);

    // 语言切换时重新加载
    Effect::new(move |_| {
        let lang = auth.language();
        let Some(token) = auth.token() else {
            return;
        };
        let api = auth.api();
        loading.set(true);
        spawn_local(async move {
            match api.educational_insights(&token, lang).await {
                Ok(data) => {
                    insights.set(Some(data));
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Failed to load insights"))),
            }
            loading.set(false);
        });
    });

    // 预取面板数据，失败忽略
    if let Some(token) = auth.token() {
        let api = auth.api();
        spawn_local(async move {
            if let Err(e) = api.dashboard(&token).await {
                log::debug!("[Education] dashboard prefetch failed: {}", e);
            }
        });
    }

    let finish = move |_: leptos::ev::MouseEvent| {
        auth.mark_education_done();
        router.navigate_to(Route::Dashboard);
    };

    let education = move || auth.state.with(|s| s.session.education.clone());

    view! {
        <Page title="Learn the basics">
            <Show when=move || !education().is_empty()>
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">"For you"</h2>
                        <ul class="list-disc list-inside space-y-1">
                            {move || education().into_iter().map(|tip| view! { <li>{tip}</li> }).collect_view()}
                        </ul>
                    </div>
                </div>
            </Show>

            <ErrorAlert message=error />
            <Show when=move || !loading.get() fallback=|| view! { <Loading label="Loading insights..." /> }>
                {move || insights.get().map(|data| view! {
                    {data.summary.map(|s| view! { <p class="text-base-content/80">{s}</p> })}
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        {data.insights.into_iter().map(|tip| {
                            let badge = if tip.priority == "high" { "badge badge-error" } else { "badge badge-ghost" };
                            view! {
                                <div class="card bg-base-100 shadow-sm">
                                    <div class="card-body">
                                        <h3 class="card-title text-base">{tip.title}</h3>
                                        <p>{tip.content}</p>
                                        <div class="flex gap-2">
                                            <span class="badge badge-outline">{tip.category}</span>
                                            <span class=badge>{tip.priority}</span>
                                        </div>
                                    </div>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                })}
            </Show>

            <div class="flex justify-end gap-2">
                <button class="btn btn-ghost" on:click=finish>"Skip for now"</button>
                <button class="btn btn-primary" on:click=finish>"I've finished, go to my dashboard"</button>
            </div>
        </Page>
    }
}
