use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari_shared::insights::{FoodRecommendations, KenyanFoods};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, Loading, Page};

fn impact_badge(impact: &str) -> &'static str {
    match impact {
        "low" => "badge badge-success",
        "medium" => "badge badge-warning",
        "high" => "badge badge-error",
        _ => "badge badge-ghost",
    }
}

#[component]
pub fn FoodInsightsPage() -> impl IntoView {
    let auth = use_auth();
    let foods = RwSignal::new(None::<KenyanFoods>);
    let recommendations = RwSignal::new(None::<FoodRecommendations>);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let lang = auth.language();
        let token = auth.token();
        let api = auth.api();
        loading.set(true);
        spawn_local(async move {
            match api.kenyan_foods().await {
                Ok(data) => foods.set(Some(data)),
                Err(e) => error.set(Some(e.user_message("Failed to load foods"))),
            }
            if let Some(token) = token {
                match api.food_recommendations(&token, lang).await {
                    Ok(data) => recommendations.set(Some(data)),
                    Err(e) => log::warn!("[FoodInsights] recommendations unavailable: {}", e),
                }
            }
            loading.set(false);
        });
    });

    let list = |title: &'static str, items: Vec<String>| {
        view! {
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h3 class="card-title text-base">{title}</h3>
                    <ul class="list-disc list-inside">
                        {items.into_iter().map(|i| view! { <li>{i}</li> }).collect_view()}
                    </ul>
                </div>
            </div>
        }
    };

    view! {
        <Page title="Food insights">
            <ErrorAlert message=error />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                {move || recommendations.get().map(|r| view! {
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        {list("Recommended", r.recommendations)}
                        {list("Diabetes friendly", r.diabetes_friendly)}
                        {list("Limit these", r.foods_to_limit)}
                    </div>
                })}
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr><th>"Food"</th><th>"Carbs"</th><th>"Fiber"</th><th>"GI"</th><th>"Impact"</th></tr>
                        </thead>
                        <tbody>
                            {move || {
                                let lang = auth.language();
                                foods.get().map(|f| f.foods.into_values().map(|food| view! {
                                    <tr>
                                        <td>{food.display_name(lang.code()).to_string()}</td>
                                        <td>{food.carbs}</td>
                                        <td>{food.fiber}</td>
                                        <td>{food.glycemic_index.map(|g| g.to_string()).unwrap_or_default()}</td>
                                        <td><span class=impact_badge(&food.glucose_impact)>{food.glucose_impact.clone()}</span></td>
                                    </tr>
                                }).collect_view())
                            }}
                        </tbody>
                    </table>
                </div>
            </Show>
        </Page>
    }
}
