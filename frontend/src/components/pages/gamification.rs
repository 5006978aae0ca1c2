use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari_shared::insights::{Badge, UserProgress};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, Loading, Page};

#[component]
pub fn GamificationPage() -> impl IntoView {
    let auth = use_auth();
    let data = RwSignal::new(None::<UserProgress>);
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        let lang = auth.language();
        let Some(token) = auth.token() else {
            return;
        };
        let api = auth.api();
        spawn_local(async move {
            match api.user_progress(&token, lang).await {
                Ok(progress) => {
                    data.set(Some(progress));
                    error.set(None);
                }
                Err(e) => error.set(Some(e.user_message("Failed to load progress"))),
            }
        });
    });

    let badge_card = move |badge: Badge| {
        let lang = auth.language_untracked();
        let class = if badge.earned {
            "card bg-primary/10 shadow-sm"
        } else {
            "card bg-base-100 shadow-sm opacity-60"
        };
        view! {
            <div class=class>
                <div class="card-body items-center text-center p-4">
                    <div class="text-3xl">{badge.icon.unwrap_or_default()}</div>
                    <div class="font-semibold">{badge.name.pick(lang.code()).to_string()}</div>
                    <div class="text-xs">{badge.description.pick(lang.code()).to_string()}</div>
                    <div class="badge badge-outline">{format!("{} pts", badge.points)}</div>
                </div>
            </div>
        }
    };

    view! {
        <Page title="Your progress">
            <ErrorAlert message=error />
            <Show
                when=move || data.with(Option::is_some) || error.with(Option::is_some)
                fallback=|| view! { <Loading /> }
            >
                {move || data.get().map(|p| {
                    let lang = auth.language();
                    let stats = p.progress;
                    view! {
                        <div class="stats stats-vertical md:stats-horizontal shadow w-full">
                            <div class="stat">
                                <div class="stat-title">"Level"</div>
                                <div class="stat-value">{stats.level.level}</div>
                                <div class="stat-desc">{stats.level.title.pick(lang.code()).to_string()}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Streak"</div>
                                <div class="stat-value">{format!("{} days", stats.current_streak)}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"This week"</div>
                                <div class="stat-value">{stats.weekly_readings}</div>
                                <div class="stat-desc">{format!("{} readings total", stats.total_readings)}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Points"</div>
                                <div class="stat-value text-primary">{stats.total_points}</div>
                            </div>
                        </div>

                        <h2 class="text-lg font-semibold">"Daily challenges"</h2>
                        <div class="space-y-2">
                            {p.daily_challenges.into_iter().map(|c| {
                                let state = if c.status.completed {
                                    "badge badge-success".to_string()
                                } else {
                                    "badge badge-ghost".to_string()
                                };
                                let state_label = if c.status.completed {
                                    "done".to_string()
                                } else {
                                    format!("{} so far", c.status.progress)
                                };
                                view! {
                                    <div class="card bg-base-100 shadow-sm">
                                        <div class="card-body py-3">
                                            <div class="flex justify-between">
                                                <span class="font-semibold">{c.name.pick(lang.code()).to_string()}</span>
                                                <span class="badge">{format!("{} pts", c.points)}</span>
                                            </div>
                                            <p class="text-sm">{c.description.pick(lang.code()).to_string()}</p>
                                            <span class=state>{state_label}</span>
                                        </div>
                                    </div>
                                }
                            }).collect_view()}
                        </div>

                        <h2 class="text-lg font-semibold">"Badges"</h2>
                        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                            {p.badges
                                .into_iter()
                                .map(|mut b| {
                                    b.earned = true;
                                    badge_card(b)
                                })
                                .collect_view()}
                        </div>

                        <h2 class="text-lg font-semibold">"More to earn"</h2>
                        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                            {p.available_badges
                                .into_iter()
                                .filter(|b| !b.earned)
                                .map(badge_card)
                                .collect_view()}
                        </div>
                    }
                })}
            </Show>
        </Page>
    }
}
