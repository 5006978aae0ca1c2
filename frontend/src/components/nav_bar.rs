use leptos::prelude::*;
use sukari::nav::{NavInputs, NavLink, visible_links};
use sukari::{Requirements, Route};

use crate::auth::use_auth;
use crate::onboarding::{use_onboarding_progress, use_progress};
use crate::web::router::use_router;

/// 顶部导航栏
///
/// 链接随引导进度逐步出现，只负责显示，从不触发跳转。
#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let progress_ctx = use_progress();
    let progress = use_onboarding_progress(Requirements {
        reading: true,
        ..Requirements::NONE
    });

    let links = Memo::new(move |_| {
        let is_authed = auth.state.with(|s| s.is_authenticated());
        visible_links(NavInputs::new(is_authed, &progress.get()))
    });

    let on_logout = move || {
        auth.logout();
        progress_ctx.invalidate();
    };

    view! {
        <nav class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1">
                <a
                    href="/"
                    class="btn btn-ghost text-xl text-primary"
                    on:click=move |ev| {
                        ev.prevent_default();
                        router.navigate_to(Route::Home);
                    }
                >
                    "Sukari"
                </a>
            </div>
            <div class="flex-none flex flex-wrap items-center gap-1">
                {move || {
                    let current = router.current_route().get();
                    links
                        .get()
                        .into_iter()
                        .map(|link| match link {
                            NavLink::Page(route) => {
                                let class = if route == current {
                                    "btn btn-sm btn-ghost btn-active"
                                } else {
                                    "btn btn-sm btn-ghost"
                                };
                                view! {
                                    <a
                                        href=route.to_path()
                                        class=class
                                        on:click=move |ev| {
                                            ev.prevent_default();
                                            router.navigate_to(route);
                                        }
                                    >
                                        {link.label()}
                                    </a>
                                }
                                .into_any()
                            }
                            NavLink::Logout => view! {
                                <button class="btn btn-sm btn-outline" on:click=move |_| on_logout()>
                                    {link.label()}
                                </button>
                            }
                            .into_any(),
                        })
                        .collect_view()
                }}
                <button
                    class="btn btn-sm btn-ghost"
                    title="Switch language"
                    on:click=move |_| auth.toggle_language()
                >
                    {move || auth.language().toggled().code().to_uppercase()}
                </button>
            </div>
        </nav>
    }
}
