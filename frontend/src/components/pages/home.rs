use leptos::prelude::*;
use sukari::Route;
use sukari::nav::{self, NavLink};

use crate::auth::use_auth;
use crate::web::router::use_router;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let is_authed = auth.is_authenticated_signal();

    let get_started = move |_: leptos::ev::MouseEvent| {
        let complete = auth.state.with_untracked(|s| s.onboarding_complete);
        if let NavLink::Page(target) = nav::get_started(is_authed.get_untracked(), complete) {
            router.navigate_to(target);
        }
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-xl space-y-4">
                    <h1 class="text-5xl font-bold text-primary">"Sukari"</h1>
                    <p class="text-lg">
                        "Track your blood sugar, learn what moves it, and stay in touch with your doctor."
                    </p>
                    <div class="flex justify-center gap-2">
                        <button class="btn btn-primary" on:click=get_started>"Get started"</button>
                        <Show when=move || !is_authed.get()>
                            <button class="btn btn-outline" on:click=move |_| router.navigate_to(Route::Login)>
                                "Log in"
                            </button>
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}
