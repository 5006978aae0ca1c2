use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::validate::ReadingForm;
use sukari::wizard::actions::MSG_READING_FAILED;
use sukari::{ClientError, Route};
use sukari_shared::Reading;
use sukari_shared::reading::{Evaluation, GlucoseStatus};

use crate::auth::use_auth;
use crate::components::common::{
    ErrorAlert, FieldHint, FormStatus, Loading, Page, SubmitButton, now_clock, today,
};
use crate::onboarding::use_progress;
use crate::web::router::Link;

fn fresh_form() -> ReadingForm {
    ReadingForm {
        date: today(),
        time: now_clock(),
        ..Default::default()
    }
}

fn status_badge(status: GlucoseStatus) -> &'static str {
    match status {
        GlucoseStatus::Low => "badge badge-warning",
        GlucoseStatus::Normal => "badge badge-success",
        GlucoseStatus::High => "badge badge-error",
        GlucoseStatus::Unknown => "badge badge-ghost",
    }
}

#[component]
pub fn ReadingsPage() -> impl IntoView {
    let auth = use_auth();
    let progress = use_progress();
    let items = RwSignal::new(Vec::<Reading>::new());
    let loading = RwSignal::new(true);
    let load_error = RwSignal::new(None::<String>);
    let form = RwSignal::new(fresh_form());
    let status = FormStatus::new();
    let evaluation = RwSignal::new(None::<Evaluation>);

    if let Some(token) = auth.token() {
        let api = auth.api();
        spawn_local(async move {
            match api.readings(&token).await {
                Ok(list) => items.set(list),
                Err(e) => load_error.set(Some(e.user_message("Failed to load readings"))),
            }
            loading.set(false);
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
            let result = match input.validate() {
                Ok(reading) => api.create_reading(&token, &reading).await,
                Err(fields) => Err(ClientError::from(fields)),
            };
            match result {
                Ok(created) => {
                    // 读数检查结果已过期
                    progress.invalidate();
                    let eval = created.evaluation.clone().unwrap_or_else(|| {
                        Evaluation::local(created.reading.value, created.reading.context.as_deref())
                    });
                    evaluation.set(Some(eval));
                    items.update(|list| list.push(created.reading));
                    form.set(fresh_form());
                    status.succeed(None);
                }
                Err(e) => status.fail(&e, MSG_READING_FAILED),
            }
        });
    };

    let on_delete = move |id: i64| {
        let Some(token) = auth.token() else {
            return;
        };
        let api = auth.api();
        spawn_local(async move {
            match api.delete_reading(&token, id).await {
                Ok(()) => {
                    items.update(|list| list.retain(|r| r.id != id));
                    progress.invalidate();
                }
                Err(e) => load_error.set(Some(e.user_message("Delete failed"))),
            }
        });
    };

    view! {
        <Page title="Blood sugar readings">
            <div class="card bg-base-100 shadow">
                <form class="card-body" on:submit=on_submit>
                    <h2 class="card-title">"Add a reading"</h2>
                    <ErrorAlert message=status.error />
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="value"><span class="label-text">"Value (mg/dL)"</span></label>
                            <input
                                id="value"
                                type="number"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.value = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.value.clone())
                            />
                            <FieldHint message=status.field("value") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="context"><span class="label-text">"When"</span></label>
                            <select
                                id="context"
                                class="select select-bordered"
                                on:change=move |ev| form.update(|f| f.context = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.context.clone())
                            >
                                <option value="">"Not specified"</option>
                                <option value="pre_meal">"Before a meal"</option>
                                <option value="post_meal">"After a meal"</option>
                            </select>
                            <FieldHint message=status.field("context") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="date"><span class="label-text">"Date"</span></label>
                            <input
                                id="date"
                                type="date"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.date = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.date.clone())
                            />
                            <FieldHint message=status.field("date") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="time"><span class="label-text">"Time"</span></label>
                            <input
                                id="time"
                                type="time"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.time = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.time.clone())
                            />
                            <FieldHint message=status.field("time") />
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label" for="notes"><span class="label-text">"Notes"</span></label>
                        <textarea
                            id="notes"
                            class="textarea textarea-bordered"
                            on:input=move |ev| form.update(|f| f.notes = event_target_value(&ev))
                            prop:value=move || form.with(|f| f.notes.clone())
                        ></textarea>
                    </div>
                    <div class="card-actions justify-end">
                        <SubmitButton busy=status.busy label="Save reading" busy_label="Saving..." />
                    </div>
                </form>
            </div>

            {move || evaluation.get().map(|e| view! {
                <div class="alert shadow">
                    <div>
                        <span class=status_badge(e.status)>{format!("{:?}", e.status)}</span>
                        <ul class="list-disc list-inside mt-2">
                            {e.suggestions.into_iter().map(|s| view! { <li>{s}</li> }).collect_view()}
                        </ul>
                        <Link to=Route::Education class="link link-primary text-sm">"Continue to education"</Link>
                    </div>
                </div>
            })}

            <ErrorAlert message=load_error />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr><th>"Date"</th><th>"Time"</th><th>"Value"</th><th>"Context"</th><th></th></tr>
                        </thead>
                        <tbody>
                            {move || items
                                .get()
                                .into_iter()
                                .rev()
                                .map(|r| {
                                    let id = r.id;
                                    let eval = GlucoseStatus::evaluate(r.value, r.context.as_deref());
                                    view! {
                                        <tr>
                                            <td>{r.date.unwrap_or_default()}</td>
                                            <td>{r.time.unwrap_or_default()}</td>
                                            <td><span class=status_badge(eval)>{r.value}</span></td>
                                            <td>{r.context.unwrap_or_default()}</td>
                                            <td>
                                                <button class="btn btn-xs btn-ghost text-error" on:click=move |_| on_delete(id)>
                                                    "Delete"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                </div>
            </Show>
        </Page>
    }
}
