use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::ClientError;
use sukari::validate::{REMINDER_FREQUENCIES, REMINDER_TYPES, ReminderForm};
use sukari_shared::{Reminder, ReminderPatch};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, FieldHint, FormStatus, Loading, Page, SubmitButton};

const MSG_REMINDER_FAILED: &str = "Failed to save reminder";

#[component]
pub fn RemindersPage() -> impl IntoView {
    let auth = use_auth();
    let items = RwSignal::new(Vec::<Reminder>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let form = RwSignal::new(ReminderForm::default());
    let status = FormStatus::new();

    if let Some(token) = auth.token() {
        let api = auth.api();
        spawn_local(async move {
            match api.reminders(&token).await {
                Ok(list) => items.set(list),
                Err(e) => error.set(Some(e.user_message("Failed to load reminders"))),
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
                Ok(reminder) => api.create_reminder(&token, &reminder).await,
                Err(fields) => Err(ClientError::from(fields)),
            };
            match result {
                Ok(created) => {
                    items.update(|list| list.push(created));
                    form.set(ReminderForm::default());
                    status.succeed(None);
                }
                Err(e) => status.fail(&e, MSG_REMINDER_FAILED),
            }
        });
    };

    let toggle = move |id: i64, active: bool| {
        let Some(token) = auth.token() else {
            return;
        };
        let api = auth.api();
        spawn_local(async move {
            let patch = ReminderPatch {
                is_active: Some(active),
                ..Default::default()
            };
            match api.update_reminder(&token, id, patch).await {
                Ok(updated) => items.update(|list| {
                    if let Some(slot) = list.iter_mut().find(|r| r.id == updated.id) {
                        *slot = updated;
                    }
                }),
                Err(e) => error.set(Some(e.user_message("Update failed"))),
            }
        });
    };

    let remove = move |id: i64| {
        let Some(token) = auth.token() else {
            return;
        };
        let api = auth.api();
        spawn_local(async move {
            match api.delete_reminder(&token, id).await {
                Ok(()) => items.update(|list| list.retain(|r| r.id != id)),
                Err(e) => error.set(Some(e.user_message("Delete failed"))),
            }
        });
    };

    view! {
        <Page title="Reminders">
            <div class="card bg-base-100 shadow">
                <form class="card-body" on:submit=on_submit>
                    <h2 class="card-title">"New reminder"</h2>
                    <ErrorAlert message=status.error />
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <select
                            class="select select-bordered"
                            on:change=move |ev| form.update(|f| f.reminder_type = event_target_value(&ev))
                            prop:value=move || form.with(|f| f.reminder_type.clone())
                        >
                            {REMINDER_TYPES.iter().map(|t| view! { <option value=*t>{*t}</option> }).collect_view()}
                        </select>
                        <select
                            class="select select-bordered"
                            on:change=move |ev| form.update(|f| f.frequency = event_target_value(&ev))
                            prop:value=move || form.with(|f| f.frequency.clone())
                        >
                            {REMINDER_FREQUENCIES.iter().map(|t| view! { <option value=*t>{*t}</option> }).collect_view()}
                        </select>
                        <div class="form-control">
                            <input
                                type="text"
                                placeholder="Title"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.title.clone())
                            />
                            <FieldHint message=status.field("title") />
                        </div>
                        <div class="form-control">
                            <input
                                type="time"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.scheduled_time = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.scheduled_time.clone())
                            />
                            <FieldHint message=status.field("scheduled_time") />
                        </div>
                    </div>
                    <textarea
                        placeholder="Message (optional)"
                        class="textarea textarea-bordered"
                        on:input=move |ev| form.update(|f| f.message = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.message.clone())
                    ></textarea>
                    <div class="card-actions justify-end">
                        <SubmitButton busy=status.busy label="Add reminder" busy_label="Saving..." />
                    </div>
                </form>
            </div>

            <ErrorAlert message=error />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <ul class="space-y-2">
                    {move || items.get().into_iter().map(|r| {
                        let id = r.id;
                        let active = r.is_active;
                        view! {
                            <li class="card bg-base-100 shadow-sm">
                                <div class="card-body py-3 flex-row items-center justify-between">
                                    <div>
                                        <div class="font-semibold">{r.title}</div>
                                        <div class="text-sm text-base-content/70">
                                            {format!("{} · {} · {}", r.reminder_type, r.frequency, r.scheduled_time.unwrap_or_default())}
                                        </div>
                                        {r.message.map(|m| view! { <div class="text-sm">{m}</div> })}
                                    </div>
                                    <div class="flex items-center gap-2">
                                        <input
                                            type="checkbox"
                                            class="toggle toggle-primary"
                                            prop:checked=active
                                            on:change=move |ev| toggle(id, event_target_checked(&ev))
                                        />
                                        <button class="btn btn-xs btn-ghost text-error" on:click=move |_| remove(id)>"Delete"</button>
                                    </div>
                                </div>
                            </li>
                        }
                    }).collect_view()}
                </ul>
            </Show>
        </Page>
    }
}
