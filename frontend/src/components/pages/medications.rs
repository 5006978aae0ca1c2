use chrono::NaiveTime;
use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::medication::{mark_overdue_missed, overdue_pending};
use sukari::validate::MedicationForm;
use sukari::wizard::actions::{MSG_MEDICATION_FAILED, add_medication};
use sukari_shared::{Medication, MedicationPatch, MedicationStatus};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, FieldHint, FormStatus, Loading, Page, SubmitButton};
use crate::web::Interval;

const CLOCK_TICK_MS: u32 = 60_000;

fn local_clock() -> NaiveTime {
    chrono::Local::now().time()
}

fn replace(list: &mut [Medication], updated: Medication) {
    if let Some(slot) = list.iter_mut().find(|m| m.id == updated.id) {
        *slot = updated;
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn MedicationsPage() -> impl IntoView {
    let auth = use_auth();
    let items = RwSignal::new(Vec::<Medication>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let form = RwSignal::new(MedicationForm::default());
    let status = FormStatus::new();

    // 每分钟刷新一次当前时间，逾期标记随之更新
    let now = RwSignal::new(local_clock());
    let _ticker = StoredValue::new_local(Interval::new(CLOCK_TICK_MS, move || now.set(local_clock())));

    if let Some(token) = auth.token() {
        let api = auth.api();
        spawn_local(async move {
            match api.medications(&token).await {
                Ok(list) => items.set(list),
                Err(e) => error.set(Some(e.user_message("Failed to load medications"))),
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
            match add_medication(&api, &token, &input).await {
                Ok(med) => {
                    items.update(|list| list.push(med));
                    form.set(MedicationForm::default());
                    status.succeed(None);
                }
                Err(e) => status.fail(&e, MSG_MEDICATION_FAILED),
            }
        });
    };

    let set_status = move |id: i64, next: MedicationStatus| {
        let Some(token) = auth.token() else {
            return;
        };
        let api = auth.api();
        spawn_local(async move {
            let patch = MedicationPatch {
                status: Some(next),
                ..Default::default()
            };
            match api.update_medication(&token, id, patch).await {
                Ok(updated) => items.update(|list| replace(list, updated)),
                Err(e) => error.set(Some(e.user_message("Update failed"))),
            }
        });
    };

    let mark_all_overdue = move |_: leptos::ev::MouseEvent| {
        let Some(token) = auth.token() else {
            return;
        };
        let meds = items.get_untracked();
        let clock = local_clock();
        let count = overdue_pending(&meds, clock).len();
        if count == 0 || !confirm(&format!("Mark {} overdue medication(s) as missed?", count)) {
            return;
        }
        let api = auth.api();
        spawn_local(async move {
            match mark_overdue_missed(&api, &token, &meds, clock).await {
                Ok(updated) => items.update(|list| {
                    for med in updated {
                        replace(list, med);
                    }
                }),
                Err(e) => error.set(Some(e.user_message("Update failed"))),
            }
        });
    };

    view! {
        <Page title="Medications">
            <div class="card bg-base-100 shadow">
                <form class="card-body" on:submit=on_submit>
                    <h2 class="card-title">"Add medication"</h2>
                    <ErrorAlert message=status.error />
                    <div class="grid grid-cols-1 md:grid-cols-4 gap-4">
                        <div class="form-control">
                            <input
                                type="text"
                                placeholder="Name"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.name.clone())
                            />
                            <FieldHint message=status.field("name") />
                        </div>
                        <div class="form-control">
                            <input
                                type="text"
                                placeholder="Dose"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.dose = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.dose.clone())
                            />
                            <FieldHint message=status.field("dose") />
                        </div>
                        <div class="form-control">
                            <input
                                type="time"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.time = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.time.clone())
                            />
                            <FieldHint message=status.field("time") />
                        </div>
                        <div class="form-control">
                            <select
                                class="select select-bordered"
                                on:change=move |ev| form.update(|f| f.status = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.status.clone())
                            >
                                <option value="">"Pending"</option>
                                <option value="taken">"Taken"</option>
                                <option value="missed">"Missed"</option>
                            </select>
                            <FieldHint message=status.field("status") />
                        </div>
                    </div>
                    <div class="card-actions justify-end">
                        <SubmitButton busy=status.busy label="Add" busy_label="Adding..." />
                    </div>
                </form>
            </div>

            <div class="flex justify-between items-center">
                <h2 class="text-lg font-semibold">"Today's schedule"</h2>
                <button class="btn btn-outline btn-sm" on:click=mark_all_overdue>"Mark all overdue as missed"</button>
            </div>
            <ErrorAlert message=error />

            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <ul class="space-y-2">
                    {move || {
                        let list = items.get();
                        let overdue_ids: Vec<i64> =
                            overdue_pending(&list, now.get()).iter().map(|m| m.id).collect();
                        list.into_iter()
                            .map(|m| {
                                let id = m.id;
                                let stored = m.effective_status();
                                let overdue = overdue_ids.contains(&id);
                                let (badge, label) = match (stored, overdue) {
                                    (MedicationStatus::Taken, _) => ("badge badge-success", "taken".to_string()),
                                    (MedicationStatus::Missed, _) => ("badge badge-error", "missed".to_string()),
                                    (_, true) => ("badge badge-error", "missed (overdue)".to_string()),
                                    _ => ("badge badge-ghost", "pending".to_string()),
                                };
                                view! {
                                    <li class="card bg-base-100 shadow-sm">
                                        <div class="card-body py-3 flex-row items-center justify-between">
                                            <div>
                                                <div class="font-semibold">{m.name}</div>
                                                <div class="text-sm text-base-content/70">
                                                    {format!("{} · {}", m.dose, m.time.unwrap_or_default())}
                                                </div>
                                            </div>
                                            <div class="flex items-center gap-2">
                                                <span class=badge title=format!("Status: {}", label)>{label.clone()}</span>
                                                <button class="btn btn-xs btn-success" on:click=move |_| set_status(id, MedicationStatus::Taken)>
                                                    "Taken"
                                                </button>
                                                <button class="btn btn-xs btn-outline" on:click=move |_| set_status(id, MedicationStatus::Missed)>
                                                    "Mark Missed"
                                                </button>
                                            </div>
                                        </div>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </Page>
    }
}
