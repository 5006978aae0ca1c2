use leptos::prelude::*;
use leptos::task::spawn_local;
use sukari::ClientError;
use sukari::validate::MessageForm;
use sukari_shared::{Doctor, DoctorMessage};

use crate::auth::use_auth;
use crate::components::common::{ErrorAlert, FieldHint, FormStatus, Loading, Page, SubmitButton};

const MSG_SEND_FAILED: &str = "Failed to send message";

#[component]
pub fn DoctorMessagesPage() -> impl IntoView {
    let auth = use_auth();
    let messages = RwSignal::new(Vec::<DoctorMessage>::new());
    let doctor = RwSignal::new(None::<Doctor>);
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let form = RwSignal::new(MessageForm::default());
    let status = FormStatus::new();

    if let Some(token) = auth.token() {
        let api = auth.api();
        spawn_local(async move {
            match api.doctor_messages(&token).await {
                Ok(list) => messages.set(list),
                Err(e) => error.set(Some(e.user_message("Failed to load messages"))),
            }
            loading.set(false);
        });
    }

    // 已绑定医生时显示医生信息
    let doctor_id = auth.state.with_untracked(|s| s.session.user.as_ref().and_then(|u| u.doctor_id));
    if let Some(doctor_id) = doctor_id {
        let api = auth.api();
        spawn_local(async move {
            match api.doctor_patients(doctor_id).await {
                Ok(info) => doctor.set(Some(info.doctor)),
                Err(e) => log::debug!("[DoctorMessages] doctor {} unavailable: {}", doctor_id, e),
            }
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
                Ok(message) => api.send_doctor_message(&token, &message).await,
                Err(fields) => Err(ClientError::from(fields)),
            };
            match result {
                Ok(sent) => {
                    messages.update(|list| list.push(sent));
                    form.set(MessageForm::default());
                    status.succeed(None);
                }
                Err(e) => status.fail(&e, MSG_SEND_FAILED),
            }
        });
    };

    view! {
        <Page title="Messages with your doctor">
            {move || match doctor.get() {
                Some(d) => view! {
                    <div class="alert">
                        <span>{format!("Your doctor: {} · {}", d.name, d.phone.unwrap_or(d.email))}</span>
                    </div>
                }.into_any(),
                None => view! {
                    <p class="text-base-content/70">"No doctor linked yet. You can choose one on your profile."</p>
                }.into_any(),
            }}

            <ErrorAlert message=error />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <div class="space-y-2">
                    {move || messages.get().into_iter().map(|m| {
                        let from_patient = m.sender_type == "patient";
                        let align = if from_patient { "chat chat-end" } else { "chat chat-start" };
                        let bubble = if m.is_emergency { "chat-bubble chat-bubble-error" } else { "chat-bubble" };
                        view! {
                            <div class=align>
                                <div class="chat-header text-xs opacity-70">{m.created_at.unwrap_or_default()}</div>
                                <div class=bubble>{m.message}</div>
                            </div>
                        }
                    }).collect_view()}
                </div>
            </Show>

            <div class="card bg-base-100 shadow">
                <form class="card-body" on:submit=on_submit>
                    <ErrorAlert message=status.error />
                    <textarea
                        class="textarea textarea-bordered"
                        placeholder="Write a message"
                        on:input=move |ev| form.update(|f| f.message = event_target_value(&ev))
                        prop:value=move || form.with(|f| f.message.clone())
                    ></textarea>
                    <FieldHint message=status.field("message") />
                    <label class="label cursor-pointer justify-start gap-2">
                        <input
                            type="checkbox"
                            class="checkbox checkbox-error"
                            on:change=move |ev| form.update(|f| f.is_emergency = event_target_checked(&ev))
                            prop:checked=move || form.with(|f| f.is_emergency)
                        />
                        <span class="label-text">"This is an emergency"</span>
                    </label>
                    <div class="card-actions justify-end">
                        <SubmitButton busy=status.busy label="Send" busy_label="Sending..." />
                    </div>
                </form>
            </div>
        </Page>
    }
}
