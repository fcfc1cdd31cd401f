use leptos::ev::SubmitEvent;
use leptos::*;
use crate::models::review::ReviewDraft;

/// Name/comment form. The parent owns the draft so it decides when to clear
/// it. Recording happens outside this form; a clip already set on
/// `draft.audio` is previewed and can be dropped.
#[component]
pub fn ReviewForm(
    draft: RwSignal<ReviewDraft>,
    #[prop(into)] submitting: Signal<bool>,
    on_submit: Callback<()>,
) -> impl IntoView {
    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        on_submit.call(());
    };

    view! {
        <form class="review-form" on:submit=handle_submit>
            <h3>{ "What do you suggest for the future of Morai" }</h3>
            <label>{ "Your Name" }</label>
            <input
                type="text"
                placeholder="Full Name"
                required=true
                prop:value=move || draft.with(|d| d.name.clone())
                on:input=move |e| draft.update(|d| d.name = event_target_value(&e))
            />
            <label>{ "Message" }</label>
            <textarea
                placeholder="Tell us what you think..."
                required=true
                prop:value=move || draft.with(|d| d.comment.clone())
                on:input=move |e| draft.update(|d| d.comment = event_target_value(&e))
            />
            { move || draft.with(|d| d.audio.clone()).map(|src| view! {
                <div class="audio-preview">
                    <audio src=src controls=true />
                    <button type="button" class="danger" on:click=move |_| draft.update(|d| d.audio = None)>
                        { "Remove" }
                    </button>
                </div>
            }) }
            <button type="submit" disabled=move || submitting.get()>{ "Submit Review" }</button>
        </form>
    }
}
